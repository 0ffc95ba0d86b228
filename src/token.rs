//! Lexical tokens produced by the [`Lexer`](crate::lexer::Lexer).
//!
//! A token keeps the raw text it was scanned from. Turning that text into a
//! typed scalar is the job of [`coerce`](crate::coerce), so the lexer only
//! decides *what kind* of thing it saw, never what it means.

use std::fmt;

/// A 1-based line/column location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Single-character punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punct {
    /// Key/value separator
    Equals,

    /// Dotted key separator
    ///
    /// # Examples
    /// ```text
    /// [server.alpha]
    /// owner.name = "Tom"
    /// ```
    Dot,

    /// Opens an array value
    LBracket,

    /// Closes an array value or a table header
    RBracket,

    /// Opens an inline table
    LBrace,

    /// Closes an inline table
    RBrace,

    /// Separates array elements and inline table entries
    Comma,
}

impl Punct {
    pub fn as_char(self) -> char {
        match self {
            Punct::Equals => '=',
            Punct::Dot => '.',
            Punct::LBracket => '[',
            Punct::RBracket => ']',
            Punct::LBrace => '{',
            Punct::RBrace => '}',
            Punct::Comma => ',',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Bare key
    ///
    /// Letters, digits, underscores and dashes. Keys that look like numbers or
    /// booleans are lexed as those kinds instead; the parser still accepts
    /// them in key position.
    ///
    /// # Examples
    /// ```text
    /// title
    /// dns-server
    /// _private
    /// ```
    Key,

    /// Basic (`"..."`) or literal (`'...'`) string, quotes included in the lexeme
    String,

    /// Base 10 integer with optional sign
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -17
    /// +8001
    /// ```
    Integer,

    /// Decimal number with a fraction and/or an exponent
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// -0.01
    /// 5e+22
    /// ```
    Float,

    /// `true` or `false`
    Boolean,

    /// Date, time, or date-time in RFC 3339 shape
    ///
    /// # Examples
    /// ```text
    /// 1979-05-27T07:32:00Z
    /// 1979-05-27 07:32:00.999
    /// 1979-05-27
    /// 07:32:00
    /// ```
    DateTime,

    /// `[` opening a table header at the start of a line
    TableHeader,

    /// `[[` opening an array-of-tables header at the start of a line
    ArrayTableHeader,

    Punct(Punct),
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Key => write!(f, "key"),
            TokenKind::String => write!(f, "string"),
            TokenKind::Integer => write!(f, "integer"),
            TokenKind::Float => write!(f, "float"),
            TokenKind::Boolean => write!(f, "boolean"),
            TokenKind::DateTime => write!(f, "datetime"),
            TokenKind::TableHeader => write!(f, "table header"),
            TokenKind::ArrayTableHeader => write!(f, "array-of-tables header"),
            TokenKind::Punct(p) => write!(f, "'{}'", p.as_char()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }

    pub fn is_punct(&self, punct: Punct) -> bool {
        self.kind == TokenKind::Punct(punct)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Punct(_) | TokenKind::TableHeader | TokenKind::ArrayTableHeader => {
                write!(f, "'{}'", self.lexeme)
            }
            kind => write!(f, "{} `{}`", kind, self.lexeme),
        }
    }
}
