use std::path::PathBuf;

use crate::token::Position;

/// Nothing in the scanner matched at `position`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("lex error at {position}: {kind}")]
pub struct LexError {
    pub position: Position,
    pub kind: LexErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("unterminated string")]
    UnterminatedString,

    /// `\"` inside a basic string. Rejected rather than guessed at.
    #[error("escaped quote inside string is not supported")]
    EscapedQuote,

    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    #[error("malformed number or date `{0}`")]
    MalformedNumber(String),
}

/// The token stream does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parse error at {position}: {kind}")]
pub struct ParseError {
    pub position: Position,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found}")]
    Unexpected { expected: String, found: String },

    #[error("expected {expected}, found end of input")]
    UnexpectedEof { expected: String },

    #[error("duplicate key `{key}`")]
    DuplicateKey { key: String },

    #[error("key `{key}` is not a table")]
    NotATable { key: String },

    #[error("table [{path}] defined more than once")]
    DuplicateTable { path: String },

    #[error("cannot append to static array `{key}`")]
    StaticArray { key: String },

    #[error("inline table `{key}` cannot be extended")]
    InlineTableExtended { key: String },

    #[error("expected a newline before the next statement")]
    MissingNewline,
}

/// A lexically valid token that cannot become a typed scalar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {what} `{lexeme}` at {position}: {reason}")]
pub struct CoercionError {
    pub position: Position,
    pub what: &'static str,
    pub lexeme: String,
    pub reason: String,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Coercion(#[from] CoercionError),

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
