use std::sync::LazyLock;

use regex::Regex;

use crate::error::{LexError, LexErrorKind};
use crate::token::{Position, Punct, Token, TokenKind};

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:0|[1-9][0-9]*)$").unwrap());

static FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:0|[1-9][0-9]*)(?:\.[0-9]+(?:[eE][+-]?[0-9]+)?|[eE][+-]?[0-9]+)$").unwrap()
});

static DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[0-9]{4}-[0-9]{2}-[0-9]{2}(?:[Tt ][0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]+)?(?:[Zz]|[+-][0-9]{2}:[0-9]{2})?)?|[0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]+)?)$",
    )
    .unwrap()
});

static FULL_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

static BARE_KEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Scans TOML source into [`Token`]s.
///
/// Whitespace, newlines and `#` comments are skipped. A `[` is reported as a
/// [`TokenKind::TableHeader`] (or `[[` as [`TokenKind::ArrayTableHeader`])
/// only when it is the first token on its line and no array or inline table
/// is open; everywhere else it is punctuation.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    line_start: bool,
    depth: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            line_start: true,
            depth: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn here(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
                self.line_start = true;
            } else {
                self.column += 1;
            }
        }
    }

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '#' {
                while let Some(c) = self.current_char() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_string(&mut self, quote: char, start: Position) -> Result<String, LexError> {
        let mut raw = String::new();
        raw.push(quote);
        self.advance(); // opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    raw.push(c);
                    self.advance();
                    return Ok(raw);
                }
                '\n' => break,
                '\\' if quote == '"' => {
                    let escape_at = self.here();
                    raw.push(ch);
                    self.advance();
                    match self.current_char() {
                        Some('"') => {
                            return Err(LexError {
                                position: escape_at,
                                kind: LexErrorKind::EscapedQuote,
                            });
                        }
                        Some(c @ ('\\' | 'n' | 't' | 'r' | 'b' | 'f')) => {
                            raw.push(c);
                            self.advance();
                        }
                        Some(c @ ('u' | 'U')) => {
                            raw.push(c);
                            self.advance();
                            let digits = if c == 'u' { 4 } else { 8 };
                            for _ in 0..digits {
                                match self.current_char() {
                                    Some(h) if h.is_ascii_hexdigit() => {
                                        raw.push(h);
                                        self.advance();
                                    }
                                    _ => {
                                        return Err(LexError {
                                            position: escape_at,
                                            kind: LexErrorKind::InvalidEscape(c),
                                        });
                                    }
                                }
                            }
                        }
                        Some(c) => {
                            return Err(LexError {
                                position: escape_at,
                                kind: LexErrorKind::InvalidEscape(c),
                            });
                        }
                        None => break,
                    }
                }
                _ => {
                    raw.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError {
            position: start,
            kind: LexErrorKind::UnterminatedString,
        })
    }

    fn is_run_char(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || matches!(ch, '_' | '+' | '-' | '.' | ':')
    }

    /// Reads a number, date, or digit-led bare key and classifies it by shape.
    fn read_number(&mut self, start: Position) -> Result<Token, LexError> {
        let mut run = String::new();
        while let Some(ch) = self.current_char() {
            if Self::is_run_char(ch) {
                run.push(ch);
                self.advance();
            } else if ch == ' '
                && FULL_DATE.is_match(&run)
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
                && self.peek_char(2).is_some_and(|c| c.is_ascii_digit())
                && self.peek_char(3) == Some(':')
            {
                run.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = if DATETIME.is_match(&run) {
            TokenKind::DateTime
        } else if INTEGER.is_match(&run) {
            TokenKind::Integer
        } else if FLOAT.is_match(&run) {
            TokenKind::Float
        } else if BARE_KEY.is_match(&run) {
            TokenKind::Key
        } else {
            return Err(LexError {
                position: start,
                kind: LexErrorKind::MalformedNumber(run),
            });
        };

        Ok(Token::new(kind, run, start))
    }

    fn punct(&mut self, punct: Punct, start: Position) -> Token {
        self.advance();
        match punct {
            Punct::LBracket | Punct::LBrace => self.depth += 1,
            Punct::RBracket | Punct::RBrace => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
        Token::new(TokenKind::Punct(punct), punct.as_char().to_string(), start)
    }

    /// Returns the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_trivia();

        let start = self.here();
        let token = match self.current_char() {
            None => return Ok(None),
            Some('[') if self.line_start && self.depth == 0 => {
                self.advance();
                if self.current_char() == Some('[') {
                    self.advance();
                    Token::new(TokenKind::ArrayTableHeader, "[[", start)
                } else {
                    Token::new(TokenKind::TableHeader, "[", start)
                }
            }
            Some('=') => self.punct(Punct::Equals, start),
            Some('.') => self.punct(Punct::Dot, start),
            Some(',') => self.punct(Punct::Comma, start),
            Some('[') => self.punct(Punct::LBracket, start),
            Some(']') => self.punct(Punct::RBracket, start),
            Some('{') => self.punct(Punct::LBrace, start),
            Some('}') => self.punct(Punct::RBrace, start),
            Some(q @ ('"' | '\'')) => Token::new(TokenKind::String, self.read_string(q, start)?, start),
            Some(ch) if ch.is_ascii_digit() => self.read_number(start)?,
            Some('+' | '-') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number(start)?
            }
            Some(ch) if ch.is_ascii_alphabetic() || ch == '_' || ch == '-' => {
                let ident = self.read_identifier();
                match ident.as_str() {
                    "true" | "false" => Token::new(TokenKind::Boolean, ident, start),
                    _ => Token::new(TokenKind::Key, ident, start),
                }
            }
            Some(ch) => {
                return Err(LexError {
                    position: start,
                    kind: LexErrorKind::UnexpectedChar(ch),
                });
            }
        };

        self.line_start = false;
        tracing::trace!(kind = %token.kind, lexeme = %token.lexeme, line = start.line, "token");
        Ok(Some(token))
    }

    /// Drains the lexer into a token vector.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

/// Tokenizes a whole source string.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

#[test]
fn test_header_only_at_line_start() {
    let tokens = tokenize("[a]\nx = [[1]]").unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds[0], TokenKind::TableHeader);
    assert_eq!(kinds[4], TokenKind::Punct(Punct::Equals));
    assert_eq!(kinds[5], TokenKind::Punct(Punct::LBracket));
    assert_eq!(kinds[6], TokenKind::Punct(Punct::LBracket));
}

#[test]
fn test_nested_array_line_start_is_punctuation() {
    let tokens = tokenize("x = [\n  [1],\n]").unwrap();
    assert!(tokens.iter().all(|t| t.kind != TokenKind::TableHeader));
}
