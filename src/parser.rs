use std::collections::HashSet;
use std::iter::Peekable;
use std::vec;

use crate::coerce::{coerce, key_text};
use crate::error::{Error, ParseError, ParseErrorKind};
use crate::token::{Position, Punct, Token, TokenKind};
use crate::value::{Table, Value};

/// A dotted key split into the tables to walk through and the final key.
#[derive(Debug, Clone)]
struct KeyPath {
    parents: Vec<String>,
    last: String,
}

impl KeyPath {
    fn full(&self) -> Vec<String> {
        let mut keys = self.parents.clone();
        keys.push(self.last.clone());
        keys
    }
}

/// Bookkeeping about tables, keyed by canonical path.
///
/// A canonical path is the list of keys from the scope root, with `#<index>`
/// segments inserted wherever an array of tables was entered.
#[derive(Debug, Default)]
struct PathState {
    /// Tables opened by a `[header]` or implied by a dotted key
    defined: HashSet<Vec<String>>,
    /// Tables created by dotted keys; only dotted keys may add to them
    dotted: HashSet<Vec<String>>,
    /// Tables written inline; closed to further keys
    inline: HashSet<Vec<String>>,
    /// Arrays created by `[[header]]`
    array_tables: HashSet<Vec<String>>,
}

fn error(position: Position, kind: ParseErrorKind) -> ParseError {
    ParseError { position, kind }
}

fn unexpected(expected: &str, found: &Token) -> ParseError {
    error(
        found.position,
        ParseErrorKind::Unexpected {
            expected: expected.to_string(),
            found: found.to_string(),
        },
    )
}

/// Bare keys, quoted keys, and the integers and booleans that read like bare
/// keys. A leading `+` is not a bare-key character.
fn is_key(token: &Token) -> bool {
    match token.kind {
        TokenKind::Key | TokenKind::String | TokenKind::Boolean => true,
        TokenKind::Integer => !token.lexeme.starts_with('+'),
        _ => false,
    }
}

/// Walks `keys` down from `table`, creating missing tables on the way and
/// stepping into the newest element of any array of tables.
fn descend<'t>(
    mut table: &'t mut Table,
    keys: &[String],
    canonical: &mut Vec<String>,
    paths: &PathState,
    position: Position,
) -> Result<&'t mut Table, ParseError> {
    for key in keys {
        canonical.push(key.clone());
        if paths.inline.contains(&*canonical) {
            return Err(error(
                position,
                ParseErrorKind::InlineTableExtended { key: key.clone() },
            ));
        }

        if !table.contains_key(key) {
            tracing::debug!(path = %canonical.join("."), "implicit table");
        }
        let entry = table
            .entry(key.clone())
            .or_insert_with(|| Value::Table(Table::new()));

        table = match entry {
            Value::Table(inner) => inner,
            Value::Array(items) if paths.array_tables.contains(&*canonical) => {
                canonical.push(format!("#{}", items.len().saturating_sub(1)));
                match items.last_mut() {
                    Some(Value::Table(inner)) => inner,
                    _ => {
                        return Err(error(
                            position,
                            ParseErrorKind::NotATable { key: key.clone() },
                        ));
                    }
                }
            }
            _ => {
                return Err(error(
                    position,
                    ParseErrorKind::NotATable { key: key.clone() },
                ));
            }
        };
    }
    Ok(table)
}

/// Walks the parent segments of a dotted key. Tables are created as needed
/// and marked as defined; a table that a header (or an inline table) already
/// made cannot be reopened this way.
fn descend_dotted<'t>(
    mut table: &'t mut Table,
    keys: &[String],
    canonical: &mut Vec<String>,
    paths: &mut PathState,
    position: Position,
) -> Result<&'t mut Table, ParseError> {
    for key in keys {
        canonical.push(key.clone());
        if paths.inline.contains(&*canonical) {
            return Err(error(
                position,
                ParseErrorKind::InlineTableExtended { key: key.clone() },
            ));
        }
        match table.get(key) {
            None => {
                tracing::debug!(path = %canonical.join("."), "dotted table");
                paths.dotted.insert(canonical.clone());
                paths.defined.insert(canonical.clone());
            }
            Some(Value::Table(_)) if paths.dotted.contains(&*canonical) => {}
            Some(Value::Table(_)) => {
                return Err(error(
                    position,
                    ParseErrorKind::DuplicateKey { key: key.clone() },
                ));
            }
            Some(_) => {
                return Err(error(
                    position,
                    ParseErrorKind::NotATable { key: key.clone() },
                ));
            }
        }

        let entry = table
            .entry(key.clone())
            .or_insert_with(|| Value::Table(Table::new()));
        table = match entry {
            Value::Table(inner) => inner,
            _ => {
                return Err(error(
                    position,
                    ParseErrorKind::NotATable { key: key.clone() },
                ));
            }
        };
    }
    Ok(table)
}

/// Inserts `value` at `key` below `table`, whose canonical path is `canonical`.
fn assign(
    table: &mut Table,
    mut canonical: Vec<String>,
    key: &KeyPath,
    value: Value,
    paths: &mut PathState,
    position: Position,
) -> Result<(), ParseError> {
    let target = descend_dotted(table, &key.parents, &mut canonical, paths, position)?;
    if target.contains_key(&key.last) {
        return Err(error(
            position,
            ParseErrorKind::DuplicateKey {
                key: key.last.clone(),
            },
        ));
    }
    canonical.push(key.last.clone());
    if value.is_table() {
        paths.inline.insert(canonical);
    }
    target.insert(key.last.clone(), value);
    Ok(())
}

/// Builds a document tree from a token stream.
///
/// The parser is strict: the first token that does not fit the grammar ends
/// the parse with an error and no tree is returned.
pub struct Parser {
    tokens: Peekable<vec::IntoIter<Token>>,
    root: Table,
    current: Vec<String>,
    paths: PathState,
    last_position: Option<Position>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens: tokens.into_iter().peekable(),
            root: Table::new(),
            current: Vec::new(),
            paths: PathState::default(),
            last_position: None,
        }
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.next()?;
        self.last_position = Some(token.position);
        Some(token)
    }

    fn next_or_eof(&mut self, expected: &str) -> Result<Token, ParseError> {
        self.advance().ok_or_else(|| {
            error(
                self.last_position.unwrap_or(Position::new(1, 1)),
                ParseErrorKind::UnexpectedEof {
                    expected: expected.to_string(),
                },
            )
        })
    }

    fn check(&mut self, punct: Punct) -> bool {
        self.tokens.peek().is_some_and(|t| t.is_punct(punct))
    }

    fn expect(&mut self, punct: Punct) -> Result<Token, ParseError> {
        let expected = format!("'{}'", punct.as_char());
        let token = self.next_or_eof(&expected)?;
        if !token.is_punct(punct) {
            return Err(unexpected(&expected, &token));
        }
        Ok(token)
    }

    /// Parses the whole token stream into the root table.
    pub fn parse(mut self) -> Result<Table, Error> {
        loop {
            let previous_line = self.last_position.map(|p| p.line);
            let Some(token) = self.advance() else {
                break;
            };
            if previous_line == Some(token.position.line) {
                return Err(error(token.position, ParseErrorKind::MissingNewline).into());
            }

            match token.kind {
                TokenKind::TableHeader => self.table_header(token)?,
                TokenKind::ArrayTableHeader => self.array_table_header(token)?,
                TokenKind::Key
                | TokenKind::String
                | TokenKind::Integer
                | TokenKind::Boolean => self.key_value(token)?,
                _ => return Err(unexpected("a key or a table header", &token).into()),
            }
        }
        Ok(self.root)
    }

    /// `key ( '.' key )*`, starting from an already consumed token.
    fn dotted_key(&mut self, first: Token) -> Result<KeyPath, Error> {
        if !is_key(&first) {
            return Err(unexpected("a key", &first).into());
        }
        let mut last = key_text(&first)?;
        let mut parents = Vec::new();
        while self.check(Punct::Dot) {
            self.advance();
            let token = self.next_or_eof("a key")?;
            if !is_key(&token) {
                return Err(unexpected("a key", &token).into());
            }
            parents.push(std::mem::replace(&mut last, key_text(&token)?));
        }
        Ok(KeyPath { parents, last })
    }

    fn key_value(&mut self, first: Token) -> Result<(), Error> {
        let position = first.position;
        let key = self.dotted_key(first)?;
        self.expect(Punct::Equals)?;
        let value = self.value()?;

        let mut canonical = Vec::new();
        let table = descend(
            &mut self.root,
            &self.current,
            &mut canonical,
            &self.paths,
            position,
        )?;
        tracing::trace!(key = %key.full().join("."), kind = value.type_name(), "assign");
        assign(table, canonical, &key, value, &mut self.paths, position)?;
        Ok(())
    }

    fn table_header(&mut self, open: Token) -> Result<(), Error> {
        let first = self.next_or_eof("a table name")?;
        let key = self.dotted_key(first)?;
        self.expect(Punct::RBracket)?;

        let position = open.position;
        let mut canonical = Vec::new();
        let parent = descend(
            &mut self.root,
            &key.parents,
            &mut canonical,
            &self.paths,
            position,
        )?;
        canonical.push(key.last.clone());
        if self.paths.inline.contains(&canonical) {
            return Err(error(
                position,
                ParseErrorKind::InlineTableExtended {
                    key: key.last.clone(),
                },
            )
            .into());
        }

        match parent.get(&key.last) {
            None => {
                parent.insert(key.last.clone(), Value::Table(Table::new()));
            }
            Some(Value::Table(_)) if self.paths.defined.contains(&canonical) => {
                return Err(error(
                    position,
                    ParseErrorKind::DuplicateTable {
                        path: key.full().join("."),
                    },
                )
                .into());
            }
            Some(Value::Table(_)) => {}
            Some(_) => {
                return Err(error(
                    position,
                    ParseErrorKind::DuplicateKey {
                        key: key.last.clone(),
                    },
                )
                .into());
            }
        }

        self.paths.defined.insert(canonical);
        self.current = key.full();
        tracing::debug!(path = %self.current.join("."), "table");
        Ok(())
    }

    fn array_table_header(&mut self, open: Token) -> Result<(), Error> {
        let first = self.next_or_eof("a table name")?;
        let key = self.dotted_key(first)?;
        let close = self.expect(Punct::RBracket)?;
        let second = self.expect(Punct::RBracket)?;
        let adjacent = Position::new(close.position.line, close.position.column + 1);
        if second.position != adjacent {
            return Err(unexpected("']]'", &second).into());
        }

        let position = open.position;
        let mut canonical = Vec::new();
        let parent = descend(
            &mut self.root,
            &key.parents,
            &mut canonical,
            &self.paths,
            position,
        )?;
        canonical.push(key.last.clone());
        if self.paths.inline.contains(&canonical) {
            return Err(error(
                position,
                ParseErrorKind::InlineTableExtended {
                    key: key.last.clone(),
                },
            )
            .into());
        }

        match parent.get_mut(&key.last) {
            None => {
                parent.insert(
                    key.last.clone(),
                    Value::Array(vec![Value::Table(Table::new())]),
                );
                self.paths.array_tables.insert(canonical);
            }
            Some(Value::Array(items)) if self.paths.array_tables.contains(&canonical) => {
                items.push(Value::Table(Table::new()));
            }
            Some(Value::Array(_)) => {
                return Err(error(
                    position,
                    ParseErrorKind::StaticArray {
                        key: key.last.clone(),
                    },
                )
                .into());
            }
            Some(_) => {
                return Err(error(
                    position,
                    ParseErrorKind::DuplicateKey {
                        key: key.last.clone(),
                    },
                )
                .into());
            }
        }

        self.current = key.full();
        tracing::debug!(path = %self.current.join("."), "array of tables entry");
        Ok(())
    }

    fn value(&mut self) -> Result<Value, Error> {
        let token = self.next_or_eof("a value")?;
        match token.kind {
            TokenKind::String
            | TokenKind::Integer
            | TokenKind::Float
            | TokenKind::Boolean
            | TokenKind::DateTime => Ok(coerce(&token)?),
            TokenKind::Punct(Punct::LBracket) => self.array(),
            TokenKind::Punct(Punct::LBrace) => self.inline_table(),
            _ => Err(unexpected("a value", &token).into()),
        }
    }

    /// `'[' (value (',' value)*)? ','? ']'`, opening bracket already consumed.
    fn array(&mut self) -> Result<Value, Error> {
        let mut items = Vec::new();
        loop {
            if self.check(Punct::RBracket) {
                self.advance();
                break;
            }
            items.push(self.value()?);
            let separator = self.next_or_eof("',' or ']'")?;
            match separator.kind {
                TokenKind::Punct(Punct::Comma) => continue,
                TokenKind::Punct(Punct::RBracket) => break,
                _ => return Err(unexpected("',' or ']'", &separator).into()),
            }
        }
        Ok(Value::Array(items))
    }

    /// `'{' (key '=' value (',' key '=' value)*)? '}'`, opening brace already
    /// consumed. Starts a fresh scope; the current table path is untouched.
    fn inline_table(&mut self) -> Result<Value, Error> {
        let mut table = Table::new();
        let mut paths = PathState::default();
        if self.check(Punct::RBrace) {
            self.advance();
            return Ok(Value::Table(table));
        }
        loop {
            let first = self.next_or_eof("a key")?;
            let position = first.position;
            let key = self.dotted_key(first)?;
            self.expect(Punct::Equals)?;
            let value = self.value()?;
            assign(&mut table, Vec::new(), &key, value, &mut paths, position)?;

            let separator = self.next_or_eof("',' or '}'")?;
            match separator.kind {
                TokenKind::Punct(Punct::Comma) => continue,
                TokenKind::Punct(Punct::RBrace) => break,
                _ => return Err(unexpected("',' or '}'", &separator).into()),
            }
        }
        Ok(Value::Table(table))
    }
}

/// Parses a token stream into a root table.
pub fn parse(tokens: Vec<Token>) -> Result<Table, Error> {
    Parser::new(tokens).parse()
}
