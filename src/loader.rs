//! Entry points that wire the lexer and the parser together.

use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::error::Error;
use crate::lexer::tokenize;
use crate::parser::Parser;
use crate::value::Table;

/// Parses TOML source text into its root table.
///
/// # Examples
///
/// ```
/// use tomless::{parse_text, Value};
///
/// let root = parse_text("[server]\nport = 8080\n").unwrap();
/// let server = root["server"].as_table().unwrap();
/// assert_eq!(server["port"], Value::Integer(8080));
/// ```
pub fn parse_text(source: &str) -> Result<Table, Error> {
    let started = Instant::now();
    let tokens = tokenize(source)?;
    let token_count = tokens.len();
    let root = Parser::new(tokens).parse()?;
    tracing::debug!(
        tokens = token_count,
        keys = root.len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "parsed document"
    );
    Ok(root)
}

/// Reads `path` as UTF-8 and parses it with [`parse_text`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Table, Error> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = source.len(), "loading");
    parse_text(&source)
}
