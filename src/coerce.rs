//! Conversion of scalar tokens into typed [`Value`]s.

use crate::datetime::Datetime;
use crate::error::CoercionError;
use crate::token::{Token, TokenKind};
use crate::value::Value;

fn fail(token: &Token, what: &'static str, reason: impl Into<String>) -> CoercionError {
    CoercionError {
        position: token.position,
        what,
        lexeme: token.lexeme.clone(),
        reason: reason.into(),
    }
}

/// Turns a scalar token into its value.
pub fn coerce(token: &Token) -> Result<Value, CoercionError> {
    match token.kind {
        TokenKind::String => string_value(token).map(Value::String),
        TokenKind::Integer => token
            .lexeme
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| fail(token, "integer", "out of range for a 64-bit integer")),
        TokenKind::Float => {
            let n: f64 = token
                .lexeme
                .parse()
                .map_err(|e: std::num::ParseFloatError| fail(token, "float", e.to_string()))?;
            if n.is_infinite() {
                return Err(fail(token, "float", "out of range for a double"));
            }
            Ok(Value::Float(n))
        }
        TokenKind::Boolean => match token.lexeme.as_str() {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            _ => Err(fail(token, "boolean", "expected `true` or `false`")),
        },
        TokenKind::DateTime => token
            .lexeme
            .parse::<Datetime>()
            .map(Value::Datetime)
            .map_err(|e| fail(token, "datetime", e.0)),
        TokenKind::Key
        | TokenKind::TableHeader
        | TokenKind::ArrayTableHeader
        | TokenKind::Punct(_) => Err(fail(token, "scalar", format!("{} is not a value", token.kind))),
    }
}

/// Text of a key token. Quoted keys are decoded like strings.
pub fn key_text(token: &Token) -> Result<String, CoercionError> {
    match token.kind {
        TokenKind::String => string_value(token),
        _ => Ok(token.lexeme.clone()),
    }
}

fn string_value(token: &Token) -> Result<String, CoercionError> {
    let raw = &token.lexeme;
    if raw.len() < 2 {
        return Err(fail(token, "string", "missing quotes"));
    }
    let inner = &raw[1..raw.len() - 1];
    if raw.starts_with('\'') {
        return Ok(inner.to_string());
    }
    unescape(inner).map_err(|reason| fail(token, "string", reason))
}

/// Decodes basic-string escapes. The lexer has already rejected `\"` and
/// malformed escapes, so only code point validity is checked here.
fn unescape(s: &str) -> Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('\\') => out.push('\\'),
            Some(c @ ('u' | 'U')) => {
                let len = if c == 'u' { 4 } else { 8 };
                let hex: String = chars.by_ref().take(len).collect();
                let code = u32::from_str_radix(&hex, 16)
                    .map_err(|_| format!("bad unicode escape \\{c}{hex}"))?;
                let decoded = char::from_u32(code)
                    .ok_or_else(|| format!("\\{c}{hex} is not a unicode scalar value"))?;
                out.push(decoded);
            }
            Some(c) => return Err(format!("invalid escape \\{c}")),
            None => return Err("dangling backslash".to_string()),
        }
    }
    Ok(out)
}
