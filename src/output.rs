//! Text renderings of a parsed document.
//!
//! Three formats are supported, all of which keep table keys in source order
//! and array elements in sequence order:
//!
//! - **JSON** via [`to_json()`] and [`to_json_pretty()`], built on `serde_json`
//! - **XML** via [`XmlPrinter`] / [`to_xml()`]
//! - **dict** via [`to_dict()`], a Python literal (`{'a': 1, 'b': [True]}`),
//!   and [`to_dict_pretty()`] for the same literal wrapped to 80 columns
//!
//! # Examples
//!
//! ```
//! use tomless::{parse_text, to_json, to_xml};
//!
//! let root = parse_text("a = 1\nb = [true, 'x']").unwrap();
//! assert_eq!(to_json(&root), r#"{"a":1,"b":[true,"x"]}"#);
//! assert_eq!(
//!     to_xml(&root),
//!     "<toml><item><a>1</a><b><item>true</item><item>x</item></b></item></toml>"
//! );
//! ```

use crate::convert::table_to_json;
use crate::value::{Table, Value};

/// Compact JSON.
pub fn to_json(table: &Table) -> String {
    table_to_json(table).to_string()
}

/// JSON with 2-space indentation.
pub fn to_json_pretty(table: &Table) -> String {
    format!("{:#}", table_to_json(table))
}

/// Renders a document as nested XML elements.
///
/// The document becomes `<root_tag><item_tag>…</item_tag></root_tag>`. Table
/// entries are elements named after their key, array elements are
/// `item_tag` elements, and scalars are escaped text. A key that is not a
/// valid XML name is written as `<item_tag key="…">`.
pub struct XmlPrinter {
    root_tag: String,
    item_tag: String,
}

impl Default for XmlPrinter {
    fn default() -> Self {
        XmlPrinter::new("toml", "item")
    }
}

impl XmlPrinter {
    pub fn new(root_tag: impl Into<String>, item_tag: impl Into<String>) -> Self {
        XmlPrinter {
            root_tag: root_tag.into(),
            item_tag: item_tag.into(),
        }
    }

    pub fn print(&self, table: &Table) -> String {
        let mut out = String::new();
        out.push_str(&format!("<{}>", self.root_tag));
        self.print_table(&mut out, &self.item_tag, None, table);
        out.push_str(&format!("</{}>", self.root_tag));
        out
    }

    fn print_value(&self, out: &mut String, key: Option<&str>, value: &Value) {
        let (tag, attr) = self.tag_for(key);
        match value {
            Value::Table(table) => self.print_table(out, &tag, attr, table),
            Value::Array(items) => {
                if items.is_empty() {
                    self.open(out, &tag, attr, true);
                    return;
                }
                self.open(out, &tag, attr, false);
                for item in items {
                    self.print_value(out, None, item);
                }
                out.push_str(&format!("</{}>", tag));
            }
            scalar => {
                let text = scalar_text(scalar);
                if text.is_empty() {
                    self.open(out, &tag, attr, true);
                    return;
                }
                self.open(out, &tag, attr, false);
                out.push_str(&escape_xml(&text));
                out.push_str(&format!("</{}>", tag));
            }
        }
    }

    fn print_table(&self, out: &mut String, tag: &str, attr: Option<&str>, table: &Table) {
        if table.is_empty() {
            self.open(out, tag, attr, true);
            return;
        }
        self.open(out, tag, attr, false);
        for (k, v) in table {
            self.print_value(out, Some(k), v);
        }
        out.push_str(&format!("</{}>", tag));
    }

    fn tag_for<'k>(&self, key: Option<&'k str>) -> (String, Option<&'k str>) {
        match key {
            Some(k) if is_xml_name(k) => (k.to_string(), None),
            Some(k) => (self.item_tag.clone(), Some(k)),
            None => (self.item_tag.clone(), None),
        }
    }

    fn open(&self, out: &mut String, tag: &str, key_attr: Option<&str>, empty: bool) {
        out.push('<');
        out.push_str(tag);
        if let Some(key) = key_attr {
            out.push_str(&format!(" key=\"{}\"", escape_xml(key).replace('"', "&quot;")));
        }
        out.push_str(if empty { " />" } else { ">" });
    }
}

/// Renders with the default `<toml>` / `<item>` tags.
pub fn to_xml(table: &Table) -> String {
    XmlPrinter::default().print(table)
}

fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    !name.to_ascii_lowercase().starts_with("xml")
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if c.is_control() => out.push_str(&format!("&#x{:X};", c as u32)),
            c => out.push(c),
        }
    }
    out
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(n) => n.to_string(),
        Value::Float(n) => format_float(*n),
        Value::Boolean(b) => b.to_string(),
        Value::Datetime(dt) => dt.to_string(),
        Value::Array(_) | Value::Table(_) => String::new(),
    }
}

/// Shortest round-trip form, always with a decimal point or exponent.
fn format_float(n: f64) -> String {
    let s = n.to_string();
    if n.is_finite() && !s.contains(['.', 'e', 'E']) {
        format!("{s}.0")
    } else {
        s
    }
}

/// Renders a document as a Python dict literal.
///
/// Strings use single quotes unless they contain one and no double quote,
/// booleans are `True`/`False`, datetimes are quoted RFC 3339 strings.
pub fn to_dict(table: &Table) -> String {
    let mut out = String::new();
    dict_table(&mut out, table);
    out
}

fn dict_table(out: &mut String, table: &Table) {
    out.push('{');
    for (i, (k, v)) in table.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&py_str(k));
        out.push_str(": ");
        dict_value(out, v);
    }
    out.push('}');
}

fn dict_value(out: &mut String, value: &Value) {
    match value {
        Value::String(s) => out.push_str(&py_str(s)),
        Value::Integer(n) => out.push_str(&n.to_string()),
        Value::Float(n) => out.push_str(&format_float(*n)),
        Value::Boolean(true) => out.push_str("True"),
        Value::Boolean(false) => out.push_str("False"),
        Value::Datetime(dt) => out.push_str(&py_str(&dt.to_string())),
        Value::Array(items) => dict_array(out, items),
        Value::Table(table) => dict_table(out, table),
    }
}

fn dict_array(out: &mut String, items: &[Value]) {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        dict_value(out, item);
    }
    out.push(']');
}

const DICT_WIDTH: usize = 80;

/// Renders a document as a Python dict literal wrapped to 80 columns.
///
/// A container that does not fit on the rest of its line is written one
/// entry per line, nested entries aligned one column past the opening
/// bracket (the layout of Python's `pprint`, without key sorting).
pub fn to_dict_pretty(table: &Table) -> String {
    let mut out = String::new();
    pretty_table(&mut out, table, 0, 0);
    out
}

/// `allowance` is the width reserved after the value for closing brackets
/// or a trailing comma.
fn fits(flat: &str, indent: usize, allowance: usize) -> bool {
    flat.chars().count() + indent + allowance <= DICT_WIDTH
}

fn pretty_value(out: &mut String, value: &Value, indent: usize, allowance: usize) {
    match value {
        Value::Table(table) => pretty_table(out, table, indent, allowance),
        Value::Array(items) => pretty_array(out, items, indent, allowance),
        scalar => dict_value(out, scalar),
    }
}

fn pretty_table(out: &mut String, table: &Table, indent: usize, allowance: usize) {
    let mut flat = String::new();
    dict_table(&mut flat, table);
    if table.is_empty() || fits(&flat, indent, allowance) {
        out.push_str(&flat);
        return;
    }

    let indent = indent + 1;
    let last = table.len() - 1;
    out.push('{');
    for (i, (k, v)) in table.iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
            out.push_str(&" ".repeat(indent));
        }
        let key = py_str(k);
        out.push_str(&key);
        out.push_str(": ");
        let rest = if i == last { allowance + 1 } else { 1 };
        pretty_value(out, v, indent + key.chars().count() + 2, rest);
    }
    out.push('}');
}

fn pretty_array(out: &mut String, items: &[Value], indent: usize, allowance: usize) {
    let mut flat = String::new();
    dict_array(&mut flat, items);
    if items.is_empty() || fits(&flat, indent, allowance) {
        out.push_str(&flat);
        return;
    }

    let indent = indent + 1;
    let last = items.len() - 1;
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
            out.push_str(&" ".repeat(indent));
        }
        let rest = if i == last { allowance + 1 } else { 1 };
        pretty_value(out, item, indent, rest);
    }
    out.push(']');
}

fn py_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
