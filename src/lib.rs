pub mod cli;
pub mod coerce;
pub mod convert;
pub mod datetime;
pub mod error;
pub mod lexer;
pub mod loader;
pub mod output;
pub mod parser;
pub mod token;
pub mod value;

pub use datetime::{Datetime, Offset};
pub use error::{CoercionError, Error, LexError, LexErrorKind, ParseError, ParseErrorKind};
pub use lexer::{tokenize, Lexer};
pub use loader::{parse_file, parse_text};
pub use output::{to_dict, to_dict_pretty, to_json, to_json_pretty, to_xml, XmlPrinter};
pub use parser::Parser;
pub use token::{Position, Punct, Token, TokenKind};
pub use value::{Table, Value};
