//! CLI support for tomless
//!
//! Provides programmatic access to the `tomless` command so the conversion
//! can be embedded in other tools without spawning a process.

mod render;

pub use render::{execute_render, write_output, Input, RenderOptions};

use std::io;
use std::path::PathBuf;

/// Output formats understood by the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// JSON object, key order preserved
    #[default]
    Json,
    /// Nested `<toml><item>…</item></toml>` elements
    Xml,
    /// Python dict literal
    Dict,
    /// Python dict literal wrapped to 80 columns
    #[cfg_attr(feature = "cli", value(name = "ppdict"))]
    PpDict,
}

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Lexing, parsing, coercion, or reading the input file failed
    #[error(transparent)]
    Toml(#[from] crate::Error),

    /// Reading TOML from stdin failed
    #[error("cannot read stdin: {0}")]
    Stdin(#[source] io::Error),

    /// Writing the rendered document failed
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The log file could not be opened for appending
    #[error("cannot open log file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No input file given and nothing piped to stdin
    #[error("no input provided. Pass a TOML file or pipe one to stdin.")]
    NoInput,
}
