//! Parse a TOML document and render it in the requested format

use std::fs;
use std::path::{Path, PathBuf};

use super::{CliError, OutputFormat};
use crate::output::{to_dict, to_dict_pretty, to_json, to_json_pretty, to_xml};
use crate::{parse_file, parse_text};

/// Where the TOML source comes from
#[derive(Debug, Clone)]
pub enum Input {
    File(PathBuf),
    Text(String),
}

/// Options for the render command
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub input: Input,
    pub format: OutputFormat,
    /// Single-line JSON instead of indented
    pub compact: bool,
}

/// Parse the input and render it, returning the text to emit.
pub fn execute_render(options: &RenderOptions) -> Result<String, CliError> {
    let root = match &options.input {
        Input::File(path) => parse_file(path)?,
        Input::Text(source) => parse_text(source)?,
    };

    let rendered = match options.format {
        OutputFormat::Json if options.compact => to_json(&root),
        OutputFormat::Json => to_json_pretty(&root),
        OutputFormat::Xml => to_xml(&root),
        OutputFormat::Dict => to_dict(&root),
        OutputFormat::PpDict => to_dict_pretty(&root),
    };
    tracing::debug!(format = ?options.format, bytes = rendered.len(), "rendered");
    Ok(rendered)
}

/// Print `content` to stdout, or save it to `path` when one is given.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<(), CliError> {
    match path {
        None => {
            println!("{}", content);
            Ok(())
        }
        Some(path) => {
            let mut data = content.to_string();
            data.push('\n');
            fs::write(path, data).map_err(|source| CliError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::info!(path = %path.display(), "written");
            Ok(())
        }
    }
}
