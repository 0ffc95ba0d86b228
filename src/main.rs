use clap::Parser as ClapParser;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Mutex;
use tomless::cli::{self, CliError, Input, OutputFormat, RenderOptions};
use tracing::Level;

#[derive(ClapParser)]
#[command(name = "tomless")]
#[command(about = "TOMLess - parse a TOML file and print it as JSON, XML or a Python dict")]
#[command(version)]
struct Cli {
    /// TOML file to parse (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Print JSON on a single line (ignored by the other formats)
    #[arg(long)]
    compact: bool,

    /// Log level: error, warn, info, debug or trace
    #[arg(short, long, default_value = "warn")]
    verbose: Level,

    /// Append logs to this file instead of stderr
    #[arg(short = 'l', long)]
    log_file: Option<PathBuf>,
}

fn init_logging(level: Level, log_file: Option<&PathBuf>) -> Result<(), CliError> {
    let builder = tracing_subscriber::fmt().with_max_level(level);
    match log_file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| CliError::LogFile {
                    path: path.clone(),
                    source,
                })?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    init_logging(cli.verbose, cli.log_file.as_ref())?;

    let input = match cli.input {
        Some(path) => Input::File(path),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(CliError::Stdin)?;
            Input::Text(buffer)
        }
        None => return Err(CliError::NoInput),
    };

    let options = RenderOptions {
        input,
        format: cli.format,
        compact: cli.compact,
    };

    let rendered = cli::execute_render(&options)?;
    cli::write_output(cli.output.as_deref(), &rendered)
}
