// Command-line entry point for binhex.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::debug;
use thiserror::Error;

use binhex::{EncodeError, HexEncoder, Layout};

const LONG_ABOUT: &str = "Convert a binary object image into hex records for 8-bit loaders.

FORMAT selects how INFILE is laid out:
  1  origin word (lsb, msb) followed by data
  2  origin word + length word + data, repeated
  3  raw data, loaded at $0000

Records go to OUTFILE, or to standard output when OUTFILE is omitted.
Set RUST_LOG=info or RUST_LOG=debug for progress on standard error.";

#[derive(Parser, Debug)]
#[command(
    name = "binhex",
    version,
    about = "Binary image to hex record converter",
    long_about = LONG_ABOUT
)]
struct Cli {
    #[arg(
        value_name = "FORMAT",
        allow_negative_numbers = true,
        help = "Input format 1, 2, or 3 (3 = raw)"
    )]
    layout: String,
    #[arg(value_name = "INFILE")]
    input: PathBuf,
    #[arg(value_name = "OUTFILE", help = "Output file, standard output when omitted")]
    output: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("unable to open input file {}: {source}", .path.display())]
    OpenInput { path: PathBuf, source: io::Error },
    #[error("unable to open output file {}: {source}", .path.display())]
    OpenOutput { path: PathBuf, source: io::Error },
    #[error("error writing output: {0}")]
    Write(#[source] io::Error),
}

fn usage() -> String {
    let mut text = Cli::command().render_usage().to_string();
    text.push_str("\nformat 1,2, or 3.  3=raw\n");
    text
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let layout: Layout = cli.layout.parse()?;

    let input = File::open(&cli.input).map_err(|source| CliError::OpenInput {
        path: cli.input.clone(),
        source,
    })?;
    let mut sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(File::create(path).map_err(|source| CliError::OpenOutput {
            path: path.clone(),
            source,
        })?),
        None => Box::new(io::stdout().lock()),
    };

    debug!("encoding {} as {}", cli.input.display(), layout);

    // Encode fully before touching the sink so a failed run leaves no records behind
    let mut buffer = Vec::new();
    HexEncoder::new().encode(layout, BufReader::new(input), &mut buffer)?;

    sink.write_all(&buffer).map_err(CliError::Write)?;
    sink.flush().map_err(CliError::Write)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                print!("{}", usage());
                return ExitCode::FAILURE;
            }
        },
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
