//! Command-line decoder for BeeGFS wire data.
//!
//! Reads bytes from a file or standard input, decodes the requested construct
//! and prints it to standard output. Logs go to standard error; set
//! `RUST_LOG` or pass `--verbose` to see decoding diagnostics.

use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use beegfs_wire_inspect::{Construct, InputEncoding, InspectError, inspect, parse_input};
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "beegfs-wire-inspect")]
#[command(about = "Decode a BeeGFS wire construct and print it")]
struct Cli {
    /// Construct to decode
    #[arg(value_enum)]
    construct: Construct,

    /// Input file, or `-` for standard input
    #[arg(default_value = "-")]
    input: PathBuf,

    /// How the input bytes are encoded
    #[arg(short, long, value_enum, default_value_t = InputEncoding::Binary)]
    encoding: InputEncoding,

    /// Log decoding diagnostics
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(construct = %cli.construct, "{err}");
            ExitCode::from(err.exit_code())
        },
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn run(cli: &Cli) -> Result<(), InspectError> {
    let raw = read_input(&cli.input)?;
    let bytes = parse_input(&raw, cli.encoding)?;
    debug!(len = bytes.len(), construct = %cli.construct, "read input");

    let report = inspect(cli.construct, &bytes)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{report}")?;
    Ok(())
}

fn read_input(path: &Path) -> io::Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(path)
    }
}
