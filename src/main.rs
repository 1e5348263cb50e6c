mod base32;
mod dump;
mod error;
mod report;
mod strkey;

#[cfg(test)]
mod fixtures;

use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, debug, warn};

use crate::dump::DEFAULT_BLOCK_SIZE;
use crate::report::{Outcome, ReportOptions, write_alphabet_table, write_json_report, write_report};

/// Decode a base32 strkey and dump every stage in hex and binary.
#[derive(Parser, Debug)]
#[command(name = "strkey-inspect", version, about)]
struct Args {
    /// Strkey to decode, e.g. GA7QYNF7SOWQ3GLR2BGMZEHXAVIRZA4KVWLTJJFC7MGXUA74P7UJVSGZ
    strkey: String,

    /// Bytes per dump line
    #[arg(short, long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: NonZeroUsize,

    /// Print the alphabet's bit patterns before the report
    #[arg(long, conflicts_with = "json")]
    alphabet: bool,

    /// Recompute the CRC16 checksum and report whether it matches
    #[arg(long)]
    verify_checksum: bool,

    /// Emit the diagnostics as a single JSON object
    #[arg(long)]
    json: bool,

    /// Log decode steps to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(default)
        .parse_default_env()
        .init();
}

fn run<W: Write>(args: &Args, out: &mut W) -> anyhow::Result<ExitCode> {
    let options = ReportOptions {
        block_size: args.block_size,
        verify_checksum: args.verify_checksum,
    };

    if args.alphabet {
        write_alphabet_table(out)?;
    }

    let outcome = if args.json {
        write_json_report(out, &args.strkey, &options)?
    } else {
        write_report(out, &args.strkey, &options)?
    };
    out.flush()?;

    match outcome {
        Outcome::Decoded => Ok(ExitCode::SUCCESS),
        Outcome::Failed(e) => {
            warn!("{}: {e}", args.strkey);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);
    debug!("{args:?}");

    let stdout = io::stdout();
    run(&args, &mut stdout.lock())
}
