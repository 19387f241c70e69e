//! ida2latex - Turn color-tagged disassembly listings into LaTeX
//!
//! Reads a listing dump, picks the selected range or the function around
//! the cursor, and writes a colored LaTeX document.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use ida2latex_rs::config::ADDRESS_TAG_LEN_32;
use ida2latex_rs::export::{self, ExportRequest};
use ida2latex_rs::listing::parse_hex;
use ida2latex_rs::{AddressRange, DumpListing, NulPolicy, Options, VERSION};

/// Convert a color-tagged disassembly listing into a LaTeX document
#[derive(Parser, Debug)]
#[command(author, version = VERSION, about, long_about = None)]
struct Args {
    /// Listing dump to read (stdin when omitted)
    input: Option<PathBuf>,

    /// Where to save the .tex file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// First address of the selection (hex)
    #[arg(long, value_parser = parse_address, requires = "end")]
    start: Option<u64>,

    /// End of the selection, exclusive (hex)
    #[arg(long, value_parser = parse_address, requires = "start")]
    end: Option<u64>,

    /// Export the function containing this address (hex)
    #[arg(long, value_parser = parse_address)]
    cursor: Option<u64>,

    /// Section title
    #[arg(long)]
    title: Option<String>,

    /// Bytes in an inline address tag, markers included
    #[arg(long, default_value_t = ADDRESS_TAG_LEN_32)]
    address_tag_len: usize,

    /// Keep emitting lines after a NUL sentinel
    #[arg(long, default_value_t = false)]
    continue_after_nul: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_address(text: &str) -> Result<u64, String> {
    parse_hex(text).ok_or_else(|| format!("invalid hex address: {}", text))
}

impl Args {
    fn options(&self) -> Options {
        let mut opts = Options::default().with_address_tag_len(self.address_tag_len);
        if let Some(title) = &self.title {
            opts = opts.with_title(title);
        }
        if self.continue_after_nul {
            opts = opts.with_nul_policy(NulPolicy::TruncateLine);
        }
        opts
    }

    fn request(&self) -> ExportRequest {
        ExportRequest {
            selection: self.start.zip(self.end).map(|(s, e)| AddressRange::new(s, e)),
            cursor: self.cursor,
            destination: self.output.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        },
    ))
    .format_timestamp(None)
    .init();

    let listing = match &args.input {
        Some(path) => DumpListing::open(path),
        None => DumpListing::from_reader(io::stdin().lock()),
    }
    .context("reading listing")?;

    match export::run(&listing, &args.request(), args.options()) {
        Ok(summary) => {
            log::debug!("{} lines written", summary.lines);
            Ok(())
        }
        Err(e) if e.is_notice() => {
            log::warn!("{}", e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
