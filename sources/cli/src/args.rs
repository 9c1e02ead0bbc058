use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser};

#[derive(Parser)]
#[command(author, version, about = "Inspect a JVM AOT / CDS cache file", long_about = None)]
pub struct Cli {
    /// The cache file to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[arg(long, value_parser = parse_u32_hex)]
    /// Expected magic, as the little endian value of the first four bytes (hex)
    pub magic: Option<u32>,

    #[arg(long)]
    /// Print the region table and the span each region occupies in the file
    pub regions: bool,

    #[arg(long, requires = "pattern")]
    /// Scan the read-write region for symbol records
    pub symbols: bool,

    #[arg(long, value_parser = parse_u64_hex)]
    /// The 64-bit word that starts a symbol-carrying record (hex)
    pub pattern: Option<u64>,

    #[arg(short, long, action = ArgAction::Count)]
    /// Log more to stderr, repeat for more detail
    pub verbose: u8,
}

fn strip_hex(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

fn parse_u32_hex(value: &str) -> Result<u32> {
    u32::from_str_radix(strip_hex(value), 16).map_err(|e| anyhow!("invalid hex '{}': {}", value, e))
}

fn parse_u64_hex(value: &str) -> Result<u64> {
    u64::from_str_radix(strip_hex(value), 16).map_err(|e| anyhow!("invalid hex '{}': {}", value, e))
}
