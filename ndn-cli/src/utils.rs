use std::fs;

use anyhow::{bail, Context};
use clap::ArgMatches;
use ndn_core::blob::hex;

/// Parse hex, ignoring whitespace so that spaced dumps can be pasted in.
pub fn parse_hex(text: &str) -> anyhow::Result<Vec<u8>> {
    let digits: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    hex::decode(&digits).with_context(|| format!("Invalid hex input: {:?}", digits))
}

/// The packet bytes named by the `input` or `file` argument.
pub fn read_packet(matches: &ArgMatches) -> anyhow::Result<Vec<u8>> {
    if let Some(path) = matches.get_one::<String>("file") {
        return fs::read(path).with_context(|| format!("Cannot read {}", path));
    }
    match matches.get_one::<String>("input") {
        Some(text) => parse_hex(text),
        None => bail!("No packet given"),
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.1} {}", size, UNITS[unit_index])
}
