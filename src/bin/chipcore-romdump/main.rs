// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Prints every big-endian word in a file, one per line, without decoding it

use chipcore::Result;
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{fs::read, path::PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Show help text")]
    help: bool,
    #[options(help = "The file to dump", free, required)]
    pub file: PathBuf,
}

/// Combines pairs of bytes into big-endian words. A trailing odd byte is padded with `00`.
fn words(contents: &[u8]) -> impl Iterator<Item = u16> + '_ {
    contents
        .chunks(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair.get(1).copied().unwrap_or_default()]))
}

fn main() {
    let options = Arguments::parse_args_default_or_exit();
    if let Err(e) = dump(&options) {
        eprintln!("{}", e.bold().red());
        std::process::exit(1);
    }
}

fn dump(options: &Arguments) -> Result<()> {
    // read the whole file first, so an unreadable file prints nothing
    let contents = read(&options.file)?;
    for word in words(&contents) {
        println!("{word:04X}");
    }
    Ok(())
}
