// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Runs a Chip-8 program headlessly for a fixed number of cycles,
//! then prints the screen and the machine state

use chipcore::{error::Error::BreakpointHit, prelude::*};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::path::PathBuf;

/// Reads an address written in hex, without a prefix
fn parse_addr(hex: &str) -> std::result::Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(hex, 16)
}

/// Parses a single hexadecimal digit into a key index
fn parse_key(value: &str) -> std::result::Result<usize, std::num::ParseIntError> {
    usize::from_str_radix(value, 16)
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "The program to run.", required, free)]
    pub file: PathBuf,
    #[options(help = "Show these options.")]
    help: bool,
    #[options(help = "Trace each instruction before it runs.")]
    pub debug: bool,

    #[options(help = "Set the number of cycles to run.", default = "1000", meta = "N")]
    pub cycles: usize,

    #[options(
        help = "Load the ROM at this address instead of 200.",
        parse(try_from_str = "parse_addr"),
        meta = "ADR"
    )]
    pub loadaddr: Option<u16>,

    #[options(
        short = "z",
        help = "Leave vF alone in 8xy1, 8xy2 and 8xy3."
    )]
    pub vfreset: bool,

    #[options(
        short = "v",
        help = "Shift vX in place in 8xy6 and 8xyE, ignoring vY."
    )]
    pub shift: bool,

    #[options(
        help = "Hold down a key (0-F) for the whole run.",
        parse(try_from_str = "parse_key"),
        meta = "KEY"
    )]
    pub key: Vec<usize>,

    #[options(
        long = "break",
        help = "Report (and dump state) whenever pc reaches BP.",
        parse(try_from_str = "parse_addr"),
        meta = "BP"
    )]
    pub breakpoints: Vec<u16>,

    #[options(short = "m", help = "Hexdump program memory when finished.")]
    pub memory: bool,
}

fn main() {
    let options = Arguments::parse_args_default_or_exit();
    if let Err(e) = run(options) {
        eprintln!("{}", e.bold().red());
        std::process::exit(1);
    }
}

fn run(options: Arguments) -> Result<()> {
    let mut cpu = CPU::new(Flags {
        debug: options.debug,
        quirks: Quirks {
            bin_ops: options.vfreset,
            shift: options.shift,
        },
        ..Default::default()
    });
    match options.loadaddr {
        Some(addr) => cpu.load_program_at(&std::fs::read(&options.file)?, addr)?,
        None => cpu.load_program(&options.file)?,
    };
    for &key in &options.key {
        cpu.press(key)?;
    }
    for &point in &options.breakpoints {
        cpu.set_break(point);
    }

    let result = step(&mut cpu, options.cycles);

    cpu.screen().print();
    cpu.dump();
    if options.memory {
        cpu.mem().dump(Region::Program.range());
    }
    result
}

/// Runs up to `cycles` instructions, reporting (but stepping past) breakpoints
fn step(cpu: &mut CPU, cycles: usize) -> Result<()> {
    while cpu.cycle() < cycles {
        match cpu.tick() {
            Ok(_) => {}
            Err(hit @ BreakpointHit { .. }) => {
                eprintln!("{}", hit.yellow());
                cpu.dump();
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
