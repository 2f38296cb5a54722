// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE.txt for details)

//! This crate implements the core of a Chip-8 interpreter: the machine state,
//! and the fetch-decode-execute engine that drives it one cycle at a time.
//!
//! Loading, pacing, rendering, and input are left to the embedding application,
//! which owns a [CPU] and calls [CPU::tick] in a loop.
//!
//! ```rust
//! # use chipcore::*;
//! # fn main() -> Result<()> {
//! let mut cpu = CPU::default();
//! cpu.load_program_bytes(&[0x60, 0x05])?; // ld v0, #05
//! cpu.tick()?;
//! assert_eq!(5, cpu.v()[0]);
//! assert_eq!(0x202, cpu.pc());
//! # Ok(())
//! # }
//! ```

pub mod cpu;
pub mod error;
pub mod screen;

pub use cpu::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    mem::{Get, Mem, ReadWrite, Region::*},
    quirks::Quirks,
    CPU,
};
pub use error::{Error, Result};
pub use screen::Screen;

/// Common imports for chipcore
pub mod prelude {
    pub use super::*;
    pub use cpu::{mem::Region, STACK_DEPTH};
    pub use screen::{HEIGHT, WIDTH};
}
