// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Everything that can stop a cycle, a program load, or a host request

use std::ops::Range;
use thiserror::Error;

/// Shorthand for a [std::result::Result] that fails with [enum@Error]
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by the machine.
///
/// Every variant except [Error::BreakpointHit] is reported *instead of* executing
/// the offending instruction: the machine state is left as it was before the cycle.
#[derive(Debug, Error)]
pub enum Error {
    /// Execution reached a breakpoint. The instruction there has already run.
    #[error("stopped at breakpoint {addr:03x}, next word {next:04x}")]
    BreakpointHit {
        /// Where the breakpoint sits
        addr: u16,
        /// The word that would be fetched next
        next: u16,
    },
    /// The fetched word doesn't decode to any instruction
    #[error("{word:04x} is not a chip-8 instruction")]
    UnimplementedInstruction {
        /// The word as fetched
        word: u16,
    },
    /// A call was made with every stack slot already in use
    #[error("stack overflow: call to {target:03x} from {addr:03x} exceeds {depth} levels")]
    StackOverflow {
        /// The address of the call instruction
        addr: u16,
        /// The address the call was trying to reach
        target: u16,
        /// The stack depth at the time of the call
        depth: usize,
    },
    /// A return was made with nothing on the stack
    #[error("stack underflow: return at {addr:03x} with an empty stack")]
    StackUnderflow {
        /// The address of the return instruction
        addr: u16,
    },
    /// Some byte of `range` lies past the end of the 4K address space
    #[error("range {range:04x?} is outside of memory")]
    InvalidAddressRange {
        /// The bytes that were asked for
        range: Range<usize>,
    },
    /// Keys are numbered `0` through `F`
    #[error("no key {key:X} on a hex keypad")]
    InvalidKey {
        /// The key that was asked for
        key: usize,
    },
    /// Registers are numbered `v0` through `vF`
    #[error("no register v{reg:X}")]
    InvalidRegister {
        /// The register that was asked for
        reg: usize,
    },
    /// Reading a program from disk failed
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
