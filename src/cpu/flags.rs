// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Host-side switches that sit beside the machine state

use super::Quirks;

/// Switches that steer the emulator without being part of the Chip-8 machine
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flags {
    /// Trace every fetched word through the disassembler
    pub debug: bool,
    /// Set while the CPU is blocked on `Fx0A`, waiting for a keypress
    pub keypause: bool,
    /// Set when the framebuffer has changed since the host last cleared this flag
    pub draw: bool,
    /// Which ALU [Quirks] are in effect
    pub quirks: Quirks,
}

impl Flags {
    /// Flips tracing on or off
    ///
    /// # Examples
    /// ```rust
    /// # use chipcore::*;
    /// let mut flags = Flags::default();
    /// flags.debug();
    /// assert!(flags.debug);
    /// flags.debug();
    /// assert!(!flags.debug);
    /// ```
    pub fn debug(&mut self) {
        self.debug ^= true;
    }

    /// Reports whether the framebuffer changed, and clears the flag
    ///
    /// # Examples
    /// ```rust
    /// # use chipcore::*;
    /// let mut flags = Flags { draw: true, ..Default::default() };
    /// assert!(flags.take_draw());
    /// assert!(!flags.take_draw());
    /// ```
    pub fn take_draw(&mut self) -> bool {
        std::mem::take(&mut self.draw)
    }
}
