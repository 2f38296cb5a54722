// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Chip-8 machine and its fetch, decode, execute cycle

#[cfg(test)]
mod tests;

pub mod behavior;
pub mod flags;
pub mod instruction;
pub mod mem;
pub mod quirks;

use self::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    mem::{Mem, ReadWrite, Region::*},
    quirks::Quirks,
};
use crate::{
    error::{Error, Result},
    screen::Screen,
};
use owo_colors::OwoColorize;
use std::fmt::{Debug, Write};

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// How many return addresses the stack holds before `call` is refused
pub const STACK_DEPTH: usize = 16;
/// Load address for programs, and the initial program counter
pub const PROGRAM_START: Adr = 0x200;
/// Address of the glyph for `0`; glyph `n` starts at `FONT_START + 5 * n`
pub const FONT_START: Adr = 0x000;

/// Sixteen 4x5 hexadecimal digits, one byte per row, high nibble only
#[rustfmt::skip]
pub const FONT: [u8; 80] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // a
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // b
    0xf0, 0x80, 0x80, 0x80, 0xf0, // c
    0xe0, 0x90, 0x90, 0x90, 0xe0, // d
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // e
    0xf0, 0x80, 0xf0, 0x80, 0x80, // f
];

/// A whole Chip-8 machine: memory, registers, timers, keypad and framebuffer.
///
/// Nothing runs on its own. The host calls [CPU::tick] at whatever rate it likes,
/// feeds key state in through [CPU::press] and [CPU::release], and reads the
/// [Screen] back out when [Flags::draw] says it changed.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CPU {
    /// Host-side switches: [Quirks], live disassembly, and the keypause/draw signals
    pub flags: Flags,
    mem: Mem,
    screen: Screen,
    stack: Vec<Adr>,
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    keys: [bool; 16],
    cycle: usize,
    breakpoints: Vec<Adr>,
    #[cfg_attr(feature = "serde", serde(skip))]
    disassembler: Dis,
}

// construction and loading
impl CPU {
    /// A powered-on machine using `flags`
    /// ```rust
    /// # use chipcore::*;
    /// let cpu = CPU::new(Flags { debug: true, ..Default::default() });
    /// assert!(cpu.flags.debug);
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn new(flags: Flags) -> Self {
        CPU {
            flags,
            ..Default::default()
        }
    }

    /// Reads a ROM file and loads it with [CPU::load_program_bytes].
    ///
    /// An unreadable file surfaces as [Error::IoError].
    pub fn load_program(&mut self, rom: impl AsRef<std::path::Path>) -> Result<&mut Self> {
        let bytes = std::fs::read(rom)?;
        self.load_program_bytes(&bytes)
    }

    /// Replaces the program: zeroes 0x200..0x1000, then copies `rom` in at 0x200.
    ///
    /// A `rom` longer than 0xE00 bytes is refused before anything is cleared.
    /// ```rust
    /// # use chipcore::*;
    /// # fn main() -> Result<()> {
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0xa2, 0x2a])?;
    /// assert_eq!(Some(&[0xa2, 0x2a, 0x00][..]), cpu.mem().get(0x200..0x203));
    /// assert!(cpu.load_program_bytes(&vec![0; 0x1000]).is_err());
    /// assert_eq!(Some(&0xa2), cpu.mem().get(0x200));
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_program_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        let space = Program.range();
        if rom.len() > space.len() {
            let range = space.start..space.start + rom.len();
            return Err(Error::InvalidAddressRange { range });
        }
        self.mem.clear_region(Program).load_region(Program, rom)?;
        Ok(self)
    }

    /// Copies `rom` to `addr` as-is. Nothing else in memory is touched.
    pub fn load_program_at(&mut self, rom: &[u8], addr: Adr) -> Result<&mut Self> {
        self.mem.load_at(addr.into(), rom)?;
        Ok(self)
    }

    /// Puts the machine back in its power-on state, keeping what the host configured.
    ///
    /// Cleared: registers, timers, stack, framebuffer, keypad, cycle count, and the
    /// keypause and draw flags. The font is rewritten. Untouched: program memory,
    /// [Quirks], debug mode and breakpoints.
    /// ```rust
    /// # use chipcore::*;
    /// # fn main() -> Result<()> {
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x6b, 0x0b])?.tick()?;
    /// cpu.reset();
    /// assert_eq!((0x200, 0, 0), (cpu.pc(), cpu.v()[0xb], cpu.cycle()));
    /// cpu.tick()?;
    /// assert_eq!(0x0b, cpu.v()[0xb]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn reset(&mut self) {
        self.flags.keypause = false;
        self.flags.draw = false;
        self.mem.get_region_mut(Charset).copy_from_slice(&FONT);
        self.screen.clear();
        self.stack.clear();
        self.pc = PROGRAM_START;
        self.i = 0;
        self.v = [0; 16];
        (self.delay, self.sound) = (0, 0);
        self.keys = [false; 16];
        self.cycle = 0;
    }
}

// keypad and registers
impl CPU {
    /// Marks `key` as held. The result says whether it was up before.
    ///
    /// Keys run from 0 to F; anything else is [Error::InvalidKey].
    /// ```rust
    /// # use chipcore::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(true, cpu.press(0xa).unwrap());
    /// assert_eq!(false, cpu.press(0xa).unwrap());
    /// assert!(cpu.press(0x10).is_err());
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        Ok(!std::mem::replace(self.key_mut(key)?, true))
    }

    /// Marks `key` as released. The result says whether it was held before.
    /// ```rust
    /// # use chipcore::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(false, cpu.release(0x3).unwrap());
    /// cpu.press(0x3).unwrap();
    /// assert_eq!(true, cpu.release(0x3).unwrap());
    /// ```
    pub fn release(&mut self, key: usize) -> Result<bool> {
        Ok(std::mem::replace(self.key_mut(key)?, false))
    }

    fn key_mut(&mut self, key: usize) -> Result<&mut bool> {
        self.keys.get_mut(key).ok_or(Error::InvalidKey { key })
    }

    /// Writes `value` into register `reg`, or fails with [Error::InvalidRegister] past vF
    /// ```rust
    /// # use chipcore::*;
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0xe, 0x99).unwrap();
    /// assert_eq!(0x99, cpu.v()[0xe]);
    /// assert!(cpu.set_v(16, 0).is_err());
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        match self.v.get_mut(reg) {
            Some(slot) => *slot = value,
            None => return Err(Error::InvalidRegister { reg }),
        }
        Ok(())
    }

    /// v0 through vF
    pub fn v(&self) -> &[u8] {
        &self.v
    }

    /// Address of the next instruction to fetch
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// The index register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Sound timer. A tone should play while this is nonzero.
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Delay timer
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Pending return addresses, innermost last
    pub fn stack(&self) -> &[Adr] {
        &self.stack
    }

    /// The framebuffer
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Which keys are currently held
    pub fn keys(&self) -> &[bool; 16] {
        &self.keys
    }

    /// All 4K of memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// All 4K of memory, for hosts that patch it between cycles
    pub fn mem_mut(&mut self) -> &mut Mem {
        &mut self.mem
    }

    /// Instructions retired since power-on or the last [CPU::reset]
    pub fn cycle(&self) -> usize {
        self.cycle
    }
}

// execution
impl CPU {
    /// Adds `point` to the breakpoint set
    pub fn set_break(&mut self, point: Adr) -> &mut Self {
        if !self.breakpoints.contains(&point) {
            self.breakpoints.push(point);
        }
        self
    }

    /// Removes `point` from the breakpoint set, if present
    pub fn unset_break(&mut self, point: Adr) -> &mut Self {
        self.breakpoints.retain(|&other| other != point);
        self
    }

    /// Every address that stops [CPU::tick], in the order they were set
    pub fn breakpoints(&self) -> &[Adr] {
        &self.breakpoints
    }

    /// Calls [CPU::tick] up to `steps` times, returning the first error
    /// ```rust
    /// # use chipcore::*;
    /// # fn main() -> Result<()> {
    /// let mut cpu = CPU::default();
    /// // 200: add v1, #03; 202: jp 200
    /// cpu.load_program_bytes(&[0x71, 0x03, 0x12, 0x00])?;
    /// cpu.multistep(10)?;
    /// assert_eq!(15, cpu.v()[1]);
    /// assert_eq!(10, cpu.cycle());
    /// # Ok(())
    /// # }
    /// ```
    pub fn multistep(&mut self, steps: usize) -> Result<&mut Self> {
        for _ in 0..steps {
            self.tick()?;
        }
        Ok(self)
    }

    /// Runs one cycle: fetch the word at pc, decode it, execute it, then count
    /// both timers down by one.
    ///
    /// If the word doesn't decode ([Error::UnimplementedInstruction]), pc points outside
    /// memory, or the instruction would overflow the stack, underflow it, or reach
    /// outside memory through I, the cycle is abandoned and the machine is left
    /// exactly as it was, timers included.
    ///
    /// Landing on a breakpoint yields [Error::BreakpointHit] *after* the cycle has
    /// completed; calling `tick` again carries on from there.
    /// ```rust
    /// # use chipcore::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0xa3, 0x21, 0x01, 0x23]).unwrap();
    /// cpu.tick().unwrap();
    /// assert_eq!((0x202, 0x321), (cpu.pc(), cpu.i()));
    /// // 0123 is not an instruction
    /// assert!(cpu.tick().is_err());
    /// assert_eq!((0x202, 1), (cpu.pc(), cpu.cycle()));
    /// ```
    pub fn tick(&mut self) -> Result<&mut Self> {
        let word: u16 = self.mem.read(self.pc)?;
        if self.flags.debug {
            self.trace(word);
        }
        let insn = Insn::from_word(word).ok_or(Error::UnimplementedInstruction { word })?;
        self.execute(insn)?;
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
        self.cycle += 1;

        if self.breakpoints.contains(&self.pc) {
            let next = self.mem.read(self.pc).unwrap_or_default();
            return Err(Error::BreakpointHit {
                addr: self.pc,
                next,
            });
        }
        Ok(self)
    }

    /// Prints the cycle count, pc and disassembly of `word`
    fn trace(&self, word: u16) {
        let cycle = format!("{:>6}", self.cycle);
        println!(
            "{} {:03x}  {}",
            cycle.bright_black(),
            self.pc,
            self.disassembler.once(word)
        );
    }

    /// Prints every register, the timers, the stack and the cycle count
    /// ```text
    /// pc 0200  i 0000  sp 0  cycle 0
    /// v0 00  v1 00  v2 00  v3 00  v4 00  v5 00  v6 00  v7 00
    /// v8 00  v9 00  va 00  vb 00  vc 00  vd 00  ve 00  vf 00
    /// dt 00  st 00  stack []
    /// ```
    pub fn dump(&self) {
        let mut out = format!(
            "pc {:04x}  i {:04x}  sp {}  cycle {}\n",
            self.pc,
            self.i,
            self.stack.len(),
            self.cycle
        );
        for (half, regs) in self.v.chunks(8).enumerate() {
            let line: Vec<String> = regs
                .iter()
                .enumerate()
                .map(|(n, value)| format!("v{:x} {value:02x}", half * 8 + n))
                .collect();
            let _ = writeln!(out, "{}", line.join("  "));
        }
        let _ = write!(
            out,
            "dt {:02x}  st {:02x}  stack {:03x?}",
            self.delay, self.sound, self.stack
        );
        println!("{out}");
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("stack", &self.stack)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("keys", &self.keys)
            .field("cycle", &self.cycle)
            .field("flags", &self.flags)
            .field("breakpoints", &self.breakpoints)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Power-on state: font at 0x000, everything else zeroed, pc at 0x200
    fn default() -> Self {
        CPU {
            flags: Flags::default(),
            mem: crate::mem! { Charset = &FONT },
            screen: Screen::new(),
            stack: Vec::with_capacity(STACK_DEPTH),
            pc: PROGRAM_START,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            keys: [false; 16],
            cycle: 0,
            breakpoints: Vec::new(),
            disassembler: Dis::default(),
        }
    }
}
