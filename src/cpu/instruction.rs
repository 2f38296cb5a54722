// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
#![allow(clippy::bad_bit_mask)]
//! Decoding of 16-bit instruction words into [Insn]
//!
//! The decoder is closed over the 34 base Chip-8 encodings. Anything else,
//! including the SUPER-CHIP and XO-CHIP extensions, fails to decode.

pub mod disassembler;

use imperative_rs::InstructionSet;
use std::fmt::Display;

/// One decoded Chip-8 instruction.
///
/// Fields are named after the nibbles they occupy: `x` and `y` pick registers,
/// `k` is an immediate byte (`kk`), and `n` is either a 12-bit address (`nnn`) or a row count.
#[allow(non_camel_case_types, missing_docs)]
#[derive(Clone, Copy, Debug, InstructionSet, PartialEq, Eq, Hash)]
pub enum Insn {
    /// `00E0`: blank the framebuffer
    #[opcode = "0x00e0"]
    cls,
    /// `00EE`: pop a return address
    #[opcode = "0x00ee"]
    ret,
    /// `1nnn`: continue at `n`
    #[opcode = "0x1nnn"]
    jmp { n: u16 },
    /// `2nnn`: remember this address, continue at `n`
    #[opcode = "0x2nnn"]
    call { n: u16 },
    /// `3xkk`: skip when `vX` equals `k`
    #[opcode = "0x3xkk"]
    seb { k: u8, x: usize },
    /// `4xkk`: skip when `vX` differs from `k`
    #[opcode = "0x4xkk"]
    sneb { k: u8, x: usize },
    /// `5xy0`: skip when `vX` equals `vY`
    #[opcode = "0x5xy0"]
    se { y: usize, x: usize },
    /// `6xkk`: `vX` becomes `k`
    #[opcode = "0x6xkk"]
    movb { k: u8, x: usize },
    /// `7xkk`: `k` is added into `vX`, carry discarded
    #[opcode = "0x7xkk"]
    addb { k: u8, x: usize },
    /// `8xy0`: copy `vY` into `vX`
    #[opcode = "0x8xy0"]
    mov { y: usize, x: usize },
    /// `8xy1`
    #[opcode = "0x8xy1"]
    or { y: usize, x: usize },
    /// `8xy2`
    #[opcode = "0x8xy2"]
    and { y: usize, x: usize },
    /// `8xy3`
    #[opcode = "0x8xy3"]
    xor { y: usize, x: usize },
    /// `8xy4`: sum into `vX`, carry into `vF`
    #[opcode = "0x8xy4"]
    add { y: usize, x: usize },
    /// `8xy5`: `vX - vY` into `vX`, no-borrow into `vF`
    #[opcode = "0x8xy5"]
    sub { y: usize, x: usize },
    /// `8xy6`: halve, low bit into `vF`
    #[opcode = "0x8xy6"]
    shr { y: usize, x: usize },
    /// `8xy7`: `vY - vX` into `vX`, no-borrow into `vF`
    #[opcode = "0x8xy7"]
    bsub { y: usize, x: usize },
    /// `8xyE`: double, high bit into `vF`
    #[opcode = "0x8xye"]
    shl { y: usize, x: usize },
    /// `9xy0`: skip when `vX` differs from `vY`
    #[opcode = "0x9xy0"]
    sne { y: usize, x: usize },
    /// `Annn`: point `I` at `n`
    #[opcode = "0xannn"]
    movI { n: u16 },
    /// `Bnnn`: continue at `n + v0`
    #[opcode = "0xbnnn"]
    jmpr { n: u16 },
    /// `Cxkk`: random byte, masked by `k`
    #[opcode = "0xcxkk"]
    rand { k: u8, x: usize },
    /// `Dxyn`: XOR an `n`-row sprite from `I` onto the screen
    #[opcode = "0xdxyn"]
    draw { y: usize, x: usize, n: u8 },
    /// `Ex9E`: skip when key `vX` is down
    #[opcode = "0xex9e"]
    sek { x: usize },
    /// `ExA1`: skip when key `vX` is up
    #[opcode = "0xexa1"]
    snek { x: usize },
    /// `Fx07`: read the delay timer
    #[opcode = "0xfx07"]
    getdt { x: usize },
    /// `Fx0A`: block until a key is down
    #[opcode = "0xfx0a"]
    waitk { x: usize },
    /// `Fx15`: write the delay timer
    #[opcode = "0xfx15"]
    setdt { x: usize },
    /// `Fx18`: write the sound timer
    #[opcode = "0xfx18"]
    setst { x: usize },
    /// `Fx1E`: offset `I` by `vX`
    #[opcode = "0xfx1e"]
    addI { x: usize },
    /// `Fx29`: point `I` at the glyph for the low nibble of `vX`
    #[opcode = "0xfx29"]
    font { x: usize },
    /// `Fx33`: decimal digits of `vX` at `I`, `I+1`, `I+2`
    #[opcode = "0xfx33"]
    bcd { x: usize },
    /// `Fx55`: spill `v0..=vX` to memory at `I`
    #[opcode = "0xfx55"]
    dmao { x: usize },
    /// `Fx65`: fill `v0..=vX` from memory at `I`
    #[opcode = "0xfx65"]
    dmai { x: usize },
}

impl Insn {
    /// Decodes one big-endian instruction word.
    ///
    /// Words outside the instruction set come back as [None].
    /// ```rust
    /// # use chipcore::*;
    /// assert_eq!(Some(Insn::ret), Insn::from_word(0x00ee));
    /// assert_eq!(Some(Insn::draw { y: 2, x: 1, n: 5 }), Insn::from_word(0xd125));
    /// assert_eq!(None, Insn::from_word(0x5121));
    /// ```
    pub fn from_word(word: u16) -> Option<Insn> {
        match Insn::decode(&word.to_be_bytes()) {
            Ok((2, insn)) => Some(insn),
            _ => None,
        }
    }
}

/// Renders in a destination-first assembly syntax, e.g. `ld    v3, #2a`
impl Display for Insn {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (op, args) = match *self {
            Insn::cls              => ("cls",  String::new()),
            Insn::ret              => ("ret",  String::new()),
            Insn::jmp   { n }      => ("jp",   format!("{n:03x}")),
            Insn::call  { n }      => ("call", format!("{n:03x}")),
            Insn::seb   { k, x }   => ("se",   format!("v{x:x}, #{k:02x}")),
            Insn::sneb  { k, x }   => ("sne",  format!("v{x:x}, #{k:02x}")),
            Insn::se    { y, x }   => ("se",   format!("v{x:x}, v{y:x}")),
            Insn::movb  { k, x }   => ("ld",   format!("v{x:x}, #{k:02x}")),
            Insn::addb  { k, x }   => ("add",  format!("v{x:x}, #{k:02x}")),
            Insn::mov   { y, x }   => ("ld",   format!("v{x:x}, v{y:x}")),
            Insn::or    { y, x }   => ("or",   format!("v{x:x}, v{y:x}")),
            Insn::and   { y, x }   => ("and",  format!("v{x:x}, v{y:x}")),
            Insn::xor   { y, x }   => ("xor",  format!("v{x:x}, v{y:x}")),
            Insn::add   { y, x }   => ("add",  format!("v{x:x}, v{y:x}")),
            Insn::sub   { y, x }   => ("sub",  format!("v{x:x}, v{y:x}")),
            Insn::shr   { y, x }   => ("shr",  format!("v{x:x}, v{y:x}")),
            Insn::bsub  { y, x }   => ("subn", format!("v{x:x}, v{y:x}")),
            Insn::shl   { y, x }   => ("shl",  format!("v{x:x}, v{y:x}")),
            Insn::sne   { y, x }   => ("sne",  format!("v{x:x}, v{y:x}")),
            Insn::movI  { n }      => ("ld",   format!("i, {n:03x}")),
            Insn::jmpr  { n }      => ("jp",   format!("v0, {n:03x}")),
            Insn::rand  { k, x }   => ("rnd",  format!("v{x:x}, #{k:02x}")),
            Insn::draw  { y, x, n } => ("drw", format!("v{x:x}, v{y:x}, {n:x}")),
            Insn::sek   { x }      => ("skp",  format!("v{x:x}")),
            Insn::snek  { x }      => ("sknp", format!("v{x:x}")),
            Insn::getdt { x }      => ("ld",   format!("v{x:x}, dt")),
            Insn::waitk { x }      => ("ld",   format!("v{x:x}, key")),
            Insn::setdt { x }      => ("ld",   format!("dt, v{x:x}")),
            Insn::setst { x }      => ("ld",   format!("st, v{x:x}")),
            Insn::addI  { x }      => ("add",  format!("i, v{x:x}")),
            Insn::font  { x }      => ("ld",   format!("glyph, v{x:x}")),
            Insn::bcd   { x }      => ("ld",   format!("bcd, v{x:x}")),
            Insn::dmao  { x }      => ("ld",   format!("[i], v0-v{x:x}")),
            Insn::dmai  { x }      => ("ld",   format!("v0-v{x:x}, [i]")),
        };
        write!(f, "{op:<5} {args}")
    }
}
