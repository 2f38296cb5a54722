// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Turns instruction words back into text
use super::Insn;
use owo_colors::{OwoColorize, Style};

/// Something that can render an instruction word as text
pub trait Disassembler {
    /// Renders `word`, whether or not it decodes
    fn once(&self, word: u16) -> String;
}

/// Colorizing [Disassembler]: decodable words in one [Style], everything else in another
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dis {
    /// Used for words that decode to an [Insn]
    pub normal: Style,
    /// Used for words that don't
    pub invalid: Style,
}

impl Default for Dis {
    fn default() -> Self {
        Self {
            normal: Style::new().cyan(),
            invalid: Style::new().red().bold(),
        }
    }
}

impl Disassembler for Dis {
    /// ```rust
    /// # use chipcore::*;
    /// let dis = Dis::default();
    /// assert!(dis.once(0x7a01).contains("add   va, #01"));
    /// assert!(dis.once(0x0123).contains("invalid 0123"));
    /// ```
    fn once(&self, word: u16) -> String {
        match Insn::from_word(word) {
            Some(insn) => insn.style(self.normal).to_string(),
            None => format!("invalid {word:04x}").style(self.invalid).to_string(),
        }
    }
}
