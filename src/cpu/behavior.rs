// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Instruction semantics for [CPU]
//!
//! Each handler leaves `pc` where the next fetch should happen: plain handlers
//! call [CPU::advance], conditional ones call [CPU::skip_if], and jumps assign it.
//! Fallible handlers validate everything up front, so an `Err` means no state changed.

use crate::screen::{HEIGHT, WIDTH};
use rand::random;
use super::mem::Get;
use super::*;

impl CPU {
    /// Dispatches a decoded [Insn] to its handler
    #[rustfmt::skip]
    #[inline(always)]
    pub(super) fn execute(&mut self, instruction: Insn) -> Result<()> {
        match instruction {
            Insn::cls               => self.clear_screen(),
            Insn::ret               => self.ret()?,
            Insn::jmp   {       n } => self.jump(n),
            Insn::call  {       n } => self.call(n)?,
            Insn::seb   {    x, k } => self.skip_equals_immediate(x, k),
            Insn::sneb  {    x, k } => self.skip_not_equals_immediate(x, k),
            Insn::se    { y, x    } => self.skip_equals(x, y),
            Insn::movb  {    x, k } => self.load_immediate(x, k),
            Insn::addb  {    x, k } => self.add_immediate(x, k),
            Insn::mov   { y, x    } => self.load(x, y),
            Insn::or    { y, x    } => self.or(x, y),
            Insn::and   { y, x    } => self.and(x, y),
            Insn::xor   { y, x    } => self.xor(x, y),
            Insn::add   { y, x    } => self.add(x, y),
            Insn::sub   { y, x    } => self.sub(x, y),
            Insn::shr   { y, x    } => self.shift_right(x, y),
            Insn::bsub  { y, x    } => self.backwards_sub(x, y),
            Insn::shl   { y, x    } => self.shift_left(x, y),
            Insn::sne   { y, x    } => self.skip_not_equals(x, y),
            Insn::movI  {       n } => self.load_i_immediate(n),
            Insn::jmpr  {       n } => self.jump_indexed(n),
            Insn::rand  {    x, k } => self.rand(x, k),
            Insn::draw  { y, x, n } => self.draw(x, y, n)?,
            Insn::sek   {    x    } => self.skip_key_equals(x),
            Insn::snek  {    x    } => self.skip_key_not_equals(x),
            Insn::getdt {    x    } => self.load_delay_timer(x),
            Insn::waitk {    x    } => self.wait_for_key(x),
            Insn::setdt {    x    } => self.store_delay_timer(x),
            Insn::setst {    x    } => self.store_sound_timer(x),
            Insn::addI  {    x    } => self.add_i(x),
            Insn::font  {    x    } => self.load_sprite(x),
            Insn::bcd   {    x    } => self.bcd_convert(x)?,
            Insn::dmao  {    x    } => self.store_dma(x)?,
            Insn::dmai  {    x    } => self.load_dma(x)?,
        }
        Ok(())
    }

    /// Steps over the current instruction word
    #[inline(always)]
    pub(super) fn advance(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    /// Steps over the current word, and over the following one too when `condition` holds
    #[inline(always)]
    pub(super) fn skip_if(&mut self, condition: bool) {
        self.pc = self.pc.wrapping_add(if condition { 4 } else { 2 });
    }

    /// Borrows `len` bytes of memory starting at I, or reports the whole span as out of range
    fn at_i(&self, len: usize) -> Result<&[u8]> {
        let range = self.i as usize..self.i as usize + len;
        self.mem
            .get(range.clone())
            .ok_or(Error::InvalidAddressRange { range })
    }

    /// Mutable counterpart of [CPU::at_i]
    fn at_i_mut(&mut self, len: usize) -> Result<&mut [u8]> {
        let range = self.i as usize..self.i as usize + len;
        self.mem
            .get_mut(range.clone())
            .ok_or(Error::InvalidAddressRange { range })
    }
}

// Control flow: 00E0, 00EE, 1nnn, 2nnn, Bnnn and the register skips
impl CPU {
    /// `00E0`
    pub(super) fn clear_screen(&mut self) {
        self.screen.clear();
        self.flags.draw = true;
        self.advance();
    }

    /// `00EE`: resumes at the word after the `call` that was pushed
    pub(super) fn ret(&mut self) -> Result<()> {
        let from = self.pc;
        self.pc = self
            .stack
            .pop()
            .ok_or(Error::StackUnderflow { addr: from })?;
        self.advance();
        Ok(())
    }

    /// `1nnn`
    pub(super) fn jump(&mut self, n: Adr) {
        self.pc = n;
    }

    /// `2nnn`: the stack records where the call itself sits, not where to come back to.
    /// A full stack is reported as [Error::StackOverflow].
    pub(super) fn call(&mut self, n: Adr) -> Result<()> {
        let depth = self.stack.len();
        if depth >= STACK_DEPTH {
            return Err(Error::StackOverflow {
                addr: self.pc,
                target: n,
                depth,
            });
        }
        self.stack.push(self.pc);
        self.jump(n);
        Ok(())
    }

    /// `Bnnn`: no bounds check here; a target past memory fails at the next fetch
    pub(super) fn jump_indexed(&mut self, n: Adr) {
        self.jump(n.wrapping_add(self.v[0].into()));
    }

    /// `3xkk`
    pub(super) fn skip_equals_immediate(&mut self, x: Reg, k: u8) {
        self.skip_if(self.v[x] == k);
    }

    /// `4xkk`
    pub(super) fn skip_not_equals_immediate(&mut self, x: Reg, k: u8) {
        self.skip_if(self.v[x] != k);
    }

    /// `5xy0`
    pub(super) fn skip_equals(&mut self, x: Reg, y: Reg) {
        self.skip_if(self.v[x] == self.v[y]);
    }

    /// `9xy0`
    pub(super) fn skip_not_equals(&mut self, x: Reg, y: Reg) {
        self.skip_if(self.v[x] != self.v[y]);
    }
}

// Register arithmetic: 6xkk, 7xkk, 8xyN, Cxkk
//
// Whenever an instruction produces a flag, vF is assigned after vX, so `8Fy4`
// and friends end up holding the flag rather than the arithmetic result.
impl CPU {
    /// `6xkk`
    pub(super) fn load_immediate(&mut self, x: Reg, k: u8) {
        self.v[x] = k;
        self.advance();
    }

    /// `7xkk`: wraps, and leaves vF alone
    pub(super) fn add_immediate(&mut self, x: Reg, k: u8) {
        self.v[x] = self.v[x].wrapping_add(k);
        self.advance();
    }

    /// `8xy0`
    pub(super) fn load(&mut self, x: Reg, y: Reg) {
        self.v[x] = self.v[y];
        self.advance();
    }

    /// `8xy1`
    pub(super) fn or(&mut self, x: Reg, y: Reg) {
        self.logic(x, y, |a, b| a | b);
    }

    /// `8xy2`
    pub(super) fn and(&mut self, x: Reg, y: Reg) {
        self.logic(x, y, |a, b| a & b);
    }

    /// `8xy3`
    pub(super) fn xor(&mut self, x: Reg, y: Reg) {
        self.logic(x, y, |a, b| a ^ b);
    }

    /// Shared body of the bitwise group.
    ///
    /// On the COSMAC VIP these clobber vF with 0; [Quirks::bin_ops] keeps it intact.
    fn logic(&mut self, x: Reg, y: Reg, op: impl FnOnce(u8, u8) -> u8) {
        self.v[x] = op(self.v[x], self.v[y]);
        if !self.flags.quirks.bin_ops {
            self.v[0xf] = 0;
        }
        self.advance();
    }

    /// `8xy4`: vF = 1 on carry
    pub(super) fn add(&mut self, x: Reg, y: Reg) {
        let (sum, carried) = self.v[x].overflowing_add(self.v[y]);
        self.set_with_flag(x, sum, carried);
    }

    /// `8xy5`: vF = 1 when vX >= vY
    pub(super) fn sub(&mut self, x: Reg, y: Reg) {
        let (diff, borrowed) = self.v[x].overflowing_sub(self.v[y]);
        self.set_with_flag(x, diff, !borrowed);
    }

    /// `8xy7`: vF = 1 when vY >= vX
    pub(super) fn backwards_sub(&mut self, x: Reg, y: Reg) {
        let (diff, borrowed) = self.v[y].overflowing_sub(self.v[x]);
        self.set_with_flag(x, diff, !borrowed);
    }

    /// `8xy6`: vF gets the bit that fell off the bottom
    pub(super) fn shift_right(&mut self, x: Reg, y: Reg) {
        let value = self.v[self.shift_source(x, y)];
        self.set_with_flag(x, value >> 1, value & 1 != 0);
    }

    /// `8xyE`: vF gets the bit that fell off the top
    pub(super) fn shift_left(&mut self, x: Reg, y: Reg) {
        let value = self.v[self.shift_source(x, y)];
        self.set_with_flag(x, value << 1, value & 0x80 != 0);
    }

    /// The VIP shifts vY into vX. With [Quirks::shift] set, vX is shifted in place.
    fn shift_source(&self, x: Reg, y: Reg) -> Reg {
        if self.flags.quirks.shift {
            x
        } else {
            y
        }
    }

    /// Stores a result in vX, then the flag in vF
    fn set_with_flag(&mut self, x: Reg, value: u8, flag: bool) {
        self.v[x] = value;
        self.v[0xf] = flag.into();
        self.advance();
    }

    /// `Cxkk`
    pub(super) fn rand(&mut self, x: Reg, k: u8) {
        self.v[x] = random::<u8>() & k;
        self.advance();
    }
}

// The index register and memory: Annn, Fx1E, Fx29, Fx33, Fx55, Fx65
impl CPU {
    /// `Annn`
    pub(super) fn load_i_immediate(&mut self, n: Adr) {
        self.i = n;
        self.advance();
    }

    /// `Fx1E`: I may run past 0xFFF. Nothing complains until I is used to touch memory.
    pub(super) fn add_i(&mut self, x: Reg) {
        self.i = self.i.wrapping_add(self.v[x].into());
        self.advance();
    }

    /// `Fx29`: glyphs are 5 bytes apart, starting at [FONT_START]
    pub(super) fn load_sprite(&mut self, x: Reg) {
        let digit = Adr::from(self.v[x] & 0xf);
        self.i = FONT_START + 5 * digit;
        self.advance();
    }

    /// `Fx33`: hundreds, tens, ones
    pub(super) fn bcd_convert(&mut self, x: Reg) -> Result<()> {
        let value = self.v[x];
        let digits = [value / 100, value / 10 % 10, value % 10];
        self.at_i_mut(3)?.copy_from_slice(&digits);
        self.advance();
        Ok(())
    }

    /// `Fx55`: afterwards I points just past the last byte written
    pub(super) fn store_dma(&mut self, x: Reg) -> Result<()> {
        let count = x + 1;
        let registers = self.v;
        self.at_i_mut(count)?.copy_from_slice(&registers[..count]);
        self.i = self.i.wrapping_add(count as Adr);
        self.advance();
        Ok(())
    }

    /// `Fx65`: afterwards I points just past the last byte read
    pub(super) fn load_dma(&mut self, x: Reg) -> Result<()> {
        let count = x + 1;
        let mut registers = self.v;
        registers[..count].copy_from_slice(self.at_i(count)?);
        self.v = registers;
        self.i = self.i.wrapping_add(count as Adr);
        self.advance();
        Ok(())
    }
}

// The screen: Dxyn
impl CPU {
    /// `Dxyn`
    ///
    /// Rows come from memory at I, one byte per row, leftmost pixel in the high bit.
    /// The origin is taken modulo the screen size and every pixel wraps independently.
    /// vF ends up 1 if any lit pixel was switched off, otherwise 0.
    pub(super) fn draw(&mut self, x: Reg, y: Reg, n: Nib) -> Result<()> {
        let left = self.v[x] as usize % WIDTH;
        let top = self.v[y] as usize % HEIGHT;
        let rows: Vec<u8> = self.at_i(n as usize)?.to_vec();
        let mut erased = false;
        for (dy, row) in rows.into_iter().enumerate() {
            for dx in 0..8 {
                if (row << dx) & 0x80 != 0 {
                    erased |= self.screen.flip(left + dx, top + dy);
                }
            }
        }
        self.v[0xf] = erased.into();
        self.flags.draw = true;
        self.advance();
        Ok(())
    }
}

// Keys and timers: Ex9E, ExA1, Fx07, Fx0A, Fx15, Fx18
//
// Key instructions look only at the low nibble of vX.
impl CPU {
    /// `Ex9E`
    pub(super) fn skip_key_equals(&mut self, x: Reg) {
        self.skip_if(self.key_in(x));
    }

    /// `ExA1`
    pub(super) fn skip_key_not_equals(&mut self, x: Reg) {
        self.skip_if(!self.key_in(x));
    }

    fn key_in(&self, x: Reg) -> bool {
        self.keys[usize::from(self.v[x] & 0xf)]
    }

    /// `Fx0A`: with nothing held, pc is left on this instruction so it runs again.
    /// With several keys held, the lowest-numbered one is taken.
    pub(super) fn wait_for_key(&mut self, x: Reg) {
        match self.keys.iter().position(|&down| down) {
            Some(key) => {
                self.v[x] = key as u8;
                self.flags.keypause = false;
                self.advance();
            }
            None => self.flags.keypause = true,
        }
    }

    /// `Fx07`
    pub(super) fn load_delay_timer(&mut self, x: Reg) {
        self.v[x] = self.delay;
        self.advance();
    }

    /// `Fx15`
    pub(super) fn store_delay_timer(&mut self, x: Reg) {
        self.delay = self.v[x];
        self.advance();
    }

    /// `Fx18`
    pub(super) fn store_sound_timer(&mut self, x: Reg) {
        self.sound = self.v[x];
        self.advance();
    }
}
