// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Byte-addressed storage for the 4K Chip-8 address space
//!
//! Multi-byte values are big-endian, and every access is bounds-checked:
//! nothing here panics or wraps on an address past the end.

use crate::error::{Error, Result};
use owo_colors::{OwoColorize, Style};
use std::{
    fmt::{Display, Formatter},
    ops::Range,
    slice::SliceIndex,
};

/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 0x1000;

/// Builds a [Mem] with each listed [Region] preloaded
/// # Examples
/// ```rust
/// # use chipcore::*;
/// let mem = chipcore::mem! {
///     Charset = b"ABCDEF",
///     Program = &[0x00, 0xe0],
/// };
/// assert_eq!(Some(&[0x00, 0xe0][..]), mem.get(0x200..0x202));
/// assert_eq!(Some(&b"ABC"[..]), mem.get(0..3));
/// ```
#[macro_export]
macro_rules! mem {
    ($($name:path = $data:expr),* $(,)?) => {
        $crate::cpu::mem::Mem::default()$(.load_region_owned($name, $data))*
    };
}

/// Checked slicing, in the shape of `<[T]>::get`.
///
/// Anything that can hand out byte slices gets big-endian [ReadWrite] for free.
pub trait Get<T> {
    /// Borrows the elements at `index`, or [None] when out of bounds
    fn get<I>(&self, index: I) -> Option<&<I as SliceIndex<[T]>>::Output>
    where
        I: SliceIndex<[T]>;

    /// Mutably borrows the elements at `index`, or [None] when out of bounds
    fn get_mut<I>(&mut self, index: I) -> Option<&mut <I as SliceIndex<[T]>>::Output>
    where
        I: SliceIndex<[T]>;
}

/// Loads and stores of a `T` at a byte address
pub trait ReadWrite<T>: Get<u8> {
    /// Loads the `T` stored at `addr`
    fn read(&self, addr: impl Into<usize>) -> Result<T>;
    /// Stores `data` at `addr`
    fn write(&mut self, addr: impl Into<usize>, data: T) -> Result<()>;
}

/// The bytes a `T` stored at `addr` occupies
#[inline(always)]
fn span<T>(addr: usize) -> Range<usize> {
    addr..addr + std::mem::size_of::<T>()
}

macro_rules! big_endian {($($t:ty),*) => {$(
    impl<M: Get<u8>> ReadWrite<$t> for M {
        #[inline(always)]
        fn read(&self, addr: impl Into<usize>) -> Result<$t> {
            let range = span::<$t>(addr.into());
            let Some(src) = self.get(range.clone()) else {
                return Err(Error::InvalidAddressRange { range });
            };
            let mut be = [0; std::mem::size_of::<$t>()];
            be.copy_from_slice(src);
            Ok(<$t>::from_be_bytes(be))
        }

        #[inline(always)]
        fn write(&mut self, addr: impl Into<usize>, data: $t) -> Result<()> {
            let range = span::<$t>(addr.into());
            let Some(dst) = self.get_mut(range.clone()) else {
                return Err(Error::InvalidAddressRange { range });
            };
            dst.copy_from_slice(&data.to_be_bytes());
            Ok(())
        }
    }
)*}}

big_endian!(u8, u16);

/// A fixed, named span of the address space
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    /// The sixteen built-in hex glyphs, five bytes each. Programs may overwrite them.
    Charset,
    /// Everything from `0x200` to the top of memory
    Program,
}

impl Region {
    /// The addresses this region covers
    /// # Examples
    /// ```rust
    /// # use chipcore::*;
    /// assert_eq!(80, Charset.range().len());
    /// assert_eq!(0x200..0x1000, Program.range());
    /// ```
    pub const fn range(self) -> Range<usize> {
        match self {
            Region::Charset => 0x000..0x050,
            Region::Program => 0x200..MEMORY_SIZE,
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Region::Charset => "Charset",
            Region::Program => "Program",
        };
        f.write_str(name)
    }
}

/// The machine's memory: [MEMORY_SIZE] bytes, zeroed on creation
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mem {
    bytes: Vec<u8>,
}

impl Default for Mem {
    fn default() -> Self {
        Self {
            bytes: vec![0; MEMORY_SIZE],
        }
    }
}

impl Get<u8> for Mem {
    /// ```rust
    /// # use chipcore::*;
    /// let mem = Mem::new();
    /// assert_eq!(Some(&[0u8; 4][..]), mem.get(0xffc..));
    /// assert_eq!(None, mem.get(0xfff..0x1001));
    /// ```
    #[inline(always)]
    fn get<I>(&self, index: I) -> Option<&<I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.bytes.get(index)
    }

    #[inline(always)]
    fn get_mut<I>(&mut self, index: I) -> Option<&mut <I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.bytes.get_mut(index)
    }
}

impl Mem {
    /// Zeroed memory
    pub fn new() -> Self {
        Self::default()
    }

    /// Always [MEMORY_SIZE]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Never true; present alongside [Mem::len]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// By-value [Mem::load_region], for chaining at construction.
    ///
    /// Oversized `data` is dropped and the region keeps its old contents.
    pub fn load_region_owned(mut self, name: Region, data: &[u8]) -> Self {
        let _ = self.load_region(name, data);
        self
    }

    /// Copies `data` to the bottom of a [Region]
    ///
    /// Fails with [Error::InvalidAddressRange], writing nothing, when `data` is
    /// longer than the region.
    /// # Examples
    /// ```rust
    /// # use chipcore::*;
    /// # fn main() -> Result<()> {
    /// let mut mem = Mem::new();
    /// mem.load_region(Program, &[0x12, 0x00])?;
    /// assert_eq!(0x1200, ReadWrite::<u16>::read(&mem, 0x200usize)?);
    /// assert!(mem.load_region(Charset, &[0; 81]).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_region(&mut self, name: Region, data: &[u8]) -> Result<&mut Self> {
        let Range { start, end } = name.range();
        if data.len() > end - start {
            return Err(Error::InvalidAddressRange {
                range: start..start + data.len(),
            });
        }
        self.load_at(start, data)
    }

    /// Copies `data` to `addr`, writing nothing if any of it would land past the end
    pub fn load_at(&mut self, addr: usize, data: &[u8]) -> Result<&mut Self> {
        let range = addr..addr + data.len();
        let Some(dst) = self.bytes.get_mut(range.clone()) else {
            return Err(Error::InvalidAddressRange { range });
        };
        dst.copy_from_slice(data);
        Ok(self)
    }

    /// Zeroes a [Region]
    /// # Examples
    /// ```rust
    /// # use chipcore::*;
    /// let mut mem = chipcore::mem! { Program = &[0xa5; 0x40] };
    /// mem.clear_region(Program);
    /// assert_eq!(Mem::new(), mem);
    /// ```
    pub fn clear_region(&mut self, name: Region) -> &mut Self {
        self.get_region_mut(name).fill(0);
        self
    }

    /// Borrows a whole [Region]
    #[inline(always)]
    pub fn get_region(&self, name: Region) -> &[u8] {
        &self.bytes[name.range()]
    }

    /// Mutably borrows a whole [Region]
    #[inline(always)]
    pub fn get_region_mut(&mut self, name: Region) -> &mut [u8] {
        &mut self.bytes[name.range()]
    }

    /// Writes `range` to stdout as hex, sixteen bytes to a line.
    ///
    /// Whatever part of `range` lies past the end of memory is left out.
    pub fn dump(&self, range: Range<usize>) {
        let label = Style::new().bold().green();
        let (start, end) = (range.start.min(self.len()), range.end.min(self.len()));
        for (row, line) in self.bytes[start..end].chunks(16).enumerate() {
            let words: Vec<String> = line
                .chunks(2)
                .map(|word| word.iter().map(|b| format!("{b:02x}")).collect())
                .collect();
            let addr = format!("{:03x}:", start + row * 16);
            println!("{} {}", addr.style(label), words.join(" "));
        }
    }
}
