// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's monochrome framebuffer

use std::fmt::{Display, Formatter, Result};

/// Width of the framebuffer, in pixels
pub const WIDTH: usize = 64;
/// Height of the framebuffer, in pixels
pub const HEIGHT: usize = 32;

/// A 64x32 framebuffer, stored one byte per pixel.
///
/// Only the low bit of each byte is significant. Both axes wrap,
/// so any `(x, y)` pair addresses some pixel.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Screen {
    pixels: Vec<u8>,
}

impl Default for Screen {
    fn default() -> Self {
        Screen {
            pixels: vec![0; WIDTH * HEIGHT],
        }
    }
}

impl Screen {
    /// Constructs a new, blank screen
    pub fn new() -> Self {
        Screen::default()
    }

    #[inline(always)]
    fn index(x: usize, y: usize) -> usize {
        (y % HEIGHT) * WIDTH + x % WIDTH
    }

    /// Gets the raw pixels, in row-major order
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Turns every pixel off
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Sets every pixel to `on`
    pub fn fill(&mut self, on: bool) {
        self.pixels.fill(on.into());
    }

    /// Gets the state of the pixel at (x, y), wrapping on both axes
    /// # Examples
    /// ```rust
    /// # use chipcore::*;
    /// let mut screen = Screen::new();
    /// screen.set(3, 4, true);
    /// assert!(screen.get(3, 4));
    /// assert!(screen.get(64 + 3, 32 + 4));
    /// ```
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[Self::index(x, y)] & 1 != 0
    }

    /// Sets the state of the pixel at (x, y), wrapping on both axes
    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        self.pixels[Self::index(x, y)] = on.into();
    }

    /// Flips the pixel at (x, y), and reports whether it was turned off
    /// # Examples
    /// ```rust
    /// # use chipcore::*;
    /// let mut screen = Screen::new();
    /// assert!(!screen.flip(0, 0)); // turned on
    /// assert!(screen.flip(0, 0)); // turned back off: collision
    /// assert!(!screen.get(0, 0));
    /// ```
    #[inline(always)]
    pub fn flip(&mut self, x: usize, y: usize) -> bool {
        let pixel = &mut self.pixels[Self::index(x, y)];
        let was_on = *pixel & 1 != 0;
        *pixel = (!was_on).into();
        was_on
    }

    /// Counts the pixels which are on
    pub fn lit(&self) -> usize {
        self.pixels.iter().filter(|&&pixel| pixel & 1 != 0).count()
    }

    /// Prints the screen to stdout, with braille characters if the `drawille` feature is on
    pub fn print(&self) {
        #[cfg(feature = "drawille")]
        {
            use drawille::Canvas;
            let mut canvas = Canvas::new(WIDTH as u32, HEIGHT as u32);
            (0..HEIGHT)
                .flat_map(|y| (0..WIDTH).map(move |x| (x, y)))
                .filter(|&(x, y)| self.get(x, y))
                .for_each(|(x, y)| canvas.set(x as u32, y as u32));
            println!("{}", canvas.frame());
        }
        #[cfg(not(feature = "drawille"))]
        print!("{self}");
    }
}

impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for (row, line) in self.pixels.chunks(WIDTH).enumerate() {
            write!(f, "{row:02}|")?;
            for &pixel in line {
                write!(f, "{}", if pixel & 1 != 0 { '█' } else { ' ' })?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}
