/*
 *  bits/matrix.rs
 *
 *  dotgrid - packed canvases for daisy-chained LED matrices
 *  (c) 2024-26 the dotgrid authors
 *
 *  Word-packed 2D bit storage
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::fmt;

/// A fixed-size two-dimensional array of bits, packed into 32-bit words.
///
/// Bit `(row, col)` lives in word `row * words_per_row + col / 32`, at bit
/// position `col % 32` counted from the most significant bit. Rows are
/// padded to a whole number of words, so `words_per_row = ceil(width / 32)`.
///
/// Out-of-range coordinates are a programming error and panic. Sizing is
/// fixed at construction; content is mutated in place and cloned by value
/// for snapshotting.
#[derive(Clone, PartialEq, Eq)]
pub struct BitMatrix {
    pub(super) words: Vec<u32>,
    pub(super) height: usize,
    pub(super) width: usize,
    pub(super) words_per_row: usize,
}

impl BitMatrix {
    /// The distinguished zero-sized matrix. Requesting a matrix with a zero
    /// dimension yields this value rather than a fresh allocation; compare
    /// with `==`, not by address.
    pub const EMPTY: BitMatrix = BitMatrix {
        words: Vec::new(),
        height: 0,
        width: 0,
        words_per_row: 0,
    };

    /// Creates a matrix of the given size with every bit unset.
    pub fn new(height: usize, width: usize) -> BitMatrix {
        if height == 0 || width == 0 {
            return BitMatrix::EMPTY;
        }
        let words_per_row = width.div_ceil(32);
        BitMatrix {
            words: vec![0u32; words_per_row * height],
            height,
            width,
            words_per_row,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns `(height, width)`.
    pub fn size(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    fn selector(&self, row: usize, col: usize) -> (usize, u32) {
        if row >= self.height || col >= self.width {
            panic!(
                "coordinates ({row},{col}) out of range for {}x{} matrix",
                self.height, self.width
            );
        }
        (
            (self.words_per_row * row) + (col / 32),
            0x8000_0000u32 >> (col % 32),
        )
    }

    /// Returns the bit at `(row, col)`. Panics when out of range.
    pub fn get(&self, row: usize, col: usize) -> bool {
        let (index, mask) = self.selector(row, col);
        (self.words[index] & mask) != 0
    }

    /// Sets the bit at `(row, col)`. Panics when out of range.
    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        let (index, mask) = self.selector(row, col);
        if value {
            self.words[index] |= mask;
        } else {
            self.words[index] &= !mask;
        }
    }

    /// Unsets every bit.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// In-place bitwise AND with a matrix of identical size.
    /// Mismatched sizes panic.
    pub fn and(&mut self, other: &BitMatrix) {
        self.check_size(other, "and");
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w &= o;
        }
    }

    /// In-place bitwise OR with a matrix of identical size.
    /// Mismatched sizes panic.
    pub fn or(&mut self, other: &BitMatrix) {
        self.check_size(other, "or");
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w |= o;
        }
    }

    /// In-place bitwise XOR with a matrix of identical size.
    /// Mismatched sizes panic.
    pub fn xor(&mut self, other: &BitMatrix) {
        self.check_size(other, "xor");
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w ^= o;
        }
    }

    /// In-place bitwise complement.
    pub fn not(&mut self) {
        for w in &mut self.words {
            *w = !*w;
        }
    }

    fn check_size(&self, other: &BitMatrix, op: &str) {
        if self.height != other.height || self.width != other.width {
            panic!(
                "mismatched matrix sizes in {op}: {}x{} vs {}x{}",
                self.height, self.width, other.height, other.width
            );
        }
    }
}

impl fmt::Debug for BitMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitMatrix({}x{})", self.height, self.width)
    }
}

impl fmt::Display for BitMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                f.write_str(if self.get(row, col) { "@ " } else { ". " })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
