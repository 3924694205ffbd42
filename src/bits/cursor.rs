/*
 *  bits/cursor.rs
 *
 *  dotgrid - packed canvases for daisy-chained LED matrices
 *  (c) 2024-26 the dotgrid authors
 *
 *  Random-access bit cursor over a BitMatrix
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

use super::matrix::BitMatrix;

/// Traverses a `BitMatrix` bit by bit in any of the four directions,
/// cheaper than calling `get` in a loop.
///
/// Sequencing differs by direction: `read_right` and `read_down` sample the
/// bit under the cursor and then advance; `read_left` and `read_up` advance
/// first and sample at the new position. Alternating right-then-left (or
/// down-then-up) from any interior position therefore keeps returning the
/// same bit, the intuitive "look right, look back" behaviour.
pub struct Cursor<'a> {
    matrix: &'a BitMatrix,
    row: usize,
    col: usize,
    index: usize,
    mask: u32,
    current: u32,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at `(row, col)`.
    ///
    /// For rightward or downward reads the position should be on the first
    /// bit to read; for leftward or upward reads, one past it. Because of
    /// the latter, `row == height` and `col == width` are permitted;
    /// anything beyond panics.
    pub fn new(matrix: &'a BitMatrix, row: usize, col: usize) -> Cursor<'a> {
        if row > matrix.height || col > matrix.width {
            panic!(
                "cursor position ({row},{col}) out of range for {}x{} matrix",
                matrix.height, matrix.width
            );
        }
        let index = (row * matrix.words_per_row) + (col / 32);
        Cursor {
            matrix,
            row,
            col,
            index,
            mask: 0x8000_0000u32 >> (col % 32),
            // one-past positions may index past the storage; the first
            // read in any legal direction reloads before sampling
            current: matrix.words.get(index).copied().unwrap_or(0),
        }
    }

    /// Current `(row, col)` position.
    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Moves one bit left and samples at the new position.
    /// `None` means the cursor is already on column zero; nothing moved.
    pub fn read_left(&mut self) -> Option<bool> {
        if self.col == 0 || self.row == self.matrix.height {
            return None;
        }
        self.col -= 1;
        self.mask <<= 1;
        if self.mask == 0 {
            self.index -= 1;
            self.current = self.matrix.words[self.index];
            self.mask = 0x0000_0001;
        }
        Some(self.current & self.mask != 0)
    }

    /// Samples at the current position, then moves one bit right.
    /// `None` means the cursor is already past the rightmost column.
    pub fn read_right(&mut self) -> Option<bool> {
        if self.col == self.matrix.width || self.row == self.matrix.height {
            return None;
        }
        let bit = self.current & self.mask != 0;
        self.col += 1;
        self.mask >>= 1;
        if self.mask == 0 {
            self.index += 1;
            self.current = self.matrix.words.get(self.index).copied().unwrap_or(0);
            self.mask = 0x8000_0000;
        }
        Some(bit)
    }

    /// Moves one bit up and samples at the new position.
    /// `None` means the cursor is already on row zero; nothing moved.
    pub fn read_up(&mut self) -> Option<bool> {
        if self.row == 0 || self.col == self.matrix.width {
            return None;
        }
        self.row -= 1;
        self.index -= self.matrix.words_per_row;
        self.current = self.matrix.words[self.index];
        Some(self.current & self.mask != 0)
    }

    /// Samples at the current position, then moves one bit down.
    /// `None` means the cursor is already past the bottom row.
    pub fn read_down(&mut self) -> Option<bool> {
        if self.row == self.matrix.height || self.col == self.matrix.width {
            return None;
        }
        let bit = self.current & self.mask != 0;
        self.row += 1;
        self.index += self.matrix.words_per_row;
        self.current = self.matrix.words.get(self.index).copied().unwrap_or(0);
        Some(bit)
    }

    /// Assembles a byte from up to 8 leftward reads, most significant bit
    /// first, stopping early at column zero. Returns the byte and the
    /// number of bits read; the last bit sampled is always in the LSB.
    pub fn read_left_byte(&mut self) -> (u8, usize) {
        Self::assemble(|| self.read_left())
    }

    /// Assembles a byte from up to 8 rightward reads. See `read_left_byte`
    /// for the packing rule.
    pub fn read_right_byte(&mut self) -> (u8, usize) {
        Self::assemble(|| self.read_right())
    }

    /// Assembles a byte from up to 8 upward reads. See `read_left_byte`
    /// for the packing rule.
    pub fn read_up_byte(&mut self) -> (u8, usize) {
        Self::assemble(|| self.read_up())
    }

    /// Assembles a byte from up to 8 downward reads. See `read_left_byte`
    /// for the packing rule.
    pub fn read_down_byte(&mut self) -> (u8, usize) {
        Self::assemble(|| self.read_down())
    }

    fn assemble(mut read: impl FnMut() -> Option<bool>) -> (u8, usize) {
        let mut byte = 0u8;
        let mut bits = 0;
        while bits < 8 {
            match read() {
                Some(bit) => {
                    byte = (byte << 1) | u8::from(bit);
                    bits += 1;
                }
                None => break,
            }
        }
        (byte, bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_then_left_rereads_same_bit() {
        let mut m = BitMatrix::new(4, 40);
        m.set(2, 17, true);
        let mut c = Cursor::new(&m, 2, 17);

        assert_eq!(c.read_right(), Some(true));
        assert_eq!(c.position(), (2, 18));
        assert_eq!(c.read_left(), Some(true));
        assert_eq!(c.position(), (2, 17));
        assert_eq!(c.read_right(), Some(true));
    }

    #[test]
    fn test_down_then_up_rereads_same_bit() {
        let mut m = BitMatrix::new(6, 40);
        m.set(3, 35, true);
        let mut c = Cursor::new(&m, 3, 35);

        assert_eq!(c.read_down(), Some(true));
        assert_eq!(c.position(), (4, 35));
        assert_eq!(c.read_up(), Some(true));
        assert_eq!(c.position(), (3, 35));
    }

    #[test]
    fn test_edges_return_none_without_moving() {
        let m = BitMatrix::new(3, 3);
        let mut c = Cursor::new(&m, 0, 0);
        assert_eq!(c.read_left(), None);
        assert_eq!(c.read_up(), None);
        assert_eq!(c.position(), (0, 0));

        let mut c = Cursor::new(&m, 2, 3);
        assert_eq!(c.read_right(), None);
        assert_eq!(c.read_down(), None);
        assert_eq!(c.position(), (2, 3));
    }

    #[test]
    fn test_one_past_construction_reads_back() {
        let mut m = BitMatrix::new(4, 32);
        m.set(3, 31, true);
        // col == width is legal as the start of a leftward read
        let mut c = Cursor::new(&m, 3, 32);
        assert_eq!(c.read_left(), Some(true));
        assert_eq!(c.position(), (3, 31));

        m.set(3, 5, true);
        // row == height is legal as the start of an upward read
        let mut c = Cursor::new(&m, 4, 5);
        assert_eq!(c.read_up(), Some(true));
        assert_eq!(c.position(), (3, 5));
    }

    #[test]
    fn test_read_right_byte_assembles_msb_first() {
        let mut m = BitMatrix::new(1, 12);
        m.set(0, 0, true);
        m.set(0, 7, true);
        let mut c = Cursor::new(&m, 0, 0);
        assert_eq!(c.read_right_byte(), (0b1000_0001, 8));
    }

    #[test]
    fn test_read_right_byte_short_at_edge() {
        let mut m = BitMatrix::new(1, 10);
        m.set(0, 9, true);
        let mut c = Cursor::new(&m, 0, 7);
        // only cols 7,8,9 available: 0 0 1
        assert_eq!(c.read_right_byte(), (0b001, 3));
        assert_eq!(c.read_right_byte(), (0, 0));
    }

    #[test]
    fn test_read_down_byte_crosses_rows() {
        let mut m = BitMatrix::new(5, 40);
        m.set(0, 36, true);
        m.set(4, 36, true);
        let mut c = Cursor::new(&m, 0, 36);
        assert_eq!(c.read_down_byte(), (0b10001, 5));
    }

    #[test]
    fn test_cursor_crosses_word_seam_rightward() {
        let mut m = BitMatrix::new(1, 40);
        m.set(0, 31, true);
        m.set(0, 32, true);
        let mut c = Cursor::new(&m, 0, 31);
        assert_eq!(c.read_right(), Some(true));
        assert_eq!(c.read_right(), Some(true));
        assert_eq!(c.read_right(), Some(false));
        // and back again
        assert_eq!(c.read_left(), Some(false));
        assert_eq!(c.read_left(), Some(true));
        assert_eq!(c.read_left(), Some(true));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_cursor_past_one_past_panics() {
        let m = BitMatrix::new(4, 4);
        Cursor::new(&m, 0, 5);
    }
}
