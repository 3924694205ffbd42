/*
 *  bits/writer.rs
 *
 *  dotgrid - packed canvases for daisy-chained LED matrices
 *  (c) 2024-26 the dotgrid authors
 *
 *  Byte-oriented writer into a BitMatrix row
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

/// Writes bytes into a matrix row, left to right, merging each byte with a
/// masked read-modify-write so bits outside the addressed span survive.
///
/// When fewer than 8 destination slots remain, the incoming byte is
/// truncated by clearing its low-order bits; the high-order bits are the
/// ones kept.
pub struct BitWriter<'a> {
    words: &'a mut [u32],
    index: usize,
    offset: usize,
    available: usize,
}

impl BitMatrix {
    /// Returns a writer starting at `(row, col)`, limited to `count` bits
    /// (and to the end of the row, whichever comes first). Panics when the
    /// start is out of range.
    pub fn writer(&mut self, row: usize, col: usize, count: usize) -> BitWriter<'_> {
        if row >= self.height || col >= self.width {
            panic!(
                "writer start ({row},{col}) out of range for {}x{} matrix",
                self.height, self.width
            );
        }
        let available = count.min(self.width - col);
        BitWriter {
            index: (row * self.words_per_row) + (col / 32),
            offset: col % 32,
            available,
            words: &mut self.words,
        }
    }
}

impl BitWriter<'_> {
    /// Bits still writable.
    pub fn remaining(&self) -> usize {
        self.available
    }

    /// Merges one byte at the current position and advances by 8 bits.
    /// Returns false, writing nothing, once the capacity is exhausted.
    pub fn write_byte(&mut self, byte: u8) -> bool {
        if self.available == 0 {
            return false;
        }

        let mut byte = byte;
        if self.available < 8 {
            let trunc = 8 - self.available;
            byte = (byte >> trunc) << trunc;
        }
        let n = self.available.min(8);

        let source = (byte as u32) << 24;
        let first = n.min(32 - self.offset);
        let mask = high_bits(first) >> self.offset;
        self.words[self.index] =
            (self.words[self.index] & !mask) | ((source >> self.offset) & mask);

        if n > first {
            let spill = n - first;
            let mask = high_bits(spill);
            let word = &mut self.words[self.index + 1];
            *word = (*word & !mask) | ((source << first) & mask);
        }

        self.available -= n;
        self.offset += 8;
        if self.offset >= 32 {
            self.offset -= 32;
            self.index += 1;
        }
        true
    }
}

/// A word with the top `count` bits set; `count` must be 1..=32.
fn high_bits(count: usize) -> u32 {
    0xFFFF_FFFFu32 << (32 - count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::Direction;

    #[test]
    fn test_write_aligned() {
        let mut m = BitMatrix::new(2, 32);
        let mut w = m.writer(1, 0, 32);
        assert!(w.write_byte(0xA5));
        assert!(w.write_byte(0xFF));
        assert!(m.get(1, 0));
        assert!(!m.get(1, 1));
        assert!(m.get(1, 2));
        assert!(m.get(1, 8));
        assert!(m.get(1, 15));
        assert!(!m.get(1, 16));
        // row above untouched
        assert!(!m.get(0, 0));
    }

    #[test]
    fn test_write_unaligned_preserves_neighbours() {
        let mut m = BitMatrix::new(1, 24);
        m.set(0, 0, true);
        m.set(0, 2, true);
        m.set(0, 11, true);

        let mut w = m.writer(0, 3, 8);
        assert!(w.write_byte(0xFF));

        assert!(m.get(0, 0));
        assert!(!m.get(0, 1));
        assert!(m.get(0, 2));
        for col in 3..11 {
            assert!(m.get(0, col), "col {col}");
        }
        assert!(m.get(0, 11));
        assert!(!m.get(0, 12));
    }

    #[test]
    fn test_write_spills_across_word_boundary() {
        let mut m = BitMatrix::new(1, 64);
        let mut w = m.writer(0, 28, 64);
        assert!(w.write_byte(0xFF));

        for col in 28..36 {
            assert!(m.get(0, col), "col {col}");
        }
        assert!(!m.get(0, 27));
        assert!(!m.get(0, 36));
    }

    #[test]
    fn test_write_truncates_final_byte() {
        let mut m = BitMatrix::new(1, 16);
        // only 5 slots from col 11: low 3 bits of the byte must be dropped
        let mut w = m.writer(0, 11, 16);
        assert!(w.write_byte(0xFF));
        assert!(!w.write_byte(0xFF));

        for col in 11..16 {
            assert!(m.get(0, col), "col {col}");
        }
        assert!(!m.get(0, 10));
    }

    #[test]
    fn test_write_count_limits_span() {
        let mut m = BitMatrix::new(1, 32);
        let mut w = m.writer(0, 4, 6);
        assert!(w.write_byte(0xFF));
        assert!(!w.write_byte(0xFF));

        for col in 4..10 {
            assert!(m.get(0, col), "col {col}");
        }
        assert!(!m.get(0, 10));
        assert!(!m.get(0, 3));
    }

    #[test]
    fn test_reader_writer_roundtrip_unaligned() {
        let mut src = BitMatrix::new(1, 48);
        for col in [1, 7, 12, 30, 33, 40] {
            src.set(0, col, true);
        }
        let mut dst = BitMatrix::new(1, 48);

        let bytes: Vec<u8> = src.reader(0, 1, Direction::Right, 40).collect();
        let mut w = dst.writer(0, 1, 40);
        for b in bytes {
            w.write_byte(b);
        }

        for col in 1..41 {
            assert_eq!(dst.get(0, col), src.get(0, col), "col {col}");
        }
        assert!(!dst.get(0, 0));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_writer_start_out_of_range_panics() {
        let mut m = BitMatrix::new(4, 4);
        m.writer(4, 0, 1);
    }
}
