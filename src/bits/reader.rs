/*
 *  bits/reader.rs
 *
 *  dotgrid - packed canvases for daisy-chained LED matrices
 *  (c) 2024-26 the dotgrid authors
 *
 *  Directional byte readers over a BitMatrix
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

/// Direction of travel for a `BitReader`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A byte-oriented reader travelling in one direction across a `BitMatrix`.
///
/// Bits are assembled most-significant-first in the order they are sampled.
/// When fewer than 8 bits remain, the final byte carries them in its
/// low-order positions: the last bit sampled is always the least
/// significant bit, and the unused high bits are zero. Once the budget is
/// exhausted the iterator yields `None`; it never emits an extra short
/// byte past the end.
///
/// Horizontal readers keep a pre-shifted `ready` word and slide the window
/// across word boundaries, so a byte costs O(1) amortized. Vertical readers
/// select a single bit per word per step; vertical neighbours sit
/// `words_per_row` words apart, so there is no cross-byte batching to be
/// had in that direction.
pub struct BitReader<'a> {
    words: &'a [u32],
    index: usize,
    offset: usize,
    available: usize,
    direction: Direction,
    words_per_row: usize,
    ready: u32, // pre-shifted window, horizontal directions only
    bit: u32,   // column mask, vertical directions only
}

impl BitMatrix {
    /// Returns a reader starting at `(row, col)`, travelling in
    /// `direction`, limited to `count` bits (and to the matrix edge,
    /// whichever comes first). Panics when the start is out of range.
    pub fn reader(&self, row: usize, col: usize, direction: Direction, count: usize) -> BitReader<'_> {
        if row >= self.height || col >= self.width {
            panic!(
                "reader start ({row},{col}) out of range for {}x{} matrix",
                self.height, self.width
            );
        }

        let index = (row * self.words_per_row) + (col / 32);
        let offset = col % 32;

        let mut reader = BitReader {
            words: &self.words,
            index,
            offset,
            available: 0,
            direction,
            words_per_row: self.words_per_row,
            ready: 0,
            bit: 0,
        };

        match direction {
            Direction::Right => {
                reader.available = self.width - col;
                reader.ready = self.words[index] << offset;
            }
            Direction::Left => {
                reader.available = col + 1;
                reader.ready = self.words[index] >> (31 - offset);
            }
            Direction::Up => {
                reader.available = row + 1;
                reader.bit = 0x8000_0000u32 >> offset;
            }
            Direction::Down => {
                reader.available = self.height - row;
                reader.bit = 0x8000_0000u32 >> offset;
            }
        }

        reader.available = reader.available.min(count);
        reader
    }
}

impl BitReader<'_> {
    /// Bits still to be delivered.
    pub fn remaining(&self) -> usize {
        self.available
    }

    fn read_vertical(&mut self, up: bool) -> u8 {
        let n = self.available.min(8);
        let mut result = 0u8;
        for _ in 0..n {
            result <<= 1;
            if self.words[self.index] & self.bit != 0 {
                result |= 1;
            }
            self.available -= 1;
            if self.available > 0 {
                if up {
                    self.index -= self.words_per_row;
                } else {
                    self.index += self.words_per_row;
                }
            }
        }
        result
    }

    fn read_left(&mut self) -> u8 {
        let n = self.available.min(8);
        let mut result = 0u8;
        for _ in 0..n {
            result = (result << 1) | (self.ready & 1) as u8;
            self.available -= 1;
            if self.available == 0 {
                break;
            }
            if self.offset == 0 {
                self.offset = 31;
                self.index -= 1;
                self.ready = self.words[self.index];
            } else {
                self.offset -= 1;
                self.ready >>= 1;
            }
        }
        result
    }

    fn read_right(&mut self) -> u8 {
        if self.available >= 8 {
            let result = (self.ready >> 24) as u8;
            self.ready <<= 8;
            self.offset += 8;
            self.available -= 8;

            if self.available == 0 {
                return result;
            }
            if self.offset == 32 {
                self.offset = 0;
                self.index += 1;
                self.ready = self.words[self.index];
                return result;
            }
            if self.offset > 32 {
                self.offset -= 32;
                self.index += 1;
                let next = self.words[self.index];
                self.ready = next << self.offset;
                return result | (next >> (32 - self.offset)) as u8;
            }
            return result;
        }

        // tail byte, last sampled bit lands in the LSB
        let n = self.available;
        let in_window = 32 - self.offset;
        let value = if n <= in_window {
            (self.ready >> (32 - n)) as u8
        } else {
            let spill = n - in_window;
            let high = self.ready >> (32 - in_window);
            let low = self.words[self.index + 1] >> (32 - spill);
            ((high << spill) | low) as u8
        };
        self.available = 0;
        value
    }
}

impl Iterator for BitReader<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.available == 0 {
            return None;
        }
        Some(match self.direction {
            Direction::Up => self.read_vertical(true),
            Direction::Down => self.read_vertical(false),
            Direction::Left => self.read_left(),
            Direction::Right => self.read_right(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_full_byte() {
        let mut m = BitMatrix::new(8, 8);
        m.set(0, 0, true);
        let mut r = m.reader(0, 0, Direction::Right, 8);
        assert_eq!(r.next(), Some(0x80));
        assert_eq!(r.next(), None);
    }

    #[test]
    fn test_right_single_bit_pads_to_lsb() {
        let mut m = BitMatrix::new(8, 8);
        m.set(0, 7, true);
        let mut r = m.reader(0, 7, Direction::Right, 1);
        assert_eq!(r.next(), Some(0x01));
        assert_eq!(r.next(), None);
    }

    #[test]
    fn test_right_crosses_word_boundary() {
        let mut m = BitMatrix::new(1, 64);
        // pattern 1010... starting at col 28, crossing the word seam at 32
        for col in (28..44).step_by(2) {
            m.set(0, col, true);
        }
        let bytes: Vec<u8> = m.reader(0, 28, Direction::Right, 16).collect();
        assert_eq!(bytes, vec![0xAA, 0xAA]);
    }

    #[test]
    fn test_right_tail_crossing_word_boundary() {
        let mut m = BitMatrix::new(1, 40);
        m.set(0, 30, true);
        m.set(0, 33, true);
        // 5 bits from col 30: 1 0 0 1 0 -> 0b10010
        let bytes: Vec<u8> = m.reader(0, 30, Direction::Right, 5).collect();
        assert_eq!(bytes, vec![0b10010]);
    }

    #[test]
    fn test_right_count_limits_stream() {
        let m = BitMatrix::new(2, 48);
        let mut r = m.reader(1, 0, Direction::Right, 20);
        assert_eq!(r.next(), Some(0));
        assert_eq!(r.next(), Some(0));
        assert_eq!(r.next(), Some(0)); // 4-bit tail
        assert_eq!(r.next(), None);
    }

    #[test]
    fn test_left_reads_reverse_order() {
        let mut m = BitMatrix::new(1, 40);
        m.set(0, 35, true);
        m.set(0, 29, true); // crosses back over the word seam
        // reading left from col 35: cols 35,34,...,28
        let bytes: Vec<u8> = m.reader(0, 35, Direction::Left, 8).collect();
        assert_eq!(bytes, vec![0b1000_0010]);
    }

    #[test]
    fn test_left_short_tail() {
        let mut m = BitMatrix::new(1, 8);
        m.set(0, 0, true);
        // 3 bits leftward from col 2: cols 2,1,0 -> 0 0 1
        let bytes: Vec<u8> = m.reader(0, 2, Direction::Left, 8).collect();
        assert_eq!(bytes, vec![0b001]);
    }

    #[test]
    fn test_down_reads_column() {
        let mut m = BitMatrix::new(12, 40);
        m.set(0, 33, true);
        m.set(3, 33, true);
        m.set(11, 33, true);
        let bytes: Vec<u8> = m.reader(0, 33, Direction::Down, 12).collect();
        assert_eq!(bytes, vec![0b1001_0000, 0b0001]);
    }

    #[test]
    fn test_up_reads_column_in_reverse() {
        let mut m = BitMatrix::new(10, 8);
        m.set(9, 4, true);
        m.set(6, 4, true);
        let bytes: Vec<u8> = m.reader(9, 4, Direction::Up, 4).collect();
        // rows 9,8,7,6 -> 1 0 0 1
        assert_eq!(bytes, vec![0b1001]);
    }

    #[test]
    fn test_exhaustion_yields_none_not_short_byte() {
        let m = BitMatrix::new(1, 16);
        let mut r = m.reader(0, 0, Direction::Right, 16);
        assert_eq!(r.next(), Some(0));
        assert_eq!(r.next(), Some(0));
        assert_eq!(r.next(), None);
        assert_eq!(r.next(), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_reader_start_out_of_range_panics() {
        let m = BitMatrix::new(4, 4);
        m.reader(0, 4, Direction::Right, 1);
    }
}
