/*
 *  bits/stream.rs
 *
 *  dotgrid - packed canvases for daisy-chained LED matrices
 *  (c) 2024-26 the dotgrid authors
 *
 *  Word-at-a-time row streams and the clipped rectangular copy
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

/// Read side of a row segment, delivering up to 32 bits per call,
/// MSB-aligned in the returned word.
struct ReadStream<'a> {
    words: &'a [u32],
    index: usize,
    offset: usize,
    available: usize,
}

impl<'a> ReadStream<'a> {
    fn new(matrix: &'a BitMatrix, row: usize, col: usize, count: usize) -> ReadStream<'a> {
        check_segment(matrix, row, col, count);
        ReadStream {
            words: &matrix.words,
            index: (matrix.words_per_row * row) + (col / 32),
            offset: col % 32,
            available: count,
        }
    }

    /// Number of bits the next transfer may move: never more than one word,
    /// never past the remaining budget, never across a word boundary.
    fn usable(&self, count: usize) -> usize {
        count.min(32).min(self.available).min(32 - self.offset)
    }

    fn seek(&mut self, count: usize) {
        self.available -= count;
        self.offset += count;
        if self.offset == 32 {
            self.offset = 0;
            self.index += 1;
        }
    }

    /// Reads up to `count` bits into the top of the returned word. Bits
    /// below the returned length are unspecified; writers mask them off.
    fn read(&mut self, count: usize) -> (u32, usize) {
        let count = self.usable(count);
        match count {
            0 => (0, 0),
            32 => {
                // whole-word fast path, only reachable when aligned
                let word = self.words[self.index];
                self.index += 1;
                self.available -= 32;
                (word, 32)
            }
            _ => {
                let word = self.words[self.index] << self.offset;
                self.seek(count);
                (word, count)
            }
        }
    }
}

/// Write side of a row segment. Accepts MSB-aligned words and merges them
/// with a masked read-modify-write so untouched bits survive.
struct WriteStream<'a> {
    words: &'a mut [u32],
    index: usize,
    offset: usize,
    available: usize,
}

impl<'a> WriteStream<'a> {
    fn new(matrix: &'a mut BitMatrix, row: usize, col: usize, count: usize) -> WriteStream<'a> {
        check_segment(matrix, row, col, count);
        WriteStream {
            index: (matrix.words_per_row * row) + (col / 32),
            offset: col % 32,
            available: count,
            words: &mut matrix.words,
        }
    }

    fn usable(&self, count: usize) -> usize {
        count.min(32).min(self.available).min(32 - self.offset)
    }

    fn seek(&mut self, count: usize) {
        self.available -= count;
        self.offset += count;
        if self.offset == 32 {
            self.offset = 0;
            self.index += 1;
        }
    }

    /// Writes up to `count` bits taken from the top of `source`.
    /// Returns the number of bits consumed.
    fn write(&mut self, source: u32, count: usize) -> usize {
        let count = self.usable(count);
        match count {
            0 => 0,
            32 => {
                self.words[self.index] = source;
                self.index += 1;
                self.available -= 32;
                32
            }
            _ => {
                let mask = (0xFFFF_FFFFu32 << (32 - count)) >> self.offset;
                let merged = (self.words[self.index] & !mask) | ((source >> self.offset) & mask);
                self.words[self.index] = merged;
                self.seek(count);
                count
            }
        }
    }
}

fn check_segment(matrix: &BitMatrix, row: usize, col: usize, count: usize) {
    if row >= matrix.height || col >= matrix.width || col + count > matrix.width {
        panic!(
            "stream segment out of bounds: row={row}, col={col}, count={count} in {}x{} matrix",
            matrix.height, matrix.width
        );
    }
}

/// Moves every remaining bit from `src` to `dst`, one word at a time.
fn stream_copy(src: &mut ReadStream<'_>, dst: &mut WriteStream<'_>) -> usize {
    let mut total = 0;
    loop {
        let (mut word, mut pending) = src.read(32);
        if pending == 0 {
            return total;
        }
        loop {
            let written = dst.write(word, pending);
            if written == 0 {
                return total;
            }
            total += written;
            pending -= written;
            if pending == 0 {
                break;
            }
            word <<= written;
        }
    }
}

/// Copies a rectangle of bits from `src` to `dst`.
///
/// The rectangle starts at `(src_row, src_col)` in the source and lands at
/// `(dst_row, dst_col)` in the destination. `height` and `width` are upper
/// bounds; the extent is clipped so both rectangles stay within their
/// matrices, and the clipped `(height, width)` actually copied is returned.
///
/// A zero `height` or `width` is a no-op returning `(0, 0)`. Start
/// coordinates outside either matrix panic; that is a caller defect, not a
/// condition to clip away.
///
/// Each output row is moved through a pair of word streams, transferring up
/// to 32 bits per step with masked partial-word merges at the edges. This
/// is the hot path for blitting glyphs and sprites; copying bit by bit
/// would be correct but far too slow for large surfaces.
pub fn copy(
    src: &BitMatrix,
    src_row: usize,
    src_col: usize,
    dst: &mut BitMatrix,
    dst_row: usize,
    dst_col: usize,
    height: usize,
    width: usize,
) -> (usize, usize) {
    if height == 0 || width == 0 {
        return (0, 0);
    }

    if src_row >= src.height || src_col >= src.width {
        panic!(
            "source start ({src_row},{src_col}) out of bounds for {}x{} matrix",
            src.height, src.width
        );
    }
    if dst_row >= dst.height || dst_col >= dst.width {
        panic!(
            "destination start ({dst_row},{dst_col}) out of bounds for {}x{} matrix",
            dst.height, dst.width
        );
    }

    let height = height
        .min(src.height - src_row)
        .min(dst.height - dst_row);
    let width = width.min(src.width - src_col).min(dst.width - dst_col);

    for i in 0..height {
        let mut reader = ReadStream::new(src, src_row + i, src_col, width);
        let mut writer = WriteStream::new(dst, dst_row + i, dst_col, width);
        stream_copy(&mut reader, &mut writer);
    }

    (height, width)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(height: usize, width: usize) -> BitMatrix {
        let mut m = BitMatrix::new(height, width);
        for row in 0..height {
            for col in 0..width {
                if (row * 31 + col * 7) % 3 == 0 {
                    m.set(row, col, true);
                }
            }
        }
        m
    }

    /// Per-bit reference for validating the word-at-a-time path.
    fn reference_copy(
        src: &BitMatrix,
        src_row: usize,
        src_col: usize,
        dst: &mut BitMatrix,
        dst_row: usize,
        dst_col: usize,
        height: usize,
        width: usize,
    ) {
        for i in 0..height {
            for j in 0..width {
                dst.set(dst_row + i, dst_col + j, src.get(src_row + i, src_col + j));
            }
        }
    }

    #[test]
    fn test_copy_zero_extent_is_noop() {
        let src = checker(4, 4);
        let mut dst = BitMatrix::new(4, 4);
        assert_eq!(copy(&src, 0, 0, &mut dst, 0, 0, 0, 4), (0, 0));
        assert_eq!(copy(&src, 0, 0, &mut dst, 0, 0, 4, 0), (0, 0));
        assert_eq!(dst, BitMatrix::new(4, 4));
    }

    #[test]
    fn test_copy_aligned() {
        let src = checker(8, 64);
        let mut dst = BitMatrix::new(8, 64);
        assert_eq!(copy(&src, 0, 0, &mut dst, 0, 0, 8, 64), (8, 64));
        assert_eq!(dst, src);
    }

    #[test]
    fn test_copy_unaligned_matches_reference() {
        let src = checker(10, 90);
        let mut fast = BitMatrix::new(12, 75);
        let mut slow = BitMatrix::new(12, 75);

        let (h, w) = copy(&src, 2, 5, &mut fast, 3, 9, 7, 61);
        assert_eq!((h, w), (7, 61));
        reference_copy(&src, 2, 5, &mut slow, 3, 9, 7, 61);
        assert_eq!(fast, slow);
    }

    #[test]
    fn test_copy_clips_to_both_matrices() {
        let src = checker(6, 40);
        let mut dst = BitMatrix::new(5, 38);

        // requested extent overruns both source and destination
        let (h, w) = copy(&src, 4, 30, &mut dst, 3, 33, 100, 100);
        assert_eq!((h, w), (2, 5));

        let mut expected = BitMatrix::new(5, 38);
        reference_copy(&src, 4, 30, &mut expected, 3, 33, 2, 5);
        assert_eq!(dst, expected);
    }

    #[test]
    fn test_copy_preserves_surrounding_bits() {
        let src = BitMatrix::new(3, 16); // all zeroes
        let mut dst = checker(8, 48);
        let before = dst.clone();

        copy(&src, 0, 0, &mut dst, 2, 17, 3, 16);

        for row in 0..8 {
            for col in 0..48 {
                let inside = (2..5).contains(&row) && (17..33).contains(&col);
                if inside {
                    assert!(!dst.get(row, col));
                } else {
                    assert_eq!(dst.get(row, col), before.get(row, col), "({row},{col})");
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_copy_source_start_out_of_bounds_panics() {
        let src = BitMatrix::new(4, 4);
        let mut dst = BitMatrix::new(4, 4);
        copy(&src, 4, 0, &mut dst, 0, 0, 1, 1);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_copy_destination_start_out_of_bounds_panics() {
        let src = BitMatrix::new(4, 4);
        let mut dst = BitMatrix::new(4, 4);
        copy(&src, 0, 0, &mut dst, 0, 4, 1, 1);
    }

    #[test]
    fn test_copy_wide_unaligned_word_boundaries() {
        // source offset and destination offset straddle words differently
        let src = checker(2, 130);
        let mut fast = BitMatrix::new(2, 130);
        let mut slow = BitMatrix::new(2, 130);

        copy(&src, 0, 1, &mut fast, 1, 31, 1, 96);
        reference_copy(&src, 0, 1, &mut slow, 1, 31, 1, 96);
        assert_eq!(fast, slow);
    }
}
