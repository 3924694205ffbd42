/*
 *  bits/mod.rs
 *
 *  dotgrid - packed canvases for daisy-chained LED matrices
 *  (c) 2024-26 the dotgrid authors
 *
 *  Packed two-dimensional bit storage and bit-level I/O
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

//! Efficient storage and manipulation of two-dimensional bit arrays.
//!
//! A `BitMatrix` packs bits into 32-bit words, which makes bulk operations
//! (clipped copies, streaming reads for display refresh) dramatically
//! cheaper than a `Vec<Vec<bool>>` rendition. Everything modelling a
//! dot-matrix display in this crate is built on these types.

pub mod cursor;
pub mod matrix;
pub mod reader;
mod stream;
pub mod writer;

pub use cursor::Cursor;
pub use matrix::BitMatrix;
pub use reader::{BitReader, Direction};
pub use stream::copy;
pub use writer::BitWriter;
