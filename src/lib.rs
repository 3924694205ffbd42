/*
 *  lib.rs
 *
 *  dotgrid - packed canvases for daisy-chained LED matrices
 *  (c) 2024-26 the dotgrid authors
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

//! Packed-bit framebuffers, observable canvases, and a driver for
//! daisy-chained MAX7219 dot-matrix LED blocks.
//!
//! The layers, bottom up:
//!
//! * [`bits`] packs a 2D bit matrix into 32-bit words and provides
//!   bounds-checked access, clipped rectangular copy, directional byte
//!   readers and writers, and a random-access bit cursor.
//! * [`display`] wraps a matrix in a thread-safe [`Canvas`] with nested
//!   update batching and snapshot delivery to registered observers.
//! * [`max7219`] shadows the register file of every chip in a chain,
//!   flushes only what changed, and runs a [`ViewPort`] event loop that
//!   repaints the chain from canvas updates.
//!
//! Physical transport is outside this crate: implement [`max7219::Bus`]
//! over your SPI stack and hand it to [`max7219::Chain`]. The
//! [`max7219::MockBus`] records traffic instead, for tests and
//! development without hardware.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use dotgrid::display::Canvas;
//! use dotgrid::max7219::{
//!     BlockOrientation, Chain, ChainOrientation, MockBus, ViewPort,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let chain = Chain::new(Box::new(MockBus::new()), 4)?;
//! let viewport = ViewPort::new(
//!     chain,
//!     BlockOrientation::DigitZeroAtBottom,
//!     ChainOrientation::BlockZeroAtRight,
//! )?;
//!
//! let canvas = Arc::new(Canvas::new(8, 32));
//! viewport.attach(Arc::clone(&canvas), 0, 0);
//! canvas.set(0, 0, true);
//! # Ok(())
//! # }
//! ```
//!
//! [`Canvas`]: display::Canvas
//! [`ViewPort`]: max7219::ViewPort

pub mod bits;
pub mod display;
pub mod max7219;

pub use bits::BitMatrix;
pub use display::Canvas;
pub use max7219::{Chain, ViewPort};
