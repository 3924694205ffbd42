/*
 *  max7219/mod.rs
 *
 *  dotgrid - packed canvases for daisy-chained LED matrices
 *  (c) 2024-26 the dotgrid authors
 *
 *  Driving chains of MAX7219 dot-matrix blocks
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

//! The hardware-facing layer: register shadows and dirty tracking for a
//! daisy chain of MAX7219 chips, and a [`ViewPort`] event loop that
//! repaints the chain from an observed [`Canvas`](crate::display::Canvas).
//!
//! Opening the physical SPI link is left to [`Bus`] implementors; the
//! [`mock`] module provides a recording bus for tests and development.

pub mod bus;
pub mod chain;
mod chip;
pub mod error;
pub mod mock;
pub mod registers;
pub mod viewport;

pub use bus::{Bus, BoxedBus, Op};
pub use chain::{Chain, MAX_CHAIN_LENGTH};
pub use error::{BusError, ViewPortError};
pub use mock::MockBus;
pub use registers::Register;
pub use viewport::{BlockOrientation, ChainOrientation, ViewPort};
