/*
 *  max7219/bus.rs
 *
 *  dotgrid - packed canvases for daisy-chained LED matrices
 *  (c) 2024-26 the dotgrid authors
 *
 *  Bus contract for a chain of cascaded MAX7219 chips
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

use super::error::BusError;
use super::registers::Register;

/// One register write for one chip: the unit of traffic on the serial
/// link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Op {
    pub register: Register,
    pub data: u8,
}

impl Op {
    /// Padding for chain positions that should ignore a transfer.
    pub const NO_OP: Op = Op {
        register: Register::NoOp,
        data: 0x00,
    };
}

/// Serial access to a chain of cascaded MAX7219 chips.
///
/// The physical link has no chip addressing; a chip is selected purely by
/// its position in the transmission order. Callers must therefore `add`
/// exactly one op per chip, in chain order, before each `send`, padding
/// untouched positions with [`Op::NO_OP`].
///
/// Opening the underlying SPI (or other) transport is the implementor's
/// concern and outside this crate.
pub trait Bus: Send {
    /// Enqueues one register write for the next chip position.
    fn add(&mut self, op: Op);

    /// Transmits the queued ops as a single atomic transfer. The queue is
    /// cleared whether or not the transfer succeeds, so a retry must
    /// re-queue its ops.
    fn send(&mut self) -> Result<(), BusError>;
}

/// Boxed bus, the form the chain owns.
pub type BoxedBus = Box<dyn Bus>;
