/*
 *  max7219/chip.rs
 *
 *  dotgrid - packed canvases for daisy-chained LED matrices
 *  (c) 2024-26 the dotgrid authors
 *
 *  Shadow register cache for a single MAX7219
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

use super::registers::{MAX_SCAN_LIMIT, NO_SHUTDOWN, Register};

/// Shadow of one chip's register file plus a dirty bit per register.
///
/// Invariant: a register's dirty bit is set iff its shadow value differs
/// from the last value actually sent to the hardware. `set` therefore
/// marks dirty only on a real change, and the flush path clears the bit
/// only once a transfer has succeeded.
#[derive(Debug, Clone)]
pub(super) struct Chip {
    registers: [u8; 16],
    dirty: u16,
}

impl Chip {
    /// Shadow state immediately after a chain reset: everything zero
    /// except scan limit (all digits scanned) and shutdown (de-asserted),
    /// matching what the reset sequence leaves on the hardware.
    pub(super) fn new() -> Chip {
        let mut registers = [0u8; 16];
        registers[Register::ScanLimit.addr() as usize] = MAX_SCAN_LIMIT;
        registers[Register::Shutdown.addr() as usize] = NO_SHUTDOWN;
        Chip {
            registers,
            dirty: 0,
        }
    }

    pub(super) fn get(&self, register: Register) -> u8 {
        self.registers[register.addr() as usize]
    }

    /// Updates the shadow value, marking the register dirty only when the
    /// value actually changed.
    pub(super) fn set(&mut self, register: Register, data: u8) {
        let index = register.addr() as usize;
        if self.registers[index] != data {
            self.registers[index] = data;
            self.dirty |= 1 << index;
        }
    }

    pub(super) fn is_dirty(&self, register: Register) -> bool {
        self.dirty & (1 << register.addr()) != 0
    }

    pub(super) fn any_dirty(&self) -> bool {
        self.dirty != 0
    }

    /// Clears the register's dirty flag. Called only once the value has
    /// actually reached the hardware.
    pub(super) fn clear_dirty(&mut self, register: Register) {
        self.dirty &= !(1u16 << register.addr());
    }
}
