/*
 *  max7219/chain.rs
 *
 *  dotgrid - packed canvases for daisy-chained LED matrices
 *  (c) 2024-26 the dotgrid authors
 *
 *  Register control for a daisy chain of MAX7219 chips
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

use super::bus::{BoxedBus, Op};
use super::chip::Chip;
use super::error::BusError;
use super::registers::{
    DIGITS, DISPLAY_TEST, MAX_INTENSITY, MAX_SCAN_LIMIT, NO_DISPLAY_TEST, NO_SHUTDOWN, Register,
    SHUTDOWN,
};

/// Upper bound on chips per chain. Generous; real installations are a
/// handful of blocks.
pub const MAX_CHAIN_LENGTH: usize = 256;

/// Registers swept by [`Chain::flush`], display test first so a stray
/// test mode is cleared before digit data lands.
const FLUSH_ORDER: [Register; 13] = [
    Register::DisplayTest,
    Register::Digit0,
    Register::Digit1,
    Register::Digit2,
    Register::Digit3,
    Register::Digit4,
    Register::Digit5,
    Register::Digit6,
    Register::Digit7,
    Register::DecodeMode,
    Register::Intensity,
    Register::ScanLimit,
    Register::Shutdown,
];

/// A fixed-length daisy chain of MAX7219 chips sharing one bus.
///
/// Keeps a register shadow per chip and only touches the bus for
/// registers that actually changed. Because the serial link addresses
/// chips by transmission position, a transfer for a register always
/// carries one op per chip, padding clean positions with no-ops; but if
/// no chip is dirty for that register the transfer is skipped entirely.
pub struct Chain {
    bus: BoxedBus,
    chips: Vec<Chip>,
}

impl Chain {
    /// Builds a chain of `length` chips over `bus` and resets it to a
    /// known power-on state.
    ///
    /// Panics if `length` is zero or exceeds [`MAX_CHAIN_LENGTH`]; the
    /// chain length comes from wiring, not from runtime input.
    pub fn new(bus: BoxedBus, length: usize) -> Result<Chain, BusError> {
        assert!(
            (1..=MAX_CHAIN_LENGTH).contains(&length),
            "chain length {length} out of range 1..={MAX_CHAIN_LENGTH}"
        );
        let mut chain = Chain {
            bus,
            chips: vec![Chip::new(); length],
        };
        chain.reset()?;
        Ok(chain)
    }

    /// Number of chips in the chain.
    pub fn len(&self) -> usize {
        self.chips.len()
    }

    /// Drives every chip to a deterministic state: shutdown asserted
    /// first so nothing malformed is ever visible, display test off, all
    /// digit data cleared, raw decode, minimum intensity, full scan
    /// limit, then shutdown released.
    pub fn reset(&mut self) -> Result<(), BusError> {
        self.broadcast(Register::Shutdown, SHUTDOWN)?;
        self.broadcast(Register::DisplayTest, NO_DISPLAY_TEST)?;
        for register in DIGITS {
            self.broadcast(register, 0x00)?;
        }
        self.broadcast(Register::DecodeMode, 0x00)?;
        self.broadcast(Register::Intensity, 0x00)?;
        self.broadcast(Register::ScanLimit, MAX_SCAN_LIMIT)?;
        self.broadcast(Register::Shutdown, NO_SHUTDOWN)?;

        // Shadows now match the hardware exactly.
        for chip in &mut self.chips {
            *chip = Chip::new();
        }
        Ok(())
    }

    /// Stores one digit register across the chain, in the shadows only.
    /// The data goes out on the next [`flush`](Chain::flush) or
    /// [`flush_register`](Chain::flush_register), so a whole frame of
    /// digit rows can be staged and sent in one sweep.
    ///
    /// `data` is either a single byte repeated on every chip, or exactly
    /// one byte per chip in chain order. Anything else panics; a
    /// mismatched slice would scramble the chain mapping.
    pub fn set_digit(&mut self, digit: usize, data: &[u8]) {
        let register = Register::digit(digit);
        match data.len() {
            1 => {
                for chip in &mut self.chips {
                    chip.set(register, data[0]);
                }
            }
            n if n == self.chips.len() => {
                for (chip, byte) in self.chips.iter_mut().zip(data) {
                    chip.set(register, *byte);
                }
            }
            n => panic!(
                "digit data must be 1 byte or one per chip ({}), got {n}",
                self.chips.len()
            ),
        }
    }

    /// Sets display intensity on every chip, clamped to the hardware
    /// range.
    pub fn set_intensity(&mut self, intensity: u8) -> Result<(), BusError> {
        self.set_all(Register::Intensity, intensity.min(MAX_INTENSITY))
    }

    pub fn set_decode_mode(&mut self, mode: u8) -> Result<(), BusError> {
        self.set_all(Register::DecodeMode, mode)
    }

    /// Sets the scan limit on every chip, clamped to the hardware range.
    pub fn set_scan_limit(&mut self, limit: u8) -> Result<(), BusError> {
        self.set_all(Register::ScanLimit, limit.min(MAX_SCAN_LIMIT))
    }

    pub fn set_display_test(&mut self, on: bool) -> Result<(), BusError> {
        let data = if on { DISPLAY_TEST } else { NO_DISPLAY_TEST };
        self.set_all(Register::DisplayTest, data)
    }

    /// Takes every chip out of shutdown.
    pub fn activate(&mut self) -> Result<(), BusError> {
        self.set_all(Register::Shutdown, NO_SHUTDOWN)
    }

    /// Blanks every chip; register contents are retained.
    pub fn shutdown(&mut self) -> Result<(), BusError> {
        self.set_all(Register::Shutdown, SHUTDOWN)
    }

    /// Flushes every register with pending changes, in a fixed sweep
    /// order. A fully clean chain returns without touching anything.
    pub fn flush(&mut self) -> Result<(), BusError> {
        if !self.chips.iter().any(Chip::any_dirty) {
            return Ok(());
        }
        for register in FLUSH_ORDER {
            self.flush_register(register)?;
        }
        Ok(())
    }

    /// Sends one register across the chain if any chip's shadow changed.
    ///
    /// Dirty chips get their shadow value, clean ones a no-op to hold
    /// their chain position. With nothing dirty the bus is not touched.
    /// Dirty flags are only cleared once the transfer succeeds, so a
    /// failed send leaves the values pending for the next flush.
    pub fn flush_register(&mut self, register: Register) -> Result<(), BusError> {
        if !self.chips.iter().any(|chip| chip.is_dirty(register)) {
            return Ok(());
        }
        for chip in &self.chips {
            self.bus.add(if chip.is_dirty(register) {
                Op {
                    register,
                    data: chip.get(register),
                }
            } else {
                Op::NO_OP
            });
        }
        self.bus.send()?;
        for chip in &mut self.chips {
            chip.clear_dirty(register);
        }
        Ok(())
    }

    fn set_all(&mut self, register: Register, data: u8) -> Result<(), BusError> {
        for chip in &mut self.chips {
            chip.set(register, data);
        }
        self.flush_register(register)
    }

    /// Sends the same op to every chain position, bypassing the shadows.
    fn broadcast(&mut self, register: Register, data: u8) -> Result<(), BusError> {
        for _ in 0..self.chips.len() {
            self.bus.add(Op { register, data });
        }
        self.bus.send()
    }
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("length", &self.chips.len())
            .finish()
    }
}
