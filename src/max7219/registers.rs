/*
 *  max7219/registers.rs
 *
 *  dotgrid - packed canvases for daisy-chained LED matrices
 *  (c) 2024-26 the dotgrid authors
 *
 *  MAX7219 register map and value constants
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

/// Address of one of the MAX7219's registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    /// Padding register; writes are ignored by the chip. Used to skip a
    /// chain position during a transfer.
    NoOp = 0x00,
    Digit0 = 0x01,
    Digit1 = 0x02,
    Digit2 = 0x03,
    Digit3 = 0x04,
    Digit4 = 0x05,
    Digit5 = 0x06,
    Digit6 = 0x07,
    Digit7 = 0x08,
    DecodeMode = 0x09,
    Intensity = 0x0A,
    ScanLimit = 0x0B,
    Shutdown = 0x0C,
    DisplayTest = 0x0F,
}

/// The eight digit registers in row order.
pub const DIGITS: [Register; 8] = [
    Register::Digit0,
    Register::Digit1,
    Register::Digit2,
    Register::Digit3,
    Register::Digit4,
    Register::Digit5,
    Register::Digit6,
    Register::Digit7,
];

impl Register {
    /// The digit register for display row `digit`. The chip has eight of
    /// them; anything past 7 panics.
    pub fn digit(digit: usize) -> Register {
        *DIGITS
            .get(digit)
            .unwrap_or_else(|| panic!("digit {digit} out of range, the MAX7219 has digits 0..=7"))
    }

    /// The wire address of this register.
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// Shutdown register: display off (blanked, registers retained).
pub const SHUTDOWN: u8 = 0x00;
/// Shutdown register: normal operation.
pub const NO_SHUTDOWN: u8 = 0x01;

/// Display-test register: all segments lit at full intensity.
pub const DISPLAY_TEST: u8 = 0x01;
/// Display-test register: normal operation.
pub const NO_DISPLAY_TEST: u8 = 0x00;

/// Decode-mode register: raw segment data on every digit, the mode used
/// for dot-matrix blocks.
pub const DECODE_NONE: u8 = 0x00;
/// Decode-mode register: BCD code-B decoding on every digit.
pub const DECODE_ALL: u8 = 0xFF;

/// Highest legal intensity value.
pub const MAX_INTENSITY: u8 = 0x0F;

/// Scan limit driving all eight digits; the practical maximum for an
/// 8x8 matrix block.
pub const MAX_SCAN_LIMIT: u8 = 0x07;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_register_addresses() {
        assert_eq!(Register::digit(0), Register::Digit0);
        assert_eq!(Register::digit(7), Register::Digit7);
        assert_eq!(Register::digit(3).addr(), 0x04);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_digit_register_past_seven_panics() {
        Register::digit(8);
    }
}
