/*
 *  max7219/error.rs
 *
 *  dotgrid - packed canvases for daisy-chained LED matrices
 *  (c) 2024-26 the dotgrid authors
 *
 *  Error types for the hardware-facing layer
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

use thiserror::Error;

use super::viewport::{BlockOrientation, ChainOrientation};

/// Failure of a bus transfer to the chip chain.
///
/// The transport layer reports its own connection errors at construction
/// time; this covers transfers that fail afterwards. The viewport treats
/// any such failure as fatal for its event loop: the error is logged and
/// the loop stops rather than retrying against hardware in an unknown
/// state.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("bus transfer failed: {0}")]
    Transfer(String),
}

/// Rejected viewport configuration.
#[derive(Debug, Error)]
pub enum ViewPortError {
    /// Only one block/chain orientation pair is currently implemented.
    /// Everything else is refused outright rather than miscomputing the
    /// digit mapping.
    #[error("unsupported orientation: block {block:?}, chain {chain:?}")]
    UnsupportedOrientation {
        block: BlockOrientation,
        chain: ChainOrientation,
    },
}
