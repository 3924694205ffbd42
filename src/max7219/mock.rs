/*
 *  max7219/mock.rs
 *
 *  dotgrid - packed canvases for daisy-chained LED matrices
 *  (c) 2024-26 the dotgrid authors
 *
 *  Mock bus for testing without hardware
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

use std::sync::{Arc, Mutex};

use super::bus::{Bus, Op};
use super::error::BusError;

/// A [`Bus`] that records every transfer instead of driving hardware.
///
/// Useful for unit and integration tests, and for developing without a
/// display attached. State is shared through an `Arc` so a test can keep
/// inspecting transfers after handing the bus to a chain.
#[derive(Debug, Clone, Default)]
pub struct MockBus {
    state: Arc<Mutex<MockBusState>>,
}

/// Recorded traffic and failure switches, shared for inspection in tests.
#[derive(Debug, Default)]
pub struct MockBusState {
    /// Ops queued since the last `send`.
    pub pending: Vec<Op>,

    /// Every completed transfer, in order, each one the full op list of a
    /// single `send`.
    pub transfers: Vec<Vec<Op>>,

    /// Number of times `send` was called.
    pub send_count: usize,

    /// When set, the next `send` fails (and clears the flag).
    pub fail_next_send: bool,
}

impl MockBus {
    pub fn new() -> MockBus {
        MockBus::default()
    }

    /// Shared handle to the recorded state.
    pub fn state(&self) -> Arc<Mutex<MockBusState>> {
        Arc::clone(&self.state)
    }

    /// Completed transfers so far.
    pub fn transfers(&self) -> Vec<Vec<Op>> {
        self.state.lock().unwrap().transfers.clone()
    }

    /// Number of completed transfers.
    pub fn send_count(&self) -> usize {
        self.state.lock().unwrap().send_count
    }

    /// Forgets all recorded traffic (but not pending ops).
    pub fn clear_recording(&self) {
        let mut state = self.state.lock().unwrap();
        state.transfers.clear();
        state.send_count = 0;
    }
}

impl Bus for MockBus {
    fn add(&mut self, op: Op) {
        self.state.lock().unwrap().pending.push(op);
    }

    fn send(&mut self) -> Result<(), BusError> {
        let mut state = self.state.lock().unwrap();
        let ops = std::mem::take(&mut state.pending);
        if state.fail_next_send {
            state.fail_next_send = false;
            return Err(BusError::Transfer("simulated failure".to_string()));
        }
        state.send_count += 1;
        state.transfers.push(ops);
        Ok(())
    }
}
