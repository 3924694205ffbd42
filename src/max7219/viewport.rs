/*
 *  max7219/viewport.rs
 *
 *  dotgrid - packed canvases for daisy-chained LED matrices
 *  (c) 2024-26 the dotgrid authors
 *
 *  Event loop mapping a canvas rectangle onto a chain of chips
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

use log::{debug, error, warn};
use tokio::sync::mpsc::{self, error::TrySendError};

use super::chain::Chain;
use super::error::{BusError, ViewPortError};
use crate::bits::Cursor;
use crate::display::{Canvas, ObserverId, Snapshot};

/// Rows (digits) per 8x8 matrix block.
const BLOCK_ROWS: usize = 8;
/// Columns per 8x8 matrix block.
const BLOCK_COLS: usize = 8;

const COMMAND_QUEUE_CAPACITY: usize = 32;
const COMMAND_QUEUE_WATERMARK: usize = 8;
const UPDATE_QUEUE_CAPACITY: usize = 16;
const UPDATE_QUEUE_WATERMARK: usize = 4;

/// How a block's digit registers map to physical rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOrientation {
    DigitZeroAtTop,
    DigitZeroAtRight,
    DigitZeroAtBottom,
    DigitZeroAtLeft,
}

/// Where the first chip of the chain sits relative to the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOrientation {
    BlockZeroAtTop,
    BlockZeroAtRight,
    BlockZeroAtBottom,
    BlockZeroAtLeft,
}

enum Command {
    Attach {
        canvas: Arc<Canvas>,
        row: usize,
        col: usize,
    },
    Detach,
    Locate {
        row: usize,
        col: usize,
    },
    Shift {
        rows: isize,
        cols: isize,
    },
    SetBrightness(u8),
}

/// A window onto a [`Canvas`], repainted onto a [`Chain`] whenever the
/// canvas changes.
///
/// All hardware state lives in a single spawned task; this handle only
/// posts commands to it. Canvas updates and commands are both consumed
/// by that task, one at a time, so no lock ever guards the chain or the
/// bus. Requires a tokio runtime.
///
/// Commands are applied in posting order. The command queue is bounded;
/// a backlog past the watermark is logged, and overflowing it panics,
/// since quietly dropping a reposition or detach would leave the display
/// out of sync with what the caller believes.
pub struct ViewPort {
    commands: mpsc::Sender<Command>,
    offset: Arc<Mutex<Option<(usize, usize)>>>,
    height: usize,
    width: usize,
}

impl ViewPort {
    /// Builds a viewport over `chain` and starts its event loop.
    ///
    /// Only the digit-zero-at-bottom, block-zero-at-right arrangement is
    /// implemented; any other combination is refused rather than
    /// miscomputing the digit mapping.
    pub fn new(
        chain: Chain,
        block: BlockOrientation,
        orientation: ChainOrientation,
    ) -> Result<ViewPort, ViewPortError> {
        if block != BlockOrientation::DigitZeroAtBottom
            || orientation != ChainOrientation::BlockZeroAtRight
        {
            return Err(ViewPortError::UnsupportedOrientation {
                block,
                chain: orientation,
            });
        }

        let height = BLOCK_ROWS;
        let width = chain.len() * BLOCK_COLS;
        let offset = Arc::new(Mutex::new(None));
        let (commands, receiver) = mpsc::channel(COMMAND_QUEUE_CAPACITY);

        let actor = Actor {
            chain,
            commands: receiver,
            canvas: None,
            observer: None,
            updates: None,
            snapshot: None,
            offset: Arc::clone(&offset),
            height,
            width,
        };
        tokio::spawn(actor.run());

        Ok(ViewPort {
            commands,
            offset,
            height,
            width,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn size(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Current offset into the attached canvas, `None` when unattached.
    pub fn offset(&self) -> Option<(usize, usize)> {
        *self.offset.lock().unwrap()
    }

    /// Attaches to a canvas and repaints immediately from its current
    /// state. The offset is clamped so the viewport rectangle stays
    /// within the canvas. An existing attachment is dropped first.
    pub fn attach(&self, canvas: Arc<Canvas>, row: usize, col: usize) {
        self.post(Command::Attach { canvas, row, col });
    }

    /// Stops observing the attached canvas. The display keeps its last
    /// painted contents.
    pub fn detach(&self) {
        self.post(Command::Detach);
    }

    /// Moves the viewport to an absolute offset, clamped into bounds,
    /// and repaints. Ignored when unattached.
    pub fn locate(&self, row: usize, col: usize) {
        self.post(Command::Locate { row, col });
    }

    /// Moves the viewport by a relative amount, clamped into bounds,
    /// and repaints. Ignored when unattached.
    pub fn shift(&self, rows: isize, cols: isize) {
        self.post(Command::Shift { rows, cols });
    }

    /// Sets display intensity across the chain, clamped to the hardware
    /// range.
    pub fn set_brightness(&self, level: u8) {
        self.post(Command::SetBrightness(level));
    }

    fn post(&self, command: Command) {
        let free = self.commands.capacity();
        if free <= COMMAND_QUEUE_WATERMARK {
            warn!("viewport command queue backing up, {free} slots free");
        }
        match self.commands.try_send(command) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                error!("viewport command queue overflowed");
                panic!("viewport command queue overflowed");
            }
            Err(TrySendError::Closed(_)) => {
                error!("viewport event loop has stopped");
                panic!("viewport event loop has stopped");
            }
        }
    }
}

impl std::fmt::Debug for ViewPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewPort")
            .field("height", &self.height)
            .field("width", &self.width)
            .field("offset", &self.offset())
            .finish()
    }
}

/// Single owner of the chain, the observer registration and the current
/// snapshot. Lives in its own task until the handle is dropped or the
/// bus fails.
struct Actor {
    chain: Chain,
    commands: mpsc::Receiver<Command>,
    canvas: Option<Arc<Canvas>>,
    observer: Option<ObserverId>,
    updates: Option<mpsc::Receiver<Snapshot>>,
    snapshot: Option<Snapshot>,
    offset: Arc<Mutex<Option<(usize, usize)>>>,
    height: usize,
    width: usize,
}

impl Actor {
    async fn run(mut self) {
        debug!("viewport event loop started");
        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        debug!("viewport handle dropped, stopping event loop");
                        break;
                    };
                    if let Err(err) = self.handle(command) {
                        error!("stopping viewport event loop: {err}");
                        break;
                    }
                }
                snapshot = Self::next_update(&mut self.updates) => {
                    let Some(snapshot) = snapshot else {
                        // observer channel closed under us
                        self.updates = None;
                        continue;
                    };
                    if let Some(updates) = &self.updates {
                        let queued = updates.len();
                        if queued >= UPDATE_QUEUE_WATERMARK {
                            warn!("canvas update queue backing up, {queued} queued");
                        }
                    }
                    self.snapshot = Some(snapshot);
                    if let Err(err) = self.repaint() {
                        error!("stopping viewport event loop: {err}");
                        break;
                    }
                }
            }
        }
        self.detach();
    }

    async fn next_update(updates: &mut Option<mpsc::Receiver<Snapshot>>) -> Option<Snapshot> {
        match updates {
            Some(receiver) => receiver.recv().await,
            None => std::future::pending().await,
        }
    }

    fn handle(&mut self, command: Command) -> Result<(), BusError> {
        match command {
            Command::Attach { canvas, row, col } => self.attach(canvas, row, col),
            Command::Detach => {
                self.detach();
                Ok(())
            }
            Command::Locate { row, col } => self.locate(row, col),
            Command::Shift { rows, cols } => {
                let Some((row, col)) = *self.offset.lock().unwrap() else {
                    debug!("shift ignored, no canvas attached");
                    return Ok(());
                };
                self.locate(
                    row.saturating_add_signed(rows),
                    col.saturating_add_signed(cols),
                )
            }
            Command::SetBrightness(level) => self.chain.set_intensity(level),
        }
    }

    fn attach(&mut self, canvas: Arc<Canvas>, row: usize, col: usize) -> Result<(), BusError> {
        self.detach();

        let (sender, receiver) = mpsc::channel(UPDATE_QUEUE_CAPACITY);
        let (id, snapshot) = canvas.add_observer(sender);
        *self.offset.lock().unwrap() = Some(self.clamp(&canvas, row, col));
        self.canvas = Some(canvas);
        self.observer = Some(id);
        self.updates = Some(receiver);
        self.snapshot = Some(snapshot);
        self.repaint()
    }

    fn detach(&mut self) {
        if let (Some(canvas), Some(id)) = (self.canvas.take(), self.observer.take()) {
            canvas.remove_observer(id);
        }
        self.updates = None;
        self.snapshot = None;
        *self.offset.lock().unwrap() = None;
    }

    fn locate(&mut self, row: usize, col: usize) -> Result<(), BusError> {
        let Some(canvas) = &self.canvas else {
            debug!("locate ignored, no canvas attached");
            return Ok(());
        };
        let clamped = self.clamp(canvas, row, col);
        *self.offset.lock().unwrap() = Some(clamped);
        self.repaint()
    }

    fn clamp(&self, canvas: &Canvas, row: usize, col: usize) -> (usize, usize) {
        (
            row.min(canvas.height().saturating_sub(self.height)),
            col.min(canvas.width().saturating_sub(self.width)),
        )
    }

    /// Paints the viewport rectangle of the current snapshot onto the
    /// chain.
    ///
    /// Digit registers address rows bottom-up relative to the canvas:
    /// digit 0 carries the last logical row, digit 7 the first. Within a
    /// row the first chip in transmission order is the rightmost block,
    /// so the per-chip bytes go out reversed.
    fn repaint(&mut self) -> Result<(), BusError> {
        let (Some(snapshot), Some((off_row, off_col))) =
            (&self.snapshot, *self.offset.lock().unwrap())
        else {
            return Ok(());
        };

        let chips = self.width / BLOCK_COLS;
        for i in 0..self.height {
            let mut bytes = vec![0u8; chips];
            let row = off_row + i;
            if row < snapshot.height() {
                let mut cursor = Cursor::new(snapshot, row, off_col);
                for byte in bytes.iter_mut() {
                    // a short read at the canvas edge is packed into the
                    // low bits; shift it up so columns keep their place
                    let (value, count) = cursor.read_right_byte();
                    if count > 0 {
                        *byte = value << (8 - count);
                    }
                }
            }
            bytes.reverse();
            self.chain.set_digit(BLOCK_ROWS - 1 - i, &bytes);
        }
        self.chain.flush()
    }
}
