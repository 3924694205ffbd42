/*
 *  display/canvas.rs
 *
 *  dotgrid - packed canvases for daisy-chained LED matrices
 *  (c) 2024-26 the dotgrid authors
 *
 *  Thread-safe observable drawing surface
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

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use log::debug;
use tokio::sync::mpsc;

use crate::bits::{self, BitMatrix};

/// An immutable point-in-time copy of canvas state, cheap to hand across
/// tasks.
pub type Snapshot = Arc<BitMatrix>;

/// Identifies a registered observer for later removal.
pub type ObserverId = u64;

struct Shared {
    matrix: BitMatrix,
    update_depth: usize,
}

/// A logical dot-matrix drawing surface that pushes state changes to
/// registered observers.
///
/// Readers (`get`, `snapshot`, the size accessors) run concurrently with
/// each other; mutators (`set`, `clear`, `write`) are exclusive. Observers
/// receive a [`Snapshot`] after every mutation, or once per batch when
/// mutations are grouped with [`Canvas::begin_update`].
///
/// Delivery is best-effort: an observer whose channel is full misses that
/// notification rather than blocking the writer. Display refreshes are
/// idempotent, so the next snapshot supersedes a dropped one.
pub struct Canvas {
    shared: RwLock<Shared>,
    observers: Mutex<HashMap<ObserverId, mpsc::Sender<Snapshot>>>,
    next_observer: AtomicU64,
}

impl Canvas {
    /// Creates a blank canvas of the given fixed size.
    pub fn new(height: usize, width: usize) -> Canvas {
        Canvas {
            shared: RwLock::new(Shared {
                matrix: BitMatrix::new(height, width),
                update_depth: 0,
            }),
            observers: Mutex::new(HashMap::new()),
            next_observer: AtomicU64::new(0),
        }
    }

    pub fn height(&self) -> usize {
        self.shared.read().unwrap().matrix.height()
    }

    pub fn width(&self) -> usize {
        self.shared.read().unwrap().matrix.width()
    }

    /// Returns `(height, width)`.
    pub fn size(&self) -> (usize, usize) {
        self.shared.read().unwrap().matrix.size()
    }

    /// Returns the pixel at `(row, col)`. Panics when out of range.
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.shared.read().unwrap().matrix.get(row, col)
    }

    /// Returns an immutable copy of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Arc::new(self.shared.read().unwrap().matrix.clone())
    }

    /// Sets the pixel at `(row, col)`. Panics when out of range.
    pub fn set(&self, row: usize, col: usize, value: bool) {
        self.mutate(|m| m.set(row, col, value));
    }

    /// Blanks the whole canvas.
    pub fn clear(&self) {
        self.mutate(|m| m.clear());
    }

    /// Blits `source` onto the canvas with its top-left corner at
    /// `(row, col)`, clipped to the canvas edges. The start position must
    /// lie on the canvas; see [`bits::copy`] for the exact contract.
    pub fn write(&self, source: &BitMatrix, row: usize, col: usize) {
        let (height, width) = source.size();
        self.mutate(|m| {
            bits::copy(source, 0, 0, m, row, col, height, width);
        });
    }

    /// Opens a batch of updates. Notifications are suppressed while any
    /// guard is alive and fire exactly once, with the final state, when the
    /// last guard is dropped. Guards nest.
    ///
    /// The guard makes an unbalanced end-of-batch unrepresentable and
    /// releases on every exit path, panics included.
    pub fn begin_update(&self) -> UpdateGuard<'_> {
        self.shared.write().unwrap().update_depth += 1;
        UpdateGuard { canvas: self }
    }

    /// Registers a delivery channel and returns its id together with a
    /// snapshot of the current state, taken atomically with the
    /// registration so no update window is missed.
    pub fn add_observer(&self, channel: mpsc::Sender<Snapshot>) -> (ObserverId, Snapshot) {
        let id = self.next_observer.fetch_add(1, Ordering::Relaxed);
        let shared = self.shared.read().unwrap();
        let mut observers = self.observers.lock().unwrap();
        observers.insert(id, channel);
        (id, Arc::new(shared.matrix.clone()))
    }

    /// Deregisters an observer. Unknown ids are ignored.
    pub fn remove_observer(&self, id: ObserverId) {
        self.observers.lock().unwrap().remove(&id);
    }

    fn mutate(&self, apply: impl FnOnce(&mut BitMatrix)) {
        let mut shared = self.shared.write().unwrap();
        apply(&mut shared.matrix);
        if shared.update_depth == 0 {
            self.notify(Arc::new(shared.matrix.clone()));
        }
    }

    /// Called with the state lock still held, so concurrent mutators
    /// deliver their snapshots in mutation order. The observers lock
    /// always nests inside the state lock.
    fn notify(&self, snapshot: Snapshot) {
        let mut observers = self.observers.lock().unwrap();
        let mut closed = Vec::new();
        for (&id, channel) in observers.iter() {
            match channel.try_send(Arc::clone(&snapshot)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    // lossy by design; the next snapshot supersedes this one
                    debug!("canvas: observer {id} queue full, dropping notification");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => closed.push(id),
            }
        }
        for id in closed {
            debug!("canvas: observer {id} channel closed, pruning");
            observers.remove(&id);
        }
    }
}

/// Scope handle for a batch opened with [`Canvas::begin_update`].
pub struct UpdateGuard<'a> {
    canvas: &'a Canvas,
}

impl Drop for UpdateGuard<'_> {
    fn drop(&mut self) {
        let mut shared = self.canvas.shared.write().unwrap();
        shared.update_depth -= 1;
        if shared.update_depth == 0 {
            self.canvas.notify(Arc::new(shared.matrix.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observed(capacity: usize) -> (Canvas, mpsc::Receiver<Snapshot>, Snapshot) {
        let canvas = Canvas::new(8, 16);
        let (tx, rx) = mpsc::channel(capacity);
        let (_, initial) = canvas.add_observer(tx);
        (canvas, rx, initial)
    }

    #[tokio::test]
    async fn test_add_observer_returns_current_state() {
        let canvas = Canvas::new(4, 4);
        canvas.set(1, 2, true);

        let (tx, _rx) = mpsc::channel(4);
        let (_, initial) = canvas.add_observer(tx);
        assert!(initial.get(1, 2));
        assert!(!initial.get(0, 0));
    }

    #[tokio::test]
    async fn test_each_mutation_notifies() {
        let (canvas, mut rx, _) = observed(8);

        canvas.set(0, 0, true);
        canvas.set(0, 1, true);
        canvas.clear();

        assert!(rx.recv().await.unwrap().get(0, 0));
        let second = rx.recv().await.unwrap();
        assert!(second.get(0, 0) && second.get(0, 1));
        assert!(!rx.recv().await.unwrap().get(0, 0));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_batch_delivers_single_final_notification() {
        let (canvas, mut rx, _) = observed(8);

        {
            let _guard = canvas.begin_update();
            for col in 0..5 {
                canvas.set(3, col, true);
            }
            assert!(rx.try_recv().is_err(), "suppressed while batching");
        }

        let snapshot = rx.recv().await.unwrap();
        for col in 0..5 {
            assert!(snapshot.get(3, col));
        }
        assert!(rx.try_recv().is_err(), "exactly one notification");
    }

    #[tokio::test]
    async fn test_nested_batches_notify_at_outermost_end() {
        let (canvas, mut rx, _) = observed(8);

        let outer = canvas.begin_update();
        canvas.set(0, 0, true);
        {
            let _inner = canvas.begin_update();
            canvas.set(0, 1, true);
        }
        assert!(rx.try_recv().is_err(), "inner end must not notify");
        drop(outer);

        let snapshot = rx.recv().await.unwrap();
        assert!(snapshot.get(0, 0) && snapshot.get(0, 1));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_full_observer_queue_drops_notification() {
        let (canvas, mut rx, _) = observed(1);

        canvas.set(0, 0, true);
        canvas.set(0, 1, true); // dropped, queue is full

        let only = rx.recv().await.unwrap();
        assert!(only.get(0, 0));
        assert!(!only.get(0, 1));
        assert!(rx.try_recv().is_err());

        // delivery resumes once there is room again
        canvas.set(0, 2, true);
        assert!(rx.recv().await.unwrap().get(0, 2));
    }

    #[tokio::test]
    async fn test_remove_observer_stops_delivery() {
        let canvas = Canvas::new(4, 4);
        let (tx, mut rx) = mpsc::channel(4);
        let (id, _) = canvas.add_observer(tx);

        canvas.remove_observer(id);
        canvas.set(0, 0, true);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_write_blits_and_clips() {
        let (canvas, mut rx, _) = observed(8);
        let mut stamp = BitMatrix::new(2, 4);
        stamp.set(0, 0, true);
        stamp.set(1, 3, true);

        canvas.write(&stamp, 7, 14); // clipped to one row, two columns

        let snapshot = rx.recv().await.unwrap();
        assert!(snapshot.get(7, 14));
        assert!(!snapshot.get(7, 15));
    }

    #[tokio::test]
    async fn test_concurrent_mutators_deliver_in_order() {
        let canvas = Arc::new(Canvas::new(16, 16));
        // roomy queue so nothing is dropped and the last delivery is the
        // last mutation
        let (tx, mut rx) = mpsc::channel(512);
        canvas.add_observer(tx);

        let mut writers = Vec::new();
        for t in 0..4usize {
            let canvas = Arc::clone(&canvas);
            writers.push(std::thread::spawn(move || {
                for i in 0..16 {
                    canvas.set(t * 4 + i / 4, (i % 4) * 4 + t, true);
                }
            }));
        }
        for writer in writers {
            writer.join().unwrap();
        }

        let mut last = None;
        while let Ok(snapshot) = rx.try_recv() {
            last = Some(snapshot);
        }
        // snapshots arrive in mutation order, so the final one carries
        // every write
        assert_eq!(*last.unwrap(), *canvas.snapshot());
    }

    #[tokio::test]
    async fn test_snapshot_is_detached_from_canvas() {
        let canvas = Canvas::new(4, 4);
        canvas.set(2, 2, true);
        let snapshot = canvas.snapshot();
        canvas.set(2, 2, false);
        assert!(snapshot.get(2, 2));
        assert!(!canvas.get(2, 2));
    }
}
