//! Bounded undo/redo log over annotation snapshots

use super::annotation::Snapshot;

/// Undo/redo history
///
/// `index` always points at the active snapshot while the log is non-empty.
/// Pushing truncates the redo branch; overflowing `capacity` evicts the oldest
/// entry and shifts `index` so the active snapshot stays the same.
#[derive(Clone, Debug)]
pub struct HistoryStack {
    entries: Vec<Snapshot>,
    index: usize,
    capacity: usize,
}

impl HistoryStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            capacity: capacity.max(1),
        }
    }

    /// Drop every entry and start over from `seed` at index 0
    pub fn reset(&mut self, seed: Snapshot) {
        self.entries.clear();
        self.entries.push(seed);
        self.index = 0;
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        if self.entries.is_empty() {
            self.entries.push(snapshot);
            self.index = 0;
            return;
        }

        // Truncate any redo history
        self.entries.truncate(self.index + 1);
        self.entries.push(snapshot);
        self.index += 1;

        if self.entries.len() > self.capacity {
            self.entries.remove(0);
            self.index -= 1;
        }
    }

    /// Step back; `None` when already at the oldest entry
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.index == 0 || self.entries.is_empty() {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward; `None` when already at the newest entry
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.entries.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }
}
