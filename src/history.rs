//! Bounded move history with an undo/redo cursor.
//!
//! ```text
//! entries: [ e0 e1 e2 | e3 e4 ]
//!                     ^ cursor
//!   left of cursor:  applied moves (undoable)
//!   right of cursor: undone moves (redoable)
//! ```

use std::collections::VecDeque;

use crate::Notation;

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct History {
    entries: VecDeque<Notation>,
    cursor: usize,
    capacity: usize,
}

impl History {
    /// Create an empty history keeping at most `capacity` entries.
    /// A capacity of 0 disables recording.
    pub fn new(capacity: usize) -> History {
        History {
            entries: VecDeque::with_capacity(capacity.min(256)),
            cursor: 0,
            capacity,
        }
    }

    /// Create a history whose entries are all redoable.
    pub fn seeded(capacity: usize, entries: Vec<Notation>) -> History {
        History {
            entries: entries.into(),
            cursor: 0,
            capacity,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of applied (undoable) entries.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Total number of stored entries, applied and redoable.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a freshly applied move, dropping any redo tail and evicting
    /// the oldest entries past capacity.
    pub fn record(&mut self, entry: Notation) {
        if !self.is_enabled() {
            self.clear();
            return;
        }
        self.entries.truncate(self.cursor);
        self.entries.push_back(entry);
        self.cursor = self.entries.len();
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
            self.cursor -= 1;
        }
    }

    /// Entry the next undo would revert.
    pub fn peek_undo(&self) -> Option<&Notation> {
        self.cursor.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// Entry the next redo would replay.
    pub fn peek_redo(&self) -> Option<&Notation> {
        self.entries.get(self.cursor)
    }

    /// Move the cursor one entry back. Call after a successful undo.
    pub fn step_back(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Overwrite the entry after the cursor and step over it. Call after a
    /// successful redo, which may capture differently than recorded.
    pub fn replay(&mut self, entry: Notation) {
        if let Some(slot) = self.entries.get_mut(self.cursor) {
            *slot = entry;
            self.cursor += 1;
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Applied entries, oldest first.
    pub fn applied(&self) -> impl Iterator<Item = &Notation> {
        self.entries.iter().take(self.cursor)
    }
}

impl std::fmt::Display for History {
    /// Applied entries joined by spaces.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, entry) in self.applied().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
