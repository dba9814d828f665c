//! Linear undo/redo log over full-text snapshots.
//!
//! Every change to the source text is recorded as a complete snapshot. The
//! log keeps a cursor (`index`) into the snapshot list; undo and redo only
//! move the cursor. Recording a new snapshot after undoing truncates the
//! "future" branch first, so redo is never available across a fresh edit.
//!
//! The live text is always read from `snapshots[index]`, which makes the
//! "history matches the buffer" invariant hold by construction.

/// What produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOrigin {
    /// Initial document contents.
    Seed,
    /// Free-form typing in the editor.
    Edit,
    /// Programmatic rewrite (e.g. a direction change).
    Transform,
    /// Text returned by the AI generation endpoint.
    Generated,
}

/// A single entry in the history log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub text: String,
    pub origin: EditOrigin,
}

/// Ordered snapshots plus the current position.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Snapshot>,
    /// Always `< snapshots.len()`.
    index: usize,
}

impl History {
    /// Create a log holding a single seed snapshot.
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            snapshots: vec![Snapshot {
                text: seed.into(),
                origin: EditOrigin::Seed,
            }],
            index: 0,
        }
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.index]
    }

    /// Text of the snapshot at the cursor.
    pub fn current_text(&self) -> &str {
        &self.current().text
    }

    /// Truncate everything after the cursor, append `text`, and move the
    /// cursor onto it.
    pub fn record(&mut self, text: impl Into<String>, origin: EditOrigin) {
        let dropped = self.snapshots.len() - (self.index + 1);
        if dropped > 0 {
            log::debug!("history: discarding {dropped} redo snapshot(s)");
        }
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(Snapshot {
            text: text.into(),
            origin,
        });
        self.index = self.snapshots.len() - 1;
    }

    /// Step back one snapshot. Returns `false` (and changes nothing) at the
    /// start of the log.
    pub fn undo(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Step forward one snapshot. Returns `false` (and changes nothing) at
    /// the end of the log.
    pub fn redo(&mut self) -> bool {
        if self.index + 1 >= self.snapshots.len() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Never true: the log always holds at least the seed.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }
}
