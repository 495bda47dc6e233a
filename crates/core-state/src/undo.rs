//! Bounded reversible edit history.
//!
//! Every edit operation pushes exactly one record describing the bytes it
//! inserted or removed. The history is a single sequence with a cursor:
//! records up to `applied` have been applied to the buffer, records after it
//! form the redo queue. A new push discards the redo queue; when the history
//! exceeds [`MAX_UNDO_LEVELS`] the oldest record is evicted.

use core_text::GapBuffer;
use std::collections::VecDeque;
use tracing::trace;

/// Maximum number of records retained.
pub const MAX_UNDO_LEVELS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    Delete,
    /// Applied as delete-then-insert of the record's own bytes. Present for
    /// completeness; no edit operation currently emits it.
    Replace,
}

/// One reversible edit. The record owns the exact bytes that were inserted
/// or removed at `pos`.
#[derive(Debug, Clone)]
pub struct EditRecord {
    pub kind: EditKind,
    pub pos: usize,
    pub text: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct UndoStack {
    records: VecDeque<EditRecord>,
    /// Number of records currently applied to the buffer. Everything at
    /// `applied..` is the redo queue.
    applied: usize,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records that can be undone.
    pub fn undo_depth(&self) -> usize {
        self.applied
    }

    /// Number of records that can be redone.
    pub fn redo_depth(&self) -> usize {
        self.records.len() - self.applied
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.applied = 0;
    }

    /// Record an edit that was just applied to the buffer. Discards the redo
    /// queue and evicts the oldest record past the cap.
    pub fn push(&mut self, kind: EditKind, pos: usize, text: &[u8]) {
        if text.is_empty() {
            return;
        }
        self.records.truncate(self.applied);
        self.records.push_back(EditRecord {
            kind,
            pos,
            text: text.to_vec(),
        });
        self.applied = self.records.len();
        while self.records.len() > MAX_UNDO_LEVELS {
            self.records.pop_front();
            self.applied -= 1;
        }
        trace!(target: "state.undo", ?kind, pos, len = text.len(), depth = self.applied, "push");
    }

    /// Apply the inverse of the newest applied record to `buffer`.
    ///
    /// The buffer's modified flag afterwards reflects whether any applied
    /// records remain. Returns false when there is nothing to undo.
    pub fn undo(&mut self, buffer: &mut GapBuffer) -> bool {
        if self.applied == 0 {
            return false;
        }
        let rec = &self.records[self.applied - 1];
        match rec.kind {
            EditKind::Insert => buffer.delete(rec.pos, rec.text.len()),
            EditKind::Delete => {
                if !buffer.insert(rec.pos, &rec.text) {
                    return false;
                }
            }
            EditKind::Replace => {
                buffer.delete(rec.pos, rec.text.len());
                if !buffer.insert(rec.pos, &rec.text) {
                    return false;
                }
            }
        }
        self.applied -= 1;
        buffer.set_modified(self.applied > 0);
        trace!(target: "state.undo", depth = self.applied, redo = self.redo_depth(), "undo");
        true
    }

    /// Re-apply the oldest record in the redo queue.
    pub fn redo(&mut self, buffer: &mut GapBuffer) -> bool {
        if self.applied == self.records.len() {
            return false;
        }
        let rec = &self.records[self.applied];
        match rec.kind {
            EditKind::Insert => {
                if !buffer.insert(rec.pos, &rec.text) {
                    return false;
                }
            }
            EditKind::Delete => buffer.delete(rec.pos, rec.text.len()),
            EditKind::Replace => {
                buffer.delete(rec.pos, rec.text.len());
                if !buffer.insert(rec.pos, &rec.text) {
                    return false;
                }
            }
        }
        self.applied += 1;
        trace!(target: "state.undo", depth = self.applied, redo = self.redo_depth(), "redo");
        true
    }
}
