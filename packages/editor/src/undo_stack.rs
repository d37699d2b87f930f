//! # Undo Stack
//!
//! Linear history of whole-document snapshots.
//!
//! ## Design
//!
//! - Before each committed write the previous document is recorded
//! - Undo pops the latest snapshot; the store installs it as-is
//! - Snapshots are `Arc<Document>` whose entities are themselves shared, so
//!   a snapshot costs one pointer per entity, not a deep copy
//! - Depth is bounded; the oldest snapshot is dropped first
//! - Pausing records one snapshot up front and then ignores writes until
//!   every pause has been resumed (drag gestures become one undo step)
//!
//! There is no redo stack.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! stack.record(Arc::clone(&doc));
//!
//! stack.pause(Arc::clone(&doc));
//! stack.record(Arc::clone(&doc)); // ignored while paused
//! stack.resume();
//!
//! let previous = stack.pop();
//! ```

use notegraph_model::Document;
use std::collections::VecDeque;
use std::sync::Arc;

/// Default number of undo levels
pub const DEFAULT_UNDO_LIMIT: usize = 50;

#[derive(Debug)]
pub struct UndoStack {
    /// Snapshots, most recent last
    snapshots: VecDeque<Arc<Document>>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Outstanding `pause` calls
    pause_depth: usize,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (50)
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_UNDO_LIMIT)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            max_levels,
            pause_depth: 0,
        }
    }

    /// Record the document as it was before a write. Ignored while paused.
    pub fn record(&mut self, previous: Arc<Document>) {
        if self.pause_depth > 0 {
            return;
        }
        self.push(previous);
    }

    /// Start (or nest) a coalesced burst. Only the outermost call snapshots.
    pub fn pause(&mut self, current: Arc<Document>) {
        if self.pause_depth == 0 {
            self.push(current);
        }
        self.pause_depth += 1;
    }

    pub fn resume(&mut self) {
        self.pause_depth = self.pause_depth.saturating_sub(1);
    }

    pub fn is_paused(&self) -> bool {
        self.pause_depth > 0
    }

    pub fn pop(&mut self) -> Option<Arc<Document>> {
        self.snapshots.pop_back()
    }

    pub fn can_undo(&self) -> bool {
        !self.snapshots.is_empty()
    }

    /// Get the number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.snapshots.len()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.pause_depth = 0;
    }

    fn push(&mut self, snapshot: Arc<Document>) {
        self.snapshots.push_back(snapshot);

        if self.max_levels > 0 && self.snapshots.len() > self.max_levels {
            self.snapshots.pop_front();
        }
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
