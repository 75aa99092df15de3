//! The undo/redo journal (§4.D): an arena of history records with
//! `Break`-delimited undo-atomic groups, anchored at a `Sentinel`.

use bim_text::Line;
use tracing::trace;

/// One entry in the history arena.
#[derive(Debug, Clone)]
pub enum HistoryRecord {
    /// The oldest point in the journal; never replayed.
    Sentinel,
    /// Delimits an undo-atomic group of edits.
    Break,
    Insert {
        line_idx: usize,
        col_idx: usize,
        new_codepoint: char,
    },
    Delete {
        line_idx: usize,
        col_idx: usize,
        old_codepoint: char,
    },
    Replace {
        line_idx: usize,
        col_idx: usize,
        new_codepoint: char,
        old_codepoint: char,
    },
    AddLine {
        line_idx: usize,
        new_line: Line,
    },
    RemoveLine {
        line_idx: usize,
        old_line: Line,
    },
    ReplaceLine {
        line_idx: usize,
        old_line: Line,
        new_line: Line,
    },
    SplitLine {
        line_idx: usize,
        split_col: usize,
    },
    MergeLines {
        line_idx: usize,
        split_col: usize,
    },
}

/// Doubly-linked (by index) arena of history records (§9 Design Notes:
/// "represent as an arena of records with previous/next index links").
/// Truncation on a divergent edit truncates the vector tail rather than
/// reclaiming slots, matching "free the orphan range" while staying safe.
#[derive(Clone, Debug)]
pub struct History {
    records: Vec<HistoryRecord>,
    /// Index of the current position (the last record that has been applied).
    pos: usize,
    /// Position at the time of the last save, for `modified` tracking.
    last_save_pos: usize,
}

impl History {
    pub fn new() -> Self {
        Self {
            records: vec![HistoryRecord::Sentinel],
            pos: 0,
            last_save_pos: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn modified(&self) -> bool {
        self.pos != self.last_save_pos
    }

    pub fn mark_saved(&mut self) {
        self.last_save_pos = self.pos;
    }

    /// Append a record, truncating any redo-able tail (divergent branch).
    pub fn push(&mut self, record: HistoryRecord) {
        if self.pos + 1 < self.records.len() {
            trace!(target: "state.history", truncated_from = self.pos + 1, old_len = self.records.len(), "history_truncate_divergent");
            self.records.truncate(self.pos + 1);
        }
        self.records.push(record);
        self.pos += 1;
        trace!(target: "state.history", pos = self.pos, "history_push");
    }

    pub fn push_break(&mut self) {
        // Never push two Breaks (or a Break right after Sentinel) back to back.
        if matches!(self.records.get(self.pos), Some(HistoryRecord::Break) | Some(HistoryRecord::Sentinel)) {
            return;
        }
        self.push(HistoryRecord::Break);
    }

    pub fn can_undo(&self) -> bool {
        self.pos > 0
    }

    pub fn can_redo(&self) -> bool {
        self.pos + 1 < self.records.len()
    }

    /// Walk backwards applying `apply_inverse` to each record until (but not
    /// including) the previous `Break`/`Sentinel`. Returns the number of
    /// records undone.
    pub fn undo_group<F: FnMut(&HistoryRecord)>(&mut self, mut apply_inverse: F) -> usize {
        let mut count = 0;
        if self.pos == 0 {
            return 0;
        }
        if matches!(self.records[self.pos], HistoryRecord::Break) {
            self.pos -= 1;
        }
        while self.pos > 0 && !matches!(self.records[self.pos], HistoryRecord::Break) {
            apply_inverse(&self.records[self.pos].clone());
            self.pos -= 1;
            count += 1;
        }
        trace!(target: "state.history", pos = self.pos, count, "history_undo_group");
        count
    }

    /// Walk forward re-applying records until (and including) the next `Break`.
    pub fn redo_group<F: FnMut(&HistoryRecord)>(&mut self, mut apply_forward: F) -> usize {
        let mut count = 0;
        if self.pos + 1 >= self.records.len() {
            return 0;
        }
        if matches!(self.records[self.pos + 1], HistoryRecord::Break) {
            self.pos += 1;
        }
        while self.pos + 1 < self.records.len() && !matches!(self.records[self.pos + 1], HistoryRecord::Break) {
            self.pos += 1;
            apply_forward(&self.records[self.pos].clone());
            count += 1;
        }
        if self.pos + 1 < self.records.len() && matches!(self.records[self.pos + 1], HistoryRecord::Break) {
            self.pos += 1;
        }
        trace!(target: "state.history", pos = self.pos, count, "history_redo_group");
        count
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_history_cannot_undo_or_redo() {
        let h = History::new();
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert!(!h.modified());
    }

    #[test]
    fn push_and_undo_updates_modified() {
        let mut h = History::new();
        h.push(HistoryRecord::Insert {
            line_idx: 0,
            col_idx: 0,
            new_codepoint: 'a',
        });
        h.push_break();
        assert!(h.modified());
        h.mark_saved();
        assert!(!h.modified());
    }

    #[test]
    fn divergent_push_truncates_redo_tail() {
        let mut h = History::new();
        h.push(HistoryRecord::Insert {
            line_idx: 0,
            col_idx: 0,
            new_codepoint: 'a',
        });
        h.push_break();
        h.undo_group(|_| {});
        assert!(h.can_redo());
        h.push(HistoryRecord::Insert {
            line_idx: 0,
            col_idx: 0,
            new_codepoint: 'b',
        });
        assert!(!h.can_redo());
    }
}
