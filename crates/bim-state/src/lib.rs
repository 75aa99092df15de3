//! The document model (§4.C): an ordered, always-nonempty sequence of
//! [`Line`]s plus cursor, viewport, mode, file metadata, search term, and
//! undo journal. This crate also hosts the history journal (§4.D),
//! search/replace (§4.F), the paren matcher (§4.G), and the yank register
//! (§4.K) — the pieces of the engine that operate directly on buffer text.

pub mod history;
pub mod paren;
pub mod search;
pub mod yank;

use bim_text::{Cell, Line};
use history::{History, HistoryRecord};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace};

pub use search::Direction;
pub use yank::Yank;

#[derive(Debug, Error)]
pub enum BimError {
    #[error("buffer is readonly")]
    Readonly,
    #[error("could not open {path}: {source}")]
    IoOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error: {0}")]
    ParseCommand(String),
    #[error("pattern not found")]
    PatternNotFound,
    #[error("already at {0}")]
    HistoryExhausted(&'static str),
    #[error("unrecognized escape sequence")]
    UnrecognizedEscape,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, BimError>;

/// The active keystroke dispatch table (§4.H / GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
    Replace,
    LineSel,
    CharSel,
    ColSel,
    ColInsert,
    Command,
    Search(Direction),
}

/// An open document (§3 Buffer).
#[derive(Debug, Clone)]
pub struct Buffer {
    lines: Vec<Line>,
    pub mode: Mode,
    pub file_name: Option<PathBuf>,
    pub readonly: bool,
    pub tabs: bool,
    pub tabstop: u8,
    pub indent: bool,
    pub offset: usize,
    pub coffset: usize,
    /// 1-based.
    pub line_no: usize,
    /// 1-based.
    pub col_no: usize,
    pub preferred_column: usize,
    pub search: Option<String>,
    pub syntax_name: Option<String>,
    pub history: History,
    pub width: u16,
    pub left: u16,
    pub start_line: usize,
    pub sel_col: usize,
    pub highlighting_paren: bool,
    /// Buffer-load mode: history/rev_status tracking is suppressed while true.
    loading: bool,
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            lines: vec![Line::new()],
            mode: Mode::Normal,
            file_name: None,
            readonly: false,
            tabs: false,
            tabstop: 8,
            indent: true,
            offset: 0,
            coffset: 0,
            line_no: 1,
            col_no: 1,
            preferred_column: 1,
            search: None,
            syntax_name: None,
            history: History::new(),
            width: 0,
            left: 0,
            start_line: 1,
            sel_col: 1,
            highlighting_paren: false,
            loading: false,
        }
    }

    pub fn from_text(text: &str) -> Self {
        let mut buf = Self::new();
        buf.loading = true;
        buf.lines = if text.is_empty() {
            vec![Line::new()]
        } else {
            text.lines().map(Line::from_str).collect()
        };
        if buf.lines.is_empty() {
            buf.lines.push(Line::new());
        }
        buf.retab_all();
        buf.loading = false;
        buf
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| BimError::IoOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let mut buf = Self::from_text(&content);
        buf.file_name = Some(path.to_path_buf());
        debug!(target: "state.buffer", path = %path.display(), lines = buf.lines.len(), "buffer_opened");
        Ok(buf)
    }

    pub fn reload(&mut self) -> Result<()> {
        let path = self.file_name.clone().ok_or_else(|| {
            BimError::ParseCommand("no file name associated with buffer".into())
        })?;
        let content = std::fs::read_to_string(&path).map_err(|source| BimError::IoOpen {
            path: path.clone(),
            source,
        })?;
        self.loading = true;
        self.lines = if content.is_empty() {
            vec![Line::new()]
        } else {
            content.lines().map(Line::from_str).collect()
        };
        self.retab_all();
        self.loading = false;
        self.line_no = self.line_no.min(self.lines.len()).max(1);
        self.clamp_cursor();
        Ok(())
    }

    /// Write the buffer to `path` (or its associated file name), returning
    /// bytes written, and mark the history position as saved (§3 Lifecycles).
    pub fn write(&mut self, path: Option<&Path>) -> Result<usize> {
        let target = match path.or(self.file_name.as_deref()) {
            Some(p) => p.to_path_buf(),
            None => {
                return Err(BimError::ParseCommand("no file name".into()));
            }
        };
        let mut content = String::new();
        for line in &self.lines {
            content.push_str(&line.to_string_lossy());
            content.push('\n');
        }
        std::fs::write(&target, &content).map_err(|source| BimError::IoWrite {
            path: target.clone(),
            source,
        })?;
        if path.is_some() {
            self.file_name = Some(target);
        }
        self.history.mark_saved();
        Ok(content.len())
    }

    pub fn modified(&self) -> bool {
        self.history.modified()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [Line] {
        &mut self.lines
    }

    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    /// 0-based current line index.
    pub fn cur_idx(&self) -> usize {
        self.line_no.saturating_sub(1).min(self.lines.len().saturating_sub(1))
    }

    /// 0-based current column index.
    pub fn col_idx(&self) -> usize {
        self.col_no.saturating_sub(1)
    }

    fn retab_all(&mut self) {
        let tabstop = self.tabstop;
        for line in &mut self.lines {
            line.recompute_tab_widths(tabstop);
        }
    }

    /// §3 invariant 3: clamp the cursor into valid range for the current mode.
    pub fn clamp_cursor(&mut self) {
        let max_line = self.lines.len();
        if self.line_no < 1 {
            self.line_no = 1;
        }
        if self.line_no > max_line {
            self.line_no = max_line;
        }
        let actual = self.lines[self.cur_idx()].len();
        let max_col = if matches!(self.mode, Mode::Insert | Mode::ColInsert) {
            actual + 1
        } else {
            actual.max(1)
        };
        if self.col_no < 1 {
            self.col_no = 1;
        }
        if self.col_no > max_col {
            self.col_no = max_col;
        }
    }

    fn push_record(&mut self, record: HistoryRecord) {
        if self.loading {
            return;
        }
        self.history.push(record);
    }

    pub fn push_break(&mut self) {
        if self.loading {
            return;
        }
        self.history.push_break();
    }

    // ---- Cell-level editing primitives (§4.C) -----------------------

    /// Insert `c` at the cursor (Insert-mode typing). Advances the cursor.
    pub fn insert_char(&mut self, c: char) -> Result<()> {
        if self.readonly {
            return Err(BimError::Readonly);
        }
        let (line_idx, col_idx) = (self.cur_idx(), self.col_idx());
        self.lines[line_idx].insert(col_idx, Cell::new(c));
        self.lines[line_idx].recompute_tab_widths(self.tabstop);
        self.push_record(HistoryRecord::Insert {
            line_idx,
            col_idx,
            new_codepoint: c,
        });
        self.col_no += 1;
        Ok(())
    }

    /// Backspace: delete the cell before the cursor, merging with the
    /// previous line if at column 1.
    pub fn delete_at_cursor(&mut self) -> Result<()> {
        if self.readonly {
            return Err(BimError::Readonly);
        }
        let line_idx = self.cur_idx();
        if self.col_no > 1 {
            let col_idx = self.col_idx() - 1;
            if let Some(old) = self.lines[line_idx].delete(col_idx) {
                self.lines[line_idx].recompute_tab_widths(self.tabstop);
                self.push_record(HistoryRecord::Delete {
                    line_idx,
                    col_idx,
                    old_codepoint: old.codepoint,
                });
                self.col_no -= 1;
            }
        } else if line_idx > 0 {
            let split_col = self.lines[line_idx - 1].len();
            self.merge_lines(line_idx - 1);
            self.line_no -= 1;
            self.col_no = split_col + 1;
        }
        Ok(())
    }

    /// Normal-mode `x`: delete the cell under the cursor.
    pub fn delete_forward(&mut self) -> Result<()> {
        if self.readonly {
            return Err(BimError::Readonly);
        }
        let line_idx = self.cur_idx();
        let col_idx = self.col_idx();
        if let Some(old) = self.lines[line_idx].delete(col_idx) {
            self.lines[line_idx].recompute_tab_widths(self.tabstop);
            self.push_record(HistoryRecord::Delete {
                line_idx,
                col_idx,
                old_codepoint: old.codepoint,
            });
            self.clamp_cursor();
        }
        Ok(())
    }

    /// Normal-mode `r<x>`: replace the cell under the cursor in place.
    pub fn replace_char(&mut self, c: char) -> Result<()> {
        if self.readonly {
            return Err(BimError::Readonly);
        }
        let line_idx = self.cur_idx();
        let col_idx = self.col_idx();
        if let Some(old) = self.lines[line_idx].replace(col_idx, Cell::new(c)) {
            self.lines[line_idx].recompute_tab_widths(self.tabstop);
            self.push_record(HistoryRecord::Replace {
                line_idx,
                col_idx,
                new_codepoint: c,
                old_codepoint: old.codepoint,
            });
        }
        Ok(())
    }

    /// Enter: split the current line at the cursor, honoring the §4.C
    /// auto-indent rules.
    pub fn insert_line_feed(&mut self) -> Result<()> {
        if self.readonly {
            return Err(BimError::Readonly);
        }
        let line_idx = self.cur_idx();
        let col_idx = self.col_idx();
        self.split_line(line_idx, col_idx);
        self.push_record(HistoryRecord::SplitLine { line_idx, split_col: col_idx });

        if self.indent {
            let indent_text = self.compute_auto_indent(line_idx);
            self.line_no += 1;
            self.col_no = 1;
            for c in indent_text.chars() {
                self.insert_char(c)?;
            }
            // If the previous (now-split-off-from) line is pure whitespace,
            // clear its trailing whitespace (§4.C rule 4).
            if self.lines[line_idx].to_string_lossy().trim().is_empty() {
                while self.lines[line_idx].len() > 0 {
                    let last = self.lines[line_idx].len() - 1;
                    if let Some(old) = self.lines[line_idx].delete(last) {
                        self.push_record(HistoryRecord::Delete {
                            line_idx,
                            col_idx: last,
                            old_codepoint: old.codepoint,
                        });
                    }
                }
            }
        } else {
            self.line_no += 1;
            self.col_no = 1;
        }
        Ok(())
    }

    /// §4.C auto-indent: copy previous line's leading whitespace, extend a
    /// block comment continuation, or add one indent step after `{`/`:`.
    fn compute_auto_indent(&self, prev_line_idx: usize) -> String {
        let prev = &self.lines[prev_line_idx];
        let prev_text = prev.to_string_lossy();
        let leading: String = prev_text.chars().take_while(|c| *c == ' ' || *c == '\t').collect();

        let trimmed = prev_text.trim_start();
        if trimmed.starts_with("/*") || trimmed.starts_with("* ") || trimmed == "*" {
            return format!("{leading} * ");
        }

        let stripped = prev_text.trim_end();
        let mut indent = leading;
        if stripped.ends_with('{') || stripped.ends_with(':') {
            if self.tabs {
                indent.push('\t');
            } else {
                for _ in 0..self.tabstop {
                    indent.push(' ');
                }
            }
        }
        indent
    }

    /// Split `lines[line_idx]` at `col`, inserting the tail as a new line
    /// immediately after it.
    fn split_line(&mut self, line_idx: usize, col: usize) {
        let tail = self.lines[line_idx].split(col);
        self.lines[line_idx].recompute_tab_widths(self.tabstop);
        self.lines.insert(line_idx + 1, tail);
    }

    /// Merge `lines[line_idx + 1]` onto the end of `lines[line_idx]`,
    /// removing it from the vector (the inverse of `split_line`).
    fn merge_lines(&mut self, line_idx: usize) {
        if line_idx + 1 >= self.lines.len() {
            return;
        }
        let split_col = self.lines[line_idx].len();
        let next = self.lines.remove(line_idx + 1);
        self.lines[line_idx].merge(next);
        self.lines[line_idx].recompute_tab_widths(self.tabstop);
        self.push_record(HistoryRecord::MergeLines { line_idx, split_col });
    }

    /// `dd`: remove and return the whole line at `line_idx`, always leaving
    /// at least one (possibly empty) line behind (§3 invariant 1).
    pub fn delete_line(&mut self, line_idx: usize) -> Result<Line> {
        if self.readonly {
            return Err(BimError::Readonly);
        }
        if self.lines.len() == 1 {
            // No line is actually removed here, just emptied in place, so the
            // undo record must match (a `RemoveLine` inverse would insert a
            // second line instead of restoring the original single line).
            let old_line = std::mem::replace(&mut self.lines[0], Line::new());
            self.push_record(HistoryRecord::ReplaceLine {
                line_idx: 0,
                old_line: old_line.clone(),
                new_line: self.lines[0].clone(),
            });
            self.clamp_cursor();
            return Ok(old_line);
        }
        let old_line = self.lines.remove(line_idx.min(self.lines.len() - 1));
        self.push_record(HistoryRecord::RemoveLine {
            line_idx: line_idx.min(self.lines.len()),
            old_line: old_line.clone(),
        });
        self.clamp_cursor();
        Ok(old_line)
    }

    /// `p`/`P`/`O`/`o`: insert a whole line at `line_idx`.
    pub fn insert_line(&mut self, line_idx: usize, line: Line) -> Result<()> {
        if self.readonly {
            return Err(BimError::Readonly);
        }
        let idx = line_idx.min(self.lines.len());
        self.lines.insert(idx, line.clone());
        self.push_record(HistoryRecord::AddLine { line_idx: idx, new_line: line });
        Ok(())
    }

    pub fn replace_line(&mut self, line_idx: usize, new_line: Line) -> Result<()> {
        if self.readonly {
            return Err(BimError::Readonly);
        }
        if let Some(slot) = self.lines.get_mut(line_idx) {
            let old_line = std::mem::replace(slot, new_line.clone());
            self.push_record(HistoryRecord::ReplaceLine { line_idx, old_line, new_line });
        }
        Ok(())
    }

    // ---- Motions (§4.C) ------------------------------------------------

    /// vi-style word-right: skip trailing whitespace, then skip one class
    /// of word characters (or one punctuation run).
    pub fn word_right(&mut self) {
        let line_idx = self.cur_idx();
        let line = &self.lines[line_idx];
        let mut col = self.col_idx();
        let text: Vec<char> = line.to_string_lossy().chars().collect();
        if col >= text.len() {
            if line_idx + 1 < self.lines.len() {
                self.line_no += 1;
                self.col_no = 1;
            }
            return;
        }
        let starting_word = is_word_char(text[col]);
        while col < text.len() && same_class(text[col], starting_word) {
            col += 1;
        }
        while col < text.len() && text[col].is_whitespace() {
            col += 1;
        }
        self.col_no = col + 1;
        self.clamp_cursor();
    }

    pub fn word_left(&mut self) {
        let line_idx = self.cur_idx();
        let line = &self.lines[line_idx];
        let text: Vec<char> = line.to_string_lossy().chars().collect();
        let mut col = self.col_idx();
        if col == 0 {
            if line_idx > 0 {
                self.line_no -= 1;
                self.col_no = self.lines[line_idx - 1].len() + 1;
            }
            return;
        }
        col -= 1;
        while col > 0 && text[col].is_whitespace() {
            col -= 1;
        }
        if col < text.len() {
            let starting_word = is_word_char(text[col]);
            while col > 0 && same_class(text[col - 1], starting_word) {
                col -= 1;
            }
        }
        self.col_no = col + 1;
        self.clamp_cursor();
    }

    pub fn goto_line(&mut self, line: usize) {
        self.line_no = line.clamp(1, self.lines.len());
        self.col_no = 1;
    }

    // ---- Config mutators (§6 colon commands) --------------------------

    pub fn set_tabs(&mut self, tabs: bool) {
        self.tabs = tabs;
        self.retab_all();
    }

    pub fn set_tabstop(&mut self, tabstop: u8) {
        self.tabstop = tabstop.max(1);
        self.retab_all();
    }

    pub fn set_indent(&mut self, indent: bool) {
        self.indent = indent;
    }

    // ---- Undo / redo (§4.D) --------------------------------------------

    pub fn undo(&mut self) -> Result<()> {
        let lines = &mut self.lines;
        let count = self.history.undo_group(|record| apply_inverse(lines, record));
        if count == 0 {
            return Err(BimError::HistoryExhausted("oldest change"));
        }
        self.retab_all();
        self.clamp_cursor();
        trace!(target: "state.undo", count, "undo_applied");
        Ok(())
    }

    pub fn redo(&mut self) -> Result<()> {
        let lines = &mut self.lines;
        let count = self.history.redo_group(|record| apply_forward(lines, record));
        if count == 0 {
            return Err(BimError::HistoryExhausted("newest change"));
        }
        self.retab_all();
        self.clamp_cursor();
        trace!(target: "state.undo", count, "redo_applied");
        Ok(())
    }

    // ---- Overlay recompute (§3 invariant 8) ----------------------------

    pub fn clear_overlays(&mut self) {
        for line in &mut self.lines {
            line.clear_overlays();
        }
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn same_class(c: char, is_word: bool) -> bool {
    if c.is_whitespace() {
        false
    } else {
        is_word_char(c) == is_word
    }
}

fn apply_inverse(lines: &mut Vec<Line>, record: &HistoryRecord) {
    match record {
        HistoryRecord::Sentinel | HistoryRecord::Break => {}
        HistoryRecord::Insert { line_idx, col_idx, .. } => {
            if let Some(line) = lines.get_mut(*line_idx) {
                line.delete(*col_idx);
            }
        }
        HistoryRecord::Delete { line_idx, col_idx, old_codepoint } => {
            if let Some(line) = lines.get_mut(*line_idx) {
                line.insert(*col_idx, Cell::new(*old_codepoint));
            }
        }
        HistoryRecord::Replace { line_idx, col_idx, old_codepoint, .. } => {
            if let Some(line) = lines.get_mut(*line_idx) {
                line.replace(*col_idx, Cell::new(*old_codepoint));
            }
        }
        HistoryRecord::AddLine { line_idx, .. } => {
            if *line_idx < lines.len() && lines.len() > 1 {
                lines.remove(*line_idx);
            } else if lines.len() == 1 {
                lines[0] = Line::new();
            }
        }
        HistoryRecord::RemoveLine { line_idx, old_line } => {
            let idx = (*line_idx).min(lines.len());
            lines.insert(idx, old_line.clone());
        }
        HistoryRecord::ReplaceLine { line_idx, old_line, .. } => {
            if let Some(slot) = lines.get_mut(*line_idx) {
                *slot = old_line.clone();
            }
        }
        HistoryRecord::SplitLine { line_idx, .. } => {
            if line_idx + 1 < lines.len() {
                let next = lines.remove(line_idx + 1);
                lines[*line_idx].merge(next);
            }
        }
        HistoryRecord::MergeLines { line_idx, split_col } => {
            if let Some(line) = lines.get_mut(*line_idx) {
                let tail = line.split(*split_col);
                lines.insert(line_idx + 1, tail);
            }
        }
    }
}

fn apply_forward(lines: &mut Vec<Line>, record: &HistoryRecord) {
    match record {
        HistoryRecord::Sentinel | HistoryRecord::Break => {}
        HistoryRecord::Insert { line_idx, col_idx, new_codepoint } => {
            if let Some(line) = lines.get_mut(*line_idx) {
                line.insert(*col_idx, Cell::new(*new_codepoint));
            }
        }
        HistoryRecord::Delete { line_idx, col_idx, .. } => {
            if let Some(line) = lines.get_mut(*line_idx) {
                line.delete(*col_idx);
            }
        }
        HistoryRecord::Replace { line_idx, col_idx, new_codepoint, .. } => {
            if let Some(line) = lines.get_mut(*line_idx) {
                line.replace(*col_idx, Cell::new(*new_codepoint));
            }
        }
        HistoryRecord::AddLine { line_idx, new_line } => {
            let idx = (*line_idx).min(lines.len());
            lines.insert(idx, new_line.clone());
        }
        HistoryRecord::RemoveLine { line_idx, .. } => {
            if lines.len() > 1 {
                lines.remove((*line_idx).min(lines.len() - 1));
            } else {
                lines[0] = Line::new();
            }
        }
        HistoryRecord::ReplaceLine { line_idx, new_line, .. } => {
            if let Some(slot) = lines.get_mut(*line_idx) {
                *slot = new_line.clone();
            }
        }
        HistoryRecord::SplitLine { line_idx, split_col } => {
            if let Some(line) = lines.get_mut(*line_idx) {
                let tail = line.split(*split_col);
                lines.insert(line_idx + 1, tail);
            }
        }
        HistoryRecord::MergeLines { line_idx, .. } => {
            if line_idx + 1 < lines.len() {
                let next = lines.remove(line_idx + 1);
                lines[*line_idx].merge(next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_always_has_at_least_one_line() {
        let mut buf = Buffer::from_text("a\nb\nc\n");
        buf.delete_line(0).unwrap();
        buf.delete_line(0).unwrap();
        buf.delete_line(0).unwrap();
        assert_eq!(buf.line_count(), 1);
    }

    #[test]
    fn deleting_the_last_remaining_line_then_undoing_restores_a_single_line() {
        let mut buf = Buffer::from_text("a");
        assert_eq!(buf.line_count(), 1);
        buf.delete_line(0).unwrap();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.lines()[0].to_string_lossy(), "");
        buf.undo().unwrap();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.lines()[0].to_string_lossy(), "a");
    }

    #[test]
    fn insert_then_undo_restores_text() {
        let mut buf = Buffer::from_text("hello");
        buf.line_no = 1;
        buf.col_no = 6;
        buf.mode = Mode::Insert;
        for c in " world".chars() {
            buf.insert_char(c).unwrap();
        }
        buf.push_break();
        assert_eq!(buf.lines()[0].to_string_lossy(), "hello world");
        buf.undo().unwrap();
        assert_eq!(buf.lines()[0].to_string_lossy(), "hello");
    }

    #[test]
    fn modified_tracks_history_position() {
        let mut buf = Buffer::from_text("hello");
        assert!(!buf.modified());
        buf.col_no = 1;
        buf.mode = Mode::Insert;
        buf.insert_char('X').unwrap();
        assert!(buf.modified());
        buf.push_break();
        buf.undo().unwrap();
        assert!(!buf.modified());
    }

    #[test]
    fn dd_then_undo_round_trips() {
        let mut buf = Buffer::from_text("a\nb\nc\n");
        buf.line_no = 2;
        let removed = buf.delete_line(1).unwrap();
        buf.push_break();
        assert_eq!(removed.to_string_lossy(), "b");
        assert_eq!(buf.line_count(), 2);
        buf.undo().unwrap();
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.lines()[1].to_string_lossy(), "b");
    }

    #[test]
    fn word_motions_skip_whitespace_then_word_class() {
        let mut buf = Buffer::from_text("foo bar baz");
        buf.col_no = 1;
        buf.word_right();
        assert_eq!(buf.col_no, 5); // at 'b' of bar
        buf.word_right();
        assert_eq!(buf.col_no, 9); // at 'b' of baz
        buf.word_left();
        assert_eq!(buf.col_no, 5);
    }

    #[test]
    fn backspace_merges_lines_at_column_one() {
        let mut buf = Buffer::from_text("ab\ncd");
        buf.line_no = 2;
        buf.col_no = 1;
        buf.mode = Mode::Insert;
        buf.delete_at_cursor().unwrap();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.lines()[0].to_string_lossy(), "abcd");
        assert_eq!(buf.line_no, 1);
        assert_eq!(buf.col_no, 3);
    }
}

