//! LineSel / CharSel / ColSel range operations (§4.H, §4.K). Selection
//! modes track `(start_line, start_col)` on the buffer itself
//! (`buf.start_line`, `buf.sel_col`); this module turns that anchor plus
//! the live cursor into the yank/delete/indent operations the dispatcher
//! exposes per mode.

use bim_state::{Buffer, Mode, Result};
use bim_text::Line;

/// A normalized, inclusive, 0-based range between the selection anchor and
/// the live cursor.
#[derive(Debug, Clone, Copy)]
pub struct Range {
    pub l0: usize,
    pub c0: usize,
    pub l1: usize,
    pub c1: usize,
}

/// Normalize `(start_line, sel_col)` vs. `(line_no, col_no)` into an
/// ordered, 0-based range.
pub fn charwise_range(buf: &Buffer) -> Range {
    let a = (buf.start_line.saturating_sub(1), buf.sel_col.saturating_sub(1));
    let b = (buf.cur_idx(), buf.col_idx());
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    Range { l0: lo.0, c0: lo.1, l1: hi.0, c1: hi.1 }
}

pub fn linewise_range(buf: &Buffer) -> (usize, usize) {
    let a = buf.start_line.saturating_sub(1);
    let b = buf.cur_idx();
    if a <= b { (a, b) } else { (b, a) }
}

/// `y` in LineSel: capture the whole selected lines (§4.K "Line-selection
/// yank captures full lines").
pub fn yank_linewise(buf: &Buffer) -> Vec<Line> {
    let (lo, hi) = linewise_range(buf);
    buf.lines()[lo..=hi].to_vec()
}

/// `d`/`D` in LineSel: remove the selected lines, returning what was
/// removed (for the yank register).
pub fn delete_linewise(buf: &mut Buffer) -> Result<Vec<Line>> {
    let (lo, hi) = linewise_range(buf);
    let mut removed = Vec::with_capacity(hi - lo + 1);
    for _ in lo..=hi {
        removed.push(buf.delete_line(lo)?);
    }
    buf.line_no = lo + 1;
    buf.col_no = 1;
    Ok(removed)
}

/// `y` in CharSel: partial first/last lines plus full middle lines.
pub fn yank_charwise(buf: &Buffer) -> Vec<Line> {
    let r = charwise_range(buf);
    capture_charwise(buf, r)
}

fn capture_charwise(buf: &Buffer, r: Range) -> Vec<Line> {
    if r.l0 == r.l1 {
        let line = buf.line(r.l0).expect("range line exists");
        let hi = (r.c1 + 1).min(line.len());
        let text: String = line.cells()[r.c0.min(hi)..hi].iter().map(|c| c.codepoint).collect();
        return vec![Line::from_str(&text)];
    }
    let mut out = Vec::new();
    let first = buf.line(r.l0).expect("range line exists");
    let first_text: String = first.cells()[r.c0.min(first.len())..].iter().map(|c| c.codepoint).collect();
    out.push(Line::from_str(&first_text));
    for idx in (r.l0 + 1)..r.l1 {
        out.push(buf.line(idx).expect("range line exists").clone());
    }
    let last = buf.line(r.l1).expect("range line exists");
    let hi = (r.c1 + 1).min(last.len());
    let last_text: String = last.cells()[..hi].iter().map(|c| c.codepoint).collect();
    out.push(Line::from_str(&last_text));
    out
}

/// `d` in CharSel / `D` in any selection mode: remove the text spanning
/// the range by repeated backspacing from just past its end — this walks
/// through every public cell/line primitive `Buffer` already exposes
/// rather than reaching past them, and naturally merges lines crossed
/// along the way.
pub fn delete_charwise(buf: &mut Buffer) -> Result<()> {
    let r = charwise_range(buf);
    let count = backspace_count(buf, r);
    buf.line_no = r.l1 + 1;
    buf.col_no = r.c1 + 2;
    buf.clamp_cursor();
    for _ in 0..count {
        buf.delete_at_cursor()?;
    }
    Ok(())
}

fn backspace_count(buf: &Buffer, r: Range) -> usize {
    if r.l0 == r.l1 {
        return r.c1 + 1 - r.c0;
    }
    let mut total = buf.line(r.l0).map(|l| l.len()).unwrap_or(0) - r.c0;
    total += 1; // merge across the first line boundary
    for idx in (r.l0 + 1)..r.l1 {
        total += buf.line(idx).map(|l| l.len()).unwrap_or(0) + 1;
    }
    total += r.c1 + 1;
    total
}

/// Column range (0-based, half-open on the high side is avoided — both
/// ends inclusive of the selected visual column) for ColSel/ColInsert.
pub fn column_range(buf: &Buffer) -> (usize, usize, usize) {
    let (lo_line, hi_line) = linewise_range(buf);
    let col = buf.sel_col.min(buf.col_no).saturating_sub(1);
    (lo_line, hi_line, col)
}

/// `y` in ColSel: each selected line's cell at the selected column,
/// captured as a one-cell partial line (best-effort block yank; lines
/// shorter than the column contribute nothing).
pub fn yank_colwise(buf: &Buffer) -> Vec<Line> {
    let (lo, hi, col) = column_range(buf);
    let mut out = Vec::new();
    for idx in lo..=hi {
        if let Some(line) = buf.line(idx) {
            if let Some(cell) = line.cell(col) {
                out.push(Line::from_str(&cell.codepoint.to_string()));
                continue;
            }
        }
        out.push(Line::new());
    }
    out
}

/// `d`/`D` in ColSel: delete the single cell at the selected column on
/// every selected line, where present.
pub fn delete_colwise(buf: &mut Buffer) -> Result<()> {
    let (lo, hi, col) = column_range(buf);
    for idx in lo..=hi {
        let len = buf.line(idx).map(|l| l.len()).unwrap_or(0);
        if col < len {
            buf.line_no = idx + 1;
            buf.col_no = col + 1;
            buf.delete_forward()?;
        }
    }
    buf.line_no = lo + 1;
    buf.col_no = col + 1;
    buf.clamp_cursor();
    Ok(())
}

/// Tab/Shift-Tab in LineSel: indent or outdent every selected line by one
/// step (a tab if `buf.tabs`, else `buf.tabstop` spaces; outdent removes
/// up to one step's worth of leading whitespace).
pub fn indent_lines(buf: &mut Buffer, outdent: bool) -> Result<()> {
    let (lo, hi) = linewise_range(buf);
    let step: String = if buf.tabs { "\t".to_string() } else { " ".repeat(buf.tabstop as usize) };
    for idx in lo..=hi {
        let text = buf.line(idx).map(|l| l.to_string_lossy()).unwrap_or_default();
        let new_text = if outdent {
            strip_one_step(&text, buf.tabstop as usize)
        } else {
            format!("{step}{text}")
        };
        if new_text != text {
            buf.replace_line(idx, Line::from_str(&new_text))?;
        }
    }
    Ok(())
}

fn strip_one_step(text: &str, tabstop: usize) -> String {
    let mut removed = 0usize;
    let mut rest = text;
    while removed < tabstop {
        let mut chars = rest.chars();
        match chars.next() {
            Some('\t') => {
                rest = chars.as_str();
                removed = tabstop;
            }
            Some(' ') => {
                rest = chars.as_str();
                removed += 1;
            }
            _ => break,
        }
    }
    rest.to_string()
}

/// State for ColSel's `I` → ColInsert transition (§4.H): the column and
/// line span a character gets inserted into (or backspaced out of) on
/// every selected line at once.
#[derive(Debug, Clone, Copy)]
pub struct ColInsertState {
    pub top_line: usize,
    pub bottom_line: usize,
    pub col: usize,
}

pub fn enter_col_insert(buf: &Buffer) -> ColInsertState {
    let (lo, hi, col) = column_range(buf);
    ColInsertState { top_line: lo, bottom_line: hi, col }
}

/// Insert `c` at the tracked column on every selected line whose length
/// reaches that column (§4.H "lines where the visual column exceeds the
/// line length are left untouched").
pub fn col_insert_char(buf: &mut Buffer, state: &ColInsertState, c: char) -> Result<()> {
    for idx in state.top_line..=state.bottom_line {
        let len = buf.line(idx).map(|l| l.len()).unwrap_or(0);
        if state.col <= len {
            buf.line_no = idx + 1;
            buf.col_no = state.col + 1;
            buf.insert_char(c)?;
        }
    }
    buf.line_no = state.top_line + 1;
    buf.col_no = state.col + 1;
    Ok(())
}

pub fn col_insert_backspace(buf: &mut Buffer, state: &ColInsertState) -> Result<()> {
    for idx in state.top_line..=state.bottom_line {
        let len = buf.line(idx).map(|l| l.len()).unwrap_or(0);
        if state.col > 0 && state.col <= len {
            buf.line_no = idx + 1;
            buf.col_no = state.col + 1;
            buf.delete_at_cursor()?;
        }
    }
    Ok(())
}

/// Recompute the transient SELECT/SEARCH overlays from the buffer's current
/// mode, selection anchor, and search term (§3 invariant 8): clear every
/// cell, repaint search matches, then either the active selection range or
/// (outside any selection mode) the paren-match partner under the cursor.
/// Also refreshes `is_current` for `hlcurrent`.
pub fn apply_overlays(buf: &mut Buffer, hlparen: bool) {
    for line in buf.lines_mut() {
        line.clear_overlays();
        line.is_current = false;
    }
    if let Some(needle) = buf.search.clone() {
        bim_state::search::highlight_all(buf.lines_mut(), &needle);
    }
    match buf.mode {
        Mode::LineSel => {
            let (lo, hi) = linewise_range(buf);
            for line in &mut buf.lines_mut()[lo..=hi] {
                for cell in line.cells_mut() {
                    cell.set_selected(true);
                }
            }
        }
        Mode::CharSel => mark_charwise_selected(buf),
        Mode::ColSel | Mode::ColInsert => {
            let (lo, hi, col) = column_range(buf);
            for idx in lo..=hi {
                if let Some(cell) = buf.lines_mut().get_mut(idx).and_then(|l| l.cell_mut(col)) {
                    cell.set_selected(true);
                }
            }
        }
        _ => {
            buf.highlighting_paren = hlparen && highlight_paren_partner(buf);
        }
    }
    let idx = buf.cur_idx();
    if let Some(line) = buf.lines_mut().get_mut(idx) {
        line.is_current = true;
    }
}

fn mark_charwise_selected(buf: &mut Buffer) {
    let r = charwise_range(buf);
    if r.l0 == r.l1 {
        if let Some(line) = buf.lines_mut().get_mut(r.l0) {
            let hi = (r.c1 + 1).min(line.len());
            for cell in &mut line.cells_mut()[r.c0.min(hi)..hi] {
                cell.set_selected(true);
            }
        }
        return;
    }
    if let Some(line) = buf.lines_mut().get_mut(r.l0) {
        let len = line.len();
        for cell in &mut line.cells_mut()[r.c0.min(len)..] {
            cell.set_selected(true);
        }
    }
    for idx in (r.l0 + 1)..r.l1 {
        if let Some(line) = buf.lines_mut().get_mut(idx) {
            for cell in line.cells_mut() {
                cell.set_selected(true);
            }
        }
    }
    if let Some(line) = buf.lines_mut().get_mut(r.l1) {
        let hi = (r.c1 + 1).min(line.len());
        for cell in &mut line.cells_mut()[..hi] {
            cell.set_selected(true);
        }
    }
}

/// `%`-style paren highlight (§4.G) for the cursor position: checks the
/// cursor cell, falling back to one cell left (vi's "cursor or one left"
/// rule), and sets `FLAG_SELECT` on the partner it finds. Returns whether a
/// partner was found.
fn highlight_paren_partner(buf: &mut Buffer) -> bool {
    let idx = buf.cur_idx();
    let col = buf.col_idx();
    let target = bim_state::paren::find_match(buf.lines(), idx, col).or_else(|| {
        col.checked_sub(1)
            .and_then(|c| bim_state::paren::find_match(buf.lines(), idx, c))
    });
    match target {
        Some((pl, pc)) => {
            if let Some(cell) = buf.lines_mut().get_mut(pl).and_then(|l| l.cell_mut(pc)) {
                cell.set_selected(true);
            }
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linewise_yank_captures_selected_lines() {
        let mut buf = Buffer::from_text("a\nb\nc\n");
        buf.line_no = 1;
        buf.start_line = 1;
        buf.line_no = 2;
        let yanked = yank_linewise(&buf);
        assert_eq!(yanked.len(), 2);
        assert_eq!(yanked[0].to_string_lossy(), "a");
        assert_eq!(yanked[1].to_string_lossy(), "b");
    }

    #[test]
    fn charwise_delete_merges_across_lines() {
        let mut buf = Buffer::from_text("abc\ndef\n");
        buf.mode = Mode::CharSel;
        buf.start_line = 1;
        buf.sel_col = 2; // 'b'
        buf.line_no = 2;
        buf.col_no = 2; // 'e'
        delete_charwise(&mut buf).unwrap();
        assert_eq!(buf.lines()[0].to_string_lossy(), "af");
    }

    #[test]
    fn column_insert_skips_short_lines() {
        let mut buf = Buffer::from_text("abc\ndef\ngh\n");
        buf.start_line = 1;
        buf.sel_col = 1;
        buf.line_no = 2;
        buf.col_no = 1;
        let state = enter_col_insert(&buf);
        col_insert_char(&mut buf, &state, 'X').unwrap();
        assert_eq!(buf.lines()[0].to_string_lossy(), "Xabc");
        assert_eq!(buf.lines()[1].to_string_lossy(), "Xdef");
        assert_eq!(buf.lines()[2].to_string_lossy(), "gh");
    }

    #[test]
    fn indent_lines_adds_and_removes_one_step() {
        let mut buf = Buffer::from_text("a\nb\n");
        buf.tabs = false;
        buf.tabstop = 4;
        buf.start_line = 1;
        buf.line_no = 2;
        indent_lines(&mut buf, false).unwrap();
        assert_eq!(buf.lines()[0].to_string_lossy(), "    a");
        indent_lines(&mut buf, true).unwrap();
        assert_eq!(buf.lines()[0].to_string_lossy(), "a");
    }

    #[test]
    fn apply_overlays_paints_linewise_selection() {
        let mut buf = Buffer::from_text("a\nb\nc\n");
        buf.mode = Mode::LineSel;
        buf.start_line = 1;
        buf.line_no = 2;
        apply_overlays(&mut buf, true);
        assert!(buf.lines()[0].cell(0).unwrap().is_selected());
        assert!(buf.lines()[1].cell(0).unwrap().is_selected());
        assert!(!buf.lines()[2].cell(0).unwrap().is_selected());
    }

    #[test]
    fn apply_overlays_paints_search_matches() {
        let mut buf = Buffer::from_text("foo bar foo\n");
        buf.search = Some("foo".to_string());
        apply_overlays(&mut buf, true);
        assert!(buf.lines()[0].cell(0).unwrap().is_search_match());
        assert!(buf.lines()[0].cell(8).unwrap().is_search_match());
    }

    #[test]
    fn apply_overlays_paints_paren_partner_outside_selection() {
        let mut buf = Buffer::from_text("(a + b)\n");
        buf.line_no = 1;
        buf.col_no = 1;
        apply_overlays(&mut buf, true);
        assert!(buf.lines()[0].cell(6).unwrap().is_selected());
        assert!(buf.highlighting_paren);
    }

    #[test]
    fn apply_overlays_skips_paren_when_hlparen_disabled() {
        let mut buf = Buffer::from_text("(a + b)\n");
        buf.line_no = 1;
        buf.col_no = 1;
        apply_overlays(&mut buf, false);
        assert!(!buf.lines()[0].cell(6).unwrap().is_selected());
        assert!(!buf.highlighting_paren);
    }
}
