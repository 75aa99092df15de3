//! Cursor motions for Normal mode (§4.H "Other normal keys are
//! navigation"). Pure cursor-field manipulation; none of these append
//! history records.

use bim_state::Buffer;

pub fn left(buf: &mut Buffer, count: usize) {
    for _ in 0..count.max(1) {
        if buf.col_no > 1 {
            buf.col_no -= 1;
        }
    }
    buf.preferred_column = buf.col_no;
}

pub fn right(buf: &mut Buffer, count: usize) {
    let max_col = buf.line(buf.cur_idx()).map(|l| l.len()).unwrap_or(0).max(1);
    for _ in 0..count.max(1) {
        if buf.col_no < max_col {
            buf.col_no += 1;
        }
    }
    buf.preferred_column = buf.col_no;
}

/// `a`: like `right`, but allowed to land one past the last character so
/// insertion can append at end-of-line.
pub fn right_for_append(buf: &mut Buffer) {
    let max_col = buf.line(buf.cur_idx()).map(|l| l.len()).unwrap_or(0) + 1;
    if buf.col_no < max_col {
        buf.col_no += 1;
    }
    buf.preferred_column = buf.col_no;
}

/// `j`/Down: move to the next line, restoring the remembered column
/// (`preferred_column`) rather than the column just left.
pub fn down(buf: &mut Buffer, count: usize) {
    for _ in 0..count.max(1) {
        if buf.line_no < buf.line_count() {
            buf.line_no += 1;
        }
    }
    buf.col_no = buf.preferred_column;
    buf.clamp_cursor();
}

pub fn up(buf: &mut Buffer, count: usize) {
    for _ in 0..count.max(1) {
        if buf.line_no > 1 {
            buf.line_no -= 1;
        }
    }
    buf.col_no = buf.preferred_column;
    buf.clamp_cursor();
}

pub fn line_start(buf: &mut Buffer) {
    buf.col_no = 1;
    buf.preferred_column = 1;
}

/// `^`: first non-blank column.
pub fn first_nonblank(buf: &mut Buffer) {
    let idx = buf.cur_idx();
    let text = buf.line(idx).map(|l| l.to_string_lossy()).unwrap_or_default();
    let col = text.chars().take_while(|c| *c == ' ' || *c == '\t').count();
    buf.col_no = col + 1;
    buf.preferred_column = buf.col_no;
}

pub fn line_end(buf: &mut Buffer) {
    let idx = buf.cur_idx();
    let len = buf.line(idx).map(|l| l.len()).unwrap_or(0);
    buf.col_no = len.max(1);
    buf.preferred_column = buf.col_no;
}

/// `}`: next blank line (or last line).
pub fn paragraph_forward(buf: &mut Buffer) {
    let mut idx = buf.cur_idx() + 1;
    while idx < buf.line_count() && !buf.line(idx).is_some_and(|l| l.is_empty()) {
        idx += 1;
    }
    buf.line_no = (idx + 1).min(buf.line_count());
    buf.col_no = 1;
    buf.preferred_column = 1;
}

/// `{`: previous blank line (or first line).
pub fn paragraph_backward(buf: &mut Buffer) {
    if buf.cur_idx() == 0 {
        buf.line_no = 1;
        buf.col_no = 1;
        return;
    }
    let mut idx = buf.cur_idx() - 1;
    while idx > 0 && !buf.line(idx).is_some_and(|l| l.is_empty()) {
        idx -= 1;
    }
    buf.line_no = idx + 1;
    buf.col_no = 1;
    buf.preferred_column = 1;
}

pub fn goto_top(buf: &mut Buffer) {
    buf.goto_line(1);
}

pub fn goto_bottom(buf: &mut Buffer) {
    buf.goto_line(buf.line_count());
}

/// `%`: jump to the matching delimiter under the cursor (§4.G), marking the
/// partner cell `FLAG_SELECT`ed. Returns `false` (leaving the cursor
/// untouched) when the cell under the cursor isn't a bracket or its partner
/// can't be found.
pub fn goto_matching_paren(buf: &mut Buffer) -> bool {
    let idx = buf.cur_idx();
    let col = buf.col_idx();
    match bim_state::paren::find_match(buf.lines(), idx, col) {
        Some((line, col)) => {
            if let Some(cell) = buf.lines_mut().get_mut(line).and_then(|l| l.cell_mut(col)) {
                cell.set_selected(true);
            }
            buf.line_no = line + 1;
            buf.col_no = col + 1;
            buf.highlighting_paren = true;
            true
        }
        None => false,
    }
}

/// `*`: the word under the cursor, used to seed a forward search.
pub fn word_under_cursor(buf: &Buffer) -> Option<String> {
    let idx = buf.cur_idx();
    let text: Vec<char> = buf.line(idx)?.to_string_lossy().chars().collect();
    let mut col = buf.col_idx().min(text.len().saturating_sub(1));
    if text.is_empty() {
        return None;
    }
    if !is_word_char(text[col]) {
        return None;
    }
    let mut start = col;
    while start > 0 && is_word_char(text[start - 1]) {
        start -= 1;
    }
    let mut end = col;
    while end + 1 < text.len() && is_word_char(text[end + 1]) {
        end += 1;
    }
    col = end;
    let _ = col;
    Some(text[start..=end].iter().collect())
}

fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bim_state::Buffer;

    #[test]
    fn vertical_motion_restores_preferred_column() {
        let mut buf = Buffer::from_text("abcdef\nxy\nabcdef\n");
        buf.col_no = 5;
        buf.preferred_column = 5;
        down(&mut buf, 1);
        assert_eq!(buf.col_no, 2); // clamped to "xy"'s length
        down(&mut buf, 1);
        assert_eq!(buf.col_no, 5); // restored once the line is long enough
    }

    #[test]
    fn paragraph_motions_find_blank_lines() {
        let mut buf = Buffer::from_text("a\nb\n\nc\n");
        buf.line_no = 1;
        paragraph_forward(&mut buf);
        assert_eq!(buf.line_no, 3);
        paragraph_backward(&mut buf);
        assert_eq!(buf.line_no, 1);
    }

    #[test]
    fn matching_paren_round_trips() {
        let mut buf = Buffer::from_text("{\n}\n");
        buf.line_no = 1;
        buf.col_no = 1;
        assert!(goto_matching_paren(&mut buf));
        assert_eq!((buf.line_no, buf.col_no), (2, 1));
        assert!(buf.lines()[1].cell(0).unwrap().is_selected());
        assert!(goto_matching_paren(&mut buf));
        assert_eq!((buf.line_no, buf.col_no), (1, 1));
    }

    #[test]
    fn word_under_cursor_extracts_contiguous_word() {
        let buf = Buffer::from_text("foo bar foo");
        assert_eq!(word_under_cursor(&buf).as_deref(), Some("foo"));
    }
}
