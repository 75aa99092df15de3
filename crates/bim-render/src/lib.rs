//! Viewport / renderer (§4.I): maps `(buffer, offset, cursor)` onto a
//! sequence of row paints against the [`Terminal`] capability. Nothing in
//! this crate mutates document state except the scroll bookkeeping
//! (`offset`/`coffset`) that `place_cursor_actual` performs on the buffer
//! it is given.

pub mod ansi;
pub mod theme;

use bim_state::Buffer;
use bim_terminal::{Terminal, TerminalCapabilities};
use bim_text::SyntaxClass;
use bitflags::bitflags;
use theme::{Slot, Theme};

bitflags! {
    /// Which regions of the screen need repainting this frame. The event
    /// loop accumulates these across a keystroke's handling and the
    /// renderer clears them after painting (§5 "Ordering guarantees").
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Dirty: u8 {
        const TEXT        = 1 << 0;
        const STATUSBAR   = 1 << 1;
        const COMMANDLINE = 1 << 2;
        const TABBAR      = 1 << 3;
        const ALL = Self::TEXT.bits() | Self::STATUSBAR.bits() | Self::COMMANDLINE.bits() | Self::TABBAR.bits();
    }
}

/// Screen geometry the renderer paints into. `text_rows` excludes the
/// tabbar (if any), status bar, and command line.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub show_tabbar: bool,
}

impl Viewport {
    pub fn text_rows(&self) -> u16 {
        let reserved = 2 + if self.show_tabbar { 1 } else { 0 };
        self.rows.saturating_sub(reserved)
    }

    fn tabbar_row(&self) -> u16 {
        1
    }

    fn text_first_row(&self) -> u16 {
        if self.show_tabbar { 2 } else { 1 }
    }

    fn statusbar_row(&self) -> u16 {
        self.text_first_row() + self.text_rows()
    }

    fn commandline_row(&self) -> u16 {
        self.statusbar_row() + 1
    }
}

/// Gutter width: line-number digits plus one column, plus a revision
/// marker column when `colorgutter` is enabled (§4.B/§9).
pub fn gutter_width(line_count: usize, colorgutter: bool) -> u16 {
    let digits = line_count.max(1).to_string().len() as u16;
    digits + 1 + if colorgutter { 1 } else { 0 }
}

/// Central cursor-placement routine (§4.I): clamps the cursor, then
/// scrolls the viewport just enough to keep it within `cursor_padding` of
/// an edge. Returns `true` if the vertical offset changed (the caller uses
/// this to decide between a one-line scroll-region emission and a full
/// text repaint).
pub fn place_cursor_actual(buf: &mut Buffer, viewport: &Viewport, cursor_padding: u16) -> bool {
    buf.clamp_cursor();
    let text_rows = viewport.text_rows().max(1) as usize;
    let padding = (cursor_padding as usize).min(text_rows.saturating_sub(1) / 2);
    let cur = buf.cur_idx();
    let old_offset = buf.offset;

    if cur < buf.offset + padding {
        buf.offset = cur.saturating_sub(padding);
    } else if cur + padding + 1 > buf.offset + text_rows {
        buf.offset = (cur + padding + 1).saturating_sub(text_rows);
    }
    let max_offset = buf.line_count().saturating_sub(text_rows);
    buf.offset = buf.offset.min(max_offset);

    let gutter = gutter_width(buf.line_count(), true) as usize;
    let text_cols = (viewport.cols as usize).saturating_sub(gutter).max(1);
    let cursor_display_col = display_col_of(buf, cur, buf.col_idx());
    if cursor_display_col < buf.coffset {
        buf.coffset = cursor_display_col;
    } else if cursor_display_col + 1 > buf.coffset + text_cols {
        buf.coffset = cursor_display_col + 1 - text_cols;
    }

    old_offset != buf.offset
}

/// Sum of display widths of the cells before `col` on `line_idx` (0-based).
fn display_col_of(buf: &Buffer, line_idx: usize, col: usize) -> usize {
    buf.line(line_idx)
        .map(|line| {
            line.cells()
                .iter()
                .take(col)
                .map(|c| c.display_width as usize)
                .sum()
        })
        .unwrap_or(0)
}

/// Paint a single text row: `screen_row` is 1-based absolute terminal row;
/// `line_idx` is the 0-based buffer line to paint there, or `None` to
/// paint a `~` empty-line filler (vi convention for rows past EOF).
#[allow(clippy::too_many_arguments)]
pub fn redraw_line(
    term: &mut dyn Terminal,
    theme: &Theme,
    buf: &Buffer,
    screen_row: u16,
    line_idx: Option<usize>,
    left: u16,
    width: u16,
    colorgutter: bool,
    hlcurrent: bool,
) -> anyhow::Result<()> {
    let gutter = gutter_width(buf.line_count(), colorgutter);
    term.write(ansi::move_to(screen_row, left + 1).as_bytes())?;
    term.write(ansi::clear_line_from_cursor().as_bytes())?;

    let Some(idx) = line_idx else {
        term.write(ansi::sgr(theme.resolve(Slot::Gutter)).as_bytes())?;
        term.write(b"~")?;
        term.write(ansi::reset_sgr().as_bytes())?;
        return Ok(());
    };
    let line = match buf.line(idx) {
        Some(l) => l,
        None => return Ok(()),
    };

    term.write(ansi::sgr(gutter_color(theme, line.rev_status)).as_bytes())?;
    let number = format!("{:>width$}", idx + 1, width = (gutter - 1) as usize);
    term.write(number.as_bytes())?;
    if colorgutter {
        term.write(rev_status_glyph(line.rev_status).as_bytes())?;
    }
    term.write(ansi::reset_sgr().as_bytes())?;

    let text_cols = width.saturating_sub(gutter) as usize;
    let current_line = hlcurrent && line.is_current;
    let mut col_in_row = 0usize;
    let mut displayed = 0usize;
    for cell in line.cells() {
        if displayed >= buf.coffset + text_cols {
            break;
        }
        let w = cell.display_width as usize;
        displayed += w;
        if displayed <= buf.coffset {
            continue;
        }
        if col_in_row >= text_cols {
            break;
        }
        let pair = cell_color(theme, cell.syntax_class(), cell.is_selected(), cell.is_search_match(), current_line);
        term.write(ansi::sgr(pair).as_bytes())?;
        term.write(render_glyph(cell.codepoint).as_bytes())?;
        col_in_row += 1;
    }
    term.write(ansi::reset_sgr().as_bytes())?;
    Ok(())
}

fn cell_color(theme: &Theme, class: SyntaxClass, selected: bool, search: bool, current_line: bool) -> theme::ColorPair {
    if selected {
        theme.resolve(Slot::Selection)
    } else if search {
        theme.resolve(Slot::SearchMatch)
    } else if current_line {
        theme.resolve(Slot::CurrentLine)
    } else if class == SyntaxClass::None {
        theme.resolve(Slot::Default)
    } else {
        theme.syntax_color(class)
    }
}

fn gutter_color(theme: &Theme, status: bim_text::line::RevStatus) -> theme::ColorPair {
    use bim_text::line::RevStatus::*;
    match status {
        Unchanged => theme.resolve(Slot::Gutter),
        Added => theme.resolve(Slot::GutterAdded),
        LocallyModified | ModifiedVsVcs | ModifiedAndDeletion => theme.resolve(Slot::GutterModified),
        DeletionBelow => theme.resolve(Slot::GutterDeleted),
    }
}

fn rev_status_glyph(status: bim_text::line::RevStatus) -> &'static str {
    use bim_text::line::RevStatus::*;
    match status {
        Unchanged => " ",
        Added => "+",
        LocallyModified | ModifiedVsVcs => "~",
        DeletionBelow => "_",
        ModifiedAndDeletion => "!",
    }
}

/// Render one codepoint the way the width oracle accounted for it: control
/// chars as `^X`, DEL as `^?`, etc. (§4.B).
fn render_glyph(c: char) -> String {
    let cp = c as u32;
    if cp < 0x20 {
        format!("^{}", ((cp as u8) | 0x40) as char)
    } else if cp == 0x7F {
        "^?".to_string()
    } else if c == '\t' {
        " ".to_string()
    } else {
        c.to_string()
    }
}

/// Paint every visible text row for `buf`, `~` filler past EOF (§4.I).
pub fn redraw_text(
    term: &mut dyn Terminal,
    theme: &Theme,
    buf: &Buffer,
    viewport: &Viewport,
    colorgutter: bool,
    hlcurrent: bool,
) -> anyhow::Result<()> {
    redraw_text_region(term, theme, buf, viewport, colorgutter, hlcurrent, 0, viewport.cols)
}

/// Paint `buf`'s text into the `[left, left + width)` column range, used
/// both for the full-width case and for each half of a split (§4.I
/// Splits: "the other half holds another buffer ... Split-local state
/// (left, width, offset) is swapped in/out").
#[allow(clippy::too_many_arguments)]
pub fn redraw_text_region(
    term: &mut dyn Terminal,
    theme: &Theme,
    buf: &Buffer,
    viewport: &Viewport,
    colorgutter: bool,
    hlcurrent: bool,
    left: u16,
    width: u16,
) -> anyhow::Result<()> {
    let first = viewport.text_first_row();
    for row in 0..viewport.text_rows() {
        let line_idx = buf.offset + row as usize;
        let line_idx = if line_idx < buf.line_count() { Some(line_idx) } else { None };
        redraw_line(term, theme, buf, first + row, line_idx, left, width, colorgutter, hlcurrent)?;
    }
    Ok(())
}

/// Paint two buffers side by side at `splitpercent` (§4.J `:splitpercent`,
/// §4.I Splits).
#[allow(clippy::too_many_arguments)]
pub fn redraw_split(
    term: &mut dyn Terminal,
    theme: &Theme,
    left_buf: &Buffer,
    right_buf: &Buffer,
    viewport: &Viewport,
    colorgutter: bool,
    hlcurrent: bool,
    splitpercent: u8,
) -> anyhow::Result<()> {
    let left_width = (viewport.cols as u32 * splitpercent.min(100) as u32 / 100) as u16;
    let right_width = viewport.cols.saturating_sub(left_width);
    redraw_text_region(term, theme, left_buf, viewport, colorgutter, hlcurrent, 0, left_width)?;
    redraw_text_region(term, theme, right_buf, viewport, colorgutter, hlcurrent, left_width, right_width)?;
    Ok(())
}

/// `filename [modified] mode line:col` status line (§4.I).
pub fn redraw_statusbar(
    term: &mut dyn Terminal,
    theme: &Theme,
    buf: &Buffer,
    viewport: &Viewport,
) -> anyhow::Result<()> {
    let row = viewport.statusbar_row();
    let pair = if buf.modified() {
        theme.resolve(Slot::StatusBarModified)
    } else {
        theme.resolve(Slot::StatusBar)
    };
    term.write(ansi::move_to(row, 1).as_bytes())?;
    term.write(ansi::sgr(pair).as_bytes())?;
    term.write(ansi::clear_line_from_cursor().as_bytes())?;

    let name = buf
        .file_name
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "[No Name]".to_string());
    let modified = if buf.modified() { " [+]" } else { "" };
    let readonly = if buf.readonly { " [RO]" } else { "" };
    let left = format!(" {name}{modified}{readonly}");
    let right = format!("{}:{} ", buf.line_no, buf.col_no);
    let pad = (viewport.cols as usize).saturating_sub(left.len() + right.len());
    term.write(left.as_bytes())?;
    term.write(" ".repeat(pad).as_bytes())?;
    term.write(right.as_bytes())?;
    term.write(ansi::reset_sgr().as_bytes())?;
    Ok(())
}

/// The bottom line: either a status/error message, or the in-progress
/// `:`/`/`/`?` command-line text (§4.H Command mode, §7 error colors).
pub fn redraw_commandline(
    term: &mut dyn Terminal,
    theme: &Theme,
    viewport: &Viewport,
    text: &str,
    is_error: bool,
) -> anyhow::Result<()> {
    let row = viewport.commandline_row();
    let pair = if is_error {
        theme.resolve(Slot::ErrorMessage)
    } else {
        theme.resolve(Slot::CommandLine)
    };
    term.write(ansi::move_to(row, 1).as_bytes())?;
    term.write(ansi::sgr(pair).as_bytes())?;
    term.write(ansi::clear_line_from_cursor().as_bytes())?;
    let truncated: String = text.chars().take(viewport.cols as usize).collect();
    term.write(truncated.as_bytes())?;
    term.write(ansi::reset_sgr().as_bytes())?;
    Ok(())
}

/// One entry per open buffer/tab (§4.I Splits / §6 `:tabnew`).
pub fn redraw_tabbar(
    term: &mut dyn Terminal,
    theme: &Theme,
    viewport: &Viewport,
    names: &[String],
    active: usize,
) -> anyhow::Result<()> {
    if !viewport.show_tabbar {
        return Ok(());
    }
    let row = viewport.tabbar_row();
    term.write(ansi::move_to(row, 1).as_bytes())?;
    term.write(ansi::sgr(theme.resolve(Slot::TabBarInactive)).as_bytes())?;
    term.write(ansi::clear_line_from_cursor().as_bytes())?;
    for (idx, name) in names.iter().enumerate() {
        let pair = if idx == active {
            theme.resolve(Slot::TabBarActive)
        } else {
            theme.resolve(Slot::TabBarInactive)
        };
        term.write(ansi::sgr(pair).as_bytes())?;
        term.write(format!(" {name} ").as_bytes())?;
    }
    term.write(ansi::reset_sgr().as_bytes())?;
    Ok(())
}

/// Full repaint: tabbar, text, status bar, command line, then place the
/// cursor (§4.I `redraw_all`).
#[allow(clippy::too_many_arguments)]
pub fn redraw_all(
    term: &mut dyn Terminal,
    caps: &TerminalCapabilities,
    theme: &Theme,
    buf: &Buffer,
    viewport: &Viewport,
    tab_names: &[String],
    active_tab: usize,
    command_text: &str,
    command_is_error: bool,
    colorgutter: bool,
    hlcurrent: bool,
) -> anyhow::Result<()> {
    if caps.can_hideshow {
        term.write(ansi::hide_cursor().as_bytes())?;
    }
    term.write(ansi::clear_screen().as_bytes())?;
    redraw_tabbar(term, theme, viewport, tab_names, active_tab)?;
    redraw_text(term, theme, buf, viewport, colorgutter, hlcurrent)?;
    redraw_statusbar(term, theme, buf, viewport)?;
    redraw_commandline(term, theme, viewport, command_text, command_is_error)?;
    if caps.can_hideshow {
        term.write(ansi::show_cursor().as_bytes())?;
    }
    term.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bim_terminal::FakeTerminal;

    fn vp() -> Viewport {
        Viewport { cols: 80, rows: 24, show_tabbar: false }
    }

    #[test]
    fn gutter_width_grows_with_line_count() {
        assert_eq!(gutter_width(9, false), 2);
        assert_eq!(gutter_width(10, false), 3);
        assert_eq!(gutter_width(10, true), 4);
    }

    #[test]
    fn place_cursor_scrolls_down_past_padding() {
        let mut buf = Buffer::from_text(&"line\n".repeat(50));
        buf.goto_line(40);
        let viewport = Viewport { cols: 80, rows: 24, show_tabbar: false };
        let scrolled = place_cursor_actual(&mut buf, &viewport, 4);
        assert!(scrolled);
        assert!(buf.offset > 0);
        let text_rows = viewport.text_rows() as usize;
        assert!(buf.cur_idx() >= buf.offset && buf.cur_idx() < buf.offset + text_rows);
    }

    #[test]
    fn place_cursor_does_not_scroll_when_already_visible() {
        let mut buf = Buffer::from_text("a\nb\nc\n");
        buf.goto_line(2);
        let viewport = vp();
        let scrolled = place_cursor_actual(&mut buf, &viewport, 4);
        assert!(!scrolled);
        assert_eq!(buf.offset, 0);
    }

    #[test]
    fn redraw_statusbar_shows_filename_and_position() {
        let mut term = FakeTerminal::new(80, 24);
        let theme = theme::default_theme();
        let buf = Buffer::from_text("hello");
        let viewport = vp();
        redraw_statusbar(&mut term, &theme, &buf, &viewport).unwrap();
        let out = String::from_utf8_lossy(&term.output);
        assert!(out.contains("No Name"));
        assert!(out.contains("1:1"));
    }

    #[test]
    fn redraw_split_paints_both_halves_without_panicking() {
        let mut term = FakeTerminal::new(80, 24);
        let theme = theme::default_theme();
        let left = Buffer::from_text("left buffer");
        let right = Buffer::from_text("right buffer");
        let viewport = vp();
        redraw_split(&mut term, &theme, &left, &right, &viewport, true, true, 50).unwrap();
        assert!(!term.output.is_empty());
    }

    #[test]
    fn redraw_all_emits_a_frame() {
        let mut term = FakeTerminal::new(80, 24);
        let caps = TerminalCapabilities::default();
        let theme = theme::default_theme();
        let buf = Buffer::from_text("hello\nworld\n");
        let viewport = vp();
        redraw_all(&mut term, &caps, &theme, &buf, &viewport, &["a".into()], 0, "", false, true, true).unwrap();
        assert!(!term.output.is_empty());
    }

    #[test]
    fn redraw_commandline_truncates_multibyte_text_without_panicking() {
        let mut term = FakeTerminal::new(4, 24);
        let theme = theme::default_theme();
        let viewport = Viewport { cols: 4, rows: 24, show_tabbar: false };
        redraw_commandline(&mut term, &theme, &viewport, "héllo wörld", false).unwrap();
        let out = String::from_utf8_lossy(&term.output);
        assert!(out.contains("héll"));
    }

    #[test]
    fn redraw_line_highlights_current_line_when_enabled() {
        let mut term = FakeTerminal::new(80, 24);
        let theme = theme::default_theme();
        let mut buf = Buffer::from_text("hello\n");
        buf.lines_mut()[0].is_current = true;
        let viewport = vp();
        redraw_line(&mut term, &theme, &buf, 1, Some(0), 0, viewport.cols, true, true).unwrap();
        assert!(!term.output.is_empty());
    }
}
