//! End-to-end render checks that don't fit `#[cfg(test)]` unit scope:
//! multi-byte command-line truncation and the `hlcurrent` theme slot.

use bim_render::{redraw_commandline, redraw_line, theme, Viewport};
use bim_state::Buffer;
use bim_terminal::FakeTerminal;

#[test]
fn commandline_truncates_multibyte_text_on_a_char_boundary() {
    let mut term = FakeTerminal::new(4, 24);
    let theme = theme::default_theme();
    let viewport = Viewport { cols: 4, rows: 24, show_tabbar: false };

    let result = redraw_commandline(&mut term, &theme, &viewport, "héllo wörld", false);

    assert!(result.is_ok());
    let out = String::from_utf8_lossy(&term.output);
    assert!(out.contains("héll"));
}

#[test]
fn current_line_gets_the_current_line_slot_only_when_enabled() {
    let theme = theme::default_theme();
    let viewport = Viewport { cols: 80, rows: 24, show_tabbar: false };

    let mut with_hl = Buffer::from_text("hello\nworld\n");
    with_hl.lines_mut()[0].is_current = true;
    let mut term = FakeTerminal::new(80, 24);
    redraw_line(&mut term, &theme, &with_hl, 1, Some(0), 0, viewport.cols, true, true).unwrap();
    let with_out = term.output.clone();

    let mut without_hl = Buffer::from_text("hello\nworld\n");
    without_hl.lines_mut()[0].is_current = true;
    let mut term2 = FakeTerminal::new(80, 24);
    redraw_line(&mut term2, &theme, &without_hl, 1, Some(0), 0, viewport.cols, true, false).unwrap();
    let without_out = term2.output.clone();

    assert_ne!(with_out, without_out);
}
