//! End-to-end: selection, search, and paren-match overlays are repainted
//! after every dirty dispatch (§3 invariant 8), not just computed.

mod common;
use common::*;

use bim_actions::Dispatcher;
use bim_events::{InputEvent, Key, KeyEvent};

#[test]
fn visual_line_selection_paints_selected_cells() {
    let mut shell = shell_with("one\ntwo\nthree\n");
    let mut dispatcher = Dispatcher::new();

    dispatcher.handle(&mut shell, key('V'));
    dispatcher.handle(&mut shell, key('j'));

    let lines = shell.active().lines();
    assert!(lines[0].cell(0).unwrap().is_selected());
    assert!(lines[1].cell(0).unwrap().is_selected());
    assert!(!lines[2].cell(0).unwrap().is_selected());
}

#[test]
fn search_highlights_every_match_on_the_buffer() {
    let mut shell = shell_with("foo bar foo\n");
    let mut dispatcher = Dispatcher::new();

    dispatcher.handle(&mut shell, key('/'));
    type_str(&mut dispatcher, &mut shell, "foo");
    dispatcher.handle(&mut shell, InputEvent::Key(KeyEvent::plain(Key::Enter)));

    let lines = shell.active().lines();
    assert!(lines[0].cell(0).unwrap().is_search_match());
    assert!(!lines[0].cell(4).unwrap().is_search_match());
    assert!(lines[0].cell(8).unwrap().is_search_match());
}

#[test]
fn paren_jump_leaves_a_highlighted_partner_after_overlay_repaint() {
    let mut shell = shell_with("(abc)\n");
    shell.active_mut().line_no = 1;
    shell.active_mut().col_no = 1;
    let mut dispatcher = Dispatcher::new();

    dispatcher.handle(&mut shell, key('%'));

    assert!(shell.active().highlighting_paren);
    let lines = shell.active().lines();
    assert!(lines[0].cell(0).unwrap().is_selected() || lines[0].cell(4).unwrap().is_selected());
}

#[test]
fn disabling_hlparen_suppresses_paren_highlight() {
    let mut shell = shell_with("(abc)\n");
    shell.config.hlparen = false;
    shell.active_mut().line_no = 1;
    shell.active_mut().col_no = 1;
    let mut dispatcher = Dispatcher::new();

    dispatcher.handle(&mut shell, key('%'));

    let lines = shell.active().lines();
    assert!(!lines[0].cell(0).unwrap().is_selected());
    assert!(!lines[0].cell(4).unwrap().is_selected());
}
