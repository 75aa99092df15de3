//! End-to-end: syntax highlighting stays current after every keystroke,
//! not just after `:recalc` (§4.E, §5 ordering guarantee).

mod common;
use common::*;

use bim_actions::Dispatcher;
use bim_events::{InputEvent, Key, KeyEvent};
use bim_text::SyntaxClass;

#[test]
fn block_comment_is_highlighted_without_explicit_recalc() {
    let mut shell = shell_with("");
    shell.active_mut().syntax_name = Some("c".to_string());
    let mut dispatcher = Dispatcher::new();

    dispatcher.handle(&mut shell, key('i'));
    type_str(&mut dispatcher, &mut shell, "/* start");
    dispatcher.handle(&mut shell, InputEvent::Key(KeyEvent::plain(Key::Enter)));
    type_str(&mut dispatcher, &mut shell, "still inside");
    dispatcher.handle(&mut shell, InputEvent::Key(KeyEvent::plain(Key::Escape)));

    let lines = shell.active().lines();
    assert_eq!(lines[0].cell(0).unwrap().syntax_class(), SyntaxClass::Comment);
    // The second line was typed after the block comment opened and never
    // closed; without a per-keystroke recompute this stays uncolored.
    assert_eq!(lines[1].cell(0).unwrap().syntax_class(), SyntaxClass::Comment);
}

#[test]
fn closing_a_block_comment_stops_highlighting_what_follows() {
    let mut shell = shell_with("");
    shell.active_mut().syntax_name = Some("c".to_string());
    let mut dispatcher = Dispatcher::new();

    dispatcher.handle(&mut shell, key('i'));
    type_str(&mut dispatcher, &mut shell, "/* note */ int x;");
    dispatcher.handle(&mut shell, InputEvent::Key(KeyEvent::plain(Key::Escape)));

    let lines = shell.active().lines();
    let text = lines[0].to_string_lossy();
    let int_idx = text.find("int").unwrap();
    assert_eq!(lines[0].cell(int_idx).unwrap().syntax_class(), SyntaxClass::Type);
}
