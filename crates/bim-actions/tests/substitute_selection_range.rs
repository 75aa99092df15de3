//! End-to-end: entering `:` from a visual selection scopes `:s` to the
//! selected lines instead of falling back to the current line (§4.H).

mod common;
use common::*;

use bim_actions::Dispatcher;
use bim_events::{InputEvent, Key, KeyEvent};

fn run_command(dispatcher: &mut Dispatcher, shell: &mut bim_model::EditorShell, cmd: &str) {
    type_str(dispatcher, shell, cmd);
    dispatcher.handle(shell, InputEvent::Key(KeyEvent::plain(Key::Enter)));
}

#[test]
fn substitute_scoped_to_linewise_selection() {
    let mut shell = shell_with("aaa\naaa\naaa\naaa\n");
    let mut dispatcher = Dispatcher::new();

    shell.active_mut().line_no = 2;
    dispatcher.handle(&mut shell, key('V'));
    dispatcher.handle(&mut shell, key('j'));
    dispatcher.handle(&mut shell, key(':'));
    run_command(&mut dispatcher, &mut shell, "s/a/b/g");

    let lines = shell.active().lines();
    assert_eq!(lines[0].to_string_lossy(), "aaa");
    assert_eq!(lines[1].to_string_lossy(), "bbb");
    assert_eq!(lines[2].to_string_lossy(), "bbb");
    assert_eq!(lines[3].to_string_lossy(), "aaa");
}

#[test]
fn whole_file_flag_still_overrides_a_pending_selection_range() {
    let mut shell = shell_with("aaa\naaa\naaa\n");
    let mut dispatcher = Dispatcher::new();

    shell.active_mut().line_no = 2;
    dispatcher.handle(&mut shell, key('V'));
    dispatcher.handle(&mut shell, key(':'));
    run_command(&mut dispatcher, &mut shell, "%s/a/b/g");

    let lines = shell.active().lines();
    for line in lines.iter() {
        assert_eq!(line.to_string_lossy(), "bbb");
    }
}

#[test]
fn entering_command_mode_outside_a_selection_still_targets_current_line() {
    let mut shell = shell_with("aaa\naaa\naaa\n");
    let mut dispatcher = Dispatcher::new();

    shell.active_mut().line_no = 2;
    dispatcher.handle(&mut shell, key(':'));
    run_command(&mut dispatcher, &mut shell, "s/a/b/g");

    let lines = shell.active().lines();
    assert_eq!(lines[0].to_string_lossy(), "aaa");
    assert_eq!(lines[1].to_string_lossy(), "bbb");
    assert_eq!(lines[2].to_string_lossy(), "aaa");
}
