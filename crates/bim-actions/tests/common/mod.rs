#![allow(dead_code)]

use bim_config::GlobalConfig;
use bim_events::{InputEvent, Key, KeyEvent};
use bim_model::EditorShell;
use bim_state::Buffer;

pub fn shell_with(text: &str) -> EditorShell {
    let mut shell = EditorShell::new(GlobalConfig::default());
    *shell.active_mut() = Buffer::from_text(text);
    shell
}

pub fn key(c: char) -> InputEvent {
    InputEvent::Key(KeyEvent::plain(Key::Char(c)))
}

pub fn special(k: Key) -> InputEvent {
    InputEvent::Key(KeyEvent::plain(k))
}

pub fn type_str(dispatcher: &mut bim_actions::Dispatcher, shell: &mut EditorShell, s: &str) {
    for c in s.chars() {
        dispatcher.handle(shell, key(c));
    }
}
