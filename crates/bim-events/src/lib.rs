//! Event and key-representation types shared by the input decoder, the
//! keymap matcher, and the modal dispatcher.
//!
//! This crate is intentionally inert data: no channels, no async runtime.
//! The editor is single-threaded and event-loop driven (§5), so events flow
//! as plain values returned from [`bim-input`](https://docs.rs/bim-input)'s
//! synchronous decoder, not across a queue.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const NONE  = 0;
        const SHIFT = 1 << 0;
        const CTRL  = 1 << 1;
        const ALT   = 1 << 2;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A decoded key press (§4.L), already separated from raw CSI bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    BackTab,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub mods: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(Key::Char(c), Modifiers::CTRL)
    }

    pub fn is_ctrl(&self, c: char) -> bool {
        self.mods.contains(Modifiers::CTRL) && matches!(self.key, Key::Char(k) if k.eq_ignore_ascii_case(&c))
    }
}

/// A decoded mouse report (`CSI M` + 3 bytes, §4.L).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub button: u8,
    pub column: u16,
    pub row: u16,
}

/// Top-level input the editor shell reacts to, beyond keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// `SIGWINCH`: terminal dimensions changed.
    Resize(u16, u16),
    /// `SIGTSTP`: suspend requested.
    Suspend,
    /// `SIGCONT`: resumed from suspend.
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Signal(Signal),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_detection() {
        let ev = KeyEvent::ctrl('r');
        assert!(ev.is_ctrl('r'));
        assert!(ev.is_ctrl('R'));
        assert!(!ev.is_ctrl('x'));
    }
}
