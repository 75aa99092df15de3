//! Input decoder (§4.L): turns a raw byte stream into [`InputEvent`]s — a
//! UTF-8 codepoint decoder for ordinary typing, layered with a CSI/mouse
//! escape-sequence recognizer for the rest. This crate owns no tty; it is
//! fed bytes by whatever reads them (`bim-terminal` in production, a
//! scripted buffer in tests).

mod escape;
mod utf8;

pub use escape::{EscapeOutcome, EscapeRecognizer};
pub use utf8::{Step as Utf8Step, Utf8Decoder};

use bim_events::{InputEvent, Key, KeyEvent, Modifiers};

/// Stateful decoder combining the UTF-8 and escape-sequence layers.
#[derive(Debug, Default)]
pub struct InputDecoder {
    utf8: Utf8Decoder,
    escape: EscapeRecognizer,
}

impl InputDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.escape.is_pending()
    }

    /// Feed one raw byte. Returns `None` if more bytes are needed before an
    /// event is complete.
    pub fn feed(&mut self, byte: u8) -> Option<InputEvent> {
        if self.escape.is_pending() {
            return match self.escape.feed(byte) {
                EscapeOutcome::Pending => None,
                EscapeOutcome::Key(k) => Some(InputEvent::Key(k)),
                EscapeOutcome::Mouse(m) => Some(InputEvent::Mouse(m)),
                EscapeOutcome::Unrecognized => None,
            };
        }
        if byte == 0x1B {
            self.escape.start();
            return None;
        }
        match self.utf8.feed(byte) {
            Utf8Step::Incomplete => None,
            Utf8Step::Invalid => None,
            Utf8Step::Char(c) => Some(InputEvent::Key(classify_char(c))),
        }
    }

    /// Called when the caller's bounded poll (§5, ~200ms) times out with no
    /// further bytes available: resolves a lone pending `Esc` to
    /// `Key::Escape` (§4.L).
    pub fn timeout(&mut self) -> Option<InputEvent> {
        self.escape.timeout().map(InputEvent::Key)
    }
}

/// Map a decoded codepoint to a [`KeyEvent`], recognizing the handful of
/// control characters the modal dispatcher treats specially (Enter, Tab,
/// Backspace, and `Ctrl+<letter>` chords, which arrive as C0 control bytes
/// in raw mode).
fn classify_char(c: char) -> KeyEvent {
    match c {
        '\r' | '\n' => KeyEvent::plain(Key::Enter),
        '\t' => KeyEvent::plain(Key::Tab),
        '\x7f' | '\x08' => KeyEvent::plain(Key::Backspace),
        c if (c as u32) < 0x20 => {
            // C0 control byte: Ctrl+<letter>, e.g. Ctrl+R == 0x12.
            let letter = ((c as u8) | 0x60) as char;
            KeyEvent::new(Key::Char(letter), Modifiers::CTRL)
        }
        c => KeyEvent::plain(Key::Char(c)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(dec: &mut InputDecoder, bytes: &[u8]) -> Vec<InputEvent> {
        bytes.iter().filter_map(|&b| dec.feed(b)).collect()
    }

    #[test]
    fn plain_ascii_decodes_to_char_keys() {
        let mut dec = InputDecoder::new();
        let events = feed_all(&mut dec, b"hi");
        assert_eq!(
            events,
            vec![
                InputEvent::Key(KeyEvent::plain(Key::Char('h'))),
                InputEvent::Key(KeyEvent::plain(Key::Char('i'))),
            ]
        );
    }

    #[test]
    fn ctrl_r_decodes_to_ctrl_chord() {
        let mut dec = InputDecoder::new();
        let events = feed_all(&mut dec, &[0x12]);
        assert_eq!(events, vec![InputEvent::Key(KeyEvent::ctrl('r'))]);
    }

    #[test]
    fn csi_sequence_decodes_through_combined_decoder() {
        let mut dec = InputDecoder::new();
        let events = feed_all(&mut dec, b"\x1b[A");
        assert_eq!(events, vec![InputEvent::Key(KeyEvent::plain(Key::Up))]);
    }

    #[test]
    fn lone_esc_times_out_to_escape_key() {
        let mut dec = InputDecoder::new();
        assert_eq!(dec.feed(0x1B), None);
        assert!(dec.is_pending());
        assert_eq!(dec.timeout(), Some(InputEvent::Key(KeyEvent::plain(Key::Escape))));
    }

    #[test]
    fn multibyte_utf8_decodes_to_single_char_key() {
        let mut dec = InputDecoder::new();
        let events = feed_all(&mut dec, "é".as_bytes());
        assert_eq!(events, vec![InputEvent::Key(KeyEvent::plain(Key::Char('é')))]);
    }
}
