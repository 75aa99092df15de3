//! CSI/OSC escape-sequence recognizer (§4.L): turns `Esc [ params final`
//! into a navigation key or a mouse report, with a short timeout to
//! disambiguate a lone `Esc` keypress from the start of an incomplete CSI
//! sequence.

use bim_events::{Key, KeyEvent, Modifiers, MouseEvent};

#[derive(Debug, Clone)]
enum PendingState {
    /// Just saw a bare `Esc`; waiting to see if `[` follows.
    SawEsc,
    /// Inside `Esc [ ...`; accumulating parameter bytes until a final byte.
    Csi { params: Vec<u8> },
    /// `Esc [ M`: a mouse report, accumulating its 3 raw bytes.
    MouseParams { collected: Vec<u8> },
}

/// Result of feeding one byte into the escape recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscapeOutcome {
    /// More bytes needed; nothing to report yet.
    Pending,
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// The accumulated sequence was unrecognized; dropped.
    Unrecognized,
}

/// Stateful recognizer. The caller feeds every byte that follows a raw
/// `0x1B`; [`Self::timeout`] should be invoked when the caller's bounded
/// tty poll (§5, ~200ms) elapses with a pending sequence still open, which
/// resolves a lone `Esc` to [`Key::Escape`].
#[derive(Debug, Default)]
pub struct EscapeRecognizer {
    pending: Option<PendingState>,
}

impl EscapeRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Begin a sequence with the raw `Esc` byte already consumed.
    pub fn start(&mut self) {
        self.pending = Some(PendingState::SawEsc);
    }

    pub fn feed(&mut self, byte: u8) -> EscapeOutcome {
        match self.pending.take() {
            None => EscapeOutcome::Unrecognized,
            Some(PendingState::SawEsc) => {
                if byte == b'[' {
                    self.pending = Some(PendingState::Csi { params: Vec::new() });
                    EscapeOutcome::Pending
                } else {
                    // Not a CSI after all; the byte is not ours to consume,
                    // but we have no lookahead buffer in this design, so we
                    // drop it and resolve the pending Esc on its own.
                    EscapeOutcome::Key(KeyEvent::plain(Key::Escape))
                }
            }
            Some(PendingState::Csi { mut params }) => {
                if byte == b'M' && params.is_empty() {
                    self.pending = Some(PendingState::MouseParams { collected: Vec::new() });
                    return EscapeOutcome::Pending;
                }
                if is_final_byte(byte) {
                    return resolve_csi(&params, byte);
                }
                params.push(byte);
                self.pending = Some(PendingState::Csi { params });
                EscapeOutcome::Pending
            }
            Some(PendingState::MouseParams { mut collected }) => {
                collected.push(byte);
                if collected.len() == 3 {
                    let button = collected[0].wrapping_sub(32);
                    let column = (collected[1].wrapping_sub(32)) as u16;
                    let row = (collected[2].wrapping_sub(32)) as u16;
                    EscapeOutcome::Mouse(MouseEvent { button, column, row })
                } else {
                    self.pending = Some(PendingState::MouseParams { collected });
                    EscapeOutcome::Pending
                }
            }
        }
    }

    /// Called when the caller's bounded poll times out with a pending
    /// sequence still open. A lone `Esc` resolves to `Key::Escape`; an
    /// incomplete CSI sequence is simply dropped (§4.L).
    pub fn timeout(&mut self) -> Option<KeyEvent> {
        match self.pending.take() {
            Some(PendingState::SawEsc) => Some(KeyEvent::plain(Key::Escape)),
            _ => None,
        }
    }
}

fn is_final_byte(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'~'
}

fn resolve_csi(params: &[u8], final_byte: u8) -> EscapeOutcome {
    let key = match (params, final_byte) {
        ([], b'A') => Some(Key::Up),
        ([], b'B') => Some(Key::Down),
        ([], b'C') => Some(Key::Right),
        ([], b'D') => Some(Key::Left),
        ([], b'H') => Some(Key::Home),
        ([], b'F') => Some(Key::End),
        ([], b'Z') => Some(Key::BackTab),
        (p, b'~') if p == b"3" => Some(Key::Delete),
        (p, b'~') if p == b"5" => Some(Key::PageUp),
        (p, b'~') if p == b"6" => Some(Key::PageDown),
        (p, b'~') if p == b"1" || p == b"7" => Some(Key::Home),
        (p, b'~') if p == b"4" || p == b"8" => Some(Key::End),
        _ => None,
    };
    match key {
        Some(k) => EscapeOutcome::Key(KeyEvent::new(k, Modifiers::NONE)),
        None => EscapeOutcome::Unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lone_esc_resolves_on_timeout() {
        let mut rec = EscapeRecognizer::new();
        rec.start();
        assert!(rec.is_pending());
        assert_eq!(rec.timeout(), Some(KeyEvent::plain(Key::Escape)));
        assert!(!rec.is_pending());
    }

    #[test]
    fn csi_arrow_up_decodes() {
        let mut rec = EscapeRecognizer::new();
        rec.start();
        assert_eq!(rec.feed(b'['), EscapeOutcome::Pending);
        assert_eq!(rec.feed(b'A'), EscapeOutcome::Key(KeyEvent::plain(Key::Up)));
    }

    #[test]
    fn csi_delete_tilde_sequence_decodes() {
        let mut rec = EscapeRecognizer::new();
        rec.start();
        rec.feed(b'[');
        rec.feed(b'3');
        assert_eq!(
            rec.feed(b'~'),
            EscapeOutcome::Key(KeyEvent::plain(Key::Delete))
        );
    }

    #[test]
    fn mouse_report_decodes_button_and_position() {
        let mut rec = EscapeRecognizer::new();
        rec.start();
        rec.feed(b'[');
        rec.feed(b'M');
        rec.feed(32); // button 0
        rec.feed(32 + 10); // column 10
        assert_eq!(
            rec.feed(32 + 5),
            EscapeOutcome::Mouse(MouseEvent { button: 0, column: 10, row: 5 })
        );
    }

    #[test]
    fn unrecognized_final_byte_is_dropped() {
        let mut rec = EscapeRecognizer::new();
        rec.start();
        rec.feed(b'[');
        assert_eq!(rec.feed(b'q'), EscapeOutcome::Unrecognized);
    }
}
