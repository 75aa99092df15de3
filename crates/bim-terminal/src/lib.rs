//! Terminal capability abstraction (§6 "Terminal capability (external)").
//!
//! The core never touches a tty directly; it talks to a [`Terminal`] trait
//! object so the engine can be driven headlessly in tests. [`CrosstermTerminal`]
//! is the production backend.

pub mod capabilities;
pub use capabilities::TerminalCapabilities;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::{
    cursor::{Hide, Show},
    event::{DisableMouseCapture, EnableMouseCapture, poll, read},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::{Write, stdout};
use std::time::Duration;
use tracing::{debug, warn};

/// The terminal I/O surface the rest of the engine consumes (§6).
pub trait Terminal {
    /// Poll for at most `timeout_ms`, returning a decoded byte if the tty
    /// had one ready. `None` on timeout (the event loop's suspension point,
    /// §5).
    fn read_byte(&mut self, timeout_ms: u64) -> Result<Option<u8>>;
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn size(&self) -> Result<(u16, u16)>;
    fn set_raw(&mut self) -> Result<()>;
    fn set_cooked(&mut self) -> Result<()>;
    fn enter_alt_screen(&mut self) -> Result<()>;
    fn leave_alt_screen(&mut self) -> Result<()>;
    fn enable_mouse(&mut self) -> Result<()>;
    fn disable_mouse(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
}

/// crossterm-backed production [`Terminal`].
pub struct CrosstermTerminal {
    raw: bool,
    alt_screen: bool,
    mouse: bool,
    pending: Vec<u8>,
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermTerminal {
    pub fn new() -> Self {
        Self {
            raw: false,
            alt_screen: false,
            mouse: false,
            pending: Vec::new(),
        }
    }

    /// Enter raw mode + alt screen and return a guard that restores the
    /// terminal on drop, even on panic or early return (§5 "Scoped
    /// acquisition of the terminal").
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.set_raw()?;
        self.enter_alt_screen()?;
        Ok(TerminalGuard {
            terminal: self,
            active: true,
        })
    }
}

impl Terminal for CrosstermTerminal {
    fn read_byte(&mut self, timeout_ms: u64) -> Result<Option<u8>> {
        if let Some(b) = self.pending.pop() {
            return Ok(Some(b));
        }
        if !poll(Duration::from_millis(timeout_ms))? {
            return Ok(None);
        }
        match read()? {
            Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) => {
                let mut bytes = encode_key(code);
                if bytes.is_empty() {
                    return Ok(None);
                }
                bytes.reverse();
                self.pending = bytes;
                Ok(self.pending.pop())
            }
            Event::Resize(_, _) => Ok(None),
            _ => Ok(None),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        stdout().write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        stdout().flush()?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        let (cols, rows) = crossterm::terminal::size()?;
        Ok((cols, rows))
    }

    fn set_raw(&mut self) -> Result<()> {
        if !self.raw {
            enable_raw_mode()?;
            self.raw = true;
        }
        Ok(())
    }

    fn set_cooked(&mut self) -> Result<()> {
        if self.raw {
            disable_raw_mode()?;
            self.raw = false;
        }
        Ok(())
    }

    fn enter_alt_screen(&mut self) -> Result<()> {
        if !self.alt_screen {
            execute!(stdout(), EnterAlternateScreen, Hide)?;
            self.alt_screen = true;
        }
        Ok(())
    }

    fn leave_alt_screen(&mut self) -> Result<()> {
        if self.alt_screen {
            execute!(stdout(), LeaveAlternateScreen, Show)?;
            self.alt_screen = false;
        }
        Ok(())
    }

    fn enable_mouse(&mut self) -> Result<()> {
        if !self.mouse {
            execute!(stdout(), EnableMouseCapture)?;
            self.mouse = true;
        }
        Ok(())
    }

    fn disable_mouse(&mut self) -> Result<()> {
        if self.mouse {
            execute!(stdout(), DisableMouseCapture)?;
            self.mouse = false;
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        if self.mouse {
            let _ = self.disable_mouse();
        }
        if self.alt_screen {
            let _ = self.leave_alt_screen();
        }
        if self.raw {
            let _ = self.set_cooked();
        }
    }
}

/// RAII guard restoring cooked mode + primary screen on drop (§5 SIGTSTP
/// handling reuses `leave`/re-`enter` directly on the backend).
pub struct TerminalGuard<'a> {
    terminal: &'a mut CrosstermTerminal,
    active: bool,
}

impl TerminalGuard<'_> {
    pub fn release(&mut self) -> Result<()> {
        if self.active {
            self.terminal.disable_mouse()?;
            self.terminal.leave_alt_screen()?;
            self.terminal.set_cooked()?;
            self.active = false;
        }
        Ok(())
    }

    pub fn reacquire(&mut self) -> Result<()> {
        if !self.active {
            self.terminal.set_raw()?;
            self.terminal.enter_alt_screen()?;
            self.active = true;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard<'_> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.release();
        }
    }
}

impl std::ops::Deref for TerminalGuard<'_> {
    type Target = CrosstermTerminal;

    fn deref(&self) -> &Self::Target {
        self.terminal
    }
}

impl std::ops::DerefMut for TerminalGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.terminal
    }
}

/// Re-encode a crossterm key event back into the raw byte stream the core's
/// own input decoder (`bim-input`) expects (§4.L). Keeps `bim-input`
/// decoupled from crossterm: this crate is the only one that imports it.
fn encode_key(code: KeyCode) -> Vec<u8> {
    match code {
        KeyCode::Char(c) => {
            let mut buf = [0u8; 4];
            c.encode_utf8(&mut buf).as_bytes().to_vec()
        }
        KeyCode::Enter => vec![b'\r'],
        KeyCode::Tab => vec![b'\t'],
        KeyCode::Backspace => vec![0x7F],
        KeyCode::Esc => vec![0x1B],
        KeyCode::Up => b"\x1b[A".to_vec(),
        KeyCode::Down => b"\x1b[B".to_vec(),
        KeyCode::Right => b"\x1b[C".to_vec(),
        KeyCode::Left => b"\x1b[D".to_vec(),
        KeyCode::Home => b"\x1b[H".to_vec(),
        KeyCode::End => b"\x1b[F".to_vec(),
        KeyCode::PageUp => b"\x1b[5~".to_vec(),
        KeyCode::PageDown => b"\x1b[6~".to_vec(),
        KeyCode::Delete => b"\x1b[3~".to_vec(),
        other => {
            debug!(target: "terminal.input", ?other, "unmapped_key_ignored");
            Vec::new()
        }
    }
}

/// A fully in-memory [`Terminal`] for unit/integration tests: feeds a
/// scripted byte stream and captures everything written.
#[derive(Debug, Default)]
pub struct FakeTerminal {
    pub input: std::collections::VecDeque<u8>,
    pub output: Vec<u8>,
    pub cols: u16,
    pub rows: u16,
    pub raw: bool,
    pub alt_screen: bool,
    pub mouse: bool,
    pub title: Option<String>,
}

impl FakeTerminal {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            ..Default::default()
        }
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.input.extend(bytes);
    }
}

impl Terminal for FakeTerminal {
    fn read_byte(&mut self, _timeout_ms: u64) -> Result<Option<u8>> {
        Ok(self.input.pop_front())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.output.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok((self.cols, self.rows))
    }

    fn set_raw(&mut self) -> Result<()> {
        self.raw = true;
        Ok(())
    }

    fn set_cooked(&mut self) -> Result<()> {
        self.raw = false;
        Ok(())
    }

    fn enter_alt_screen(&mut self) -> Result<()> {
        self.alt_screen = true;
        Ok(())
    }

    fn leave_alt_screen(&mut self) -> Result<()> {
        self.alt_screen = false;
        Ok(())
    }

    fn enable_mouse(&mut self) -> Result<()> {
        self.mouse = true;
        Ok(())
    }

    fn disable_mouse(&mut self) -> Result<()> {
        self.mouse = false;
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.title = Some(title.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_terminal_roundtrips_scripted_bytes() {
        let mut term = FakeTerminal::new(80, 24);
        term.feed(b"hello");
        let mut out = Vec::new();
        while let Some(b) = term.read_byte(0).unwrap() {
            out.push(b);
        }
        assert_eq!(out, b"hello");
    }

    #[test]
    fn write_is_captured_verbatim() {
        let mut term = FakeTerminal::new(80, 24);
        term.write(b"\x1b[2J").unwrap();
        assert_eq!(term.output, b"\x1b[2J");
    }

    #[test]
    fn mode_toggles_are_tracked() {
        let mut term = FakeTerminal::new(80, 24);
        term.set_raw().unwrap();
        term.enter_alt_screen().unwrap();
        term.enable_mouse().unwrap();
        assert!(term.raw && term.alt_screen && term.mouse);
        term.set_cooked().unwrap();
        assert!(!term.raw);
    }
}
