//! The editor shell (§4.J): owns the open buffers, the active/split
//! layout, the yank register, and global configuration. `bim-actions`
//! drives it; this crate only owns the lifecycle and state, not the
//! keystroke semantics.

use bim_config::GlobalConfig;
use bim_state::{Buffer, Result, Yank};
use bim_syntax::LexerRegistry;
use std::path::Path;
use tracing::{debug, info};

/// A side-by-side split occupant: which buffer is visible and at what
/// scroll offset, independent of that buffer's own `offset` (§4.I Splits —
/// "Split-local state (left, width, offset) is swapped in/out").
#[derive(Debug, Clone, Copy)]
pub struct SplitView {
    pub buffer: usize,
    pub offset: usize,
}

/// Owns `buffers`, the active index, optional split occupants, the single
/// yank register, and the rc-file-backed global config (§4.J).
pub struct EditorShell {
    buffers: Vec<Buffer>,
    active: usize,
    pub left: Option<SplitView>,
    pub right: Option<SplitView>,
    pub split_active_is_left: bool,
    pub yank: Yank,
    pub config: GlobalConfig,
    pub lexers: LexerRegistry,
}

impl EditorShell {
    pub fn new(config: GlobalConfig) -> Self {
        Self {
            buffers: vec![Buffer::new()],
            active: 0,
            left: None,
            right: None,
            split_active_is_left: true,
            yank: Yank::empty(),
            config,
            lexers: LexerRegistry::with_builtins(),
        }
    }

    pub fn buffers(&self) -> &[Buffer] {
        &self.buffers
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Buffer {
        &self.buffers[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Buffer {
        &mut self.buffers[self.active]
    }

    pub fn buffer(&self, idx: usize) -> Option<&Buffer> {
        self.buffers.get(idx)
    }

    pub fn buffer_mut(&mut self, idx: usize) -> Option<&mut Buffer> {
        self.buffers.get_mut(idx)
    }

    /// `:e` / `:tabnew`: open `path` as a new buffer and make it active,
    /// assigning a syntax lexer by longest-matching extension (§6) and
    /// detecting tabs-vs-spaces from file content when the lexer expresses
    /// no preference of its own (§6 "Syntax lexer capability").
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let mut buf = Buffer::open(path)?;
        self.configure_new_buffer(&mut buf, path);
        self.buffers.push(buf);
        self.active = self.buffers.len() - 1;
        info!(target: "model.shell", path = %path.display(), idx = self.active, "buffer_opened");
        Ok(self.active)
    }

    /// `:e FILE`: replace the active buffer's content in place (as opposed
    /// to `open`, which adds a new tab).
    pub fn open_into_active(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut buf = Buffer::open(path)?;
        self.configure_new_buffer(&mut buf, path);
        self.buffers[self.active] = buf;
        info!(target: "model.shell", path = %path.display(), "buffer_replaced");
        Ok(())
    }

    /// `:tabnew` with no path: a fresh empty buffer.
    pub fn tabnew_empty(&mut self) -> usize {
        self.buffers.push(Buffer::new());
        self.active = self.buffers.len() - 1;
        self.active
    }

    fn configure_new_buffer(&self, buf: &mut Buffer, path: &Path) {
        let filename = path.to_string_lossy();
        if let Some(lexer) = self.lexers.for_filename(&filename) {
            buf.syntax_name = Some(lexer.name().to_string());
            if lexer.prefers_spaces() && !content_indicates_tabs(buf) {
                buf.set_tabs(false);
            }
        }
        let lexer = self
            .lexers
            .by_name(buf.syntax_name.as_deref().unwrap_or("plain"))
            .or_else(|| self.lexers.by_name("plain"))
            .expect("plain lexer is always registered");
        bim_syntax::recompute_cascade(buf.lines_mut(), 0, lexer);
    }

    pub fn tabnext(&mut self) {
        if !self.buffers.is_empty() {
            self.active = (self.active + 1) % self.buffers.len();
        }
    }

    pub fn tabprev(&mut self) {
        if !self.buffers.is_empty() {
            self.active = (self.active + self.buffers.len() - 1) % self.buffers.len();
        }
    }

    /// Close the active buffer. Refuses (returning `false`) if it is the
    /// last remaining buffer; the caller (`:qa`) handles that case by
    /// quitting the process instead.
    pub fn close_active(&mut self) -> bool {
        if self.buffers.len() <= 1 {
            return false;
        }
        self.buffers.remove(self.active);
        if self.active >= self.buffers.len() {
            self.active = self.buffers.len() - 1;
        }
        debug!(target: "model.shell", remaining = self.buffers.len(), "buffer_closed");
        true
    }

    pub fn any_modified(&self) -> bool {
        self.buffers.iter().any(|b| b.modified())
    }

    // ---- Splits (§4.I) -------------------------------------------------

    pub fn split(&mut self) {
        self.left = Some(SplitView { buffer: self.active, offset: self.active().offset });
        self.right = Some(SplitView { buffer: self.active, offset: self.active().offset });
        self.split_active_is_left = true;
    }

    pub fn unsplit(&mut self) {
        self.left = None;
        self.right = None;
    }

    pub fn is_split(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

fn content_indicates_tabs(buf: &Buffer) -> bool {
    buf.lines()
        .iter()
        .any(|line| line.cell(0).is_some_and(|c| c.codepoint == '\t'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_shell_has_one_empty_buffer() {
        let shell = EditorShell::new(GlobalConfig::default());
        assert_eq!(shell.buffers().len(), 1);
        assert_eq!(shell.active_index(), 0);
    }

    #[test]
    fn close_active_refuses_on_last_buffer() {
        let mut shell = EditorShell::new(GlobalConfig::default());
        assert!(!shell.close_active());
        assert_eq!(shell.buffers().len(), 1);
    }

    #[test]
    fn tabnew_then_close_returns_to_first() {
        let mut shell = EditorShell::new(GlobalConfig::default());
        shell.tabnew_empty();
        assert_eq!(shell.buffers().len(), 2);
        assert_eq!(shell.active_index(), 1);
        assert!(shell.close_active());
        assert_eq!(shell.active_index(), 0);
    }

    #[test]
    fn tabnext_wraps_around() {
        let mut shell = EditorShell::new(GlobalConfig::default());
        shell.tabnew_empty();
        shell.tabnext();
        assert_eq!(shell.active_index(), 0);
    }

    #[test]
    fn split_sets_both_occupants_to_active_buffer() {
        let mut shell = EditorShell::new(GlobalConfig::default());
        shell.split();
        assert!(shell.is_split());
        shell.unsplit();
        assert!(!shell.is_split());
    }
}
