//! Incremental per-line syntax highlighting engine (§4.E).
//!
//! Each [`SyntaxLexer`] paints a single line's cells and returns the state
//! that should be carried into the next line. The engine drives the
//! clear → seed → loop-to-fixed-point → cascade protocol described in the
//! specification; lexers themselves are pure functions over a [`SyntaxState`].

use bim_text::{Line, SyntaxClass};
use std::collections::HashMap;

pub mod lexers;

/// Cursor + carried state handed to a lexer's `calculate` call.
pub struct SyntaxState<'a> {
    cells: &'a mut [bim_text::Cell],
    pub line_no: usize,
    pub i: usize,
    pub state: i32,
}

impl<'a> SyntaxState<'a> {
    pub fn new(cells: &'a mut [bim_text::Cell], line_no: usize, entry_state: i32) -> Self {
        Self {
            cells,
            line_no,
            i: 0,
            state: entry_state,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn eol(&self) -> bool {
        self.i >= self.cells.len()
    }

    pub fn peek(&self, offset: usize) -> Option<char> {
        self.cells.get(self.i + offset).map(|c| c.codepoint)
    }

    pub fn current(&self) -> Option<char> {
        self.peek(0)
    }

    pub fn advance(&mut self) {
        self.i += 1;
    }

    /// Paint the cell at the cursor with `class` and advance past it.
    pub fn paint_advance(&mut self, class: SyntaxClass) {
        if let Some(cell) = self.cells.get_mut(self.i) {
            cell.set_syntax_class(class);
        }
        self.advance();
    }

    /// Paint `count` cells starting at the cursor with `class` and advance past them.
    pub fn paint_run(&mut self, count: usize, class: SyntaxClass) {
        for _ in 0..count {
            if self.eol() {
                break;
            }
            self.paint_advance(class);
        }
    }

    /// Text of the remaining line, for lexers that want to match keywords/words.
    pub fn remaining(&self) -> String {
        self.cells[self.i..].iter().map(|c| c.codepoint).collect()
    }
}

/// A plug-in syntax lexer (§6 "Syntax lexer capability").
pub trait SyntaxLexer: Send + Sync {
    fn name(&self) -> &'static str;
    fn extensions(&self) -> &'static [&'static str];
    fn prefers_spaces(&self) -> bool {
        false
    }
    /// Process one line. Returns the outgoing state for the next line
    /// (`-1` means the construct closed cleanly on this line).
    fn calculate(&self, state: &mut SyntaxState) -> i32;
}

/// Registry of built-in lexers, selected by longest-matching filename extension.
pub struct LexerRegistry {
    lexers: Vec<Box<dyn SyntaxLexer>>,
    by_name: HashMap<&'static str, usize>,
}

impl LexerRegistry {
    pub fn with_builtins() -> Self {
        let mut reg = Self {
            lexers: Vec::new(),
            by_name: HashMap::new(),
        };
        reg.register(Box::new(lexers::plain::Plain));
        reg.register(Box::new(lexers::c::C));
        reg.register(Box::new(lexers::python::Python));
        reg.register(Box::new(lexers::diff::Diff));
        reg.register(Box::new(lexers::make::Make));
        reg.register(Box::new(lexers::json::Json));
        reg.register(Box::new(lexers::ini::Ini));
        reg.register(Box::new(lexers::markdown::Markdown));
        reg
    }

    pub fn register(&mut self, lexer: Box<dyn SyntaxLexer>) {
        let idx = self.lexers.len();
        self.by_name.insert(lexer.name(), idx);
        self.lexers.push(lexer);
    }

    pub fn by_name(&self, name: &str) -> Option<&dyn SyntaxLexer> {
        self.by_name.get(name).map(|&i| self.lexers[i].as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.lexers.iter().map(|l| l.name()).collect()
    }

    /// Select by longest-matching extension against `filename` (§6).
    pub fn for_filename(&self, filename: &str) -> Option<&dyn SyntaxLexer> {
        let mut best: Option<(&dyn SyntaxLexer, usize)> = None;
        for lexer in &self.lexers {
            for ext in lexer.extensions() {
                if filename.ends_with(ext) {
                    let len = ext.len();
                    if best.map(|(_, l)| len > l).unwrap_or(true) {
                        best = Some((lexer.as_ref(), len));
                    }
                }
            }
        }
        best.map(|(l, _)| l)
    }
}

impl Default for LexerRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Run the clear → seed → fixed-point-cascade protocol of §4.E across an
/// entire buffer's lines, starting at `from_line` (used after an edit that
/// may have changed a line's outgoing state).
pub fn recompute_cascade(lines: &mut [Line], from_line: usize, lexer: &dyn SyntaxLexer) {
    let mut idx = from_line;
    while idx < lines.len() {
        let entry_state = if idx == 0 {
            -1
        } else {
            lines[idx].istate
        };
        let next_state = recompute_line(lines, idx, entry_state, lexer);
        let changed = idx + 1 < lines.len() && lines[idx + 1].istate != next_state;
        if idx + 1 < lines.len() {
            lines[idx + 1].istate = next_state;
        }
        if !changed {
            break;
        }
        idx += 1;
    }
}

/// Recompute a single line's highlighting, looping `calculate` to a fixed
/// point (§4.E step 3) and returning the outgoing state for the next line.
fn recompute_line(lines: &mut [Line], idx: usize, entry_state: i32, lexer: &dyn SyntaxLexer) -> i32 {
    let line = &mut lines[idx];
    for cell in line.cells_mut() {
        cell.set_syntax_class(SyntaxClass::None);
    }
    line.istate = entry_state;
    let mut state = entry_state;
    let mut cursor = 0usize;
    loop {
        let mut syn = SyntaxState::new(line.cells_mut(), idx, state);
        syn.i = cursor;
        let result = lexer.calculate(&mut syn);
        cursor = syn.i;
        // `state` is threaded through verbatim between same-line re-entries
        // (result == 0) so a lexer can carry bookkeeping — e.g. the
        // markdown host's nested-fence base-offset — across calls that
        // don't yet reach end of line. A lexer that doesn't need this
        // simply leaves `state` untouched or zeroes it itself.
        state = syn.state;
        if result == 0 {
            continue;
        }
        return result;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_selects_longest_extension() {
        let reg = LexerRegistry::with_builtins();
        assert_eq!(reg.for_filename("main.c").unwrap().name(), "c");
        assert_eq!(reg.for_filename("foo.py").unwrap().name(), "python");
        assert_eq!(reg.for_filename("README.md").unwrap().name(), "markdown");
        assert!(reg.for_filename("noext").is_none());
    }

    #[test]
    fn cascade_reaches_fixed_point() {
        let mut lines = vec![Line::from_str("plain text"), Line::from_str("more text")];
        let lexer = lexers::plain::Plain;
        recompute_cascade(&mut lines, 0, &lexer);
        assert_eq!(lines[0].istate, -1);
        assert_eq!(lines[1].istate, -1);
    }
}
