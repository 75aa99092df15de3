//! The editor's single global clipboard (§4.K). A new yank atomically
//! replaces the previous one.

use bim_text::Line;

#[derive(Debug, Clone, Default)]
pub struct Yank {
    pub lines: Vec<Line>,
    pub is_full_lines: bool,
}

impl Yank {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn set_full_lines(&mut self, lines: Vec<Line>) {
        self.lines = lines;
        self.is_full_lines = true;
    }

    pub fn set_partial(&mut self, lines: Vec<Line>) {
        self.lines = lines;
        self.is_full_lines = false;
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_yank_replaces_old_atomically() {
        let mut y = Yank::empty();
        y.set_full_lines(vec![Line::from_str("a")]);
        assert!(y.is_full_lines);
        y.set_partial(vec![Line::from_str("b")]);
        assert!(!y.is_full_lines);
        assert_eq!(y.lines.len(), 1);
        assert_eq!(y.lines[0].to_string_lossy(), "b");
    }
}
