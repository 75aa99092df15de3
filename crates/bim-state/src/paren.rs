//! Paren/bracket matcher (§4.G): finds the partner of the delimiter under
//! the cursor, constrained to cells sharing the same syntax class.

use bim_text::Line;

const PAIRS: &[(char, char)] = &[('(', ')'), ('[', ']'), ('{', '}'), ('<', '>')];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dir {
    Forward,
    Backward,
}

fn classify(c: char) -> Option<(char, char, Dir)> {
    for &(open, close) in PAIRS {
        if c == open {
            return Some((open, close, Dir::Forward));
        }
        if c == close {
            return Some((open, close, Dir::Backward));
        }
    }
    None
}

/// Find the partner of the bracket at `(line_idx, col)`, if any, scanning
/// only through cells whose syntax class matches the starting cell's.
pub fn find_match(lines: &[Line], line_idx: usize, col: usize) -> Option<(usize, usize)> {
    let start_cell = lines.get(line_idx)?.cell(col)?;
    let (open, close, dir) = classify(start_cell.codepoint)?;
    let start_class = start_cell.syntax_class();

    let mut depth = 1i64;
    let mut cur_line = line_idx;
    let mut cur_col = col;
    loop {
        let stepped = match dir {
            Dir::Forward => step_forward(lines, cur_line, cur_col),
            Dir::Backward => step_backward(lines, cur_line, cur_col),
        };
        let (next_line, next_col) = stepped?;
        cur_line = next_line;
        cur_col = next_col;
        let cell = lines[cur_line].cell(cur_col)?;
        if cell.syntax_class() != start_class {
            continue;
        }
        if cell.codepoint == open {
            depth += if dir == Dir::Forward { 1 } else { -1 };
        } else if cell.codepoint == close {
            depth += if dir == Dir::Forward { -1 } else { 1 };
        } else {
            continue;
        }
        if depth == 0 {
            return Some((cur_line, cur_col));
        }
    }
}

fn step_forward(lines: &[Line], line: usize, col: usize) -> Option<(usize, usize)> {
    if col + 1 < lines[line].len() {
        return Some((line, col + 1));
    }
    let mut l = line + 1;
    while l < lines.len() {
        if !lines[l].is_empty() {
            return Some((l, 0));
        }
        l += 1;
    }
    None
}

fn step_backward(lines: &[Line], line: usize, col: usize) -> Option<(usize, usize)> {
    if col > 0 {
        return Some((line, col - 1));
    }
    if line == 0 {
        return None;
    }
    let mut l = line - 1;
    loop {
        if !lines[l].is_empty() {
            return Some((l, lines[l].len() - 1));
        }
        if l == 0 {
            return None;
        }
        l -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_same_line_parens() {
        let lines = vec![Line::from_str("(a + b)")];
        assert_eq!(find_match(&lines, 0, 0), Some((0, 6)));
        assert_eq!(find_match(&lines, 0, 6), Some((0, 0)));
    }

    #[test]
    fn matches_across_lines() {
        let lines = vec![Line::from_str("{"), Line::from_str("}")];
        assert_eq!(find_match(&lines, 0, 0), Some((1, 0)));
        assert_eq!(find_match(&lines, 1, 0), Some((0, 0)));
    }

    #[test]
    fn no_match_at_boundary() {
        let lines = vec![Line::from_str("(a")];
        assert_eq!(find_match(&lines, 0, 0), None);
    }

    #[test]
    fn non_bracket_returns_none() {
        let lines = vec![Line::from_str("abc")];
        assert_eq!(find_match(&lines, 0, 1), None);
    }
}
