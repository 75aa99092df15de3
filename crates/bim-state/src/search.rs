//! Forward/backward substring search with smart-case folding (§4.F).

use bim_text::Line;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Smart case per §4.F: case-insensitive unless the needle itself contains
/// an uppercase codepoint.
pub fn smart_case_insensitive(needle: &str) -> bool {
    !needle.chars().any(|c| c.is_uppercase())
}

fn eq_smart(a: char, b: char, insensitive: bool) -> bool {
    if insensitive {
        a.to_lowercase().eq(b.to_lowercase())
    } else {
        a == b
    }
}

/// Attempt a full match of `needle` against `line` starting at `col`.
fn matches_at(line: &Line, col: usize, needle: &[char], insensitive: bool) -> bool {
    if col + needle.len() > line.len() {
        return false;
    }
    needle.iter().enumerate().all(|(i, &n)| {
        line.cell(col + i)
            .is_some_and(|cell| eq_smart(cell.codepoint, n, insensitive))
    })
}

/// Scan lines linearly for `needle` starting at `(line, col)` (inclusive),
/// in the given direction. Does not wrap; the caller applies wrap policy.
pub fn search(
    lines: &[Line],
    needle: &str,
    start_line: usize,
    start_col: usize,
    direction: Direction,
) -> Option<(usize, usize)> {
    if needle.is_empty() || lines.is_empty() {
        return None;
    }
    let insensitive = smart_case_insensitive(needle);
    let needle_chars: Vec<char> = needle.chars().collect();
    match direction {
        Direction::Forward => {
            for line_idx in start_line..lines.len() {
                let line = &lines[line_idx];
                let from = if line_idx == start_line { start_col } else { 0 };
                for col in from..=line.len() {
                    if matches_at(line, col, &needle_chars, insensitive) {
                        return Some((line_idx, col));
                    }
                }
            }
            None
        }
        Direction::Backward => {
            for line_idx in (0..=start_line).rev() {
                let line = &lines[line_idx];
                let hi = if line_idx == start_line {
                    start_col.min(line.len())
                } else {
                    line.len()
                };
                for col in (0..=hi).rev() {
                    if matches_at(line, col, &needle_chars, insensitive) {
                        return Some((line_idx, col));
                    }
                }
                if line_idx == 0 {
                    break;
                }
            }
            None
        }
    }
}

/// Paint `FLAG_SEARCH` on every occurrence of `needle` in the buffer
/// (overlay reapplication, §3 invariant 8). Does not move the cursor.
pub fn highlight_all(lines: &mut [Line], needle: &str) {
    if needle.is_empty() {
        return;
    }
    let insensitive = smart_case_insensitive(needle);
    let needle_chars: Vec<char> = needle.chars().collect();
    for line in lines.iter_mut() {
        let len = line.len();
        let mut col = 0usize;
        while col <= len {
            if matches_at(line, col, &needle_chars, insensitive) {
                for i in 0..needle_chars.len() {
                    if let Some(cell) = line.cell_mut(col + i) {
                        cell.set_search_match(true);
                    }
                }
                col += needle_chars.len().max(1);
            } else {
                col += 1;
            }
        }
    }
}

/// `search_next`/`search_prev`: wrapping variants used by `n`/`N` (§4.F).
pub fn search_wrapping(
    lines: &[Line],
    needle: &str,
    start_line: usize,
    start_col: usize,
    direction: Direction,
) -> Option<(usize, usize)> {
    if let Some(hit) = search(lines, needle, start_line, start_col, direction) {
        return Some(hit);
    }
    match direction {
        Direction::Forward => search(lines, needle, 0, 0, direction),
        Direction::Backward => {
            let last = lines.len().saturating_sub(1);
            let last_col = lines.last().map(|l| l.len()).unwrap_or(0);
            search(lines, needle, last, last_col, direction)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_of(s: &str) -> Vec<Line> {
        s.lines().map(Line::from_str).collect()
    }

    #[test]
    fn forward_search_finds_first_occurrence() {
        let lines = lines_of("foo bar foo");
        let hit = search(&lines, "foo", 0, 0, Direction::Forward);
        assert_eq!(hit, Some((0, 0)));
    }

    #[test]
    fn forward_search_from_after_first_finds_second() {
        let lines = lines_of("foo bar foo");
        let hit = search(&lines, "foo", 0, 1, Direction::Forward);
        assert_eq!(hit, Some((0, 8)));
    }

    #[test]
    fn wrapping_search_wraps_to_start() {
        let lines = lines_of("foo bar foo");
        let hit = search_wrapping(&lines, "foo", 0, 9, Direction::Forward);
        assert_eq!(hit, Some((0, 0)));
    }

    #[test]
    fn smart_case_matches_any_case_when_needle_lowercase() {
        let lines = lines_of("Hello World");
        let hit = search(&lines, "hello", 0, 0, Direction::Forward);
        assert_eq!(hit, Some((0, 0)));
    }

    #[test]
    fn smart_case_is_sensitive_with_uppercase_needle() {
        let lines = lines_of("hello Hello");
        let hit = search(&lines, "Hello", 0, 0, Direction::Forward);
        assert_eq!(hit, Some((0, 6)));
    }

    #[test]
    fn highlight_all_marks_every_occurrence() {
        let mut lines = lines_of("foo bar foo");
        highlight_all(&mut lines, "foo");
        assert!(lines[0].cell(0).unwrap().is_search_match());
        assert!(lines[0].cell(8).unwrap().is_search_match());
        assert!(!lines[0].cell(4).unwrap().is_search_match());
    }
}
