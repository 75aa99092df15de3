//! `:s/needle/replacement/flags` (§4.F, §6). Parses the delimiter-led
//! grammar and performs the substitution through `Buffer`'s cursor-relative
//! cell primitives, one match at a time, exactly as specified: delete the
//! match, insert the replacement, advance the scan cursor past it.

use bim_state::{Buffer, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct SubFlags {
    pub global_in_line: bool,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone)]
pub struct Substitution {
    pub needle: String,
    pub replacement: String,
    pub flags: SubFlags,
    /// `true` for the `%` whole-file prefix; `false` means the current line.
    pub whole_file: bool,
}

/// Parse the body after `s` (or `%s`), e.g. `/needle/repl/g` or
/// `#needle#repl#gi`. The delimiter is whatever character follows `s`.
pub fn parse(body: &str, whole_file: bool) -> std::result::Result<Substitution, String> {
    let mut chars = body.chars();
    let delim = chars.next().ok_or_else(|| "empty substitute command".to_string())?;
    if delim.is_alphanumeric() {
        return Err("substitute delimiter must be punctuation".to_string());
    }
    let rest: String = chars.collect();
    let parts: Vec<&str> = rest.splitn(3, delim).collect();
    let needle = parts.first().copied().unwrap_or_default().to_string();
    let replacement = parts.get(1).copied().unwrap_or_default().to_string();
    let flag_str = parts.get(2).copied().unwrap_or_default();
    if needle.is_empty() {
        return Err("empty search pattern".to_string());
    }
    let flags = SubFlags {
        global_in_line: flag_str.contains('g'),
        case_insensitive: flag_str.contains('i'),
    };
    Ok(Substitution { needle, replacement, flags, whole_file })
}

/// Run the substitution over `[from_line, to_line]` inclusive (both
/// 0-based), returning the number of matches replaced.
pub fn apply(buf: &mut Buffer, sub: &Substitution, from_line: usize, to_line: usize) -> Result<usize> {
    let insensitive = sub.flags.case_insensitive || bim_state::search::smart_case_insensitive(&sub.needle);
    let needle: Vec<char> = sub.needle.chars().collect();
    let replacement: Vec<char> = sub.replacement.chars().collect();
    let mut count = 0usize;

    for line_idx in from_line..=to_line.min(buf.line_count().saturating_sub(1)) {
        let mut col = 0usize;
        loop {
            let len = buf.line(line_idx).map(|l| l.len()).unwrap_or(0);
            if col + needle.len() > len {
                break;
            }
            if !matches_at(buf, line_idx, col, &needle, insensitive) {
                col += 1;
                continue;
            }
            buf.line_no = line_idx + 1;
            buf.col_no = col + 1;
            for _ in 0..needle.len() {
                buf.delete_forward()?;
            }
            for &c in &replacement {
                buf.insert_char(c)?;
            }
            count += 1;
            col += replacement.len();
            if !sub.flags.global_in_line {
                break;
            }
        }
    }
    Ok(count)
}

fn matches_at(buf: &Buffer, line_idx: usize, col: usize, needle: &[char], insensitive: bool) -> bool {
    let Some(line) = buf.line(line_idx) else { return false };
    if col + needle.len() > line.len() {
        return false;
    }
    needle.iter().enumerate().all(|(i, &n)| {
        line.cell(col + i).is_some_and(|cell| {
            if insensitive {
                cell.codepoint.to_lowercase().eq(n.to_lowercase())
            } else {
                cell.codepoint == n
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_slash_delimited_body() {
        let sub = parse("/needle/repl/g", true).unwrap();
        assert_eq!(sub.needle, "needle");
        assert_eq!(sub.replacement, "repl");
        assert!(sub.flags.global_in_line);
        assert!(sub.whole_file);
    }

    #[test]
    fn global_substitution_replaces_every_match_per_line() {
        let mut buf = Buffer::from_text("aaa\naba\n");
        let sub = parse("/a/b/g", true).unwrap();
        let count = apply(&mut buf, &sub, 0, 1).unwrap();
        assert_eq!(count, 5);
        assert_eq!(buf.lines()[0].to_string_lossy(), "bbb");
        assert_eq!(buf.lines()[1].to_string_lossy(), "bbb");
    }

    #[test]
    fn non_global_substitution_replaces_first_match_only() {
        let mut buf = Buffer::from_text("aaa\n");
        let sub = parse("/a/b/", false).unwrap();
        let count = apply(&mut buf, &sub, 0, 0).unwrap();
        assert_eq!(count, 1);
        assert_eq!(buf.lines()[0].to_string_lossy(), "baa");
    }
}
