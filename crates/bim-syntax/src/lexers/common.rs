//! Shared token-scanning helpers used by several built-in lexers.

use crate::SyntaxState;
use bim_text::SyntaxClass;

pub fn is_word_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

pub fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Consume a run of whitespace without painting it. Returns true if any was consumed.
pub fn skip_whitespace(st: &mut SyntaxState) -> bool {
    let mut moved = false;
    while let Some(c) = st.current() {
        if c.is_whitespace() {
            st.advance();
            moved = true;
        } else {
            break;
        }
    }
    moved
}

/// Scan an identifier-like word starting at the cursor, returning it and
/// leaving the cursor at the end of the run (without painting).
pub fn scan_word(st: &SyntaxState) -> String {
    let mut word = String::new();
    let mut i = 0;
    while let Some(c) = st.peek(i) {
        if (i == 0 && is_word_start(c)) || (i > 0 && is_word_char(c)) {
            word.push(c);
            i += 1;
        } else {
            break;
        }
    }
    word
}

/// Paint a double-quoted or single-quoted string literal starting at the
/// cursor (which must be on the opening quote). Handles `\`-escapes and
/// stops at end of line if unterminated. Returns true if it consumed the
/// whole remainder of the line without finding a terminator.
pub fn paint_quoted(st: &mut SyntaxState, quote: char, class: SyntaxClass) {
    st.paint_advance(class); // opening quote
    while let Some(c) = st.current() {
        if c == '\\' {
            st.paint_advance(class);
            if !st.eol() {
                st.paint_advance(class);
            }
            continue;
        }
        if c == quote {
            st.paint_advance(class);
            return;
        }
        st.paint_advance(class);
    }
}

pub fn paint_line_comment(st: &mut SyntaxState, class: SyntaxClass) {
    while !st.eol() {
        st.paint_advance(class);
    }
}
