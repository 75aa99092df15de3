use super::common::{is_word_start, paint_line_comment, paint_quoted, scan_word, skip_whitespace};
use crate::{SyntaxLexer, SyntaxState};
use bim_text::SyntaxClass;

const KEYWORDS: &[&str] = &[
    "def", "class", "if", "elif", "else", "for", "while", "try", "except", "finally", "with",
    "as", "import", "from", "return", "yield", "pass", "break", "continue", "lambda", "global",
    "nonlocal", "raise", "assert", "del", "in", "is", "not", "and", "or", "None", "True", "False",
];

/// State 2/3 = continuing inside a `"""`/`'''` triple-quoted string.
const IN_TRIPLE_DOUBLE: i32 = 2;
const IN_TRIPLE_SINGLE: i32 = 3;

pub struct Python;

impl SyntaxLexer for Python {
    fn name(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".py"]
    }

    fn calculate(&self, st: &mut SyntaxState) -> i32 {
        if st.state == IN_TRIPLE_DOUBLE {
            return continue_triple(st, '"', IN_TRIPLE_DOUBLE);
        }
        if st.state == IN_TRIPLE_SINGLE {
            return continue_triple(st, '\'', IN_TRIPLE_SINGLE);
        }
        if st.eol() {
            return -1;
        }
        if skip_whitespace(st) {
            return 0;
        }
        if st.current() == Some('#') {
            paint_line_comment(st, SyntaxClass::Comment);
            return -1;
        }
        if st.current() == Some('"') && st.peek(1) == Some('"') && st.peek(2) == Some('"') {
            st.paint_run(3, SyntaxClass::String);
            return continue_triple(st, '"', IN_TRIPLE_DOUBLE);
        }
        if st.current() == Some('\'') && st.peek(1) == Some('\'') && st.peek(2) == Some('\'') {
            st.paint_run(3, SyntaxClass::String);
            return continue_triple(st, '\'', IN_TRIPLE_SINGLE);
        }
        if st.current() == Some('"') {
            paint_quoted(st, '"', SyntaxClass::String);
            return 0;
        }
        if st.current() == Some('\'') {
            paint_quoted(st, '\'', SyntaxClass::String);
            return 0;
        }
        if st.current().is_some_and(|c| c.is_ascii_digit()) {
            while st
                .current()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '.')
            {
                st.paint_advance(SyntaxClass::Numeral);
            }
            return 0;
        }
        if st.current().is_some_and(is_word_start) {
            let word = scan_word(st);
            if KEYWORDS.contains(&word.as_str()) {
                st.paint_run(word.chars().count(), SyntaxClass::Keyword);
            } else {
                for _ in 0..word.chars().count() {
                    st.advance();
                }
            }
            return 0;
        }
        st.advance();
        0
    }
}

fn continue_triple(st: &mut SyntaxState, quote: char, carry_state: i32) -> i32 {
    loop {
        if st.eol() {
            return carry_state;
        }
        if st.current() == Some(quote) && st.peek(1) == Some(quote) && st.peek(2) == Some(quote) {
            st.paint_run(3, SyntaxClass::String);
            st.state = 0;
            return 0;
        }
        st.paint_advance(SyntaxClass::String);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recompute_cascade;
    use bim_text::Line;

    #[test]
    fn triple_quoted_string_spans_lines() {
        let mut lines = vec![
            Line::from_str("x = \"\"\""),
            Line::from_str("docstring body"),
            Line::from_str("end\"\"\""),
        ];
        recompute_cascade(&mut lines, 0, &Python);
        assert_eq!(lines[1].istate, IN_TRIPLE_DOUBLE);
        assert_eq!(lines[1].cells()[0].syntax_class(), SyntaxClass::String);
    }

    #[test]
    fn keyword_painted() {
        let mut lines = vec![Line::from_str("def f():")];
        recompute_cascade(&mut lines, 0, &Python);
        assert_eq!(lines[0].cells()[0].syntax_class(), SyntaxClass::Keyword);
    }
}
