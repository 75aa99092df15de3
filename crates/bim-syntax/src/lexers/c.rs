use super::common::{is_word_start, paint_line_comment, paint_quoted, scan_word, skip_whitespace};
use crate::{SyntaxLexer, SyntaxState};
use bim_text::SyntaxClass;

const KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "break", "continue", "return", "goto",
    "struct", "union", "enum", "typedef", "static", "const", "extern", "sizeof", "default",
];
const TYPES: &[&str] = &[
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "size_t",
];

/// State 1 = continuing inside a `/* ... */` block comment from the previous line.
const IN_BLOCK_COMMENT: i32 = 1;

pub struct C;

impl SyntaxLexer for C {
    fn name(&self) -> &'static str {
        "c"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".c", ".h"]
    }

    fn calculate(&self, st: &mut SyntaxState) -> i32 {
        if st.state == IN_BLOCK_COMMENT {
            return continue_block_comment(st);
        }
        if st.eol() {
            return -1;
        }
        if skip_whitespace(st) {
            return 0;
        }
        if st.i == 0 && st.current() == Some('#') {
            paint_line_comment(st, SyntaxClass::Pragma);
            return -1;
        }
        if st.current() == Some('/') && st.peek(1) == Some('*') {
            st.paint_advance(SyntaxClass::Comment);
            st.paint_advance(SyntaxClass::Comment);
            return continue_block_comment(st);
        }
        if st.current() == Some('/') && st.peek(1) == Some('/') {
            paint_line_comment(st, SyntaxClass::Comment);
            return -1;
        }
        if st.current() == Some('"') {
            paint_quoted(st, '"', SyntaxClass::String);
            return 0;
        }
        if st.current() == Some('\'') {
            paint_quoted(st, '\'', SyntaxClass::String2);
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
            let class = if KEYWORDS.contains(&word.as_str()) {
                Some(SyntaxClass::Keyword)
            } else if TYPES.contains(&word.as_str()) {
                Some(SyntaxClass::Type)
            } else {
                None
            };
            match class {
                Some(class) => st.paint_run(word.chars().count(), class),
                None => {
                    for _ in 0..word.chars().count() {
                        st.advance();
                    }
                }
            }
            return 0;
        }
        st.advance();
        0
    }
}

fn continue_block_comment(st: &mut SyntaxState) -> i32 {
    loop {
        if st.eol() {
            return IN_BLOCK_COMMENT;
        }
        if st.current() == Some('*') && st.peek(1) == Some('/') {
            st.paint_advance(SyntaxClass::Comment);
            st.paint_advance(SyntaxClass::Comment);
            st.state = 0;
            return 0;
        }
        st.paint_advance(SyntaxClass::Comment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recompute_cascade;
    use bim_text::Line;

    #[test]
    fn keyword_and_string_are_painted() {
        let mut lines = vec![Line::from_str("if (x) { return \"hi\"; }")];
        recompute_cascade(&mut lines, 0, &C);
        let cells = lines[0].cells();
        assert_eq!(cells[0].syntax_class(), SyntaxClass::Keyword);
        let quote_idx = lines[0].to_string_lossy().find('"').unwrap();
        assert_eq!(cells[quote_idx].syntax_class(), SyntaxClass::String);
    }

    #[test]
    fn block_comment_spans_lines() {
        let mut lines = vec![
            Line::from_str("/* start"),
            Line::from_str("still comment"),
            Line::from_str("end */ int x;"),
        ];
        recompute_cascade(&mut lines, 0, &C);
        assert_eq!(lines[1].istate, IN_BLOCK_COMMENT);
        assert_eq!(lines[2].istate, IN_BLOCK_COMMENT);
        assert_eq!(lines[1].cells()[0].syntax_class(), SyntaxClass::Comment);
    }
}
