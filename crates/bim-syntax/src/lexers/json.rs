use super::common::{paint_quoted, skip_whitespace};
use crate::{SyntaxLexer, SyntaxState};
use bim_text::SyntaxClass;

pub struct Json;

impl SyntaxLexer for Json {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".json"]
    }

    fn calculate(&self, st: &mut SyntaxState) -> i32 {
        if st.eol() {
            return -1;
        }
        if skip_whitespace(st) {
            return 0;
        }
        if st.current() == Some('"') {
            paint_quoted(st, '"', SyntaxClass::String);
            return 0;
        }
        if st.current().is_some_and(|c| c.is_ascii_digit() || c == '-') {
            st.paint_advance(SyntaxClass::Numeral);
            while st
                .current()
                .is_some_and(|c| c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || c == '+' || c == '-')
            {
                st.paint_advance(SyntaxClass::Numeral);
            }
            return 0;
        }
        for word in ["true", "false", "null"] {
            if st.remaining().starts_with(word) {
                st.paint_run(word.len(), SyntaxClass::Keyword);
                return 0;
            }
        }
        st.advance();
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recompute_cascade;
    use bim_text::Line;

    #[test]
    fn string_and_literal_painted() {
        let mut lines = vec![Line::from_str(r#"{"a": true, "n": 42}"#)];
        recompute_cascade(&mut lines, 0, &Json);
        let text = lines[0].to_string_lossy();
        let a_idx = text.find('"').unwrap();
        assert_eq!(lines[0].cells()[a_idx].syntax_class(), SyntaxClass::String);
        let true_idx = text.find("true").unwrap();
        assert_eq!(lines[0].cells()[true_idx].syntax_class(), SyntaxClass::Keyword);
    }
}
