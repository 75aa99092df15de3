use super::common::skip_whitespace;
use crate::{SyntaxLexer, SyntaxState};
use bim_text::SyntaxClass;

pub struct Make;

impl SyntaxLexer for Make {
    fn name(&self) -> &'static str {
        "make"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["Makefile", ".mk"]
    }

    fn calculate(&self, st: &mut SyntaxState) -> i32 {
        if st.eol() {
            return -1;
        }
        if skip_whitespace(st) {
            return 0;
        }
        if st.current() == Some('#') {
            while !st.eol() {
                st.paint_advance(SyntaxClass::Comment);
            }
            return -1;
        }
        if st.current() == Some('$') && st.peek(1) == Some('(') {
            st.paint_advance(SyntaxClass::Keyword);
            st.paint_advance(SyntaxClass::Keyword);
            while st.current().is_some() && st.current() != Some(')') {
                st.paint_advance(SyntaxClass::Keyword);
            }
            if !st.eol() {
                st.paint_advance(SyntaxClass::Keyword);
            }
            return 0;
        }
        // A target line: `name:` at the start of the line, no leading whitespace consumed.
        if st.i == 0 {
            let text = st.remaining();
            if let Some(colon) = text.find(':') {
                if !text[..colon].contains(char::is_whitespace) {
                    st.paint_run(colon, SyntaxClass::Type);
                    return 0;
                }
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
    fn target_line_painted_as_type() {
        let mut lines = vec![Line::from_str("all: build")];
        recompute_cascade(&mut lines, 0, &Make);
        assert_eq!(lines[0].cells()[0].syntax_class(), SyntaxClass::Type);
    }
}
