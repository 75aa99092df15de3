use super::common::skip_whitespace;
use crate::{SyntaxLexer, SyntaxState};
use bim_text::SyntaxClass;

pub struct Ini;

impl SyntaxLexer for Ini {
    fn name(&self) -> &'static str {
        "ini"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".ini", ".cfg"]
    }

    fn calculate(&self, st: &mut SyntaxState) -> i32 {
        if st.eol() {
            return -1;
        }
        if skip_whitespace(st) {
            return 0;
        }
        if matches!(st.current(), Some('#') | Some(';')) {
            while !st.eol() {
                st.paint_advance(SyntaxClass::Comment);
            }
            return -1;
        }
        if st.current() == Some('[') {
            while !st.eol() {
                st.paint_advance(SyntaxClass::Type);
            }
            return -1;
        }
        if st.i == 0 {
            let text = st.remaining();
            if let Some(eq) = text.find('=') {
                st.paint_run(eq, SyntaxClass::Keyword);
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
    fn section_header_painted_as_type() {
        let mut lines = vec![Line::from_str("[section]")];
        recompute_cascade(&mut lines, 0, &Ini);
        assert_eq!(lines[0].cells()[0].syntax_class(), SyntaxClass::Type);
    }

    #[test]
    fn key_painted_as_keyword() {
        let mut lines = vec![Line::from_str("key=value")];
        recompute_cascade(&mut lines, 0, &Ini);
        assert_eq!(lines[0].cells()[0].syntax_class(), SyntaxClass::Keyword);
    }
}
