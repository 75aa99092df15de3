use crate::{SyntaxLexer, SyntaxState};
use bim_text::SyntaxClass;

pub struct Diff;

impl SyntaxLexer for Diff {
    fn name(&self) -> &'static str {
        "diff"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".diff", ".patch"]
    }

    fn calculate(&self, st: &mut SyntaxState) -> i32 {
        if st.eol() {
            return -1;
        }
        match st.current() {
            Some('+') => {
                while !st.eol() {
                    st.paint_advance(SyntaxClass::DiffPlus);
                }
            }
            Some('-') => {
                while !st.eol() {
                    st.paint_advance(SyntaxClass::DiffMinus);
                }
            }
            Some('@') => {
                while !st.eol() {
                    st.paint_advance(SyntaxClass::Pragma);
                }
            }
            _ => {
                while !st.eol() {
                    st.advance();
                }
            }
        }
        -1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recompute_cascade;
    use bim_text::Line;

    #[test]
    fn plus_minus_lines_painted() {
        let mut lines = vec![Line::from_str("+added"), Line::from_str("-removed")];
        recompute_cascade(&mut lines, 0, &Diff);
        assert_eq!(lines[0].cells()[0].syntax_class(), SyntaxClass::DiffPlus);
        assert_eq!(lines[1].cells()[0].syntax_class(), SyntaxClass::DiffMinus);
    }
}
