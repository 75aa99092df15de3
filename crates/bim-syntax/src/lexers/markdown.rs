//! Markdown host lexer, exercising the nesting protocol of §4.E: fenced
//! code blocks dispatch into the `c`, `python`, or `json` lexers by
//! translating through a per-language base-state offset.

use super::{c::C, json::Json, python::Python};
use crate::{SyntaxLexer, SyntaxState};
use bim_text::SyntaxClass;

const FENCE_C_BASE: i32 = 100;
const FENCE_PYTHON_BASE: i32 = 200;
const FENCE_JSON_BASE: i32 = 300;

fn nested_for_base(base: i32) -> &'static dyn SyntaxLexer {
    match base {
        FENCE_C_BASE => &C,
        FENCE_PYTHON_BASE => &Python,
        FENCE_JSON_BASE => &Json,
        _ => unreachable!("unknown fence base"),
    }
}

fn base_for_language(lang: &str) -> Option<i32> {
    match lang {
        "c" | "h" => Some(FENCE_C_BASE),
        "python" | "py" => Some(FENCE_PYTHON_BASE),
        "json" => Some(FENCE_JSON_BASE),
        _ => None,
    }
}

fn fence_base(state: i32) -> Option<i32> {
    for base in [FENCE_C_BASE, FENCE_PYTHON_BASE, FENCE_JSON_BASE] {
        if state >= base && state < base + 100 {
            return Some(base);
        }
    }
    None
}

pub struct Markdown;

impl SyntaxLexer for Markdown {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".md", ".markdown"]
    }

    fn calculate(&self, st: &mut SyntaxState) -> i32 {
        if let Some(base) = fence_base(st.state) {
            return nested_fence_line(st, base);
        }
        if st.eol() {
            return -1;
        }
        if st.i == 0 && st.remaining().starts_with("```") {
            let lang: String = st
                .remaining()
                .trim_start_matches('`')
                .chars()
                .take_while(|c| c.is_alphanumeric())
                .collect();
            let marker_len = 3 + lang.chars().count();
            st.paint_run(marker_len, SyntaxClass::Pragma);
            if let Some(base) = base_for_language(&lang) {
                return base;
            }
            // Unknown/no language: consume the rest of the line unstyled and
            // stay in "normal" markdown rather than tracking a distinct
            // fenced-code continuation state.
            while !st.eol() {
                st.advance();
            }
            return -1;
        }
        if st.current() == Some('*') && st.peek(1) == Some('*') {
            st.paint_advance(SyntaxClass::Bold);
            st.paint_advance(SyntaxClass::Bold);
            while !st.eol() {
                let closing = st.current() == Some('*') && st.peek(1) == Some('*');
                st.paint_advance(SyntaxClass::Bold);
                if closing {
                    st.paint_advance(SyntaxClass::Bold);
                    break;
                }
            }
            return 0;
        }
        if st.current() == Some('[') {
            let mut depth = 0u32;
            loop {
                if st.eol() {
                    break;
                }
                let c = st.current();
                st.paint_advance(SyntaxClass::Link);
                match c {
                    Some('(') => depth += 1,
                    Some(')') => {
                        if depth > 0 {
                            depth -= 1;
                        }
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
            }
            return 0;
        }
        st.advance();
        0
    }
}

fn nested_fence_line(st: &mut SyntaxState, base: i32) -> i32 {
    if st.i == 0 && st.remaining().trim_end() == "```" {
        while !st.eol() {
            st.paint_advance(SyntaxClass::Pragma);
        }
        return -1;
    }
    let nested = nested_for_base(base);
    st.state = st.state - base;
    if st.i == 0 && st.state == 0 {
        // Freshly entered fence: nested lexers expect `-1` ("initial/none").
        st.state = -1;
    }
    let result = nested.calculate(st);
    if result == 0 {
        st.state = base + st.state.max(0);
        return 0;
    }
    if result == -1 {
        base
    } else {
        base + result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recompute_cascade;
    use bim_text::Line;

    #[test]
    fn fenced_c_block_dispatches_to_nested_lexer() {
        let mut lines = vec![
            Line::from_str("before"),
            Line::from_str("```c"),
            Line::from_str("int x = 1;"),
            Line::from_str("```"),
            Line::from_str("after"),
        ];
        recompute_cascade(&mut lines, 0, &Markdown);
        assert_eq!(lines[1].istate, -1);
        assert!(fence_base(lines[2].istate).is_some());
        // "int" should be painted as a C type by the nested lexer.
        assert_eq!(lines[2].cells()[0].syntax_class(), SyntaxClass::Type);
        assert_eq!(lines[4].istate, -1);
    }

    #[test]
    fn bold_text_is_painted() {
        let mut lines = vec![Line::from_str("**bold** text")];
        recompute_cascade(&mut lines, 0, &Markdown);
        assert_eq!(lines[0].cells()[0].syntax_class(), SyntaxClass::Bold);
    }
}
