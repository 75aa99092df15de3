use crate::{SyntaxLexer, SyntaxState};

/// The no-op lexer: paints nothing, always closes the line cleanly.
pub struct Plain;

impl SyntaxLexer for Plain {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".txt"]
    }

    fn calculate(&self, _state: &mut SyntaxState) -> i32 {
        -1
    }
}
