//! Color themes (§1 "deliberately out of scope" — pinned here only as an
//! opaque interface: each slot resolves to an fg/bg string pair). A real
//! theme file format and the rest of the palette are an external
//! collaborator's concern; the renderer only needs `resolve`.

use bim_text::SyntaxClass;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Default,
    Syntax(SyntaxClass),
    StatusBar,
    StatusBarModified,
    CommandLine,
    ErrorMessage,
    Gutter,
    GutterAdded,
    GutterModified,
    GutterDeleted,
    Selection,
    SearchMatch,
    CurrentLine,
    TabBarActive,
    TabBarInactive,
}

/// An opaque fg/bg color pair; the renderer treats these as plain strings
/// to splice into an SGR sequence (§4.E "a `flag → color` function resolves
/// classes to theme strings").
#[derive(Debug, Clone, Copy)]
pub struct ColorPair {
    pub fg: &'static str,
    pub bg: &'static str,
}

pub struct Theme {
    pub name: String,
    palette: HashMap<Slot, ColorPair>,
}

impl Theme {
    pub fn resolve(&self, slot: Slot) -> ColorPair {
        self.palette
            .get(&slot)
            .copied()
            .unwrap_or(ColorPair { fg: "39", bg: "49" })
    }

    pub fn syntax_color(&self, class: SyntaxClass) -> ColorPair {
        self.resolve(Slot::Syntax(class))
    }
}

/// A 256-color default theme, loosely matching the original editor's
/// built-in palette (keyword blue, string green, comment gray, numeral
/// magenta, etc.).
pub fn default_theme() -> Theme {
    let mut palette = HashMap::new();
    palette.insert(Slot::Default, ColorPair { fg: "39", bg: "49" });
    palette.insert(Slot::Syntax(SyntaxClass::Keyword), ColorPair { fg: "38;5;33", bg: "49" });
    palette.insert(Slot::Syntax(SyntaxClass::String), ColorPair { fg: "38;5;71", bg: "49" });
    palette.insert(Slot::Syntax(SyntaxClass::String2), ColorPair { fg: "38;5;71", bg: "49" });
    palette.insert(Slot::Syntax(SyntaxClass::Comment), ColorPair { fg: "38;5;242", bg: "49" });
    palette.insert(Slot::Syntax(SyntaxClass::Type), ColorPair { fg: "38;5;214", bg: "49" });
    palette.insert(Slot::Syntax(SyntaxClass::Pragma), ColorPair { fg: "38;5;135", bg: "49" });
    palette.insert(Slot::Syntax(SyntaxClass::Numeral), ColorPair { fg: "38;5;176", bg: "49" });
    palette.insert(Slot::Syntax(SyntaxClass::DiffPlus), ColorPair { fg: "38;5;28", bg: "49" });
    palette.insert(Slot::Syntax(SyntaxClass::DiffMinus), ColorPair { fg: "38;5;124", bg: "49" });
    palette.insert(Slot::Syntax(SyntaxClass::Notice), ColorPair { fg: "38;5;208", bg: "49" });
    palette.insert(Slot::Syntax(SyntaxClass::Bold), ColorPair { fg: "1;39", bg: "49" });
    palette.insert(Slot::Syntax(SyntaxClass::Link), ColorPair { fg: "4;38;5;75", bg: "49" });
    palette.insert(Slot::Syntax(SyntaxClass::Escape), ColorPair { fg: "38;5;208", bg: "49" });
    palette.insert(Slot::StatusBar, ColorPair { fg: "97", bg: "100" });
    palette.insert(Slot::StatusBarModified, ColorPair { fg: "97", bg: "124" });
    palette.insert(Slot::CommandLine, ColorPair { fg: "39", bg: "49" });
    palette.insert(Slot::ErrorMessage, ColorPair { fg: "97", bg: "41" });
    palette.insert(Slot::Gutter, ColorPair { fg: "38;5;240", bg: "49" });
    palette.insert(Slot::GutterAdded, ColorPair { fg: "38;5;28", bg: "49" });
    palette.insert(Slot::GutterModified, ColorPair { fg: "38;5;178", bg: "49" });
    palette.insert(Slot::GutterDeleted, ColorPair { fg: "38;5;124", bg: "49" });
    palette.insert(Slot::Selection, ColorPair { fg: "30", bg: "44" });
    palette.insert(Slot::SearchMatch, ColorPair { fg: "30", bg: "43" });
    palette.insert(Slot::CurrentLine, ColorPair { fg: "39", bg: "38;5;236" });
    palette.insert(Slot::TabBarActive, ColorPair { fg: "97", bg: "100" });
    palette.insert(Slot::TabBarInactive, ColorPair { fg: "37", bg: "49" });
    Theme { name: "default".to_string(), palette }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_slot_falls_back_to_terminal_default() {
        let theme = Theme { name: "empty".into(), palette: HashMap::new() };
        let pair = theme.resolve(Slot::StatusBar);
        assert_eq!(pair.fg, "39");
    }

    #[test]
    fn default_theme_resolves_every_syntax_class() {
        let theme = default_theme();
        for class in [
            SyntaxClass::Keyword,
            SyntaxClass::String,
            SyntaxClass::Comment,
            SyntaxClass::Type,
            SyntaxClass::Numeral,
        ] {
            assert_ne!(theme.syntax_color(class).fg, "");
        }
    }
}
