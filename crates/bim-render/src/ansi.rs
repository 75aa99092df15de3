//! Standard ANSI/ECMA-48 escape-sequence builders (§6 "The core emits
//! standard ANSI/ECMA-48 sequences"). Pure string construction — no I/O.

use crate::theme::ColorPair;

/// Move the cursor to `(row, col)`, both 1-based.
pub fn move_to(row: u16, col: u16) -> String {
    format!("\x1b[{row};{col}H")
}

pub fn clear_screen() -> String {
    "\x1b[2J".to_string()
}

pub fn clear_line_from_cursor() -> String {
    "\x1b[K".to_string()
}

pub fn sgr(pair: ColorPair) -> String {
    format!("\x1b[0;{};{}m", pair.fg, pair.bg)
}

pub fn reset_sgr() -> String {
    "\x1b[0m".to_string()
}

pub fn hide_cursor() -> String {
    "\x1b[?25l".to_string()
}

pub fn show_cursor() -> String {
    "\x1b[?25h".to_string()
}

/// Scroll the region `[top, bottom]` (1-based, inclusive) up by one line,
/// used when the viewport advances by exactly one line and the terminal
/// supports scroll regions (§4.I "emit a one-line scroll").
pub fn scroll_region_up_one(top: u16, bottom: u16) -> String {
    format!("\x1b[{top};{bottom}r\x1b[{bottom};1H\n\x1b[r")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_to_formats_1_based_row_col() {
        assert_eq!(move_to(1, 1), "\x1b[1;1H");
    }

    #[test]
    fn sgr_splices_fg_and_bg() {
        let seq = sgr(ColorPair { fg: "38;5;33", bg: "49" });
        assert_eq!(seq, "\x1b[0;38;5;33;49m");
    }
}
