//! Terminal capability flags and known-`TERM` overrides (§6).

/// Feature flags gating which ANSI sequences the renderer may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCapabilities {
    pub can_24bit: bool,
    pub can_256color: bool,
    pub can_italic: bool,
    pub can_bce: bool,
    pub can_scroll: bool,
    pub can_altscreen: bool,
    pub can_hideshow: bool,
    pub can_mouse: bool,
    pub can_bright: bool,
    pub can_title: bool,
}

impl Default for TerminalCapabilities {
    fn default() -> Self {
        Self {
            can_24bit: true,
            can_256color: true,
            can_italic: true,
            can_bce: true,
            can_scroll: true,
            can_altscreen: true,
            can_hideshow: true,
            can_mouse: true,
            can_bright: true,
            can_title: true,
        }
    }
}

impl TerminalCapabilities {
    /// Start from the optimistic defaults, then apply the known-`TERM`
    /// overrides named in §6.
    pub fn detect(term: &str) -> Self {
        let mut caps = Self::default();
        if term == "linux" {
            caps.can_scroll = false;
        } else if term == "cons25" {
            caps.can_24bit = false;
            caps.can_256color = false;
            caps.can_italic = false;
            caps.can_scroll = false;
            caps.can_mouse = false;
            caps.can_title = false;
        } else if term == "sortix" {
            caps.can_title = false;
        } else if term.starts_with("tmux") {
            caps.can_scroll = false;
            caps.can_bce = false;
        } else if term.starts_with("screen") {
            caps.can_24bit = false;
            caps.can_italic = false;
        }
        caps
    }

    /// Apply a `-O noXxx` CLI override (§6).
    pub fn apply_option(&mut self, option: &str) -> bool {
        match option {
            "noaltscreen" => self.can_altscreen = false,
            "noscroll" => self.can_scroll = false,
            "nomouse" => self.can_mouse = false,
            "nounicode" => {}
            "nobright" => self.can_bright = false,
            "nohideshow" => self.can_hideshow = false,
            "nosyntax" => {}
            "nohistory" => {}
            "notitle" => self.can_title = false,
            "nobce" => self.can_bce = false,
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linux_term_disables_scroll_only() {
        let caps = TerminalCapabilities::detect("linux");
        assert!(!caps.can_scroll);
        assert!(caps.can_24bit);
    }

    #[test]
    fn cons25_disables_most_capabilities() {
        let caps = TerminalCapabilities::detect("cons25");
        assert!(!caps.can_24bit);
        assert!(!caps.can_mouse);
        assert!(!caps.can_title);
    }

    #[test]
    fn tmux_prefix_disables_scroll_and_bce() {
        let caps = TerminalCapabilities::detect("tmux-256color");
        assert!(!caps.can_scroll);
        assert!(!caps.can_bce);
        assert!(caps.can_24bit);
    }

    #[test]
    fn screen_prefix_disables_24bit_and_italic() {
        let caps = TerminalCapabilities::detect("screen.xterm");
        assert!(!caps.can_24bit);
        assert!(!caps.can_italic);
        assert!(caps.can_scroll);
    }

    #[test]
    fn unknown_term_keeps_optimistic_defaults() {
        let caps = TerminalCapabilities::detect("xterm-256color");
        assert_eq!(caps, TerminalCapabilities::default());
    }

    #[test]
    fn apply_option_toggles_named_flag() {
        let mut caps = TerminalCapabilities::default();
        assert!(caps.apply_option("nomouse"));
        assert!(!caps.can_mouse);
        assert!(!caps.apply_option("bogus"));
    }
}
