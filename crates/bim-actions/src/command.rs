//! The colon-command grammar (§6 "Colon-command surface") and its
//! executor. Parsing is a structured enum rather than ad-hoc string
//! matching in the dispatcher, so new commands attach in one place.

use crate::substitute;
use bim_model::EditorShell;
use bim_state::BimError;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedCommand {
    Edit(Option<String>),
    Write(Option<String>),
    WriteQuit,
    Quit { force: bool },
    QuitAll { force: bool },
    TabNew(Option<String>),
    TabNext,
    TabPrev,
    /// `range` is the selection-derived 0-based inclusive line range
    /// remembered when `:` was entered from a visual selection (§4.H, §6);
    /// ignored when `whole_file` is set.
    Substitute { body: String, whole_file: bool, range: Option<(usize, usize)> },
    NoHighlight,
    Syntax(Option<String>),
    Theme(Option<String>),
    Tabs,
    Spaces,
    TabStop(String),
    Indent(bool),
    Padding(String),
    HlParen(String),
    HlCurrent(String),
    SmartCase(String),
    ColorGutter(String),
    Split(Option<String>),
    SplitPercent(String),
    Unsplit,
    Git(String),
    ClearYank,
    History,
    Recalc,
    Help,
    GotoLine(usize),
    Shell(String),
    Unknown(String),
}

/// Parse the text typed in Command mode, with the leading `:` already
/// stripped by the dispatcher.
pub fn parse(raw: &str) -> ParsedCommand {
    let s = raw.trim();
    if let Some(cmd) = s.strip_prefix('!') {
        return ParsedCommand::Shell(cmd.to_string());
    }
    if let Ok(n) = s.parse::<usize>() {
        return ParsedCommand::GotoLine(n);
    }
    let (head, tail) = split_head(s);
    let arg = || -> Option<String> {
        let t = tail.trim();
        if t.is_empty() { None } else { Some(t.to_string()) }
    };
    match head {
        "e" => ParsedCommand::Edit(arg()),
        "w" => ParsedCommand::Write(arg()),
        "wq" => ParsedCommand::WriteQuit,
        "q" => ParsedCommand::Quit { force: false },
        "q!" => ParsedCommand::Quit { force: true },
        "qa" => ParsedCommand::QuitAll { force: false },
        "qa!" => ParsedCommand::QuitAll { force: true },
        "tabnew" => ParsedCommand::TabNew(arg()),
        "tabp" => ParsedCommand::TabPrev,
        "tabn" => ParsedCommand::TabNext,
        "noh" => ParsedCommand::NoHighlight,
        "syntax" => ParsedCommand::Syntax(arg()),
        "theme" => ParsedCommand::Theme(arg()),
        "tabs" => ParsedCommand::Tabs,
        "spaces" => ParsedCommand::Spaces,
        "tabstop" => ParsedCommand::TabStop(tail.trim().to_string()),
        "indent" => ParsedCommand::Indent(true),
        "noindent" => ParsedCommand::Indent(false),
        "padding" => ParsedCommand::Padding(tail.trim().to_string()),
        "hlparen" => ParsedCommand::HlParen(tail.trim().to_string()),
        "hlcurrent" => ParsedCommand::HlCurrent(tail.trim().to_string()),
        "smartcase" => ParsedCommand::SmartCase(tail.trim().to_string()),
        "colorgutter" => ParsedCommand::ColorGutter(tail.trim().to_string()),
        "split" => ParsedCommand::Split(arg()),
        "splitpercent" => ParsedCommand::SplitPercent(tail.trim().to_string()),
        "unsplit" => ParsedCommand::Unsplit,
        "git" => ParsedCommand::Git(tail.trim().to_string()),
        "clearyank" => ParsedCommand::ClearYank,
        "history" => ParsedCommand::History,
        "recalc" => ParsedCommand::Recalc,
        "help" => ParsedCommand::Help,
        _ if head.starts_with("%s") => {
            ParsedCommand::Substitute { body: head[2..].to_string() + tail, whole_file: true, range: None }
        }
        _ if head.starts_with('s') && head.len() > 1 && !head.as_bytes()[1].is_ascii_alphanumeric() => {
            ParsedCommand::Substitute { body: head[1..].to_string() + tail, whole_file: false, range: None }
        }
        _ => ParsedCommand::Unknown(s.to_string()),
    }
}

fn split_head(body: &str) -> (&str, &str) {
    let mut idx = 0usize;
    for (offset, ch) in body.char_indices() {
        if ch.is_whitespace() {
            break;
        }
        idx = offset + ch.len_utf8();
    }
    let head = &body[..idx];
    let rest = if idx < body.len() { &body[idx..] } else { "" };
    (head, rest)
}

/// Outcome of executing one colon command: a status line and whether the
/// whole application should quit.
pub struct Executed {
    pub message: Option<String>,
    pub is_error: bool,
    pub quit: bool,
}

impl Executed {
    fn ok(message: impl Into<String>) -> Self {
        Self { message: Some(message.into()), is_error: false, quit: false }
    }
    fn err(message: impl Into<String>) -> Self {
        Self { message: Some(message.into()), is_error: true, quit: false }
    }
    fn silent() -> Self {
        Self { message: None, is_error: false, quit: false }
    }
    fn quit() -> Self {
        Self { message: None, is_error: false, quit: true }
    }
}

pub fn execute(shell: &mut EditorShell, parsed: ParsedCommand) -> Executed {
    match parsed {
        ParsedCommand::Edit(path) => match path {
            None => match shell.active_mut().reload() {
                Ok(()) => Executed::ok("reloaded"),
                Err(e) => Executed::err(e.to_string()),
            },
            Some(p) => match shell.open_into_active(&p) {
                Ok(()) => Executed::ok(format!("opened {p}")),
                Err(e) => Executed::err(e.to_string()),
            },
        },
        ParsedCommand::Write(path) => {
            let path_buf = path.as_ref().map(PathBuf::from);
            match shell.active_mut().write(path_buf.as_deref()) {
                Ok(n) => Executed::ok(format!("{n} bytes written")),
                Err(e) => Executed::err(e.to_string()),
            }
        }
        ParsedCommand::WriteQuit => match shell.active_mut().write(None) {
            Ok(_) => finish_close(shell),
            Err(e) => Executed::err(e.to_string()),
        },
        ParsedCommand::Quit { force } => {
            if !force && shell.active().modified() {
                return Executed::err("no write since last change (add ! to override)");
            }
            finish_close(shell)
        }
        ParsedCommand::QuitAll { force } => {
            if !force && shell.any_modified() {
                return Executed::err("no write since last change (add ! to override)");
            }
            info!(target: "actions.command", "quit_all");
            Executed::quit()
        }
        ParsedCommand::TabNew(path) => match path {
            None => {
                shell.tabnew_empty();
                Executed::ok("new buffer")
            }
            Some(p) => match shell.open(&p) {
                Ok(_) => Executed::ok(format!("opened {p}")),
                Err(e) => Executed::err(e.to_string()),
            },
        },
        ParsedCommand::TabNext => {
            shell.tabnext();
            Executed::silent()
        }
        ParsedCommand::TabPrev => {
            shell.tabprev();
            Executed::silent()
        }
        ParsedCommand::Substitute { body, whole_file, range } => run_substitute(shell, &body, whole_file, range),
        ParsedCommand::NoHighlight => {
            let buf = shell.active_mut();
            buf.search = None;
            buf.clear_overlays();
            Executed::silent()
        }
        ParsedCommand::Syntax(name) => {
            let buf = shell.active_mut();
            buf.syntax_name = match name.as_deref() {
                Some("none") | None => None,
                Some(n) => Some(n.to_string()),
            };
            crate::recompute_active_syntax(shell);
            Executed::silent()
        }
        ParsedCommand::Theme(name) => match name {
            Some(n) => {
                shell.config.theme = n.clone();
                Executed::ok(format!("theme set to {n}"))
            }
            None => Executed::ok(shell.config.theme.clone()),
        },
        ParsedCommand::Tabs => {
            shell.active_mut().set_tabs(true);
            Executed::silent()
        }
        ParsedCommand::Spaces => {
            shell.active_mut().set_tabs(false);
            Executed::silent()
        }
        ParsedCommand::TabStop(v) => match v.parse::<u8>() {
            Ok(0) | Err(_) => Executed::err(BimError::InvalidArgument(format!("bad tabstop {v:?}")).to_string()),
            Ok(n) => {
                shell.active_mut().set_tabstop(n);
                Executed::silent()
            }
        },
        ParsedCommand::Indent(on) => {
            shell.active_mut().set_indent(on);
            Executed::silent()
        }
        ParsedCommand::Padding(v) => set_u16(&mut shell.config.padding, &v),
        ParsedCommand::HlParen(v) => set_bool(&mut shell.config.hlparen, &v),
        ParsedCommand::HlCurrent(v) => set_bool(&mut shell.config.hlcurrent, &v),
        ParsedCommand::SmartCase(v) => set_bool(&mut shell.config.smartcase, &v),
        ParsedCommand::ColorGutter(v) => set_bool(&mut shell.config.colorgutter, &v),
        ParsedCommand::Split(path) => {
            if let Some(p) = path {
                if let Err(e) = shell.open(&p) {
                    return Executed::err(e.to_string());
                }
            }
            shell.split();
            Executed::silent()
        }
        ParsedCommand::SplitPercent(v) => match v.parse::<u8>() {
            Ok(n) if n > 0 && n < 100 => {
                shell.config.splitpercent = n;
                Executed::silent()
            }
            _ => Executed::err(BimError::InvalidArgument(format!("bad splitpercent {v:?}")).to_string()),
        },
        ParsedCommand::Unsplit => {
            shell.unsplit();
            Executed::silent()
        }
        ParsedCommand::Git(v) => set_bool(&mut shell.config.git, &v),
        ParsedCommand::ClearYank => {
            shell.yank = bim_state::Yank::empty();
            Executed::silent()
        }
        ParsedCommand::History => {
            let pos = shell.active().history.pos();
            Executed::ok(format!("history position {pos}"))
        }
        ParsedCommand::Recalc => {
            crate::recompute_active_syntax(shell);
            Executed::ok("syntax recalculated")
        }
        ParsedCommand::Help => Executed::ok(
            "commands: e w wq q q! qa qa! tabnew tabp tabn s/pat/rep/flags noh syntax theme \
             tabs spaces tabstop padding hlparen hlcurrent smartcase colorgutter split \
             splitpercent unsplit git clearyank history recalc !cmd <line>",
        ),
        ParsedCommand::GotoLine(n) => {
            shell.active_mut().goto_line(n);
            Executed::silent()
        }
        ParsedCommand::Shell(cmd) => run_shell(&cmd),
        ParsedCommand::Unknown(s) => {
            debug!(target: "actions.command", cmd = %s, "unknown_command");
            Executed::err(BimError::ParseCommand(s).to_string())
        }
    }
}

fn finish_close(shell: &mut EditorShell) -> Executed {
    if shell.close_active() {
        Executed::silent()
    } else {
        Executed::quit()
    }
}

/// Applies `:s`/`:%s`. `range`, when present, is a selection-derived
/// 0-based inclusive line range (§4.H "entering `:` from a selection means
/// Command mode is operating on the selection range") and takes priority
/// over the current-line default whenever the command isn't whole-file.
fn run_substitute(shell: &mut EditorShell, body: &str, whole_file: bool, range: Option<(usize, usize)>) -> Executed {
    let sub = match substitute::parse(body, whole_file) {
        Ok(s) => s,
        Err(e) => return Executed::err(e),
    };
    let buf = shell.active_mut();
    let last = buf.line_count().saturating_sub(1);
    let (from, to) = if whole_file {
        (0, last)
    } else if let Some((lo, hi)) = range {
        (lo.min(last), hi.min(last))
    } else {
        (buf.cur_idx(), buf.cur_idx())
    };
    match substitute::apply(buf, &sub, from, to) {
        Ok(0) => Executed::err(BimError::PatternNotFound.to_string()),
        Ok(n) => {
            buf.push_break();
            let plural = if n == 1 { "" } else { "s" };
            Executed::ok(format!("replaced {n} instance{plural} of {}", sub.needle))
        }
        Err(e) => Executed::err(e.to_string()),
    }
}

fn set_bool(field: &mut bool, raw: &str) -> Executed {
    match raw {
        "1" | "on" | "true" => {
            *field = true;
            Executed::silent()
        }
        "0" | "off" | "false" => {
            *field = false;
            Executed::silent()
        }
        _ => Executed::err(BimError::InvalidArgument(raw.to_string()).to_string()),
    }
}

fn set_u16(field: &mut u16, raw: &str) -> Executed {
    match raw.parse::<u16>() {
        Ok(n) => {
            *field = n;
            Executed::silent()
        }
        Err(_) => Executed::err(BimError::InvalidArgument(raw.to_string()).to_string()),
    }
}

/// `!CMD`: shell out, reporting the first line of output (§6).
fn run_shell(cmd: &str) -> Executed {
    match std::process::Command::new("sh").arg("-c").arg(cmd).output() {
        Ok(output) if output.status.success() => {
            let first_line = String::from_utf8_lossy(&output.stdout).lines().next().unwrap_or("").to_string();
            Executed::ok(first_line)
        }
        Ok(output) => Executed::err(String::from_utf8_lossy(&output.stderr).lines().next().unwrap_or("command failed").to_string()),
        Err(e) => Executed::err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_write_with_path() {
        assert_eq!(parse("w foo.txt"), ParsedCommand::Write(Some("foo.txt".to_string())));
    }

    #[test]
    fn parses_bare_integer_as_goto() {
        assert_eq!(parse("42"), ParsedCommand::GotoLine(42));
    }

    #[test]
    fn parses_whole_file_substitute() {
        match parse("%s/a/b/g") {
            ParsedCommand::Substitute { body, whole_file, range } => {
                assert!(whole_file);
                assert_eq!(body, "/a/b/g");
                assert_eq!(range, None);
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn parses_current_line_substitute() {
        match parse("s/a/b/") {
            ParsedCommand::Substitute { whole_file, range, .. } => {
                assert!(!whole_file);
                assert_eq!(range, None);
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn substitute_uses_selection_range_over_current_line() {
        let mut shell = EditorShell::new(bim_config::GlobalConfig::default());
        *shell.active_mut() = bim_state::Buffer::from_text("a\nfoo\nfoo\nb\n");
        shell.active_mut().line_no = 1;
        let executed = run_substitute(&mut shell, "/foo/bar/", false, Some((1, 2)));
        assert!(!executed.is_error, "{:?}", executed.message);
        assert_eq!(shell.active().lines()[1].to_string_lossy(), "bar");
        assert_eq!(shell.active().lines()[2].to_string_lossy(), "bar");
        assert_eq!(shell.active().lines()[0].to_string_lossy(), "a");
    }

    #[test]
    fn parses_shell_out() {
        assert_eq!(parse("!echo hi"), ParsedCommand::Shell("echo hi".to_string()));
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert_eq!(parse("bogus"), ParsedCommand::Unknown("bogus".to_string()));
    }
}
