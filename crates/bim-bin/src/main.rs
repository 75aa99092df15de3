//! bim entrypoint: CLI argument handling, rc/biminfo wiring, signal
//! handling, and the top-level event loop (§5, §6). Everything this file
//! does is glue — the interesting state lives in `bim-model`/`bim-state`/
//! `bim-actions`; this is the only crate that touches a real tty.

use anyhow::{Context, Result};
use bim_config::{default_biminfo_path, default_rc_path, load_biminfo, load_rc, record_position};
use bim_events::Signal;
use bim_input::InputDecoder;
use bim_model::EditorShell;
use bim_render::theme::default_theme;
use bim_render::{Viewport, redraw_all, redraw_split};
use bim_terminal::{CrosstermTerminal, Terminal, TerminalCapabilities};
use clap::Parser;
use signal_hook::consts::{SIGCONT, SIGTSTP, SIGWINCH};
use signal_hook::iterator::Signals;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// `/etc/bim/VERSION`-style banner, matching `--version` (§6: "prints
/// version + available lexers + themes").
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Bounded-wait tty poll (§5): doubles as the Insert-mode redraw clock.
const POLL_TIMEOUT_MS: u64 = 200;

#[derive(Parser, Debug)]
#[command(name = "bim", about = "A modal terminal text editor", disable_version_flag = true)]
struct Args {
    /// `file` or `file:line` to open at startup.
    path: Option<String>,

    /// Open the initial buffer read-only.
    #[arg(short = 'R', long = "readonly")]
    readonly: bool,

    /// Print FILE with syntax highlighting, no line numbers, then exit.
    #[arg(short = 'c', value_name = "FILE")]
    cat_plain: Option<PathBuf>,

    /// Print FILE with syntax highlighting and line numbers, then exit.
    #[arg(short = 'C', value_name = "FILE")]
    cat_numbered: Option<PathBuf>,

    /// Override the rc file path (default `~/.bimrc`).
    #[arg(short = 'u', value_name = "PATH")]
    rc_path: Option<PathBuf>,

    /// Toggle a terminal capability or engine feature off (repeatable).
    #[arg(short = 'O', value_name = "OPTION")]
    options: Vec<String>,

    /// Print version, available lexers, and available themes.
    #[arg(long = "version")]
    version: bool,
}

fn main() -> Result<()> {
    // `-?` is a historical alias for `--help`; clap's derive can't bind
    // `?` as a short flag, so rewrite it before parsing.
    let argv: Vec<String> = std::env::args()
        .map(|a| if a == "-?" { "--help".to_string() } else { a })
        .collect();

    let args = match Args::try_parse_from(argv) {
        Ok(a) => a,
        Err(e) => {
            // clap prints --help/--version text through this same path;
            // only a genuine usage error should yield exit code 1 (§6).
            let code = if e.exit_code() == 0 { 0 } else { 1 };
            e.print().ok();
            std::process::exit(code);
        }
    };

    if args.version {
        print_version();
        return Ok(());
    }

    if let Some(path) = args.cat_plain.as_ref() {
        return print_highlighted(path, false);
    }
    if let Some(path) = args.cat_numbered.as_ref() {
        return print_highlighted(path, true);
    }

    let _log_guard = configure_logging()?;
    info!(target: "runtime", version = VERSION, "startup");

    let config = load_rc(args.rc_path.as_deref().or(Some(&default_rc_path())));
    let biminfo_path = default_biminfo_path();
    let mut biminfo = load_biminfo(Some(&biminfo_path));

    let mut shell = EditorShell::new(config);
    let nosyntax = args.options.iter().any(|o| o == "nosyntax");
    let mut term = CrosstermTerminal::new();
    let term_name = std::env::var("TERM").unwrap_or_default();
    let mut caps = TerminalCapabilities::detect(&term_name);
    for opt in &args.options {
        if !caps.apply_option(opt) {
            warn!(target: "runtime.cli", option = %opt, "unrecognized_terminal_option");
        }
    }

    if let Some(spec) = args.path.as_deref() {
        let (file_path, explicit_line) = split_file_line(spec);
        match shell.open(&file_path) {
            Ok(idx) => {
                if args.readonly {
                    shell.buffer_mut(idx).unwrap().readonly = true;
                }
                if nosyntax {
                    clear_syntax(&mut shell, idx);
                }
                if shell.config.git {
                    bim_plugin::apply(shell.buffer_mut(idx).unwrap(), std::path::Path::new(&file_path));
                }
                let buf = shell.buffer_mut(idx).unwrap();
                if let Some(line) = explicit_line {
                    buf.goto_line(line);
                } else if let Ok(abs) = std::fs::canonicalize(&file_path) {
                    if let Some(entry) = biminfo.lookup(&abs.display().to_string()) {
                        buf.goto_line(entry.line_no);
                        buf.col_no = entry.col_no;
                        buf.clamp_cursor();
                    }
                }
            }
            Err(e) => {
                warn!(target: "runtime.cli", %e, "open_failed_starting_with_empty_buffer");
            }
        }
    }

    let mut guard = term.enter_guard().context("failed to enter raw mode")?;
    if caps.can_mouse {
        guard.enable_mouse().ok();
    }
    if caps.can_title {
        guard.set_title("bim").ok();
    }

    let result = run_event_loop(&mut *guard, &caps, &mut shell);

    guard.release().ok();
    for buf in shell.buffers() {
        if let Some(path) = &buf.file_name {
            record_position(Some(&biminfo_path), path, buf.line_no, buf.col_no);
        }
    }

    result
}

/// The core event loop (§5): poll pending signals, then block on tty input
/// for up to [`POLL_TIMEOUT_MS`], dispatch, repaint.
fn run_event_loop(
    term: &mut dyn Terminal,
    caps: &TerminalCapabilities,
    shell: &mut EditorShell,
) -> Result<()> {
    let mut signals = Signals::new([SIGWINCH, SIGTSTP, SIGCONT]).context("failed to register signal handlers")?;
    let mut decoder = InputDecoder::new();
    let mut dispatcher = bim_actions::Dispatcher::new();
    let theme = default_theme();
    let mut status = String::new();
    let mut status_is_error = false;
    let mut suspended_guard: Option<()> = None;

    let (cols, rows) = term.size()?;
    let mut viewport = Viewport { cols, rows, show_tabbar: shell.buffers().len() > 1 };
    repaint(term, caps, &theme, shell, &viewport, &status, status_is_error)?;

    loop {
        for sig in signals.pending() {
            match sig {
                SIGWINCH => {
                    let (cols, rows) = term.size()?;
                    viewport = Viewport { cols, rows, show_tabbar: shell.buffers().len() > 1 };
                    repaint(term, caps, &theme, shell, &viewport, &status, status_is_error)?;
                }
                SIGTSTP => {
                    term.disable_mouse().ok();
                    term.leave_alt_screen().ok();
                    term.set_cooked().ok();
                    suspended_guard = Some(());
                    let _ = signal_hook::low_level::emulate_default_handler(SIGTSTP);
                }
                SIGCONT => {
                    if suspended_guard.take().is_some() {
                        term.set_raw().ok();
                        term.enter_alt_screen().ok();
                        if caps.can_mouse {
                            term.enable_mouse().ok();
                        }
                        let (cols, rows) = term.size()?;
                        viewport = Viewport { cols, rows, show_tabbar: shell.buffers().len() > 1 };
                        repaint(term, caps, &theme, shell, &viewport, &status, status_is_error)?;
                    }
                }
                _ => {}
            }
        }

        let Some(byte) = term.read_byte(POLL_TIMEOUT_MS)? else {
            if let Some(event) = decoder.timeout() {
                let outcome = dispatcher.handle(shell, event);
                apply_outcome(term, caps, &theme, shell, &mut viewport, &mut status, &mut status_is_error, outcome)?;
            }
            continue;
        };
        let Some(event) = decoder.feed(byte) else { continue };
        let outcome = dispatcher.handle(shell, event);
        if outcome.quit {
            break;
        }
        apply_outcome(term, caps, &theme, shell, &mut viewport, &mut status, &mut status_is_error, outcome)?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn apply_outcome(
    term: &mut dyn Terminal,
    caps: &TerminalCapabilities,
    theme: &bim_render::theme::Theme,
    shell: &mut EditorShell,
    viewport: &mut Viewport,
    status: &mut String,
    status_is_error: &mut bool,
    outcome: bim_actions::Outcome,
) -> Result<()> {
    if let Some(msg) = outcome.status {
        *status = msg.text;
        *status_is_error = msg.is_error;
    }
    if let Some(Signal::Suspend) = outcome.signal {
        term.disable_mouse().ok();
        term.leave_alt_screen().ok();
        term.set_cooked().ok();
        let _ = signal_hook::low_level::emulate_default_handler(SIGTSTP);
        term.set_raw().ok();
        term.enter_alt_screen().ok();
        if caps.can_mouse {
            term.enable_mouse().ok();
        }
    }
    viewport.show_tabbar = shell.buffers().len() > 1;
    if outcome.dirty {
        repaint(term, caps, theme, shell, viewport, status, *status_is_error)?;
    }
    Ok(())
}

fn repaint(
    term: &mut dyn Terminal,
    caps: &TerminalCapabilities,
    theme: &bim_render::theme::Theme,
    shell: &mut EditorShell,
    viewport: &Viewport,
    status: &str,
    status_is_error: bool,
) -> Result<()> {
    let padding = shell.config.padding;
    bim_render::place_cursor_actual(shell.active_mut(), viewport, padding);
    let tab_names: Vec<String> = shell
        .buffers()
        .iter()
        .map(|b| b.file_name.as_ref().map(|p| filename_of(p)).unwrap_or_else(|| "[No Name]".to_string()))
        .collect();
    let active = shell.active_index();
    let colorgutter = shell.config.colorgutter;
    let hlcurrent = shell.config.hlcurrent;

    if shell.is_split() {
        let left_idx = shell.left.unwrap().buffer;
        let right_idx = shell.right.unwrap().buffer;
        let left_buf = shell.buffer(left_idx).cloned();
        let right_buf = shell.buffer(right_idx).cloned();
        if let (Some(left_buf), Some(right_buf)) = (left_buf, right_buf) {
            redraw_split(term, theme, &left_buf, &right_buf, viewport, colorgutter, hlcurrent, shell.config.splitpercent)?;
            bim_render::redraw_statusbar(term, theme, shell.active(), viewport)?;
            bim_render::redraw_commandline(term, theme, viewport, status, status_is_error)?;
            term.flush()?;
            return Ok(());
        }
    }

    redraw_all(
        term,
        caps,
        theme,
        shell.active(),
        viewport,
        &tab_names,
        active,
        status,
        status_is_error,
        colorgutter,
        hlcurrent,
    )
}

fn filename_of(path: &std::path::Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_else(|| path.display().to_string())
}

/// Split a `file` or `file:line` CLI argument (§6 "positional `[file[:line]]`").
fn split_file_line(spec: &str) -> (String, Option<usize>) {
    if let Some((file, line)) = spec.rsplit_once(':') {
        if let Ok(n) = line.parse::<usize>() {
            return (file.to_string(), Some(n));
        }
    }
    (spec.to_string(), None)
}

fn clear_syntax(shell: &mut EditorShell, idx: usize) {
    // Built locally rather than borrowed from `shell.lexers`: a method call
    // needing `&mut shell` (`buffer_mut`) can't coexist with a borrow held
    // from another of `shell`'s fields.
    let registry = bim_syntax::LexerRegistry::with_builtins();
    let lexer = registry.by_name("plain").expect("plain lexer is always registered");
    if let Some(buf) = shell.buffer_mut(idx) {
        buf.syntax_name = None;
        bim_syntax::recompute_cascade(buf.lines_mut(), 0, lexer);
    }
}

fn print_version() {
    let lexers = bim_syntax::LexerRegistry::with_builtins();
    println!("bim {VERSION}");
    println!("lexers: {}", lexers.names().join(", "));
    println!("themes: {}", default_theme().name);
}

/// `-c`/`-C` (§6): render one file's syntax highlighting straight to
/// stdout and exit, bypassing the editor loop entirely.
fn print_highlighted(path: &std::path::Path, numbered: bool) -> Result<()> {
    let mut buf = bim_state::Buffer::open(path).with_context(|| format!("could not open {}", path.display()))?;
    let registry = bim_syntax::LexerRegistry::with_builtins();
    let filename = path.to_string_lossy();
    let lexer = registry.for_filename(&filename).unwrap_or_else(|| registry.by_name("plain").unwrap());
    buf.syntax_name = Some(lexer.name().to_string());
    bim_syntax::recompute_cascade(buf.lines_mut(), 0, lexer);

    let theme = default_theme();
    let width = buf.line_count().to_string().len();
    let mut out = String::new();
    for (idx, line) in buf.lines().iter().enumerate() {
        if numbered {
            out.push_str(&format!("{:>width$} ", idx + 1, width = width));
        }
        let mut current = None;
        for cell in line.cells() {
            let pair = theme.syntax_color(cell.syntax_class());
            let key = (pair.fg, pair.bg);
            if current != Some(key) {
                out.push_str(&bim_render::ansi::sgr(pair));
                current = Some(key);
            }
            out.push(cell.codepoint);
        }
        out.push_str(&bim_render::ansi::reset_sgr());
        out.push('\n');
    }
    print!("{out}");
    Ok(())
}

/// Non-blocking file appender (§9 ambient stack) — a TUI occupies stdout,
/// so diagnostics go to `$TMPDIR/bim.log` instead.
fn configure_logging() -> Result<WorkerGuard> {
    let dir = std::env::temp_dir();
    let appender = tracing_appender::rolling::never(dir, "bim.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .init();
    debug!(target: "runtime", "logging_configured");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_file_and_line() {
        assert_eq!(split_file_line("foo.rs:42"), ("foo.rs".to_string(), Some(42)));
        assert_eq!(split_file_line("foo.rs"), ("foo.rs".to_string(), None));
        assert_eq!(split_file_line("C:weird"), ("C:weird".to_string(), None));
    }
}
