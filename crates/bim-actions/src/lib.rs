//! The modal dispatcher (§4.H): turns decoded [`InputEvent`]s into
//! mutations on an [`EditorShell`]'s active buffer. This crate owns no
//! tty and no render state — it is the keystroke-semantics layer wedged
//! between `bim-input` and `bim-render`.
//!
//! Per-concern logic lives in sibling modules: `motion` (cursor
//! movement), `selection` (LineSel/CharSel/ColSel ranges),
//! `substitute` (`:s`), and `command` (the colon-command grammar). This
//! module is the state machine that routes a key to the right one.

mod command;
mod motion;
mod selection;
mod substitute;

pub use command::{execute as execute_command, parse as parse_command, ParsedCommand};

use bim_events::{InputEvent, Key, KeyEvent, Signal};
use bim_keymap::{as_plain_digit, ChordMatcher, ChordResultOwned, CountAccumulator};
use bim_model::EditorShell;
use bim_state::{BimError, Direction, Mode};
use selection::ColInsertState;
use tracing::debug;

const COMMAND_HISTORY_CAP: usize = 255;

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false }
    }
    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true }
    }
}

/// What the dispatcher did with one event: whether a repaint is needed,
/// whether the application should exit, an optional status-line message,
/// and any signal the caller (which owns the terminal) still needs to act
/// on (§5 Signal handling — this crate has no `Terminal` capability).
#[derive(Debug, Default)]
pub struct Outcome {
    pub dirty: bool,
    pub quit: bool,
    pub status: Option<StatusMessage>,
    pub signal: Option<Signal>,
}

impl Outcome {
    fn clean() -> Self {
        Self::default()
    }
    fn dirty() -> Self {
        Self { dirty: true, ..Self::default() }
    }
    fn quit() -> Self {
        Self { dirty: true, quit: true, ..Self::default() }
    }
    fn info(msg: impl Into<String>) -> Self {
        Self { dirty: true, status: Some(StatusMessage::info(msg)), ..Self::default() }
    }
    fn error(msg: impl Into<String>) -> Self {
        Self { dirty: true, status: Some(StatusMessage::error(msg)), ..Self::default() }
    }
    fn from_result(r: bim_state::Result<()>) -> Self {
        match r {
            Ok(()) => Self::dirty(),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

/// Recompute the active buffer's syntax highlighting from the top (§4.E).
/// Shared by the per-keystroke chokepoint in [`Dispatcher::handle`] and the
/// `:syntax`/`:recalc` commands.
pub(crate) fn recompute_active_syntax(shell: &mut EditorShell) {
    let name = shell.active().syntax_name.clone();
    let lexer = name
        .as_deref()
        .and_then(|n| shell.lexers.by_name(n))
        .or_else(|| shell.lexers.by_name("plain"))
        .expect("plain lexer is always registered");
    bim_syntax::recompute_cascade(shell.active_mut().lines_mut(), 0, lexer);
}

pub struct Dispatcher {
    count: CountAccumulator,
    chords: ChordMatcher,
    awaiting_replace_char: bool,
    command_line: String,
    command_history: Vec<String>,
    command_history_cursor: Option<usize>,
    last_search_direction: Direction,
    col_insert: Option<ColInsertState>,
    /// Selection-derived line range captured when `:` is pressed from a
    /// visual selection (§4.H), consumed by the next `:s` on Enter.
    pending_sub_range: Option<(usize, usize)>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let mut chords = ChordMatcher::new();
        chords.register("dd", &[Key::Char('d'), Key::Char('d')]);
        chords.register("gg", &[Key::Char('g'), Key::Char('g')]);
        chords.register("ZZ", &[Key::Char('Z'), Key::Char('Z')]);
        Self {
            count: CountAccumulator::new(),
            chords,
            awaiting_replace_char: false,
            command_line: String::new(),
            command_history: Vec::new(),
            command_history_cursor: None,
            last_search_direction: Direction::Forward,
            col_insert: None,
            pending_sub_range: None,
        }
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Route one decoded input event to the handler for the active
    /// buffer's current mode.
    pub fn handle(&mut self, shell: &mut EditorShell, event: InputEvent) -> Outcome {
        let ev = match event {
            InputEvent::Key(k) => k,
            InputEvent::Mouse(_) => return Outcome::clean(),
            InputEvent::Signal(sig) => {
                return Outcome { dirty: true, quit: false, status: None, signal: Some(sig) };
            }
        };

        let outcome = match shell.active().mode {
            Mode::Normal => self.handle_normal(shell, ev),
            Mode::Insert => self.handle_insert(shell, ev),
            Mode::Replace => self.handle_replace(shell, ev),
            Mode::LineSel | Mode::CharSel | Mode::ColSel => self.handle_selection(shell, ev),
            Mode::ColInsert => self.handle_col_insert(shell, ev),
            Mode::Command => self.handle_command_mode(shell, ev),
            Mode::Search(dir) => self.handle_search_mode(shell, ev, dir),
        };

        // §5: model mutation precedes syntax recompute precedes
        // selection/search overlay reapplication precedes repaint.
        if outcome.dirty {
            recompute_active_syntax(shell);
            let hlparen = shell.config.hlparen;
            selection::apply_overlays(shell.active_mut(), hlparen);
        }
        outcome
    }

    fn take_count(&mut self) -> usize {
        self.count.take().unwrap_or(1).max(1)
    }

    // ---- Normal mode (§4.H) --------------------------------------------

    fn handle_normal(&mut self, shell: &mut EditorShell, ev: KeyEvent) -> Outcome {
        if self.awaiting_replace_char {
            self.awaiting_replace_char = false;
            if let Key::Char(c) = ev.key {
                return Outcome::from_result(shell.active_mut().replace_char(c));
            }
            return Outcome::clean();
        }

        if ev.is_ctrl('v') {
            return self.enter_visual(shell, Mode::ColSel);
        }
        if ev.is_ctrl('r') {
            return Outcome::from_result(shell.active_mut().redo());
        }
        if ev.is_ctrl('l') {
            return Outcome::dirty();
        }
        if ev.is_ctrl('z') {
            return Outcome { dirty: false, quit: false, status: None, signal: Some(Signal::Suspend) };
        }

        if let Some(c) = as_plain_digit(&ev) {
            if self.count.feed_digit(c) {
                return Outcome::clean();
            }
        }

        if let Key::Char(c) = ev.key {
            if ev.mods.is_empty() && matches!(c, 'd' | 'g' | 'Z') {
                match self.chords.feed(ev.key) {
                    ChordResultOwned::Pending => return Outcome::clean(),
                    ChordResultOwned::Matched(name) => return self.run_chord(shell, name),
                    ChordResultOwned::NoMatch(keys) => {
                        // Replay the buffered keys as ordinary single-key actions.
                        let count = self.take_count();
                        let mut last = Outcome::clean();
                        for key in keys {
                            last = self.normal_single_key(shell, KeyEvent::plain(key), count);
                        }
                        return last;
                    }
                }
            }
        }

        let count = self.take_count();
        self.normal_single_key(shell, ev, count)
    }

    fn run_chord(&mut self, shell: &mut EditorShell, name: &'static str) -> Outcome {
        let count = self.take_count();
        match name {
            "dd" => {
                let buf = shell.active_mut();
                let idx = buf.cur_idx();
                let mut removed = Vec::new();
                for _ in 0..count.min(buf.line_count()) {
                    match buf.delete_line(idx) {
                        Ok(line) => removed.push(line),
                        Err(e) => return Outcome::error(e.to_string()),
                    }
                }
                buf.push_break();
                if !removed.is_empty() {
                    shell.yank.set_full_lines(removed);
                }
                Outcome::dirty()
            }
            "gg" => {
                motion::goto_top(shell.active_mut());
                Outcome::dirty()
            }
            "ZZ" => match shell.active_mut().write(None) {
                Ok(_) => {
                    if shell.close_active() {
                        Outcome::dirty()
                    } else {
                        Outcome::quit()
                    }
                }
                Err(e) => Outcome::error(e.to_string()),
            },
            _ => Outcome::clean(),
        }
    }

    fn normal_single_key(&mut self, shell: &mut EditorShell, ev: KeyEvent, count: usize) -> Outcome {
        let buf = shell.active_mut();
        match ev.key {
            Key::Char('h') | Key::Left => {
                motion::left(buf, count);
                Outcome::dirty()
            }
            Key::Char('l') | Key::Right => {
                motion::right(buf, count);
                Outcome::dirty()
            }
            Key::Char('j') | Key::Down => {
                motion::down(buf, count);
                Outcome::dirty()
            }
            Key::Char('k') | Key::Up => {
                motion::up(buf, count);
                Outcome::dirty()
            }
            Key::Char('w') => {
                for _ in 0..count {
                    buf.word_right();
                }
                Outcome::dirty()
            }
            Key::Char('b') => {
                for _ in 0..count {
                    buf.word_left();
                }
                Outcome::dirty()
            }
            Key::Char('0') | Key::Home => {
                motion::line_start(buf);
                Outcome::dirty()
            }
            Key::Char('^') => {
                motion::first_nonblank(buf);
                Outcome::dirty()
            }
            Key::Char('$') | Key::End => {
                motion::line_end(buf);
                Outcome::dirty()
            }
            Key::Char('{') => {
                motion::paragraph_backward(buf);
                Outcome::dirty()
            }
            Key::Char('}') => {
                motion::paragraph_forward(buf);
                Outcome::dirty()
            }
            Key::Char('%') => {
                if motion::goto_matching_paren(buf) {
                    Outcome::dirty()
                } else {
                    Outcome::clean()
                }
            }
            Key::Char('G') => {
                motion::goto_bottom(buf);
                Outcome::dirty()
            }
            Key::Char('n') => self.repeat_search(shell, self.last_search_direction),
            Key::Char('N') => self.repeat_search(shell, opposite(self.last_search_direction)),
            Key::Char('*') => {
                if let Some(word) = motion::word_under_cursor(buf) {
                    buf.search = Some(word);
                    self.last_search_direction = Direction::Forward;
                    self.repeat_search(shell, Direction::Forward)
                } else {
                    Outcome::clean()
                }
            }
            Key::Char('i') => {
                buf.mode = Mode::Insert;
                Outcome::dirty()
            }
            Key::Char('a') => {
                buf.mode = Mode::Insert;
                motion::right_for_append(buf);
                Outcome::dirty()
            }
            Key::Char('o') => {
                open_line_below(buf);
                Outcome::dirty()
            }
            Key::Char('O') => {
                open_line_above(buf);
                Outcome::dirty()
            }
            Key::Char('R') => {
                buf.mode = Mode::Replace;
                Outcome::dirty()
            }
            Key::Char('x') => Outcome::from_result(buf.delete_forward()),
            Key::Char('r') => {
                self.awaiting_replace_char = true;
                Outcome::clean()
            }
            Key::Char('p') => Outcome::from_result(paste(shell, false)),
            Key::Char('P') => Outcome::from_result(paste(shell, true)),
            Key::Char('u') => Outcome::from_result(buf.undo()),
            Key::Char('V') => self.enter_visual(shell, Mode::LineSel),
            Key::Char('v') => self.enter_visual(shell, Mode::CharSel),
            Key::Char(':') => {
                self.command_line.clear();
                self.command_history_cursor = None;
                self.pending_sub_range = None;
                buf.mode = Mode::Command;
                Outcome::dirty()
            }
            Key::Char('/') => {
                self.command_line.clear();
                buf.mode = Mode::Search(Direction::Forward);
                Outcome::dirty()
            }
            Key::Char('?') => {
                self.command_line.clear();
                buf.mode = Mode::Search(Direction::Backward);
                Outcome::dirty()
            }
            Key::Escape => Outcome::clean(),
            _ => Outcome::clean(),
        }
    }

    fn enter_visual(&mut self, shell: &mut EditorShell, mode: Mode) -> Outcome {
        let buf = shell.active_mut();
        buf.start_line = buf.line_no;
        buf.sel_col = buf.col_no;
        buf.mode = mode;
        Outcome::dirty()
    }

    fn repeat_search(&mut self, shell: &mut EditorShell, direction: Direction) -> Outcome {
        self.last_search_direction = direction;
        let buf = shell.active_mut();
        let Some(needle) = buf.search.clone() else {
            return Outcome::error(BimError::PatternNotFound.to_string());
        };
        let (line, col) = match direction {
            Direction::Forward => (buf.cur_idx(), buf.col_idx() + 1),
            Direction::Backward => {
                let col = buf.col_idx();
                if col == 0 {
                    (buf.cur_idx().saturating_sub(1), usize::MAX)
                } else {
                    (buf.cur_idx(), col - 1)
                }
            }
        };
        match bim_state::search::search_wrapping(buf.lines(), &needle, line, col, direction) {
            Some((l, c)) => {
                buf.line_no = l + 1;
                buf.col_no = c + 1;
                Outcome::dirty()
            }
            None => Outcome::error(BimError::PatternNotFound.to_string()),
        }
    }

    // ---- Insert / Replace ----------------------------------------------

    fn handle_insert(&mut self, shell: &mut EditorShell, ev: KeyEvent) -> Outcome {
        let buf = shell.active_mut();
        match ev.key {
            Key::Escape => {
                buf.mode = Mode::Normal;
                if buf.col_no > 1 {
                    buf.col_no -= 1;
                }
                buf.clamp_cursor();
                buf.push_break();
                Outcome::dirty()
            }
            Key::Enter => Outcome::from_result(buf.insert_line_feed()),
            Key::Backspace => Outcome::from_result(buf.delete_at_cursor()),
            Key::Tab => Outcome::from_result(buf.insert_char('\t')),
            Key::Char(c) => Outcome::from_result(buf.insert_char(c)),
            _ => Outcome::clean(),
        }
    }

    fn handle_replace(&mut self, shell: &mut EditorShell, ev: KeyEvent) -> Outcome {
        let buf = shell.active_mut();
        match ev.key {
            Key::Escape => {
                buf.mode = Mode::Normal;
                buf.clamp_cursor();
                buf.push_break();
                Outcome::dirty()
            }
            Key::Backspace => Outcome::from_result(buf.delete_at_cursor()),
            Key::Char(c) => {
                let idx = buf.cur_idx();
                let len = buf.line(idx).map(|l| l.len()).unwrap_or(0);
                if buf.col_idx() < len {
                    let result = buf.replace_char(c);
                    if result.is_ok() {
                        buf.col_no += 1;
                    }
                    Outcome::from_result(result)
                } else {
                    Outcome::from_result(buf.insert_char(c))
                }
            }
            _ => Outcome::clean(),
        }
    }

    // ---- Selection modes (§4.H / §4.K) ----------------------------------

    fn handle_selection(&mut self, shell: &mut EditorShell, ev: KeyEvent) -> Outcome {
        let mode = shell.active().mode;
        match ev.key {
            Key::Escape => {
                shell.active_mut().mode = Mode::Normal;
                shell.active_mut().clamp_cursor();
                Outcome::dirty()
            }
            Key::Char('h') | Key::Left => {
                motion::left(shell.active_mut(), 1);
                Outcome::dirty()
            }
            Key::Char('l') | Key::Right => {
                motion::right(shell.active_mut(), 1);
                Outcome::dirty()
            }
            Key::Char('j') | Key::Down => {
                motion::down(shell.active_mut(), 1);
                Outcome::dirty()
            }
            Key::Char('k') | Key::Up => {
                motion::up(shell.active_mut(), 1);
                Outcome::dirty()
            }
            Key::Char('y') => {
                let yanked = match mode {
                    Mode::LineSel => selection::yank_linewise(shell.active()),
                    Mode::CharSel => selection::yank_charwise(shell.active()),
                    _ => selection::yank_colwise(shell.active()),
                };
                let full_lines = matches!(mode, Mode::LineSel);
                if full_lines {
                    shell.yank.set_full_lines(yanked);
                } else {
                    shell.yank.set_partial(yanked);
                }
                let buf = shell.active_mut();
                let (lo, _) = selection::linewise_range(buf);
                buf.mode = Mode::Normal;
                buf.line_no = lo + 1;
                buf.clamp_cursor();
                Outcome::dirty()
            }
            Key::Char('d') | Key::Char('D') => {
                let linewise = mode == Mode::LineSel || ev.key == Key::Char('D');
                let result = if linewise {
                    match selection::delete_linewise(shell.active_mut()) {
                        Ok(removed) => {
                            shell.yank.set_full_lines(removed);
                            Ok(())
                        }
                        Err(e) => Err(e),
                    }
                } else if mode == Mode::CharSel {
                    let yanked = selection::yank_charwise(shell.active());
                    shell.yank.set_partial(yanked);
                    selection::delete_charwise(shell.active_mut())
                } else {
                    let yanked = selection::yank_colwise(shell.active());
                    shell.yank.set_partial(yanked);
                    selection::delete_colwise(shell.active_mut())
                };
                shell.active_mut().mode = Mode::Normal;
                shell.active_mut().push_break();
                Outcome::from_result(result)
            }
            Key::Tab if mode == Mode::LineSel => Outcome::from_result(selection::indent_lines(shell.active_mut(), false)),
            Key::BackTab if mode == Mode::LineSel => Outcome::from_result(selection::indent_lines(shell.active_mut(), true)),
            Key::Char('I') if mode == Mode::ColSel => {
                self.col_insert = Some(selection::enter_col_insert(shell.active()));
                shell.active_mut().mode = Mode::ColInsert;
                Outcome::dirty()
            }
            Key::Char(':') => {
                self.pending_sub_range = Some(selection::linewise_range(shell.active()));
                self.command_line.clear();
                self.command_history_cursor = None;
                shell.active_mut().mode = Mode::Command;
                Outcome::dirty()
            }
            _ => Outcome::clean(),
        }
    }

    fn handle_col_insert(&mut self, shell: &mut EditorShell, ev: KeyEvent) -> Outcome {
        let Some(state) = self.col_insert else {
            shell.active_mut().mode = Mode::Normal;
            return Outcome::dirty();
        };
        match ev.key {
            Key::Escape => {
                self.col_insert = None;
                let buf = shell.active_mut();
                buf.mode = Mode::Normal;
                buf.clamp_cursor();
                buf.push_break();
                Outcome::dirty()
            }
            Key::Backspace => Outcome::from_result(selection::col_insert_backspace(shell.active_mut(), &state)),
            Key::Char(c) => Outcome::from_result(selection::col_insert_char(shell.active_mut(), &state, c)),
            _ => Outcome::clean(),
        }
    }

    // ---- Command / Search line editing (§4.H) ---------------------------

    fn handle_command_mode(&mut self, shell: &mut EditorShell, ev: KeyEvent) -> Outcome {
        match ev.key {
            Key::Escape => {
                self.command_line.clear();
                self.pending_sub_range = None;
                shell.active_mut().mode = Mode::Normal;
                Outcome::dirty()
            }
            Key::Enter => {
                let raw = self.command_line.clone();
                self.command_line.clear();
                self.push_history(raw.clone());
                shell.active_mut().mode = Mode::Normal;
                let mut parsed = command::parse(&raw);
                let pending_range = self.pending_sub_range.take();
                if let ParsedCommand::Substitute { whole_file: false, range, .. } = &mut parsed {
                    *range = pending_range;
                }
                let executed = command::execute(shell, parsed);
                if executed.quit {
                    return Outcome::quit();
                }
                match executed.message {
                    Some(m) if executed.is_error => Outcome::error(m),
                    Some(m) => Outcome::info(m),
                    None => Outcome::dirty(),
                }
            }
            Key::Backspace => {
                self.command_line.pop();
                Outcome::dirty()
            }
            Key::Up => {
                self.cycle_history(-1);
                Outcome::dirty()
            }
            Key::Down => {
                self.cycle_history(1);
                Outcome::dirty()
            }
            Key::Tab => Outcome::clean(), // completion is a rendering-layer affordance, not modeled here
            Key::Char(c) => {
                self.command_line.push(c);
                Outcome::dirty()
            }
            _ => Outcome::clean(),
        }
    }

    fn handle_search_mode(&mut self, shell: &mut EditorShell, ev: KeyEvent, direction: Direction) -> Outcome {
        match ev.key {
            Key::Escape => {
                self.command_line.clear();
                shell.active_mut().mode = Mode::Normal;
                Outcome::dirty()
            }
            Key::Enter => {
                let needle = self.command_line.clone();
                self.command_line.clear();
                self.last_search_direction = direction;
                let buf = shell.active_mut();
                buf.mode = Mode::Normal;
                if needle.is_empty() {
                    return Outcome::dirty();
                }
                buf.search = Some(needle.clone());
                let (line, col) = (buf.cur_idx(), buf.col_idx());
                match bim_state::search::search(buf.lines(), &needle, line, col, direction) {
                    Some((l, c)) => {
                        buf.line_no = l + 1;
                        buf.col_no = c + 1;
                        Outcome::dirty()
                    }
                    None => Outcome::error(BimError::PatternNotFound.to_string()),
                }
            }
            Key::Backspace => {
                self.command_line.pop();
                Outcome::dirty()
            }
            Key::Char(c) => {
                self.command_line.push(c);
                Outcome::dirty()
            }
            _ => Outcome::clean(),
        }
    }

    fn push_history(&mut self, line: String) {
        if line.is_empty() {
            return;
        }
        self.command_history.retain(|l| l != &line);
        self.command_history.push(line);
        if self.command_history.len() > COMMAND_HISTORY_CAP {
            self.command_history.remove(0);
        }
        self.command_history_cursor = None;
    }

    fn cycle_history(&mut self, delta: i32) {
        if self.command_history.is_empty() {
            return;
        }
        let len = self.command_history.len();
        let next = match self.command_history_cursor {
            None if delta < 0 => len - 1,
            None => return,
            Some(i) => (i as i32 + delta).clamp(0, len as i32 - 1) as usize,
        };
        self.command_history_cursor = Some(next);
        self.command_line = self.command_history[next].clone();
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn opposite(dir: Direction) -> Direction {
    match dir {
        Direction::Forward => Direction::Backward,
        Direction::Backward => Direction::Forward,
    }
}

fn open_line_below(buf: &mut bim_state::Buffer) {
    let idx = buf.cur_idx();
    if buf.insert_line(idx + 1, bim_text::Line::new()).is_ok() {
        buf.line_no = idx + 2;
        buf.col_no = 1;
        buf.mode = Mode::Insert;
    }
}

fn open_line_above(buf: &mut bim_state::Buffer) {
    let idx = buf.cur_idx();
    if buf.insert_line(idx, bim_text::Line::new()).is_ok() {
        buf.line_no = idx + 1;
        buf.col_no = 1;
        buf.mode = Mode::Insert;
    }
}

/// `p`/`P`: interpret the yank's `is_full_lines` flag to splice into the
/// current line or insert whole new lines (§4.K).
fn paste(shell: &mut EditorShell, before: bool) -> bim_state::Result<()> {
    let yank = shell.yank.clone();
    if yank.is_empty() {
        return Ok(());
    }
    let buf = shell.active_mut();
    if yank.is_full_lines {
        let idx = buf.cur_idx();
        let insert_at = if before { idx } else { idx + 1 };
        for (i, line) in yank.lines.iter().enumerate() {
            buf.insert_line(insert_at + i, line.clone())?;
        }
        buf.line_no = insert_at + 1;
        buf.col_no = 1;
    } else {
        let idx = buf.cur_idx();
        let old_text = buf.line(idx).map(|l| l.to_string_lossy()).unwrap_or_default();
        let chars: Vec<char> = old_text.chars().collect();
        let mut col = buf.col_idx();
        if !before && !chars.is_empty() {
            col += 1;
        }
        col = col.min(chars.len());
        let prefix: String = chars[..col].iter().collect();
        let suffix: String = chars[col..].iter().collect();
        let yank_texts: Vec<String> = yank.lines.iter().map(|l| l.to_string_lossy()).collect();
        if yank_texts.len() == 1 {
            let merged = format!("{prefix}{}{suffix}", yank_texts[0]);
            let new_col = prefix.chars().count() + yank_texts[0].chars().count();
            buf.replace_line(idx, bim_text::Line::from_str(&merged))?;
            buf.line_no = idx + 1;
            buf.col_no = new_col + 1;
        } else {
            let first = format!("{prefix}{}", yank_texts[0]);
            let last = format!("{}{suffix}", yank_texts[yank_texts.len() - 1]);
            buf.replace_line(idx, bim_text::Line::from_str(&first))?;
            for (i, mid) in yank_texts[1..yank_texts.len() - 1].iter().enumerate() {
                buf.insert_line(idx + 1 + i, bim_text::Line::from_str(mid))?;
            }
            let last_idx = idx + yank_texts.len() - 1;
            buf.insert_line(last_idx, bim_text::Line::from_str(&last))?;
            buf.line_no = last_idx + 1;
            buf.col_no = 1;
        }
    }
    buf.push_break();
    debug!(target: "actions.paste", full_lines = yank.is_full_lines, "pasted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bim_config::GlobalConfig;
    use bim_events::{InputEvent, Key, KeyEvent};

    fn key(k: char) -> InputEvent {
        InputEvent::Key(KeyEvent::plain(Key::Char(k)))
    }

    fn shell_with(text: &str) -> EditorShell {
        let mut shell = EditorShell::new(GlobalConfig::default());
        *shell.active_mut() = bim_state::Buffer::from_text(text);
        shell
    }

    #[test]
    fn scenario_insert_and_write() {
        let mut shell = shell_with("hello");
        let mut dispatcher = Dispatcher::new();
        shell.active_mut().line_no = 1;
        shell.active_mut().col_no = 6;
        dispatcher.handle(&mut shell, key('i'));
        for c in " world".chars() {
            dispatcher.handle(&mut shell, InputEvent::Key(KeyEvent::plain(Key::Char(c))));
        }
        dispatcher.handle(&mut shell, InputEvent::Key(KeyEvent::plain(Key::Escape)));
        assert_eq!(shell.active().lines()[0].to_string_lossy(), "hello world");
    }

    #[test]
    fn scenario_dd_then_undo() {
        let mut shell = shell_with("a\nb\nc\n");
        let mut dispatcher = Dispatcher::new();
        shell.active_mut().line_no = 2;
        dispatcher.handle(&mut shell, key('d'));
        dispatcher.handle(&mut shell, key('d'));
        assert_eq!(shell.active().lines().len(), 2);
        assert_eq!(shell.active().lines()[0].to_string_lossy(), "a");
        assert_eq!(shell.active().lines()[1].to_string_lossy(), "c");
        assert!(shell.yank.is_full_lines);
        assert_eq!(shell.yank.lines[0].to_string_lossy(), "b");
        let out = dispatcher.handle(&mut shell, key('u'));
        assert!(out.dirty);
        assert_eq!(shell.active().lines().len(), 3);
        assert_eq!(shell.active().lines()[1].to_string_lossy(), "b");
    }

    #[test]
    fn scenario_search_wraps() {
        let mut shell = shell_with("foo bar foo");
        let mut dispatcher = Dispatcher::new();
        dispatcher.handle(&mut shell, InputEvent::Key(KeyEvent::plain(Key::Char('/'))));
        for c in "foo".chars() {
            dispatcher.handle(&mut shell, InputEvent::Key(KeyEvent::plain(Key::Char(c))));
        }
        dispatcher.handle(&mut shell, InputEvent::Key(KeyEvent::plain(Key::Enter)));
        assert_eq!(shell.active().col_no, 1);
        dispatcher.handle(&mut shell, key('n'));
        assert_eq!(shell.active().col_no, 9);
        dispatcher.handle(&mut shell, key('n'));
        assert_eq!(shell.active().col_no, 1);
    }

    #[test]
    fn scenario_column_insert() {
        let mut shell = shell_with("abc\ndef\nghi\n");
        let mut dispatcher = Dispatcher::new();
        dispatcher.handle(&mut shell, InputEvent::Key(KeyEvent::new(Key::Char('v'), bim_events::Modifiers::CTRL)));
        dispatcher.handle(&mut shell, key('j'));
        dispatcher.handle(&mut shell, key('I'));
        dispatcher.handle(&mut shell, key('X'));
        dispatcher.handle(&mut shell, InputEvent::Key(KeyEvent::plain(Key::Escape)));
        assert_eq!(shell.active().lines()[0].to_string_lossy(), "Xabc");
        assert_eq!(shell.active().lines()[1].to_string_lossy(), "Xdef");
        assert_eq!(shell.active().lines()[2].to_string_lossy(), "ghi");
    }

    #[test]
    fn scenario_substitute_all_then_undo() {
        let mut shell = shell_with("aaa\naba\n");
        let mut dispatcher = Dispatcher::new();
        dispatcher.handle(&mut shell, key(':'));
        for c in "%s/a/b/g".chars() {
            dispatcher.handle(&mut shell, InputEvent::Key(KeyEvent::plain(Key::Char(c))));
        }
        let out = dispatcher.handle(&mut shell, InputEvent::Key(KeyEvent::plain(Key::Enter)));
        assert_eq!(out.status.unwrap().text, "replaced 5 instances of a");
        assert_eq!(shell.active().lines()[0].to_string_lossy(), "bbb");
        assert_eq!(shell.active().lines()[1].to_string_lossy(), "bbb");
        shell.active_mut().undo().unwrap();
        assert_eq!(shell.active().lines()[0].to_string_lossy(), "aaa");
        assert_eq!(shell.active().lines()[1].to_string_lossy(), "aba");
    }

    #[test]
    fn scenario_substitute_on_visual_selection() {
        let mut shell = shell_with("aaa\naba\naaa\n");
        let mut dispatcher = Dispatcher::new();
        shell.active_mut().line_no = 2;
        dispatcher.handle(&mut shell, key('V'));
        dispatcher.handle(&mut shell, key('j'));
        dispatcher.handle(&mut shell, key(':'));
        for c in "s/a/b/g".chars() {
            dispatcher.handle(&mut shell, InputEvent::Key(KeyEvent::plain(Key::Char(c))));
        }
        let out = dispatcher.handle(&mut shell, InputEvent::Key(KeyEvent::plain(Key::Enter)));
        assert!(!out.status.as_ref().unwrap().is_error, "{:?}", out.status);
        assert_eq!(shell.active().lines()[0].to_string_lossy(), "aaa");
        assert_eq!(shell.active().lines()[1].to_string_lossy(), "bbb");
        assert_eq!(shell.active().lines()[2].to_string_lossy(), "bbb");
    }

    #[test]
    fn goto_matching_paren_selects_partner_cell() {
        // After the jump, overlay reapplication recomputes the paren match
        // from the new cursor position, so the cell left highlighted is the
        // bracket the cursor came from (the partner of where it now sits).
        let mut shell = shell_with("(a)\n");
        let mut dispatcher = Dispatcher::new();
        shell.active_mut().line_no = 1;
        shell.active_mut().col_no = 1;
        dispatcher.handle(&mut shell, key('%'));
        assert_eq!(shell.active().col_no, 3);
        assert!(shell.active().lines()[0].cell(0).unwrap().is_selected());
        assert!(shell.active().highlighting_paren);
    }
}
