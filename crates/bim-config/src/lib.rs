//! Rc-file and biminfo parsing (§6): the two small on-disk formats the
//! editor shell consults at startup and on buffer close. Both are
//! line-oriented and hand-parsed — neither is dense enough to earn a real
//! grammar, and both formats have a fixed textual shape callers rely on.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// The rc-file-backed global booleans/ints (§6 Rc file) plus the CLI `-O`
/// capability toggles, all owned by the editor shell.
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    pub theme: String,
    pub history: bool,
    pub padding: u16,
    pub hlparen: bool,
    pub hlcurrent: bool,
    pub splitpercent: u8,
    pub shiftscrolling: bool,
    pub scrollamount: u16,
    pub git: bool,
    pub colorgutter: bool,
    /// Session-only toggle for `:smartcase` (§6); not an rc-file key, since
    /// §4.F makes smart case the baseline behavior rather than a setting
    /// persisted across sessions.
    pub smartcase: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            history: true,
            padding: 4,
            hlparen: true,
            hlcurrent: true,
            splitpercent: 50,
            shiftscrolling: true,
            scrollamount: 5,
            git: true,
            colorgutter: true,
            smartcase: true,
        }
    }
}

impl GlobalConfig {
    /// Apply one `key[=value]` rc-file line's recognized keys; unknown keys
    /// are ignored (§6 lists the full recognized set).
    pub fn apply_key(&mut self, key: &str, value: Option<&str>) {
        match key {
            "theme" => {
                if let Some(v) = value {
                    self.theme = v.to_string();
                }
            }
            "history" => self.history = parse_bool(value, self.history),
            "padding" => self.padding = parse_int(value, self.padding),
            "hlparen" => self.hlparen = parse_bool(value, self.hlparen),
            "hlcurrent" => self.hlcurrent = parse_bool(value, self.hlcurrent),
            "splitpercent" => self.splitpercent = parse_int(value, self.splitpercent),
            "shiftscrolling" => self.shiftscrolling = parse_bool(value, self.shiftscrolling),
            "scrollamount" => self.scrollamount = parse_int(value, self.scrollamount),
            "git" => self.git = parse_bool(value, self.git),
            "colorgutter" => self.colorgutter = parse_bool(value, self.colorgutter),
            other => debug!(target: "config", key = other, "unrecognized_rc_key"),
        }
    }
}

fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value {
        None => true, // bare `key` (no `=value`) means "enable"
        Some("0") | Some("false") | Some("off") => false,
        Some("1") | Some("true") | Some("on") => true,
        Some(_) => default,
    }
}

fn parse_int<T: std::str::FromStr>(value: Option<&str>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Parse the `key[=value]` rc-file grammar (§6). Blank and `#`-prefixed
/// lines are ignored.
pub fn parse_rc(content: &str) -> GlobalConfig {
    let mut cfg = GlobalConfig::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.split_once('=') {
            Some((k, v)) => cfg.apply_key(k.trim(), Some(v.trim())),
            None => cfg.apply_key(line, None),
        }
    }
    cfg
}

/// Default rc path: `~/.bimrc`, expanded via `dirs::home_dir`.
pub fn default_rc_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".bimrc"))
        .unwrap_or_else(|| PathBuf::from(".bimrc"))
}

/// Load and parse the rc file at `path` (or the default path if `None`);
/// a missing file yields defaults, matching the original's tolerant startup.
pub fn load_rc(path: Option<&Path>) -> GlobalConfig {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_rc_path);
    match std::fs::read_to_string(&path) {
        Ok(content) => parse_rc(&content),
        Err(err) => {
            debug!(target: "config", path = %path.display(), %err, "rc_file_unavailable_using_defaults");
            GlobalConfig::default()
        }
    }
}

/// One `~/.biminfo` cursor-position entry (§3 Lifecycles, §6 Biminfo).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiminfoEntry {
    pub line_no: usize,
    pub col_no: usize,
}

/// In-memory biminfo table, keyed by absolute path.
#[derive(Debug, Clone, Default)]
pub struct Biminfo {
    entries: HashMap<String, BiminfoEntry>,
}

impl Biminfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `>ABSPATH LINE_NO COL_NO\n` lines; `#`-prefixed lines are
    /// comments. Numeric fields are right-padded to 20 characters on write
    /// but parsed with ordinary whitespace splitting.
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();
        for line in content.lines() {
            if !line.starts_with('>') {
                continue;
            }
            let rest = &line[1..];
            // The path is followed by a single space before the numbers;
            // numbers themselves are whitespace-separated after padding.
            let mut parts = rest.rsplitn(3, char::is_whitespace).filter(|s| !s.is_empty());
            let col = parts.next().and_then(|s| s.parse().ok());
            let line_no = parts.next().and_then(|s| s.parse().ok());
            let path = parts.next();
            if let (Some(path), Some(line_no), Some(col_no)) = (path, line_no, col) {
                entries.insert(path.trim().to_string(), BiminfoEntry { line_no, col_no });
            }
        }
        Self { entries }
    }

    /// Substring-prefixed lookup on the space-terminated path (§6).
    pub fn lookup(&self, abs_path: &str) -> Option<BiminfoEntry> {
        self.entries.get(abs_path).copied()
    }

    pub fn set(&mut self, abs_path: String, entry: BiminfoEntry) {
        self.entries.insert(abs_path, entry);
    }

    pub fn render(&self) -> String {
        let mut out = String::from("# bim biminfo\n");
        let mut paths: Vec<&String> = self.entries.keys().collect();
        paths.sort();
        for path in paths {
            let e = self.entries[path];
            out.push_str(&format!(
                ">{path} {:<20} {:<20}\n",
                e.line_no, e.col_no
            ));
        }
        out
    }
}

pub fn default_biminfo_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".biminfo"))
        .unwrap_or_else(|| PathBuf::from(".biminfo"))
}

pub fn load_biminfo(path: Option<&Path>) -> Biminfo {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_biminfo_path);
    match std::fs::read_to_string(&path) {
        Ok(content) => Biminfo::parse(&content),
        Err(_) => Biminfo::new(),
    }
}

pub fn save_biminfo(path: Option<&Path>, biminfo: &Biminfo) -> Result<()> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_biminfo_path);
    let mut file = std::fs::File::create(&path).map_err(|source| ConfigError::Write {
        path: path.clone(),
        source,
    })?;
    file.write_all(biminfo.render().as_bytes())
        .map_err(|source| ConfigError::Write { path: path.clone(), source })?;
    Ok(())
}

/// Record `(line_no, col_no)` for `path`'s canonicalized form and persist,
/// tolerating a nonexistent file (§3 "on destruction the biminfo file is
/// updated"). Write failures are logged, not fatal — buffer close must
/// never fail because biminfo couldn't be saved.
pub fn record_position(biminfo_path: Option<&Path>, path: &Path, line_no: usize, col_no: usize) {
    let abs = std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string();
    let mut biminfo = load_biminfo(biminfo_path);
    biminfo.set(abs, BiminfoEntry { line_no, col_no });
    if let Err(err) = save_biminfo(biminfo_path, &biminfo) {
        warn!(target: "config", %err, "biminfo_save_failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_recognized_keys() {
        let cfg = parse_rc("theme=solarized\npadding=8\n# comment\n\ngit=0\n");
        assert_eq!(cfg.theme, "solarized");
        assert_eq!(cfg.padding, 8);
        assert!(!cfg.git);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let cfg = parse_rc("bogus=1\ntheme=x\n");
        assert_eq!(cfg.theme, "x");
    }

    #[test]
    fn missing_rc_file_yields_defaults() {
        let cfg = load_rc(Some(Path::new("/nonexistent/path/.bimrc")));
        assert_eq!(cfg.theme, "default");
    }

    #[test]
    fn biminfo_roundtrips_through_render_and_parse() {
        let mut info = Biminfo::new();
        info.set("/home/user/file.txt".to_string(), BiminfoEntry { line_no: 12, col_no: 4 });
        let rendered = info.render();
        let parsed = Biminfo::parse(&rendered);
        assert_eq!(
            parsed.lookup("/home/user/file.txt"),
            Some(BiminfoEntry { line_no: 12, col_no: 4 })
        );
    }

    #[test]
    fn biminfo_save_and_load_roundtrip() {
        let tmp = NamedTempFile::new().unwrap();
        let mut info = Biminfo::new();
        info.set("/a/b.rs".to_string(), BiminfoEntry { line_no: 3, col_no: 1 });
        save_biminfo(Some(tmp.path()), &info).unwrap();
        let loaded = load_biminfo(Some(tmp.path()));
        assert_eq!(loaded.lookup("/a/b.rs"), Some(BiminfoEntry { line_no: 3, col_no: 1 }));
    }
}
