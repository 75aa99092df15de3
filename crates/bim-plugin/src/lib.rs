//! Git-diff gutter population (§1 "deliberately out of scope" collaborator,
//! §3 `rev_status`, §5 "External subprocesses"). Spawns `git diff` against
//! the working tree, parses unified-diff hunk headers, and turns them into
//! per-line [`RevStatus`] markers. The core only stores and clears this
//! field — this crate is the only thing that writes non-`Unchanged` values
//! into it.

use bim_state::Buffer;
use bim_text::line::RevStatus;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Populate `buf`'s per-line `rev_status` from `git diff -- path`. Any
/// failure (not a repo, git missing, file untracked/new) is silently
/// tolerated (§5 "their failure is silently tolerated") — every line is
/// left `Unchanged`.
pub fn apply(buf: &mut Buffer, path: &Path) {
    match diff_statuses(path) {
        Ok(statuses) => {
            for (idx, status) in statuses {
                if let Some(line) = buf.lines_mut().get_mut(idx) {
                    line.rev_status = status;
                }
            }
        }
        Err(err) => debug!(target: "plugin.git", %err, "git_diff_unavailable"),
    }
}

fn diff_statuses(path: &Path) -> anyhow::Result<Vec<(usize, RevStatus)>> {
    let output = Command::new("git")
        .arg("diff")
        .arg("--no-color")
        .arg("--")
        .arg(path)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()?;
    anyhow::ensure!(output.status.success(), "git diff exited with {}", output.status);
    Ok(parse_unified_diff(&String::from_utf8_lossy(&output.stdout)))
}

/// Walk a unified diff's hunks, producing `(0-based new-file line, status)`
/// pairs. Within each hunk, runs of `-` lines immediately followed by runs
/// of `+` lines are treated as one change: lines present on both sides are
/// `ModifiedVsVcs`, excess added lines are `Added`, and a deletion with no
/// matching addition marks the preceding surviving line `DeletionBelow`
/// (or `ModifiedAndDeletion` if that line was itself just modified).
fn parse_unified_diff(diff: &str) -> Vec<(usize, RevStatus)> {
    let mut out = Vec::new();
    let mut lines = diff.lines().peekable();
    while let Some(line) = lines.next() {
        let Some(header) = line.strip_prefix("@@ ") else { continue };
        let Some(new_start) = parse_new_start(header) else { continue };
        let mut body = Vec::new();
        while let Some(&next) = lines.peek() {
            if next.starts_with("@@ ") {
                break;
            }
            body.push(next);
            lines.next();
        }
        let mut new_line = new_start.saturating_sub(1);
        let mut i = 0;
        while i < body.len() {
            match body[i].as_bytes().first() {
                Some(b'-') => {
                    let mut removed = 0usize;
                    while i < body.len() && body[i].starts_with('-') {
                        removed += 1;
                        i += 1;
                    }
                    let mut added = 0usize;
                    while i < body.len() && body[i].starts_with('+') {
                        added += 1;
                        i += 1;
                    }
                    apply_run(&mut out, &mut new_line, removed, added);
                }
                Some(b'+') => {
                    let mut added = 0usize;
                    while i < body.len() && body[i].starts_with('+') {
                        added += 1;
                        i += 1;
                    }
                    apply_run(&mut out, &mut new_line, 0, added);
                }
                Some(b' ') => {
                    new_line += 1;
                    i += 1;
                }
                _ => i += 1,
            }
        }
    }
    out
}

fn apply_run(out: &mut Vec<(usize, RevStatus)>, new_line: &mut usize, removed: usize, added: usize) {
    if added == 0 {
        if removed > 0 && *new_line > 0 {
            let prev = *new_line - 1;
            upgrade_to_deletion(out, prev);
        }
        return;
    }
    let paired = removed.min(added);
    for k in 0..added {
        let status = if k < paired {
            if removed > added && k == paired - 1 {
                RevStatus::ModifiedAndDeletion
            } else {
                RevStatus::ModifiedVsVcs
            }
        } else {
            RevStatus::Added
        };
        out.push((*new_line, status));
        *new_line += 1;
    }
}

/// A deletion immediately after a line already marked this hunk promotes
/// that line's status to `ModifiedAndDeletion` rather than appending a
/// second, conflicting entry for the same index.
fn upgrade_to_deletion(out: &mut [(usize, RevStatus)], idx: usize) {
    if let Some(entry) = out.iter_mut().rev().find(|(i, _)| *i == idx) {
        entry.1 = RevStatus::ModifiedAndDeletion;
    }
}

fn parse_new_start(header: &str) -> Option<usize> {
    let plus = header.find('+')?;
    let rest = &header[plus + 1..];
    let end = rest.find([',', ' '])?;
    rest[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_new_start_from_hunk_header() {
        assert_eq!(parse_new_start("-1,3 +1,4 @@"), Some(1));
        assert_eq!(parse_new_start("-10 +12 @@ fn foo()"), Some(12));
    }

    #[test]
    fn pure_addition_marks_added_lines() {
        let diff = "@@ -1,2 +1,4 @@\n line one\n+new one\n+new two\n line two\n";
        let statuses = parse_unified_diff(diff);
        assert_eq!(statuses, vec![(1, RevStatus::Added), (2, RevStatus::Added)]);
    }

    #[test]
    fn pure_deletion_marks_preceding_line() {
        let diff = "@@ -1,3 +1,1 @@\n keep\n-gone1\n-gone2\n";
        let statuses = parse_unified_diff(diff);
        assert_eq!(statuses, vec![(0, RevStatus::DeletionBelow)]);
    }

    #[test]
    fn paired_change_marks_modified_vs_vcs() {
        let diff = "@@ -1,1 +1,1 @@\n-old line\n+new line\n";
        let statuses = parse_unified_diff(diff);
        assert_eq!(statuses, vec![(0, RevStatus::ModifiedVsVcs)]);
    }

    #[test]
    fn unparseable_diff_yields_no_statuses() {
        assert!(parse_unified_diff("not a diff\n").is_empty());
    }

    #[test]
    fn apply_on_nonexistent_git_repo_leaves_buffer_unchanged() {
        let mut buf = Buffer::from_text("a\nb\n");
        apply(&mut buf, Path::new("/nonexistent/path/does/not/exist.rs"));
        assert_eq!(buf.lines()[0].rev_status, RevStatus::Unchanged);
    }
}
