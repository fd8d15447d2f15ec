//! Unified diff format output.
//!
//! Produces standard unified diff format with `---`/`+++` headers,
//! `@@ ... @@` hunk headers, and context/addition/deletion lines.

use bstr::ByteSlice;

use crate::myers::{self, EditOp};

/// Number of context lines around each change.
const CONTEXT: usize = 3;

/// Split content into lines, each keeping its trailing newline.
pub fn split_lines(content: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, &b) in content.iter().enumerate() {
        if b == b'\n' {
            lines.push(&content[start..=i]);
            start = i + 1;
        }
    }
    if start < content.len() {
        lines.push(&content[start..]);
    }
    lines
}

/// NUL sniff over the leading bytes, the same heuristic git uses.
pub fn looks_binary(content: &[u8]) -> bool {
    content[..content.len().min(8000)].contains(&0)
}

/// Render a unified diff between two byte buffers.
///
/// Returns `None` when the contents are identical. `old_label` and
/// `new_label` are the `a/...` and `b/...` paths; pass `None` for a side
/// that does not exist (renders as `/dev/null`).
pub fn format(
    old_label: Option<&str>,
    new_label: Option<&str>,
    old: &[u8],
    new: &[u8],
) -> Option<String> {
    if old == new {
        return None;
    }

    let a_path = old_label.or(new_label).unwrap_or("?");
    let b_path = new_label.or(old_label).unwrap_or("?");

    let mut out = String::new();
    out.push_str(&format!("diff --git a/{} b/{}\n", a_path, b_path));

    if looks_binary(old) || looks_binary(new) {
        out.push_str(&format!(
            "Binary files a/{} and b/{} differ\n",
            a_path, b_path
        ));
        return Some(out);
    }

    match old_label {
        Some(label) => out.push_str(&format!("--- a/{}\n", label)),
        None => out.push_str("--- /dev/null\n"),
    }
    match new_label {
        Some(label) => out.push_str(&format!("+++ b/{}\n", label)),
        None => out.push_str("+++ /dev/null\n"),
    }

    let old_lines = split_lines(old);
    let new_lines = split_lines(new);
    let edits = myers::diff(&old_lines, &new_lines);

    for hunk in build_hunks(&edits) {
        format_hunk(&mut out, &hunk, &edits, &old_lines, &new_lines);
    }

    Some(out)
}

/// A hunk is a range of edit indices plus the line numbers it covers.
struct Hunk {
    edit_start: usize,
    edit_end: usize,
    old_start: usize,
    old_count: usize,
    new_start: usize,
    new_count: usize,
}

/// Group edits into hunks with `CONTEXT` lines of surrounding context.
fn build_hunks(edits: &[myers::Edit]) -> Vec<Hunk> {
    let mut hunks = Vec::new();
    let mut i = 0;

    while i < edits.len() {
        if edits[i].op == EditOp::Equal {
            i += 1;
            continue;
        }

        // Found a change: expand backwards for leading context.
        let start = i.saturating_sub(CONTEXT);

        // Walk forward, swallowing runs of equals shorter than 2*CONTEXT.
        let mut end = i;
        let mut last_change = i;
        while end < edits.len() {
            if edits[end].op != EditOp::Equal {
                last_change = end;
                end += 1;
            } else if end - last_change <= 2 * CONTEXT {
                end += 1;
            } else {
                break;
            }
        }
        let end = (last_change + 1 + CONTEXT).min(edits.len());

        let old_lines: Vec<usize> = edits[start..end]
            .iter()
            .filter(|e| e.op != EditOp::Insert)
            .map(|e| e.old_index)
            .collect();
        let new_lines: Vec<usize> = edits[start..end]
            .iter()
            .filter(|e| e.op != EditOp::Delete)
            .map(|e| e.new_index)
            .collect();

        // Starts are 1-based. A side with no lines reports the line the
        // change sits after, which is the 0-based index of the first edit.
        hunks.push(Hunk {
            edit_start: start,
            edit_end: end,
            old_start: old_lines
                .first()
                .map(|&l| l + 1)
                .unwrap_or(edits[start].old_index),
            old_count: old_lines.len(),
            new_start: new_lines
                .first()
                .map(|&l| l + 1)
                .unwrap_or(edits[start].new_index),
            new_count: new_lines.len(),
        });

        i = end;
    }

    hunks
}

/// Format a hunk header and its lines.
fn format_hunk(
    out: &mut String,
    hunk: &Hunk,
    edits: &[myers::Edit],
    old_lines: &[&[u8]],
    new_lines: &[&[u8]],
) {
    // @@ header — omit the count when it equals 1 (git convention)
    let old_range = if hunk.old_count == 1 {
        format!("{}", hunk.old_start)
    } else {
        format!("{},{}", hunk.old_start, hunk.old_count)
    };
    let new_range = if hunk.new_count == 1 {
        format!("{}", hunk.new_start)
    } else {
        format!("{},{}", hunk.new_start, hunk.new_count)
    };
    out.push_str(&format!("@@ -{} +{} @@\n", old_range, new_range));

    for edit in &edits[hunk.edit_start..hunk.edit_end] {
        match edit.op {
            EditOp::Equal => {
                out.push(' ');
                push_line(out, old_lines[edit.old_index]);
            }
            EditOp::Delete => {
                out.push('-');
                push_line(out, old_lines[edit.old_index]);
            }
            EditOp::Insert => {
                out.push('+');
                push_line(out, new_lines[edit.new_index]);
            }
        }
    }
}

fn push_line(out: &mut String, line: &[u8]) {
    out.push_str(&line.to_str_lossy());
    if !line.ends_with(b"\n") {
        out.push_str("\n\\ No newline at end of file\n");
    }
}
