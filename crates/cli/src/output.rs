//! Writing the generated client, and diffing it against the file on disk.

use std::io::Write;
use std::path::Path;

use similar::{ChangeTag, TextDiff};
use tempfile::NamedTempFile;

/// Replace `path` with `contents` atomically: write a temp file next to it,
/// then rename over the destination. On failure the destination is untouched
/// and the temp file is removed.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), String> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = NamedTempFile::new_in(dir)
        .map_err(|e| format!("Failed to create temp file in {}: {e}", dir.display()))?;
    file.write_all(contents.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
    file.persist(path)
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e.error))?;
    Ok(())
}

/// Line diff of `existing` against `generated` with 3 lines of context, or
/// `None` when they are identical.
pub fn render_diff(label: &str, existing: &str, generated: &str) -> Option<String> {
    if existing == generated {
        return None;
    }

    let diff = TextDiff::from_lines(existing, generated);
    let mut output = String::new();

    output.push_str(&format!("--- {label} (current)\n"));
    output.push_str(&format!("+++ {label} (generated)\n"));

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push_str("...\n");
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                output.push_str(sign);
                output.push_str(change.value());
                if change.missing_newline() {
                    output.push('\n');
                }
            }
        }
    }

    Some(output)
}
