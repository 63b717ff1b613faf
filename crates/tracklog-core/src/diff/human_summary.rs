//! Human-readable summary renderer for library diffs.

use crate::diff::model::LibraryDiff;

/// One-line count summary, e.g. `2 added, 1 removed, 5 fields modified`.
pub fn summary_line(diff: &LibraryDiff) -> String {
    count_summary(diff.added.len(), diff.removed.len(), diff.modified.len())
}

/// Count summary from raw totals; `No changes` when all are zero
pub fn count_summary(added: usize, removed: usize, modified_fields: usize) -> String {
    if added == 0 && removed == 0 && modified_fields == 0 {
        return "No changes".to_string();
    }
    format!(
        "{} added, {} removed, {} {} modified",
        added,
        removed,
        modified_fields,
        if modified_fields == 1 { "field" } else { "fields" }
    )
}

/// Render a multi-line summary of a [`LibraryDiff`].
///
/// The first line is [`summary_line`]; one line per added, removed and
/// modified entry follows.
pub fn render_human_summary(diff: &LibraryDiff) -> String {
    let mut out = summary_line(diff);
    out.push('\n');

    for track in &diff.added {
        out.push_str(&format!(
            "+ {} [{}]\n",
            track.display_title(),
            track.persistent_id
        ));
    }
    for track in &diff.removed {
        out.push_str(&format!(
            "- {} [{}]\n",
            track.display_title(),
            track.persistent_id
        ));
    }
    for change in &diff.modified {
        out.push_str(&format!(
            "~ [{}] {}: {} -> {}\n",
            change.persistent_id,
            change.field,
            show(change.old.as_ref()),
            show(change.new.as_ref()),
        ));
    }

    out
}

fn show(value: Option<&crate::model::FieldValue>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
