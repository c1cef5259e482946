//! In-memory note filtering.
//!
//! # Responsibility
//! - Match notes against a free-text query.
//! - Return results in display order.
//!
//! # Invariants
//! - Matching is case-insensitive substring on title OR content.
//! - An empty query matches every note.
//! - Results are sorted by `last_modified` descending; ties keep input order.

use crate::model::note::{sort_for_display, Note};

/// Returns notes matching `query`, sorted for display.
pub fn search_notes(notes: &[Note], query: &str) -> Vec<Note> {
    let needle = query.to_lowercase();
    let mut hits = notes
        .iter()
        .filter(|note| note.matches(needle.as_str()))
        .cloned()
        .collect::<Vec<_>>();
    sort_for_display(&mut hits);
    hits
}

#[cfg(test)]
mod tests {
    use super::search_notes;
    use crate::model::note::Note;

    fn note(id: &str, title: &str, content: &str, last_modified: i64) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            last_modified,
        }
    }

    #[test]
    fn matches_title_and_content_independently() {
        let notes = vec![
            note("title-hit", "Rust Book", "", 1),
            note("content-hit", "", "reading about rust", 2),
            note("miss", "Groceries", "milk", 3),
        ];

        let hits = search_notes(&notes, "RUST");
        let ids: Vec<&str> = hits.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["content-hit", "title-hit"]);
    }

    #[test]
    fn whitespace_query_is_not_trimmed() {
        let notes = vec![note("a", "one two", "", 1), note("b", "onetwo", "", 2)];
        let hits = search_notes(&notes, "e t");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "a");
    }
}
