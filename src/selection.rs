//! Selection Reader.
//!
//! The user's highlighted text is external, mutable UI state. The host
//! captures it into [`PageSnapshot::selection`]; from the core's point of
//! view reading it is a pure function of that snapshot.

use crate::page::PageSnapshot;

/// The current selection with surrounding whitespace removed.
///
/// Returns an empty string when nothing (or only whitespace) is selected.
#[must_use]
pub fn read_selection(page: &PageSnapshot) -> String {
    page.selection.trim().to_string()
}
