//! Keeps a chosen section consistent with the currently selected class.

use crate::domain::entities::Section;

/// Keeps `current` when it still names one of `sections` by id or name, clears it otherwise.
#[must_use]
pub fn repair_selection(current: Option<&str>, sections: &[Section]) -> Option<String> {
    let current = current.map(str::trim).filter(|v| !v.is_empty())?;
    sections
        .iter()
        .any(|section| section.matches(current))
        .then(|| current.to_string())
}

/// Edit mode: finds the student's existing section by name, case-insensitively.
#[must_use]
pub fn rematch_existing(existing: &str, sections: &[Section]) -> Option<String> {
    let existing = existing.trim();
    if existing.is_empty() {
        return None;
    }
    sections
        .iter()
        .find(|section| section.name.eq_ignore_ascii_case(existing))
        .map(|section| section.name.clone())
}
