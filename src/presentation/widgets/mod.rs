mod checklist;
mod input;

pub use checklist::{Checklist, ChecklistItem};
pub use input::TextInput;
