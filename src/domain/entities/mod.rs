//! Domain entity definitions.

mod class;
mod exam;
mod school;
mod student;
mod token;
mod user;

pub use class::{ClassData, ClassSummary, DEFAULT_SECTION_NAMES, Section, Subject, default_sections};
pub use exam::{AcademicYear, ExamType, Examination, ScheduleSlot, SlotField, SlotId};
pub use school::SchoolId;
pub use student::{ClassRef, CurrentClass, RawStudentRecord, SectionRef, Student};
pub use token::{AccessToken, TokenPair};
pub use user::UserProfile;
