//! Domain model
//!
//! Plain data records persisted as JSON. Field names serialise in camelCase
//! so stored records keep the shape the portal has always written.

pub mod course;
pub mod progress;
pub mod theme;
pub mod user;

pub use course::{Course, Lesson, Module, Question, Quiz};
pub use progress::UserProgress;
pub use theme::VisualConfig;
pub use user::{Credential, User};
