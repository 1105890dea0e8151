//! Course Portal - single-tenant learning management library
//!
//! One course of ordered modules, each with lessons and a gating quiz:
//! - Administrators manage users, content and the visual theme
//! - Students progress module by module, unlocking the next one by
//!   passing the previous module's quiz
//! - Every record is kept in a small key-value store (files, SQLite or memory)
//!
//! # Example
//!
//! ```
//! use course_portal::{App, QuizAttempt};
//!
//! let mut app = App::in_memory()?;
//! let mut session = app.login("student", "123")?;
//! app.complete_lesson(&mut session, "m1l1")?;
//! let outcome = app.submit_quiz(&mut session, "m1", &QuizAttempt::new())?;
//! assert!(!outcome.passed);
//! # Ok::<(), course_portal::LmsError>(())
//! ```

// Core modules (order matters for cross-module dependencies)
pub mod types;
pub mod error;
pub mod config;
pub mod models;
pub mod seed;
pub mod store;
pub mod storage;

// Course logic
pub mod gating;
pub mod quiz;
pub mod admin;
pub mod report;
pub mod app;
pub mod cli;

pub use app::{App, Landing, Session};
pub use config::Config;
pub use error::{LmsError, Result};
pub use models::{Course, Lesson, Module, Question, Quiz, User, UserProgress, VisualConfig};
pub use quiz::{QuizAttempt, QuizOutcome};
pub use storage::Storage;
pub use types::Role;
