//! Per-user progress record

use serde::{Deserialize, Serialize};

/// Completed lessons and passed quizzes for one user.
///
/// Both lists behave as insertion-ordered sets. `passed_quizzes` holds the
/// owning module id of each passed quiz.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    #[serde(default)]
    pub completed_lessons: Vec<String>,
    #[serde(default)]
    pub passed_quizzes: Vec<String>,
}

impl UserProgress {
    pub fn is_empty(&self) -> bool {
        self.completed_lessons.is_empty() && self.passed_quizzes.is_empty()
    }
}
