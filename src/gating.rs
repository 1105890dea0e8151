//! Progress and module gating
//!
//! Modules unlock strictly in sequence: the first module is always open and
//! module `i` opens once module `i - 1`'s quiz is passed. Admins bypass the
//! chain entirely.

use serde::Serialize;

use crate::models::{Course, Lesson, Module, UserProgress};
use crate::types::Role;

pub fn is_lesson_complete(progress: &UserProgress, lesson_id: &str) -> bool {
    progress.completed_lessons.iter().any(|id| id == lesson_id)
}

pub fn is_quiz_passed(progress: &UserProgress, module_id: &str) -> bool {
    progress.passed_quizzes.iter().any(|id| id == module_id)
}

/// Whether the module at `module_index` can be opened
pub fn module_accessible(
    role: Role,
    module_index: usize,
    modules: &[Module],
    progress: &UserProgress,
) -> bool {
    if role.is_admin() || module_index == 0 {
        return true;
    }
    modules
        .get(module_index - 1)
        .is_some_and(|previous| is_quiz_passed(progress, &previous.id))
}

/// A lesson is selectable iff its module is accessible
pub fn lesson_accessible(role: Role, course: &Course, progress: &UserProgress, lesson_id: &str) -> bool {
    course
        .find_lesson(lesson_id)
        .is_some_and(|(idx, _, _)| module_accessible(role, idx, &course.modules, progress))
}

/// Insert a lesson id; returns false if it was already recorded
pub fn mark_lesson_complete(progress: &mut UserProgress, lesson_id: &str) -> bool {
    if is_lesson_complete(progress, lesson_id) {
        return false;
    }
    progress.completed_lessons.push(lesson_id.to_string());
    true
}

/// Insert a module id into the passed set; returns false if already present
pub fn mark_quiz_passed(progress: &mut UserProgress, module_id: &str) -> bool {
    if is_quiz_passed(progress, module_id) {
        return false;
    }
    progress.passed_quizzes.push(module_id.to_string());
    true
}

/// First lesson of the first module, where students land after login
pub fn first_lesson(course: &Course) -> Option<&Lesson> {
    course.modules.first().and_then(|m| m.lessons.first())
}

/// Integer percentage, 0 when there is nothing to complete
pub fn percentage(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((done as f64 / total as f64) * 100.0).round() as u32
}

/// Lesson completion across the whole course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}

impl ProgressSummary {
    /// Counts only completed ids that still exist in the course
    pub fn compute(course: &Course, progress: &UserProgress) -> Self {
        let total = course.total_lessons();
        let completed = progress
            .completed_lessons
            .iter()
            .filter(|id| course.has_lesson(id))
            .count();
        Self {
            completed,
            total,
            percentage: percentage(completed, total),
        }
    }
}

/// Outline entry for one module as seen by a given user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleState {
    pub module_id: String,
    pub order: u32,
    pub title: String,
    pub accessible: bool,
    pub quiz_passed: bool,
    pub lessons: Vec<LessonState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonState {
    pub lesson_id: String,
    pub order: u32,
    pub title: String,
    pub completed: bool,
}

pub fn module_states(role: Role, course: &Course, progress: &UserProgress) -> Vec<ModuleState> {
    course
        .modules
        .iter()
        .enumerate()
        .map(|(idx, module)| ModuleState {
            module_id: module.id.clone(),
            order: module.order,
            title: module.title.clone(),
            accessible: module_accessible(role, idx, &course.modules, progress),
            quiz_passed: is_quiz_passed(progress, &module.id),
            lessons: module
                .lessons
                .iter()
                .map(|lesson| LessonState {
                    lesson_id: lesson.id.clone(),
                    order: lesson.order,
                    title: lesson.title.clone(),
                    completed: is_lesson_complete(progress, &lesson.id),
                })
                .collect(),
        })
        .collect()
}
