//! Per-student progress report for administrators

use serde::Serialize;

use crate::gating::{is_quiz_passed, ProgressSummary};
use crate::models::{Course, User};
use crate::storage::ProgressTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentReport {
    pub user_id: String,
    pub display_name: String,
    pub lessons: ProgressSummary,
    pub quizzes_passed: usize,
    pub quizzes_total: usize,
}

/// One row per student, in user-directory order. Students without any
/// stored progress report zero.
pub fn student_reports(course: &Course, users: &[User], progress: &ProgressTable) -> Vec<StudentReport> {
    users
        .iter()
        .filter(|u| !u.is_admin())
        .map(|user| {
            let record = progress.get(&user.id).cloned().unwrap_or_default();
            StudentReport {
                user_id: user.id.clone(),
                display_name: user.display_name.clone(),
                lessons: ProgressSummary::compute(course, &record),
                quizzes_passed: course
                    .modules
                    .iter()
                    .filter(|m| is_quiz_passed(&record, &m.id))
                    .count(),
                quizzes_total: course.modules.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProgress;
    use crate::seed::{default_course, default_users};

    #[test]
    fn test_reports_skip_admins_and_default_to_zero() {
        let course = default_course();
        let users = default_users();
        let reports = student_reports(&course, &users, &ProgressTable::new());
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].user_id, "adv1");
        assert_eq!(reports[0].lessons.completed, 0);
        assert_eq!(reports[0].lessons.percentage, 0);
    }

    #[test]
    fn test_reports_count_progress() {
        let course = default_course();
        let users = default_users();
        let mut table = ProgressTable::new();
        table.insert("adv1".into(), UserProgress {
            completed_lessons: vec!["m1l1".into(), "m1l2".into(), "m1l3".into()],
            passed_quizzes: vec!["m1".into()],
        });
        let reports = student_reports(&course, &users, &table);
        assert_eq!(reports[0].lessons.completed, 3);
        assert_eq!(reports[0].lessons.percentage, 20);
        assert_eq!(reports[0].quizzes_passed, 1);
        assert_eq!(reports[0].quizzes_total, 3);
    }

    #[test]
    fn test_empty_course_reports_zero_percent() {
        let mut course = default_course();
        course.modules.clear();
        let reports = student_reports(&course, &default_users(), &ProgressTable::new());
        assert_eq!(reports[0].lessons.total, 0);
        assert_eq!(reports[0].lessons.percentage, 0);
    }
}
