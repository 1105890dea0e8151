//! Application context
//!
//! `App` owns the course, the user directory and the theme, loaded once from
//! storage and replaced whole on every change. Components borrow it instead
//! of reaching for globals. Each mutation follows the same shape: read the
//! current value, compute the new one, write it back, then swap it in.
//!
//! Nothing coordinates two `App`s over the same store. The last write wins.

use tracing::{info, warn};

use crate::admin::{self, LessonEdit, NewQuestion, NewUser, ThemeEdit};
use crate::config::{Config, CourseConfig};
use crate::error::{LmsError, Result};
use crate::gating::{self, ModuleState, ProgressSummary};
use crate::models::{Course, Lesson, Module, Quiz, User, UserProgress, VisualConfig};
use crate::quiz::{QuizAttempt, QuizOutcome};
use crate::report::{self, StudentReport};
use crate::storage::Storage;
use crate::types::Role;

/// Where a user lands right after logging in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Landing {
    /// Admin content management view
    AdminContent,
    /// First lesson of the first module
    Lesson(String),
    /// The course has no lessons yet
    Empty,
}

/// An authenticated user together with their progress
#[derive(Debug, Clone)]
pub struct Session {
    user: User,
    progress: UserProgress,
    landing: Landing,
}

impl Session {
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    pub fn landing(&self) -> &Landing {
        &self.landing
    }
}

pub struct App {
    storage: Storage,
    settings: CourseConfig,
    course: Course,
    users: Vec<User>,
    theme: VisualConfig,
}

impl App {
    /// Open the configured store and load every record
    pub fn open(config: &Config) -> anyhow::Result<Self> {
        let storage = Storage::open(&config.storage)?;
        Ok(Self::new(storage, config.course.clone())?)
    }

    pub fn new(storage: Storage, settings: CourseConfig) -> Result<Self> {
        let course = storage.course()?;
        let users = storage.users()?;
        let theme = storage.visual_config()?;
        Ok(Self {
            storage,
            settings,
            course,
            users,
            theme,
        })
    }

    /// Fresh in-memory app with default settings
    pub fn in_memory() -> Result<Self> {
        Self::new(Storage::in_memory(), CourseConfig::default())
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn theme(&self) -> &VisualConfig {
        &self.theme
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    // ----- Sessions -----

    /// Check credentials by plain equality against the user directory
    pub fn login(&self, username: &str, password: &str) -> Result<Session> {
        let user = self
            .users
            .iter()
            .find(|u| u.username == username && u.password.matches(password))
            .ok_or_else(|| {
                warn!("Rejected login for '{}'", username);
                LmsError::InvalidCredentials
            })?;

        let progress = self.storage.progress(&user.id)?;
        let landing = if user.is_admin() {
            Landing::AdminContent
        } else {
            match gating::first_lesson(&self.course) {
                Some(lesson) => Landing::Lesson(lesson.id.clone()),
                None => Landing::Empty,
            }
        };

        info!("User {} logged in as {}", user.id, user.role.as_str());
        Ok(Session {
            user: user.clone(),
            progress,
            landing,
        })
    }

    pub fn outline(&self, session: &Session) -> Vec<ModuleState> {
        gating::module_states(session.role(), &self.course, &session.progress)
    }

    pub fn summary(&self, session: &Session) -> ProgressSummary {
        ProgressSummary::compute(&self.course, &session.progress)
    }

    // ----- Learning -----

    /// Look up a lesson the session is allowed to read
    pub fn open_lesson(&self, session: &Session, lesson_id: &str) -> Result<(&Module, &Lesson)> {
        let (idx, module, lesson) = self
            .course
            .find_lesson(lesson_id)
            .ok_or_else(|| LmsError::not_found("lesson", lesson_id))?;
        if !gating::module_accessible(session.role(), idx, &self.course.modules, &session.progress) {
            return Err(LmsError::ModuleLocked(module.id.clone()));
        }
        Ok((module, lesson))
    }

    /// Mark a lesson complete and persist immediately. Completing it again is
    /// a no-op.
    pub fn complete_lesson(&mut self, session: &mut Session, lesson_id: &str) -> Result<()> {
        self.open_lesson(session, lesson_id)?;
        session.progress = self.storage.mark_lesson_complete(&session.user.id, lesson_id)?;
        Ok(())
    }

    pub fn open_quiz(&self, session: &Session, module_id: &str) -> Result<&Quiz> {
        let idx = self
            .course
            .module_index(module_id)
            .ok_or_else(|| LmsError::not_found("module", module_id))?;
        if !gating::module_accessible(session.role(), idx, &self.course.modules, &session.progress) {
            return Err(LmsError::ModuleLocked(module_id.to_string()));
        }
        Ok(&self.course.modules[idx].quiz)
    }

    /// Score an attempt; a pass is recorded against the owning module.
    /// A later failure never revokes an earlier pass.
    pub fn submit_quiz(
        &mut self,
        session: &mut Session,
        module_id: &str,
        attempt: &QuizAttempt,
    ) -> Result<QuizOutcome> {
        let quiz = self.open_quiz(session, module_id)?;
        let outcome = attempt.score(quiz);
        let owner = quiz.module_id.clone();

        info!(
            "User {} scored {}/{} on module {}",
            session.user.id, outcome.correct, outcome.total, owner
        );
        if outcome.passed {
            session.progress = self.storage.mark_quiz_passed(&session.user.id, &owner)?;
        }
        Ok(outcome)
    }

    // ----- Administration -----

    fn require_admin(session: &Session) -> Result<()> {
        if session.user.is_admin() {
            Ok(())
        } else {
            Err(LmsError::Forbidden)
        }
    }

    fn commit_course(&mut self, course: Course) -> Result<()> {
        self.storage.save_course(&course)?;
        self.course = course;
        Ok(())
    }

    fn commit_users(&mut self, users: Vec<User>) -> Result<()> {
        self.storage.save_users(&users)?;
        self.users = users;
        Ok(())
    }

    pub fn add_user(&mut self, session: &Session, new: NewUser) -> Result<User> {
        Self::require_admin(session)?;
        let (users, user) = admin::add_user(&self.users, new)?;
        self.commit_users(users)?;
        info!("Added user {} ({})", user.id, user.username);
        Ok(user)
    }

    /// Delete a user. Their stored progress is left in place.
    pub fn delete_user(&mut self, session: &Session, user_id: &str) -> Result<()> {
        Self::require_admin(session)?;
        let users = admin::delete_user(&self.users, user_id, &self.settings.protected_user_id)
            .map_err(|e| {
                if matches!(e, LmsError::ProtectedUser(_)) {
                    warn!("Refused to delete protected user {}", user_id);
                }
                e
            })?;
        self.commit_users(users)?;
        info!("Deleted user {}", user_id);
        Ok(())
    }

    pub fn add_module(&mut self, session: &Session, title: &str) -> Result<String> {
        Self::require_admin(session)?;
        let (course, module_id) = admin::add_module(&self.course, title, self.settings.default_passing_score)?;
        self.commit_course(course)?;
        info!("Added module {}", module_id);
        Ok(module_id)
    }

    pub fn delete_module(&mut self, session: &Session, module_id: &str) -> Result<()> {
        Self::require_admin(session)?;
        let course = admin::delete_module(&self.course, module_id)?;
        self.commit_course(course)?;
        info!("Deleted module {}", module_id);
        Ok(())
    }

    pub fn add_lesson(&mut self, session: &Session, module_id: &str, title: &str) -> Result<String> {
        Self::require_admin(session)?;
        let (course, lesson_id) = admin::add_lesson(&self.course, module_id, title)?;
        self.commit_course(course)?;
        info!("Added lesson {} to module {}", lesson_id, module_id);
        Ok(lesson_id)
    }

    pub fn update_lesson(
        &mut self,
        session: &Session,
        module_id: &str,
        lesson_id: &str,
        edit: LessonEdit,
    ) -> Result<()> {
        Self::require_admin(session)?;
        let course = admin::update_lesson(&self.course, module_id, lesson_id, edit)?;
        self.commit_course(course)?;
        info!("Updated lesson {}", lesson_id);
        Ok(())
    }

    pub fn add_question(&mut self, session: &Session, module_id: &str, new: NewQuestion) -> Result<String> {
        Self::require_admin(session)?;
        let (course, question_id) = admin::add_question(&self.course, module_id, new)?;
        self.commit_course(course)?;
        info!("Added question {} to module {}", question_id, module_id);
        Ok(question_id)
    }

    pub fn set_passing_score(&mut self, session: &Session, module_id: &str, passing_score: u32) -> Result<()> {
        Self::require_admin(session)?;
        let course = admin::set_passing_score(&self.course, module_id, passing_score)?;
        self.commit_course(course)?;
        info!("Passing score of module {} set to {}", module_id, passing_score);
        Ok(())
    }

    pub fn update_theme(&mut self, session: &Session, edit: ThemeEdit) -> Result<&VisualConfig> {
        Self::require_admin(session)?;
        let theme = admin::update_theme(&self.theme, edit)?;
        self.storage.save_visual_config(&theme)?;
        self.theme = theme;
        info!("Theme updated");
        Ok(&self.theme)
    }

    pub fn reports(&self, session: &Session) -> Result<Vec<StudentReport>> {
        Self::require_admin(session)?;
        let table = self.storage.all_progress()?;
        Ok(report::student_reports(&self.course, &self.users, &table))
    }
}
