//! Course, user and theme authoring
//!
//! Each operation validates its input and returns a new value to be written
//! back whole. Nothing here touches storage.

use uuid::Uuid;

use crate::error::{LmsError, Result};
use crate::models::theme::parse_hex_color;
use crate::models::{Course, Credential, Lesson, Module, Question, Quiz, User, VisualConfig};
use crate::types::Role;

const NEW_MODULE_SUMMARY: &str = "Summary of the new module";
const NEW_LESSON_CONTENT: &str = "New content";

fn new_id(prefix: &str) -> String {
    format!("{}{}", prefix, Uuid::new_v4().simple())
}

fn required(value: &str, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LmsError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn module_mut<'a>(course: &'a mut Course, module_id: &str) -> Result<&'a mut Module> {
    course
        .modules
        .iter_mut()
        .find(|m| m.id == module_id)
        .ok_or_else(|| LmsError::not_found("module", module_id))
}

// ----- Users -----

/// Form input for a new student account
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub display_name: String,
    pub username: String,
    pub password: String,
}

/// Append a student; returns the new list and the created user
pub fn add_user(users: &[User], new: NewUser) -> Result<(Vec<User>, User)> {
    let display_name = required(&new.display_name, "name")?;
    let username = required(&new.username, "username")?;
    if new.password.trim().is_empty() {
        return Err(LmsError::MissingField("password"));
    }
    if users.iter().any(|u| u.username == username) {
        return Err(LmsError::DuplicateUsername(username));
    }

    let user = User {
        id: new_id("u"),
        username,
        password: Credential::new(new.password),
        display_name,
        role: Role::Student,
    };
    let mut updated = users.to_vec();
    updated.push(user.clone());
    Ok((updated, user))
}

/// Remove a user by id, refusing the protected account
pub fn delete_user(users: &[User], user_id: &str, protected_id: &str) -> Result<Vec<User>> {
    if user_id == protected_id {
        return Err(LmsError::ProtectedUser(user_id.to_string()));
    }
    if !users.iter().any(|u| u.id == user_id) {
        return Err(LmsError::not_found("user", user_id));
    }
    Ok(users.iter().filter(|u| u.id != user_id).cloned().collect())
}

// ----- Modules -----

/// Append a module with no lessons and an empty quiz
pub fn add_module(course: &Course, title: &str, passing_score: u32) -> Result<(Course, String)> {
    let title = required(title, "title")?;
    if passing_score > 100 {
        return Err(LmsError::InvalidPassingScore(passing_score));
    }

    let module_id = new_id("m");
    let module = Module {
        id: module_id.clone(),
        order: course.modules.len() as u32 + 1,
        title,
        summary: NEW_MODULE_SUMMARY.to_string(),
        lessons: Vec::new(),
        quiz: Quiz {
            id: new_id("q"),
            module_id: module_id.clone(),
            passing_score,
            questions: Vec::new(),
        },
    };

    let mut updated = course.clone();
    updated.modules.push(module);
    Ok((updated, module_id))
}

/// Remove a module together with its lessons and quiz.
///
/// Remaining modules keep their display order and stored progress is left
/// as is.
pub fn delete_module(course: &Course, module_id: &str) -> Result<Course> {
    if course.module(module_id).is_none() {
        return Err(LmsError::not_found("module", module_id));
    }
    let mut updated = course.clone();
    updated.modules.retain(|m| m.id != module_id);
    Ok(updated)
}

// ----- Lessons -----

pub fn add_lesson(course: &Course, module_id: &str, title: &str) -> Result<(Course, String)> {
    let title = required(title, "title")?;
    let mut updated = course.clone();
    let module = module_mut(&mut updated, module_id)?;

    let lesson_id = new_id("l");
    module.lessons.push(Lesson {
        id: lesson_id.clone(),
        order: module.lessons.len() as u32 + 1,
        title,
        content: NEW_LESSON_CONTENT.to_string(),
        video_url: None,
        image_url: None,
    });
    Ok((updated, lesson_id))
}

/// Fields to change on an existing lesson; `None` leaves a field alone and an
/// empty media URL clears it.
#[derive(Debug, Clone, Default)]
pub struct LessonEdit {
    pub title: Option<String>,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
}

fn media(url: String) -> Option<String> {
    let url = url.trim();
    (!url.is_empty()).then(|| url.to_string())
}

pub fn update_lesson(course: &Course, module_id: &str, lesson_id: &str, edit: LessonEdit) -> Result<Course> {
    let mut updated = course.clone();
    let module = module_mut(&mut updated, module_id)?;
    let lesson = module
        .lessons
        .iter_mut()
        .find(|l| l.id == lesson_id)
        .ok_or_else(|| LmsError::not_found("lesson", lesson_id))?;

    if let Some(title) = edit.title {
        lesson.title = required(&title, "title")?;
    }
    if let Some(content) = edit.content {
        lesson.content = content;
    }
    if let Some(url) = edit.video_url {
        lesson.video_url = media(url);
    }
    if let Some(url) = edit.image_url {
        lesson.image_url = media(url);
    }
    Ok(updated)
}

// ----- Quizzes -----

#[derive(Debug, Clone, Default)]
pub struct NewQuestion {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

pub fn add_question(course: &Course, module_id: &str, new: NewQuestion) -> Result<(Course, String)> {
    let text = required(&new.text, "text")?;
    if new.options.len() < 2 {
        return Err(LmsError::InvalidQuestion("at least two options are required"));
    }
    if new.options.iter().any(|o| o.trim().is_empty()) {
        return Err(LmsError::InvalidQuestion("options cannot be blank"));
    }
    if new.correct_answer >= new.options.len() {
        return Err(LmsError::InvalidQuestion("correct answer is not one of the options"));
    }

    let mut updated = course.clone();
    let quiz = &mut module_mut(&mut updated, module_id)?.quiz;
    let question_id = format!("{}_{}", quiz.id, quiz.questions.len() + 1);
    quiz.questions.push(Question {
        id: question_id.clone(),
        text,
        options: new.options.into_iter().map(|o| o.trim().to_string()).collect(),
        correct_answer: new.correct_answer,
    });
    Ok((updated, question_id))
}

pub fn set_passing_score(course: &Course, module_id: &str, passing_score: u32) -> Result<Course> {
    if passing_score > 100 {
        return Err(LmsError::InvalidPassingScore(passing_score));
    }
    let mut updated = course.clone();
    module_mut(&mut updated, module_id)?.quiz.passing_score = passing_score;
    Ok(updated)
}

// ----- Theme -----

#[derive(Debug, Clone, Default)]
pub struct ThemeEdit {
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub background_color: Option<String>,
}

impl ThemeEdit {
    pub fn is_empty(&self) -> bool {
        self.logo_url.is_none() && self.primary_color.is_none() && self.background_color.is_none()
    }
}

fn color(value: String) -> Result<String> {
    let value = value.trim().to_lowercase();
    match parse_hex_color(&value) {
        Some(_) => Ok(value),
        None => Err(LmsError::InvalidColor(value)),
    }
}

pub fn update_theme(current: &VisualConfig, edit: ThemeEdit) -> Result<VisualConfig> {
    let mut updated = current.clone();
    if let Some(url) = edit.logo_url {
        updated.logo_url = required(&url, "logo url")?;
    }
    if let Some(primary) = edit.primary_color {
        updated.primary_color = color(primary)?;
    }
    if let Some(background) = edit.background_color {
        updated.background_color = color(background)?;
    }
    Ok(updated)
}
