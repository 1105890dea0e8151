//! Course content: Course → Module → {Lesson[], Quiz}; Quiz → Question[]

use serde::{Deserialize, Serialize};

/// The single course served by the portal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub title: String,
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl Course {
    /// Find a module by id
    pub fn module(&self, module_id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    /// Position of a module in the unlock chain
    pub fn module_index(&self, module_id: &str) -> Option<usize> {
        self.modules.iter().position(|m| m.id == module_id)
    }

    /// Find a lesson anywhere in the course, with its owning module index
    pub fn find_lesson(&self, lesson_id: &str) -> Option<(usize, &Module, &Lesson)> {
        self.modules.iter().enumerate().find_map(|(idx, m)| {
            m.lessons
                .iter()
                .find(|l| l.id == lesson_id)
                .map(|l| (idx, m, l))
        })
    }

    /// Total number of lessons across all modules
    pub fn total_lessons(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    /// Whether a lesson id still exists in the course
    pub fn has_lesson(&self, lesson_id: &str) -> bool {
        self.find_lesson(lesson_id).is_some()
    }
}

/// A course unit bundling ordered lessons and one gating quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    /// 1-based display rank
    pub order: u32,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    pub quiz: Quiz,
}

impl Module {
    pub fn lesson(&self, lesson_id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == lesson_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub order: u32,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Lesson {
    /// Content split into display paragraphs
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n').filter(|p| !p.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    /// Always equals the owning module's id
    pub module_id: String,
    /// Percentage threshold, 0..=100
    pub passing_score: u32,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_answer: usize,
}
