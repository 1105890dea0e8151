//! Quiz attempts and scoring

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{LmsError, Result};
use crate::models::Quiz;

/// Answers keyed by question index
pub type Answers = BTreeMap<usize, usize>;

/// An in-progress answer sheet for one quiz
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAttempt {
    answers: Answers,
}

impl QuizAttempt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an option for a question. A later selection for the same
    /// question replaces the earlier one.
    pub fn select(&mut self, quiz: &Quiz, question: usize, option: usize) -> Result<()> {
        let in_range = quiz
            .questions
            .get(question)
            .is_some_and(|q| option < q.options.len());
        if !in_range {
            return Err(LmsError::InvalidAnswer { question, option });
        }
        self.answers.insert(question, option);
        Ok(())
    }

    pub fn answer(&self, question: usize) -> Option<usize> {
        self.answers.get(&question).copied()
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    /// Clear every answer
    pub fn reset(&mut self) {
        self.answers.clear();
    }

    pub fn score(&self, quiz: &Quiz) -> QuizOutcome {
        score(quiz, &self.answers)
    }
}

/// Result of scoring a submission
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuizOutcome {
    pub correct: usize,
    pub total: usize,
    pub percentage: f64,
    pub passed: bool,
    pub passing_score: u32,
}

impl QuizOutcome {
    /// Percentage rounded for display
    pub fn display_percentage(&self) -> u32 {
        self.percentage.round() as u32
    }
}

/// Score answers against a quiz's own passing threshold.
///
/// Unanswered questions count as wrong. A quiz with no questions scores 0%
/// and never passes. Pass/fail compares whole numbers; `percentage` is for
/// display only.
pub fn score(quiz: &Quiz, answers: &Answers) -> QuizOutcome {
    let total = quiz.questions.len();
    let correct = quiz
        .questions
        .iter()
        .enumerate()
        .filter(|(idx, q)| answers.get(idx) == Some(&q.correct_answer))
        .count();

    let percentage = if total > 0 {
        (correct as f64 / total as f64) * 100.0
    } else {
        0.0
    };

    QuizOutcome {
        correct,
        total,
        percentage,
        passed: total > 0 && correct * 100 >= quiz.passing_score as usize * total,
        passing_score: quiz.passing_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Question;

    fn quiz_with(n: usize, passing_score: u32) -> Quiz {
        Quiz {
            id: "q".into(),
            module_id: "m".into(),
            passing_score,
            questions: (0..n)
                .map(|i| Question {
                    id: format!("q_{}", i),
                    text: format!("Question {}", i),
                    options: vec!["a".into(), "b".into(), "c".into()],
                    correct_answer: i % 3,
                })
                .collect(),
        }
    }

    fn answers_with_correct(quiz: &Quiz, correct: usize) -> Answers {
        quiz.questions
            .iter()
            .enumerate()
            .map(|(idx, q)| {
                let option = if idx < correct { q.correct_answer } else { (q.correct_answer + 1) % 3 };
                (idx, option)
            })
            .collect()
    }

    #[test]
    fn test_five_questions_at_seventy() {
        let quiz = quiz_with(5, 70);
        let three = score(&quiz, &answers_with_correct(&quiz, 3));
        assert_eq!(three.display_percentage(), 60);
        assert!(!three.passed);

        let four = score(&quiz, &answers_with_correct(&quiz, 4));
        assert_eq!(four.display_percentage(), 80);
        assert!(four.passed);
    }

    #[test]
    fn test_ceiling_threshold_boundary() {
        for n in 1..=12usize {
            let quiz = quiz_with(n, 70);
            let needed = (70 * n + 99) / 100;
            assert!(score(&quiz, &answers_with_correct(&quiz, needed)).passed, "n={}", n);
            if needed > 0 {
                assert!(!score(&quiz, &answers_with_correct(&quiz, needed - 1)).passed, "n={}", n);
            }
        }
    }

    #[test]
    fn test_exact_threshold_passes_despite_float_rounding() {
        let quiz = quiz_with(50, 58);
        let outcome = score(&quiz, &answers_with_correct(&quiz, 29));
        assert_eq!(outcome.correct, 29);
        assert!(outcome.passed);
        assert_eq!(outcome.display_percentage(), 58);
        assert!(!score(&quiz, &answers_with_correct(&quiz, 28)).passed);

        for (n, passing_score, correct) in [(100, 57, 57), (100, 58, 58), (100, 29, 29)] {
            let quiz = quiz_with(n, passing_score);
            assert!(score(&quiz, &answers_with_correct(&quiz, correct)).passed, "{}/{}", correct, n);
            assert!(!score(&quiz, &answers_with_correct(&quiz, correct - 1)).passed, "{}/{}", correct - 1, n);
        }
    }

    #[test]
    fn test_ceiling_boundary_for_every_threshold() {
        for n in 1..=60usize {
            for passing_score in 1..=100u32 {
                let quiz = quiz_with(n, passing_score);
                let needed = (passing_score as usize * n + 99) / 100;
                assert!(score(&quiz, &answers_with_correct(&quiz, needed)).passed, "n={} p={}", n, passing_score);
                assert!(!score(&quiz, &answers_with_correct(&quiz, needed - 1)).passed, "n={} p={}", n, passing_score);
            }
        }
    }

    #[test]
    fn test_threshold_is_per_quiz() {
        let quiz = quiz_with(5, 50);
        assert!(score(&quiz, &answers_with_correct(&quiz, 3)).passed);
        let strict = quiz_with(5, 100);
        assert!(!score(&strict, &answers_with_correct(&strict, 4)).passed);
    }

    #[test]
    fn test_zero_questions_never_pass() {
        let quiz = quiz_with(0, 0);
        let outcome = score(&quiz, &Answers::new());
        assert_eq!(outcome.percentage, 0.0);
        assert!(!outcome.passed);
    }

    #[test]
    fn test_unanswered_counts_as_wrong() {
        let quiz = quiz_with(4, 70);
        let mut attempt = QuizAttempt::new();
        attempt.select(&quiz, 0, quiz.questions[0].correct_answer).unwrap();
        let outcome = attempt.score(&quiz);
        assert_eq!(outcome.correct, 1);
        assert_eq!(outcome.total, 4);
        assert_eq!(outcome.percentage, 25.0);
    }

    #[test]
    fn test_last_selection_wins() {
        let quiz = quiz_with(1, 70);
        let right = quiz.questions[0].correct_answer;
        let wrong = (right + 1) % 3;

        let mut attempt = QuizAttempt::new();
        attempt.select(&quiz, 0, right).unwrap();
        attempt.select(&quiz, 0, wrong).unwrap();
        assert_eq!(attempt.answer(0), Some(wrong));
        assert!(!attempt.score(&quiz).passed);

        attempt.select(&quiz, 0, right).unwrap();
        assert_eq!(attempt.answered(), 1);
        assert!(attempt.score(&quiz).passed);
    }

    #[test]
    fn test_out_of_range_selection_rejected() {
        let quiz = quiz_with(2, 70);
        let mut attempt = QuizAttempt::new();
        assert!(matches!(
            attempt.select(&quiz, 5, 0),
            Err(LmsError::InvalidAnswer { question: 5, option: 0 })
        ));
        assert!(attempt.select(&quiz, 0, 3).is_err());
        assert_eq!(attempt.answered(), 0);
    }

    #[test]
    fn test_reset_clears_answers() {
        let quiz = quiz_with(2, 70);
        let mut attempt = QuizAttempt::new();
        attempt.select(&quiz, 1, 2).unwrap();
        attempt.reset();
        assert!(attempt.answers().is_empty());
    }
}
