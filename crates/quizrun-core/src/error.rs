//! Quiz construction error types.
//!
//! These errors describe question sets that cannot back a session. User
//! input never produces one: malformed answers grade as incorrect and
//! empty ones capture as unanswered.

use thiserror::Error;

use crate::grading::GradingRule;
use crate::model::QuestionKind;

/// Errors raised while building a quiz from a question set.
#[derive(Debug, Error)]
pub enum QuizError {
    /// A session needs at least one question.
    #[error("quiz has no questions")]
    EmptyQuiz,

    /// The correct answer does not have the shape the question type needs.
    #[error("question {id}: {kind} question needs a {expected} correct answer")]
    AnswerShape {
        id: String,
        kind: QuestionKind,
        expected: &'static str,
    },

    /// An explicit grading rule cannot be applied to the question type.
    #[error("question {id}: rule {rule} cannot grade a {kind} question")]
    IncompatibleRule {
        id: String,
        kind: QuestionKind,
        rule: GradingRule,
    },

    /// An unrecognised question type name.
    #[error("unknown question type: {0}")]
    UnknownKind(String),

    /// An unrecognised grading rule name.
    #[error("unknown grading rule: {0}")]
    UnknownRule(String),
}

impl QuizError {
    /// Returns the id of the offending question, if the error concerns one.
    pub fn question_id(&self) -> Option<&str> {
        match self {
            QuizError::AnswerShape { id, .. } | QuizError::IncompatibleRule { id, .. } => {
                Some(id)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_question() {
        let err = QuizError::AnswerShape {
            id: "q7".into(),
            kind: QuestionKind::Dual,
            expected: "quotient/remainder pair",
        };
        assert_eq!(
            err.to_string(),
            "question q7: dual question needs a quotient/remainder pair correct answer"
        );
        assert_eq!(err.question_id(), Some("q7"));
        assert_eq!(QuizError::EmptyQuiz.question_id(), None);
    }
}
