//! Raw answer input and captured answer values.
//!
//! [`AnswerInput`] is what the user currently has typed for a question.
//! Capturing it produces an [`AnswerValue`], or `None` when nothing usable
//! was entered.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::QuestionKind;

/// Text shown for a question that was never answered.
pub const NO_ANSWER: &str = "No Answer";

/// A captured, trimmed answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Answer to a `single` or `text` question.
    Scalar(String),
    /// Answer to a `dual` question. Either side may be empty.
    Pair { quotient: String, remainder: String },
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Scalar(s) => write!(f, "{s}"),
            AnswerValue::Pair {
                quotient,
                remainder,
            } => write!(f, "Q: {quotient}, R: {remainder}"),
        }
    }
}

/// Whether a captured answer counts as answered.
///
/// A pair counts when either side holds non-blank text.
pub fn is_answered(value: Option<&AnswerValue>) -> bool {
    match value {
        None => false,
        Some(AnswerValue::Scalar(s)) => !s.trim().is_empty(),
        Some(AnswerValue::Pair {
            quotient,
            remainder,
        }) => !quotient.trim().is_empty() || !remainder.trim().is_empty(),
    }
}

/// Format a captured answer for result tables.
pub fn format_answer(value: Option<&AnswerValue>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => NO_ANSWER.to_string(),
    }
}

/// The raw, untrimmed input fields for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerInput {
    /// One field, for `single` and `text` questions.
    Text(String),
    /// Two fields, for `dual` questions.
    Pair { quotient: String, remainder: String },
}

impl AnswerInput {
    /// Empty input fields for a question of the given kind.
    pub fn blank_for(kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::Single | QuestionKind::Text => AnswerInput::Text(String::new()),
            QuestionKind::Dual => AnswerInput::Pair {
                quotient: String::new(),
                remainder: String::new(),
            },
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        AnswerInput::Text(value.into())
    }

    pub fn pair(quotient: impl Into<String>, remainder: impl Into<String>) -> Self {
        AnswerInput::Pair {
            quotient: quotient.into(),
            remainder: remainder.into(),
        }
    }

    /// Build input from one line of user text.
    ///
    /// For `dual` questions the line is split on the first comma into
    /// quotient and remainder; a missing side stays empty.
    pub fn from_line(kind: QuestionKind, line: &str) -> Self {
        match kind {
            QuestionKind::Single | QuestionKind::Text => AnswerInput::Text(line.to_string()),
            QuestionKind::Dual => match line.split_once(',') {
                Some((q, r)) => AnswerInput::pair(q, r),
                None => AnswerInput::pair(line, ""),
            },
        }
    }

    /// Whether these fields belong to a question of the given kind.
    pub fn fits(&self, kind: QuestionKind) -> bool {
        matches!(
            (self, kind),
            (
                AnswerInput::Text(_),
                QuestionKind::Single | QuestionKind::Text
            ) | (AnswerInput::Pair { .. }, QuestionKind::Dual)
        )
    }

    /// Trim every field and produce a value, or `None` when all are blank.
    pub fn capture(&self) -> Option<AnswerValue> {
        match self {
            AnswerInput::Text(raw) => {
                let value = raw.trim();
                (!value.is_empty()).then(|| AnswerValue::Scalar(value.to_string()))
            }
            AnswerInput::Pair {
                quotient,
                remainder,
            } => {
                let quotient = quotient.trim();
                let remainder = remainder.trim();
                if quotient.is_empty() && remainder.is_empty() {
                    None
                } else {
                    Some(AnswerValue::Pair {
                        quotient: quotient.to_string(),
                        remainder: remainder.to_string(),
                    })
                }
            }
        }
    }
}
