//! Core data model types for quizrun.
//!
//! Questions are supplied once before a session starts and never change
//! while it runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QuizError;
use crate::grading::{to_number, GradingRule};

/// The answer shape a question expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// One numeric value.
    Single,
    /// A quotient/remainder pair.
    Dual,
    /// Free text.
    Text,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Single => write!(f, "single"),
            QuestionKind::Dual => write!(f, "dual"),
            QuestionKind::Text => write!(f, "text"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(QuestionKind::Single),
            "dual" => Ok(QuestionKind::Dual),
            "text" => Ok(QuestionKind::Text),
            other => Err(QuizError::UnknownKind(other.to_string())),
        }
    }
}

/// A scalar answer value as authored: either a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Numeric value, `NaN` when the text form is not a number.
    pub fn as_number(&self) -> f64 {
        match self {
            Scalar::Number(n) => *n,
            Scalar::Text(s) => to_number(s),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n as f64)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Number(f64::from(n))
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

/// The expected answer of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    /// Quotient and remainder, for `dual` questions.
    Pair { quotient: Scalar, remainder: Scalar },
    /// A single value, for `single` and `text` questions.
    Scalar(Scalar),
}

impl CorrectAnswer {
    pub fn pair(quotient: impl Into<Scalar>, remainder: impl Into<Scalar>) -> Self {
        CorrectAnswer::Pair {
            quotient: quotient.into(),
            remainder: remainder.into(),
        }
    }

    pub fn scalar(value: impl Into<Scalar>) -> Self {
        CorrectAnswer::Scalar(value.into())
    }
}

impl fmt::Display for CorrectAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrectAnswer::Pair {
                quotient,
                remainder,
            } => write!(f, "Q: {quotient}, R: {remainder}"),
            CorrectAnswer::Scalar(value) => write!(f, "{value}"),
        }
    }
}

/// A single quiz item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, unique within a question set.
    pub id: String,
    /// Answer shape.
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Text shown to the user.
    pub question_text: String,
    /// The expected answer.
    pub correct_answer: CorrectAnswer,
    /// Explicit grading rule; inferred from the kind and text when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<GradingRule>,
    /// Topic label used for per-category breakdowns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        kind: QuestionKind,
        question_text: impl Into<String>,
        correct_answer: CorrectAnswer,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            question_text: question_text.into(),
            correct_answer,
            rule: None,
            category: None,
        }
    }

    pub fn with_rule(mut self, rule: GradingRule) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// The rule used to grade this question.
    pub fn grading_rule(&self) -> GradingRule {
        self.rule
            .unwrap_or_else(|| GradingRule::infer(self.kind, &self.question_text))
    }

    /// Check that the correct answer and rule fit the question kind.
    pub fn check(&self) -> Result<(), QuizError> {
        let shape_ok = match (self.kind, &self.correct_answer) {
            (QuestionKind::Dual, CorrectAnswer::Pair { .. }) => true,
            (QuestionKind::Single | QuestionKind::Text, CorrectAnswer::Scalar(_)) => true,
            _ => false,
        };
        if !shape_ok {
            return Err(QuizError::AnswerShape {
                id: self.id.clone(),
                kind: self.kind,
                expected: match self.kind {
                    QuestionKind::Dual => "quotient/remainder pair",
                    _ => "scalar",
                },
            });
        }

        let rule = self.grading_rule();
        if !rule.accepts(self.kind) {
            return Err(QuizError::IncompatibleRule {
                id: self.id.clone(),
                kind: self.kind,
                rule,
            });
        }
        Ok(())
    }
}

/// An ordered collection of questions forming one quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSet {
    /// Unique identifier for this question set.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this question set.
    #[serde(default)]
    pub description: String,
    /// The questions, in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
}
