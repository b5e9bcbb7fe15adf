//! Answer grading rules.
//!
//! Every question is graded by one [`GradingRule`]. Questions may name their
//! rule explicitly; otherwise it is inferred from the question kind and, for
//! `text` questions, from markers in the question text.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::answer::{is_answered, AnswerValue};
use crate::error::QuizError;
use crate::model::{CorrectAnswer, Question, QuestionKind};

/// Absolute tolerance for numeric answers.
pub const NUMERIC_TOLERANCE: f64 = 0.01;

/// Question-text marker that selects [`GradingRule::UnorderedNumericList`].
pub const PRIME_FACTORS_MARKER: &str = "prime factors";

/// Question-text marker that selects [`GradingRule::NormalizedString`].
pub const FRACTION_MARKER: &str = "fraction";

/// How a captured answer is compared with the correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradingRule {
    /// Numbers equal within [`NUMERIC_TOLERANCE`].
    Numeric,
    /// Quotient and remainder both exactly equal as numbers.
    PairExact,
    /// Comma-separated numbers, order-insensitive.
    UnorderedNumericList,
    /// Strings equal once all whitespace is removed.
    NormalizedString,
    /// Trimmed strings equal.
    ExactString,
}

impl GradingRule {
    /// The rule used when a question does not name one.
    pub fn infer(kind: QuestionKind, question_text: &str) -> Self {
        match kind {
            QuestionKind::Single => GradingRule::Numeric,
            QuestionKind::Dual => GradingRule::PairExact,
            QuestionKind::Text if question_text.contains(PRIME_FACTORS_MARKER) => {
                GradingRule::UnorderedNumericList
            }
            QuestionKind::Text if question_text.contains(FRACTION_MARKER) => {
                GradingRule::NormalizedString
            }
            QuestionKind::Text => GradingRule::ExactString,
        }
    }

    /// Whether this rule can grade answers to a question of `kind`.
    pub fn accepts(self, kind: QuestionKind) -> bool {
        match self {
            GradingRule::PairExact => kind == QuestionKind::Dual,
            _ => kind != QuestionKind::Dual,
        }
    }
}

impl fmt::Display for GradingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GradingRule::Numeric => "numeric",
            GradingRule::PairExact => "pair-exact",
            GradingRule::UnorderedNumericList => "unordered-numeric-list",
            GradingRule::NormalizedString => "normalized-string",
            GradingRule::ExactString => "exact-string",
        };
        write!(f, "{name}")
    }
}

impl FromStr for GradingRule {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "numeric" => Ok(GradingRule::Numeric),
            "pair-exact" => Ok(GradingRule::PairExact),
            "unordered-numeric-list" => Ok(GradingRule::UnorderedNumericList),
            "normalized-string" => Ok(GradingRule::NormalizedString),
            "exact-string" => Ok(GradingRule::ExactString),
            other => Err(QuizError::UnknownRule(other.to_string())),
        }
    }
}

/// Convert user text to a number; anything unparsable, including blank
/// text, becomes `NaN`.
pub fn to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Grade a captured answer against a question.
///
/// Unanswered questions are always incorrect. Malformed input is never an
/// error, only a wrong answer.
pub fn grade(question: &Question, answer: Option<&AnswerValue>) -> bool {
    let Some(answer) = answer.filter(|a| is_answered(Some(a))) else {
        return false;
    };

    match (question.grading_rule(), answer, &question.correct_answer) {
        (
            GradingRule::PairExact,
            AnswerValue::Pair {
                quotient,
                remainder,
            },
            CorrectAnswer::Pair {
                quotient: correct_quotient,
                remainder: correct_remainder,
            },
        ) => {
            to_number(quotient) == correct_quotient.as_number()
                && to_number(remainder) == correct_remainder.as_number()
        }
        (GradingRule::Numeric, AnswerValue::Scalar(user), CorrectAnswer::Scalar(correct)) => {
            numbers_close(to_number(user), correct.as_number())
        }
        (GradingRule::UnorderedNumericList, AnswerValue::Scalar(user), CorrectAnswer::Scalar(correct)) => {
            same_numeric_list(user, &correct.to_string())
        }
        (GradingRule::NormalizedString, AnswerValue::Scalar(user), CorrectAnswer::Scalar(correct)) => {
            strip_whitespace(user) == strip_whitespace(&correct.to_string())
        }
        (GradingRule::ExactString, AnswerValue::Scalar(user), CorrectAnswer::Scalar(correct)) => {
            user.trim() == correct.to_string().trim()
        }
        _ => false,
    }
}

fn numbers_close(user: f64, correct: f64) -> bool {
    (user - correct).abs() < NUMERIC_TOLERANCE
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Split on commas, trim, drop empty tokens, and sort numerically.
///
/// Non-numeric tokens sort after every number, in string order.
fn sorted_tokens(s: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = s
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    tokens.sort_by(|a, b| compare_tokens(a, b));
    tokens
}

fn compare_tokens(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

fn same_numeric_list(user: &str, correct: &str) -> bool {
    let user = sorted_tokens(user);
    let correct = sorted_tokens(correct);
    user.len() == correct.len() && user.iter().zip(&correct).all(|(u, c)| u == c)
}
