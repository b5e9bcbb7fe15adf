//! TOML question-set parser.
//!
//! Loads question sets from TOML files and directories, validates them, and
//! writes them back out (used by the generator).

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::grading::GradingRule;
use crate::model::{CorrectAnswer, Question, QuestionKind, QuestionSet};

/// Intermediate TOML structure for question-set files.
#[derive(Debug, Serialize, Deserialize)]
struct TomlQuestionFile {
    quiz: TomlQuizHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlQuizHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    question_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    // Kept last: a pair serializes as a sub-table.
    correct_answer: CorrectAnswer,
}

/// Parse a single TOML file into a `QuestionSet`.
pub fn parse_question_set(path: &Path) -> Result<QuestionSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question set file: {}", path.display()))?;

    parse_question_set_str(&content, path)
}

/// Parse a TOML string into a `QuestionSet` (useful for testing).
pub fn parse_question_set_str(content: &str, source_path: &Path) -> Result<QuestionSet> {
    let parsed: TomlQuestionFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let kind: QuestionKind = q
                .kind
                .parse()
                .with_context(|| format!("question {}", q.id))?;
            let rule = q
                .rule
                .map(|r| r.parse::<GradingRule>())
                .transpose()
                .with_context(|| format!("question {}", q.id))?;

            Ok(Question {
                id: q.id,
                kind,
                question_text: q.question_text,
                correct_answer: q.correct_answer,
                rule,
                category: q.category,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionSet {
        id: parsed.quiz.id,
        name: parsed.quiz.name,
        description: parsed.quiz.description,
        questions,
    })
}

/// Render a question set as TOML.
pub fn question_set_to_toml(set: &QuestionSet) -> Result<String> {
    let file = TomlQuestionFile {
        quiz: TomlQuizHeader {
            id: set.id.clone(),
            name: set.name.clone(),
            description: set.description.clone(),
        },
        questions: set
            .questions
            .iter()
            .map(|q| TomlQuestion {
                id: q.id.clone(),
                kind: q.kind.to_string(),
                question_text: q.question_text.clone(),
                rule: q.rule.map(|r| r.to_string()),
                category: q.category.clone(),
                correct_answer: q.correct_answer.clone(),
            })
            .collect(),
    };
    toml::to_string(&file).context("failed to serialize question set")
}

/// Write a question set to a TOML file, creating parent directories.
pub fn write_question_set(set: &QuestionSet, path: &Path) -> Result<()> {
    let content = question_set_to_toml(set)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write question set to {}", path.display()))
}

/// Recursively load all `.toml` question-set files from a directory.
pub fn load_question_directory(dir: &Path) -> Result<Vec<QuestionSet>> {
    let mut sets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            sets.extend(load_question_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_set(&path) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(sets)
}

/// Load a question set from a file, or every set found under a directory.
pub fn load_question_sets(path: &Path) -> Result<Vec<QuestionSet>> {
    if path.is_dir() {
        load_question_directory(path)
    } else {
        Ok(vec![parse_question_set(path)?])
    }
}

/// A warning from question-set validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a question set for common issues.
pub fn validate_question_set(set: &QuestionSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if set.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "question set has no questions".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for q in &set.questions {
        let warn = |message: String| ValidationWarning {
            question_id: Some(q.id.clone()),
            message,
        };

        if !seen_ids.insert(&q.id) {
            warnings.push(warn(format!("duplicate question ID: {}", q.id)));
        }

        if q.question_text.trim().is_empty() {
            warnings.push(warn("question_text is empty".into()));
        }

        if let Err(e) = q.check() {
            warnings.push(warn(e.to_string()));
            continue;
        }

        let rule = q.grading_rule();
        match (rule, &q.correct_answer) {
            (GradingRule::Numeric, CorrectAnswer::Scalar(value)) if value.as_number().is_nan() => {
                warnings.push(warn(format!(
                    "correct_answer \"{value}\" is not a number; no answer can match"
                )));
            }
            (
                GradingRule::PairExact,
                CorrectAnswer::Pair {
                    quotient,
                    remainder,
                },
            ) if quotient.as_number().is_nan() || remainder.as_number().is_nan() => {
                warnings.push(warn(
                    "correct_answer pair is not numeric; no answer can match".into(),
                ));
            }
            _ => {}
        }

        if q.kind == QuestionKind::Text && q.rule.is_none() && rule == GradingRule::ExactString {
            warnings.push(warn(
                "text question has no rule and no marker; graded by exact match".into(),
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Scalar;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[quiz]
id = "basics"
name = "Math Basics"
description = "Arithmetic warm-up"

[[questions]]
id = "add"
type = "single"
question_text = "1234 + 4321 = ?"
correct_answer = 5555
category = "Arithmetic"

[[questions]]
id = "div"
type = "dual"
question_text = "Divide 1000 by 7. What is the Quotient and Remainder?"
correct_answer = { quotient = 142, remainder = 6 }

[[questions]]
id = "factors"
type = "text"
question_text = "List all prime factors of 84 (comma separated)"
correct_answer = "2,2,3,7"
rule = "unordered-numeric-list"
"#;

    #[test]
    fn parse_valid_toml() {
        let set = parse_question_set_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(set.id, "basics");
        assert_eq!(set.questions.len(), 3);
        assert_eq!(set.questions[0].kind, QuestionKind::Single);
        assert_eq!(set.questions[0].category.as_deref(), Some("Arithmetic"));
        assert_eq!(
            set.questions[1].correct_answer,
            CorrectAnswer::Pair {
                quotient: Scalar::Number(142.0),
                remainder: Scalar::Number(6.0),
            }
        );
        assert_eq!(
            set.questions[2].rule,
            Some(GradingRule::UnorderedNumericList)
        );
        assert!(validate_question_set(&set).is_empty());
    }

    #[test]
    fn parse_unknown_type_fails() {
        let toml = r#"
[quiz]
id = "bad"
name = "Bad"

[[questions]]
id = "q1"
type = "essay"
question_text = "Why?"
correct_answer = "because"
"#;
        let err = parse_question_set_str(toml, &PathBuf::from("bad.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("unknown question type"));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_question_set_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn validate_reports_problems() {
        let toml = r#"
[quiz]
id = "dupes"
name = "Dupes"

[[questions]]
id = "same"
type = "single"
question_text = "2 + 2"
correct_answer = "four"

[[questions]]
id = "same"
type = "dual"
question_text = "Divide"
correct_answer = 3

[[questions]]
id = "capital"
type = "text"
question_text = "Capital of France?"
correct_answer = "Paris"
"#;
        let set = parse_question_set_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_question_set(&set);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
        assert!(warnings.iter().any(|w| w.message.contains("not a number")));
        assert!(warnings.iter().any(|w| w.message.contains("quotient/remainder pair")));
        assert!(warnings.iter().any(|w| w.message.contains("exact match")));
    }

    #[test]
    fn toml_roundtrip_keeps_pairs() {
        let set = parse_question_set_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let rendered = question_set_to_toml(&set).unwrap();
        let back = parse_question_set_str(&rendered, &PathBuf::from("out.toml")).unwrap();
        assert_eq!(back.questions, set.questions);
    }

    #[test]
    fn load_directory_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "[quiz").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let sets = load_question_directory(dir.path()).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].id, "basics");
    }

    #[test]
    fn write_then_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/set.toml");
        let set = parse_question_set_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        write_question_set(&set, &path).unwrap();
        let loaded = load_question_sets(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].questions.len(), 3);
    }
}
