//! Quiz report types with JSON persistence and markdown rendering.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::QuestionSet;
use crate::session::{QuestionResult, QuizSummary};
use crate::statistics::{compute_category_stats, CategoryStats};

/// A complete report of one submitted quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the question set.
    pub quiz: QuizInfo,
    /// Questions answered correctly.
    pub score: usize,
    pub total_questions: usize,
    /// Score as a percentage.
    pub percentage: f64,
    /// Sum of per-question elapsed seconds.
    pub total_time_secs: u64,
    /// One row per question, in quiz order.
    pub results: Vec<QuestionResult>,
    /// Per-category breakdown.
    pub categories: BTreeMap<String, CategoryStats>,
}

/// Summary of a question set (without the questions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizInfo {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

impl QuizReport {
    /// Build a report from a submitted session's summary.
    pub fn new(set: &QuestionSet, summary: &QuizSummary) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            quiz: QuizInfo {
                id: set.id.clone(),
                name: set.name.clone(),
                question_count: summary.total_questions,
            },
            score: summary.score,
            total_questions: summary.total_questions,
            percentage: summary.percentage(),
            total_time_secs: summary.total_time_secs,
            results: summary.results.clone(),
            categories: compute_category_stats(&summary.results),
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: QuizReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("## {}\n\n", self.quiz.name));
        md.push_str(&format!(
            "**Score:** {} / {} ({:.1}%) | **Total Time:** {}s\n\n",
            self.score, self.total_questions, self.percentage, self.total_time_secs
        ));

        md.push_str("| # | Question | Your Answer | Result | Correct Answer | Time (s) |\n");
        md.push_str("|---|----------|-------------|--------|----------------|----------|\n");
        for r in &self.results {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                r.number,
                escape_cell(&r.question_text),
                escape_cell(&r.user_answer),
                if r.is_correct { "Correct" } else { "Incorrect" },
                escape_cell(r.correct_answer.as_deref().unwrap_or("")),
                r.elapsed_secs
            ));
        }

        if !self.categories.is_empty() {
            md.push_str("\n### Categories\n\n");
            md.push_str("| Category | Correct | Accuracy | Time (s) |\n");
            md.push_str("|----------|---------|----------|----------|\n");
            for stats in self.categories.values() {
                md.push_str(&format!(
                    "| {} | {}/{} | {:.1}% | {} |\n",
                    escape_cell(&stats.category),
                    stats.correct,
                    stats.questions,
                    stats.accuracy * 100.0,
                    stats.time_secs
                ));
            }
        }

        md
    }
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
