//! Per-category breakdown of a graded quiz.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::session::QuestionResult;

/// Label used for questions without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Statistics for one category of questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    /// Category label.
    pub category: String,
    /// Questions in this category.
    pub questions: usize,
    /// Questions with a captured answer.
    pub answered: usize,
    /// Questions graded correct.
    pub correct: usize,
    /// `correct / questions`, in `0.0..=1.0`.
    pub accuracy: f64,
    /// Seconds spent on this category.
    pub time_secs: u64,
    /// Average seconds per question.
    pub avg_time_secs: f64,
}

/// Group result rows by category, in category-name order.
pub fn compute_category_stats(results: &[QuestionResult]) -> BTreeMap<String, CategoryStats> {
    let mut grouped: BTreeMap<String, Vec<&QuestionResult>> = BTreeMap::new();
    for r in results {
        let category = r.category.as_deref().unwrap_or(UNCATEGORIZED);
        grouped.entry(category.to_string()).or_default().push(r);
    }

    grouped
        .into_iter()
        .map(|(category, rows)| {
            let questions = rows.len();
            let answered = rows.iter().filter(|r| r.answered).count();
            let correct = rows.iter().filter(|r| r.is_correct).count();
            let time_secs: u64 = rows.iter().map(|r| r.elapsed_secs).sum();
            let n = questions.max(1) as f64;
            let stats = CategoryStats {
                category: category.clone(),
                questions,
                answered,
                correct,
                accuracy: correct as f64 / n,
                time_secs,
                avg_time_secs: time_secs as f64 / n,
            };
            (category, stats)
        })
        .collect()
}
