//! quizrun-report: Self-contained HTML results pages for submitted quizzes.

pub mod html;
