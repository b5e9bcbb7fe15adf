//! quizrun-core: Quiz session state machine, grading, and question sets.
//!
//! This crate defines the question model, the per-question timers, the
//! grading rules, and the session that ties navigation, answers, and
//! submission together. Reports and configuration live here too so the
//! CLI and the HTML renderer share one data model.

pub mod answer;
pub mod config;
pub mod error;
pub mod generator;
pub mod grading;
pub mod model;
pub mod parser;
pub mod report;
pub mod session;
pub mod statistics;
pub mod timer;
