//! Runner configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `output_dir`.
pub const OUTPUT_DIR_ENV: &str = "QUIZRUN_OUTPUT_DIR";

/// Top-level quizrun configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Question set used when `run` gets no `--questions`.
    #[serde(default)]
    pub question_set: Option<PathBuf>,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Report formats written after submission (json, html, markdown).
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    /// Milliseconds between timer ticks.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Show the running timer with each question.
    #[serde(default = "default_true")]
    pub show_timer: bool,
    /// Move to the next question after an answer line.
    #[serde(default = "default_true")]
    pub auto_advance: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizrun-results")
}
fn default_formats() -> Vec<String> {
    vec!["json".to_string()]
}
fn default_tick_interval() -> u64 {
    1000
}
fn default_true() -> bool {
    true
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_set: None,
            output_dir: default_output_dir(),
            formats: default_formats(),
            tick_interval_ms: default_tick_interval(),
            show_timer: true,
            auto_advance: true,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizrun.toml` in the current directory
/// 2. `~/.config/quizrun/config.toml`
///
/// `QUIZRUN_OUTPUT_DIR` overrides the output directory.
pub fn load_config() -> Result<QuizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizrun.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => parse_config_file(path)?,
        None => QuizConfig::default(),
    };

    if let Ok(dir) = std::env::var(OUTPUT_DIR_ENV) {
        config.output_dir = PathBuf::from(dir);
    }

    config.output_dir = resolve_path(&config.output_dir);
    config.question_set = config.question_set.as_deref().map(resolve_path);

    anyhow::ensure!(
        config.tick_interval_ms > 0,
        "tick_interval_ms must be greater than zero"
    );

    tracing::debug!(?config_path, ?config, "configuration loaded");
    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<QuizConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<QuizConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizrun"))
}
