//! The quiz session state machine.
//!
//! A [`QuizSession`] is `Active` from construction until [`QuizSession::submit`],
//! after which it is `Submitted` and only exposes the graded summary.
//! Navigation always stops the outgoing timer and captures the outgoing
//! answer before moving, so no in-progress edit is lost and at most one
//! timer runs at a time.

use serde::{Deserialize, Serialize};

use crate::answer::{format_answer, is_answered, AnswerInput, AnswerValue};
use crate::error::QuizError;
use crate::grading::grade;
use crate::model::{Question, QuestionKind, QuestionSet};
use crate::timer::QuestionTimers;

/// Live answer/review counts for the status header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub answered: usize,
    pub unattempted: usize,
    pub to_review: usize,
    pub total: usize,
}

/// Visual class of a navigation control. Review marking wins over answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavClass {
    Marked,
    Answered,
    Unanswered,
}

/// State of the navigation control for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavState {
    pub index: usize,
    pub answered: bool,
    pub marked: bool,
    pub current: bool,
}

impl NavState {
    pub fn class(&self) -> NavClass {
        if self.marked {
            NavClass::Marked
        } else if self.answered {
            NavClass::Answered
        } else {
            NavClass::Unanswered
        }
    }
}

/// One row of the results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    /// 1-based position in the quiz.
    pub number: usize,
    pub question_id: String,
    pub question_text: String,
    pub kind: QuestionKind,
    #[serde(default)]
    pub category: Option<String>,
    /// Whether an answer was captured.
    #[serde(default)]
    pub answered: bool,
    /// The captured answer, formatted for display.
    pub user_answer: String,
    pub is_correct: bool,
    /// The expected answer; `None` when the user got it right.
    #[serde(default)]
    pub correct_answer: Option<String>,
    pub elapsed_secs: u64,
}

/// Graded outcome of a submitted session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub score: usize,
    pub total_questions: usize,
    pub total_time_secs: u64,
    pub results: Vec<QuestionResult>,
}

impl QuizSummary {
    /// Score as a percentage of all questions.
    pub fn percentage(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.score as f64 * 100.0 / self.total_questions as f64
    }
}

/// Mutable state of one quiz attempt.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    timers: QuestionTimers,
    inputs: Vec<AnswerInput>,
    answers: Vec<Option<AnswerValue>>,
    marked: Vec<bool>,
    graded: Vec<bool>,
    summary: Option<QuizSummary>,
}

impl QuizSession {
    /// Start a session on the first question with its timer running.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptyQuiz);
        }
        for question in &questions {
            question.check()?;
        }

        let len = questions.len();
        let inputs = questions
            .iter()
            .map(|q| AnswerInput::blank_for(q.kind))
            .collect();

        let mut session = Self {
            questions,
            current: 0,
            timers: QuestionTimers::new(len),
            inputs,
            answers: vec![None; len],
            marked: vec![false; len],
            graded: vec![false; len],
            summary: None,
        };
        session.start_timer(0);
        tracing::debug!(questions = len, "quiz session started");
        Ok(session)
    }

    /// Start a session over a question set's questions.
    pub fn from_set(set: &QuestionSet) -> Result<Self, QuizError> {
        Self::new(set.questions.clone())
    }

    // -----------------------------------------------------------------------
    // Observable state
    // -----------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, idx: usize) -> Option<&Question> {
        self.questions.get(idx)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    /// Raw input fields for `idx`.
    pub fn input(&self, idx: usize) -> Option<&AnswerInput> {
        self.inputs.get(idx)
    }

    /// Captured answer for `idx`; `None` when unanswered.
    pub fn answer(&self, idx: usize) -> Option<&AnswerValue> {
        self.answers.get(idx).and_then(Option::as_ref)
    }

    pub fn is_answered(&self, idx: usize) -> bool {
        is_answered(self.answer(idx))
    }

    pub fn is_marked(&self, idx: usize) -> bool {
        self.marked.get(idx).copied().unwrap_or(false)
    }

    /// Elapsed seconds on `idx`.
    pub fn elapsed(&self, idx: usize) -> u64 {
        self.timers.elapsed(idx)
    }

    /// Sum of elapsed seconds over all questions.
    pub fn total_time(&self) -> u64 {
        self.timers.total()
    }

    /// The question whose timer is running, if any.
    pub fn running_timer(&self) -> Option<usize> {
        self.timers.running().next()
    }

    /// Number of running timers; never more than one.
    pub fn active_timers(&self) -> usize {
        self.timers.running().count()
    }

    pub fn is_submitted(&self) -> bool {
        self.summary.is_some()
    }

    pub fn summary(&self) -> Option<&QuizSummary> {
        self.summary.as_ref()
    }

    /// Per-question correctness; only meaningful once submitted.
    pub fn graded(&self) -> Option<&[bool]> {
        self.summary.as_ref().map(|_| self.graded.as_slice())
    }

    pub fn status(&self) -> StatusCounts {
        let total = self.len();
        let answered = (0..total).filter(|&i| self.is_answered(i)).count();
        StatusCounts {
            answered,
            unattempted: total - answered,
            to_review: self.marked.iter().filter(|m| **m).count(),
            total,
        }
    }

    pub fn nav_states(&self) -> Vec<NavState> {
        (0..self.len())
            .map(|index| NavState {
                index,
                answered: self.is_answered(index),
                marked: self.is_marked(index),
                current: index == self.current,
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Move to question `idx`. Returns `false` without changing anything
    /// when `idx` is out of range or the session was submitted.
    pub fn go_to(&mut self, idx: usize) -> bool {
        if self.is_submitted() {
            tracing::warn!(idx, "navigation after submission ignored");
            return false;
        }
        if idx >= self.len() {
            tracing::warn!(idx, len = self.len(), "navigation index out of range ignored");
            return false;
        }

        let from = self.current;
        self.stop_timer(from);
        self.capture_current();
        self.current = idx;
        self.start_timer(idx);
        tracing::debug!(from, to = idx, "navigated");
        true
    }

    /// Move to the next question; does nothing on the last one.
    pub fn next(&mut self) -> bool {
        if self.current + 1 >= self.len() {
            return false;
        }
        self.go_to(self.current + 1)
    }

    /// Move to the previous question; does nothing on the first one.
    pub fn prev(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.go_to(self.current - 1)
    }

    // -----------------------------------------------------------------------
    // Answers and review marks
    // -----------------------------------------------------------------------

    /// Replace the raw input of the current question and capture it.
    ///
    /// Input of the wrong shape for the question kind is ignored.
    pub fn edit_input(&mut self, input: AnswerInput) -> bool {
        if self.is_submitted() {
            tracing::warn!("edit after submission ignored");
            return false;
        }
        let kind = self.current_question().kind;
        if !input.fits(kind) {
            tracing::warn!(%kind, idx = self.current, "input shape does not fit question");
            return false;
        }
        self.inputs[self.current] = input;
        self.on_answer_edited();
        true
    }

    /// Re-capture the current answer after its input changed.
    pub fn on_answer_edited(&mut self) {
        if self.is_submitted() {
            return;
        }
        self.capture_current();
    }

    /// Flip the review mark of the current question, keeping its edit.
    pub fn toggle_review(&mut self) {
        if self.is_submitted() {
            tracing::warn!("review toggle after submission ignored");
            return;
        }
        let idx = self.current;
        self.marked[idx] = !self.marked[idx];
        self.capture_current();
        tracing::debug!(idx, marked = self.marked[idx], "review mark toggled");
    }

    fn capture_current(&mut self) {
        let idx = self.current;
        self.answers[idx] = self.inputs[idx].capture();
    }

    // -----------------------------------------------------------------------
    // Timers
    // -----------------------------------------------------------------------

    /// Start the timer for `idx`, stopping any other running timer first.
    pub fn start_timer(&mut self, idx: usize) {
        if self.is_submitted() || idx >= self.len() {
            return;
        }
        let others: Vec<usize> = self.timers.running().filter(|&i| i != idx).collect();
        for other in others {
            tracing::debug!(other, idx, "stopping stray timer");
            self.timers.stop(other);
        }
        self.timers.start(idx);
    }

    pub fn stop_timer(&mut self, idx: usize) {
        self.timers.stop(idx);
    }

    /// One second passed. Returns the question that was credited, if any.
    pub fn tick(&mut self) -> Option<usize> {
        let running = self.running_timer()?;
        self.timers.tick();
        Some(running)
    }

    // -----------------------------------------------------------------------
    // Grading and submission
    // -----------------------------------------------------------------------

    /// Grade the captured answer for `idx`.
    pub fn grade(&self, idx: usize) -> bool {
        match self.questions.get(idx) {
            Some(question) => grade(question, self.answer(idx)),
            None => false,
        }
    }

    /// Finish the quiz and grade every answer.
    ///
    /// The first call stops the timer, captures the final edit and grades;
    /// later calls return the same summary.
    pub fn submit(&mut self) -> &QuizSummary {
        let summary = match self.summary.take() {
            Some(summary) => summary,
            None => {
                self.timers.stop_all();
                self.capture_current();
                self.graded = (0..self.len()).map(|i| self.grade(i)).collect();
                let summary = self.build_summary();
                tracing::info!(
                    score = summary.score,
                    total = summary.total_questions,
                    total_time_secs = summary.total_time_secs,
                    "quiz submitted"
                );
                summary
            }
        };
        self.summary.insert(summary)
    }

    fn build_summary(&self) -> QuizSummary {
        let results = self
            .questions
            .iter()
            .enumerate()
            .map(|(i, question)| {
                let is_correct = self.graded[i];
                QuestionResult {
                    number: i + 1,
                    question_id: question.id.clone(),
                    question_text: question.question_text.clone(),
                    kind: question.kind,
                    category: question.category.clone(),
                    answered: self.is_answered(i),
                    user_answer: format_answer(self.answer(i)),
                    is_correct,
                    correct_answer: (!is_correct).then(|| question.correct_answer.to_string()),
                    elapsed_secs: self.elapsed(i),
                }
            })
            .collect();

        QuizSummary {
            score: self.graded.iter().filter(|g| **g).count(),
            total_questions: self.len(),
            total_time_secs: self.total_time(),
            results,
        }
    }
}
