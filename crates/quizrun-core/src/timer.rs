//! Per-question elapsed-time counters.
//!
//! Each question owns a timer that can be started and stopped. A running
//! timer gains one second per [`QuestionTimers::tick`]; the schedule that
//! calls `tick` lives outside this module.

/// Elapsed seconds and running state for every question of a quiz.
#[derive(Debug, Clone)]
pub struct QuestionTimers {
    elapsed: Vec<u64>,
    running: Vec<bool>,
}

impl QuestionTimers {
    /// Stopped timers at zero for `len` questions.
    pub fn new(len: usize) -> Self {
        Self {
            elapsed: vec![0; len],
            running: vec![false; len],
        }
    }

    /// Start the timer for `idx`. Starting a running timer does nothing.
    ///
    /// Returns `true` if the timer was stopped before the call.
    pub fn start(&mut self, idx: usize) -> bool {
        match self.running.get_mut(idx) {
            Some(running) if !*running => {
                *running = true;
                true
            }
            _ => false,
        }
    }

    /// Stop the timer for `idx`. Stopping a stopped timer does nothing.
    ///
    /// Returns `true` if the timer was running before the call.
    pub fn stop(&mut self, idx: usize) -> bool {
        match self.running.get_mut(idx) {
            Some(running) if *running => {
                *running = false;
                true
            }
            _ => false,
        }
    }

    /// Stop every running timer.
    pub fn stop_all(&mut self) {
        self.running.iter_mut().for_each(|r| *r = false);
    }

    /// Advance every running timer by one second; returns how many advanced.
    pub fn tick(&mut self) -> usize {
        let mut advanced = 0;
        for (elapsed, _) in self
            .elapsed
            .iter_mut()
            .zip(&self.running)
            .filter(|(_, running)| **running)
        {
            *elapsed += 1;
            advanced += 1;
        }
        advanced
    }

    pub fn is_running(&self, idx: usize) -> bool {
        self.running.get(idx).copied().unwrap_or(false)
    }

    /// Indices of running timers, in question order.
    pub fn running(&self) -> impl Iterator<Item = usize> + '_ {
        self.running
            .iter()
            .enumerate()
            .filter(|(_, running)| **running)
            .map(|(idx, _)| idx)
    }

    /// Elapsed seconds for `idx`, zero for unknown questions.
    pub fn elapsed(&self, idx: usize) -> u64 {
        self.elapsed.get(idx).copied().unwrap_or(0)
    }

    pub fn all_elapsed(&self) -> &[u64] {
        &self.elapsed
    }

    pub fn total(&self) -> u64 {
        self.elapsed.iter().sum()
    }
}
