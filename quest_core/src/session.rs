//! Trial loop for one contrast-threshold session
//!
//! The game glue asks for a stimulus, shows it, and reports the outcome. The
//! session feeds the estimator, keeps the per-trial history and stops after
//! the trial budget.

use crate::{Quest, SessionConfig, SessionError, Stimulus, TrialEntry, TrialOutcome};
use tracing::info;

/// Where the session is in the trial cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Ready to hand out the next stimulus
    Presenting,
    /// Stimulus on screen, waiting for hit or miss
    AwaitingResponse,
    /// Trial budget used up
    Complete,
}

/// Events that move the session between phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    StimulusShown,
    ResponseRecorded { budget_left: bool },
}

impl SessionPhase {
    /// Next phase for a given event (if valid)
    pub fn next(self, event: SessionEvent) -> Option<SessionPhase> {
        match (self, event) {
            (SessionPhase::Presenting, SessionEvent::StimulusShown) => {
                Some(SessionPhase::AwaitingResponse)
            }
            (SessionPhase::AwaitingResponse, SessionEvent::StimulusShown) => {
                Some(SessionPhase::AwaitingResponse)
            }
            (SessionPhase::AwaitingResponse, SessionEvent::ResponseRecorded { budget_left }) => {
                if budget_left {
                    Some(SessionPhase::Presenting)
                } else {
                    Some(SessionPhase::Complete)
                }
            }
            _ => None,
        }
    }
}

/// End-of-session numbers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    pub threshold_log: f64,
    pub threshold: f64, // 10^threshold_log
    pub threshold_sd: f64,
    pub total_trials: u32,
    pub hits: u32,
    pub hit_rate: f64, // percent
}

/// One session: estimator, pending stimulus and trial history
#[derive(Debug, Clone)]
pub struct TrialSession {
    config: SessionConfig,
    quest: Quest,
    phase: SessionPhase,
    pending: Option<Stimulus>,
    history: Vec<TrialEntry>,
}

impl TrialSession {
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let quest = Quest::new(config.quest.clone())?;
        Ok(Self {
            config,
            quest,
            phase: SessionPhase::Presenting,
            pending: None,
            history: Vec::new(),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn quest(&self) -> &Quest {
        &self.quest
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn history(&self) -> &[TrialEntry] {
        &self.history
    }

    pub fn trial_count(&self) -> u32 {
        self.history.len() as u32
    }

    pub fn max_trials(&self) -> u32 {
        self.config.max_trials
    }

    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Complete
    }

    pub fn pending(&self) -> Option<Stimulus> {
        self.pending
    }

    /// Stimulus for the current trial.
    ///
    /// Repeated calls before a response return the same stimulus.
    pub fn next_stimulus(&mut self) -> Result<Stimulus, SessionError> {
        let next = self
            .phase
            .next(SessionEvent::StimulusShown)
            .ok_or(SessionError::Finished(self.trial_count()))?;

        let stimulus = match self.pending {
            Some(stimulus) => stimulus,
            None => {
                let x = self.quest.quantile(self.config.quantile_order)?;
                Stimulus::from_log_intensity(x)
            }
        };
        self.pending = Some(stimulus);
        self.phase = next;
        Ok(stimulus)
    }

    /// Record the response to the pending stimulus
    pub fn record(&mut self, outcome: TrialOutcome) -> Result<TrialEntry, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Finished(self.trial_count()));
        }
        let stimulus = self.pending.ok_or(SessionError::NoPendingStimulus)?;

        self.quest.update(stimulus.log_intensity, outcome)?;

        let entry = TrialEntry {
            trial: self.trial_count() + 1,
            log_intensity: stimulus.log_intensity,
            contrast: stimulus.contrast,
            outcome,
        };
        self.history.push(entry);
        self.pending = None;

        let budget_left = self.trial_count() < self.config.max_trials;
        self.phase = self
            .phase
            .next(SessionEvent::ResponseRecorded { budget_left })
            .ok_or(SessionError::NoPendingStimulus)?;

        if self.is_complete() {
            let summary = self.summary_now();
            info!(
                trials = summary.total_trials,
                threshold = summary.threshold,
                sd = summary.threshold_sd,
                hit_rate = summary.hit_rate,
                "session complete"
            );
        }
        Ok(entry)
    }

    /// Summary once the trial budget is used up
    pub fn summary(&self) -> Option<SessionSummary> {
        self.is_complete().then(|| self.summary_now())
    }

    /// Summary of whatever has been collected so far
    pub fn summary_now(&self) -> SessionSummary {
        let total_trials = self.trial_count();
        let hits = self.history.iter().filter(|e| e.outcome.is_hit()).count() as u32;
        let hit_rate = if total_trials == 0 {
            0.0
        } else {
            hits as f64 / total_trials as f64 * 100.0
        };
        let threshold_log = self.quest.mean();

        SessionSummary {
            threshold_log,
            threshold: 10f64.powf(threshold_log),
            threshold_sd: self.quest.standard_deviation(),
            total_trials,
            hits,
            hit_rate,
        }
    }
}
