//! Results payload for a finished contrast-threshold session
//!
//! JSON (serde_json) for the results page, postcard for compact storage, and a
//! flat key/value encoding for form-style data collection.

use postcard::{from_bytes, to_allocvec};
use quest_core::TrialSession;
use serde::{Deserialize, Serialize};

// ============================================================================
// Payload
// ============================================================================

/// Per-trial row: what was shown and whether it was caught
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialData {
    pub trial: u32,
    pub contrast: f64, // linear, 0..=1
    pub response: u8,  // 1 = hit, 0 = miss
}

/// Session results handed to the reporting side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// 10^(posterior mean), linear contrast
    #[serde(rename = "finalThreshold")]
    pub final_threshold: f64,

    /// Posterior standard deviation, log10 units
    #[serde(rename = "thresholdSD")]
    pub threshold_sd: f64,

    #[serde(rename = "totalTrials")]
    pub total_trials: u32,

    /// Percent of trials answered with a hit
    #[serde(rename = "hitRate")]
    pub hit_rate: f64,

    #[serde(rename = "trialData")]
    pub trial_data: Vec<TrialData>,
}

impl SessionReport {
    /// Build the report from a completed session (None while trials remain)
    pub fn from_session(session: &TrialSession) -> Option<Self> {
        let summary = session.summary()?;
        let trial_data = session
            .history()
            .iter()
            .map(|entry| TrialData {
                trial: entry.trial,
                contrast: entry.contrast,
                response: entry.outcome.response(),
            })
            .collect();

        Some(Self {
            final_threshold: summary.threshold,
            threshold_sd: summary.threshold_sd,
            total_trials: summary.total_trials,
            hit_rate: summary.hit_rate,
            trial_data,
        })
    }

    /// Form fields in submission order: threshold and SD to 5 decimals,
    /// hit rate to 1 decimal with a percent sign, trial rows as JSON
    pub fn form_fields(&self, ids: &FormFieldIds) -> Result<Vec<(String, String)>, serde_json::Error> {
        Ok(vec![
            (
                ids.final_threshold.clone(),
                format!("{:.5}", self.final_threshold),
            ),
            (ids.threshold_sd.clone(), format!("{:.5}", self.threshold_sd)),
            (ids.total_trials.clone(), self.total_trials.to_string()),
            (ids.hit_rate.clone(), format!("{:.1}%", self.hit_rate)),
            (
                ids.trial_data.clone(),
                serde_json::to_string(&self.trial_data)?,
            ),
        ])
    }
}

/// Form entry keys for each report field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFieldIds {
    pub final_threshold: String,
    #[serde(rename = "thresholdSD")]
    pub threshold_sd: String,
    pub total_trials: String,
    pub hit_rate: String,
    pub trial_data: String,
}

// ============================================================================
// Serialization Helpers
// ============================================================================

impl SessionReport {
    /// Serialize report to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize report from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize report to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        to_allocvec(self)
    }

    /// Deserialize report from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        from_bytes(bytes)
    }
}
