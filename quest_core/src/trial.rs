use serde::{Deserialize, Serialize};

/// Binary response to a single trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialOutcome {
    Miss, // ball crossed the bottom edge
    Hit,  // ball met the paddle
}

impl TrialOutcome {
    /// Decode the 0/1 response code used by the browser glue
    pub fn from_response(response: u8) -> Option<Self> {
        match response {
            0 => Some(TrialOutcome::Miss),
            1 => Some(TrialOutcome::Hit),
            _ => None,
        }
    }

    pub fn response(self) -> u8 {
        match self {
            TrialOutcome::Miss => 0,
            TrialOutcome::Hit => 1,
        }
    }

    pub fn is_hit(self) -> bool {
        self == TrialOutcome::Hit
    }
}

impl From<bool> for TrialOutcome {
    fn from(hit: bool) -> Self {
        if hit {
            TrialOutcome::Hit
        } else {
            TrialOutcome::Miss
        }
    }
}

/// One observation fed to the estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub intensity: f64, // log10 units
    pub outcome: TrialOutcome,
}

/// Stimulus to present on the next trial
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stimulus {
    pub log_intensity: f64,
    pub contrast: f64, // clamp(10^log_intensity, 0, 1)
}

impl Stimulus {
    pub fn from_log_intensity(log_intensity: f64) -> Self {
        Self {
            log_intensity,
            contrast: 10f64.powf(log_intensity).clamp(0.0, 1.0),
        }
    }
}

/// One completed trial as kept in the session history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialEntry {
    pub trial: u32, // 1-based
    pub log_intensity: f64,
    pub contrast: f64,
    pub outcome: TrialOutcome,
}
