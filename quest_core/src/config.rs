use crate::{Params, QuestError, QuestResult};
use serde::{Deserialize, Serialize};

/// What `Quest::update` does when the posterior normalization vanishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnderflowPolicy {
    /// Floor every likelihood and renormalize; the update still succeeds
    #[default]
    Floor,
    /// Keep the previous posterior and return `QuestError::DegeneratePosterior`
    Reject,
}

/// Estimator configuration (fixed for a session)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestConfig {
    #[serde(alias = "tGuess")]
    pub guess_mean: f64,
    #[serde(alias = "tGuessSd")]
    pub guess_sd: f64,
    /// Hit rate the threshold is meant to correspond to. Validated
    /// (`gamma < p < 1`) and carried for reporting, but the likelihood has no
    /// threshold-criterion shift, so it does not move the posterior.
    #[serde(alias = "pThreshold")]
    pub target_performance: f64,
    pub beta: f64,
    pub delta: f64,
    pub gamma: f64,
    pub grain: f64,
    pub range: f64,
    pub underflow_policy: UnderflowPolicy,
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            guess_mean: Params::GUESS_MEAN,
            guess_sd: Params::GUESS_SD,
            target_performance: Params::TARGET_PERFORMANCE,
            beta: Params::BETA,
            delta: Params::DELTA,
            gamma: Params::GAMMA,
            grain: Params::GRAIN,
            range: Params::RANGE,
            underflow_policy: UnderflowPolicy::Floor,
        }
    }
}

impl QuestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every range constraint; the first violation wins
    pub fn validate(&self) -> QuestResult<()> {
        let fields = [
            ("guess_mean", self.guess_mean),
            ("guess_sd", self.guess_sd),
            ("target_performance", self.target_performance),
            ("beta", self.beta),
            ("delta", self.delta),
            ("gamma", self.gamma),
            ("grain", self.grain),
            ("range", self.range),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{name} must be finite, got {value}")));
        }

        if self.guess_sd <= 0.0 {
            return Err(invalid(format!("guess_sd must be > 0, got {}", self.guess_sd)));
        }
        if self.grain <= 0.0 {
            return Err(invalid(format!("grain must be > 0, got {}", self.grain)));
        }
        if self.range <= self.grain {
            return Err(invalid(format!(
                "range ({}) must exceed grain ({})",
                self.range, self.grain
            )));
        }
        if self.beta <= 0.0 {
            return Err(invalid(format!("beta must be > 0, got {}", self.beta)));
        }
        if !(0.0..1.0).contains(&self.delta) {
            return Err(invalid(format!("delta must lie in [0, 1), got {}", self.delta)));
        }
        if !(0.0..1.0).contains(&self.gamma) {
            return Err(invalid(format!("gamma must lie in [0, 1), got {}", self.gamma)));
        }
        if self.target_performance <= self.gamma || self.target_performance >= 1.0 {
            return Err(invalid(format!(
                "target_performance must lie in (gamma={}, 1), got {}",
                self.gamma, self.target_performance
            )));
        }

        let len = self.support_len_f64();
        if len > Params::MAX_SUPPORT_LEN as f64 {
            return Err(invalid(format!(
                "support of {len} points exceeds {}",
                Params::MAX_SUPPORT_LEN
            )));
        }
        Ok(())
    }

    /// Number of grid points: round(2 * range / grain) + 1
    pub fn support_len(&self) -> usize {
        self.support_len_f64() as usize
    }

    fn support_len_f64(&self) -> f64 {
        (2.0 * self.range / self.grain).round() + 1.0
    }
}

/// Trial-loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    pub quest: QuestConfig,
    pub max_trials: u32,
    pub quantile_order: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            quest: QuestConfig::default(),
            max_trials: Params::MAX_TRIALS,
            quantile_order: Params::QUANTILE_ORDER,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> QuestResult<()> {
        self.quest.validate()?;
        if self.max_trials == 0 {
            return Err(invalid("max_trials must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.quantile_order) {
            return Err(invalid(format!(
                "quantile_order must lie in [0, 1], got {}",
                self.quantile_order
            )));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> QuestError {
    QuestError::InvalidParameter(msg)
}
