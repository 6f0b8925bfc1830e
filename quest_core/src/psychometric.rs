use crate::{QuestConfig, TrialOutcome};

/// Weibull psychometric function in log-intensity space
///
/// `p_hit = delta*gamma + (1-delta) * (gamma + (1-gamma) * (1 - exp(-10^(beta*(x-t)))))`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weibull {
    pub beta: f64,
    pub delta: f64,
    pub gamma: f64,
}

impl Weibull {
    pub fn new(beta: f64, delta: f64, gamma: f64) -> Self {
        Self { beta, delta, gamma }
    }

    pub fn from_config(config: &QuestConfig) -> Self {
        Self::new(config.beta, config.delta, config.gamma)
    }

    /// Probability of a hit when presenting `intensity` to an observer whose
    /// threshold is `threshold`
    pub fn p_hit(&self, intensity: f64, threshold: f64) -> f64 {
        let z = 10f64.powf(self.beta * (intensity - threshold));
        let detect = self.gamma + (1.0 - self.gamma) * (1.0 - (-z).exp());
        self.delta * self.gamma + (1.0 - self.delta) * detect
    }

    /// Probability of the observed outcome, clamped to [0, 1]
    pub fn likelihood(&self, intensity: f64, threshold: f64, outcome: TrialOutcome) -> f64 {
        let p = self.p_hit(intensity, threshold);
        let l = match outcome {
            TrialOutcome::Hit => p,
            TrialOutcome::Miss => 1.0 - p,
        };
        l.clamp(0.0, 1.0)
    }
}
