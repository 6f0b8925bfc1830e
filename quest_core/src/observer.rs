use crate::{SessionRng, TrialOutcome, Weibull};

/// Stand-in for a player whose true threshold is known.
///
/// Responds `Hit` with the probability the psychometric function assigns to
/// the presented intensity, so a whole session can be run without a browser.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedObserver {
    pub threshold: f64, // log10 units
    pub weibull: Weibull,
}

impl SimulatedObserver {
    pub fn new(threshold: f64, weibull: Weibull) -> Self {
        Self { threshold, weibull }
    }

    pub fn respond(&self, intensity: f64, rng: &mut SessionRng) -> TrialOutcome {
        let p = self.weibull.p_hit(intensity, self.threshold);
        TrialOutcome::from(rng.chance(p))
    }
}
