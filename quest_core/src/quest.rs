//! QUEST adaptive staircase
//!
//! Keeps a posterior over the observer's threshold (log10 intensity units),
//! recommends the next stimulus from it and folds each binary response back
//! in by Bayes' rule against a Weibull psychometric function.

use crate::{
    Params, Posterior, QuestConfig, QuestError, QuestResult, TrialOutcome, TrialRecord,
    UnderflowPolicy, Weibull,
};
use tracing::{debug, warn};

/// Lifecycle of an estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorState {
    /// Created, no response folded in yet
    Initialized,
    /// At least one update applied
    Updated,
}

/// How an update was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosteriorUpdate {
    /// Plain Bayes update
    Exact,
    /// Normalization vanished; likelihoods were floored first
    Floored,
}

/// QUEST estimator for a single session
#[derive(Debug, Clone)]
pub struct Quest {
    config: QuestConfig,
    weibull: Weibull,
    posterior: Posterior,
    trials: Vec<TrialRecord>,
}

impl Quest {
    /// Validate `config` and build the Gaussian prior
    pub fn new(config: QuestConfig) -> QuestResult<Self> {
        config.validate()?;

        let posterior = Posterior::gaussian(
            config.guess_mean,
            config.guess_sd,
            config.grain,
            config.support_len(),
        );
        let weibull = Weibull::from_config(&config);

        Ok(Self {
            config,
            weibull,
            posterior,
            trials: Vec::new(),
        })
    }

    pub fn config(&self) -> &QuestConfig {
        &self.config
    }

    pub fn psychometric(&self) -> &Weibull {
        &self.weibull
    }

    pub fn posterior(&self) -> &Posterior {
        &self.posterior
    }

    pub fn trials(&self) -> &[TrialRecord] {
        &self.trials
    }

    pub fn trial_count(&self) -> usize {
        self.trials.len()
    }

    pub fn state(&self) -> EstimatorState {
        if self.trials.is_empty() {
            EstimatorState::Initialized
        } else {
            EstimatorState::Updated
        }
    }

    /// Median of the posterior: the log intensity to present next
    pub fn recommend_intensity(&self) -> f64 {
        self.posterior.quantile(Params::QUANTILE_ORDER)
    }

    /// Posterior quantile of any order in [0, 1]
    pub fn quantile(&self, order: f64) -> QuestResult<f64> {
        if !(0.0..=1.0).contains(&order) {
            return Err(QuestError::InvalidParameter(format!(
                "quantile order must lie in [0, 1], got {order}"
            )));
        }
        Ok(self.posterior.quantile(order))
    }

    /// Most probable threshold on the grid
    pub fn mode(&self) -> f64 {
        self.posterior.mode()
    }

    /// Posterior mean threshold (log10 units)
    pub fn mean(&self) -> f64 {
        self.posterior.mean()
    }

    /// Posterior standard deviation (log10 units)
    pub fn standard_deviation(&self) -> f64 {
        self.posterior.standard_deviation()
    }

    /// Fold the response to a stimulus shown at `intensity` into the posterior
    pub fn update(&mut self, intensity: f64, outcome: TrialOutcome) -> QuestResult<PosteriorUpdate> {
        if intensity.is_nan() {
            return Err(QuestError::InvalidParameter(
                "presented intensity must not be NaN".to_string(),
            ));
        }
        let x = intensity.clamp(-Params::INTENSITY_LIMIT, Params::INTENSITY_LIMIT);
        let weibull = self.weibull;

        let applied = if self
            .posterior
            .reweight(|t| weibull.likelihood(x, t, outcome))
            .is_some()
        {
            PosteriorUpdate::Exact
        } else {
            match self.config.underflow_policy {
                UnderflowPolicy::Reject => {
                    warn!(
                        intensity,
                        ?outcome,
                        trials = self.trials.len(),
                        "posterior degenerated, update rejected"
                    );
                    return Err(QuestError::DegeneratePosterior {
                        trials: self.trials.len(),
                    });
                }
                UnderflowPolicy::Floor => {
                    warn!(
                        intensity,
                        ?outcome,
                        floor = Params::LIKELIHOOD_FLOOR,
                        "posterior degenerated, flooring likelihood"
                    );
                    self.posterior
                        .reweight(|t| weibull.likelihood(x, t, outcome).max(Params::LIKELIHOOD_FLOOR))
                        .ok_or(QuestError::DegeneratePosterior {
                            trials: self.trials.len(),
                        })?;
                    PosteriorUpdate::Floored
                }
            }
        };

        self.trials.push(TrialRecord { intensity, outcome });
        debug!(
            trial = self.trials.len(),
            intensity,
            ?outcome,
            mean = self.mean(),
            sd = self.standard_deviation(),
            "quest update"
        );
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_quest() -> Quest {
        Quest::new(QuestConfig::default()).expect("default config is valid")
    }

    #[test]
    fn test_initial_recommendation_near_guess() {
        let quest = default_quest();
        assert_eq!(quest.state(), EstimatorState::Initialized);
        let x = quest.recommend_intensity();
        assert!((x + 1.0).abs() <= quest.config().grain, "x={x}");
    }

    #[test]
    fn test_support_cardinality() {
        let quest = default_quest();
        assert_eq!(quest.posterior().len(), 801);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = QuestConfig {
            guess_sd: 0.0,
            ..QuestConfig::default()
        };
        assert!(matches!(
            Quest::new(bad),
            Err(QuestError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_hit_lowers_and_miss_raises_estimate() {
        let mut hit = default_quest();
        hit.update(-1.0, TrialOutcome::Hit).unwrap();
        assert!(hit.mean() < -1.0, "a hit means the threshold is lower");
        assert_eq!(hit.state(), EstimatorState::Updated);

        let mut miss = default_quest();
        miss.update(-1.0, TrialOutcome::Miss).unwrap();
        assert!(miss.mean() > -1.0, "a miss means the threshold is higher");
    }

    #[test]
    fn test_update_keeps_normalization() {
        let mut quest = default_quest();
        for (i, outcome) in [TrialOutcome::Hit, TrialOutcome::Miss, TrialOutcome::Hit]
            .into_iter()
            .enumerate()
        {
            let x = quest.recommend_intensity();
            assert_eq!(quest.update(x, outcome).unwrap(), PosteriorUpdate::Exact);
            assert!((quest.posterior().total() - 1.0).abs() < 1e-9, "trial {i}");
        }
        assert_eq!(quest.trial_count(), 3);
        assert_eq!(quest.trials()[1].outcome, TrialOutcome::Miss);
    }

    #[test]
    fn test_read_only_ops_are_idempotent() {
        let mut quest = default_quest();
        quest.update(-1.2, TrialOutcome::Hit).unwrap();
        let first = (quest.recommend_intensity(), quest.mean(), quest.standard_deviation());
        for _ in 0..3 {
            let again = (quest.recommend_intensity(), quest.mean(), quest.standard_deviation());
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_nan_intensity_rejected_without_side_effects() {
        let mut quest = default_quest();
        let before = quest.posterior().clone();
        assert!(matches!(
            quest.update(f64::NAN, TrialOutcome::Hit),
            Err(QuestError::InvalidParameter(_))
        ));
        assert_eq!(quest.posterior(), &before);
        assert_eq!(quest.state(), EstimatorState::Initialized);
    }

    #[test]
    fn test_infinite_intensity_is_clamped() {
        let mut quest = default_quest();
        assert!(quest.update(f64::INFINITY, TrialOutcome::Miss).is_ok());
        assert!(quest.update(f64::NEG_INFINITY, TrialOutcome::Hit).is_ok());
        assert!((quest.posterior().total() - 1.0).abs() < 1e-9);
    }

    fn lapse_free_config(policy: UnderflowPolicy) -> QuestConfig {
        QuestConfig {
            gamma: 0.0,
            delta: 0.0,
            underflow_policy: policy,
            ..QuestConfig::default()
        }
    }

    #[test]
    fn test_impossible_hit_is_floored() {
        let mut quest = Quest::new(lapse_free_config(UnderflowPolicy::Floor)).unwrap();
        let before_mean = quest.mean();
        // No guessing and no lapses: a hit at vanishing intensity has zero likelihood
        let applied = quest.update(-1e12, TrialOutcome::Hit).unwrap();
        assert_eq!(applied, PosteriorUpdate::Floored);
        assert!((quest.posterior().total() - 1.0).abs() < 1e-9);
        assert!((quest.mean() - before_mean).abs() < 1e-9);
        assert_eq!(quest.trial_count(), 1);
    }

    #[test]
    fn test_impossible_hit_is_rejected() {
        let mut quest = Quest::new(lapse_free_config(UnderflowPolicy::Reject)).unwrap();
        let before = quest.posterior().clone();
        let err = quest.update(-1e12, TrialOutcome::Hit).unwrap_err();
        assert_eq!(err, QuestError::DegeneratePosterior { trials: 0 });
        assert_eq!(quest.posterior(), &before);
        assert_eq!(quest.state(), EstimatorState::Initialized);
    }

    #[test]
    fn test_quantile_order_checked() {
        let quest = default_quest();
        assert!(quest.quantile(-0.1).is_err());
        assert!(quest.quantile(1.1).is_err());
        let lo = quest.quantile(0.25).unwrap();
        let hi = quest.quantile(0.75).unwrap();
        assert!(lo < quest.recommend_intensity() && quest.recommend_intensity() < hi);
    }

    #[test]
    fn test_mode_matches_guess_before_updates() {
        let quest = default_quest();
        assert!((quest.mode() + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tight_prior_off_grid_updates() {
        // 802 points: the guess falls between the two middle grid points
        let config = QuestConfig {
            guess_sd: 1e-4,
            range: 4.005,
            ..QuestConfig::default()
        };
        let mut quest = Quest::new(config).unwrap();
        assert_eq!(quest.posterior().len(), 802);
        assert!((quest.posterior().total() - 1.0).abs() < 1e-12);
        assert!((quest.mean() + 1.0).abs() < 1e-9);
        assert!(quest.standard_deviation().is_finite());

        let applied = quest.update(-1.0, TrialOutcome::Hit).unwrap();
        assert_eq!(applied, PosteriorUpdate::Exact);
        assert!((quest.posterior().total() - 1.0).abs() < 1e-9);
        assert!(quest.mean().is_finite());
    }

    #[test]
    fn test_target_performance_leaves_likelihood_alone() {
        let mut low = Quest::new(QuestConfig {
            target_performance: 0.6,
            ..QuestConfig::default()
        })
        .unwrap();
        let mut high = Quest::new(QuestConfig {
            target_performance: 0.95,
            ..QuestConfig::default()
        })
        .unwrap();
        for (x, hit) in [(-1.2, true), (-1.6, false), (-0.9, true)] {
            low.update(x, TrialOutcome::from(hit)).unwrap();
            high.update(x, TrialOutcome::from(hit)).unwrap();
        }
        assert_eq!(low.posterior().masses(), high.posterior().masses());
        assert_eq!(low.recommend_intensity(), high.recommend_intensity());
    }
}
