//! Discretized probability mass over candidate thresholds

/// Probability mass function on a fixed, strictly increasing grid
#[derive(Debug, Clone, PartialEq)]
pub struct Posterior {
    support: Vec<f64>, // candidate thresholds, log10 units
    mass: Vec<f64>,    // sums to 1
}

impl Posterior {
    /// Gaussian prior sampled on `len` points spaced `grain` apart and
    /// centered on `center`.
    ///
    /// Densities are taken relative to the densest grid point, so the peak
    /// has weight 1 and the total never underflows, however narrow `sd` is.
    pub fn gaussian(center: f64, sd: f64, grain: f64, len: usize) -> Self {
        let half = (len - 1) as f64 / 2.0;
        let mut support = Vec::with_capacity(len);
        let mut log_density = Vec::with_capacity(len);
        for i in 0..len {
            let offset = (i as f64 - half) * grain;
            let z = offset / sd;
            support.push(center + offset);
            log_density.push(-0.5 * (z * z));
        }

        let peak = log_density
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let density: Vec<f64> = log_density.iter().map(|l| (l - peak).exp()).collect();

        let total: f64 = density.iter().sum();
        let mass = density.iter().map(|d| d / total).collect();
        Self { support, mass }
    }

    pub fn support(&self) -> &[f64] {
        &self.support
    }

    pub fn masses(&self) -> &[f64] {
        &self.mass
    }

    pub fn len(&self) -> usize {
        self.support.len()
    }

    pub fn is_empty(&self) -> bool {
        self.support.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.mass.iter().sum()
    }

    /// Multiply every mass by `likelihood(t)` and renormalize.
    ///
    /// Returns the normalization constant. When it is zero, subnormal or not
    /// finite the masses are left untouched and `None` is returned.
    pub fn reweight<F>(&mut self, likelihood: F) -> Option<f64>
    where
        F: Fn(f64) -> f64,
    {
        let weighted: Vec<f64> = self
            .support
            .iter()
            .zip(&self.mass)
            .map(|(&t, &m)| m * likelihood(t))
            .collect();

        let total: f64 = weighted.iter().sum();
        if !total.is_finite() || total < f64::MIN_POSITIVE {
            return None;
        }

        self.mass = weighted.iter().map(|w| w / total).collect();
        Some(total)
    }

    pub fn mean(&self) -> f64 {
        self.support
            .iter()
            .zip(&self.mass)
            .map(|(t, m)| t * m)
            .sum()
    }

    pub fn standard_deviation(&self) -> f64 {
        let mean = self.mean();
        let variance: f64 = self
            .support
            .iter()
            .zip(&self.mass)
            .map(|(t, m)| {
                let d = t - mean;
                m * (d * d)
            })
            .sum();
        variance.sqrt()
    }

    /// Support point with the largest mass (first one on ties)
    pub fn mode(&self) -> f64 {
        let mut best = 0;
        for (i, &m) in self.mass.iter().enumerate() {
            if m > self.mass[best] {
                best = i;
            }
        }
        self.support[best]
    }

    /// Intensity at which the CDF reaches `order`.
    ///
    /// Interpolates linearly between the points where the CDF strictly
    /// increases (points carrying positive mass). With fewer than two such
    /// points the lone supporting point is returned; targets outside the
    /// interpolation range clamp to its ends.
    pub fn quantile(&self, order: f64) -> f64 {
        let mut cdf = Vec::with_capacity(self.mass.len());
        let mut running = 0.0;
        for &m in &self.mass {
            running += m;
            cdf.push(running);
        }

        let mut rising = Vec::new();
        let mut prev = 0.0;
        for (i, &c) in cdf.iter().enumerate() {
            if c > prev {
                rising.push(i);
            }
            prev = c;
        }

        let (Some(&first), Some(&last)) = (rising.first(), rising.last()) else {
            return self.support[self.support.len() / 2];
        };
        if rising.len() < 2 {
            return self.support[first];
        }

        let target = order * cdf[cdf.len() - 1];
        if target <= cdf[first] {
            return self.support[first];
        }

        for pair in rising.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if cdf[b] >= target {
                let frac = (target - cdf[a]) / (cdf[b] - cdf[a]);
                return self.support[a] + frac * (self.support[b] - self.support[a]);
            }
        }
        self.support[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_prior_is_normalized_and_centered() {
        let post = Posterior::gaussian(-1.0, 0.5, 0.01, 801);
        assert_eq!(post.len(), 801);
        assert!((post.total() - 1.0).abs() < 1e-12);
        assert!((post.mean() + 1.0).abs() < 1e-9);
        assert!((post.standard_deviation() - 0.5).abs() < 1e-6);
        assert!((post.support()[0] + 5.0).abs() < 1e-9);
        assert!((post.support()[800] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_narrow_prior_between_grid_points_is_normalized() {
        // Even point count: no grid point sits on the center
        let post = Posterior::gaussian(-1.0, 1e-4, 0.01, 802);
        assert!((post.total() - 1.0).abs() < 1e-12, "total={}", post.total());
        assert!(post.mean().is_finite());
        assert!((post.mean() + 1.0).abs() <= 0.005 + 1e-9);
        assert!(post.masses().iter().all(|m| m.is_finite() && *m >= 0.0));
    }

    #[test]
    fn test_support_strictly_increasing() {
        let post = Posterior::gaussian(0.0, 1.0, 0.05, 81);
        for pair in post.support().windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_median_of_symmetric_prior_within_one_grain() {
        let post = Posterior::gaussian(-1.0, 0.5, 0.01, 801);
        let median = post.quantile(0.5);
        assert!((median + 1.0).abs() <= 0.01, "median={median}");
        assert!((post.mode() + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_quantile_is_monotonic_in_order() {
        let post = Posterior::gaussian(0.0, 0.3, 0.01, 201);
        let q10 = post.quantile(0.1);
        let q50 = post.quantile(0.5);
        let q90 = post.quantile(0.9);
        assert!(q10 < q50 && q50 < q90);
        assert!(((q90 - q50) - (q50 - q10)).abs() < 0.02, "prior is symmetric");
    }

    #[test]
    fn test_quantile_of_point_mass_returns_that_point() {
        let mut post = Posterior::gaussian(0.0, 1.0, 0.1, 21);
        let spike = post.support()[7];
        post.reweight(|t| if (t - spike).abs() < 1e-9 { 1.0 } else { 0.0 })
            .expect("spike keeps mass");
        assert_eq!(post.quantile(0.5), spike);
        assert_eq!(post.quantile(0.0), spike);
        assert_eq!(post.quantile(1.0), spike);
        assert_eq!(post.standard_deviation(), 0.0);
    }

    #[test]
    fn test_reweight_renormalizes() {
        let mut post = Posterior::gaussian(0.0, 1.0, 0.1, 41);
        let total = post.reweight(|t| if t > 0.0 { 0.9 } else { 0.1 });
        assert!(total.is_some());
        assert!((post.total() - 1.0).abs() < 1e-12);
        assert!(post.mean() > 0.0, "mass shifts toward the favoured side");
    }

    #[test]
    fn test_reweight_to_zero_leaves_masses_untouched() {
        let mut post = Posterior::gaussian(0.0, 1.0, 0.1, 41);
        let before = post.clone();
        assert_eq!(post.reweight(|_| 0.0), None);
        assert_eq!(post, before);
        assert_eq!(post.reweight(|_| f64::NAN), None);
        assert_eq!(post, before);
    }
}
