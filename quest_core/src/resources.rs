use rand::Rng;

/// Random number generator for simulated observers
pub struct SessionRng(pub rand::rngs::StdRng);

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }

    /// Bernoulli draw; `p` outside [0, 1] is clamped and NaN never fires
    pub fn chance(&mut self, p: f64) -> bool {
        if p.is_nan() {
            return false;
        }
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

impl Default for SessionRng {
    fn default() -> Self {
        Self::new(12345)
    }
}
