/// Tuning parameters for the contrast-threshold experiment
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Prior: threshold guess at 10% contrast
    pub const GUESS_MEAN: f64 = -1.0; // log10(0.1)
    pub const GUESS_SD: f64 = 0.5; // log units

    // Weibull psychometric function
    pub const TARGET_PERFORMANCE: f64 = 0.82;
    pub const BETA: f64 = 3.5;
    pub const DELTA: f64 = 0.01; // lapse rate
    pub const GAMMA: f64 = 0.5; // guess rate

    // Posterior grid
    pub const GRAIN: f64 = 0.01;
    pub const RANGE: f64 = 4.0; // half-width, log units
    pub const MAX_SUPPORT_LEN: usize = 1_000_000;

    // Session
    pub const MAX_TRIALS: u32 = 20;
    pub const QUANTILE_ORDER: f64 = 0.5; // median

    // Numerics
    pub const LIKELIHOOD_FLOOR: f64 = 1e-12;
    pub const INTENSITY_LIMIT: f64 = 1e10;
}
