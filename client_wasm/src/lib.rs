//! Browser binding for the contrast-threshold session
//!
//! The game glue creates a `ContrastSession`, asks it for the ball contrast
//! before each serve and reports paddle hits (1) and misses (0) back. When the
//! trial budget is spent it reads the report and hands it to its own sink.

mod console;

use proto::{FormFieldIds, SessionReport};
use quest_core::{SessionConfig, TrialOutcome, TrialSession};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console::install_tracing();
}

/// One player's session, owned by the JavaScript side
#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub struct ContrastSession {
    session: TrialSession,
}

impl ContrastSession {
    pub fn with_config(config: SessionConfig) -> Result<ContrastSession, String> {
        let session = TrialSession::new(config).map_err(|e| e.to_string())?;
        console::log(&format!(
            "Session ready: {} trials, prior {:.2} ± {:.2} log units",
            session.max_trials(),
            session.config().quest.guess_mean,
            session.config().quest.guess_sd
        ));
        Ok(Self { session })
    }

    pub fn session(&self) -> &TrialSession {
        &self.session
    }

    fn report(&self) -> Result<SessionReport, String> {
        SessionReport::from_session(&self.session).ok_or_else(|| {
            format!(
                "Session not finished: {}/{} trials",
                self.session.trial_count(),
                self.session.max_trials()
            )
        })
    }
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
impl ContrastSession {
    /// Session with the default experiment parameters
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(constructor))]
    pub fn new() -> Result<ContrastSession, String> {
        Self::with_config(SessionConfig::default())
    }

    /// Session from a JSON config; missing fields fall back to the defaults.
    /// Estimator fields accept both `guessMean` and `tGuess` style names.
    pub fn from_config_json(json: &str) -> Result<ContrastSession, String> {
        let config: SessionConfig =
            serde_json::from_str(json).map_err(|e| format!("Bad session config: {e}"))?;
        Self::with_config(config)
    }

    /// Linear contrast for the ball on the current trial
    pub fn next_contrast(&mut self) -> Result<f64, String> {
        let stimulus = self.session.next_stimulus().map_err(|e| e.to_string())?;
        Ok(stimulus.contrast)
    }

    /// Log10 intensity of the stimulus on screen, if any
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(getter))]
    pub fn pending_log_intensity(&self) -> Option<f64> {
        self.session.pending().map(|s| s.log_intensity)
    }

    /// Report the outcome of the current trial (1 = hit, 0 = miss).
    /// Returns true once the session is complete.
    pub fn record_response(&mut self, response: u8) -> Result<bool, String> {
        let outcome = TrialOutcome::from_response(response)
            .ok_or_else(|| format!("Response must be 0 or 1, got {response}"))?;
        let entry = self.session.record(outcome).map_err(|e| e.to_string())?;

        console::log(&format!(
            "Trial {}/{}: contrast {:.4}, {}",
            entry.trial,
            self.session.max_trials(),
            entry.contrast,
            if outcome.is_hit() { "hit" } else { "miss" }
        ));
        if self.session.is_complete() {
            let summary = self.session.summary_now();
            console::log(&format!(
                "Final threshold estimate: {:.5} ± {:.5}",
                summary.threshold, summary.threshold_sd
            ));
        }
        Ok(self.session.is_complete())
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(getter))]
    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(getter))]
    pub fn trial_count(&self) -> u32 {
        self.session.trial_count()
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(getter))]
    pub fn max_trials(&self) -> u32 {
        self.session.max_trials()
    }

    /// Current threshold estimate as linear contrast (10^mean)
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(getter))]
    pub fn threshold(&self) -> f64 {
        self.session.summary_now().threshold
    }

    /// Current posterior standard deviation (log10 units)
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen(getter))]
    pub fn threshold_sd(&self) -> f64 {
        self.session.summary_now().threshold_sd
    }

    /// Results payload as JSON (complete sessions only)
    pub fn report_json(&self) -> Result<String, String> {
        self.report()?.to_json().map_err(|e| e.to_string())
    }

    /// Results payload as a JavaScript object (complete sessions only)
    #[cfg(target_arch = "wasm32")]
    pub fn report_object(&self) -> Result<JsValue, JsValue> {
        let json = self.report_json().map_err(|e| JsValue::from_str(&e))?;
        js_sys::JSON::parse(&json)
    }

    /// Form entries as a JSON array of `[key, value]` pairs
    pub fn form_fields_json(&self, ids_json: &str) -> Result<String, String> {
        let ids: FormFieldIds =
            serde_json::from_str(ids_json).map_err(|e| format!("Bad form field ids: {e}"))?;
        let fields = self.report()?.form_fields(&ids).map_err(|e| e.to_string())?;
        serde_json::to_string(&fields).map_err(|e| e.to_string())
    }
}
