pub mod config;
pub mod error;
pub mod observer;
pub mod params;
pub mod posterior;
pub mod psychometric;
pub mod quest;
pub mod resources;
pub mod session;
pub mod trial;

pub use config::*;
pub use error::*;
pub use observer::*;
pub use params::*;
pub use posterior::*;
pub use psychometric::*;
pub use quest::*;
pub use resources::*;
pub use session::*;
pub use trial::*;

/// Run a whole session against a simulated observer
pub fn simulate_session(
    config: SessionConfig,
    observer: &SimulatedObserver,
    rng: &mut SessionRng,
) -> Result<TrialSession, SessionError> {
    let mut session = TrialSession::new(config)?;

    while !session.is_complete() {
        // 1. Show the recommended stimulus
        let stimulus = session.next_stimulus()?;

        // 2. Observer responds; feed it back
        let outcome = observer.respond(stimulus.log_intensity, rng);
        session.record(outcome)?;
    }

    Ok(session)
}
