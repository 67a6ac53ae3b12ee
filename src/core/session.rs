use super::engine::compute;
use super::error::ProjectionError;
use super::types::{Projection, SimulationInput};

/// Holds at most one projection: Idle until a compute succeeds, Computed until the
/// next reset or failed compute.
#[derive(Debug, Clone, Default)]
pub struct Session {
    current: Option<Projection>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current projection with a fresh one. On error the session is left
    /// Idle.
    pub fn compute(&mut self, input: SimulationInput) -> Result<&Projection, ProjectionError> {
        self.current = None;
        let projection = compute(input)?;
        Ok(&*self.current.insert(projection))
    }

    pub fn reset(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Projection> {
        self.current.as_ref()
    }

    pub fn is_computed(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> SimulationInput {
        SimulationInput::new(2024, 2034, 1_000_000.0, 500_000.0, 6.15)
    }

    #[test]
    fn starts_idle() {
        let session = Session::new();
        assert!(!session.is_computed());
        assert!(session.current().is_none());
    }

    #[test]
    fn compute_then_reset_round_trip() {
        let mut session = Session::new();
        let first = session.compute(sample_input()).expect("valid input").clone();
        assert!(session.is_computed());
        assert_eq!(first.trajectory.rows().len(), 10);

        session.reset();
        assert!(!session.is_computed());

        let again = session.compute(sample_input()).expect("valid input");
        assert_eq!(again, &first);
    }

    #[test]
    fn recompute_replaces_previous_projection() {
        let mut session = Session::new();
        session.compute(sample_input()).expect("valid input");

        let shorter = SimulationInput::new(2024, 2026, 0.0, 1.0, 0.0);
        session.compute(shorter).expect("valid input");
        let current = session.current().expect("computed");
        assert_eq!(current.trajectory.rows().len(), 2);
        assert_eq!(current.input, shorter);
    }

    #[test]
    fn failed_compute_drops_stale_projection() {
        let mut session = Session::new();
        session.compute(sample_input()).expect("valid input");

        let mut bad = sample_input();
        bad.initial_balance = f64::NAN;
        assert!(session.compute(bad).is_err());
        assert!(!session.is_computed());
    }
}
