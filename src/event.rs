use std::time::SystemTime;

use crate::breaker::CircuitState;

/// A single state change, reported to registered listeners.
#[derive(Debug, Clone)]
pub struct StateTransition {
    pub from: CircuitState,
    pub to: CircuitState,
    pub at: SystemTime,
}

pub(crate) type TransitionListener = Box<dyn Fn(&StateTransition) + Send + Sync>;
