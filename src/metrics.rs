use crate::breaker::CircuitState;

/// Point-in-time snapshot of breaker state for logging and monitoring.
#[derive(Debug, Clone)]
pub struct CircuitBreakerMetrics {
    pub state: CircuitState,
    pub window_len: usize,
    pub failure_rate: f64,
    pub half_open_attempts: u32,
    pub half_open_successes: u32,
}
