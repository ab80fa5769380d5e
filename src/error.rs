use thiserror::Error;

/// Result of a guarded call that did not return the operation's value.
///
/// `Open` and `HalfOpenExhausted` mean the breaker refused admission and the
/// operation was never invoked. `Inner` carries the operation's own failure
/// unchanged.
#[derive(Debug, Error)]
pub enum CircuitBreakerError<E> {
    #[error("call not permitted: circuit breaker is open")]
    Open,
    #[error("call not permitted: half-open trial budget exhausted")]
    HalfOpenExhausted,
    #[error("inner error: {0}")]
    Inner(E),
}

impl<E> CircuitBreakerError<E> {
    /// True when the breaker itself refused the call.
    pub fn is_not_permitted(&self) -> bool {
        matches!(self, Self::Open | Self::HalfOpenExhausted)
    }

    /// The wrapped operation's error, if this is a pass-through failure.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::Inner(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("failure_rate_threshold must be within 0-100, got {0}")]
    FailureRateThreshold(f64),
    #[error("window_size must be positive")]
    WindowSize,
    #[error("half_open_max_calls must be positive")]
    HalfOpenMaxCalls,
}
