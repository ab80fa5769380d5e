use std::future::Future;
use std::time::SystemTime;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::CircuitBreakerConfig;
use crate::error::{CircuitBreakerError, ConfigError};
use crate::event::{StateTransition, TransitionListener};
use crate::metrics::CircuitBreakerMetrics;
use crate::window::OutcomeWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation, calls pass through and outcomes are tracked.
    Closed,
    /// Tripped, calls are rejected without invoking the dependency.
    Open,
    /// Probing, a limited number of trial calls test recovery.
    HalfOpen,
}

struct Inner {
    state: CircuitState,
    window: OutcomeWindow,
    opened_at: Option<Instant>,
    half_open_attempts: u32,
    half_open_successes: u32,
}

impl Inner {
    fn transition(&mut self, to: CircuitState) -> StateTransition {
        let from = self.state;
        self.state = to;
        match to {
            CircuitState::Open => {
                self.opened_at = Some(Instant::now());
            }
            CircuitState::HalfOpen => {
                self.opened_at = None;
                self.half_open_attempts = 0;
                self.half_open_successes = 0;
            }
            CircuitState::Closed => {
                self.opened_at = None;
                self.window.clear();
            }
        }
        StateTransition {
            from,
            to,
            at: SystemTime::now(),
        }
    }
}

/// Guards one logical call site against a degraded downstream.
///
/// Construct one breaker per call site and share it (`Arc`) across callers;
/// all bookkeeping is serialized internally, the guarded operation itself
/// runs outside the lock.
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
    listeners: Vec<TransitionListener>,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let window = OutcomeWindow::new(config.window_size);
        Ok(Self {
            config,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                window,
                opened_at: None,
                half_open_attempts: 0,
                half_open_successes: 0,
            }),
            listeners: Vec::new(),
        })
    }

    /// Register an observer invoked on every state transition. Listeners are
    /// attached at construction time, before the breaker is shared.
    pub fn on_transition<F>(mut self, listener: F) -> Self
    where
        F: Fn(&StateTransition) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
        self
    }

    pub async fn state(&self) -> CircuitState {
        self.inner.lock().await.state
    }

    pub async fn metrics(&self) -> CircuitBreakerMetrics {
        let inner = self.inner.lock().await;
        CircuitBreakerMetrics {
            state: inner.state,
            window_len: inner.window.len(),
            failure_rate: inner.window.failure_rate(),
            half_open_attempts: inner.half_open_attempts,
            half_open_successes: inner.half_open_successes,
        }
    }

    /// Run `operation` through the breaker.
    ///
    /// Rejected calls fail fast without invoking the operation. An admitted
    /// call's outcome is recorded exactly once; its error, if any, is passed
    /// back unchanged as [`CircuitBreakerError::Inner`].
    pub async fn call<F, Fut, T, E>(&self, operation: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.admit().await?;

        match operation().await {
            Ok(value) => {
                self.record_success().await;
                Ok(value)
            }
            Err(e) => {
                self.record_failure().await;
                Err(CircuitBreakerError::Inner(e))
            }
        }
    }

    /// Pre-call gate. An open breaker whose wait has elapsed becomes
    /// half-open here, and the admitted call is counted as a trial so the
    /// budget cannot be overrun by concurrent callers.
    async fn admit<E>(&self) -> Result<(), CircuitBreakerError<E>> {
        let transition = {
            let mut inner = self.inner.lock().await;
            match inner.state {
                CircuitState::Closed => None,
                CircuitState::Open => match inner.opened_at {
                    Some(opened_at) if opened_at.elapsed() >= self.config.open_state_wait => {
                        let transition = inner.transition(CircuitState::HalfOpen);
                        inner.half_open_attempts += 1;
                        tracing::info!("circuit breaker half-open, probing recovery");
                        Some(transition)
                    }
                    _ => return Err(CircuitBreakerError::Open),
                },
                CircuitState::HalfOpen => {
                    if inner.half_open_attempts >= self.config.half_open_max_calls {
                        return Err(CircuitBreakerError::HalfOpenExhausted);
                    }
                    inner.half_open_attempts += 1;
                    None
                }
            }
        };
        self.notify(transition);
        Ok(())
    }

    async fn record_success(&self) {
        let transition = {
            let mut inner = self.inner.lock().await;
            match inner.state {
                CircuitState::Closed => self.record_outcome(&mut inner, true),
                CircuitState::HalfOpen => {
                    inner.half_open_successes += 1;
                    if inner.half_open_attempts >= self.config.half_open_max_calls
                        && inner.half_open_successes == inner.half_open_attempts
                    {
                        let transition = inner.transition(CircuitState::Closed);
                        tracing::info!("circuit breaker closed, recovery confirmed");
                        Some(transition)
                    } else {
                        None
                    }
                }
                // Admission either rejects or converts the call into a trial,
                // so an open breaker never accumulates outcomes.
                CircuitState::Open => None,
            }
        };
        self.notify(transition);
    }

    async fn record_failure(&self) {
        let transition = {
            let mut inner = self.inner.lock().await;
            match inner.state {
                CircuitState::Closed => self.record_outcome(&mut inner, false),
                CircuitState::HalfOpen => {
                    let transition = inner.transition(CircuitState::Open);
                    tracing::warn!("circuit breaker reopened, trial call failed");
                    Some(transition)
                }
                CircuitState::Open => None,
            }
        };
        self.notify(transition);
    }

    fn record_outcome(&self, inner: &mut Inner, success: bool) -> Option<StateTransition> {
        inner.window.record(success);
        let rate = inner.window.failure_rate();
        if rate > self.config.failure_rate_threshold {
            let transition = inner.transition(CircuitState::Open);
            tracing::warn!(failure_rate = rate, "circuit breaker opened");
            Some(transition)
        } else {
            None
        }
    }

    fn notify(&self, transition: Option<StateTransition>) {
        if let Some(transition) = transition {
            for listener in &self.listeners {
                listener(&transition);
            }
        }
    }
}
