use std::time::Duration;

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Failure percentage (0-100) strictly above which the breaker trips.
    pub failure_rate_threshold: f64,
    /// Maximum number of recent outcomes retained while closed.
    pub window_size: usize,
    /// Trial calls permitted while probing recovery.
    pub half_open_max_calls: u32,
    /// Minimum time the breaker stays open before a probe is allowed.
    pub open_state_wait: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_rate_threshold: 50.0,
            window_size: 10,
            half_open_max_calls: 2,
            open_state_wait: Duration::from_secs(30),
        }
    }
}

impl CircuitBreakerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.failure_rate_threshold.is_finite()
            || !(0.0..=100.0).contains(&self.failure_rate_threshold)
        {
            return Err(ConfigError::FailureRateThreshold(
                self.failure_rate_threshold,
            ));
        }
        if self.window_size == 0 {
            return Err(ConfigError::WindowSize);
        }
        if self.half_open_max_calls == 0 {
            return Err(ConfigError::HalfOpenMaxCalls);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(CircuitBreakerConfig::default().validate().is_ok());
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let config = CircuitBreakerConfig {
            failure_rate_threshold: 101.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FailureRateThreshold(_))
        ));

        let config = CircuitBreakerConfig {
            failure_rate_threshold: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = CircuitBreakerConfig {
            failure_rate_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_window_size_is_rejected() {
        let config = CircuitBreakerConfig {
            window_size: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::WindowSize));
    }

    #[test]
    fn zero_half_open_max_calls_is_rejected() {
        let config = CircuitBreakerConfig {
            half_open_max_calls: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::HalfOpenMaxCalls));
    }
}
