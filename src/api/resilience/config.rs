//! Resilience configuration with builder pattern

use super::retry::RetryConfig;
use crate::config::Settings;
use std::time::Duration;

/// Retry and timeout settings applied to every client request
#[derive(Debug, Clone, PartialEq)]
pub struct ResilienceConfig {
    /// Retry behavior for reads
    pub retry: RetryConfig,
    /// Retry behavior for writes through the web-hook
    pub write_retry: RetryConfig,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            write_retry: RetryConfig::single_attempt(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ResilienceConfig {
    pub fn builder() -> ResilienceConfigBuilder {
        ResilienceConfigBuilder::new()
    }

    /// No retries at all (for tests)
    pub fn disabled() -> Self {
        Self {
            retry: RetryConfig::single_attempt(),
            write_retry: RetryConfig::single_attempt(),
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::builder()
            .max_retries(settings.max_retries)
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
    }
}

pub struct ResilienceConfigBuilder {
    config: ResilienceConfig,
}

impl ResilienceConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ResilienceConfig::default(),
        }
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Total read attempts; values below one are treated as one
    pub fn max_retries(mut self, attempts: u32) -> Self {
        self.config.retry.max_attempts = attempts.max(1);
        self
    }

    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.config.retry.base_delay = delay;
        self
    }

    pub fn jitter(mut self, enabled: bool) -> Self {
        self.config.retry.jitter = enabled;
        self
    }

    pub fn write_retry(mut self, retry: RetryConfig) -> Self {
        self.config.write_retry = retry;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn build(self) -> ResilienceConfig {
        self.config
    }
}

impl Default for ResilienceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_do_not_retry_writes() {
        let config = ResilienceConfig::default();
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.write_retry.max_attempts, 1);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder() {
        let config = ResilienceConfig::builder()
            .max_retries(0)
            .base_delay(Duration::from_millis(10))
            .jitter(false)
            .timeout(Duration::from_secs(5))
            .build();

        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.retry.base_delay, Duration::from_millis(10));
        assert!(!config.retry.jitter);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            request_timeout_secs: 12,
            max_retries: 5,
            ..Settings::default()
        };
        let config = ResilienceConfig::from_settings(&settings);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.timeout, Duration::from_secs(12));
    }
}
