//! Run-time configuration object + fluent builder.

use std::time::Duration;

use crate::core::{
    color::Theme,
    constants::{DEFAULT_HEIGHT, DEFAULT_INTERVAL_MS, DEFAULT_WIDTH},
    error::ConfigError,
};

/// Everything the poller and renderer need, validated once up front.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub endpoint: String,
    pub interval: Duration,
    pub width: f64,
    pub height: f64,
    pub theme: Theme,
}

impl Config {
    #[inline]
    pub fn builder(endpoint: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder::new(endpoint)
    }
}

/// Fluent builder; nothing is checked until `build`.
#[derive(Debug)]
pub struct ConfigBuilder {
    endpoint: String,
    interval: Option<Duration>,
    width: Option<f64>,
    height: Option<f64>,
    theme: Option<Theme>,
}

impl ConfigBuilder {
    pub(crate) fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            interval: None,
            width: None,
            height: None,
            theme: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn interval(mut self, d: Duration) -> Self {
        self.interval = Some(d);
        self
    }
    #[inline]
    #[must_use]
    pub fn interval_secs(self, secs: u64) -> Self {
        self.interval(Duration::from_secs(secs))
    }
    #[inline]
    #[must_use]
    pub fn canvas(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
    #[inline]
    #[must_use]
    pub fn theme(mut self, t: Theme) -> Self {
        self.theme = Some(t);
        self
    }

    /// # Errors
    /// Empty endpoint, zero interval, or a non-positive canvas.
    pub fn build(self) -> Result<Config, ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingField("endpoint"));
        }
        let interval = self
            .interval
            .unwrap_or(Duration::from_millis(DEFAULT_INTERVAL_MS));
        if interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        let width = self.width.unwrap_or(DEFAULT_WIDTH);
        let height = self.height.unwrap_or(DEFAULT_HEIGHT);
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(ConfigError::InvalidCanvas { width, height });
        }
        Ok(Config {
            endpoint: self.endpoint,
            interval,
            width,
            height,
            theme: self.theme.unwrap_or_default(),
        })
    }
}
