//! Error enums for configuration, fetching and drawing, plus the
//! top-level [`ChartError`] they all convert into.

use std::{error::Error, fmt, io};

use crate::core::color::ColorError;

/// Precise configuration faults.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    MissingField(&'static str),
    ZeroInterval,
    InvalidCanvas { width: f64, height: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingField(x) => write!(f, "configuration missing field `{x}`"),
            ConfigError::ZeroInterval => f.write_str("poll interval must be greater than zero"),
            ConfigError::InvalidCanvas { width, height } => {
                write!(f, "canvas must be positive and finite, got {width}×{height}")
            }
        }
    }
}
impl Error for ConfigError {}

/// One fetch of the remote series went wrong.  Never fatal to the poller.
#[derive(Debug)]
pub enum FetchError {
    /// Connection, TLS, timeout or body-read failure.
    Transport(reqwest::Error),
    /// The server answered outside the 2xx range.
    Status(u16),
    /// Body is not JSON or lacks a `data` array of points.
    Body(serde_json::Error),
    /// Failure of a non-HTTP source (files, in-process generators).
    Source(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(e) => write!(f, "request failed: {e}"),
            FetchError::Status(code) => write!(f, "server answered with HTTP {code}"),
            FetchError::Body(e) => write!(f, "unexpected response body: {e}"),
            FetchError::Source(msg) => f.write_str(msg),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FetchError::Transport(e) => Some(e),
            FetchError::Body(e) => Some(e),
            FetchError::Status(_) | FetchError::Source(_) => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e)
    }
}
impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Body(e)
    }
}

/// Top-level error type bubbled up by public APIs.
#[derive(Debug)]
pub enum ChartError {
    Io(io::Error),
    Color(ColorError),
    Config(ConfigError),
    Fetch(FetchError),
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartError::Io(e) => write!(f, "{e}"),
            ChartError::Color(e) => write!(f, "{e}"),
            ChartError::Config(e) => write!(f, "{e}"),
            ChartError::Fetch(e) => write!(f, "{e}"),
        }
    }
}
impl Error for ChartError {}

// automatic conversions
impl From<io::Error> for ChartError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
impl From<ColorError> for ChartError {
    fn from(e: ColorError) -> Self {
        Self::Color(e)
    }
}
impl From<ConfigError> for ChartError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
impl From<FetchError> for ChartError {
    fn from(e: FetchError) -> Self {
        Self::Fetch(e)
    }
}
