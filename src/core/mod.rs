//! Data model, axis maths and configuration shared by polling and
//! rendering.

pub mod bounds;
pub mod color;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod rng;

pub use bounds::{AxisRange, compute_axis_range};
pub use color::{ColorError, Rgb, Theme};
pub use config::{Config, ConfigBuilder};
pub use constants::{DEFAULT_INTERVAL_MS, MARGIN, MIN_INTERVAL_MS};
pub use data::{DataPoint, MalformedPoint, PreparedSeries, RawPoint, RawValue, normalize};
pub use error::{ChartError, ConfigError, FetchError};
