//! Fetching and change detection.

pub mod fetch;
pub mod poller;

pub use fetch::{HttpFetcher, RandomSource, SeriesFetcher};
pub use poller::{OnChange, SeriesPoller};
