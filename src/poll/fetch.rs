//! Where raw series come from: the HTTP endpoint, or an in-process demo
//! generator speaking the same `{ x, value }` contract.

use std::{
    future::{self, Future},
    sync::{Mutex, PoisonError},
};

use crate::core::{data::RawPoint, error::FetchError, rng::Lcg};

/// Produces the raw points currently served at `endpoint`.
pub trait SeriesFetcher: Send + Sync + 'static {
    fn fetch(
        &self,
        endpoint: &str,
    ) -> impl Future<Output = Result<Vec<RawPoint>, FetchError>> + Send;
}

/// GET `endpoint`, expect `{ "data": [...] }` back.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    /// # Errors
    /// When the TLS backend cannot be initialised.
    pub fn new() -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("series-watch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }
}

impl SeriesFetcher for HttpFetcher {
    async fn fetch(&self, endpoint: &str) -> Result<Vec<RawPoint>, FetchError> {
        let resp = self.http.get(endpoint).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = resp.bytes().await?;
        crate::core::data::parse_series(&body)
    }
}

/// Fresh random series on every call: `Point 1..=n` with whole values in
/// `[-100, 100)`.  Ignores the endpoint.
pub struct RandomSource {
    points: usize,
    rng: Mutex<Lcg>,
}

impl RandomSource {
    #[must_use]
    pub fn new(points: usize, rng: Lcg) -> Self {
        Self {
            points,
            rng: Mutex::new(rng),
        }
    }

    fn generate(&self) -> Vec<RawPoint> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        (1..=self.points)
            .map(|i| RawPoint::new(format!("Point {i}"), rng.int_in(-100, 100)))
            .collect()
    }
}

impl SeriesFetcher for RandomSource {
    fn fetch(
        &self,
        _endpoint: &str,
    ) -> impl Future<Output = Result<Vec<RawPoint>, FetchError>> + Send {
        future::ready(Ok(self.generate()))
    }
}
