//! Periodic refresh loop with structural change detection.
//!
//! A [`SeriesPoller`] keeps three pieces of state:
//! - the raw points of the latest successful fetch (re-normalised on resize),
//! - the *baseline*: points last delivered to the subscriber,
//! - the timer: one tokio task plus the token that stops it.
//!
//! Ticks run one after another inside the timer task, so a slow fetch pushes
//! the next tick back instead of overlapping it.  Stopping cancels the token
//! and empties the subscriber slot under the same lock that delivery takes,
//! which means a fetch still in flight completes but its result is dropped.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    core::{
        config::Config,
        constants::MIN_INTERVAL_MS,
        data::{DataPoint, PreparedSeries, RawPoint, normalize, same_series},
        error::FetchError,
    },
    poll::fetch::SeriesFetcher,
};

/// Change subscriber.  Runs on the timer task while the subscriber slot is
/// locked, so it must not start, stop or [`SeriesPoller::accept`] on the
/// poller that invoked it.
pub type OnChange = Box<dyn FnMut(PreparedSeries) + Send + 'static>;

#[inline]
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

struct SourceState {
    endpoint: String,
    source_width: f64,
    raw: Vec<RawPoint>,
}

struct Inner<F> {
    fetcher: F,
    source: Mutex<SourceState>,
    baseline: Mutex<Option<Vec<DataPoint>>>,
    subscriber: Mutex<Option<OnChange>>,
}

struct PollTimer {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl PollTimer {
    fn is_running(&self) -> bool {
        !self.token.is_cancelled() && !self.task.is_finished()
    }
}

pub struct SeriesPoller<F: SeriesFetcher> {
    inner: Arc<Inner<F>>,
    interval: Duration,
    timer: Mutex<Option<PollTimer>>,
}

impl<F: SeriesFetcher> SeriesPoller<F> {
    /// Poller with no points and no timer.  Intervals shorter than
    /// [`MIN_INTERVAL_MS`] are clamped up to it.
    pub fn new(
        fetcher: F,
        source_width: f64,
        endpoint: impl Into<String>,
        interval: Duration,
    ) -> Self {
        let inner = Inner {
            fetcher,
            source: Mutex::new(SourceState {
                endpoint: endpoint.into(),
                source_width,
                raw: Vec::new(),
            }),
            baseline: Mutex::new(None),
            subscriber: Mutex::new(None),
        };
        Self {
            inner: Arc::new(inner),
            interval: clamp_interval(interval),
            timer: Mutex::new(None),
        }
    }

    pub fn from_config(fetcher: F, cfg: &Config) -> Self {
        Self::new(fetcher, cfg.width, cfg.endpoint.clone(), cfg.interval)
    }

    /// Applies from the next fetch on; a fetch already running keeps its URL.
    pub fn set_endpoint(&self, endpoint: impl Into<String>) {
        let endpoint = endpoint.into();
        info!(%endpoint, "endpoint changed");
        lock(&self.inner.source).endpoint = endpoint;
    }

    #[must_use]
    pub fn endpoint(&self) -> String {
        lock(&self.inner.source).endpoint.clone()
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the tick period.  A running loop is restarted with the new
    /// period and keeps its subscriber and baseline.
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = clamp_interval(interval);
        let mut timer = lock(&self.timer);
        if timer.as_ref().is_some_and(PollTimer::is_running) {
            if let Some(old) = timer.take() {
                old.token.cancel();
            }
            *timer = Some(self.spawn_loop());
            debug!(interval_ms = self.interval.as_millis(), "poll loop restarted");
        }
    }

    /// Record a new rendering width.  Later normalisations and deliveries
    /// use it; nothing is refetched.
    pub fn set_source_width(&self, width: f64) {
        lock(&self.inner.source).source_width = width;
    }

    #[must_use]
    pub fn source_width(&self) -> f64 {
        lock(&self.inner.source).source_width
    }

    /// Normalise the currently held raw points.
    #[must_use]
    pub fn normalize(&self) -> PreparedSeries {
        self.inner.normalize()
    }

    /// One fetch.  On success the held raw points are replaced.
    ///
    /// # Errors
    /// [`FetchError`] from the fetcher; held points stay as they were.
    pub async fn try_fetch_once(&self) -> Result<PreparedSeries, FetchError> {
        self.inner.try_fetch_once().await
    }

    /// Like [`Self::try_fetch_once`] but logs failures and hands back the
    /// empty series instead.
    pub async fn fetch_once(&self) -> PreparedSeries {
        match self.try_fetch_once().await {
            Ok(series) => series,
            Err(e) => {
                warn!(error = %e, "fetch failed");
                PreparedSeries::empty()
            }
        }
    }

    /// Record `series` as delivered, as if a tick had handed it to the
    /// subscriber, and run `show` with it.  Ticks wait while `show` runs, so
    /// a manual refresh and a timer delivery never interleave.
    pub fn accept<R>(&self, series: PreparedSeries, show: impl FnOnce(&PreparedSeries) -> R) -> R {
        let _slot = lock(&self.inner.subscriber);
        let series = series.with_width(self.source_width());
        *lock(&self.inner.baseline) = Some(series.points.clone());
        debug!(points = series.len(), "series accepted outside the timer");
        show(&series)
    }

    /// Start the repeating timer and install `on_change` as the only
    /// subscriber.  While a loop is already running only the subscriber is
    /// replaced.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_polling<C>(&self, on_change: C)
    where
        C: FnMut(PreparedSeries) + Send + 'static,
    {
        *lock(&self.inner.subscriber) = Some(Box::new(on_change));

        let mut timer = lock(&self.timer);
        if timer.as_ref().is_some_and(PollTimer::is_running) {
            debug!("already polling, subscriber replaced");
            return;
        }
        *timer = Some(self.spawn_loop());
        info!(
            interval_ms = self.interval.as_millis(),
            endpoint = %self.endpoint(),
            "polling started"
        );
    }

    /// Cancel the timer and drop the subscriber.  No-op when stopped.
    pub fn stop_polling(&self) {
        let Some(timer) = lock(&self.timer).take() else {
            return;
        };
        let mut slot = lock(&self.inner.subscriber);
        timer.token.cancel();
        *slot = None;
        info!("polling stopped");
    }

    #[must_use]
    pub fn is_polling(&self) -> bool {
        lock(&self.timer).as_ref().is_some_and(PollTimer::is_running)
    }

    /// Forget held raw points and the baseline; the next tick fires again
    /// unconditionally.
    pub fn reset(&self) {
        lock(&self.inner.source).raw.clear();
        *lock(&self.inner.baseline) = None;
    }

    /// Points last delivered to the subscriber, if any.
    #[must_use]
    pub fn baseline(&self) -> Option<Vec<DataPoint>> {
        lock(&self.inner.baseline).clone()
    }

    fn spawn_loop(&self) -> PollTimer {
        let token = CancellationToken::new();
        let task = tokio::spawn(run(
            Arc::clone(&self.inner),
            self.interval,
            token.clone(),
        ));
        PollTimer { token, task }
    }
}

impl<F: SeriesFetcher> Drop for SeriesPoller<F> {
    fn drop(&mut self) {
        if let Some(timer) = lock(&self.timer).take() {
            timer.token.cancel();
        }
    }
}

impl<F: SeriesFetcher> Inner<F> {
    fn normalize(&self) -> PreparedSeries {
        let src = lock(&self.source);
        normalize(&src.raw, src.source_width)
    }

    async fn try_fetch_once(&self) -> Result<PreparedSeries, FetchError> {
        let endpoint = lock(&self.source).endpoint.clone();
        let raw = self.fetcher.fetch(&endpoint).await?;
        debug!(%endpoint, points = raw.len(), "fetched");
        let mut src = lock(&self.source);
        src.raw = raw;
        Ok(normalize(&src.raw, src.source_width))
    }

    async fn tick(&self, token: &CancellationToken) {
        let series = match self.try_fetch_once().await {
            Ok(series) => series,
            Err(e) => {
                warn!(error = %e, "fetch failed, baseline kept");
                return;
            }
        };

        let mut slot = lock(&self.subscriber);
        if token.is_cancelled() {
            debug!("stopped during fetch, result dropped");
            return;
        }

        let mut baseline = lock(&self.baseline);
        match baseline.as_deref() {
            None => info!(points = series.len(), "first poll, seeding baseline"),
            Some(prev) if same_series(prev, &series.points) => {
                debug!("series unchanged, skipping redraw");
                return;
            }
            Some(_) => info!(points = series.len(), "series changed"),
        }
        *baseline = Some(series.points.clone());
        drop(baseline);

        // the width may have changed since the fetch was normalised
        let width = lock(&self.source).source_width;
        if let Some(on_change) = slot.as_mut() {
            on_change(series.with_width(width));
        }
    }
}

async fn run<F: SeriesFetcher>(inner: Arc<Inner<F>>, period: Duration, token: CancellationToken) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        inner.tick(&token).await;
    }
    debug!("poll loop exited");
}

#[inline]
fn clamp_interval(d: Duration) -> Duration {
    let min = Duration::from_millis(MIN_INTERVAL_MS);
    if d < min {
        warn!(
            requested_ms = d.as_millis(),
            min_ms = MIN_INTERVAL_MS,
            "poll interval too short, clamped"
        );
        min
    } else {
        d
    }
}
