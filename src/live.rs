//! Poller + renderer + surface wired together with an explicit lifecycle:
//! build with [`LiveChart::new`], [`LiveChart::start`], [`LiveChart::stop`],
//! then drop.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{
    runtime::{Handle, RuntimeFlavor},
    task,
};
use tracing::{error, info};

use crate::{
    core::{data::PreparedSeries, error::ChartError},
    poll::{SeriesFetcher, SeriesPoller},
    render::{ChartRenderer, Surface},
};

#[inline]
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Run a surface draw, which may write files, without stalling the other
/// tasks on this worker.  `block_in_place` panics on a current-thread
/// runtime, where the draw simply runs inline.
fn blocking<R>(f: impl FnOnce() -> R) -> R {
    match Handle::try_current().map(|h| h.runtime_flavor()) {
        Ok(RuntimeFlavor::MultiThread) => task::block_in_place(f),
        _ => f(),
    }
}

pub struct LiveChart<F: SeriesFetcher, S: Surface + Send + 'static> {
    poller: SeriesPoller<F>,
    renderer: ChartRenderer,
    surface: Arc<Mutex<S>>,
}

impl<F: SeriesFetcher, S: Surface + Send + 'static> LiveChart<F, S> {
    /// The poller's source width is synced to the surface width.
    pub fn new(poller: SeriesPoller<F>, renderer: ChartRenderer, surface: S) -> Self {
        poller.set_source_width(surface.current_width());
        Self {
            poller,
            renderer,
            surface: Arc::new(Mutex::new(surface)),
        }
    }

    #[must_use]
    pub fn poller(&self) -> &SeriesPoller<F> {
        &self.poller
    }

    /// Run `f` with the surface locked.
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut lock(&self.surface))
    }

    /// Draw `series` now, on the caller's task.
    ///
    /// # Errors
    /// Propagates the surface's failure.
    pub fn redraw(&self, series: &PreparedSeries) -> Result<(), ChartError> {
        self.renderer.draw(series, &mut *lock(&self.surface))
    }

    /// Fetch once and draw straight away, then keep polling and redraw on
    /// every change.  A failed first fetch draws the empty chart.
    ///
    /// # Errors
    /// Only when the first frame cannot be drawn.
    pub async fn start(&self) -> Result<PreparedSeries, ChartError> {
        let first = self.poller.fetch_once().await;
        blocking(|| self.redraw(&first))?;

        let renderer = self.renderer;
        let surface = Arc::clone(&self.surface);
        self.poller.start_polling(move |series| {
            let drawn = blocking(|| {
                let mut surface = lock(&surface);
                // lay out for the size the surface has now, not at fetch time
                let series = series.with_width(surface.current_width());
                renderer.draw(&series, &mut *surface)
            });
            if let Err(e) = drawn {
                error!(error = %e, "redraw failed");
            }
        });
        Ok(first)
    }

    /// Manual refresh: fetch and redraw immediately, outside the timer.
    /// What is drawn becomes the poller's baseline, so the next tick
    /// compares against what is on screen.
    ///
    /// # Errors
    /// The fetch or the draw failed.  The chart is left as it was when the
    /// fetch fails.
    pub async fn refresh(&self) -> Result<PreparedSeries, ChartError> {
        let series = self.poller.try_fetch_once().await?;
        self.poller.accept(series, |shown| -> Result<_, ChartError> {
            blocking(|| self.redraw(shown))?;
            Ok(shown.clone())
        })
    }

    /// The drawing area changed size: relayout the cached points and redraw
    /// synchronously.  Nothing is refetched.
    ///
    /// # Errors
    /// Propagates the surface's failure.
    pub fn resize(&self, width: f64, height: f64) -> Result<PreparedSeries, ChartError> {
        let mut surface = lock(&self.surface);
        surface.resize(width, height);
        self.poller.set_source_width(surface.current_width());
        let series = self.poller.normalize();
        self.renderer.draw(&series, &mut *surface)?;
        Ok(series)
    }

    /// Point at a different source: stop, forget the old series, then start
    /// over with an immediate fetch.
    ///
    /// # Errors
    /// See [`Self::start`].
    pub async fn switch_source(
        &mut self,
        endpoint: impl Into<String>,
        interval: Duration,
    ) -> Result<PreparedSeries, ChartError> {
        self.poller.stop_polling();
        self.poller.reset();
        self.poller.set_endpoint(endpoint);
        self.poller.set_interval(interval);
        info!("source switched");
        self.start().await
    }

    pub fn stop(&self) {
        self.poller.stop_polling();
    }
}
