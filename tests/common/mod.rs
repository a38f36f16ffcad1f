// Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use series_watch::{
    ChartError, DrawInstructions, FetchError, RawPoint, SeriesFetcher, Surface,
};

pub type Reply = Result<Vec<RawPoint>, FetchError>;

pub fn ok(points: &[(&str, i32)]) -> Reply {
    Ok(points.iter().map(|(l, v)| RawPoint::new(*l, *v)).collect())
}

pub fn fail(msg: &str) -> Reply {
    Err(FetchError::Source(msg.to_owned()))
}

/// Observations shared between a fetcher and the test body.
#[derive(Default)]
pub struct Calls {
    started: AtomicUsize,
    finished: AtomicUsize,
    endpoints: Mutex<Vec<String>>,
}

impl Calls {
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
    pub fn endpoints(&self) -> Vec<String> {
        self.endpoints.lock().unwrap().clone()
    }
}

/// Serves a fixed list of replies in order, then fails.  Each reply can be
/// held back by `delay` to simulate a slow server.
pub struct Scripted {
    replies: Mutex<VecDeque<Reply>>,
    delay: Duration,
    calls: Arc<Calls>,
}

impl Scripted {
    pub fn new(replies: Vec<Reply>) -> (Self, Arc<Calls>) {
        Self::slow(replies, Duration::ZERO)
    }

    pub fn slow(replies: Vec<Reply>, delay: Duration) -> (Self, Arc<Calls>) {
        let calls = Arc::new(Calls::default());
        let me = Self {
            replies: Mutex::new(replies.into()),
            delay,
            calls: Arc::clone(&calls),
        };
        (me, calls)
    }
}

impl SeriesFetcher for Scripted {
    async fn fetch(&self, endpoint: &str) -> Result<Vec<RawPoint>, FetchError> {
        self.calls.started.fetch_add(1, Ordering::SeqCst);
        self.calls.endpoints.lock().unwrap().push(endpoint.to_owned());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| fail("script exhausted"));
        self.calls.finished.fetch_add(1, Ordering::SeqCst);
        reply
    }
}

/// Keeps every frame it is asked to draw.
pub struct MemorySurface {
    pub width: f64,
    pub height: f64,
    pub frames: Vec<DrawInstructions>,
}

impl MemorySurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            frames: Vec::new(),
        }
    }
}

impl Surface for MemorySurface {
    fn current_width(&self) -> f64 {
        self.width
    }
    fn current_height(&self) -> f64 {
        self.height
    }
    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
    fn draw(&mut self, frame: &DrawInstructions) -> Result<(), ChartError> {
        self.frames.push(frame.clone());
        Ok(())
    }
}
