//! Background fetch dispatch
//!
//! Catalog requests block, so they run off the UI thread. Each finished
//! request is posted back as a [`TaskResult`] on an mpsc channel and applied
//! on the UI thread when the channel is drained.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use crate::api::CatalogSource;
use crate::error::FetchError;
use crate::models::{Episode, Show, ShowId};

/// Background task messages
#[derive(Debug)]
pub enum TaskResult {
    ShowsLoaded(Result<Vec<Show>, FetchError>),
    EpisodesLoaded {
        show: ShowId,
        result: Result<Vec<Episode>, FetchError>,
    },
}

pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs fetch jobs somewhere other than the caller's stack
pub trait Executor {
    fn execute(&self, job: Job);
}

/// One short-lived thread per request
pub struct ThreadExecutor;

impl Executor for ThreadExecutor {
    fn execute(&self, job: Job) {
        thread::spawn(job);
    }
}

/// Called after a result has been posted, e.g. to wake the UI
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Context for background fetch operations
pub struct FetchContext {
    source: Arc<dyn CatalogSource>,
    executor: Box<dyn Executor>,
    sender: Sender<TaskResult>,
    waker: Option<Waker>,
}

impl FetchContext {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        executor: Box<dyn Executor>,
        sender: Sender<TaskResult>,
    ) -> Self {
        Self { source, executor, sender, waker: None }
    }

    pub fn with_waker(mut self, waker: Waker) -> Self {
        self.waker = Some(waker);
        self
    }

    pub fn fetch_shows(&self) {
        log::debug!("Fetching shows");
        self.spawn(|source| TaskResult::ShowsLoaded(source.fetch_shows()));
    }

    pub fn fetch_episodes(&self, show: ShowId) {
        log::debug!("Fetching episodes for show {}", show);
        self.spawn(move |source| TaskResult::EpisodesLoaded {
            show,
            result: source.fetch_episodes(show),
        });
    }

    fn spawn<F>(&self, fetch: F)
    where
        F: FnOnce(&dyn CatalogSource) -> TaskResult + Send + 'static,
    {
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        let waker = self.waker.clone();

        self.executor.execute(Box::new(move || {
            let result = fetch(source.as_ref());
            // The receiver is gone once the window has closed
            if sender.send(result).is_err() {
                return;
            }
            if let Some(wake) = waker {
                wake();
            }
        }));
    }
}
