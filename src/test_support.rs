//! Deterministic stand-ins for the network, the worker threads and the window

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::api::CatalogSource;
use crate::error::FetchError;
use crate::models::{Episode, EpisodeId, Show, ShowId};
use crate::screen::{RenderSurface, Screen};
use crate::tasks::{Executor, Job};

/// Catalog source answering from canned results and counting calls
#[derive(Default)]
pub struct ScriptedSource {
    shows: Mutex<Option<Result<Vec<Show>, FetchError>>>,
    episodes: Mutex<HashMap<ShowId, Result<Vec<Episode>, FetchError>>>,
    show_calls: AtomicUsize,
    episode_calls: Mutex<HashMap<ShowId, usize>>,
}

impl ScriptedSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_shows(&self, result: Result<Vec<Show>, FetchError>) {
        *self.shows.lock().unwrap() = Some(result);
    }

    pub fn set_episodes(&self, show: ShowId, result: Result<Vec<Episode>, FetchError>) {
        self.episodes.lock().unwrap().insert(show, result);
    }

    pub fn show_calls(&self) -> usize {
        self.show_calls.load(Ordering::SeqCst)
    }

    pub fn episode_calls(&self, show: ShowId) -> usize {
        self.episode_calls.lock().unwrap().get(&show).copied().unwrap_or(0)
    }
}

impl CatalogSource for ScriptedSource {
    fn fetch_shows(&self) -> Result<Vec<Show>, FetchError> {
        self.show_calls.fetch_add(1, Ordering::SeqCst);
        self.shows
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Err(FetchError::Status(404)))
    }

    fn fetch_episodes(&self, show: ShowId) -> Result<Vec<Episode>, FetchError> {
        *self.episode_calls.lock().unwrap().entry(show).or_default() += 1;
        self.episodes
            .lock()
            .unwrap()
            .get(&show)
            .cloned()
            .unwrap_or(Err(FetchError::Status(404)))
    }
}

/// Executor that holds jobs until the test runs them
#[derive(Clone, Default)]
pub struct QueuedExecutor {
    jobs: Arc<Mutex<VecDeque<Job>>>,
}

impl QueuedExecutor {
    pub fn pending(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    /// Run the oldest queued job; false if there was none
    pub fn run_next(&self) -> bool {
        let job = self.jobs.lock().unwrap().pop_front();
        match job {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Run the newest queued job, to simulate out-of-order completion
    pub fn run_last(&self) -> bool {
        let job = self.jobs.lock().unwrap().pop_back();
        match job {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    pub fn run_all(&self) {
        while self.run_next() {}
    }
}

impl Executor for QueuedExecutor {
    fn execute(&self, job: Job) {
        self.jobs.lock().unwrap().push_back(job);
    }
}

/// Render surface that keeps every screen it was asked to paint
#[derive(Default)]
pub struct RecordingSurface {
    pub frames: Vec<Screen>,
}

impl RecordingSurface {
    pub fn last(&self) -> &Screen {
        self.frames.last().expect("nothing painted yet")
    }
}

impl RenderSurface for RecordingSurface {
    fn paint(&mut self, screen: &Screen) {
        self.frames.push(screen.clone());
    }
}

pub fn show(id: u64, name: &str) -> Show {
    Show {
        id: ShowId(id),
        name: name.to_string(),
        image: None,
        genres: vec!["Drama".to_string()],
        status: "Ended".to_string(),
        rating: Some(7.5),
        runtime: Some(60),
        summary: Some(format!("<p>About {}</p>", name)),
    }
}

pub fn episode(id: u64, season: u32, number: u32, name: &str) -> Episode {
    Episode {
        id: EpisodeId(id),
        name: name.to_string(),
        season,
        number,
        image: None,
        summary: Some(format!("<p>{} summary</p>", name)),
    }
}
