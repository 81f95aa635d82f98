//! View state controller
//!
//! Owns the active view, the query/selection state and the base collections
//! currently on screen. User events and finished background fetches both
//! come through here; every state entry repaints the render surface.

use std::sync::mpsc::Receiver;
use std::sync::Arc;

use crate::cache::{CacheStats, CatalogCache, Lookup};
use crate::config::AppConfig;
use crate::models::{Episode, Show, ShowId};
use crate::screen::{project, RenderSurface, Screen};
use crate::selection::Browse;
use crate::tasks::{FetchContext, TaskResult};

pub const SHOWS_ERROR: &str = "Failed to load shows. Please try again later.";
pub const EPISODES_ERROR: &str = "Failed to load episodes. Please try again later.";

/// What the user asked to look at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Shows,
    Episodes(ShowId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    ShowsList,
    Loading(Intent),
    /// Only entered once the show's episodes have resolved
    EpisodesList(Show),
    Error { message: String, failed: Intent },
}

/// Interaction events emitted by a render surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    QueryChanged(String),
    /// Dropdown key, `None` for the default entry
    SelectorChanged(Option<usize>),
    ItemActivated(ShowId),
    BackRequested,
    ShowAllRequested,
    RetryRequested,
}

pub struct Controller<R: RenderSurface> {
    cache: CatalogCache,
    tasks: Receiver<TaskResult>,
    view: ViewState,
    browse: Browse,
    shows: Arc<[Show]>,
    episodes: Arc<[Episode]>,
    config: AppConfig,
    surface: R,
}

impl<R: RenderSurface> Controller<R> {
    pub fn new(
        fetcher: FetchContext,
        tasks: Receiver<TaskResult>,
        config: AppConfig,
        surface: R,
    ) -> Self {
        Self {
            cache: CatalogCache::new(fetcher),
            tasks,
            view: ViewState::Loading(Intent::Shows),
            browse: Browse::default(),
            shows: Arc::from(Vec::new()),
            episodes: Arc::from(Vec::new()),
            config,
            surface,
        }
    }

    /// Kick off the initial shows lookup
    pub fn start(&mut self) {
        log::info!("Starting catalog browser");
        self.request(Intent::Shows);
    }

    #[cfg(test)]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[cfg(test)]
    pub fn browse(&self) -> &Browse {
        &self.browse
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.view, ViewState::Loading(_))
    }

    pub fn screen(&self) -> Screen {
        project(&self.view, &self.browse, &self.shows, &self.episodes, &self.config)
    }

    fn repaint(&mut self) {
        let screen = self.screen();
        self.surface.paint(&screen);
    }

    fn enter(&mut self, view: ViewState) {
        log::info!("View -> {:?}", ViewLabel(&view));
        self.view = view;
        self.repaint();
    }

    /// Enter `Loading(intent)` and resolve it right away if the cache has it
    fn request(&mut self, intent: Intent) {
        self.enter(ViewState::Loading(intent));

        match intent {
            Intent::Shows => {
                if let Lookup::Ready(shows) = self.cache.shows() {
                    self.show_list(shows);
                }
            }
            Intent::Episodes(id) => {
                if let Lookup::Ready(episodes) = self.cache.episodes(id) {
                    self.show_episodes(id, episodes);
                }
            }
        }
    }

    fn show_list(&mut self, shows: Arc<[Show]>) {
        self.shows = shows;
        self.episodes = Arc::from(Vec::new());
        self.browse.reset();
        self.enter(ViewState::ShowsList);
    }

    fn show_episodes(&mut self, id: ShowId, episodes: Arc<[Episode]>) {
        let Some(show) = self.shows.iter().find(|s| s.id == id).cloned() else {
            log::warn!("Show {} is no longer listed; returning to shows", id);
            self.request(Intent::Shows);
            return;
        };

        self.episodes = episodes;
        self.browse.reset();
        self.enter(ViewState::EpisodesList(show));
    }

    fn fail(&mut self, failed: Intent) {
        let message = match failed {
            Intent::Shows => SHOWS_ERROR,
            Intent::Episodes(_) => EPISODES_ERROR,
        };
        self.enter(ViewState::Error {
            message: message.to_string(),
            failed,
        });
    }

    /// Apply every finished background fetch. Returns true if any arrived.
    pub fn poll_tasks(&mut self) -> bool {
        let mut any = false;
        while let Ok(task) = self.tasks.try_recv() {
            self.handle_task(task);
            any = true;
        }
        any
    }

    pub fn handle_task(&mut self, task: TaskResult) {
        match task {
            TaskResult::ShowsLoaded(result) => {
                let outcome = self.cache.complete_shows(result);
                let waiting = self.view == ViewState::Loading(Intent::Shows);

                match outcome {
                    Ok(shows) if waiting => self.show_list(shows),
                    Ok(_) => log::debug!("Shows arrived after the view moved on"),
                    Err(e) if waiting => {
                        log::error!("Failed to load shows: {}", e);
                        self.fail(Intent::Shows);
                    }
                    Err(e) => log::warn!("Dropping stale shows failure: {}", e),
                }
            }
            TaskResult::EpisodesLoaded { show, result } => {
                let outcome = self.cache.complete_episodes(show, result);
                let waiting = self.view == ViewState::Loading(Intent::Episodes(show));

                match outcome {
                    Ok(episodes) if waiting => self.show_episodes(show, episodes),
                    Ok(_) => log::debug!("Episodes for show {} arrived after the view moved on", show),
                    Err(e) if waiting => {
                        log::error!("Failed to load episodes for show {}: {}", show, e);
                        self.fail(Intent::Episodes(show));
                    }
                    Err(e) => log::warn!("Dropping stale episodes failure for show {}: {}", show, e),
                }
            }
        }

        log::debug!("Cache: {:?}", self.cache_stats());
    }

    fn base_len(&self) -> Option<usize> {
        match self.view {
            ViewState::ShowsList => Some(self.shows.len()),
            ViewState::EpisodesList(_) => Some(self.episodes.len()),
            _ => None,
        }
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        log::debug!("Event: {:?}", event);

        match event {
            UiEvent::QueryChanged(query) => {
                if self.base_len().is_some() && query != self.browse.query() {
                    self.browse.set_query(query);
                    self.repaint();
                }
            }
            UiEvent::SelectorChanged(key) => {
                if let Some(len) = self.base_len() {
                    self.browse.select(key, len);
                    self.repaint();
                }
            }
            UiEvent::ItemActivated(id) => {
                if self.view != ViewState::ShowsList {
                    return;
                }
                if self.shows.iter().any(|s| s.id == id) {
                    self.request(Intent::Episodes(id));
                } else {
                    log::warn!("Ignoring activation of unknown show {}", id);
                }
            }
            UiEvent::BackRequested => match self.view {
                ViewState::EpisodesList(_)
                | ViewState::Loading(Intent::Episodes(_))
                | ViewState::Error { .. } => self.request(Intent::Shows),
                _ => {}
            },
            UiEvent::ShowAllRequested => {
                if self.base_len().is_some() && self.browse.can_show_all() {
                    self.browse.show_all();
                    self.repaint();
                }
            }
            UiEvent::RetryRequested => {
                if let ViewState::Error { failed, .. } = self.view {
                    log::info!("Retrying {:?}", failed);
                    self.request(failed);
                }
            }
        }
    }
}

/// Short form of a view for log lines
struct ViewLabel<'a>(&'a ViewState);

impl std::fmt::Debug for ViewLabel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            ViewState::ShowsList => write!(f, "ShowsList"),
            ViewState::Loading(intent) => write!(f, "Loading({:?})", intent),
            ViewState::EpisodesList(show) => write!(f, "EpisodesList({})", show.id),
            ViewState::Error { failed, .. } => write!(f, "Error({:?})", failed),
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
