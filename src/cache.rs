//! Session-lifetime memo of catalog collections
//!
//! Each key ("all shows", or one show's episodes) is fetched at most once.
//! A lookup for a key that is already being fetched joins that request
//! instead of issuing another one. Failed fetches leave the key empty so the
//! next lookup retries.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::FetchError;
use crate::models::{Episode, Show, ShowId};
use crate::tasks::FetchContext;

/// Outcome of a cache lookup
#[derive(Debug, Clone)]
pub enum Lookup<T> {
    Ready(Arc<[T]>),
    /// A fetch is in flight; its result arrives as a `TaskResult`
    Pending,
}

enum Slot<T> {
    InFlight,
    Ready(Arc<[T]>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub joins: usize,
    pub fetches: usize,
}

pub struct CatalogCache {
    fetcher: FetchContext,
    shows: Option<Slot<Show>>,
    episodes: HashMap<ShowId, Slot<Episode>>,
    stats: CacheStats,
}

/// Case-insensitive by name; equal names keep source order
pub fn sort_shows(shows: &mut [Show]) {
    shows.sort_by_cached_key(|s| s.name.to_lowercase());
}

impl CatalogCache {
    pub fn new(fetcher: FetchContext) -> Self {
        Self {
            fetcher,
            shows: None,
            episodes: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn shows(&mut self) -> Lookup<Show> {
        match &self.shows {
            Some(Slot::Ready(shows)) => {
                self.stats.hits += 1;
                log::debug!("Shows served from cache ({} items)", shows.len());
                Lookup::Ready(Arc::clone(shows))
            }
            Some(Slot::InFlight) => {
                self.stats.joins += 1;
                log::debug!("Shows request already in flight");
                Lookup::Pending
            }
            None => {
                self.stats.fetches += 1;
                self.shows = Some(Slot::InFlight);
                self.fetcher.fetch_shows();
                Lookup::Pending
            }
        }
    }

    pub fn episodes(&mut self, show: ShowId) -> Lookup<Episode> {
        match self.episodes.get(&show) {
            Some(Slot::Ready(episodes)) => {
                self.stats.hits += 1;
                log::debug!("Episodes for show {} served from cache ({} items)", show, episodes.len());
                Lookup::Ready(Arc::clone(episodes))
            }
            Some(Slot::InFlight) => {
                self.stats.joins += 1;
                log::debug!("Episodes request for show {} already in flight", show);
                Lookup::Pending
            }
            None => {
                self.stats.fetches += 1;
                self.episodes.insert(show, Slot::InFlight);
                self.fetcher.fetch_episodes(show);
                Lookup::Pending
            }
        }
    }

    /// Record the outcome of a shows fetch.
    ///
    /// On success the sorted collection is memoized and returned. A memo that
    /// is already populated is never replaced.
    pub fn complete_shows(
        &mut self,
        result: Result<Vec<Show>, FetchError>,
    ) -> Result<Arc<[Show]>, FetchError> {
        if let Some(Slot::Ready(shows)) = &self.shows {
            return Ok(Arc::clone(shows));
        }

        match result {
            Ok(mut shows) => {
                sort_shows(&mut shows);
                let shows: Arc<[Show]> = shows.into();
                log::info!("Loaded {} shows", shows.len());
                self.shows = Some(Slot::Ready(Arc::clone(&shows)));
                Ok(shows)
            }
            Err(e) => {
                self.shows = None;
                Err(e)
            }
        }
    }

    /// Record the outcome of an episodes fetch; source order is kept
    pub fn complete_episodes(
        &mut self,
        show: ShowId,
        result: Result<Vec<Episode>, FetchError>,
    ) -> Result<Arc<[Episode]>, FetchError> {
        if let Some(Slot::Ready(episodes)) = self.episodes.get(&show) {
            return Ok(Arc::clone(episodes));
        }

        match result {
            Ok(episodes) => {
                let episodes: Arc<[Episode]> = episodes.into();
                log::info!("Loaded {} episodes for show {}", episodes.len(), show);
                self.episodes.insert(show, Slot::Ready(Arc::clone(&episodes)));
                Ok(episodes)
            }
            Err(e) => {
                self.episodes.remove(&show);
                Err(e)
            }
        }
    }

    #[cfg(test)]
    pub fn has_shows(&self) -> bool {
        matches!(self.shows, Some(Slot::Ready(_)))
    }
}
