//! TVMaze API client

use std::time::Duration;

use serde::Deserialize;

use crate::error::FetchError;
use crate::models::{Episode, EpisodeId, Show, ShowId};

/// Read-only source of catalog collections.
///
/// Implementations block the calling thread; callers run them on a worker.
pub trait CatalogSource: Send + Sync {
    fn fetch_shows(&self) -> Result<Vec<Show>, FetchError>;
    fn fetch_episodes(&self, show: ShowId) -> Result<Vec<Episode>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct ImageRecord {
    #[serde(default)]
    medium: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RatingRecord {
    #[serde(default)]
    average: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ShowRecord {
    id: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    image: Option<ImageRecord>,
    #[serde(default)]
    genres: Option<Vec<String>>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    rating: Option<RatingRecord>,
    #[serde(default)]
    runtime: Option<u32>,
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EpisodeRecord {
    id: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    season: Option<i64>,
    #[serde(default)]
    number: Option<i64>,
    #[serde(default)]
    image: Option<ImageRecord>,
    #[serde(default)]
    summary: Option<String>,
}

impl From<ShowRecord> for Show {
    fn from(r: ShowRecord) -> Self {
        Show {
            id: ShowId(r.id),
            name: r.name.unwrap_or_default(),
            image: r.image.and_then(|i| i.medium),
            genres: r.genres.unwrap_or_default(),
            status: r.status.unwrap_or_default(),
            rating: r.rating.and_then(|r| r.average),
            runtime: r.runtime,
            summary: r.summary,
        }
    }
}

impl From<EpisodeRecord> for Episode {
    fn from(r: EpisodeRecord) -> Self {
        Episode {
            id: EpisodeId(r.id),
            name: r.name.unwrap_or_default(),
            season: at_least_one(r.season),
            number: at_least_one(r.number),
            image: r.image.and_then(|i| i.medium),
            summary: r.summary,
        }
    }
}

// Specials come back with a null or zero number
fn at_least_one(n: Option<i64>) -> u32 {
    n.filter(|n| *n >= 1)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(1)
}

/// Decode the body of `GET /shows`
pub fn parse_shows(body: &str) -> Result<Vec<Show>, FetchError> {
    let records: Vec<ShowRecord> = serde_json::from_str(body)?;
    Ok(records.into_iter().map(Show::from).collect())
}

/// Decode the body of `GET /shows/{id}/episodes`
pub fn parse_episodes(body: &str) -> Result<Vec<Episode>, FetchError> {
    let records: Vec<EpisodeRecord> = serde_json::from_str(body)?;
    Ok(records.into_iter().map(Episode::from).collect())
}

pub struct TvMazeClient {
    base_url: String,
    user_agent: String,
    agent: ureq::Agent,
}

impl TvMazeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: format!("tv_catalog/{}", env!("CARGO_PKG_VERSION")),
            agent: Self::create_agent(10, 30),
        }
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        if !user_agent.is_empty() {
            self.user_agent = user_agent.to_string();
        }
        self
    }

    pub fn with_timeouts(mut self, connect_secs: u64, read_secs: u64) -> Self {
        self.agent = Self::create_agent(connect_secs, read_secs);
        self
    }

    fn create_agent(connect_secs: u64, read_secs: u64) -> ureq::Agent {
        ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(read_secs)))
            .timeout_connect(Some(Duration::from_secs(connect_secs)))
            .max_idle_connections(4)
            .max_idle_connections_per_host(2)
            .build()
            .new_agent()
    }

    fn shows_url(&self) -> String {
        format!("{}/shows", self.base_url)
    }

    fn episodes_url(&self, show: ShowId) -> String {
        format!("{}/shows/{}/episodes", self.base_url, show)
    }

    fn make_request(&self, url: &str) -> Result<String, FetchError> {
        log::debug!("GET {}", url);

        let mut response = match self
            .agent
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(code)) => return Err(FetchError::Status(code)),
            Err(e) => return Err(FetchError::Transport(e.to_string())),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .body_mut()
            .read_to_string()
            .map_err(|e| FetchError::Transport(format!("Read failed: {}", e)))
    }
}

impl CatalogSource for TvMazeClient {
    fn fetch_shows(&self) -> Result<Vec<Show>, FetchError> {
        let body = self.make_request(&self.shows_url())?;
        parse_shows(&body)
    }

    fn fetch_episodes(&self, show: ShowId) -> Result<Vec<Episode>, FetchError> {
        let body = self.make_request(&self.episodes_url(show))?;
        parse_episodes(&body)
    }
}
