//! Data models for the TV catalog browser

use std::fmt;

/// Source-assigned show identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShowId(pub u64);

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source-assigned episode identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EpisodeId(pub u64);

/// A show as listed in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Show {
    pub id: ShowId,
    pub name: String,
    pub image: Option<String>,
    pub genres: Vec<String>,
    pub status: String,
    pub rating: Option<f64>,
    pub runtime: Option<u32>,
    /// May contain HTML markup
    pub summary: Option<String>,
}

/// A single episode of a show
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub id: EpisodeId,
    pub name: String,
    /// Always >= 1
    pub season: u32,
    /// Always >= 1
    pub number: u32,
    pub image: Option<String>,
    /// May contain HTML markup
    pub summary: Option<String>,
}

/// Which kind of collection a view is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Shows,
    Episodes,
}

impl EntityKind {
    /// Plural noun used in the count label
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Shows => "shows",
            EntityKind::Episodes => "episodes",
        }
    }
}
