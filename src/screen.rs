//! Render-ready projection of the controller state
//!
//! [`project`] turns the current view, the browse state and the base
//! collections into a [`Screen`]. The controller hands every new screen to a
//! [`RenderSurface`]; surfaces never look at controller internals.

use crate::config::AppConfig;
use crate::controller::{Intent, ViewState};
use crate::format::{
    format_episode_code, genres_text, rating_text, runtime_text, status_text, strip_html,
    summary_preview,
};
use crate::models::{EntityKind, Episode, Show, ShowId};
use crate::selection::Browse;

pub const ATTRIBUTION: &str = "Data came from TVMaze";

/// Something that can display a [`Screen`]
pub trait RenderSurface {
    fn paint(&mut self, screen: &Screen);
}

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Loading(String),
    Error(String),
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShowCard {
    pub id: ShowId,
    pub name: String,
    pub image: Option<String>,
    pub genres: String,
    pub status: String,
    pub rating: String,
    pub runtime: String,
    /// Summary with markup removed
    pub summary: String,
    /// Shortened summary shown until the card is expanded
    pub preview: String,
    /// Whether "Read More" applies
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeCard {
    pub title: String,
    pub image: Option<String>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cards {
    Shows(Vec<ShowCard>),
    Episodes(Vec<EpisodeCard>),
}

impl Cards {
    pub fn len(&self) -> usize {
        match self {
            Cards::Shows(c) => c.len(),
            Cards::Episodes(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Jump-to dropdown: a default entry plus one entry per base item
#[derive(Debug, Clone, PartialEq)]
pub struct Dropdown {
    pub placeholder: &'static str,
    /// (selection key, label)
    pub entries: Vec<(usize, String)>,
    pub selected: Option<usize>,
}

impl Dropdown {
    pub fn selected_text(&self) -> &str {
        self.selected
            .and_then(|key| self.entries.iter().find(|(k, _)| *k == key))
            .map(|(_, label)| label.as_str())
            .unwrap_or(self.placeholder)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub status: Status,
    pub title: String,
    pub search_placeholder: &'static str,
    pub query: String,
    pub cards: Cards,
    pub dropdown: Dropdown,
    pub count_label: String,
    pub back: bool,
    pub show_all: bool,
    pub retry: bool,
    pub footer: &'static str,
}

fn kind_of(view: &ViewState) -> EntityKind {
    let intent = match view {
        ViewState::ShowsList => return EntityKind::Shows,
        ViewState::EpisodesList(_) => return EntityKind::Episodes,
        ViewState::Loading(intent) => intent,
        ViewState::Error { failed, .. } => failed,
    };
    match intent {
        Intent::Shows => EntityKind::Shows,
        Intent::Episodes(_) => EntityKind::Episodes,
    }
}

fn title_for(view: &ViewState, shows: &[Show]) -> String {
    let show_name = |id: ShowId| {
        shows
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.clone())
            .unwrap_or_default()
    };

    match view {
        ViewState::EpisodesList(show) => format!("Episodes: {}", show.name),
        ViewState::Loading(Intent::Episodes(id))
        | ViewState::Error { failed: Intent::Episodes(id), .. } => {
            format!("Episodes: {}", show_name(*id))
        }
        _ => "TV Shows".to_string(),
    }
}

fn show_card(show: &Show, preview_len: usize) -> ShowCard {
    let summary = show.summary.as_deref().map(strip_html).unwrap_or_default();
    let (preview, truncated) = summary_preview(&summary, preview_len);

    ShowCard {
        id: show.id,
        name: show.name.clone(),
        image: show.image.clone(),
        genres: genres_text(&show.genres),
        status: status_text(&show.status),
        rating: rating_text(show.rating),
        runtime: runtime_text(show.runtime),
        summary,
        preview,
        truncated,
    }
}

fn episode_card(episode: &Episode) -> EpisodeCard {
    EpisodeCard {
        title: format!(
            "{} - {}",
            episode.name,
            format_episode_code(episode.season, episode.number)
        ),
        image: episode.image.clone(),
        summary: episode.summary.as_deref().map(strip_html).unwrap_or_default(),
    }
}

/// Build the screen for the current state.
///
/// `shows` and `episodes` are the full base collections; the browse state
/// decides which of them are turned into cards.
pub fn project(
    view: &ViewState,
    browse: &Browse,
    shows: &[Show],
    episodes: &[Episode],
    config: &AppConfig,
) -> Screen {
    let kind = kind_of(view);

    let (search_placeholder, placeholder) = match kind {
        EntityKind::Shows => ("Search shows...", "Jump to show..."),
        EntityKind::Episodes => ("Search episodes...", "Jump to episode..."),
    };

    let mut screen = Screen {
        status: Status::Ready,
        title: title_for(view, shows),
        search_placeholder,
        query: browse.query().to_string(),
        cards: match kind {
            EntityKind::Shows => Cards::Shows(Vec::new()),
            EntityKind::Episodes => Cards::Episodes(Vec::new()),
        },
        dropdown: Dropdown {
            placeholder,
            entries: Vec::new(),
            selected: None,
        },
        count_label: String::new(),
        back: false,
        show_all: false,
        retry: false,
        footer: ATTRIBUTION,
    };

    match view {
        ViewState::Loading(intent) => {
            screen.status = Status::Loading(match intent {
                Intent::Shows => "Loading shows list...".to_string(),
                Intent::Episodes(_) => "Loading episodes...".to_string(),
            });
            screen.back = matches!(intent, Intent::Episodes(_));
        }
        ViewState::Error { message, .. } => {
            screen.status = Status::Error(message.clone());
            screen.back = true;
            screen.retry = true;
        }
        ViewState::ShowsList => {
            let visible = browse.visible(shows, config.summary_search);
            screen.cards = Cards::Shows(
                visible
                    .indices
                    .iter()
                    .map(|&i| show_card(&shows[i], config.summary_preview_len))
                    .collect(),
            );
            screen.dropdown.entries = shows
                .iter()
                .enumerate()
                .map(|(i, s)| (i, s.name.clone()))
                .collect();
            screen.dropdown.selected = browse.selection();
            screen.count_label = visible.label;
            screen.show_all = browse.can_show_all();
        }
        ViewState::EpisodesList(_) => {
            let visible = browse.visible(episodes, config.summary_search);
            screen.cards = Cards::Episodes(
                visible
                    .indices
                    .iter()
                    .map(|&i| episode_card(&episodes[i]))
                    .collect(),
            );
            screen.dropdown.entries = episodes
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    (i, format!("{} - {}", format_episode_code(e.season, e.number), e.name))
                })
                .collect();
            screen.dropdown.selected = browse.selection();
            screen.count_label = visible.label;
            screen.back = true;
            screen.show_all = browse.can_show_all();
        }
    }

    screen
}
