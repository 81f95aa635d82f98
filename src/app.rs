//! eframe application shell
//!
//! egui redraws every frame, so [`EguiSurface`] keeps the last painted
//! [`Screen`] and turns widget interaction into [`UiEvent`]s that the
//! controller applies after the frame's panels are laid out.

use std::collections::HashSet;
use std::sync::mpsc;
use std::sync::Arc;

use eframe::egui;

use crate::api::TvMazeClient;
use crate::config::AppConfig;
use crate::controller::{Controller, UiEvent};
use crate::models::ShowId;
use crate::screen::{Cards, EpisodeCard, RenderSurface, Screen, ShowCard, Status};
use crate::tasks::{FetchContext, ThreadExecutor};

pub struct EguiSurface {
    ctx: egui::Context,
    screen: Option<Screen>,
    /// Text box contents, kept in sync with the controller's query
    query: String,
    /// Show cards with "Read More" open
    expanded: HashSet<ShowId>,
}

impl EguiSurface {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            screen: None,
            query: String::new(),
            expanded: HashSet::new(),
        }
    }

    pub fn footer(&self) -> Option<&'static str> {
        self.screen.as_ref().map(|s| s.footer)
    }

    /// Lay out the last painted screen and collect what the user did
    pub fn draw(&mut self, ui: &mut egui::Ui) -> Vec<UiEvent> {
        let mut events = Vec::new();
        let Self { screen, query, expanded, .. } = self;

        let Some(screen) = screen.as_ref() else {
            ui.spinner();
            return events;
        };

        ui.heading(&screen.title);
        ui.add_space(4.0);

        match &screen.status {
            Status::Loading(text) => {
                ui.horizontal(|ui| {
                    if screen.back && ui.button("⬅ Back").clicked() {
                        events.push(UiEvent::BackRequested);
                    }
                    ui.spinner();
                    ui.label(text);
                });
                return events;
            }
            Status::Error(message) => {
                ui.colored_label(egui::Color32::from_rgb(230, 90, 90), message);
                ui.horizontal(|ui| {
                    if screen.back && ui.button("⬅ Back").clicked() {
                        events.push(UiEvent::BackRequested);
                    }
                    if screen.retry && ui.button("🔄 Retry").clicked() {
                        events.push(UiEvent::RetryRequested);
                    }
                });
                return events;
            }
            Status::Ready => {}
        }

        ui.horizontal(|ui| {
            if screen.back && ui.button("⬅ Back").clicked() {
                events.push(UiEvent::BackRequested);
            }

            let search = ui.add(
                egui::TextEdit::singleline(query)
                    .hint_text(screen.search_placeholder)
                    .desired_width(200.0),
            );
            if search.changed() {
                events.push(UiEvent::QueryChanged(query.clone()));
            }

            let mut choice = screen.dropdown.selected;
            egui::ComboBox::from_id_salt("jump_to")
                .selected_text(screen.dropdown.selected_text())
                .width(240.0)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut choice, None, screen.dropdown.placeholder);
                    for (key, label) in &screen.dropdown.entries {
                        ui.selectable_value(&mut choice, Some(*key), label.as_str());
                    }
                });
            if choice != screen.dropdown.selected {
                events.push(UiEvent::SelectorChanged(choice));
            }

            if screen.show_all && ui.button("Show All").clicked() {
                events.push(UiEvent::ShowAllRequested);
            }

            ui.separator();
            ui.label(&screen.count_label);
        });

        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match &screen.cards {
                cards if cards.is_empty() => {
                    ui.label("Nothing matches your search.");
                }
                Cards::Shows(cards) => {
                    for card in cards {
                        show_card(ui, card, expanded, &mut events);
                        ui.add_space(6.0);
                    }
                }
                Cards::Episodes(cards) => {
                    for card in cards {
                        episode_card(ui, card);
                        ui.add_space(6.0);
                    }
                }
            });

        events
    }
}

impl RenderSurface for EguiSurface {
    fn paint(&mut self, screen: &Screen) {
        if self.screen.as_ref().map(|s| &s.title) != Some(&screen.title) {
            self.expanded.clear();
        }
        self.query = screen.query.clone();
        self.screen = Some(screen.clone());
        self.ctx.request_repaint();
    }
}

fn show_card(ui: &mut egui::Ui, card: &ShowCard, expanded: &mut HashSet<ShowId>, events: &mut Vec<UiEvent>) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());

        let title = egui::RichText::new(&card.name).size(18.0).strong();
        if ui.link(title).on_hover_text("Show episodes").clicked() {
            events.push(UiEvent::ItemActivated(card.id));
        }
        if let Some(url) = &card.image {
            ui.hyperlink_to("Poster", url);
        }

        ui.label(format!("Genres: {}", card.genres));
        ui.label(format!("Status: {}", card.status));
        ui.label(format!("Rating: {}", card.rating));
        ui.label(format!("Runtime: {}", card.runtime));

        let open = expanded.contains(&card.id);
        ui.label(if open { &card.summary } else { &card.preview });

        if card.truncated {
            let toggle = if open { "Read Less" } else { "Read More" };
            if ui.link(toggle).clicked() {
                if open {
                    expanded.remove(&card.id);
                } else {
                    expanded.insert(card.id);
                }
            }
        }
    });
}

fn episode_card(ui: &mut egui::Ui, card: &EpisodeCard) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(egui::RichText::new(&card.title).size(16.0).strong());
        if let Some(url) = &card.image {
            ui.hyperlink_to("Poster", url);
        }
        if !card.summary.is_empty() {
            ui.label(&card.summary);
        }
    });
}

fn apply_theme(ctx: &egui::Context, dark_mode: bool) {
    if dark_mode {
        ctx.set_visuals(egui::Visuals::dark());
    } else {
        ctx.set_visuals(egui::Visuals::light());
    }
}

pub struct CatalogApp {
    controller: Controller<EguiSurface>,
}

impl CatalogApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let ctx = cc.egui_ctx.clone();
        apply_theme(&ctx, config.dark_mode);

        let client = TvMazeClient::new(&config.api_base_url)
            .with_user_agent(&config.user_agent)
            .with_timeouts(config.connect_timeout_secs, config.read_timeout_secs);

        // Fetch threads wake the UI so results are applied without input events
        let (sender, receiver) = mpsc::channel();
        let waker_ctx = ctx.clone();
        let fetcher = FetchContext::new(Arc::new(client), Box::new(ThreadExecutor), sender)
            .with_waker(Arc::new(move || waker_ctx.request_repaint()));

        let mut controller = Controller::new(fetcher, receiver, config, EguiSurface::new(ctx));
        controller.start();

        Self { controller }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("📺 TV Catalog").strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let mut dark_mode = self.controller.config().dark_mode;
                if ui.checkbox(&mut dark_mode, "Dark mode").changed() {
                    apply_theme(ui.ctx(), dark_mode);
                    self.controller.config_mut().dark_mode = dark_mode;
                    self.controller.config().save();
                }
            });
        });
    }
}

impl eframe::App for CatalogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply finished fetches (non-blocking)
        self.controller.poll_tasks();

        if self.controller.is_loading() {
            ctx.set_cursor_icon(egui::CursorIcon::Progress);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));

        if let Some(footer) = self.controller.surface().footer() {
            egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
                ui.small(footer);
            });
        }

        let mut events = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            events = self.controller.surface_mut().draw(ui);
        });

        for event in events {
            self.controller.handle_event(event);
        }
    }
}
