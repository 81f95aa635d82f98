//! TV Catalog
//! A desktop browser for the TVMaze show and episode catalog

// Hide console window on Windows release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// Use mimalloc for faster memory allocation (Linux, macOS)
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use eframe::egui;
use env_logger::{Builder, Env};

mod api;
mod app;
mod cache;
mod config;
mod controller;
mod error;
mod filter;
mod format;
mod models;
mod screen;
mod selection;
mod tasks;

#[cfg(test)]
mod test_support;

use app::CatalogApp;
use config::AppConfig;

const ENV_LOG: &str = "TV_CATALOG_LOG";
const ENV_LOG_STYLE: &str = "TV_CATALOG_LOG_STYLE";

fn main() -> eframe::Result {
    // Setup logging from the env variables, with defaults.
    Builder::from_env(
        Env::new()
            .filter_or(ENV_LOG, "info")
            .write_style(ENV_LOG_STYLE),
    )
    .init();

    let config = AppConfig::load();
    log::info!("Using catalog at {}", config.api_base_url);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 720.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("TV Catalog"),
        vsync: true,
        ..Default::default()
    };

    eframe::run_native(
        "TV Catalog",
        options,
        Box::new(|cc| Ok(Box::new(CatalogApp::new(cc, config)))),
    )
}
