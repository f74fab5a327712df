//! HellSpawner: the OpenDiablo 2 toolset
//!
//! Desktop editor for Diablo II data files:
//! - MPQ archive browsing (read-only)
//! - DC6 sprite viewing
//! - Palette and font table inspection
//! - Project folders with auxiliary MPQs

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod archive;
mod config;
mod dialog;
mod editor;
mod explorer;
mod formats;
mod input;
mod logging;
mod notify;
mod project;
mod texture;
mod ui;

use app::{App, APP_NAME};
use config::Config;
use macroquad::prelude::*;
use notify::DialogNotifier;

fn window_conf() -> Conf {
    Conf {
        window_title: APP_NAME.to_string(),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Crash logging before anything else can panic
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let _logger = match logging::init() {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Failed to start logging: {e}");
            None
        }
    };
    log::info!("Starting {APP_NAME} {VERSION}");

    let config = Config::load();
    let mut app = App::new(config, Box::new(DialogNotifier));
    app.startup();

    loop {
        app.frame();
        if app.should_quit() {
            break;
        }
        next_frame().await;
    }

    log::info!("Exiting {APP_NAME}");
}
