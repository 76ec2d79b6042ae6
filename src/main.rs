// Entry point for the five-in-a-row TUI application
// Initializes configuration, logging, glyphs and language, then launches the main UI

use std::error::Error;
use std::fs::File;
use std::sync::Arc;

// Module declarations
mod xtf_assets;  // Board and marker glyphs
mod xtf_color;   // Cross-platform color matching utilities
mod xtf_config;  // User preferences and persistence
mod xtf_game;    // Rules engine: grid, turns, win lines
mod xtf_lang;    // Multi-language string resources
mod xtf_session; // Game session: input to moves, restart
mod xtf_ui;      // Terminal UI rendering and event handling

use xtf_assets::Glyphs;
use xtf_color::Palette;
use xtf_config::{load_or_create_config, log_path};
use xtf_lang::Lang;
use xtf_ui::run as run_ui;

/// Environment variable holding the log filter; logging is off when unset
const LOG_ENV: &str = "XTFIVE_LOG";

/// Log to a file next to the config, since the TUI owns the terminal
fn init_logging() {
    if std::env::var_os(LOG_ENV).is_none() {
        return;
    }
    let Some(path) = log_path() else { return };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let Ok(log_file) = File::create(&path) else { return };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    // Load or create user configuration (language, glyphs, preferences)
    let mut cfg = load_or_create_config();

    // Glyphs stand in for the board images; a bad one is fatal
    let palette = Palette::detect();
    let glyphs = Glyphs::load(&cfg, &palette)?;

    // Initialize language resources based on saved or system language
    let mut lang = Lang::new(&cfg.language);

    // Launch the main UI loop
    run_ui(&mut cfg, &mut lang, palette, glyphs)
}
