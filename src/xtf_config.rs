// User preferences and their persistence
// Stored as TOML in the per-user config directory; no game state is kept

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 240;

/// User configuration
/// Persisted to disk as TOML
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub language: String,      // Language code ("en" or "zh")
    pub ascii_icons: bool,     // Use ASCII fallback glyphs
    pub show_indicator: bool,  // Show cursor position indicator
    pub fps: u32,              // Frames per second of the game loop

    // Optional marker glyph overrides (1-2 columns wide)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glyph_x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glyph_o: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        // Auto-detect system language on first run
        let system_lang = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
        let lang = if system_lang.to_lowercase().starts_with("zh") {
            "zh".to_string()
        } else {
            "en".to_string()
        };

        Config {
            language: lang,
            ascii_icons: false,
            show_indicator: false,
            fps: 60,
            glyph_x: None,
            glyph_o: None,
        }
    }
}

impl Config {
    /// Time budget of a single frame, with fps clamped to a sane range
    pub fn frame_interval(&self) -> Duration {
        let fps = self.fps.clamp(MIN_FPS, MAX_FPS);
        Duration::from_micros(1_000_000 / fps as u64)
    }
}

/// Path of a per-user file named after the executable, e.g.
/// ~/.config/xtfive/xtfive.toml on Linux.
/// Falls back to the current directory if ProjectDirs is unavailable
fn user_file(ext: &str) -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let name = exe.file_stem()?.to_str()?;
    if let Some(proj) = ProjectDirs::from("com", "xhbl", name) {
        let mut path = proj.config_dir().to_path_buf();
        path.push(format!("{}.{}", name, ext));
        return Some(path);
    }
    let mut path = env::current_dir().ok()?;
    path.push(format!("{}.{}", name, ext));
    Some(path)
}

pub fn config_path() -> Option<PathBuf> {
    user_file("toml")
}

/// Where the log goes when logging is enabled
pub fn log_path() -> Option<PathBuf> {
    user_file("log")
}

/// Parse a config file body
pub fn parse_config(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Load configuration from disk, or create default if not found
pub fn load_or_create_config() -> Config {
    if let Some(path) = config_path() {
        if path.exists() {
            match fs::read_to_string(&path).map(|s| parse_config(&s)) {
                Ok(Ok(cfg)) => return cfg,
                Ok(Err(e)) => warn!(path = %path.display(), error = %e, "bad config, using defaults"),
                Err(e) => warn!(path = %path.display(), error = %e, "unreadable config, using defaults"),
            }
        }
        let cfg = Config::default();
        save_config(&cfg);
        return cfg;
    }
    Config::default()
}

/// Save configuration to disk as TOML
pub fn save_config(cfg: &Config) {
    let Some(path) = config_path() else { return };
    match toml::to_string(cfg) {
        Ok(s) => {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Err(e) = fs::write(&path, s) {
                warn!(path = %path.display(), error = %e, "could not save config");
            }
        }
        Err(e) => warn!(error = %e, "could not serialize config"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let cfg = Config {
            language: "zh".to_string(),
            ascii_icons: true,
            show_indicator: true,
            fps: 30,
            glyph_x: Some("#".to_string()),
            glyph_o: None,
        };
        let s = toml::to_string(&cfg).unwrap();
        assert!(!s.contains("glyph_o"));
        assert_eq!(parse_config(&s).unwrap(), cfg);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg = parse_config("ascii_icons = true\n").unwrap();
        assert!(cfg.ascii_icons);
        assert_eq!(cfg.fps, 60);
        assert_eq!(cfg.glyph_x, None);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_config("fps = \"fast\"").is_err());
    }

    #[test]
    fn frame_interval_clamps() {
        let mut cfg = Config { fps: 0, ..Config::default() };
        assert_eq!(cfg.frame_interval(), Duration::from_secs(1));
        cfg.fps = 10_000;
        assert_eq!(cfg.frame_interval(), Duration::from_micros(1_000_000 / 240));
        cfg.fps = 60;
        assert_eq!(cfg.frame_interval(), Duration::from_micros(16_666));
    }
}
