//! Game settings and preferences
//!
//! Persisted separately from the leaderboard. Anything malformed falls back
//! to its default without surfacing an error.

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::{self, PersistError};
use crate::sim::Difficulty;
use crate::sim::state::Surface;

/// Single-player against the scripted opponent, or two humans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "&'static str")]
pub enum GameMode {
    #[default]
    Single,
    Two,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Single => "single",
            GameMode::Two => "two",
        }
    }

    pub fn parse_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "single" | "1p" | "one" => Some(GameMode::Single),
            "two" | "2p" => Some(GameMode::Two),
            _ => None,
        }
    }
}

impl From<String> for GameMode {
    fn from(s: String) -> Self {
        GameMode::parse_name(&s).unwrap_or_else(|| {
            log::warn!("Unknown game mode '{}', using single-player", s);
            GameMode::default()
        })
    }
}

impl From<GameMode> for &'static str {
    fn from(mode: GameMode) -> Self {
        mode.as_str()
    }
}

/// Cosmetic colors, CSS hex strings. Never read by the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub left: String,
    pub right: String,
    pub ball: String,
    pub background: String,
    pub net: String,
    pub score: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            left: "#32e6e6".into(),
            right: "#ff5555".into(),
            ball: "#ffffff".into(),
            background: "#111".into(),
            net: "#888".into(),
            score: "#fff".into(),
        }
    }
}

/// `#rgb` or `#rrggbb`
pub fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => {
            (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

impl Theme {
    /// Replace invalid colors with their defaults
    pub fn sanitize(&mut self) {
        let defaults = Theme::default();
        let fields = [
            (&mut self.left, defaults.left),
            (&mut self.right, defaults.right),
            (&mut self.ball, defaults.ball),
            (&mut self.background, defaults.background),
            (&mut self.net, defaults.net),
            (&mut self.score, defaults.score),
        ];
        for (value, default) in fields {
            if !is_hex_color(value) {
                log::warn!("Invalid color '{}', using {}", value, default);
                *value = default;
            }
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: GameMode,
    /// Opponent tier (single-player)
    pub difficulty: Difficulty,
    pub rounds_to_win: u32,

    // === Cosmetic ===
    pub theme: Theme,

    // === Audio ===
    /// Sound effects on/off (read by the audio collaborator only)
    pub sound_on: bool,
    pub music_on: bool,

    // === Surface ===
    pub surface_width: f32,
    pub surface_height: f32,

    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: GameMode::Single,
            difficulty: Difficulty::Medium,
            rounds_to_win: DEFAULT_ROUNDS_TO_WIN,

            theme: Theme::default(),

            sound_on: true,
            music_on: true,

            surface_width: SURFACE_WIDTH,
            surface_height: SURFACE_HEIGHT,

            seed: None,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "duel_pong_settings";

    /// Parse settings, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(mut settings) => {
                settings.sanitize();
                settings
            }
            Err(e) => {
                log::warn!("Malformed settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Clamp everything into range
    pub fn sanitize(&mut self) {
        if self.rounds_to_win == 0 {
            log::warn!("rounds_to_win must be at least 1, using default");
            self.rounds_to_win = DEFAULT_ROUNDS_TO_WIN;
        }
        if !self.surface_width.is_finite() {
            self.surface_width = SURFACE_WIDTH;
        }
        if !self.surface_height.is_finite() {
            self.surface_height = SURFACE_HEIGHT;
        }
        self.surface_width = self.surface_width.max(MIN_SURFACE_WIDTH);
        self.surface_height = self.surface_height.max(MIN_SURFACE_HEIGHT);
        self.theme.sanitize();
    }

    pub fn surface(&self) -> Surface {
        Surface {
            width: self.surface_width,
            height: self.surface_height,
        }
    }

    pub fn toggle_sound(&mut self) {
        self.sound_on = !self.sound_on;
    }

    pub fn toggle_music(&mut self) {
        self.music_on = !self.music_on;
    }

    /// Load saved settings, or defaults if none/invalid
    pub fn load() -> Self {
        Self::from_stored(persistence::load::<Settings>(Self::STORAGE_KEY))
    }

    pub fn save(&self) {
        Self::log_saved(persistence::save(Self::STORAGE_KEY, self));
    }

    /// Like [`Settings::load`], reading from `dir` instead of the data dir
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(dir: &Path) -> Self {
        Self::from_stored(persistence::load_in::<Settings>(dir, Self::STORAGE_KEY))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, dir: &Path) {
        Self::log_saved(persistence::save_in(dir, Self::STORAGE_KEY, self));
    }

    fn from_stored(stored: Result<Option<Settings>, PersistError>) -> Self {
        match stored {
            Ok(Some(mut settings)) => {
                settings.sanitize();
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not load settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    fn log_saved(result: Result<(), PersistError>) {
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {}", e),
        }
    }
}
