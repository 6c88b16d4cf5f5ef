//! Duel Pong - a two-paddle arcade game with rounds and power-ups
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, opponent, match state)
//! - `settings`: Player configuration with silent fallback to defaults
//! - `leaderboard`: Top match results
//! - `persistence`: Save/load with a versioned envelope

pub mod leaderboard;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use leaderboard::Leaderboard;
pub use settings::{GameMode, Settings, Theme};

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second (one tick per rendered frame)
    pub const TICKS_PER_SEC: u32 = 60;

    /// Default surface dimensions
    pub const SURFACE_WIDTH: f32 = 800.0;
    pub const SURFACE_HEIGHT: f32 = 500.0;
    /// Smallest surface the game will lay itself out on
    pub const MIN_SURFACE_WIDTH: f32 = 340.0;
    pub const MIN_SURFACE_HEIGHT: f32 = 215.0;

    /// Paddle defaults (sized against the default surface)
    pub const PADDLE_WIDTH: f32 = 0.018 * SURFACE_WIDTH;
    pub const PADDLE_HEIGHT: f32 = 0.18 * SURFACE_HEIGHT;
    /// Gap between a paddle and its side of the surface
    pub const PADDLE_INSET: f32 = 10.0;
    /// Paddle travel per key impulse tick
    pub const PADDLE_KEY_SPEED: f32 = 7.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 0.036 * SURFACE_WIDTH;
    pub const BALL_START_SPEED: f32 = 6.0;
    /// Live balls never exceed this
    pub const MAX_BALLS: usize = 3;

    /// Points needed to take a round
    pub const POINTS_PER_ROUND: u32 = 5;
    pub const DEFAULT_ROUNDS_TO_WIN: u32 = 3;

    /// Power-up spawning
    pub const POWERUP_COOLDOWN_TICKS: u32 = 240;
    pub const POWERUP_SPAWN_CHANCE: f64 = 0.01;
    pub const POWERUP_SPAWN_INSET: f32 = 40.0;
    pub const POWERUP_SIZE: f32 = 32.0;
    /// Half-extent of the square pickup region
    pub const POWERUP_HIT_EXTENT: f32 = 30.0;

    /// Effect magnitudes
    pub const GROW_FACTOR: f32 = 1.3;
    pub const SHRINK_FACTOR: f32 = 0.7;
    pub const SPEED_UP_FACTOR: f32 = 1.3;
    pub const SPEED_DOWN_FACTOR: f32 = 0.7;

    /// Effect durations (ticks)
    pub const PADDLE_EFFECT_TICKS: u64 = 7 * TICKS_PER_SEC as u64;
    pub const SPEED_EFFECT_TICKS: u64 = 7 * TICKS_PER_SEC as u64;
    pub const MULTI_BALL_TICKS: u64 = 6 * TICKS_PER_SEC as u64;

    /// Phase auto-transition delays (ticks): 1.2s and 2.2s
    pub const INTERMISSION_TICKS: u64 = 72;
    pub const MATCH_OVER_TICKS: u64 = 132;

    /// Opponent tuning
    pub const OPPONENT_DEAD_ZONE: f32 = 10.0;
    pub const PREDICTION_STEP_LIMIT: u32 = 2000;

    /// Achievement thresholds
    pub const HIT_ACHIEVEMENT: u64 = 100;
    pub const STREAK_ACHIEVEMENT: u32 = 3;
}
