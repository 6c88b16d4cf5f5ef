//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-tick step only
//! - Seeded RNG only
//! - Deferred effects fire from the tick-keyed schedule, between ticks
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod opponent;
pub mod powerups;
pub mod rounds;
pub mod schedule;
pub mod state;
pub mod tick;

pub use collision::{PaddleHit, deflection_dy, paddle_hit, predict_y};
pub use opponent::{Difficulty, OpponentDecision, OpponentParams};
pub use rounds::{LeaderboardSink, MatchResult, PointOutcome};
pub use schedule::{Schedule, ScheduledEvent, ScheduledKind};
pub use state::{
    Achievement, Ball, GameEvent, GamePhase, GameState, HUMAN_SIDE, MatchState, Paddle, PowerUp,
    PowerUpKind, Side, SideScore, Snapshot, Stats, Surface,
};
pub use tick::{PaddleIntent, TickInput, advance};
