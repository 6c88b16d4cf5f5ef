//! Game state and core simulation types
//!
//! Everything the tick mutates lives in [`GameState`]; collaborators read it
//! through [`GameState::snapshot`] and drain [`GameEvent`]s after each tick.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::opponent::{Difficulty, OpponentParams};
use super::schedule::Schedule;
use crate::consts::*;
use crate::settings::{GameMode, Settings};

/// Which end of the surface a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Sign of `dx` for a ball travelling toward this side
    pub fn direction(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// The paddle controlled by the human in single-player
pub const HUMAN_SIDE: Side = Side::Left;

/// Playable area; only spawn bounds and clamping depend on it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,
        }
    }
}

impl Surface {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// A paddle: fixed x, vertical travel only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    /// Current height (power-ups scale it)
    pub height: f32,
    /// Height restored on round reset
    pub base_height: f32,
}

impl Paddle {
    /// Paddle centered vertically on its side of the surface
    pub fn new(side: Side, surface: Surface) -> Self {
        let x = match side {
            Side::Left => PADDLE_INSET,
            Side::Right => surface.width - PADDLE_INSET - PADDLE_WIDTH,
        };
        Self {
            side,
            x,
            y: surface.height / 2.0 - PADDLE_HEIGHT / 2.0,
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            base_height: PADDLE_HEIGHT,
        }
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// The face a ball strikes
    pub fn inner_edge(&self) -> f32 {
        match self.side {
            Side::Left => self.x + self.width,
            Side::Right => self.x,
        }
    }

    /// Keep `0 <= y <= surface_height - height`
    pub fn clamp(&mut self, surface_height: f32) {
        let max_y = (surface_height - self.height).max(0.0);
        self.y = self.y.clamp(0.0, max_y);
    }

    pub fn move_by(&mut self, dy: f32, surface_height: f32) {
        self.y += dy;
        self.clamp(surface_height);
    }

    pub fn set_center(&mut self, center_y: f32, surface_height: f32) {
        self.y = center_y - self.height / 2.0;
        self.clamp(surface_height);
    }

    /// Multiply height in place, keeping the top edge where it is
    pub fn scale_height(&mut self, factor: f32, surface_height: f32) {
        self.height *= factor;
        self.clamp(surface_height);
    }

    pub fn reset_height(&mut self, surface_height: f32) {
        self.height = self.base_height;
        self.clamp(surface_height);
    }

    /// Recenter and restore height
    pub fn recenter(&mut self, surface_height: f32) {
        self.height = self.base_height;
        self.y = surface_height / 2.0 - self.height / 2.0;
        self.clamp(surface_height);
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    /// Per-tick displacement
    pub vel: Vec2,
    /// Diameter
    pub size: f32,
    /// Scalar speed; `vel` is rescaled whenever it changes
    pub speed: f32,
}

impl Ball {
    /// Fresh ball at the surface center.
    ///
    /// `toward` fixes the horizontal direction; `None` picks one at random.
    /// The vertical component is always random within half the speed.
    pub fn serve<R: Rng>(id: u32, surface: Surface, toward: Option<Side>, rng: &mut R) -> Self {
        let speed = BALL_START_SPEED;
        let dir = match toward {
            Some(side) => side.direction(),
            None => {
                if rng.random_bool(0.5) {
                    -1.0
                } else {
                    1.0
                }
            }
        };
        let dy = (rng.random::<f32>() - 0.5) * speed;
        Self {
            id,
            pos: surface.center(),
            vel: Vec2::new(dir * speed, dy),
            size: BALL_SIZE,
            speed,
        }
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Multiply speed, rescaling velocity so the travel angle is kept
    pub fn scale_speed(&mut self, factor: f32) {
        self.speed *= factor;
        self.vel *= factor;
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    PaddleGrow,
    PaddleShrink,
    MultiBall,
    SpeedUp,
    SpeedDown,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::PaddleGrow,
        PowerUpKind::PaddleShrink,
        PowerUpKind::MultiBall,
        PowerUpKind::SpeedUp,
        PowerUpKind::SpeedDown,
    ];

    /// Short marker label for the renderer
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::PaddleGrow => "paddle+",
            PowerUpKind::PaddleShrink => "paddle-",
            PowerUpKind::MultiBall => "multi",
            PowerUpKind::SpeedUp => "speed+",
            PowerUpKind::SpeedDown => "speed-",
        }
    }
}

/// A power-up marker on the surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub size: f32,
    pub active: bool,
    pub spawn_tick: u64,
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a match to be started
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Short break after a round is won
    Intermission,
    /// Match decided, auto-resets after a delay
    MatchOver,
}

/// Per-side tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideScore {
    /// Points in the current round
    pub score: u32,
    pub rounds_won: u32,
}

/// Cumulative stats, tracked from the human side's point of view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Paddle hits by either side
    pub hits: u64,
    pub games_played: u32,
    pub games_won: u32,
    pub streak: u32,
    pub max_streak: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Achievement {
    FirstWin,
    WinStreak,
    HundredHits,
}

impl Achievement {
    /// Stable identifier shown to the player
    pub fn id(&self) -> &'static str {
        match self {
            Achievement::FirstWin => "First Win",
            Achievement::WinStreak => "3-Win Streak",
            Achievement::HundredHits => "100 Hits",
        }
    }
}

/// Scores, rounds and phase; owned exclusively by the round state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub mode: GameMode,
    pub phase: GamePhase,
    pub left: SideScore,
    pub right: SideScore,
    /// 1-based round number
    pub round: u32,
    pub rounds_to_win: u32,
    pub stats: Stats,
    pub achievements: BTreeSet<Achievement>,
}

impl MatchState {
    pub fn new(mode: GameMode, rounds_to_win: u32) -> Self {
        Self {
            mode,
            phase: GamePhase::Menu,
            left: SideScore::default(),
            right: SideScore::default(),
            round: 1,
            rounds_to_win,
            stats: Stats::default(),
            achievements: BTreeSet::new(),
        }
    }

    pub fn side(&self, side: Side) -> &SideScore {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideScore {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Clear points and rounds, back to round 1
    pub fn reset_scores(&mut self) {
        self.left = SideScore::default();
        self.right = SideScore::default();
        self.round = 1;
    }
}

/// Things that happened during a tick, for audio/UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off a wall or paddle
    Bounce,
    /// A point was scored
    Score { scorer: Side },
    /// A power-up was picked up and applied
    PowerUp { kind: PowerUpKind },
    /// A power-up appeared on the surface
    PowerUpSpawned { kind: PowerUpKind },
    /// `round` is the round that was just won
    RoundWon { winner: Side, round: u32 },
    MatchWon { winner: Side, rounds_won: u32 },
    AchievementUnlocked(Achievement),
}

impl GameEvent {
    /// Sound cue name, if this event has one
    pub fn sound_name(&self) -> Option<&'static str> {
        match self {
            GameEvent::Bounce => Some("bounce"),
            GameEvent::Score { .. } => Some("score"),
            GameEvent::PowerUp { .. } => Some("powerup"),
            _ => None,
        }
    }
}

/// Read-only view for the renderer
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub surface: Surface,
    pub left_paddle: &'a Paddle,
    pub right_paddle: &'a Paddle,
    pub balls: &'a [Ball],
    pub power_ups: &'a [PowerUp],
    pub left: SideScore,
    pub right: SideScore,
    pub round: u32,
    pub rounds_to_win: u32,
    pub phase: GamePhase,
    pub mode: GameMode,
}

/// Complete simulation context, owned by the caller
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation clock; frozen while paused or in the menu
    pub time_ticks: u64,
    pub surface: Surface,
    pub left: Paddle,
    pub right: Paddle,
    /// Live balls, never more than `MAX_BALLS`
    pub balls: Vec<Ball>,
    pub power_ups: Vec<PowerUp>,
    /// Ticks since the last power-up spawn
    pub powerup_timer: u32,
    /// Pending reversions and phase transitions
    pub schedule: Schedule,
    pub match_state: MatchState,
    pub difficulty: Difficulty,
    pub opponent: OpponentParams,
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with default settings
    pub fn new(seed: u64) -> Self {
        Self::with_settings(&Settings::default(), seed)
    }

    pub fn with_settings(settings: &Settings, seed: u64) -> Self {
        let surface = settings.surface();
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            surface,
            left: Paddle::new(Side::Left, surface),
            right: Paddle::new(Side::Right, surface),
            balls: Vec::new(),
            power_ups: Vec::new(),
            powerup_timer: 0,
            schedule: Schedule::default(),
            match_state: MatchState::new(settings.mode, settings.rounds_to_win),
            difficulty: settings.difficulty,
            opponent: settings.difficulty.params(),
            events: Vec::new(),
            next_id: 1,
        };

        let ball = state.serve_ball(None);
        state.balls.push(ball);

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn phase(&self) -> GamePhase {
        self.match_state.phase
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Build a ball at center; see [`Ball::serve`]
    pub fn serve_ball(&mut self, toward: Option<Side>) -> Ball {
        let id = self.next_entity_id();
        Ball::serve(id, self.surface, toward, &mut self.rng)
    }

    /// Replace the live set with one fresh ball
    pub fn reset_balls(&mut self, toward: Option<Side>) {
        let ball = self.serve_ball(toward);
        self.balls.clear();
        self.balls.push(ball);
    }

    /// Round reset after a score: fresh ball, no power-ups, pending effect
    /// reversions dropped and paddles back to their base height.
    pub fn reset_field(&mut self, toward: Option<Side>) {
        self.reset_balls(toward);
        self.power_ups.clear();
        self.schedule.cancel_effects();
        let h = self.surface.height;
        self.left.reset_height(h);
        self.right.reset_height(h);
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.opponent = difficulty.params();
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events emitted by the last tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take the events emitted by the last tick
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            surface: self.surface,
            left_paddle: &self.left,
            right_paddle: &self.right,
            balls: &self.balls,
            power_ups: &self.power_ups,
            left: self.match_state.left,
            right: self.match_state.right,
            round: self.match_state.round,
            rounds_to_win: self.match_state.rounds_to_win,
            phase: self.match_state.phase,
            mode: self.match_state.mode,
        }
    }
}
