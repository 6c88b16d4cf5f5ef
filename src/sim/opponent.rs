//! Scripted opponent
//!
//! Each difficulty tier is a fixed parameter tuple. Every tick the policy may
//! miss outright, ignore the ball, or pick a target y (predicted or noisy) and
//! step the paddle toward it at a fixed speed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::predict_y;
use super::state::{Ball, Paddle};
use crate::consts::OPPONENT_DEAD_ZONE;

/// AI difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "1" => Some(Difficulty::Easy),
            "medium" | "med" | "2" => Some(Difficulty::Medium),
            "hard" | "3" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Unrecognized names fall back to medium
    pub fn parse_name_or_default(s: &str) -> Self {
        Self::parse_name(s).unwrap_or_else(|| {
            log::warn!("Unknown difficulty '{}', using medium", s);
            Difficulty::default()
        })
    }

    pub fn params(&self) -> OpponentParams {
        match self {
            Difficulty::Easy => OpponentParams {
                prediction_chance: 0.15,
                speed: 3.0,
                reaction_chance: 0.5,
                error_magnitude: 0.6,
                miss_chance: 0.1,
            },
            Difficulty::Medium => OpponentParams {
                prediction_chance: 0.4,
                speed: 4.0,
                reaction_chance: 0.7,
                error_magnitude: 0.27,
                miss_chance: 0.06,
            },
            Difficulty::Hard => OpponentParams {
                prediction_chance: 0.8,
                speed: 6.0,
                reaction_chance: 0.92,
                error_magnitude: 0.1,
                miss_chance: 0.03,
            },
        }
    }
}

impl From<String> for Difficulty {
    fn from(s: String) -> Self {
        Self::parse_name_or_default(&s)
    }
}

impl From<Difficulty> for &'static str {
    fn from(d: Difficulty) -> Self {
        d.as_str()
    }
}

/// Tuning for one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpponentParams {
    /// Chance of using trajectory prediction instead of a noisy guess
    pub prediction_chance: f32,
    /// Paddle travel per tick
    pub speed: f32,
    /// Chance of reacting to an approaching ball
    pub reaction_chance: f32,
    /// Noise amplitude as a fraction of surface height
    pub error_magnitude: f32,
    /// Chance of skipping the tick entirely
    pub miss_chance: f32,
}

/// What the opponent did this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpponentDecision {
    /// Rolled a miss
    Missed,
    /// Ball not approaching, or no reaction
    Idle,
    /// Chased `target_y` (may not have moved inside the dead zone)
    Tracked { target_y: f32 },
}

/// Ball moving toward the paddle's x
pub fn is_approaching(ball: &Ball, paddle: &Paddle) -> bool {
    (ball.vel.x > 0.0 && paddle.x > ball.pos.x) || (ball.vel.x < 0.0 && paddle.x < ball.pos.x)
}

/// Run the policy for one tick, moving `paddle` in place
pub fn drive<R: Rng>(
    paddle: &mut Paddle,
    ball: &Ball,
    params: &OpponentParams,
    surface_height: f32,
    rng: &mut R,
) -> OpponentDecision {
    if rng.random::<f32>() < params.miss_chance {
        return OpponentDecision::Missed;
    }

    let approaching = is_approaching(ball, paddle);
    if rng.random::<f32>() > params.reaction_chance || !approaching {
        return OpponentDecision::Idle;
    }

    let target_y = if rng.random::<f32>() < params.prediction_chance {
        predict_y(ball, paddle.x, surface_height)
    } else {
        ball.pos.y + (rng.random::<f32>() - 0.5) * params.error_magnitude * surface_height
    };

    let center = paddle.center_y();
    if center < target_y - OPPONENT_DEAD_ZONE {
        paddle.move_by(params.speed, surface_height);
    } else if center > target_y + OPPONENT_DEAD_ZONE {
        paddle.move_by(-params.speed, surface_height);
    }

    OpponentDecision::Tracked { target_y }
}
