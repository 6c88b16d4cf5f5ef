//! Fixed-step simulation tick
//!
//! [`advance`] is the only entry point that moves the game forward. One call
//! per rendered frame.

use super::collision::{bounce_off_walls, out_of_bounds, paddle_hit};
use super::opponent;
use super::powerups;
use super::rounds::{self, LeaderboardSink};
use super::state::{GameEvent, GamePhase, GameState, Paddle, Side};
use crate::consts::*;
use crate::settings::GameMode;

/// Per-tick paddle control from a human
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum PaddleIntent {
    /// No input this tick
    #[default]
    Hold,
    /// Pointer-style: put the paddle center at this y
    Target(f32),
    /// Key-style impulses
    Up,
    Down,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: PaddleIntent,
    /// Ignored in single-player, where the opponent drives the right paddle
    pub right: PaddleIntent,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - the opponent policy also plays the left paddle
    pub idle_mode: bool,
    /// Wall-clock time (ms since epoch), stamped on leaderboard entries
    pub now_ms: f64,
}

/// Advance the game state by one tick.
///
/// Order within a tick: pause toggle, due scheduled events, human input,
/// power-up spawn roll, ball physics and scoring, pickups, opponent.
pub fn advance(state: &mut GameState, input: &TickInput, sink: &mut dyn LeaderboardSink) {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase() {
            GamePhase::Playing => {
                state.toggle_pause();
                return;
            }
            GamePhase::Paused => state.toggle_pause(),
            _ => {}
        }
    }

    // Clock is frozen in the menu and while paused
    match state.phase() {
        GamePhase::Menu | GamePhase::Paused => return,
        _ => {}
    }

    state.time_ticks += 1;
    fire_scheduled(state);

    if state.phase() != GamePhase::Playing {
        return;
    }

    apply_human_input(state, input);

    powerups::roll_spawn(state);

    if state.balls.is_empty() {
        log::debug!("No live balls, serving a fresh one");
        state.reset_balls(None);
    }

    match step_balls(state) {
        Some(scorer) => {
            rounds::award_point(state, scorer, input.now_ms, sink);
        }
        None => {
            powerups::collect(state);
        }
    }

    drive_opponents(state, input);
}

/// Fire everything due on this tick, in schedule order
fn fire_scheduled(state: &mut GameState) {
    for kind in state.schedule.take_due(state.time_ticks) {
        if kind.is_effect() {
            powerups::revert(state, kind);
        } else {
            rounds::fire_transition(state, kind);
        }
    }
}

fn apply_human_input(state: &mut GameState, input: &TickInput) {
    let h = state.surface.height;
    if !input.idle_mode {
        apply_intent(&mut state.left, input.left, h);
    }
    if state.match_state.mode == GameMode::Two {
        apply_intent(&mut state.right, input.right, h);
    }
}

fn apply_intent(paddle: &mut Paddle, intent: PaddleIntent, surface_height: f32) {
    match intent {
        PaddleIntent::Hold => {}
        PaddleIntent::Target(y) => paddle.set_center(y, surface_height),
        PaddleIntent::Up => paddle.move_by(-PADDLE_KEY_SPEED, surface_height),
        PaddleIntent::Down => paddle.move_by(PADDLE_KEY_SPEED, surface_height),
    }
}

/// Integrate, bounce and test every live ball. Stops at the first ball that
/// leaves the surface, so at most one point is scored per tick.
fn step_balls(state: &mut GameState) -> Option<Side> {
    let surface = state.surface;
    let mut hits = 0;
    let mut scorer = None;

    for ball in state.balls.iter_mut() {
        ball.pos += ball.vel;

        if bounce_off_walls(ball, surface.height) {
            state.events.push(GameEvent::Bounce);
        }

        let hit = paddle_hit(ball, &state.left).or_else(|| paddle_hit(ball, &state.right));
        if let Some(hit) = hit {
            ball.vel.x = hit.dx;
            ball.vel.y = hit.dy;
            hits += 1;
            state.events.push(GameEvent::Bounce);
        }

        if let Some(side) = out_of_bounds(ball, surface.width) {
            scorer = Some(side);
            break;
        }
    }

    rounds::register_hits(state, hits);
    scorer
}

fn drive_opponents(state: &mut GameState, input: &TickInput) {
    let h = state.surface.height;
    let Some(ball) = state.balls.first() else {
        return;
    };

    if state.match_state.mode == GameMode::Single {
        opponent::drive(&mut state.right, ball, &state.opponent, h, &mut state.rng);
    }
    if input.idle_mode {
        opponent::drive(&mut state.left, ball, &state.opponent, h, &mut state.rng);
    }
}
