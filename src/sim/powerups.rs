//! Power-up lifecycle: spawn roll, pickup, timed effect and its reversion

use glam::Vec2;
use rand::Rng;

use super::collision::power_up_hit;
use super::schedule::ScheduledKind;
use super::state::{GameEvent, GameState, HUMAN_SIDE, PowerUp, PowerUpKind, Side};
use crate::consts::*;

/// Paddle that paddle effects land on. Pickup is side-agnostic: any ball
/// touching a power-up affects player one's paddle.
pub fn target_side() -> Side {
    HUMAN_SIDE
}

/// Advance the spawn cooldown and maybe drop a power-up.
///
/// Once the cooldown is exceeded every tick rolls independently; the counter
/// restarts when a power-up spawns.
pub fn roll_spawn(state: &mut GameState) -> Option<PowerUpKind> {
    state.powerup_timer += 1;
    if state.powerup_timer <= POWERUP_COOLDOWN_TICKS
        || !state.rng.random_bool(POWERUP_SPAWN_CHANCE)
    {
        return None;
    }
    state.powerup_timer = 0;

    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    let inset = POWERUP_SPAWN_INSET;
    let x = inset + state.rng.random::<f32>() * (state.surface.width - 2.0 * inset).max(0.0);
    let y = inset + state.rng.random::<f32>() * (state.surface.height - 2.0 * inset).max(0.0);
    spawn(state, kind, Vec2::new(x, y));
    Some(kind)
}

/// Place a power-up marker
pub fn spawn(state: &mut GameState, kind: PowerUpKind, pos: Vec2) -> u32 {
    let id = state.next_entity_id();
    state.power_ups.push(PowerUp {
        id,
        kind,
        pos,
        size: POWERUP_SIZE,
        active: true,
        spawn_tick: state.time_ticks,
    });
    state.push_event(GameEvent::PowerUpSpawned { kind });
    log::debug!("Power-up {} spawned at ({:.0}, {:.0})", kind.label(), pos.x, pos.y);
    id
}

/// Deactivate every power-up a ball touches, purge them, then apply their
/// effects in pickup order. Returns the kinds collected.
pub fn collect(state: &mut GameState) -> Vec<PowerUpKind> {
    let mut collected: Vec<PowerUpKind> = Vec::new();
    for ball in &state.balls {
        for power_up in state.power_ups.iter_mut() {
            if power_up_hit(ball, power_up) {
                power_up.active = false;
                collected.push(power_up.kind);
            }
        }
    }
    state.power_ups.retain(|p| p.active);

    for &kind in &collected {
        apply(state, kind);
    }
    collected
}

/// Apply an effect now and schedule its reversion.
///
/// Repeated pickups of the same kind compound multiplicatively; each one
/// reverts its own factor when its timer fires.
pub fn apply(state: &mut GameState, kind: PowerUpKind) {
    let now = state.time_ticks;
    let h = state.surface.height;
    log::debug!("Power-up {} applied", kind.label());
    state.push_event(GameEvent::PowerUp { kind });

    match kind {
        PowerUpKind::PaddleGrow | PowerUpKind::PaddleShrink => {
            let factor = if kind == PowerUpKind::PaddleGrow {
                GROW_FACTOR
            } else {
                SHRINK_FACTOR
            };
            let side = target_side();
            state.paddle_mut(side).scale_height(factor, h);
            state.schedule.push(
                ScheduledKind::RevertPaddleHeight { side, factor },
                now + PADDLE_EFFECT_TICKS,
            );
        }
        PowerUpKind::MultiBall => {
            if state.balls.len() < MAX_BALLS {
                let ball = state.serve_ball(None);
                state.balls.push(ball);
                state
                    .schedule
                    .push(ScheduledKind::RemoveExtraBall, now + MULTI_BALL_TICKS);
            }
        }
        PowerUpKind::SpeedUp | PowerUpKind::SpeedDown => {
            let factor = if kind == PowerUpKind::SpeedUp {
                SPEED_UP_FACTOR
            } else {
                SPEED_DOWN_FACTOR
            };
            for ball in state.balls.iter_mut() {
                ball.scale_speed(factor);
            }
            state.schedule.push(
                ScheduledKind::RevertBallSpeed { factor },
                now + SPEED_EFFECT_TICKS,
            );
        }
    }
}

/// Undo a scheduled effect against whatever state exists now.
/// Phase transitions are ignored here.
pub fn revert(state: &mut GameState, kind: ScheduledKind) {
    let h = state.surface.height;
    match kind {
        ScheduledKind::RevertPaddleHeight { side, factor } => {
            state.paddle_mut(side).scale_height(1.0 / factor, h);
            log::debug!("Paddle height effect on {:?} expired", side);
        }
        ScheduledKind::RemoveExtraBall => {
            if state.balls.len() > 1 {
                state.balls.pop();
            }
            log::debug!("Multi-ball expired, {} ball(s) live", state.balls.len());
        }
        ScheduledKind::RevertBallSpeed { factor } => {
            for ball in state.balls.iter_mut() {
                ball.scale_speed(1.0 / factor);
            }
            log::debug!("Ball speed effect expired");
        }
        ScheduledKind::ResumeRound | ScheduledKind::ResetMatch => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;

    fn playing_state() -> GameState {
        let mut state = GameState::new(2024);
        state.match_state.phase = GamePhase::Playing;
        state
    }

    fn fire_all(state: &mut GameState) {
        for kind in state.schedule.take_due(u64::MAX) {
            revert(state, kind);
        }
    }

    #[test]
    fn test_no_spawn_before_cooldown() {
        let mut state = playing_state();
        for _ in 0..POWERUP_COOLDOWN_TICKS {
            assert!(roll_spawn(&mut state).is_none());
        }
        assert!(state.power_ups.is_empty());
    }

    #[test]
    fn test_spawn_eventually_and_resets_timer() {
        let mut state = playing_state();
        let mut spawned = None;
        for _ in 0..100_000 {
            if let Some(kind) = roll_spawn(&mut state) {
                spawned = Some(kind);
                break;
            }
        }
        assert!(spawned.is_some());
        assert_eq!(state.powerup_timer, 0);
        assert_eq!(state.power_ups.len(), 1);

        let p = &state.power_ups[0];
        assert!(p.active);
        let inset = POWERUP_SPAWN_INSET;
        assert!(p.pos.x >= inset && p.pos.x <= state.surface.width - inset);
        assert!(p.pos.y >= inset && p.pos.y <= state.surface.height - inset);
    }

    #[test]
    fn test_pickup_deactivates_once() {
        let mut state = playing_state();
        let pos = state.balls[0].pos;
        spawn(&mut state, PowerUpKind::SpeedDown, pos);

        assert_eq!(collect(&mut state), vec![PowerUpKind::SpeedDown]);
        assert!(state.power_ups.is_empty());

        // Ball still sits on the old spot: nothing left to pick up
        assert!(collect(&mut state).is_empty());
        assert_eq!(
            state
                .events()
                .iter()
                .filter(|e| matches!(e, GameEvent::PowerUp { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_multi_ball_adds_then_removes() {
        let mut state = playing_state();
        assert_eq!(state.balls.len(), 1);

        apply(&mut state, PowerUpKind::MultiBall);
        assert_eq!(state.balls.len(), 2);

        fire_all(&mut state);
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_multi_ball_capped() {
        let mut state = playing_state();
        for _ in 0..5 {
            apply(&mut state, PowerUpKind::MultiBall);
        }
        assert_eq!(state.balls.len(), MAX_BALLS);
        // Only successful spawns schedule a removal
        assert_eq!(state.schedule.len(), MAX_BALLS - 1);

        fire_all(&mut state);
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_remove_extra_ball_never_below_one() {
        let mut state = playing_state();
        revert(&mut state, ScheduledKind::RemoveExtraBall);
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_paddle_grow_and_revert() {
        let mut state = playing_state();
        let base = state.left.height;

        apply(&mut state, PowerUpKind::PaddleGrow);
        assert!((state.left.height - base * GROW_FACTOR).abs() < 1e-3);
        assert_eq!(state.right.height, base);

        fire_all(&mut state);
        assert!((state.left.height - base).abs() < 1e-3);
    }

    #[test]
    fn test_paddle_effects_compound() {
        let mut state = playing_state();
        let base = state.left.height;

        apply(&mut state, PowerUpKind::PaddleShrink);
        apply(&mut state, PowerUpKind::PaddleShrink);
        assert!((state.left.height - base * SHRINK_FACTOR * SHRINK_FACTOR).abs() < 1e-3);

        fire_all(&mut state);
        assert!((state.left.height - base).abs() < 1e-3);
    }

    #[test]
    fn test_speed_up_rescales_velocity() {
        let mut state = playing_state();
        let dir = state.balls[0].vel.normalize();

        apply(&mut state, PowerUpKind::SpeedUp);
        let ball = &state.balls[0];
        assert!((ball.speed - BALL_START_SPEED * SPEED_UP_FACTOR).abs() < 1e-4);
        assert!(ball.vel.normalize().abs_diff_eq(dir, 1e-5));

        fire_all(&mut state);
        assert!((state.balls[0].speed - BALL_START_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_reversion_fires_at_duration() {
        let mut state = playing_state();
        state.time_ticks = 100;
        apply(&mut state, PowerUpKind::SpeedDown);

        assert!(state.schedule.take_due(100 + SPEED_EFFECT_TICKS - 1).is_empty());
        assert_eq!(
            state.schedule.take_due(100 + SPEED_EFFECT_TICKS),
            vec![ScheduledKind::RevertBallSpeed {
                factor: SPEED_DOWN_FACTOR
            }]
        );
    }
}
