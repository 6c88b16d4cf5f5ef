//! Collision detection and response for the rectangular court
//!
//! Balls are tested by their bounding box: walls reflect `dy`, paddles
//! replace the velocity outright with a deflection driven by where the ball
//! struck the paddle face.

use super::state::{Ball, Paddle, PowerUp, Side};
use crate::consts::*;

/// Result of a paddle strike
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleHit {
    /// Ball center relative to paddle center (negative = above)
    pub offset: f32,
    /// New horizontal velocity
    pub dx: f32,
    /// New vertical velocity
    pub dy: f32,
}

/// Reflect off the top/bottom bounds.
///
/// `dy` is negated only when the leading edge is past a bound *and* the ball
/// is still heading out, so a ball that overshot cannot flip back and forth.
/// Returns true when a bounce happened.
pub fn bounce_off_walls(ball: &mut Ball, surface_height: f32) -> bool {
    let r = ball.radius();
    let past_top = ball.pos.y - r < 0.0 && ball.vel.y < 0.0;
    let past_bottom = ball.pos.y + r > surface_height && ball.vel.y > 0.0;
    if past_top || past_bottom {
        ball.vel.y = -ball.vel.y;
        true
    } else {
        false
    }
}

/// Ball's horizontal edge is past the paddle's inner face and the vertical
/// extents overlap
pub fn paddle_overlap(ball: &Ball, paddle: &Paddle) -> bool {
    let r = ball.radius();
    let crossed = match paddle.side {
        Side::Left => ball.pos.x - r < paddle.inner_edge(),
        Side::Right => ball.pos.x + r > paddle.inner_edge(),
    };
    crossed && ball.pos.y + r > paddle.y && ball.pos.y - r < paddle.y + paddle.height
}

/// Vertical velocity after a strike: linear in the offset from the paddle
/// center, `-speed` at the top edge, `0` dead center, `+speed` at the bottom.
pub fn deflection_dy(ball_y: f32, paddle: &Paddle, speed: f32) -> f32 {
    let half = paddle.height / 2.0;
    (ball_y - paddle.center_y()) / half * speed
}

/// Test a ball against a paddle and compute the outgoing velocity
pub fn paddle_hit(ball: &Ball, paddle: &Paddle) -> Option<PaddleHit> {
    if !paddle_overlap(ball, paddle) {
        return None;
    }
    // Always leave heading away from the struck paddle
    let dx = -paddle.side.direction() * ball.speed.abs();
    Some(PaddleHit {
        offset: ball.pos.y - paddle.center_y(),
        dx,
        dy: deflection_dy(ball.pos.y, paddle, ball.speed),
    })
}

/// Side that scores if the ball's center has left the surface
pub fn out_of_bounds(ball: &Ball, surface_width: f32) -> Option<Side> {
    if ball.pos.x < 0.0 {
        Some(Side::Right)
    } else if ball.pos.x > surface_width {
        Some(Side::Left)
    } else {
        None
    }
}

/// Ball center inside the power-up's square pickup region
pub fn power_up_hit(ball: &Ball, power_up: &PowerUp) -> bool {
    power_up.active
        && (ball.pos.x - power_up.pos.x).abs() < POWERUP_HIT_EXTENT
        && (ball.pos.y - power_up.pos.y).abs() < POWERUP_HIT_EXTENT
}

/// Where the ball will cross `target_x`, following wall reflections step by
/// step. Gives up after `PREDICTION_STEP_LIMIT` steps.
pub fn predict_y(ball: &Ball, target_x: f32, surface_height: f32) -> f32 {
    let mut ghost = ball.clone();
    let mut steps = 0;
    while (ghost.vel.x > 0.0 && ghost.pos.x < target_x)
        || (ghost.vel.x < 0.0 && ghost.pos.x > target_x)
    {
        ghost.pos += ghost.vel;
        bounce_off_walls(&mut ghost, surface_height);
        steps += 1;
        if steps > PREDICTION_STEP_LIMIT {
            break;
        }
    }
    ghost.pos.y
}
