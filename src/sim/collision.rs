//! Collision detection and response
//!
//! Narrow-phase checks between the ball (a circle) and the static board
//! geometry: circular pegs and straight wall segments.

use glam::Vec2;

use super::layout::{Peg, Wall};
use crate::closest_point_on_segment;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Collision point (if hit)
    pub point: Vec2,
    /// Surface normal at collision (pointing toward ball center)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between a ball and a peg
pub fn ball_peg_collision(ball_pos: Vec2, ball_radius: f32, peg: &Peg) -> CollisionResult {
    let offset = ball_pos - peg.pos;
    let reach = ball_radius + peg.radius;
    let dist_sq = offset.length_squared();
    if dist_sq >= reach * reach {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    // Ball centre exactly on the peg: push it straight up
    let normal = if dist > 0.0001 { offset / dist } else { Vec2::NEG_Y };
    CollisionResult {
        hit: true,
        point: peg.pos + normal * peg.radius,
        normal,
        penetration: reach - dist,
    }
}

/// Check collision between a ball and a wall segment
///
/// `inside` is any point on the playable side of the wall. Alongside the
/// segment the wall acts as a one-sided half-plane, so a ball that crossed
/// it within one step is pushed back in rather than out.
pub fn ball_wall_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    wall: &Wall,
    inside: Vec2,
) -> CollisionResult {
    let line = wall.end - wall.start;
    let len_sq = line.length_squared();
    if len_sq < 0.0001 {
        return CollisionResult::miss(); // Degenerate segment
    }

    let mut inward = Vec2::new(-line.y, line.x) / len_sq.sqrt();
    if inward.dot(inside - wall.start) < 0.0 {
        inward = -inward;
    }

    let t = (ball_pos - wall.start).dot(line) / len_sq;
    if (0.0..=1.0).contains(&t) {
        let signed_dist = (ball_pos - wall.start).dot(inward);
        if signed_dist >= ball_radius {
            return CollisionResult::miss();
        }
        return CollisionResult {
            hit: true,
            point: wall.start + line * t,
            normal: inward,
            penetration: ball_radius - signed_dist,
        };
    }

    // Past either end: the endpoint behaves like a point obstacle
    let closest = closest_point_on_segment(ball_pos, wall.start, wall.end);
    let offset = ball_pos - closest;
    let dist = offset.length();
    if dist >= ball_radius {
        return CollisionResult::miss();
    }
    let normal = if dist > 0.0001 { offset / dist } else { inward };
    CollisionResult {
        hit: true,
        point: closest,
        normal,
        penetration: ball_radius - dist,
    }
}

/// Bounce velocity off a surface with energy loss
///
/// The normal component is reversed and scaled by `restitution`, the
/// tangential component is scaled by `1 - friction`. A ball already moving
/// away from the surface is left untouched.
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, restitution: f32, friction: f32) -> Vec2 {
    let vn = velocity.dot(normal);
    if vn >= 0.0 {
        return velocity;
    }
    let normal_part = normal * vn;
    let tangent_part = velocity - normal_part;
    tangent_part * (1.0 - friction) - normal_part * restitution
}
