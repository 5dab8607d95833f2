//! Physics world
//!
//! Owns the static board geometry and the dynamic balls, and advances them on
//! a fixed step. Zones are sensors: they never touch a ball's trajectory,
//! they only latch the first zone each ball enters.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{ball_peg_collision, ball_wall_collision, bounce_velocity};
use super::layout::{BoardLayout, Peg, ScoringZone, Wall, nearest_zone};
use crate::settings::PhysicsSettings;

/// Opaque handle to a ball inside a [`PhysicsWorld`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BallHandle(u32);

/// A dynamic ball
#[derive(Debug, Clone, Serialize)]
pub struct Ball {
    pub handle: BallHandle,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Index of the first zone this ball entered; never overwritten
    pub zone_contact: Option<usize>,
}

/// Simulated space for one board
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    tuning: PhysicsSettings,
    pegs: Vec<Peg>,
    zones: Vec<ScoringZone>,
    walls: Vec<Wall>,
    /// A point on the playable side of every wall
    interior: Vec2,
    /// Active balls (sorted by handle for determinism)
    balls: Vec<Ball>,
    next_handle: u32,
    /// Simulation tick counter
    time_ticks: u64,
}

impl PhysicsWorld {
    /// Create an empty world with the given tuning
    pub fn new(tuning: PhysicsSettings) -> Self {
        Self {
            tuning,
            pegs: Vec::new(),
            zones: Vec::new(),
            walls: Vec::new(),
            interior: Vec2::ZERO,
            balls: Vec::new(),
            next_handle: 1,
            time_ticks: 0,
        }
    }

    /// Clear all bodies and install the given static geometry
    pub fn reset(&mut self, pegs: &[Peg], zones: &[ScoringZone], walls: &[Wall]) {
        self.balls.clear();
        self.pegs = pegs.to_vec();
        self.zones = zones.to_vec();
        self.walls = walls.to_vec();
        self.interior = interior_point(walls);
        log::debug!(
            "Physics world reset: {} pegs, {} zones, {} walls",
            self.pegs.len(),
            self.zones.len(),
            self.walls.len()
        );
    }

    /// Install a generated layout
    pub fn install(&mut self, layout: &BoardLayout) {
        self.reset(&layout.pegs, &layout.zones, &layout.walls);
    }

    /// Remove every body, static and dynamic
    pub fn clear(&mut self) {
        self.reset(&[], &[], &[]);
    }

    /// Insert a dynamic ball
    pub fn spawn_ball(&mut self, pos: Vec2, vel: Vec2, radius: f32) -> BallHandle {
        let handle = BallHandle(self.next_handle);
        self.next_handle += 1;
        self.balls.push(Ball {
            handle,
            pos,
            vel,
            radius,
            zone_contact: None,
        });
        handle
    }

    /// Delete a ball; returns it if it existed
    pub fn remove_ball(&mut self, handle: BallHandle) -> Option<Ball> {
        let idx = self.balls.iter().position(|b| b.handle == handle)?;
        Some(self.balls.remove(idx))
    }

    pub fn ball(&self, handle: BallHandle) -> Option<&Ball> {
        self.balls.iter().find(|b| b.handle == handle)
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn pegs(&self) -> &[Peg] {
        &self.pegs
    }

    pub fn zones(&self) -> &[ScoringZone] {
        &self.zones
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn tuning(&self) -> &PhysicsSettings {
        &self.tuning
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// First zone `handle` entered, if any
    pub fn first_zone_contact(&self, handle: BallHandle) -> Option<&ScoringZone> {
        let idx = self.ball(handle)?.zone_contact?;
        self.zones.get(idx)
    }

    /// Advance every ball by one step of `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        self.time_ticks += 1;
        let tuning = &self.tuning;

        for ball in &mut self.balls {
            // --- INTEGRATION ---
            ball.vel.y += tuning.gravity * dt;
            ball.vel *= (1.0 - tuning.air_drag * dt).max(0.0);
            ball.vel = ball.vel.clamp_length_max(tuning.max_speed);
            ball.pos += ball.vel * dt;

            // --- PEGS ---
            for peg in &self.pegs {
                let hit = ball_peg_collision(ball.pos, ball.radius, peg);
                if hit.hit {
                    ball.pos += hit.normal * hit.penetration;
                    ball.vel =
                        bounce_velocity(ball.vel, hit.normal, tuning.restitution, tuning.friction);
                }
            }

            // --- WALLS ---
            for wall in &self.walls {
                let hit = ball_wall_collision(ball.pos, ball.radius, wall, self.interior);
                if hit.hit {
                    ball.pos += hit.normal * hit.penetration;
                    ball.vel =
                        bounce_velocity(ball.vel, hit.normal, tuning.restitution, tuning.friction);
                }
            }

            // --- ZONE SENSORS ---
            if ball.zone_contact.is_none() {
                ball.zone_contact = entered_zone(&self.zones, ball.pos, ball.radius);
            }
        }
    }
}

/// Zone the ball overlaps; when straddling a boundary, the one under its centre
fn entered_zone(zones: &[ScoringZone], pos: Vec2, radius: f32) -> Option<usize> {
    let touching: Vec<ScoringZone> = zones
        .iter()
        .filter(|z| z.overlaps_circle(pos, radius))
        .copied()
        .collect();
    nearest_zone(&touching, pos.x)
}

/// Centre of the walls' bounding box
fn interior_point(walls: &[Wall]) -> Vec2 {
    let mut points = walls.iter().flat_map(|w| [w.start, w.end]);
    let Some(first) = points.next() else {
        return Vec2::ZERO;
    };
    let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
    (min + max) / 2.0
}
