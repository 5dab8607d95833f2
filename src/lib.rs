//! Plinko core - board layout, ball physics and payout settlement
//!
//! Core modules:
//! - `sim`: Deterministic simulation (payout table, layout, physics, drop lifecycle)
//! - `settings`: Board geometry, physics tuning and wager defaults
//! - `error`: Error taxonomy shared by every fallible operation

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{PlinkoError, SettingsError};
pub use settings::{BoardSettings, PhysicsSettings, Settings, WagerSettings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the accumulator will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Board dimensions
    pub const BOARD_WIDTH: f32 = 600.0;
    pub const BOARD_HEIGHT: f32 = 570.0;
    pub const BOARD_PADDING: f32 = 40.0;
    pub const BOARD_TOP_MARGIN: f32 = 40.0;
    pub const PEG_RADIUS: f32 = 4.0;

    /// Gap between a side wall and the nearest peg, in ball radii
    pub const WALL_CLEARANCE: f32 = 3.0;

    /// Ball radius range, interpolated by row count
    pub const BALL_MIN_RADIUS: f32 = 4.0;
    pub const BALL_MAX_RADIUS: f32 = 10.0;
    pub const BALL_RADIUS_MIN_ROWS: u32 = 8;
    pub const BALL_RADIUS_MAX_ROWS: u32 = 20;

    /// Downward acceleration (pixels/s², +y is down)
    pub const GRAVITY: f32 = 980.0;
    /// Bounciness against pegs and walls
    pub const RESTITUTION: f32 = 0.5;
    /// Tangential damping applied on contact (0 = frictionless)
    pub const FRICTION: f32 = 0.1;
    /// Velocity damping per second while airborne
    pub const AIR_DRAG: f32 = 1.2;
    /// Maximum ball speed
    pub const BALL_MAX_SPEED: f32 = 900.0;
    /// Horizontal spawn offset range (± pixels from board centre)
    pub const SPAWN_JITTER: f32 = 10.0;
    /// Initial downward speed on drop
    pub const SPAWN_SPEED: f32 = 120.0;
    /// Upper bound of the horizontal spawn drift (px/s, random sign)
    pub const SPAWN_DRIFT: f32 = 20.0;
    /// Ticks a drop may stay in flight before it is force-resolved (20s at 120 Hz)
    pub const DROP_TICK_BUDGET: u32 = 20 * 120;

    /// Wager defaults
    pub const STARTING_BALANCE: f64 = 100.0;
    pub const DEFAULT_BET: f64 = 1.0;
    pub const DEFAULT_ROWS: u32 = 8;
}

/// Ball radius for a board with `rows` peg rows.
///
/// Denser boards get smaller balls so they still fit between pegs.
pub fn ball_radius_for_rows(rows: u32) -> f32 {
    use consts::*;
    let clamped = rows.clamp(BALL_RADIUS_MIN_ROWS, BALL_RADIUS_MAX_ROWS);
    let t = (clamped - BALL_RADIUS_MIN_ROWS) as f32
        / (BALL_RADIUS_MAX_ROWS - BALL_RADIUS_MIN_ROWS) as f32;
    BALL_MAX_RADIUS - t * (BALL_MAX_RADIUS - BALL_MIN_RADIUS)
}

/// Closest point to `p` on the segment `a..b`
#[inline]
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 0.0001 {
        return a; // Degenerate segment
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}
