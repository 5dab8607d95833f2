//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by ball handle)
//! - No rendering or platform dependencies

pub mod collision;
pub mod drop;
pub mod layout;
pub mod payout;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{CollisionResult, ball_peg_collision, ball_wall_collision, bounce_velocity};
pub use drop::{BallSpawn, DropOutcome, DropPhase, DropSession};
pub use layout::{BoardLayout, Peg, ScoringZone, Wall, build_layout, total_pegs};
pub use payout::{
    ColorTag, PayoutEntry, RiskTier, base_payouts, checked_payouts, mirror, supported_rows,
};
pub use state::{
    AutoStopReason, GameEvent, GameSession, PlayMode, SessionSnapshot, SessionStats,
    WagerSession,
};
pub use tick::{FrameClock, TickInput, tick};
pub use world::{Ball, BallHandle, PhysicsWorld};
