//! Drop lifecycle
//!
//! One ball from spawn to settlement: `Idle -> Armed -> InFlight -> Resolved
//! -> Idle`. `Armed` and `Resolved` are instantaneous. The first zone contact
//! settles the drop and nothing after it is honoured. A drop that outlives
//! its tick budget is forced onto the zone nearest the ball.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::layout::{ScoringZone, nearest_zone};
use super::state::WagerSession;
use super::world::{BallHandle, PhysicsWorld};
use crate::error::PlinkoError;

/// Current phase of the drop state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DropPhase {
    /// No ball present, ready for a drop
    #[default]
    Idle,
    /// Wager debited, ball about to spawn
    Armed,
    /// Ball in the world, waiting for a zone contact
    InFlight,
    /// Multiplier captured, settling
    Resolved,
}

/// Where and how the ball enters the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallSpawn {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// Settlement of one drop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropOutcome {
    pub drop_id: u64,
    pub zone_index: usize,
    pub multiplier: f64,
    pub bet: f64,
    /// `bet * multiplier`, credited to the balance
    pub payout: f64,
    /// Balance after settlement
    pub balance: f64,
    /// Resolved by the tick-budget fallback rather than a zone contact
    pub forced: bool,
    /// Ticks the ball spent in flight
    pub ticks: u32,
}

/// State machine for a single in-flight drop
#[derive(Debug, Clone, Default)]
pub struct DropSession {
    phase: DropPhase,
    drop_id: u64,
    bet: f64,
    ball: Option<BallHandle>,
    ticks: u32,
    /// Last known horizontal ball position (fallback target)
    last_x: f32,
    /// Set once the current drop has been settled
    settled: bool,
}

impl DropSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DropPhase {
        self.phase
    }

    pub fn is_in_flight(&self) -> bool {
        self.phase == DropPhase::InFlight
    }

    /// Handle of the in-flight ball
    pub fn ball(&self) -> Option<BallHandle> {
        self.ball
    }

    /// Ticks the current ball has been in flight
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn drop_id(&self) -> u64 {
        self.drop_id
    }

    /// Arm and launch a drop: validate, debit the bet, spawn the ball.
    ///
    /// Rejections leave both the wager and the world untouched.
    pub fn begin(
        &mut self,
        drop_id: u64,
        wager: &mut WagerSession,
        world: &mut PhysicsWorld,
        spawn: BallSpawn,
    ) -> Result<BallHandle, PlinkoError> {
        if world.zones().is_empty() {
            return Err(PlinkoError::BoardNotReady);
        }
        self.arm(drop_id, wager)?;

        let handle = world.spawn_ball(spawn.pos, spawn.vel, spawn.radius);
        self.ball = Some(handle);
        self.last_x = spawn.pos.x;
        self.phase = DropPhase::InFlight;
        log::debug!(
            "Drop {} in flight: bet={} balance={} spawn=({:.1}, {:.1})",
            drop_id,
            self.bet,
            wager.balance(),
            spawn.pos.x,
            spawn.pos.y
        );
        Ok(handle)
    }

    /// Idle -> Armed: precondition checks and debit
    fn arm(&mut self, drop_id: u64, wager: &mut WagerSession) -> Result<(), PlinkoError> {
        if self.phase != DropPhase::Idle || wager.is_running() {
            return Err(PlinkoError::AlreadyRunning);
        }
        wager.debit()?;
        self.phase = DropPhase::Armed;
        self.drop_id = drop_id;
        self.bet = wager.bet_amount();
        self.ticks = 0;
        self.settled = false;
        Ok(())
    }

    /// Advance the world one step and settle on the first zone contact.
    ///
    /// Returns the outcome on the tick the drop resolves, `None` otherwise
    /// (including when no drop is in flight).
    pub fn step(
        &mut self,
        world: &mut PhysicsWorld,
        wager: &mut WagerSession,
        dt: f32,
        tick_budget: u32,
    ) -> Option<DropOutcome> {
        if self.phase != DropPhase::InFlight || self.settled {
            return None;
        }
        let handle = self.ball?;

        world.advance(dt);
        self.ticks += 1;

        if let Some(ball) = world.ball(handle) {
            self.last_x = ball.pos.x;
        }

        if let Some(zone) = world.first_zone_contact(handle).copied() {
            return Some(self.resolve(zone, false, world, wager));
        }

        let vanished = world.ball(handle).is_none();
        if self.ticks >= tick_budget || vanished {
            log::warn!(
                "Drop {}: {}",
                self.drop_id,
                PlinkoError::SimulationStalled { ticks: self.ticks }
            );
            let zone = nearest_zone(world.zones(), self.last_x)
                .and_then(|idx| world.zones().get(idx).copied())?;
            return Some(self.resolve(zone, true, world, wager));
        }

        None
    }

    /// InFlight -> Resolved -> Idle: credit, despawn, report
    fn resolve(
        &mut self,
        zone: ScoringZone,
        forced: bool,
        world: &mut PhysicsWorld,
        wager: &mut WagerSession,
    ) -> DropOutcome {
        self.phase = DropPhase::Resolved;
        self.settled = true;

        let payout = self.bet * zone.multiplier;
        wager.settle(payout);
        if let Some(handle) = self.ball.take() {
            world.remove_ball(handle);
        }

        let outcome = DropOutcome {
            drop_id: self.drop_id,
            zone_index: zone.index,
            multiplier: zone.multiplier,
            bet: self.bet,
            payout,
            balance: wager.balance(),
            forced,
            ticks: self.ticks,
        };
        log::debug!(
            "Drop {} resolved: zone={} x{} payout={} balance={}{}",
            outcome.drop_id,
            outcome.zone_index,
            outcome.multiplier,
            outcome.payout,
            outcome.balance,
            if forced { " (forced)" } else { "" }
        );

        self.phase = DropPhase::Idle;
        outcome
    }
}
