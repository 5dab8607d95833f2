//! Game session state
//!
//! The single object a presentation layer talks to: it owns the wager, the
//! generated board, the physics world and the drop state machine, and queues
//! outbound events for the caller to drain.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::drop::{BallSpawn, DropOutcome, DropPhase, DropSession};
use super::layout::{BoardLayout, build_layout};
use super::payout::{self, RiskTier};
use super::world::PhysicsWorld;
use crate::error::PlinkoError;
use crate::settings::Settings;

/// Wager bookkeeping
///
/// The balance moves exactly twice per drop: debit when armed, credit when
/// resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WagerSession {
    bet_amount: f64,
    balance: f64,
    is_running: bool,
}

impl WagerSession {
    pub fn new(balance: f64, bet_amount: f64) -> Self {
        Self {
            bet_amount,
            balance,
            is_running: false,
        }
    }

    pub fn bet_amount(&self) -> f64 {
        self.bet_amount
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Whether the balance covers the current bet
    pub fn can_cover(&self) -> bool {
        self.balance >= self.bet_amount
    }

    /// Change the bet; rejected while a drop is running
    pub fn set_bet(&mut self, amount: f64) -> Result<(), PlinkoError> {
        if self.is_running {
            return Err(PlinkoError::AlreadyRunning);
        }
        if !(amount.is_finite() && amount > 0.0) {
            return Err(PlinkoError::InvalidBet { amount });
        }
        self.bet_amount = amount;
        Ok(())
    }

    /// Take the bet out of the balance and mark the drop running
    pub(crate) fn debit(&mut self) -> Result<(), PlinkoError> {
        if self.is_running {
            return Err(PlinkoError::AlreadyRunning);
        }
        if !self.can_cover() {
            return Err(PlinkoError::InsufficientBalance {
                balance: self.balance,
                bet: self.bet_amount,
            });
        }
        self.balance -= self.bet_amount;
        self.is_running = true;
        Ok(())
    }

    /// Credit the payout and mark the drop finished
    pub(crate) fn settle(&mut self, payout: f64) {
        self.balance += payout;
        self.is_running = false;
    }
}

/// Manual drops or automatic back-to-back drops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    #[default]
    Manual,
    Auto,
}

/// Why auto play ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoStopReason {
    RoundsComplete,
    InsufficientBalance,
    Cancelled,
}

/// Events queued for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// Board geometry changed
    BoardRebuilt { risk: RiskTier, rows: u32, zones: usize },
    /// A bet was accepted and the ball spawned
    DropStarted { drop_id: u64, bet: f64, balance: f64 },
    /// Terminal multiplier of a drop; exactly once per drop
    Resolved(DropOutcome),
    /// A queued action was refused
    Rejected { action: &'static str, reason: String },
    AutoStopped { reason: AutoStopReason },
}

/// Read-only view of the session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub risk: RiskTier,
    pub rows: u32,
    pub bet_amount: f64,
    pub balance: f64,
    pub is_running: bool,
    pub mode: PlayMode,
}

/// Running totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Drops resolved
    pub drops: u64,
    pub total_wagered: f64,
    pub total_returned: f64,
    /// Drops settled by the tick-budget fallback
    pub stalled: u64,
}

/// A Plinko board plus the player's wager
#[derive(Debug, Clone)]
pub struct GameSession {
    settings: Settings,
    risk: RiskTier,
    rows: u32,
    mode: PlayMode,
    /// Auto drops left to issue (`None` = until stopped)
    auto_rounds: Option<u32>,
    wager: WagerSession,
    layout: BoardLayout,
    world: PhysicsWorld,
    drop: DropSession,
    rng: Pcg32,
    stats: SessionStats,
    events: Vec<GameEvent>,
    next_drop_id: u64,
}

impl GameSession {
    /// Create a session from validated settings
    pub fn create(settings: Settings) -> Result<Self, PlinkoError> {
        settings.validate()?;

        let risk = settings.wager.risk;
        let rows = settings.wager.rows;
        let layout = build_layout(risk, rows, &settings.board)?;
        let mut world = PhysicsWorld::new(settings.physics.clone());
        world.install(&layout);

        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!(
            "Session created: risk={} rows={} balance={} bet={} seed={}",
            risk,
            rows,
            settings.wager.starting_balance,
            settings.wager.bet_amount,
            seed
        );

        Ok(Self {
            wager: WagerSession::new(settings.wager.starting_balance, settings.wager.bet_amount),
            risk,
            rows,
            mode: PlayMode::Manual,
            auto_rounds: None,
            layout,
            world,
            drop: DropSession::new(),
            rng: Pcg32::seed_from_u64(seed),
            stats: SessionStats::default(),
            events: Vec::new(),
            next_drop_id: 1,
            settings,
        })
    }

    /// Rebuild the board and physics world for the current (risk, rows)
    pub fn reset(&mut self) -> Result<(), PlinkoError> {
        self.configure(self.risk, self.rows)
    }

    /// Tear the session down, returning its final state
    pub fn dispose(mut self) -> SessionSnapshot {
        self.world.clear();
        let snapshot = self.current_state();
        log::info!(
            "Session disposed: {} drops, balance={}",
            self.stats.drops,
            snapshot.balance
        );
        snapshot
    }

    /// Switch board parameters. Rejected while a drop is in flight.
    pub fn configure(&mut self, risk: RiskTier, rows: u32) -> Result<(), PlinkoError> {
        if self.wager.is_running() {
            return Err(self.reject("configure", PlinkoError::AlreadyRunning));
        }
        let layout = match build_layout(risk, rows, &self.settings.board) {
            Ok(layout) => layout,
            Err(err) => return Err(self.reject("configure", err)),
        };
        self.world.install(&layout);
        self.events.push(GameEvent::BoardRebuilt {
            risk,
            rows,
            zones: layout.zones.len(),
        });
        log::info!(
            "Board configured: risk={} rows={} pegs={} zones={}",
            risk,
            rows,
            layout.pegs.len(),
            layout.zones.len()
        );
        self.risk = risk;
        self.rows = rows;
        self.layout = layout;
        Ok(())
    }

    pub fn set_risk(&mut self, risk: RiskTier) -> Result<(), PlinkoError> {
        self.configure(risk, self.rows)
    }

    pub fn set_rows(&mut self, rows: u32) -> Result<(), PlinkoError> {
        self.configure(self.risk, rows)
    }

    pub fn set_bet(&mut self, amount: f64) -> Result<(), PlinkoError> {
        self.wager
            .set_bet(amount)
            .map_err(|err| self.reject("set_bet", err))
    }

    pub fn halve_bet(&mut self) -> Result<(), PlinkoError> {
        self.set_bet(self.wager.bet_amount() / 2.0)
    }

    pub fn double_bet(&mut self) -> Result<(), PlinkoError> {
        self.set_bet(self.wager.bet_amount() * 2.0)
    }

    /// Start dropping automatically, `rounds` times or until stopped
    pub fn start_auto(&mut self, rounds: Option<u32>) {
        self.mode = PlayMode::Auto;
        self.auto_rounds = rounds;
        log::info!("Auto play started ({:?} rounds)", rounds);
    }

    /// Back to manual play; an in-flight drop still completes
    pub fn stop_auto(&mut self) {
        self.end_auto(AutoStopReason::Cancelled);
    }

    fn end_auto(&mut self, reason: AutoStopReason) {
        if self.mode != PlayMode::Auto {
            return;
        }
        self.mode = PlayMode::Manual;
        self.auto_rounds = None;
        self.events.push(GameEvent::AutoStopped { reason });
        log::info!("Auto play stopped: {:?}", reason);
    }

    /// Drop a ball near the board centre with a random horizontal offset
    pub fn drop_ball(&mut self) -> Result<u64, PlinkoError> {
        let jitter = self.settings.physics.spawn_jitter;
        let offset = if jitter > 0.0 {
            self.rng.random_range(-jitter..=jitter)
        } else {
            0.0
        };
        self.launch(self.layout.spawn_point.x + offset)
    }

    /// Drop a ball from column `x` (clamped to the playable width)
    pub fn drop_ball_at(&mut self, x: f32) -> Result<u64, PlinkoError> {
        self.launch(x)
    }

    fn launch(&mut self, x: f32) -> Result<u64, PlinkoError> {
        let radius = self.layout.ball_radius;
        let min_x = self.layout.playable_left() + radius;
        let max_x = self.layout.playable_right() - radius;
        // Never zero, so a ball dropped dead over a peg still rolls off it
        let drift = self.settings.physics.spawn_drift;
        let mut vx = self.rng.random_range(drift * 0.5..=drift);
        if self.rng.random::<bool>() {
            vx = -vx;
        }
        let spawn = BallSpawn {
            pos: Vec2::new(x.clamp(min_x, max_x), self.layout.spawn_point.y),
            vel: Vec2::new(vx, self.settings.physics.spawn_speed),
            radius,
        };

        let drop_id = self.next_drop_id;
        if let Err(err) = self
            .drop
            .begin(drop_id, &mut self.wager, &mut self.world, spawn)
        {
            return Err(self.reject("drop", err));
        }
        self.next_drop_id += 1;
        self.stats.total_wagered += self.wager.bet_amount();
        self.events.push(GameEvent::DropStarted {
            drop_id,
            bet: self.wager.bet_amount(),
            balance: self.wager.balance(),
        });
        Ok(drop_id)
    }

    /// Advance one fixed step. Returns the outcome if a drop resolved.
    pub fn step(&mut self, dt: f32) -> Option<DropOutcome> {
        if self.mode == PlayMode::Auto && !self.wager.is_running() {
            self.auto_drop();
        }

        let outcome = self.drop.step(
            &mut self.world,
            &mut self.wager,
            dt,
            self.settings.physics.tick_budget,
        )?;

        self.stats.drops += 1;
        self.stats.total_returned += outcome.payout;
        if outcome.forced {
            self.stats.stalled += 1;
        }
        self.events.push(GameEvent::Resolved(outcome.clone()));
        Some(outcome)
    }

    fn auto_drop(&mut self) {
        if self.auto_rounds == Some(0) {
            self.end_auto(AutoStopReason::RoundsComplete);
            return;
        }
        match self.drop_ball() {
            Ok(_) => {
                if let Some(rounds) = self.auto_rounds.as_mut() {
                    *rounds -= 1;
                }
            }
            Err(PlinkoError::InsufficientBalance { .. }) => {
                self.end_auto(AutoStopReason::InsufficientBalance);
            }
            Err(err) => {
                log::warn!("Auto drop failed: {err}");
                self.end_auto(AutoStopReason::Cancelled);
            }
        }
    }

    /// Log a refused command and queue it as a `Rejected` event
    fn reject(&mut self, action: &'static str, err: PlinkoError) -> PlinkoError {
        log::warn!("{action} rejected: {err}");
        self.events.push(GameEvent::Rejected {
            action,
            reason: err.to_string(),
        });
        err
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn current_state(&self) -> SessionSnapshot {
        SessionSnapshot {
            risk: self.risk,
            rows: self.rows,
            bet_amount: self.wager.bet_amount(),
            balance: self.wager.balance(),
            is_running: self.wager.is_running(),
            mode: self.mode,
        }
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn wager(&self) -> &WagerSession {
        &self.wager
    }

    pub fn drop_phase(&self) -> DropPhase {
        self.drop.phase()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Auto drops left to issue (`None` when unlimited or manual)
    pub fn auto_rounds(&self) -> Option<u32> {
        self.auto_rounds
    }

    /// Row counts selectable for the current risk tier
    pub fn available_rows(&self) -> &'static [u32] {
        payout::supported_rows(self.risk)
    }
}
