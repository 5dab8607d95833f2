//! Game settings
//!
//! Board geometry, physics tuning and wager defaults. Every field has a
//! default so partial JSON documents load cleanly.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::sim::payout::{self, RiskTier};

/// Board geometry (pixels, +y down)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub width: f32,
    pub height: f32,
    /// Horizontal margin on each side of the playable area
    pub padding: f32,
    /// Y of the first peg row
    pub top_margin: f32,
    pub peg_radius: f32,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            padding: BOARD_PADDING,
            top_margin: BOARD_TOP_MARGIN,
            peg_radius: PEG_RADIUS,
        }
    }
}

/// Physics tuning for the ball simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: f32,
    pub restitution: f32,
    pub friction: f32,
    pub air_drag: f32,
    pub max_speed: f32,
    pub spawn_jitter: f32,
    pub spawn_speed: f32,
    /// Upper bound of the horizontal spawn speed; must be positive
    pub spawn_drift: f32,
    /// Ticks a drop may stay in flight before forced resolution
    pub tick_budget: u32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            restitution: RESTITUTION,
            friction: FRICTION,
            air_drag: AIR_DRAG,
            max_speed: BALL_MAX_SPEED,
            spawn_jitter: SPAWN_JITTER,
            spawn_speed: SPAWN_SPEED,
            spawn_drift: SPAWN_DRIFT,
            tick_budget: DROP_TICK_BUDGET,
        }
    }
}

/// Initial session values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WagerSettings {
    pub starting_balance: f64,
    pub bet_amount: f64,
    pub risk: RiskTier,
    pub rows: u32,
}

impl Default for WagerSettings {
    fn default() -> Self {
        Self {
            starting_balance: STARTING_BALANCE,
            bet_amount: DEFAULT_BET,
            risk: RiskTier::Low,
            rows: DEFAULT_ROWS,
        }
    }
}

/// Complete session configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board: BoardSettings,
    pub physics: PhysicsSettings,
    pub wager: WagerSettings,
    /// RNG seed for spawn jitter; random when absent
    pub seed: Option<u64>,
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be non-negative, got {value}")))
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Check ranges and that the default board exists in the payout table
    pub fn validate(&self) -> Result<(), SettingsError> {
        let b = &self.board;
        positive("board.width", b.width)?;
        positive("board.height", b.height)?;
        non_negative("board.padding", b.padding)?;
        non_negative("board.top_margin", b.top_margin)?;
        positive("board.peg_radius", b.peg_radius)?;
        if b.padding * 2.0 >= b.width {
            return Err(invalid("board.padding", "leaves no playable width"));
        }

        let p = &self.physics;
        non_negative("physics.gravity", p.gravity)?;
        if !(p.restitution > 0.0 && p.restitution < 1.0) {
            return Err(invalid(
                "physics.restitution",
                format!("must be in (0, 1), got {}", p.restitution),
            ));
        }
        if !(0.0..=1.0).contains(&p.friction) {
            return Err(invalid(
                "physics.friction",
                format!("must be in [0, 1], got {}", p.friction),
            ));
        }
        non_negative("physics.air_drag", p.air_drag)?;
        positive("physics.max_speed", p.max_speed)?;
        non_negative("physics.spawn_jitter", p.spawn_jitter)?;
        non_negative("physics.spawn_speed", p.spawn_speed)?;
        positive("physics.spawn_drift", p.spawn_drift)?;
        if p.tick_budget == 0 {
            return Err(invalid("physics.tick_budget", "must be at least 1"));
        }

        let w = &self.wager;
        if !(w.starting_balance.is_finite() && w.starting_balance >= 0.0) {
            return Err(invalid(
                "wager.starting_balance",
                format!("must be non-negative, got {}", w.starting_balance),
            ));
        }
        if !(w.bet_amount.is_finite() && w.bet_amount > 0.0) {
            return Err(invalid(
                "wager.bet_amount",
                format!("must be positive, got {}", w.bet_amount),
            ));
        }
        if !payout::is_supported(w.risk, w.rows) {
            return Err(invalid(
                "wager.rows",
                format!("{} rows not offered for {} risk", w.rows, w.risk),
            ));
        }
        Ok(())
    }
}
