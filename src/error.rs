//! Error taxonomy
//!
//! Every error here is local and recoverable: a rejected action leaves the
//! session exactly as it was.

use thiserror::Error;

use crate::sim::RiskTier;

/// Errors surfaced by board configuration and the drop lifecycle
#[derive(Debug, Error, PartialEq)]
pub enum PlinkoError {
    /// No payout table entry for this (risk, rows) pair
    #[error("unsupported configuration: risk={risk} rows={rows}")]
    UnsupportedConfiguration { risk: RiskTier, rows: u32 },
    /// Bet exceeds the balance at arming time
    #[error("insufficient balance (balance={balance}, bet={bet})")]
    InsufficientBalance { balance: f64, bet: f64 },
    /// A drop is already in flight
    #[error("a drop is already running")]
    AlreadyRunning,
    /// The physics world has no scoring zones installed
    #[error("board has no scoring zones")]
    BoardNotReady,
    /// Bet amount is not a positive finite number
    #[error("invalid bet amount: {amount}")]
    InvalidBet { amount: f64 },
    /// Tick budget exhausted without a zone contact; recovered by forced resolution
    #[error("simulation stalled after {ticks} ticks, forcing resolution")]
    SimulationStalled { ticks: u32 },
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Errors from loading or validating [`crate::Settings`]
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl PartialEq for SettingsError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Invalid { field: a, .. }, Self::Invalid { field: b, .. }) => a == b,
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
