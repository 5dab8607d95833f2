//! Payout table
//!
//! Static mapping from (risk tier, row count) to the base half-profile of
//! multipliers. The half-profile runs from the board centre outwards and is
//! mirrored to give the left-right symmetric row of scoring zones.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlinkoError, SettingsError};

/// Risk tier - trades win frequency against multiplier magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// All tiers in display order
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

impl FromStr for RiskTier {
    type Err = SettingsError;

    /// Case-insensitive; accepts `med` for medium
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(RiskTier::Low),
            "medium" | "med" => Ok(RiskTier::Medium),
            "high" => Ok(RiskTier::High),
            other => Err(SettingsError::Invalid {
                field: "wager.risk",
                reason: format!("unknown risk tier {other:?}"),
            }),
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque display key for a zone (the presentation layer maps it to a colour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ColorTag(pub &'static str);

impl ColorTag {
    pub const AMBER: ColorTag = ColorTag("#f59e0b");
    pub const ORANGE: ColorTag = ColorTag("#f97316");
    pub const RED: ColorTag = ColorTag("#ef4444");
}

/// One multiplier slot of the payout profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayoutEntry {
    pub multiplier: f64,
    pub color: ColorTag,
}

const fn entry(multiplier: f64, color: ColorTag) -> PayoutEntry {
    PayoutEntry { multiplier, color }
}

use ColorTag as C;

const LOW_8: &[PayoutEntry] = &[
    entry(0.5, C::AMBER),
    entry(1.0, C::AMBER),
    entry(2.0, C::ORANGE),
    entry(3.0, C::RED),
    entry(5.0, C::RED),
];
const LOW_16: &[PayoutEntry] = &[
    entry(0.3, C::AMBER),
    entry(0.5, C::AMBER),
    entry(1.0, C::ORANGE),
    entry(2.0, C::ORANGE),
    entry(5.0, C::RED),
];
const MEDIUM_8: &[PayoutEntry] = &[
    entry(1.0, C::AMBER),
    entry(2.0, C::ORANGE),
    entry(5.0, C::RED),
    entry(10.0, C::RED),
];
const MEDIUM_16: &[PayoutEntry] = &[
    entry(0.3, C::AMBER),
    entry(0.7, C::AMBER),
    entry(1.0, C::ORANGE),
    entry(2.0, C::ORANGE),
    entry(3.0, C::RED),
];
const HIGH_8: &[PayoutEntry] = &[
    entry(0.5, C::AMBER),
    entry(1.5, C::ORANGE),
    entry(3.0, C::RED),
    entry(10.0, C::RED),
];
const HIGH_16: &[PayoutEntry] = &[
    entry(0.3, C::AMBER),
    entry(0.5, C::AMBER),
    entry(1.0, C::ORANGE),
    entry(1.5, C::ORANGE),
    entry(3.0, C::RED),
];

/// Row counts offered for every tier
const SUPPORTED_ROWS: &[u32] = &[8, 16];

/// Row counts the table defines for `risk` (ascending)
pub fn supported_rows(_risk: RiskTier) -> &'static [u32] {
    SUPPORTED_ROWS
}

/// Base payout profile for (risk, rows); empty when unsupported
pub fn base_payouts(risk: RiskTier, rows: u32) -> &'static [PayoutEntry] {
    match (risk, rows) {
        (RiskTier::Low, 8) => LOW_8,
        (RiskTier::Low, 16) => LOW_16,
        (RiskTier::Medium, 8) => MEDIUM_8,
        (RiskTier::Medium, 16) => MEDIUM_16,
        (RiskTier::High, 8) => HIGH_8,
        (RiskTier::High, 16) => HIGH_16,
        _ => &[],
    }
}

/// Base payout profile, failing fast on an unsupported pair
pub fn checked_payouts(risk: RiskTier, rows: u32) -> Result<&'static [PayoutEntry], PlinkoError> {
    let base = base_payouts(risk, rows);
    if base.is_empty() {
        return Err(PlinkoError::UnsupportedConfiguration { risk, rows });
    }
    Ok(base)
}

/// Whether (risk, rows) has a payout profile
pub fn is_supported(risk: RiskTier, rows: u32) -> bool {
    !base_payouts(risk, rows).is_empty()
}

/// Mirror a centre-out profile: `[a, b, c]` becomes `[c, b, a, b, c]`.
///
/// The first base entry lands in the centre exactly once.
pub fn mirror(base: &[PayoutEntry]) -> Vec<PayoutEntry> {
    if base.is_empty() {
        return Vec::new();
    }
    let mut mirrored = Vec::with_capacity(base.len() * 2 - 1);
    mirrored.extend(base.iter().rev());
    mirrored.extend(&base[1..]);
    mirrored
}
