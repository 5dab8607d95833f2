//! Board layout generation
//!
//! Pure function from (risk, rows, board geometry) to a triangular peg
//! lattice plus a contiguous row of scoring zones underneath it.
//! Screen coordinates: +x right, +y down.

use glam::Vec2;
use serde::Serialize;

use super::payout::{self, ColorTag, RiskTier};
use crate::ball_radius_for_rows;
use crate::consts::WALL_CLEARANCE;
use crate::error::{PlinkoError, SettingsError};
use crate::settings::BoardSettings;

/// A static peg
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Peg {
    /// Lattice row (0 = top)
    pub row: u32,
    /// Column within the row (0 = leftmost)
    pub col: u32,
    pub pos: Vec2,
    pub radius: f32,
}

/// A sensor region paying `multiplier` when the ball first enters it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringZone {
    /// Position in the left-to-right zone row
    pub index: usize,
    pub x_center: f32,
    pub y_center: f32,
    pub width: f32,
    pub height: f32,
    pub multiplier: f64,
    pub color: ColorTag,
}

impl ScoringZone {
    #[inline]
    pub fn left(&self) -> f32 {
        self.x_center - self.width / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x_center + self.width / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y_center - self.height / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y_center + self.height / 2.0
    }

    /// Whether a circle overlaps the zone rectangle
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = Vec2::new(
            center.x.clamp(self.left(), self.right()),
            center.y.clamp(self.top(), self.bottom()),
        );
        center.distance_squared(closest) <= radius * radius
    }
}

/// A static wall segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Wall {
    pub start: Vec2,
    pub end: Vec2,
}

/// Complete static geometry for one (risk, rows) configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardLayout {
    pub risk: RiskTier,
    pub rows: u32,
    pub width: f32,
    pub height: f32,
    /// Horizontal and vertical distance between neighbouring pegs
    pub peg_spacing: f32,
    /// Radius of balls dropped on this board
    pub ball_radius: f32,
    /// Nominal drop point (board centre, one spacing above the first row)
    pub spawn_point: Vec2,
    /// Bottom edge of the zone row
    pub floor_y: f32,
    pub pegs: Vec<Peg>,
    pub zones: Vec<ScoringZone>,
    pub walls: Vec<Wall>,
}

impl BoardLayout {
    /// Left edge of the playable area
    pub fn playable_left(&self) -> f32 {
        self.zones.first().map(|z| z.left()).unwrap_or(0.0)
    }

    /// Right edge of the playable area
    pub fn playable_right(&self) -> f32 {
        self.zones.last().map(|z| z.right()).unwrap_or(self.width)
    }

    /// Index of the zone whose centre is horizontally closest to `x`
    pub fn zone_index_nearest(&self, x: f32) -> Option<usize> {
        nearest_zone(&self.zones, x)
    }

    /// Number of pegs in lattice row `row`
    pub fn pegs_in_row(&self, row: u32) -> usize {
        self.pegs.iter().filter(|p| p.row == row).count()
    }
}

/// Index of the zone whose centre is horizontally closest to `x`
pub fn nearest_zone(zones: &[ScoringZone], x: f32) -> Option<usize> {
    zones
        .iter()
        .min_by(|a, b| {
            (a.x_center - x)
                .abs()
                .partial_cmp(&(b.x_center - x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|z| z.index)
}

/// Build pegs, zones and walls for (risk, rows).
///
/// Fails with `UnsupportedConfiguration` before any geometry is produced when
/// the payout table has no entry for the pair, and with a settings error when
/// the board is too narrow for a ball to pass between its pegs.
pub fn build_layout(
    risk: RiskTier,
    rows: u32,
    board: &BoardSettings,
) -> Result<BoardLayout, PlinkoError> {
    let base = payout::checked_payouts(risk, rows)?;

    let left = board.padding;
    let right = board.width - board.padding;
    let playable_width = right - left;
    let ball_radius = ball_radius_for_rows(rows);
    // The bottom row (rows + 2 pegs) stops `edge_gap` short of each side wall
    let edge_gap = board.peg_radius + WALL_CLEARANCE * ball_radius;
    let spacing = (playable_width - 2.0 * edge_gap) / (rows + 1) as f32;
    if spacing <= 2.0 * (board.peg_radius + ball_radius) {
        return Err(SettingsError::Invalid {
            field: "board.width",
            reason: format!("{rows} rows leave no room for the ball between pegs"),
        }
        .into());
    }
    let center_x = board.width / 2.0;

    let mut pegs = Vec::with_capacity(total_pegs(rows));
    for row in 0..rows {
        let count = row + 3;
        let row_width = (count - 1) as f32 * spacing;
        let start_x = center_x - row_width / 2.0;
        let y = board.top_margin + row as f32 * spacing;
        for col in 0..count {
            pegs.push(Peg {
                row,
                col,
                pos: Vec2::new(start_x + col as f32 * spacing, y),
                radius: board.peg_radius,
            });
        }
    }

    let mirrored = payout::mirror(base);
    let zone_width = playable_width / mirrored.len() as f32;
    let last_row_y = board.top_margin + (rows - 1) as f32 * spacing;
    let zone_y = last_row_y + spacing;
    let zones: Vec<ScoringZone> = mirrored
        .iter()
        .enumerate()
        .map(|(index, entry)| ScoringZone {
            index,
            x_center: left + (index as f32 + 0.5) * zone_width,
            y_center: zone_y,
            width: zone_width,
            height: spacing,
            multiplier: entry.multiplier,
            color: entry.color,
        })
        .collect();

    let floor_y = zone_y + spacing / 2.0;
    let spawn_point = Vec2::new(center_x, board.top_margin - spacing);
    let ceiling_y = spawn_point.y - spacing;
    let walls = vec![
        Wall {
            start: Vec2::new(left, ceiling_y),
            end: Vec2::new(left, floor_y),
        },
        Wall {
            start: Vec2::new(right, ceiling_y),
            end: Vec2::new(right, floor_y),
        },
        Wall {
            start: Vec2::new(left, floor_y),
            end: Vec2::new(right, floor_y),
        },
    ];

    if floor_y > board.height {
        log::warn!(
            "Board {}/{} floor at {:.1} exceeds board height {:.1}",
            risk,
            rows,
            floor_y,
            board.height
        );
    }

    Ok(BoardLayout {
        risk,
        rows,
        width: board.width,
        height: board.height,
        peg_spacing: spacing,
        ball_radius,
        spawn_point,
        floor_y,
        pegs,
        zones,
        walls,
    })
}

/// Total pegs in a lattice of `rows` rows: sum of (r + 3)
pub fn total_pegs(rows: u32) -> usize {
    (0..rows).map(|r| (r + 3) as usize).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::payout::supported_rows;

    fn board() -> BoardSettings {
        BoardSettings::default()
    }

    #[test]
    fn test_peg_rows_widen_by_one() {
        let layout = build_layout(RiskTier::Low, 8, &board()).unwrap();
        for row in 0..8 {
            assert_eq!(layout.pegs_in_row(row), row as usize + 3);
        }
        assert_eq!(layout.pegs.len(), total_pegs(8));
        assert_eq!(total_pegs(8), 3 + 4 + 5 + 6 + 7 + 8 + 9 + 10);
    }

    #[test]
    fn test_rows_are_centered() {
        let b = board();
        let layout = build_layout(RiskTier::Medium, 16, &b).unwrap();
        for row in 0..16 {
            let xs: Vec<f32> = layout
                .pegs
                .iter()
                .filter(|p| p.row == row)
                .map(|p| p.pos.x)
                .collect();
            let mid = (xs[0] + xs[xs.len() - 1]) / 2.0;
            assert!((mid - b.width / 2.0).abs() < 0.01);
        }
    }

    #[test]
    fn test_bottom_row_within_margins() {
        let b = board();
        for risk in RiskTier::ALL {
            for &rows in supported_rows(risk) {
                let layout = build_layout(risk, rows, &b).unwrap();
                for peg in &layout.pegs {
                    assert!(peg.pos.x > b.padding);
                    assert!(peg.pos.x < b.width - b.padding);
                }
            }
        }
    }

    #[test]
    fn test_side_walls_leave_room_for_the_ball() {
        let b = board();
        for risk in RiskTier::ALL {
            for &rows in supported_rows(risk) {
                let layout = build_layout(risk, rows, &b).unwrap();
                let left_wall = layout.walls[0].start.x;
                let right_wall = layout.walls[1].start.x;
                let need = 2.0 * layout.ball_radius + 1.0;
                for row in 0..rows {
                    let xs = layout.pegs.iter().filter(|p| p.row == row).map(|p| p.pos.x);
                    let min = xs.clone().fold(f32::MAX, f32::min);
                    let max = xs.fold(f32::MIN, f32::max);
                    assert!(min - b.peg_radius - left_wall >= need, "{risk}/{rows} row {row}");
                    assert!(right_wall - max - b.peg_radius >= need, "{risk}/{rows} row {row}");
                }
            }
        }
    }

    #[test]
    fn test_ball_fits_between_pegs() {
        let b = board();
        for &rows in supported_rows(RiskTier::Low) {
            let layout = build_layout(RiskTier::Low, rows, &b).unwrap();
            assert!(layout.peg_spacing - 2.0 * b.peg_radius > 2.0 * layout.ball_radius);
        }
    }

    #[test]
    fn test_narrow_board_rejected() {
        let b = BoardSettings {
            width: 140.0,
            ..board()
        };
        assert!(matches!(
            build_layout(RiskTier::Low, 16, &b),
            Err(PlinkoError::Settings(SettingsError::Invalid { field: "board.width", .. }))
        ));
    }

    #[test]
    fn test_zones_contiguous_and_mirrored() {
        let b = board();
        let layout = build_layout(RiskTier::High, 8, &b).unwrap();
        assert_eq!(layout.zones.len(), 7);
        assert!((layout.zones[0].left() - b.padding).abs() < 0.01);
        assert!((layout.zones[6].right() - (b.width - b.padding)).abs() < 0.01);
        for pair in layout.zones.windows(2) {
            assert!((pair[0].right() - pair[1].left()).abs() < 0.01);
        }
        let n = layout.zones.len();
        for i in 0..n {
            assert_eq!(layout.zones[i].multiplier, layout.zones[n - 1 - i].multiplier);
        }
    }

    #[test]
    fn test_zones_below_last_row() {
        let layout = build_layout(RiskTier::Low, 16, &board()).unwrap();
        let last_y = layout.pegs.iter().map(|p| p.pos.y).fold(f32::MIN, f32::max);
        for zone in &layout.zones {
            assert!((zone.y_center - (last_y + layout.peg_spacing)).abs() < 0.01);
            assert!(zone.top() > last_y);
        }
        assert!((layout.floor_y - layout.zones[0].bottom()).abs() < 0.01);
    }

    #[test]
    fn test_unsupported_rows_fail_fast() {
        let err = build_layout(RiskTier::Low, 10, &board()).unwrap_err();
        assert_eq!(
            err,
            PlinkoError::UnsupportedConfiguration {
                risk: RiskTier::Low,
                rows: 10
            }
        );
        assert!(build_layout(RiskTier::High, 0, &board()).is_err());
    }

    #[test]
    fn test_layout_is_deterministic() {
        let a = build_layout(RiskTier::Medium, 8, &board()).unwrap();
        let b = build_layout(RiskTier::Medium, 8, &board()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_nearest_zone() {
        let layout = build_layout(RiskTier::Low, 8, &board()).unwrap();
        assert_eq!(layout.zone_index_nearest(-100.0), Some(0));
        assert_eq!(layout.zone_index_nearest(10_000.0), Some(8));
        assert_eq!(layout.zone_index_nearest(layout.width / 2.0), Some(4));
        assert_eq!(nearest_zone(&[], 0.0), None);
    }

    #[test]
    fn test_zone_circle_overlap() {
        let layout = build_layout(RiskTier::Low, 8, &board()).unwrap();
        let zone = layout.zones[3];
        let r = layout.ball_radius;
        assert!(zone.overlaps_circle(Vec2::new(zone.x_center, zone.y_center), r));
        assert!(zone.overlaps_circle(Vec2::new(zone.x_center, zone.top() - r + 0.5), r));
        assert!(!zone.overlaps_circle(Vec2::new(zone.x_center, zone.top() - r - 0.5), r));
    }
}
