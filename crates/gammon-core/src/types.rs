use std::time::{SystemTime, UNIX_EPOCH};

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Number of points (triangles) along one side of the board.
pub const POINTS_PER_ROW: usize = 12;

/// Which long edge of the board a point sits on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardRow {
    Top,
    Bottom,
}

/// One of the 24 canonical board locations in image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointPosition {
    pub position: Point2<f32>,
    pub row: BoardRow,
    /// Position along the row, `0..12` from the left anchor.
    pub index: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckerColor {
    Black,
    White,
}

/// A single checker blob assigned to a point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckerObservation {
    pub point_index: usize,
    pub row: BoardRow,
    pub color: CheckerColor,
    pub position: Point2<f32>,
}

/// A cluster of pips read as one die.
///
/// `value` is the dot count of the cluster and is not clamped to `1..=6`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiceObservation {
    pub value: usize,
    pub position: Point2<f32>,
}

/// Result of analysing one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub checkers: Vec<CheckerObservation>,
    pub dice: Vec<DiceObservation>,
    /// Wall-clock capture time, milliseconds since the UNIX epoch.
    pub timestamp_ms: u64,
}

impl FrameSnapshot {
    /// Stamp observations with the current wall-clock time.
    pub fn now(checkers: Vec<CheckerObservation>, dice: Vec<DiceObservation>) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self {
            checkers,
            dice,
            timestamp_ms,
        }
    }

    /// Checkers seen on `(row, index)` per colour, as `(black, white)`.
    pub fn count_on_point(&self, row: BoardRow, index: usize) -> (usize, usize) {
        self.checkers
            .iter()
            .filter(|c| c.row == row && c.point_index == index)
            .fold((0, 0), |(b, w), c| match c.color {
                CheckerColor::Black => (b + 1, w),
                CheckerColor::White => (b, w + 1),
            })
    }

    /// Sum of all die values, e.g. the pips available for a move.
    pub fn dice_total(&self) -> usize {
        self.dice.iter().map(|d| d.value).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(row: BoardRow, index: usize, color: CheckerColor) -> CheckerObservation {
        CheckerObservation {
            point_index: index,
            row,
            color,
            position: Point2::new(0.0, 0.0),
        }
    }

    #[test]
    fn counts_split_by_row_and_colour() {
        let snap = FrameSnapshot::now(
            vec![
                checker(BoardRow::Top, 3, CheckerColor::Black),
                checker(BoardRow::Top, 3, CheckerColor::Black),
                checker(BoardRow::Top, 3, CheckerColor::White),
                checker(BoardRow::Bottom, 3, CheckerColor::White),
            ],
            vec![],
        );
        assert_eq!(snap.count_on_point(BoardRow::Top, 3), (2, 1));
        assert_eq!(snap.count_on_point(BoardRow::Bottom, 3), (0, 1));
        assert_eq!(snap.count_on_point(BoardRow::Bottom, 4), (0, 0));
    }

    #[test]
    fn snapshot_serializes_lowercase_enums() {
        let snap = FrameSnapshot {
            checkers: vec![checker(BoardRow::Bottom, 11, CheckerColor::White)],
            dice: vec![DiceObservation {
                value: 5,
                position: Point2::new(1.5, 2.5),
            }],
            timestamp_ms: 42,
        };
        let json = serde_json::to_string(&snap).expect("serialize");
        assert!(json.contains("\"row\":\"bottom\""));
        assert!(json.contains("\"color\":\"white\""));
        let back: FrameSnapshot = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, snap);
        assert_eq!(back.dice_total(), 5);
    }

    #[test]
    fn timestamp_is_wall_clock() {
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let snap = FrameSnapshot::now(Vec::new(), Vec::new());
        assert!(snap.timestamp_ms >= before);
    }
}
