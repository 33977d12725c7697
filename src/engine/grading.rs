use crate::models::PickOutcome;
use serde::{Deserialize, Serialize};

/// Grade a pick against the final score and the spread recorded at pick time
///
/// The picked side's margin is adjusted by its spread: a pick covers (Win)
/// when the adjusted margin is positive, loses when negative, and pushes at
/// exactly zero. The spread argument must be the one snapshotted on the pick
/// at submission, never the game's current line.
pub fn grade_pick(
    picked_team: &str,
    home_team: &str,
    _away_team: &str,
    home_score: i32,
    away_score: i32,
    spread: f64,
) -> PickOutcome {
    let is_home = picked_team == home_team;
    let score_diff = if is_home {
        home_score - away_score
    } else {
        away_score - home_score
    };

    let adjusted = score_diff as f64 + spread;

    if adjusted == 0.0 {
        PickOutcome::Push
    } else if adjusted > 0.0 {
        PickOutcome::Win
    } else {
        PickOutcome::Loss
    }
}

/// Point deltas per outcome; overridable per deployment, the default is the
/// classic +1 / -1 / 0 scheme
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointsTable {
    pub win: i32,
    pub loss: i32,
    pub push: i32,
}

impl Default for PointsTable {
    fn default() -> Self {
        Self {
            win: 1,
            loss: -1,
            push: 0,
        }
    }
}

impl PointsTable {
    pub fn points_for(&self, outcome: PickOutcome) -> i32 {
        match outcome {
            PickOutcome::Win => self.win,
            PickOutcome::Loss => self.loss,
            PickOutcome::Push => self.push,
        }
    }
}
