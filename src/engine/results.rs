use super::grading::{grade_pick, PointsTable};
use super::points::PointsAggregator;
use crate::error::{PickemError, Result};
use crate::models::Game;
use crate::store::Store;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct GradingFailure {
    pub pick_id: Uuid,
    pub cause: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GradingReport {
    pub graded: usize,
    pub already_graded: usize,
    pub failures: Vec<GradingFailure>,
}

/// Drives a game through its LOCKED -> FINISHED transition: persist the final
/// score, grade every pick, aggregate points — as one retry-safe unit
pub struct ResultService {
    store: Arc<dyn Store>,
    aggregator: PointsAggregator,
}

impl ResultService {
    pub fn new(store: Arc<dyn Store>, table: PointsTable) -> Self {
        let aggregator = PointsAggregator::new(store.clone(), table);
        Self { store, aggregator }
    }

    /// Accept a final score, mark the game finished, and grade its picks
    ///
    /// A resubmission carrying the same scores is a safe retry: it re-enters
    /// the grading pass (which skips every already-graded pick) and reports
    /// `graded = 0` when there was nothing left to do. A submission carrying
    /// *different* scores for a finished game is rejected outright. Failures
    /// grading individual picks are reported but never stop the rest.
    pub async fn submit_game_result(
        &self,
        game_id: Uuid,
        home_score: i32,
        away_score: i32,
    ) -> Result<GradingReport> {
        let game = self
            .store
            .find_game(game_id)
            .await?
            .ok_or(PickemError::GameNotFound(game_id))?;

        let finished_now = if game.is_finished {
            false
        } else {
            self.store.finish_game(game_id, home_score, away_score).await?
        };

        if !finished_now {
            // Finished before this call (or we lost the finish race): only an
            // identical resubmission may proceed to the idempotent grade pass
            let current = self
                .store
                .find_game(game_id)
                .await?
                .ok_or(PickemError::GameNotFound(game_id))?;
            if current.home_score != Some(home_score) || current.away_score != Some(away_score) {
                return Err(PickemError::AlreadyFinished(game_id));
            }
        }

        let report = self.grade_game(&game, home_score, away_score).await?;
        info!(
            "Result {}-{} for game {}: {} graded, {} already graded, {} failures",
            home_score,
            away_score,
            game_id,
            report.graded,
            report.already_graded,
            report.failures.len()
        );
        Ok(report)
    }

    async fn grade_game(
        &self,
        game: &Game,
        home_score: i32,
        away_score: i32,
    ) -> Result<GradingReport> {
        // Points land on the membership in the league that owns the game
        let week = self
            .store
            .find_week(game.week_id)
            .await?
            .ok_or_else(|| {
                PickemError::Store(anyhow::anyhow!("week {} not found for game {}", game.week_id, game.id))
            })?;
        let league_id = week.league_id;

        let mut report = GradingReport::default();
        for pick in self.store.find_picks_for_game(game.id).await? {
            if pick.outcome.is_some() {
                report.already_graded += 1;
                continue;
            }

            let outcome = grade_pick(
                &pick.picked_team,
                &game.home_team,
                &game.away_team,
                home_score,
                away_score,
                pick.spread,
            );

            match self.aggregator.apply_outcome(&pick, outcome, league_id).await {
                Ok(Some(_)) => report.graded += 1,
                Ok(None) => report.already_graded += 1,
                Err(e) => {
                    warn!("Failed to grade pick {}: {}", pick.id, e);
                    report.failures.push(GradingFailure {
                        pick_id: pick.id,
                        cause: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}
