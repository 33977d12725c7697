use super::{GameUpsert, Store};
use crate::models::{Game, League, LeagueMembership, Pick, PickOutcome, Sport, Week};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    games: HashMap<Uuid, Game>,
    games_by_external: HashMap<String, Uuid>,
    leagues: HashMap<Uuid, League>,
    weeks: HashMap<Uuid, Week>,
    picks: HashMap<Uuid, Pick>,
    picks_by_user_game: HashMap<(Uuid, Uuid), Uuid>,
    memberships: HashMap<(Uuid, Uuid), LeagueMembership>,
}

/// In-process store backing tests and single-node deployments
///
/// One lock over all tables: each mutation runs start-to-finish under the
/// write guard, which gives the compare-and-set and unique-key semantics the
/// `Store` contract requires without per-row locking.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_game(&self, id: Uuid) -> Result<Option<Game>> {
        let tables = self.inner.read().await;
        Ok(tables.games.get(&id).cloned())
    }

    async fn find_game_by_external_id(&self, external_id: &str) -> Result<Option<Game>> {
        let tables = self.inner.read().await;
        Ok(tables
            .games_by_external
            .get(external_id)
            .and_then(|id| tables.games.get(id))
            .cloned())
    }

    async fn upsert_game(&self, game: Game) -> Result<GameUpsert> {
        let mut tables = self.inner.write().await;

        if let Some(&existing_id) = tables.games_by_external.get(&game.external_id) {
            let existing = tables
                .games
                .get_mut(&existing_id)
                .ok_or_else(|| anyhow::anyhow!("dangling external id index"))?;

            if existing.is_finished {
                return Ok(GameUpsert::SkippedFinished(existing_id));
            }

            // Spread fields only; everything else is create-time immutable
            existing.home_spread = game.home_spread;
            existing.away_spread = game.away_spread;
            return Ok(GameUpsert::Updated(existing_id));
        }

        let id = game.id;
        tables.games_by_external.insert(game.external_id.clone(), id);
        tables.games.insert(id, game);
        Ok(GameUpsert::Created(id))
    }

    async fn finish_game(&self, id: Uuid, home_score: i32, away_score: i32) -> Result<bool> {
        let mut tables = self.inner.write().await;
        let game = match tables.games.get_mut(&id) {
            Some(g) => g,
            None => bail!("game {} not found", id),
        };

        if game.is_finished {
            return Ok(false);
        }

        game.home_score = Some(home_score);
        game.away_score = Some(away_score);
        game.is_finished = true;
        Ok(true)
    }

    async fn find_current_week(&self, sport: Sport, as_of: DateTime<Utc>) -> Result<Option<Week>> {
        let tables = self.inner.read().await;
        Ok(tables
            .weeks
            .values()
            .find(|week| {
                week.contains(as_of)
                    && tables
                        .leagues
                        .get(&week.league_id)
                        .is_some_and(|league| league.sport == sport)
            })
            .cloned())
    }

    async fn find_week(&self, id: Uuid) -> Result<Option<Week>> {
        let tables = self.inner.read().await;
        Ok(tables.weeks.get(&id).cloned())
    }

    async fn find_picks_for_game(&self, game_id: Uuid) -> Result<Vec<Pick>> {
        let tables = self.inner.read().await;
        Ok(tables
            .picks
            .values()
            .filter(|p| p.game_id == game_id)
            .cloned()
            .collect())
    }

    async fn find_pick(&self, user_id: Uuid, game_id: Uuid) -> Result<Option<Pick>> {
        let tables = self.inner.read().await;
        Ok(tables
            .picks_by_user_game
            .get(&(user_id, game_id))
            .and_then(|id| tables.picks.get(id))
            .cloned())
    }

    async fn upsert_pick(&self, pick: Pick) -> Result<Pick> {
        let mut tables = self.inner.write().await;
        let key = (pick.user_id, pick.game_id);

        if let Some(&existing_id) = tables.picks_by_user_game.get(&key) {
            let existing = tables
                .picks
                .get_mut(&existing_id)
                .ok_or_else(|| anyhow::anyhow!("dangling pick index"))?;
            existing.picked_team = pick.picked_team;
            existing.spread = pick.spread;
            return Ok(existing.clone());
        }

        tables.picks_by_user_game.insert(key, pick.id);
        tables.picks.insert(pick.id, pick.clone());
        Ok(pick)
    }

    async fn set_pick_outcome_if_unset(
        &self,
        pick_id: Uuid,
        outcome: PickOutcome,
        points: i32,
    ) -> Result<bool> {
        let mut tables = self.inner.write().await;
        let pick = match tables.picks.get_mut(&pick_id) {
            Some(p) => p,
            None => bail!("pick {} not found", pick_id),
        };

        if pick.outcome.is_some() {
            return Ok(false);
        }

        pick.outcome = Some(outcome);
        pick.points = points;
        Ok(true)
    }

    async fn increment_membership_points(
        &self,
        user_id: Uuid,
        league_id: Uuid,
        delta: i32,
    ) -> Result<()> {
        let mut tables = self.inner.write().await;
        match tables.memberships.get_mut(&(user_id, league_id)) {
            Some(membership) => {
                membership.points += delta;
                Ok(())
            }
            None => bail!("membership ({}, {}) not found", user_id, league_id),
        }
    }

    async fn find_membership(
        &self,
        user_id: Uuid,
        league_id: Uuid,
    ) -> Result<Option<LeagueMembership>> {
        let tables = self.inner.read().await;
        Ok(tables.memberships.get(&(user_id, league_id)).cloned())
    }

    async fn insert_league(&self, league: League) -> Result<()> {
        let mut tables = self.inner.write().await;
        tables.leagues.insert(league.id, league);
        Ok(())
    }

    async fn insert_week(&self, week: Week) -> Result<()> {
        let mut tables = self.inner.write().await;
        tables.weeks.insert(week.id, week);
        Ok(())
    }

    async fn insert_membership(&self, membership: LeagueMembership) -> Result<()> {
        let mut tables = self.inner.write().await;
        tables
            .memberships
            .insert((membership.user_id, membership.league_id), membership);
        Ok(())
    }
}
