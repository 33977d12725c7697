pub mod memory;

pub use memory::MemoryStore;

use crate::models::{Game, League, LeagueMembership, Pick, PickOutcome, Sport, Week};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Outcome of an idempotent game upsert keyed on external id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameUpsert {
    Created(Uuid),
    Updated(Uuid),
    /// The game is already finished; spreads are immutable and were left alone
    SkippedFinished(Uuid),
}

/// Transactional store the pipeline runs against
///
/// Every method is atomic as observed by concurrent callers: the upsert is
/// keyed on the game's unique external id, `finish_game` and
/// `set_pick_outcome_if_unset` are compare-and-set operations, and the
/// membership update is an increment applied at the store layer rather than a
/// read-modify-write by the caller. A SQL implementation would back these with
/// unique-constraint upserts and `SET points = points + $1`; the in-memory
/// implementation holds a single write guard per mutation.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_game(&self, id: Uuid) -> Result<Option<Game>>;

    async fn find_game_by_external_id(&self, external_id: &str) -> Result<Option<Game>>;

    /// Create the game if its external id is unseen; otherwise overwrite the
    /// spread fields only. Team names, kickoff time and finished state are
    /// never altered after creation.
    async fn upsert_game(&self, game: Game) -> Result<GameUpsert>;

    /// Record final scores and set the finished flag, iff not already
    /// finished. Returns false when the game was finished before this call.
    async fn finish_game(&self, id: Uuid, home_score: i32, away_score: i32) -> Result<bool>;

    /// Week whose [start, end] window contains `as_of`, for a league of the
    /// given sport
    async fn find_current_week(&self, sport: Sport, as_of: DateTime<Utc>) -> Result<Option<Week>>;

    async fn find_week(&self, id: Uuid) -> Result<Option<Week>>;

    async fn find_picks_for_game(&self, game_id: Uuid) -> Result<Vec<Pick>>;

    async fn find_pick(&self, user_id: Uuid, game_id: Uuid) -> Result<Option<Pick>>;

    /// Upsert on the (user, game) unique key; a resubmission replaces the
    /// picked team and spread while keeping the pick's identity
    async fn upsert_pick(&self, pick: Pick) -> Result<Pick>;

    /// Write-once grading guard: set outcome and points iff the outcome is
    /// currently unset. Returns false (and changes nothing) otherwise.
    async fn set_pick_outcome_if_unset(
        &self,
        pick_id: Uuid,
        outcome: PickOutcome,
        points: i32,
    ) -> Result<bool>;

    /// Atomic signed increment of a membership's cumulative points
    async fn increment_membership_points(
        &self,
        user_id: Uuid,
        league_id: Uuid,
        delta: i32,
    ) -> Result<()>;

    async fn find_membership(
        &self,
        user_id: Uuid,
        league_id: Uuid,
    ) -> Result<Option<LeagueMembership>>;

    async fn insert_league(&self, league: League) -> Result<()>;

    async fn insert_week(&self, week: Week) -> Result<()>;

    async fn insert_membership(&self, membership: LeagueMembership) -> Result<()>;
}
