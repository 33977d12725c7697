use thiserror::Error;
use uuid::Uuid;

/// Domain errors surfaced by the ingestion and grading pipeline
///
/// Batch operations (reconcile, result submission) never fail wholesale on a
/// single bad record; per-record variants end up inside the returned report
/// instead of propagating.
#[derive(Error, Debug)]
pub enum PickemError {
    /// No schedule period covers a newly discovered game; the record is
    /// skipped rather than creating an orphaned game
    #[error("no schedule period covers game {external_id} for sport {sport}")]
    MissingSchedulePeriod { external_id: String, sport: String },

    /// Result submitted for a game that is already finished; non-retryable
    #[error("game {0} is already finished")]
    AlreadyFinished(Uuid),

    #[error("game {0} not found")]
    GameNotFound(Uuid),

    /// Pick create/update attempted at or after kickoff
    #[error("picks for game {game_id} locked at kickoff ({kickoff})")]
    PickLocked {
        game_id: Uuid,
        kickoff: chrono::DateTime<chrono::Utc>,
    },

    /// Picked team is neither the home nor the away team of the game
    #[error("team {team:?} is not playing in game {game_id}")]
    UnknownTeam { game_id: Uuid, team: String },

    /// Isolated store failure during a single record's upsert or grading
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PickemError>;
