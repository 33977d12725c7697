use crate::error::{PickemError, Result};
use crate::models::Pick;
use crate::store::Store;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Create or replace a user's pick for a game
///
/// The mutability window closes at kickoff: the gate compares `now` against
/// the game time read fresh from the store at the moment of the write. The
/// spread of the picked side is snapshotted onto the pick so later line
/// movement cannot change what the pick is graded against.
pub async fn submit_pick(
    store: &dyn Store,
    user_id: Uuid,
    game_id: Uuid,
    picked_team: &str,
    now: DateTime<Utc>,
) -> Result<Pick> {
    let game = store
        .find_game(game_id)
        .await?
        .ok_or(PickemError::GameNotFound(game_id))?;

    if game.has_started(now) {
        return Err(PickemError::PickLocked {
            game_id,
            kickoff: game.game_time,
        });
    }

    let spread = if picked_team == game.home_team {
        game.home_spread
    } else if picked_team == game.away_team {
        game.away_spread
    } else {
        return Err(PickemError::UnknownTeam {
            game_id,
            team: picked_team.to_string(),
        });
    };

    let pick = store
        .upsert_pick(Pick {
            id: Uuid::new_v4(),
            user_id,
            game_id,
            picked_team: picked_team.to_string(),
            spread,
            outcome: None,
            points: 0,
        })
        .await?;

    Ok(pick)
}
