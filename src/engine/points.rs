use super::grading::PointsTable;
use crate::error::Result;
use crate::models::{Pick, PickOutcome};
use crate::store::Store;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Applies outcome-derived point deltas to league standings
///
/// The write-once outcome on the pick is the re-run guard: if the outcome is
/// already set the whole application is a no-op, which is what makes result
/// submission safe to retry.
pub struct PointsAggregator {
    store: Arc<dyn Store>,
    table: PointsTable,
}

impl PointsAggregator {
    pub fn new(store: Arc<dyn Store>, table: PointsTable) -> Self {
        Self { store, table }
    }

    /// Persist the outcome on the pick and move the owning league's
    /// membership by the mapped delta
    ///
    /// Returns `Some(delta)` when this call did the grading, `None` when the
    /// pick had already been graded (nothing re-derived, nothing re-applied).
    pub async fn apply_outcome(
        &self,
        pick: &Pick,
        outcome: PickOutcome,
        league_id: Uuid,
    ) -> Result<Option<i32>> {
        let delta = self.table.points_for(outcome);

        let applied = self
            .store
            .set_pick_outcome_if_unset(pick.id, outcome, delta)
            .await?;
        if !applied {
            debug!("Pick {} already graded, skipping", pick.id);
            return Ok(None);
        }

        self.store
            .increment_membership_points(pick.user_id, league_id, delta)
            .await?;

        Ok(Some(delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LeagueMembership, MembershipRole};
    use crate::store::MemoryStore;

    fn sample_pick() -> Pick {
        Pick {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            game_id: Uuid::new_v4(),
            picked_team: "Eagles".to_string(),
            spread: -3.0,
            outcome: None,
            points: 0,
        }
    }

    async fn seeded(pick: &Pick, league_id: Uuid) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_membership(LeagueMembership {
                user_id: pick.user_id,
                league_id,
                role: MembershipRole::Member,
                points: 0,
            })
            .await
            .unwrap();
        store.upsert_pick(pick.clone()).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_apply_outcome_moves_membership_points() {
        let pick = sample_pick();
        let league_id = Uuid::new_v4();
        let store = seeded(&pick, league_id).await;
        let aggregator = PointsAggregator::new(store.clone(), PointsTable::default());

        let delta = aggregator
            .apply_outcome(&pick, PickOutcome::Win, league_id)
            .await
            .unwrap();
        assert_eq!(delta, Some(1));

        let membership = store
            .find_membership(pick.user_id, league_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(membership.points, 1);
    }

    #[tokio::test]
    async fn test_second_application_is_noop() {
        let pick = sample_pick();
        let league_id = Uuid::new_v4();
        let store = seeded(&pick, league_id).await;
        let aggregator = PointsAggregator::new(store.clone(), PointsTable::default());

        aggregator
            .apply_outcome(&pick, PickOutcome::Win, league_id)
            .await
            .unwrap();
        // Retry with a different outcome must not re-derive or re-apply
        let second = aggregator
            .apply_outcome(&pick, PickOutcome::Loss, league_id)
            .await
            .unwrap();
        assert_eq!(second, None);

        let membership = store
            .find_membership(pick.user_id, league_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(membership.points, 1);

        let stored = store
            .find_pick(pick.user_id, pick.game_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.outcome, Some(PickOutcome::Win));
    }

    #[tokio::test]
    async fn test_push_applies_zero_delta() {
        let pick = sample_pick();
        let league_id = Uuid::new_v4();
        let store = seeded(&pick, league_id).await;
        let aggregator = PointsAggregator::new(store.clone(), PointsTable::default());

        let delta = aggregator
            .apply_outcome(&pick, PickOutcome::Push, league_id)
            .await
            .unwrap();
        assert_eq!(delta, Some(0));

        let stored = store
            .find_pick(pick.user_id, pick.game_id)
            .await
            .unwrap()
            .unwrap();
        // Outcome is recorded even when the delta is zero
        assert_eq!(stored.outcome, Some(PickOutcome::Push));
    }
}
