use crate::api::OddsFeed;
use crate::error::{PickemError, Result};
use crate::models::{Game, RawOddsRecord, Sport};
use crate::store::{GameUpsert, Store};
use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A record the reconciler could not apply; the rest of the batch is
/// unaffected
#[derive(Debug, Clone, Serialize)]
pub struct RecordError {
    pub external_id: String,
    pub cause: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconciliationReport {
    pub created: usize,
    pub updated: usize,
    pub errors: Vec<RecordError>,
}

/// Prime-time rule: Thursday/Sunday/Monday kickoff at 20:00 or later,
/// evaluated on the UTC kickoff timestamp
pub fn is_prime_time(kickoff: DateTime<Utc>) -> bool {
    matches!(
        kickoff.weekday(),
        Weekday::Thu | Weekday::Sun | Weekday::Mon
    ) && kickoff.hour() >= 20
}

/// Maps raw feed records into canonical games with an idempotent
/// create-or-update against the store
pub struct OddsReconciler {
    feed: Arc<dyn OddsFeed>,
    store: Arc<dyn Store>,
}

impl OddsReconciler {
    pub fn new(feed: Arc<dyn OddsFeed>, store: Arc<dyn Store>) -> Self {
        Self { feed, store }
    }

    /// Fetch the feed and reconcile every record independently
    ///
    /// One failing record never aborts the remaining batch; failures are
    /// collected into the report. An empty feed result means "no update
    /// available" and produces a zeroed report.
    pub async fn reconcile(&self, sport: Sport) -> ReconciliationReport {
        let records = self.feed.fetch_raw_odds(sport).await;
        let mut report = ReconciliationReport::default();

        for record in records {
            let external_id = record.external_id.clone();
            match self.reconcile_record(sport, record).await {
                Ok(GameUpsert::Created(_)) => report.created += 1,
                Ok(GameUpsert::Updated(_)) => report.updated += 1,
                Ok(GameUpsert::SkippedFinished(id)) => {
                    debug!("Game {} ({}) already finished, skipping", id, external_id);
                }
                Err(e) => {
                    warn!("Failed to reconcile record {}: {}", external_id, e);
                    report.errors.push(RecordError {
                        external_id,
                        cause: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Reconciled {} odds: {} created, {} updated, {} errors",
            sport,
            report.created,
            report.updated,
            report.errors.len()
        );
        report
    }

    async fn reconcile_record(&self, sport: Sport, record: RawOddsRecord) -> Result<GameUpsert> {
        if let Some(existing) = self
            .store
            .find_game_by_external_id(&record.external_id)
            .await?
        {
            if existing.is_finished {
                return Ok(GameUpsert::SkippedFinished(existing.id));
            }
            let mut updated = existing;
            updated.home_spread = record.home_spread;
            updated.away_spread = record.away_spread;
            return Ok(self.store.upsert_game(updated).await?);
        }

        // First sighting: the game must land in the schedule period that is
        // current at its kickoff (or now, when the feed omits it)
        let kickoff = record.commence_time.unwrap_or_else(Utc::now);
        let week = self
            .store
            .find_current_week(sport, kickoff)
            .await?
            .ok_or_else(|| PickemError::MissingSchedulePeriod {
                external_id: record.external_id.clone(),
                sport: sport.to_string(),
            })?;

        let game = Game {
            id: Uuid::new_v4(),
            external_id: record.external_id,
            week_id: week.id,
            sport,
            home_team: record.home_team,
            away_team: record.away_team,
            home_spread: record.home_spread,
            away_spread: record.away_spread,
            game_time: kickoff,
            is_prime_time: is_prime_time(kickoff),
            home_score: None,
            away_score: None,
            is_finished: false,
        };

        // The upsert is atomic on the external id, so a concurrent run that
        // created the game first simply turns this into a spread update
        Ok(self.store.upsert_game(game).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{League, Week};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use chrono::TimeZone;

    struct StubFeed {
        records: Vec<RawOddsRecord>,
    }

    #[async_trait]
    impl OddsFeed for StubFeed {
        async fn fetch_raw_odds(&self, _sport: Sport) -> Vec<RawOddsRecord> {
            self.records.clone()
        }
    }

    fn raw_record(external_id: &str, home_spread: f64, kickoff: DateTime<Utc>) -> RawOddsRecord {
        RawOddsRecord {
            external_id: external_id.to_string(),
            home_team: format!("{}-home", external_id),
            away_team: format!("{}-away", external_id),
            home_spread,
            away_spread: -home_spread,
            commence_time: Some(kickoff),
        }
    }

    /// League plus a week covering Sep 4-10 2025
    async fn seed_week(store: &MemoryStore) -> Week {
        let league = League {
            id: Uuid::new_v4(),
            name: "Test league".to_string(),
            sport: Sport::Nfl,
        };
        store.insert_league(league.clone()).await.unwrap();

        let week = Week {
            id: Uuid::new_v4(),
            league_id: league.id,
            week_num: 1,
            season: 2025,
            start_date: Utc.with_ymd_and_hms(2025, 9, 4, 0, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2025, 9, 10, 23, 59, 59).unwrap(),
            is_active: true,
        };
        store.insert_week(week.clone()).await.unwrap();
        week
    }

    fn sunday_afternoon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 7, 17, 0, 0).unwrap()
    }

    #[test]
    fn test_prime_time_rule() {
        // Sunday night
        assert!(is_prime_time(Utc.with_ymd_and_hms(2025, 9, 7, 20, 20, 0).unwrap()));
        // Thursday night, exactly 20:00
        assert!(is_prime_time(Utc.with_ymd_and_hms(2025, 9, 4, 20, 0, 0).unwrap()));
        // Monday night
        assert!(is_prime_time(Utc.with_ymd_and_hms(2025, 9, 8, 21, 15, 0).unwrap()));
        // Sunday afternoon
        assert!(!is_prime_time(Utc.with_ymd_and_hms(2025, 9, 7, 17, 0, 0).unwrap()));
        // Saturday night is not an NFL prime-time slot
        assert!(!is_prime_time(Utc.with_ymd_and_hms(2025, 9, 6, 20, 30, 0).unwrap()));
    }

    #[tokio::test]
    async fn test_reconcile_creates_then_updates_idempotently() {
        let store = Arc::new(MemoryStore::new());
        let week = seed_week(&store).await;
        let feed = Arc::new(StubFeed {
            records: vec![
                raw_record("g1", -3.0, sunday_afternoon()),
                raw_record("g2", 6.5, sunday_afternoon()),
            ],
        });
        let reconciler = OddsReconciler::new(feed, store.clone());

        let first = reconciler.reconcile(Sport::Nfl).await;
        assert_eq!(first.created, 2);
        assert_eq!(first.updated, 0);
        assert!(first.errors.is_empty());

        // Unchanged feed: nothing new, spreads identical
        let second = reconciler.reconcile(Sport::Nfl).await;
        assert_eq!(second.created, 0);
        assert_eq!(second.updated, 2);
        assert!(second.errors.is_empty());

        let game = store.find_game_by_external_id("g1").await.unwrap().unwrap();
        assert_eq!(game.home_spread, -3.0);
        assert_eq!(game.week_id, week.id);
        assert!(!game.is_finished);
        assert!(game.home_score.is_none());
    }

    #[tokio::test]
    async fn test_spread_update_on_resighting() {
        let store = Arc::new(MemoryStore::new());
        seed_week(&store).await;
        let reconciler = OddsReconciler::new(
            Arc::new(StubFeed {
                records: vec![raw_record("g1", -3.0, sunday_afternoon())],
            }),
            store.clone(),
        );
        reconciler.reconcile(Sport::Nfl).await;

        // Line moves before kickoff
        let reconciler = OddsReconciler::new(
            Arc::new(StubFeed {
                records: vec![raw_record("g1", -6.0, sunday_afternoon())],
            }),
            store.clone(),
        );
        let report = reconciler.reconcile(Sport::Nfl).await;
        assert_eq!(report.updated, 1);

        let game = store.find_game_by_external_id("g1").await.unwrap().unwrap();
        assert_eq!(game.home_spread, -6.0);
        assert_eq!(game.away_spread, 6.0);
    }

    #[tokio::test]
    async fn test_missing_week_is_isolated_per_record() {
        let store = Arc::new(MemoryStore::new());
        seed_week(&store).await;

        // g1 kicks off inside the seeded week, g-stray a month later
        let stray_kickoff = Utc.with_ymd_and_hms(2025, 10, 12, 17, 0, 0).unwrap();
        let reconciler = OddsReconciler::new(
            Arc::new(StubFeed {
                records: vec![
                    raw_record("g-stray", -1.0, stray_kickoff),
                    raw_record("g1", -3.0, sunday_afternoon()),
                ],
            }),
            store.clone(),
        );

        let report = reconciler.reconcile(Sport::Nfl).await;
        assert_eq!(report.created, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].external_id, "g-stray");
        assert!(report.errors[0].cause.contains("no schedule period"));

        // No orphaned game was created
        assert!(store
            .find_game_by_external_id("g-stray")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_finished_game_is_immutable() {
        let store = Arc::new(MemoryStore::new());
        seed_week(&store).await;
        let reconciler = OddsReconciler::new(
            Arc::new(StubFeed {
                records: vec![raw_record("g1", -3.0, sunday_afternoon())],
            }),
            store.clone(),
        );
        reconciler.reconcile(Sport::Nfl).await;

        let game = store.find_game_by_external_id("g1").await.unwrap().unwrap();
        store.finish_game(game.id, 24, 20).await.unwrap();

        let reconciler = OddsReconciler::new(
            Arc::new(StubFeed {
                records: vec![raw_record("g1", -10.0, sunday_afternoon())],
            }),
            store.clone(),
        );
        let report = reconciler.reconcile(Sport::Nfl).await;
        assert_eq!(report.created, 0);
        assert_eq!(report.updated, 0);
        assert!(report.errors.is_empty());

        let game = store.find_game_by_external_id("g1").await.unwrap().unwrap();
        assert_eq!(game.home_spread, -3.0);
    }

    #[tokio::test]
    async fn test_prime_time_flag_set_on_creation() {
        let store = Arc::new(MemoryStore::new());
        seed_week(&store).await;
        let sunday_night = Utc.with_ymd_and_hms(2025, 9, 7, 20, 20, 0).unwrap();
        let reconciler = OddsReconciler::new(
            Arc::new(StubFeed {
                records: vec![
                    raw_record("snf", -3.0, sunday_night),
                    raw_record("early", -3.0, sunday_afternoon()),
                ],
            }),
            store.clone(),
        );
        reconciler.reconcile(Sport::Nfl).await;

        assert!(store
            .find_game_by_external_id("snf")
            .await
            .unwrap()
            .unwrap()
            .is_prime_time);
        assert!(!store
            .find_game_by_external_id("early")
            .await
            .unwrap()
            .unwrap()
            .is_prime_time);
    }
}
