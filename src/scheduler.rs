use crate::engine::OddsReconciler;
use crate::models::Sport;
use chrono::{Datelike, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

/// Spawn the recurring ingestion triggers
///
/// Three timers, matching the operational cadence: one run fired immediately
/// at startup, a baseline interval (hourly by default), and a denser interval
/// that only fires on the sport's traditional game days. The core components
/// contain no loops of their own; these tasks are the only callers on a
/// schedule.
pub fn spawn(
    reconciler: Arc<OddsReconciler>,
    sport: Sport,
    ingest_interval: Duration,
    game_day_interval: Duration,
) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::new();

    {
        let reconciler = reconciler.clone();
        handles.push(tokio::spawn(async move {
            info!("Running startup odds ingestion");
            reconciler.reconcile(sport).await;
        }));
    }

    {
        let reconciler = reconciler.clone();
        handles.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval(ingest_interval);
            // First tick fires immediately; the startup run already covers it
            interval.tick().await;
            loop {
                interval.tick().await;
                reconciler.reconcile(sport).await;
            }
        }));
    }

    handles.push(tokio::spawn(async move {
        let mut interval = tokio::time::interval(game_day_interval);
        interval.tick().await;
        loop {
            interval.tick().await;
            let today = Utc::now().weekday();
            if sport.game_days().contains(&today) {
                info!("Running game day odds ingestion");
                reconciler.reconcile(sport).await;
            }
        }
    }));

    handles
}
