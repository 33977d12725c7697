use crate::models::{RawOddsRecord, Sport};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

/// Source of raw game/odds records
///
/// Implementations must degrade to an empty batch on transport or parse
/// failure: callers treat an empty result as "no update available", never as
/// "all games removed".
#[async_trait]
pub trait OddsFeed: Send + Sync {
    async fn fetch_raw_odds(&self, sport: Sport) -> Vec<RawOddsRecord>;
}

/// Response from the odds feed for a single game
#[derive(Debug, Deserialize)]
struct FeedEvent {
    id: String,
    home_team: String,
    away_team: String,
    commence_time: Option<DateTime<Utc>>,
    #[serde(default)]
    bookmakers: Vec<FeedBookmaker>,
}

#[derive(Debug, Deserialize)]
struct FeedBookmaker {
    #[serde(default)]
    markets: Vec<FeedMarket>,
}

/// Market data (e.g. spreads) from the feed
#[derive(Debug, Deserialize)]
struct FeedMarket {
    key: String,
    #[serde(default)]
    outcomes: Vec<FeedOutcome>,
}

#[derive(Debug, Deserialize)]
struct FeedOutcome {
    name: String,
    point: Option<f64>,
}

pub struct OddsApiClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OddsApiClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        // Bounded waits so a stalled feed degrades to "no data" instead of
        // blocking the triggering timer
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.into(),
            api_key,
            client,
        })
    }

    /// Fetch best-available spreads for upcoming games of one sport
    async fn fetch_events(&self, sport: Sport) -> Result<Vec<RawOddsRecord>> {
        let url = format!("{}/sports/{}/odds", self.base_url, sport.feed_key());

        let mut request = self
            .client
            .get(&url)
            .query(&[("regions", "us"), ("markets", "spreads")]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("apiKey", key.as_str())]);
        }

        let response = request
            .send()
            .await
            .context("Failed to fetch odds from feed")?;

        if let Some(remaining) = response.headers().get("x-requests-remaining") {
            info!("Feed requests remaining: {}", remaining.to_str().unwrap_or("?"));
        }

        if !response.status().is_success() {
            anyhow::bail!("Odds feed returned error: {}", response.status());
        }

        let events: Vec<FeedEvent> = response
            .json()
            .await
            .context("Failed to parse odds feed response")?;

        Ok(events.into_iter().map(record_from_event).collect())
    }
}

#[async_trait]
impl OddsFeed for OddsApiClient {
    async fn fetch_raw_odds(&self, sport: Sport) -> Vec<RawOddsRecord> {
        match self.fetch_events(sport).await {
            Ok(records) => {
                info!("Fetched {} odds records for {}", records.len(), sport);
                records
            }
            Err(e) => {
                warn!("Odds fetch failed, treating as no update: {:?}", e);
                Vec::new()
            }
        }
    }
}

/// Flatten a feed event into the record shape the reconciler consumes,
/// taking the first bookmaker carrying a spreads market
fn record_from_event(event: FeedEvent) -> RawOddsRecord {
    let mut home_spread = 0.0;
    let mut away_spread = 0.0;

    let spreads = event
        .bookmakers
        .iter()
        .flat_map(|b| b.markets.iter())
        .find(|m| m.key == "spreads");

    if let Some(market) = spreads {
        for outcome in &market.outcomes {
            if outcome.name == event.home_team {
                home_spread = outcome.point.unwrap_or(0.0);
            } else if outcome.name == event.away_team {
                away_spread = outcome.point.unwrap_or(0.0);
            }
        }
    }

    RawOddsRecord {
        external_id: event.id,
        home_team: event.home_team,
        away_team: event.away_team,
        home_spread,
        away_spread,
        commence_time: event.commence_time,
    }
}
