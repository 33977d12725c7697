use crate::models::Sport;
use anyhow::{anyhow, Result};
use std::env;

/// Service configuration, read from the environment
///
/// Bins load `.env` via dotenv before calling `from_env`; every knob except
/// the feed URL has a sensible default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the odds feed (e.g. a self-hosted scraper or The Odds API proxy)
    pub odds_api_url: String,
    pub odds_api_key: Option<String>,
    pub sport: Sport,
    /// Baseline ingestion cadence
    pub ingest_interval_secs: u64,
    /// Denser cadence used only on the sport's game days
    pub game_day_interval_secs: u64,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let odds_api_url = match env::var("ODDS_API_URL") {
            Ok(v) if !v.trim().is_empty() => v,
            Ok(_) => return Err(anyhow!("ODDS_API_URL is set but empty")),
            Err(_) => return Err(anyhow!("ODDS_API_URL not set")),
        };

        let sport = env::var("SPORT")
            .unwrap_or_else(|_| "nfl".to_string())
            .parse::<Sport>()
            .map_err(|e| anyhow!(e))?;

        Ok(Self {
            odds_api_url,
            odds_api_key: env::var("ODDS_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            sport,
            ingest_interval_secs: env::var("INGEST_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .unwrap_or(3600),
            game_day_interval_secs: env::var("GAME_DAY_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "900".to_string())
                .parse()
                .unwrap_or(900),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        })
    }
}
