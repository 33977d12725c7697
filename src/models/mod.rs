use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Sports a league can run on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sport {
    Nfl,
    CollegeFootball,
}

impl Sport {
    /// Path segment used by the odds feed (e.g. /odds/nfl)
    pub fn feed_key(&self) -> &'static str {
        match self {
            Sport::Nfl => "nfl",
            Sport::CollegeFootball => "cfb",
        }
    }

    /// Traditional game days, used for the denser ingestion cadence
    /// and the prime-time flag
    pub fn game_days(&self) -> &'static [Weekday] {
        match self {
            Sport::Nfl => &[Weekday::Thu, Weekday::Sun, Weekday::Mon],
            Sport::CollegeFootball => &[Weekday::Thu, Weekday::Fri, Weekday::Sat],
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.feed_key())
    }
}

impl FromStr for Sport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nfl" => Ok(Sport::Nfl),
            "cfb" | "college_football" | "college-football" => Ok(Sport::CollegeFootball),
            other => Err(format!("unknown sport: {}", other)),
        }
    }
}

/// A scheduled game, reconciled from the odds feed
///
/// The external id is the feed's key and is the sole reconciliation key.
/// Once `is_finished` is set, scores and spreads are immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: Uuid,
    pub external_id: String,
    pub week_id: Uuid,
    pub sport: Sport,
    pub home_team: String,
    pub away_team: String,
    /// Point spread for the home team (negative = home favored)
    pub home_spread: f64,
    /// Point spread for the away team (negative = away favored)
    pub away_spread: f64,
    pub game_time: DateTime<Utc>,
    pub is_prime_time: bool,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub is_finished: bool,
}

impl Game {
    /// Picks freeze at kickoff; callers must check against a freshly read game
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        now >= self.game_time
    }
}

/// Result of grading a pick against the final score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickOutcome {
    Win,
    Loss,
    Push,
}

/// A user's against-the-spread pick, unique per (user, game)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pick {
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_id: Uuid,
    pub picked_team: String,
    /// Spread snapshotted at submission time; later line movement never
    /// changes what the pick is graded against
    pub spread: f64,
    /// Write-once: set exactly once when the game is graded
    pub outcome: Option<PickOutcome>,
    pub points: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipRole {
    Admin,
    Member,
}

/// A user's standing in a league; points only ever move by signed increments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueMembership {
    pub user_id: Uuid,
    pub league_id: Uuid,
    pub role: MembershipRole,
    pub points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct League {
    pub id: Uuid,
    pub name: String,
    pub sport: Sport,
}

/// A schedule period ("week") owning the games discovered while it is current
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Week {
    pub id: Uuid,
    pub league_id: Uuid,
    pub week_num: u32,
    pub season: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

impl Week {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start_date <= at && at <= self.end_date
    }
}

/// One game's worth of data as fetched from the odds feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOddsRecord {
    pub external_id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_spread: f64,
    pub away_spread: f64,
    pub commence_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_week_contains_is_inclusive() {
        let start = Utc.with_ymd_and_hms(2025, 9, 4, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 9, 10, 23, 59, 59).unwrap();
        let week = Week {
            id: Uuid::new_v4(),
            league_id: Uuid::new_v4(),
            week_num: 1,
            season: 2025,
            start_date: start,
            end_date: end,
            is_active: true,
        };

        assert!(week.contains(start));
        assert!(week.contains(end));
        assert!(!week.contains(end + chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_sport_from_str() {
        assert_eq!("nfl".parse::<Sport>().unwrap(), Sport::Nfl);
        assert_eq!("NFL".parse::<Sport>().unwrap(), Sport::Nfl);
        assert!("curling".parse::<Sport>().is_err());
    }
}
