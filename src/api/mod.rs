pub mod odds_feed;

pub use odds_feed::{OddsApiClient, OddsFeed};
