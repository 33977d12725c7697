pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod store;

pub use api::{OddsApiClient, OddsFeed};
pub use config::Config;
pub use engine::{
    grade_pick, GradingReport, OddsReconciler, PointsAggregator, PointsTable,
    ReconciliationReport, ResultService,
};
pub use error::{PickemError, Result};
pub use models::*;
pub use store::{MemoryStore, Store};
