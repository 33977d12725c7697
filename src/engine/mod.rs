pub mod grading;
pub mod picks;
pub mod points;
pub mod reconciler;
pub mod results;

pub use grading::{grade_pick, PointsTable};
pub use points::PointsAggregator;
pub use reconciler::{OddsReconciler, ReconciliationReport};
pub use results::{GradingReport, ResultService};
