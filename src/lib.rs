// Library interface for loadwatch modules
// The binary and the integration tests both go through this crate root

pub mod alerts;
pub mod baseline;
pub mod config;
pub mod error;
pub mod load;
pub mod logging;
pub mod models;
pub mod report;
pub mod store;
pub mod thresholds;
pub mod week;
pub mod weekly;
pub mod wellness;

// Re-export commonly used types for convenience
pub use alerts::{evaluate_alerts, evaluate_day, AlertFlag, AlertReport, StrainZone};
pub use baseline::{baselines, Baseline};
pub use error::{LoadwatchError, Result};
pub use load::daily_load;
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::*;
pub use store::DataBundle;
pub use thresholds::Thresholds;
pub use week::WeekWindow;
pub use weekly::{weekly_metrics, WeeklyMetrics};
pub use wellness::wellness_score;
