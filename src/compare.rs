//! Comparators: count reconciliation and missing-user detection.

pub mod counts;
pub mod missing;

pub use counts::{ComparisonResult, ComparisonRow, Status, SummaryStatistics};
pub use missing::{MissingUserGroup, MissingUserRecord, MissingUserReport};
