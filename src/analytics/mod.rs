//! Traffic analytics
//!
//! Report model returned by the traffic-analytics endpoint, and a classifier
//! that builds the same report offline from exported resource lists.

mod classify;
mod report;

pub use classify::analyze;
pub use report::{TrafficAnalytics, TrafficEntry, TrafficSummary, TrafficType};
