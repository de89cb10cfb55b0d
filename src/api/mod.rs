//! Istio resource API
//!
//! Shapes dashboard REST requests for VirtualService, DestinationRule and
//! Gateway resources and the traffic-analytics read, then hands them to a
//! [`Transport`](crate::http::Transport).

mod client;
mod envelope;
pub mod paths;
mod query;

pub use client::{IstioClient, ResourceApi};
pub use envelope::{ApiEnvelope, ResourceList};
pub use query::{AnalyticsQuery, ListQuery};
