//! mesh-console
//!
//! Client, route table and traffic analysis for an Istio traffic management
//! dashboard.
//!
//! ## Modules
//!
//! - [`api`]: typed client for the dashboard's `/api/v1/istio` endpoints
//! - [`routes`]: navigation routes of the Istio section
//! - [`analytics`]: traffic classification of pods
//! - [`mesh`]: VirtualService, DestinationRule and Gateway models

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod http;
pub mod mesh;
pub mod output;
pub mod routes;
pub mod utils;
