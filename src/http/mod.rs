//! HTTP transport
//!
//! The reqwest-backed client the resource API delegates to, and the
//! `Transport` seam it is generic over.

mod client;
mod transport;

pub use client::{HttpClient, HttpError, HttpRequest, HttpResponse};
pub use transport::Transport;
