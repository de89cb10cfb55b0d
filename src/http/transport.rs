use anyhow::Result;
use std::future::Future;

use super::{HttpClient, HttpRequest, HttpResponse};

/// Something that can carry a request to the dashboard server.
///
/// Cancellation, timeouts and retries belong to the implementation. Callers
/// get its result back unchanged.
pub trait Transport: Send + Sync {
    fn dispatch(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse>> + Send;
}

impl Transport for HttpClient {
    async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.send(request).await
    }
}

impl<T: Transport> Transport for &T {
    fn dispatch(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse>> + Send {
        (**self).dispatch(request)
    }
}
