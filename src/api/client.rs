//! Istio resource client
//!
//! Each operation has a pure `*_request` form that only shapes the request,
//! and an async form that dispatches it. The async forms return whatever the
//! transport resolves to: no retries, caching or error translation here.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use super::paths;
use super::query::{AnalyticsQuery, ListQuery};
use crate::http::{HttpClient, HttpRequest, HttpResponse, Transport};
use crate::mesh::ResourceKind;

/// Client for the dashboard's Istio endpoints
#[derive(Clone)]
pub struct IstioClient<T = HttpClient> {
    transport: T,
}

impl<T: Transport> IstioClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Operations for one resource kind
    pub fn resource(&self, kind: ResourceKind) -> ResourceApi<'_, T> {
        ResourceApi { client: self, kind }
    }

    pub fn virtual_services(&self) -> ResourceApi<'_, T> {
        self.resource(ResourceKind::VirtualService)
    }

    pub fn destination_rules(&self) -> ResourceApi<'_, T> {
        self.resource(ResourceKind::DestinationRule)
    }

    pub fn gateways(&self) -> ResourceApi<'_, T> {
        self.resource(ResourceKind::Gateway)
    }

    pub fn list_request(
        &self,
        kind: ResourceKind,
        cluster: &str,
        namespace: Option<&str>,
        query: &ListQuery,
    ) -> HttpRequest {
        HttpRequest::get(paths::list_path(cluster, kind, namespace)).query(query.to_pairs())
    }

    pub fn get_request(
        &self,
        kind: ResourceKind,
        cluster: &str,
        namespace: &str,
        name: &str,
    ) -> HttpRequest {
        HttpRequest::get(paths::item_path(cluster, namespace, kind, name))
    }

    /// The body is sent as-is, without checking its shape
    pub fn create_request<B: Serialize + ?Sized>(
        &self,
        kind: ResourceKind,
        cluster: &str,
        namespace: &str,
        data: &B,
    ) -> Result<HttpRequest> {
        HttpRequest::post(paths::collection_path(cluster, namespace, kind)).json(data)
    }

    pub fn update_request<B: Serialize + ?Sized>(
        &self,
        kind: ResourceKind,
        cluster: &str,
        namespace: &str,
        name: &str,
        data: &B,
    ) -> Result<HttpRequest> {
        HttpRequest::put(paths::item_path(cluster, namespace, kind, name)).json(data)
    }

    pub fn delete_request(
        &self,
        kind: ResourceKind,
        cluster: &str,
        namespace: &str,
        name: &str,
    ) -> HttpRequest {
        HttpRequest::delete(paths::item_path(cluster, namespace, kind, name))
    }

    pub fn traffic_analytics_request(&self, cluster: &str, namespace: Option<&str>) -> HttpRequest {
        HttpRequest::get(paths::traffic_analytics_path(cluster))
            .query(AnalyticsQuery::new(namespace).to_pairs())
    }

    pub async fn list(
        &self,
        kind: ResourceKind,
        cluster: &str,
        namespace: Option<&str>,
        query: &ListQuery,
    ) -> Result<HttpResponse> {
        self.dispatch(self.list_request(kind, cluster, namespace, query))
            .await
    }

    pub async fn get(
        &self,
        kind: ResourceKind,
        cluster: &str,
        namespace: &str,
        name: &str,
    ) -> Result<HttpResponse> {
        self.dispatch(self.get_request(kind, cluster, namespace, name))
            .await
    }

    pub async fn create<B: Serialize + ?Sized>(
        &self,
        kind: ResourceKind,
        cluster: &str,
        namespace: &str,
        data: &B,
    ) -> Result<HttpResponse> {
        let request = self.create_request(kind, cluster, namespace, data)?;
        self.dispatch(request).await
    }

    pub async fn update<B: Serialize + ?Sized>(
        &self,
        kind: ResourceKind,
        cluster: &str,
        namespace: &str,
        name: &str,
        data: &B,
    ) -> Result<HttpResponse> {
        let request = self.update_request(kind, cluster, namespace, name, data)?;
        self.dispatch(request).await
    }

    pub async fn delete(
        &self,
        kind: ResourceKind,
        cluster: &str,
        namespace: &str,
        name: &str,
    ) -> Result<HttpResponse> {
        self.dispatch(self.delete_request(kind, cluster, namespace, name))
            .await
    }

    pub async fn traffic_analytics(
        &self,
        cluster: &str,
        namespace: Option<&str>,
    ) -> Result<HttpResponse> {
        self.dispatch(self.traffic_analytics_request(cluster, namespace))
            .await
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!("{} {}", request.method, request.path_and_query());
        self.transport.dispatch(request).await
    }
}

/// Operations bound to a single resource kind
pub struct ResourceApi<'a, T> {
    client: &'a IstioClient<T>,
    kind: ResourceKind,
}

impl<'a, T: Transport> ResourceApi<'a, T> {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn list_request(
        &self,
        cluster: &str,
        namespace: Option<&str>,
        query: &ListQuery,
    ) -> HttpRequest {
        self.client.list_request(self.kind, cluster, namespace, query)
    }

    pub async fn list(
        &self,
        cluster: &str,
        namespace: Option<&str>,
        query: &ListQuery,
    ) -> Result<HttpResponse> {
        self.client.list(self.kind, cluster, namespace, query).await
    }

    pub async fn get(&self, cluster: &str, namespace: &str, name: &str) -> Result<HttpResponse> {
        self.client.get(self.kind, cluster, namespace, name).await
    }

    pub async fn create<B: Serialize + ?Sized>(
        &self,
        cluster: &str,
        namespace: &str,
        data: &B,
    ) -> Result<HttpResponse> {
        self.client.create(self.kind, cluster, namespace, data).await
    }

    pub async fn update<B: Serialize + ?Sized>(
        &self,
        cluster: &str,
        namespace: &str,
        name: &str,
        data: &B,
    ) -> Result<HttpResponse> {
        self.client
            .update(self.kind, cluster, namespace, name, data)
            .await
    }

    pub async fn delete(&self, cluster: &str, namespace: &str, name: &str) -> Result<HttpResponse> {
        self.client.delete(self.kind, cluster, namespace, name).await
    }
}
