//! Router builder for SHELF HTTP server

use axum::{error_handling::HandleErrorLayer, extract::Request, http::HeaderValue, Router};
use std::time::Duration;
use tower::{timeout::error::Elapsed, BoxError, ServiceBuilder};
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use uuid::{NoContext, Timestamp, Uuid};

use shelf_kernel::ModuleRegistry;

use crate::error::AppError;

/// Builder for constructing the main HTTP router
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// Merge a module's router; the module declares its own paths
    pub fn mount_module(mut self, module_name: &str, module_router: Router) -> Self {
        tracing::info!(module = module_name, "mounting module routes");
        self.router = self.router.merge(module_router);
        self
    }

    /// Merge the routers of every registered module
    pub fn mount_registry(self, registry: &ModuleRegistry) -> Self {
        registry
            .modules()
            .into_iter()
            .fold(self, |builder, module| {
                builder.mount_module(module.name(), module.routes())
            })
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        );
        self
    }

    /// Add request ID middleware
    ///
    /// Must be applied after [`RouterBuilder::with_tracing`] so the ID is set
    /// before the trace span is created.
    pub fn with_request_id(mut self) -> Self {
        self.router = self
            .router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));
        self
    }

    /// Add timeout middleware; an expired request is answered with 503
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.router = self.router.layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                    timeout_error(err, timeout_ms)
                }))
                .timeout(Duration::from_millis(timeout_ms)),
        );
        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        self.router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn timeout_error(err: BoxError, timeout_ms: u64) -> AppError {
    if err.is::<Elapsed>() {
        AppError::TimedOut { timeout_ms }
    } else {
        AppError::Internal(anyhow::anyhow!("unhandled middleware error: {err}"))
    }
}

/// Time-ordered request IDs so log lines sort by arrival
#[derive(Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let request_id = Uuid::new_v7(Timestamp::now(NoContext))
            .to_string()
            .parse::<HeaderValue>()
            .ok()?;
        Some(RequestId::new(request_id))
    }
}
