//! Request context middleware: request IDs, client IP caching, metrics and
//! operation logging.

use crate::{
    models::{
        audit::OperationLogEvent,
        context::{RequestCache, RequestId},
    },
    services::{AppMetrics, auth::get_request_user},
    utils::{
        http::{extract_client_ip, extract_user_agent},
        redact::redact_sensitive_data,
        route::extract_route_pattern,
        user_agent::parse_user_agent,
        verbose_name::{ModelView, ViewModels, get_verbose_name},
    },
};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
    web,
};
use std::{
    future::{Ready, ready},
    pin::Pin,
    time::{Duration, Instant},
};
use uuid::Uuid;

/// Request context middleware factory
///
/// Uses an incoming `X-Request-ID` or generates one, caches the client IP
/// for downstream helpers, and once the handler has run records metrics
/// under the canonical path and emits an [`OperationLogEvent`].
pub struct RequestContextMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestContextMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestContextService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestContextService { service }))
    }
}

/// The actual request context middleware service
pub struct RequestContextService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestContextService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();

        let request_id = req
            .headers()
            .get("X-Request-ID")
            .and_then(|h| h.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let ip_address = extract_client_ip(req.request());
        cache_client_ip(req.request(), &ip_address);
        req.extensions_mut().insert(RequestId(request_id.clone()));

        tracing::debug!(
            target: "request",
            request_id = %request_id,
            method = %req.method(),
            path = %req.path(),
            ip_address = %ip_address,
            "Incoming request"
        );

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            let duration = start_time.elapsed();

            record_operation(res.request(), &request_id, res.status().as_u16(), duration);

            res.headers_mut().insert(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_str(&request_id)
                    .unwrap_or_else(|_| HeaderValue::from_static("invalid")),
            );

            Ok(res)
        })
    }
}

/// Store the resolved client IP unless an earlier layer already did
fn cache_client_ip(req: &HttpRequest, ip_address: &str) {
    let mut extensions = req.extensions_mut();
    match extensions.get_mut::<RequestCache>() {
        Some(cache) => {
            if cache.cached_ip().is_none() {
                cache.ip = Some(ip_address.to_string());
            }
        }
        None => {
            extensions.insert(RequestCache {
                ip: Some(ip_address.to_string()),
                ..Default::default()
            });
        }
    }
}

/// Record metrics and emit the operation log for a completed request
fn record_operation(req: &HttpRequest, request_id: &str, status: u16, duration: Duration) {
    let method = req.method().to_string();
    let route = extract_route_pattern(req);

    if let Some(metrics) = req.app_data::<web::Data<AppMetrics>>() {
        metrics.record_request(&method, &route, status, duration);
        metrics.update_uptime();
    }

    let agent = parse_user_agent(&extract_user_agent(req).unwrap_or_default());
    let payload = req
        .extensions()
        .get::<RequestCache>()
        .and_then(|cache| cache.cached_payload().cloned());
    let user = get_request_user(req, payload.as_ref());
    let view = req
        .app_data::<web::Data<ViewModels>>()
        .map(|view| view.get_ref() as &dyn ModelView);

    let rendered_payload = payload
        .as_ref()
        .and_then(|p| serde_json::to_string(p).ok())
        .map(|json| redact_sensitive_data(&json));

    OperationLogEvent::new(
        method,
        req.path().to_string(),
        route,
        extract_client_ip(req),
    )
    .with_request_id(Some(request_id.to_string()))
    .with_client(agent.browser, agent.os)
    .with_user(user.id().map(str::to_string), user.username().to_string())
    .with_resource(get_verbose_name(None, view, None))
    .with_status(status, duration.as_millis())
    .with_payload(rendered_payload)
    .log();
}
