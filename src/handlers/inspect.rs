//! Request introspection endpoint handler.

use crate::{
    models::{
        api::InspectResponse,
        context::{RequestCache, RequestId},
        payload::RequestPayload,
    },
    services::auth::get_request_user,
    utils::{
        http::extract_client_ip,
        payload::extract_request_payload,
        route::{PathArg, ResolverMatch, extract_canonical_path, extract_request_path},
        user_agent::{extract_browser, extract_os},
        verbose_name::{ModelInfo, ModelView, ViewModels, get_verbose_name},
    },
};
use actix_web::{Error, HttpMessage, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;

/// Model served by `/api/inspect/{pk}`
pub const REQUEST_RECORD: ModelInfo = ModelInfo::new("RequestRecord", "request record");

/// Model served by `/api/inspect/{kind}/{name}`
pub const ROUTE_PARAMETER: ModelInfo = ModelInfo::new("RouteParameter", "route parameter");

/// Request introspection endpoint
///
/// Runs every helper against the incoming request and reports the results.
/// The parsed payload is cached on the request so the operation log can
/// record it.
#[api_v2_operation(
    summary = "Request Introspection",
    description = "Returns client IP, browser, OS, templated paths, payload, resolved user and model name for the incoming request.",
    tags("Inspect"),
    responses(
        (status = 200, description = "Introspection results")
    )
)]
pub async fn inspect(req: HttpRequest, body: web::Bytes) -> Result<HttpResponse, Error> {
    let payload = extract_request_payload(&req, &body);
    cache_payload(&req, &payload);

    let captured: Vec<PathArg> = ResolverMatch::from_request(&req)
        .kwargs
        .into_iter()
        .map(|(_, value)| PathArg::from(value))
        .collect();

    let view = req
        .app_data::<web::Data<ViewModels>>()
        .map(|view| view.get_ref() as &dyn ModelView);

    let response = InspectResponse {
        request_id: req.extensions().get::<RequestId>().map(|id| id.0.clone()),
        method: req.method().to_string(),
        ip: extract_client_ip(&req),
        browser: extract_browser(&req),
        os: extract_os(&req),
        path: req.path().to_string(),
        request_path: extract_request_path(&req, &captured),
        canonical_path: extract_canonical_path(&req),
        user: get_request_user(&req, Some(&payload)),
        verbose_name: get_verbose_name(None, view, None),
        payload,
    };

    tracing::debug!(
        ip = %response.ip,
        canonical_path = %response.canonical_path,
        user = %response.user.username(),
        "Inspected request"
    );

    Ok(HttpResponse::Ok().json(response))
}

fn cache_payload(req: &HttpRequest, payload: &RequestPayload) {
    let mut extensions = req.extensions_mut();
    match extensions.get_mut::<RequestCache>() {
        Some(cache) => cache.payload = Some(payload.clone()),
        None => {
            extensions.insert(RequestCache {
                payload: Some(payload.clone()),
                ..Default::default()
            });
        }
    }
}
