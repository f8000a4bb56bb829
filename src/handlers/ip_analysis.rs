//! IP geolocation endpoint handler.

use crate::{
    models::{IpAnalysis, IpAnalysisQuery},
    services::IpAnalysisService,
    utils::http::extract_client_ip,
};
use actix_web::{Error, HttpRequest, Result, web};
use paperclip::actix::api_v2_operation;

/// IP analysis endpoint
///
/// Geolocates the `ip` query parameter, or the caller's own address when it
/// is omitted. Lookup failures produce the all-empty record, never an error.
#[api_v2_operation(
    summary = "IP Geolocation",
    description = "Returns continent, country, province, city, ISP and coordinates for an IP address. Fields are empty when the lookup is disabled or fails.",
    tags("IP"),
    parameters(
        ("ip" = Option<String>, Query, description = "IP address, defaults to the caller's address"),
    ),
    responses(
        (status = 200, description = "Successful response", body = IpAnalysis),
        (status = 503, description = "IP analysis service not configured")
    )
)]
pub async fn ip_analysis(
    req: HttpRequest,
    query: web::Query<IpAnalysisQuery>,
) -> Result<web::Json<IpAnalysis>, Error> {
    let Some(service) = req.app_data::<web::Data<IpAnalysisService>>() else {
        return Err(actix_web::error::ErrorServiceUnavailable(
            "IP analysis service not configured",
        ));
    };

    let ip = query
        .ip
        .as_deref()
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| extract_client_ip(&req));

    Ok(web::Json(service.analyze(&ip).await))
}
