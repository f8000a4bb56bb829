//! OpenAPI specification generation and app factory.

use crate::{
    config::{AuthConfig, IpAnalysisConfig, MetricsConfig},
    handlers::{
        REQUEST_RECORD, ROUTE_PARAMETER, get_metrics, health, inspect, ip_analysis, version,
    },
    middleware::RequestContextMiddleware,
    models::AuthenticatedUser,
    services::{
        AppMetrics, InMemoryUserStore, IpAnalysisService, JwtAuthenticator, LookupClient,
        LookupClientConfig, UserResolver, UserStore,
    },
    utils::verbose_name::ViewModels,
};
use actix_web::App;
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};
use std::sync::Arc;

/// Creates the shared OpenAPI specification for the API
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Request Introspect API".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(
                "Request introspection helpers exposed over HTTP.\n\n\
                ## Client IP\n\
                The last entry of `X-Forwarded-For` wins, then the connection peer address.\n\
                Unresolvable addresses are reported as `unknown`.\n\
                \n\
                ## Authentication\n\
                Requests are attributed to a user through, in order: upstream authentication,\n\
                an `Authorization: Bearer <access token>` header, or a `refresh` field in the\n\
                request payload. Everything else is `AnonymousUser`.\n\
                \n\
                ## Operation log\n\
                Every request is logged on the `operation_log` target with its canonical path\n\
                (`/api/inspect/42` is recorded as `/api/inspect/{id}`), client details and a\n\
                redacted payload. Responses carry an `X-Request-ID` header.\n\
                \n\
                ## Configuration\n\
                - `JWT_SECRET`: token signing secret, token authentication is off when unset\n\
                - `ENABLE_LOGIN_ANALYSIS_LOG`: set to `false` to disable IP geolocation\n\
                - `IP_ANALYSIS_BASE_URL`: geolocation service base URL\n\
                - `LOOKUP_CLIENT_TIMEOUT`: geolocation timeout in seconds (default: 5)\n\
                - `METRICS_ENABLED`: Prometheus metrics toggle"
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Shared services handed to the application as app data
#[derive(Clone)]
pub struct AppState {
    pub metrics: AppMetrics,
    pub metrics_config: MetricsConfig,
    pub user_resolver: UserResolver,
    pub ip_analysis: IpAnalysisService,
}

impl AppState {
    /// Assemble the state from explicit configuration
    pub fn new(
        auth_config: AuthConfig,
        ip_analysis_config: IpAnalysisConfig,
        lookup_config: LookupClientConfig,
        metrics_config: MetricsConfig,
        users: Arc<dyn UserStore>,
    ) -> Result<Self, String> {
        let metrics = AppMetrics::new().map_err(|e| format!("Failed to create metrics: {e}"))?;

        let client = LookupClient::new(lookup_config, Some(metrics.lookups.clone()))
            .map_err(|e| format!("Failed to create HTTP client: {e}"))?;

        Ok(Self {
            metrics,
            metrics_config,
            user_resolver: UserResolver::new(JwtAuthenticator::new(auth_config), users),
            ip_analysis: IpAnalysisService::new(ip_analysis_config, client),
        })
    }

    /// Assemble the state from environment variables with the demo user store
    pub fn from_env() -> Result<Self, String> {
        Self::new(
            AuthConfig::from_env(),
            IpAnalysisConfig::from_env(),
            LookupClientConfig::from_env(),
            MetricsConfig::from_env(),
            Arc::new(demo_user_store()),
        )
    }
}

/// User store seeded with a single active administrator
pub fn demo_user_store() -> InMemoryUserStore {
    InMemoryUserStore::new().with_user(AuthenticatedUser {
        id: "1".to_string(),
        username: "admin".to_string(),
        is_active: true,
    })
}

/// Creates the base application with all routes and middleware
///
/// Configuration comes from the environment; see [`create_app`] to supply
/// state explicitly.
pub fn create_base_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = AppState::from_env().expect("Failed to create application state");
    create_app(state)
}

/// Creates the application around the given state
pub fn create_app(
    state: AppState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(RequestContextMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(web::Data::new(state.metrics_config))
        .app_data(web::Data::new(state.metrics))
        .app_data(web::Data::new(state.user_resolver))
        .app_data(web::Data::new(state.ip_analysis))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        .service(web::resource("/api/ip/analysis").route(web::get().to(ip_analysis)))
        .service(
            web::resource("/api/inspect")
                .route(web::get().to(inspect))
                .route(web::post().to(inspect)),
        )
        .service(
            web::resource("/api/inspect/{pk}")
                .app_data(web::Data::new(ViewModels::queryset(REQUEST_RECORD)))
                .route(web::get().to(inspect))
                .route(web::post().to(inspect))
                .route(web::put().to(inspect))
                .route(web::delete().to(inspect)),
        )
        .service(
            web::resource("/api/inspect/{kind}/{name}")
                .app_data(web::Data::new(ViewModels::serializer(ROUTE_PARAMETER)))
                .route(web::get().to(inspect))
                .route(web::post().to(inspect)),
        )
        .with_json_spec_at("/api/spec/v2")
        .build()
}
