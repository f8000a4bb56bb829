//! Request Introspect - request introspection helpers for Actix Web services
//!
//! Derives the facts an operation log needs from an incoming request:
//! - Client IP, honouring `X-Forwarded-For`
//! - Request payload from query, form or JSON body
//! - Templated and canonical request paths
//! - Browser and operating system from the `User-Agent`
//! - The authenticated user (upstream, bearer token or refresh token)
//! - Human-readable model names
//! - Best-effort IP geolocation
//!
//! ## Architecture
//!
//! The codebase is organized into focused modules:
//! - `models/` - Data structures and request/response models
//! - `handlers/` - HTTP request handlers for each endpoint
//! - `middleware/` - Request context caching and operation logging
//! - `services/` - Authentication, geolocation and metrics
//! - `utils/` - The introspection helpers themselves
//! - `config/` - Configuration structures and environment loading
//! - `telemetry` - Tracing subscriber setup
//!
//! ## Quick Start
//!
//! ```no_run
//! use request_introspect::create_base_app;
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let app = create_base_app();
//!     // Configure and run the server
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod utils;

// Re-export commonly used types and functions for convenience
pub use config::{AuthConfig, IpAnalysisConfig, MetricsConfig};
pub use handlers::{
    AppState, create_app, create_base_app, create_openapi_spec, get_metrics, health, inspect,
    ip_analysis, version,
};
pub use middleware::{RequestContextMiddleware, RequestContextService};
pub use models::{
    AuthenticatedUser, HealthResponse, InspectResponse, IpAnalysis, OperationLogEvent,
    RequestCache, RequestId, RequestPayload, RequestUser, VersionResponse,
};
pub use services::{
    AppMetrics, AuthError, InMemoryUserStore, IpAnalysisService, JwtAuthenticator, LookupClient,
    LookupClientConfig, LookupError, TokenType, UserResolver, UserStore, get_request_user,
};
pub use utils::{
    extract_browser, extract_canonical_path, extract_client_ip, extract_os,
    extract_request_path, extract_request_payload, extract_route_pattern, extract_user_agent,
    get_verbose_name,
};
