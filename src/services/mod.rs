//! Service layer: authentication, outbound lookups and metrics.

pub mod auth;
pub mod ip_analysis;
pub mod lookup_client;
pub mod metrics;

pub use auth::*;
pub use ip_analysis::*;
pub use lookup_client::{LookupClient, LookupClientConfig, LookupError, LookupMetrics};
pub use metrics::*;
