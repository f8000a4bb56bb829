//! Configuration structures and loading utilities.
//!
//! Each concern owns a config struct with a `Default` and a `from_env()`
//! constructor reading environment variables.

pub mod auth;
pub mod ip_analysis;
pub mod lookup_client;
pub mod metrics;

pub use auth::*;
pub use ip_analysis::*;
pub use metrics::*;
