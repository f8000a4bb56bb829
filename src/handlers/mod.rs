//! HTTP request handlers for API endpoints.

pub mod health;
pub mod inspect;
pub mod ip_analysis;
pub mod metrics;
pub mod openapi;
pub mod version;

pub use health::*;
pub use inspect::*;
pub use ip_analysis::*;
pub use metrics::*;
pub use openapi::*;
pub use version::*;
