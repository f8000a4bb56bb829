//! Request introspection helpers.
//!
//! Each helper derives one value from an incoming request (client IP,
//! payload, templated path, browser, OS, model name) and falls back to a
//! safe default instead of failing.

pub mod http;
pub mod payload;
pub mod redact;
pub mod route;
pub mod user_agent;
pub mod verbose_name;

pub use http::*;
pub use payload::*;
pub use redact::*;
pub use route::*;
pub use user_agent::*;
pub use verbose_name::*;
