//! Data models shared by the helpers, handlers and middleware.

pub mod api;
pub mod audit;
pub mod context;
pub mod ip_analysis;
pub mod payload;
pub mod user;

pub use api::*;
pub use audit::*;
pub use context::*;
pub use ip_analysis::*;
pub use payload::*;
pub use user::*;
