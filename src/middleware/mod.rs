//! Custom middleware implementations for the API.

pub mod request_context;

pub use request_context::*;
