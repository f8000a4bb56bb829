use actix_web::HttpServer;
use request_introspect::{
    AppState, create_app,
    telemetry::{self, LogFormat},
};
use std::env;
use tracing::{error, info};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

fn bind_addr() -> String {
    env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = telemetry::init(LogFormat::from_env()) {
        eprintln!("Failed to initialize tracing: {e}");
    }

    // Built once so every worker shares the same metrics registry
    let state = AppState::from_env().map_err(|e| {
        error!(error = %e, "Failed to create application state");
        std::io::Error::other(e)
    })?;

    let addr = bind_addr();
    info!(address = %addr, "Server starting");

    HttpServer::new(move || create_app(state.clone()))
        .bind(addr)?
        .run()
        .await
}
