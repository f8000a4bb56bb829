use actix_web::{http::StatusCode, test};
use request_introspect::{
    AppState, AuthConfig, AuthenticatedUser, InMemoryUserStore, IpAnalysisConfig,
    JwtAuthenticator, LookupClientConfig, MetricsConfig, TokenType, create_app, create_base_app,
};
use serde_json::Value;
use std::sync::Arc;

const TEST_SECRET: &str = "integration-test-secret";
const CHROME_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_SECRET.to_string(),
        ..AuthConfig::default()
    }
}

fn test_state() -> AppState {
    let users = InMemoryUserStore::new()
        .with_user(AuthenticatedUser {
            id: "1".to_string(),
            username: "admin".to_string(),
            is_active: true,
        })
        .with_user(AuthenticatedUser {
            id: "2".to_string(),
            username: "disabled".to_string(),
            is_active: false,
        });

    AppState::new(
        auth_config(),
        IpAnalysisConfig {
            enabled: false,
            base_url: "http://127.0.0.1:9".to_string(),
        },
        LookupClientConfig::default(),
        MetricsConfig { enabled: true },
        Arc::new(users),
    )
    .expect("Failed to create test state")
}

fn token_for(user_id: &str, token_type: TokenType) -> String {
    JwtAuthenticator::new(auth_config())
        .issue_token(user_id, token_type)
        .expect("Failed to issue token")
}

/// The full app with the production middleware stack
#[actix_web::test]
async fn test_health_endpoint_integration() {
    let app = test::init_service(create_base_app()).await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK, "Expected 200 OK status");
    assert!(
        resp.headers().contains_key("x-request-id"),
        "Every response should carry a request id"
    );

    let body = test::read_body(resp).await;
    let json: Value = serde_json::from_slice(&body).expect("Failed to parse response as JSON");
    assert_eq!(json, serde_json::json!({ "status": "healthy" }));
}

#[actix_web::test]
async fn test_version_endpoint_integration() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::get().uri("/api/version").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    for field in ["version", "commit", "build_time"] {
        assert!(
            json.get(field).and_then(Value::as_str).is_some(),
            "Response should contain string field '{field}'"
        );
    }
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[actix_web::test]
async fn test_openapi_spec_lists_inspect_routes() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::get().uri("/api/spec/v2").to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;

    let paths = json["paths"].as_object().expect("spec should have paths");
    assert!(paths.contains_key("/api/inspect"));
    assert!(paths.contains_key("/api/inspect/{pk}"));
    assert!(paths.contains_key("/api/ip/analysis"));
}

#[actix_web::test]
async fn test_inspect_query_payload_and_forwarded_ip() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::get()
        .uri("/api/inspect?page=2&search=abc")
        .insert_header(("X-Forwarded-For", "10.0.0.1, 203.0.113.7"))
        .insert_header(("User-Agent", CHROME_WINDOWS))
        .insert_header(("X-Request-ID", "req-123"))
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(json["request_id"], "req-123");
    assert_eq!(json["method"], "GET");
    assert_eq!(json["ip"], "203.0.113.7");
    assert_eq!(json["payload"], serde_json::json!({ "page": "2", "search": "abc" }));
    assert_eq!(json["os"], "Windows 10");
    assert!(json["browser"].as_str().unwrap().starts_with("Chrome"));
    assert_eq!(json["canonical_path"], "/api/inspect");
    assert_eq!(json["user"]["kind"], "anonymous");
    assert_eq!(json["verbose_name"], "");
}

#[actix_web::test]
async fn test_inspect_json_body_payload() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::post()
        .uri("/api/inspect")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"name": "dept", "sort": 1}"#)
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(json["payload"], serde_json::json!({ "name": "dept", "sort": 1 }));
}

#[actix_web::test]
async fn test_inspect_json_array_is_wrapped() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::post()
        .uri("/api/inspect")
        .insert_header(("content-type", "application/json"))
        .set_payload("[1, 2, 3]")
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(json["payload"], serde_json::json!({ "data": [1, 2, 3] }));
}

#[actix_web::test]
async fn test_inspect_malformed_json_is_empty_payload() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::post()
        .uri("/api/inspect")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(json["payload"], serde_json::json!({}));
}

#[actix_web::test]
async fn test_inspect_multipart_reports_sentinel() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::post()
        .uri("/api/inspect")
        .insert_header(("content-type", "multipart/form-data; boundary=XyZ"))
        .set_payload("--XyZ\r\nContent-Disposition: form-data; name=\"file\"\r\n\r\ndata\r\n--XyZ--\r\n")
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(json["payload"], "multipart/form-data");
}

#[actix_web::test]
async fn test_inspect_form_payload() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::post()
        .uri("/api/inspect?source=query")
        .insert_header(("content-type", "application/x-www-form-urlencoded"))
        .set_payload("username=admin&remember=on")
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        json["payload"],
        serde_json::json!({ "source": "query", "username": "admin", "remember": "on" })
    );
}

#[actix_web::test]
async fn test_inspect_pk_route_is_templated() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::get().uri("/api/inspect/42").to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(json["path"], "/api/inspect/42");
    assert_eq!(json["request_path"], "/api/inspect/{id}");
    assert_eq!(json["canonical_path"], "/api/inspect/{id}");
    assert_eq!(json["verbose_name"], "request record");
}

#[actix_web::test]
async fn test_inspect_named_route_keeps_names() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::get()
        .uri("/api/inspect/dept/engineering")
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(json["request_path"], "/api/inspect/{id}/{id}");
    assert_eq!(json["canonical_path"], "/api/inspect/{kind}/{name}");
    assert_eq!(json["verbose_name"], "route parameter");
}

#[actix_web::test]
async fn test_inspect_percent_encoded_segment_is_templated() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::get()
        .uri("/api/inspect/menu/hello%20world")
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(json["request_path"], "/api/inspect/{id}/{id}");
    assert_eq!(json["canonical_path"], "/api/inspect/{kind}/{name}");
}

#[actix_web::test]
async fn test_inspect_bearer_token_user() {
    let app = test::init_service(create_app(test_state())).await;

    let token = token_for("1", TokenType::Access);
    let req = test::TestRequest::get()
        .uri("/api/inspect")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(json["user"]["kind"], "authenticated");
    assert_eq!(json["user"]["id"], "1");
    assert_eq!(json["user"]["username"], "admin");
}

#[actix_web::test]
async fn test_inspect_refresh_token_in_body() {
    let app = test::init_service(create_app(test_state())).await;

    let refresh = token_for("1", TokenType::Refresh);
    let req = test::TestRequest::post()
        .uri("/api/inspect")
        .insert_header(("content-type", "application/json"))
        .set_payload(serde_json::json!({ "refresh": refresh }).to_string())
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(json["user"]["username"], "admin");
}

#[actix_web::test]
async fn test_inspect_rejects_refresh_token_as_bearer() {
    let app = test::init_service(create_app(test_state())).await;

    let refresh = token_for("1", TokenType::Refresh);
    let req = test::TestRequest::get()
        .uri("/api/inspect")
        .insert_header(("Authorization", format!("Bearer {refresh}")))
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(json["user"]["kind"], "anonymous");
}

#[actix_web::test]
async fn test_inspect_inactive_user_is_anonymous() {
    let app = test::init_service(create_app(test_state())).await;

    let token = token_for("2", TokenType::Access);
    let req = test::TestRequest::get()
        .uri("/api/inspect")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(json["user"]["kind"], "anonymous");
}

#[actix_web::test]
async fn test_inspect_invalid_token_is_anonymous() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::get()
        .uri("/api/inspect")
        .insert_header(("Authorization", "Bearer not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK, "Bad tokens must not fail the request");

    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["user"]["kind"], "anonymous");
}

#[actix_web::test]
async fn test_metrics_use_canonical_routes() {
    let app = test::init_service(create_app(test_state())).await;

    for id in ["1", "2", "3"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/inspect/{id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/api/metrics").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let output = std::str::from_utf8(&body).unwrap();

    assert!(output.contains(r#"route="/api/inspect/{id}""#));
    assert!(!output.contains(r#"route="/api/inspect/1""#));
    assert!(!output.contains(r#"route="/api/metrics""#));
}

#[actix_web::test]
async fn test_unrouted_requests_use_unknown_route_label() {
    let app = test::init_service(create_app(test_state())).await;

    for path in ["/scan/a1", "/scan/b2", "/scan/c3"] {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    let req = test::TestRequest::get().uri("/api/metrics").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let output = std::str::from_utf8(&body).unwrap();

    assert!(output.contains(r#"route="/unknown""#));
    assert!(!output.contains("/scan/"));
}

#[actix_web::test]
async fn test_metrics_disabled_returns_503() {
    let state = AppState {
        metrics_config: MetricsConfig { enabled: false },
        ..test_state()
    };
    let app = test::init_service(create_app(state)).await;

    let req = test::TestRequest::get().uri("/api/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_ip_analysis_disabled_returns_empty_record() {
    let app = test::init_service(create_app(test_state())).await;

    let req = test::TestRequest::get()
        .uri("/api/ip/analysis?ip=8.8.8.8")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json["country"], "");
    assert_eq!(json["city"], "");
}
