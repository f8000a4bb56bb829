//! Browser and operating system detection from the User-Agent header.

use crate::utils::http::extract_user_agent;
use actix_web::HttpRequest;
use woothee::parser::Parser;

/// Label used when a browser or OS cannot be identified
pub const OTHER: &str = "Other";

const WOOTHEE_UNKNOWN: &str = "UNKNOWN";

/// Browser and OS labels derived from a user agent string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAgent {
    pub browser: String,
    pub os: String,
}

/// Parse a user agent string into display labels
pub fn parse_user_agent(user_agent: &str) -> ClientAgent {
    let parser = Parser::new();

    match parser.parse(user_agent) {
        Some(result) => {
            let browser = join_known(&result.name.to_string(), &result.version.to_string());
            let os_name = result.os.to_string();
            // Windows names already carry the release ("Windows 10")
            let os = if os_name.starts_with("Windows") {
                known_or_other(&os_name)
            } else {
                join_known(&os_name, &result.os_version.to_string())
            };
            ClientAgent { browser, os }
        }
        None => ClientAgent {
            browser: OTHER.to_string(),
            os: OTHER.to_string(),
        },
    }
}

fn is_known(value: &str) -> bool {
    !value.is_empty() && value != WOOTHEE_UNKNOWN
}

fn known_or_other(value: &str) -> String {
    if is_known(value) {
        value.to_string()
    } else {
        OTHER.to_string()
    }
}

fn join_known(name: &str, version: &str) -> String {
    if !is_known(name) {
        return OTHER.to_string();
    }
    if is_known(version) {
        format!("{name} {version}")
    } else {
        name.to_string()
    }
}

/// Browser label for the request's User-Agent
pub fn extract_browser(req: &HttpRequest) -> String {
    parse_user_agent(&extract_user_agent(req).unwrap_or_default()).browser
}

/// Operating system label for the request's User-Agent
pub fn extract_os(req: &HttpRequest) -> String {
    parse_user_agent(&extract_user_agent(req).unwrap_or_default()).os
}
