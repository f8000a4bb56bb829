//! Outbound HTTP client for third-party lookups.
//!
//! Wraps `reqwest` with a hard per-attempt timeout, optional exponential
//! backoff retries with jitter, and optional Prometheus metrics grouped by
//! destination host.

use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio_retry::{RetryIf, strategy::ExponentialBackoff};
use tracing::{info, warn};
use url::Url;

/// Configuration for the lookup client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupClientConfig {
    /// Per-attempt timeout (in seconds)
    pub timeout_seconds: u64,

    /// Connection timeout (in seconds)
    pub connect_timeout_seconds: u64,

    /// Retries after the first attempt; zero makes every call single-shot
    pub max_retries: usize,

    /// Initial retry delay in milliseconds
    pub initial_delay_ms: u64,

    /// Maximum retry delay in milliseconds
    pub max_delay_ms: u64,

    /// Retry on these HTTP status codes
    pub retry_on_status: Vec<u16>,
}

impl Default for LookupClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 5,
            connect_timeout_seconds: 3,
            max_retries: 0,
            initial_delay_ms: 100,
            max_delay_ms: 2000,
            retry_on_status: vec![502, 503, 504],
        }
    }
}

/// Metrics for outbound lookups
#[derive(Clone)]
pub struct LookupMetrics {
    /// Lookups by destination and outcome
    pub lookups_total: CounterVec,

    /// Lookup duration by destination
    pub lookup_duration_seconds: HistogramVec,
}

impl LookupMetrics {
    /// Create and register lookup metrics
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let lookups_total = CounterVec::new(
            Opts::new("lookup_requests_total", "Total outbound lookups by destination and outcome"),
            &["destination", "outcome"],
        )?;

        let lookup_duration_seconds = HistogramVec::new(
            HistogramOpts::new("lookup_request_duration_seconds", "Duration of outbound lookups")
                .buckets(vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["destination"],
        )?;

        registry.register(Box::new(lookups_total.clone()))?;
        registry.register(Box::new(lookup_duration_seconds.clone()))?;

        Ok(Self {
            lookups_total,
            lookup_duration_seconds,
        })
    }
}

/// Errors that can occur during a lookup
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Unexpected status code: {0}")]
    Status(u16),

    #[error("Remote rejected the lookup with code {0}")]
    Rejected(i64),

    #[error("Invalid lookup URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl LookupError {
    fn outcome(&self) -> &'static str {
        match self {
            LookupError::Network(_) => "network_error",
            LookupError::Timeout => "timeout",
            LookupError::Status(_) => "http_status",
            LookupError::Rejected(_) => "rejected",
            LookupError::InvalidUrl(_) => "invalid_url",
            LookupError::Decode(_) => "decode_error",
        }
    }

    fn is_retryable(&self, retry_on_status: &[u16]) -> bool {
        match self {
            LookupError::Network(_) | LookupError::Timeout => true,
            LookupError::Status(status) => retry_on_status.contains(status),
            _ => false,
        }
    }
}

/// HTTP client for best-effort third-party lookups
#[derive(Clone)]
pub struct LookupClient {
    client: Client,
    config: LookupClientConfig,
    metrics: Option<LookupMetrics>,
}

impl LookupClient {
    /// Create a new lookup client
    pub fn new(
        config: LookupClientConfig,
        metrics: Option<LookupMetrics>,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            metrics,
        })
    }

    pub fn config(&self) -> &LookupClientConfig {
        &self.config
    }

    /// GET a URL and decode a JSON body from a 200 response
    pub async fn get_json<T>(&self, url: Url) -> Result<T, LookupError>
    where
        T: serde::de::DeserializeOwned,
    {
        let destination = extract_destination(&url);
        let start = Instant::now();

        let strategy = backoff(&self.config)
            .map(tokio_retry::strategy::jitter)
            .take(self.config.max_retries);

        let target = &url;
        let result = RetryIf::start(
            strategy,
            move || self.attempt(target),
            |e: &RetryableLookup| matches!(e, RetryableLookup::Transient(_)),
        )
        .await
        .map_err(RetryableLookup::into_inner);

        let result = match result {
            Ok(response) => response
                .json::<T>()
                .await
                .map_err(|e| LookupError::Decode(e.to_string())),
            Err(e) => Err(e),
        };

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.outcome(),
        };
        self.record(&destination, outcome, start.elapsed());

        result
    }

    /// One attempt, classified for the retry policy
    async fn attempt(&self, url: &Url) -> Result<reqwest::Response, RetryableLookup> {
        let timeout = Duration::from_secs(self.config.timeout_seconds);
        let start = Instant::now();

        let error = match tokio::time::timeout(timeout, self.client.get(url.clone()).send()).await {
            Ok(Ok(response)) if response.status().as_u16() == 200 => {
                info!(
                    destination = %extract_destination(url),
                    status = 200,
                    duration_ms = start.elapsed().as_millis(),
                    "Lookup completed"
                );
                return Ok(response);
            }
            Ok(Ok(response)) => LookupError::Status(response.status().as_u16()),
            Ok(Err(e)) if e.is_timeout() => LookupError::Timeout,
            Ok(Err(e)) => LookupError::Network(e),
            Err(_) => LookupError::Timeout,
        };

        warn!(
            destination = %extract_destination(url),
            error = %error,
            duration_ms = start.elapsed().as_millis(),
            "Lookup attempt failed"
        );

        if error.is_retryable(&self.config.retry_on_status) {
            Err(RetryableLookup::Transient(error))
        } else {
            Err(RetryableLookup::Permanent(error))
        }
    }

    fn record(&self, destination: &str, outcome: &str, duration: Duration) {
        if let Some(metrics) = &self.metrics {
            metrics
                .lookups_total
                .with_label_values(&[destination, outcome])
                .inc();
            metrics
                .lookup_duration_seconds
                .with_label_values(&[destination])
                .observe(duration.as_secs_f64());
        }
    }
}

/// Delays doubling from `initial_delay_ms`, capped at `max_delay_ms`
fn backoff(config: &LookupClientConfig) -> ExponentialBackoff {
    ExponentialBackoff::from_millis(2)
        .factor((config.initial_delay_ms / 2).max(1))
        .max_delay(Duration::from_millis(config.max_delay_ms))
}

/// Attempt failure tagged for `tokio-retry`
#[derive(Debug)]
enum RetryableLookup {
    Transient(LookupError),
    Permanent(LookupError),
}

impl RetryableLookup {
    fn into_inner(self) -> LookupError {
        match self {
            RetryableLookup::Transient(e) | RetryableLookup::Permanent(e) => e,
        }
    }
}

/// Destination (host) for metric labels
fn extract_destination(url: &Url) -> String {
    url.host_str().unwrap_or("unknown").to_string()
}
