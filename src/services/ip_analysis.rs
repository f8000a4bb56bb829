//! IP geolocation lookups against the remote analysis service.

use crate::{
    config::IpAnalysisConfig,
    models::ip_analysis::{IpAnalysis, IpAnalysisEnvelope},
    services::lookup_client::{LookupClient, LookupClientConfig, LookupError, LookupMetrics},
    utils::http::UNKNOWN_IP,
};
use tracing::{debug, warn};
use url::Url;

const ANALYSIS_PATH: &str = "/ip/analysis";

/// Best-effort geolocation of client addresses
#[derive(Clone)]
pub struct IpAnalysisService {
    client: LookupClient,
    config: IpAnalysisConfig,
}

impl IpAnalysisService {
    pub fn new(config: IpAnalysisConfig, client: LookupClient) -> Self {
        Self { client, config }
    }

    /// Create a service from environment configuration
    pub fn from_env(metrics: Option<LookupMetrics>) -> Result<Self, String> {
        let client = LookupClient::new(LookupClientConfig::from_env(), metrics)
            .map_err(|e| format!("Failed to create HTTP client: {e}"))?;
        Ok(Self::new(IpAnalysisConfig::from_env(), client))
    }

    /// Geolocate an address, returning the empty record on any failure
    ///
    /// No request is made for empty or `"unknown"` addresses, or when the
    /// lookup is disabled by configuration.
    pub async fn analyze(&self, ip: &str) -> IpAnalysis {
        if ip.is_empty() || ip == UNKNOWN_IP {
            debug!(ip = %ip, "Skipping analysis for unresolved address");
            return IpAnalysis::default();
        }

        if !self.config.enabled {
            debug!("IP analysis disabled by configuration");
            return IpAnalysis::default();
        }

        match self.fetch(ip).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(ip = %ip, error = %e, "IP analysis lookup failed, using empty record");
                IpAnalysis::default()
            }
        }
    }

    /// Query the remote service; `code` must be zero for a usable answer
    pub async fn fetch(&self, ip: &str) -> Result<IpAnalysis, LookupError> {
        let url = self.analysis_url(ip)?;
        let envelope: IpAnalysisEnvelope = self.client.get_json(url).await?;

        if envelope.code != 0 {
            return Err(LookupError::Rejected(envelope.code));
        }

        Ok(envelope.data.unwrap_or_default())
    }

    fn analysis_url(&self, ip: &str) -> Result<Url, LookupError> {
        let base = format!("{}{}", self.config.base_url.trim_end_matches('/'), ANALYSIS_PATH);
        Ok(Url::parse_with_params(&base, &[("ip", ip)])?)
    }
}
