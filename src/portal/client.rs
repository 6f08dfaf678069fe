//! HTTP client for the DJPK portal using wreq for browser emulation.

use crate::config::Config;
use crate::error::PortalError;
use crate::portal::models::QueryKey;
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;
use wreq_util::Emulation;

/// Production host of the portal.
pub const PORTAL_BASE: &str = "https://djpk.kemenkeu.go.id";

/// Landing page path; also answers budget queries.
pub const APBD_PATH: &str = "/portal/data/apbd";

/// User-Agent sent on every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0 Safari/537.36";

/// Status and body of a portal response. Status handling is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalResponse {
    pub status: u16,
    pub body: String,
}

impl PortalResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// The portal signals success with 200 only.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Trait for portal fetching - enables mocking for tests.
#[async_trait]
pub trait Portal: Send + Sync {
    /// Fetches the landing page HTML.
    async fn landing_page(&self) -> Result<PortalResponse, PortalError>;

    /// Fetches the pemda listing (JSON) of a province for a year.
    async fn pemda(&self, province: &str, year: &str) -> Result<PortalResponse, PortalError>;

    /// Submits a budget query and returns the result page HTML.
    async fn apbd_table(&self, key: &QueryKey) -> Result<PortalResponse, PortalError>;
}

/// Portal HTTP client with a fixed browser identity and politeness delay.
pub struct PortalClient {
    client: Client,
    delay_ms: u64,
    delay_jitter_ms: u64,
    base_url: Option<String>,
}

impl PortalClient {
    /// Creates a new portal client with the given configuration.
    pub fn new(config: &Config) -> Result<Self, PortalError> {
        Self::with_base_url(config, None)
    }

    /// Creates a new portal client with an optional custom base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self, PortalError> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            builder = builder.proxy(wreq::Proxy::all(proxy_url)?);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
            base_url,
        })
    }

    /// Returns the base URL (custom for testing, or the production host).
    fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(PORTAL_BASE)
    }

    fn apbd_url(&self) -> String {
        format!("{}{}", self.base_url(), APBD_PATH)
    }

    fn pemda_url(&self, province: &str, year: &str) -> String {
        format!(
            "{}/portal/pemda/{}/{}",
            self.base_url(),
            urlencoding::encode(province),
            urlencoding::encode(year)
        )
    }

    fn query_url(&self, key: &QueryKey) -> String {
        format!(
            "{}?periode={}&tahun={}&provinsi={}&pemda={}",
            self.apbd_url(),
            urlencoding::encode(&key.period),
            urlencoding::encode(&key.year),
            urlencoding::encode(&key.province),
            urlencoding::encode(&key.subdivision)
        )
    }

    /// Performs a GET request and returns status and body without judging the status.
    async fn get(&self, url: &str) -> Result<PortalResponse, PortalError> {
        self.delay().await;

        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,application/json;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "id-ID,id;q=0.9,en-US;q=0.8,en;q=0.7")
            .send()
            .await?;

        let status = response.status().as_u16();
        debug!("Response status: {}", status);

        let body = response.text().await?;
        Ok(PortalResponse { status, body })
    }

    /// Adds a random delay between requests.
    async fn delay(&self) {
        if self.delay_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        let total_delay = self.delay_ms + jitter;
        debug!("Delaying {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }
}

#[async_trait]
impl Portal for PortalClient {
    async fn landing_page(&self) -> Result<PortalResponse, PortalError> {
        info!("Fetching province list");
        self.get(&self.apbd_url()).await
    }

    async fn pemda(&self, province: &str, year: &str) -> Result<PortalResponse, PortalError> {
        info!("Fetching pemda list: provinsi {} tahun {}", province, year);
        self.get(&self.pemda_url(province, year)).await
    }

    async fn apbd_table(&self, key: &QueryKey) -> Result<PortalResponse, PortalError> {
        info!("Fetching APBD table: {}", key);
        self.get(&self.query_url(key)).await
    }
}
