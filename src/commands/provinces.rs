//! Province directory stage.

use crate::config::Config;
use crate::error::{Outcome, PortalError, SkipReason};
use crate::format::Formatter;
use crate::portal::{parser, Portal, PortalClient, ProvinceDirectory};
use tracing::{debug, info, warn};

/// Fetches the landing page and reads the province select.
///
/// Any failure to obtain a 200 response is fatal. A page without the select
/// element is a skip.
pub async fn fetch_provinces(portal: &impl Portal) -> Outcome<ProvinceDirectory> {
    let response = match portal.landing_page().await {
        Ok(response) => response,
        Err(e) => return Outcome::Fatal(e),
    };

    if !response.is_ok() {
        return Outcome::Fatal(PortalError::Http { status: response.status });
    }
    debug!("Landing page fetched ({} bytes)", response.body.len());

    match parser::parse_provinces(&response.body) {
        Some(directory) => {
            info!("Found {} provinces", directory.len());
            Outcome::Done(directory)
        }
        None => {
            warn!("Province select element not found");
            Outcome::Skipped(SkipReason::SelectNotFound)
        }
    }
}

/// Runs the province stage; a skip yields an empty directory.
pub async fn load_provinces(portal: &impl Portal) -> Result<ProvinceDirectory, PortalError> {
    match fetch_provinces(portal).await {
        Outcome::Done(directory) => Ok(directory),
        Outcome::Skipped(_) => Ok(ProvinceDirectory::new()),
        Outcome::Fatal(e) => Err(e),
    }
}

/// Lists the provinces known to the portal.
pub struct ProvincesCommand {
    config: Config,
}

impl ProvincesCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the listing and returns formatted output.
    pub async fn execute(&self) -> Result<String, PortalError> {
        let client = PortalClient::new(&self.config)?;
        self.execute_with_client(&client).await
    }

    /// Executes the listing with a provided client (for testing).
    pub async fn execute_with_client(&self, portal: &impl Portal) -> Result<String, PortalError> {
        let directory = load_provinces(portal).await?;
        Ok(Formatter::new(self.config.format).format_provinces(&directory))
    }
}
