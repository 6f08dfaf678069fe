//! Subdivision (pemda) directory stage.

use crate::config::Config;
use crate::error::{Outcome, PortalError, SkipReason};
use crate::format::Formatter;
use crate::portal::{parser, PemdaKey, Portal, PortalClient, Subdivision, SubdivisionDirectory};
use tracing::{debug, info, warn};

/// Fetches the subdivision listing of one province for one year.
///
/// Every failure is a skip; this stage never aborts the run.
pub async fn fetch_pemda(
    portal: &impl Portal,
    province: &str,
    year: &str,
) -> Outcome<Vec<Subdivision>> {
    let response = match portal.pemda(province, year).await {
        Ok(response) => response,
        Err(e) => return Outcome::Skipped(SkipReason::Transport(e.to_string())),
    };

    if !response.is_ok() {
        return Outcome::Skipped(SkipReason::Status(response.status));
    }

    match parser::parse_subdivisions(&response.body) {
        Ok(subdivisions) => Outcome::Done(subdivisions),
        Err(reason) => Outcome::Skipped(reason),
    }
}

/// Fetches listings for the full cross-product of provinces and years.
///
/// Skipped pairs are absent from the returned directory.
pub async fn fetch_subdivisions(
    portal: &impl Portal,
    provinces: &[String],
    years: &[String],
) -> SubdivisionDirectory {
    let mut directory = SubdivisionDirectory::new();

    for province in provinces {
        for year in years {
            match fetch_pemda(portal, province, year).await {
                Outcome::Done(subdivisions) => {
                    info!(
                        "Provinsi {} tahun {}: {} subdivisions",
                        province,
                        year,
                        subdivisions.len()
                    );
                    debug!("{:?}", subdivisions);
                    directory.insert(PemdaKey::new(province.as_str(), year.as_str()), subdivisions);
                }
                Outcome::Skipped(reason) => {
                    warn!("Skipping provinsi {} tahun {}: {}", province, year, reason);
                }
                Outcome::Fatal(e) => {
                    warn!("Skipping provinsi {} tahun {}: {}", province, year, e);
                }
            }
        }
    }

    directory
}

/// Lists the subdivisions of the configured provinces and years.
pub struct PemdaCommand {
    config: Config,
}

impl PemdaCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the listing and returns formatted output.
    pub async fn execute(&self) -> Result<String, PortalError> {
        let client = PortalClient::new(&self.config)?;
        Ok(self.execute_with_client(&client).await)
    }

    /// Executes the listing with a provided client (for testing).
    pub async fn execute_with_client(&self, portal: &impl Portal) -> String {
        let directory =
            fetch_subdivisions(portal, &self.config.provinces, &self.config.years).await;
        let formatter = Formatter::new(self.config.format);

        let mut sections = Vec::new();
        for province in &self.config.provinces {
            for year in &self.config.years {
                if !directory.contains(province, year) {
                    continue;
                }
                let key = PemdaKey::new(province.as_str(), year.as_str());
                sections.push(formatter.format_subdivisions(&key, directory.get(province, year)));
            }
        }

        if sections.is_empty() {
            return "No subdivisions found.".to_string();
        }
        sections.join("\n\n")
    }
}
