//! Budget table export stage and the full three-stage run.

use crate::commands::{fetch_subdivisions, load_provinces};
use crate::config::Config;
use crate::error::{Outcome, PortalError, SkipReason};
use crate::format::{export_file_name, write_table};
use crate::portal::{
    parser, Portal, PortalClient, ProvinceDirectory, QueryKey, SubdivisionDirectory,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What an export run produced.
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<(QueryKey, SkipReason)>,
}

impl ExportSummary {
    /// Number of query keys attempted.
    pub fn attempted(&self) -> usize {
        self.written.len() + self.skipped.len()
    }
}

/// Exports the table of a single query key.
///
/// `province_name` and `subdivision_name` only feed the file name.
pub async fn export_table(
    portal: &impl Portal,
    key: &QueryKey,
    province_name: &str,
    subdivision_name: &str,
    output_dir: &Path,
) -> Outcome<PathBuf> {
    let response = match portal.apbd_table(key).await {
        Ok(response) => response,
        Err(e) => return Outcome::Skipped(SkipReason::Transport(e.to_string())),
    };

    if !response.is_ok() {
        return Outcome::Skipped(SkipReason::Status(response.status));
    }

    let table = match parser::parse_budget_table(&response.body) {
        Ok(table) => table.dedup_accounts(),
        Err(reason) => return Outcome::Skipped(reason),
    };
    debug!("Table found: {} columns, {} rows", table.header.len(), table.len());

    let file_name = export_file_name(province_name, &key.year, &key.period, subdivision_name);
    match write_table(output_dir, &file_name, &table) {
        Ok(path) => Outcome::Done(path),
        Err(e) => Outcome::Skipped(SkipReason::Write(e.to_string())),
    }
}

/// Exports every `(province, year, period, subdivision)` combination.
///
/// Subdivisions come from `subdivisions`; a pair that was never fetched
/// contributes nothing. Every failure is logged and skipped.
pub async fn export_tables(
    portal: &impl Portal,
    provinces: &ProvinceDirectory,
    subdivisions: &SubdivisionDirectory,
    selection: &Selection<'_>,
    output_dir: &Path,
) -> ExportSummary {
    let mut summary = ExportSummary::default();

    for province in selection.provinces {
        let province_name = provinces.name_or_unknown(province);

        for year in selection.years {
            for period in selection.periods {
                for subdivision in subdivisions.get(province, year) {
                    let key = QueryKey {
                        period: period.clone(),
                        year: year.clone(),
                        province: province.clone(),
                        subdivision: subdivision.code.clone(),
                    };

                    match export_table(portal, &key, province_name, &subdivision.name, output_dir)
                        .await
                    {
                        Outcome::Done(path) => {
                            info!("Saved {}", path.display());
                            summary.written.push(path);
                        }
                        Outcome::Skipped(reason) => {
                            warn!("Skipping {}: {}", key, reason);
                            summary.skipped.push((key, reason));
                        }
                        Outcome::Fatal(e) => {
                            warn!("Skipping {}: {}", key, e);
                            summary.skipped.push((key, SkipReason::Transport(e.to_string())));
                        }
                    }
                }
            }
        }
    }

    summary
}

/// Province codes, years and periods to cross.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub provinces: &'a [String],
    pub years: &'a [String],
    pub periods: &'a [String],
}

impl<'a> Selection<'a> {
    pub fn from_config(config: &'a Config) -> Self {
        Self { provinces: &config.provinces, years: &config.years, periods: &config.periods }
    }
}

/// Runs all three stages: provinces, subdivisions, tables.
pub struct ExportCommand {
    config: Config,
}

impl ExportCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Executes the run. Fails only when the province stage fails.
    pub async fn execute(&self) -> Result<ExportSummary, PortalError> {
        let client = PortalClient::new(&self.config)?;
        self.execute_with_client(&client).await
    }

    /// Executes the run with a provided client (for testing).
    pub async fn execute_with_client(
        &self,
        portal: &impl Portal,
    ) -> Result<ExportSummary, PortalError> {
        let selection = Selection::from_config(&self.config);
        info!(
            "Exporting provinsi {:?}, tahun {:?}, periode {:?}",
            selection.provinces, selection.years, selection.periods
        );

        let provinces = load_provinces(portal).await?;
        let subdivisions = fetch_subdivisions(portal, selection.provinces, selection.years).await;
        let summary =
            export_tables(portal, &provinces, &subdivisions, &selection, &self.config.output_dir)
                .await;

        info!(
            "Export finished: {} written, {} skipped",
            summary.written.len(),
            summary.skipped.len()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::MockPortal;
    use crate::portal::{PemdaKey, PortalResponse, Subdivision};
    use tempfile::TempDir;

    const LANDING: &str = r#"
        <select id="sel_provinsi">
            <option value="12">DI Yogyakarta</option>
        </select>
    "#;

    const TABLE: &str = r#"
        <table>
            <tr><th>Akun</th><th>Anggaran</th><th></th></tr>
            <tr><td>Pendapatan</td><td>100</td><td></td></tr>
            <tr><td>Belanja</td><td>80</td><td></td></tr>
            <tr><td>Pendapatan</td><td>100</td><td></td></tr>
        </table>
    "#;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn make_key(subdivision: &str) -> QueryKey {
        QueryKey {
            period: "1".into(),
            year: "2015".into(),
            province: "12".into(),
            subdivision: subdivision.into(),
        }
    }

    fn make_config(dir: &Path) -> Config {
        Config { delay_ms: 0, delay_jitter_ms: 0, output_dir: dir.to_path_buf(), ..Config::default() }
    }

    #[tokio::test]
    async fn test_export_table_writes_deduplicated_csv() {
        let dir = TempDir::new().unwrap();
        let portal = MockPortal::new(PortalResponse::new(200, LANDING)).with_table(
            "12",
            "2015",
            "1",
            "3401",
            PortalResponse::new(200, TABLE),
        );

        let outcome =
            export_table(&portal, &make_key("3401"), "DI Yogyakarta", "Kulon Progo", dir.path())
                .await;

        let Outcome::Done(path) = outcome else {
            panic!("expected export");
        };
        assert_eq!(path, dir.path().join("apbd_DI Yogyakarta_2015_1_Kulon Progo.csv"));
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "Akun,Anggaran\nPendapatan,100\nBelanja,80\n"
        );
    }

    #[tokio::test]
    async fn test_export_table_skips() {
        let dir = TempDir::new().unwrap();
        let mut portal = MockPortal::new(PortalResponse::new(200, LANDING))
            .with_table("12", "2015", "1", "3402", PortalResponse::new(200, "<p>kosong</p>"))
            .with_table("12", "2015", "1", "3403", PortalResponse::new(200, "<table></table>"));
        portal.unreachable_tables.insert("3404".to_string());

        let cases = [
            ("3401", SkipReason::Status(404)),
            ("3402", SkipReason::TableNotFound),
            ("3403", SkipReason::EmptyTable),
        ];
        for (code, expected) in cases {
            let outcome = export_table(&portal, &make_key(code), "P", "S", dir.path()).await;
            assert_eq!(outcome.skip_reason(), Some(&expected));
        }

        let outcome = export_table(&portal, &make_key("3404"), "P", "S", dir.path()).await;
        assert!(matches!(outcome.skip_reason(), Some(SkipReason::Transport(_))));

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_export_table_write_failure_is_skip() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        let portal = MockPortal::new(PortalResponse::new(200, LANDING)).with_table(
            "12",
            "2015",
            "1",
            "3401",
            PortalResponse::new(200, TABLE),
        );

        let outcome = export_table(&portal, &make_key("3401"), "P", "S", &missing).await;
        assert!(matches!(outcome.skip_reason(), Some(SkipReason::Write(_))));
    }

    #[tokio::test]
    async fn test_export_tables_iteration_order_and_unknown_province() {
        let dir = TempDir::new().unwrap();
        let portal = MockPortal::new(PortalResponse::new(200, LANDING))
            .with_table("99", "2015", "1", "9901", PortalResponse::new(200, TABLE))
            .with_table("99", "2015", "2", "9901", PortalResponse::new(200, TABLE));

        let mut subdivisions = SubdivisionDirectory::new();
        subdivisions.insert(
            PemdaKey::new("99", "2015"),
            vec![
                Subdivision { code: "9901".into(), name: "Alpha".into() },
                Subdivision { code: "9902".into(), name: "Beta".into() },
            ],
        );

        let provinces = strings(&["99"]);
        let years = strings(&["2015", "2016"]);
        let periods = strings(&["1", "2"]);
        let selection =
            Selection { provinces: &provinces, years: &years, periods: &periods };

        let summary = export_tables(
            &portal,
            &ProvinceDirectory::new(),
            &subdivisions,
            &selection,
            dir.path(),
        )
        .await;

        assert_eq!(
            portal.calls(),
            vec![
                "table 99 2015 1 9901",
                "table 99 2015 1 9902",
                "table 99 2015 2 9901",
                "table 99 2015 2 9902",
            ]
        );
        assert_eq!(summary.attempted(), 4);
        assert_eq!(summary.written.len(), 2);
        assert!(dir.path().join("apbd_Unknown_2015_1_Alpha.csv").exists());
        assert!(dir.path().join("apbd_Unknown_2015_2_Alpha.csv").exists());
        assert_eq!(summary.skipped[0].0.subdivision, "9902");
        assert_eq!(summary.skipped[0].1, SkipReason::Status(404));
    }

    #[tokio::test]
    async fn test_full_run() {
        let dir = TempDir::new().unwrap();
        let portal = MockPortal::new(PortalResponse::new(200, LANDING))
            .with_pemda(
                "12",
                "2015",
                PortalResponse::new(200, r#"{"3401":"Kulon Progo","3402":"Bantul"}"#),
            )
            .with_table("12", "2015", "1", "3401", PortalResponse::new(200, TABLE))
            .with_table("12", "2015", "1", "3402", PortalResponse::new(503, "busy"));

        let summary =
            ExportCommand::new(make_config(dir.path())).execute_with_client(&portal).await.unwrap();

        assert_eq!(summary.written, vec![dir.path().join("apbd_DI Yogyakarta_2015_1_Kulon Progo.csv")]);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].1, SkipReason::Status(503));
        assert_eq!(
            portal.calls(),
            vec!["landing", "pemda 12 2015", "table 12 2015 1 3401", "table 12 2015 1 3402"]
        );
    }

    #[tokio::test]
    async fn test_full_run_without_pemda_is_empty() {
        let dir = TempDir::new().unwrap();
        let portal = MockPortal::new(PortalResponse::new(200, LANDING));

        let summary =
            ExportCommand::new(make_config(dir.path())).execute_with_client(&portal).await.unwrap();

        assert_eq!(summary.attempted(), 0);
        assert_eq!(portal.calls(), vec!["landing", "pemda 12 2015"]);
    }

    #[tokio::test]
    async fn test_full_run_aborts_when_landing_unreachable() {
        let dir = TempDir::new().unwrap();
        let mut portal = MockPortal::new(PortalResponse::new(200, LANDING))
            .with_pemda("12", "2015", PortalResponse::new(200, r#"{"3401":"Kulon Progo"}"#));
        portal.unreachable_landing = true;

        let err = ExportCommand::new(make_config(dir.path()))
            .execute_with_client(&portal)
            .await
            .unwrap_err();

        assert!(matches!(err, PortalError::Transport(_)));
        assert_eq!(portal.calls(), vec!["landing"]);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_full_run_aborts_on_landing_failure() {
        let dir = TempDir::new().unwrap();
        let portal = MockPortal::new(PortalResponse::new(500, "down"));

        let err = ExportCommand::new(make_config(dir.path()))
            .execute_with_client(&portal)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(portal.calls(), vec!["landing"]);
    }
}
