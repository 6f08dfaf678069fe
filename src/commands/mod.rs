//! Pipeline stages and CLI command implementations.

pub mod export;
pub mod pemda;
pub mod provinces;

pub use export::{export_table, export_tables, ExportCommand, ExportSummary, Selection};
pub use pemda::{fetch_pemda, fetch_subdivisions, PemdaCommand};
pub use provinces::{fetch_provinces, load_provinces, ProvincesCommand};
