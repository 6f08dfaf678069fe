//! apbd-scraper - Regional budget realization (APBD) scraper for the DJPK portal
//!
//! Discovers provinces and their regencies/cities, then exports the budget
//! realization table of each one as CSV.

pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod portal;
pub mod table;

pub use config::Config;
pub use error::{Outcome, PortalError, SkipReason};
pub use portal::{ProvinceDirectory, QueryKey, SubdivisionDirectory};
pub use table::BudgetTable;
