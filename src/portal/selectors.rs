//! CSS selectors for the DJPK portal pages.
//!
//! Update this file when the portal changes its markup.

use scraper::Selector;
use std::sync::LazyLock;

/// Province selection control on the landing page.
pub static PROVINCE_SELECT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("select#sel_provinsi").unwrap());

pub static OPTION: LazyLock<Selector> = LazyLock::new(|| Selector::parse("option").unwrap());

/// Results table returned by a budget query. Only the first match is used.
pub static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());

pub static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());

pub static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td, th").unwrap());

/// Attribute carrying the province code on each option.
pub const VALUE_ATTR: &str = "value";
