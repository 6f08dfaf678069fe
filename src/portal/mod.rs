//! DJPK portal modules for HTTP client, parsing, and data models.

pub mod client;
pub mod models;
pub mod parser;
pub mod selectors;

pub use client::{Portal, PortalClient, PortalResponse};
pub use models::{PemdaKey, Province, ProvinceDirectory, QueryKey, Subdivision, SubdivisionDirectory};
