//! Data models for provinces, subdivisions and query keys.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name used in export file names when a province code is not in the directory.
pub const UNKNOWN_PROVINCE: &str = "Unknown";

/// A first-level region as listed by the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    pub code: String,
    pub name: String,
}

/// A regency or city (pemda) within a province.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subdivision {
    pub code: String,
    pub name: String,
}

/// Provinces in the order the landing page lists them, looked up by code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProvinceDirectory {
    provinces: Vec<Province>,
}

impl ProvinceDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a province. A repeated code keeps its position and takes the new name.
    pub fn insert(&mut self, code: impl Into<String>, name: impl Into<String>) {
        let code = code.into();
        let name = name.into();
        match self.provinces.iter_mut().find(|p| p.code == code) {
            Some(existing) => existing.name = name,
            None => self.provinces.push(Province { code, name }),
        }
    }

    /// Returns the province name for a code.
    pub fn name(&self, code: &str) -> Option<&str> {
        self.provinces.iter().find(|p| p.code == code).map(|p| p.name.as_str())
    }

    /// Returns the province name, or `Unknown` if the code is not listed.
    pub fn name_or_unknown(&self, code: &str) -> &str {
        self.name(code).unwrap_or(UNKNOWN_PROVINCE)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Province> {
        self.provinces.iter()
    }

    pub fn len(&self) -> usize {
        self.provinces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty()
    }
}

impl<C: Into<String>, N: Into<String>> FromIterator<(C, N)> for ProvinceDirectory {
    fn from_iter<I: IntoIterator<Item = (C, N)>>(iter: I) -> Self {
        let mut directory = Self::new();
        for (code, name) in iter {
            directory.insert(code, name);
        }
        directory
    }
}

/// Key of a subdivision listing: one province in one budget year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PemdaKey {
    pub province: String,
    pub year: String,
}

impl PemdaKey {
    pub fn new(province: impl Into<String>, year: impl Into<String>) -> Self {
        Self { province: province.into(), year: year.into() }
    }
}

/// Subdivision listings fetched per `(province, year)`.
#[derive(Debug, Clone, Default)]
pub struct SubdivisionDirectory {
    entries: HashMap<PemdaKey, Vec<Subdivision>>,
}

impl SubdivisionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: PemdaKey, subdivisions: Vec<Subdivision>) {
        self.entries.insert(key, subdivisions);
    }

    /// Returns the subdivisions for a pair; empty if the pair was never fetched.
    pub fn get(&self, province: &str, year: &str) -> &[Subdivision] {
        self.entries
            .get(&PemdaKey::new(province, year))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, province: &str, year: &str) -> bool {
        self.entries.contains_key(&PemdaKey::new(province, year))
    }

    /// Number of `(province, year)` pairs held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The addressable unit of the export stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryKey {
    pub period: String,
    pub year: String,
    pub province: String,
    pub subdivision: String,
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "provinsi={} tahun={} periode={} pemda={}",
            self.province, self.year, self.period, self.subdivision
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_province_directory_lookup() {
        let directory: ProvinceDirectory = [("A", "Aceh"), ("B", "Bali")].into_iter().collect();
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.name("A"), Some("Aceh"));
        assert_eq!(directory.name("B"), Some("Bali"));
        assert_eq!(directory.name("C"), None);
    }

    #[test]
    fn test_province_directory_unknown() {
        let directory = ProvinceDirectory::new();
        assert!(directory.is_empty());
        assert_eq!(directory.name_or_unknown("12"), "Unknown");
    }

    #[test]
    fn test_province_directory_repeated_code() {
        let directory: ProvinceDirectory =
            [("01", "Aceh"), ("02", "Bali"), ("01", "NAD")].into_iter().collect();
        let codes: Vec<_> = directory.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, vec!["01", "02"]);
        assert_eq!(directory.name("01"), Some("NAD"));
    }

    #[test]
    fn test_subdivision_directory_missing_pair_is_empty() {
        let mut directory = SubdivisionDirectory::new();
        directory.insert(
            PemdaKey::new("12", "2015"),
            vec![Subdivision { code: "3401".into(), name: "Kulon Progo".into() }],
        );

        assert!(directory.contains("12", "2015"));
        assert_eq!(directory.get("12", "2015").len(), 1);
        assert!(directory.get("12", "2016").is_empty());
        assert!(!directory.contains("13", "2015"));
    }

    #[test]
    fn test_query_key_display() {
        let key = QueryKey {
            period: "1".into(),
            year: "2015".into(),
            province: "12".into(),
            subdivision: "3401".into(),
        };
        assert_eq!(key.to_string(), "provinsi=12 tahun=2015 periode=1 pemda=3401");
    }
}
