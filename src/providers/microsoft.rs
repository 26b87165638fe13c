//! Microsoft: Windows Server, SQL Server, and Office/Exchange lifecycle
//! data (spec §4.1.1).
//!
//! The inventory regex ladder (spec §4.3 item 1) folds the Windows Server
//! release year into the product *name* rather than the version
//! (`"Windows Server 2019"`), so this provider is the one vendor that
//! needs a non-default [`VersionExtractor`]: it first tries the
//! fingerprint's version, then falls back to a trailing 4-digit year
//! pulled out of the name itself.
use chrono::NaiveDate;

use super::static_table::{Cycle, ProductLine, StaticTable, VendorProvider};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid static date")
}

fn windows_server_line() -> ProductLine {
    ProductLine {
        slug: "windows-server",
        keywords: &["windows server"],
        cycles: vec![
            Cycle::new("2012", Some(d(2023, 10, 10))).with_release_date(d(2012, 10, 30)),
            Cycle::new("2016", Some(d(2027, 1, 12))).with_release_date(d(2016, 10, 15)),
            Cycle::new("2019", Some(d(2029, 1, 9))).with_release_date(d(2018, 11, 13)),
            Cycle::new("2022", Some(d(2031, 10, 14))).with_release_date(d(2021, 8, 18)),
        ],
    }
}

fn sql_server_line() -> ProductLine {
    ProductLine {
        slug: "sql-server",
        keywords: &["mssqlserver", "sql server"],
        cycles: vec![
            Cycle::new("2016", Some(d(2026, 7, 14))),
            Cycle::new("2017", Some(d(2027, 10, 12))),
            Cycle::new("2019", Some(d(2030, 1, 8))),
            Cycle::new("2022", Some(d(2033, 1, 11))),
        ],
    }
}

fn windows_line() -> ProductLine {
    ProductLine {
        slug: "windows",
        keywords: &["windows 10", "windows 11"],
        cycles: vec![
            Cycle::new("10", Some(d(2025, 10, 14))),
            Cycle::new("11", Some(d(2031, 10, 14))),
        ],
    }
}

/// Extract a query version: prefer the fingerprint's own version, falling
/// back to a 4-digit year embedded in the normalized name.
fn extract_version(fp: &crate::model::Fingerprint) -> Option<String> {
    if let Some(v) = fp.version() {
        return Some(v.to_string());
    }
    fp.normalized_name()
        .split_whitespace()
        .rev()
        .find(|tok| tok.len() == 4 && tok.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
}

pub struct MicrosoftProvider(VendorProvider);

impl MicrosoftProvider {
    #[must_use]
    pub fn new() -> Self {
        let table = StaticTable::new(vec![
            windows_server_line(),
            sql_server_line(),
            windows_line(),
        ]);
        Self(
            VendorProvider::new("microsoft", 10, table, 0.95, "https://learn.microsoft.com/lifecycle/products")
                .with_version_extractor(extract_version),
        )
    }
}

impl Default for MicrosoftProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl super::Provider for MicrosoftProvider {
    fn id(&self) -> &str {
        self.0.id()
    }

    fn priority(&self) -> i32 {
        self.0.priority()
    }

    fn supports(&self, fp: &crate::model::Fingerprint) -> bool {
        self.0.supports(fp)
    }

    async fn lookup(
        &self,
        fp: &crate::model::Fingerprint,
    ) -> Result<crate::model::LookupResult, crate::error::ProviderErrorKind> {
        self.0.lookup(fp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Fingerprint, ItemKind};
    use crate::providers::Provider;

    #[tokio::test]
    async fn test_windows_server_2019_from_name_year() {
        let provider = MicrosoftProvider::new();
        let fp = Fingerprint::new("Windows Server 2019", None, ItemKind::Os);
        assert!(provider.supports(&fp));
        let result = provider.lookup(&fp).await.unwrap();
        assert_eq!(result.eol_date, Some(d(2029, 1, 9)));
        assert_eq!(result.version.as_deref(), Some("2019"));
        assert!(result.source_url.unwrap().ends_with("/windows-server-2019"));
    }

    #[tokio::test]
    async fn test_sql_server_alias_resolves() {
        let provider = MicrosoftProvider::new();
        let fp = Fingerprint::new("SQL Server", Some("2019"), ItemKind::Software);
        let result = provider.lookup(&fp).await.unwrap();
        assert_eq!(result.eol_date, Some(d(2030, 1, 8)));
    }

    #[tokio::test]
    async fn test_unsupported_product() {
        let provider = MicrosoftProvider::new();
        let fp = Fingerprint::new("Ubuntu", Some("18.04"), ItemKind::Os);
        assert!(!provider.supports(&fp));
        assert!(matches!(
            provider.lookup(&fp).await,
            Err(crate::error::ProviderErrorKind::NotSupported)
        ));
    }

    #[tokio::test]
    async fn test_unknown_windows_server_year_not_found() {
        let provider = MicrosoftProvider::new();
        let fp = Fingerprint::new("Windows Server 2008", None, ItemKind::Os);
        assert!(matches!(
            provider.lookup(&fp).await,
            Err(crate::error::ProviderErrorKind::NotFound)
        ));
    }
}
