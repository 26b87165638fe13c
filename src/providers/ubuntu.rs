//! Canonical: Ubuntu release lifecycle data (spec §4.1.1).
//!
//! Grounded on the Azure-SKU release-ladder idiom from the retrieval pack's
//! Ubuntu detection helper: a short, hand-curated table of release codes
//! with LTS flags and staggered standard/ESM end dates, matched by a plain
//! keyword rather than anything cleverer.
use chrono::NaiveDate;

use super::static_table::{Cycle, ProductLine, StaticTable, VendorProvider};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid static date")
}

fn ubuntu_line() -> ProductLine {
    ProductLine {
        slug: "ubuntu",
        keywords: &["ubuntu"],
        cycles: vec![
            Cycle::new("14.04", Some(d(2019, 4, 25))).lts(),
            Cycle::new("16.04", Some(d(2021, 4, 30))).lts(),
            Cycle::new("18.04", Some(d(2023, 5, 31)))
                .lts()
                .with_support_end(d(2028, 5, 31)),
            Cycle::new("20.04", Some(d(2025, 4, 23)))
                .lts()
                .with_support_end(d(2030, 4, 23)),
            Cycle::new("22.04", Some(d(2027, 4, 21)))
                .lts()
                .with_support_end(d(2032, 4, 21)),
            Cycle::new("24.04", Some(d(2029, 4, 25)))
                .lts()
                .with_support_end(d(2034, 4, 25)),
        ],
    }
}

pub struct UbuntuProvider(VendorProvider);

impl UbuntuProvider {
    #[must_use]
    pub fn new() -> Self {
        let table = StaticTable::new(vec![ubuntu_line()]);
        Self(VendorProvider::new(
            "ubuntu",
            10,
            table,
            0.95,
            "https://ubuntu.com/about/release-cycle",
        ))
    }
}

impl Default for UbuntuProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl super::Provider for UbuntuProvider {
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
    async fn test_ubuntu_1804_eol_matches_known_date() {
        let provider = UbuntuProvider::new();
        let fp = Fingerprint::new("Ubuntu", Some("18.04"), ItemKind::Os);
        let result = provider.lookup(&fp).await.unwrap();
        assert_eq!(result.eol_date, Some(d(2023, 5, 31)));
        assert_eq!(result.support_end_date, Some(d(2028, 5, 31)));
        assert_eq!(result.extra.get("lts"), Some(&serde_json::json!(true)));
    }

    #[tokio::test]
    async fn test_ubuntu_unknown_release_not_found() {
        let provider = UbuntuProvider::new();
        let fp = Fingerprint::new("Ubuntu", Some("99.10"), ItemKind::Os);
        assert!(matches!(
            provider.lookup(&fp).await,
            Err(crate::error::ProviderErrorKind::NotFound)
        ));
    }
}
