//! Python Software Foundation: CPython release lifecycle data (spec
//! §4.1.1).
use chrono::NaiveDate;

use super::static_table::{Cycle, ProductLine, StaticTable, VendorProvider};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid static date")
}

fn python_line() -> ProductLine {
    ProductLine {
        slug: "python",
        keywords: &["python", "cpython"],
        cycles: vec![
            Cycle::new("3.8", Some(d(2024, 10, 7))),
            Cycle::new("3.9", Some(d(2025, 10, 5))),
            Cycle::new("3.10", Some(d(2026, 10, 4))),
            Cycle::new("3.11", Some(d(2027, 10, 24))),
            Cycle::new("3.12", Some(d(2028, 10, 2))),
            Cycle::new("3.13", Some(d(2029, 10, 1))),
        ],
    }
}

pub struct PythonProvider(VendorProvider);

impl PythonProvider {
    #[must_use]
    pub fn new() -> Self {
        let table = StaticTable::new(vec![python_line()]);
        Self(VendorProvider::new(
            "python",
            10,
            table,
            0.95,
            "https://devguide.python.org/versions",
        ))
    }
}

impl Default for PythonProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl super::Provider for PythonProvider {
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
    async fn test_python_311_resolves() {
        let provider = PythonProvider::new();
        let fp = Fingerprint::new("Python", Some("3.11"), ItemKind::Software);
        let result = provider.lookup(&fp).await.unwrap();
        assert_eq!(result.eol_date, Some(d(2027, 10, 24)));
    }

    #[tokio::test]
    async fn test_cpython_alias_matches() {
        let provider = PythonProvider::new();
        let fp = Fingerprint::new("CPython", Some("3.9"), ItemKind::Software);
        assert!(provider.supports(&fp));
    }
}
