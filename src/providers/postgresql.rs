//! PostgreSQL Global Development Group: major-version lifecycle data
//! (spec §4.1.1).
use chrono::NaiveDate;

use super::static_table::{Cycle, ProductLine, StaticTable, VendorProvider};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid static date")
}

fn postgresql_line() -> ProductLine {
    ProductLine {
        slug: "postgresql",
        keywords: &["postgresql", "postgres"],
        cycles: vec![
            Cycle::new("9.6", Some(d(2021, 11, 11))),
            Cycle::new("10", Some(d(2022, 11, 10))),
            Cycle::new("11", Some(d(2023, 11, 9))),
            Cycle::new("12", Some(d(2024, 11, 14))),
            Cycle::new("13", Some(d(2025, 11, 13))),
            Cycle::new("14", Some(d(2026, 11, 12))),
            Cycle::new("15", Some(d(2027, 11, 11))),
            Cycle::new("16", Some(d(2028, 11, 9))),
            Cycle::new("17", Some(d(2029, 11, 8))),
        ],
    }
}

pub struct PostgresqlProvider(VendorProvider);

impl PostgresqlProvider {
    #[must_use]
    pub fn new() -> Self {
        let table = StaticTable::new(vec![postgresql_line()]);
        Self(VendorProvider::new(
            "postgresql",
            10,
            table,
            0.95,
            "https://www.postgresql.org/support/versioning",
        ))
    }
}

impl Default for PostgresqlProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl super::Provider for PostgresqlProvider {
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
    async fn test_postgresql_12_major_resolves() {
        let provider = PostgresqlProvider::new();
        let fp = Fingerprint::new("PostgreSQL", Some("12"), ItemKind::Software);
        let result = provider.lookup(&fp).await.unwrap();
        assert_eq!(result.eol_date, Some(d(2024, 11, 14)));
    }

    #[tokio::test]
    async fn test_postgres_alias_matches() {
        let provider = PostgresqlProvider::new();
        let fp = Fingerprint::new("Postgres", Some("15"), ItemKind::Software);
        assert!(provider.supports(&fp));
    }
}
