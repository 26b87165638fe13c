//! PHP Group: PHP release lifecycle data (spec §4.1.1).
use chrono::NaiveDate;

use super::static_table::{Cycle, ProductLine, StaticTable, VendorProvider};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid static date")
}

fn php_line() -> ProductLine {
    ProductLine {
        slug: "php",
        keywords: &["php"],
        cycles: vec![
            Cycle::new("7.4", Some(d(2022, 11, 28))),
            Cycle::new("8.0", Some(d(2023, 11, 26))),
            Cycle::new("8.1", Some(d(2025, 11, 25))),
            Cycle::new("8.2", Some(d(2026, 12, 31))),
            Cycle::new("8.3", Some(d(2027, 11, 23))),
        ],
    }
}

pub struct PhpProvider(VendorProvider);

impl PhpProvider {
    #[must_use]
    pub fn new() -> Self {
        let table = StaticTable::new(vec![php_line()]);
        Self(VendorProvider::new(
            "php",
            10,
            table,
            0.95,
            "https://www.php.net/supported-versions",
        ))
    }
}

impl Default for PhpProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl super::Provider for PhpProvider {
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
