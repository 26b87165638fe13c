//! Red Hat: RHEL release lifecycle data (spec §4.1.1).
use chrono::NaiveDate;

use super::static_table::{Cycle, ProductLine, StaticTable, VendorProvider};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid static date")
}

fn rhel_line() -> ProductLine {
    ProductLine {
        slug: "rhel",
        keywords: &["red hat enterprise linux", "rhel"],
        cycles: vec![
            Cycle::new("7", Some(d(2024, 6, 30))),
            Cycle::new("8", Some(d(2029, 5, 31))),
            Cycle::new("9", Some(d(2032, 5, 31))),
        ],
    }
}

pub struct RedHatProvider(VendorProvider);

impl RedHatProvider {
    #[must_use]
    pub fn new() -> Self {
        let table = StaticTable::new(vec![rhel_line()]);
        Self(VendorProvider::new(
            "redhat",
            10,
            table,
            0.95,
            "https://access.redhat.com/product-life-cycles/rhel",
        ))
    }
}

impl Default for RedHatProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl super::Provider for RedHatProvider {
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
