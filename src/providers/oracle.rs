//! Oracle: Oracle Database lifecycle data (spec §4.1.1).
//!
//! Oracle cycle labels carry a trailing letter suffix ("12c", "19c") rather
//! than a bare number; [`crate::utils::version::select_cycle`] already
//! tolerates an alphabetic suffix token when comparing numeric prefixes, so
//! this provider needs no special-casing beyond the suffixed cycle labels
//! themselves.
use chrono::NaiveDate;

use super::static_table::{Cycle, ProductLine, StaticTable, VendorProvider};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid static date")
}

fn oracle_db_line() -> ProductLine {
    ProductLine {
        slug: "oracle-database",
        keywords: &["oracle database", "oracle db"],
        cycles: vec![
            Cycle::new("12c", Some(d(2022, 7, 31))),
            Cycle::new("18c", Some(d(2021, 6, 30))),
            Cycle::new("19c", Some(d(2027, 4, 30))),
            Cycle::new("21c", Some(d(2024, 4, 30))),
        ],
    }
}

pub struct OracleProvider(VendorProvider);

impl OracleProvider {
    #[must_use]
    pub fn new() -> Self {
        let table = StaticTable::new(vec![oracle_db_line()]);
        Self(VendorProvider::new(
            "oracle",
            10,
            table,
            0.9,
            "https://www.oracle.com/database/technologies/appendix-a",
        ))
    }
}

impl Default for OracleProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl super::Provider for OracleProvider {
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
