//! Apache Software Foundation: httpd lifecycle data (spec §4.1.1).
//!
//! The 2.4.x line has no announced end-of-life; its [`Cycle`] carries
//! `eol: None` and relies on the `extra["cycle"]` record alone to satisfy
//! the grounded-result invariant, rendering as `Unknown` status rather than
//! a fabricated date.
use chrono::NaiveDate;

use super::static_table::{Cycle, ProductLine, StaticTable, VendorProvider};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid static date")
}

fn httpd_line() -> ProductLine {
    ProductLine {
        slug: "apache-httpd",
        keywords: &["apache httpd", "apache http server", "httpd"],
        cycles: vec![
            Cycle::new("2.2", Some(d(2017, 12, 1))),
            Cycle::new("2.4", None),
        ],
    }
}

pub struct ApacheProvider(VendorProvider);

impl ApacheProvider {
    #[must_use]
    pub fn new() -> Self {
        let table = StaticTable::new(vec![httpd_line()]);
        Self(VendorProvider::new(
            "apache",
            10,
            table,
            0.85,
            "https://httpd.apache.org/docs",
        ))
    }
}

impl Default for ApacheProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl super::Provider for ApacheProvider {
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
