//! VMware (Broadcom): vSphere/ESXi release lifecycle data (spec §4.1.1).
use chrono::NaiveDate;

use super::static_table::{Cycle, ProductLine, StaticTable, VendorProvider};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid static date")
}

fn esxi_line() -> ProductLine {
    ProductLine {
        slug: "esxi",
        keywords: &["esxi", "vsphere"],
        cycles: vec![
            Cycle::new("6.7", Some(d(2022, 10, 15))),
            Cycle::new("7.0", Some(d(2025, 4, 2))),
            Cycle::new("8.0", Some(d(2027, 10, 1))),
        ],
    }
}

pub struct VmwareProvider(VendorProvider);

impl VmwareProvider {
    #[must_use]
    pub fn new() -> Self {
        let table = StaticTable::new(vec![esxi_line()]);
        Self(VendorProvider::new(
            "vmware",
            10,
            table,
            0.9,
            "https://lifecycle.vmware.com/#/product-overview",
        ))
    }
}

impl Default for VmwareProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl super::Provider for VmwareProvider {
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
    async fn test_esxi_7_resolves() {
        let provider = VmwareProvider::new();
        let fp = Fingerprint::new("ESXi", Some("7.0"), ItemKind::Os);
        let result = provider.lookup(&fp).await.unwrap();
        assert_eq!(result.eol_date, Some(d(2025, 4, 2)));
    }
}
