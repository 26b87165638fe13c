//! OpenJS Foundation: Node.js release lifecycle data (spec §4.1.1).
use chrono::NaiveDate;

use super::static_table::{Cycle, ProductLine, StaticTable, VendorProvider};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid static date")
}

fn nodejs_line() -> ProductLine {
    ProductLine {
        slug: "nodejs",
        keywords: &["node.js", "nodejs", "node"],
        cycles: vec![
            Cycle::new("14", Some(d(2023, 4, 30))).lts(),
            Cycle::new("16", Some(d(2023, 9, 11))).lts(),
            Cycle::new("18", Some(d(2025, 4, 30))).lts(),
            Cycle::new("20", Some(d(2026, 4, 30))).lts(),
            Cycle::new("22", Some(d(2027, 4, 30))).lts(),
        ],
    }
}

pub struct NodeJsProvider(VendorProvider);

impl NodeJsProvider {
    #[must_use]
    pub fn new() -> Self {
        let table = StaticTable::new(vec![nodejs_line()]);
        Self(VendorProvider::new(
            "nodejs",
            10,
            table,
            0.95,
            "https://nodejs.org/en/about/previous-releases",
        ))
    }
}

impl Default for NodeJsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl super::Provider for NodeJsProvider {
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
    async fn test_node_18_is_lts() {
        let provider = NodeJsProvider::new();
        let fp = Fingerprint::new("Node.js", Some("18"), ItemKind::Software);
        let result = provider.lookup(&fp).await.unwrap();
        assert_eq!(result.eol_date, Some(d(2025, 4, 30)));
        assert_eq!(result.extra.get("lts"), Some(&serde_json::json!(true)));
    }
}
