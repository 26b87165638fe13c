//! `inventory` command handler.
//!
//! Collects and normalizes OS or software inventory from the configured
//! telemetry backend, without performing any EOL lookups (spec §6 CLI
//! surface).

use crate::inventory::InventoryCollector;
use crate::model::ItemKind;
use anyhow::Result;
use std::time::Duration;

/// Arguments for [`run_inventory`].
pub struct InventoryArgs {
    pub kind: ItemKind,
    pub window: Duration,
    pub limit: usize,
}

/// Run the `inventory` subcommand, printing the collected
/// [`crate::model::Asset`]s as a JSON array to stdout.
pub async fn run_inventory(collector: &InventoryCollector, args: InventoryArgs) -> Result<()> {
    let assets = match args.kind {
        ItemKind::Os => collector.collect_os(args.window, args.limit).await?,
        ItemKind::Software => collector.collect_software(args.window, args.limit).await?,
    };

    let json = serde_json::to_string_pretty(&assets)?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::NoOpBackend;

    #[tokio::test]
    async fn test_run_inventory_os_empty_backend_succeeds() {
        let collector = InventoryCollector::new(Box::new(NoOpBackend));
        let args = InventoryArgs {
            kind: ItemKind::Os,
            window: Duration::from_secs(7 * 86_400),
            limit: 100,
        };
        let result = run_inventory(&collector, args).await;
        assert!(result.is_ok());
    }
}
