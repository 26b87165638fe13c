//! `lookup` command handler.
//!
//! Resolves a single named asset directly, bypassing classification and
//! inventory collection entirely (spec §6 CLI surface).

use crate::model::{Asset, ItemKind};
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::time::Duration;

/// Exit code returned by [`run_lookup`] on success (spec §6: exit 0/2/3).
pub const EXIT_SUCCESS: i32 = 0;
/// Returned when every provider in the cascade reported "not found".
pub const EXIT_NOT_FOUND: i32 = 2;
/// Returned when the cascade was exhausted by transient errors rather than
/// a clean not-found.
pub const EXIT_TRANSIENT_ERROR: i32 = 3;

/// Arguments for [`run_lookup`], collected from the CLI or a caller.
pub struct LookupArgs {
    pub name: String,
    pub version: Option<String>,
    pub kind: Option<ItemKind>,
    pub agent: Option<String>,
    pub deadline: Duration,
}

/// Run the `lookup` subcommand. Returns the process exit code; prints the
/// resolved [`crate::model::LookupResult`] as JSON to stdout.
pub async fn run_lookup(orchestrator: &Orchestrator, args: LookupArgs) -> Result<i32> {
    let kind = args.kind.unwrap_or_else(|| infer_kind(&args.name));
    let mut asset = Asset::new(&args.name, kind);
    if let Some(version) = &args.version {
        asset = asset.with_version(version.clone());
    }

    let result = orchestrator.lookup_asset(&asset, args.agent.as_deref(), args.deadline).await;

    let json = serde_json::to_string_pretty(&result)?;
    println!("{json}");

    if result.success {
        return Ok(EXIT_SUCCESS);
    }

    let transient = result
        .extra
        .get("attempted_providers")
        .and_then(|v| v.as_array())
        .is_some_and(|attempts| {
            attempts.iter().any(|a| {
                a.as_str().is_some_and(|s| !s.ends_with(": not_found"))
            })
        });

    Ok(if transient { EXIT_TRANSIENT_ERROR } else { EXIT_NOT_FOUND })
}

/// Guess whether a bare name looks like an operating system, falling back
/// to software. Reuses the same ladder the inventory collector matches
/// telemetry rows against, so `lookup ubuntu` and an inventory row named
/// `ubuntu` resolve to the same kind.
fn infer_kind(name: &str) -> ItemKind {
    if crate::inventory::match_os_ladder(name).is_some() {
        ItemKind::Os
    } else {
        ItemKind::Software
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_lookup_success_exits_zero() {
        let orchestrator = Orchestrator::new("test-session");
        let args = LookupArgs {
            name: "Ubuntu".to_string(),
            version: Some("18.04".to_string()),
            kind: None,
            agent: None,
            deadline: Duration::from_secs(5),
        };
        let code = run_lookup(&orchestrator, args).await.unwrap();
        assert_eq!(code, EXIT_SUCCESS);
    }

    #[tokio::test]
    async fn test_run_lookup_unknown_asset_is_not_found() {
        let orchestrator = Orchestrator::new("test-session");
        let args = LookupArgs {
            name: "TotallyMadeUpProductXyz".to_string(),
            version: None,
            kind: Some(ItemKind::Software),
            agent: Some("websearch".to_string()),
            deadline: Duration::from_secs(5),
        };
        let code = run_lookup(&orchestrator, args).await.unwrap();
        assert_ne!(code, EXIT_SUCCESS);
    }

    #[test]
    fn test_infer_kind_recognizes_os_names() {
        assert_eq!(infer_kind("Ubuntu 22.04"), ItemKind::Os);
        assert_eq!(infer_kind("PostgreSQL"), ItemKind::Software);
    }
}
