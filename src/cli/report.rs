//! `report` command handler.
//!
//! Runs a free-form message through the full classify → gather inventory →
//! dispatch → aggregate pipeline and renders the result as markdown (spec
//! §6 CLI surface, spec §5 reporting).

use crate::orchestrator::Orchestrator;
use crate::reports::render_markdown;
use anyhow::Result;
use std::time::Duration;

/// Run the `report` subcommand, printing the rendered markdown report to
/// stdout.
pub async fn run_report(orchestrator: &Orchestrator, message: &str, deadline: Duration) -> Result<()> {
    let report = orchestrator.run(message, deadline).await;
    print!("{}", render_markdown(&report));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_report_produces_markdown() {
        let orchestrator = Orchestrator::new("test-session");
        let result = run_report(&orchestrator, "What is the EOL of Ubuntu 18.04?", Duration::from_secs(10)).await;
        assert!(result.is_ok());
    }
}
