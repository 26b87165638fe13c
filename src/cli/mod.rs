//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by
//! main.rs. Each handler implements the business logic for a specific CLI
//! subcommand.

mod inventory;
mod lookup;
mod report;

pub use inventory::{run_inventory, InventoryArgs};
pub use lookup::{run_lookup, LookupArgs, EXIT_NOT_FOUND, EXIT_SUCCESS, EXIT_TRANSIENT_ERROR};
pub use report::run_report;
