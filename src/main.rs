//! eol-sentry: multi-agent end-of-life and support-lifecycle lookup engine.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use eol_sentry::cli::{self, InventoryArgs, LookupArgs};
use eol_sentry::config::{AppConfig, AppConfigBuilder, Validatable};
use eol_sentry::inventory::{InventoryCollector, NoOpBackend};
use eol_sentry::model::ItemKind;
use eol_sentry::orchestrator::Orchestrator;
use eol_sentry::providers::ProviderRegistry;
use eol_sentry::telemetry::Telemetry;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "eol-sentry")]
#[command(author = "Binarly.io")]
#[command(version)]
#[command(about = "Multi-agent end-of-life and support-lifecycle lookup engine", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Resolved successfully
    2  No provider could resolve the asset
    3  Cascade exhausted by transient errors

EXAMPLES:
    # Look up a single asset
    eol-sentry lookup \"Windows Server\" --version 2019

    # Pin a single provider, skipping the router
    eol-sentry lookup ubuntu --version 18.04 --agent ubuntu

    # Collect inventory without running any lookups
    eol-sentry inventory os --days 30

    # Run the full chat pipeline and render a markdown report
    eol-sentry report \"what in our fleet is approaching end of life?\"")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects NO_COLOR env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to a `.eol-sentry.yaml` config file (overrides discovery)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Maximum concurrent provider lookups per request
    #[arg(long, global = true)]
    max_in_flight: Option<usize>,

    /// Overall request deadline, in seconds
    #[arg(long, global = true)]
    deadline_secs: Option<u64>,

    /// Comma-separated provider ids to disable
    #[arg(long, global = true, value_delimiter = ',')]
    disable_provider: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `lookup` subcommand
#[derive(Parser)]
struct LookupCliArgs {
    /// Product or OS name, e.g. "Ubuntu" or "Windows Server"
    name: String,

    /// Version string, e.g. "18.04" or "2019"
    #[arg(short, long)]
    version: Option<String>,

    /// Treat the name as an OS or as software instead of auto-detecting
    #[arg(long, value_enum)]
    kind: Option<CliItemKind>,

    /// Pin the cascade to a single provider id, skipping the router
    #[arg(short, long)]
    agent: Option<String>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CliItemKind {
    Os,
    Software,
}

impl From<CliItemKind> for ItemKind {
    fn from(value: CliItemKind) -> Self {
        match value {
            CliItemKind::Os => Self::Os,
            CliItemKind::Software => Self::Software,
        }
    }
}

/// Arguments for the `inventory` subcommand
#[derive(Parser)]
struct InventoryCliArgs {
    /// Which inventory to collect
    #[arg(value_enum)]
    kind: CliItemKind,

    /// Lookback window, in days
    #[arg(long, default_value = "7")]
    days: u64,

    /// Maximum rows to return
    #[arg(long, default_value = "500")]
    limit: usize,
}

/// Arguments for the `report` subcommand
#[derive(Parser)]
struct ReportCliArgs {
    /// The free-form message to classify and resolve
    message: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single named asset directly
    Lookup(LookupCliArgs),

    /// Collect and print normalized OS or software inventory
    Inventory(InventoryCliArgs),

    /// Run the full chat pipeline and render a markdown report
    Report(ReportCliArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn build_config(cli: &Cli) -> Result<AppConfig> {
    let mut builder = AppConfigBuilder::default();
    if let Some(n) = cli.max_in_flight {
        builder = builder.max_in_flight(n);
    }
    if let Some(secs) = cli.deadline_secs {
        builder = builder.request_deadline_secs(secs);
    }
    if !cli.disable_provider.is_empty() {
        builder = builder.disable_providers(cli.disable_provider.clone());
    }
    builder = builder.quiet(cli.quiet).no_color(cli.no_color);

    let overrides = builder.build();
    let (config, loaded_from) = AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);

    if let Some(path) = &loaded_from {
        tracing::debug!("loaded config from {}", path.display());
    }

    let errors = config.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        anyhow::bail!("invalid configuration:\n  {}", messages.join("\n  "));
    }

    Ok(config)
}

fn build_orchestrator(config: &AppConfig) -> Orchestrator {
    let mut registry = ProviderRegistry::default_registry();
    registry.disable(&config.providers.disabled);

    let cache = config.cache.build_cache();
    let telemetry = Telemetry::with_capacity_and_sink(
        "eol-sentry-cli",
        config.telemetry.ring_capacity,
        std::sync::Arc::new(eol_sentry::telemetry::TracingSink),
    );
    let inventory = InventoryCollector::new(Box::new(NoOpBackend));

    Orchestrator::with_parts(registry, cache, telemetry, inventory, config.orchestrator.to_orchestrator_config())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = build_config(&cli)?;

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    match cli.command {
        Commands::Lookup(args) => {
            let orchestrator = build_orchestrator(&config);
            let deadline = Duration::from_secs(config.orchestrator.request_deadline_secs);
            let lookup_args = LookupArgs {
                name: args.name,
                version: args.version,
                kind: args.kind.map(Into::into),
                agent: args.agent,
                deadline,
            };
            let exit_code = runtime.block_on(cli::run_lookup(&orchestrator, lookup_args))?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }

        Commands::Inventory(args) => {
            let collector = InventoryCollector::new(Box::new(NoOpBackend));
            let inventory_args = InventoryArgs {
                kind: args.kind.into(),
                window: Duration::from_secs(args.days * 86_400),
                limit: args.limit,
            };
            runtime.block_on(cli::run_inventory(&collector, inventory_args))
        }

        Commands::Report(args) => {
            let orchestrator = build_orchestrator(&config);
            let deadline = Duration::from_secs(config.orchestrator.request_deadline_secs);
            runtime.block_on(cli::run_report(&orchestrator, &args.message, deadline))
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "eol-sentry", &mut io::stdout());
            Ok(())
        }

        Commands::ConfigSchema { output } => {
            let schema = eol_sentry::config::generate_json_schema();
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => {
                    println!("{schema}");
                }
            }
            Ok(())
        }
    }
}
