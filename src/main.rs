// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use stepgraph::boot::{ConfigPipeline, StepCatalog, TemplateResolver};
use stepgraph::config::{load_settings, EngineSettings};
use stepgraph::definition::{DefinitionParser, SchemaVersion, VersionMigrator};
use stepgraph::engine::{Context, Executor, StepRegistry};

/// stepgraph - run declarative step workflows
#[derive(Parser)]
#[command(name = "stepgraph")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Engine settings file (.toml, .yaml or .yml)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a workflow document with the built-in steps
    Run {
        /// Path to the workflow document (JSON)
        workflow: PathBuf,
    },

    /// Run the boot workflow against a configuration file and print the loaded document
    Boot {
        /// Path to the configuration file (JSON or YAML)
        config: PathBuf,
    },

    /// Migrate a workflow document to a newer schema version
    Migrate {
        /// Path to the workflow document (JSON)
        workflow: PathBuf,

        /// Target schema version
        #[arg(long, default_value = "2.2.0")]
        target: String,

        /// Write the migrated document here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the schema version of a workflow document
    Detect {
        /// Path to the workflow document (JSON)
        workflow: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.settings {
        Some(path) => load_settings(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => EngineSettings::default(),
    };
    init_tracing(&settings.logging.filter)?;

    match cli.command {
        Commands::Run { workflow } => run_workflow(&settings, &workflow),
        Commands::Boot { config } => boot(&settings, &config),
        Commands::Migrate {
            workflow,
            target,
            output,
        } => migrate(&workflow, &target, output.as_deref()),
        Commands::Detect { workflow } => detect(&workflow),
    }
}

/// Initializes the tracing subscriber. `RUST_LOG` wins over the settings filter.
fn init_tracing(default_filter: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {e}"))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true))
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    Ok(())
}

fn parser_for(settings: &EngineSettings) -> Result<DefinitionParser> {
    let parser = DefinitionParser::new();
    Ok(match settings.migration.target()? {
        Some(target) => parser.with_migration(target),
        None => parser,
    })
}

fn run_workflow(settings: &EngineSettings, workflow: &Path) -> Result<()> {
    let parser = parser_for(settings)?;
    let definition = parser
        .parse_file(workflow)
        .with_context(|| format!("failed to parse {}", workflow.display()))?;

    let registry = Arc::new(StepRegistry::new());
    let catalog = StepCatalog::new(TemplateResolver::new(&settings.packages.roots), parser);
    catalog.register_all(&registry)?;

    let mut context = Context::new();
    context.seed_variables(&definition.variables);
    let summary = Executor::new(registry).execute(&definition, &mut context)?;

    println!("Executed: {}", summary.executed.join(", "));
    if !summary.skipped.is_empty() {
        println!("Skipped (no registered plugin): {}", summary.skipped.join(", "));
    }
    Ok(())
}

fn boot(settings: &EngineSettings, config: &Path) -> Result<()> {
    let document = ConfigPipeline::new(settings)?
        .run(config)
        .with_context(|| format!("boot failed for {}", config.display()))?;
    println!("{}", serde_json::to_string_pretty(&document.value)?);
    Ok(())
}

fn read_document(path: &Path) -> Result<serde_json::Value> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn migrate(workflow: &Path, target: &str, output: Option<&Path>) -> Result<()> {
    let target: SchemaVersion = target.parse()?;
    let migration = VersionMigrator::new().migrate(&read_document(workflow)?, target)?;
    for warning in &migration.warnings {
        tracing::warn!("{}", warning);
    }

    let rendered = serde_json::to_string_pretty(&migration.document)?;
    match output {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "Migrated {} from v{} to v{} -> {}",
                workflow.display(),
                migration.source,
                migration.target,
                path.display()
            );
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn detect(workflow: &Path) -> Result<()> {
    let migrator = VersionMigrator::new();
    let version = migrator.detect_version(&read_document(workflow)?)?;
    let normalized = migrator.normalize_version(&version);
    let status = if migrator.is_supported_version(&normalized) {
        "supported"
    } else {
        "unsupported"
    };
    println!("{} ({})", normalized, status);
    Ok(())
}
