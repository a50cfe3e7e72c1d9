use anyhow::{Context, Result};
use clap::Parser;
use rustle_provision::cli::{print_run_report, OutputFormat, ProvisionCli};
use rustle_provision::config::{NodeAttributes, SoloConfig};
use rustle_provision::modules::data_bag::DirectoryStore;
use rustle_provision::runtime::{RecipeRunner, RunnerOptions};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = ProvisionCli::parse();

    let mut config = match &cli.config {
        Some(path) => SoloConfig::load(path)
            .await
            .with_context(|| format!("Failed to load solo config from {}", path.display()))?,
        None => SoloConfig::default(),
    };
    if let Some(data_bag_path) = &cli.data_bag_path {
        config.data_bag_path = data_bag_path.clone();
    }
    if cli.why_run {
        config.why_run = true;
    }

    // Initialize tracing
    let level = match cli.verbosity {
        0 => config.log_level()?,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting rustle-provision v{}", env!("CARGO_PKG_VERSION"));
    info!("Data bag path: {}", config.data_bag_path.display());
    if config.why_run {
        info!("Why-run mode: no changes will be made");
    }

    let attributes = NodeAttributes::load(&cli.node_file).await.with_context(|| {
        format!(
            "Failed to load node attributes from {}",
            cli.node_file.display()
        )
    })?;

    let runner = RecipeRunner::with_options(
        DirectoryStore::new(config.data_bag_path.clone()),
        RunnerOptions {
            check_mode: config.why_run,
            node_name: None,
        },
    );
    let report = runner.run_attributes(attributes).await?;

    match cli.format {
        OutputFormat::Text => print_run_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
