use std::{fs::OpenOptions, process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand};
use engine::Engine;
use tracing_subscriber::EnvFilter;

mod settings;

#[derive(Parser, Debug)]
#[command(name = "remitbridge")]
#[command(about = "One-shot migration of the legacy remittance schema into the canonical one")]
struct Cli {
    /// Settings file (TOML). Optional; flags and environment win over it.
    #[arg(long, default_value = "remitbridge")]
    config: String,

    /// Legacy store connection string.
    #[arg(long, env = "SOURCE_DATABASE_URL")]
    source_url: Option<String>,

    /// Canonical store connection string.
    #[arg(long, env = "TARGET_DATABASE_URL")]
    target_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full migration and print the run report as JSON.
    Run,
    /// Provision the canonical schema without migrating anything.
    Schema,
    /// Compare per-entity row counts between the two stores.
    Validate,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match settings::Settings::load(&cli.config) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("failed to read settings: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_tracing(&settings) {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match run(cli, settings).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(
    settings: &settings::Settings,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let level = settings.level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "remitbridge={level},engine={level},schema={level}",
            level = level
        ))
    });

    match &settings.log_path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
    Ok(())
}

async fn run(
    cli: Cli,
    settings: settings::Settings,
) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
    let source_url = cli
        .source_url
        .or(settings.source_url)
        .ok_or("missing source database url (--source-url or settings)")?;
    let target_url = cli
        .target_url
        .or(settings.target_url)
        .ok_or("missing target database url (--target-url or settings)")?;

    let mut builder = Engine::builder()
        .source_url(source_url)
        .target_url(target_url);
    if let Some(batch_size) = settings.batch_size {
        builder = builder.batch_size(batch_size);
    }
    let engine = builder.build().await?;

    match cli.command {
        Command::Schema => {
            engine.create_schema().await?;
            if let Some(path) = &settings.ddl_script {
                engine.apply_ddl_file(path).await?;
            }
            tracing::info!("canonical schema provisioned");
            Ok(true)
        }
        Command::Run => {
            let report = engine.run_full_migration().await;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(report.success)
        }
        Command::Validate => {
            let report = engine.validate().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(report.iter().all(|row| row.matched))
        }
    }
}
