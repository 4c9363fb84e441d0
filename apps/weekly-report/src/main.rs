mod assist;
mod cli;
mod config;
mod docx;
mod errors;
mod fill;
mod llm_client;
mod render;
mod report;
mod routes;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands, FillArgs, GenerateArgs, InitTemplateArgs};
use crate::config::Config;
use crate::docx::scaffold::write_default_template;
use crate::fill::{run_fill, FillOptions};
use crate::render::generate_report;
use crate::report::store::load_record;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging; stderr keeps the console prompts clean
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Fill(args) => fill(&config, args).await,
        Commands::Generate(args) => generate(args).await,
        Commands::InitTemplate(args) => init_template(args),
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting weekly-report v{}", env!("CARGO_PKG_VERSION"));
    let addr = format!("{}:{}", config.host, config.port);

    let state = AppState::new(config);
    info!(
        "Template: {} | input: {} (persist: {}) | AI key configured: {} | debug: {}",
        state.config.template_path.display(),
        state.config.input_file.display(),
        state.config.persist_yaml,
        state.llm.has_api_key(),
        state.config.debug
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn fill(config: &Config, args: FillArgs) -> Result<()> {
    let options = FillOptions {
        template: args.template.unwrap_or_else(|| config.template_path.clone()),
        input: args.input.unwrap_or_else(|| config.input_file.clone()),
        output: args.output,
        notes: args.notes,
        style: args.style,
    };
    run_fill(config, options).await
}

async fn generate(args: GenerateArgs) -> Result<()> {
    let record = load_record(&args.input)?;
    tokio::task::spawn_blocking(move || generate_report(&args.template, &record, &args.output))
        .await
        .context("render task failed")??;
    Ok(())
}

fn init_template(args: InitTemplateArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite",
            args.output.display()
        );
    }
    write_default_template(&args.output)
        .with_context(|| format!("Failed to write template {}", args.output.display()))?;
    println!("✓ Wrote template: {}", args.output.display());
    Ok(())
}
