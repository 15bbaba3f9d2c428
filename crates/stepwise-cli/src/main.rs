//! Stepwise CLI Application
//!
//! Interactive shell, one-shot generation and MCP server for the stepwise
//! workflow planner.

mod args;
mod cli;
mod mcp;
mod renderer;
mod shell;

use anyhow::{Context, Result};
use args::{Args, Commands, GenerateArgs};
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{run_stdio_server, StepwiseMcpServer};
use renderer::TerminalRenderer;
use stepwise_core::{
    session::validate_goal, GeneratorConfig, OpenAiGenerator, SessionBuilder,
};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        config,
        model,
        no_color,
        command,
    } = Args::parse();

    let mut generator_config =
        GeneratorConfig::load(config.as_deref()).context("Failed to load configuration")?;
    if let Some(model) = model {
        generator_config = generator_config.with_model(model);
    }

    let renderer = TerminalRenderer::new(!no_color);

    info!("Stepwise started");

    match command {
        Some(Generate(args)) => generate(args, generator_config, &renderer).await,
        Some(Serve) => {
            info!("Starting Stepwise MCP server");
            let session = SessionBuilder::new().build();
            run_stdio_server(StepwiseMcpServer::new(session, generator_config))
                .await
                .context("MCP server failed")
        }
        Some(Shell) | None => {
            let session = SessionBuilder::new().build();
            shell::run(Cli::new(session, generator_config, renderer)).await
        }
    }
}

/// Generates one plan and prints it.
async fn generate(
    args: GenerateArgs,
    config: GeneratorConfig,
    renderer: &TerminalRenderer,
) -> Result<()> {
    let goal = args.goal();
    validate_goal(&goal)?;

    let generator = OpenAiGenerator::from_config(&config)?;
    let mut session = SessionBuilder::new().build();
    session
        .generate_plan(&goal, &generator)
        .await
        .context("Failed to generate plan")?;

    let plan = session.require_plan()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(plan)?);
    } else {
        renderer.render(&plan.to_string());
    }
    Ok(())
}
