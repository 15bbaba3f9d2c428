//! MCP server implementation for Stepwise
//!
//! Exposes one planning session to an AI assistant over the Model Context
//! Protocol. Steps are addressed by 1-based position, as in the shell.

use std::sync::Arc;

use anyhow::Result;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use stepwise_core::{GeneratorConfig, Session};
use tokio::{
    signal::unix::{signal, SignalKind},
    sync::Mutex,
};

pub mod errors;
pub mod handlers;

pub use errors::to_mcp_error;
pub use handlers::{
    AddStep, ArrangeSteps, ExportPlan, Goal, McpHandlers, McpResult, ReorderStep, ReviseStep,
    StepPosition, UpdateStep,
};

const INSTRUCTIONS: &str = r#"Stepwise turns a goal into an ordered, editable workflow plan.

## Core Concepts
- **Plan**: a goal plus ordered steps. There is one current plan per server.
- **Step**: title, description, tool, reasoning, confidence (0-1) and the agent that wrote it.
- Steps are addressed by their 1-based **position** as shown by `show_plan`.

## Workflow
1. `generate_plan` with a goal to have a language model draft the steps, or `set_goal` to start an empty plan.
2. Refine with `add_step`, `update_step`, `delete_step`, `reorder_step`, `arrange_steps` and `revise_step`.
3. `undo` and `redo` walk the last 20 changes.
4. `review_plan`, then `approve_plan` or `cancel_plan`.
5. `export_plan` writes the plan as JSON.

If the language model fails, the error is kept: `retry` repeats the failed request and `abandon` dismisses it.
`session_status` reports the stage, any pending error and whether undo or redo is available."#;

/// MCP server for Stepwise
#[derive(Clone)]
pub struct StepwiseMcpServer {
    session: Arc<Mutex<Session>>,
    config: GeneratorConfig,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl StepwiseMcpServer {
    pub fn new(session: Session, config: GeneratorConfig) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            config,
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> McpHandlers {
        McpHandlers::new(self.session.clone(), self.config.clone())
    }

    #[tool(
        name = "set_goal",
        description = "Start a new, empty plan for a goal without calling the language model. Add steps afterwards with add_step. Replaces the current plan; the previous one stays reachable with undo."
    )]
    async fn set_goal(&self, params: Parameters<Goal>) -> McpResult {
        self.handlers().set_goal(params).await
    }

    #[tool(
        name = "generate_plan",
        description = "Ask the language model to break a goal (plain language, at most 500 characters) into ordered steps and make the result the current plan. Fails if no API key is configured."
    )]
    async fn generate_plan(&self, params: Parameters<Goal>) -> McpResult {
        self.handlers().generate_plan(params).await
    }

    #[tool(
        name = "show_plan",
        description = "Show the current plan with every step in order, including tool, confidence, agent and reasoning."
    )]
    async fn show_plan(&self) -> McpResult {
        self.handlers().show_plan().await
    }

    #[tool(
        name = "add_step",
        description = "Append a step to the end of the current plan. All fields are optional; missing ones get placeholders and the step is marked as a manual entry."
    )]
    async fn add_step(&self, params: Parameters<AddStep>) -> McpResult {
        self.handlers().add_step(params).await
    }

    #[tool(
        name = "update_step",
        description = "Change fields of the step at a position. Only the fields given are changed. Confidence is clamped to 0-1."
    )]
    async fn update_step(&self, params: Parameters<UpdateStep>) -> McpResult {
        self.handlers().update_step(params).await
    }

    #[tool(
        name = "delete_step",
        description = "Delete the step at a position. Remaining steps are renumbered."
    )]
    async fn delete_step(&self, params: Parameters<StepPosition>) -> McpResult {
        self.handlers().delete_step(params).await
    }

    #[tool(
        name = "reorder_step",
        description = "Move the step at position `from` to position `to`. Out-of-range positions leave the plan unchanged."
    )]
    async fn reorder_step(&self, params: Parameters<ReorderStep>) -> McpResult {
        self.handlers().reorder_step(params).await
    }

    #[tool(
        name = "arrange_steps",
        description = "Put every step in a new order at once. `positions` lists the current 1-based positions in the desired order and must name each step exactly once."
    )]
    async fn arrange_steps(&self, params: Parameters<ArrangeSteps>) -> McpResult {
        self.handlers().arrange_steps(params).await
    }

    #[tool(
        name = "revise_step",
        description = "Ask the language model to rewrite the step at a position following an instruction. The step keeps its position and identity."
    )]
    async fn revise_step(&self, params: Parameters<ReviseStep>) -> McpResult {
        self.handlers().revise_step(params).await
    }

    #[tool(
        name = "retry",
        description = "Repeat the last plan generation or step revision that failed. Reports when there is nothing to retry."
    )]
    async fn retry(&self) -> McpResult {
        self.handlers().retry().await
    }

    #[tool(
        name = "abandon",
        description = "Dismiss a failed generation and go back to goal input. The current plan and its history are kept."
    )]
    async fn abandon(&self) -> McpResult {
        self.handlers().abandon().await
    }

    #[tool(
        name = "session_status",
        description = "Report the current plan's goal and step count, the session stage, any pending generation error, and whether undo and redo are available."
    )]
    async fn session_status(&self) -> McpResult {
        self.handlers().session_status().await
    }

    #[tool(name = "undo", description = "Undo the last change to the plan.")]
    async fn undo(&self) -> McpResult {
        self.handlers().undo().await
    }

    #[tool(name = "redo", description = "Redo the last undone change.")]
    async fn redo(&self) -> McpResult {
        self.handlers().redo().await
    }

    #[tool(
        name = "review_plan",
        description = "Summarize the current plan: step count, average confidence, tools and agents involved."
    )]
    async fn review_plan(&self) -> McpResult {
        self.handlers().review_plan().await
    }

    #[tool(name = "approve_plan", description = "Mark the current plan as approved.")]
    async fn approve_plan(&self) -> McpResult {
        self.handlers().approve_plan().await
    }

    #[tool(name = "cancel_plan", description = "Mark the current plan as cancelled.")]
    async fn cancel_plan(&self) -> McpResult {
        self.handlers().cancel_plan().await
    }

    #[tool(
        name = "export_plan",
        description = "Write the current plan as a JSON file named workflow-plan-<millis>.json into a directory (default: the server's working directory). Returns the file path."
    )]
    async fn export_plan(&self, params: Parameters<ExportPlan>) -> McpResult {
        self.handlers().export_plan(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for StepwiseMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "stepwise".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: StepwiseMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Stepwise MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
