//! MCP tool handlers implementation

use std::{path::PathBuf, sync::Arc};

use log::debug;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    ErrorData,
};
use schemars::JsonSchema;
use serde::Deserialize;
use stepwise_core::{
    display::OperationStatus,
    export::write_export,
    params as core,
    store::{Intent, Transition},
    GeneratorConfig, OpenAiGenerator, PlanGenerator, ReviewSummary, Session, SystemClock,
};
use tokio::sync::Mutex;

use super::to_mcp_error;

// ============================================================================
// Generic Parameter Wrapper
// ============================================================================
//
// Core parameter types stay free of MCP concerns. The transparent wrapper
// adds the Deserialize and JsonSchema impls the tool router needs while the
// wire format stays exactly that of the wrapped type.

/// Generic MCP wrapper for core parameter types with serde integration
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl<T> McpParams<T>
where
    T: JsonSchema,
{
    pub fn into_inner(self) -> T {
        self.0
    }
}

// Type aliases for cleaner usage in function signatures
pub type Goal = McpParams<core::Goal>;
pub type StepPosition = McpParams<core::StepPosition>;
pub type AddStep = McpParams<core::AddStep>;
pub type UpdateStep = McpParams<core::UpdateStep>;
pub type ReorderStep = McpParams<core::ReorderStep>;
pub type ArrangeSteps = McpParams<core::ArrangeSteps>;
pub type ReviseStep = McpParams<core::ReviseStep>;
pub type ExportPlan = McpParams<core::ExportPlan>;

pub type McpResult = Result<CallToolResult, ErrorData>;

/// Handler implementations for the MCP server
pub struct McpHandlers {
    session: Arc<Mutex<Session>>,
    config: GeneratorConfig,
}

impl McpHandlers {
    pub fn new(session: Arc<Mutex<Session>>, config: GeneratorConfig) -> Self {
        Self { session, config }
    }

    fn generator(&self, context: &str) -> Result<OpenAiGenerator, ErrorData> {
        OpenAiGenerator::from_config(&self.config).map_err(|e| to_mcp_error(context, &e))
    }

    pub async fn set_goal(&self, Parameters(params): Parameters<Goal>) -> McpResult {
        debug!("set_goal: {:?}", params);

        let mut session = self.session.lock().await;
        session
            .start_plan(params.as_ref())
            .map_err(|e| to_mcp_error("Failed to set goal", &e))?;
        plan_result(&session, "Failed to set goal")
    }

    pub async fn generate_plan(&self, Parameters(params): Parameters<Goal>) -> McpResult {
        debug!("generate_plan: {:?}", params);

        let generator = self.generator("Failed to generate plan")?;
        self.run_generation(&generator, params.as_ref()).await
    }

    pub(crate) async fn run_generation(
        &self,
        generator: &dyn PlanGenerator,
        params: &core::Goal,
    ) -> McpResult {
        let mut session = self.session.lock().await;
        session
            .generate_plan(&params.goal, generator)
            .await
            .map_err(|e| to_mcp_error("Failed to generate plan", &e))?;
        plan_result(&session, "Failed to generate plan")
    }

    pub async fn show_plan(&self) -> McpResult {
        let session = self.session.lock().await;
        plan_result(&session, "Failed to show plan")
    }

    pub async fn add_step(&self, Parameters(params): Parameters<AddStep>) -> McpResult {
        debug!("add_step: {:?}", params);

        let mut session = self.session.lock().await;
        let transition = session
            .add_step(params.into_inner())
            .map_err(|e| to_mcp_error("Failed to add step", &e))?;
        transition_result(&session, transition, "No step was added")
    }

    pub async fn update_step(&self, Parameters(params): Parameters<UpdateStep>) -> McpResult {
        debug!("update_step: {:?}", params);

        let mut session = self.session.lock().await;
        let transition = session
            .edit_step(params.into_inner())
            .map_err(|e| to_mcp_error("Failed to update step", &e))?;
        transition_result(&session, transition, "Step was not changed")
    }

    pub async fn delete_step(&self, Parameters(params): Parameters<StepPosition>) -> McpResult {
        debug!("delete_step: {:?}", params);

        let mut session = self.session.lock().await;
        let transition = session
            .delete_step_at(params.into_inner())
            .map_err(|e| to_mcp_error("Failed to delete step", &e))?;
        transition_result(&session, transition, "No step was deleted")
    }

    pub async fn reorder_step(&self, Parameters(params): Parameters<ReorderStep>) -> McpResult {
        debug!("reorder_step: {:?}", params);

        let mut session = self.session.lock().await;
        let transition = session
            .move_step(params.into_inner())
            .map_err(|e| to_mcp_error("Failed to reorder step", &e))?;
        transition_result(&session, transition, "Position out of range, plan unchanged")
    }

    pub async fn arrange_steps(&self, Parameters(params): Parameters<ArrangeSteps>) -> McpResult {
        debug!("arrange_steps: {:?}", params);

        let mut session = self.session.lock().await;
        let transition = session
            .arrange_steps(params.as_ref())
            .map_err(|e| to_mcp_error("Failed to arrange steps", &e))?;
        transition_result(&session, transition, "Order is unchanged")
    }

    pub async fn revise_step(&self, Parameters(params): Parameters<ReviseStep>) -> McpResult {
        debug!("revise_step: {:?}", params);

        let generator = self.generator("Failed to revise step")?;
        let mut session = self.session.lock().await;
        session
            .revise_step_at(params.as_ref(), &generator)
            .await
            .map_err(|e| to_mcp_error("Failed to revise step", &e))?;
        plan_result(&session, "Failed to revise step")
    }

    pub async fn retry(&self) -> McpResult {
        if self.session.lock().await.last_request().is_none() {
            return Ok(status_result(OperationStatus::failure("Nothing to retry")));
        }
        let generator = self.generator("Failed to retry")?;
        self.run_retry(&generator).await
    }

    pub(crate) async fn run_retry(&self, generator: &dyn PlanGenerator) -> McpResult {
        let mut session = self.session.lock().await;
        let retried = session
            .retry(generator)
            .await
            .map_err(|e| to_mcp_error("Failed to retry", &e))?;
        if retried {
            plan_result(&session, "Failed to retry")
        } else {
            Ok(status_result(OperationStatus::failure("Nothing to retry")))
        }
    }

    pub async fn abandon(&self) -> McpResult {
        let mut session = self.session.lock().await;
        session.abandon();
        Ok(CallToolResult::success(vec![Content::text(format!(
            "{}{}",
            OperationStatus::success("Back to goal input"),
            session_footer(&session)
        ))]))
    }

    pub async fn session_status(&self) -> McpResult {
        let session = self.session.lock().await;
        let mut text = match session.current_plan() {
            Some(plan) => format!(
                "Plan: {} ({} step(s), {})
",
                plan.goal,
                plan.steps.len(),
                plan.status
            ),
            None => "Plan: none
".to_string(),
        };
        text.push_str(&session_footer(&session));
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    pub async fn undo(&self) -> McpResult {
        let mut session = self.session.lock().await;
        let transition = session.dispatch(Intent::Undo);
        transition_result(&session, transition, "Nothing to undo")
    }

    pub async fn redo(&self) -> McpResult {
        let mut session = self.session.lock().await;
        let transition = session.dispatch(Intent::Redo);
        transition_result(&session, transition, "Nothing to redo")
    }

    pub async fn review_plan(&self) -> McpResult {
        let session = self.session.lock().await;
        let plan = session
            .require_plan()
            .map_err(|e| to_mcp_error("Failed to review plan", &e))?;
        Ok(CallToolResult::success(vec![Content::text(
            ReviewSummary::of(plan).to_string(),
        )]))
    }

    pub async fn approve_plan(&self) -> McpResult {
        let mut session = self.session.lock().await;
        session
            .approve()
            .map_err(|e| to_mcp_error("Failed to approve plan", &e))?;
        Ok(status_result(OperationStatus::success("Plan approved")))
    }

    pub async fn cancel_plan(&self) -> McpResult {
        let mut session = self.session.lock().await;
        session
            .cancel()
            .map_err(|e| to_mcp_error("Failed to cancel plan", &e))?;
        Ok(status_result(OperationStatus::success("Plan cancelled")))
    }

    pub async fn export_plan(&self, Parameters(params): Parameters<ExportPlan>) -> McpResult {
        debug!("export_plan: {:?}", params);

        let dir = params
            .as_ref()
            .directory
            .as_deref()
            .map_or_else(|| PathBuf::from("."), PathBuf::from);

        let session = self.session.lock().await;
        let path = session
            .require_plan()
            .and_then(|plan| write_export(plan, &dir, &SystemClock))
            .map_err(|e| to_mcp_error("Failed to export plan", &e))?;

        Ok(status_result(OperationStatus::success(format!(
            "Exported plan to {}",
            path.display()
        ))))
    }
}

fn plan_result(session: &Session, context: &str) -> McpResult {
    let plan = session
        .require_plan()
        .map_err(|e| to_mcp_error(context, &e))?;
    Ok(CallToolResult::success(vec![Content::text(format!(
        "{plan}\n---\n{}",
        session_footer(session)
    ))]))
}

/// Stage, undo/redo availability and any pending generation error.
fn session_footer(session: &Session) -> String {
    let mut footer = format!(
        "Stage: {} | Undo: {} | Redo: {}\n",
        session.stage(),
        yes_no(session.can_undo()),
        yes_no(session.can_redo())
    );
    if let Some(error) = session.error() {
        footer.push_str(&format!(
            "Error: {error}\nCall `retry` to try again or `abandon` to dismiss it.\n"
        ));
    }
    footer
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn transition_result(session: &Session, transition: Transition, unchanged: &str) -> McpResult {
    match transition {
        Transition::Committed | Transition::Restored => plan_result(session, unchanged),
        Transition::Unchanged => Ok(status_result(OperationStatus::failure(unchanged))),
    }
}

fn status_result(status: OperationStatus) -> CallToolResult {
    CallToolResult::success(vec![Content::text(status.to_string())])
}
