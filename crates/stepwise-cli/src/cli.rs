//! Shell command definitions and their execution.
//!
//! Each shell line is split with `shell-words` and parsed by [`ShellLine`].
//! Argument structs convert into core `params` types, so the shell and the
//! MCP server go through the same session handlers.
//!
//! Steps are addressed by their 1-based position as shown by `show`.

use std::{path::PathBuf, sync::Arc};

use clap::{Args, Parser, Subcommand};
use stepwise_core::{
    display::OperationStatus,
    export::{share_text, write_export},
    params::{self, StepFields},
    session::SAMPLE_GOALS,
    GeneratorConfig, Intent, OpenAiGenerator, PlanGenerator, Result, ReviewSummary, Session,
    Stage, SystemClock, Transition,
};

use crate::renderer::TerminalRenderer;

/// One line of shell input.
#[derive(Parser, Debug)]
#[command(
    name = "sw",
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "{subcommands}"
)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    /// Generate a plan for a goal
    #[command(alias = "g")]
    Goal(TextArgs),
    /// Start an empty plan for a goal and add steps by hand
    New(TextArgs),
    /// List sample goals
    Samples,
    /// Show the current plan
    #[command(alias = "s")]
    Show,
    /// Add a step at the end of the plan
    #[command(alias = "a")]
    Add(StepFieldArgs),
    /// Edit fields of a step
    #[command(alias = "e")]
    Edit(EditArgs),
    /// Delete a step
    #[command(aliases = ["d", "rm"])]
    Delete(PositionArgs),
    /// Move a step one place up
    Up(PositionArgs),
    /// Move a step one place down
    Down(PositionArgs),
    /// Move a step to another position
    #[command(alias = "mv")]
    Move(MoveArgs),
    /// Put all steps in a new order, e.g. `order 3 1 2`
    Order(OrderArgs),
    /// Ask the model to revise a step
    #[command(alias = "r")]
    Revise(ReviseArgs),
    /// Undo the last change
    #[command(alias = "u")]
    Undo,
    /// Redo the last undone change
    Redo,
    /// Review the plan before approving it
    Review,
    /// Go back to editing from review
    Back,
    /// Approve the plan
    Approve,
    /// Cancel the plan
    Cancel,
    /// Retry the last failed generation request
    Retry,
    /// Dismiss a generation error and return to goal input
    Abandon,
    /// Write the plan to a JSON file
    Export(ExportArgs),
    /// Print the plan as shareable text
    Share,
    /// Leave the shell
    #[command(aliases = ["exit", "q"])]
    Quit,
}

/// Free text that may span several words.
#[derive(Args, Debug)]
pub struct TextArgs {
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub words: Vec<String>,
}

impl TextArgs {
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

impl From<TextArgs> for params::Goal {
    fn from(val: TextArgs) -> Self {
        params::Goal { goal: val.text() }
    }
}

/// Step fields settable from the shell.
#[derive(Args, Debug, Default)]
pub struct StepFieldArgs {
    #[arg(short, long, help = "Short title of the step")]
    pub title: Option<String>,
    #[arg(short, long, help = "What needs to be done")]
    pub description: Option<String>,
    #[arg(long = "tool", help = "Tool best suited for the step")]
    pub tool_name: Option<String>,
    #[arg(short, long, help = "Why the step is necessary")]
    pub reasoning: Option<String>,
    #[arg(short, long, help = "Confidence between 0 and 1")]
    pub confidence: Option<f64>,
}

impl From<StepFieldArgs> for StepFields {
    fn from(val: StepFieldArgs) -> Self {
        StepFields {
            title: val.title,
            description: val.description,
            tool_name: val.tool_name,
            reasoning: val.reasoning,
            confidence: val.confidence,
        }
    }
}

#[derive(Args, Debug)]
pub struct PositionArgs {
    #[arg(help = "Position of the step as shown (1-based)")]
    pub position: usize,
}

impl From<PositionArgs> for params::StepPosition {
    fn from(val: PositionArgs) -> Self {
        params::StepPosition {
            position: val.position,
        }
    }
}

#[derive(Args, Debug)]
pub struct EditArgs {
    #[arg(help = "Position of the step as shown (1-based)")]
    pub position: usize,
    #[command(flatten)]
    pub fields: StepFieldArgs,
}

impl From<EditArgs> for params::UpdateStep {
    fn from(val: EditArgs) -> Self {
        params::UpdateStep {
            position: val.position,
            fields: val.fields.into(),
        }
    }
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    #[arg(help = "Current position (1-based)")]
    pub from: usize,
    #[arg(help = "New position (1-based)")]
    pub to: usize,
}

impl From<MoveArgs> for params::ReorderStep {
    fn from(val: MoveArgs) -> Self {
        params::ReorderStep {
            from: val.from,
            to: val.to,
        }
    }
}

#[derive(Args, Debug)]
pub struct OrderArgs {
    #[arg(required = true, num_args = 1.., help = "Current positions in the new order")]
    pub positions: Vec<usize>,
}

impl From<OrderArgs> for params::ArrangeSteps {
    fn from(val: OrderArgs) -> Self {
        params::ArrangeSteps {
            positions: val.positions,
        }
    }
}

#[derive(Args, Debug)]
pub struct ReviseArgs {
    #[arg(help = "Position of the step as shown (1-based)")]
    pub position: usize,
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub instruction: Vec<String>,
}

impl From<ReviseArgs> for params::ReviseStep {
    fn from(val: ReviseArgs) -> Self {
        params::ReviseStep {
            position: val.position,
            instruction: val.instruction.join(" "),
        }
    }
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(long, help = "Directory to write into (default: current directory)")]
    pub dir: Option<PathBuf>,
}

/// What the shell should do with a command's result.
#[derive(Debug, PartialEq)]
pub enum Reply {
    /// Markdown for the renderer
    Markdown(String),
    /// Text to print as-is
    Plain(String),
    Quit,
}

/// Executes shell commands against one session.
pub struct Cli {
    session: Session,
    config: GeneratorConfig,
    generator: Option<Arc<dyn PlanGenerator>>,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(session: Session, config: GeneratorConfig, renderer: TerminalRenderer) -> Self {
        Self {
            session,
            config,
            generator: None,
            renderer,
        }
    }

    /// Uses `generator` instead of building a client from the config.
    #[cfg(test)]
    pub fn with_generator(mut self, generator: Arc<dyn PlanGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn renderer(&self) -> &TerminalRenderer {
        &self.renderer
    }

    /// The generation client, built on first use so manual editing works
    /// without an API key.
    fn generator(&mut self) -> Result<Arc<dyn PlanGenerator>> {
        if let Some(generator) = &self.generator {
            return Ok(Arc::clone(generator));
        }
        let generator: Arc<dyn PlanGenerator> =
            Arc::new(OpenAiGenerator::from_config(&self.config)?);
        self.generator = Some(Arc::clone(&generator));
        Ok(generator)
    }

    pub async fn execute(&mut self, command: ShellCommand) -> Result<Reply> {
        use ShellCommand::*;

        match command {
            Goal(args) => {
                let generator = self.generator()?;
                self.session.generate_plan(&args.text(), generator.as_ref()).await?;
                self.plan_view()
            }
            New(args) => {
                self.session.start_plan(&args.into())?;
                self.plan_view()
            }
            Samples => Ok(Reply::Markdown(samples())),
            Show => self.plan_view(),
            Add(fields) => {
                let transition = self.session.add_step(params::AddStep {
                    fields: fields.into(),
                })?;
                self.after(transition, "Nothing was added")
            }
            Edit(args) => {
                let transition = self.session.edit_step(args.into())?;
                self.after(transition, "Nothing was changed")
            }
            Delete(args) => {
                let transition = self.session.delete_step_at(args.into())?;
                self.after(transition, "Nothing was deleted")
            }
            Up(args) => {
                let transition = match args.position.checked_sub(1) {
                    Some(to) if to > 0 => self.session.move_step(params::ReorderStep {
                        from: args.position,
                        to,
                    })?,
                    _ => Transition::Unchanged,
                };
                self.after(transition, "Step is already first")
            }
            Down(args) => {
                let transition = self.session.move_step(params::ReorderStep {
                    from: args.position,
                    to: args.position.saturating_add(1),
                })?;
                self.after(transition, "Step is already last")
            }
            Move(args) => {
                let transition = self.session.move_step(args.into())?;
                self.after(transition, "Position out of range")
            }
            Order(args) => {
                let transition = self.session.arrange_steps(&args.into())?;
                self.after(transition, "Order is unchanged")
            }
            Revise(args) => {
                let generator = self.generator()?;
                self.session
                    .revise_step_at(&args.into(), generator.as_ref())
                    .await?;
                self.plan_view()
            }
            Undo => {
                let transition = self.session.dispatch(Intent::Undo);
                self.after(transition, "Nothing to undo")
            }
            Redo => {
                let transition = self.session.dispatch(Intent::Redo);
                self.after(transition, "Nothing to redo")
            }
            Review => {
                self.session.set_stage(Stage::Review)?;
                let plan = self.session.require_plan()?;
                Ok(Reply::Markdown(format!(
                    "{}\n{plan}\nType `approve`, `cancel` or `back`.\n",
                    ReviewSummary::of(plan)
                )))
            }
            Back => {
                self.session.set_stage(Stage::Planning)?;
                self.plan_view()
            }
            Approve => {
                self.session.approve()?;
                Ok(status(
                    OperationStatus::success("Plan approved 🎉"),
                    "Type `export` to save it or `share` to print it.",
                ))
            }
            Cancel => {
                self.session.cancel()?;
                Ok(status(
                    OperationStatus::success("Plan cancelled"),
                    "Type `goal <text>` to start again.",
                ))
            }
            Retry => {
                let generator = self.generator()?;
                if self.session.retry(generator.as_ref()).await? {
                    self.plan_view()
                } else {
                    Ok(status(OperationStatus::failure("Nothing to retry"), ""))
                }
            }
            Abandon => {
                self.session.abandon();
                Ok(status(
                    OperationStatus::success("Back to goal input"),
                    "Type `goal <text>` or `samples`.",
                ))
            }
            Export(args) => {
                let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
                let path = write_export(self.session.require_plan()?, &dir, &SystemClock)?;
                Ok(status(
                    OperationStatus::success(format!("Exported plan to {}", path.display())),
                    "",
                ))
            }
            Share => Ok(Reply::Plain(share_text(self.session.require_plan()?))),
            Quit => Ok(Reply::Quit),
        }
    }

    fn after(&self, transition: Transition, unchanged: &str) -> Result<Reply> {
        match transition {
            Transition::Committed | Transition::Restored => self.plan_view(),
            Transition::Unchanged => Ok(status(OperationStatus::failure(unchanged), "")),
        }
    }

    fn plan_view(&self) -> Result<Reply> {
        let plan = self.session.require_plan()?;
        Ok(Reply::Markdown(format!(
            "{plan}\n---\nStage: {} | Undo: {} | Redo: {}\n",
            self.session.stage(),
            yes_no(self.session.can_undo()),
            yes_no(self.session.can_redo()),
        )))
    }
}

fn status(status: OperationStatus, hint: &str) -> Reply {
    if hint.is_empty() {
        Reply::Markdown(status.to_string())
    } else {
        Reply::Markdown(format!("{status}{hint}\n"))
    }
}

fn samples() -> String {
    let mut out = String::from("## Sample goals\n\n");
    for (index, goal) in SAMPLE_GOALS.iter().enumerate() {
        out.push_str(&format!("{}. {goal}\n", index + 1));
    }
    out.push_str("\nType `goal <text>` to generate a plan.\n");
    out
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
