use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Turn a goal into an editable, AI-drafted workflow plan
///
/// Describe a goal in plain language, let a language model break it into
/// steps, then edit, reorder, revise and approve the plan. Runs an
/// interactive shell by default, or an MCP server for AI assistants.
#[derive(Parser)]
#[command(version, about, name = "sw")]
pub struct Args {
    /// Path to a JSON config file. Defaults to
    /// $XDG_CONFIG_HOME/stepwise/config.json when it exists
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Model to request, overriding the config file and STEPWISE_MODEL
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive planning shell (default)
    Shell,
    /// Start the MCP server on stdio
    Serve,
    /// Generate a plan for a goal and print it
    #[command(alias = "g")]
    Generate(GenerateArgs),
}

#[derive(clap::Args)]
pub struct GenerateArgs {
    /// Goal in plain language
    #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
    pub goal: Vec<String>,

    /// Print the plan as JSON instead of markdown
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    pub fn goal(&self) -> String {
        self.goal.join(" ")
    }
}
