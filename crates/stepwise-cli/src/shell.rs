//! Interactive planning shell.

use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use rustyline::{error::ReadlineError, DefaultEditor};
use stepwise_core::display::OperationStatus;

use crate::cli::{Cli, Reply, ShellLine};

const BANNER: &str = "# Stepwise\n\nDescribe a goal and get a step-by-step workflow plan.\n\
Type `goal <text>` to generate a plan, `new <text>` to start one by hand, \
`samples` for ideas, or `help` for all commands.\n";

/// Runs the read-eval-print loop until `quit` or end of input.
pub async fn run(mut cli: Cli) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    cli.renderer().render(BANNER);

    loop {
        let prompt = format!("sw:{}> ", cli.session().stage());
        match rl.readline(&prompt) {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                if let Err(e) = rl.add_history_entry(input) {
                    debug!("shell: history not updated: {e}");
                }

                if !handle_line(&mut cli, input).await {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    info!("shell: exiting");
    Ok(())
}

/// Parses and executes one line. Returns `false` when the shell should stop.
async fn handle_line(cli: &mut Cli, input: &str) -> bool {
    let words = match shell_words::split(input) {
        Ok(words) => words,
        Err(e) => {
            let status = OperationStatus::failure(format!("Cannot parse line: {e}"));
            cli.renderer().render_error(&status.to_string());
            return true;
        }
    };

    let command = match ShellLine::try_parse_from(words) {
        Ok(line) => line.command,
        Err(e) => {
            // Covers `help` as well as usage errors.
            if let Err(io) = e.print() {
                debug!("shell: failed to print usage: {io}");
            }
            return true;
        }
    };

    debug!("shell: {command:?}");
    match cli.execute(command).await {
        Ok(Reply::Markdown(text)) => cli.renderer().render(&text),
        Ok(Reply::Plain(text)) => println!("{text}"),
        Ok(Reply::Quit) => return false,
        Err(e) => {
            cli.renderer()
                .render_error(&OperationStatus::failure(e.to_string()).to_string());
            if e.is_generation_failure() && cli.session().last_request().is_some() {
                cli.renderer()
                    .render_error("Type `retry` to try again or `abandon` to start over.");
            }
        }
    }
    true
}
