//! Interactive shell.
//!
//! Reads one command per line and runs it against the session bootstrapped
//! at startup, so a login inside the shell is reused by later commands.
//!
//! Invariants:
//! - A failing command prints its error and the shell keeps going.
//! - `exit`, `quit` or end of input leave the shell.

use anyhow::Result;
use clap::Parser;
use std::io::{BufRead, Write};

use super::{CommandContext, run_one};
use crate::args::Commands;
use crate::interactive::split_words;

/// One shell line, parsed with the same subcommands as the CLI.
#[derive(Debug, Parser)]
#[command(name = "coop", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Commands,
}

/// What to do with one input line.
#[derive(Debug)]
enum Step {
    Skip,
    Exit,
    Run(Commands),
    Invalid(String),
}

fn parse_line(line: &str) -> Step {
    let Some(words) = split_words(line) else {
        return Step::Invalid("Unterminated quote".to_string());
    };
    match words.first().map(String::as_str) {
        None => Step::Skip,
        Some("exit" | "quit") => Step::Exit,
        Some(_) => match ShellLine::try_parse_from(words) {
            Ok(ShellLine {
                command: Commands::Shell,
            }) => Step::Invalid("Already in an interactive shell".to_string()),
            Ok(parsed) => Step::Run(parsed.command),
            Err(e) => Step::Invalid(e.to_string()),
        },
    }
}

fn prompt(ctx: &CommandContext) -> String {
    match ctx.manager.current_user() {
        Some(user) => format!("coop ({})> ", user.display_name()),
        None => "coop> ".to_string(),
    }
}

pub async fn run(ctx: &CommandContext) -> Result<()> {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", prompt(ctx));
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };

        match parse_line(&line?) {
            Step::Skip => {}
            Step::Exit => break,
            Step::Invalid(message) => eprintln!("{message}"),
            Step::Run(command) => {
                if let Err(e) = run_one(command, ctx).await {
                    eprintln!("Error: {e:#}");
                }
            }
        }
    }
    Ok(())
}
