use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use crate::assistant::{Assistant, report};
use crate::extract::ExtractionPolicy;
use crate::model_gateway::ModelGateway;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Skip,
    Help,
    Policy(ExtractionPolicy),
    Prompt(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    let prompt = line.trim();
    if prompt.is_empty() {
        return Command::Skip;
    }
    if prompt.eq_ignore_ascii_case("exit") || prompt.eq_ignore_ascii_case("quit") {
        return Command::Quit;
    }
    if prompt.eq_ignore_ascii_case("/help") {
        return Command::Help;
    }
    if prompt.eq_ignore_ascii_case("/raw") {
        return Command::Policy(ExtractionPolicy::Raw);
    }
    if prompt.eq_ignore_ascii_case("/code") {
        return Command::Policy(ExtractionPolicy::Code);
    }
    Command::Prompt(prompt)
}

pub async fn run_repl<G: ModelGateway>(assistant: &mut Assistant<G>) -> Result<()> {
    let stdin = io::stdin();
    run_repl_with(assistant, stdin.lock()).await
}

async fn run_repl_with<G, R>(assistant: &mut Assistant<G>, mut input: R) -> Result<()>
where
    G: ModelGateway,
    R: BufRead,
{
    println!("grok console");
    println!(
        "model: {} (extraction: {})",
        assistant.config().model,
        assistant.policy().as_str()
    );
    println!("type a prompt, '/help' for commands, or 'exit' to quit");

    loop {
        print!("grok> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = input.read_line(&mut line).context("Failed to read stdin")?;
        if read == 0 {
            break;
        }

        match parse_command(&line) {
            Command::Quit => break,
            Command::Skip => continue,
            Command::Help => print_help(),
            Command::Policy(policy) => {
                assistant.set_policy(policy);
                println!("extraction: {}\n", policy.as_str());
            }
            Command::Prompt(prompt) => {
                if let Err(err) = assistant.grok(prompt).await {
                    report(&err);
                }
                println!();
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!("/raw   show the model's answer unmodified");
    println!("/code  show only the code block, without #=> results");
    println!("exit   leave the console\n");
}
