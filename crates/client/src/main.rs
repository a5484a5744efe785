use std::io::{self, Write};

use client::{Flow, api::ApiClient, commands::Command, execute};
use colored::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let api = ApiClient::from_env();

    println!("{}", "=".repeat(60).bright_cyan());
    println!(
        "{}",
        "    🤝 COOPERATIVE DECISIONS 🤝".bright_yellow().bold()
    );
    println!("{}", "=".repeat(60).bright_cyan());
    println!("{} {}", "Backend:".bright_black(), api.base_url().bright_blue());
    println!("{}", "Type `help` for commands, `quit` to leave.".bright_black());
    println!();

    command_loop(&api).await
}

async fn command_loop(api: &ApiClient) -> anyhow::Result<()> {
    loop {
        print!("{}", "> ".bright_green().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            // EOF
            break;
        }

        let command = match Command::parse(&input) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{} {}", "Invalid input:".red(), e);
                continue;
            }
        };

        match execute(api, command).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => println!("{} {}", "❌ Request failed:".red().bold(), e),
        }
    }

    println!();
    println!("{}", "Thanks for deciding together! 👋".bright_cyan().bold());
    Ok(())
}
