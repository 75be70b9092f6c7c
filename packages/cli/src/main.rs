mod commands;
mod context;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{AddArgs, DeleteArgs, ExportArgs, LoginArgs, PushArgs, RenameArgs, ShowArgs};
use context::Context;
use tracing_subscriber::EnvFilter;

/// Lander CLI - build and publish landing pages from the terminal
#[derive(Parser, Debug)]
#[command(name = "lander")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base url of the persistence API (overrides lander.config.json)
    #[arg(long, env = "LANDER_API", global = true)]
    api: Option<String>,

    /// Work against a throwaway in-memory store instead of the API
    #[arg(long, global = true)]
    offline: bool,

    /// Log engine and store activity
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List pages
    List,

    /// Create an empty page
    Create,

    /// Rename a page
    Rename(RenameArgs),

    /// Print a page's HTML
    Show(ShowArgs),

    /// Append headings, paragraphs or images to a page
    Add(AddArgs),

    /// Upload a local HTML file as a page's content
    Push(PushArgs),

    /// Write a page as index.html
    Export(ExportArgs),

    /// Delete a page
    Delete(DeleteArgs),

    /// Log in and remember the session
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let ctx = Context::load(cwd, cli.api, cli.offline)?;

    match cli.command {
        Command::List => commands::list(&ctx).await,
        Command::Create => commands::create(&ctx).await,
        Command::Rename(args) => commands::rename(args, &ctx).await,
        Command::Show(args) => commands::show(args, &ctx).await,
        Command::Add(args) => commands::add(args, &ctx).await,
        Command::Push(args) => commands::push(args, &ctx).await,
        Command::Export(args) => commands::export(args, &ctx).await,
        Command::Delete(args) => commands::delete(args, &ctx).await,
        Command::Login(args) => commands::login(args, &ctx).await,
        Command::Logout => commands::logout(&ctx),
        Command::Whoami => commands::whoami(&ctx),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::parse_from(["lander", "add", "3", "heading", "img", "--language", "en"]);
        match cli.command {
            Command::Add(args) => {
                assert_eq!(args.id, 3);
                assert_eq!(args.items.len(), 2);
                assert_eq!(args.language, Some(lander_common::Language::EN));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
