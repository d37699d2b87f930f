mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    area, content, export, graph, import, init, link, stats, sync, AreaCommand, ContentCommand, ExportArgs,
    GraphArgs, ImportArgs, InitArgs, LinkCommand, StatsArgs, SyncArgs,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Notegraph CLI - local-first notes arranged as a graph
#[derive(Parser, Debug)]
#[command(name = "notegraph")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Workspace directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true)]
    dir: Option<PathBuf>,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a workspace config
    Init(InitArgs),

    /// Manage areas
    Area {
        #[command(subcommand)]
        command: AreaCommand,
    },

    /// Manage contents
    Content {
        #[command(subcommand)]
        command: ContentCommand,
    },

    /// Manage links between contents
    Link {
        #[command(subcommand)]
        command: LinkCommand,
    },

    /// Print the graph projection as JSON
    Graph(GraphArgs),

    /// Summarize the graph
    Stats(StatsArgs),

    /// Export the document to a bound file
    Export(ExportArgs),

    /// Replace the document with a bound file
    Import(ImportArgs),

    /// Reconcile with the remote copy
    Sync(SyncArgs),
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Area { command } => area(command, &cwd).await,
        Command::Content { command } => content(command, &cwd).await,
        Command::Link { command } => link(command, &cwd).await,
        Command::Graph(args) => graph(args, &cwd).await,
        Command::Stats(args) => stats(args, &cwd).await,
        Command::Export(args) => export(args, &cwd).await,
        Command::Import(args) => import(args, &cwd).await,
        Command::Sync(args) => sync(args, &cwd).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
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
    fn test_parse_nested_commands() {
        let cli = Cli::try_parse_from(["notegraph", "-C", "/tmp/ws", "content", "add", "Notes", "Draft"]).unwrap();
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/ws")));
        assert!(matches!(
            cli.command,
            Command::Content {
                command: ContentCommand::Add(_)
            }
        ));

        let cli = Cli::try_parse_from(["notegraph", "sync", "--uid", "u1", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_sync_requires_uid() {
        assert!(Cli::try_parse_from(["notegraph", "sync"]).is_err());
    }
}
