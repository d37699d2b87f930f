use anyhow::Result;
use clap::Args;
use colored::Colorize;
use notegraph_workspace::{WorkspaceConfig, DEFAULT_CONFIG_NAME};
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory for the local document, relative to the workspace
    #[arg(short, long, default_value = ".notegraph")]
    pub data_dir: String,

    /// Remote directory to sync with
    #[arg(short, long)]
    pub remote_dir: Option<String>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!("{} {} already exists", "⚠️".yellow(), DEFAULT_CONFIG_NAME.bright_white());
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Notegraph workspace...".bright_blue().bold());

    let config = WorkspaceConfig {
        data_dir: args.data_dir,
        remote_dir: args.remote_dir,
        ..WorkspaceConfig::default()
    };

    let data_dir = config.data_dir(cwd);
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        println!("  {} Created {}/", "✓".green(), config.data_dir);
    }

    config.save(cwd)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    if config.remote_dir.is_none() {
        println!("  {} No remote directory, sync is disabled", "ℹ".bright_black());
    }

    println!();
    println!("{}", "✅ Workspace initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: notegraph area add Notes");
    println!("  2. Run: notegraph content add Notes \"First note\"");
    println!("  3. Run: notegraph graph");

    Ok(())
}
