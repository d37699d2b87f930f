use super::{ensure_deleted, format_timestamp, resolve_area};
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use notegraph_editor::managers::area::{areas_sorted_by_name, AreaPatch};
use notegraph_workspace::Workspace;
use std::path::Path;

#[derive(Debug, Subcommand)]
pub enum AreaCommand {
    /// Create an area
    Add(AreaAddArgs),
    /// List areas by name
    List,
    /// Rename an area
    Rename(AreaRenameArgs),
    /// Delete an area with its contents and their links
    Remove(AreaRemoveArgs),
}

#[derive(Debug, Args)]
pub struct AreaAddArgs {
    pub name: String,
}

#[derive(Debug, Args)]
pub struct AreaRenameArgs {
    /// Area id or name
    pub area: String,
    pub name: String,
}

#[derive(Debug, Args)]
pub struct AreaRemoveArgs {
    /// Area id or name
    pub area: String,
}

pub async fn area(command: AreaCommand, cwd: &Path) -> Result<()> {
    let workspace = Workspace::open_dir(cwd).await?;
    let result = run(command, &workspace);
    workspace.close().await;
    result
}

fn run(command: AreaCommand, workspace: &Workspace) -> Result<()> {
    let mut store = workspace.lock();

    match command {
        AreaCommand::Add(args) => {
            let area = store.create_area(&args.name)?;
            println!("  {} Created area {} ({})", "✓".green(), area.name.bold(), area.id.bright_black());
        }
        AreaCommand::List => {
            let doc = store.document();
            if doc.areas.is_empty() {
                println!("{}", "⚠️  No areas yet".yellow());
                return Ok(());
            }

            for area in areas_sorted_by_name(doc) {
                let marker = if doc.current_area_id.as_deref() == Some(area.id.as_str()) {
                    "*".green()
                } else {
                    " ".normal()
                };
                println!(
                    "{} {:<24} {:>3} contents  {}  {}",
                    marker,
                    area.name,
                    area.content_ids.len(),
                    format_timestamp(area.updated_at),
                    area.id.bright_black()
                );
            }
        }
        AreaCommand::Rename(args) => {
            let area = resolve_area(&args.area, store.document())?;
            let renamed = store.update_area(
                &area.id,
                AreaPatch {
                    name: Some(args.name),
                },
            )?;
            println!("  {} {} → {}", "✓".green(), area.name, renamed.name.bold());
        }
        AreaCommand::Remove(args) => {
            let area = resolve_area(&args.area, store.document())?;
            let before = store.document().contents.len();
            ensure_deleted(store.delete_area(&area.id))?;
            let removed = before - store.document().contents.len();
            println!(
                "  {} Deleted area {} and {} contents",
                "✓".green(),
                area.name.bold(),
                removed
            );
        }
    }

    Ok(())
}
