use super::{ensure_deleted, resolve_content};
use anyhow::{anyhow, Result};
use clap::{Args, Subcommand, ValueEnum};
use colored::Colorize;
use notegraph_editor::managers::link::{would_create_cycle, LinkDraft, LinkStylePatch};
use notegraph_editor::DocumentStore;
use notegraph_model::{ArrowMode, LineStyle};
use notegraph_workspace::Workspace;
use std::path::Path;

#[derive(Debug, Subcommand)]
pub enum LinkCommand {
    /// Link two contents
    Add(LinkAddArgs),
    /// Restyle a link
    Style(LinkStyleArgs),
    /// List all links
    List,
    /// Delete a link
    Remove(LinkRemoveArgs),
}

#[derive(Debug, Args)]
pub struct LinkAddArgs {
    /// Source content id or title
    pub from: String,
    /// Target content id or title
    pub to: String,

    #[command(flatten)]
    pub style: StyleArgs,
}

#[derive(Debug, Args)]
pub struct LinkStyleArgs {
    pub link_id: String,

    #[command(flatten)]
    pub style: StyleArgs,
}

#[derive(Debug, Args)]
pub struct LinkRemoveArgs {
    pub link_id: String,
}

#[derive(Debug, Args)]
pub struct StyleArgs {
    #[arg(long)]
    pub color: Option<String>,

    #[arg(long, value_enum)]
    pub line: Option<LineArg>,

    #[arg(long, value_enum)]
    pub arrow: Option<ArrowArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LineArg {
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ArrowArg {
    None,
    Forward,
    Backward,
    Both,
}

impl From<LineArg> for LineStyle {
    fn from(arg: LineArg) -> Self {
        match arg {
            LineArg::Solid => LineStyle::Solid,
            LineArg::Dashed => LineStyle::Dashed,
            LineArg::Dotted => LineStyle::Dotted,
        }
    }
}

impl From<ArrowArg> for ArrowMode {
    fn from(arg: ArrowArg) -> Self {
        match arg {
            ArrowArg::None => ArrowMode::None,
            ArrowArg::Forward => ArrowMode::Forward,
            ArrowArg::Backward => ArrowMode::Backward,
            ArrowArg::Both => ArrowMode::Both,
        }
    }
}

pub async fn link(command: LinkCommand, cwd: &Path) -> Result<()> {
    let workspace = Workspace::open_dir(cwd).await?;
    let result = run(command, &mut workspace.lock());
    workspace.close().await;
    result
}

fn run(command: LinkCommand, store: &mut DocumentStore) -> Result<()> {
    match command {
        LinkCommand::Add(args) => {
            let from = resolve_content(&args.from, store.document())?;
            let to = resolve_content(&args.to, store.document())?;

            if would_create_cycle(&from.id, &to.id, store.document()) {
                println!("  {} {} is already reachable from {}", "⚠️".yellow(), from.title, to.title);
            }

            let draft = LinkDraft {
                color: args.style.color,
                line_style: args.style.line.map(LineStyle::from),
                arrow_mode: args.style.arrow.map(ArrowMode::from),
                ..LinkDraft::manual(from.id.clone(), to.id.clone())
            };
            let link = store.create_link(draft)?;
            println!(
                "  {} {} → {} ({})",
                "✓".green(),
                from.title.bold(),
                to.title.bold(),
                link.id.bright_black()
            );
        }
        LinkCommand::Style(args) => {
            if args.style.color.is_none() && args.style.line.is_none() && args.style.arrow.is_none() {
                return Err(anyhow!("Nothing to change; pass --color, --line or --arrow"));
            }

            let patch = LinkStylePatch {
                color: args.style.color.map(Some),
                line_style: args.style.line.map(|line| Some(line.into())),
                arrow_mode: args.style.arrow.map(|arrow| Some(arrow.into())),
            };
            let link = store.update_link(&args.link_id, patch)?;
            println!("  {} Restyled {}", "✓".green(), link.id.bright_black());
        }
        LinkCommand::List => {
            let doc = store.document();
            if doc.links.is_empty() {
                println!("{}", "⚠️  No links yet".yellow());
                return Ok(());
            }

            for link in &doc.links {
                let title = |id: &str| doc.content(id).map(|c| c.title.clone()).unwrap_or_else(|| id.to_string());
                println!(
                    "{:<8} {} → {}  {}",
                    format!("{:?}", link.link_type).to_lowercase(),
                    title(&link.from_content_id),
                    title(&link.to_content_id),
                    link.id.bright_black()
                );
            }
        }
        LinkCommand::Remove(args) => {
            ensure_deleted(store.delete_link(&args.link_id))?;
            println!("  {} Deleted link {}", "✓".green(), args.link_id.bright_black());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notegraph_editor::managers::content::ContentDraft;
    use notegraph_model::Document;

    fn store_with_pair() -> DocumentStore {
        let mut store = DocumentStore::new(Document::empty(0));
        let area = store.create_area("Notes").unwrap();
        store.create_content(&area.id, "A", ContentDraft::default()).unwrap();
        store.create_content(&area.id, "B", ContentDraft::default()).unwrap();
        store
    }

    fn add_args(from: &str, to: &str) -> LinkCommand {
        LinkCommand::Add(LinkAddArgs {
            from: from.to_string(),
            to: to.to_string(),
            style: StyleArgs {
                color: Some("#ff0000".to_string()),
                line: Some(LineArg::Dashed),
                arrow: None,
            },
        })
    }

    #[test]
    fn test_add_styled_link() {
        let mut store = store_with_pair();
        run(add_args("A", "B"), &mut store).unwrap();

        let link = &store.document().links[0];
        assert_eq!(link.color.as_deref(), Some("#ff0000"));
        assert_eq!(link.line_style, Some(LineStyle::Dashed));
        assert_eq!(link.arrow_mode, None);
    }

    #[test]
    fn test_reverse_duplicate_rejected() {
        let mut store = store_with_pair();
        run(add_args("A", "B"), &mut store).unwrap();

        assert!(run(add_args("B", "A"), &mut store).is_err());
        assert_eq!(store.document().links.len(), 1);
    }

    #[test]
    fn test_remove_missing_link_fails() {
        let mut store = store_with_pair();
        let remove = LinkCommand::Remove(LinkRemoveArgs {
            link_id: "nope".to_string(),
        });
        assert!(run(remove, &mut store).is_err());
    }
}
