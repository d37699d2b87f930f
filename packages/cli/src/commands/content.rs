use super::{ensure_deleted, format_timestamp, now_millis, resolve_area, resolve_content};
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use notegraph_editor::managers::content::{search_contents, ContentDraft};
use notegraph_editor::managers::property::create_property;
use notegraph_editor::DocumentStore;
use notegraph_model::{Content, ContentStatus, PropertyValue};
use notegraph_workspace::Workspace;
use std::path::Path;

#[derive(Debug, Subcommand)]
pub enum ContentCommand {
    /// Create a content in an area
    Add(ContentAddArgs),
    /// List contents
    List(ContentListArgs),
    /// Show one content with its properties and links
    Show(ContentRef),
    /// Mark a content as finished
    Close(ContentRef),
    /// Reopen a closed content
    Open(ContentRef),
    /// Move a content to another area
    Move(ContentMoveArgs),
    /// Attach a property
    Prop(ContentPropArgs),
    /// Delete a content and its links
    Remove(ContentRef),
}

#[derive(Debug, Args)]
pub struct ContentAddArgs {
    /// Area id or name
    pub area: String,
    pub title: String,

    #[arg(short, long)]
    pub emoji: Option<String>,

    /// Parent content id or title
    #[arg(short, long)]
    pub parent: Option<String>,
}

#[derive(Debug, Args)]
pub struct ContentListArgs {
    /// Only contents of this area (id or name)
    #[arg(short, long)]
    pub area: Option<String>,

    /// Case-insensitive title filter
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Hide closed contents
    #[arg(long)]
    pub open_only: bool,
}

#[derive(Debug, Args)]
pub struct ContentRef {
    /// Content id or title
    pub content: String,
}

#[derive(Debug, Args)]
pub struct ContentMoveArgs {
    /// Content id or title
    pub content: String,
    /// Target area id or name
    pub area: String,
}

#[derive(Debug, Args)]
pub struct ContentPropArgs {
    /// Content id or title
    pub content: String,
    pub name: String,

    #[command(flatten)]
    pub value: PropertyValueArgs,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct PropertyValueArgs {
    #[arg(long)]
    pub text: Option<String>,

    #[arg(long)]
    pub number: Option<f64>,

    /// Repeat for several tags
    #[arg(long)]
    pub tag: Vec<String>,

    /// Target content id or title; adds an auto link
    #[arg(long)]
    pub link: Option<String>,
}

pub async fn content(command: ContentCommand, cwd: &Path) -> Result<()> {
    let workspace = Workspace::open_dir(cwd).await?;
    let result = run(command, &mut workspace.lock());
    workspace.close().await;
    result
}

fn run(command: ContentCommand, store: &mut DocumentStore) -> Result<()> {
    match command {
        ContentCommand::Add(args) => {
            let area = resolve_area(&args.area, store.document())?;
            let parent_id = match &args.parent {
                Some(parent) => Some(resolve_content(parent, store.document())?.id.clone()),
                None => None,
            };

            let draft = ContentDraft {
                emoji: args.emoji,
                parent_id,
                ..ContentDraft::default()
            };
            let content = store.create_content(&area.id, &args.title, draft)?;
            println!(
                "  {} Created {} in {} ({})",
                "✓".green(),
                content.title.bold(),
                area.name,
                content.id.bright_black()
            );
        }
        ContentCommand::List(args) => {
            let doc = store.document();
            let area_id = match &args.area {
                Some(area) => Some(resolve_area(area, doc)?.id.clone()),
                None => None,
            };

            let contents: Vec<_> = search_contents(&args.query, area_id.as_deref(), doc)
                .into_iter()
                .filter(|c| !args.open_only || !c.is_closed())
                .collect();

            if contents.is_empty() {
                println!("{}", "⚠️  No contents found".yellow());
                return Ok(());
            }

            for content in contents {
                let area_name = doc.area(&content.area_id).map(|a| a.name.as_str()).unwrap_or("?");
                println!(
                    "{} {:<32} {:<16} {}  {}",
                    status_marker(content),
                    display_title(content),
                    area_name,
                    format_timestamp(content.updated_at),
                    content.id.bright_black()
                );
            }
        }
        ContentCommand::Show(args) => {
            let doc = store.document();
            let content = resolve_content(&args.content, doc)?;

            println!("{} {}", status_marker(&content), display_title(&content).bold());
            println!("  id:      {}", content.id);
            if let Some(area) = doc.area(&content.area_id) {
                println!("  area:    {}", area.name);
            }
            if let Some(parent) = content.parent_id.as_deref().and_then(|id| doc.content(id)) {
                println!("  parent:  {}", parent.title);
            }
            println!("  shapes:  {}", content.body.shapes.len());
            println!("  updated: {}", format_timestamp(content.updated_at));

            for property in &content.properties {
                println!("  {} {} = {}", "•".bright_black(), property.name, describe_value(&property.value));
            }

            for link in doc.links_touching(&content.id) {
                let Some(other) = link.other_end(&content.id).and_then(|id| doc.content(id)) else {
                    continue;
                };
                let arrow = if link.from_content_id == content.id { "→" } else { "←" };
                println!(
                    "  {} {} {} ({:?})",
                    arrow.cyan(),
                    other.title,
                    link.id.bright_black(),
                    link.link_type
                );
            }
        }
        ContentCommand::Close(args) => {
            let target = resolve_content(&args.content, store.document())?;
            let content = store.close_content(&target.id)?;
            println!("  {} Closed {}", "✓".green(), content.title.bold());
        }
        ContentCommand::Open(args) => {
            let target = resolve_content(&args.content, store.document())?;
            let content = store.open_content(&target.id)?;
            println!("  {} Reopened {}", "✓".green(), content.title.bold());
        }
        ContentCommand::Move(args) => {
            let target = resolve_content(&args.content, store.document())?;
            let area = resolve_area(&args.area, store.document())?;
            store.change_content_area(&target.id, &area.id)?;
            println!("  {} Moved {} to {}", "✓".green(), target.title.bold(), area.name);
        }
        ContentCommand::Prop(args) => {
            let target = resolve_content(&args.content, store.document())?;
            let value = property_value(args.value, store)?;
            let property = create_property(&args.name, value, now_millis())?;
            store.add_property_to_content(&target.id, property)?;
            println!("  {} Added {} to {}", "✓".green(), args.name.bold(), target.title);
        }
        ContentCommand::Remove(args) => {
            let target = resolve_content(&args.content, store.document())?;
            ensure_deleted(store.delete_content(&target.id))?;
            println!("  {} Deleted {}", "✓".green(), target.title.bold());
        }
    }

    Ok(())
}

fn property_value(args: PropertyValueArgs, store: &DocumentStore) -> Result<PropertyValue> {
    let value = if let Some(text) = args.text {
        PropertyValue::ShortText(text)
    } else if let Some(number) = args.number {
        PropertyValue::Number(number)
    } else if let Some(target) = args.link {
        PropertyValue::Link(resolve_content(&target, store.document())?.id.clone())
    } else {
        PropertyValue::Tag(args.tag)
    };
    Ok(value)
}

fn describe_value(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Tag(tags) => tags.join(", "),
        PropertyValue::Date(millis) => format_timestamp(*millis),
        PropertyValue::ShortText(text) | PropertyValue::LongText(text) => text.clone(),
        PropertyValue::Number(number) => number.to_string(),
        PropertyValue::Link(target) => format!("→ {}", target),
    }
}

fn status_marker(content: &Content) -> colored::ColoredString {
    match content.status {
        ContentStatus::Open => "○".green(),
        ContentStatus::Closed => "●".bright_black(),
    }
}

fn display_title(content: &Content) -> String {
    match &content.emoji {
        Some(emoji) => format!("{} {}", emoji, content.title),
        None => content.title.clone(),
    }
}
