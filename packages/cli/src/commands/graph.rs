use super::resolve_area;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use notegraph_graph::{build_graph, graph_stats, GraphOptions};
use notegraph_workspace::Workspace;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct GraphArgs {
    /// Only this area (id or name)
    #[arg(short, long)]
    pub area: Option<String>,

    /// Fill color for every node
    #[arg(long)]
    pub node_color: Option<String>,

    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Only this area (id or name)
    #[arg(short, long)]
    pub area: Option<String>,
}

pub async fn graph(args: GraphArgs, cwd: &Path) -> Result<()> {
    let workspace = Workspace::open_dir(cwd).await?;
    let doc = Arc::clone(workspace.lock().document());
    let viewport = workspace.config().viewport;
    workspace.close().await;

    let area_id = match &args.area {
        Some(area) => Some(resolve_area(area, &doc)?.id.clone()),
        None => None,
    };
    let options = GraphOptions {
        node_color: args.node_color,
        viewport,
    };

    let graph = build_graph(&doc, area_id.as_deref(), &options);
    let json = if args.compact {
        serde_json::to_string(&graph)?
    } else {
        serde_json::to_string_pretty(&graph)?
    };
    println!("{}", json);

    Ok(())
}

pub async fn stats(args: StatsArgs, cwd: &Path) -> Result<()> {
    let workspace = Workspace::open_dir(cwd).await?;
    let doc = Arc::clone(workspace.lock().document());
    workspace.close().await;

    let area_id = match &args.area {
        Some(area) => Some(resolve_area(area, &doc)?.id.clone()),
        None => None,
    };
    let stats = graph_stats(&doc, area_id.as_deref());

    println!("{}", "📊 Graph".bright_blue().bold());
    println!("  Nodes:        {}", stats.node_count.to_string().bold());
    println!("  Edges:        {}", stats.edge_count.to_string().bold());
    println!("  Manual links: {}", stats.manual_link_count);
    println!("  Auto links:   {}", stats.auto_link_count);

    Ok(())
}
