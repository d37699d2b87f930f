use super::now_millis;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use notegraph_workspace::{BoundFile, PayloadEncoding, Workspace};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output file
    pub output: PathBuf,

    /// Store the document as a base64 string
    #[arg(long)]
    pub encoded: bool,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Bound file to read
    pub input: PathBuf,
}

pub async fn export(args: ExportArgs, cwd: &Path) -> Result<()> {
    let workspace = Workspace::open_dir(cwd).await?;
    let doc = Arc::clone(workspace.lock().document());
    workspace.close().await;

    let encoding = if args.encoded {
        PayloadEncoding::Base64
    } else {
        PayloadEncoding::Plain
    };
    let file = BoundFile::export(&doc, encoding, now_millis())?;
    file.write_to(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "  {} Exported {} areas, {} contents → {}",
        "✓".green(),
        doc.areas.len(),
        doc.contents.len(),
        args.output.display()
    );
    Ok(())
}

pub async fn import(args: ImportArgs, cwd: &Path) -> Result<()> {
    let file = BoundFile::read_from(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let doc = file.import()?;
    let (areas, contents) = (doc.areas.len(), doc.contents.len());

    let workspace = Workspace::open_dir(cwd).await?;
    workspace.lock().replace_document(doc);
    workspace.close().await;

    println!(
        "  {} Imported {} areas, {} contents from {}",
        "✓".green(),
        areas,
        contents,
        args.input.display()
    );
    Ok(())
}
