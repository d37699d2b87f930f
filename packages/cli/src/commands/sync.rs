use anyhow::Result;
use clap::Args;
use colored::Colorize;
use notegraph_workspace::{AuthUser, SyncAction, SyncStatus, Workspace};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Signed-in user id; the remote copy lives under users/<uid>/
    #[arg(long)]
    pub uid: String,

    /// Keep syncing on the configured interval until interrupted
    #[arg(short, long)]
    pub watch: bool,
}

pub async fn sync(args: SyncArgs, cwd: &Path) -> Result<()> {
    let workspace = Workspace::open_dir(cwd).await?;
    let (_auth, auth_rx) = watch::channel(Some(AuthUser::approved(args.uid)));
    let reconciler = Arc::new(workspace.reconciler(auth_rx)?);

    let result = if args.watch {
        watch_until_interrupted(&workspace, &reconciler).await
    } else {
        reconciler.force_sync().await.map(report).map_err(Into::into)
    };

    workspace.close().await;
    result
}

async fn watch_until_interrupted(
    workspace: &Workspace,
    reconciler: &Arc<notegraph_workspace::SyncReconciler>,
) -> Result<()> {
    reconciler.add_listener(Arc::new(|status: SyncStatus| {
        let label = match status {
            SyncStatus::Error => status.to_string().red(),
            SyncStatus::Synced => status.to_string().green(),
            _ => status.to_string().bright_black(),
        };
        println!("  sync: {}", label);
    }));

    let interval = workspace.config().sync_interval();
    let handle = reconciler.spawn(interval);
    info!(interval_ms = interval.as_millis() as u64, "Watching for changes");
    println!("{} (Ctrl+C to stop)", "🔄 Syncing".bright_blue().bold());

    tokio::signal::ctrl_c().await?;
    handle.shutdown();

    if let Some(error) = reconciler.last_error() {
        println!("  {} Last error: {}", "✗".red(), error);
    }
    Ok(())
}

fn report(action: SyncAction) {
    let message = match action {
        SyncAction::Pushed => "Pushed local document",
        SyncAction::Pulled => "Pulled remote document",
        SyncAction::Unchanged => "Already in sync",
        SyncAction::Skipped => "Skipped, user cannot sync",
    };
    println!("  {} {}", "✓".green(), message);
}
