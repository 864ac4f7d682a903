//! Beicun command-line entry point.

mod backend;
mod commands;
mod config;
mod progress;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use beicun_protocol::{CreateFolderRequest, FileQuery, FolderQuery, UpdateFolderRequest};
use beicun_storage_client::{HttpStorageClient, SessionContext, default_session_path};
use beicun_uploader::UploadOrchestrator;
use clap::Parser;
use indicatif::HumanBytes;
use tracing_subscriber::EnvFilter;

use crate::backend::ServiceBackend;
use crate::commands::{Cli, Commands, FilesCommand, FoldersCommand};
use crate::config::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,beicun=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match CliConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            CliConfig::default()
        }
    };
    if let Some(url) = cli.base_url {
        config.server.base_url = url;
    }

    let session = open_session(&config)?;
    let client = Arc::new(HttpStorageClient::new(&config.server.base_url, session)?);
    tracing::debug!(base_url = %config.server.base_url, "client ready");

    match cli.command {
        Commands::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            client.login(&email, &password).await?;
            println!("Signed in as {email}");
        }
        Commands::Logout => {
            client.logout().await?;
            println!("Signed out");
        }
        Commands::Upload { folder, paths } => {
            run_upload(client, &config, &folder, &paths).await?;
        }
        Commands::Files(cmd) => run_files(&client, cmd).await?,
        Commands::Folders(cmd) => run_folders(&client, cmd).await?,
        Commands::Stats => {
            let stats = client.storage_stats().await?;
            println!("Files:        {}", stats.total_files);
            println!("  images:     {}", stats.image_count);
            println!("  videos:     {}", stats.video_count);
            println!("  other:      {}", stats.other_count);
            println!("Folders:      {}", stats.total_folders);
            println!("Used space:   {}", HumanBytes(stats.used_space));
            println!("Free space:   {}", HumanBytes(stats.free_space));
            println!("Recent:       {}", stats.recent_uploads);
        }
    }

    Ok(())
}

fn open_session(config: &CliConfig) -> anyhow::Result<Arc<SessionContext>> {
    let session = match config.token_path().or_else(default_session_path) {
        Some(path) => SessionContext::load(path)?,
        None => {
            tracing::warn!("no config directory, session will not be persisted");
            SessionContext::new()
        }
    };
    Ok(Arc::new(session))
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{label}");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn run_upload(
    client: Arc<HttpStorageClient>,
    config: &CliConfig,
    folder: &str,
    paths: &[PathBuf],
) -> anyhow::Result<()> {
    let mut orchestrator = UploadOrchestrator::new(config.upload.settings());
    let events = orchestrator
        .take_events()
        .ok_or_else(|| anyhow!("upload events already taken"))?;
    let renderer = tokio::spawn(progress::render(events));

    let cancel = orchestrator.cancel_token();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling upload");
            cancel.cancel();
        }
    });

    let backend = ServiceBackend::new(client);
    let result = orchestrator.run(&backend, folder, paths).await;

    ctrl_c.abort();
    drop(orchestrator);
    let _ = renderer.await;

    let report = result?;
    for file in &report.uploaded {
        let id = file.file_id.as_deref().unwrap_or("-");
        let how = if file.instant { "already stored" } else { "uploaded" };
        println!("{id}\t{}\t{how}", file.name);
    }
    if !report.rejected.is_empty() {
        println!("{} file(s) skipped", report.rejected.len());
    }
    Ok(())
}

async fn run_files(client: &HttpStorageClient, cmd: FilesCommand) -> anyhow::Result<()> {
    match cmd {
        FilesCommand::List {
            folder,
            kind,
            keyword,
            page,
            page_size,
        } => {
            let query = FileQuery {
                page: Some(page),
                page_size: Some(page_size),
                folder_id: folder,
                kind,
                keyword,
            };
            let listing = client.list_files(&query).await?;
            for f in &listing.items {
                println!(
                    "{}\t{:<6}\t{:>10}\t{}",
                    f.id,
                    f.kind,
                    HumanBytes(f.size).to_string(),
                    f.name
                );
            }
            println!("page {page}, {} of {} file(s)", listing.items.len(), listing.total);
        }
        FilesCommand::Get { id } => {
            let f = client.get_file(&id).await?;
            println!("id:       {}", f.id);
            println!("name:     {}", f.name);
            println!("type:     {} ({})", f.kind, f.mime_type);
            println!("size:     {}", HumanBytes(f.size));
            println!("url:      {}", f.url);
            if let (Some(w), Some(h)) = (f.width, f.height) {
                println!("pixels:   {w}x{h}");
            }
            if let Some(d) = f.duration {
                println!("duration: {d}s");
            }
            println!("folder:   {}", f.folder_id.as_deref().unwrap_or("-"));
            println!("created:  {}", f.created_at);
        }
        FilesCommand::Delete { id } => {
            client.delete_file(&id).await?;
            println!("Deleted {id}");
        }
        FilesCommand::Move { id, to } => {
            client.move_file(&id, to.as_deref()).await?;
            println!("Moved {id} to {}", to.as_deref().unwrap_or("root"));
        }
    }
    Ok(())
}

async fn run_folders(client: &HttpStorageClient, cmd: FoldersCommand) -> anyhow::Result<()> {
    match cmd {
        FoldersCommand::List {
            parent,
            keyword,
            page,
            page_size,
        } => {
            let query = FolderQuery {
                page: Some(page),
                page_size: Some(page_size),
                parent_id: parent,
                keyword,
            };
            let listing = client.list_folders(&query).await?;
            for f in &listing.items {
                println!("{}\t{}\t{}", f.id, f.name, f.path);
            }
            println!("page {page}, {} of {} folder(s)", listing.items.len(), listing.total);
        }
        FoldersCommand::Create {
            name,
            parent,
            description,
        } => {
            let folder = client
                .create_folder(&CreateFolderRequest {
                    name,
                    parent_id: parent,
                    description,
                })
                .await?;
            println!("Created {}\t{}", folder.id, folder.path);
        }
        FoldersCommand::Get { id } => {
            let f = client.get_folder(&id).await?;
            println!("id:          {}", f.id);
            println!("name:        {}", f.name);
            println!("path:        {}", f.path);
            println!("parent:      {}", f.parent_id.as_deref().unwrap_or("-"));
            println!("description: {}", f.description.as_deref().unwrap_or(""));
            println!("created:     {}", f.created_at);
        }
        FoldersCommand::Rename { id, name } => {
            let req = UpdateFolderRequest {
                name: Some(name),
                ..Default::default()
            };
            let folder = client.update_folder(&id, &req).await?;
            println!("Renamed {} to {}", folder.id, folder.name);
        }
        FoldersCommand::Delete { id } => {
            client.delete_folder(&id).await?;
            println!("Deleted folder {id}");
        }
        FoldersCommand::Move { id, to } => {
            client.move_folder(&id, to.as_deref()).await?;
            println!("Moved folder {id} to {}", to.as_deref().unwrap_or("root"));
        }
    }
    Ok(())
}
