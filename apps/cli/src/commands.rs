use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "beicun")]
#[command(about = "Upload and manage media on a Beicun storage service", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to the per-user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage API base URL, overrides the configuration file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and store the session tokens
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out and forget the session tokens
    Logout,
    /// Upload images and at most one video into a folder
    Upload {
        /// Destination folder id
        #[arg(long)]
        folder: String,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Manage stored files
    #[command(subcommand)]
    Files(FilesCommand),
    /// Manage folders
    #[command(subcommand)]
    Folders(FoldersCommand),
    /// Show storage usage
    Stats,
}

#[derive(Debug, Subcommand)]
pub enum FilesCommand {
    /// List files
    List {
        #[arg(long)]
        folder: Option<String>,
        /// Filter by type (image, video)
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
    /// Show one file
    Get { id: String },
    /// Delete a file
    Delete { id: String },
    /// Move a file to another folder (root when --to is omitted)
    Move {
        id: String,
        #[arg(long)]
        to: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum FoldersCommand {
    /// List folders
    List {
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 50)]
        page_size: u32,
    },
    /// Create a folder
    Create {
        name: String,
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Show one folder
    Get { id: String },
    /// Rename a folder
    Rename { id: String, name: String },
    /// Delete a folder
    Delete { id: String },
    /// Move a folder under another one (root when --to is omitted)
    Move {
        id: String,
        #[arg(long)]
        to: Option<String>,
    },
}
