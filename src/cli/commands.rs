use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bp", about = concat!("bookpanel v", env!("CARGO_PKG_VERSION"), " - your bookmarks as panels"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Bookmark tree JSON file (default: [store] file from the config)
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<String>,

    /// Config file (default: ./bookpanel.toml if present)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a starter bookpanel.toml (and optionally a sample bookmark file)
    Init(InitArgs),
    /// Show the top-level panels
    Panels,
    /// Show a folder the way a panel shows it after drilling in
    Folder(FolderArgs),
    /// List the folder ids treated as top-level
    Roots,
    /// Print every link of a panel (what "open in tabs" opens)
    Open(OpenArgs),
    /// Remove a bookmark or folder from the store
    Rm(RmArgs),
    /// Re-render whenever the bookmark file changes
    Watch(WatchArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Also write a small sample bookmarks.json if none exists
    #[arg(long)]
    pub sample: bool,
    /// Overwrite an existing bookpanel.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct FolderArgs {
    /// Folder to show
    pub id: String,
    /// Panel doing the navigation (default: the folder itself)
    #[arg(long)]
    pub panel: Option<String>,
}

#[derive(Args)]
pub struct OpenArgs {
    /// Panel id (the id of the folder the panel was built for)
    pub panel: String,
}

#[derive(Args)]
pub struct RmArgs {
    /// Node id to remove (with its subtree)
    pub id: String,
}

#[derive(Args)]
pub struct WatchArgs {
    /// Stop after this many re-renders
    #[arg(long)]
    pub count: Option<usize>,
}
