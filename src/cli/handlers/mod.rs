mod init;
pub use init::{cmd_init, sample_tree};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::file_store::JsonFileStore;
use crate::io::store::BookmarkStore;
use crate::model::AppConfig;
use crate::ops::context::BackgroundContext;
use crate::ops::navigation::{NavState, NavigationController};
use crate::ops::render::RenderOptions;
use crate::ops::tabs::{CollectingOpener, open_in_tabs};
use crate::util::logging;

/// How often `watch` checks whether the render went stale
const WATCH_POLL: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let (config, file) = resolve_settings(cli.file.as_deref(), cli.config.as_deref())?;

    match cli.command {
        None => {
            logging::init_for_tui(config.log.file.as_deref());
            crate::tui::run(config, file)
        }
        Some(cmd) => {
            logging::init_stderr();
            let session = Session::open(config, file);
            match cmd {
                // Init is handled in main.rs before config discovery
                Commands::Init(args) => cmd_init(args),
                Commands::Panels => cmd_panels(&session, json),
                Commands::Folder(args) => cmd_folder(&session, args, json),
                Commands::Roots => cmd_roots(&session, json),
                Commands::Open(args) => cmd_open(&session, args, json),
                Commands::Rm(args) => cmd_rm(&session, args),
                Commands::Watch(args) => cmd_watch(&session, args, json),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the config and decide which bookmark file to use (`-f` wins over
/// the config's `[store] file`).
pub fn resolve_settings(
    file: Option<&str>,
    config: Option<&str>,
) -> Result<(AppConfig, PathBuf), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let config = config_io::load_config(config.map(Path::new), &cwd)?;
    let file = match file {
        Some(f) => PathBuf::from(f),
        None => config.store.file.clone(),
    };
    Ok((config, file))
}

/// One CLI invocation: a store, a fresh background context, and the config.
struct Session {
    config: AppConfig,
    store: JsonFileStore,
    ctx: Arc<BackgroundContext>,
}

impl Session {
    fn open(config: AppConfig, file: PathBuf) -> Self {
        let ctx = BackgroundContext::new(RenderOptions::from_config(&config));
        Session {
            store: JsonFileStore::new(file),
            ctx,
            config,
        }
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.config.load.retry_delay_ms)
    }

    fn load(
        &self,
    ) -> Result<(crate::model::PanelTree, crate::model::RootIndex), Box<dyn std::error::Error>>
    {
        Ok(self.ctx.load_with_retry(&self.store, self.retry_delay())?)
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_panels(session: &Session, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (tree, roots) = session.load()?;
    if json {
        let out = PanelsJson {
            panels: &tree.panels,
            roots: &roots,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_tree(&tree) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_folder(
    session: &Session,
    args: FolderArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // populate the cache (and root index) the same way a page would
    session.load()?;

    let mut nav = NavigationController::new(Arc::clone(&session.ctx));
    let panel_id = args.panel.as_deref().unwrap_or(&args.id).to_string();
    let panel = nav.change_folder(&session.store, &panel_id, &args.id)?.clone();

    let state = nav.state(&panel_id);
    if json {
        let (state, parent) = match &state {
            NavState::TopLevel => ("top-level", None),
            NavState::Drilled { parent_id, .. } => ("drilled", Some(parent_id.as_str())),
        };
        let out = FolderJson {
            panel: &panel,
            state,
            parent,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_panel(&panel) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_roots(session: &Session, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (_, roots) = session.load()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&roots)?);
    } else {
        for id in roots.iter() {
            println!("{}", id);
        }
    }
    Ok(())
}

fn cmd_open(session: &Session, args: OpenArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (tree, _) = session.load()?;
    let panel = tree
        .find(&args.panel)
        .ok_or_else(|| format!("panel not found: {}", args.panel))?;

    let mut opener = CollectingOpener::default();
    open_in_tabs(panel, &mut opener);
    if json {
        let out = OpenJson {
            panel: &panel.id,
            urls: opener.urls.iter().map(String::as_str).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for url in &opener.urls {
            println!("{}", url);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_rm(session: &Session, args: RmArgs) -> Result<(), Box<dyn std::error::Error>> {
    session.store.remove(&args.id)?;
    println!("Removed {}", args.id);
    Ok(())
}

// ---------------------------------------------------------------------------
// Watch
// ---------------------------------------------------------------------------

fn cmd_watch(session: &Session, args: WatchArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    session.ctx.attach(&session.store)?;

    let mut renders = 0usize;
    loop {
        let (tree, roots) = session.load()?;
        renders += 1;
        if json {
            let out = PanelsJson {
                panels: &tree.panels,
                roots: &roots,
            };
            println!("{}", serde_json::to_string(&out)?);
        } else {
            if renders > 1 {
                println!();
            }
            println!("# render {} ({} panels)", renders, tree.panels.len());
            for line in format_tree(&tree) {
                println!("{}", line);
            }
        }

        if args.count.is_some_and(|max| renders >= max) {
            return Ok(());
        }
        while session.ctx.is_valid() {
            thread::sleep(WATCH_POLL);
        }
    }
}
