use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io::CONFIG_FILE;
use crate::model::RawNode;

const CONFIG_TEMPLATE: &str = r##"# bookpanel configuration. Every key is optional; the values below are the
# defaults.

[store]
# Bookmark tree in WebExtension BookmarkTreeNode JSON (getTree() output)
file = "bookmarks.json"

[display]
# Longer titles are cut to max_title_length - 2 characters plus ".."
max_title_length = 22
# Links starting with these prefixes are never shown
ignored_schemes = ["place:", "data:"]

[favicon]
service = "https://favicons.githubusercontent.com/"
offline = false

[load]
# One retry after this delay if the bookmark file is not there yet
retry_delay_ms = 250

[log]
# Log file used while the TUI is running (stderr is used otherwise)
# file = "bookpanel.log"

[ui]
# show_key_hints = false
#
# [ui.colors]
# background = "#0C001B"
# text = "#B0AAFF"
# text_bright = "#FFFFFF"
# highlight = "#FB4196"
# dim = "#7D78BF"
"##;

/// The tree written by `bp init --sample`.
pub fn sample_tree() -> RawNode {
    RawNode::root(vec![
        RawNode::folder(
            "1",
            "Bookmarks Toolbar",
            vec![
                RawNode::link("10", "Rust", "https://www.rust-lang.org/"),
                RawNode::link("11", "", "https://docs.rs/"),
                RawNode::separator("12"),
                RawNode::folder(
                    "13",
                    "Reading",
                    vec![
                        RawNode::link("130", "The Rust Programming Language", "https://doc.rust-lang.org/book/"),
                        RawNode::folder(
                            "131",
                            "Papers",
                            vec![RawNode::link("1310", "", "https://arxiv.org/")],
                        ),
                    ],
                ),
                RawNode::link("14", "Most Visited", "place:sort=8&maxResults=10"),
            ],
        ),
        RawNode::folder(
            "2",
            "Other Bookmarks",
            vec![RawNode::folder(
                "20",
                "Tools",
                vec![RawNode::link("200", "crates.io", "https://crates.io/")],
            )],
        ),
    ])
}

pub fn cmd_init(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    init_in(&cwd, &args)
}

fn init_in(dir: &Path, args: &InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() && !args.force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        )
        .into());
    }
    fs::write(&config_path, CONFIG_TEMPLATE)?;
    println!("Wrote {}", config_path.display());

    if args.sample {
        let sample_path = dir.join("bookmarks.json");
        if sample_path.exists() {
            eprintln!("Note: {} exists, leaving it alone", sample_path.display());
        } else {
            let content = serde_json::to_string_pretty(&vec![sample_tree()])?;
            fs::write(&sample_path, content)?;
            println!("Wrote {}", sample_path.display());
        }
    }
    Ok(())
}
