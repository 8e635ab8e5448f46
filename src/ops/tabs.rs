use crate::model::Panel;

/// Opens urls somewhere else (browser tabs, a launcher, stdout).
pub trait TabOpener {
    fn open(&mut self, url: &str);

    /// Close whatever page triggered the fan-out.
    fn close_current(&mut self) {}
}

/// Header activation: open every link of the panel, then close the page.
/// Returns how many urls were opened.
pub fn open_in_tabs(panel: &Panel, opener: &mut dyn TabOpener) -> usize {
    let urls = panel.link_urls();
    for url in &urls {
        opener.open(url);
    }
    opener.close_current();
    tracing::info!(panel = %panel.id, count = urls.len(), "opened panel links");
    urls.len()
}

/// Collects urls instead of opening them; the caller decides what to do with
/// them once the page is gone.
#[derive(Debug, Default)]
pub struct CollectingOpener {
    pub urls: Vec<String>,
    pub closed: bool,
}

impl TabOpener for CollectingOpener {
    fn open(&mut self, url: &str) {
        self.urls.push(url.to_string());
    }

    fn close_current(&mut self) {
        self.closed = true;
    }
}
