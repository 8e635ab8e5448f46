use crate::model::{PanelTree, RootIndex};

/// Result of a cache lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Hit(PanelTree, RootIndex),
    Miss,
}

/// Marks the start of a rebuild. A rebuild may only commit if no
/// invalidation happened after its ticket was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTicket {
    generation: u64,
}

/// Whole-tree memo of the last render and its root index.
///
/// Any mutation empties it entirely; there is no incremental patching.
#[derive(Debug, Default)]
pub struct RenderCache {
    generation: u64,
    entry: Option<(PanelTree, RootIndex)>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.entry.is_some()
    }

    /// Number of invalidations so far. A render built while the generation
    /// was `g` reflects the store as of `g`.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self) -> CacheLookup {
        match &self.entry {
            Some((render, index)) => CacheLookup::Hit(render.clone(), index.clone()),
            None => CacheLookup::Miss,
        }
    }

    /// Drop the cached render. Idempotent; always advances the generation so
    /// rebuilds that started earlier cannot commit.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.entry = None;
    }

    /// Take a ticket before fetching the tree for a rebuild.
    pub fn begin(&self) -> RenderTicket {
        RenderTicket {
            generation: self.generation,
        }
    }

    /// Commit a completed rebuild. Returns false (and stores nothing) if the
    /// cache was invalidated since `ticket` was taken.
    pub fn store(&mut self, ticket: RenderTicket, render: PanelTree, index: RootIndex) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding render of a stale snapshot"
            );
            return false;
        }
        self.entry = Some((render, index));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Panel;

    fn render(title: &str) -> PanelTree {
        PanelTree {
            panels: vec![Panel {
                id: "1".into(),
                title: title.into(),
                hover: "Open in tabs".into(),
                entries: vec![],
            }],
        }
    }

    fn index() -> RootIndex {
        ["1", "2"].into_iter().collect()
    }

    #[test]
    fn starts_empty() {
        let cache = RenderCache::new();
        assert!(!cache.is_valid());
        assert_eq!(cache.get(), CacheLookup::Miss);
    }

    #[test]
    fn store_then_get_returns_exact_pair() {
        let mut cache = RenderCache::new();
        let ticket = cache.begin();
        assert!(cache.store(ticket, render("Bar"), index()));
        assert_eq!(cache.get(), CacheLookup::Hit(render("Bar"), index()));
        // repeated reads keep hitting
        assert_eq!(cache.get(), CacheLookup::Hit(render("Bar"), index()));
    }

    #[test]
    fn invalidate_misses_until_next_store() {
        let mut cache = RenderCache::new();
        let t = cache.begin();
        cache.store(t, render("Bar"), index());

        cache.invalidate();
        assert_eq!(cache.get(), CacheLookup::Miss);
        cache.invalidate();
        assert_eq!(cache.get(), CacheLookup::Miss);

        let t = cache.begin();
        assert!(cache.store(t, render("New"), RootIndex::default()));
        assert_eq!(
            cache.get(),
            CacheLookup::Hit(render("New"), RootIndex::default())
        );
    }

    #[test]
    fn rebuild_started_before_invalidation_cannot_commit() {
        let mut cache = RenderCache::new();
        let stale = cache.begin();
        cache.invalidate();
        assert!(!cache.store(stale, render("Stale"), index()));
        assert_eq!(cache.get(), CacheLookup::Miss);

        let fresh = cache.begin();
        assert!(cache.store(fresh, render("Fresh"), index()));
        assert!(cache.is_valid());
    }

    #[test]
    fn invalidation_after_commit_still_clears() {
        let mut cache = RenderCache::new();
        let t = cache.begin();
        assert!(cache.store(t, render("Bar"), index()));
        cache.invalidate();
        assert!(!cache.is_valid());
    }

    #[test]
    fn generation_survives_refill() {
        let mut cache = RenderCache::new();
        assert_eq!(cache.generation(), 0);
        cache.invalidate();
        let t = cache.begin();
        assert!(cache.store(t, render("Bar"), index()));
        // Valid again, but the generation still records the invalidation
        assert!(cache.is_valid());
        assert_eq!(cache.generation(), 1);
    }
}
