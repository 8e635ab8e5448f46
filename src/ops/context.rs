use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use crate::io::store::{BookmarkStore, ChangeEvent, StoreError, Subscription};
use crate::model::{PanelTree, RootIndex};
use crate::ops::cache::{CacheLookup, RenderCache};
use crate::ops::classify::classify;
use crate::ops::init_guard::InitGuard;
use crate::ops::render::{RenderOptions, render_tree};
use crate::ops::root_index::compute_root_index;

/// State shared by every page attached to one background: the render cache,
/// the listener latch and the live store subscription.
///
/// Construct once, wrap in `Arc`, and hand clones to each page.
pub struct BackgroundContext {
    cache: Mutex<RenderCache>,
    guard: InitGuard,
    subscription: Mutex<Option<Subscription>>,
    options: RenderOptions,
}

impl BackgroundContext {
    pub fn new(options: RenderOptions) -> Arc<Self> {
        Arc::new(BackgroundContext {
            cache: Mutex::new(RenderCache::new()),
            guard: InitGuard::new(),
            subscription: Mutex::new(None),
            options,
        })
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Subscribe to store mutations, once per context. Every later call is a
    /// no-op returning `Ok(false)`.
    pub fn attach(self: &Arc<Self>, store: &dyn BookmarkStore) -> Result<bool, StoreError> {
        self.guard.ensure_initialized(|| {
            let weak = Arc::downgrade(self);
            let subscription = store.subscribe(Box::new(move |change| {
                if let Some(ctx) = weak.upgrade() {
                    ctx.on_change(change);
                }
            }))?;
            *lock(&self.subscription) = Some(subscription);
            tracing::debug!("bookmark listeners registered");
            Ok(())
        })
    }

    pub fn is_attached(&self) -> bool {
        self.guard.is_initialized()
    }

    /// Mutation callback: drop the cached render.
    pub fn on_change(&self, change: ChangeEvent) {
        tracing::debug!(?change, "bookmarks changed, invalidating render cache");
        self.invalidate();
    }

    pub fn invalidate(&self) {
        self.cache().invalidate();
    }

    /// False after a mutation until the next completed rebuild.
    pub fn is_valid(&self) -> bool {
        self.cache().is_valid()
    }

    /// Current cache generation; advances on every invalidation, whether or
    /// not a later rebuild has already refilled the cache.
    pub fn generation(&self) -> u64 {
        self.cache().generation()
    }

    pub fn lookup(&self) -> CacheLookup {
        self.cache().get()
    }

    /// The current render and root index, from cache or freshly built.
    ///
    /// A rebuild that overlaps a mutation is still returned to the caller but
    /// not cached, so the next call fetches again.
    pub fn display(
        &self,
        store: &dyn BookmarkStore,
    ) -> Result<(PanelTree, RootIndex), StoreError> {
        let ticket = {
            let cache = self.cache();
            if let CacheLookup::Hit(render, index) = cache.get() {
                return Ok((render, index));
            }
            cache.begin()
        };

        // No lock held while the store works
        let (render, index) = build(store, &self.options)?;

        if !self.cache().store(ticket, render.clone(), index.clone()) {
            tracing::info!("bookmarks changed during rebuild; render not cached");
        }
        Ok((render, index))
    }

    /// Initial display with a single retry after `delay` if the store is not
    /// ready yet. Any other failure is returned immediately.
    pub fn load_with_retry(
        &self,
        store: &dyn BookmarkStore,
        delay: Duration,
    ) -> Result<(PanelTree, RootIndex), StoreError> {
        match self.display(store) {
            Err(StoreError::Unavailable(reason)) => {
                tracing::warn!(
                    "bookmark store not ready ({}); retrying in {}ms",
                    reason,
                    delay.as_millis()
                );
                thread::sleep(delay);
                self.display(store)
            }
            other => other,
        }
    }

    fn cache(&self) -> MutexGuard<'_, RenderCache> {
        lock(&self.cache)
    }
}

/// Fetch, classify, index and render one snapshot of the store.
pub fn build(
    store: &dyn BookmarkStore,
    options: &RenderOptions,
) -> Result<(PanelTree, RootIndex), StoreError> {
    let raw = store.fetch_tree()?;
    let root = classify(&raw)
        .ok_or_else(|| StoreError::Unavailable(format!("root node {} has no kind", raw.id)))?;
    let index = compute_root_index(&root);
    let render = render_tree(&root, options);
    tracing::debug!(
        panels = render.panels.len(),
        top_level = index.len(),
        "rebuilt bookmark panels"
    );
    Ok((render, index))
}

/// Lock ignoring poisoning: the guarded values stay consistent between
/// statements, so a panicked holder leaves nothing half-written.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::memory_store::MemoryStore;
    use crate::io::store::ChangeListener;
    use crate::model::RawNode;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    fn sample_tree() -> RawNode {
        RawNode::root(vec![RawNode::folder(
            "1",
            "Bookmarks Bar",
            vec![RawNode::link("10", "", "http://example.com")],
        )])
    }

    /// Counts fetches; can fail the first few and mutate during the next one.
    struct ProbeStore {
        inner: MemoryStore,
        fetches: AtomicUsize,
        failures_left: AtomicUsize,
        mutate_next_fetch: AtomicBool,
    }

    impl ProbeStore {
        fn new() -> Self {
            ProbeStore {
                inner: MemoryStore::new(sample_tree()),
                fetches: AtomicUsize::new(0),
                failures_left: AtomicUsize::new(0),
                mutate_next_fetch: AtomicBool::new(false),
            }
        }

        fn failing(n: usize) -> Self {
            let store = ProbeStore::new();
            store.failures_left.store(n, Ordering::SeqCst);
            store
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl BookmarkStore for ProbeStore {
        fn fetch_tree(&self) -> Result<RawNode, StoreError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(StoreError::Unavailable("warming up".into()));
            }
            let snapshot = self.inner.fetch_tree()?;
            if self.mutate_next_fetch.swap(false, Ordering::SeqCst) {
                self.inner
                    .insert("1", RawNode::link("11", "late", "http://late.example"))?;
            }
            Ok(snapshot)
        }
        fn get_node(&self, id: &str) -> Result<RawNode, StoreError> {
            self.inner.get_node(id)
        }
        fn get_children(&self, id: &str) -> Result<Vec<RawNode>, StoreError> {
            self.inner.get_children(id)
        }
        fn subscribe(&self, listener: ChangeListener) -> Result<Subscription, StoreError> {
            self.inner.subscribe(listener)
        }
        fn remove(&self, id: &str) -> Result<(), StoreError> {
            self.inner.remove(id)
        }
    }

    #[test]
    fn display_caches_until_mutation() {
        let store = ProbeStore::new();
        let ctx = BackgroundContext::new(RenderOptions::default());
        ctx.attach(&store).unwrap();

        let (first, index) = ctx.display(&store).unwrap();
        assert!(index.contains("1"));
        let (second, _) = ctx.display(&store).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.fetches(), 1);
        assert!(ctx.is_valid());
    }

    #[test]
    fn mutation_without_fetch_in_flight_forces_fresh_fetch() {
        let store = ProbeStore::new();
        let ctx = BackgroundContext::new(RenderOptions::default());
        ctx.attach(&store).unwrap();
        ctx.display(&store).unwrap();

        store.inner.remove("10").unwrap();
        assert!(!ctx.is_valid());
        assert_eq!(ctx.lookup(), CacheLookup::Miss);

        let (render, _) = ctx.display(&store).unwrap();
        assert_eq!(store.fetches(), 2);
        assert!(render.panels.is_empty());
    }

    #[test]
    fn mutation_during_rebuild_is_not_cached() {
        let store = ProbeStore::new();
        store.mutate_next_fetch.store(true, Ordering::SeqCst);
        let ctx = BackgroundContext::new(RenderOptions::default());
        ctx.attach(&store).unwrap();

        let (stale, _) = ctx.display(&store).unwrap();
        assert_eq!(stale.panels[0].entries.len(), 1);
        assert!(!ctx.is_valid());

        // the retry sees the inserted link
        let (fresh, _) = ctx.display(&store).unwrap();
        assert_eq!(fresh.panels[0].entries.len(), 2);
        assert_eq!(store.fetches(), 2);
    }

    #[test]
    fn attach_registers_one_listener_per_context() {
        let store = MemoryStore::new(sample_tree());
        let ctx = BackgroundContext::new(RenderOptions::default());
        assert!(ctx.attach(&store).unwrap());
        assert!(!ctx.attach(&store).unwrap());
        assert!(!ctx.attach(&store).unwrap());
        assert_eq!(store.listener_count(), 1);
        assert!(ctx.is_attached());
    }

    #[test]
    fn concurrent_pages_share_one_listener() {
        let store = Arc::new(MemoryStore::new(sample_tree()));
        let ctx = BackgroundContext::new(RenderOptions::default());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let ctx = Arc::clone(&ctx);
                thread::spawn(move || ctx.attach(store.as_ref()).unwrap())
            })
            .collect();
        let registered = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ran| *ran)
            .count();

        assert_eq!(registered, 1);
        assert_eq!(store.listener_count(), 1);
    }

    #[test]
    fn load_retries_once_when_unavailable() {
        let store = ProbeStore::failing(1);
        let ctx = BackgroundContext::new(RenderOptions::default());
        let (render, _) = ctx
            .load_with_retry(&store, Duration::from_millis(1))
            .unwrap();
        assert_eq!(render.panels.len(), 1);
        assert_eq!(store.fetches(), 2);
    }

    #[test]
    fn load_gives_up_after_one_retry() {
        let store = ProbeStore::failing(5);
        let ctx = BackgroundContext::new(RenderOptions::default());
        let result = ctx.load_with_retry(&store, Duration::ZERO);
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.fetches(), 2);
        assert!(!ctx.is_valid());
    }

    #[test]
    fn dropped_context_ignores_late_events() {
        let store = MemoryStore::new(sample_tree());
        let ctx = BackgroundContext::new(RenderOptions::default());
        ctx.attach(&store).unwrap();
        drop(ctx);
        // listener holds only a weak reference
        store.notify(ChangeEvent::Changed);
    }
}
