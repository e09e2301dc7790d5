use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// Produces a resource for a key on a cache miss.
///
/// Any `FnMut(&str) -> anyhow::Result<T>` closure is a loader.
pub trait Loader {
    type Resource;

    fn load(&mut self, key: &str) -> anyhow::Result<Self::Resource>;
}

impl<T, F> Loader for F
where
    F: FnMut(&str) -> anyhow::Result<T>,
{
    type Resource = T;

    fn load(&mut self, key: &str) -> anyhow::Result<T> {
        self(key)
    }
}

/// Key → weak handle cache with lazy loading.
///
/// Entries whose resource has no remaining strong owners are expired: `get`
/// treats them as missing and `cleanup` removes them. Not synchronized; wrap
/// it in a lock to share it between threads.
pub struct ResourceCache<L: Loader> {
    loader: L,
    entries: HashMap<String, Weak<L::Resource>>,
}

impl<L: Loader> ResourceCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            entries: HashMap::new(),
        }
    }

    /// Returns the live resource for `key`, loading it if needed.
    ///
    /// A failed load is logged and yields `None`; nothing is cached for it.
    pub fn get(&mut self, key: &str) -> Option<Arc<L::Resource>> {
        if let Some(weak) = self.entries.get(key) {
            if let Some(resource) = weak.upgrade() {
                return Some(resource);
            }
            self.entries.remove(key);
        }

        match self.loader.load(key) {
            Ok(resource) => {
                let resource = Arc::new(resource);
                self.entries.insert(key.to_owned(), Arc::downgrade(&resource));
                log::debug!("resource loaded: {key}");
                Some(resource)
            }
            Err(err) => {
                log::warn!("failed to load resource {key:?}: {err:#}");
                None
            }
        }
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn cleanup(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, weak| weak.strong_count() > 0);
        before - self.entries.len()
    }

    /// True if `key` is cached and still alive. Never loads.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Number of entries, expired ones included until the next `cleanup`.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }
}
