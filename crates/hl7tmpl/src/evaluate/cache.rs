//! Memoization of compiled sub-templates.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Compiled templates keyed by logical template name.
///
/// Entries are permanent for the lifetime of the cache: nothing evicts them
/// and a change of template root does not invalidate them. Lookup and insert
/// happen under one lock, so a name is compiled at most once even when the
/// cache is shared between threads.
pub struct TemplateCache<T> {
    entries: Mutex<HashMap<String, Arc<T>>>,
}

impl<T> Default for TemplateCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> TemplateCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled template for `name`, if one is cached.
    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        self.lock().get(name).cloned()
    }

    /// Return the cached entry for `name`, or run `compile` and cache its result.
    ///
    /// The lock is held while `compile` runs; `compile` must not use this
    /// cache. Failures are returned and nothing is cached.
    pub fn get_or_try_insert_with<E>(
        &self,
        name: &str,
        compile: impl FnOnce() -> Result<T, E>,
    ) -> Result<Arc<T>, E> {
        let mut entries = self.lock();
        if let Some(compiled) = entries.get(name) {
            log::debug!("template cache hit for '{name}'");
            return Ok(Arc::clone(compiled));
        }
        log::debug!("template cache miss for '{name}'");
        let compiled = Arc::new(compile()?);
        entries.insert(name.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(name)
    }

    /// Return the number of cached templates.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Cached template names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<T>>> {
        // Inserts are single operations, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
