//! Schema document cache
//!
//! Write-once, never-evicted cache scoped to one registry instance.
//! Concurrent requests for the same key share a single in-flight fetch; a
//! failed fetch leaves the slot empty so a later request retries.

use crate::diagnostics::EtchResult;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::OnceCell;

type Slots<T> = HashMap<String, Arc<OnceCell<Arc<T>>>>;

pub struct SchemaCache<T> {
    slots: Mutex<Slots<T>>,
}

impl<T> Default for SchemaCache<T> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> SchemaCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slots<T>> {
        match self.slots.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn slot(&self, key: &str) -> Arc<OnceCell<Arc<T>>> {
        self.lock()
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    /// Cached value for `key`, running `init` only if no value is present
    /// and no other caller is already fetching it.
    pub async fn get_or_try_init<F, Fut>(&self, key: &str, init: F) -> EtchResult<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = EtchResult<T>>,
    {
        let slot = self.slot(key);
        let value = slot
            .get_or_try_init(|| async move { init().await.map(Arc::new) })
            .await?;
        Ok(value.clone())
    }

    /// Cached value without fetching. Never creates a slot.
    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        self.lock().get(key).and_then(|slot| slot.get().cloned())
    }

    /// Number of populated entries
    pub fn len(&self) -> usize {
        self.lock()
            .values().filter(|s| s.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
