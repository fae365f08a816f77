//! Client-draft cache: debounced persistence of in-progress edits.
//!
//! A draft lives under a composite string key and moves through a small
//! state machine: absent -> pending (loaded from storage, unconsumed) ->
//! restored or discarded. Saves are debounced trailing-edge: rapid calls
//! coalesce into one write, and a pending write is flushed (not abandoned)
//! when the cache is detached.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::types::{DbId, Timestamp};

/// Default debounce window for draft saves.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Key for a studio-editor draft (unsaved new content).
pub fn studio_draft_key(user_id: &str, brand_id: DbId, template_set_id: DbId, format: &str) -> String {
    format!("draft:studio:{user_id}:{brand_id}:{template_set_id}:{format}")
}

/// Key for a draft of already-persisted content.
pub fn content_draft_key(content_id: DbId) -> String {
    format!("draft:content:{content_id}")
}

// ---------------------------------------------------------------------------
// Draft payload
// ---------------------------------------------------------------------------

/// The client-held snapshot of in-progress edits. Never persisted server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftData {
    #[serde(default)]
    pub slides: Vec<Value>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub config: Option<Value>,
    /// Stamped by the cache when the debounced write lands.
    #[serde(default)]
    pub saved_at: Option<Timestamp>,
}

/// A draft is newer than the server row iff the server has no last-modified
/// timestamp (or an unreadable one) or the draft was saved strictly later.
pub fn is_draft_newer(saved_at: Timestamp, db_timestamp: Option<&str>) -> bool {
    match db_timestamp.and_then(|s| DateTime::parse_from_rfc3339(s).ok()) {
        Some(db) => saved_at > db.with_timezone(&Utc),
        None => true,
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Key-value storage backing the draft cache.
pub trait DraftStorage: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory storage, used by tests and as the default session store.
#[derive(Default)]
pub struct MemoryDraftStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryDraftStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStorage for MemoryDraftStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Shared between the cache and its debounce timer task.
struct PendingWrite {
    data: Mutex<Option<DraftData>>,
    dirty: AtomicBool,
}

/// Debounced draft cache for one key.
///
/// Reads storage once on attach; `restore` consumes the loaded draft exactly
/// once and clears storage; `discard` clears without returning data. Dropping
/// the cache flushes any pending debounced write.
pub struct DraftCache {
    key: String,
    storage: Arc<dyn DraftStorage>,
    debounce: Duration,
    loaded: Option<DraftData>,
    pending: Arc<PendingWrite>,
    timer: Option<JoinHandle<()>>,
}

impl DraftCache {
    /// Attach to a key with the default debounce window.
    pub fn attach(key: impl Into<String>, storage: Arc<dyn DraftStorage>) -> Self {
        Self::attach_with_debounce(key, storage, DEFAULT_DEBOUNCE)
    }

    /// Attach to a key, reading storage once. A stored draft that fails to
    /// deserialize is treated as absent.
    pub fn attach_with_debounce(
        key: impl Into<String>,
        storage: Arc<dyn DraftStorage>,
        debounce: Duration,
    ) -> Self {
        let key = key.into();
        let loaded = storage
            .read(&key)
            .and_then(|raw| serde_json::from_str(&raw).ok());
        Self {
            key,
            storage,
            debounce,
            loaded,
            pending: Arc::new(PendingWrite {
                data: Mutex::new(None),
                dirty: AtomicBool::new(false),
            }),
            timer: None,
        }
    }

    /// Whether a loaded draft is waiting to be restored or discarded.
    pub fn has_pending_draft(&self) -> bool {
        self.loaded.is_some()
    }

    /// Consume the loaded draft. Returns it exactly once (a second call
    /// returns `None`) and clears storage.
    pub fn restore(&mut self) -> Option<DraftData> {
        let draft = self.loaded.take()?;
        self.storage.remove(&self.key);
        Some(draft)
    }

    /// Clear storage and the loaded draft without returning data.
    pub fn discard(&mut self) {
        self.storage.remove(&self.key);
        self.loaded = None;
    }

    /// Schedule a debounced save. Every call replaces the pending payload and
    /// restarts the timer; only the trailing write lands.
    pub fn save(&mut self, data: DraftData) {
        *self.pending.data.lock().unwrap() = Some(data);
        self.pending.dirty.store(true, Ordering::SeqCst);

        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        let pending = Arc::clone(&self.pending);
        let storage = Arc::clone(&self.storage);
        let key = self.key.clone();
        let debounce = self.debounce;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            flush(&pending, storage.as_ref(), &key);
        }));
    }

    /// True from the moment `save` is called until the debounced write lands.
    pub fn has_unsaved_changes(&self) -> bool {
        self.pending.dirty.load(Ordering::SeqCst)
    }

    /// Flush any pending write and stop the timer. Equivalent to dropping
    /// the cache, made explicit for call sites that tear down deliberately.
    pub fn detach(self) {}
}

/// Stamp `saved_at` and write the pending payload, if any.
fn flush(pending: &PendingWrite, storage: &dyn DraftStorage, key: &str) {
    let data = pending.data.lock().unwrap().take();
    if let Some(mut data) = data {
        data.saved_at = Some(Utc::now());
        if let Ok(raw) = serde_json::to_string(&data) {
            storage.write(key, &raw);
        }
        pending.dirty.store(false, Ordering::SeqCst);
    }
}

impl Drop for DraftCache {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        // An in-flight debounce is flushed, not abandoned.
        flush(&self.pending, self.storage.as_ref(), &self.key);
    }
}
