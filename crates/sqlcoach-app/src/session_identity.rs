//! Anonymous, durable user identity
//!
//! The first run generates `user_<unix millis>_<9 random base36 chars>` and
//! persists it together with the session start time. Later runs reuse it until
//! the identity is cleared.

use std::collections::{BTreeMap, HashMap};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local, Utc};
use fs2::FileExt;
use rand::Rng;
use serde::Serialize;
use sqlcoach_core::prelude::*;

/// Store key of the user id
pub const USER_ID_KEY: &str = "sql_learning_user_id";

/// Store key of the ISO-8601 session start time
pub const SESSION_START_KEY: &str = "sql_learning_session_start";

/// File holding the identity under the data directory
pub const SESSION_FILENAME: &str = "session.toml";

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Durable string key-value store
pub trait IdentityStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;

    /// Value of `key`, or the value `init` assigns to it when `key` is unset
    /// or blank. All entries from `init` are written together.
    ///
    /// Returns the value and whether it was created. Stores shared between
    /// processes override this to check and write atomically.
    fn get_or_insert_with(
        &self,
        key: &str,
        init: &mut dyn FnMut() -> Entries,
    ) -> Result<(String, bool)> {
        if let Some(value) = self.get(key)?.filter(|v| !v.trim().is_empty()) {
            return Ok((value, false));
        }
        let entries = init();
        for (k, v) in &entries {
            self.set(k, v)?;
        }
        Ok((lookup(&entries, key), true))
    }
}

/// Key-value pairs written by [`IdentityStore::get_or_insert_with`]
pub type Entries = Vec<(String, String)>;

fn lookup(entries: &Entries, key: &str) -> String {
    entries
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .unwrap_or_default()
}

fn present(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Stores
// ─────────────────────────────────────────────────────────────────────────────

/// In-process store; nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl IdentityStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values().remove(key);
        Ok(())
    }

    fn get_or_insert_with(
        &self,
        key: &str,
        init: &mut dyn FnMut() -> Entries,
    ) -> Result<(String, bool)> {
        let mut values = self.values();
        if let Some(value) = present(values.get(key)) {
            return Ok((value, false));
        }
        let entries = init();
        values.extend(entries.iter().cloned());
        Ok((lookup(&entries, key), true))
    }
}

/// TOML file store guarded by an advisory lock
///
/// Writes go to a temporary file that is renamed over the original, so a
/// crash never leaves a half-written identity behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `data_dir/session.toml`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(SESSION_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_file(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let lock_path = self.path.with_extension("lock");
        OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| Error::storage(format!("Failed to open {}: {}", lock_path.display(), e)))
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                Error::storage(format!("Corrupt session file {}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(Error::storage(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        let content = toml::to_string(map)
            .map_err(|e| Error::storage(format!("Failed to serialize session: {}", e)))?;

        let temp_path = self.path.with_extension("toml.tmp");
        std::fs::write(&temp_path, content)
            .map_err(|e| Error::storage(format!("Failed to write temp file: {}", e)))?;
        std::fs::rename(&temp_path, &self.path)
            .map_err(|e| Error::storage(format!("Failed to rename temp file: {}", e)))?;
        Ok(())
    }

    /// Read-modify-write under the exclusive lock; `f` returns whether to write
    fn modify<T>(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> (T, bool)) -> Result<T> {
        let lock = self.lock_file()?;
        lock.lock_exclusive()
            .map_err(|e| Error::storage(format!("Failed to lock session file: {}", e)))?;

        let result = self.read_map().and_then(|mut map| {
            let (value, changed) = f(&mut map);
            if changed {
                self.write_map(&map)?;
            }
            Ok(value)
        });

        // Released on drop as well; unlocking explicitly keeps the window short
        let _ = lock.unlock();
        result
    }
}

impl IdentityStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let lock = self.lock_file()?;
        lock.lock_shared()
            .map_err(|e| Error::storage(format!("Failed to lock session file: {}", e)))?;
        let result = self.read_map().map(|map| map.get(key).cloned());
        let _ = lock.unlock();
        result
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.modify(|map| {
            map.insert(key.to_string(), value.to_string());
            ((), true)
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.modify(|map| {
            map.remove(key);
            ((), true)
        })
    }

    /// Check and create under one exclusive lock, so concurrent first runs
    /// agree on a single value
    fn get_or_insert_with(
        &self,
        key: &str,
        init: &mut dyn FnMut() -> Entries,
    ) -> Result<(String, bool)> {
        self.modify(|map| {
            if let Some(value) = present(map.get(key)) {
                return ((value, false), false);
            }
            let entries = init();
            map.extend(entries.iter().cloned());
            ((lookup(&entries, key), true), true)
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session identity
// ─────────────────────────────────────────────────────────────────────────────

/// Description of the current session, printed by `--print-session`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionInfo {
    pub user_id: String,
    pub session_start: Option<String>,
    pub client: ClientInfo,
}

/// Details of the client environment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientInfo {
    pub terminal: Option<String>,
    pub language: Option<String>,
    pub timestamp: String,
}

impl ClientInfo {
    fn current() -> Self {
        Self {
            terminal: std::env::var("TERM").ok(),
            language: std::env::var("LANG").ok(),
            timestamp: Local::now().to_rfc3339(),
        }
    }
}

/// Anonymous user identity backed by an [`IdentityStore`]
pub struct SessionIdentity {
    store: Box<dyn IdentityStore>,
    /// Id for this run when the store is unusable
    fallback: Mutex<Option<String>>,
}

impl SessionIdentity {
    pub fn new(store: Box<dyn IdentityStore>) -> Self {
        Self {
            store,
            fallback: Mutex::new(None),
        }
    }

    /// Identity kept in memory only
    pub fn ephemeral() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// The user id, generated and persisted on first use.
    ///
    /// Never fails: if the store cannot be read or written the id lives in
    /// memory for the rest of the run.
    pub fn get_id(&self) -> String {
        let mut fallback = self.fallback.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(id) = fallback.as_ref() {
            return id.clone();
        }

        let mut new_identity = || {
            vec![
                (USER_ID_KEY.to_string(), generate_user_id()),
                (SESSION_START_KEY.to_string(), Utc::now().to_rfc3339()),
            ]
        };

        match self.store.get_or_insert_with(USER_ID_KEY, &mut new_identity) {
            Ok((id, created)) => {
                if created {
                    info!(user_id = %id, "Created new session identity");
                }
                id
            }
            Err(e) => {
                warn!("Session store unusable, using a temporary id: {e}");
                let id = generate_user_id();
                *fallback = Some(id.clone());
                id
            }
        }
    }

    /// When the identity was created
    pub fn session_start(&self) -> Option<DateTime<Utc>> {
        self.store
            .get(SESSION_START_KEY)
            .ok()
            .flatten()
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Forget the identity
    pub fn clear(&self) -> Result<()> {
        *self.fallback.lock().unwrap_or_else(|e| e.into_inner()) = None;
        self.store.remove(USER_ID_KEY)?;
        self.store.remove(SESSION_START_KEY)?;
        info!("Cleared session identity");
        Ok(())
    }

    /// Forget the identity and create a fresh one
    pub fn regenerate(&self) -> String {
        if let Err(e) = self.clear() {
            warn!("Failed to clear session identity: {e}");
        }
        self.get_id()
    }

    pub fn session_info(&self) -> SessionInfo {
        let user_id = self.get_id();
        SessionInfo {
            user_id,
            session_start: self.session_start().map(|dt| dt.to_rfc3339()),
            client: ClientInfo::current(),
        }
    }
}

impl std::fmt::Debug for SessionIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIdentity").finish_non_exhaustive()
    }
}

/// `user_<unix millis>_<9 base36 chars>`
pub fn generate_user_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("user_{}_{}", Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::sync::{Arc, Barrier};
    use tempfile::tempdir;

    struct BrokenStore;

    impl IdentityStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::storage("disk on fire"))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::storage("disk on fire"))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(Error::storage("disk on fire"))
        }
    }

    #[test]
    fn test_generated_id_format() {
        let re = Regex::new(r"^user_\d+_[0-9a-z]{9}$").unwrap();
        for _ in 0..20 {
            let id = generate_user_id();
            assert!(re.is_match(&id), "bad id {id}");
        }
    }

    #[test]
    fn test_get_id_is_idempotent() {
        let identity = SessionIdentity::ephemeral();
        let first = identity.get_id();
        assert_eq!(identity.get_id(), first);
        assert!(identity.session_start().is_some());
    }

    #[test]
    fn test_regenerate_gives_new_id() {
        let identity = SessionIdentity::ephemeral();
        let first = identity.get_id();
        let second = identity.regenerate();
        assert_ne!(first, second);
        assert_eq!(identity.get_id(), second);
    }

    #[test]
    fn test_file_store_survives_restart() {
        let dir = tempdir().unwrap();

        let first = SessionIdentity::new(Box::new(FileStore::in_dir(dir.path()))).get_id();
        let second = SessionIdentity::new(Box::new(FileStore::in_dir(dir.path()))).get_id();
        assert_eq!(first, second);

        let content = std::fs::read_to_string(dir.path().join(SESSION_FILENAME)).unwrap();
        assert!(content.contains(USER_ID_KEY));
        assert!(content.contains(SESSION_START_KEY));
    }

    #[test]
    fn test_file_store_clear_removes_keys() {
        let dir = tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        store.set(USER_ID_KEY, "user_1_abc").unwrap();
        store.set("other", "kept").unwrap();

        store.remove(USER_ID_KEY).unwrap();

        assert_eq!(store.get(USER_ID_KEY).unwrap(), None);
        assert_eq!(store.get("other").unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn test_concurrent_first_runs_share_one_id() {
        let dir = tempdir().unwrap();
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = FileStore::in_dir(dir.path());
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    SessionIdentity::new(Box::new(store)).get_id()
                })
            })
            .collect();
        let ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(ids.iter().all(|id| id == &ids[0]));
        let stored = FileStore::in_dir(dir.path()).get(USER_ID_KEY).unwrap();
        assert_eq!(stored.as_deref(), Some(ids[0].as_str()));
    }

    #[test]
    fn test_get_or_insert_with_keeps_existing_value() {
        let store = MemoryStore::new();
        let mut calls = 0;
        let mut init = || {
            calls += 1;
            vec![("k".to_string(), "first".to_string())]
        };

        assert_eq!(
            store.get_or_insert_with("k", &mut init).unwrap(),
            ("first".to_string(), true)
        );
        assert_eq!(
            store.get_or_insert_with("k", &mut init).unwrap(),
            ("first".to_string(), false)
        );
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_memory_id() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SESSION_FILENAME), "not = [valid").unwrap();

        let identity = SessionIdentity::new(Box::new(FileStore::in_dir(dir.path())));
        let id = identity.get_id();
        assert!(id.starts_with("user_"));
        assert_eq!(identity.get_id(), id);
    }

    #[test]
    fn test_broken_store_never_fails() {
        let identity = SessionIdentity::new(Box::new(BrokenStore));
        let id = identity.get_id();
        assert_eq!(identity.get_id(), id);
        assert!(identity.clear().is_err());
        assert_ne!(identity.regenerate(), id);
    }

    #[test]
    fn test_session_info_reports_id() {
        let identity = SessionIdentity::ephemeral();
        let info = identity.session_info();
        assert_eq!(info.user_id, identity.get_id());
        assert!(info.session_start.is_some());
        assert!(!info.client.timestamp.is_empty());
    }

    #[test]
    #[serial_test::serial]
    fn test_client_info_reads_terminal_env() {
        let previous = std::env::var("TERM").ok();
        std::env::set_var("TERM", "xterm-256color");

        let info = ClientInfo::current();

        match previous {
            Some(term) => std::env::set_var("TERM", term),
            None => std::env::remove_var("TERM"),
        }
        assert_eq!(info.terminal.as_deref(), Some("xterm-256color"));
    }
}
