//! Directory-backed store with file watching and debouncing.
//!
//! Each key lives in `<dir>/<key>.json`. Other processes sharing the
//! directory are separate contexts: their writes are picked up by a
//! `notify` watcher and published to this store's subscribers.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use uuid::Uuid;

use super::feed::{ChangeFeed, ContextId, StorageChange, Subscribers};
use super::{KeyValueStore, StorageError};

const FILE_EXTENSION: &str = "json";
const STAGING_EXTENSION: &str = "tmp";
const LOCK_EXTENSION: &str = "lock";

/// Persistent store rooted at a directory.
pub struct FileStore {
    shared: Arc<FileShared>,
    id: ContextId,
    // Keeps the OS watcher alive; dropping it ends the debounce thread.
    _watcher: Option<RecommendedWatcher>,
}

struct FileShared {
    dir: PathBuf,
    subscribers: Subscribers,
    /// Last content this store wrote or announced, per key.
    last_seen: Mutex<HashMap<String, Option<String>>>,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`. Does not watch.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            path: dir.clone(),
            source,
        })?;

        Ok(Self {
            shared: Arc::new(FileShared {
                dir,
                subscribers: Subscribers::default(),
                last_seen: Mutex::new(HashMap::new()),
            }),
            id: Uuid::new_v4(),
            _watcher: None,
        })
    }

    /// Open a store and watch its directory for writes by other processes.
    ///
    /// Raw file events are grouped: a change is published once the file has
    /// been quiet for `debounce`.
    pub fn open_watched(dir: impl Into<PathBuf>, debounce: Duration) -> Result<Self, StorageError> {
        let mut store = Self::open(dir)?;
        let (raw_tx, raw_rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                if let Ok(event) = result {
                    let _ = raw_tx.send(event);
                }
            },
            notify::Config::default(),
        )?;
        watcher.watch(&store.shared.dir, RecursiveMode::NonRecursive)?;

        let shared = Arc::clone(&store.shared);
        thread::spawn(move || debounce_loop(raw_rx, shared, debounce));

        store._watcher = Some(watcher);
        Ok(store)
    }

    pub fn dir(&self) -> &Path {
        &self.shared.dir
    }

    pub fn id(&self) -> ContextId {
        self.id
    }
}

impl FileShared {
    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.dir.join(format!("{}.{}", key, FILE_EXTENSION)))
    }

    fn read(&self, key: &str) -> Option<String> {
        let path = self.path_for(key).ok()?;
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read stored value");
                None
            }
        }
    }

    /// Replace the value for `key`.
    ///
    /// Writers are serialized across processes by an exclusive lock on
    /// `<key>.lock`. The value is staged in `<key>.json.tmp` and renamed over
    /// the real file, so readers only ever see a complete value.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let staging = self
            .dir
            .join(format!("{}.{}.{}", key, FILE_EXTENSION, STAGING_EXTENSION));
        let lock_path = self.dir.join(format!("{}.{}", key, LOCK_EXTENSION));
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| StorageError::Io { path, source }
        };

        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(io_err(&lock_path))?;
        lock.lock_exclusive().map_err(io_err(&lock_path))?;

        let result = write_staged(&staging, value)
            .map_err(io_err(&staging))
            .and_then(|_| fs::rename(&staging, &path).map_err(io_err(&path)));
        let _ = FileExt::unlock(&lock);
        result?;

        self.last_seen
            .lock()
            .insert(key.to_string(), Some(value.to_string()));
        Ok(())
    }

    /// Publish `key` if its content differs from what this store last saw.
    fn announce_if_changed(&self, key: &str) {
        let current = self.read(key);
        {
            let mut last_seen = self.last_seen.lock();
            if last_seen.get(key) == Some(&current) {
                return;
            }
            last_seen.insert(key.to_string(), current);
        }

        tracing::debug!(key = %key, "External storage change");
        self.subscribers.publish(&StorageChange {
            key: key.to_string(),
            origin: Uuid::nil(),
        });
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let value = self.shared.read(key);
        // Reads also establish the baseline for change detection.
        self.shared
            .last_seen
            .lock()
            .entry(key.to_string())
            .or_insert_with(|| value.clone());
        value
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.shared.write(key, value)
    }

    fn subscribe(&self, key: &str) -> ChangeFeed {
        self.shared.subscribers.subscribe(key, self.id)
    }
}

fn write_staged(path: &Path, value: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()
}

/// Groups rapid file events per key and announces each key once it has
/// been quiet for `debounce`.
fn debounce_loop(rx: mpsc::Receiver<Event>, shared: Arc<FileShared>, debounce: Duration) {
    let mut pending: HashMap<String, Instant> = HashMap::new();

    loop {
        let timeout = if pending.is_empty() {
            Duration::from_secs(60)
        } else {
            debounce
        };

        match rx.recv_timeout(timeout) {
            Ok(event) => {
                for key in event_keys(&event) {
                    pending.insert(key, Instant::now());
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let ready: Vec<String> = pending
            .iter()
            .filter(|(_, last)| last.elapsed() >= debounce)
            .map(|(key, _)| key.clone())
            .collect();
        for key in ready {
            pending.remove(&key);
            shared.announce_if_changed(&key);
        }
    }
}

/// Keys touched by a notify event, if it is a content change.
fn event_keys(event: &Event) -> Vec<String> {
    if !matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) {
        return Vec::new();
    }

    let extension = OsString::from(FILE_EXTENSION);
    event
        .paths
        .iter()
        .filter(|p| p.extension() == Some(extension.as_os_str()))
        .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(String::from))
        .collect()
}
