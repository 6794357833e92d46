//! Memoization of API responses and rendered tags.
//!
//! Every Flickr lookup and every rendered tag is a pure function of its
//! arguments for the lifetime of a site (photos are rarely re-titled, and
//! when they are, deleting the cache directory is the fix). Memoizing them
//! makes a rebuild of an unchanged site free of network traffic.
//!
//! # Design
//!
//! Callers depend on the [`Memo`] trait only: `lookup(key)` and
//! `store(key, value)`. It is injected into the tag handlers and the
//! [`CachedApi`](crate::api::cached::CachedApi) decorator rather than reached
//! through global state.
//!
//! ## Cache keys
//!
//! A [`CacheKey`] is the SHA-256 of a namespace plus the ordered argument
//! tuple of the call, e.g. `("photo", [id, size, class, desc])`. Each part is
//! length-prefixed, so `["ab", "c"]` and `["a", "bc"]` never collide.
//!
//! ## Semantics
//!
//! First call wins: at most one entry per key, no invalidation, no expiry.
//!
//! ## Storage
//!
//! [`DiskMemo`] keeps a JSON file (`{version, entries}`) and rewrites it on
//! every store, so an aborted build keeps what it already fetched. Each
//! rewrite goes to a sibling `.tmp` file that is then renamed over the memo,
//! so an interrupted write leaves the previous file intact. A file that is
//! missing, corrupt, or from another format version loads as empty.
//! [`MemoryMemo`] is the same thing without the file, used for `--no-cache`
//! and in tests.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Version of the memo file format. Bump this to invalidate all existing
/// caches when the format or key computation changes.
const MEMO_VERSION: u32 = 1;

/// File holding memoized API responses.
pub const API_MEMO_FILENAME: &str = "api.json";

/// File holding memoized tag fragments.
pub const FRAGMENT_MEMO_FILENAME: &str = "fragments.json";

/// Hashed key of a memoized call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(namespace: &str, parts: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(namespace.as_bytes());
        hasher.update(b"\0");
        for part in parts {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Explicit memoization store.
pub trait Memo {
    fn lookup(&self, key: &CacheKey) -> Option<String>;

    /// Record a value. A key that is already present keeps its first value.
    fn store(&self, key: &CacheKey, value: &str);

    fn stats(&self) -> CacheStats;
}

impl<M: Memo + ?Sized> Memo for Box<M> {
    fn lookup(&self, key: &CacheKey) -> Option<String> {
        (**self).lookup(key)
    }

    fn store(&self, key: &CacheKey, value: &str) {
        (**self).store(key, value)
    }

    fn stats(&self) -> CacheStats {
        (**self).stats()
    }
}

/// Return the memoized value for `key`, or compute, store and return it.
///
/// Errors are never memoized.
pub fn memoize<E>(
    memo: &dyn Memo,
    key: &CacheKey,
    compute: impl FnOnce() -> Result<String, E>,
) -> Result<String, E> {
    if let Some(hit) = memo.lookup(key) {
        debug!(key = %key, "memo hit");
        return Ok(hit);
    }
    let value = compute()?;
    memo.store(key, &value);
    Ok(value)
}

#[derive(Debug, Default)]
struct Entries {
    map: HashMap<String, String>,
    stats: CacheStats,
}

impl Entries {
    fn lookup(&mut self, key: &CacheKey) -> Option<String> {
        let found = self.map.get(key.as_str()).cloned();
        match found {
            Some(_) => self.stats.hit(),
            None => self.stats.miss(),
        }
        found
    }

    /// Returns whether the entry was new.
    fn store(&mut self, key: &CacheKey, value: &str) -> bool {
        if self.map.contains_key(key.as_str()) {
            return false;
        }
        self.map.insert(key.as_str().to_string(), value.to_string());
        true
    }
}

/// In-process memo. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryMemo {
    entries: Mutex<Entries>,
}

impl MemoryMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Memo for MemoryMemo {
    fn lookup(&self, key: &CacheKey) -> Option<String> {
        self.entries.lock().ok()?.lookup(key)
    }

    fn store(&self, key: &CacheKey, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.store(key, value);
        }
    }

    fn stats(&self) -> CacheStats {
        self.entries
            .lock()
            .map(|e| e.stats.clone())
            .unwrap_or_default()
    }
}

/// On-disk memo file contents.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct MemoFile {
    version: u32,
    entries: HashMap<String, String>,
}

/// Memo persisted as a JSON file.
#[derive(Debug)]
pub struct DiskMemo {
    path: PathBuf,
    entries: Mutex<Entries>,
}

impl DiskMemo {
    /// Open the memo at `path`. Returns an empty memo if the file doesn't
    /// exist or can't be parsed (version mismatch, corruption).
    pub fn load(path: &Path) -> Self {
        let map = read_memo_file(path).unwrap_or_default();
        debug!(path = %path.display(), entries = map.len(), "loaded memo");
        Self {
            path: path.to_path_buf(),
            entries: Mutex::new(Entries {
                map,
                stats: CacheStats::default(),
            }),
        }
    }

    /// Open `file_name` inside the cache directory.
    pub fn in_dir(dir: &Path, file_name: &str) -> Self {
        Self::load(&dir.join(file_name))
    }

    /// Sibling file the memo is written to before it replaces `path`.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn save(&self, map: &HashMap<String, String>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = MemoFile {
            version: MEMO_VERSION,
            entries: map.clone(),
        };
        let json = serde_json::to_string(&file)?;
        let staging = self.staging_path();
        std::fs::write(&staging, json)?;
        std::fs::rename(&staging, &self.path)
    }
}

fn read_memo_file(path: &Path) -> Option<HashMap<String, String>> {
    let content = std::fs::read_to_string(path).ok()?;
    let file: MemoFile = serde_json::from_str(&content).ok()?;
    (file.version == MEMO_VERSION).then_some(file.entries)
}

impl Memo for DiskMemo {
    fn lookup(&self, key: &CacheKey) -> Option<String> {
        self.entries.lock().ok()?.lookup(key)
    }

    /// Write failures are logged, not propagated: a read-only cache
    /// directory degrades to in-memory memoization.
    fn store(&self, key: &CacheKey, value: &str) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        if entries.store(key, value)
            && let Err(e) = self.save(&entries.map)
        {
            warn!(path = %self.path.display(), error = %e, "could not write memo file");
        }
    }

    fn stats(&self) -> CacheStats {
        self.entries
            .lock()
            .map(|e| e.stats.clone())
            .unwrap_or_default()
    }
}

/// Summary of memo performance for a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn miss(&mut self) {
        self.misses += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} fetched ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        } else {
            write!(f, "{} fetched", self.misses)
        }
    }
}
