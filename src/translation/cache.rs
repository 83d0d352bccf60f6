/*!
 * On-disk bucket cache.
 *
 * Each (namespace, group, locale) bucket is snapshotted to one JSON file
 * so a fresh resolver can skip the database. An artifact is deleted, never
 * patched, as soon as any row of its bucket is saved; the next resolver
 * that needs the bucket rebuilds it from the store.
 */

use log::{debug, warn};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::database::models::{BucketKey, NO_NAMESPACE, TranslationRecord};
use crate::database::repository::StoreObserver;
use crate::errors::CacheError;
use crate::file_utils::{Filesystem, LocalFilesystem};

/// Item to text mapping of one bucket; `None` marks a recorded miss
pub type Bucket = BTreeMap<String, Option<String>>;

/// Extension of cache artifacts
const ARTIFACT_EXTENSION: &str = "json";

/// Cache usage counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Buckets served from an artifact
    pub hits: usize,
    /// Bucket lookups with no usable artifact
    pub misses: usize,
    /// Artifacts written
    pub writes: usize,
    /// Artifacts deleted
    pub purges: usize,
}

/// Disk cache of translation buckets
#[derive(Debug)]
pub struct TranslationCache {
    /// Directory holding `<locale>/[<namespace>/]<group>.json` artifacts
    root: PathBuf,

    /// Filesystem the artifacts live on
    files: Arc<dyn Filesystem>,

    stats: Mutex<CacheStats>,
}

impl TranslationCache {
    /// Create a cache rooted at `root` on the given filesystem
    pub fn new(root: impl Into<PathBuf>, files: Arc<dyn Filesystem>) -> Self {
        Self {
            root: root.into(),
            files,
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// Create a cache rooted at `root` on the local filesystem
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Arc::new(LocalFilesystem))
    }

    /// Root directory of the cache
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic artifact path for a bucket
    ///
    /// The `*` namespace adds no directory level. Every segment is escaped so
    /// that keys can never address a file outside the cache root.
    pub fn artifact_path(&self, bucket: &BucketKey) -> PathBuf {
        let mut path = self.root.join(path_segment(&bucket.locale));
        if bucket.namespace != NO_NAMESPACE {
            path.push(path_segment(&bucket.namespace));
        }
        path.push(format!("{}.{}", path_segment(&bucket.group), ARTIFACT_EXTENSION));
        path
    }

    /// Whether an artifact exists for the bucket
    pub fn is_cached(&self, bucket: &BucketKey) -> bool {
        self.files.exists(&self.artifact_path(bucket))
    }

    /// Read a bucket from its artifact
    ///
    /// Returns `None` when there is no artifact or when it cannot be read or
    /// parsed; a corrupt cache only ever costs a rebuild.
    pub fn load(&self, bucket: &BucketKey) -> Option<Bucket> {
        let path = self.artifact_path(bucket);
        if !self.files.exists(&path) {
            self.stats.lock().misses += 1;
            debug!("Cache miss for bucket {}", bucket);
            return None;
        }

        let parsed = self
            .files
            .read(&path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| serde_json::from_slice::<Bucket>(&bytes).map_err(|e| e.to_string()));

        match parsed {
            Ok(lines) => {
                self.stats.lock().hits += 1;
                debug!("Cache hit for bucket {} ({} items)", bucket, lines.len());
                Some(lines)
            }
            Err(e) => {
                self.stats.lock().misses += 1;
                warn!("Ignoring unreadable cache artifact {:?}: {}", path, e);
                None
            }
        }
    }

    /// Write a bucket snapshot, creating parent directories as needed
    pub fn store(&self, bucket: &BucketKey, lines: &Bucket) -> Result<(), CacheError> {
        let path = self.artifact_path(bucket);

        if let Some(dir) = path.parent() {
            self.files
                .make_directory(dir, true)
                .map_err(|e| CacheError::io(dir, e))?;
        }

        let contents = serde_json::to_vec_pretty(lines)?;
        self.files
            .write(&path, &contents)
            .map_err(|e| CacheError::io(&path, e))?;

        self.stats.lock().writes += 1;
        debug!("Cached bucket {} at {:?}", bucket, path);
        Ok(())
    }

    /// Delete the artifact of a bucket; a missing artifact is not an error
    pub fn purge(&self, bucket: &BucketKey) -> Result<(), CacheError> {
        let path = self.artifact_path(bucket);
        if !self.files.exists(&path) {
            return Ok(());
        }

        match self.files.delete(&path) {
            Ok(()) => {}
            // Someone else purged it between the check and the delete
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(CacheError::io(&path, e)),
        }

        self.stats.lock().purges += 1;
        debug!("Purged cached bucket {}", bucket);
        Ok(())
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        *self.stats.lock()
    }
}

impl StoreObserver for TranslationCache {
    fn saved(&self, record: &TranslationRecord) -> anyhow::Result<()> {
        self.purge(&record.bucket())?;
        Ok(())
    }
}

/// Escape one path segment
///
/// ASCII alphanumerics, `_`, `-` and `.` are kept; every other byte becomes
/// `%XX`. Segments made only of dots are escaped entirely.
fn path_segment(value: &str) -> String {
    if !value.is_empty() && value.chars().all(|c| c == '.') {
        return value.bytes().map(|b| format!("%{:02X}", b)).collect();
    }

    let mut segment = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'.') {
            segment.push(byte as char);
        } else {
            segment.push_str(&format!("%{:02X}", byte));
        }
    }
    segment
}
