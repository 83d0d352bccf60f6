/*!
 * Tests for the on-disk bucket cache
 */

use std::io;
use std::path::Path;
use std::sync::Arc;

use dbtrans::errors::{CacheError, ResolveError};
use dbtrans::file_utils::{Filesystem, LocalFilesystem};
use dbtrans::translation::{Bucket, CachingResolver, NullTranslator, Replacements, TranslationCache};
use dbtrans::{BucketKey, TranslationStore};

use crate::common;

/// Local filesystem that refuses every write
#[derive(Debug)]
struct ReadOnlyFilesystem;

impl Filesystem for ReadOnlyFilesystem {
    fn exists(&self, path: &Path) -> bool {
        LocalFilesystem.exists(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        LocalFilesystem.read(path)
    }

    fn write(&self, _path: &Path, _contents: &[u8]) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }

    fn make_directory(&self, _path: &Path, _recursive: bool) -> io::Result<()> {
        Ok(())
    }

    fn delete(&self, _path: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }
}

fn lines() -> Bucket {
    let mut lines = Bucket::new();
    lines.insert("failed".to_string(), Some("These credentials do not match.".to_string()));
    lines.insert("throttle".to_string(), None);
    lines
}

#[test]
fn test_cache_store_shouldWritePrettyJsonWithNulls() {
    let temp = common::create_temp_dir().unwrap();
    let cache = TranslationCache::local(temp.path());
    let bucket = BucketKey::new("*", "auth", "en");

    cache.store(&bucket, &lines()).unwrap();

    let written = std::fs::read_to_string(temp.path().join("en").join("auth.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed["failed"], "These credentials do not match.");
    assert!(parsed["throttle"].is_null());
}

#[test]
fn test_cache_store_withReadOnlyFilesystem_shouldReturnIoError() {
    let temp = common::create_temp_dir().unwrap();
    let cache = TranslationCache::new(temp.path(), Arc::new(ReadOnlyFilesystem));

    let error = cache.store(&BucketKey::new("*", "auth", "en"), &lines()).unwrap_err();

    assert!(matches!(error, CacheError::Io { .. }));
    assert_eq!(cache.stats().writes, 0);
}

#[test]
fn test_cache_purge_withUndeletableArtifact_shouldReturnIoError() {
    let temp = common::create_temp_dir().unwrap();
    let bucket = BucketKey::new("*", "auth", "en");
    TranslationCache::local(temp.path()).store(&bucket, &lines()).unwrap();

    let cache = TranslationCache::new(temp.path(), Arc::new(ReadOnlyFilesystem));
    assert!(cache.purge(&bucket).is_err());
    assert!(cache.is_cached(&bucket));
}

#[test]
fn test_cache_load_shouldCountHitsAndMisses() {
    let temp = common::create_temp_dir().unwrap();
    let cache = TranslationCache::local(temp.path());
    let bucket = BucketKey::new("shop", "cart", "fr");

    assert_eq!(cache.load(&bucket), None);
    cache.store(&bucket, &lines()).unwrap();
    assert_eq!(cache.load(&bucket), Some(lines()));

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.writes, 1);
}

#[test]
fn test_cache_buckets_withDifferentLocales_shouldNotShareArtifacts() {
    let temp = common::create_temp_dir().unwrap();
    let cache = TranslationCache::local(temp.path());
    let en = BucketKey::new("*", "*", "en");
    let fr = BucketKey::new("*", "*", "fr");

    cache.store(&en, &lines()).unwrap();

    assert!(cache.is_cached(&en));
    assert!(!cache.is_cached(&fr));
    assert_ne!(cache.artifact_path(&en), cache.artifact_path(&fr));
}

#[test]
fn test_resolve_withUnwritableCache_shouldPropagateIoError() {
    let temp = common::create_temp_dir().unwrap();
    let store = TranslationStore::new_in_memory().unwrap();
    let cache = Arc::new(TranslationCache::new(temp.path(), Arc::new(ReadOnlyFilesystem)));
    let mut resolver = CachingResolver::new(NullTranslator::new("en", "en"), store, cache, "en");

    let loaded = resolver.ensure_loaded("*", "auth", "en").unwrap_err();
    let resolved = resolver
        .resolve("auth.failed", &Replacements::new(), None, true)
        .unwrap_err();

    assert!(matches!(loaded, ResolveError::Cache(CacheError::Io { .. })));
    assert!(matches!(resolved, ResolveError::Cache(CacheError::Io { .. })));
    // Nothing recorded when the bucket could not be loaded
    assert_eq!(resolver.store().count().unwrap(), 0);
    assert!(resolver.loaded_bucket("*", "auth", "en").is_none());
}
