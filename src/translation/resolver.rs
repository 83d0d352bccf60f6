/*!
 * Caching translation resolver.
 *
 * `CachingResolver` answers translation keys from the database, keeping
 * every bucket it touched in memory and snapshotting buckets to the disk
 * cache. Lookups go memory, disk cache, database, then the wrapped
 * fallback translator. A key the database has never seen is recorded as a
 * new row seeded with whatever the fallback translator knew, so the table
 * ends up listing every key the application asks for.
 */

use log::debug;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::cache::{Bucket, TranslationCache};
use super::fallback::{FallbackTranslator, candidate_locales};
use super::key::ParsedKey;
use super::replacements::{Replacements, make_replacements};
use crate::database::models::{BucketKey, JSON_GROUP, NO_NAMESPACE, TranslationKey};
use crate::database::repository::TranslationStore;
use crate::errors::{CacheError, ResolveError};

/// State of one item in the loaded buckets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The item is not in its bucket: never recorded
    Missing,
    /// The item was recorded without text
    Blank,
    /// The item has text
    Text(String),
}

/// Database-backed translator wrapping a fallback translator
///
/// One resolver serves one unit of work. Buckets loaded into memory are kept
/// for the resolver's lifetime; edits made elsewhere become visible to the
/// next resolver, through the purged disk cache.
#[derive(Debug)]
pub struct CachingResolver<F: FallbackTranslator> {
    translator: F,
    store: TranslationStore,
    cache: Arc<TranslationCache>,
    loaded: HashMap<BucketKey, Bucket>,
    locale: String,
    fallback: String,
}

impl<F: FallbackTranslator> CachingResolver<F> {
    /// Wrap `translator`, taking its current locale and `fallback` as the
    /// fallback locale
    pub fn new(
        translator: F,
        store: TranslationStore,
        cache: Arc<TranslationCache>,
        fallback: &str,
    ) -> Self {
        let locale = translator.locale().to_string();
        let mut resolver = Self {
            translator,
            store,
            cache,
            loaded: HashMap::new(),
            locale,
            fallback: String::new(),
        };
        resolver.set_fallback(fallback);
        resolver
    }

    /// Current locale
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Change the current locale, here and in the wrapped translator
    pub fn set_locale(&mut self, locale: &str) {
        self.translator.set_locale(locale);
        self.locale = locale.to_string();
    }

    /// Fallback locale
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Change the fallback locale, here and in the wrapped translator
    pub fn set_fallback(&mut self, fallback: &str) {
        self.translator.set_fallback(fallback);
        self.fallback = fallback.to_string();
    }

    /// Register a namespace's language directory with the wrapped translator
    pub fn add_namespace(&mut self, namespace: &str, hint: &Path) {
        self.translator.add_namespace(namespace, hint);
    }

    /// The wrapped translator
    pub fn translator(&self) -> &F {
        &self.translator
    }

    /// The backing store
    pub fn store(&self) -> &TranslationStore {
        &self.store
    }

    /// The disk cache
    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// Translate `key`
    ///
    /// Tries the requested (or current) locale, then the fallback locale when
    /// `use_fallback` is set; the first locale with a line wins. Returns the
    /// key itself when no locale has one, including for malformed keys.
    ///
    /// The fallback translator is asked at most once, with the caller's
    /// locale and `use_fallback`. An unseen tuple is recorded with its
    /// answer, and only the first unseen tuple of a call gets a row.
    pub fn resolve(
        &mut self,
        key: &str,
        replacements: &Replacements,
        locale: Option<&str>,
        use_fallback: bool,
    ) -> Result<String, ResolveError> {
        let Some(parsed) = ParsedKey::parse(key) else {
            debug!("Not a group key, returning as-is: '{}'", key);
            return Ok(key.to_string());
        };

        let mut discovered: Option<Option<String>> = None;
        let mut recorded = false;

        for lang in candidate_locales(locale, &self.locale, &self.fallback, use_fallback) {
            let row_key = parsed.for_locale(&lang);
            let bucket = row_key.bucket();
            self.ensure_loaded(&bucket.namespace, &bucket.group, &bucket.locale)?;

            let line = match self.lookup(&row_key) {
                Lookup::Text(text) if !text.is_empty() => Some(text),
                Lookup::Missing if !recorded => {
                    recorded = true;
                    let answer = discovered
                        .get_or_insert_with(|| ask(&mut self.translator, key, locale, use_fallback))
                        .clone();
                    self.record(&row_key, answer)?
                }
                _ => discovered
                    .get_or_insert_with(|| ask(&mut self.translator, key, locale, use_fallback))
                    .clone(),
            };

            if let Some(line) = line.filter(|line| !line.is_empty()) {
                return Ok(make_replacements(&line, replacements));
            }
        }

        Ok(key.to_string())
    }

    /// Translate a whole-sentence key from the `("*", "*")` bucket
    ///
    /// Falls back to `resolve` when the sentence has no line. Replacements
    /// are applied exactly once.
    pub fn resolve_from_json(
        &mut self,
        key: &str,
        replacements: &Replacements,
        locale: Option<&str>,
    ) -> Result<String, ResolveError> {
        let locale = locale.unwrap_or(&self.locale).to_string();

        let line = if key.is_empty() {
            None
        } else {
            let row_key = TranslationKey::new(&locale, NO_NAMESPACE, JSON_GROUP, key);
            self.ensure_loaded(NO_NAMESPACE, JSON_GROUP, &locale)?;
            let line = match self.lookup(&row_key) {
                Lookup::Text(text) => Some(text),
                Lookup::Blank => ask_json(&mut self.translator, key, &locale),
                Lookup::Missing => {
                    let answer = ask_json(&mut self.translator, key, &locale);
                    self.record(&row_key, answer)?
                }
            };
            line.filter(|line| !line.is_empty())
        };

        if line.is_none() {
            let fallback = self.resolve(key, replacements, Some(&locale), true)?;
            if fallback != key {
                return Ok(fallback);
            }
        }

        Ok(make_replacements(line.as_deref().unwrap_or(key), replacements))
    }

    /// Whether `key` resolves to a line
    ///
    /// Same side effects as `resolve`: an unseen key gets recorded.
    pub fn has(&mut self, key: &str, locale: Option<&str>) -> Result<bool, ResolveError> {
        Ok(self.resolve(key, &Replacements::new(), locale, true)? != key)
    }

    /// Record an unseen row key seeded with `discovered`
    ///
    /// Returns the text the store kept, which is another caller's when it
    /// created the row first.
    fn record(&mut self, key: &TranslationKey, discovered: Option<String>) -> Result<Option<String>, ResolveError> {
        let record = self.store.fetch_or_create(key, discovered.as_deref())?;
        debug!("Recorded {} (text: {})", key, record.text.is_some());

        self.loaded
            .entry(key.bucket())
            .or_default()
            .insert(key.item.clone(), record.text.clone());
        Ok(record.text.filter(|text| !text.is_empty()).or(discovered))
    }

    /// State of a row key in the loaded buckets
    pub fn lookup(&self, key: &TranslationKey) -> Lookup {
        match self.loaded.get(&key.bucket()).and_then(|lines| lines.get(&key.item)) {
            None => Lookup::Missing,
            Some(None) => Lookup::Blank,
            Some(Some(text)) => Lookup::Text(text.clone()),
        }
    }

    /// A bucket as loaded into memory, if it has been
    pub fn loaded_bucket(&self, namespace: &str, group: &str, locale: &str) -> Option<&Bucket> {
        self.loaded.get(&BucketKey::new(namespace, group, locale))
    }

    /// Make sure a bucket is in memory
    ///
    /// Reads the disk artifact when there is a usable one, otherwise queries
    /// the store and writes the artifact. Fails only when the artifact cannot
    /// be written or the store cannot be read.
    pub fn ensure_loaded(&mut self, namespace: &str, group: &str, locale: &str) -> Result<(), ResolveError> {
        let bucket = BucketKey::new(namespace, group, locale);
        if self.loaded.contains_key(&bucket) {
            return Ok(());
        }

        let lines = match self.cache.load(&bucket) {
            Some(lines) => lines,
            None => {
                let lines: Bucket = self
                    .store
                    .query(locale, Some(namespace), Some(group))?
                    .into_iter()
                    .map(|record| (record.item, record.text))
                    .collect();
                self.cache.store(&bucket, &lines)?;
                debug!("Loaded bucket {} from the store ({} items)", bucket, lines.len());
                lines
            }
        };

        self.loaded.entry(bucket).or_default().extend(lines);
        Ok(())
    }

    /// Delete the disk artifact of a bucket
    ///
    /// Buckets already in this resolver's memory are left alone.
    pub fn purge_cache(&self, namespace: &str, group: &str, locale: &str) -> Result<(), CacheError> {
        self.cache.purge(&BucketKey::new(namespace, group, locale))
    }
}

/// Group line from the fallback translator, `None` when it has none
fn ask<F: FallbackTranslator>(translator: &mut F, key: &str, locale: Option<&str>, use_fallback: bool) -> Option<String> {
    let line = translator.get(key, &Replacements::new(), locale, use_fallback);
    (line != key).then_some(line)
}

/// Sentence line from the fallback translator, `None` when it has none
fn ask_json<F: FallbackTranslator>(translator: &mut F, key: &str, locale: &str) -> Option<String> {
    let line = translator.get_from_json(key, &Replacements::new(), Some(locale));
    (line != key).then_some(line)
}
