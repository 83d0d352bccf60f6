/*!
 * Wiring of the store, the disk cache and resolvers.
 *
 * `Translations` owns the shared pieces: one store and one disk cache
 * subscribed to it. Resolvers are cheap and built per unit of work around
 * whatever fallback translator the caller supplies.
 */

use anyhow::Result;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use super::cache::TranslationCache;
use super::fallback::{FallbackTranslator, FileTranslator, NullTranslator};
use super::resolver::CachingResolver;
use crate::app_config::Config;
use crate::database::{DatabaseConnection, TranslationStore};

/// Composition root for database-backed translation
#[derive(Debug)]
pub struct Translations {
    config: Config,
    store: TranslationStore,
    cache: Arc<TranslationCache>,
}

impl Translations {
    /// Open the configured database and cache directory
    pub fn open(config: &Config) -> Result<Self> {
        let db = DatabaseConnection::new(config.database_path()?)?;
        let cache = TranslationCache::local(config.cache_dir()?);
        info!("Caching translation buckets under {:?}", cache.root());
        Ok(Self::with_parts(config.clone(), TranslationStore::new(db), Arc::new(cache)))
    }

    /// In-memory database with a cache under `cache_dir`
    pub fn in_memory(config: &Config, cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let store = TranslationStore::new_in_memory()?;
        let cache = Arc::new(TranslationCache::local(cache_dir));
        Ok(Self::with_parts(config.clone(), store, cache))
    }

    /// Wire explicit parts; the cache is subscribed to the store's saves
    pub fn with_parts(config: Config, store: TranslationStore, cache: Arc<TranslationCache>) -> Self {
        store.subscribe(cache.clone());
        Self { config, store, cache }
    }

    /// Build a resolver wrapping `translator`
    pub fn resolver<F: FallbackTranslator>(&self, translator: F) -> CachingResolver<F> {
        CachingResolver::new(
            translator,
            self.store.clone(),
            self.cache.clone(),
            &self.config.fallback_locale,
        )
    }

    /// Fallback translator described by the configuration
    ///
    /// Reads language files when `lang_path` is set; otherwise knows nothing.
    pub fn file_translator(&self) -> Box<dyn FallbackTranslator> {
        let Some(lang_path) = &self.config.lang_path else {
            return Box::new(NullTranslator::new(&self.config.locale, &self.config.fallback_locale));
        };

        let mut translator =
            FileTranslator::new(lang_path, &self.config.locale, &self.config.fallback_locale);
        for (namespace, hint) in &self.config.namespaces {
            translator.add_namespace(namespace, hint);
        }
        Box::new(translator)
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The shared store
    pub fn store(&self) -> &TranslationStore {
        &self.store
    }

    /// The shared disk cache
    pub fn cache(&self) -> &Arc<TranslationCache> {
        &self.cache
    }
}
