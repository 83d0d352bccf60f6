/*!
 * Database-backed translation resolution.
 *
 * This module answers translation keys from the store, with an on-disk
 * cache in front of it and a file-based translator behind it. It is split
 * into several submodules:
 *
 * - `key`: Parsing of `namespace::group.item` keys
 * - `replacements`: `:placeholder` substitution
 * - `cache`: Per-bucket JSON artifacts on disk
 * - `fallback`: Translators consulted when the store has no text
 * - `resolver`: The caching resolver itself
 * - `provider`: Wiring of store, cache and resolvers
 */

// Re-export main types for easier usage
pub use self::cache::{Bucket, CacheStats, TranslationCache};
pub use self::fallback::{FallbackTranslator, FileTranslator, NullTranslator};
pub use self::key::ParsedKey;
pub use self::provider::Translations;
pub use self::replacements::{Replacements, make_replacements};
pub use self::resolver::{CachingResolver, Lookup};

// Submodules
pub mod cache;
pub mod fallback;
pub mod key;
pub mod provider;
pub mod replacements;
pub mod resolver;
