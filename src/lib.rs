/*!
 * # dbtrans - Database-backed translations with a disk cache
 *
 * A Rust library that answers translation keys from a SQLite table,
 * caching each (namespace, group, locale) bucket as a JSON file and
 * recording every key it was ever asked for.
 *
 * ## Features
 *
 * - `namespace::group.item` keys and whole-sentence (JSON-source) keys
 * - Per-bucket disk cache, purged whenever a row of the bucket is saved
 * - Missing keys recorded as rows, seeded from language files when possible
 * - Fallback locale resolution
 * - `:placeholder` replacements
 * - ISO 639-1 and ISO 639-3 locale validation
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `database`: SQLite store of translation rows:
 *   - `database::repository`: Store operations and save notifications
 *   - `database::models`: Keys and rows
 * - `translation`: Resolution of translation keys:
 *   - `translation::resolver`: The caching resolver
 *   - `translation::cache`: Disk cache of buckets
 *   - `translation::fallback`: File-based fallback translator
 *   - `translation::provider`: Wiring of the pieces above
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod database;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use database::{BucketKey, TranslationKey, TranslationRecord, TranslationStore};
pub use errors::{AppError, CacheError, ResolveError, StoreError};
pub use language_utils::{get_language_name, validate_locale};
pub use translation::{
    CachingResolver, FallbackTranslator, FileTranslator, NullTranslator, Replacements, Translations,
};
