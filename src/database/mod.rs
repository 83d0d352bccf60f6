/*!
 * Database module for persistent storage of translations.
 *
 * This module provides SQLite-based persistence for:
 * - Translation rows keyed by (locale, namespace, group, item)
 * - Change notifications consumed by the disk cache
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::DatabaseConnection;
pub use models::{BucketKey, NewTranslation, TranslationKey, TranslationRecord};
pub use repository::{StoreObserver, TranslationStore};
