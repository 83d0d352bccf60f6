/*!
 * Database entity models and key types.
 *
 * These structures map directly to the `translations` table and to the
 * composite keys used to look rows and buckets up.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace value meaning "no namespace"
pub const NO_NAMESPACE: &str = "*";

/// Group value reserved for JSON-source (whole sentence) keys
pub const JSON_GROUP: &str = "*";

/// Build the display code for a (namespace, group, item) triple
///
/// `group.item` for the sentinel namespace, `namespace::group.item` otherwise.
pub fn display_code(namespace: &str, group: &str, item: &str) -> String {
    if namespace == NO_NAMESPACE {
        format!("{}.{}", group, item)
    } else {
        format!("{}::{}.{}", namespace, group, item)
    }
}

/// Unique lookup key of one translation row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TranslationKey {
    pub locale: String,
    pub namespace: String,
    pub group: String,
    pub item: String,
}

impl TranslationKey {
    pub fn new(
        locale: impl Into<String>,
        namespace: impl Into<String>,
        group: impl Into<String>,
        item: impl Into<String>,
    ) -> Self {
        Self {
            locale: locale.into(),
            namespace: namespace.into(),
            group: group.into(),
            item: item.into(),
        }
    }

    /// The bucket this row belongs to
    pub fn bucket(&self) -> BucketKey {
        BucketKey::new(&self.namespace, &self.group, &self.locale)
    }

    /// Display code of the key
    pub fn code(&self) -> String {
        display_code(&self.namespace, &self.group, &self.item)
    }
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.locale, self.code())
    }
}

/// Key of one cache bucket: every item of a (namespace, group, locale)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BucketKey {
    pub namespace: String,
    pub group: String,
    pub locale: String,
}

impl BucketKey {
    pub fn new(namespace: &str, group: &str, locale: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            group: group.to_string(),
            locale: locale.to_string(),
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.locale, self.namespace, self.group)
    }
}

/// Persisted translation row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Database ID
    pub id: i64,
    /// Locale code, e.g. `en` or `pt_BR`
    pub locale: String,
    /// Namespace, `*` when the key has none
    pub namespace: String,
    /// Group, conventionally the language file name
    pub group: String,
    /// Leaf key inside the group
    pub item: String,
    /// Translated text, `None` for a recorded miss
    pub text: Option<String>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

impl TranslationRecord {
    /// Display code, `group.item` or `namespace::group.item`
    pub fn code(&self) -> String {
        display_code(&self.namespace, &self.group, &self.item)
    }

    /// The unique lookup key of this row
    pub fn key(&self) -> TranslationKey {
        TranslationKey::new(&self.locale, &self.namespace, &self.group, &self.item)
    }

    /// The bucket this row belongs to
    pub fn bucket(&self) -> BucketKey {
        BucketKey::new(&self.namespace, &self.group, &self.locale)
    }
}

/// A row about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewTranslation {
    pub key: TranslationKey,
    pub text: Option<String>,
}

impl NewTranslation {
    pub fn new(key: TranslationKey, text: Option<String>) -> Self {
        Self { key, text }
    }
}
