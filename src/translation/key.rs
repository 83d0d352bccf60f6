/*!
 * Translation key parsing.
 *
 * Keys follow the `namespace::group.item` convention. The namespace is
 * optional and defaults to `*`; the item may itself contain dots
 * (`validation.custom.email.required` has group `validation` and item
 * `custom.email.required`).
 */

use crate::database::models::{BucketKey, NO_NAMESPACE, TranslationKey, display_code};

/// A key split into its namespace, group and item
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedKey {
    pub namespace: String,
    pub group: String,
    pub item: String,
}

impl ParsedKey {
    /// Parse a key, returning `None` for anything without a usable
    /// namespace, group and item
    pub fn parse(key: &str) -> Option<Self> {
        let (namespace, rest) = match key.split_once("::") {
            Some((namespace, rest)) => (namespace, rest),
            None => (NO_NAMESPACE, key),
        };

        let (group, item) = rest.split_once('.')?;
        if namespace.is_empty() || group.is_empty() || item.is_empty() {
            return None;
        }

        Some(Self {
            namespace: namespace.to_string(),
            group: group.to_string(),
            item: item.to_string(),
        })
    }

    /// Bucket holding this key for `locale`
    pub fn bucket(&self, locale: &str) -> BucketKey {
        BucketKey::new(&self.namespace, &self.group, locale)
    }

    /// Row key for `locale`
    pub fn for_locale(&self, locale: &str) -> TranslationKey {
        TranslationKey::new(locale, &self.namespace, &self.group, &self.item)
    }

    /// Display code, the inverse of `parse`
    pub fn code(&self) -> String {
        display_code(&self.namespace, &self.group, &self.item)
    }
}
