/*!
 * Fallback translators consulted when the database has no text.
 *
 * The resolver wraps a `FallbackTranslator` and asks it whenever a bucket
 * has no usable line. `FileTranslator` reads JSON language files laid out
 * like this:
 *
 * - `<root>/<locale>/<group>.json`: group files, nested objects are
 *   flattened with dots
 * - `<root>/<locale>.json`: whole-sentence (JSON-source) strings
 * - `<hint>/<locale>/<group>.json`: groups of a registered namespace, with
 *   overrides from `<root>/vendor/<namespace>/<locale>/<group>.json`
 */

use anyhow::{Context, Result};
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::key::ParsedKey;
use super::replacements::{Replacements, make_replacements};
use crate::database::models::{BucketKey, JSON_GROUP, NO_NAMESPACE, TranslationKey};

/// Translator wrapped by the caching resolver
///
/// Implementations return the key unchanged when they have no line for it.
pub trait FallbackTranslator: Send + Debug {
    /// Translate a `namespace::group.item` key
    fn get(
        &mut self,
        key: &str,
        replacements: &Replacements,
        locale: Option<&str>,
        use_fallback: bool,
    ) -> String;

    /// Translate a whole-sentence key from the JSON source
    fn get_from_json(&mut self, key: &str, replacements: &Replacements, locale: Option<&str>) -> String;

    /// Current locale
    fn locale(&self) -> &str;

    /// Change the current locale
    fn set_locale(&mut self, locale: &str);

    /// Fallback locale
    fn fallback(&self) -> &str;

    /// Change the fallback locale
    fn set_fallback(&mut self, fallback: &str);

    /// Register the language directory of a namespace
    fn add_namespace(&mut self, namespace: &str, hint: &Path);
}

/// Candidate locales for a lookup, in priority order
pub(crate) fn candidate_locales(
    requested: Option<&str>,
    current: &str,
    fallback: &str,
    use_fallback: bool,
) -> Vec<String> {
    let primary = requested.unwrap_or(current).to_string();
    if !use_fallback || fallback.is_empty() || fallback == primary {
        return vec![primary];
    }
    vec![primary, fallback.to_string()]
}

/// Translator that knows nothing
#[derive(Debug, Clone)]
pub struct NullTranslator {
    locale: String,
    fallback: String,
}

impl NullTranslator {
    pub fn new(locale: &str, fallback: &str) -> Self {
        Self {
            locale: locale.to_string(),
            fallback: fallback.to_string(),
        }
    }
}

impl FallbackTranslator for NullTranslator {
    fn get(&mut self, key: &str, _: &Replacements, _: Option<&str>, _: bool) -> String {
        key.to_string()
    }

    fn get_from_json(&mut self, key: &str, _: &Replacements, _: Option<&str>) -> String {
        key.to_string()
    }

    fn locale(&self) -> &str {
        &self.locale
    }

    fn set_locale(&mut self, locale: &str) {
        self.locale = locale.to_string();
    }

    fn fallback(&self) -> &str {
        &self.fallback
    }

    fn set_fallback(&mut self, fallback: &str) {
        self.fallback = fallback.to_string();
    }

    fn add_namespace(&mut self, _namespace: &str, _hint: &Path) {}
}

impl<T: FallbackTranslator + ?Sized> FallbackTranslator for Box<T> {
    fn get(
        &mut self,
        key: &str,
        replacements: &Replacements,
        locale: Option<&str>,
        use_fallback: bool,
    ) -> String {
        (**self).get(key, replacements, locale, use_fallback)
    }

    fn get_from_json(&mut self, key: &str, replacements: &Replacements, locale: Option<&str>) -> String {
        (**self).get_from_json(key, replacements, locale)
    }

    fn locale(&self) -> &str {
        (**self).locale()
    }

    fn set_locale(&mut self, locale: &str) {
        (**self).set_locale(locale)
    }

    fn fallback(&self) -> &str {
        (**self).fallback()
    }

    fn set_fallback(&mut self, fallback: &str) {
        (**self).set_fallback(fallback)
    }

    fn add_namespace(&mut self, namespace: &str, hint: &Path) {
        (**self).add_namespace(namespace, hint)
    }
}

/// Translator backed by JSON language files
#[derive(Debug, Clone)]
pub struct FileTranslator {
    /// Root language directory
    root: PathBuf,
    /// Namespace to language directory
    hints: HashMap<String, PathBuf>,
    locale: String,
    fallback: String,
    /// Flattened group files, loaded on first use
    groups: HashMap<BucketKey, HashMap<String, String>>,
    /// JSON-source files per locale, loaded on first use
    json: HashMap<String, HashMap<String, String>>,
}

impl FileTranslator {
    /// Create a translator reading from `root`
    pub fn new(root: impl Into<PathBuf>, locale: &str, fallback: &str) -> Self {
        Self {
            root: root.into(),
            hints: HashMap::new(),
            locale: locale.to_string(),
            fallback: fallback.to_string(),
            groups: HashMap::new(),
            json: HashMap::new(),
        }
    }

    /// Root language directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Registered namespace directories
    pub fn namespaces(&self) -> &HashMap<String, PathBuf> {
        &self.hints
    }

    fn group_lines(&mut self, namespace: &str, group: &str, locale: &str) -> &HashMap<String, String> {
        let bucket = BucketKey::new(namespace, group, locale);
        if !self.groups.contains_key(&bucket) {
            let lines = self.read_group(namespace, group, locale);
            debug!("Loaded {} file lines for {}", lines.len(), bucket);
            self.groups.insert(bucket.clone(), lines);
        }
        &self.groups[&bucket]
    }

    fn read_group(&self, namespace: &str, group: &str, locale: &str) -> HashMap<String, String> {
        if !is_safe_relative(group) || !is_safe_relative(locale) {
            return HashMap::new();
        }
        let file = format!("{}.json", group);

        if namespace == NO_NAMESPACE {
            return read_flattened(&self.root.join(locale).join(&file));
        }

        let Some(hint) = self.hints.get(namespace) else {
            return HashMap::new();
        };
        let mut lines = read_flattened(&hint.join(locale).join(&file));
        // Application-level overrides of a package's strings
        if is_safe_relative(namespace) {
            let vendor = self.root.join("vendor").join(namespace).join(locale).join(&file);
            lines.extend(read_flattened(&vendor));
        }
        lines
    }

    fn json_lines(&mut self, locale: &str) -> &HashMap<String, String> {
        if !self.json.contains_key(locale) {
            let lines = if is_safe_relative(locale) {
                read_flat_json(&self.root.join(format!("{}.json", locale)))
            } else {
                HashMap::new()
            };
            self.json.insert(locale.to_string(), lines);
        }
        &self.json[locale]
    }

    /// Every line the files define for `locale`
    ///
    /// Covers root group files, namespaced group files and the JSON-source
    /// file. Used to seed the database from existing language files.
    pub fn entries(&self, locale: &str) -> Result<Vec<(TranslationKey, String)>> {
        let mut entries = Vec::new();

        collect_group_entries(&self.root.join(locale), NO_NAMESPACE, locale, &mut entries)?;

        let mut namespaces: Vec<(&String, &PathBuf)> = self.hints.iter().collect();
        namespaces.sort();
        for (namespace, hint) in namespaces {
            collect_group_entries(&hint.join(locale), namespace, locale, &mut entries)?;
        }

        let mut json: Vec<(String, String)> =
            read_flat_json(&self.root.join(format!("{}.json", locale))).into_iter().collect();
        json.sort();
        for (item, text) in json {
            entries.push((TranslationKey::new(locale, NO_NAMESPACE, JSON_GROUP, item), text));
        }

        Ok(entries)
    }
}

impl FallbackTranslator for FileTranslator {
    fn get(
        &mut self,
        key: &str,
        replacements: &Replacements,
        locale: Option<&str>,
        use_fallback: bool,
    ) -> String {
        let Some(parsed) = ParsedKey::parse(key) else {
            return key.to_string();
        };

        for locale in candidate_locales(locale, &self.locale, &self.fallback, use_fallback) {
            let lines = self.group_lines(&parsed.namespace, &parsed.group, &locale);
            if let Some(line) = lines.get(&parsed.item) {
                return make_replacements(line, replacements);
            }
        }

        key.to_string()
    }

    fn get_from_json(&mut self, key: &str, replacements: &Replacements, locale: Option<&str>) -> String {
        let locale = locale.unwrap_or(&self.locale).to_string();

        if let Some(line) = self.json_lines(&locale).get(key).cloned() {
            return make_replacements(&line, replacements);
        }

        let fallback = self.get(key, replacements, Some(&locale), true);
        if fallback != key {
            return fallback;
        }
        key.to_string()
    }

    fn locale(&self) -> &str {
        &self.locale
    }

    fn set_locale(&mut self, locale: &str) {
        self.locale = locale.to_string();
    }

    fn fallback(&self) -> &str {
        &self.fallback
    }

    fn set_fallback(&mut self, fallback: &str) {
        self.fallback = fallback.to_string();
    }

    fn add_namespace(&mut self, namespace: &str, hint: &Path) {
        self.hints.insert(namespace.to_string(), hint.to_path_buf());
        // Forget anything already loaded for the namespace
        self.groups.retain(|bucket, _| bucket.namespace != namespace);
    }
}

/// Reject relative paths that could leave the language directory
fn is_safe_relative(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with('/')
        && !value.contains('\\')
        && value.split('/').all(|part| !part.is_empty() && part != "." && part != "..")
}

fn read_json(path: &Path) -> Option<Value> {
    if !path.is_file() {
        return None;
    }
    let parsed = std::fs::read(path)
        .map_err(anyhow::Error::from)
        .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).map_err(anyhow::Error::from));
    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring unreadable language file {:?}: {}", path, e);
            None
        }
    }
}

/// Read a group file, flattening nested objects with dots
fn read_flattened(path: &Path) -> HashMap<String, String> {
    let mut lines = HashMap::new();
    if let Some(value) = read_json(path) {
        flatten_into(&value, None, &mut lines);
    }
    lines
}

fn flatten_into(value: &Value, prefix: Option<&str>, lines: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (name, child) in map {
                let key = match prefix {
                    Some(prefix) => format!("{}.{}", prefix, name),
                    None => name.clone(),
                };
                flatten_into(child, Some(&key), lines);
            }
        }
        Value::String(text) => {
            if let Some(prefix) = prefix {
                lines.insert(prefix.to_string(), text.clone());
            }
        }
        _ => {}
    }
}

/// Read a JSON-source file: a flat object of sentence to translation
fn read_flat_json(path: &Path) -> HashMap<String, String> {
    let Some(Value::Object(map)) = read_json(path) else {
        return HashMap::new();
    };
    map.into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(text) => Some((key, text)),
            _ => None,
        })
        .collect()
}

fn collect_group_entries(
    dir: &Path,
    namespace: &str,
    locale: &str,
    entries: &mut Vec<(TranslationKey, String)>,
) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.with_context(|| format!("Failed to read language directory {:?}", dir))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();

    for path in files {
        let relative = path.strip_prefix(dir).unwrap_or(&path).with_extension("");
        let group = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let mut lines: Vec<(String, String)> = read_flattened(&path).into_iter().collect();
        lines.sort();
        for (item, text) in lines {
            entries.push((TranslationKey::new(locale, namespace, group.clone(), item), text));
        }
    }
    Ok(())
}
