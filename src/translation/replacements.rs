/*!
 * Placeholder substitution for translated lines.
 *
 * `:name` is replaced with the value, `:Name` with the value's first letter
 * uppercased and `:NAME` with the value uppercased.
 */

use std::collections::BTreeMap;

/// Placeholder name to value
pub type Replacements = BTreeMap<String, String>;

/// Apply `replacements` to `line`
///
/// Longer placeholder names are substituted first so that `:name` cannot
/// eat the prefix of `:name_full`.
pub fn make_replacements(line: &str, replacements: &Replacements) -> String {
    if replacements.is_empty() {
        return line.to_string();
    }

    let mut ordered: Vec<(&String, &String)> = replacements.iter().collect();
    ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));

    let mut result = line.to_string();
    for (name, value) in ordered {
        result = result
            .replace(&format!(":{}", name), value)
            .replace(&format!(":{}", name.to_uppercase()), &value.to_uppercase())
            .replace(&format!(":{}", upper_first(name)), &upper_first(value));
    }
    result
}

fn upper_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Build a replacement map from `name=value` pairs
pub fn parse_pairs<I, S>(pairs: I) -> anyhow::Result<Replacements>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut replacements = Replacements::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Invalid replacement '{}', expected name=value", pair))?;
        if name.is_empty() {
            return Err(anyhow::anyhow!("Invalid replacement '{}', empty name", pair));
        }
        replacements.insert(name.to_string(), value.to_string());
    }
    Ok(replacements)
}
