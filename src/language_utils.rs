use anyhow::{Result, anyhow};
use isolang::Language;

/// Locale utilities
///
/// Locales used as translation buckets look like `en`, `fr`, `pt_BR` or
/// `zh-TW`: an ISO 639-1 or ISO 639-3 language code, optionally followed by
/// a region subtag.
/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-3 (3-letter) code
    Part3,
}

/// Validate that a bare language code is a known ISO 639-1 or ISO 639-3 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if Language::from_639_1(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part1);
        }
    } else if normalized_code.len() == 3 && Language::from_639_3(&normalized_code).is_some() {
        return Ok(LanguageCodeType::Part3);
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Split a locale into its language and optional region subtag
pub fn split_locale(locale: &str) -> (&str, Option<&str>) {
    match locale.find(['_', '-']) {
        Some(pos) => (&locale[..pos], Some(&locale[pos + 1..])),
        None => (locale, None),
    }
}

/// Validate a locale identifier such as `en`, `pt_BR` or `zh-TW`
pub fn validate_locale(locale: &str) -> Result<()> {
    let (language, region) = split_locale(locale.trim());
    validate_language_code(language)
        .map_err(|_| anyhow!("Invalid locale '{}': unknown language '{}'", locale, language))?;

    if let Some(region) = region {
        let valid_region = (region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic()))
            || (region.len() == 3 && region.chars().all(|c| c.is_ascii_digit()));
        if !valid_region {
            return Err(anyhow!("Invalid locale '{}': bad region '{}'", locale, region));
        }
    }

    Ok(())
}

/// Get the English language name for a locale, e.g. `French` for `fr_CA`
pub fn get_language_name(locale: &str) -> Result<String> {
    let (language, _) = split_locale(locale.trim());
    let normalized = language.to_lowercase();
    let lang = match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    }
    .ok_or_else(|| anyhow!("Failed to get language from locale: {}", locale))?;

    Ok(lang.to_name().to_string())
}
