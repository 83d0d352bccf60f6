/*!
 * Tests for locale utility functions
 */

use dbtrans::language_utils::{
    LanguageCodeType, get_language_name, split_locale, validate_language_code, validate_locale,
};

/// Test validation of bare language codes
#[test]
fn test_validate_language_code_withValidCodes_shouldReturnCorrectType() {
    assert_eq!(validate_language_code("en").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code(" FR ").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("deu").unwrap(), LanguageCodeType::Part3);

    assert!(validate_language_code("a1b").is_err());
    assert!(validate_language_code("e").is_err());
    assert!(validate_language_code("").is_err());
}

#[test]
fn test_split_locale_shouldAcceptBothSeparators() {
    assert_eq!(split_locale("en"), ("en", None));
    assert_eq!(split_locale("pt_BR"), ("pt", Some("BR")));
    assert_eq!(split_locale("zh-TW"), ("zh", Some("TW")));
}

#[test]
fn test_validate_locale_withRegions_shouldCheckRegionShape() {
    assert!(validate_locale("en").is_ok());
    assert!(validate_locale("pt_BR").is_ok());
    assert!(validate_locale("es-419").is_ok());

    assert!(validate_locale("pt_BRA").is_err());
    assert!(validate_locale("en_1").is_err());
    assert!(validate_locale("en_").is_err());
    assert!(validate_locale("../en").is_err());
}

#[test]
fn test_get_language_name_withLocale_shouldIgnoreRegion() {
    assert_eq!(get_language_name("fr_CA").unwrap(), "French");
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert!(get_language_name("zz").is_err());
}
