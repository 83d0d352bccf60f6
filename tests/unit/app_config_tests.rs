/*!
 * Tests for application configuration
 */

use std::path::PathBuf;

use dbtrans::app_config::{Config, LogLevel};
use log::LevelFilter;

use crate::common;

#[test]
fn test_config_deserialize_withPartialFile_shouldFillDefaults() {
    let json = r#"{
        "locale": "fr",
        "lang_path": "/srv/app/lang",
        "namespaces": {"shop": "/srv/app/vendor/shop/lang"},
        "log_level": "debug"
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.locale, "fr");
    assert_eq!(config.fallback_locale, "en");
    assert_eq!(config.lang_path, Some(PathBuf::from("/srv/app/lang")));
    assert_eq!(config.namespaces.get("shop"), Some(&PathBuf::from("/srv/app/vendor/shop/lang")));
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.database_path.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validate_withRegionLocales_shouldPass() {
    let config = Config {
        locale: "pt_BR".to_string(),
        fallback_locale: "zh-TW".to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validate_withUnknownLanguage_shouldFail() {
    let config = Config {
        locale: "xx".to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_config_loadOrCreate_withExistingFile_shouldNotOverwrite() {
    let temp = common::create_temp_dir().unwrap();
    let path = common::create_test_file(temp.path(), "conf.json", r#"{"locale": "de"}"#).unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config.locale, "de");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"locale": "de"}"#);
}

#[test]
fn test_config_fromFile_withInvalidJson_shouldFail() {
    let temp = common::create_temp_dir().unwrap();
    let path = common::create_test_file(temp.path(), "conf.json", "{ not json").unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_logLevel_levelFilter_shouldMapEveryLevel() {
    assert_eq!(LogLevel::Error.level_filter(), LevelFilter::Error);
    assert_eq!(LogLevel::Warn.level_filter(), LevelFilter::Warn);
    assert_eq!(LogLevel::Info.level_filter(), LevelFilter::Info);
    assert_eq!(LogLevel::Debug.level_filter(), LevelFilter::Debug);
    assert_eq!(LogLevel::Trace.level_filter(), LevelFilter::Trace);
}
