/*!
 * Opening translations from a configuration file and reopening them
 */

use dbtrans::app_config::Config;
use dbtrans::translation::{FallbackTranslator, FileTranslator, Replacements, Translations};
use dbtrans::{BucketKey, TranslationKey};

use crate::common;

fn write_config(dir: &std::path::Path) -> Config {
    let lang = common::create_lang_dir(dir).unwrap();
    let config = Config {
        locale: "fr".to_string(),
        fallback_locale: "en".to_string(),
        database_path: Some(dir.join("data").join("dbtrans.db")),
        cache_dir: Some(dir.join("cache")),
        lang_path: Some(lang),
        ..Config::default()
    };
    config.save(&dir.join("conf.json")).unwrap();
    config
}

#[test]
fn test_open_withConfigFile_shouldResolveAndPersist() {
    let temp = common::create_temp_dir().unwrap();
    write_config(temp.path());
    let config = Config::load_or_create(&temp.path().join("conf.json")).unwrap();
    config.validate().unwrap();

    {
        let translations = Translations::open(&config).unwrap();
        let mut resolver = translations.resolver(translations.file_translator());
        assert_eq!(
            resolver.resolve("auth.failed", &Replacements::new(), None, true).unwrap(),
            "Identifiants incorrects."
        );
    }

    assert!(temp.path().join("data").join("dbtrans.db").exists());

    let translations = Translations::open(&config).unwrap();
    let record = translations
        .store()
        .find(&TranslationKey::new("fr", "*", "auth", "failed"))
        .unwrap()
        .unwrap();
    assert_eq!(record.text.as_deref(), Some("Identifiants incorrects."));
}

#[test]
fn test_open_afterWarmup_shouldServeFromDiskCache() {
    let temp = common::create_temp_dir().unwrap();
    let config = write_config(temp.path());
    let bucket = BucketKey::new("*", "auth", "en");

    {
        let translations = Translations::open(&config).unwrap();
        translations
            .store()
            .save(&TranslationKey::new("en", "*", "auth", "failed"), Some("Bad login"))
            .unwrap();
        let mut resolver = translations.resolver(translations.file_translator());
        resolver.ensure_loaded("*", "auth", "en").unwrap();
        assert!(translations.cache().is_cached(&bucket));
    }

    let translations = Translations::open(&config).unwrap();
    let mut resolver = translations.resolver(translations.file_translator());
    resolver.set_locale("en");
    assert_eq!(
        resolver.resolve("auth.failed", &Replacements::new(), None, true).unwrap(),
        "Bad login"
    );
    assert_eq!(translations.cache().stats().hits, 1);
}

#[test]
fn test_import_fromLanguageFiles_shouldFillStoreAndPurgeBuckets() {
    let temp = common::create_temp_dir().unwrap();
    let config = write_config(temp.path());
    let translations = Translations::open(&config).unwrap();

    // A stale artifact from before the import
    let bucket = BucketKey::new("*", "validation", "en");
    translations.cache().store(&bucket, &Default::default()).unwrap();

    let lang_path = config.lang_path.clone().unwrap();
    let mut translator = FileTranslator::new(&lang_path, "en", "en");
    translator.set_fallback("en");
    for (key, text) in translator.entries("en").unwrap() {
        translations.store().save(&key, Some(&text)).unwrap();
    }

    assert_eq!(translations.store().count().unwrap(), 3);
    assert!(!translations.cache().is_cached(&bucket));

    let mut resolver = translations.resolver(translations.file_translator());
    let line = resolver
        .resolve("validation.required", &Replacements::new(), Some("en"), false)
        .unwrap();
    assert_eq!(line, "The :attribute field is required.");
}
