// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::PathBuf;

use dbtrans::app_config::{Config, LogLevel};
use dbtrans::database::models::{JSON_GROUP, NO_NAMESPACE};
use dbtrans::translation::replacements::parse_pairs;
use dbtrans::translation::{FallbackTranslator, FileTranslator, ParsedKey, Translations};
use dbtrans::{BucketKey, TranslationKey, validate_locale};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a `namespace::group.item` key
    Get {
        /// Translation key, e.g. `validation.required` or `shop::cart.empty`
        key: String,

        /// Locale to translate into (defaults to the configured locale)
        #[arg(short, long)]
        locale: Option<String>,

        /// Do not try the fallback locale
        #[arg(long)]
        no_fallback: bool,

        /// Placeholder replacement, `name=value` (repeatable)
        #[arg(short, long = "replace", value_name = "NAME=VALUE")]
        replacements: Vec<String>,
    },

    /// Translate a whole sentence from the JSON-source bucket
    Json {
        /// Sentence to translate
        key: String,

        /// Locale to translate into (defaults to the configured locale)
        #[arg(short, long)]
        locale: Option<String>,

        /// Placeholder replacement, `name=value` (repeatable)
        #[arg(short, long = "replace", value_name = "NAME=VALUE")]
        replacements: Vec<String>,
    },

    /// Set the text of a translation, purging its cached bucket
    Set {
        /// Locale of the row
        locale: String,

        /// Translation key; anything that is not a group key is a sentence
        key: String,

        /// New text
        #[arg(required_unless_present = "null", conflicts_with = "null")]
        text: Option<String>,

        /// Clear the text instead
        #[arg(long)]
        null: bool,
    },

    /// List stored translations of a locale
    List {
        /// Locale to list
        locale: String,

        /// Only this namespace (`*` for none)
        #[arg(short, long)]
        namespace: Option<String>,

        /// Only this group (`*` for sentences)
        #[arg(short, long)]
        group: Option<String>,
    },

    /// Delete the cached artifact of one bucket
    Purge {
        /// Locale of the bucket
        locale: String,

        /// Namespace of the bucket (`*` for none)
        namespace: String,

        /// Group of the bucket (`*` for sentences)
        group: String,
    },

    /// Copy lines from the language files into the database
    Import {
        /// Locales to import (defaults to the configured locale)
        #[arg(short, long = "locale")]
        locales: Vec<String>,
    },

    /// Generate shell completions for dbtrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// dbtrans - database-backed translations with a disk cache
///
/// Answers translation keys from a SQLite table, caching each bucket as a
/// JSON file and recording every key it is asked for.
#[derive(Parser, Debug)]
#[command(name = "dbtrans")]
#[command(version)]
#[command(about = "Database-backed translation lookups with a disk cache")]
#[command(long_about = "dbtrans answers translation keys from a SQLite table, caching each
(namespace, group, locale) bucket as a JSON file. Keys it has never seen are
recorded, seeded from the language files when they know the key.

EXAMPLES:
    dbtrans get validation.required -r attribute=email    # Translate a key
    dbtrans get auth.failed --locale fr --no-fallback     # French only
    dbtrans json 'Welcome back!' --locale fr              # Translate a sentence
    dbtrans set fr auth.failed 'Identifiants invalides'   # Edit a row
    dbtrans list fr --group validation                    # Show stored rows
    dbtrans import --locale en --locale fr                # Seed from language files
    dbtrans completions bash > dbtrans.bash               # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json", global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "dbtrans", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = cli.log_level {
        log::set_max_level(LogLevel::from(level).level_filter());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.level_filter());

    let translations = Translations::open(&config)?;
    run(cli.command, &config, &translations)
}

fn run(command: Commands, config: &Config, translations: &Translations) -> Result<()> {
    match command {
        Commands::Get {
            key,
            locale,
            no_fallback,
            replacements,
        } => {
            check_locale(locale.as_deref())?;
            let replacements = parse_pairs(&replacements)?;
            let mut resolver = translations.resolver(translations.file_translator());
            let line = resolver.resolve(&key, &replacements, locale.as_deref(), !no_fallback)?;
            println!("{}", line);
        }
        Commands::Json {
            key,
            locale,
            replacements,
        } => {
            check_locale(locale.as_deref())?;
            let replacements = parse_pairs(&replacements)?;
            let mut resolver = translations.resolver(translations.file_translator());
            let line = resolver.resolve_from_json(&key, &replacements, locale.as_deref())?;
            println!("{}", line);
        }
        Commands::Set {
            locale,
            key,
            text,
            null,
        } => {
            validate_locale(&locale)?;
            let row_key = row_key(&locale, &key);
            let text = if null { None } else { text };
            let record = translations.store().save(&row_key, text.as_deref())?;
            info!("Saved {} (#{})", row_key, record.id);
        }
        Commands::List {
            locale,
            namespace,
            group,
        } => {
            let records = translations
                .store()
                .query(&locale, namespace.as_deref(), group.as_deref())?;
            if records.is_empty() {
                warn!("No translations stored for locale '{}'", locale);
            }
            for record in records {
                println!("{}\t{}", record.code(), record.text.as_deref().unwrap_or("(null)"));
            }
        }
        Commands::Purge {
            locale,
            namespace,
            group,
        } => {
            let bucket = BucketKey::new(&namespace, &group, &locale);
            translations.cache().purge(&bucket)?;
            info!("Purged cached bucket {}", bucket);
        }
        Commands::Import { locales } => {
            let lang_path = config
                .lang_path
                .as_ref()
                .ok_or_else(|| anyhow!("No lang_path configured, nothing to import"))?;
            let locales = if locales.is_empty() {
                vec![config.locale.clone()]
            } else {
                locales
            };

            let mut translator = FileTranslator::new(lang_path, &config.locale, &config.fallback_locale);
            for (namespace, hint) in &config.namespaces {
                translator.add_namespace(namespace, hint);
            }

            for locale in locales {
                validate_locale(&locale)?;
                let entries = translator.entries(&locale)?;
                for (row_key, text) in &entries {
                    translations.store().save(row_key, Some(text))?;
                }
                info!("Imported {} lines for '{}'", entries.len(), locale);
            }
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn check_locale(locale: Option<&str>) -> Result<()> {
    match locale {
        Some(locale) => validate_locale(locale),
        None => Ok(()),
    }
}

/// Row key addressed by a CLI key: group keys map to their bucket, anything
/// else is a sentence of the JSON-source bucket
fn row_key(locale: &str, key: &str) -> TranslationKey {
    match ParsedKey::parse(key) {
        Some(parsed) => parsed.for_locale(locale),
        None => TranslationKey::new(locale, NO_NAMESPACE, JSON_GROUP, key),
    }
}
