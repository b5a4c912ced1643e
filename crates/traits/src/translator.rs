//! Translator traits for report localization.
//!
//! A translator is bound to a (bundle path, locale) pair. The pipeline
//! creates at most one per request and shares it between parameter binding,
//! the primary data source and every subreport.

use quire_types::Locale;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;
use std::sync::{Arc, RwLock};

pub trait Translator: Send + Sync + Debug {
    fn locale(&self) -> &Locale;

    /// Looks up the localized text for `key`.
    fn lookup(&self, key: &str) -> Option<String>;

    /// Localized text for `key`, or `key` itself when no translation exists.
    fn translate(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_else(|| key.to_string())
    }
}

pub type SharedTranslator = Arc<dyn Translator>;

/// Builds translators for a bundle path and locale.
///
/// Missing bundles are not an error: the translator simply has no entries.
pub trait TranslatorFactory: Send + Sync + Debug {
    fn create(&self, bundle_path: &Path, locale: &Locale) -> SharedTranslator;

    /// Returns a human-readable name for this factory (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// A translator over a fixed in-memory table.
#[derive(Debug, Clone)]
pub struct InMemoryTranslator {
    locale: Locale,
    entries: HashMap<String, String>,
}

impl InMemoryTranslator {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            entries: HashMap::new(),
        }
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl Translator for InMemoryTranslator {
    fn locale(&self) -> &Locale {
        &self.locale
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

/// A factory serving pre-populated tables keyed by locale tag.
///
/// Falls back from `language_REGION` to `language`; unknown locales get an
/// empty translator. The bundle path is ignored.
#[derive(Debug, Default)]
pub struct InMemoryTranslatorFactory {
    tables: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl InMemoryTranslatorFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a translation for the locale tag (e.g. `es` or `pt_BR`).
    ///
    /// Does nothing if the lock is poisoned.
    pub fn add(&self, tag: &str, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut tables) = self.tables.write() {
            tables
                .entry(tag.to_string())
                .or_default()
                .insert(key.into(), value.into());
        }
    }
}

impl TranslatorFactory for InMemoryTranslatorFactory {
    fn create(&self, _bundle_path: &Path, locale: &Locale) -> SharedTranslator {
        let mut translator = InMemoryTranslator::new(locale.clone());
        if let Ok(tables) = self.tables.read() {
            for tag in [locale.language().to_string(), locale.tag()] {
                if let Some(table) = tables.get(&tag) {
                    translator.entries.extend(table.clone());
                }
            }
        }
        Arc::new(translator)
    }

    fn name(&self) -> &'static str {
        "InMemoryTranslatorFactory"
    }
}
