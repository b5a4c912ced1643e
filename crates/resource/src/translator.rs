//! Filesystem-backed translator factory.

use crate::properties::parse_properties;
use log::{debug, warn};
use quire_traits::{SharedTranslator, Translator, TranslatorFactory};
use quire_types::Locale;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A translator over the merged `.properties` bundles for one locale.
#[derive(Debug, Clone)]
pub struct PropertiesTranslator {
    locale: Locale,
    bundle_path: PathBuf,
    entries: HashMap<String, String>,
}

impl PropertiesTranslator {
    /// Loads and merges every bundle file that exists for `locale`.
    ///
    /// Unreadable files are skipped with a warning; a locale without any
    /// bundle yields a translator with no entries.
    pub fn load(bundle_path: &Path, locale: &Locale) -> Self {
        let mut entries = HashMap::new();
        for candidate in bundle_candidates(bundle_path, locale) {
            match std::fs::read_to_string(&candidate) {
                Ok(text) => {
                    debug!("Loaded translation bundle '{}'.", candidate.display());
                    entries.extend(parse_properties(&text));
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!("Skipping translation bundle '{}': {}", candidate.display(), e),
            }
        }
        Self {
            locale: locale.clone(),
            bundle_path: bundle_path.to_path_buf(),
            entries,
        }
    }

    pub fn bundle_path(&self) -> &Path {
        &self.bundle_path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Translator for PropertiesTranslator {
    fn locale(&self) -> &Locale {
        &self.locale
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

/// Candidate bundle files, least specific first.
fn bundle_candidates(bundle_path: &Path, locale: &Locale) -> Vec<PathBuf> {
    let base = bundle_path.as_os_str().to_string_lossy();
    let mut suffixes = vec![String::new(), format!("_{}", locale.language())];
    if locale.country().is_some() {
        let tag = locale.tag();
        let lower = tag.to_ascii_lowercase();
        if lower != tag {
            suffixes.push(format!("_{lower}"));
        }
        suffixes.push(format!("_{tag}"));
    }
    suffixes
        .into_iter()
        .map(|suffix| PathBuf::from(format!("{base}{suffix}.properties")))
        .collect()
}

/// Creates [`PropertiesTranslator`]s from bundles on the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct PropertiesTranslatorFactory;

impl PropertiesTranslatorFactory {
    pub fn new() -> Self {
        Self
    }
}

impl TranslatorFactory for PropertiesTranslatorFactory {
    fn create(&self, bundle_path: &Path, locale: &Locale) -> SharedTranslator {
        Arc::new(PropertiesTranslator::load(bundle_path, locale))
    }

    fn name(&self) -> &'static str {
        "PropertiesTranslatorFactory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_more_specific_bundle_wins() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("invoice.properties"), "Invoice=Invoice\nTotal=Total\nPage=Page\n").unwrap();
        fs::write(dir.path().join("invoice_pt.properties"), "Invoice=Fatura\nTotal=Total geral\n").unwrap();
        fs::write(dir.path().join("invoice_pt_BR.properties"), "Invoice=Nota fiscal\n").unwrap();

        let translator = PropertiesTranslatorFactory::new()
            .create(&dir.path().join("invoice"), &Locale::with_country("pt", "BR"));

        assert_eq!(translator.translate("Invoice"), "Nota fiscal");
        assert_eq!(translator.translate("Total"), "Total geral");
        assert_eq!(translator.translate("Page"), "Page");
        assert_eq!(translator.translate("Unknown"), "Unknown");
        assert_eq!(translator.locale().tag(), "pt_BR");
    }

    #[test]
    fn test_lower_case_bundle_names_are_found() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("invoice_es_es.properties"), "Invoice=Factura\n").unwrap();

        let translator =
            PropertiesTranslator::load(&dir.path().join("invoice"), &Locale::with_country("es", "ES"));
        assert_eq!(translator.lookup("Invoice").as_deref(), Some("Factura"));
    }

    #[test]
    fn test_missing_bundles_give_empty_translator() {
        let dir = tempdir().unwrap();
        let translator = PropertiesTranslator::load(&dir.path().join("invoice"), &Locale::new("fr"));
        assert!(translator.is_empty());
        assert_eq!(translator.translate("Invoice"), "Invoice");
    }
}
