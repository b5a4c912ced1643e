//! Locale model used for parameter coercion, translation and number parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    #[error("Locale '{0}' has no language token")]
    MissingLanguage(String),
}

/// A language with an optional region, e.g. `en` or `pt_BR`.
///
/// The language is normalised to lower case and the region to upper case,
/// so `PT_br` and `pt_BR` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    country: Option<String>,
}

impl Locale {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into().to_ascii_lowercase(),
            country: None,
        }
    }

    pub fn with_country(language: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            language: language.into().to_ascii_lowercase(),
            country: Some(country.into().to_ascii_uppercase()),
        }
    }

    /// The fixed locale used where a request locale is deliberately ignored.
    pub fn english() -> Self {
        Self::new("en")
    }

    /// Parses `language` or `language_REGION`.
    ///
    /// Only the first two `_`-separated tokens are considered, so
    /// `pt_BR_extra` parses as `pt_BR`. An empty language token is an error.
    pub fn parse(tag: &str) -> Result<Self, LocaleError> {
        let mut tokens = tag.trim().split('_');
        let language = match tokens.next() {
            Some(language) if !language.is_empty() => language,
            _ => return Err(LocaleError::MissingLanguage(tag.to_string())),
        };
        Ok(match tokens.next().filter(|c| !c.is_empty()) {
            Some(country) => Self::with_country(language, country),
            None => Self::new(language),
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// The `language[_REGION]` tag, as used in bundle file names.
    pub fn tag(&self) -> String {
        match &self.country {
            Some(country) => format!("{}_{}", self.language, country),
            None => self.language.clone(),
        }
    }

    /// The decimal separator used when reading numbers written in this locale.
    pub fn decimal_separator(&self) -> char {
        match self.language.as_str() {
            "de" | "es" | "fr" | "it" | "pt" | "nl" | "ca" | "ru" | "pl" | "sv" | "da" | "fi"
            | "nb" | "cs" | "tr" => ',',
            _ => '.',
        }
    }

    /// The digit-grouping separator paired with [`Locale::decimal_separator`].
    pub fn grouping_separator(&self) -> char {
        if self.decimal_separator() == ',' { '.' } else { ',' }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}
