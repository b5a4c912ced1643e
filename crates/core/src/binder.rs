//! Coercion of caller-supplied parameters into the types a report declares.

use crate::error::BindingError;
use crate::params::{BoundParameters, ParameterValue, TRANSLATOR_PARAMETER};
use log::{debug, warn};
use quire_traits::{SharedTranslator, TranslatorFactory};
use quire_types::{CompiledReport, Locale, RawParameters, ValueType};
use rust_decimal::Decimal;
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// The result of binding: typed parameters plus the translator, if a locale
/// parameter produced one.
#[derive(Debug)]
pub struct Binding {
    pub parameters: BoundParameters,
    pub translator: Option<SharedTranslator>,
}

#[derive(Debug, Clone)]
pub struct ParameterBinder {
    translators: Arc<dyn TranslatorFactory>,
}

impl ParameterBinder {
    pub fn new(translators: Arc<dyn TranslatorFactory>) -> Self {
        Self { translators }
    }

    /// Binds `raw` against the parameter slots declared by `report`.
    ///
    /// `bundle_path` is the bundle stem of the template being executed; a
    /// translator is always looked up relative to it.
    /// Declared slots are visited in declaration order. Only the first locale
    /// slot builds a translator; it is injected under `TRANSLATOR`. Values
    /// without a matching slot, and explicit nulls, pass through unchanged.
    pub fn bind(
        &self,
        report: &CompiledReport,
        bundle_path: &Path,
        mut raw: RawParameters,
    ) -> Result<Binding, BindingError> {
        let mut parameters = BoundParameters::new();
        let mut translator: Option<SharedTranslator> = None;

        for slot in &report.parameters {
            let Some(value) = raw.remove(&slot.name) else {
                continue;
            };
            if value.is_null() {
                parameters.insert(slot.name.clone(), ParameterValue::Value(value));
                continue;
            }

            let bound = match &slot.value_type {
                ValueType::Locale => {
                    let locale = coerce_locale(&slot.name, &value)?;
                    if translator.is_none() {
                        debug!(
                            "Creating translator for '{}' ({}).",
                            bundle_path.display(),
                            locale
                        );
                        translator = Some(self.translators.create(bundle_path, &locale));
                    } else {
                        warn!(
                            "Report '{}' declares several locale parameters; '{}' does not replace the translator.",
                            report.name, slot.name
                        );
                    }
                    ParameterValue::Locale(locale)
                }
                ValueType::Decimal => ParameterValue::Decimal(coerce_decimal(&slot.name, &value)?),
                ValueType::Other(_) => ParameterValue::Value(value),
            };
            parameters.insert(slot.name.clone(), bound);
        }

        for (name, value) in raw {
            parameters.insert(name, ParameterValue::Value(value));
        }
        if let Some(translator) = &translator {
            parameters.insert(TRANSLATOR_PARAMETER, ParameterValue::Translator(translator.clone()));
        }

        Ok(Binding { parameters, translator })
    }
}

fn coerce_locale(parameter: &str, value: &Value) -> Result<Locale, BindingError> {
    let tag = value.as_str().ok_or_else(|| BindingError::NotAString {
        parameter: parameter.to_string(),
        found: value.clone(),
    })?;
    Locale::parse(tag).map_err(|source| BindingError::Locale {
        parameter: parameter.to_string(),
        source,
    })
}

/// Goes through `f64` and keeps the shortest digits that round-trip, so
/// `12.5` binds as exactly `12.5`.
fn coerce_decimal(parameter: &str, value: &Value) -> Result<Decimal, BindingError> {
    let float = value.as_f64().ok_or_else(|| BindingError::NotANumber {
        parameter: parameter.to_string(),
        found: value.clone(),
    })?;
    let digits = float.to_string();
    Decimal::from_str(&digits)
        .or_else(|_| Decimal::from_scientific(&digits))
        .map_err(|_| BindingError::OutOfRange {
            parameter: parameter.to_string(),
            value: digits,
        })
}
