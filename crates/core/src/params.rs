//! Typed parameter values handed to the fill step.

use quire_source::DataSource;
use quire_traits::SharedTranslator;
use quire_types::Locale;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

/// Reserved parameter carrying the request's translator.
pub const TRANSLATOR_PARAMETER: &str = "TRANSLATOR";

/// Reserved parameter that disables page breaks in the fill step.
pub const IGNORE_PAGINATION_PARAMETER: &str = "IS_IGNORE_PAGINATION";

pub enum ParameterValue {
    /// A caller-supplied value passed through unchanged.
    Value(Value),
    Decimal(Decimal),
    Locale(Locale),
    Translator(SharedTranslator),
    /// A row source bound for a subreport.
    DataSource(Box<dyn DataSource>),
    Flag(bool),
}

impl fmt::Debug for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Value(v) => f.debug_tuple("Value").field(v).finish(),
            ParameterValue::Decimal(d) => f.debug_tuple("Decimal").field(d).finish(),
            ParameterValue::Locale(l) => f.debug_tuple("Locale").field(l).finish(),
            ParameterValue::Translator(t) => {
                f.debug_tuple("Translator").field(&t.locale().tag()).finish()
            }
            ParameterValue::DataSource(s) => {
                f.debug_tuple("DataSource").field(&s.size_hint()).finish()
            }
            ParameterValue::Flag(b) => f.debug_tuple("Flag").field(b).finish(),
        }
    }
}

impl ParameterValue {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ParameterValue::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            ParameterValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_locale(&self) -> Option<&Locale> {
        match self {
            ParameterValue::Locale(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ParameterValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Text form of scalar values; `None` for translators and data sources.
    pub fn display_text(&self) -> Option<String> {
        match self {
            ParameterValue::Value(Value::String(s)) => Some(s.clone()),
            ParameterValue::Value(Value::Null) => Some(String::new()),
            ParameterValue::Value(v) => Some(v.to_string()),
            ParameterValue::Decimal(d) => Some(d.to_string()),
            ParameterValue::Locale(l) => Some(l.tag()),
            ParameterValue::Flag(b) => Some(b.to_string()),
            ParameterValue::Translator(_) | ParameterValue::DataSource(_) => None,
        }
    }
}

/// Parameters after binding, keyed by name.
#[derive(Debug, Default)]
pub struct BoundParameters {
    values: BTreeMap<String, ParameterValue>,
}

impl BoundParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ParameterValue) -> Option<ParameterValue> {
        self.values.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<ParameterValue> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ParameterValue> {
        self.values.iter()
    }

    pub fn translator(&self) -> Option<&SharedTranslator> {
        match self.values.get(TRANSLATOR_PARAMETER) {
            Some(ParameterValue::Translator(t)) => Some(t),
            _ => None,
        }
    }

    /// Whether the fill step should lay everything out on a single page.
    pub fn ignore_pagination(&self) -> bool {
        match self.values.get(IGNORE_PAGINATION_PARAMETER) {
            Some(ParameterValue::Flag(b)) => *b,
            Some(ParameterValue::Value(Value::Bool(b))) => *b,
            _ => false,
        }
    }

    /// Removes and returns every bound data source, in name order.
    pub fn take_data_sources(&mut self) -> Vec<(String, Box<dyn DataSource>)> {
        let names: Vec<String> = self
            .values
            .iter()
            .filter(|(_, v)| matches!(v, ParameterValue::DataSource(_)))
            .map(|(k, _)| k.clone())
            .collect();
        names
            .into_iter()
            .filter_map(|name| match self.values.remove(&name) {
                Some(ParameterValue::DataSource(source)) => Some((name, source)),
                _ => None,
            })
            .collect()
    }
}

impl IntoIterator for BoundParameters {
    type Item = (String, ParameterValue);
    type IntoIter = btree_map::IntoIter<String, ParameterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_source::{EmptyDataSource, VecDataSource};
    use serde_json::json;

    #[test]
    fn pagination_flag_accepts_flag_or_raw_bool() {
        let mut params = BoundParameters::new();
        assert!(!params.ignore_pagination());
        params.insert(IGNORE_PAGINATION_PARAMETER, ParameterValue::Value(json!(true)));
        assert!(params.ignore_pagination());
        params.insert(IGNORE_PAGINATION_PARAMETER, ParameterValue::Flag(false));
        assert!(!params.ignore_pagination());
    }

    #[test]
    fn take_data_sources_leaves_scalars() {
        let mut params = BoundParameters::new();
        params.insert("LINES", ParameterValue::DataSource(Box::new(VecDataSource::new(vec![]))));
        params.insert("AUX", ParameterValue::DataSource(Box::new(EmptyDataSource)));
        params.insert("customer", ParameterValue::Value(json!("ACME")));

        let sources = params.take_data_sources();
        let names: Vec<&str> = sources.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["AUX", "LINES"]);
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("customer").and_then(|v| v.display_text()).as_deref(), Some("ACME"));
    }
}
