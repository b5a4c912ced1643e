//! The compiled report artifact and the declarations it carries.

use serde::{Deserialize, Serialize};

/// The declared value type of a parameter slot.
///
/// Only two declared types get special coercion; everything else is passed
/// through to the fill step as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValueType {
    Locale,
    Decimal,
    Other(String),
}

impl ValueType {
    /// Maps a declared class name onto a value type.
    ///
    /// Accepts both the engine's fully qualified names (`java.util.Locale`,
    /// `java.math.BigDecimal`) and the short forms `locale` / `decimal`.
    pub fn from_class_name(name: &str) -> Self {
        match name {
            "java.util.Locale" => ValueType::Locale,
            "java.math.BigDecimal" | "java.lang.BigDecimal" => ValueType::Decimal,
            short if short.eq_ignore_ascii_case("locale") => ValueType::Locale,
            short if short.eq_ignore_ascii_case("decimal") => ValueType::Decimal,
            other => ValueType::Other(other.to_string()),
        }
    }

    pub fn class_name(&self) -> &str {
        match self {
            ValueType::Locale => "java.util.Locale",
            ValueType::Decimal => "java.math.BigDecimal",
            ValueType::Other(name) => name,
        }
    }
}

impl Default for ValueType {
    fn default() -> Self {
        ValueType::Other("java.lang.String".to_string())
    }
}

impl From<String> for ValueType {
    fn from(name: String) -> Self {
        ValueType::from_class_name(&name)
    }
}

impl From<ValueType> for String {
    fn from(value_type: ValueType) -> Self {
        value_type.class_name().to_string()
    }
}

/// A parameter declared by a report template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSlot {
    pub name: String,
    #[serde(rename = "class", default)]
    pub value_type: ValueType,
}

impl ParameterSlot {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self { name: name.into(), value_type }
    }
}

/// The query dialect a template declares, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryLanguage {
    /// Path queries over hierarchical data (`xpath`).
    XPath,
    /// Relational queries (`sql`).
    Sql,
    Other(String),
}

impl QueryLanguage {
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("xpath") {
            QueryLanguage::XPath
        } else if name.eq_ignore_ascii_case("sql") {
            QueryLanguage::Sql
        } else {
            QueryLanguage::Other(name.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportQuery {
    pub language: String,
    #[serde(default)]
    pub text: String,
}

impl ReportQuery {
    pub fn language(&self) -> QueryLanguage {
        QueryLanguage::from_name(&self.language)
    }
}

/// How a data source should interpret a field's raw text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Number,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self { name: name.into(), kind }
    }
}

fn default_rows_per_page() -> usize {
    40
}

/// The executable form of a report template, as loaded from its compiled artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledReport {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub query: Option<ReportQuery>,
    #[serde(default)]
    pub parameters: Vec<ParameterSlot>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
    /// The expression compiler the artifact was built with.
    pub expression_compiler: String,
}

impl CompiledReport {
    /// The declared query language, or `None` for query-less templates
    /// (summary or cover pages).
    pub fn query_language(&self) -> Option<QueryLanguage> {
        self.query
            .as_ref()
            .filter(|q| !q.language.trim().is_empty())
            .map(ReportQuery::language)
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSlot> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_type_from_class_names() {
        assert_eq!(ValueType::from_class_name("java.util.Locale"), ValueType::Locale);
        assert_eq!(ValueType::from_class_name("Decimal"), ValueType::Decimal);
        assert_eq!(
            ValueType::from_class_name("java.lang.Integer"),
            ValueType::Other("java.lang.Integer".to_string())
        );
    }

    #[test]
    fn query_language_is_case_insensitive() {
        assert_eq!(QueryLanguage::from_name("XPath"), QueryLanguage::XPath);
        assert_eq!(QueryLanguage::from_name("SQL"), QueryLanguage::Sql);
        assert_eq!(QueryLanguage::from_name("hql"), QueryLanguage::Other("hql".to_string()));
    }

    #[test]
    fn compiled_report_deserializes_with_defaults() {
        let report: CompiledReport = serde_json::from_value(json!({
            "name": "invoice",
            "parameters": [
                { "name": "REPORT_LOCALE", "class": "java.util.Locale" },
                { "name": "total", "class": "decimal" },
                { "name": "customer" }
            ],
            "expressionCompiler": "groovy"
        }))
        .unwrap();

        assert_eq!(report.rows_per_page, 40);
        assert_eq!(report.query_language(), None);
        assert_eq!(report.parameter("total").unwrap().value_type, ValueType::Decimal);
        assert_eq!(report.parameter("customer").unwrap().value_type, ValueType::default());
    }

    #[test]
    fn blank_query_language_counts_as_none() {
        let mut report: CompiledReport = serde_json::from_value(json!({
            "name": "cover",
            "query": { "language": "  " },
            "expressionCompiler": "groovy"
        }))
        .unwrap();
        assert_eq!(report.query_language(), None);

        report.query = Some(ReportQuery { language: "xPath".into(), text: String::new() });
        assert_eq!(report.query_language(), Some(QueryLanguage::XPath));
    }
}
