//! Hierarchical-file data source.
//!
//! Records are the elements matched by an absolute record path such as
//! `/data/record`. A record's fields are its child elements and attributes,
//! plus any declared field whose name is a relative path into the record
//! (`customer/name`, `@id`).

use crate::patterns::{DatePattern, NumberPattern};
use crate::{DataSource, SourceError};
use log::debug;
use quire_types::{FieldKind, FieldSpec, Locale, Record};
use roxmltree::Node;
use serde_json::{Number, Value};
use std::path::Path;

/// Options controlling how records are located and field text is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlSourceOptions {
    pub record_path: String,
    pub date_pattern: String,
    pub number_pattern: String,
    pub locale: Locale,
}

impl Default for XmlSourceOptions {
    fn default() -> Self {
        Self {
            record_path: "/data/record".to_string(),
            date_pattern: "yyyy-MM-dd HH:mm:ss".to_string(),
            number_pattern: "#######0.##".to_string(),
            locale: Locale::english(),
        }
    }
}

#[derive(Debug)]
pub struct XmlDataSource {
    records: std::vec::IntoIter<Record>,
    len: usize,
}

impl XmlDataSource {
    pub fn open(
        path: impl AsRef<Path>,
        options: &XmlSourceOptions,
        fields: &[FieldSpec],
    ) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Self::parse(&text, options, fields)?;
        debug!("Read {} records from '{}'.", source.len, path.display());
        Ok(source)
    }

    pub fn parse(
        text: &str,
        options: &XmlSourceOptions,
        fields: &[FieldSpec],
    ) -> Result<Self, SourceError> {
        let segments: Vec<&str> = match options.record_path.strip_prefix('/') {
            Some(rest) => rest.split('/').filter(|s| !s.is_empty()).collect(),
            None => return Err(SourceError::RecordPath(options.record_path.clone())),
        };
        let Some((root_name, rest)) = segments.split_first() else {
            return Err(SourceError::RecordPath(options.record_path.clone()));
        };

        let document = roxmltree::Document::parse(text)?;
        let root = document.root_element();
        let mut matched = Vec::new();
        if root.tag_name().name() == *root_name {
            matched.push(root);
            for segment in rest {
                matched = matched
                    .iter()
                    .flat_map(|node| {
                        node.children()
                            .filter(move |c| c.is_element() && c.tag_name().name() == *segment)
                    })
                    .collect();
            }
        }

        let reader = FieldReader {
            dates: DatePattern::new(&options.date_pattern),
            numbers: NumberPattern::new(&options.number_pattern),
            locale: &options.locale,
        };
        let records = matched
            .into_iter()
            .map(|node| reader.record(node, fields))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            len: records.len(),
            records: records.into_iter(),
        })
    }
}

impl DataSource for XmlDataSource {
    fn next(&mut self) -> Option<Record> {
        self.records.next()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len)
    }
}

fn element_text(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Resolves a relative `a/b/@attr` path below `node`, first match wins.
fn resolve(node: Node<'_, '_>, path: &str) -> Option<String> {
    let mut current = node;
    let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();
    while let Some(segment) = segments.next() {
        if let Some(attribute) = segment.strip_prefix('@') {
            return if segments.peek().is_none() {
                current.attribute(attribute).map(str::to_string)
            } else {
                None
            };
        }
        current = current
            .children()
            .find(|c| c.is_element() && c.tag_name().name() == segment)?;
    }
    Some(element_text(current))
}

struct FieldReader<'o> {
    dates: DatePattern,
    numbers: NumberPattern,
    locale: &'o Locale,
}

impl FieldReader<'_> {
    fn record(&self, node: Node<'_, '_>, fields: &[FieldSpec]) -> Result<Record, SourceError> {
        let mut record = Record::new();
        for attribute in node.attributes() {
            record.insert(attribute.name().to_string(), Value::String(attribute.value().to_string()));
        }
        for child in node.children().filter(Node::is_element) {
            record
                .entry(child.tag_name().name().to_string())
                .or_insert_with(|| Value::String(element_text(child)));
        }

        for field in fields {
            let raw = match resolve(node, &field.name) {
                Some(raw) => raw,
                None => {
                    record.entry(field.name.clone()).or_insert(Value::Null);
                    continue;
                }
            };
            let value = self.convert(field, raw)?;
            record.insert(field.name.clone(), value);
        }
        Ok(record)
    }

    fn convert(&self, field: &FieldSpec, raw: String) -> Result<Value, SourceError> {
        if raw.is_empty() && field.kind != FieldKind::Text {
            return Ok(Value::Null);
        }
        match field.kind {
            FieldKind::Text => Ok(Value::String(raw)),
            FieldKind::Number => self
                .numbers
                .parse(&raw, self.locale)
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| SourceError::Pattern {
                    field: field.name.clone(),
                    value: raw.clone(),
                    pattern: self.numbers.as_str().to_string(),
                }),
            FieldKind::Date => self
                .dates
                .parse(&raw)
                .map(|dt| Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string()))
                .ok_or_else(|| SourceError::Pattern {
                    field: field.name.clone(),
                    value: raw.clone(),
                    pattern: self.dates.as_str().to_string(),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DATA: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<data>
  <record id="7">
    <name>Chair</name>
    <price>1,234.567</price>
    <date>2024-03-09 14:05:30</date>
    <customer><name>ACME</name></customer>
  </record>
  <record id="8">
    <name>Table</name>
    <price></price>
    <date>2024-03-10 08:00:00</date>
  </record>
  <other><name>ignored</name></other>
</data>"#;

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("price", FieldKind::Number),
            FieldSpec::new("date", FieldKind::Date),
            FieldSpec::new("customer/name", FieldKind::Text),
        ]
    }

    #[test]
    fn selects_records_by_path() {
        let mut source = XmlDataSource::parse(DATA, &XmlSourceOptions::default(), &[]).unwrap();
        assert_eq!(source.size_hint(), Some(2));

        let first = source.next().unwrap();
        assert_eq!(first.get("id"), Some(&json!("7")));
        assert_eq!(first.get("name"), Some(&json!("Chair")));
        assert_eq!(source.next().unwrap().get("name"), Some(&json!("Table")));
        assert!(source.next().is_none());
    }

    #[test]
    fn converts_declared_fields_with_patterns() {
        let mut source =
            XmlDataSource::parse(DATA, &XmlSourceOptions::default(), &fields()).unwrap();

        let first = source.next().unwrap();
        assert_eq!(first.get("price"), Some(&json!(1234.57)));
        assert_eq!(first.get("date"), Some(&json!("2024-03-09T14:05:30")));
        assert_eq!(first.get("customer/name"), Some(&json!("ACME")));

        let second = source.next().unwrap();
        assert_eq!(second.get("price"), Some(&Value::Null));
        assert_eq!(second.get("customer/name"), Some(&Value::Null));
    }

    #[test]
    fn pattern_mismatch_is_an_error() {
        let data = "<data><record><date>yesterday</date></record></data>";
        let result = XmlDataSource::parse(
            data,
            &XmlSourceOptions::default(),
            &[FieldSpec::new("date", FieldKind::Date)],
        );
        assert!(matches!(result, Err(SourceError::Pattern { .. })));
    }

    #[test]
    fn unmatched_root_yields_no_records() {
        let mut source =
            XmlDataSource::parse("<rows><record/></rows>", &XmlSourceOptions::default(), &[])
                .unwrap();
        assert!(source.next().is_none());
    }

    #[test]
    fn relative_record_path_is_rejected() {
        let options = XmlSourceOptions {
            record_path: "data/record".to_string(),
            ..XmlSourceOptions::default()
        };
        assert!(matches!(
            XmlDataSource::parse(DATA, &options, &[]),
            Err(SourceError::RecordPath(_))
        ));
    }

    #[test]
    fn malformed_document_is_an_error() {
        let result = XmlDataSource::parse("<data><record>", &XmlSourceOptions::default(), &[]);
        assert!(matches!(result, Err(SourceError::Xml(_))));
    }
}
