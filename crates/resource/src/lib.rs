//! Localization bundles for the report pipeline.
//!
//! This crate provides the filesystem implementation of the
//! `TranslatorFactory` trait from quire-traits, reading `.properties`
//! bundles that sit next to the report template.
//!
//! ## Bundle resolution
//!
//! For a bundle path `reports/invoice` and locale `pt_BR` the factory reads,
//! from least to most specific, `invoice.properties`,
//! `invoice_pt.properties` and `invoice_pt_BR.properties`. Entries from more
//! specific files win. Lower-case file names (`invoice_pt_br.properties`)
//! are accepted as well.
//!
//! ## Re-exports
//!
//! For convenience, we also re-export the in-memory factory from quire-traits:
//! - [`InMemoryTranslatorFactory`]: Pre-populated in-memory tables

mod properties;
mod translator;

pub use properties::{parse_properties, write_properties};
pub use translator::{PropertiesTranslator, PropertiesTranslatorFactory};

// Re-export the in-memory factory from quire-traits for convenience
pub use quire_traits::InMemoryTranslatorFactory;
