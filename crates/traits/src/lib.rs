pub mod compiler;
pub mod connection;
pub mod exporter;
pub mod translator;

pub use compiler::{CompileError, CompilerSettings, ReportCompiler};
pub use connection::{Connection, ConnectionError, ConnectionProvider};
pub use exporter::{Exporter, ExporterError};
pub use translator::{
    InMemoryTranslator, InMemoryTranslatorFactory, SharedTranslator, Translator, TranslatorFactory,
};
