//! Extract and load adapters.
//!
//! Everything that touches files or the (synthetic) market-data API lives
//! here. The pipeline only sees the `Extractor` and `Loader` traits.

pub mod csv_source;
pub mod extract;
pub mod json_source;
pub mod loader;
pub mod synthetic;
pub mod timestamp;

pub use csv_source::CsvExtractor;
pub use extract::{Extractor, SourceType};
pub use json_source::JsonExtractor;
pub use loader::{FileLoader, Loader, OutputFormat};
pub use synthetic::SyntheticApiExtractor;
