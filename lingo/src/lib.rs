pub mod block;
pub mod config;
pub mod convert;
pub mod document;
pub mod emit;
pub mod error;
pub mod index;
pub mod parser;
pub mod target;

pub use config::{Config, ConfigError};
pub use convert::{Conversion, Converter, Extraction, Freshness};
pub use error::Error;
pub use index::LineIndex;
pub use parser::{CmarkParser, MarkdownParser, ParseError};
pub use target::Target;
