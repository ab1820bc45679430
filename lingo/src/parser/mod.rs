pub mod error;
mod structural;

pub use error::ParseError;

use crate::document::Document;

/// Anything that can turn raw document bytes into a block tree.
pub trait MarkdownParser {
    fn parse(&self, source: &[u8]) -> Result<Document, ParseError>;
}

/// The default parser, backed by pulldown-cmark.
#[derive(Debug, Clone, Copy, Default)]
pub struct CmarkParser;

impl MarkdownParser for CmarkParser {
    fn parse(&self, source: &[u8]) -> Result<Document, ParseError> {
        let text = std::str::from_utf8(source).map_err(|e| {
            let at = e.valid_up_to();
            let end = at + e.error_len().unwrap_or(source.len() - at);
            ParseError::error("document is not valid UTF-8", at..end)
                .with_note(format!("first invalid byte at offset {}", at))
        })?;
        Ok(structural::parse_document(text))
    }
}
