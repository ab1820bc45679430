use std::ops::Range;

use crate::document::{Document, WalkStatus};

/// A fenced code block chosen for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedBlock<'a> {
    /// Byte span of the whole block, fences included.
    pub span: Range<usize>,
    /// Content lines in order, borrowed verbatim from the document.
    pub lines: Vec<Line<'a>>,
}

/// One content line: where it starts in the document and its raw bytes,
/// terminator included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub start: usize,
    pub bytes: &'a [u8],
}

impl<'a> SelectedBlock<'a> {
    /// Offset of the first content line. Selected blocks are never empty.
    pub fn first_offset(&self) -> usize {
        self.lines.first().map_or(self.span.start, |line| line.start)
    }
}

/// Collect, in document order, every fenced block tagged exactly `language`
/// that has at least one content line. Blocks nested in lists, block quotes
/// or other containers are included.
pub fn collect<'a>(document: &Document, source: &'a [u8], language: &str) -> Vec<SelectedBlock<'a>> {
    let mut selected = Vec::new();
    document.walk(&mut |node, entering| {
        if !entering {
            return WalkStatus::Continue;
        }
        let Some(code) = node.code_block() else {
            return WalkStatus::Continue;
        };
        if code.language() != Some(language) || code.lines.is_empty() {
            return WalkStatus::Continue;
        }

        let lines = code
            .lines
            .iter()
            .map(|range| Line {
                start: range.start,
                bytes: &source[range.clone()],
            })
            .collect();
        selected.push(SelectedBlock {
            span: node.span.clone(),
            lines,
        });
        WalkStatus::Continue
    });
    selected
}

/// Spans of fenced blocks tagged `language` that have no content lines.
/// These are skipped by [`collect`] and worth a warning.
pub fn empty_blocks(document: &Document, language: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    document.walk(&mut |node, entering| {
        if let (true, Some(code)) = (entering, node.code_block()) {
            if code.language() == Some(language) && code.lines.is_empty() {
                spans.push(node.span.clone());
            }
        }
        WalkStatus::Continue
    });
    spans
}
