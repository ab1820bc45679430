use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser as CmarkParser, Tag};

use crate::document::{CodeBlock, Document, Node, NodeKind};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse Markdown source text into its block tree.
pub fn parse_document(source: &str) -> Document {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;
    let parser = CmarkParser::new_ext(source, options);

    let mut state = TreeBuilder::new(source.as_bytes());
    for (event, range) in parser.into_offset_iter() {
        state.process_event(event, range);
    }
    state.finalize()
}

// ---------------------------------------------------------------------------
// Tree building
// ---------------------------------------------------------------------------

struct TreeBuilder<'a> {
    source: &'a [u8],
    /// Nodes whose end tag has not been seen yet. Innermost = last.
    open: Vec<Node>,
    /// One entry per start tag: whether it opened a node (inline tags don't).
    opened: Vec<bool>,
    /// Completed top-level nodes.
    top_nodes: Vec<Node>,
    /// Raw text ranges of the code block currently open.
    code_text: Vec<Range<usize>>,
}

impl<'a> TreeBuilder<'a> {
    fn new(source: &'a [u8]) -> Self {
        TreeBuilder {
            source,
            open: Vec::new(),
            opened: Vec::new(),
            top_nodes: Vec::new(),
            code_text: Vec::new(),
        }
    }

    fn process_event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => match block_kind(&tag) {
                Some(kind) => {
                    self.open.push(Node {
                        kind,
                        span: range,
                        children: Vec::new(),
                    });
                    self.opened.push(true);
                }
                None => self.opened.push(false),
            },

            Event::End(_) => {
                if self.opened.pop() == Some(true) {
                    self.close_node();
                }
            }

            Event::Text(text) if self.in_code_block() => self.push_code_text(&text, range),

            Event::Rule => self.attach(Node {
                kind: NodeKind::Rule,
                span: range,
                children: Vec::new(),
            }),

            _ => {}
        }
    }

    fn in_code_block(&self) -> bool {
        matches!(
            self.open.last(),
            Some(Node {
                kind: NodeKind::CodeBlock(_),
                ..
            })
        )
    }

    fn push_code_text(&mut self, text: &str, range: Range<usize>) {
        let synthetic = self.source.get(range.clone()) != Some(text.as_bytes());
        if synthetic && !text.is_empty() && text.bytes().all(|b| b == b' ') {
            // Padding for the columns of a tab that a container prefix only
            // partly consumed. The tab itself stands in for it.
            if let Some(tab) = partial_tab(self.source, range.start) {
                self.code_text.push(tab..tab + 1);
            }
            return;
        }
        self.code_text.push(range);
    }

    fn close_node(&mut self) {
        let Some(mut node) = self.open.pop() else {
            return;
        };
        if let NodeKind::CodeBlock(code) = &mut node.kind {
            let text = std::mem::take(&mut self.code_text);
            code.lines = content_lines(self.source, &text);
        }
        self.attach(node);
    }

    fn attach(&mut self, node: Node) {
        if let Some(parent) = self.open.last_mut() {
            parent.children.push(node);
        } else {
            self.top_nodes.push(node);
        }
    }

    fn finalize(mut self) -> Document {
        // pulldown-cmark balances its tags; this only matters for a
        // truncated event stream.
        while !self.open.is_empty() {
            self.close_node();
        }
        Document::new(self.top_nodes, self.source.len())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn block_kind(tag: &Tag<'_>) -> Option<NodeKind> {
    let kind = match tag {
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Heading { level, .. } => NodeKind::Heading(heading_level_to_u8(level)),
        Tag::BlockQuote(_) => NodeKind::BlockQuote,
        Tag::CodeBlock(kind) => NodeKind::CodeBlock(CodeBlock {
            info: match kind {
                CodeBlockKind::Fenced(info) => Some(info.to_string()),
                CodeBlockKind::Indented => None,
            },
            lines: Vec::new(),
        }),
        Tag::HtmlBlock => NodeKind::HtmlBlock,
        Tag::List(start) => NodeKind::List {
            ordered: start.is_some(),
        },
        Tag::Item => NodeKind::Item,
        Tag::Table(_) => NodeKind::Table,
        Tag::TableHead => NodeKind::TableHead,
        Tag::TableRow => NodeKind::TableRow,
        Tag::TableCell => NodeKind::TableCell,
        Tag::FootnoteDefinition(_) | Tag::MetadataBlock(_) => NodeKind::Other,
        _ => return None,
    };
    Some(kind)
}

fn heading_level_to_u8(level: &HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// The tab next to `at` whose remaining columns were synthesized as spaces.
fn partial_tab(source: &[u8], at: usize) -> Option<usize> {
    if at > 0 && source.get(at - 1) == Some(&b'\t') {
        Some(at - 1)
    } else if source.get(at) == Some(&b'\t') {
        Some(at)
    } else {
        None
    }
}

/// Recover per-line source ranges from a code block's text events.
///
/// pulldown-cmark merges adjacent text and drops the `\r` of a CRLF pair, so
/// event boundaries don't line up with source lines. Ranges are joined when
/// the gap between them holds nothing but line terminator bytes, and then
/// split after each `\n`. Container prefixes such as list indentation or `> `
/// stay excluded because they fall in gaps that hold other bytes. A tab they
/// only partly consume arrives as its own one-byte range and stays in.
fn content_lines(source: &[u8], text: &[Range<usize>]) -> Vec<Range<usize>> {
    let mut merged: Vec<Range<usize>> = Vec::new();
    for span in text.iter().filter(|span| !span.is_empty()) {
        if let Some(last) = merged.last_mut() {
            let joinable = span.start >= last.end
                && source[last.end..span.start]
                    .iter()
                    .all(|&b| matches!(b, b'\r' | b'\n'));
            if joinable {
                last.end = span.end;
                continue;
            }
        }
        merged.push(span.clone());
    }

    let mut lines = Vec::new();
    for span in merged {
        let mut start = span.start;
        for (offset, byte) in source[span.clone()].iter().enumerate() {
            if *byte == b'\n' {
                let end = span.start + offset + 1;
                lines.push(start..end);
                start = end;
            }
        }
        if start < span.end {
            lines.push(start..span.end);
        }
    }
    lines
}
