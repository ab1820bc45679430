use std::ops::Range;

/// The block structure of a Markdown document.
///
/// This is the only view of a parsed document the extraction pipeline relies
/// on: node kinds, spans, enter/exit traversal, and the content lines of code
/// blocks. Any parser that can produce it can drive a conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Node,
}

impl Document {
    pub fn new(children: Vec<Node>, len: usize) -> Self {
        Document {
            root: Node {
                kind: NodeKind::Document,
                span: 0..len,
                children,
            },
        }
    }

    pub fn walk<F>(&self, visit: &mut F) -> WalkStatus
    where
        F: FnMut(&Node, bool) -> WalkStatus,
    {
        self.root.walk(visit)
    }
}

/// A block-level node. Inline markup is not represented.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Byte span of the whole construct in the source, fences included.
    pub span: Range<usize>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document,
    Paragraph,
    Heading(u8),
    BlockQuote,
    List { ordered: bool },
    Item,
    Table,
    TableHead,
    TableRow,
    TableCell,
    CodeBlock(CodeBlock),
    HtmlBlock,
    Rule,
    /// Footnotes, definition lists, metadata and anything else block-level.
    Other,
}

/// A code block and the byte ranges of its content lines.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    /// Fence info string; `None` for indented blocks.
    pub info: Option<String>,
    /// One range per content line, each including its line terminator when
    /// the source has one. Fence lines are never included.
    pub lines: Vec<Range<usize>>,
}

impl CodeBlock {
    pub fn is_fenced(&self) -> bool {
        self.info.is_some()
    }

    /// The declared language: the first word of the info string, or `""` for
    /// an untagged fence.
    pub fn language(&self) -> Option<&str> {
        self.info
            .as_deref()
            .map(|info| info.split_whitespace().next().unwrap_or(""))
    }
}

/// Returned by a walk callback to steer the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    Continue,
    /// Do not descend into this node; only meaningful when entering.
    SkipChildren,
    Stop,
}

impl Node {
    pub fn code_block(&self) -> Option<&CodeBlock> {
        match &self.kind {
            NodeKind::CodeBlock(code) => Some(code),
            _ => None,
        }
    }

    /// Pre-order traversal calling `visit(node, true)` on the way in and
    /// `visit(node, false)` on the way out.
    pub fn walk<F>(&self, visit: &mut F) -> WalkStatus
    where
        F: FnMut(&Node, bool) -> WalkStatus,
    {
        match visit(self, true) {
            WalkStatus::Stop => return WalkStatus::Stop,
            WalkStatus::SkipChildren => return WalkStatus::Continue,
            WalkStatus::Continue => {}
        }

        for child in &self.children {
            if child.walk(visit) == WalkStatus::Stop {
                return WalkStatus::Stop;
            }
        }

        match visit(self, false) {
            WalkStatus::Stop => WalkStatus::Stop,
            _ => WalkStatus::Continue,
        }
    }
}
