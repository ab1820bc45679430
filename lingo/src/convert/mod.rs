mod batch;

pub use batch::{convert_all, discover};

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::block::{self, SelectedBlock};
use crate::emit::emit;
use crate::error::Error;
use crate::index::LineIndex;
use crate::parser::{CmarkParser, MarkdownParser, ParseError};
use crate::target::Target;

/// Extracts one target language from literate documents.
#[derive(Debug, Clone)]
pub struct Converter<P = CmarkParser> {
    target: Target,
    parser: P,
}

/// The in-memory result of extracting one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Directives and code, ready to write. Empty when nothing matched.
    pub output: Vec<u8>,
    pub blocks: Vec<BlockInfo>,
    pub warnings: Vec<ParseError>,
}

/// Where an extracted block came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    /// Source line of the block's first content line.
    pub line: usize,
    /// Number of content lines.
    pub len: usize,
}

/// What [`Converter::convert`] did with one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub document: PathBuf,
    /// The file written, or `None` when the document had nothing to extract.
    pub output: Option<PathBuf>,
    pub blocks: usize,
    pub warnings: Vec<ParseError>,
}

/// How a document's output on disk compares with a fresh extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    UpToDate,
    /// The output exists but its bytes differ.
    Stale,
    /// The document has code to extract but no output exists.
    Missing,
    /// An output exists but the document no longer yields any code.
    Orphaned,
    /// Nothing to extract and no output on disk.
    Empty,
}

impl Freshness {
    pub fn is_ok(self) -> bool {
        matches!(self, Freshness::UpToDate | Freshness::Empty)
    }
}

impl Converter<CmarkParser> {
    pub fn new(target: Target) -> Result<Self, Error> {
        Converter::with_parser(target, CmarkParser)
    }
}

impl<P: MarkdownParser> Converter<P> {
    pub fn with_parser(target: Target, parser: P) -> Result<Self, Error> {
        target.validate()?;
        Ok(Converter { target, parser })
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Run the whole pipeline over `source` in memory. `name` is the name
    /// written into directives.
    pub fn extract(&self, name: &str, source: &[u8]) -> Result<Extraction, ParseError> {
        let index = LineIndex::new(source);
        let document = self.parser.parse(source)?;

        let blocks = block::collect(&document, source, &self.target.tag);
        let output = emit(name, &index, &blocks, &self.target);

        let warnings = block::empty_blocks(&document, &self.target.tag)
            .into_iter()
            .map(|span| {
                let line = index.line_number(span.start);
                log::warn!("{}:{}: empty `{}` block skipped", name, line, self.target.tag);
                ParseError::warning(format!("empty `{}` block skipped", self.target.tag), span)
            })
            .collect();

        Ok(Extraction {
            output,
            blocks: block_infos(&index, &blocks),
            warnings,
        })
    }

    /// Convert one document, writing `<document>.<extension>` next to it.
    ///
    /// The output is assembled in memory before anything is written, so a
    /// failure never leaves a partial file. A document with nothing to
    /// extract writes nothing.
    pub fn convert(&self, path: &Path) -> Result<Conversion, Error> {
        let extraction = self.read_and_extract(path)?;

        let output = if extraction.output.is_empty() {
            log::info!("{}: no `{}` blocks, skipped", path.display(), self.target.tag);
            None
        } else {
            let output_path = self.target.output_path(path);
            write_output(&output_path, &extraction.output).map_err(|source| Error::Write {
                path: output_path.clone(),
                source,
            })?;
            log::info!(
                "{}: wrote {} block(s) to {}",
                path.display(),
                extraction.blocks.len(),
                output_path.display()
            );
            Some(output_path)
        };

        Ok(Conversion {
            document: path.to_path_buf(),
            output,
            blocks: extraction.blocks.len(),
            warnings: extraction.warnings,
        })
    }

    /// Compare the output on disk with what [`convert`](Self::convert) would
    /// write, without writing anything.
    pub fn check(&self, path: &Path) -> Result<Freshness, Error> {
        let extraction = self.read_and_extract(path)?;
        let output_path = self.target.output_path(path);

        let existing = match fs::read(&output_path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(source) => {
                return Err(Error::Read {
                    path: output_path,
                    source,
                });
            }
        };

        let freshness = match (existing, extraction.output.is_empty()) {
            (None, true) => Freshness::Empty,
            (None, false) => Freshness::Missing,
            (Some(_), true) => Freshness::Orphaned,
            (Some(bytes), false) if bytes == extraction.output => Freshness::UpToDate,
            (Some(_), false) => Freshness::Stale,
        };
        log::debug!("{}: {:?}", path.display(), freshness);
        Ok(freshness)
    }

    /// Read a document and extract it, naming it by its file name.
    pub fn read_and_extract(&self, path: &Path) -> Result<Extraction, Error> {
        let source = fs::read(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let name = directive_name(path);
        self.extract(&name, &source).map_err(|error| Error::Parse {
            path: path.to_path_buf(),
            text: String::from_utf8_lossy(&source).into_owned(),
            error,
        })
    }
}

/// Directives name the document by file name: outputs sit next to their
/// documents, and toolchains resolve relative directive paths from there.
fn directive_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

fn block_infos(index: &LineIndex, blocks: &[SelectedBlock<'_>]) -> Vec<BlockInfo> {
    blocks
        .iter()
        .map(|block| BlockInfo {
            line: index.line_number(block.first_offset()),
            len: block.lines.len(),
        })
        .collect()
}

/// Replace `path` with `bytes` through a sibling temporary file, so a write
/// that fails part way leaves the previous output (or none) in place. The
/// file is readable and writable by the owner only.
fn write_output(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
