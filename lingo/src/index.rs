/// Maps byte offsets in a document to 1-based line numbers.
///
/// Built once per document by recording the offset of every `\n` byte.
/// `line_number(o)` is one more than the position of the first newline
/// strictly after `o`, so an offset sitting on a `\n` byte already counts
/// that newline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &[u8]) -> Self {
        let newlines = source
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == b'\n')
            .map(|(offset, _)| offset)
            .collect();
        LineIndex { newlines }
    }

    /// The line containing `offset`. Offsets past the last newline map to the
    /// final line; offsets past the end of the document are not rejected.
    pub fn line_number(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&nl| nl <= offset) + 1
    }
}
