use crate::block::SelectedBlock;
use crate::index::LineIndex;
use crate::target::Target;

/// Concatenate the selected blocks into one output unit.
///
/// Each block is preceded by its own directive naming the source line of its
/// first content line, then copied byte for byte. Consecutive blocks are not
/// merged even when their lines are contiguous. No blocks means no bytes.
pub fn emit(name: &str, index: &LineIndex, blocks: &[SelectedBlock<'_>], target: &Target) -> Vec<u8> {
    let mut output = Vec::new();
    for block in blocks {
        let line = index.line_number(block.first_offset());
        log::debug!("{}:{}: {} line(s) of {}", name, line, block.lines.len(), target.tag);

        output.extend_from_slice(target.directive(name, line).as_bytes());
        for content in &block.lines {
            output.extend_from_slice(content.bytes);
        }
    }
    output
}
