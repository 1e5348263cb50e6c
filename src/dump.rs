use std::fmt::Write;
use std::num::NonZeroUsize;
use std::slice::Chunks;

pub const DEFAULT_BLOCK_SIZE: NonZeroUsize = NonZeroUsize::new(8).unwrap();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Hex,
    Binary,
}

impl Radix {
    fn write_byte(self, line: &mut String, byte: u8) {
        // Writing into a String cannot fail.
        let _ = match self {
            Radix::Hex => write!(line, "{byte:02x}"),
            Radix::Binary => write!(line, "{byte:08b}"),
        };
    }
}

/// Lines of a block dump, one per `block_size` bytes.
///
/// Cloning the iterator restarts from the same position.
#[derive(Debug, Clone)]
pub struct DumpBlocks<'a> {
    blocks: Chunks<'a, u8>,
    radix: Radix,
}

impl Iterator for DumpBlocks<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.blocks.next()?;
        let width = match self.radix {
            Radix::Hex => 3,
            Radix::Binary => 9,
        };

        let mut line = String::with_capacity(block.len() * width);
        for (i, &byte) in block.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            self.radix.write_byte(&mut line, byte);
        }
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.blocks.size_hint()
    }
}

impl ExactSizeIterator for DumpBlocks<'_> {}

pub fn dump_blocks(bytes: &[u8], block_size: NonZeroUsize, radix: Radix) -> DumpBlocks<'_> {
    DumpBlocks {
        blocks: bytes.chunks(block_size.get()),
        radix,
    }
}
