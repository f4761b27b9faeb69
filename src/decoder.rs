use std::io::{BufWriter, Read, Write};

use log::debug;

use crate::{
    bitmanipulation::BitReader,
    error::{HuffmanError, Result},
    tree::HuffmanTree,
};

pub struct HuffmanDecoder<'a> {
    tree: &'a HuffmanTree,
}

impl<'a> HuffmanDecoder<'a> {
    pub fn new(tree: &'a HuffmanTree) -> Self {
        HuffmanDecoder { tree }
    }

    /// Walks the tree from the root on every bit of `source`, writing a symbol
    /// to `sink` each time a leaf is reached. Returns the number of symbols
    /// written. The sink is flushed even when decoding fails.
    pub fn decode<R: Read, W: Write>(&self, source: R, sink: W) -> Result<usize> {
        let mut reader = BitReader::new(source);
        let mut writer = BufWriter::new(sink);

        let decoded = match self.tree {
            HuffmanTree::Leaf(_, symbol) => Self::repeat_symbol(*symbol, &mut reader, &mut writer),
            HuffmanTree::Node(..) => self.walk(&mut reader, &mut writer),
        };
        let flushed = writer.flush();

        let written = decoded?;
        flushed?;
        debug!("decoded {} symbols", written);
        Ok(written)
    }

    fn walk<R: Read, W: Write>(&self, reader: &mut BitReader<R>, writer: &mut W) -> Result<usize> {
        let mut current = self.tree;
        let mut consumed = 0;
        let mut written = 0;

        while let Some(bit) = reader.read()? {
            current = current
                .child(bit)
                .ok_or_else(|| HuffmanError::corrupt("walk moved below a leaf"))?;
            consumed += 1;

            if let HuffmanTree::Leaf(_, symbol) = current {
                writer.write_all(&[*symbol])?;
                written += 1;
                current = self.tree;
                consumed = 0;
            }
        }

        if consumed > 0 {
            return Err(HuffmanError::TruncatedInput { consumed });
        }
        Ok(written)
    }

    /// A tree made of one leaf encodes every occurrence as a single `0` bit.
    fn repeat_symbol<R: Read, W: Write>(
        symbol: u8,
        reader: &mut BitReader<R>,
        writer: &mut W,
    ) -> Result<usize> {
        let mut written = 0;
        while let Some(bit) = reader.read()? {
            if bit != 0 {
                return Err(HuffmanError::corrupt(format!(
                    "bit 1 at position {} but the tree has a single symbol",
                    written
                )));
            }
            writer.write_all(&[symbol])?;
            written += 1;
        }
        Ok(written)
    }
}
