use std::io::{BufReader, Read, Write};

use log::debug;

use crate::{
    bitmanipulation::BitWriter,
    error::{HuffmanError, Result},
    table::CodeTable,
    tree::HuffmanTree,
};

pub struct HuffmanEncoder {
    table: CodeTable,
}

impl HuffmanEncoder {
    pub fn new(tree: &HuffmanTree) -> Self {
        HuffmanEncoder {
            table: CodeTable::from_tree(tree),
        }
    }

    pub fn table(&self) -> &CodeTable {
        &self.table
    }

    /// Writes the code of every byte of `source`, in order and without
    /// separators, and returns the number of bits written. The bit sink is
    /// finished even when encoding fails; the encoding error is reported first.
    pub fn encode<R: Read, W: Write>(&self, source: R, sink: W) -> Result<usize> {
        let mut writer = BitWriter::new(sink);
        let written = self.write_symbols(source, &mut writer);
        let finished = writer.finish();

        let bits = written?;
        finished?;
        debug!("encoded {} bits", bits);
        Ok(bits)
    }

    fn write_symbols<R: Read, W: Write>(
        &self,
        source: R,
        writer: &mut BitWriter<W>,
    ) -> Result<usize> {
        for byte in BufReader::new(source).bytes() {
            let symbol = byte?;
            let code = self
                .table
                .get(symbol)
                .ok_or(HuffmanError::LookupFailure { symbol })?;
            writer.write(code.bits())?;
        }
        Ok(writer.bits_written())
    }
}
