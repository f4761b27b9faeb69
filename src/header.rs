//! Frequency table written next to a compressed stream, so that the same
//! tree can be rebuilt when decompressing in another run.
//!
//! Layout, little endian: magic `HUF1`, file size (u64), number of entries
//! (u16), then per entry the symbol (u8) and its count (u64), ascending by
//! symbol.

use std::io::{self, ErrorKind, Read, Write};

use crate::{
    error::{HuffmanError, Result},
    frequency::FrequencyMap,
};

const MAGIC: &[u8; 4] = b"HUF1";

#[derive(Debug, PartialEq, Eq)]
pub struct Header {
    pub counts: FrequencyMap,
    pub filesize: usize,
}

impl Header {
    pub fn new(counts: FrequencyMap) -> Self {
        Header {
            filesize: counts.total(),
            counts,
        }
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_all(&(self.filesize as u64).to_le_bytes())?;

        let entries = self.counts.sorted();
        writer.write_all(&(entries.len() as u16).to_le_bytes())?;
        for (symbol, count) in entries {
            writer.write_all(&[symbol])?;
            writer.write_all(&(count as u64).to_le_bytes())?;
        }
        writer.flush()
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Header> {
        let mut magic = [0; 4];
        read_field(reader, &mut magic)?;
        if &magic != MAGIC {
            return Err(HuffmanError::corrupt("frequency table has a bad magic"));
        }

        let mut filesizebuf = [0; 8];
        read_field(reader, &mut filesizebuf)?;
        let filesize = to_usize(u64::from_le_bytes(filesizebuf))?;

        let mut sizebuf = [0; 2];
        read_field(reader, &mut sizebuf)?;
        let size = u16::from_le_bytes(sizebuf);
        if size == 0 || size > 256 {
            return Err(HuffmanError::corrupt(format!(
                "frequency table announces {} entries",
                size
            )));
        }

        let mut counts = FrequencyMap::new();
        let mut total: usize = 0;
        let mut buf = [0; 9];
        for _ in 0..size {
            read_field(reader, &mut buf)?;
            let symbol = buf[0];
            let count = to_usize(u64::from_le_bytes([
                buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7], buf[8],
            ]))?;
            if count == 0 || counts.get(symbol).is_some() {
                return Err(HuffmanError::corrupt(format!(
                    "invalid frequency table entry for {:#04x}",
                    symbol
                )));
            }
            total = total
                .checked_add(count)
                .ok_or_else(|| HuffmanError::corrupt("frequency table counts overflow"))?;
            counts.add_count(symbol, count);
        }

        if total != filesize {
            return Err(HuffmanError::corrupt(format!(
                "frequency table sums to {} symbols, header says {}",
                total, filesize
            )));
        }
        Ok(Header { counts, filesize })
    }
}

fn to_usize(value: u64) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| HuffmanError::corrupt(format!("count {} does not fit in memory", value)))
}

fn read_field<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => HuffmanError::corrupt("frequency table is cut short"),
        _ => HuffmanError::Io(e),
    })
}
