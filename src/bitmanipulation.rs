//! Bit level adapters over byte streams.
//!
//! Bits are packed least significant first: the first bit of a byte is
//! `byte & 0x01`, the eighth is `byte >> 7`. The last data byte is padded
//! with zeros and followed by a trailer byte holding how many of its bits
//! are valid (1 to 8). A stream without any bit is the lone trailer `0x00`.

use std::collections::VecDeque;
use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};

use crate::error::{HuffmanError, Result};

pub struct BitReader<R: Read> {
    index: u8,
    limit: u8,
    current: u8,
    lookahead: VecDeque<u8>,
    finished: bool,
    source: BufReader<R>,
}

impl<R: Read> BitReader<R> {
    pub fn new(source: R) -> Self {
        BitReader {
            index: 0,
            limit: 0,
            current: 0,
            lookahead: VecDeque::with_capacity(3),
            finished: false,
            source: BufReader::new(source),
        }
    }

    /// Next bit (0 or 1), or `None` once every written bit has been read.
    pub fn read(&mut self) -> Result<Option<u8>> {
        if self.index >= self.limit && !self.load()? {
            return Ok(None);
        }
        let val = (self.current >> self.index) & 0x01;
        self.index += 1;
        Ok(Some(val))
    }

    fn load(&mut self) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        // A data byte is the last one when exactly one byte, the trailer, follows it.
        self.fill(3)?;
        match self.lookahead.len() {
            0 => Err(HuffmanError::corrupt("bit stream has no trailer byte")),
            1 => {
                self.finished = true;
                match self.lookahead.pop_front() {
                    Some(0) => Ok(false),
                    Some(trailer) => Err(HuffmanError::corrupt(format!(
                        "trailer announces {} bits but no data byte precedes it",
                        trailer
                    ))),
                    None => Ok(false),
                }
            }
            2 => {
                let (data, trailer) = (self.lookahead[0], self.lookahead[1]);
                self.lookahead.clear();
                self.finished = true;
                if !(1..=8).contains(&trailer) {
                    return Err(HuffmanError::corrupt(format!(
                        "invalid trailer value {}, expected 1 to 8",
                        trailer
                    )));
                }
                self.start_byte(data, trailer);
                Ok(true)
            }
            _ => {
                let data = self.lookahead.pop_front().unwrap_or_default();
                self.start_byte(data, 8);
                Ok(true)
            }
        }
    }

    fn start_byte(&mut self, data: u8, limit: u8) {
        self.current = data;
        self.limit = limit;
        self.index = 0;
    }

    fn fill(&mut self, wanted: usize) -> io::Result<()> {
        let mut buf = [0];
        while self.lookahead.len() < wanted {
            match self.source.read(&mut buf) {
                Ok(0) => break,
                Ok(_) => self.lookahead.push_back(buf[0]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

pub struct BitWriter<W: Write> {
    index: u8,
    current: u8,
    bits_written: usize,
    sink: BufWriter<W>,
}

impl<W: Write> BitWriter<W> {
    pub fn new(sink: W) -> Self {
        BitWriter {
            index: 0,
            current: 0,
            bits_written: 0,
            sink: BufWriter::new(sink),
        }
    }

    /// Appends one bit; any non-zero value is written as 1.
    pub fn write_bit(&mut self, bit: u8) -> io::Result<()> {
        if bit != 0 {
            self.current |= 1 << self.index;
        }
        self.index += 1;
        self.bits_written += 1;
        if self.index == 8 {
            self.sink.write_all(&[self.current])?;
            self.current = 0;
            self.index = 0;
        }
        Ok(())
    }

    pub fn write(&mut self, bits: &[u8]) -> io::Result<()> {
        for bit in bits {
            self.write_bit(*bit)?;
        }
        Ok(())
    }

    pub fn bits_written(&self) -> usize {
        self.bits_written
    }

    /// Writes the padded partial byte and the trailer, flushes, and hands
    /// back the underlying sink.
    pub fn finish(mut self) -> io::Result<W> {
        let trailer = match (self.bits_written, self.index) {
            (0, _) => 0,
            (_, 0) => 8,
            (_, index) => {
                self.sink.write_all(&[self.current])?;
                index
            }
        };
        self.sink.write_all(&[trailer])?;
        self.sink.into_inner().map_err(|e| e.into_error())
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::{BitReader, BitWriter};
    use crate::HuffmanError;

    fn read_all(bytes: &[u8]) -> Result<Vec<u8>, HuffmanError> {
        let mut reader = BitReader::new(bytes);
        let mut bits = Vec::new();
        while let Some(bit) = reader.read()? {
            bits.push(bit);
        }
        Ok(bits)
    }

    fn write_all(bits: &[u8]) -> Vec<u8> {
        let mut writer = BitWriter::new(Vec::new());
        writer.write(bits).unwrap();
        writer.finish().unwrap()
    }

    #[test]
    fn can_read_from_one_byte() {
        let s: [u8; 2] = [0b10101101, 8];
        let mut reader = BitReader::new(&s[..]);

        assert_eq!(reader.read().unwrap(), Some(0x01));
        assert_eq!(reader.read().unwrap(), Some(0x00));
        assert_eq!(reader.read().unwrap(), Some(0x01));
        assert_eq!(reader.read().unwrap(), Some(0x01));
        assert_eq!(reader.read().unwrap(), Some(0x00));
        assert_eq!(reader.read().unwrap(), Some(0x01));
        assert_eq!(reader.read().unwrap(), Some(0x00));
        assert_eq!(reader.read().unwrap(), Some(0x01));
        assert_eq!(reader.read().unwrap(), None);
    }

    #[test]
    fn can_read_from_more_bytes() {
        let s: [u8; 3] = [0b10101101, 0b10101010, 8];
        let mut reader = BitReader::new(&s[..]);

        // read first byte
        for _ in 0..8 {
            reader.read().unwrap();
        }

        assert_eq!(reader.read().unwrap(), Some(0x00));
        assert_eq!(reader.read().unwrap(), Some(0x01));
        assert_eq!(reader.read().unwrap(), Some(0x00));
        assert_eq!(reader.read().unwrap(), Some(0x01));
        assert_eq!(reader.read().unwrap(), Some(0x00));
        assert_eq!(reader.read().unwrap(), Some(0x01));
        assert_eq!(reader.read().unwrap(), Some(0x00));
        assert_eq!(reader.read().unwrap(), Some(0x01));
        assert_eq!(reader.read().unwrap(), None);
    }

    #[test]
    fn stops_at_trailer_count() {
        let bits = read_all(&[0b1111_0101, 3]).unwrap();
        assert_eq!(bits, vec![1, 0, 1]);
    }

    #[test]
    fn read_empty() {
        assert_eq!(read_all(&[0x00]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn missing_trailer_is_corrupt() {
        assert!(matches!(read_all(&[]), Err(HuffmanError::CorruptStream(_))));
        assert!(matches!(read_all(&[0x05]), Err(HuffmanError::CorruptStream(_))));
    }

    #[test]
    fn bad_trailer_is_corrupt() {
        assert!(matches!(
            read_all(&[0xff, 0]),
            Err(HuffmanError::CorruptStream(_))
        ));
        assert!(matches!(
            read_all(&[0xff, 9]),
            Err(HuffmanError::CorruptStream(_))
        ));
    }

    #[test]
    fn writes_lsb_first_with_zero_padding() {
        assert_eq!(write_all(&[1, 0, 1]), vec![0b0000_0101, 3]);
        assert_eq!(
            write_all(&[1, 0, 1, 1, 0, 1, 0, 1, 1]),
            vec![0b1010_1101, 0b0000_0001, 1]
        );
    }

    #[test]
    fn full_byte_gets_trailer_eight() {
        assert_eq!(write_all(&[0, 0, 0, 0, 0, 0, 0, 1]), vec![0b1000_0000, 8]);
    }

    #[test]
    fn no_bits_is_lone_trailer() {
        assert_eq!(write_all(&[]), vec![0x00]);
    }

    #[test]
    fn reader_returns_exactly_written_bits() {
        let bits: Vec<u8> = (0..29).map(|i| ((i * 7) % 3 == 0) as u8).collect();
        let bytes = write_all(&bits);
        assert_eq!(bytes.len(), 5);
        assert_eq!(read_all(&bytes).unwrap(), bits);
    }

    #[test]
    fn counts_written_bits() {
        let mut writer = BitWriter::new(io::sink());
        writer.write(&[1, 1, 0]).unwrap();
        writer.write_bit(1).unwrap();
        assert_eq!(writer.bits_written(), 4);
    }
}
