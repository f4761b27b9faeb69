use std::collections::HashMap;
use std::io::{BufReader, Read};

use itertools::Itertools;
use log::debug;

use crate::error::Result;

/// Occurrence count of every byte seen in a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyMap {
    counts: HashMap<u8, usize>,
}

impl FrequencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, symbol: u8) {
        self.add_count(symbol, 1);
    }

    pub fn add_count(&mut self, symbol: u8, count: usize) {
        *self.counts.entry(symbol).or_insert(0) += count;
    }

    pub fn get(&self, symbol: u8) -> Option<usize> {
        self.counts.get(&symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of symbols counted, i.e. the length of the source stream.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Entries ordered by ascending symbol value.
    pub fn sorted(&self) -> Vec<(u8, usize)> {
        self.counts
            .iter()
            .map(|(symbol, count)| (*symbol, *count))
            .sorted()
            .collect()
    }
}

impl FromIterator<(u8, usize)> for FrequencyMap {
    /// Repeated symbols have their counts summed.
    fn from_iter<I: IntoIterator<Item = (u8, usize)>>(iter: I) -> Self {
        let mut map = FrequencyMap::new();
        for (symbol, count) in iter {
            map.add_count(symbol, count);
        }
        map
    }
}

/// Reads `source` to exhaustion and counts every byte, whitespace and control
/// bytes included. The source is consumed and dropped when this returns.
pub fn count_frequencies<R: Read>(source: R) -> Result<FrequencyMap> {
    let mut counts = FrequencyMap::new();
    for byte in BufReader::new(source).bytes() {
        counts.add(byte?);
    }
    debug!(
        "counted {} symbols, {} distinct",
        counts.total(),
        counts.len()
    );
    Ok(counts)
}
