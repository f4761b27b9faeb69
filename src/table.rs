use std::{collections::BTreeMap, fmt};

use itertools::Itertools;
use log::{debug, trace};

use crate::{frequency::FrequencyMap, tree::HuffmanTree};

/// Root-to-leaf path of a symbol, one `0` (left) or `1` (right) per step.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Code(Vec<u8>);

impl Code {
    pub fn bits(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(""))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    /// Collects the path of every leaf. A tree that is a single leaf gets the
    /// one-bit code `0`.
    pub fn from_tree(tree: &HuffmanTree) -> CodeTable {
        let mut codes = BTreeMap::new();
        match tree {
            HuffmanTree::Leaf(_, symbol) => {
                codes.insert(*symbol, Code(vec![0]));
            }
            HuffmanTree::Node(..) => {
                let mut path = Vec::with_capacity(tree.depth());
                Self::traverse(tree, &mut path, &mut codes);
            }
        }
        debug!("generated {} codes", codes.len());
        CodeTable { codes }
    }

    fn traverse(node: &HuffmanTree, path: &mut Vec<u8>, codes: &mut BTreeMap<u8, Code>) {
        match node {
            HuffmanTree::Leaf(_, symbol) => {
                trace!("code for {:#04x}: {}", symbol, path.iter().join(""));
                codes.insert(*symbol, Code(path.clone()));
            }
            HuffmanTree::Node(_, left, right) => {
                path.push(0);
                Self::traverse(left, path, codes);
                path.pop();

                path.push(1);
                Self::traverse(right, path, codes);
                path.pop();
            }
        }
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codes ordered by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> {
        self.codes.iter().map(|(symbol, code)| (*symbol, code))
    }

    /// True when no code is a prefix of another one.
    pub fn is_prefix_free(&self) -> bool {
        self.codes
            .values()
            .tuple_combinations()
            .all(|(a, b)| !a.is_prefix_of(b) && !b.is_prefix_of(a))
    }

    /// Number of bits needed to encode a stream with the given counts, or
    /// `None` if some counted symbol has no code.
    pub fn encoded_len(&self, counts: &FrequencyMap) -> Option<usize> {
        counts
            .sorted()
            .into_iter()
            .map(|(symbol, count)| self.get(symbol).map(|code| code.len() * count))
            .sum()
    }
}
