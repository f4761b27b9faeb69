use std::{cmp::Ordering, collections::BinaryHeap};

use log::{debug, trace};

use crate::{
    error::{HuffmanError, Result},
    frequency::FrequencyMap,
};

/// A Huffman code tree. `Node` owns both subtrees; weights are frequency sums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanTree {
    Node(usize, Box<HuffmanTree>, Box<HuffmanTree>),
    Leaf(usize, u8),
}

impl HuffmanTree {
    /// Builds the tree by repeatedly merging the two lightest trees.
    ///
    /// Ties on weight go to the tree inserted first. Leaves are inserted by
    /// ascending symbol, merged nodes get the next insertion number, and the
    /// first tree polled becomes the left child. A map with a single symbol
    /// yields a bare `Leaf`.
    pub fn create(counts: &FrequencyMap) -> Result<HuffmanTree> {
        if counts.is_empty() {
            return Err(HuffmanError::InvalidInput(
                "cannot build a tree from an empty frequency map".into(),
            ));
        }

        let mut heap = BinaryHeap::new();
        let mut sequence = 0;
        for (symbol, count) in counts.sorted() {
            if count == 0 {
                return Err(HuffmanError::InvalidInput(format!(
                    "symbol {:#04x} has a zero count",
                    symbol
                )));
            }
            heap.push(QueueEntry::new(HuffmanTree::Leaf(count, symbol), sequence));
            sequence += 1;
        }

        loop {
            let left = heap
                .pop()
                .ok_or_else(|| HuffmanError::InvalidInput("empty priority queue".into()))?;
            let right = match heap.pop() {
                Some(right) => right,
                None => {
                    debug!(
                        "built tree of weight {} and depth {}",
                        left.tree.weight(),
                        left.tree.depth()
                    );
                    return Ok(left.tree);
                }
            };
            trace!(
                "merging weights {} and {} as #{}",
                left.weight,
                right.weight,
                sequence
            );
            heap.push(QueueEntry::new(
                HuffmanTree::merge(left.tree, right.tree),
                sequence,
            ));
            sequence += 1;
        }
    }

    fn merge(left: HuffmanTree, right: HuffmanTree) -> HuffmanTree {
        HuffmanTree::Node(left.weight() + right.weight(), Box::new(left), Box::new(right))
    }

    pub fn weight(&self) -> usize {
        match self {
            HuffmanTree::Leaf(count, _) => *count,
            HuffmanTree::Node(count, _, _) => *count,
        }
    }

    pub fn symbol(&self) -> Option<u8> {
        match self {
            HuffmanTree::Leaf(_, symbol) => Some(*symbol),
            HuffmanTree::Node(..) => None,
        }
    }

    /// Child selected by `bit`: 0 is left, anything else right. `None` on a leaf.
    pub fn child(&self, bit: u8) -> Option<&HuffmanTree> {
        match self {
            HuffmanTree::Leaf(..) => None,
            HuffmanTree::Node(_, left, _) if bit == 0 => Some(left.as_ref()),
            HuffmanTree::Node(_, _, right) => Some(right.as_ref()),
        }
    }

    /// Length of the longest root-to-leaf path. A bare leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            HuffmanTree::Leaf(..) => 0,
            HuffmanTree::Node(_, left, right) => 1 + left.depth().max(right.depth()),
        }
    }

    /// `(symbol, weight)` of every leaf, left to right.
    pub fn leaves(&self) -> Vec<(u8, usize)> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves(&self, leaves: &mut Vec<(u8, usize)>) {
        match self {
            HuffmanTree::Leaf(count, symbol) => leaves.push((*symbol, *count)),
            HuffmanTree::Node(_, left, right) => {
                left.collect_leaves(leaves);
                right.collect_leaves(leaves);
            }
        }
    }
}

/// Entry of the build queue. `BinaryHeap` is a max-heap, so the ordering is
/// reversed: lighter and older entries compare greater.
#[derive(Debug)]
struct QueueEntry {
    weight: usize,
    sequence: usize,
    tree: HuffmanTree,
}

impl QueueEntry {
    fn new(tree: HuffmanTree, sequence: usize) -> Self {
        QueueEntry {
            weight: tree.weight(),
            sequence,
            tree,
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.weight, other.sequence).cmp(&(self.weight, self.sequence))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::HuffmanTree::{self, Leaf, Node};
    use crate::{count_frequencies, FrequencyMap, HuffmanError};

    fn tree_of(text: &str) -> HuffmanTree {
        let counts = count_frequencies(text.as_bytes()).unwrap();
        HuffmanTree::create(&counts).unwrap()
    }

    fn assert_weights_add_up(tree: &HuffmanTree) {
        if let Node(weight, left, right) = tree {
            assert_eq!(*weight, left.weight() + right.weight());
            assert_weights_add_up(left);
            assert_weights_add_up(right);
        }
    }

    #[test]
    fn test_create_huffman_tree() {
        let tree = tree_of("abacba");
        assert_eq!(
            tree,
            Node(
                6,
                Box::new(Leaf(3, b'a')),
                Box::new(Node(3, Box::new(Leaf(1, b'c')), Box::new(Leaf(2, b'b'))))
            )
        );
    }

    #[test]
    fn abracadabra_breaks_ties_by_insertion_order() {
        let tree = tree_of("abracadabra");
        assert_eq!(
            tree,
            Node(
                11,
                Box::new(Leaf(5, b'a')),
                Box::new(Node(
                    6,
                    Box::new(Node(2, Box::new(Leaf(1, b'c')), Box::new(Leaf(1, b'd')))),
                    Box::new(Node(4, Box::new(Leaf(2, b'b')), Box::new(Leaf(2, b'r')))),
                ))
            )
        );
        assert_eq!(tree.depth(), 3);
    }

    #[rstest]
    #[case("a")]
    #[case("abracadabra")]
    #[case("the quick brown fox jumps over the lazy dog")]
    #[case("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaabbbbbbbbbbbbbbbbbbcccccccdddde")]
    fn weights_add_up_to_symbol_count(#[case] text: &str) {
        let tree = tree_of(text);
        assert_weights_add_up(&tree);
        assert_eq!(tree.weight(), text.len());
    }

    #[test]
    fn single_symbol_yields_a_leaf() {
        let tree = tree_of("aaaa");
        assert_eq!(tree, Leaf(4, b'a'));
        assert_eq!(tree.symbol(), Some(b'a'));
        assert_eq!(tree.depth(), 0);
        assert!(tree.child(0).is_none());
    }

    #[test]
    fn empty_map_is_rejected() {
        let result = HuffmanTree::create(&FrequencyMap::new());
        assert!(matches!(result, Err(HuffmanError::InvalidInput(_))));
    }

    #[test]
    fn zero_count_is_rejected() {
        let counts: FrequencyMap = vec![(b'a', 3), (b'b', 0)].into_iter().collect();
        let result = HuffmanTree::create(&counts);
        assert!(matches!(result, Err(HuffmanError::InvalidInput(_))));
    }

    #[test]
    fn same_counts_build_same_tree() {
        let first = tree_of("mississippi river");
        let second = tree_of("mississippi river");
        assert_eq!(first, second);
    }

    #[test]
    fn leaves_cover_every_symbol_once() {
        let tree = tree_of("hello, world");
        let mut leaves = tree.leaves();
        leaves.sort();
        let counts = count_frequencies("hello, world".as_bytes()).unwrap();
        assert_eq!(leaves, counts.sorted());
    }

    #[test]
    fn child_follows_bits() {
        let tree = tree_of("abacba");
        assert_eq!(tree.child(0), Some(&Leaf(3, b'a')));
        let right = tree.child(1).unwrap();
        assert_eq!(right.child(0), Some(&Leaf(1, b'c')));
        assert_eq!(right.child(1), Some(&Leaf(2, b'b')));
        assert_eq!(tree.symbol(), None);
    }
}
