//! Huffman tree construction and code-table generation.
//!
//! Leaves are created for every byte with a nonzero count and queued by
//! frequency. While queued, nodes live in an arena and the heap only holds
//! their handles; merging takes both children out of the arena and boxes
//! them under the new internal node, so the finished tree owns every node
//! through plain `Box` links.
//!
//! Codes are whatever the tree walk yields (left = 0, right = 1); they are
//! not normalized into canonical form.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::frequency::FrequencyTable;
use crate::pqueue::MinHeap;
use crate::{PzError, PzResult, ALPHABET_SIZE};

/// Longest code a [`CodeEntry`] can hold.
pub const MAX_CODE_LEN: usize = 64;

/// A node in the Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
        frequency: u64,
    },
    Internal {
        frequency: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn frequency(&self) -> u64 {
        match self {
            Node::Leaf { frequency, .. } | Node::Internal { frequency, .. } => *frequency,
        }
    }

    /// Join two nodes under a new internal node.
    ///
    /// The lower-frequency node goes left; on a tie `a` does.
    fn merge(a: Node, b: Node) -> Node {
        let (left, right) = if a.frequency() <= b.frequency() {
            (a, b)
        } else {
            (b, a)
        };
        Node::Internal {
            frequency: left.frequency() + right.frequency(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    pub fn internal_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => {
                1 + left.internal_count() + right.internal_count()
            }
        }
    }

    /// Depth of the deepest leaf below this node.
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// A code assigned to one symbol: the low `length` bits of `code`, MSB first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodeEntry {
    pub code: u64,
    pub length: u8,
}

/// Symbol-indexed code table. Symbols absent from the input keep length 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    entries: [CodeEntry; ALPHABET_SIZE],
}

impl CodeTable {
    pub fn new() -> Self {
        CodeTable {
            entries: [CodeEntry::default(); ALPHABET_SIZE],
        }
    }

    /// Longest code length in the table.
    pub fn max_length(&self) -> u8 {
        self.entries.iter().map(|e| e.length).max().unwrap_or(0)
    }

    /// All 256 entries paired with their symbol.
    pub fn iter(&self) -> impl Iterator<Item = (u8, CodeEntry)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(symbol, &entry)| (symbol as u8, entry))
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<u8> for CodeTable {
    type Output = CodeEntry;

    fn index(&self, symbol: u8) -> &CodeEntry {
        &self.entries[symbol as usize]
    }
}

impl IndexMut<u8> for CodeTable {
    fn index_mut(&mut self, symbol: u8) -> &mut CodeEntry {
        &mut self.entries[symbol as usize]
    }
}

/// A Huffman tree over byte symbols.
#[derive(Debug)]
pub struct HuffmanTree {
    /// Nodes waiting in the queue, addressed by handle. Slots are emptied
    /// as nodes get merged.
    arena: Vec<Option<Node>>,
    queue: MinHeap<usize>,
    root: Option<Node>,
}

impl HuffmanTree {
    /// Queue one leaf per symbol with a nonzero count, in symbol order.
    pub fn new(freq: &FrequencyTable) -> Self {
        let mut arena = Vec::with_capacity(2 * ALPHABET_SIZE - 1);
        let mut queue = MinHeap::with_capacity(ALPHABET_SIZE);
        for (symbol, &frequency) in freq.byte.iter().enumerate() {
            if frequency == 0 {
                continue;
            }
            queue.push(frequency, arena.len());
            arena.push(Some(Node::Leaf {
                symbol: symbol as u8,
                frequency,
            }));
        }
        HuffmanTree {
            arena,
            queue,
            root: None,
        }
    }

    /// Merge the two lowest-frequency nodes until a single root remains.
    ///
    /// A lone leaf becomes the root as is. Calling this again is a no-op.
    pub fn build(&mut self) {
        while self.queue.len() > 1 {
            let (Some(a), Some(b)) = (self.take_next(), self.take_next()) else {
                break;
            };
            let merged = Node::merge(a, b);
            let handle = self.arena.len();
            self.queue.push(merged.frequency(), handle);
            self.arena.push(Some(merged));
        }
        if let Some(last) = self.take_next() {
            self.root = Some(last);
        }
        self.arena.clear();
    }

    fn take_next(&mut self) -> Option<Node> {
        let handle = self.queue.pop()?;
        self.arena.get_mut(handle)?.take()
    }

    /// Fill `table` with the code of every leaf, building the tree first if
    /// that has not happened yet.
    pub fn generate_dict(&mut self, table: &mut CodeTable) -> PzResult<()> {
        if self.root.is_none() {
            self.build();
        }
        let root = self.root.as_ref().ok_or(PzError::EmptyInput)?;
        collect_codes(root, table, 0, 0)
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.as_ref().map_or(0, Node::leaf_count)
    }

    pub fn internal_count(&self) -> usize {
        self.root.as_ref().map_or(0, Node::internal_count)
    }
}

fn collect_codes(node: &Node, table: &mut CodeTable, path: u64, depth: usize) -> PzResult<()> {
    match node {
        Node::Leaf { symbol, .. } => {
            if depth > MAX_CODE_LEN {
                return Err(PzError::CodeTooLong {
                    symbol: *symbol,
                    length: depth,
                });
            }
            table[*symbol] = CodeEntry {
                code: path,
                length: depth as u8,
            };
            Ok(())
        }
        Node::Internal { left, right, .. } => {
            collect_codes(left, table, path << 1, depth + 1)?;
            collect_codes(right, table, (path << 1) | 1, depth + 1)
        }
    }
}

/// Diagnostic dump: one line per node with its frequency and path.
impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => write_node(f, root, String::new()),
            None => writeln!(f, "(empty)"),
        }
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &Node, path: String) -> fmt::Result {
    let shown = if path.is_empty() { "-" } else { path.as_str() };
    match node {
        Node::Leaf { symbol, frequency } => writeln!(
            f,
            "LEAF     freq={frequency} symbol={symbol:#04x} path ({} bits): {shown}",
            path.len()
        ),
        Node::Internal {
            frequency,
            left,
            right,
        } => {
            writeln!(
                f,
                "INTERNAL freq={frequency} path ({} bits): {shown}",
                path.len()
            )?;
            write_node(f, left, format!("{path}0"))?;
            write_node(f, right, format!("{path}1"))
        }
    }
}
