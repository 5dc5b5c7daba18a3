//! Huffman tree construction
//!
//! Nodes live in a single arena and refer to each other by [`NodeId`]. The
//! whole tree is dropped at once when the owning value goes away.

use std::fmt;

use tracing::debug;

use crate::error::{CompressError, Result};
use crate::frequency::FrequencyTable;
use crate::queue::PriorityQueue;

/// Handle of a node inside a [`HuffmanTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build the tree for `table`.
    ///
    /// Leaves enter the queue in table order. Each round pops the two lightest
    /// nodes, left first, and pushes their parent back. A table with a single
    /// symbol yields a tree whose root is that leaf.
    pub fn build(table: &FrequencyTable) -> Result<Self> {
        if table.is_empty() {
            return Err(CompressError::EmptyInput);
        }

        let mut nodes = Vec::new();
        nodes.try_reserve_exact(2 * table.len() - 1)?;
        let mut queue = PriorityQueue::with_capacity(table.len());
        for symbol in table.symbols() {
            let id = NodeId(nodes.len());
            nodes.push(Node::Leaf {
                symbol: symbol.id,
                weight: symbol.count,
            });
            queue.insert(symbol.count, id);
        }

        let root = loop {
            let left = queue.pop_min().ok_or(CompressError::EmptyInput)?;
            let Some(right) = queue.pop_min() else {
                break left.item;
            };
            // bounded by the table total, which was overflow-checked
            let weight = left.weight + right.weight;
            let id = NodeId(nodes.len());
            nodes.push(Node::Internal {
                weight,
                left: left.item,
                right: right.item,
            });
            queue.insert(weight, id);
        };

        let tree = Self { nodes, root };
        debug!(
            leaves = table.len(),
            nodes = tree.nodes.len(),
            depth = tree.depth(),
            "huffman tree built"
        );
        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Total weight, equal to the frequency table total.
    pub fn weight(&self) -> u64 {
        self.node(self.root).weight()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// True when the root is itself a leaf (one distinct symbol).
    pub fn is_single_leaf(&self) -> bool {
        matches!(self.node(self.root), Node::Leaf { .. })
    }

    /// Child reached from `id` by `bit` (`false` = left, `true` = right),
    /// or `None` if `id` is a leaf.
    pub fn step(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match self.node(id) {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => Some(if bit { *right } else { *left }),
        }
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.node(id) {
                Node::Leaf { .. } => max = max.max(depth),
                Node::Internal { left, right, .. } => {
                    stack.push((*right, depth + 1));
                    stack.push((*left, depth + 1));
                }
            }
        }
        max
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Huffman Tree Structure:")?;
        let mut stack = vec![(self.root, 0usize, "root")];
        while let Some((id, depth, label)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match self.node(id) {
                Node::Leaf { symbol, weight } => writeln!(
                    f,
                    "{}{}-> Leaf: '{}' ({}) [weight: {}]",
                    indent,
                    label,
                    std::ascii::escape_default(*symbol),
                    symbol,
                    weight
                )?,
                Node::Internal {
                    weight,
                    left,
                    right,
                } => {
                    writeln!(f, "{}{}-> Internal [weight: {}]", indent, label, weight)?;
                    stack.push((*right, depth + 1, "R"));
                    stack.push((*left, depth + 1, "L"));
                }
            }
        }
        Ok(())
    }
}
