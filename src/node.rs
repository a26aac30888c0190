/*!
# Vertex Representation

Vertices of both sides of a bipartite problem are addressed by their position in the input slice.
We choose `Node = u32` as matching problems never come close to `2^32` points per side, which
halves the memory of all index arrays compared to `usize`.
*/

use std::num::NonZero;
use stream_bitset::bitset::BitSetImpl;

/// Vertices can be any unsigned integer from `0` to `Node::MAX - 1`
pub type Node = u32;

/// Node-Value that is considered invalid
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` vertices on one side of a problem
pub type NumNodes = Node;

/// BitSet for Nodes
pub type NodeBitSet = BitSetImpl<Node>;

/// As `Option<Node>` uses additional bytes for padding, it can be inefficient
/// since we often need to use `Vec<Option<Node>>` for partner arrays. This instead uses the
/// `NonZero`-Wrapper to assign a constant value as niche.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct OptionalNodeImpl<const N: Node>(NonZero<Node>);

/// `INVALID_NODE` is safe to pick as the `None`-Value
pub type OptionalNode = OptionalNodeImpl<INVALID_NODE>;

impl<const N: Node> OptionalNodeImpl<N> {
    /// Returns `Some(OptionalNodeImpl)` if `n != N` and `None` otherwise
    pub const fn new(n: Node) -> Option<Self> {
        match NonZero::new(n ^ N) {
            Some(inner) => Some(OptionalNodeImpl(inner)),
            None => None,
        }
    }

    /// Gets the underlying Node-Value
    pub const fn get(&self) -> Node {
        self.0.get() ^ N
    }
}

/// Converts a slice length into the number of vertices on that side.
///
/// # Panics
/// If the slice holds `Node::MAX` or more elements.
#[inline]
pub fn num_nodes_of<T>(side: &[T]) -> NumNodes {
    assert!(
        side.len() < INVALID_NODE as usize,
        "At most 2^32 - 2 vertices per side are supported"
    );
    side.len() as NumNodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_node_packs_into_four_bytes() {
        assert_eq!(std::mem::size_of::<Option<OptionalNode>>(), 4);
    }

    #[test]
    fn optional_node_roundtrip() {
        for n in [0, 1, 17, INVALID_NODE - 1] {
            assert_eq!(OptionalNode::new(n).map(|x| x.get()), Some(n));
        }
        assert_eq!(OptionalNode::new(INVALID_NODE), None);
    }
}
