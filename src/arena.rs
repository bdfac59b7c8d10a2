//! Node storage for the tree.
//!
//! Nodes live in a single `Vec` and refer to their children by index rather
//! than by pointer. The root is always index `0`, and a child is always
//! allocated after its parent, so every child index is strictly greater than
//! its parent's. The snapshot format relies on that ordering.

use std::collections::BTreeMap;

pub(crate) type NodeId = usize;

pub(crate) const ROOT: NodeId = 0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) payload: Vec<u8>,
    /// Distance from `payload` to the child's payload -> child.
    pub(crate) children: BTreeMap<u64, NodeId>,
}

impl Node {
    fn leaf(payload: Vec<u8>) -> Self {
        Self {
            payload,
            children: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Rebuilds an arena from nodes already in parent-before-child order.
    /// Callers are responsible for validating the links.
    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub(crate) fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub(crate) fn child(&self, id: NodeId, distance: u64) -> Option<NodeId> {
        self.nodes[id].children.get(&distance).copied()
    }

    /// Allocates the root. Only valid on an empty arena.
    pub(crate) fn alloc_root(&mut self, payload: Vec<u8>) -> NodeId {
        debug_assert!(self.nodes.is_empty());
        self.nodes.push(Node::leaf(payload));
        ROOT
    }

    /// Allocates a leaf under `parent` at `distance`. The slot must be free:
    /// an occupied slot means the caller should have descended instead.
    pub(crate) fn alloc_child(&mut self, parent: NodeId, distance: u64, payload: Vec<u8>) -> NodeId {
        let id = self.nodes.len();
        let prev = self.nodes[parent].children.insert(distance, id);
        debug_assert!(prev.is_none(), "child slot {distance} already occupied");
        self.nodes.push(Node::leaf(payload));
        id
    }

    pub(crate) fn preorder(&self) -> Preorder<'_> {
        let mut stack = Vec::new();
        if !self.nodes.is_empty() {
            stack.push(ROOT);
        }
        Preorder { arena: self, stack }
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }
}

/// Depth-first pre-order walk, children in ascending distance order.
pub(crate) struct Preorder<'a> {
    arena: &'a NodeArena,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.arena.get(id);
        self.stack.extend(node.children.values().rev().copied());
        Some((id, node))
    }
}
