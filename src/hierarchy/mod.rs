//! Bracket-delimited trees bridging nested arrays and sparse tensors.
//!
//! A [`Hierarchy`] is the parse tree of text such as `{{1, 2}, {3, 4}}`:
//! every `{ … }` group becomes a ranked node whose subordinates are its
//! comma-separated items, and every scalar token becomes a value node.
//!
//! ```text
//!            {{1, 2}, {3, 4}}
//!                   │ parse
//!                   ▼
//!               group (top)
//!              ┌────┴────┐
//!            group     group
//!            ┌─┴─┐     ┌─┴─┐
//!            1   2     3   4
//!                   │ to_array
//!                   ▼
//!       NdArray { shape: [2, 2], data: [1, 2, 3, 4] }
//! ```
//!
//! Nodes live in an arena and refer to each other by [`NodeId`], so the
//! leader (parent) links never form reference cycles.

mod convert;
mod parse;
mod write;

pub use convert::{NdArray, Nested};

use crate::error::{Error, Result};

/// Index of a node inside its [`Hierarchy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node of the tree: a group with subordinates or a leaf holding a value.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedNode<T> {
    leader: Option<NodeId>,
    subordinates: Vec<NodeId>,
    value: Option<T>,
}

impl<T> RankedNode<T> {
    /// Parent node, `None` for the top node.
    #[inline]
    pub fn leader(&self) -> Option<NodeId> {
        self.leader
    }

    /// Child nodes in order.
    #[inline]
    pub fn subordinates(&self) -> &[NodeId] {
        &self.subordinates
    }

    /// Scalar held by a value node.
    #[inline]
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Whether this is a leaf holding a value.
    #[inline]
    pub fn is_value(&self) -> bool {
        self.value.is_some()
    }
}

/// A tree of ranked nodes with a single top node.
#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy<T> {
    nodes: Vec<RankedNode<T>>,
    top: NodeId,
}

impl<T> Hierarchy<T> {
    /// A hierarchy consisting of one value node.
    pub fn from_value(value: T) -> Self {
        Self {
            nodes: vec![RankedNode {
                leader: None,
                subordinates: Vec::new(),
                value: Some(value),
            }],
            top: NodeId(0),
        }
    }

    /// A hierarchy consisting of one empty group.
    pub fn new_group() -> Self {
        Self {
            nodes: vec![RankedNode {
                leader: None,
                subordinates: Vec::new(),
                value: None,
            }],
            top: NodeId(0),
        }
    }

    /// Append an empty group under `leader`.
    pub fn add_group(&mut self, leader: NodeId) -> Result<NodeId> {
        self.attach(leader, None)
    }

    /// Append a value node under `leader`.
    pub fn add_value(&mut self, leader: NodeId, value: T) -> Result<NodeId> {
        self.attach(leader, Some(value))
    }

    fn attach(&mut self, leader: NodeId, value: Option<T>) -> Result<NodeId> {
        if self.node(leader)?.is_value() {
            return Err(Error::InvalidArgument {
                arg: "leader",
                reason: format!("node {} holds a value and cannot have subordinates", leader.0),
            });
        }
        Ok(self.append(leader, value))
    }

    /// Append a node under `leader`, which must be a group.
    pub(crate) fn append(&mut self, leader: NodeId, value: Option<T>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(RankedNode {
            leader: Some(leader),
            subordinates: Vec::new(),
            value,
        });
        self.nodes[leader.0].subordinates.push(id);
        id
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// The top node.
    #[inline]
    pub fn top(&self) -> NodeId {
        self.top
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a hierarchy has at least its top node.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by id.
    pub fn node(&self, id: NodeId) -> Result<&RankedNode<T>> {
        self.nodes.get(id.0).ok_or(Error::IndexOutOfBounds {
            index: id.0,
            size: self.nodes.len(),
        })
    }

    /// Leader of a node.
    pub fn leader(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.leader)
    }

    /// Subordinates of a node.
    pub fn subordinates(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.node(id)?.subordinates)
    }

    /// Value of a node, if it is a value node.
    pub fn value(&self, id: NodeId) -> Result<Option<&T>> {
        Ok(self.node(id)?.value.as_ref())
    }

    /// Nesting depth from the top node to the first value along first
    /// subordinates.
    pub fn rank(&self) -> usize {
        let mut rank = 0;
        let mut id = self.top;
        while let Some(&first) = self.nodes[id.0].subordinates.first() {
            rank += 1;
            id = first;
        }
        rank
    }

    /// Make `id` the top node.
    ///
    /// The path to the old top is reversed: every former leader becomes the
    /// last subordinate of the node below it.
    pub fn make_top_node(&mut self, id: NodeId) -> Result<()> {
        if self.node(id)?.is_value() {
            return Err(Error::InvalidArgument {
                arg: "id",
                reason: format!("value node {} cannot become the top node", id.0),
            });
        }
        let mut path = vec![id];
        while let Some(leader) = self.nodes[path[path.len() - 1].0].leader {
            path.push(leader);
        }
        for pair in path.windows(2) {
            let (child, parent) = (pair[0], pair[1]);
            self.nodes[parent.0].subordinates.retain(|&s| s != child);
            self.nodes[child.0].subordinates.push(parent);
            self.nodes[parent.0].leader = Some(child);
        }
        self.nodes[id.0].leader = None;
        self.top = id;
        Ok(())
    }
}
