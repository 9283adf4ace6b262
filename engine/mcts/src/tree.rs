//! MCTS tree structure with arena allocation.
//!
//! Nodes are stored in a contiguous Vec and referenced by NodeId indices.
//! Links point from parent to child; the parent back-reference is a plain
//! index and never owns anything. Discarding part of the tree is a single
//! compaction of the surviving subtree into a fresh arena.

use std::collections::{TryReserveError, VecDeque};

use thiserror::Error;

use crate::node::{Link, MctsNode, NodeId};

/// Errors raised while growing or reshaping the arena.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("Tree capacity exceeded: limit is {limit} nodes")]
    CapacityExceeded { limit: usize },

    #[error("Node allocation failed: {0}")]
    AllocationFailed(#[from] TryReserveError),

    #[error("Invalid node id: {0:?}")]
    InvalidNode(NodeId),
}

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree<S, A> {
    /// Arena storing all nodes
    nodes: Vec<MctsNode<S, A>>,

    /// Root node index (always 0 after construction or reroot)
    root: NodeId,

    /// Optional cap on the number of nodes
    max_nodes: Option<usize>,
}

impl<S, A> MctsTree<S, A> {
    /// Create a new tree holding only the root state.
    pub fn new(root_state: S, root_is_terminal: bool) -> Self {
        Self {
            nodes: vec![MctsNode::new_root(root_state, root_is_terminal)],
            root: NodeId(0),
            max_nodes: None,
        }
    }

    /// Limit the number of nodes the arena may hold.
    pub fn with_max_nodes(mut self, max_nodes: Option<usize>) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode<S, A> {
        &self.nodes[id.index()]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode<S, A> {
        &mut self.nodes[id.index()]
    }

    /// Check whether `id` addresses a live node.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.is_some() && id.index() < self.nodes.len()
    }

    /// Allocate a new node and return its ID.
    pub fn allocate(&mut self, node: MctsNode<S, A>) -> Result<NodeId, TreeError> {
        let limit = self.max_nodes.unwrap_or(u32::MAX as usize).min(u32::MAX as usize);
        if self.nodes.len() >= limit {
            return Err(TreeError::CapacityExceeded { limit });
        }

        self.nodes.try_reserve(1)?;
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        Ok(id)
    }

    /// Fill in a node's actions with one untried link per action.
    pub fn populate_links(&mut self, node_id: NodeId, actions: Vec<A>) -> Result<(), TreeError> {
        if !self.contains(node_id) {
            return Err(TreeError::InvalidNode(node_id));
        }

        let mut links = Vec::new();
        links.try_reserve_exact(actions.len())?;
        links.extend(actions.iter().map(|_| Link::untried()));

        let node = self.get_mut(node_id);
        node.actions = actions;
        node.links = links;
        node.fully_expanded = node.links.iter().all(|link| !link.is_untried());
        Ok(())
    }

    /// Add the child reached through `parent`'s `action_index`-th link.
    /// Returns the new child's NodeId.
    pub fn add_child(
        &mut self,
        parent_id: NodeId,
        action_index: usize,
        state: S,
        is_terminal: bool,
    ) -> Result<NodeId, TreeError> {
        if !self.contains(parent_id) || action_index >= self.get(parent_id).links.len() {
            return Err(TreeError::InvalidNode(parent_id));
        }

        let child = MctsNode::new_child(state, parent_id, action_index, is_terminal);
        let child_id = self.allocate(child)?;
        self.get_mut(parent_id).links[action_index].child = child_id;
        Ok(child_id)
    }

    /// Undo the most recent `add_child`: unlink `child_id` from its parent and
    /// drop it from the arena.
    ///
    /// Only the last allocated node can be removed, and only while it has no
    /// children of its own.
    pub fn remove_last_child(&mut self, child_id: NodeId) -> Result<(), TreeError> {
        let is_last = child_id.is_some() && child_id.index() + 1 == self.nodes.len();
        if !is_last || child_id == self.root || self.get(child_id).children().next().is_some() {
            return Err(TreeError::InvalidNode(child_id));
        }

        let Some(child) = self.nodes.pop() else {
            return Err(TreeError::InvalidNode(child_id));
        };
        if let Some(action_index) = child.action_index {
            if let Some(link) = self
                .nodes
                .get_mut(child.parent.index())
                .and_then(|parent| parent.links.get_mut(action_index))
            {
                link.child = NodeId::NONE;
            }
        }
        Ok(())
    }

    /// Whether every outgoing link of the node has been tried.
    #[inline]
    pub fn is_fully_expanded(&self, node_id: NodeId) -> bool {
        self.get(node_id).fully_expanded
    }

    /// Make `new_root` the root, dropping every node not reachable from it.
    ///
    /// The surviving subtree keeps all of its statistics; it is copied into a
    /// fresh arena in breadth-first order with ids remapped, and the old arena
    /// is dropped in one go. Returns the number of discarded nodes.
    pub fn reroot(&mut self, new_root: NodeId) -> Result<usize, TreeError> {
        if !self.contains(new_root) {
            return Err(TreeError::InvalidNode(new_root));
        }

        let old_len = self.nodes.len();
        let mut old: Vec<Option<MctsNode<S, A>>> =
            std::mem::take(&mut self.nodes).into_iter().map(Some).collect();
        let mut nodes = Vec::new();

        // Ids are handed out in dequeue order, so a child enqueued behind
        // `queue.len()` pending nodes gets id `new_id + queue.len() + 1`.
        let mut queue = VecDeque::from([(new_root, NodeId::NONE)]);
        while let Some((old_id, new_parent)) = queue.pop_front() {
            let Some(mut node) = old[old_id.index()].take() else {
                continue;
            };

            let new_id = nodes.len() as u32;
            let mut next_id = new_id + 1 + queue.len() as u32;

            node.parent = new_parent;
            if new_parent.is_none() {
                node.action_index = None;
            }

            for link in node.links.iter_mut().filter(|link| link.child.is_some()) {
                queue.push_back((link.child, NodeId(new_id)));
                link.child = NodeId(next_id);
                next_id += 1;
            }

            nodes.push(node);
        }

        self.nodes = nodes;
        self.root = NodeId(0);
        Ok(old_len - self.nodes.len())
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[MctsNode<S, A>] {
        &self.nodes
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            max_depth: self.compute_max_depth(),
        }
    }

    fn compute_max_depth(&self) -> u32 {
        let mut max_depth = 0;
        let mut stack = vec![(self.root, 0u32)];

        while let Some((node_id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(self.get(node_id).children().map(|child| (child, depth + 1)));
        }

        max_depth
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub max_depth: u32,
}
