//! MCTS tree node and link representation.
//!
//! Each node is a game state reached during search. Its outgoing links hold
//! the per-action statistics, one link per available action, in the same order.

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Edge of the tree: taking one action from a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// Sum of rewards backpropagated through this edge, from the point of view
    /// of the player to move at the parent.
    pub total_reward: f64,

    /// Number of times this edge has been traversed.
    pub visit_count: u32,

    /// Node reached through this edge (NONE until first expanded).
    pub child: NodeId,
}

impl Link {
    /// Untried link with no child yet.
    pub fn untried() -> Self {
        Self {
            total_reward: 0.0,
            visit_count: 0,
            child: NodeId::NONE,
        }
    }

    #[inline]
    pub fn is_untried(&self) -> bool {
        self.visit_count == 0
    }

    /// Average reward W / n. Returns None if never visited.
    #[inline]
    pub fn mean_reward(&self) -> Option<f64> {
        if self.visit_count == 0 {
            None
        } else {
            Some(self.total_reward / self.visit_count as f64)
        }
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode<S, A> {
    /// Game state at this node
    pub state: S,

    /// Parent node index (NONE for root). Never owns the parent.
    pub parent: NodeId,

    /// Index into the parent's actions of the action that led here (None for root)
    pub action_index: Option<usize>,

    /// Legal actions from this state, fixed once computed
    pub actions: Vec<A>,

    /// One link per entry in `actions`, same order
    pub links: Vec<Link>,

    /// Whether every link has been tried at least once
    pub fully_expanded: bool,

    /// Whether the state is terminal (cached at materialization)
    pub is_terminal: bool,

    /// Number of iterations that backpropagated through this node as a parent
    pub visit_count: u32,
}

impl<S, A> MctsNode<S, A> {
    /// Create a new root node. Its actions are filled in by `populate_links`.
    pub fn new_root(state: S, is_terminal: bool) -> Self {
        Self {
            state,
            parent: NodeId::NONE,
            action_index: None,
            actions: Vec::new(),
            links: Vec::new(),
            fully_expanded: false,
            is_terminal,
            visit_count: 0,
        }
    }

    /// Create a new child node reached from `parent` via its `action_index`-th action.
    pub fn new_child(state: S, parent: NodeId, action_index: usize, is_terminal: bool) -> Self {
        Self {
            state,
            parent,
            action_index: Some(action_index),
            actions: Vec::new(),
            links: Vec::new(),
            fully_expanded: false,
            is_terminal,
            visit_count: 0,
        }
    }

    /// Check if this is the root (no parent).
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Indices of links that have never been traversed.
    pub fn untried_links(&self) -> Vec<usize> {
        self.links
            .iter()
            .enumerate()
            .filter(|(_, link)| link.is_untried())
            .map(|(i, _)| i)
            .collect()
    }

    /// Sum of visit counts over outgoing links.
    pub fn link_visits(&self) -> u32 {
        self.links.iter().map(|link| link.visit_count).sum()
    }

    /// Materialized children, in action order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.links
            .iter()
            .map(|link| link.child)
            .filter(|child| child.is_some())
    }
}
