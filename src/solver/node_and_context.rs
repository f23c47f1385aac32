//! Node/context pairs keying solver work items

use petgraph::graph::NodeIndex;
use std::fmt;

/// Pair of a flow-graph node and a call context.
///
/// Used as a map key wherever the solver tracks information per
/// (program point, context), e.g. the worklist and the call-edge store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeAndContext<C> {
    node: NodeIndex,
    context: C,
}

impl<C> NodeAndContext<C> {
    /// Constructs a new pair.
    pub fn new(node: NodeIndex, context: C) -> Self {
        Self { node, context }
    }

    /// Returns the node.
    pub fn node(&self) -> NodeIndex {
        self.node
    }

    /// Returns the context.
    pub fn context(&self) -> &C {
        &self.context
    }
}

impl<C: fmt::Display> fmt::Display for NodeAndContext<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {}, context {}", self.node.index(), self.context)
    }
}
