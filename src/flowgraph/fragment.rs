//! Fragments of the flow graph

use petgraph::graph::NodeIndex;
use std::collections::HashSet;

/// A fragment of the flow graph.
///
/// Records the blocks, nodes and functions added for one dynamically
/// discovered piece of code (e.g. an event handler), keyed so the solver can
/// later replace or drop the whole fragment at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowGraphFragment {
    key: String,
    entry_block: NodeIndex,
    entry_function: u32,
    functions: HashSet<u32>,
    blocks: HashSet<NodeIndex>,
    nodes: HashSet<NodeIndex>,
}

impl FlowGraphFragment {
    /// Constructs a flow-graph fragment.
    pub fn new(
        key: impl Into<String>,
        entry_block: NodeIndex,
        entry_function: u32,
        functions: HashSet<u32>,
        blocks: HashSet<NodeIndex>,
        nodes: HashSet<NodeIndex>,
    ) -> Self {
        Self {
            key: key.into(),
            entry_block,
            entry_function,
            functions,
            blocks,
            nodes,
        }
    }

    /// The fragment key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The starting block of this fragment.
    pub fn entry_block(&self) -> NodeIndex {
        self.entry_block
    }

    /// The outermost function of this fragment.
    pub fn entry_function(&self) -> u32 {
        self.entry_function
    }

    /// The functions belonging to this fragment.
    pub fn functions(&self) -> &HashSet<u32> {
        &self.functions
    }

    /// The extra blocks belonging to this fragment.
    pub fn blocks(&self) -> &HashSet<NodeIndex> {
        &self.blocks
    }

    /// The extra nodes belonging to this fragment.
    pub fn nodes(&self) -> &HashSet<NodeIndex> {
        &self.nodes
    }
}
