//! jsflow: abstract-interpretation core for whole-program JavaScript analysis
//!
//! This library provides the heap lattice of a context-sensitive dataflow
//! analyzer: abstract values, abstract objects with copy-on-write property
//! maps and default properties, scope chains, summarization, and the
//! differential operations (trim, remove, replace-non-modified) that drive a
//! demand-driven fixpoint solver.

pub mod error;
pub mod flowgraph;
pub mod lattice;
pub mod options;
pub mod solver;

pub use error::{Error, Result};

// Re-export commonly used types
pub use flowgraph::FlowGraphFragment;
pub use lattice::{
    AbstractObject, AllocKind, LatticeStats, ObjectLabel, PropertyRef, ScopeChain, Summarized,
    Value,
};
pub use solver::NodeAndContext;
