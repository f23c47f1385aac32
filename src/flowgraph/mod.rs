//! Flow-graph fragments referenced by the solver

pub mod fragment;

pub use fragment::FlowGraphFragment;
