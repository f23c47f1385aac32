//! The analysis lattice: abstract values, objects, labels and scope chains

pub mod label;
pub mod obj;
pub mod property;
pub mod scope_chain;
pub mod value;

// Re-export commonly used types
pub use label::{AllocKind, ObjectLabel, Summarized};
pub use obj::{AbstractObject, LatticeStats};
pub use property::{escape, is_array_index, PropertyRef};
pub use scope_chain::ScopeChain;
pub use value::Value;
