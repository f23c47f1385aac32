//! Object labels: analysis-time identities for allocation sites

use petgraph::graph::NodeIndex;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Category of host object created at an allocation site
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AllocKind {
    /// Plain object literal or `new Object()`
    Object,
    /// Array object
    Array,
    /// Function object (closures carry a scope chain)
    Function,
    /// Activation record of a function invocation
    Activation,
    /// Arguments object
    Arguments,
    /// Boxed boolean
    Boolean,
    /// Boxed number
    Number,
    /// Boxed string
    String,
    /// RegExp object
    Regexp,
    /// Date object
    Date,
    /// Error object
    Error,
}

/// Identity for the abstract objects allocated at one site under the chosen
/// heap-context abstraction.
///
/// A label is either a *singleton* (describes at most one concrete object)
/// or a *summary* (may describe many). Summarization rewrites a singleton
/// into its summary counterpart; the two compare unequal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectLabel {
    site: NodeIndex,
    kind: AllocKind,
    singleton: bool,
}

impl ObjectLabel {
    /// Create a singleton label for the given allocation site.
    pub fn new(site: NodeIndex, kind: AllocKind) -> Self {
        Self {
            site,
            kind,
            singleton: true,
        }
    }

    /// The allocation-site node this label abstracts.
    pub fn site(&self) -> NodeIndex {
        self.site
    }

    /// The allocation category.
    pub fn kind(&self) -> AllocKind {
        self.kind
    }

    /// True if this label describes at most one concrete object.
    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    /// The summary counterpart of this label.
    pub fn summary(&self) -> Self {
        Self {
            site: self.site,
            kind: self.kind,
            singleton: false,
        }
    }
}

impl fmt::Display for ObjectLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.singleton {
            write!(f, "@{}:{:?}", self.site.index(), self.kind)
        } else {
            write!(f, "*{}:{:?}", self.site.index(), self.kind)
        }
    }
}

/// Witness describing which object labels have been summarized.
///
/// Built by the solver when a call context or allocation site transitions
/// from singleton to summary abstraction, then applied to every value and
/// scope chain of the affected state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summarized {
    maybe_summarized: HashSet<ObjectLabel>,
    definitely_summarized: HashSet<ObjectLabel>,
}

impl Summarized {
    /// Create an empty witness.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a witness that definitely summarizes the given label.
    pub fn from_label(label: ObjectLabel) -> Self {
        let mut s = Self::new();
        s.add_definitely_summarized(label);
        s
    }

    /// True if the label may have been summarized.
    pub fn is_maybe_summarized(&self, label: &ObjectLabel) -> bool {
        self.maybe_summarized.contains(label)
    }

    /// True if the label has definitely been summarized.
    pub fn is_definitely_summarized(&self, label: &ObjectLabel) -> bool {
        self.definitely_summarized.contains(label)
    }

    /// Record that the label may have been summarized.
    pub fn add_maybe_summarized(&mut self, label: ObjectLabel) {
        self.maybe_summarized.insert(label);
    }

    /// Record that the label has definitely been summarized.
    ///
    /// Definitely summarized implies maybe summarized.
    pub fn add_definitely_summarized(&mut self, label: ObjectLabel) {
        self.maybe_summarized.insert(label);
        self.definitely_summarized.insert(label);
    }

    /// Rewrite a label set through this witness.
    ///
    /// A singleton label that may have been summarized contributes its
    /// summary counterpart, and additionally survives unless the
    /// summarization is definite. Summary labels pass through unchanged.
    pub fn summarize_set(&self, labels: &BTreeSet<ObjectLabel>) -> BTreeSet<ObjectLabel> {
        let mut result = BTreeSet::new();
        for label in labels {
            if label.is_singleton() && self.is_maybe_summarized(label) {
                result.insert(label.summary());
                if !self.is_definitely_summarized(label) {
                    result.insert(*label);
                }
            } else {
                result.insert(*label);
            }
        }
        result
    }
}
