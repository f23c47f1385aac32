//! Abstract values: the lattice element stored in a single object slot
//!
//! A value is an immutable over-approximation of the concrete values a slot
//! may hold: primitive facets, an object-label set, and the bookkeeping
//! facets (absent, modified, unknown) the differential solver relies on.
//! All operations return new values; existing values are never mutated.

use ordered_float::OrderedFloat;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::label::{ObjectLabel, Summarized};

const UNDEF: u16 = 0x0001;
const NULL: u16 = 0x0002;
const BOOL_TRUE: u16 = 0x0004;
const BOOL_FALSE: u16 = 0x0008;
const NUM_ANY: u16 = 0x0010;
const STR_ANY: u16 = 0x0020;
const ABSENT: u16 = 0x0040;
const MODIFIED: u16 = 0x0080;
const UNKNOWN: u16 = 0x0100;

const PRIMITIVES: u16 = UNDEF | NULL | BOOL_TRUE | BOOL_FALSE | NUM_ANY | STR_ANY;

/// Lattice element for a single slot.
///
/// `unknown` is the top marker used as a placeholder for parts of the state
/// that were not propagated along an edge; it carries no other facets.
/// The bottom element (`none`) has no facets at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Value {
    flags: u16,
    /// Exact number facet; mutually exclusive with the any-number flag.
    num: Option<OrderedFloat<f64>>,
    /// Exact string facet; mutually exclusive with the any-string flag.
    string: Option<String>,
    object_labels: BTreeSet<ObjectLabel>,
}

impl Value {
    fn with_flags(flags: u16) -> Self {
        Self {
            flags,
            num: None,
            string: None,
            object_labels: BTreeSet::new(),
        }
    }

    /// The bottom element: no facets at all.
    pub fn make_none() -> Self {
        Self::with_flags(0)
    }

    /// The top marker, used as a placeholder for unpropagated state.
    pub fn make_unknown() -> Self {
        Self::with_flags(UNKNOWN)
    }

    /// Definitely absent, and marked modified.
    pub fn make_absent_modified() -> Self {
        Self::with_flags(ABSENT | MODIFIED)
    }

    /// Definitely absent.
    pub fn make_absent() -> Self {
        Self::with_flags(ABSENT)
    }

    /// The undefined value.
    pub fn make_undef() -> Self {
        Self::with_flags(UNDEF)
    }

    /// The null value.
    pub fn make_null() -> Self {
        Self::with_flags(NULL)
    }

    /// An exact boolean.
    pub fn make_bool(b: bool) -> Self {
        Self::with_flags(if b { BOOL_TRUE } else { BOOL_FALSE })
    }

    /// Any boolean.
    pub fn make_any_bool() -> Self {
        Self::with_flags(BOOL_TRUE | BOOL_FALSE)
    }

    /// Any number.
    pub fn make_any_number() -> Self {
        Self::with_flags(NUM_ANY)
    }

    /// An exact number.
    pub fn make_number(n: f64) -> Self {
        let mut v = Self::with_flags(0);
        v.num = Some(OrderedFloat(n));
        v
    }

    /// Any string.
    pub fn make_any_string() -> Self {
        Self::with_flags(STR_ANY)
    }

    /// An exact string.
    pub fn make_string(s: impl Into<String>) -> Self {
        let mut v = Self::with_flags(0);
        v.string = Some(s.into());
        v
    }

    /// A single object label.
    pub fn make_object(label: ObjectLabel) -> Self {
        let mut v = Self::with_flags(0);
        v.object_labels.insert(label);
        v
    }

    /// A set of object labels.
    pub fn from_object_labels(labels: BTreeSet<ObjectLabel>) -> Self {
        let mut v = Self::with_flags(0);
        v.object_labels = labels;
        v
    }

    /// True iff this is the 'unknown' placeholder.
    pub fn is_unknown(&self) -> bool {
        self.flags & UNKNOWN != 0
    }

    /// True iff this is the bottom element: no facets, not absent, not unknown.
    pub fn is_none(&self) -> bool {
        !self.is_maybe_present() && !self.is_maybe_absent() && !self.is_unknown()
    }

    /// True iff the slot may hold some value.
    pub fn is_maybe_present(&self) -> bool {
        self.flags & PRIMITIVES != 0
            || self.num.is_some()
            || self.string.is_some()
            || !self.object_labels.is_empty()
    }

    /// True iff the slot may be missing.
    pub fn is_maybe_absent(&self) -> bool {
        self.flags & ABSENT != 0
    }

    /// True iff the slot may hold some value, or is the 'unknown' placeholder.
    pub fn is_maybe_present_or_unknown(&self) -> bool {
        self.is_maybe_present() || self.is_unknown()
    }

    /// True iff the slot may have been written since the last clear-modified.
    pub fn is_maybe_modified(&self) -> bool {
        self.flags & MODIFIED != 0
    }

    /// Returns this value with the modified facet set.
    pub fn join_modified(&self) -> Self {
        if self.is_maybe_modified() {
            return self.clone();
        }
        let mut v = self.clone();
        v.flags |= MODIFIED;
        v
    }

    /// Returns this value with the modified facet cleared.
    pub fn restrict_to_not_modified(&self) -> Self {
        if !self.is_maybe_modified() {
            return self.clone();
        }
        let mut v = self.clone();
        v.flags &= !MODIFIED;
        v
    }

    /// Returns this value with the absent facet set.
    pub fn join_absent(&self) -> Self {
        let mut v = self.clone();
        v.flags |= ABSENT;
        v
    }

    /// The object labels referenced by this value.
    ///
    /// Empty for 'unknown'.
    pub fn object_labels(&self) -> &BTreeSet<ObjectLabel> {
        &self.object_labels
    }

    /// Least upper bound of two values.
    ///
    /// 'unknown' absorbs everything; exact constants collapse to the
    /// any-number/any-string facet when they disagree.
    pub fn join(&self, other: &Value) -> Value {
        if self.is_unknown() || other.is_unknown() {
            return Value::make_unknown();
        }
        let mut v = Value::with_flags(self.flags | other.flags);
        v.num = match (self.num, other.num) {
            (Some(a), Some(b)) if a == b => Some(a),
            (Some(_), Some(_)) => {
                v.flags |= NUM_ANY;
                None
            }
            (a, b) => a.or(b),
        };
        v.string = match (&self.string, &other.string) {
            (Some(a), Some(b)) if a == b => Some(a.clone()),
            (Some(_), Some(_)) => {
                v.flags |= STR_ANY;
                None
            }
            (a, b) => a.clone().or_else(|| b.clone()),
        };
        // an exact constant is subsumed by the corresponding any-facet
        if v.flags & NUM_ANY != 0 {
            v.num = None;
        }
        if v.flags & STR_ANY != 0 {
            v.string = None;
        }
        v.object_labels = self
            .object_labels
            .union(&other.object_labels)
            .copied()
            .collect();
        v
    }

    /// Rewrites the object labels of this value through a summarization
    /// witness. Identity on every other facet, including modified.
    pub fn summarize(&self, s: &Summarized) -> Value {
        if self.object_labels.is_empty() {
            return self.clone();
        }
        let mut v = self.clone();
        v.object_labels = s.summarize_set(&self.object_labels);
        v
    }

    /// Replaces all occurrences of one object label. Modified flags are not
    /// touched; 'unknown' is unaffected.
    pub fn replace_object_label(&self, old: ObjectLabel, new: ObjectLabel) -> Value {
        if !self.object_labels.contains(&old) {
            return self.clone();
        }
        let mut v = self.clone();
        v.object_labels.remove(&old);
        v.object_labels.insert(new);
        v
    }

    /// Replaces object labels according to the given map. Labels not in the
    /// key set are unchanged.
    pub fn replace_object_labels(&self, m: &HashMap<ObjectLabel, ObjectLabel>) -> Value {
        if self.object_labels.is_empty() {
            return self.clone();
        }
        let mut v = self.clone();
        v.object_labels = self
            .object_labels
            .iter()
            .map(|l| m.get(l).copied().unwrap_or(*l))
            .collect();
        v
    }

    /// Trims this value against the corresponding slot of a reference object.
    ///
    /// A slot that is 'unknown' in the reference was never propagated along
    /// the edge, so the trimmed value collapses to 'unknown' as well; all
    /// other slots pass through unchanged.
    pub fn trim(&self, other: &Value) -> Value {
        if other.is_unknown() {
            Value::make_unknown()
        } else {
            self.clone()
        }
    }

    /// Removes the facets of the given value from this value.
    ///
    /// Assumes this value subsumes the other. The modified facet of this
    /// value is preserved; 'unknown' on either side is identity.
    pub fn remove(&self, other: &Value) -> Value {
        if self.is_unknown() || other.is_unknown() {
            return self.clone();
        }
        let modified = self.flags & MODIFIED;
        let mut v = Value::with_flags((self.flags & !other.flags & !MODIFIED) | modified);
        v.num = match (self.num, other.num) {
            (Some(a), Some(b)) if a == b => None,
            (num, _) => num,
        };
        v.string = match (&self.string, &other.string) {
            (Some(a), Some(b)) if a == b => None,
            (s, _) => s.clone(),
        };
        v.object_labels = self
            .object_labels
            .difference(&other.object_labels)
            .copied()
            .collect();
        v
    }

    /// Appends a description of the changes from the old value to this value.
    pub fn diff(&self, old: &Value, b: &mut String) {
        let mut emit = |sign: char, name: &str| {
            b.push(sign);
            b.push_str(name);
            b.push(' ');
        };
        for (flag, name) in [
            (UNDEF, "undef"),
            (NULL, "null"),
            (BOOL_TRUE, "true"),
            (BOOL_FALSE, "false"),
            (NUM_ANY, "num"),
            (STR_ANY, "str"),
            (ABSENT, "absent"),
            (MODIFIED, "modified"),
            (UNKNOWN, "unknown"),
        ] {
            if self.flags & flag != 0 && old.flags & flag == 0 {
                emit('+', name);
            } else if self.flags & flag == 0 && old.flags & flag != 0 {
                emit('-', name);
            }
        }
        if self.num != old.num {
            b.push_str(&format!("num:{:?}->{:?} ", old.num, self.num));
        }
        if self.string != old.string {
            b.push_str(&format!("str:{:?}->{:?} ", old.string, self.string));
        }
        for l in self.object_labels.difference(&old.object_labels) {
            b.push_str(&format!("+{} ", l));
        }
        for l in old.object_labels.difference(&self.object_labels) {
            b.push_str(&format!("-{} ", l));
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            return write!(f, "?");
        }
        let mut parts: Vec<String> = Vec::new();
        if self.flags & UNDEF != 0 {
            parts.push("undef".into());
        }
        if self.flags & NULL != 0 {
            parts.push("null".into());
        }
        if self.flags & BOOL_TRUE != 0 {
            parts.push("true".into());
        }
        if self.flags & BOOL_FALSE != 0 {
            parts.push("false".into());
        }
        if self.flags & NUM_ANY != 0 {
            parts.push("num".into());
        }
        if let Some(n) = self.num {
            parts.push(format!("num({})", n));
        }
        if self.flags & STR_ANY != 0 {
            parts.push("str".into());
        }
        if let Some(s) = &self.string {
            parts.push(format!("str(\"{}\")", s));
        }
        for l in &self.object_labels {
            parts.push(l.to_string());
        }
        if self.flags & ABSENT != 0 {
            parts.push("absent".into());
        }
        if parts.is_empty() {
            parts.push("none".into());
        }
        write!(f, "{}", parts.join("|"))?;
        if self.is_maybe_modified() {
            write!(f, "(modified)")?;
        }
        Ok(())
    }
}
