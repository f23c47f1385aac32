//! Abstract objects: the heap lattice element
//!
//! An abstract object over-approximates the set of concrete objects that may
//! exist at a program point. Explicit properties are kept in a shared,
//! copy-on-write map; the infinite remainder of the property name space is
//! covered by the two default properties (array-index names and all other
//! names). The internal [[Prototype]], [[Value]] and [[Scope]] slots are
//! stored alongside.
//!
//! Objects are mutated in place by transfer functions while held uniquely by
//! the current state and shared between states through the copy-on-write
//! discipline. All operations are pure data manipulation; nothing here
//! blocks or performs I/O.

use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::lattice::label::{ObjectLabel, Summarized};
use crate::lattice::property::{escape, is_array_index, PropertyRef};
use crate::lattice::scope_chain::ScopeChain;
use crate::lattice::value::Value;
use crate::options;

static NUM_OBJECTS_CREATED: AtomicUsize = AtomicUsize::new(0);
static NUM_MAKE_WRITABLE_CALLS: AtomicUsize = AtomicUsize::new(0);

/// Snapshot of the process-wide lattice telemetry counters.
///
/// Purely observational; resetting or reading has no semantic effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LatticeStats {
    /// Total number of abstract objects constructed
    pub objects_created: usize,
    /// Total number of times a shared property map was cloned for writing
    pub make_writable_calls: usize,
}

/// Abstract object. Mutable.
#[derive(Debug)]
pub struct AbstractObject {
    /// Explicit properties; shared between copies until written
    properties: Arc<BTreeMap<String, Value>>,
    /// True iff this instance owns `properties`
    writable_properties: bool,

    /// Covers all unlisted property names that are valid array indices
    default_array: Value,
    /// Covers all other unlisted property names
    default_nonarray: Value,

    /// The internal [[Prototype]] slot
    internal_prototype: Value,
    /// The internal [[Value]] slot
    internal_value: Value,

    /// The internal [[Scope]] slot; `None` means the empty chain
    scope: Option<ScopeChain>,
    /// If set, the scope is 'unknown' and the `scope` field is not used
    scope_unknown: bool,
}

impl AbstractObject {
    fn with_all_slots(v: Value, scope_unknown: bool) -> Self {
        NUM_OBJECTS_CREATED.fetch_add(1, Ordering::Relaxed);
        Self {
            properties: Arc::new(BTreeMap::new()),
            writable_properties: true,
            default_array: v.clone(),
            default_nonarray: v.clone(),
            internal_prototype: v.clone(),
            internal_value: v,
            scope: None,
            scope_unknown,
        }
    }

    /// Constructs an abstract object where all properties are absent but
    /// modified, and the scope is empty.
    pub fn make_absent_modified() -> Self {
        Self::with_all_slots(Value::make_absent_modified(), false)
    }

    /// Constructs an abstract object where all properties are the bottom
    /// value and the scope is empty.
    pub fn make_none() -> Self {
        Self::with_all_slots(Value::make_none(), false)
    }

    /// Constructs an abstract object where all properties, including the
    /// scope, are 'unknown'.
    pub fn make_unknown() -> Self {
        Self::with_all_slots(Value::make_unknown(), true)
    }

    /// Creates a new abstract object as a copy of this one.
    ///
    /// With copy-on-write enabled (the default) the property map is shared
    /// and both objects lose ownership of it; the first subsequent write on
    /// either side clones the map. With copy-on-write disabled the map is
    /// cloned eagerly and both objects stay writable.
    pub fn copy(&mut self) -> AbstractObject {
        let mut obj = Self::with_all_slots(Value::make_none(), false);
        obj.set_to(self);
        obj
    }

    /// Sets this object to be a copy of the given one, under the same
    /// sharing discipline as [`copy`](Self::copy).
    pub fn set_to(&mut self, x: &mut AbstractObject) {
        self.default_array = x.default_array.clone();
        self.default_nonarray = x.default_nonarray.clone();
        self.internal_prototype = x.internal_prototype.clone();
        self.internal_value = x.internal_value.clone();
        self.scope = x.scope.clone();
        self.scope_unknown = x.scope_unknown;
        if options::is_copy_on_write_disabled() {
            self.properties = Arc::new((*x.properties).clone());
            self.writable_properties = true;
            x.writable_properties = true;
        } else {
            self.properties = Arc::clone(&x.properties);
            self.writable_properties = false;
            x.writable_properties = false;
        }
    }

    /// Clones the property map if it is shared. Idempotent.
    fn make_writable_properties(&mut self) {
        if self.writable_properties {
            return;
        }
        self.properties = Arc::new((*self.properties).clone());
        self.writable_properties = true;
        NUM_MAKE_WRITABLE_CALLS.fetch_add(1, Ordering::Relaxed);
    }

    /// Replaces the property map wholesale, taking ownership.
    fn replace_properties(&mut self, properties: BTreeMap<String, Value>) {
        self.properties = Arc::new(properties);
        self.writable_properties = true;
    }

    /// Checks whether all properties, both defaults, both internal slots and
    /// the scope are 'unknown'.
    pub fn is_unknown(&self) -> bool {
        self.properties.values().all(|v| v.is_unknown())
            && self.default_array.is_unknown()
            && self.default_nonarray.is_unknown()
            && self.internal_prototype.is_unknown()
            && self.internal_value.is_unknown()
            && self.scope_unknown
    }

    /// Checks whether all properties, both defaults, both internal slots are
    /// the bottom value, and the scope is empty and not 'unknown'.
    pub fn is_none(&self) -> bool {
        self.properties.values().all(|v| v.is_none())
            && self.default_array.is_none()
            && self.default_nonarray.is_none()
            && self.internal_prototype.is_none()
            && self.internal_value.is_none()
            && !self.scope_unknown
            && self.scope.is_none()
    }

    /// Checks whether some non-array property is 'unknown', including the
    /// default.
    pub fn is_some_nonarray_property_unknown(&self) -> bool {
        if self.default_nonarray.is_unknown() {
            return true;
        }
        self.properties
            .iter()
            .any(|(name, v)| v.is_unknown() && !is_array_index(name))
    }

    /// Returns the value of the given property, considering the defaults if
    /// necessary. Never absent as a lookup result; may be 'unknown'.
    pub fn get_property(&self, name: &str) -> &Value {
        match self.properties.get(name) {
            Some(v) => v,
            None if is_array_index(name) => &self.default_array,
            None => &self.default_nonarray,
        }
    }

    /// Sets the given property, making the property map writable first.
    pub fn set_property(&mut self, name: impl Into<String>, v: Value) {
        self.make_writable_properties();
        Arc::make_mut(&mut self.properties).insert(name.into(), v);
    }

    /// All explicit property names, excluding the defaults and internal
    /// slots, in sorted order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// The explicit properties, excluding the defaults and internal slots.
    /// The map is not made writable.
    pub fn properties(&self) -> &BTreeMap<String, Value> {
        &self.properties
    }

    /// Replaces the whole property map and marks it writable.
    pub fn set_properties(&mut self, properties: BTreeMap<String, Value>) {
        self.replace_properties(properties);
    }

    /// Number of explicit properties.
    pub fn number_of_properties(&self) -> usize {
        self.properties.len()
    }

    /// The value of the default array property.
    pub fn default_array_property(&self) -> &Value {
        &self.default_array
    }

    /// Sets the default array property.
    ///
    /// The value must represent possibly missing properties: 'unknown', or
    /// maybe-absent, or not maybe-present.
    pub fn set_default_array_property(&mut self, v: Value) -> Result<()> {
        if !v.is_unknown() && v.is_maybe_present() && !v.is_maybe_absent() {
            return Err(Error::invariant(format!(
                "Illegal default array property: {}",
                v
            )));
        }
        self.default_array = v;
        Ok(())
    }

    /// The value of the default non-array property.
    pub fn default_nonarray_property(&self) -> &Value {
        &self.default_nonarray
    }

    /// Sets the default non-array property, under the same invariant as
    /// [`set_default_array_property`](Self::set_default_array_property).
    pub fn set_default_nonarray_property(&mut self, v: Value) -> Result<()> {
        if !v.is_unknown() && v.is_maybe_present() && !v.is_maybe_absent() {
            return Err(Error::invariant(format!(
                "Illegal default nonarray property: {}",
                v
            )));
        }
        self.default_nonarray = v;
        Ok(())
    }

    /// The value of the internal [[Value]] slot.
    pub fn internal_value(&self) -> &Value {
        &self.internal_value
    }

    /// Sets the internal [[Value]] slot.
    pub fn set_internal_value(&mut self, v: Value) {
        self.internal_value = v;
    }

    /// The value of the internal [[Prototype]] slot.
    pub fn internal_prototype(&self) -> &Value {
        &self.internal_prototype
    }

    /// Sets the internal [[Prototype]] slot.
    pub fn set_internal_prototype(&mut self, v: Value) {
        self.internal_prototype = v;
    }

    /// The internal [[Scope]] slot; `None` means the empty chain.
    ///
    /// Fails when the scope is 'unknown'.
    pub fn scope_chain(&self) -> Result<Option<&ScopeChain>> {
        if self.scope_unknown {
            return Err(Error::invariant(
                "Reading the scope chain when scope is 'unknown'",
            ));
        }
        Ok(self.scope.as_ref())
    }

    /// Sets the internal [[Scope]] slot and clears the 'unknown' marker.
    pub fn set_scope_chain(&mut self, scope: Option<ScopeChain>) {
        self.scope = scope;
        self.scope_unknown = false;
    }

    /// Adds to the internal [[Scope]] slot by framewise union.
    ///
    /// Returns true if the stored chain changed. Fails when the scope is
    /// 'unknown'.
    pub fn add_to_scope_chain(&mut self, new_scope: Option<&ScopeChain>) -> Result<bool> {
        if self.scope_unknown {
            return Err(Error::invariant(
                "Adding to the scope chain when scope is 'unknown'",
            ));
        }
        let result = ScopeChain::add(self.scope.as_ref(), new_scope);
        let changed = result.is_some() && result != self.scope;
        self.scope = result;
        Ok(changed)
    }

    /// True if the internal [[Scope]] slot is 'unknown'.
    pub fn is_scope_chain_unknown(&self) -> bool {
        self.scope_unknown
    }

    /// Summarizes the object labels in this object.
    ///
    /// Applied when a call context or allocation site transitions from
    /// singleton to summary abstraction. Modified flags are preserved; the
    /// property map is left writable.
    pub fn summarize(&mut self, s: &Summarized) {
        log::trace!(
            "summarizing object with {} explicit properties",
            self.properties.len()
        );
        let new_properties = self
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), v.summarize(s)))
            .collect();
        self.replace_properties(new_properties);
        self.default_array = self.default_array.summarize(s);
        self.default_nonarray = self.default_nonarray.summarize(s);
        self.internal_prototype = self.internal_prototype.summarize(s);
        self.internal_value = self.internal_value.summarize(s);
        let scope = ScopeChain::summarize(self.scope.as_ref(), s);
        self.scope = scope;
    }

    /// Replaces all definitely non-modified parts of this object by the
    /// corresponding parts of the other object.
    ///
    /// This is the per-edge differential merge: modified slots keep their
    /// value, everything else is taken from the peer. An explicit
    /// non-modified property with no explicit counterpart in the other
    /// object is dropped and falls back to the other object's default.
    pub fn replace_non_modified_parts(&mut self, other: &AbstractObject) {
        let mut new_properties = BTreeMap::new();
        for (name, v) in self.properties.iter() {
            if v.is_maybe_modified() {
                new_properties.insert(name.clone(), v.clone());
            } else if let Some(other_v) = other.properties.get(name) {
                new_properties.insert(name.clone(), other_v.clone());
            }
        }
        let array_modified = self.default_array.is_maybe_modified();
        let nonarray_modified = self.default_nonarray.is_maybe_modified();
        if !array_modified || !nonarray_modified {
            for (name, v) in other.properties.iter() {
                if new_properties.contains_key(name) {
                    continue;
                }
                let relevant_modified = if is_array_index(name) {
                    array_modified
                } else {
                    nonarray_modified
                };
                if !relevant_modified {
                    new_properties.insert(name.clone(), v.clone());
                }
            }
        }
        self.replace_properties(new_properties);
        if !array_modified {
            self.default_array = other.default_array.clone();
        }
        if !nonarray_modified {
            self.default_nonarray = other.default_nonarray.clone();
        }
        if !self.internal_prototype.is_maybe_modified() {
            self.internal_prototype = other.internal_prototype.clone();
        }
        if !self.internal_value.is_maybe_modified() {
            self.internal_value = other.internal_value.clone();
        }
        if self.scope_unknown && !other.scope_unknown {
            self.scope = other.scope.clone();
            self.scope_unknown = false;
        }
    }

    /// Clears the modified flag on every slot.
    ///
    /// Used at fixpoint boundaries so that subsequent edges can distinguish
    /// changes made by the callee.
    pub fn clear_modified(&mut self) {
        let new_properties = self
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), v.restrict_to_not_modified()))
            .collect();
        self.replace_properties(new_properties);
        self.default_array = self.default_array.restrict_to_not_modified();
        self.default_nonarray = self.default_nonarray.restrict_to_not_modified();
        self.internal_prototype = self.internal_prototype.restrict_to_not_modified();
        self.internal_value = self.internal_value.restrict_to_not_modified();
    }

    /// Replaces all occurrences of one object label. Modified flags are not
    /// touched; 'unknown' values are unaffected.
    ///
    /// The cache deduplicates rewrites of scope chains shared across
    /// objects.
    pub fn replace_object_label(
        &mut self,
        old: ObjectLabel,
        new: ObjectLabel,
        scope_cache: &mut HashMap<ScopeChain, ScopeChain>,
    ) {
        let new_properties = self
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), v.replace_object_label(old, new)))
            .collect();
        self.replace_properties(new_properties);
        let scope = ScopeChain::replace_object_label(self.scope.as_ref(), old, new, scope_cache);
        self.scope = scope;
        self.default_array = self.default_array.replace_object_label(old, new);
        self.default_nonarray = self.default_nonarray.replace_object_label(old, new);
        self.internal_prototype = self.internal_prototype.replace_object_label(old, new);
        self.internal_value = self.internal_value.replace_object_label(old, new);
    }

    /// Replaces object labels according to the given map. Labels outside the
    /// key set are unchanged; modified flags are not touched.
    pub fn replace_object_labels(
        &mut self,
        m: &HashMap<ObjectLabel, ObjectLabel>,
        scope_cache: &mut HashMap<ScopeChain, ScopeChain>,
    ) {
        let new_properties = self
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), v.replace_object_labels(m)))
            .collect();
        self.replace_properties(new_properties);
        let scope = ScopeChain::replace_object_labels(self.scope.as_ref(), m, scope_cache);
        self.scope = scope;
        self.default_array = self.default_array.replace_object_labels(m);
        self.default_nonarray = self.default_nonarray.replace_object_labels(m);
        self.internal_prototype = self.internal_prototype.replace_object_labels(m);
        self.internal_value = self.internal_value.replace_object_labels(m);
    }

    /// Trims this object to the portion not subsumed by the reference
    /// object's 'unknown' parts.
    ///
    /// Slots that are 'unknown' in the reference were never propagated along
    /// the edge and collapse to 'unknown' here as well. Explicit properties
    /// consult the reference through its defaults.
    pub fn trim(&mut self, reference: &AbstractObject) {
        log::trace!(
            "trimming object with {} explicit properties",
            self.properties.len()
        );
        let new_properties = self
            .properties
            .iter()
            .map(|(name, v)| (name.clone(), v.trim(reference.get_property(name))))
            .collect();
        self.replace_properties(new_properties);
        self.default_array = self.default_array.trim(&reference.default_array);
        self.default_nonarray = self.default_nonarray.trim(&reference.default_nonarray);
        self.internal_value = self.internal_value.trim(&reference.internal_value);
        self.internal_prototype = self.internal_prototype.trim(&reference.internal_prototype);
        if reference.scope_unknown {
            // TODO: refine polymorphic scope chains through a scope-chain
            // trim operation instead of coarsening to 'unknown'
            self.scope = None;
            self.scope_unknown = true;
        }
    }

    /// Removes the parts of this object that are also in the given object.
    ///
    /// Assumes this object subsumes the given one. The defaults may cover
    /// different property sets in the two operands; the given object's
    /// defaults have already been propagated onward by the caller, so
    /// slotwise removal is sound.
    pub fn remove(&mut self, other: &AbstractObject) {
        let new_properties = self
            .properties
            .iter()
            .map(|(name, v)| (name.clone(), v.remove(other.get_property(name))))
            .collect();
        self.replace_properties(new_properties);
        self.default_array = self.default_array.remove(&other.default_array);
        self.default_nonarray = self.default_nonarray.remove(&other.default_nonarray);
        self.internal_prototype = self.internal_prototype.remove(&other.internal_prototype);
        self.internal_value = self.internal_value.remove(&other.internal_value);
        let scope = ScopeChain::remove(self.scope.as_ref(), other.scope.as_ref());
        self.scope = scope;
    }

    /// Returns the value designated by the given property reference.
    pub fn get_value(&self, prop: &PropertyRef) -> &Value {
        match prop {
            PropertyRef::Ordinary(name) => self.get_property(name),
            PropertyRef::DefaultArray => &self.default_array,
            PropertyRef::DefaultNonArray => &self.default_nonarray,
            PropertyRef::InternalValue => &self.internal_value,
            PropertyRef::InternalPrototype => &self.internal_prototype,
        }
    }

    /// Writes the value designated by the given property reference.
    ///
    /// Writing a default property validates the default invariant.
    pub fn set_value(&mut self, prop: &PropertyRef, v: Value) -> Result<()> {
        match prop {
            PropertyRef::Ordinary(name) => {
                self.set_property(name.clone(), v);
                Ok(())
            }
            PropertyRef::DefaultArray => self.set_default_array_property(v),
            PropertyRef::DefaultNonArray => self.set_default_nonarray_property(v),
            PropertyRef::InternalValue => {
                self.internal_value = v;
                Ok(())
            }
            PropertyRef::InternalPrototype => {
                self.internal_prototype = v;
                Ok(())
            }
        }
    }

    /// Appends a description of the changes from the old object to this
    /// object, in sorted property order.
    ///
    /// Assumes the old object is less than this one and that no explicit
    /// property has moved into a default.
    pub fn diff(&self, old: &AbstractObject, b: &mut String) {
        for (name, v) in self.properties.iter() {
            match old.properties.get(name) {
                None => {
                    b.push_str("\n        new property: ");
                    b.push_str(name);
                }
                Some(old_v) if old_v != v => {
                    b.push_str("\n        changed property: ");
                    b.push_str(name);
                    b.push_str(": ");
                    v.diff(old_v, b);
                    b.push_str(&format!(" was: {}", old_v));
                }
                Some(_) => {}
            }
        }
        if self.default_array != old.default_array {
            b.push_str("\n        changed default array property: ");
            self.default_array.diff(&old.default_array, b);
            b.push_str(&format!(" was: {}", old.default_array));
        }
        if self.default_nonarray != old.default_nonarray {
            b.push_str("\n        changed default nonarray property: ");
            self.default_nonarray.diff(&old.default_nonarray, b);
            b.push_str(&format!(" was: {}", old.default_nonarray));
        }
        if self.internal_prototype != old.internal_prototype {
            b.push_str("\n        changed internal prototype: ");
            self.internal_prototype.diff(&old.internal_prototype, b);
            b.push_str(&format!(" was: {}", old.internal_prototype));
        }
        if self.internal_value != old.internal_value {
            b.push_str("\n        changed internal value: ");
            self.internal_value.diff(&old.internal_value, b);
            b.push_str(&format!(" was: {}", old.internal_value));
        }
        if self.scope_unknown != old.scope_unknown {
            b.push_str("\n        changed scope unknown");
        }
    }

    /// Renders the maybe-modified, maybe-present properties. Internal slots
    /// for prototype and value are included, the scope is not.
    pub fn print_modified(&self) -> String {
        let mut b = String::new();
        for (name, v) in self.properties.iter() {
            if v.is_maybe_modified() && v.is_maybe_present_or_unknown() {
                b.push_str(&format!("\n    {}: {}", escape(name), v));
            }
        }
        if self.default_array.is_maybe_modified() && self.default_array.is_maybe_present_or_unknown()
        {
            b.push_str(&format!("\n    [[DefaultArray]] = {}", self.default_array));
        }
        if self.default_nonarray.is_maybe_modified()
            && self.default_nonarray.is_maybe_present_or_unknown()
        {
            b.push_str(&format!(
                "\n    [[DefaultNonArray]] = {}",
                self.default_nonarray
            ));
        }
        if self.internal_prototype.is_maybe_modified()
            && self.internal_prototype.is_maybe_present_or_unknown()
        {
            b.push_str(&format!("\n    [[Prototype]] = {}", self.internal_prototype));
        }
        if self.internal_value.is_maybe_modified()
            && self.internal_value.is_maybe_present_or_unknown()
        {
            b.push_str(&format!("\n    [[Value]] = {}", self.internal_value));
        }
        b
    }

    /// Returns the set of all object labels used in this abstract object,
    /// including every scope-chain frame. 'unknown' values contribute
    /// nothing.
    pub fn get_all_object_labels(&self) -> BTreeSet<ObjectLabel> {
        let mut labels = BTreeSet::new();
        for v in self.properties.values() {
            labels.extend(v.object_labels().iter().copied());
        }
        labels.extend(self.default_array.object_labels().iter().copied());
        labels.extend(self.default_nonarray.object_labels().iter().copied());
        labels.extend(self.internal_prototype.object_labels().iter().copied());
        labels.extend(self.internal_value.object_labels().iter().copied());
        if let Some(scope) = &self.scope {
            for frame in scope.frames() {
                labels.extend(frame.iter().copied());
            }
        }
        labels
    }

    /// Total number of abstract objects constructed since the last reset.
    pub fn number_of_objects_created() -> usize {
        NUM_OBJECTS_CREATED.load(Ordering::Relaxed)
    }

    /// Total number of make-writable operations since the last reset.
    pub fn number_of_make_writable_calls() -> usize {
        NUM_MAKE_WRITABLE_CALLS.load(Ordering::Relaxed)
    }

    /// Resets the process-wide telemetry counters.
    pub fn reset_counters() {
        NUM_OBJECTS_CREATED.store(0, Ordering::Relaxed);
        NUM_MAKE_WRITABLE_CALLS.store(0, Ordering::Relaxed);
    }

    /// Snapshot of the telemetry counters.
    pub fn stats() -> LatticeStats {
        LatticeStats {
            objects_created: Self::number_of_objects_created(),
            make_writable_calls: Self::number_of_make_writable_calls(),
        }
    }
}

impl PartialEq for AbstractObject {
    fn eq(&self, other: &Self) -> bool {
        // the copy-on-write flag is bookkeeping, not state
        self.scope_unknown == other.scope_unknown
            && self.scope == other.scope
            && *self.properties == *other.properties
            && self.default_nonarray == other.default_nonarray
            && self.default_array == other.default_array
            && self.internal_prototype == other.internal_prototype
            && self.internal_value == other.internal_value
    }
}

impl Eq for AbstractObject {}

impl Hash for AbstractObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        fn field_hash<T: Hash + ?Sized>(t: &T) -> u64 {
            let mut h = DefaultHasher::new();
            t.hash(&mut h);
            h.finish()
        }
        let mut code = field_hash(&*self.properties).wrapping_mul(3);
        if let Some(scope) = &self.scope {
            code = code.wrapping_add(field_hash(scope).wrapping_mul(7));
        }
        if self.scope_unknown {
            code = code.wrapping_add(13);
        }
        code = code
            .wrapping_add(field_hash(&self.internal_prototype).wrapping_mul(11))
            .wrapping_add(field_hash(&self.internal_value).wrapping_mul(113))
            .wrapping_add(field_hash(&self.default_nonarray).wrapping_mul(23))
            .wrapping_add(field_hash(&self.default_array).wrapping_mul(31));
        state.write_u64(code);
    }
}

impl fmt::Display for AbstractObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut any = false;
        write!(f, "{{")?;
        if self.default_array.is_none() {
            any = true;
            write!(f, "<none>")?;
        }
        for (name, v) in self.properties.iter() {
            if any {
                write!(f, ",")?;
            } else {
                any = true;
            }
            write!(f, "{}:{}", escape(name), v)?;
        }
        if self.default_array.is_maybe_present_or_unknown() {
            if any {
                write!(f, ",")?;
            } else {
                any = true;
            }
            write!(f, "[[DefaultArray]]={}", self.default_array)?;
        }
        if self.default_nonarray.is_maybe_present_or_unknown() {
            if any {
                write!(f, ",")?;
            } else {
                any = true;
            }
            write!(f, "[[DefaultNonArray]]={}", self.default_nonarray)?;
        }
        if self.internal_prototype.is_maybe_present_or_unknown() {
            if any {
                write!(f, ",")?;
            } else {
                any = true;
            }
            write!(f, "[[Prototype]]={}", self.internal_prototype)?;
        }
        if self.internal_value.is_maybe_present_or_unknown() {
            if any {
                write!(f, ",")?;
            } else {
                any = true;
            }
            write!(f, "[[Value]]={}", self.internal_value)?;
        }
        if self.scope.is_some() || self.scope_unknown {
            if any {
                write!(f, ",")?;
            }
            write!(f, "[[Scope]]=")?;
            match &self.scope {
                Some(scope) => write!(f, "{}", scope)?,
                None => write!(f, "?")?,
            }
        }
        write!(f, "}}")
    }
}
