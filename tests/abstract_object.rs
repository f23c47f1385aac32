use jsflow::{AbstractObject, AllocKind, ObjectLabel, PropertyRef, ScopeChain, Summarized, Value};
use petgraph::graph::NodeIndex;
use std::collections::BTreeSet;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn label(idx: usize) -> ObjectLabel {
    ObjectLabel::new(NodeIndex::new(idx), AllocKind::Object)
}

fn labels(ls: &[ObjectLabel]) -> BTreeSet<ObjectLabel> {
    ls.iter().copied().collect()
}

#[test]
fn test_default_fallback_scenario() {
    init_logging();
    let mut obj = AbstractObject::make_absent_modified();
    let length = Value::make_number(3.0).join_modified();
    obj.set_property("length", length.clone());

    assert_eq!(obj.get_property("length"), &length);
    // unlisted names resolve through the applicable default
    assert_eq!(obj.get_property("x"), &Value::make_absent_modified());
    assert_eq!(obj.get_property("0"), &Value::make_absent_modified());
    // never absent as a lookup result for listed names, may be unknown for
    // unknown objects
    let unknown = AbstractObject::make_unknown();
    assert!(unknown.get_property("anything").is_unknown());
}

#[test]
fn test_copy_equivalence() {
    let mut obj = AbstractObject::make_absent_modified();
    obj.set_property("p", Value::make_string("s"));
    obj.set_internal_value(Value::make_number(1.0));
    obj.set_scope_chain(Some(ScopeChain::single(labels(&[label(1)]))));

    let copy = obj.copy();
    assert_eq!(copy, obj);
    assert_eq!(copy.get_property("p"), obj.get_property("p"));
    assert_eq!(copy.to_string(), obj.to_string());
}

#[test]
fn test_copy_isolation() {
    let v1 = Value::make_number(1.0);
    let v2 = Value::make_number(2.0);

    let mut a = AbstractObject::make_none();
    a.set_property("p", v1.clone());
    let mut b = a.copy();
    b.set_property("p", v2.clone());

    assert_eq!(a.get_property("p"), &v1);
    assert_eq!(b.get_property("p"), &v2);

    // and the other direction
    let mut c = a.copy();
    a.set_property("q", v2.clone());
    assert!(c.properties().get("q").is_none());
    c.set_property("r", v1.clone());
    assert!(a.properties().get("r").is_none());
}

#[test]
fn test_replace_non_modified_parts_scenario() {
    let x_modified = Value::make_number(1.0).join_modified();
    let y_clean = Value::make_number(2.0);
    let mut a = AbstractObject::make_none();
    a.set_property("x", x_modified.clone());
    a.set_property("y", y_clean);

    let d_b = Value::make_string("default").join_absent();
    let mut b = AbstractObject::make_none();
    b.set_property("x", Value::make_number(10.0));
    b.set_property("y", Value::make_number(20.0));
    b.set_property("z", Value::make_number(30.0));
    b.set_default_nonarray_property(d_b.clone()).unwrap();

    a.replace_non_modified_parts(&b);

    // modified slots keep their value, clean slots take the peer's
    assert_eq!(a.get_property("x"), &x_modified);
    assert_eq!(a.get_property("y"), &Value::make_number(20.0));
    assert_eq!(a.get_property("z"), &Value::make_number(30.0));
    assert_eq!(a.default_nonarray_property(), &d_b);
}

#[test]
fn test_replace_non_modified_parts_drops_vanished_properties() {
    let mut a = AbstractObject::make_none();
    a.set_property("only_here", Value::make_number(1.0));

    let mut b = AbstractObject::make_none();
    b.set_default_nonarray_property(Value::make_absent()).unwrap();

    a.replace_non_modified_parts(&b);
    // the clean property had no explicit counterpart: it falls back to the
    // peer's default
    assert!(a.properties().get("only_here").is_none());
    assert_eq!(a.get_property("only_here"), &Value::make_absent());
}

#[test]
fn test_replace_non_modified_parts_absorption() {
    // every slot clean: the result equals the peer
    let mut a = AbstractObject::make_none();
    a.set_property("p", Value::make_number(1.0));

    let mut b = AbstractObject::make_absent_modified();
    b.set_property("p", Value::make_number(9.0));
    b.set_property("q", Value::make_undef());
    b.clear_modified();
    b.set_scope_chain(Some(ScopeChain::single(labels(&[label(4)]))));

    let mut c = AbstractObject::make_unknown();
    c.replace_non_modified_parts(&b);
    assert_eq!(c, b);

    a.replace_non_modified_parts(&b);
    assert_eq!(a.properties(), b.properties());
    assert_eq!(a.default_array_property(), b.default_array_property());
    assert_eq!(a.default_nonarray_property(), b.default_nonarray_property());
}

#[test]
fn test_modified_defaults_shield_peer_properties() {
    let mut a = AbstractObject::make_absent_modified();
    // both defaults modified: peer properties must not leak in
    let mut b = AbstractObject::make_none();
    b.set_property("x", Value::make_number(1.0));
    b.set_property("7", Value::make_number(2.0));

    a.replace_non_modified_parts(&b);
    assert!(a.properties().is_empty());
    assert_eq!(a.default_array_property(), &Value::make_absent_modified());
}

#[test]
fn test_summarize_scenario() {
    init_logging();
    let l1 = label(1);
    let mut obj = AbstractObject::make_none();
    obj.set_property("p", Value::make_object(l1).join_modified());

    let witness = Summarized::from_label(l1);
    obj.summarize(&witness);

    let p = obj.get_property("p");
    assert!(p.object_labels().contains(&l1.summary()));
    assert!(!p.object_labels().contains(&l1));
    assert!(p.is_maybe_modified());
}

#[test]
fn test_summarize_preserves_modified_bits_everywhere() {
    let l1 = label(1);
    let mut obj = AbstractObject::make_absent_modified();
    obj.set_property("clean", Value::make_object(l1));
    obj.set_property("dirty", Value::make_object(l1).join_modified());
    obj.set_internal_value(Value::make_object(l1));

    obj.summarize(&Summarized::from_label(l1));

    assert!(!obj.get_property("clean").is_maybe_modified());
    assert!(obj.get_property("dirty").is_maybe_modified());
    assert!(!obj.internal_value().is_maybe_modified());
    assert!(obj.default_array_property().is_maybe_modified());
}

#[test]
fn test_equality_and_hash_different_routes() {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut a = AbstractObject::make_absent_modified();
    a.set_property("p", Value::make_number(1.0));
    a.set_scope_chain(Some(ScopeChain::single(labels(&[label(2)]))));

    // a different construction route ending in the same field set
    let mut b = AbstractObject::make_none();
    b.set_default_array_property(Value::make_absent_modified()).unwrap();
    b.set_default_nonarray_property(Value::make_absent_modified()).unwrap();
    b.set_internal_prototype(Value::make_absent_modified());
    b.set_internal_value(Value::make_absent_modified());
    b.set_property("p", Value::make_number(2.0));
    b.set_property("p", Value::make_number(1.0));
    b.add_to_scope_chain(Some(&ScopeChain::single(labels(&[label(2)]))))
        .unwrap();

    assert_eq!(a, b);
    assert_eq!(b, a);
    let mut ha = DefaultHasher::new();
    let mut hb = DefaultHasher::new();
    a.hash(&mut ha);
    b.hash(&mut hb);
    assert_eq!(ha.finish(), hb.finish());

    // equality is reflexive and transitive over copies
    let mut b2 = b.copy();
    assert_eq!(b, b2);
    assert_eq!(a, b2);
    b2.set_property("p", Value::make_number(3.0));
    assert_ne!(a, b2);
}

#[test]
fn test_default_invariant_violation() {
    let mut obj = AbstractObject::make_none();
    let bad = Value::make_number(7.0); // maybe-present, not maybe-absent, not unknown
    let err = obj.set_default_nonarray_property(bad).unwrap_err();
    assert!(err.to_string().contains("Analysis invariant violated"));
}

#[test]
fn test_unknown_scope_violations() {
    let mut obj = AbstractObject::make_unknown();
    assert!(obj.scope_chain().is_err());
    assert!(obj
        .add_to_scope_chain(Some(&ScopeChain::single(labels(&[label(1)]))))
        .is_err());
    assert!(obj.is_scope_chain_unknown());
}

#[test]
fn test_clear_modified_then_replace_absorbs() {
    // clear-modified at a function entry makes the whole object replaceable
    let mut entry = AbstractObject::make_absent_modified();
    entry.set_property("p", Value::make_number(1.0).join_modified());
    entry.clear_modified();

    let mut callee_exit = AbstractObject::make_absent_modified();
    callee_exit.set_property("p", Value::make_number(2.0).join_modified());

    entry.replace_non_modified_parts(&callee_exit);
    assert_eq!(entry.get_property("p"), &Value::make_number(2.0).join_modified());
    assert_eq!(
        entry.default_array_property(),
        &Value::make_absent_modified()
    );
}

#[test]
fn test_trim_and_remove_roundtrip() {
    init_logging();
    // edge state: everything the call propagated
    let mut edge = AbstractObject::make_none();
    edge.set_property("p", Value::make_number(1.0));
    edge.set_property("q", Value::make_undef());

    // reference: only "p" was reached, the rest is unknown
    let mut reference = AbstractObject::make_unknown();
    reference.set_property("p", Value::make_number(1.0));

    edge.trim(&reference);
    assert!(!edge.get_property("p").is_unknown());
    assert!(edge.get_property("q").is_unknown());
    assert!(edge.is_scope_chain_unknown());

    // remove: subtract an already-propagated portion
    let mut acc = AbstractObject::make_none();
    acc.set_property(
        "r",
        Value::make_object(label(1)).join(&Value::make_object(label(2))),
    );
    let mut seen = AbstractObject::make_none();
    seen.set_property("r", Value::make_object(label(1)));
    acc.remove(&seen);
    assert_eq!(acc.get_property("r"), &Value::make_object(label(2)));
}

#[test]
fn test_get_value_dispatch_is_uniform() {
    let mut obj = AbstractObject::make_absent_modified();
    obj.set_property("name", Value::make_string("f"));
    obj.set_internal_prototype(Value::make_object(label(1)));

    assert_eq!(
        obj.get_value(&PropertyRef::ordinary("name")),
        obj.get_property("name")
    );
    assert_eq!(
        obj.get_value(&PropertyRef::DefaultArray),
        obj.default_array_property()
    );
    assert_eq!(
        obj.get_value(&PropertyRef::DefaultNonArray),
        obj.default_nonarray_property()
    );
    assert_eq!(obj.get_value(&PropertyRef::InternalValue), obj.internal_value());
    assert_eq!(
        obj.get_value(&PropertyRef::InternalPrototype),
        obj.internal_prototype()
    );
}

#[test]
fn test_deterministic_rendering() {
    let mut obj = AbstractObject::make_absent_modified();
    obj.set_property("b", Value::make_number(2.0));
    obj.set_property("a", Value::make_number(1.0));
    // sorted key order regardless of insertion order
    assert_eq!(obj.to_string(), "{a:num(1),b:num(2)}");

    let mut old = obj.copy();
    old.set_property("a", Value::make_absent_modified());
    let mut delta = String::new();
    obj.diff(&old, &mut delta);
    assert!(delta.contains("changed property: a"));
}

#[test]
fn test_all_object_labels_include_scope() {
    let mut obj = AbstractObject::make_none();
    obj.set_property("p", Value::make_object(label(1)));
    obj.set_default_nonarray_property(
        Value::make_object(label(2)).join_absent(),
    )
    .unwrap();
    obj.set_scope_chain(Some(ScopeChain::new([
        labels(&[label(3)]),
        labels(&[label(4)]),
    ])));
    let expected = labels(&[label(1), label(2), label(3), label(4)]);
    assert_eq!(obj.get_all_object_labels(), expected);
}
