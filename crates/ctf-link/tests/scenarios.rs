//! End-to-end scenarios and the testable properties from the crate's design
//! documentation, exercised against the public `Linker` API.

use ctf_link::engine::ShareMode;
use ctf_link::types::TypeKind;
use ctf_link::{Archive, Linker, TypeId};

fn int_type() -> TypeKind {
    TypeKind::Integer { bits: 32, signed: true }
}

fn long_type() -> TypeKind {
    TypeKind::Integer { bits: 64, signed: true }
}

/// Scenario A: two inputs define the same struct identically; it should be
/// shared in the output with no per-CU split.
#[test]
fn scenario_a_identical_struct_is_shared() {
    let mut linker = Linker::new();

    let a = linker.new_input_container();
    let a_int = linker.container_mut(a).define_type(None, int_type());
    linker.container_mut(a).define_type(Some("point"), TypeKind::Struct {
        fields: vec![("x".into(), a_int), ("y".into(), a_int)],
    });
    let mut arc_a = Archive::new();
    arc_a.set_default(a);
    linker.add_ctf("a.o", arc_a).unwrap();

    let b = linker.new_input_container();
    let b_int = linker.container_mut(b).define_type(None, int_type());
    linker.container_mut(b).define_type(Some("point"), TypeKind::Struct {
        fields: vec![("x".into(), b_int), ("y".into(), b_int)],
    });
    let mut arc_b = Archive::new();
    arc_b.set_default(b);
    linker.add_ctf("b.o", arc_b).unwrap();

    linker.link(ShareMode::Unconflicted).unwrap();

    assert_eq!(linker.cu_output_count(), 0, "identical definitions must not force a per-CU split");
    let out = linker.out();
    assert_eq!(linker.container(out).type_count(), 2, "int + point, deduplicated across both inputs");
}

/// Scenario B: two inputs define `point` with different fields; both must
/// survive, isolated in their own per-CU children.
#[test]
fn scenario_b_conflicting_struct_splits_per_cu() {
    let mut linker = Linker::new();

    let a = linker.new_input_container();
    let a_int = linker.container_mut(a).define_type(None, int_type());
    linker.container_mut(a).define_type(Some("point"), TypeKind::Struct {
        fields: vec![("x".into(), a_int), ("y".into(), a_int)],
    });
    let mut arc_a = Archive::new();
    arc_a.set_default(a);
    linker.add_ctf("a.o", arc_a).unwrap();

    let b = linker.new_input_container();
    let b_long = linker.container_mut(b).define_type(None, long_type());
    linker.container_mut(b).define_type(Some("point"), TypeKind::Struct {
        fields: vec![("x".into(), b_long), ("y".into(), b_long)],
    });
    let mut arc_b = Archive::new();
    arc_b.set_default(b);
    linker.add_ctf("b.o", arc_b).unwrap();

    linker.link(ShareMode::Unconflicted).unwrap();

    // `a` (processed first) claims the shared slot for `point` uncontested;
    // `b`'s conflicting definition is isolated into its own per-CU child.
    assert_eq!(linker.cu_output_count(), 1);
    let out = linker.out();
    assert!(linker.container(out).type_id_by_name("point").is_some());
}

/// Scenario C: a variable's type is unconflicted, so it should land directly
/// in the shared output.
#[test]
fn scenario_c_unconflicted_variable_in_shared_output() {
    let mut linker = Linker::new();

    let a = linker.new_input_container();
    let a_int = linker.container_mut(a).define_type(Some("int"), int_type());
    linker.container_mut(a).define_variable("counter", a_int);
    let mut arc_a = Archive::new();
    arc_a.set_default(a);
    linker.add_ctf("a.o", arc_a).unwrap();

    linker.link(ShareMode::Unconflicted).unwrap();

    let out = linker.out();
    assert!(linker.container(out).variable("counter").is_some());
}

/// Scenario D: a non-default archive member is imported against the default
/// member, and its conflicting type lands in a per-CU child named after the
/// member.
#[test]
fn scenario_d_non_default_member_splits_into_named_cu() {
    let mut linker = Linker::new();

    let default = linker.new_input_container();
    linker.container_mut(default).define_type(Some("widget"), int_type());

    let member = linker.new_input_container();
    linker.container_mut(member).define_type(Some("widget"), long_type());

    let mut archive = Archive::new();
    archive.set_default(default);
    archive.add_member("unit_b.c", member);
    linker.add_ctf("lib.a", archive).unwrap();

    linker.link(ShareMode::Unconflicted).unwrap();

    assert_eq!(linker.cu_output_count(), 1);
    let out = linker.out();
    assert!(linker.container(out).type_id_by_name("widget").is_some(), "default member's widget lands in shared output");

    let (_, cu_id) = &linker.cu_outputs_named()[0];
    assert!(
        linker.container(*cu_id).type_id_by_name("widget").is_some(),
        "non-default member's widget is isolated in its own per-CU child"
    );
}

/// Scenario E: an archive with no default member still links its named
/// members without error.
#[test]
fn scenario_e_missing_default_member_is_tolerated() {
    let mut linker = Linker::new();

    let member = linker.new_input_container();
    linker.container_mut(member).define_type(Some("only"), int_type());

    let mut archive = Archive::new();
    archive.add_member("unit.c", member);
    linker.add_ctf("lib.a", archive).unwrap();

    assert!(linker.link(ShareMode::Unconflicted).is_ok());

    // With no default member, `unit.c` is processed as a non-default member
    // throughout, so its type is isolated in a per-CU child rather than
    // shared: there is nothing to compare it against for sharing purposes.
    assert_eq!(linker.cu_output_count(), 1);
    let (_, cu_id) = &linker.cu_outputs_named()[0];
    assert!(linker.container(*cu_id).type_id_by_name("only").is_some());
}

/// Scenario F: registering an input after `link()` has run is rejected.
#[test]
fn scenario_f_added_late_is_rejected() {
    let mut linker = Linker::new();
    linker.link(ShareMode::Unconflicted).unwrap();

    let late = Archive::new();
    let err = linker.add_ctf("late.o", late).unwrap_err();
    assert!(matches!(err, ctf_link::LinkError::AddedLate));
}

/// `ShareMode::Duplicated` is declared but not implemented: `link` must
/// reject it outright and leave every output untouched.
#[test]
fn share_mode_duplicated_is_not_yet_implemented() {
    let mut linker = Linker::new();

    let a = linker.new_input_container();
    linker.container_mut(a).define_type(Some("x"), int_type());
    let mut arc_a = Archive::new();
    arc_a.set_default(a);
    linker.add_ctf("a.o", arc_a).unwrap();

    let err = linker.link(ShareMode::Duplicated).unwrap_err();
    assert!(matches!(err, ctf_link::LinkError::NotYetImplemented));

    let out = linker.out();
    assert_eq!(linker.container(out).type_count(), 0, "a rejected mode must not fold any input in");
    assert_eq!(linker.cu_output_count(), 0);
}

/// Property 1 (idempotence of rediscovery): adding the same type twice from
/// the same input yields the same destination id both times.
#[test]
fn property_idempotence_of_rediscovery() {
    use ctf_link::container::{add_type, Container};
    use ctf_util::IndexVec;

    let mut arena: IndexVec<ctf_link::ContainerId, Container> = IndexVec::new();
    let out = arena.push(Container::new_root());

    let mut input = Container::new_root();
    let t = input.define_type(Some("thing"), int_type());
    let input_id = arena.push(input);

    let first = add_type(&mut arena, out, input_id, t).unwrap();
    let second = add_type(&mut arena, out, input_id, t).unwrap();
    assert_eq!(first, second);
}

/// Property 2 (parent-preference): once a variable lands in the shared
/// output, no per-CU child also carries it with the same mapped type.
#[test]
fn property_parent_preference() {
    let mut linker = Linker::new();

    let a = linker.new_input_container();
    let a_int = linker.container_mut(a).define_type(Some("int"), int_type());
    linker.container_mut(a).define_variable("shared_var", a_int);
    linker.container_mut(a).define_type(Some("conflicting"), int_type());
    let mut arc_a = Archive::new();
    arc_a.set_default(a);
    linker.add_ctf("a.o", arc_a).unwrap();

    let b = linker.new_input_container();
    linker.container_mut(b).define_type(Some("conflicting"), long_type());
    let mut arc_b = Archive::new();
    arc_b.set_default(b);
    linker.add_ctf("b.o", arc_b).unwrap();

    linker.link(ShareMode::Unconflicted).unwrap();

    let out = linker.out();
    assert!(linker.container(out).variable("shared_var").is_some());
    for (_, id) in linker.cu_outputs_named() {
        assert!(linker.container(id).variable("shared_var").is_none());
    }
}

/// Property 2, conflicting branch: when a per-CU child's variable name
/// collides with a *different* mapping already claimed in the parent, the
/// child keeps its own binding rather than losing it — expressed as a
/// parent-half id pointing at the type's real (parent) location, since the
/// type itself was never copied into the child.
#[test]
fn property_parent_preference_childifies_on_conflicting_variable_name() {
    let mut linker = Linker::new();

    // `other.o` claims "v" in the shared output first, bound to `long`.
    let other = linker.new_input_container();
    let other_long = linker.container_mut(other).define_type(Some("long_type"), long_type());
    linker.container_mut(other).define_variable("v", other_long);
    let mut arc_other = Archive::new();
    arc_other.set_default(other);
    linker.add_ctf("other.o", arc_other).unwrap();

    // `lib.a`'s default member defines `int_type`, shared uncontested.
    let default = linker.new_input_container();
    let default_int = linker.container_mut(default).define_type(Some("int_type"), int_type());

    // `lib.a`'s non-default member always lands in its own per-CU child (it
    // is processed with `in_input_cu_file = true`, so its own `widget` type
    // never competes for the shared slot). Its "v" references `int_type`
    // back in the default member via the parent-half id that `define_type`
    // handed out for it — exactly the form a CTF member uses to point at a
    // type that lives in the archive's default member rather than locally.
    let member = linker.new_input_container();
    linker.container_mut(member).define_type(Some("widget"), long_type());
    linker.container_mut(member).define_variable("v", default_int);

    let mut archive = Archive::new();
    archive.set_default(default);
    archive.add_member("unit_m.c", member);
    linker.add_ctf("lib.a", archive).unwrap();

    linker.link(ShareMode::Unconflicted).unwrap();

    let out = linker.out();
    let shared_long = linker.container(out).type_id_by_name("long_type").unwrap();
    let shared_int = linker.container(out).type_id_by_name("int_type").unwrap();

    assert_eq!(
        linker.container(out).variable("v"),
        Some(shared_long),
        "the parent's existing binding must survive the conflicting child untouched"
    );

    assert_eq!(linker.cu_output_count(), 1);
    let cu_outputs = linker.cu_outputs_named();
    let (_, cu_id) = &cu_outputs[0];
    assert_eq!(cu_outputs[0].0, "unit_m.c");

    let child_v = linker
        .container(*cu_id)
        .variable("v")
        .expect("the child must keep its own binding rather than being silently dropped");
    assert_ne!(child_v, shared_long, "the child's v must not alias the parent's conflicting binding");
    assert_eq!(child_v, shared_int, "the child's v resolves to int_type's real location in the parent");
    assert!(!child_v.is_child_half(), "the reference must be parent-half: int_type was never copied into the child");
}

/// Property 3 (conflict isolation): a type conflict in one member does not
/// prevent an unrelated, unconflicted type in the same member from sharing.
#[test]
fn property_conflict_isolation() {
    let mut linker = Linker::new();

    let a = linker.new_input_container();
    linker.container_mut(a).define_type(Some("clashing"), int_type());
    linker.container_mut(a).define_type(Some("peaceful"), int_type());
    let mut arc_a = Archive::new();
    arc_a.set_default(a);
    linker.add_ctf("a.o", arc_a).unwrap();

    let b = linker.new_input_container();
    linker.container_mut(b).define_type(Some("clashing"), long_type());
    linker.container_mut(b).define_type(Some("peaceful"), int_type());
    let mut arc_b = Archive::new();
    arc_b.set_default(b);
    linker.add_ctf("b.o", arc_b).unwrap();

    linker.link(ShareMode::Unconflicted).unwrap();

    assert_eq!(linker.cu_output_count(), 1, "only the later, conflicting definition needs a per-CU child");
    let out = linker.out();
    assert!(linker.container(out).type_id_by_name("peaceful").is_some(), "peaceful is shared despite clashing's conflict");
    assert!(linker.container(out).type_id_by_name("clashing").is_some(), "the first clashing definition keeps the shared slot");
}

/// Property 5 (external-string consistency): after `add_strtab`, every
/// output container - shared and per-CU alike - resolves every registered
/// offset to the same string.
#[test]
fn property_external_string_consistency() {
    let mut linker = Linker::new();

    let a = linker.new_input_container();
    linker.container_mut(a).define_type(Some("x"), int_type());
    let mut arc_a = Archive::new();
    arc_a.set_default(a);
    linker.add_ctf("a.o", arc_a).unwrap();

    let b = linker.new_input_container();
    linker.container_mut(b).define_type(Some("x"), long_type());
    let mut arc_b = Archive::new();
    arc_b.set_default(b);
    linker.add_ctf("b.o", arc_b).unwrap();

    linker.link(ShareMode::Unconflicted).unwrap();
    assert_eq!(linker.cu_output_count(), 1, "setup should have produced exactly one per-CU child");

    let mut pairs = vec![(0u32, "foo".to_string()), (4, "bar".to_string()), (8, "baz".to_string())].into_iter();
    linker.add_strtab(|| pairs.next()).unwrap();

    let out = linker.out();
    for &(offset, s) in &[(0u32, "foo"), (4, "bar"), (8, "baz")] {
        assert_eq!(linker.container(out).resolve_external_string(offset), Some(s));
    }
    for (_, cu_id) in linker.cu_outputs_named() {
        for &(offset, s) in &[(0u32, "foo"), (4, "bar"), (8, "baz")] {
            assert_eq!(linker.container(cu_id).resolve_external_string(offset), Some(s));
        }
    }
}

/// Property 6 (archive slot 0): once a link produces per-CU children, the
/// written archive's first member is the shared output.
#[test]
fn property_archive_slot_zero_is_shared_output() {
    let mut linker = Linker::new();

    let a = linker.new_input_container();
    linker.container_mut(a).define_type(Some("x"), int_type());
    let mut arc_a = Archive::new();
    arc_a.set_default(a);
    linker.add_ctf("a.o", arc_a).unwrap();

    let b = linker.new_input_container();
    linker.container_mut(b).define_type(Some("x"), long_type());
    let mut arc_b = Archive::new();
    arc_b.set_default(b);
    linker.add_ctf("b.o", arc_b).unwrap();

    linker.link(ShareMode::Unconflicted).unwrap();
    let bytes = linker.write(usize::MAX).unwrap();

    let members = ctf_link::read_archive_toc(&bytes).unwrap();
    assert_eq!(members[0].0, ctf_link::CTF_DEFAULT_MEMBER);
    let shared = ctf_link::read_container(&members[0].1).unwrap();
    assert!(shared.cu_name.is_none());
}

/// `shuffle_syms` is a reserved stub: it must succeed without ever touching
/// the supplied producer.
#[test]
fn shuffle_syms_succeeds_without_calling_the_producer() {
    let mut linker = Linker::new();
    let mut calls = 0;
    let result = linker.shuffle_syms(|| {
        calls += 1;
        None
    });
    assert!(result.is_ok());
    assert_eq!(calls, 0);
}
