//! Dispatch Laws
//!
//! The quantified invariants the dispatcher must satisfy:
//! - **Untyped absorbs**: dispatch on untyped is untyped, silently
//! - **Union commutativity**: return types agree up to union-equivalence
//! - **Intersection short-circuit**: a method on one side only dispatches
//!   there alone
//! - **Setter return law**: `x=`-style methods return their right-hand side
//! - **Value-type round-trip**: unwrap of a wrapped type is the type
//! - **Shape merge identity**: merging the empty shape changes nothing

use crate::testing::TestEnv;
use crate::unwrap::unwrap_type;
use rbz_common::TypeId;
use rbz_symbols::{ClassFlags, core_classes};
use rbz_types::{is_subtype, lattice, ops};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn untyped_absorbs_dispatch() {
    init_tracing();
    let mut env = TestEnv::new();
    env.symbols.intern_name("anything_at_all");
    let integer = env.types.class_type(core_classes::INTEGER);
    let result = env.call(TypeId::UNTYPED, "anything_at_all", vec![integer, TypeId::NIL]);
    assert!(env.types.is_untyped(result.return_type));
    assert!(result.main.method.is_none());
    assert!(result.main.errors.is_empty());
}

#[test]
fn union_dispatch_commutes() {
    let mut env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let string = env.types.class_type(core_classes::STRING);
    let a = env.symbols.enter_class("A", core_classes::OBJECT, ClassFlags::empty());
    let b = env.symbols.enter_class("B", core_classes::OBJECT, ClassFlags::empty());
    env.symbols.enter_method(a, "m").returns(integer).define();
    env.symbols.enter_method(b, "m").returns(string).define();

    let a_ty = env.types.class_type(a);
    let b_ty = env.types.class_type(b);
    let ab = lattice::any(&env.types, &env.symbols, a_ty, b_ty);
    let ba = lattice::any(&env.types, &env.symbols, b_ty, a_ty);

    let ab_ret = env.call(ab, "m", vec![]).return_type;
    let ba_ret = env.call(ba, "m", vec![]).return_type;
    assert!(is_subtype(&env.types, &env.symbols, ab_ret, ba_ret));
    assert!(is_subtype(&env.types, &env.symbols, ba_ret, ab_ret));
}

#[test]
fn union_dispatch_surfaces_both_sides_errors() {
    let mut env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let a = env.symbols.enter_class("A", core_classes::OBJECT, ClassFlags::empty());
    let b = env.symbols.enter_class("B", core_classes::OBJECT, ClassFlags::empty());
    env.symbols.enter_method(a, "m").returns(integer).define();
    // B lacks `m` entirely.

    let a_ty = env.types.class_type(a);
    let b_ty = env.types.class_type(b);
    let ab = lattice::any(&env.types, &env.symbols, a_ty, b_ty);
    let mut result = env.call(ab, "m", vec![]);
    let errors = result.take_errors();
    assert_eq!(errors.len(), 1, "the B side reports the unknown method");
    assert!(errors[0].message.contains("does not exist"));
    assert!(errors[0].message.contains("component of"));
}

#[test]
fn intersection_short_circuits_to_the_defining_side() {
    let mut env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let a = env.symbols.enter_class("A", core_classes::OBJECT, ClassFlags::empty());
    // The realistic intersection shape: a class met with a module.
    let b = env
        .symbols
        .enter_class("B", rbz_common::ClassId::NONE, ClassFlags::MODULE);
    let m_on_b = env.symbols.enter_method(b, "m").returns(integer).define();

    let a_ty = env.types.class_type(a);
    let b_ty = env.types.class_type(b);
    let both = lattice::all(&env.types, &env.symbols, a_ty, b_ty);
    let mut result = env.call(both, "m", vec![]);
    assert_eq!(result.main.method, Some(m_on_b));
    assert_eq!(result.return_type, integer);
    assert!(result.take_errors().is_empty(), "no UnknownMethod from the A side");
}

#[test]
fn setter_return_law() {
    let mut env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let widget = env.symbols.enter_class("Widget", core_classes::OBJECT, ClassFlags::empty());
    env.symbols
        .enter_method(widget, "value=")
        .arg("v", integer)
        .returns(TypeId::VOID)
        .define();

    let recv = env.types.class_type(widget);
    let seven = env.types.literal_integer(7);
    let result = env.call(recv, "value=", vec![seven]);
    assert_eq!(result.return_type, seven, "setters return their right-hand side");
}

#[test]
fn index_setter_returns_second_argument() {
    let mut env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let string = env.types.class_type(core_classes::STRING);
    let widget = env.symbols.enter_class("Widget", core_classes::OBJECT, ClassFlags::empty());
    env.symbols
        .enter_method(widget, "[]=")
        .arg("key", integer)
        .arg("value", string)
        .returns(TypeId::VOID)
        .define();

    let recv = env.types.class_type(widget);
    let one = env.types.literal_integer(1);
    let result = env.call(recv, "[]=", vec![one, string]);
    assert_eq!(result.return_type, string);
}

#[test]
fn comparison_operators_are_not_setters() {
    let mut env = TestEnv::new();
    let widget = env.symbols.enter_class("Widget", core_classes::OBJECT, ClassFlags::empty());
    let boolean = env.types.boolean();
    env.symbols
        .enter_method(widget, "==")
        .arg("other", TypeId::UNTYPED)
        .returns(boolean)
        .define();
    let recv = env.types.class_type(widget);
    let one = env.types.literal_integer(1);
    let result = env.call(recv, "==", vec![one]);
    assert_eq!(result.return_type, boolean);
}

#[test]
fn value_type_round_trip() {
    let env = TestEnv::new();
    let ctx = env.ctx();
    let mut errors = Vec::new();

    let integer = env.types.class_type(core_classes::INTEGER);
    let wrapped = env.types.meta(integer);
    assert_eq!(
        unwrap_type(&ctx, rbz_common::Loc::none(), wrapped, true, &mut errors),
        integer
    );

    // A class object unwraps to its attached class's external type.
    let singleton = env.symbols.lookup_singleton_class(core_classes::ARRAY).unwrap();
    let class_value = env.types.class_type(singleton);
    assert_eq!(
        unwrap_type(&ctx, rbz_common::Loc::none(), class_value, true, &mut errors),
        ops::external_type(&env.types, &env.symbols, core_classes::ARRAY)
    );
    assert!(errors.is_empty());

    // Literals in type position error and recover as untyped.
    let lit = env.types.literal_integer(3);
    let unwrapped = unwrap_type(&ctx, rbz_common::Loc::none(), lit, true, &mut errors);
    assert!(env.types.is_untyped(unwrapped));
    assert_eq!(errors.len(), 1);
}

#[test]
fn shape_merge_identity_and_extension() {
    let mut env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let string = env.types.class_type(core_classes::STRING);
    let k = env.symbols.intern_name("k");
    let j = env.symbols.intern_name("j");
    let key_k = env.types.literal_symbol(k);
    let key_j = env.types.literal_symbol(j);
    let shape = env.types.shape(vec![key_k], vec![integer]);

    // merge(S, {}) = S
    let result = env.call(shape, "merge", vec![]);
    assert_eq!(result.return_type, shape);

    // merge(S, {j: String}) = S ∪ {j: String}
    let args = env.kw_call_args(shape, "merge", vec![], vec![("j", string)]);
    let result = env.dispatch(&args);
    assert_eq!(
        result.return_type,
        env.types.shape(vec![key_k, key_j], vec![integer, string])
    );

    // merge(S, {k: String}) replaces the existing key.
    let args = env.kw_call_args(shape, "merge", vec![], vec![("k", string)]);
    let result = env.dispatch(&args);
    assert_eq!(result.return_type, env.types.shape(vec![key_k], vec![string]));
}

#[test]
fn void_receiver_diagnoses() {
    let mut env = TestEnv::new();
    env.symbols.intern_name("whatever");
    let mut result = env.call(TypeId::VOID, "whatever", vec![]);
    let errors = result.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, rbz_common::diagnostic_codes::CALL_ON_VOID);
}

#[test]
fn suppressed_dispatch_produces_no_diagnostics() {
    let mut env = TestEnv::new();
    env.symbols.intern_name("missing_method");
    let integer = env.types.class_type(core_classes::INTEGER);
    let mut args = env.call_args(integer, "missing_method", vec![]);
    args.suppress_errors = true;
    let mut result = env.dispatch(&args);
    assert!(result.take_errors().is_empty());
    assert!(env.types.is_untyped(result.return_type));
}
