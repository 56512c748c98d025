//! Intrinsic behavior: type constructors, tuple/shape/array refinement,
//! class primitives, and the Magic shims.

use crate::args::TypeAndOrigins;
use crate::testing::TestEnv;
use rbz_common::{DiagnosticCategory, TypeId, diagnostic_codes};
use rbz_symbols::{ClassFlags, core_classes};
use rbz_types::lattice;

fn t_singleton_type(env: &TestEnv) -> TypeId {
    let singleton = env
        .symbols
        .lookup_singleton_class(core_classes::T_MODULE)
        .unwrap();
    env.types.class_type(singleton)
}

#[test]
fn tuple_index_literal_and_wraparound() {
    let env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let string = env.types.class_type(core_classes::STRING);
    let pair = env.types.tuple(vec![integer, string]);

    let zero = env.types.literal_integer(0);
    let result = env.call(pair, "[]", vec![zero]);
    assert_eq!(result.return_type, integer);

    let minus_one = env.types.literal_integer(-1);
    let result = env.call(pair, "[]", vec![minus_one]);
    assert_eq!(result.return_type, string);

    let two = env.types.literal_integer(2);
    let result = env.call(pair, "[]", vec![two]);
    assert_eq!(result.return_type, TypeId::NIL);
}

#[test]
fn tuple_first_last_to_a() {
    let env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let string = env.types.class_type(core_classes::STRING);
    let pair = env.types.tuple(vec![integer, string]);

    assert_eq!(env.call(pair, "first", vec![]).return_type, integer);
    assert_eq!(env.call(pair, "last", vec![]).return_type, string);
    assert_eq!(env.call(pair, "to_a", vec![]).return_type, pair);

    let empty = env.types.tuple(vec![]);
    assert_eq!(env.call(empty, "first", vec![]).return_type, TypeId::NIL);
    assert_eq!(env.call(empty, "min", vec![]).return_type, TypeId::NIL);
}

#[test]
fn tuple_concat_builds_longer_tuples() {
    let env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let string = env.types.class_type(core_classes::STRING);
    let pair = env.types.tuple(vec![integer, string]);
    let single = env.types.tuple(vec![integer]);
    let result = env.call(pair, "concat", vec![single]);
    assert_eq!(
        result.return_type,
        env.types.tuple(vec![integer, string, integer])
    );
}

#[test]
fn t_must_strips_nil_and_diagnoses_never_nil() {
    let env = TestEnv::new();
    let t = t_singleton_type(&env);
    let integer = env.types.class_type(core_classes::INTEGER);

    // On a nilable value: strips, no diagnostic.
    let nilable = lattice::any(&env.types, &env.symbols, integer, TypeId::NIL);
    let mut result = env.call(t, "must", vec![nilable]);
    assert_eq!(result.return_type, integer);
    assert!(result.take_errors().is_empty());

    // On a never-nil value: the value passes through under complaint.
    let mut result = env.call(t, "must", vec![integer]);
    assert_eq!(result.return_type, integer);
    let errors = result.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, diagnostic_codes::INVALID_CAST);
    assert!(errors[0].message.contains("never `nil`"), "got: {}", errors[0].message);

    // Untyped passes through silently.
    let mut result = env.call(t, "must", vec![TypeId::UNTYPED]);
    assert!(env.types.is_untyped(result.return_type));
    assert!(result.take_errors().is_empty());
}

#[test]
fn t_reveal_type_is_informational() {
    let env = TestEnv::new();
    let t = t_singleton_type(&env);
    let integer = env.types.class_type(core_classes::INTEGER);
    let mut result = env.call(t, "reveal_type", vec![integer]);
    assert_eq!(result.return_type, integer);
    let errors = result.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, diagnostic_codes::REVEAL_TYPE);
    assert_eq!(errors[0].category, DiagnosticCategory::Info);
    assert!(errors[0].message.contains("Revealed type: `Integer`"));
}

#[test]
fn t_nilable_and_t_any_build_metatypes() {
    let env = TestEnv::new();
    let t = t_singleton_type(&env);
    let integer_class = env
        .symbols
        .lookup_singleton_class(core_classes::INTEGER)
        .unwrap();
    let integer_value = env.types.class_type(integer_class);
    let string_class = env
        .symbols
        .lookup_singleton_class(core_classes::STRING)
        .unwrap();
    let string_value = env.types.class_type(string_class);
    let integer = env.types.class_type(core_classes::INTEGER);
    let string = env.types.class_type(core_classes::STRING);

    let result = env.call(t, "nilable", vec![integer_value]);
    let expected = env
        .types
        .meta(lattice::any(&env.types, &env.symbols, integer, TypeId::NIL));
    assert_eq!(result.return_type, expected);

    let result = env.call(t, "any", vec![integer_value, string_value]);
    let expected = env
        .types
        .meta(lattice::any(&env.types, &env.symbols, integer, string));
    assert_eq!(result.return_type, expected);

    assert!(env.types.is_untyped(env.call(t, "untyped", vec![]).return_type));
}

#[test]
fn generic_square_brackets_builds_applied_metatype() {
    let env = TestEnv::new();
    let array_singleton = env
        .symbols
        .lookup_singleton_class(core_classes::ARRAY)
        .unwrap();
    let array_value = env.types.class_type(array_singleton);
    let integer_value = env
        .types
        .class_type(env.symbols.lookup_singleton_class(core_classes::INTEGER).unwrap());
    let integer = env.types.class_type(core_classes::INTEGER);

    let mut result = env.call(array_value, "[]", vec![integer_value]);
    assert_eq!(result.return_type, env.types.meta(env.types.array_of(integer)));
    assert!(result.take_errors().is_empty());

    // Wrong arity is reported and recovers with untyped holes.
    let mut result = env.call(array_value, "[]", vec![]);
    let errors = result.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, diagnostic_codes::GENERIC_ARGUMENT_COUNT_MISMATCH);
}

#[test]
fn generic_square_brackets_rejects_keyword_arguments() {
    let mut env = TestEnv::new();
    let hash_singleton = env
        .symbols
        .lookup_singleton_class(core_classes::HASH)
        .unwrap();
    let hash_value = env.types.class_type(hash_singleton);
    env.symbols.intern_name("k");
    let integer_value = env
        .types
        .class_type(env.symbols.lookup_singleton_class(core_classes::INTEGER).unwrap());

    let args = env.kw_call_args(hash_value, "[]", vec![integer_value, integer_value], vec![("k", integer_value)]);
    let mut result = env.dispatch(&args);
    let errors = result.take_errors();
    assert!(
        errors
            .iter()
            .any(|e| e.code == diagnostic_codes::GENERIC_ARGUMENT_KEYWORD_ARGS),
        "keyword args to a generic are rejected with a brace autocorrect"
    );
}

#[test]
fn module_triple_eq_statically_evaluates() {
    let env = TestEnv::new();
    let integer_singleton = env
        .symbols
        .lookup_singleton_class(core_classes::INTEGER)
        .unwrap();
    let integer_value = env.types.class_type(integer_singleton);
    let integer = env.types.class_type(core_classes::INTEGER);
    let string = env.types.class_type(core_classes::STRING);

    let five = env.types.literal_integer(5);
    let result = env.call(integer_value, "===", vec![five]);
    assert_eq!(result.return_type, env.types.literal_boolean(true));

    let result = env.call(integer_value, "===", vec![string]);
    assert_eq!(result.return_type, env.types.literal_boolean(false));

    let union = lattice::any(&env.types, &env.symbols, integer, string);
    let result = env.call(integer_value, "===", vec![union]);
    assert_eq!(result.return_type, env.types.boolean());
}

#[test]
fn object_class_returns_the_singleton() {
    let env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let result = env.call(integer, "class", vec![]);
    let singleton = env
        .symbols
        .lookup_singleton_class(core_classes::INTEGER)
        .unwrap();
    assert_eq!(result.return_type, env.types.class_type(singleton));
}

#[test]
fn class_new_dispatches_initialize() {
    let mut env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let owner = env
        .symbols
        .enter_class("Widget", core_classes::OBJECT, ClassFlags::empty());
    let init = env
        .symbols
        .enter_method(owner, "initialize")
        .arg("x", integer)
        .returns(TypeId::VOID)
        .define();

    let class_value = env
        .types
        .class_type(env.symbols.lookup_singleton_class(owner).unwrap());
    let one = env.types.literal_integer(1);
    let mut result = env.call(class_value, "new", vec![one]);
    assert_eq!(result.return_type, env.types.class_type(owner));
    assert_eq!(result.main.method, Some(init));
    assert!(result.take_errors().is_empty());

    // Constructor arguments are checked.
    let string = env.types.class_type(core_classes::STRING);
    let mut result = env.call(class_value, "new", vec![string]);
    let errors = result.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, diagnostic_codes::METHOD_ARGUMENT_MISMATCH);
}

#[test]
fn class_new_without_initializer_keeps_class_new() {
    let mut env = TestEnv::new();
    let owner = env
        .symbols
        .enter_class("Plain", core_classes::OBJECT, ClassFlags::empty());
    let class_value = env
        .types
        .class_type(env.symbols.lookup_singleton_class(owner).unwrap());
    let mut result = env.call(class_value, "new", vec![]);
    assert_eq!(result.return_type, env.types.class_type(owner));
    let resolved = result.main.method.expect("Class#new stays resolved");
    assert_eq!(env.symbols.name(env.symbols.method(resolved).name), "new");
    assert!(result.take_errors().is_empty());
}

#[test]
fn array_flatten_descends_and_rewraps() {
    let env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let nested = env.types.array_of(env.types.array_of(integer));

    let result = env.call(nested, "flatten", vec![]);
    assert_eq!(result.return_type, env.types.array_of(integer));

    // Limited depth peels one level.
    let deeper = env.types.array_of(nested);
    let one = env.types.literal_integer(1);
    let result = env.call(deeper, "flatten", vec![one]);
    assert_eq!(result.return_type, nested);

    // Negative depth behaves as infinite.
    let minus = env.types.literal_integer(-1);
    let result = env.call(deeper, "flatten", vec![minus]);
    assert_eq!(result.return_type, env.types.array_of(integer));
}

#[test]
fn array_zip_product_compact_refine_elements() {
    let env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let string = env.types.class_type(core_classes::STRING);
    let ints = env.types.array_of(integer);
    let strings = env.types.array_of(string);

    let result = env.call(ints, "product", vec![strings]);
    assert_eq!(
        result.return_type,
        env.types.array_of(env.types.tuple(vec![integer, string]))
    );

    let result = env.call(ints, "zip", vec![strings]);
    let nilable_string = lattice::any(&env.types, &env.symbols, string, TypeId::NIL);
    assert_eq!(
        result.return_type,
        env.types.array_of(env.types.tuple(vec![integer, nilable_string]))
    );

    let nilable_int = lattice::any(&env.types, &env.symbols, integer, TypeId::NIL);
    let result = env.call(env.types.array_of(nilable_int), "compact", vec![]);
    assert_eq!(result.return_type, ints);
}

#[test]
fn shape_index_and_store() {
    let mut env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let string = env.types.class_type(core_classes::STRING);
    let k = env.symbols.intern_name("k");
    let key = env.types.literal_symbol(k);
    let shape = env.types.shape(vec![key], vec![integer]);

    let result = env.call(shape, "[]", vec![key]);
    assert_eq!(result.return_type, integer);

    let other = env.symbols.intern_name("other");
    let missing = env.types.literal_symbol(other);
    let result = env.call(shape, "[]", vec![missing]);
    assert_eq!(result.return_type, TypeId::NIL);

    // Storing a mismatched value is reported; the setter still returns the
    // right-hand side.
    let mut result = env.call(shape, "[]=", vec![key, string]);
    assert_eq!(result.return_type, string);
    let errors = result.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, diagnostic_codes::METHOD_ARGUMENT_MISMATCH);

    // A compatible store is silent.
    let seven = env.types.literal_integer(7);
    let mut result = env.call(shape, "[]=", vec![key, seven]);
    assert_eq!(result.return_type, seven);
    assert!(result.take_errors().is_empty());
}

#[test]
fn magic_builders_shape_literals() {
    let mut env = TestEnv::new();
    let magic = env.types.class_type(core_classes::MAGIC);
    let integer = env.types.class_type(core_classes::INTEGER);
    let a = env.symbols.intern_name("a");
    let key = env.types.literal_symbol(a);

    let result = env.call(magic, "<build-hash>", vec![key, integer]);
    assert_eq!(result.return_type, env.types.shape(vec![key], vec![integer]));

    let string = env.types.class_type(core_classes::STRING);
    let result = env.call(magic, "<build-array>", vec![integer, string]);
    assert_eq!(result.return_type, env.types.tuple(vec![integer, string]));

    let one = env.types.literal_integer(1);
    let two = env.types.literal_integer(2);
    let result = env.call(magic, "<build-range>", vec![one, two]);
    assert_eq!(result.return_type, env.types.range_of(integer));
}

#[test]
fn magic_call_with_splat_expands_tuples() {
    let mut env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let string = env.types.class_type(core_classes::STRING);
    let owner = env
        .symbols
        .enter_class("Widget", core_classes::OBJECT, ClassFlags::empty());
    env.symbols
        .enter_method(owner, "two")
        .arg("a", integer)
        .arg("b", string)
        .returns(string)
        .define();

    let magic = env.types.class_type(core_classes::MAGIC);
    let recv = env.types.class_type(owner);
    let name = env.types.literal_symbol(env.name("two"));
    let splat = env.types.tuple(vec![integer, string]);
    let mut result = env.call(magic, "<call-with-splat>", vec![recv, name, splat]);
    assert_eq!(result.return_type, string);
    assert!(result.take_errors().is_empty());

    // A mismatching tuple surfaces the inner errors.
    let bad = env.types.tuple(vec![string, string]);
    let mut result = env.call(magic, "<call-with-splat>", vec![recv, name, bad]);
    assert_eq!(result.take_errors().len(), 1);
}

#[test]
fn magic_self_new_answers_with_attached_class() {
    let mut env = TestEnv::new();
    let owner = env
        .symbols
        .enter_class("Widget", core_classes::OBJECT, ClassFlags::empty());
    let class_value = env
        .types
        .class_type(env.symbols.lookup_singleton_class(owner).unwrap());
    let magic = env.types.class_type(core_classes::MAGIC);
    let result = env.call(magic, "<self-new>", vec![class_value]);
    assert_eq!(
        result.return_type,
        env.types
            .self_type_param(owner, rbz_symbols::well_known_names::ATTACHED_CLASS)
    );
}

#[test]
fn metatype_new_constructs_the_wrapped_type() {
    let mut env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let owner = env
        .symbols
        .enter_class("Widget", core_classes::OBJECT, ClassFlags::empty());
    env.symbols
        .enter_method(owner, "initialize")
        .arg("x", integer)
        .returns(TypeId::VOID)
        .define();
    let instance = env.types.class_type(owner);
    let meta = env.types.meta(instance);

    let one = env.types.literal_integer(1);
    let mut result = env.call(meta, "new", vec![one]);
    assert_eq!(result.return_type, instance);
    assert!(result.take_errors().is_empty());

    // Any other method mistakes the type for a value.
    env.symbols.intern_name("bogus");
    let mut result = env.call(meta, "bogus", vec![]);
    let errors = result.take_errors();
    assert_eq!(errors[0].code, diagnostic_codes::META_TYPE_DISPATCH_CALL);
    assert!(errors[0].notes.iter().any(|n| n.contains("===")));
}

#[test]
fn unknown_method_suggests_and_wraps_nil() {
    let mut env = TestEnv::new();
    let owner = env
        .symbols
        .enter_class("Widget", core_classes::OBJECT, ClassFlags::empty());
    env.symbols.enter_method(owner, "deliver").define();
    env.symbols.intern_name("delivr");

    let recv = env.types.class_type(owner);
    let mut result = env.call(recv, "delivr", vec![]);
    let errors = result.take_errors();
    assert_eq!(errors[0].code, diagnostic_codes::UNKNOWN_METHOD);
    assert!(errors[0].notes.iter().any(|n| n.contains("Did you mean `Widget#deliver`")));

    // Nil receivers suggest the nil-stripping wrapper.
    env.symbols.intern_name("anything");
    let mut result = env.call(TypeId::NIL, "anything", vec![]);
    let errors = result.take_errors();
    assert_eq!(errors[0].code, diagnostic_codes::UNKNOWN_METHOD);
    assert!(
        errors[0]
            .autocorrects
            .iter()
            .any(|fix| fix.title.contains("T.must")),
        "nil receiver offers the wrap"
    );
}

#[test]
fn block_presence_diagnostics() {
    let mut env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let owner = env
        .symbols
        .enter_class("Widget", core_classes::OBJECT, ClassFlags::empty());
    let block_type = env.types.proc_of(TypeId::VOID, vec![integer]);
    env.symbols
        .enter_method(owner, "each")
        .block_arg("blk", block_type)
        .returns(TypeId::VOID)
        .define();
    env.symbols
        .enter_method(owner, "plain")
        .returns(integer)
        .define();

    let recv = env.types.class_type(owner);

    // Required block missing.
    let mut result = env.call(recv, "each", vec![]);
    let errors = result.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, diagnostic_codes::BLOCK_NOT_PASSED);

    // Block passed to a sig'd method that declares none.
    let mut args = env.call_args(recv, "plain", vec![]);
    args.block = Some(crate::args::BlockArg::new(
        TypeAndOrigins::synthetic(env.types.class_type(core_classes::PROC)),
        rbz_common::Span::new(20, 28),
    ));
    let mut result = env.dispatch(&args);
    let errors = result.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, diagnostic_codes::TAKES_NO_BLOCK);
}

#[test]
fn block_pre_type_and_return_projection() {
    let mut env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let string = env.types.class_type(core_classes::STRING);
    let owner = env
        .symbols
        .enter_class("Widget", core_classes::OBJECT, ClassFlags::empty());
    let nilable_ret = lattice::any(&env.types, &env.symbols, string, TypeId::NIL);
    let block_type = env.types.proc_of(nilable_ret, vec![integer]);
    env.symbols
        .enter_method(owner, "each")
        .block_arg("blk", block_type)
        .returns(TypeId::VOID)
        .define();

    let recv = env.types.class_type(owner);
    let mut args = env.call_args(recv, "each", vec![]);
    args.block = Some(crate::args::BlockArg::new(
        TypeAndOrigins::synthetic(block_type),
        rbz_common::Span::new(20, 28),
    ));
    let result = env.dispatch(&args);
    assert_eq!(result.main.block_pre_type, Some(block_type));
    // The proc-return projection is stripped of nil.
    assert_eq!(result.main.block_return_type, Some(string));
    assert!(result.main.block_spec.is_some());
}

#[test]
fn unknown_arity_proc_in_strict_files() {
    let mut env = TestEnv::strict();
    let integer = env.types.class_type(core_classes::INTEGER);
    let owner = env
        .symbols
        .enter_class("Widget", core_classes::OBJECT, ClassFlags::empty());
    let block_type = env.types.proc_of(TypeId::VOID, vec![integer]);
    env.symbols
        .enter_method(owner, "each")
        .block_arg("blk", block_type)
        .returns(TypeId::VOID)
        .define();

    let recv = env.types.class_type(owner);
    let mut args = env.call_args(recv, "each", vec![]);
    args.block = Some(crate::args::BlockArg::new(
        TypeAndOrigins::synthetic(env.types.class_type(core_classes::PROC)),
        rbz_common::Span::new(20, 28),
    ));
    let mut result = env.dispatch(&args);
    let errors = result.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, diagnostic_codes::PROC_ARITY_UNKNOWN);
}

#[test]
fn generic_method_inference_solves_and_instantiates() {
    let mut env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let owner = env
        .symbols
        .enter_class("Widget", core_classes::OBJECT, ClassFlags::empty());
    let var = env.symbols.fresh_type_var();
    let var_type = env.types.type_var(var);
    env.symbols
        .enter_method(owner, "identity")
        .arg("x", var_type)
        .returns(var_type)
        .generic(vec![var])
        .define();

    let recv = env.types.class_type(owner);
    let mut result = env.call(recv, "identity", vec![integer]);
    assert_eq!(result.return_type, integer);
    assert!(result.take_errors().is_empty());
    assert!(result.main.constr.is_solved());
}

#[test]
fn block_defers_constraint_solving_to_the_caller() {
    let mut env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let owner = env
        .symbols
        .enter_class("Widget", core_classes::OBJECT, ClassFlags::empty());
    let var = env.symbols.fresh_type_var();
    let var_type = env.types.type_var(var);
    let block_type = env.types.proc_of(var_type, vec![integer]);
    env.symbols
        .enter_method(owner, "map_one")
        .block_arg("blk", block_type)
        .returns(var_type)
        .generic(vec![var])
        .define();

    let recv = env.types.class_type(owner);
    let mut args = env.call_args(recv, "map_one", vec![]);
    args.block = Some(crate::args::BlockArg::new(
        TypeAndOrigins::synthetic(env.types.proc_of(integer, vec![integer])),
        rbz_common::Span::new(20, 28),
    ));
    let result = env.dispatch(&args);
    assert!(
        !result.main.constr.is_solved(),
        "solving is the caller's job once the block body has been processed"
    );
}

#[test]
fn get_call_arguments_exposes_formal_tuples() {
    let mut env = TestEnv::new();
    let integer = env.types.class_type(core_classes::INTEGER);
    let string = env.types.class_type(core_classes::STRING);
    let owner = env
        .symbols
        .enter_class("Widget", core_classes::OBJECT, ClassFlags::empty());
    env.symbols
        .enter_method(owner, "pair")
        .arg("x", integer)
        .rest_arg("rest", string)
        .returns(integer)
        .define();
    let other = env
        .symbols
        .enter_class("Gadget", core_classes::OBJECT, ClassFlags::empty());
    env.symbols
        .enter_method(other, "pair")
        .arg("x", integer)
        .rest_arg("rest", string)
        .returns(string)
        .define();

    let ctx = env.ctx();
    let recv = env.types.class_type(owner);
    let name = env.name("pair");
    let formals = crate::get_call_arguments(&ctx, recv, name).expect("resolves");
    assert_eq!(
        formals,
        env.types
            .tuple(vec![integer, env.types.array_of(string)])
    );

    // Untyped absorbs.
    assert_eq!(
        crate::get_call_arguments(&ctx, TypeId::UNTYPED, name),
        Some(TypeId::UNTYPED)
    );

    // Unions meet their sides' tuples.
    let other_recv = env.types.class_type(other);
    let union = lattice::any(&env.types, &env.symbols, recv, other_recv);
    assert_eq!(crate::get_call_arguments(&ctx, union, name), Some(formals));

    // Unknown members yield nothing.
    let plain = env.types.class_type(core_classes::INTEGER);
    assert_eq!(crate::get_call_arguments(&ctx, plain, name), None);
}

#[test]
fn top_receiver_only_sees_basic_object() {
    let mut env = TestEnv::new();
    env.symbols.intern_name("to_s_ish");
    let mut result = env.call(TypeId::TOP, "to_s_ish", vec![]);
    let errors = result.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, diagnostic_codes::UNKNOWN_METHOD);
}
