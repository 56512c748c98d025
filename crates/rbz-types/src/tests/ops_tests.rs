//! Projection and substitution operations.

use crate::lattice::any;
use crate::ops::*;
use crate::show::show;
use crate::store::TypeStore;
use rbz_common::TypeId;
use rbz_symbols::{SymbolTable, core_classes, well_known_names};

fn env() -> (TypeStore, SymbolTable) {
    (TypeStore::new(), SymbolTable::with_core())
}

#[test]
fn proxies_project_to_plain_or_applied_types() {
    let (store, mut symbols) = env();
    let one = store.literal_integer(1);
    assert_eq!(
        underlying(&store, &symbols, one),
        store.class_type(core_classes::INTEGER)
    );

    let integer = store.class_type(core_classes::INTEGER);
    let string = store.class_type(core_classes::STRING);
    let pair = store.tuple(vec![integer, string]);
    assert_eq!(
        underlying(&store, &symbols, pair),
        store.array_of(any(&store, &symbols, integer, string))
    );

    let a = symbols.intern_name("a");
    let shape = store.shape(vec![store.literal_symbol(a)], vec![integer]);
    assert_eq!(
        underlying(&store, &symbols, shape),
        store.hash_of(store.class_type(core_classes::SYMBOL), integer)
    );
}

#[test]
fn drop_nil_strips_only_nil() {
    let (store, symbols) = env();
    let integer = store.class_type(core_classes::INTEGER);
    let nilable = any(&store, &symbols, integer, TypeId::NIL);
    assert_eq!(drop_nil(&store, &symbols, nilable), integer);
    assert_eq!(drop_nil(&store, &symbols, integer), integer);
    assert_eq!(drop_nil(&store, &symbols, TypeId::NIL), TypeId::BOTTOM);
}

#[test]
fn widen_forgets_literals_recursively() {
    let (store, symbols) = env();
    let one = store.literal_integer(1);
    let integer = store.class_type(core_classes::INTEGER);
    assert_eq!(widen(&store, &symbols, one), integer);
    let tup = store.tuple(vec![one, one]);
    assert_eq!(widen(&store, &symbols, tup), store.tuple(vec![integer, integer]));
}

#[test]
fn replace_self_type_substitutes_receiver() {
    let (store, symbols) = env();
    let self_param = store.self_type_param(core_classes::OBJECT, well_known_names::ATTACHED_CLASS);
    let integer = store.class_type(core_classes::INTEGER);
    assert_eq!(replace_self_type(&store, self_param, integer), integer);
    let arr = store.array_of(self_param);
    assert_eq!(replace_self_type(&store, arr, integer), store.array_of(integer));
    let _ = symbols;
}

#[test]
fn result_type_as_seen_from_applies_targs() {
    let (store, symbols) = env();
    let elem_member = store.lambda_param(core_classes::ARRAY, 0, TypeId::TOP, TypeId::BOTTOM);
    let integer = store.class_type(core_classes::INTEGER);
    // Array#first : returns Elem; seen from Array[Integer] that is Integer.
    let seen = result_type_as_seen_from(
        &store,
        &symbols,
        elem_member,
        core_classes::ARRAY,
        &[integer],
    );
    assert_eq!(seen, integer);
    // Without arguments the member's upper bound is the best answer.
    let seen = result_type_as_seen_from(&store, &symbols, elem_member, core_classes::ARRAY, &[]);
    assert_eq!(seen, TypeId::TOP);
}

#[test]
fn external_type_fills_generic_holes() {
    let (store, symbols) = env();
    assert_eq!(
        external_type(&store, &symbols, core_classes::STRING),
        store.class_type(core_classes::STRING)
    );
    assert_eq!(
        external_type(&store, &symbols, core_classes::ARRAY),
        store.array_of(TypeId::UNTYPED)
    );
    assert_eq!(
        external_type(&store, &symbols, core_classes::HASH),
        store.hash_of_untyped()
    );
}

#[test]
fn represented_class_sees_through_values_in_type_position() {
    let (store, symbols) = env();
    let integer_singleton = symbols
        .lookup_singleton_class(core_classes::INTEGER)
        .unwrap();
    let class_value = store.class_type(integer_singleton);
    assert_eq!(
        represented_class(&store, &symbols, class_value),
        Some(core_classes::INTEGER)
    );
    let meta = store.meta(store.array_of(TypeId::UNTYPED));
    assert_eq!(
        represented_class(&store, &symbols, meta),
        Some(core_classes::ARRAY)
    );
    let plain = store.class_type(core_classes::INTEGER);
    assert_eq!(represented_class(&store, &symbols, plain), None);
}

#[test]
fn proc_projections() {
    let (store, symbols) = env();
    let integer = store.class_type(core_classes::INTEGER);
    let string = store.class_type(core_classes::STRING);
    let proc2 = store.proc_of(string, vec![integer, integer]);
    assert_eq!(get_proc_return_type(&store, &symbols, proc2), Some(string));
    assert_eq!(get_proc_arity(&store, proc2), Some(2));
    let bare = store.class_type(core_classes::PROC);
    assert_eq!(get_proc_return_type(&store, &symbols, bare), Some(TypeId::UNTYPED));
    assert_eq!(get_proc_arity(&store, bare), None);
    assert_eq!(get_proc_return_type(&store, &symbols, integer), None);
}

#[test]
fn show_renders_user_syntax() {
    let (store, mut symbols) = env();
    let integer = store.class_type(core_classes::INTEGER);
    assert_eq!(show(&store, &symbols, integer), "Integer");
    assert_eq!(show(&store, &symbols, TypeId::UNTYPED), "T.untyped");
    let nilable = any(&store, &symbols, integer, TypeId::NIL);
    assert_eq!(show(&store, &symbols, nilable), "T.nilable(Integer)");
    let name = symbols.intern_name("k");
    let shape = store.shape(vec![store.literal_symbol(name)], vec![integer]);
    assert_eq!(show(&store, &symbols, shape), "{k: Integer}");
    let tup = store.tuple(vec![integer, integer]);
    assert_eq!(show(&store, &symbols, tup), "[Integer, Integer]");
    assert_eq!(show(&store, &symbols, store.boolean()), "T::Boolean");
    assert_eq!(
        show(&store, &symbols, store.array_of(integer)),
        "Array[Integer]"
    );
}
