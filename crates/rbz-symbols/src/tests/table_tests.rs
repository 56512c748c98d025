use super::*;
use crate::intrinsics::Intrinsic;

#[test]
fn core_class_ids_are_pinned() {
    let table = SymbolTable::with_core();
    assert_eq!(table.name(table.class(core_classes::OBJECT).name), "Object");
    assert_eq!(table.name(table.class(core_classes::INTEGER).name), "Integer");
    assert_eq!(table.name(table.class(core_classes::T_MODULE).name), "T");
    assert_eq!(table.name(table.class(core_classes::TUPLE).name), "<Tuple>");
    assert_eq!(table.class_count() as u32, core_classes::COUNT * 2);
}

#[test]
fn singleton_classes_attach_back() {
    let table = SymbolTable::with_core();
    let singleton = table
        .lookup_singleton_class(core_classes::INTEGER)
        .expect("Integer has a singleton");
    assert!(table.is_singleton_class(singleton));
    assert_eq!(table.attached_class(singleton), Some(core_classes::INTEGER));
    assert_eq!(table.show_class(singleton), "T.class_of(Integer)");
}

#[test]
fn ancestry_walks_superclasses_and_includes() {
    let table = SymbolTable::with_core();
    assert!(table.derives_from(core_classes::INTEGER, core_classes::NUMERIC));
    assert!(table.derives_from(core_classes::INTEGER, core_classes::OBJECT));
    assert!(table.derives_from(core_classes::INTEGER, core_classes::COMPARABLE));
    assert!(table.derives_from(core_classes::SHAPE, core_classes::HASH));
    assert!(table.derives_from(core_classes::TUPLE, core_classes::ARRAY));
    assert!(!table.derives_from(core_classes::STRING, core_classes::NUMERIC));
}

#[test]
fn core_methods_carry_intrinsics() {
    let table = SymbolTable::with_core();
    let t_singleton = table.lookup_singleton_class(core_classes::T_MODULE).unwrap();
    let must = table.names().lookup("must").unwrap();
    let method = table.find_member(t_singleton, must).expect("T.must exists");
    assert_eq!(table.method(method).intrinsic, Some(Intrinsic::TMust));

    let triple_eq = table.names().lookup("===").unwrap();
    let method = table
        .find_member_transitive(core_classes::CLASS, triple_eq)
        .expect("Class inherits Module#===");
    assert_eq!(table.method(method).intrinsic, Some(Intrinsic::ModuleTripleEq));
}

#[test]
fn methods_always_end_in_a_block_parameter() {
    let mut table = SymbolTable::with_core();
    let file = table.enter_file(Strictness::True);
    let loc = Loc::new(file, rbz_common::Span::new(0, 10));
    let owner = table.enter_class("Widget", core_classes::OBJECT, ClassFlags::empty());
    let plain = table.enter_method(owner, "plain").arg("x", TypeId::UNTYPED).loc(loc).define();
    let def = table.method(plain);
    assert!(def.block_arg().is_block());
    assert!(def.block_arg().is_synthetic());
    assert_eq!(def.arity(), 1);

    let with_block = table
        .enter_method(owner, "each")
        .block_arg("blk", TypeId::UNTYPED)
        .loc(loc)
        .define();
    let def = table.method(with_block);
    assert!(def.block_arg().is_block());
    assert!(!def.block_arg().is_synthetic());
    assert_eq!(def.arity(), 0);
}

#[test]
fn fuzzy_match_suggests_near_misses() {
    let mut table = SymbolTable::with_core();
    let owner = table.enter_class("Widget", core_classes::OBJECT, ClassFlags::empty());
    let target = table.enter_method(owner, "deliver").define();
    let probe = table.intern_name("delivr");
    let hits = table.find_member_fuzzy_match(owner, probe);
    assert_eq!(hits.first(), Some(&target));
}

#[test]
fn fuzzy_match_skips_hidden_owners() {
    let mut table = SymbolTable::with_core();
    let probe = table.intern_name("marge");
    // <Shape> defines `merge`; it is hidden and must not leak suggestions
    // through its subclasses.
    let hits = table.find_member_fuzzy_match(core_classes::SHAPE, probe);
    assert!(hits.is_empty());
}

#[test]
fn required_ancestors_collect_transitively() {
    let mut table = SymbolTable::with_core();
    let helper = table.enter_class("Helper", ClassId::NONE, ClassFlags::MODULE);
    let base = table.enter_class("Base", core_classes::OBJECT, ClassFlags::empty());
    table.add_required_ancestor(base, helper);
    let child = table.enter_class("Child", base, ClassFlags::empty());
    assert_eq!(table.required_ancestors_transitive(child), vec![helper]);
}

#[test]
fn overload_registration_marks_primary() {
    let mut table = SymbolTable::with_core();
    let file = table.enter_file(Strictness::True);
    let loc = Loc::new(file, rbz_common::Span::new(0, 5));
    let owner = table.enter_class("Widget", core_classes::OBJECT, ClassFlags::empty());
    let primary = table.enter_method(owner, "f").arg("x", TypeId::UNTYPED).loc(loc).define();
    let alt = table
        .enter_method(owner, "f")
        .arg("x", TypeId::UNTYPED)
        .arg("y", TypeId::UNTYPED)
        .loc(loc)
        .define_alternate();
    table.enter_overload(primary, alt);
    let def = table.method(primary);
    assert!(def.is_overloaded());
    assert_eq!(def.overloads, vec![alt]);
    // The alternate is not reachable by name.
    let f = table.names().lookup("f").unwrap();
    assert_eq!(table.find_member(owner, f), Some(primary));
}
