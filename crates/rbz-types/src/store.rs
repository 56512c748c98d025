//! The type arena.
//!
//! `TypeStore` hash-conses every node: structurally equal types share a
//! `TypeId`, so handle equality is structural equality and subtree sharing
//! is free. The store is single-threaded (interior mutability via
//! `RefCell`); dispatch never holds a borrow across recursion because nodes
//! are cloned out on read.

use crate::types::{LiteralValue, Type};
use rbz_common::{ClassId, MethodId, NameId, TypeId, TypeVarId};
use rbz_symbols::core_classes;
use rustc_hash::FxHashMap;
use std::cell::RefCell;

pub struct TypeStore {
    types: RefCell<Vec<Type>>,
    interned: RefCell<FxHashMap<Type, TypeId>>,
}

impl TypeStore {
    /// Create a store with the reserved lattice constants interned at their
    /// fixed ids.
    pub fn new() -> Self {
        let store = TypeStore {
            types: RefCell::new(Vec::new()),
            interned: RefCell::new(FxHashMap::default()),
        };
        let untyped = store.intern(Type::Untyped { blame: None });
        let bottom = store.intern(Type::Bottom);
        let top = store.intern(Type::Top);
        let nil = store.intern(Type::Class(core_classes::NIL_CLASS));
        let void = store.intern(Type::Void);
        assert_eq!(untyped, TypeId::UNTYPED);
        assert_eq!(bottom, TypeId::BOTTOM);
        assert_eq!(top, TypeId::TOP);
        assert_eq!(nil, TypeId::NIL);
        assert_eq!(void, TypeId::VOID);
        store
    }

    /// Intern a node, returning the existing handle for structurally equal
    /// types.
    pub fn intern(&self, ty: Type) -> TypeId {
        if let Some(&id) = self.interned.borrow().get(&ty) {
            return id;
        }
        let mut types = self.types.borrow_mut();
        let id = TypeId(types.len() as u32);
        types.push(ty.clone());
        self.interned.borrow_mut().insert(ty, id);
        id
    }

    /// Read a node. Clones: nodes are small and handle-linked, and this
    /// keeps no borrow alive across lattice recursion.
    pub fn ty(&self, id: TypeId) -> Type {
        self.types.borrow()[id.0 as usize].clone()
    }

    pub fn node_count(&self) -> usize {
        self.types.borrow().len()
    }

    pub fn is_untyped(&self, id: TypeId) -> bool {
        self.ty(id).is_untyped()
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn class_type(&self, class: ClassId) -> TypeId {
        self.intern(Type::Class(class))
    }

    /// An applied generic; collapses to the plain class when no arguments
    /// are given.
    pub fn applied(&self, class: ClassId, targs: Vec<TypeId>) -> TypeId {
        if targs.is_empty() {
            self.class_type(class)
        } else {
            self.intern(Type::Applied { class, targs })
        }
    }

    pub fn untyped_with_blame(&self, blame: MethodId) -> TypeId {
        self.intern(Type::Untyped { blame: Some(blame) })
    }

    pub fn literal_symbol(&self, name: NameId) -> TypeId {
        self.intern(Type::Literal {
            underlying: core_classes::SYMBOL,
            value: LiteralValue::Symbol(name),
        })
    }

    pub fn literal_string(&self, name: NameId) -> TypeId {
        self.intern(Type::Literal {
            underlying: core_classes::STRING,
            value: LiteralValue::String(name),
        })
    }

    pub fn literal_integer(&self, value: i64) -> TypeId {
        self.intern(Type::Literal {
            underlying: core_classes::INTEGER,
            value: LiteralValue::Integer(value),
        })
    }

    pub fn literal_float(&self, value: f64) -> TypeId {
        self.intern(Type::Literal {
            underlying: core_classes::FLOAT,
            value: LiteralValue::float(value),
        })
    }

    pub fn literal_boolean(&self, value: bool) -> TypeId {
        self.intern(Type::Literal {
            underlying: if value {
                core_classes::TRUE_CLASS
            } else {
                core_classes::FALSE_CLASS
            },
            value: LiteralValue::Boolean(value),
        })
    }

    /// `keys` and `values` run in parallel; all keys must be literals.
    pub fn shape(&self, keys: Vec<TypeId>, values: Vec<TypeId>) -> TypeId {
        debug_assert_eq!(keys.len(), values.len());
        debug_assert!(
            keys.iter()
                .all(|&k| matches!(self.ty(k), Type::Literal { .. })),
            "shape keys must be literal types"
        );
        self.intern(Type::Shape { keys, values })
    }

    pub fn tuple(&self, elems: Vec<TypeId>) -> TypeId {
        self.intern(Type::Tuple { elems })
    }

    pub fn meta(&self, wrapped: TypeId) -> TypeId {
        self.intern(Type::Meta { wrapped })
    }

    pub fn type_var(&self, var: TypeVarId) -> TypeId {
        self.intern(Type::TypeVar { var })
    }

    pub fn self_type_param(&self, owner: ClassId, name: NameId) -> TypeId {
        self.intern(Type::SelfTypeParam { owner, name })
    }

    pub fn lambda_param(&self, class: ClassId, index: u32, upper: TypeId, lower: TypeId) -> TypeId {
        self.intern(Type::LambdaParam {
            class,
            index,
            upper,
            lower,
        })
    }

    /// `TrueClass | FalseClass`, the boolean type.
    pub fn boolean(&self) -> TypeId {
        let true_type = self.class_type(core_classes::TRUE_CLASS);
        let false_type = self.class_type(core_classes::FALSE_CLASS);
        self.intern(Type::Or {
            left: true_type,
            right: false_type,
        })
    }

    pub fn array_of(&self, elem: TypeId) -> TypeId {
        self.applied(core_classes::ARRAY, vec![elem])
    }

    pub fn hash_of(&self, key: TypeId, value: TypeId) -> TypeId {
        self.applied(core_classes::HASH, vec![key, value])
    }

    pub fn hash_of_untyped(&self) -> TypeId {
        self.hash_of(TypeId::UNTYPED, TypeId::UNTYPED)
    }

    pub fn range_of(&self, elem: TypeId) -> TypeId {
        self.applied(core_classes::RANGE, vec![elem])
    }

    /// `Proc[Return, Arg0, ...]`. A bare `Class(Proc)` is a proc of unknown
    /// arity.
    pub fn proc_of(&self, ret: TypeId, params: Vec<TypeId>) -> TypeId {
        let mut targs = vec![ret];
        targs.extend(params);
        self.applied(core_classes::PROC, targs)
    }
}

impl Default for TypeStore {
    fn default() -> Self {
        TypeStore::new()
    }
}
