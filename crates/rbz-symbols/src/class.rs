//! Class and module symbols.

use bitflags::bitflags;
use rbz_common::{ClassId, NameId, TypeId};
use rustc_hash::FxHashMap;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ClassFlags: u8 {
        /// A module rather than a class (cannot be instantiated).
        const MODULE = 1 << 0;
        /// A singleton class `T.class_of(X)`; `attached_class` names X.
        const SINGLETON = 1 << 1;
        /// Derived from the enum base class; its singleton stands for itself
        /// in type position.
        const ENUM = 1 << 2;
        /// Internal owner that user code can never name (`<Magic>`,
        /// `<Shape>`, `<Tuple>`).
        const HIDDEN = 1 << 3;
    }
}

/// A generic class's declared type member. `fixed` members are substituted
/// implicitly and do not count toward the class's type arity.
#[derive(Clone, Debug)]
pub struct TypeMember {
    pub name: NameId,
    pub upper: TypeId,
    pub lower: TypeId,
    pub fixed: Option<TypeId>,
}

impl TypeMember {
    pub fn new(name: NameId) -> Self {
        TypeMember {
            name,
            upper: TypeId::TOP,
            lower: TypeId::BOTTOM,
            fixed: None,
        }
    }
}

/// A class or module symbol.
#[derive(Clone, Debug)]
pub struct ClassDef {
    pub name: NameId,
    pub flags: ClassFlags,
    /// `ClassId::NONE` for the hierarchy root.
    pub superclass: ClassId,
    /// Linearized ancestry: self first, then included modules, then the
    /// superclass chain. Member lookup and `derives_from` walk this.
    pub ancestors: Vec<ClassId>,
    /// Direct members, by name.
    pub members: FxHashMap<NameId, rbz_common::MethodId>,
    pub type_members: Vec<TypeMember>,
    /// For singleton classes: the instance class this is the class of.
    pub attached_class: ClassId,
    pub singleton_class: ClassId,
    /// Modules this class requires its includers to also include.
    pub required_ancestors: Vec<ClassId>,
}

impl ClassDef {
    pub fn is_module(&self) -> bool {
        self.flags.contains(ClassFlags::MODULE)
    }

    pub fn is_singleton(&self) -> bool {
        self.flags.contains(ClassFlags::SINGLETON)
    }

    /// Type arity: declared members minus the implicitly-substituted fixed
    /// ones.
    pub fn type_arity(&self) -> usize {
        self.type_members.iter().filter(|m| m.fixed.is_none()).count()
    }
}
