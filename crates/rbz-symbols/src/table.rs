//! The symbol table.
//!
//! Holds every class and method symbol plus the name interner and per-file
//! strictness records. `SymbolTable::with_core` loads the core classes the
//! dispatcher depends on (at fixed ids, pinned by `core_classes`) together
//! with their intrinsic-tagged methods.

use crate::class::{ClassDef, ClassFlags, TypeMember};
use crate::intrinsics::lookup_intrinsic;
use crate::method::{ArgFlags, ArgInfo, MethodDef, MethodFlags};
use crate::names::NameTable;
use rbz_common::{ClassId, FileId, Loc, MethodId, NameId, Strictness, TypeId, TypeVarId};
use tracing::trace;

/// Fixed ids for the core classes, in the order `with_core` enters them.
pub mod core_classes {
    use rbz_common::ClassId;

    pub const ROOT: ClassId = ClassId(0);
    pub const BASIC_OBJECT: ClassId = ClassId(1);
    pub const OBJECT: ClassId = ClassId(2);
    pub const KERNEL: ClassId = ClassId(3);
    pub const COMPARABLE: ClassId = ClassId(4);
    pub const MODULE: ClassId = ClassId(5);
    pub const CLASS: ClassId = ClassId(6);
    pub const NIL_CLASS: ClassId = ClassId(7);
    pub const TRUE_CLASS: ClassId = ClassId(8);
    pub const FALSE_CLASS: ClassId = ClassId(9);
    pub const SYMBOL: ClassId = ClassId(10);
    pub const STRING: ClassId = ClassId(11);
    pub const INTEGER: ClassId = ClassId(12);
    pub const FLOAT: ClassId = ClassId(13);
    pub const NUMERIC: ClassId = ClassId(14);
    pub const HASH: ClassId = ClassId(15);
    pub const ARRAY: ClassId = ClassId(16);
    pub const RANGE: ClassId = ClassId(17);
    pub const PROC: ClassId = ClassId(18);
    pub const REGEXP: ClassId = ClassId(19);
    pub const T_MODULE: ClassId = ClassId(20);
    pub const MAGIC: ClassId = ClassId(21);
    pub const SHAPE: ClassId = ClassId(22);
    pub const TUPLE: ClassId = ClassId(23);

    pub const COUNT: u32 = 24;
}

#[derive(Clone, Copy, Debug)]
struct FileInfo {
    strictness: Strictness,
}

#[derive(Debug)]
pub struct SymbolTable {
    names: NameTable,
    classes: Vec<ClassDef>,
    methods: Vec<MethodDef>,
    files: Vec<FileInfo>,
    next_type_var: u32,
}

impl SymbolTable {
    /// An empty table with only the name interner seeded. Most callers want
    /// [`SymbolTable::with_core`].
    pub fn new() -> Self {
        SymbolTable {
            names: NameTable::new(),
            classes: Vec::new(),
            methods: Vec::new(),
            files: Vec::new(),
            next_type_var: 0,
        }
    }

    /// Load the core classes and their intrinsic methods.
    pub fn with_core() -> Self {
        let mut table = SymbolTable::new();
        table.load_core_classes();
        table.load_core_methods();
        table
    }

    // =========================================================================
    // Construction
    // =========================================================================

    pub fn enter_file(&mut self, strictness: Strictness) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.files.push(FileInfo { strictness });
        id
    }

    pub fn strictness(&self, file: FileId) -> Strictness {
        if file.is_none() {
            // Synthetic locations belong to the core, which is fully trusted.
            return Strictness::Strict;
        }
        self.files
            .get(file.0 as usize)
            .map(|f| f.strictness)
            .unwrap_or_default()
    }

    /// Enter a class or module. Its singleton class is created eagerly.
    pub fn enter_class(&mut self, name: &str, superclass: ClassId, flags: ClassFlags) -> ClassId {
        let name_id = self.names.intern(name);
        let id = ClassId(self.classes.len() as u32);
        let mut ancestors = vec![id];
        if !superclass.is_none() {
            ancestors.extend(self.classes[superclass.0 as usize].ancestors.iter().copied());
        }
        self.classes.push(ClassDef {
            name: name_id,
            flags,
            superclass,
            ancestors,
            members: Default::default(),
            type_members: Vec::new(),
            attached_class: ClassId::NONE,
            singleton_class: ClassId::NONE,
            required_ancestors: Vec::new(),
        });

        let singleton_name = format!("<Class:{name}>");
        let singleton_name_id = self.names.intern(&singleton_name);
        let singleton_id = ClassId(self.classes.len() as u32);
        // Singletons of singletons are not modeled; their superclass is the
        // plain Class symbol (or Module for modules).
        let singleton_super = if flags.contains(ClassFlags::MODULE) {
            core_classes::MODULE
        } else {
            core_classes::CLASS
        };
        let mut singleton_ancestors = vec![singleton_id];
        if (singleton_super.0 as usize) < self.classes.len() {
            singleton_ancestors.extend(
                self.classes[singleton_super.0 as usize]
                    .ancestors
                    .iter()
                    .copied(),
            );
        }
        self.classes.push(ClassDef {
            name: singleton_name_id,
            flags: ClassFlags::SINGLETON | (flags & ClassFlags::HIDDEN),
            superclass: singleton_super,
            ancestors: singleton_ancestors,
            members: Default::default(),
            type_members: Vec::new(),
            attached_class: id,
            singleton_class: ClassId::NONE,
            required_ancestors: Vec::new(),
        });
        self.classes[id.0 as usize].singleton_class = singleton_id;
        trace!(class = name, id = id.0, singleton = singleton_id.0, "entered class");
        id
    }

    /// Record `module` in `class`'s ancestry, with include precedence over
    /// the superclass chain.
    pub fn add_include(&mut self, class: ClassId, module: ClassId) {
        let module_ancestors: Vec<ClassId> = self.classes[module.0 as usize]
            .ancestors
            .iter()
            .copied()
            .collect();
        let def = &mut self.classes[class.0 as usize];
        let mut insert_at = 1; // directly after self
        for anc in module_ancestors {
            if !def.ancestors.contains(&anc) {
                def.ancestors.insert(insert_at, anc);
                insert_at += 1;
            }
        }
    }

    pub fn add_required_ancestor(&mut self, class: ClassId, required: ClassId) {
        self.classes[class.0 as usize].required_ancestors.push(required);
    }

    pub fn enter_type_member(
        &mut self,
        class: ClassId,
        name: &str,
        upper: TypeId,
        lower: TypeId,
        fixed: Option<TypeId>,
    ) {
        let name_id = self.names.intern(name);
        let mut member = TypeMember::new(name_id);
        member.upper = upper;
        member.lower = lower;
        member.fixed = fixed;
        self.classes[class.0 as usize].type_members.push(member);
    }

    /// Start defining a method on `owner`. See [`MethodBuilder`].
    pub fn enter_method<'a>(&'a mut self, owner: ClassId, name: &str) -> MethodBuilder<'a> {
        let name_id = self.names.intern(name);
        MethodBuilder {
            table: self,
            owner,
            name: name_id,
            args: Vec::new(),
            result: TypeId::UNTYPED,
            flags: MethodFlags::empty(),
            type_params: Vec::new(),
            loc: Loc::none(),
        }
    }

    /// Register an alternate signature for an already-entered method.
    ///
    /// Overload definitions are only legal in files whose strictness permits
    /// them; the loader is responsible for rejecting them earlier, so this
    /// asserts rather than diagnoses.
    pub fn enter_overload(&mut self, primary: MethodId, alternate: MethodId) {
        let loc = self.methods[alternate.0 as usize].loc;
        assert!(
            self.strictness(loc.file).permits_overloads(),
            "overload defined in a file that does not permit overloads"
        );
        let def = &mut self.methods[primary.0 as usize];
        def.flags |= MethodFlags::OVERLOADED;
        def.overloads.push(alternate);
    }

    pub fn fresh_type_var(&mut self) -> TypeVarId {
        let id = TypeVarId(self.next_type_var);
        self.next_type_var += 1;
        id
    }

    // =========================================================================
    // Names
    // =========================================================================

    pub fn names(&self) -> &NameTable {
        &self.names
    }

    pub fn intern_name(&mut self, text: &str) -> NameId {
        self.names.intern(text)
    }

    pub fn name(&self, id: NameId) -> &str {
        self.names.resolve(id)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn class(&self, id: ClassId) -> &ClassDef {
        &self.classes[id.0 as usize]
    }

    pub fn method(&self, id: MethodId) -> &MethodDef {
        &self.methods[id.0 as usize]
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Direct member lookup on one class.
    pub fn find_member(&self, class: ClassId, name: NameId) -> Option<MethodId> {
        self.class(class).members.get(&name).copied()
    }

    /// Member lookup along the linearized ancestry.
    pub fn find_member_transitive(&self, class: ClassId, name: NameId) -> Option<MethodId> {
        for &ancestor in &self.class(class).ancestors {
            if let Some(found) = self.find_member(ancestor, name) {
                return Some(found);
            }
        }
        None
    }

    /// Close-match member suggestions, nearest first. Hidden owners never
    /// contribute suggestions.
    pub fn find_member_fuzzy_match(&self, class: ClassId, name: NameId) -> Vec<MethodId> {
        let wanted = self.names.resolve(name);
        let max_distance = (wanted.len() / 3).max(1);
        let mut hits: Vec<(usize, NameId, MethodId)> = Vec::new();
        for &ancestor in &self.class(class).ancestors {
            let def = self.class(ancestor);
            if def.flags.contains(ClassFlags::HIDDEN) {
                continue;
            }
            for (&member_name, &method) in &def.members {
                let candidate = self.names.resolve(member_name);
                let distance = strsim::levenshtein(wanted, candidate);
                if distance > 0
                    && distance <= max_distance
                    && !hits.iter().any(|(_, n, _)| *n == member_name)
                {
                    hits.push((distance, member_name, method));
                }
            }
        }
        hits.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        hits.into_iter().map(|(_, _, m)| m).collect()
    }

    pub fn lookup_singleton_class(&self, class: ClassId) -> Option<ClassId> {
        let singleton = self.class(class).singleton_class;
        (!singleton.is_none()).then_some(singleton)
    }

    pub fn attached_class(&self, class: ClassId) -> Option<ClassId> {
        let attached = self.class(class).attached_class;
        (!attached.is_none()).then_some(attached)
    }

    pub fn is_singleton_class(&self, class: ClassId) -> bool {
        self.class(class).is_singleton()
    }

    pub fn is_module(&self, class: ClassId) -> bool {
        self.class(class).is_module()
    }

    pub fn derives_from(&self, class: ClassId, ancestor: ClassId) -> bool {
        self.class(class).ancestors.contains(&ancestor)
    }

    /// Required ancestors of `class` and of everything in its ancestry, in
    /// scan order.
    pub fn required_ancestors_transitive(&self, class: ClassId) -> Vec<ClassId> {
        let mut result = Vec::new();
        for &ancestor in &self.class(class).ancestors {
            for &required in &self.class(ancestor).required_ancestors {
                if !result.contains(&required) {
                    result.push(required);
                }
            }
        }
        result
    }

    /// Class name as the user writes it; singletons render as
    /// `T.class_of(X)`.
    pub fn show_class(&self, class: ClassId) -> String {
        let def = self.class(class);
        if def.is_singleton() {
            if let Some(attached) = self.attached_class(class) {
                return format!("T.class_of({})", self.name(self.class(attached).name));
            }
        }
        self.name(def.name).to_string()
    }

    // =========================================================================
    // Core loading
    // =========================================================================

    fn load_core_classes(&mut self) {
        use ClassFlags as F;
        use core_classes as c;

        let module = F::MODULE;
        let hidden = F::HIDDEN;

        // Order must match the `core_classes` constants. Forward references
        // (Integer's superclass Numeric comes later) are fine: ancestries are
        // rebuilt after all entries exist.
        let entries: &[(&str, ClassId, ClassFlags)] = &[
            ("<root>", ClassId::NONE, module),
            ("BasicObject", ClassId::NONE, F::empty()),
            ("Object", c::BASIC_OBJECT, F::empty()),
            ("Kernel", ClassId::NONE, module),
            ("Comparable", ClassId::NONE, module),
            ("Module", c::OBJECT, F::empty()),
            ("Class", c::MODULE, F::empty()),
            ("NilClass", c::OBJECT, F::empty()),
            ("TrueClass", c::OBJECT, F::empty()),
            ("FalseClass", c::OBJECT, F::empty()),
            ("Symbol", c::OBJECT, F::empty()),
            ("String", c::OBJECT, F::empty()),
            ("Integer", c::NUMERIC, F::empty()),
            ("Float", c::NUMERIC, F::empty()),
            ("Numeric", c::OBJECT, F::empty()),
            ("Hash", c::OBJECT, F::empty()),
            ("Array", c::OBJECT, F::empty()),
            ("Range", c::OBJECT, F::empty()),
            ("Proc", c::OBJECT, F::empty()),
            ("Regexp", c::OBJECT, F::empty()),
            ("T", ClassId::NONE, module),
            ("<Magic>", c::OBJECT, hidden),
            ("<Shape>", c::HASH, hidden),
            ("<Tuple>", c::ARRAY, hidden),
        ];
        debug_assert_eq!(entries.len() as u32, c::COUNT);

        // Instance classes occupy 0..COUNT, their singletons COUNT..2*COUNT.
        for (i, &(name, superclass, flags)) in entries.iter().enumerate() {
            let name_id = self.names.intern(name);
            self.classes.push(ClassDef {
                name: name_id,
                flags,
                superclass,
                ancestors: Vec::new(),
                members: Default::default(),
                type_members: Vec::new(),
                attached_class: ClassId::NONE,
                singleton_class: ClassId(c::COUNT + i as u32),
                required_ancestors: Vec::new(),
            });
        }
        for (i, &(name, _, flags)) in entries.iter().enumerate() {
            let singleton_name = self.names.intern(&format!("<Class:{name}>"));
            let singleton_super = if flags.contains(F::MODULE) {
                c::MODULE
            } else {
                c::CLASS
            };
            self.classes.push(ClassDef {
                name: singleton_name,
                flags: F::SINGLETON | (flags & F::HIDDEN),
                superclass: singleton_super,
                ancestors: Vec::new(),
                members: Default::default(),
                type_members: Vec::new(),
                attached_class: ClassId(i as u32),
                singleton_class: ClassId::NONE,
                required_ancestors: Vec::new(),
            });
        }
        for i in 0..self.classes.len() {
            self.rebuild_ancestors(ClassId(i as u32));
        }

        self.add_include(c::OBJECT, c::KERNEL);
        self.add_include(c::INTEGER, c::COMPARABLE);
        self.add_include(c::FLOAT, c::COMPARABLE);
        self.add_include(c::STRING, c::COMPARABLE);

        self.enter_type_member(c::HASH, "K", TypeId::TOP, TypeId::BOTTOM, None);
        self.enter_type_member(c::HASH, "V", TypeId::TOP, TypeId::BOTTOM, None);
        self.enter_type_member(c::ARRAY, "Elem", TypeId::TOP, TypeId::BOTTOM, None);
        self.enter_type_member(c::RANGE, "Elem", TypeId::TOP, TypeId::BOTTOM, None);
    }

    fn rebuild_ancestors(&mut self, id: ClassId) {
        let mut ancestors = vec![id];
        let mut current = self.classes[id.0 as usize].superclass;
        while !current.is_none() {
            ancestors.push(current);
            current = self.classes[current.0 as usize].superclass;
        }
        self.classes[id.0 as usize].ancestors = ancestors;
    }

    fn load_core_methods(&mut self) {
        use core_classes as c;

        // Intrinsic owners: signatures are untyped throughout; the handlers
        // compute everything.
        let t_singleton = self.class(c::T_MODULE).singleton_class;
        for name in ["untyped", "noreturn", "proc"] {
            self.enter_method(t_singleton, name).define();
        }
        for name in ["nilable", "must", "reveal_type"] {
            self.enter_method(t_singleton, name).arg("obj", TypeId::UNTYPED).define();
        }
        for name in ["any", "all"] {
            self.enter_method(t_singleton, name).rest_arg("types", TypeId::UNTYPED).define();
        }

        for generic in [c::ARRAY, c::HASH, c::RANGE] {
            let singleton = self.class(generic).singleton_class;
            self.enter_method(singleton, "[]").rest_arg("args", TypeId::UNTYPED).define();
        }

        self.enter_method(c::OBJECT, "class").define();
        self.enter_method(c::OBJECT, "singleton_class").define();
        self.enter_method(c::CLASS, "new").rest_arg("args", TypeId::UNTYPED).define();

        for name in [
            "<build-hash>",
            "<build-array>",
            "<build-range>",
            "<expand-splat>",
            "<call-with-splat>",
            "<call-with-block>",
            "<call-with-splat-and-block>",
            "<splat>",
            "<self-new>",
            "<suggest-type>",
        ] {
            self.enter_method(c::MAGIC, name).rest_arg("args", TypeId::UNTYPED).define();
        }

        self.enter_method(c::SHAPE, "[]").arg("key", TypeId::UNTYPED).define();
        self.enter_method(c::SHAPE, "[]=")
            .arg("key", TypeId::UNTYPED)
            .arg("value", TypeId::UNTYPED)
            .define();
        self.enter_method(c::SHAPE, "merge").rest_arg("other", TypeId::UNTYPED).define();
        self.enter_method(c::SHAPE, "to_hash").define();

        self.enter_method(c::TUPLE, "[]").arg("index", TypeId::UNTYPED).define();
        for name in ["first", "last", "min", "max", "to_a"] {
            self.enter_method(c::TUPLE, name).define();
        }
        self.enter_method(c::TUPLE, "concat").rest_arg("others", TypeId::UNTYPED).define();

        self.enter_method(c::ARRAY, "flatten")
            .opt_arg("depth", TypeId::UNTYPED)
            .define();
        self.enter_method(c::ARRAY, "product").rest_arg("others", TypeId::UNTYPED).define();
        self.enter_method(c::ARRAY, "zip").rest_arg("others", TypeId::UNTYPED).define();
        self.enter_method(c::ARRAY, "compact").define();

        self.enter_method(c::MODULE, "===").arg("other", TypeId::UNTYPED).define();

        // Block-pass coercion synthesizes `to_proc` sends; the symbol form
        // is the common case. Proc values skip the coercion entirely.
        self.enter_method(c::SYMBOL, "to_proc").define();
    }
}

/// Builder for method symbols. The trailing block parameter is appended
/// automatically (synthetic unless `block_arg` was called), preserving the
/// table invariant that every method ends in one.
pub struct MethodBuilder<'a> {
    table: &'a mut SymbolTable,
    owner: ClassId,
    name: NameId,
    args: Vec<ArgInfo>,
    result: TypeId,
    flags: MethodFlags,
    type_params: Vec<TypeVarId>,
    loc: Loc,
}

impl<'a> MethodBuilder<'a> {
    fn push_arg(mut self, name: &str, flags: ArgFlags, ty: TypeId) -> Self {
        let name_id = self.table.names.intern(name);
        self.args.push(ArgInfo {
            name: name_id,
            flags,
            ty,
            loc: self.loc,
        });
        self
    }

    /// A required positional parameter.
    pub fn arg(self, name: &str, ty: TypeId) -> Self {
        self.push_arg(name, ArgFlags::empty(), ty)
    }

    /// An optional positional parameter (`x = default`).
    pub fn opt_arg(self, name: &str, ty: TypeId) -> Self {
        self.push_arg(name, ArgFlags::DEFAULT, ty)
    }

    /// A rest parameter (`*rest`).
    pub fn rest_arg(self, name: &str, ty: TypeId) -> Self {
        self.push_arg(name, ArgFlags::REPEATED, ty)
    }

    /// A required keyword parameter (`x:`).
    pub fn kw_arg(self, name: &str, ty: TypeId) -> Self {
        self.push_arg(name, ArgFlags::KEYWORD, ty)
    }

    /// An optional keyword parameter (`x: default`).
    pub fn opt_kw_arg(self, name: &str, ty: TypeId) -> Self {
        self.push_arg(name, ArgFlags::KEYWORD | ArgFlags::DEFAULT, ty)
    }

    /// A keyword rest parameter (`**kwrest`).
    pub fn kwrest_arg(self, name: &str, ty: TypeId) -> Self {
        self.push_arg(name, ArgFlags::KEYWORD | ArgFlags::REPEATED, ty)
    }

    /// An explicit block parameter (`&blk`).
    pub fn block_arg(self, name: &str, ty: TypeId) -> Self {
        self.push_arg(name, ArgFlags::BLOCK, ty)
    }

    pub fn returns(mut self, ty: TypeId) -> Self {
        self.result = ty;
        self.flags |= MethodFlags::HAS_SIG;
        self
    }

    pub fn generic(mut self, type_params: Vec<TypeVarId>) -> Self {
        self.flags |= MethodFlags::GENERIC;
        self.type_params = type_params;
        self
    }

    pub fn loc(mut self, loc: Loc) -> Self {
        self.loc = loc;
        self
    }

    /// Enter the method into the table and the owner's member map.
    pub fn define(self) -> MethodId {
        self.define_impl(true)
    }

    /// Enter the method without registering it as a member; used for
    /// overload alternates, which are only reachable through the primary's
    /// `overloads` list.
    pub fn define_alternate(self) -> MethodId {
        self.define_impl(false)
    }

    fn define_impl(mut self, register_member: bool) -> MethodId {
        if !self.args.last().is_some_and(|a| a.is_block()) {
            let blk = self.table.names.intern("<blk>");
            self.args.push(ArgInfo {
                name: blk,
                flags: ArgFlags::BLOCK | ArgFlags::SYNTHETIC,
                ty: TypeId::UNTYPED,
                loc: self.loc,
            });
        }
        let owner_def = self.table.class(self.owner);
        let intrinsic = if owner_def.is_singleton() {
            let attached = owner_def.attached_class;
            lookup_intrinsic(attached, true, self.table.names.resolve(self.name))
        } else {
            lookup_intrinsic(self.owner, false, self.table.names.resolve(self.name))
        };
        let id = MethodId(self.table.methods.len() as u32);
        self.table.methods.push(MethodDef {
            name: self.name,
            owner: self.owner,
            args: self.args,
            result: self.result,
            flags: self.flags,
            type_params: self.type_params,
            overloads: Vec::new(),
            intrinsic,
            loc: self.loc,
        });
        if register_member {
            self.table.classes[self.owner.0 as usize]
                .members
                .insert(self.name, id);
        }
        trace!(method = id.0, owner = self.owner.0, "entered method");
        id
    }
}

#[cfg(test)]
#[path = "tests/table_tests.rs"]
mod tests;
