//! Method symbols and their formal parameters.

use crate::intrinsics::Intrinsic;
use crate::names::NameTable;
use bitflags::bitflags;
use rbz_common::{ClassId, Loc, MethodId, NameId, TypeId, TypeVarId};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ArgFlags: u8 {
        /// A keyword parameter (`x:` / `x: default`).
        const KEYWORD = 1 << 0;
        /// Has a default value; may be omitted at the call site.
        const DEFAULT = 1 << 1;
        /// A rest parameter (`*rest` positionally, `**kwrest` with KEYWORD).
        const REPEATED = 1 << 2;
        /// The trailing block parameter.
        const BLOCK = 1 << 3;
        /// Inserted by the loader rather than written by the user (the
        /// implicit block parameter of block-less definitions).
        const SYNTHETIC = 1 << 4;
    }
}

/// One formal parameter.
#[derive(Clone, Debug)]
pub struct ArgInfo {
    pub name: NameId,
    pub flags: ArgFlags,
    pub ty: TypeId,
    pub loc: Loc,
}

impl ArgInfo {
    pub fn is_keyword(&self) -> bool {
        self.flags.contains(ArgFlags::KEYWORD)
    }

    pub fn has_default(&self) -> bool {
        self.flags.contains(ArgFlags::DEFAULT)
    }

    pub fn is_repeated(&self) -> bool {
        self.flags.contains(ArgFlags::REPEATED)
    }

    pub fn is_block(&self) -> bool {
        self.flags.contains(ArgFlags::BLOCK)
    }

    pub fn is_synthetic(&self) -> bool {
        self.flags.contains(ArgFlags::SYNTHETIC)
    }

    /// Render the parameter the way it appears in a definition: `x`, `x:`,
    /// `*x`, `**x`, `&x`.
    pub fn rendered_name(&self, names: &NameTable) -> String {
        let base = names.resolve(self.name);
        if self.is_block() {
            format!("&{base}")
        } else if self.is_keyword() && self.is_repeated() {
            format!("**{base}")
        } else if self.is_keyword() {
            format!("{base}:")
        } else if self.is_repeated() {
            format!("*{base}")
        } else {
            base.to_string()
        }
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct MethodFlags: u8 {
        /// Primary of an overload chain; `overloads` lists the alternates.
        const OVERLOADED = 1 << 0;
        /// Declares method-level type parameters.
        const GENERIC = 1 << 1;
        /// Carries a signature (untyped bare definitions do not).
        const HAS_SIG = 1 << 2;
    }
}

/// A method symbol.
///
/// Invariant: `args` is never empty and its last element is the block
/// parameter (synthetic when the definition declared none).
#[derive(Clone, Debug)]
pub struct MethodDef {
    pub name: NameId,
    pub owner: ClassId,
    pub args: Vec<ArgInfo>,
    pub result: TypeId,
    pub flags: MethodFlags,
    pub type_params: Vec<TypeVarId>,
    /// Alternate signatures, in declaration order. Only meaningful when
    /// `MethodFlags::OVERLOADED` is set on this, the primary.
    pub overloads: Vec<MethodId>,
    pub intrinsic: Option<Intrinsic>,
    pub loc: Loc,
}

impl MethodDef {
    /// All formals except the trailing block parameter.
    pub fn formals(&self) -> &[ArgInfo] {
        &self.args[..self.args.len() - 1]
    }

    /// The trailing block parameter.
    pub fn block_arg(&self) -> &ArgInfo {
        self.args.last().expect("methods always carry a block parameter")
    }

    /// Number of non-block formals; the overload resolver's sort key.
    pub fn arity(&self) -> usize {
        self.formals().len()
    }

    pub fn is_overloaded(&self) -> bool {
        self.flags.contains(MethodFlags::OVERLOADED)
    }

    pub fn is_generic(&self) -> bool {
        self.flags.contains(MethodFlags::GENERIC)
    }

    pub fn has_sig(&self) -> bool {
        self.flags.contains(MethodFlags::HAS_SIG)
    }

    /// Whether any formal is a keyword parameter.
    pub fn has_keyword_formals(&self) -> bool {
        self.formals().iter().any(|a| a.is_keyword())
    }
}

/// Setter methods (`name=`) return their right-hand side. Operators that
/// merely end in `=` are not setters.
pub fn is_setter_name(name: &str) -> bool {
    name.ends_with('=')
        && !matches!(name, "==" | "!=" | "<=" | ">=" | "===" | "<=>" | "=~")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setter_names_exclude_operators() {
        assert!(is_setter_name("foo="));
        assert!(is_setter_name("[]="));
        for op in ["==", "!=", "<=", ">=", "===", "<=>", "=~"] {
            assert!(!is_setter_name(op), "{op} is not a setter");
        }
        assert!(!is_setter_name("foo"));
    }
}
