//! Name interning.
//!
//! Method and argument names are interned once and compared by id. The
//! well-known names the dispatcher matches on (`new`, `initialize`, the
//! hidden `Magic` operations, ...) are pre-interned in a fixed order so they
//! are available as constants; `names::tests` pins the correspondence.

use rbz_common::NameId;
use rustc_hash::FxHashMap;

/// Interned name storage.
#[derive(Debug, Default)]
pub struct NameTable {
    names: Vec<String>,
    by_text: FxHashMap<String, NameId>,
}

/// Names the dispatcher recognizes structurally. Hidden operations use
/// angle-bracket names that no user identifier can collide with.
pub mod well_known_names {
    use rbz_common::NameId;

    pub const NEW: NameId = NameId(0);
    pub const INITIALIZE: NameId = NameId(1);
    pub const CALL: NameId = NameId(2);
    pub const TO_PROC: NameId = NameId(3);
    pub const TO_A: NameId = NameId(4);
    pub const TO_ARY: NameId = NameId(5);
    pub const TO_HASH: NameId = NameId(6);
    pub const SQUARE_BRACKETS: NameId = NameId(7);
    pub const SQUARE_BRACKETS_EQ: NameId = NameId(8);
    pub const TRIPLE_EQ: NameId = NameId(9);
    pub const CLASS: NameId = NameId(10);
    pub const SINGLETON_CLASS: NameId = NameId(11);
    pub const UNTYPED: NameId = NameId(12);
    pub const NORETURN: NameId = NameId(13);
    pub const NILABLE: NameId = NameId(14);
    pub const ANY: NameId = NameId(15);
    pub const ALL: NameId = NameId(16);
    pub const MUST: NameId = NameId(17);
    pub const REVEAL_TYPE: NameId = NameId(18);
    pub const PROC: NameId = NameId(19);
    pub const BUILD_HASH: NameId = NameId(20);
    pub const BUILD_ARRAY: NameId = NameId(21);
    pub const BUILD_RANGE: NameId = NameId(22);
    pub const EXPAND_SPLAT: NameId = NameId(23);
    pub const CALL_WITH_SPLAT: NameId = NameId(24);
    pub const CALL_WITH_BLOCK: NameId = NameId(25);
    pub const CALL_WITH_SPLAT_AND_BLOCK: NameId = NameId(26);
    pub const SPLAT: NameId = NameId(27);
    pub const SELF_NEW: NameId = NameId(28);
    pub const SUGGEST_TYPE: NameId = NameId(29);
    pub const SUPER: NameId = NameId(30);
    pub const FLATTEN: NameId = NameId(31);
    pub const PRODUCT: NameId = NameId(32);
    pub const ZIP: NameId = NameId(33);
    pub const COMPACT: NameId = NameId(34);
    pub const FIRST: NameId = NameId(35);
    pub const LAST: NameId = NameId(36);
    pub const MIN: NameId = NameId(37);
    pub const MAX: NameId = NameId(38);
    pub const CONCAT: NameId = NameId(39);
    pub const MERGE: NameId = NameId(40);
    pub const ATTACHED_CLASS: NameId = NameId(41);

    /// Interned in this exact order by `NameTable::new`.
    pub const CORE_NAMES: &[&str] = &[
        "new",
        "initialize",
        "call",
        "to_proc",
        "to_a",
        "to_ary",
        "to_hash",
        "[]",
        "[]=",
        "===",
        "class",
        "singleton_class",
        "untyped",
        "noreturn",
        "nilable",
        "any",
        "all",
        "must",
        "reveal_type",
        "proc",
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
        "<super>",
        "flatten",
        "product",
        "zip",
        "compact",
        "first",
        "last",
        "min",
        "max",
        "concat",
        "merge",
        "<AttachedClass>",
    ];
}

impl NameTable {
    /// Create a table with the well-known names pre-interned.
    pub fn new() -> Self {
        let mut table = NameTable::default();
        for text in well_known_names::CORE_NAMES {
            table.intern(text);
        }
        table
    }

    /// Intern `text`, returning the existing id if already present.
    pub fn intern(&mut self, text: &str) -> NameId {
        if let Some(&id) = self.by_text.get(text) {
            return id;
        }
        let id = NameId(self.names.len() as u32);
        self.names.push(text.to_string());
        self.by_text.insert(text.to_string(), id);
        id
    }

    /// Look up a name without interning.
    pub fn lookup(&self, text: &str) -> Option<NameId> {
        self.by_text.get(text).copied()
    }

    pub fn resolve(&self, id: NameId) -> &str {
        &self.names[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_ids_match_core_name_order() {
        let table = NameTable::new();
        assert_eq!(table.resolve(well_known_names::NEW), "new");
        assert_eq!(table.resolve(well_known_names::INITIALIZE), "initialize");
        assert_eq!(table.resolve(well_known_names::SQUARE_BRACKETS_EQ), "[]=");
        assert_eq!(table.resolve(well_known_names::BUILD_HASH), "<build-hash>");
        assert_eq!(table.resolve(well_known_names::SUPER), "<super>");
        assert_eq!(
            table.resolve(well_known_names::ATTACHED_CLASS),
            "<AttachedClass>"
        );
        assert_eq!(
            well_known_names::CORE_NAMES.len(),
            well_known_names::ATTACHED_CLASS.0 as usize + 1
        );
    }

    #[test]
    fn intern_is_idempotent() {
        let mut table = NameTable::new();
        let a = table.intern("foo");
        let b = table.intern("foo");
        assert_eq!(a, b);
        assert_eq!(table.lookup("foo"), Some(a));
        assert_eq!(table.lookup("bar"), None);
    }
}
