//! Test fixtures.
//!
//! A `TestEnv` bundles a core-loaded symbol table, a type store, and default
//! options; tests extend the table with their own classes and methods, then
//! dispatch through the convenience helpers. Used by both the unit tests in
//! `src/tests/` and the integration tests in `tests/`.

use crate::args::{CallLocs, DispatchArgs, TypeAndOrigins};
use crate::ctx::DispatchCtx;
use crate::dispatcher::dispatch;
use crate::result::DispatchResult;
use rbz_common::{CheckerOptions, FileId, Loc, Span, Strictness, TypeId};
use rbz_symbols::SymbolTable;
use rbz_types::TypeStore;

pub struct TestEnv {
    pub symbols: SymbolTable,
    pub types: TypeStore,
    pub options: CheckerOptions,
    pub file: FileId,
}

impl TestEnv {
    pub fn new() -> Self {
        let mut symbols = SymbolTable::with_core();
        let file = symbols.enter_file(Strictness::True);
        TestEnv {
            symbols,
            types: TypeStore::new(),
            options: CheckerOptions::default(),
            file,
        }
    }

    pub fn strict() -> Self {
        let mut env = TestEnv::new();
        env.file = env.symbols.enter_file(Strictness::Strict);
        env
    }

    pub fn ctx(&self) -> DispatchCtx<'_> {
        DispatchCtx::new(&self.symbols, &self.types, &self.options)
    }

    pub fn loc(&self, start: u32, end: u32) -> Loc {
        Loc::new(self.file, Span::new(start, end))
    }

    /// A previously-interned name (method definitions intern as they go).
    pub fn name(&self, text: &str) -> rbz_common::NameId {
        self.symbols
            .names()
            .lookup(text)
            .unwrap_or_else(|| panic!("name `{text}` was never interned"))
    }

    /// Args for a plain positional call with per-argument spans, so
    /// diagnostics and autocorrects have something to point at.
    pub fn call_args(&self, receiver: TypeId, name: &str, pos: Vec<TypeId>) -> DispatchArgs {
        let mut args = DispatchArgs::simple(
            self.name(name),
            receiver,
            pos.into_iter().map(TypeAndOrigins::synthetic).collect(),
        );
        args.locs = self.locs_for(args.args.len());
        args
    }

    /// Args with keyword arguments appended as key/value pairs.
    pub fn kw_call_args(
        &self,
        receiver: TypeId,
        name: &str,
        pos: Vec<TypeId>,
        kws: Vec<(&str, TypeId)>,
    ) -> DispatchArgs {
        let mut all: Vec<TypeAndOrigins> =
            pos.into_iter().map(TypeAndOrigins::synthetic).collect();
        let num_pos_args = all.len();
        for (key, value) in kws {
            let key_type = self.types.literal_symbol(self.name(key));
            all.push(TypeAndOrigins::synthetic(key_type));
            all.push(TypeAndOrigins::synthetic(value));
        }
        let mut args = DispatchArgs::simple(self.name(name), receiver, all);
        args.num_pos_args = num_pos_args;
        args.locs = self.locs_for(args.args.len());
        args
    }

    fn locs_for(&self, arg_count: usize) -> CallLocs {
        // Synthetic but well-formed spans: receiver, then one span per
        // argument, all inside the call.
        let args = (0..arg_count)
            .map(|i| Span::new(10 + i as u32 * 10, 18 + i as u32 * 10))
            .collect();
        CallLocs {
            file: self.file,
            call: Span::new(0, 10 + arg_count as u32 * 10),
            receiver: Span::new(0, 4),
            args,
        }
    }

    pub fn dispatch(&self, args: &DispatchArgs) -> DispatchResult {
        dispatch(&self.ctx(), args.this_type, args)
    }

    /// Dispatch a plain positional call.
    pub fn call(&self, receiver: TypeId, name: &str, pos: Vec<TypeId>) -> DispatchResult {
        let args = self.call_args(receiver, name, pos);
        self.dispatch(&args)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        TestEnv::new()
    }
}
