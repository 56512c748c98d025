//! Read-only context threaded through a dispatch.

use rbz_common::CheckerOptions;
use rbz_symbols::SymbolTable;
use rbz_types::TypeStore;

/// Everything a dispatch reads: the symbol table, the type arena, and the
/// checker options. `source` optionally carries the current file's text for
/// the source-scanning autocorrects; scans are approximate and their failure
/// never fails a dispatch.
pub struct DispatchCtx<'a> {
    pub symbols: &'a SymbolTable,
    pub types: &'a TypeStore,
    pub options: &'a CheckerOptions,
    pub source: Option<&'a str>,
}

impl<'a> DispatchCtx<'a> {
    pub fn new(symbols: &'a SymbolTable, types: &'a TypeStore, options: &'a CheckerOptions) -> Self {
        DispatchCtx {
            symbols,
            types,
            options,
            source: None,
        }
    }

    pub fn with_source(mut self, source: &'a str) -> Self {
        self.source = Some(source);
        self
    }
}
