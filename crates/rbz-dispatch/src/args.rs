//! Call descriptions fed to `dispatch`.

use rbz_common::{FileId, Loc, NameId, Span, TypeId};
use smallvec::SmallVec;

/// A type plus the source locations it was inferred from. Diagnostics use
/// the origins for "originating from:" sections.
#[derive(Clone, Debug)]
pub struct TypeAndOrigins {
    pub ty: TypeId,
    pub origins: SmallVec<[Loc; 2]>,
}

impl TypeAndOrigins {
    pub fn new(ty: TypeId, origin: Loc) -> Self {
        let mut origins = SmallVec::new();
        if origin.exists() {
            origins.push(origin);
        }
        TypeAndOrigins { ty, origins }
    }

    /// A type with no recorded origin (synthesized values).
    pub fn synthetic(ty: TypeId) -> Self {
        TypeAndOrigins {
            ty,
            origins: SmallVec::new(),
        }
    }
}

/// Source ranges of the call, for diagnostics. All spans are in `file`.
#[derive(Clone, Debug)]
pub struct CallLocs {
    pub file: FileId,
    /// The whole send.
    pub call: Span,
    /// The receiver expression.
    pub receiver: Span,
    /// One span per actual argument.
    pub args: Vec<Span>,
}

impl CallLocs {
    pub fn synthetic() -> Self {
        CallLocs {
            file: FileId::NONE,
            call: Span::dummy(),
            receiver: Span::dummy(),
            args: Vec::new(),
        }
    }

    pub fn call_loc(&self) -> Loc {
        Loc::new(self.file, self.call)
    }

    pub fn receiver_loc(&self) -> Loc {
        Loc::new(self.file, self.receiver)
    }

    /// The `i`-th argument's location, falling back to the call itself.
    pub fn arg_loc(&self, i: usize) -> Loc {
        match self.args.get(i) {
            Some(&span) => Loc::new(self.file, span),
            None => self.call_loc(),
        }
    }
}

/// An attached block.
#[derive(Clone, Debug)]
pub struct BlockArg {
    /// Type of the block value (a proc; bare `Proc` when the arity is
    /// unknown).
    pub ty: TypeAndOrigins,
    /// Parsed arity of the literal block, when written inline.
    pub arity: Option<usize>,
    /// Span of the block or block-pass argument.
    pub span: Span,
    /// Set when the block was written with `&:sym` block-pass sugar; the
    /// nil-receiver autocorrect expands it to an explicit block.
    pub symbol_shorthand: Option<NameId>,
}

impl BlockArg {
    pub fn new(ty: TypeAndOrigins, span: Span) -> Self {
        BlockArg {
            ty,
            arity: None,
            span,
            symbol_shorthand: None,
        }
    }
}

/// One call, as presented to the dispatcher.
///
/// `args` holds positional arguments first, then alternating keyword
/// key/value pairs, with an optional trailing keyword-rest argument when
/// `(args.len() - num_pos_args)` is odd.
#[derive(Clone, Debug)]
pub struct DispatchArgs {
    pub name: NameId,
    pub locs: CallLocs,
    pub num_pos_args: usize,
    pub args: Vec<TypeAndOrigins>,
    /// The receiver component currently being dispatched (union and
    /// intersection recursion narrows this).
    pub this_type: TypeId,
    /// The original static receiver, for self-type substitution.
    pub self_type: TypeId,
    /// The broadest receiver, for diagnostics.
    pub full_type: TypeId,
    pub block: Option<BlockArg>,
    /// Produce results but no diagnostics.
    pub suppress_errors: bool,
    /// Fallback origin for unassigned locals.
    pub origin_for_uninitialized: Loc,
}

impl DispatchArgs {
    /// A plain call of `name` on `receiver` with the given positional
    /// argument types.
    pub fn simple(name: NameId, receiver: TypeId, args: Vec<TypeAndOrigins>) -> Self {
        let num_pos_args = args.len();
        DispatchArgs {
            name,
            locs: CallLocs::synthetic(),
            num_pos_args,
            args,
            this_type: receiver,
            self_type: receiver,
            full_type: receiver,
            block: None,
            suppress_errors: false,
            origin_for_uninitialized: Loc::none(),
        }
    }

    /// The same call against one component of a compound receiver.
    pub fn with_this_type(&self, this_type: TypeId) -> Self {
        let mut next = self.clone();
        next.this_type = this_type;
        next
    }

    /// The same call with diagnostics turned off.
    pub fn with_errors_suppressed(&self) -> Self {
        let mut next = self.clone();
        next.suppress_errors = true;
        next
    }

    /// Leading positional arguments.
    pub fn pos_args(&self) -> &[TypeAndOrigins] {
        &self.args[..self.num_pos_args.min(self.args.len())]
    }

    /// Everything after the positional arguments: keyword key/value pairs
    /// plus an optional trailing kwsplat.
    pub fn kw_args(&self) -> &[TypeAndOrigins] {
        &self.args[self.num_pos_args.min(self.args.len())..]
    }

    pub fn has_kw_args(&self) -> bool {
        !self.kw_args().is_empty()
    }
}
