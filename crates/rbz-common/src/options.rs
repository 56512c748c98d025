//! Checker configuration consumed by the dispatch core.

use serde::{Deserialize, Serialize};

/// Per-file strictness level. Controls which diagnostics fire and whether a
/// file may define overloads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strictness {
    /// File is invisible to the checker.
    Ignore,
    /// Signatures are recorded but call sites are not reported.
    False,
    /// Ordinary checking.
    #[default]
    True,
    /// Checking plus strict-only diagnostics (unknown proc arities, untyped
    /// splat consumption).
    Strict,
}

/// Global knobs for the dispatch core.
///
/// These correspond to command-line or project-file configuration in the
/// host; the core only ever reads them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckerOptions {
    /// Deprecation gate: passing a bare trailing hash where keyword
    /// arguments are expected reports `KeywordArgHashWithoutSplat` with a
    /// `**`-prefix autocorrect.
    pub strict_keyword_args: bool,

    /// Policy knob: whether a typed, hash-derived (non-shape) kwsplat may
    /// satisfy a `**kwargs` formal. Off by default: non-shape hashes never
    /// satisfy keyword parameters, matching the historical behavior.
    pub typed_splats_satisfy_kwargs: bool,

    /// Rendered name of the nil-stripping helper suggested by autocorrects
    /// on nil receivers ("wrap in `T.must(...)`").
    pub nil_wrap_helper: String,

    /// Feature gate: when member lookup fails on the receiver, scan its
    /// required ancestors (in order) and use the first match.
    pub required_ancestors: bool,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        CheckerOptions {
            strict_keyword_args: false,
            typed_splats_satisfy_kwargs: false,
            nil_wrap_helper: "T.must".to_string(),
            required_ancestors: true,
        }
    }
}

impl Strictness {
    /// Overload definitions are only legal in files at this level or above.
    pub fn permits_overloads(self) -> bool {
        self >= Strictness::True
    }
}
