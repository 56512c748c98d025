//! Diagnostics as data.
//!
//! Constructing an error allocates a builder which collects a header,
//! sections (multi-line explanations anchored at locations), notes, and
//! autocorrect suggestions. Builders either produce a `Diagnostic` that the
//! caller queues on its dispatch result, or nothing at all when the builder
//! was opened disabled (suppressed sub-dispatches). Errors are never raised
//! as control-flow transfers.

use crate::span::Loc;
use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Error,
    Info,
}

/// A single text replacement proposed by an autocorrect.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Edit {
    pub loc: Loc,
    pub replacement: String,
}

/// A named group of edits that together fix the diagnosed problem.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Autocorrect {
    pub title: String,
    pub edits: Vec<Edit>,
}

/// A multi-line explanation block: a header line followed by location-anchored
/// entries ("Expected `X` for argument `y`:", "Got `Z` originating from:").
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Section {
    pub header: String,
    pub entries: Vec<(Loc, String)>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub loc: Loc,
    pub message: String,
    pub sections: Vec<Section>,
    pub notes: Vec<String>,
    pub autocorrects: Vec<Autocorrect>,
}

impl Diagnostic {
    /// Machine-readable form, for hosts that forward diagnostics as JSON.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Stable diagnostic codes. One constant per taxonomy entry; codes are part
/// of the tool's public surface and never reused.
pub mod diagnostic_codes {
    pub const CALL_ON_VOID: u32 = 7001;
    pub const METHOD_ARGUMENT_MISMATCH: u32 = 7002;
    pub const UNKNOWN_METHOD: u32 = 7003;
    pub const METHOD_ARGUMENT_COUNT_MISMATCH: u32 = 7004;
    pub const BARE_TYPE_USAGE: u32 = 7005;
    pub const INVALID_CAST: u32 = 7006;
    pub const GENERIC_METHOD_CONSTRAINT_UNSOLVED: u32 = 7007;
    pub const TAKES_NO_BLOCK: u32 = 7008;
    pub const BLOCK_NOT_PASSED: u32 = 7009;
    pub const PROC_ARITY_UNKNOWN: u32 = 7010;
    pub const GENERIC_PASSED_AS_BLOCK: u32 = 7011;
    pub const UNTYPED_SPLAT: u32 = 7012;
    pub const KEYWORD_ARG_HASH_WITHOUT_SPLAT: u32 = 7013;
    pub const GENERIC_ARGUMENT_COUNT_MISMATCH: u32 = 7014;
    pub const GENERIC_ARGUMENT_KEYWORD_ARGS: u32 = 7015;
    pub const GENERIC_TYPE_PARAM_BOUND_MISMATCH: u32 = 7016;
    pub const REVEAL_TYPE: u32 = 7017;
    pub const UNTYPED_CONSTANT_SUGGESTION: u32 = 7018;
    pub const EXPECTED_LITERAL_TYPE: u32 = 7019;
    pub const META_TYPE_DISPATCH_CALL: u32 = 7020;

    /// Default category for a code. Everything is an error except the two
    /// informational codes.
    pub fn category(code: u32) -> super::DiagnosticCategory {
        match code {
            REVEAL_TYPE | UNTYPED_CONSTANT_SUGGESTION => super::DiagnosticCategory::Info,
            _ => super::DiagnosticCategory::Error,
        }
    }
}

/// Collects one diagnostic.
///
/// A builder opened with `enabled = false` accepts every call and produces
/// `None` from [`ErrorBuilder::build`]; suppressed sub-dispatches use this so
/// the emitting code stays branch-free.
#[derive(Debug)]
pub struct ErrorBuilder {
    enabled: bool,
    diag: Diagnostic,
}

impl ErrorBuilder {
    pub fn new(enabled: bool, loc: Loc, code: u32, message: impl Into<String>) -> Self {
        ErrorBuilder {
            enabled,
            diag: Diagnostic {
                code,
                category: diagnostic_codes::category(code),
                loc,
                message: message.into(),
                sections: Vec::new(),
                notes: Vec::new(),
                autocorrects: Vec::new(),
            },
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn section(&mut self, header: impl Into<String>, entries: Vec<(Loc, String)>) -> &mut Self {
        if self.enabled {
            self.diag.sections.push(Section {
                header: header.into(),
                entries,
            });
        }
        self
    }

    pub fn note(&mut self, note: impl Into<String>) -> &mut Self {
        if self.enabled {
            self.diag.notes.push(note.into());
        }
        self
    }

    pub fn autocorrect(&mut self, title: impl Into<String>, edits: Vec<Edit>) -> &mut Self {
        if self.enabled {
            self.diag.autocorrects.push(Autocorrect {
                title: title.into(),
                edits,
            });
        }
        self
    }

    pub fn build(self) -> Option<Diagnostic> {
        self.enabled.then_some(self.diag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_builder_produces_nothing() {
        let mut b = ErrorBuilder::new(false, Loc::none(), diagnostic_codes::UNKNOWN_METHOD, "nope");
        b.note("ignored");
        b.section("ignored", vec![]);
        assert!(b.build().is_none());
    }

    #[test]
    fn enabled_builder_collects_everything() {
        let mut b = ErrorBuilder::new(
            true,
            Loc::none(),
            diagnostic_codes::METHOD_ARGUMENT_MISMATCH,
            "Expected `Integer` but found `String`",
        );
        b.section("Got `String` originating from:", vec![(Loc::none(), String::new())]);
        b.note("see the sig");
        let d = b.build().expect("enabled builder must build");
        assert_eq!(d.code, diagnostic_codes::METHOD_ARGUMENT_MISMATCH);
        assert_eq!(d.category, DiagnosticCategory::Error);
        assert_eq!(d.sections.len(), 1);
        assert_eq!(d.notes.len(), 1);
    }

    #[test]
    fn diagnostics_serialize_to_json() {
        let d = ErrorBuilder::new(true, Loc::none(), diagnostic_codes::UNKNOWN_METHOD, "nope")
            .build()
            .expect("builds");
        let json = d.to_json();
        assert_eq!(json["code"], diagnostic_codes::UNKNOWN_METHOD);
        assert_eq!(json["message"], "nope");
    }

    #[test]
    fn informational_codes_get_info_category() {
        let d = ErrorBuilder::new(true, Loc::none(), diagnostic_codes::REVEAL_TYPE, "Revealed type")
            .build()
            .expect("builds");
        assert_eq!(d.category, DiagnosticCategory::Info);
    }
}
