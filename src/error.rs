// ─── Error ──────────────────────────────────────────────────────────────────
use smol_str::SmolStr;
use thiserror::Error;

use crate::types::ValueKind;

/// Errors from the opt-in checking helpers.
///
/// `to_map` and `from_map` never return these: a value that does not fit its
/// binding degrades to an absent field instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("resolved key `{key}` is bound by both `{first}` and `{second}`")]
    DuplicateKey {
        key: SmolStr,
        first: SmolStr,
        second: SmolStr,
    },
    #[error("expected an object, got {kind}")]
    NotAnObject { kind: ValueKind },
}
