use rustc_hash::FxHasher;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::BuildHasherDefault;

pub type FastMap<K, V> = HashMap<K, V, BuildHasherDefault<FxHasher>>;
pub type FastHashSet<T> = HashSet<T, BuildHasherDefault<FxHasher>>;

/// Leading character stripped from declared field names when no custom key
/// is given (`_name` → `name`).
pub const DEFAULT_KEY_MARKER: char = '_';

// ─── Value Kinds ────────────────────────────────────────────────────────────

/// The variant of a [`DynValue`](crate::dyn_value::DynValue), used in logs
/// and errors. Numbers keep their width: an `i64` is never a `u64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    I64,
    U64,
    F64,
    Str,
    Array,
    Object,
}

impl ValueKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::I64 => "i64",
            ValueKind::U64 => "u64",
            ValueKind::F64 => "f64",
            ValueKind::Str => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
