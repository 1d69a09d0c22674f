use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use tracing::{Level, debug, trace};

use crate::binding::KeyNormalizer;
use crate::dyn_value::{DynMap, DynValue};
use crate::error::BindError;
use crate::record::{Convertible, Introspect};
use crate::types::{DEFAULT_KEY_MARKER, FastHashSet, FastMap};


// ─── Config ─────────────────────────────────────────────────────────────────

/// Configuration for [`Marshaller::new_with_config`].
///
/// Deserializable from any serde format; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarshalConfig {
    /// Leading character stripped once from declared names that have no
    /// custom key.
    ///
    /// Default: `'_'`.
    pub key_marker: char,
    /// In debug builds, panic in `to_map` when two fields of the record
    /// resolve to the same key. Release builds never check.
    ///
    /// Default: `true`.
    pub debug_assert_unique_keys: bool,
}

impl Default for MarshalConfig {
    fn default() -> Self {
        Self {
            key_marker: DEFAULT_KEY_MARKER,
            debug_assert_unique_keys: true,
        }
    }
}

impl MarshalConfig {
    pub fn with_key_marker(mut self, marker: char) -> Self {
        self.key_marker = marker;
        self
    }

    pub fn with_unique_key_assertions(mut self, enabled: bool) -> Self {
        self.debug_assert_unique_keys = enabled;
        self
    }
}

// ─── Marshaller ─────────────────────────────────────────────────────────────

/// Converts records to and from [`DynMap`]s.
///
/// Stateless between calls: the same marshaller can serve any number of
/// records, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Marshaller {
    config: MarshalConfig,
    normalizer: KeyNormalizer,
}

impl Marshaller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_config(config: MarshalConfig) -> Self {
        let normalizer = KeyNormalizer::new(config.key_marker);
        Self { config, normalizer }
    }

    #[inline]
    pub fn config(&self) -> &MarshalConfig {
        &self.config
    }

    #[inline]
    pub fn normalizer(&self) -> &KeyNormalizer {
        &self.normalizer
    }

    // ════════════════════════════════════════════════════════════════════════
    // Record → map
    // ════════════════════════════════════════════════════════════════════════

    /// Collects every set field under its resolved key.
    ///
    /// Absent fields are omitted, not written as `Null`. When two fields
    /// resolve to the same key, the one listed later wins. Nested records
    /// are converted by this marshaller too.
    pub fn to_map<R: Introspect + ?Sized>(&self, record: &R) -> DynMap {
        #[cfg(debug_assertions)]
        {
            if self.config.debug_assert_unique_keys {
                if let Err(err) = self.validate_keys(record) {
                    panic!("to_map: {err}");
                }
            }
        }

        let mut map = DynMap::new();
        for field in record.bindings() {
            let key = field.resolved_key(&self.normalizer);
            let Some(value) = field.binding.get_dyn_with(self) else {
                trace!(field = field.declared_name, key = %key, "absent field omitted");
                continue;
            };
            if map.insert(key.clone(), value).is_some() {
                debug!(field = field.declared_name, key = %key, "duplicate resolved key, later field wins");
            }
        }
        map
    }

    // ════════════════════════════════════════════════════════════════════════
    // Map → record
    // ════════════════════════════════════════════════════════════════════════

    /// Builds a record with `make_default`, then sets every field whose
    /// resolved key is present in `map`.
    ///
    /// Fields with no entry keep their constructed value. Entries that do not
    /// fit the field's type leave it absent. Unknown keys are ignored.
    pub fn from_map<R, F>(&self, map: &DynMap, make_default: F) -> R
    where
        R: Introspect,
        F: FnOnce() -> R,
    {
        let mut record = make_default();
        for mut field in record.bindings_mut() {
            let key = field.resolved_key(&self.normalizer);
            let Some(value) = map.get(key.as_str()) else {
                continue;
            };
            field.set_with(value, self);
            if !field.binding.is_set() {
                debug!(
                    field = field.declared_name,
                    key = %key,
                    expected = field.binding.expected_kind(),
                    actual = %value.kind(),
                    "value does not fit field, left absent"
                );
            }
        }

        if tracing::enabled!(Level::TRACE) {
            let known: FastHashSet<SmolStr> = self.resolved_keys(&record).into_iter().collect();
            for key in map.keys().filter(|key| !known.contains(*key)) {
                trace!(key = %key, "unknown key ignored");
            }
        }
        record
    }

    /// [`from_map`](Self::from_map) for a dictionary argument: only `Object`
    /// is accepted.
    pub fn record_from_value<R, F>(&self, value: &DynValue, make_default: F) -> Result<R, BindError>
    where
        R: Introspect,
        F: FnOnce() -> R,
    {
        match value {
            DynValue::Object(map) => Ok(self.from_map(map, make_default)),
            other => Err(BindError::NotAnObject { kind: other.kind() }),
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Key checks
    // ════════════════════════════════════════════════════════════════════════

    /// Resolved keys of a record, in binding order.
    pub fn resolved_keys<R: Introspect + ?Sized>(&self, record: &R) -> Vec<SmolStr> {
        record
            .bindings()
            .iter()
            .map(|field| field.resolved_key(&self.normalizer))
            .collect()
    }

    /// Reports the first pair of fields sharing a resolved key. Never called
    /// by `to_map`/`from_map` outside debug assertions.
    pub fn validate_keys<R: Introspect + ?Sized>(&self, record: &R) -> Result<(), BindError> {
        let mut seen: FastMap<SmolStr, SmolStr> = FastMap::default();
        for field in record.bindings() {
            let key = field.resolved_key(&self.normalizer);
            if let Some(first) = seen.get(&key) {
                return Err(BindError::DuplicateKey {
                    key,
                    first: first.clone(),
                    second: SmolStr::new(field.declared_name),
                });
            }
            seen.insert(key, SmolStr::new(field.declared_name));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════
// Default-config entry points
// ════════════════════════════════════════════════════════════════════════

pub fn to_map<R: Introspect + ?Sized>(record: &R) -> DynMap {
    Marshaller::default().to_map(record)
}

pub fn from_map<R, F>(map: &DynMap, make_default: F) -> R
where
    R: Introspect,
    F: FnOnce() -> R,
{
    Marshaller::default().from_map(map, make_default)
}

/// [`from_map`] starting from `R::default()`.
pub fn from_map_default<R: Convertible>(map: &DynMap) -> R {
    from_map(map, R::default)
}

pub fn record_from_value<R, F>(value: &DynValue, make_default: F) -> Result<R, BindError>
where
    R: Introspect,
    F: FnOnce() -> R,
{
    Marshaller::default().record_from_value(value, make_default)
}

pub fn validate_keys<R: Introspect + ?Sized>(record: &R) -> Result<(), BindError> {
    Marshaller::default().validate_keys(record)
}
