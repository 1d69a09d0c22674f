use smol_str::SmolStr;

use super::field::FieldBinding;
use crate::deserialization::FromDyn;
use crate::dyn_value::DynValue;
use crate::marshaller::Marshaller;
use crate::serialization::ToDyn;

/// A bound record field: an optional value of type `V` plus an optional
/// explicit external key.
///
/// Hold one as a named member of a record and list it with
/// [`convertible!`](crate::convertible); the marshaller reads and writes it
/// through [`FieldBinding`].
///
/// # Silent mismatch
///
/// [`Bind::set`] does not fail. A value of the wrong type, or `Null`, leaves
/// the slot **absent**, exactly as if the key had been missing from the map.
/// Callers that need strict input must check [`Bind::is_set`] afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Bind<V> {
    slot: Option<V>,
    custom_key: Option<SmolStr>,
}

impl<V> Bind<V> {
    /// Empty slot, key derived from the declared field name.
    pub const fn new() -> Self {
        Self {
            slot: None,
            custom_key: None,
        }
    }

    /// Empty slot serialized under `key` instead of the declared name.
    pub fn with_key(key: impl Into<SmolStr>) -> Self {
        Self {
            slot: None,
            custom_key: Some(key.into()),
        }
    }

    /// Pre-populated slot. The value survives `from_map` when the map has no
    /// entry for this field.
    pub fn with_value(value: V) -> Self {
        Self {
            slot: Some(value),
            custom_key: None,
        }
    }

    pub fn with_value_and_key(value: V, key: impl Into<SmolStr>) -> Self {
        Self {
            slot: Some(value),
            custom_key: Some(key.into()),
        }
    }

    #[inline]
    pub fn get(&self) -> Option<&V> {
        self.slot.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self) -> Option<&mut V> {
        self.slot.as_mut()
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.slot.is_some()
    }

    #[inline]
    pub fn key(&self) -> Option<&str> {
        self.custom_key.as_deref()
    }

    /// Stores a typed value directly, returning the previous one.
    pub fn replace(&mut self, value: V) -> Option<V> {
        self.slot.replace(value)
    }

    pub fn take(&mut self) -> Option<V> {
        self.slot.take()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    pub fn into_inner(self) -> Option<V> {
        self.slot
    }
}

impl<V: FromDyn> Bind<V> {
    /// Interprets `value` as `V`. A mismatch clears the slot; see the
    /// type-level docs.
    pub fn set(&mut self, value: &DynValue) {
        self.slot = V::from_dyn(value);
    }
}

impl<V> Default for Bind<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> From<V> for Bind<V> {
    fn from(value: V) -> Self {
        Self::with_value(value)
    }
}

impl<V: ToDyn + FromDyn> FieldBinding for Bind<V> {
    #[inline]
    fn custom_key(&self) -> Option<&str> {
        self.key()
    }

    #[inline]
    fn get_dyn(&self) -> Option<DynValue> {
        self.slot.as_ref().map(ToDyn::to_dyn)
    }

    #[inline]
    fn set_dyn(&mut self, value: &DynValue) {
        self.set(value);
    }

    #[inline]
    fn get_dyn_with(&self, marshaller: &Marshaller) -> Option<DynValue> {
        self.slot.as_ref().map(|value| value.to_dyn_with(marshaller))
    }

    #[inline]
    fn set_dyn_with(&mut self, value: &DynValue, marshaller: &Marshaller) {
        self.slot = V::from_dyn_with(value, marshaller);
    }

    #[inline]
    fn is_set(&self) -> bool {
        self.slot.is_some()
    }

    #[inline]
    fn expected_kind(&self) -> &'static str {
        V::KIND
    }
}
