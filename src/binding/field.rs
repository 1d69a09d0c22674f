use smol_str::SmolStr;

use super::normalize::KeyNormalizer;
use crate::dyn_value::DynValue;
use crate::marshaller::Marshaller;

/// Object-safe view of a bound field, whatever its value type.
///
/// Every [`Bind<V>`](super::Bind) implements this; records hand out
/// `&dyn FieldBinding` so the marshaller never needs to know `V`.
pub trait FieldBinding {
    /// Explicit external key, if the field was declared with one.
    fn custom_key(&self) -> Option<&str>;

    /// Current value as a `DynValue`, or `None` when the slot is absent.
    fn get_dyn(&self) -> Option<DynValue>;

    /// Stores `value` if it fits the bound type, otherwise clears the slot.
    /// Never fails.
    fn set_dyn(&mut self, value: &DynValue);

    /// [`get_dyn`](Self::get_dyn) with nested records converted by
    /// `marshaller` rather than the default one.
    fn get_dyn_with(&self, _marshaller: &Marshaller) -> Option<DynValue> {
        self.get_dyn()
    }

    /// [`set_dyn`](Self::set_dyn) with nested records built by `marshaller`.
    fn set_dyn_with(&mut self, value: &DynValue, _marshaller: &Marshaller) {
        self.set_dyn(value);
    }

    /// Whether the slot currently holds a value.
    fn is_set(&self) -> bool;

    /// Logical type name of the slot, for diagnostics.
    fn expected_kind(&self) -> &'static str;

    /// The custom key if present, else the normalized declared name.
    fn resolved_key(&self, declared_name: &str, normalizer: &KeyNormalizer) -> SmolStr {
        match self.custom_key() {
            Some(key) => SmolStr::new(key),
            None => SmolStr::new(normalizer.normalize(declared_name)),
        }
    }
}

// ─── Bound fields ───────────────────────────────────────────────────────────

/// A `(declared_name, binding)` pair, read-only.
#[derive(Clone, Copy)]
pub struct BoundField<'a> {
    pub declared_name: &'a str,
    pub binding: &'a dyn FieldBinding,
}

impl<'a> BoundField<'a> {
    #[inline]
    pub fn new(declared_name: &'a str, binding: &'a dyn FieldBinding) -> Self {
        Self {
            declared_name,
            binding,
        }
    }

    #[inline]
    pub fn resolved_key(&self, normalizer: &KeyNormalizer) -> SmolStr {
        self.binding.resolved_key(self.declared_name, normalizer)
    }
}

/// A `(declared_name, binding)` pair that can be written through.
pub struct BoundFieldMut<'a> {
    pub declared_name: &'a str,
    pub binding: &'a mut dyn FieldBinding,
}

impl<'a> BoundFieldMut<'a> {
    #[inline]
    pub fn new(declared_name: &'a str, binding: &'a mut dyn FieldBinding) -> Self {
        Self {
            declared_name,
            binding,
        }
    }

    #[inline]
    pub fn resolved_key(&self, normalizer: &KeyNormalizer) -> SmolStr {
        self.binding.resolved_key(self.declared_name, normalizer)
    }

    #[inline]
    pub fn set(&mut self, value: &DynValue) {
        self.binding.set_dyn(value);
    }

    #[inline]
    pub fn set_with(&mut self, value: &DynValue, marshaller: &Marshaller) {
        self.binding.set_dyn_with(value, marshaller);
    }
}

impl std::fmt::Debug for BoundField<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundField")
            .field("declared_name", &self.declared_name)
            .field("custom_key", &self.binding.custom_key())
            .field("value", &self.binding.get_dyn())
            .finish()
    }
}
