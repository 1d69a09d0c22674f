use super::dyn_value::{DynMap, DynValue};
use super::marshaller::Marshaller;
use smol_str::SmolStr;

// ─── FromDyn Trait ──────────────────────────────────────────────────────────

/// Trait for bound value types that can be read back out of a [`DynValue`].
///
/// Conversion is same-type-or-nothing: there is no numeric widening and no
/// string parsing. `None` means "does not fit", and the binding that asked
/// becomes absent. `Null` never fits.
pub trait FromDyn: Sized {
    /// Logical type name, reported when a value is rejected.
    const KIND: &'static str;

    fn from_dyn(value: &DynValue) -> Option<Self>;

    /// Like [`from_dyn`](Self::from_dyn), under the settings of `marshaller`.
    fn from_dyn_with(value: &DynValue, _marshaller: &Marshaller) -> Option<Self> {
        Self::from_dyn(value)
    }
}

// ─── Scalars ────────────────────────────────────────────────────────────────

impl FromDyn for bool {
    const KIND: &'static str = "bool";

    #[inline]
    fn from_dyn(value: &DynValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromDyn for i64 {
    const KIND: &'static str = "i64";

    #[inline]
    fn from_dyn(value: &DynValue) -> Option<Self> {
        value.as_i64()
    }
}

impl FromDyn for u64 {
    const KIND: &'static str = "u64";

    #[inline]
    fn from_dyn(value: &DynValue) -> Option<Self> {
        value.as_u64()
    }
}

impl FromDyn for f64 {
    const KIND: &'static str = "f64";

    #[inline]
    fn from_dyn(value: &DynValue) -> Option<Self> {
        value.as_f64()
    }
}

impl FromDyn for String {
    const KIND: &'static str = "string";

    #[inline]
    fn from_dyn(value: &DynValue) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl FromDyn for SmolStr {
    const KIND: &'static str = "string";

    #[inline]
    fn from_dyn(value: &DynValue) -> Option<Self> {
        match value {
            DynValue::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

// ─── Containers ─────────────────────────────────────────────────────────────

/// All elements must fit; one stray element rejects the whole array.
impl<T: FromDyn> FromDyn for Vec<T> {
    const KIND: &'static str = "array";

    fn from_dyn(value: &DynValue) -> Option<Self> {
        value.as_array()?.iter().map(T::from_dyn).collect()
    }

    fn from_dyn_with(value: &DynValue, marshaller: &Marshaller) -> Option<Self> {
        value
            .as_array()?
            .iter()
            .map(|item| T::from_dyn_with(item, marshaller))
            .collect()
    }
}

impl FromDyn for DynMap {
    const KIND: &'static str = "object";

    fn from_dyn(value: &DynValue) -> Option<Self> {
        value.as_object().cloned()
    }
}

impl FromDyn for DynValue {
    const KIND: &'static str = "any";

    fn from_dyn(value: &DynValue) -> Option<Self> {
        if value.is_null() {
            return None;
        }
        Some(value.clone())
    }
}
