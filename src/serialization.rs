use super::dyn_value::{DynMap, DynNumber, DynValue};
use super::marshaller::Marshaller;
use smol_str::SmolStr;

// ─── ToDyn Trait ────────────────────────────────────────────────────────────

/// Trait for bound value types that can be written into a [`DynValue`].
///
/// The output always has the variant that [`FromDyn`](crate::deserialization::FromDyn)
/// accepts back for the same type, so a set field survives `to_map` followed
/// by `from_map`.
pub trait ToDyn {
    fn to_dyn(&self) -> DynValue;

    /// Like [`to_dyn`](Self::to_dyn), under the settings of `marshaller`.
    /// Only records (and containers of records) look at it.
    fn to_dyn_with(&self, _marshaller: &Marshaller) -> DynValue {
        self.to_dyn()
    }
}

// ─── Scalars ────────────────────────────────────────────────────────────────

impl ToDyn for bool {
    #[inline]
    fn to_dyn(&self) -> DynValue {
        DynValue::Bool(*self)
    }
}

impl ToDyn for i64 {
    #[inline]
    fn to_dyn(&self) -> DynValue {
        DynValue::Number(DynNumber::I64(*self))
    }
}

impl ToDyn for u64 {
    #[inline]
    fn to_dyn(&self) -> DynValue {
        DynValue::Number(DynNumber::U64(*self))
    }
}

impl ToDyn for f64 {
    #[inline]
    fn to_dyn(&self) -> DynValue {
        DynValue::Number(DynNumber::F64(*self))
    }
}

impl ToDyn for String {
    #[inline]
    fn to_dyn(&self) -> DynValue {
        DynValue::Str(SmolStr::from(self.as_str()))
    }
}

impl ToDyn for SmolStr {
    #[inline]
    fn to_dyn(&self) -> DynValue {
        DynValue::Str(self.clone())
    }
}

// ─── Containers ─────────────────────────────────────────────────────────────

impl<T: ToDyn> ToDyn for Vec<T> {
    fn to_dyn(&self) -> DynValue {
        DynValue::Array(self.iter().map(ToDyn::to_dyn).collect())
    }

    fn to_dyn_with(&self, marshaller: &Marshaller) -> DynValue {
        DynValue::Array(self.iter().map(|item| item.to_dyn_with(marshaller)).collect())
    }
}

impl ToDyn for DynMap {
    fn to_dyn(&self) -> DynValue {
        DynValue::Object(self.clone())
    }
}

/// A `Bind<DynValue>` passes values through untouched.
impl ToDyn for DynValue {
    #[inline]
    fn to_dyn(&self) -> DynValue {
        self.clone()
    }
}

// ─── ToDyn for &T ───────────────────────────────────────────────────────────

impl<T: ToDyn + ?Sized> ToDyn for &T {
    #[inline]
    fn to_dyn(&self) -> DynValue {
        (**self).to_dyn()
    }

    #[inline]
    fn to_dyn_with(&self, marshaller: &Marshaller) -> DynValue {
        (**self).to_dyn_with(marshaller)
    }
}
