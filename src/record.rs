use crate::binding::{BoundField, BoundFieldMut};
use crate::dyn_value::{DynMap, DynValue};
use crate::error::BindError;
use crate::marshaller;

// ─── Introspection ──────────────────────────────────────────────────────────

/// Enumerates a record's bound fields.
///
/// Both methods must yield the same fields with the same declared names in
/// the same order. Order only matters when two fields resolve to the same
/// key: the later one wins in `to_map`.
///
/// Usually written by [`convertible!`](crate::convertible).
pub trait Introspect {
    fn bindings(&self) -> Vec<BoundField<'_>>;
    fn bindings_mut(&mut self) -> Vec<BoundFieldMut<'_>>;
}

// ─── Convertible ────────────────────────────────────────────────────────────

/// A record that converts to and from a [`DynMap`].
///
/// `Default` builds the instance `from_map` starts from: every field absent,
/// unless the type pre-populates some with [`Bind::with_value`](crate::Bind::with_value).
pub trait Convertible: Introspect + Default {
    fn to_map(&self) -> DynMap {
        marshaller::to_map(self)
    }

    fn from_map(map: &DynMap) -> Self {
        marshaller::from_map(map, Self::default)
    }

    fn to_value(&self) -> DynValue {
        DynValue::Object(self.to_map())
    }

    /// Builds a record from a dictionary argument. Only `Object` is accepted.
    fn from_value(value: &DynValue) -> Result<Self, BindError> {
        marshaller::record_from_value(value, Self::default)
    }
}

/// Registers a record's bound fields, in the order listed.
///
/// Implements [`Introspect`] and [`Convertible`] for the type, plus
/// [`ToDyn`](crate::ToDyn) / [`FromDyn`](crate::FromDyn) so the record can be
/// held in a `Bind` of another record and travel as a nested object. The type
/// must implement `Default`, and every listed field must be a `Bind<V>`.
/// Custom keys belong in `Default`: nested records are rebuilt from it. A
/// nested record converts with the settings of the marshaller converting its
/// parent.
///
/// ```
/// use record_bind::{Bind, Convertible, convertible, dyn_map};
///
/// struct Profile {
///     _name: Bind<String>,
///     _primary_color: Bind<String>,
/// }
///
/// impl Default for Profile {
///     fn default() -> Self {
///         Self { _name: Bind::new(), _primary_color: Bind::with_key("primaryColor") }
///     }
/// }
///
/// convertible!(Profile { _name, _primary_color });
///
/// let map = dyn_map!({ "name" => "test-app", "primaryColor" => "#cccccc" });
/// let profile = Profile::from_map(&map);
/// assert_eq!(profile._name.get().map(String::as_str), Some("test-app"));
/// assert_eq!(profile.to_map(), map);
/// ```
#[macro_export]
macro_rules! convertible {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::record::Introspect for $ty {
            fn bindings(&self) -> ::std::vec::Vec<$crate::binding::BoundField<'_>> {
                ::std::vec![
                    $( $crate::binding::BoundField::new(::std::stringify!($field), &self.$field), )*
                ]
            }

            fn bindings_mut(&mut self) -> ::std::vec::Vec<$crate::binding::BoundFieldMut<'_>> {
                ::std::vec![
                    $( $crate::binding::BoundFieldMut::new(::std::stringify!($field), &mut self.$field), )*
                ]
            }
        }

        impl $crate::record::Convertible for $ty {}

        impl $crate::serialization::ToDyn for $ty {
            fn to_dyn(&self) -> $crate::dyn_value::DynValue {
                $crate::dyn_value::DynValue::Object($crate::marshaller::to_map(self))
            }

            fn to_dyn_with(&self, marshaller: &$crate::marshaller::Marshaller) -> $crate::dyn_value::DynValue {
                $crate::dyn_value::DynValue::Object(marshaller.to_map(self))
            }
        }

        impl $crate::deserialization::FromDyn for $ty {
            const KIND: &'static str = "object";

            fn from_dyn(value: &$crate::dyn_value::DynValue) -> ::std::option::Option<Self> {
                value
                    .as_object()
                    .map(|map| $crate::marshaller::from_map(map, <$ty as ::std::default::Default>::default))
            }

            fn from_dyn_with(
                value: &$crate::dyn_value::DynValue,
                marshaller: &$crate::marshaller::Marshaller,
            ) -> ::std::option::Option<Self> {
                value
                    .as_object()
                    .map(|map| marshaller.from_map(map, <$ty as ::std::default::Default>::default))
            }
        }
    };
}
