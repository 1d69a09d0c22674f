//! Declarative field binding between typed records and untyped maps.
//!
//! A record holds its bound fields as [`Bind<V>`] members and registers them
//! with [`convertible!`]. The [`Marshaller`] then turns the record into a
//! [`DynMap`] and back, for boundaries that only speak loosely-typed maps.
//!
//! ```text
//! record ── Introspect::bindings ──► (declared_name, binding)… ──► DynMap
//! DynMap ──► Default record ── Introspect::bindings_mut ──► set each field
//! ```
//!
//! # Keys
//!
//! A field is keyed by its custom key when it has one, otherwise by its
//! declared name with one leading `_` stripped (`_name` → `"name"`).
//!
//! # Permissive by design
//!
//! Neither direction ever fails:
//!
//! - a value of the wrong type (or `Null`) leaves the field **absent**, with
//!   no error; `"count": "3"` does not fill a `Bind<i64>`,
//! - keys no field claims are ignored,
//! - fields whose key is missing keep their constructed value,
//! - absent fields are left out of `to_map` output entirely.
//!
//! Callers that need strict input must inspect [`Bind::is_set`] after
//! conversion. [`validate_keys`] checks a record for fields that collide on
//! one key; `to_map` otherwise lets the later field win.

pub mod binding;
pub mod deserialization;
pub mod dyn_value;
pub mod error;
pub mod marshaller;
pub mod record;
pub mod serialization;
pub mod types;

#[doc(hidden)]
pub use smol_str;

pub use binding::{Bind, BoundField, BoundFieldMut, FieldBinding, KeyNormalizer, normalize};
pub use deserialization::FromDyn;
pub use dyn_value::{DynMap, DynNumber, DynValue};
pub use error::BindError;
pub use marshaller::{
    MarshalConfig, Marshaller, from_map, from_map_default, record_from_value, to_map,
    validate_keys,
};
pub use record::{Convertible, Introspect};
pub use serialization::ToDyn;
pub use types::ValueKind;
