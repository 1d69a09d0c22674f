pub mod bind;
pub mod field;
pub mod normalize;

pub use bind::Bind;
pub use field::{BoundField, BoundFieldMut, FieldBinding};
pub use normalize::{KeyNormalizer, normalize};
