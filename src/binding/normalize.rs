use crate::types::DEFAULT_KEY_MARKER;

/// Derives an external key from a declared field name.
///
/// Exactly one leading marker is stripped: with the default `'_'` marker,
/// `_name` becomes `name`, `__name` becomes `_name`, and `name` is returned
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyNormalizer {
    marker: char,
}

impl KeyNormalizer {
    pub const fn new(marker: char) -> Self {
        Self { marker }
    }

    #[inline]
    pub const fn marker(&self) -> char {
        self.marker
    }

    #[inline]
    pub fn normalize<'a>(&self, declared_name: &'a str) -> &'a str {
        declared_name
            .strip_prefix(self.marker)
            .unwrap_or(declared_name)
    }
}

impl Default for KeyNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_MARKER)
    }
}

/// [`KeyNormalizer::normalize`] with the default `'_'` marker.
#[inline]
pub fn normalize(declared_name: &str) -> &str {
    KeyNormalizer::default().normalize(declared_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_single_marker() {
        assert_eq!(normalize("_name"), "name");
        assert_eq!(normalize("name"), "name");
        assert_eq!(normalize("__name"), "_name");
        assert_eq!(normalize("name_"), "name_");
    }

    #[test]
    fn test_degenerate_names() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("_"), "");
    }

    #[test]
    fn test_custom_marker() {
        let n = KeyNormalizer::new('$');
        assert_eq!(n.marker(), '$');
        assert_eq!(n.normalize("$color"), "color");
        assert_eq!(n.normalize("_color"), "_color");
    }

    #[test]
    fn test_multibyte_marker() {
        let n = KeyNormalizer::new('ß');
        assert_eq!(n.normalize("ßkey"), "key");
        assert_eq!(n.normalize("key"), "key");
    }

    proptest! {
        #[test]
        fn prop_unmarked_names_unchanged(name in "[a-zA-Z][a-zA-Z0-9_]{0,24}") {
            prop_assert_eq!(normalize(&name), name.as_str());
        }

        #[test]
        fn prop_marked_names_lose_one_marker(name in "[a-zA-Z0-9_]{0,24}") {
            let declared = format!("_{name}");
            prop_assert_eq!(normalize(&declared), name.as_str());
        }

        #[test]
        fn prop_normalize_is_suffix(name in ".{0,32}") {
            prop_assert!(name.ends_with(normalize(&name)));
            prop_assert!(name.len() - normalize(&name).len() <= 1);
        }
    }
}
