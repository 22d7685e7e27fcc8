//! Element identity for differencing
//!
//! Every element that takes part in a diff answers two questions:
//! - **Who am I?** The differencing identifier, stable across the two
//!   snapshots. Equal identifiers mean "the same logical element", even
//!   when the element's content changed.
//! - **Did I change?** Content equality, asked only between two elements
//!   that already share an identifier.
//!
//! Keeping the two apart is what lets the diff report an in-place update
//! instead of a delete + insert pair.
//!
//! # Identifier choices
//!
//! | Type | Identifier | Content |
//! |------|------------|---------|
//! | integers, `char`, `bool`, strings | the value | always equal |
//! | [`StableId`] | the id | always equal |
//! | [`Keyed<V>`] | `key` | `value == value` |
//! | your type | [`Differentiable::Id`] | [`Differentiable::is_content_equal`] |

use std::fmt;
use std::hash::Hash;

use compact_str::CompactString;

use crate::algo::StableHasher;

// =============================================================================
// Differentiable
// =============================================================================

/// An element that can be matched across two snapshots of a list.
///
/// # Contract
///
/// - `difference_id` must be stable: the same logical element yields equal
///   identifiers in source and target.
/// - `is_content_equal` is only consulted for pairs with equal identifiers.
///   Returning `false` reports the element as updated.
///
/// ```
/// use staged_diff::Differentiable;
///
/// #[derive(Clone, PartialEq)]
/// struct Row {
///     id: u32,
///     title: String,
/// }
///
/// impl Differentiable for Row {
///     type Id = u32;
///
///     fn difference_id(&self) -> u32 {
///         self.id
///     }
///
///     fn is_content_equal(&self, other: &Self) -> bool {
///         self.title == other.title
///     }
/// }
/// ```
pub trait Differentiable {
    /// Identifier used as the hash key when matching elements.
    type Id: Hash + Eq;

    fn difference_id(&self) -> Self::Id;

    fn is_content_equal(&self, other: &Self) -> bool;
}

crate::impl_differentiable_by_value!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char, bool, String,
    CompactString,
);

impl<'a> Differentiable for &'a str {
    type Id = &'a str;

    #[inline]
    fn difference_id(&self) -> &'a str {
        *self
    }

    #[inline]
    fn is_content_equal(&self, other: &Self) -> bool {
        self == other
    }
}

// =============================================================================
// StableId
// =============================================================================

/// Opaque 64-bit identifier.
///
/// Cheap to copy and hash. Use [`StableId::from_key`] to derive one
/// deterministically from a textual key, or [`StableId::from_raw`] when the
/// caller already owns a numeric id (database rows, entity handles).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[must_use]
pub struct StableId(pub(crate) u64);

impl StableId {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(&self) -> u64 {
        self.0
    }

    /// Derive an id from a textual key.
    ///
    /// Same key, same id, across processes and platforms.
    ///
    /// ```
    /// use staged_diff::StableId;
    ///
    /// assert_eq!(StableId::from_key("row-7"), StableId::from_key("row-7"));
    /// assert_ne!(StableId::from_key("row-7"), StableId::from_key("row-8"));
    /// ```
    pub fn from_key(key: &str) -> Self {
        Self(StableHasher::new().update_str("__key__").update_str(key).finish())
    }

    /// Derive an id from a key scoped to a namespace, so equal keys from
    /// different namespaces (e.g. two tables) do not collide.
    pub fn from_scoped_key(namespace: &str, key: &str) -> Self {
        Self(
            StableHasher::new()
                .update_str("__scoped__")
                .update_str(namespace)
                .update_str(key)
                .finish(),
        )
    }
}

impl fmt::Debug for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StableId({:016x})", self.0)
    }
}

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

impl From<u64> for StableId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl Differentiable for StableId {
    type Id = StableId;

    #[inline]
    fn difference_id(&self) -> StableId {
        *self
    }

    #[inline]
    fn is_content_equal(&self, _other: &Self) -> bool {
        true
    }
}

// =============================================================================
// Keyed
// =============================================================================

/// A payload tagged with a string key.
///
/// The key is the identifier, the payload is the content. Handy when the
/// elements being diffed have no natural id of their own.
///
/// ```
/// use staged_diff::{Keyed, StagedChangeset};
///
/// let source = vec![Keyed::new("a", 1), Keyed::new("b", 2)];
/// let target = vec![Keyed::new("a", 1), Keyed::new("b", 3)];
///
/// let staged = StagedChangeset::new(&source, &target);
/// assert_eq!(staged.len(), 1);
/// assert_eq!(staged[0].element_updated.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keyed<V> {
    pub key: CompactString,
    pub value: V,
}

impl<V> Keyed<V> {
    pub fn new(key: impl Into<CompactString>, value: V) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

impl<V: PartialEq> Differentiable for Keyed<V> {
    type Id = CompactString;

    #[inline]
    fn difference_id(&self) -> CompactString {
        self.key.clone()
    }

    #[inline]
    fn is_content_equal(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key_deterministic() {
        assert_eq!(StableId::from_key("header"), StableId::from_key("header"));
        assert_ne!(StableId::from_key("header"), StableId::from_key("footer"));
    }

    #[test]
    fn test_scoped_keys_do_not_collide() {
        let a = StableId::from_scoped_key("users", "1");
        let b = StableId::from_scoped_key("posts", "1");
        assert_ne!(a, b);
        assert_ne!(a, StableId::from_key("1"));
    }

    #[test]
    fn test_display_format() {
        let id = StableId::from_raw(0xdead_beef);
        assert_eq!(id.to_string(), "deadbeef");
        assert_eq!(format!("{id:?}"), "StableId(00000000deadbeef)");
    }

    #[test]
    fn test_primitive_identity() {
        assert_eq!(7u32.difference_id(), 7);
        assert!('x'.is_content_equal(&'x'));
        assert_eq!("row".difference_id(), "row");
        assert_eq!(String::from("row").difference_id(), "row");
    }

    #[test]
    fn test_keyed_separates_identity_from_content() {
        let old = Keyed::new("title", "Draft");
        let new = Keyed::new("title", "Final");
        assert_eq!(old.difference_id(), new.difference_id());
        assert!(!old.is_content_equal(&new));
        assert!(old.is_content_equal(&old.clone()));
    }
}
