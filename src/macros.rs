//! Implementation helper macros
//!
//! `impl_differentiable_by_value!` is exported so downstream crates can make
//! their own value-like types diffable in one line.

/// Implement [`Differentiable`](crate::Differentiable) for types whose value
/// is their identity.
///
/// The identifier is a clone of the value. Two values sharing an identifier
/// are equal, so content equality never reports an update.
///
/// # Example
/// ```
/// #[derive(Clone, PartialEq, Eq, Hash)]
/// struct Tag(&'static str);
///
/// staged_diff::impl_differentiable_by_value!(Tag);
///
/// let staged = staged_diff::StagedChangeset::new(&[Tag("a")], &[Tag("a"), Tag("b")]);
/// assert_eq!(staged.len(), 1);
/// ```
#[macro_export]
macro_rules! impl_differentiable_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::Differentiable for $ty {
                type Id = $ty;

                #[inline]
                fn difference_id(&self) -> Self::Id {
                    ::core::clone::Clone::clone(self)
                }

                #[inline]
                fn is_content_equal(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

/// Generate `is_xxx` predicates for fieldless enum variants.
///
/// Uses paste's `:camel` modifier to map the method suffix to the variant.
///
/// # Example
/// ```ignore
/// impl StageKind {
///     // update -> Update, insert_move -> InsertMove
///     impl_variant_predicates!(update, delete, insert_move);
/// }
/// ```
macro_rules! impl_variant_predicates {
    ($($variant:ident),* $(,)?) => {
        ::paste::paste! {
            $(
                #[doc = "Check if this is the " [<$variant:camel>] " variant"]
                #[inline]
                pub fn [<is_ $variant>](&self) -> bool {
                    matches!(self, Self::[<$variant:camel>])
                }
            )*
        }
    };
}

pub(crate) use impl_variant_predicates;
