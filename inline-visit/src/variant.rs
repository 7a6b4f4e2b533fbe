//! Closed alternative sets.
//!
//! A [`Variant`] is a tagged union whose alternatives are fixed at compile
//! time. Every alternative carries exactly one payload type and no two
//! alternatives share a payload type, so the payload type alone identifies
//! the alternative. That is what lets a handler be selected by the shape of
//! its argument instead of an explicit tag.
//!
//! Variants are usually declared with the [`variant!`](crate::variant!)
//! macro, which generates the enum together with its [`Variant`] and
//! [`Holds`] implementations.
//!
//! # Representation
//!
//! Besides the enum itself, each variant exposes its payloads as a
//! coproduct: `Coprod<A, Coprod<B, CNil>>` for a two-alternative variant.
//! The coproduct is what the dispatcher folds over; converting into it is a
//! single `match` on the enum's tag.

use std::any::{Any, TypeId};
use std::marker::PhantomData;

/// Metadata for one alternative of a variant type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alternative {
    /// Position of the alternative in declaration order.
    pub tag: usize,
    /// The enum variant's name.
    pub name: &'static str,
    /// The payload's type name (for diagnostics only).
    pub payload: &'static str,
    /// The payload's type identity.
    pub type_id: TypeId,
}

impl Alternative {
    /// Describe the alternative at `tag` carrying payload type `A`.
    pub fn of<A: 'static>(tag: usize, name: &'static str) -> Self {
        Self {
            tag,
            name,
            payload: std::any::type_name::<A>(),
            type_id: TypeId::of::<A>(),
        }
    }
}

/// A value holding exactly one of a closed set of alternatives.
pub trait Variant: Sized + 'static {
    /// The variant type's name.
    const NAME: &'static str;

    /// Number of alternatives.
    const LEN: usize;

    /// The payloads as a coproduct, by value.
    type Alternatives;

    /// The payloads as a coproduct, by shared reference.
    type Borrowed<'a>
    where
        Self: 'a;

    /// Metadata for every alternative, in tag order.
    fn alternatives() -> Vec<Alternative>;

    /// The tag of the alternative currently held.
    fn tag(&self) -> usize;

    /// The name of the alternative currently held.
    fn alternative_name(&self) -> &'static str;

    /// Move the payload out into the coproduct representation.
    fn into_alternatives(self) -> Self::Alternatives;

    /// Borrow the payload as a coproduct of references.
    fn as_alternatives(&self) -> Self::Borrowed<'_>;

    /// Hand the current tag and a move-once payload slot to `f`.
    ///
    /// The slot is an `Option<A>` behind `dyn Any`, where `A` is the payload
    /// type of the alternative at the given tag. The callee takes the payload
    /// out of the slot; no copy or allocation is involved.
    fn with_payload<R, F>(self, f: F) -> R
    where
        F: FnOnce(usize, &mut dyn Any) -> R;
}

/// A variant that has an alternative carrying payload type `A`.
pub trait Holds<A>: Variant {
    /// Tag of the alternative carrying `A`.
    const TAG: usize;

    /// Build the variant holding `payload`.
    fn wrap(payload: A) -> Self;

    /// Take the payload if the variant currently holds `A`.
    fn take(self) -> Result<A, Self>;

    /// Borrow the payload if the variant currently holds `A`.
    fn get(&self) -> Option<&A>;

    /// Whether the variant currently holds `A`.
    fn holds(&self) -> bool {
        self.tag() == Self::TAG
    }
}

/// A binary coproduct: either the head payload or something in the tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coprod<H, T> {
    /// The head payload.
    Inl(H),
    /// A payload further down the list.
    Inr(T),
}

/// The empty coproduct. Uninhabited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CNil {}

/// Type-level position: the head of a list.
#[derive(Debug, Clone, Copy)]
pub struct Here;

/// Type-level position: position `I` within the tail of a list.
#[derive(Debug, Clone, Copy)]
pub struct There<I>(PhantomData<I>);

/// Injection of a payload into the coproduct slot of its type.
///
/// The position `I` is inferred. It is unique as long as `A` occurs once in
/// the coproduct.
pub trait Inject<A, I> {
    /// Wrap `payload` in the slot for `A`.
    fn inject(payload: A) -> Self;
}

impl<A, T> Inject<A, Here> for Coprod<A, T> {
    #[inline]
    fn inject(payload: A) -> Self {
        Coprod::Inl(payload)
    }
}

impl<A, H, T, I> Inject<A, There<I>> for Coprod<H, T>
where
    T: Inject<A, I>,
{
    #[inline]
    fn inject(payload: A) -> Self {
        Coprod::Inr(T::inject(payload))
    }
}

/// Builds the coproduct type for a list of payload types.
#[doc(hidden)]
#[macro_export]
macro_rules! __coprod {
    () => { $crate::variant::CNil };
    ($head:ty $(, $tail:ty)* $(,)?) => {
        $crate::variant::Coprod<$head, $crate::__coprod!($($tail),*)>
    };
}

/// Emits one `Holds` and `From` implementation per alternative, numbering
/// the tags in declaration order.
#[doc(hidden)]
#[macro_export]
macro_rules! __variant_holds {
    ($name:ident; $tag:expr;) => {};
    ($name:ident; $tag:expr; $alt:ident($ty:ty) $(, $rest_alt:ident($rest_ty:ty))*) => {
        impl $crate::variant::Holds<$ty> for $name {
            const TAG: usize = $tag;

            #[inline]
            fn wrap(payload: $ty) -> Self {
                Self::$alt(payload)
            }

            #[inline]
            #[allow(unreachable_patterns)]
            fn take(self) -> ::core::result::Result<$ty, Self> {
                match self {
                    Self::$alt(payload) => ::core::result::Result::Ok(payload),
                    other => ::core::result::Result::Err(other),
                }
            }

            #[inline]
            #[allow(unreachable_patterns)]
            fn get(&self) -> ::core::option::Option<&$ty> {
                match self {
                    Self::$alt(payload) => ::core::option::Option::Some(payload),
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::core::convert::From<$ty> for $name {
            #[inline]
            fn from(payload: $ty) -> Self {
                Self::$alt(payload)
            }
        }

        $crate::__variant_holds!($name; ($tag) + 1; $($rest_alt($rest_ty)),*);
    };
}

/// Declare a closed variant type.
///
/// Each alternative is a tuple variant with exactly one payload, and payload
/// types must be pairwise distinct. Declaring the same payload type twice
/// fails to compile with conflicting `Holds` implementations.
///
/// ```
/// use inline_visit::variant;
/// use inline_visit::variant::{Holds, Variant};
///
/// variant! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub enum Token {
///         Number(f64),
///         Word(String),
///     }
/// }
///
/// let token = Token::from(String::from("visit"));
/// assert_eq!(token.alternative_name(), "Word");
/// assert_eq!(token.tag(), <Token as Holds<String>>::TAG);
/// assert_eq!(Token::alternatives().len(), 2);
/// ```
#[macro_export]
macro_rules! variant {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$alt_meta:meta])* $alt:ident($ty:ty) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $( $(#[$alt_meta])* $alt($ty), )+
        }

        impl $crate::variant::Variant for $name {
            const NAME: &'static str = ::core::stringify!($name);

            const LEN: usize = [$(::core::stringify!($alt)),+].len();

            type Alternatives = $crate::__coprod!($($ty),+);

            type Borrowed<'a> = $crate::__coprod!($(&'a $ty),+)
            where
                Self: 'a;

            fn alternatives() -> ::std::vec::Vec<$crate::variant::Alternative> {
                ::std::vec![
                    $(
                        $crate::variant::Alternative::of::<$ty>(
                            <Self as $crate::variant::Holds<$ty>>::TAG,
                            ::core::stringify!($alt),
                        ),
                    )+
                ]
            }

            #[inline]
            fn tag(&self) -> usize {
                match self {
                    $( Self::$alt(_) => <Self as $crate::variant::Holds<$ty>>::TAG, )+
                }
            }

            fn alternative_name(&self) -> &'static str {
                match self {
                    $( Self::$alt(_) => ::core::stringify!($alt), )+
                }
            }

            #[inline]
            fn into_alternatives(self) -> Self::Alternatives {
                match self {
                    $( Self::$alt(payload) => $crate::variant::Inject::inject(payload), )+
                }
            }

            #[inline]
            fn as_alternatives(&self) -> Self::Borrowed<'_> {
                match self {
                    $( Self::$alt(payload) => $crate::variant::Inject::inject(payload), )+
                }
            }

            #[inline]
            fn with_payload<R, F>(self, f: F) -> R
            where
                F: ::core::ops::FnOnce(usize, &mut dyn ::core::any::Any) -> R,
            {
                match self {
                    $(
                        Self::$alt(payload) => {
                            let mut slot = ::core::option::Option::Some(payload);
                            f(<Self as $crate::variant::Holds<$ty>>::TAG, &mut slot)
                        }
                    )+
                }
            }
        }

        $crate::__variant_holds!($name; 0usize; $($alt($ty)),+);
    };
}
