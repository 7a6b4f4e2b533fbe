//! Handler composition.
//!
//! Merges independently written single-case handlers into one overload set.
//! The composite is a heterogeneous list (`HCons<H1, HCons<H2, HNil>>`) of
//! [`Case`] values; overload resolution across the list is done by the
//! trait system through [`Handles`], keyed on the payload type.
//!
//! # Resolution
//!
//! For a payload of type `A`, `Handles<A, R, I>` is implemented once for
//! every position `I` in the list holding a `Case<A, R, _>`:
//!
//! - no such position: the bound is unsatisfied and the program does not
//!   compile (missing coverage);
//! - exactly one position: `I` is inferred and the call is direct;
//! - two or more positions: `I` cannot be inferred and the program does not
//!   compile (ambiguous coverage).
//!
//! The list order never affects which handler runs.

use std::fmt;
use std::marker::PhantomData;

use crate::variant::{Here, There};

/// A case-handler: a unary function over one alternative's payload type.
pub struct Case<A, R, F> {
    f: F,
    _domain: PhantomData<fn(A) -> R>,
}

/// Wrap `f` as a case-handler over `A`.
///
/// `A` comes from the closure's argument annotation (or the function item's
/// signature), so annotate closure arguments: `case(|c: Circle| ...)`.
#[inline]
pub fn case<A, R, F>(f: F) -> Case<A, R, F>
where
    F: Fn(A) -> R,
{
    Case {
        f,
        _domain: PhantomData,
    }
}

impl<A, R, F> Case<A, R, F>
where
    F: Fn(A) -> R,
{
    /// Invoke the handler.
    #[inline]
    pub fn call(&self, payload: A) -> R {
        (self.f)(payload)
    }
}

impl<A, R, F> Case<A, R, F> {
    /// Unwrap the underlying callable.
    pub fn into_inner(self) -> F {
        self.f
    }

    /// The domain's type name (for diagnostics only).
    pub fn domain_name(&self) -> &'static str {
        std::any::type_name::<A>()
    }
}

impl<A, R, F: Clone> Clone for Case<A, R, F> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _domain: PhantomData,
        }
    }
}

impl<A, R, F: Copy> Copy for Case<A, R, F> {}

impl<A, R, F> fmt::Debug for Case<A, R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case")
            .field("domain", &std::any::type_name::<A>())
            .field("result", &std::any::type_name::<R>())
            .finish()
    }
}

/// The empty handler list.
#[derive(Debug, Clone, Copy, Default)]
pub struct HNil;

/// A handler list with `head` in front of `tail`.
#[derive(Debug, Clone, Copy)]
pub struct HCons<H, T> {
    /// The first handler.
    pub head: H,
    /// The remaining handlers.
    pub tail: T,
}

/// Operations shared by every handler list.
pub trait HandlerList: Sized {
    /// Number of handlers in the list.
    const LEN: usize;

    /// Number of handlers in the list.
    fn len(&self) -> usize {
        Self::LEN
    }

    /// Whether the list holds no handlers.
    fn is_empty(&self) -> bool {
        Self::LEN == 0
    }

    /// Add `handler` to the list.
    ///
    /// The handler is placed in front; position has no effect on dispatch.
    fn with<H>(self, handler: H) -> HCons<H, Self> {
        HCons {
            head: handler,
            tail: self,
        }
    }
}

impl HandlerList for HNil {
    const LEN: usize = 0;
}

impl<H, T: HandlerList> HandlerList for HCons<H, T> {
    const LEN: usize = 1 + T::LEN;
}

/// Every handler in the list returns `R`.
///
/// Checked when a visitor is built, so a handler with a different result
/// type is rejected at composition rather than at the first dispatch.
#[diagnostic::on_unimplemented(
    message = "case handlers in `{Self}` do not share the result type `{R}`",
    note = "every case handler of one visitor must return the same type"
)]
pub trait Uniform<R>: HandlerList {}

impl<R> Uniform<R> for HNil {}

impl<A, R, F, T> Uniform<R> for HCons<Case<A, R, F>, T> where T: Uniform<R> {}

/// Overload resolution: the list holds exactly one handler for `A`, at
/// position `I`, returning `R`.
#[diagnostic::on_unimplemented(
    message = "no case handler covers `{A}`",
    label = "missing coverage for `{A}`",
    note = "compose a `case(|payload: {A}| ...)` returning `{R}` into the visitor"
)]
pub trait Handles<A, R, I> {
    /// Invoke the handler for `A`.
    fn handle(&self, payload: A) -> R;
}

impl<A, R, F, T> Handles<A, R, Here> for HCons<Case<A, R, F>, T>
where
    F: Fn(A) -> R,
{
    #[inline]
    fn handle(&self, payload: A) -> R {
        self.head.call(payload)
    }
}

impl<A, R, H, T, I> Handles<A, R, There<I>> for HCons<H, T>
where
    T: Handles<A, R, I>,
{
    #[inline]
    fn handle(&self, payload: A) -> R {
        self.tail.handle(payload)
    }
}

/// Compose case-handlers into one handler list.
///
/// ```
/// use inline_visit::{case, compose};
/// use inline_visit::compose::{Handles, HandlerList};
///
/// let handlers = compose![
///     case(|n: i64| format!("int {n}")),
///     case(|s: &'static str| format!("str {s}")),
/// ];
/// assert_eq!(handlers.len(), 2);
/// assert_eq!(handlers.handle("x"), "str x");
/// assert_eq!(handlers.handle(3i64), "int 3");
/// ```
#[macro_export]
macro_rules! compose {
    () => { $crate::compose::HNil };
    ($head:expr $(, $tail:expr)* $(,)?) => {
        $crate::compose::HCons {
            head: $head,
            tail: $crate::compose!($($tail),*),
        }
    };
}
