//! The dispatch facade.
//!
//! A [`Visitor`] binds a composed handler list to one result type and
//! exposes `apply`: given a variant value, run the handler for the
//! alternative it currently holds and return its result unmodified.
//!
//! Building the visitor and applying it are separate steps. Build once,
//! then apply it to any number of values, of any variant type the handlers
//! cover.
//!
//! # Cost
//!
//! `apply` converts the value into its coproduct (one `match` on the tag)
//! and folds it through [`Fold`], which is a chain of inlined two-way
//! matches ending in a direct call to the selected handler. No handler
//! other than the selected one is touched.

use std::fmt;
use std::marker::PhantomData;

use crate::compose::{HCons, HNil, HandlerList, Handles, Uniform};
use crate::variant::{CNil, Coprod, Variant};

/// Route the payload held in a coproduct to its handler in `L`.
///
/// `Is` is the list of handler positions, one per alternative, and is
/// always inferred.
pub trait Fold<L, R, Is> {
    /// Invoke the handler matching the held payload.
    fn fold(self, handlers: &L) -> R;
}

impl<L, R> Fold<L, R, HNil> for CNil {
    #[inline]
    fn fold(self, _handlers: &L) -> R {
        match self {}
    }
}

impl<A, T, L, R, I, Is> Fold<L, R, HCons<I, Is>> for Coprod<A, T>
where
    L: Handles<A, R, I>,
    T: Fold<L, R, Is>,
{
    #[inline]
    fn fold(self, handlers: &L) -> R {
        match self {
            Coprod::Inl(payload) => handlers.handle(payload),
            Coprod::Inr(rest) => rest.fold(handlers),
        }
    }
}

/// A composed dispatcher bound to the result type `R`.
pub struct Visitor<R, L> {
    handlers: L,
    _result: PhantomData<fn() -> R>,
}

/// Bind a composed handler list into a visitor.
///
/// Every handler must return `R`; a handler with another result type is
/// rejected here.
#[inline]
pub fn visitor<R, L>(handlers: L) -> Visitor<R, L>
where
    L: Uniform<R>,
{
    Visitor {
        handlers,
        _result: PhantomData,
    }
}

/// Bind a composed handler list into a visitor for exactly the variant `V`.
///
/// Unlike [`visitor`], coverage is checked here rather than at the first
/// `apply`: every alternative of `V` must have exactly one handler, and the
/// list may hold no handler for anything else. Missing, duplicate and
/// foreign handlers all fail the build.
///
/// ```
/// use inline_visit::{case, compose, variant};
/// use inline_visit::dispatch::visitor_for;
///
/// pub struct Circle(f64);
/// pub struct Square(f64);
///
/// variant! {
///     pub enum Shape {
///         Circle(Circle),
///         Square(Square),
///     }
/// }
///
/// let area = visitor_for::<Shape, f64, _, _>(compose![
///     case(|Square(s): Square| s * s),
///     case(|Circle(r): Circle| r * r * 3.0),
/// ]);
/// assert_eq!(area.apply(Shape::from(Square(3.0))), 9.0);
/// ```
#[inline]
pub fn visitor_for<V, R, L, Is>(handlers: L) -> Visitor<R, L>
where
    V: Variant,
    L: Uniform<R>,
    V::Alternatives: Fold<L, R, Is>,
{
    let () = ExactCoverage::<V, L>::CHECK;
    visitor(handlers)
}

/// Every handler in `L` serves one alternative of `V`.
///
/// `Fold` already resolves each alternative to a single handler, and distinct
/// payload types never share a handler, so equal lengths leave no room for a
/// handler outside `V`.
struct ExactCoverage<V, L>(PhantomData<(V, L)>);

impl<V: Variant, L: HandlerList> ExactCoverage<V, L> {
    const CHECK: () = assert!(
        L::LEN == V::LEN,
        "visitor holds handlers for types that are not alternatives of the variant"
    );
}

impl<R, L> Visitor<R, L> {
    /// Dispatch `value` to the handler for the alternative it holds,
    /// moving the payload into the handler.
    #[inline]
    pub fn apply<V, Is>(&self, value: V) -> R
    where
        V: Variant,
        V::Alternatives: Fold<L, R, Is>,
    {
        value.into_alternatives().fold(&self.handlers)
    }

    /// Dispatch `value` by reference. The handlers take `&Payload`.
    #[inline]
    pub fn apply_ref<'a, V, Is>(&self, value: &'a V) -> R
    where
        V: Variant,
        V::Borrowed<'a>: Fold<L, R, Is>,
    {
        value.as_alternatives().fold(&self.handlers)
    }

    /// Call the handler for a bare payload, without a variant around it.
    #[inline]
    pub fn call<A, I>(&self, payload: A) -> R
    where
        L: Handles<A, R, I>,
    {
        self.handlers.handle(payload)
    }

    /// The composed handlers.
    pub fn handlers(&self) -> &L {
        &self.handlers
    }

    /// Take the composed handlers back out.
    pub fn into_handlers(self) -> L {
        self.handlers
    }
}

impl<R, L: HandlerList> Visitor<R, L> {
    /// Number of composed handlers.
    pub fn len(&self) -> usize {
        L::LEN
    }

    /// Whether no handlers were composed.
    pub fn is_empty(&self) -> bool {
        L::LEN == 0
    }
}

impl<R, L: Clone> Clone for Visitor<R, L> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
            _result: PhantomData,
        }
    }
}

impl<R, L: Copy> Copy for Visitor<R, L> {}

impl<R, L: HandlerList> fmt::Debug for Visitor<R, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Visitor")
            .field("result", &std::any::type_name::<R>())
            .field("handlers", &L::LEN)
            .finish()
    }
}

/// Build a visitor for result type `R` straight from callables.
///
/// Each callable is wrapped with [`case`](crate::case), so closure arguments
/// need a type annotation.
///
/// ```
/// use inline_visit::{inline_visitor, variant};
///
/// variant! {
///     pub enum Json {
///         Number(f64),
///         Text(String),
///         Flag(bool),
///     }
/// }
///
/// let describe = inline_visitor!(String;
///     |n: f64| format!("number {n}"),
///     |s: String| format!("text {s:?}"),
///     |b: bool| format!("flag {b}"),
/// );
/// assert_eq!(describe.apply(Json::from(true)), "flag true");
/// assert_eq!(describe.apply(Json::from(String::from("hi"))), "text \"hi\"");
/// ```
///
/// Naming the variant first binds the visitor with
/// [`visitor_for`](crate::dispatch::visitor_for), so coverage is checked
/// when it is built:
///
/// ```
/// # use inline_visit::{inline_visitor, variant};
/// # variant! {
/// #     pub enum Json {
/// #         Number(f64),
/// #         Text(String),
/// #         Flag(bool),
/// #     }
/// # }
/// let truthy = inline_visitor!(Json => bool;
///     |n: f64| n != 0.0,
///     |s: String| !s.is_empty(),
///     |b: bool| b,
/// );
/// assert!(!truthy.apply(Json::from(0.0)));
/// ```
#[macro_export]
macro_rules! inline_visitor {
    ($variant:ty => $result:ty; $($handler:expr),* $(,)?) => {
        $crate::dispatch::visitor_for::<$variant, $result, _, _>(
            $crate::compose![$($crate::compose::case($handler)),*]
        )
    };
    ($result:ty; $($handler:expr),* $(,)?) => {
        $crate::dispatch::visitor::<$result, _>(
            $crate::compose![$($crate::compose::case($handler)),*]
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::case;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq)]
    struct Literal(i64);

    #[derive(Debug, Clone, PartialEq)]
    struct Negate(i64);

    #[derive(Debug, Clone, PartialEq)]
    struct Sum(Vec<i64>);

    crate::variant! {
        #[derive(Debug, Clone, PartialEq)]
        enum Expr {
            Literal(Literal),
            Negate(Negate),
            Sum(Sum),
        }
    }

    #[test]
    fn test_apply_selects_by_alternative() {
        let eval = visitor(crate::compose![
            case(|Literal(n): Literal| n),
            case(|Negate(n): Negate| -n),
            case(|Sum(terms): Sum| terms.iter().sum::<i64>()),
        ]);

        assert_eq!(eval.apply(Expr::from(Literal(4))), 4);
        assert_eq!(eval.apply(Expr::from(Negate(4))), -4);
        assert_eq!(eval.apply(Expr::from(Sum(vec![1, 2, 3]))), 6);
    }

    #[test]
    fn test_apply_ref_borrows_payload() {
        let exprs = vec![
            Expr::from(Literal(1)),
            Expr::from(Sum(vec![2, 3])),
            Expr::from(Negate(7)),
        ];
        let arity = visitor(crate::compose![
            case(|s: &Sum| s.0.len()),
            case(|_: &Negate| 1usize),
            case(|_: &Literal| 0usize),
        ]);

        let arities: Vec<usize> = exprs.iter().map(|e| arity.apply_ref(e)).collect();
        assert_eq!(arities, vec![0, 2, 1]);
        // The values were only borrowed.
        assert_eq!(exprs.len(), 3);
    }

    #[test]
    fn test_exactly_one_handler_runs() {
        let counts = [Cell::new(0), Cell::new(0), Cell::new(0)];
        let counting = visitor(crate::compose![
            case(|_: Literal| counts[0].set(counts[0].get() + 1)),
            case(|_: Negate| counts[1].set(counts[1].get() + 1)),
            case(|_: Sum| counts[2].set(counts[2].get() + 1)),
        ]);

        counting.apply(Expr::from(Negate(0)));
        let snapshot: Vec<u32> = counts.iter().map(Cell::get).collect();
        assert_eq!(snapshot, vec![0, 1, 0]);
    }

    #[test]
    fn test_reuse_across_values() {
        let tag = inline_visitor!(&'static str;
            |_: Sum| "sum",
            |_: Literal| "literal",
            |_: Negate| "negate",
        );

        let names: Vec<_> = [
            Expr::from(Literal(0)),
            Expr::from(Literal(1)),
            Expr::from(Sum(vec![])),
        ]
        .into_iter()
        .map(|e| tag.apply(e))
        .collect();
        assert_eq!(names, vec!["literal", "literal", "sum"]);
    }

    #[test]
    fn test_call_on_bare_payload() {
        let eval = inline_visitor!(i64;
            |Literal(n): Literal| n,
            |Negate(n): Negate| -n,
            |Sum(terms): Sum| terms.into_iter().sum::<i64>(),
        );
        assert_eq!(eval.call(Negate(3)), -3);
        assert_eq!(eval.call(Sum(vec![4, 5])), 9);
    }

    #[test]
    fn test_clone_and_debug() {
        let base = 100;
        let offset = inline_visitor!(i64;
            move |Literal(n): Literal| n + base,
            move |Negate(n): Negate| base - n,
            |_: Sum| 0,
        );
        let copy = offset.clone();
        assert_eq!(
            offset.apply(Expr::from(Negate(1))),
            copy.apply(Expr::from(Negate(1)))
        );
        assert_eq!(offset.len(), 3);
        assert!(!offset.is_empty());

        let rendered = format!("{offset:?}");
        assert!(rendered.contains("handlers: 3"), "got {rendered}");
        assert!(rendered.contains("i64"), "got {rendered}");
    }

    #[test]
    fn test_shared_across_threads() {
        let eval = inline_visitor!(i64;
            |Literal(n): Literal| n,
            |Negate(n): Negate| -n,
            |Sum(terms): Sum| terms.into_iter().sum::<i64>(),
        );

        let results: Vec<i64> = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..4)
                .map(|i| {
                    let eval = &eval;
                    scope.spawn(move || eval.apply(Expr::from(Sum(vec![i; 3]))))
                })
                .collect();
            workers
                .into_iter()
                .map(|w| w.join().unwrap_or_default())
                .collect()
        });
        assert_eq!(results, vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_visitor_for_checks_exact_coverage() {
        let eval = visitor_for::<Expr, i64, _, _>(crate::compose![
            case(|Sum(terms): Sum| terms.iter().sum::<i64>()),
            case(|Literal(n): Literal| n),
            case(|Negate(n): Negate| -n),
        ]);
        assert_eq!(eval.len(), Expr::LEN);
        assert_eq!(eval.apply(Expr::from(Sum(vec![2, 2]))), 4);
        assert_eq!(eval.apply(Expr::from(Negate(5))), -5);
    }

    #[test]
    fn test_inline_visitor_bound_to_variant() {
        let name = inline_visitor!(Expr => &'static str;
            |_: Literal| "literal",
            |_: Negate| "negate",
            |_: Sum| "sum",
        );
        assert_eq!(name.apply(Expr::from(Literal(1))), "literal");
        assert_eq!(name.call(Sum(vec![])), "sum");
    }

    #[test]
    fn test_into_handlers_round_trip() {
        let v = inline_visitor!(bool; |_: Literal| true, |_: Negate| false, |_: Sum| false);
        let handlers = v.into_handlers();
        let again = visitor::<bool, _>(handlers);
        assert!(again.apply(Expr::from(Literal(0))));
        assert_eq!(again.handlers().len(), 3);
    }
}
