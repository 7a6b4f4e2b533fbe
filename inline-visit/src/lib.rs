//! Inline visitors over closed variants.
//!
//! This crate builds one dispatcher out of several independently written
//! single-case handlers and applies it to a value of a closed variant type.
//! The handler that runs is selected by the alternative the value holds,
//! never by a tag the caller passes.
//!
//! # Overview
//!
//! 1. **Declare** the closed alternative set with [`variant!`].
//! 2. **Compose** single-case handlers with [`compose!`] and [`case`].
//! 3. **Bind** the composite into a [`Visitor`] with [`visitor`] (or do both
//!    steps at once with [`inline_visitor!`]).
//! 4. **Apply** the visitor to any number of values.
//!
//! ```
//! use inline_visit::{case, compose, variant, visitor};
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! pub struct Circle {
//!     pub radius: f64,
//! }
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! pub struct Square {
//!     pub side: f64,
//! }
//!
//! variant! {
//!     #[derive(Debug, Clone, Copy, PartialEq)]
//!     pub enum Shape {
//!         Circle(Circle),
//!         Square(Square),
//!     }
//! }
//!
//! let area = visitor(compose![
//!     case(|c: Circle| c.radius * c.radius * 3.14159),
//!     case(|s: Square| s.side * s.side),
//! ]);
//!
//! assert!((area.apply(Shape::from(Circle { radius: 2.0 })) - 12.56636).abs() < 1e-9);
//! assert_eq!(area.apply(Shape::from(Square { side: 3.0 })), 9.0);
//! ```
//!
//! # Coverage
//!
//! Coverage is checked by the compiler. A visitor that lacks a handler for
//! some alternative cannot be applied to that variant:
//!
//! ```compile_fail
//! use inline_visit::{case, compose, variant, visitor};
//!
//! pub struct Circle(f64);
//! pub struct Square(f64);
//!
//! variant! {
//!     pub enum Shape {
//!         Circle(Circle),
//!         Square(Square),
//!     }
//! }
//!
//! let area = visitor(compose![case(|Circle(r): Circle| r * r * 3.14159)]);
//! area.apply(Shape::from(Square(3.0)));
//! ```
//!
//! Two handlers for the same alternative leave the overload unresolved, which
//! is also a compile error. Handlers are never picked by list position:
//!
//! ```compile_fail
//! use inline_visit::{case, compose, variant, visitor};
//!
//! pub struct Circle(f64);
//! pub struct Square(f64);
//!
//! variant! {
//!     pub enum Shape {
//!         Circle(Circle),
//!         Square(Square),
//!     }
//! }
//!
//! let area = visitor(compose![
//!     case(|Circle(r): Circle| r * r * 3.14159),
//!     case(|Circle(r): Circle| r * r * 3.0),
//!     case(|Square(s): Square| s * s),
//! ]);
//! area.apply(Shape::from(Square(3.0)));
//! ```
//!
//! Binding the visitor to its variant with [`visitor_for`] moves these checks
//! to the point where the visitor is built. Each alternative needs exactly
//! one handler, so a duplicate fails to compile before any `apply`:
//!
//! ```compile_fail
//! use inline_visit::{case, compose, variant, visitor_for};
//!
//! pub struct Circle(f64);
//! pub struct Square(f64);
//!
//! variant! {
//!     pub enum Shape {
//!         Circle(Circle),
//!         Square(Square),
//!     }
//! }
//!
//! let area = visitor_for::<Shape, f64, _, _>(compose![
//!     case(|Circle(r): Circle| r * r * 3.14159),
//!     case(|Square(s): Square| s * s),
//!     case(|Square(s): Square| s * s * 2.0),
//! ]);
//! ```
//!
//! So does a handler for a type that is not an alternative, even when it is
//! duplicated and never reached by `apply`:
//!
//! ```compile_fail
//! use inline_visit::{case, compose, variant, visitor_for};
//!
//! pub struct Circle(f64);
//! pub struct Square(f64);
//! pub struct Triangle(f64);
//!
//! variant! {
//!     pub enum Shape {
//!         Circle(Circle),
//!         Square(Square),
//!     }
//! }
//!
//! let area = visitor_for::<Shape, f64, _, _>(compose![
//!     case(|Circle(r): Circle| r * r * 3.14159),
//!     case(|Square(s): Square| s * s),
//!     case(|Triangle(t): Triangle| t),
//!     case(|Triangle(t): Triangle| -t),
//! ]);
//! area.apply(Shape::from(Square(3.0)));
//! ```
//!
//! Handlers are unary. A case over zero or several arguments is rejected
//! by both composers:
//!
//! ```compile_fail
//! use inline_visit::case;
//!
//! let pair = case(|a: u8, b: u8| a + b);
//! ```
//!
//! ```compile_fail
//! use inline_visit::Handler;
//!
//! let nullary: Handler<u8> = Handler::new(|| 0u8);
//! ```
//!
//! Handlers must agree on the result type:
//!
//! ```compile_fail
//! use inline_visit::{case, compose, visitor};
//!
//! let mixed = visitor::<f64, _>(compose![
//!     case(|r: f64| r * 2.0),
//!     case(|s: String| s.len()),
//! ]);
//! ```
//!
//! # Runtime-checked tables
//!
//! When handlers are only known at run time, [`DispatchTable`] performs the
//! same checks once, at composition, and returns a [`CompositionError`]
//! instead of failing the build.
//!
//! # Module Structure
//!
//! - [`variant`] - Closed alternative sets and the [`variant!`] macro
//! - [`compose`] - Case handlers and the composed overload set
//! - [`dispatch`] - The [`Visitor`] facade
//! - [`table`] - Runtime-checked dispatch tables
//! - [`config`] - Configuration for runtime-checked composition
//! - [`error`] - Composition errors

pub mod compose;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod table;
pub mod variant;

pub use compose::{case, Case, HCons, HNil, HandlerList, Handles};
pub use config::{ComposeConfig, ConfigError, DomainPolicy};
pub use dispatch::{visitor, visitor_for, Fold, Visitor};
pub use error::{CompositionError, ErrorKind};
pub use table::{DispatchTable, Handler};
pub use variant::{Alternative, Holds, Variant};
