//! Runtime-checked dispatch tables.
//!
//! The static composer needs every handler's type at compile time. When
//! handlers are assembled dynamically (collected in a `Vec`, registered in a
//! loop, boxed behind a common type) a [`DispatchTable`] is used instead.
//!
//! Composition validates the handler set against the variant's alternatives
//! once and fails fast with a [`CompositionError`]:
//!
//! 1. **ArityMismatch**: a handler's domain is not an alternative.
//! 2. **AmbiguousCoverage**: two handlers claim the same alternative.
//! 3. **MissingCoverage**: some alternative has no handler.
//!
//! A table that composed successfully covers every alternative exactly once,
//! so `apply` is an index by tag plus one indirect call.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::compose::Case;
use crate::config::{ComposeConfig, DomainPolicy};
use crate::error::{unhandled_alternative, CompositionError};
use crate::variant::Variant;

/// Takes the payload out of a slot; `None` if the slot holds another type.
type ErasedFn<R> = dyn Fn(&mut dyn Any) -> Option<R> + Send + Sync;

/// A type-erased single-case handler.
pub struct Handler<R> {
    domain: TypeId,
    domain_name: &'static str,
    call: Arc<ErasedFn<R>>,
}

impl<R: 'static> Handler<R> {
    /// Erase `f`, a handler over payload type `A`.
    pub fn new<A, F>(f: F) -> Self
    where
        A: 'static,
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        let call = move |slot: &mut dyn Any| {
            slot.downcast_mut::<Option<A>>()
                .and_then(Option::take)
                .map(&f)
        };
        Self {
            domain: TypeId::of::<A>(),
            domain_name: std::any::type_name::<A>(),
            call: Arc::new(call),
        }
    }
}

impl<R> Handler<R> {
    /// The payload type this handler accepts.
    pub fn domain(&self) -> TypeId {
        self.domain
    }

    /// The payload type's name (for diagnostics only).
    pub fn domain_name(&self) -> &'static str {
        self.domain_name
    }
}

impl<A, R, F> From<Case<A, R, F>> for Handler<R>
where
    A: 'static,
    R: 'static,
    F: Fn(A) -> R + Send + Sync + 'static,
{
    fn from(case: Case<A, R, F>) -> Self {
        Handler::new(case.into_inner())
    }
}

impl<R> Clone for Handler<R> {
    fn clone(&self) -> Self {
        Self {
            domain: self.domain,
            domain_name: self.domain_name,
            call: Arc::clone(&self.call),
        }
    }
}

impl<R> fmt::Debug for Handler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("domain", &self.domain_name)
            .finish_non_exhaustive()
    }
}

/// Handlers for every alternative of `V`, indexed by tag.
pub struct DispatchTable<V, R> {
    /// Alternative name and handler, one per alternative, in tag order.
    slots: Box<[(&'static str, Handler<R>)]>,
    _variant: PhantomData<fn(V) -> R>,
}

impl<V: Variant, R> DispatchTable<V, R> {
    /// Compose `handlers` into a table for `V` with the default
    /// configuration.
    pub fn compose<I>(handlers: I) -> Result<Self, CompositionError>
    where
        I: IntoIterator<Item = Handler<R>>,
    {
        Self::compose_with(&ComposeConfig::default(), handlers)
    }

    /// Compose `handlers` into a table for `V`.
    ///
    /// Handler order has no effect on the result. Positions in errors are
    /// indices into `handlers`.
    pub fn compose_with<I>(config: &ComposeConfig, handlers: I) -> Result<Self, CompositionError>
    where
        I: IntoIterator<Item = Handler<R>>,
    {
        let alternatives = V::alternatives();
        let by_domain: FxHashMap<TypeId, usize> = alternatives
            .iter()
            .map(|alternative| (alternative.type_id, alternative.tag))
            .collect();

        let mut claims: Vec<Vec<usize>> = vec![Vec::new(); alternatives.len()];
        let mut slots: Vec<Option<Handler<R>>> = alternatives.iter().map(|_| None).collect();
        let mut supplied = 0usize;

        for (position, handler) in handlers.into_iter().enumerate() {
            supplied += 1;
            let Some(&tag) = by_domain.get(&handler.domain) else {
                match config.unknown_domains {
                    DomainPolicy::Reject => {
                        return Err(CompositionError::ArityMismatch {
                            variant: V::NAME,
                            position,
                            domain: handler.domain_name,
                        });
                    }
                    DomainPolicy::Ignore => {
                        warn!(
                            variant = V::NAME,
                            position,
                            domain = handler.domain_name,
                            "ignoring handler for a type that is not an alternative"
                        );
                        continue;
                    }
                }
            };
            claims[tag].push(position);
            slots[tag].get_or_insert(handler);
        }

        if let Some(alternative) = alternatives.iter().find(|a| claims[a.tag].len() > 1) {
            return Err(CompositionError::AmbiguousCoverage {
                variant: V::NAME,
                alternative: alternative.name,
                positions: claims[alternative.tag].clone(),
            });
        }

        let missing: Vec<&'static str> = alternatives
            .iter()
            .filter(|a| claims[a.tag].is_empty())
            .map(|a| a.name)
            .collect();
        if !missing.is_empty() {
            return Err(CompositionError::MissingCoverage {
                variant: V::NAME,
                missing,
            });
        }

        let slots: Box<[(&'static str, Handler<R>)]> = alternatives
            .iter()
            .zip(slots)
            .filter_map(|(alternative, handler)| Some((alternative.name, handler?)))
            .collect();
        debug!(
            variant = V::NAME,
            alternatives = slots.len(),
            handlers = supplied,
            "composed dispatch table"
        );
        Ok(Self {
            slots,
            _variant: PhantomData,
        })
    }

    /// Dispatch `value` to the handler for the alternative it holds.
    #[inline]
    pub fn apply(&self, value: V) -> R {
        value.with_payload(|tag, slot| {
            let Some((name, handler)) = self.slots.get(tag) else {
                unhandled_alternative(V::NAME, tag)
            };
            match (handler.call)(slot) {
                Some(result) => result,
                None => unhandled_alternative(V::NAME, name),
            }
        })
    }

    /// The handler registered for the alternative named `name`.
    pub fn handler(&self, name: &str) -> Option<&Handler<R>> {
        self.slots
            .iter()
            .find(|(alternative, _)| *alternative == name)
            .map(|(_, handler)| handler)
    }

    /// Number of alternatives covered.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table covers no alternatives.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<V, R> Clone for DispatchTable<V, R> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            _variant: PhantomData,
        }
    }
}

impl<V: Variant, R> fmt::Debug for DispatchTable<V, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("variant", &V::NAME)
            .field("slots", &self.slots)
            .finish()
    }
}
