//! # Observer Fabric
//!
//! One synchronous publish/subscribe primitive shared by every event channel
//! in the crate. A [`Subject`] is instantiated per event kind; the event type
//! parameter fixes the channel at compile time, and the [`Observer`] trait
//! bound is the callback contract.
//!
//! ## Delivery
//!
//! - Synchronous: `notify` invokes every observer in-line and returns only
//!   after the last callback has finished.
//! - Ordered: observers run in registration order. No priorities.
//! - Non-owning: a subject holds weak registrations and never extends an
//!   observer's lifetime. Dead registrations are pruned on the next notify.
//!
//! ## Reentrancy
//!
//! Permitted. `notify` iterates a snapshot of the registration list, so an
//! observer that registers or removes observers mid-callback only affects
//! later notifications. A callback that triggers another notification runs
//! that nested cascade to completion before the outer fan-out continues.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// A synchronous event callback, one per observer per channel.
pub trait Observer<E> {
    /// Called once per event, on the notifying thread.
    fn on_event(&self, event: &E);
}

/// Ordered list of non-owning observer registrations for one event kind.
pub struct Subject<E> {
    observers: RefCell<Vec<Weak<dyn Observer<E>>>>,
}

impl<E> Subject<E> {
    /// Creates an empty subject.
    pub fn new() -> Self {
        Self {
            observers: RefCell::new(Vec::new()),
        }
    }

    /// Registers an observer.
    ///
    /// The registration is weak: the caller keeps ownership, and dropping
    /// the observer implicitly unregisters it. Registering an observer that
    /// is already present is a no-op (identity comparison).
    pub fn register<O>(&self, observer: &Rc<O>)
    where
        O: Observer<E> + 'static,
    {
        let rc: Rc<dyn Observer<E>> = observer.clone();
        let weak: Weak<dyn Observer<E>> = Rc::downgrade(&rc);
        self.register_weak(weak);
    }

    /// Registers an observer from an existing weak handle.
    ///
    /// Used where the observer only holds a weak reference to itself, e.g. a
    /// group registering on its children from inside its own constructor.
    pub fn register_weak(&self, observer: Weak<dyn Observer<E>>) {
        let mut observers = self.observers.borrow_mut();
        if observers.iter().any(|o| o.ptr_eq(&observer)) {
            return;
        }
        observers.push(observer);
    }

    /// Removes an observer. No-op when absent.
    pub fn remove<O>(&self, observer: &Rc<O>)
    where
        O: Observer<E> + 'static,
    {
        let rc: Rc<dyn Observer<E>> = observer.clone();
        let weak: Weak<dyn Observer<E>> = Rc::downgrade(&rc);
        self.remove_weak(&weak);
    }

    /// Removes an observer by weak handle. No-op when absent.
    ///
    /// Identity is allocation identity: `Weak::ptr_eq`, which ignores the
    /// metadata of `dyn` pointers and so survives trait-object coercions.
    pub fn remove_weak(&self, observer: &Weak<dyn Observer<E>>) {
        self.observers.borrow_mut().retain(|o| !o.ptr_eq(observer));
    }

    /// Drops every registration.
    pub fn clear(&self) {
        self.observers.borrow_mut().clear();
    }

    /// Number of live registrations.
    pub fn observer_count(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|o| o.strong_count() > 0)
            .count()
    }

    /// Notifies every live observer, in registration order, synchronously.
    ///
    /// Dead registrations are pruned before the fan-out. The registration
    /// list is snapshotted first, so callbacks may freely register or remove
    /// observers on this same subject.
    pub fn notify(&self, event: &E) {
        let live: Vec<Rc<dyn Observer<E>>> = {
            let mut observers = self.observers.borrow_mut();
            observers.retain(|o| o.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        tracing::trace!(observers = live.len(), "event fan-out");
        for observer in live {
            observer.on_event(event);
        }
    }
}

impl<E> Default for Subject<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Subject<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("observers", &self.observers.borrow().len())
            .finish()
    }
}

/// Wraps a closure as an observer.
///
/// The returned `Rc` is the registration's identity; keep it alive for as
/// long as the callback should stay registered.
pub fn observer_fn<E, F>(f: F) -> Rc<FnObserver<F>>
where
    F: Fn(&E) + 'static,
{
    Rc::new(FnObserver(f))
}

/// Closure adapter returned by [`observer_fn`].
pub struct FnObserver<F>(F);

impl<E, F> Observer<E> for FnObserver<F>
where
    F: Fn(&E),
{
    fn on_event(&self, event: &E) {
        (self.0)(event);
    }
}
