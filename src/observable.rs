//! Single-threaded reactive state.
//!
//! - [`State`]: a shared, version-tracked value that synchronously notifies
//!   its subscribers on every publication.
//! - [`Subscription`]: RAII guard, dropping it unsubscribes.
//! - [`Derived`]: a value recomputed from other states whenever one of its
//!   declared triggers publishes (combine-latest semantics). Anything the
//!   compute closure reads without declaring it as a trigger is a snapshot
//!   read and never causes a recomputation on its own.
//!
//! Subscribers are held as `Weak` callbacks and pruned lazily during
//! notification. Every `set` publishes, even when the new value equals the
//! old one.

use async_stream::stream;
use futures::channel::mpsc;
use futures::{Stream, StreamExt};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = dyn Fn(&T);

struct Inner<T> {
    value: RefCell<T>,
    version: Cell<u64>,
    subscribers: RefCell<Vec<Weak<Callback<T>>>>,
}

/// Mutable reactive value
///
/// Cloning a `State` clones the handle; all clones observe the same value.
pub struct State<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("value", &self.inner.value.borrow())
            .field("version", &self.inner.version.get())
            .finish()
    }
}

impl<T: Clone + 'static> State<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                version: Cell::new(0),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Snapshot of the current value (does not subscribe)
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Borrow the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Number of publications since creation
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Replace the value and notify subscribers
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.publish();
    }

    /// Mutate the value in place, then notify subscribers
    ///
    /// The closure must not read this same state.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let out = f(&mut self.inner.value.borrow_mut());
        self.publish();
        out
    }

    /// Like [`State::update`], but nothing is published when the closure fails
    ///
    /// The closure must leave the value untouched when it returns an error.
    pub fn try_update<R, E>(&self, f: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E> {
        let out = f(&mut self.inner.value.borrow_mut())?;
        self.publish();
        Ok(out)
    }

    /// Register a callback invoked with every newly published value
    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Subscription {
        let callback: Rc<Callback<T>> = Rc::new(f);
        self.inner
            .subscribers
            .borrow_mut()
            .push(Rc::downgrade(&callback));
        Subscription {
            _callback: Box::new(callback),
        }
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }

    /// Stream of snapshots: the current value first, then every publication
    ///
    /// The stream never terminates on its own; it unsubscribes when dropped.
    pub fn watch(&self) -> impl Stream<Item = T> {
        let (tx, mut rx) = mpsc::unbounded();
        let _ = tx.unbounded_send(self.get());
        let subscription = self.subscribe(move |value: &T| {
            let _ = tx.unbounded_send(value.clone());
        });
        Box::pin(stream! {
            let _subscription = subscription;
            while let Some(value) = rx.next().await {
                yield value;
            }
        })
    }

    fn publish(&self) {
        self.inner.version.set(self.inner.version.get() + 1);

        // Collect first so callbacks may subscribe, set or read freely
        let callbacks: Vec<Rc<Callback<T>>> = {
            let mut subscribers = self.inner.subscribers.borrow_mut();
            subscribers.retain(|w| w.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        if callbacks.is_empty() {
            return;
        }

        let snapshot = self.get();
        for callback in callbacks {
            callback(&snapshot);
        }
    }
}

/// Keeps a callback registered; dropping it unsubscribes
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    _callback: Box<dyn Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Subscription")
    }
}

/// Anything a [`Derived`] value can recompute on
pub trait Trigger {
    fn on_change(&self, f: Rc<dyn Fn()>) -> Subscription;
}

impl<T: Clone + 'static> Trigger for State<T> {
    fn on_change(&self, f: Rc<dyn Fn()>) -> Subscription {
        self.subscribe(move |_| f())
    }
}

/// Read-only value recomputed whenever one of its triggers publishes
pub struct Derived<T> {
    output: State<T>,
    _subscriptions: Rc<Vec<Subscription>>,
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        Self {
            output: self.output.clone(),
            _subscriptions: Rc::clone(&self._subscriptions),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Derived").field(&self.output).finish()
    }
}

impl<T: Clone + 'static> Derived<T> {
    /// Compute once now, then again on every publication of any trigger
    pub fn new(triggers: &[&dyn Trigger], compute: impl Fn() -> T + 'static) -> Self {
        let output = State::new(compute());

        let recompute: Rc<dyn Fn()> = {
            let output = output.clone();
            Rc::new(move || output.set(compute()))
        };
        let subscriptions: Vec<Subscription> = triggers
            .iter()
            .map(|trigger| trigger.on_change(Rc::clone(&recompute)))
            .collect();

        Self {
            output,
            _subscriptions: Rc::new(subscriptions),
        }
    }

    pub fn get(&self) -> T {
        self.output.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.output.with(f)
    }

    /// Number of recomputations since creation
    pub fn version(&self) -> u64 {
        self.output.version()
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> Subscription {
        self.output.subscribe(f)
    }

    pub fn watch(&self) -> impl Stream<Item = T> {
        self.output.watch()
    }
}

impl<T: Clone + 'static> Trigger for Derived<T> {
    fn on_change(&self, f: Rc<dyn Fn()>) -> Subscription {
        self.output.on_change(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_notifies_subscribers_in_order() {
        let state = State::new(1);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = {
            let seen = Rc::clone(&seen);
            state.subscribe(move |v| seen.borrow_mut().push(("first", *v)))
        };
        let second = {
            let seen = Rc::clone(&seen);
            state.subscribe(move |v| seen.borrow_mut().push(("second", *v)))
        };

        state.set(2);
        assert_eq!(*seen.borrow(), vec![("first", 2), ("second", 2)]);
        assert_eq!(state.version(), 1);
        drop((first, second));
    }

    #[test]
    fn equal_value_still_publishes() {
        let state = State::new(5);
        let count = Rc::new(Cell::new(0));
        let _sub = {
            let count = Rc::clone(&count);
            state.subscribe(move |_| count.set(count.get() + 1))
        };

        state.set(5);
        state.set(5);
        assert_eq!(count.get(), 2);
        assert_eq!(state.version(), 2);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let state = State::new(0);
        let count = Rc::new(Cell::new(0));
        let sub = {
            let count = Rc::clone(&count);
            state.subscribe(move |_| count.set(count.get() + 1))
        };
        state.set(1);
        assert_eq!(state.subscriber_count(), 1);

        drop(sub);
        state.set(2);
        assert_eq!(count.get(), 1);
        assert_eq!(state.subscriber_count(), 0);
    }

    #[test]
    fn callback_can_read_and_write_during_notification() {
        let source = State::new(1);
        let mirror = State::new(0);
        let _sub = {
            let source_handle = source.clone();
            let mirror = mirror.clone();
            source.subscribe(move |v| mirror.set(*v + source_handle.get()))
        };

        source.set(4);
        assert_eq!(mirror.get(), 8);
    }

    #[test]
    fn try_update_publishes_only_on_success() {
        let state = State::new(vec![1, 2, 3]);

        let failed: Result<(), &str> = state.try_update(|_| Err("nope"));
        assert!(failed.is_err());
        assert_eq!(state.version(), 0);

        let removed: Result<i32, &str> = state.try_update(|v| v.pop().ok_or("empty"));
        assert_eq!(removed, Ok(3));
        assert_eq!(state.get(), vec![1, 2]);
        assert_eq!(state.version(), 1);
    }

    #[test]
    fn derived_recomputes_on_any_trigger() {
        let a = State::new(2);
        let b = State::new(3);
        let product = Derived::new(&[&a as &dyn Trigger, &b], {
            let (a, b) = (a.clone(), b.clone());
            move || a.get() * b.get()
        });
        assert_eq!(product.get(), 6);

        a.set(4);
        assert_eq!(product.get(), 12);
        b.set(10);
        assert_eq!(product.get(), 40);
        assert_eq!(product.version(), 2);
    }

    #[test]
    fn snapshot_read_does_not_trigger() {
        let tracked = State::new(1);
        let untracked = State::new(100);
        let sum = Derived::new(&[&tracked as &dyn Trigger], {
            let (tracked, untracked) = (tracked.clone(), untracked.clone());
            move || tracked.get() + untracked.get()
        });

        untracked.set(200);
        assert_eq!(sum.get(), 101);
        assert_eq!(sum.version(), 0);

        tracked.set(2);
        assert_eq!(sum.get(), 202);
    }

    #[test]
    fn derived_can_chain() {
        let base = State::new(1);
        let doubled = Derived::new(&[&base as &dyn Trigger], {
            let base = base.clone();
            move || base.get() * 2
        });
        let plus_one = Derived::new(&[&doubled as &dyn Trigger], {
            let doubled = doubled.clone();
            move || doubled.get() + 1
        });

        base.set(5);
        assert_eq!(plus_one.get(), 11);
    }

    #[test]
    fn watch_yields_current_then_publications() {
        let state = State::new("a".to_string());
        let stream = state.watch();
        state.set("b".to_string());
        state.set("c".to_string());

        let values: Vec<String> = tokio_test::block_on(stream.take(3).collect());
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn dropped_watch_releases_subscription() {
        let state = State::new(0);
        let stream = state.watch();
        assert_eq!(state.subscriber_count(), 1);
        drop(stream);
        assert_eq!(state.subscriber_count(), 0);
    }
}
