//! Observable values with synchronous delivery.
//!
//! A [`Writable`] holds a value and a list of subscribers. Subscribers are
//! called immediately on [`subscribe`](Writable::subscribe) with the current
//! value and then after every change, in subscription order. Setting a value
//! equal to the current one is a no-op. Subscribers may write back into the
//! store they observe: the nested change is delivered after the current round
//! finishes, with the latest value.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Subscriber<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct StoreInner<T> {
    value: T,
    subscribers: Vec<(u64, Subscriber<T>)>,
    next_id: u64,
    notifying: bool,
    dirty: bool,
}

/// A shared, observable value.
///
/// Cloning a `Writable` yields another handle to the same store.
pub struct Writable<T> {
    inner: Rc<RefCell<StoreInner<T>>>,
}

impl<T> Clone for Writable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Writable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                value,
                subscribers: Vec::new(),
                next_id: 0,
                notifying: false,
                dirty: false,
            })),
        }
    }

    /// A copy of the current value.
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
        }
        self.notify();
    }

    /// Replace the value with `f(current)`.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = f(&self.inner.borrow().value);
        self.set(next);
    }

    /// Register `subscriber` and call it with the current value.
    ///
    /// The subscription lasts until the returned [`Unsubscriber`] is used.
    pub fn subscribe(&self, subscriber: impl FnMut(&T) + 'static) -> Unsubscriber {
        let subscriber: Subscriber<T> = Rc::new(RefCell::new(subscriber));
        let (id, value) = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Rc::clone(&subscriber)));
            (id, inner.value.clone())
        };
        (*subscriber.borrow_mut())(&value);

        let weak: Weak<RefCell<StoreInner<T>>> = Rc::downgrade(&self.inner);
        Unsubscriber {
            release: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.borrow_mut().subscribers.retain(|(sid, _)| *sid != id);
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.notifying {
                inner.dirty = true;
                return;
            }
            inner.notifying = true;
        }
        loop {
            let (value, subscribers) = {
                let mut inner = self.inner.borrow_mut();
                inner.dirty = false;
                let subscribers: Vec<_> = inner
                    .subscribers
                    .iter()
                    .map(|(_, s)| Rc::clone(s))
                    .collect();
                (inner.value.clone(), subscribers)
            };
            for subscriber in subscribers {
                // A subscriber that is still running further up the stack
                // sees the latest value once its own round completes.
                if let Ok(mut subscriber) = subscriber.try_borrow_mut() {
                    (*subscriber)(&value);
                }
            }
            let mut inner = self.inner.borrow_mut();
            if !inner.dirty {
                inner.notifying = false;
                break;
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Writable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Writable")
            .field("value", &inner.value)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

/// Handle that ends a store subscription.
///
/// Dropping an `Unsubscriber` without calling
/// [`unsubscribe`](Unsubscriber::unsubscribe) keeps the subscription alive;
/// hand it to a [`Teardown`](crate::teardown::Teardown) to tie it to a scope.
#[must_use = "the subscription stays active until `unsubscribe` is called"]
pub struct Unsubscriber {
    release: Option<Box<dyn FnOnce()>>,
}

impl Unsubscriber {
    pub fn unsubscribe(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Unsubscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscriber")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl FnMut(&T) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |v: &T| sink.borrow_mut().push(v.clone()))
    }

    #[test]
    fn subscribe_delivers_current_value() {
        let store = Writable::new(false);
        let (seen, f) = recorder();
        let _unsub = store.subscribe(f);
        assert_eq!(*seen.borrow(), vec![false]);
    }

    #[test]
    fn set_notifies_in_order() {
        let store = Writable::new(0);
        let order = Rc::new(RefCell::new(Vec::new()));
        let a = Rc::clone(&order);
        let b = Rc::clone(&order);
        let _ua = store.subscribe(move |v| a.borrow_mut().push(("a", *v)));
        let _ub = store.subscribe(move |v| b.borrow_mut().push(("b", *v)));
        store.set(5);
        assert_eq!(
            *order.borrow(),
            vec![("a", 0), ("b", 0), ("a", 5), ("b", 5)]
        );
    }

    #[test]
    fn equal_values_are_not_redelivered() {
        let store = Writable::new(1);
        let (seen, f) = recorder();
        let _unsub = store.subscribe(f);
        store.set(1);
        store.update(|v| *v);
        assert_eq!(*seen.borrow(), vec![1]);
    }

    #[test]
    fn update_uses_current_value() {
        let store = Writable::new(false);
        store.update(|open| !open);
        assert!(store.get());
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let store = Writable::new(0);
        let (seen, f) = recorder();
        let unsub = store.subscribe(f);
        assert_eq!(store.subscriber_count(), 1);
        unsub.unsubscribe();
        assert_eq!(store.subscriber_count(), 0);
        store.set(3);
        assert_eq!(*seen.borrow(), vec![0]);
    }

    #[test]
    fn reentrant_set_delivers_latest() {
        let store = Writable::new(0);
        let writer = store.clone();
        let _clamp = store.subscribe(move |v| {
            if *v > 10 {
                writer.set(10);
            }
        });
        let (seen, f) = recorder();
        let _unsub = store.subscribe(f);
        store.set(42);
        assert_eq!(store.get(), 10);
        assert_eq!(seen.borrow().last(), Some(&10));
    }

    #[test]
    fn unsubscribe_after_store_dropped_is_harmless() {
        let store = Writable::new(0);
        let unsub = store.subscribe(|_| {});
        drop(store);
        unsub.unsubscribe();
    }
}
