use crate::store::Unsubscriber;
use std::fmt;

/// Scoped release of everything a behaviour acquired while attaching.
///
/// Steps run in reverse order of registration, either explicitly through
/// [`destroy`](Teardown::destroy) or when the `Teardown` is dropped, so a
/// binding can never outlive its owner.
///
/// ```rust,ignore
/// let mut teardown = Teardown::new();
/// teardown.add_subscription(store.subscribe(|v| println!("{v}")));
/// teardown.add(move || doc.remove_attribute(node, "aria-controls"));
/// teardown.destroy();
/// ```
#[derive(Default)]
pub struct Teardown {
    steps: Vec<Box<dyn FnOnce()>>,
}

impl Teardown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a release step.
    pub fn add(&mut self, step: impl FnOnce() + 'static) {
        self.steps.push(Box::new(step));
    }

    /// Register a store subscription to end on release.
    pub fn add_subscription(&mut self, unsubscriber: Unsubscriber) {
        self.add(move || unsubscriber.unsubscribe());
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every pending step now.
    pub fn destroy(mut self) {
        self.release();
    }

    fn release(&mut self) {
        while let Some(step) = self.steps.pop() {
            step();
        }
    }
}

impl Drop for Teardown {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Teardown")
            .field("steps", &self.steps.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Writable;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn steps_run_in_reverse() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut teardown = Teardown::new();
        for i in 0..3 {
            let log = Rc::clone(&log);
            teardown.add(move || log.borrow_mut().push(i));
        }
        assert_eq!(teardown.len(), 3);
        teardown.destroy();
        assert_eq!(*log.borrow(), vec![2, 1, 0]);
    }

    #[test]
    fn drop_releases_subscriptions() {
        let store = Writable::new(0);
        {
            let mut teardown = Teardown::new();
            teardown.add_subscription(store.subscribe(|_| {}));
            assert_eq!(store.subscriber_count(), 1);
        }
        assert_eq!(store.subscriber_count(), 0);
    }
}
