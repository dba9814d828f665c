//! Scoped DOM event listeners.
//!
//! Drags that outlive the element they started on (the splitter) listen on
//! the document. A `ListenerGuard` owns those closures and removes them when
//! the drag ends or when the guard is dropped, whichever comes first.

use std::fmt::Debug;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, MouseEvent};

type MouseListener = Closure<dyn FnMut(MouseEvent)>;

/// Something listeners can be attached to and removed from.
pub trait ListenerTarget {
    type Listener;
    type Error: Debug;

    fn add(&self, event: &'static str, listener: &Self::Listener) -> Result<(), Self::Error>;
    fn remove(&self, event: &'static str, listener: &Self::Listener) -> Result<(), Self::Error>;
}

impl ListenerTarget for EventTarget {
    type Listener = MouseListener;
    type Error = JsValue;

    fn add(&self, event: &'static str, listener: &MouseListener) -> Result<(), JsValue> {
        self.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
    }

    fn remove(&self, event: &'static str, listener: &MouseListener) -> Result<(), JsValue> {
        self.remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
    }
}

pub struct ListenerGuard<T: ListenerTarget = EventTarget> {
    target: T,
    listeners: Vec<(&'static str, T::Listener)>,
    /// Detached closures kept alive until the guard drops.
    retired: Vec<T::Listener>,
}

impl<T: ListenerTarget> ListenerGuard<T> {
    pub fn new(target: T) -> Self {
        Self {
            target,
            listeners: Vec::new(),
            retired: Vec::new(),
        }
    }

    /// Attach `listener` for `event` until the guard detaches.
    pub fn attach(&mut self, event: &'static str, listener: T::Listener) -> Result<(), T::Error> {
        self.target.add(event, &listener)?;
        self.listeners.push((event, listener));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Remove every listener from the target.
    ///
    /// The closures themselves are released when the guard drops. A handler
    /// that ends its own drag must detach first and drop the guard later,
    /// since a closure cannot be freed while it is running.
    pub fn detach(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        log::debug!("listeners: detaching {}", self.listeners.len());
        for (event, listener) in self.listeners.drain(..) {
            if let Err(err) = self.target.remove(event, &listener) {
                log::warn!("listeners: failed to detach '{event}': {err:?}");
            }
            self.retired.push(listener);
        }
    }
}

impl ListenerGuard<EventTarget> {
    /// Attach a mouse `handler` for `event` until the guard detaches.
    pub fn listen(
        &mut self,
        event: &'static str,
        handler: impl FnMut(MouseEvent) + 'static,
    ) -> Result<(), JsValue> {
        self.attach(event, MouseListener::new(handler))
    }
}

impl<T: ListenerTarget> Drop for ListenerGuard<T> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Log {
        attached: Vec<(&'static str, u32)>,
        adds: usize,
        removes: usize,
    }

    /// In-memory target. Removing a listener that is not attached fails.
    #[derive(Clone, Default)]
    struct RecordingTarget(Rc<RefCell<Log>>);

    impl ListenerTarget for RecordingTarget {
        type Listener = u32;
        type Error = String;

        fn add(&self, event: &'static str, listener: &u32) -> Result<(), String> {
            let mut log = self.0.borrow_mut();
            log.adds += 1;
            log.attached.push((event, *listener));
            Ok(())
        }

        fn remove(&self, event: &'static str, listener: &u32) -> Result<(), String> {
            let mut log = self.0.borrow_mut();
            log.removes += 1;
            let at = log
                .attached
                .iter()
                .position(|entry| *entry == (event, *listener))
                .ok_or_else(|| format!("{event}/{listener} not attached"))?;
            log.attached.remove(at);
            Ok(())
        }
    }

    fn start_drag(target: &RecordingTarget, id: u32) -> ListenerGuard<RecordingTarget> {
        let mut guard = ListenerGuard::new(target.clone());
        guard.attach("mousemove", id).unwrap();
        guard.attach("mouseup", id).unwrap();
        guard
    }

    #[test]
    fn repeated_drags_leave_nothing_attached() {
        let target = RecordingTarget::default();
        for id in 0..5 {
            let mut guard = start_drag(&target, id);
            assert_eq!(guard.len(), 2);
            assert_eq!(target.0.borrow().attached.len(), 2);

            guard.detach();
            assert!(guard.is_empty());
            assert!(target.0.borrow().attached.is_empty());
            drop(guard);
        }
        let log = target.0.borrow();
        assert_eq!(log.adds, 10);
        // drop after detach removes nothing twice
        assert_eq!(log.removes, 10);
    }

    #[test]
    fn drop_without_detach_removes_everything() {
        let target = RecordingTarget::default();
        {
            let guard = start_drag(&target, 7);
            assert_eq!(guard.len(), 2);
        }
        let log = target.0.borrow();
        assert!(log.attached.is_empty());
        assert_eq!(log.removes, log.adds);
    }

    #[test]
    fn detach_is_idempotent() {
        let target = RecordingTarget::default();
        let mut guard = start_drag(&target, 1);
        guard.detach();
        guard.detach();
        assert_eq!(target.0.borrow().removes, 2);
        assert_eq!(guard.retired.len(), 2);
    }

    #[test]
    fn failed_removal_still_retires_the_listener() {
        let target = RecordingTarget::default();
        let mut guard = start_drag(&target, 3);
        target.0.borrow_mut().attached.clear();
        guard.detach();
        assert!(guard.is_empty());
        assert_eq!(guard.retired.len(), 2);
    }
}
