use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::types::{EventKind, InputEvent};

/// Shared input callback.
///
/// The same listener may be registered under several kinds.
pub type Listener = Rc<RefCell<dyn FnMut(&InputEvent)>>;

/// Opaque registration handle returned by [`EventTarget::add_listener`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ListenerId(u64);

/// Addressable event source.
///
/// Methods take `&self` so a target can be shared between a host and several
/// loop controllers, and so listeners may (de)register while events are being
/// dispatched.
pub trait EventTarget {
    fn add_listener(&self, kind: EventKind, listener: Listener) -> ListenerId;

    /// Returns `false` when `id` was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;
}

struct Entry {
    id: ListenerId,
    kind: EventKind,
    listener: Listener,
}

/// In-process [`EventTarget`] with ordered dispatch.
#[derive(Default)]
pub struct ListenerRegistry {
    entries: RefCell<Vec<Entry>>,
    next_id: Cell<u64>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Delivers `event` to every listener registered for its kind, in
    /// registration order.
    ///
    /// Returns the number of listeners invoked. The listener list is
    /// snapshotted first, so registrations made during dispatch only see
    /// later events.
    pub fn dispatch(&self, event: &InputEvent) -> usize {
        let kind = event.kind();
        let targets: Vec<Listener> = self
            .entries
            .borrow()
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.listener.clone())
            .collect();

        let mut delivered = 0;
        for listener in targets {
            match listener.try_borrow_mut() {
                Ok(mut f) => {
                    f(event);
                    delivered += 1;
                }
                Err(_) => log::warn!("skipping re-entrant listener for {kind:?}"),
            }
        }
        delivered
    }
}

impl EventTarget for ListenerRegistry {
    fn add_listener(&self, kind: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push(Entry { id, kind, listener });
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, KeyEvent, KeyEventKind};

    fn key(kind: KeyEventKind) -> InputEvent {
        InputEvent::Key(KeyEvent::new(kind, Key::Enter))
    }

    fn counter() -> (Rc<Cell<u32>>, Listener) {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let listener: Listener = Rc::new(RefCell::new(move |_: &InputEvent| h.set(h.get() + 1)));
        (hits, listener)
    }

    #[test]
    fn dispatch_filters_by_kind() {
        let registry = ListenerRegistry::new();
        let (hits, listener) = counter();
        registry.add_listener(EventKind::KeyDown, listener);

        assert_eq!(registry.dispatch(&key(KeyEventKind::Up)), 0);
        assert_eq!(registry.dispatch(&key(KeyEventKind::Down)), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn remove_is_exact() {
        let registry = ListenerRegistry::new();
        let (_, listener) = counter();
        let a = registry.add_listener(EventKind::KeyDown, listener.clone());
        let b = registry.add_listener(EventKind::KeyUp, listener);

        assert!(registry.remove_listener(a));
        assert!(!registry.remove_listener(a));
        assert_eq!(registry.len(), 1);
        assert!(registry.remove_listener(b));
        assert!(registry.is_empty());
    }

    #[test]
    fn listener_may_unregister_during_dispatch() {
        let registry = Rc::new(ListenerRegistry::new());
        let slot: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));

        let reg = Rc::downgrade(&registry);
        let own = slot.clone();
        let listener: Listener = Rc::new(RefCell::new(move |_: &InputEvent| {
            if let (Some(reg), Some(id)) = (reg.upgrade(), own.get()) {
                reg.remove_listener(id);
            }
        }));
        slot.set(Some(registry.add_listener(EventKind::KeyPress, listener)));

        assert_eq!(registry.dispatch(&key(KeyEventKind::Press)), 1);
        assert!(registry.is_empty());
        assert_eq!(registry.dispatch(&key(KeyEventKind::Press)), 0);
    }
}
