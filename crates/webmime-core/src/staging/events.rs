//! Change notifications emitted by [`StagingModel`](super::StagingModel).

/// A change to the staged rows or to the dirty flag.
///
/// Row ranges are inclusive and refer to row indices at the time of the event:
/// before removal for `RowsRemoved`, after insertion for `RowsInserted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    /// All rows were replaced; re-read the whole model.
    Reset,
    RowsInserted { first: usize, last: usize },
    RowsRemoved { first: usize, last: usize },
    RowsChanged { first: usize, last: usize },
    /// The dirty flag changed to the carried value.
    DirtyChanged(bool),
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ModelEvent)>;

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    pub(crate) fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    pub(crate) fn emit(&mut self, event: ModelEvent) {
        for (_, listener) in &mut self.entries {
            listener(&event);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_reaches_all_listeners_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::default();

        for tag in ["a", "b"] {
            let seen = seen.clone();
            listeners.subscribe(Box::new(move |event: &ModelEvent| {
                seen.borrow_mut().push((tag, *event));
            }));
        }

        listeners.emit(ModelEvent::Reset);
        assert_eq!(
            *seen.borrow(),
            vec![("a", ModelEvent::Reset), ("b", ModelEvent::Reset)]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut listeners = Listeners::default();

        let counter = count.clone();
        let id = listeners.subscribe(Box::new(move |_: &ModelEvent| *counter.borrow_mut() += 1));
        assert_eq!(listeners.len(), 1);

        listeners.emit(ModelEvent::DirtyChanged(true));
        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        listeners.emit(ModelEvent::DirtyChanged(false));

        assert_eq!(*count.borrow(), 1);
        assert_eq!(listeners.len(), 0);
    }
}
