use std::any::TypeId;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use parking_lot::Mutex;
use ahash::AHashMap;

type HandlerMap = AHashMap<TypeId, Vec<(u64, Box<dyn EventHandler>)>>;

/// Synchronous, in-process event bus.
///
/// Handlers run on the publishing thread before `publish` returns. A handler
/// must not publish on the same bus.
pub struct EventBus {
    handlers: Arc<Mutex<HandlerMap>>,
    next_id: AtomicU64,
}

/// Keeps a handler registered; dropping it removes the handler from the bus.
#[must_use = "the handler is removed as soon as the subscription is dropped"]
pub struct Subscription {
    handlers: Weak<Mutex<HandlerMap>>,
    type_id: TypeId,
    id: u64,
}

impl Subscription {
    /// Keep the handler for the lifetime of the bus
    pub fn detach(self) {
        std::mem::forget(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(handlers) = self.handlers.upgrade() {
            if let Some(list) = handlers.lock().get_mut(&self.type_id) {
                list.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Dashboard events
pub mod events {
    use super::Event;
    use crate::dataset::RecordId;
    use crate::mapping::Channel;

    /// A dataset replaced the previous one
    #[derive(Debug, Clone)]
    pub struct DatasetLoaded {
        pub source_name: String,
        pub generation: u64,
        pub row_count: usize,
        pub dimension_count: usize,
    }

    /// The selection set changed; `selected` is in display order
    #[derive(Debug, Clone)]
    pub struct SelectionChanged {
        pub selected: Vec<RecordId>,
    }

    /// A selection was refused because the set is full
    #[derive(Debug, Clone)]
    pub struct SelectionRejected {
        pub record: RecordId,
        pub capacity: usize,
    }

    /// A channel was bound to a new dimension
    #[derive(Debug, Clone)]
    pub struct DimensionChanged {
        pub channel: Channel,
        pub dimension: String,
    }

    /// A channel binding was refused
    #[derive(Debug, Clone)]
    pub struct DimensionRejected {
        pub channel: Channel,
        pub dimension: String,
        pub reason: String,
    }

    // Implement Event trait for all event types
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        DatasetLoaded,
        SelectionChanged,
        SelectionRejected,
        DimensionChanged,
        DimensionRejected
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) -> Subscription {
        let type_id = TypeId::of::<E>();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers
            .lock()
            .entry(type_id)
            .or_insert_with(Vec::new)
            .push((id, handler));
        Subscription {
            handlers: Arc::downgrade(&self.handlers),
            type_id,
            id,
        }
    }

    /// Subscribe a closure that receives the concrete event
    pub fn subscribe_fn<E, F>(&self, mut f: F) -> Subscription
    where
        E: Event,
        F: FnMut(&E) + Send + Sync + 'static,
    {
        self.subscribe::<E>(handler_from_fn(move |event| {
            if let Some(event) = event.as_any().downcast_ref::<E>() {
                f(event);
            }
        }))
    }

    /// Raise `flag` every time an `E` is published
    pub fn mark_on<E: Event>(&self, flag: Arc<AtomicBool>) -> Subscription {
        self.subscribe_fn::<E, _>(move |_| flag.store(true, Ordering::Release))
    }

    /// Publish an event
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for (_, handler) in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
    }

    /// Number of handlers registered for `E`
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.handlers
            .lock()
            .get(&TypeId::of::<E>())
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}
