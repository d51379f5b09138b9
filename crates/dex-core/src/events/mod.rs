use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// System-wide event bus
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Common system events
pub mod events {
    use super::Event;
    use crate::navigation::{Identifier, SlotIndex};

    /// The pager committed a new center
    #[derive(Debug, Clone)]
    pub struct CenterCommitted {
        pub from: Identifier,
        pub to: Identifier,
    }

    /// A swipe or explicit move would have left the id range
    #[derive(Debug, Clone)]
    pub struct NavigationRejected {
        pub center: Identifier,
        pub offset: i64,
    }

    /// A detail or description request failed
    #[derive(Debug, Clone)]
    pub struct FetchFailed {
        pub slot: SlotIndex,
        pub id: Identifier,
        pub resource: &'static str,
        pub error: String,
    }

    /// A late result for a superseded binding was dropped
    #[derive(Debug, Clone)]
    pub struct StaleResultDiscarded {
        pub slot: SlotIndex,
        pub id: Identifier,
        pub generation: u64,
    }

    /// A list page was appended
    #[derive(Debug, Clone)]
    pub struct PageLoaded {
        pub entries: usize,
        pub total: usize,
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
        CenterCommitted,
        NavigationRejected,
        FetchFailed,
        StaleResultDiscarded,
        PageLoaded
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_default().push(handler);
    }

    /// Publish an event
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();

        if let Some(event_handlers) = handlers.get_mut(&type_id) {
            for handler in event_handlers.iter_mut() {
                handler.handle(&event);
            }
        }
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
