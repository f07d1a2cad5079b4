//! Session notifications.

use serde::Serialize;

use treelens_core::LayerId;

use crate::render::Generation;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum InspectorEvent {
    /// The active layer changed, by request or because it vanished.
    ActiveLayerChanged {
        previous: LayerId,
        current: LayerId,
        fell_back: bool,
    },
    /// A render pass finished and its rows were committed.
    RenderComplete { generation: Generation, rows: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&InspectorEvent) + Send>;

/// Subscriber list. Handlers run synchronously, in subscription order.
#[derive(Default)]
pub struct Emitter {
    handlers: Vec<(SubscriptionId, Handler)>,
    next_id: u64,
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}

impl Emitter {
    pub fn subscribe(&mut self, handler: impl FnMut(&InspectorEvent) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _)| *h != id);
        self.handlers.len() != before
    }

    pub fn emit(&mut self, event: &InspectorEvent) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }
}
