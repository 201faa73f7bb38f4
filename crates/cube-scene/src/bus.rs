//! Publish/subscribe event bus over crossbeam channels.
//!
//! Publishers on any thread push into a single inbound queue. The owning
//! thread calls [`EventBus::pump`] once per frame to fan queued events out to
//! every interested subscriber. A subscriber unsubscribes by dropping its
//! [`Subscription`]; the bus prunes it on the next delivery.

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::events::{SceneEvent, Topic};

/// Errors returned by the event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    /// The bus was dropped; nothing will ever read the event.
    #[error("event bus is closed")]
    Closed,
}

/// Cloneable, `Send` handle for publishing into a bus.
#[derive(Clone, Debug)]
pub struct EventPublisher {
    sender: Sender<SceneEvent>,
}

impl EventPublisher {
    /// Queues `event` for the next [`EventBus::pump`].
    pub fn publish(&self, event: SceneEvent) -> Result<(), BusError> {
        self.sender.send(event).map_err(|_| BusError::Closed)
    }
}

/// Receiving end of a subscription.
#[derive(Debug)]
pub struct Subscription {
    receiver: Receiver<SceneEvent>,
}

impl Subscription {
    /// Next delivered event, if any. Never blocks.
    pub fn try_recv(&self) -> Option<SceneEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drains every event delivered so far.
    pub fn drain(&self) -> impl Iterator<Item = SceneEvent> + '_ {
        self.receiver.try_iter()
    }

    /// Number of delivered, unread events.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

struct Subscriber {
    /// `None` receives every topic.
    topics: Option<Vec<Topic>>,
    sender: Sender<SceneEvent>,
}

impl Subscriber {
    fn wants(&self, topic: Topic) -> bool {
        self.topics.as_ref().is_none_or(|topics| topics.contains(&topic))
    }
}

/// Event bus owned by the main loop.
pub struct EventBus {
    sender: Sender<SceneEvent>,
    inbox: Receiver<SceneEvent>,
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        let (sender, inbox) = crossbeam_channel::unbounded();
        Self {
            sender,
            inbox,
            subscribers: Vec::new(),
        }
    }

    /// A publishing handle that can be moved to another thread.
    pub fn publisher(&self) -> EventPublisher {
        EventPublisher {
            sender: self.sender.clone(),
        }
    }

    /// Queues `event` for the next [`pump`](Self::pump).
    pub fn publish(&self, event: SceneEvent) {
        // The bus holds the inbox, so this cannot be disconnected.
        let _ = self.sender.send(event);
    }

    /// Subscribes to every topic.
    pub fn subscribe(&mut self) -> Subscription {
        self.add_subscriber(None)
    }

    /// Subscribes to events whose topic is in `topics`.
    pub fn subscribe_to(&mut self, topics: &[Topic]) -> Subscription {
        self.add_subscriber(Some(topics.to_vec()))
    }

    fn add_subscriber(&mut self, topics: Option<Vec<Topic>>) -> Subscription {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.subscribers.push(Subscriber { topics, sender });
        Subscription { receiver }
    }

    /// Delivers every queued event to interested subscribers, in publish
    /// order. Returns the number of events taken from the queue.
    pub fn pump(&mut self) -> usize {
        let mut pumped = 0;
        while let Ok(event) = self.inbox.try_recv() {
            pumped += 1;
            let topic = event.topic();
            let before = self.subscribers.len();
            self.subscribers
                .retain(|sub| !sub.wants(topic) || sub.sender.send(event.clone()).is_ok());
            let pruned = before - self.subscribers.len();
            if pruned > 0 {
                tracing::debug!(pruned, "dropped subscriptions removed from event bus");
            }
        }
        if pumped > 0 {
            tracing::trace!(pumped, subscribers = self.subscribers.len(), "event bus pumped");
        }
        pumped
    }

    /// Number of live subscribers as of the last pump.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Number of events waiting for the next pump.
    pub fn pending(&self) -> usize {
        self.inbox.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
