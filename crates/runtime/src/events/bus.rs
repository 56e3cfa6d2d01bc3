//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::broadcast;

use super::types::{DecisionEvent, GameStateEvent, TurnEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// World changes (intents, actions, projectiles, game over)
    GameState,
    /// Turn hand-over events
    Turn,
    /// Decision service traffic
    Decision,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    GameState(GameStateEvent),
    Turn(TurnEvent),
    Decision(DecisionEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::GameState(_) => Topic::GameState,
            Event::Turn(_) => Topic::Turn,
            Event::Decision(_) => Topic::Decision,
        }
    }
}

/// Topic-based event bus
///
/// Every topic owns its own broadcast channel, created up front, so slow
/// decision subscribers never lag behind world events and vice versa.
#[derive(Clone)]
pub struct EventBus {
    game_state: broadcast::Sender<Event>,
    turn: broadcast::Sender<Event>,
    decision: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            game_state: broadcast::channel(capacity).0,
            turn: broadcast::channel(capacity).0,
            decision: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::GameState => &self.game_state,
            Topic::Turn => &self.turn,
            Topic::Decision => &self.decision,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::EntityId;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut turns = bus.subscribe(Topic::Turn);
        let mut decisions = bus.subscribe(Topic::Decision);

        bus.publish(Event::Decision(DecisionEvent::Requested {
            agent: EntityId(3),
            callsign: "red_0".to_string(),
        }));
        bus.publish(Event::Turn(TurnEvent {
            agent: EntityId(4),
            callsign: "blue_0".to_string(),
            round: 1,
        }));

        let turn = turns.recv().await.expect("turn event");
        assert_eq!(turn.topic(), Topic::Turn);
        assert!(turns.try_recv().is_err());

        let decision = decisions.recv().await.expect("decision event");
        assert!(matches!(
            decision,
            Event::Decision(DecisionEvent::Requested { agent: EntityId(3), .. })
        ));
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = EventBus::default();
        bus.publish(Event::GameState(GameStateEvent::NewGame { seed: 1 }));
        let map = bus.subscribe_multiple(&[Topic::GameState, Topic::Turn]);
        assert_eq!(map.len(), 2);
    }
}
