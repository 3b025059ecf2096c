//! Integration tests for the realtime broker
//!
//! Exercises the session registry and room broker through the public API
//! with an in-memory membership oracle: full connect → subscribe → publish →
//! disconnect scenarios, and the concurrency invariant that a room's
//! subscriber set never holds a connection the registry has forgotten.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use uuid::Uuid;

use wirechat::realtime::{
    dm_room, group_room, MembershipOracle, RoomBroker, ServerEvent, SessionRegistry,
    SubscribeOutcome,
};

/// Oracle over a mutable in-memory membership table
struct TableOracle {
    members: Mutex<HashSet<(i64, i64)>>, // (user_id, group_id)
}

impl TableOracle {
    fn new(members: &[(i64, i64)]) -> Self {
        Self {
            members: Mutex::new(members.iter().copied().collect()),
        }
    }

    async fn revoke(&self, user_id: i64, group_id: i64) {
        self.members.lock().await.remove(&(user_id, group_id));
    }
}

#[async_trait]
impl MembershipOracle for TableOracle {
    async fn is_group_member(&self, user_id: i64, group_id: i64) -> Result<bool, sqlx::Error> {
        Ok(self.members.lock().await.contains(&(user_id, group_id)))
    }
}

fn setup(
    members: &[(i64, i64)],
) -> (Arc<SessionRegistry>, Arc<TableOracle>, Arc<RoomBroker>) {
    let registry = Arc::new(SessionRegistry::new());
    let oracle = Arc::new(TableOracle::new(members));
    let broker = Arc::new(RoomBroker::new(registry.clone(), oracle.clone()));
    (registry, oracle, broker)
}

fn connect(
    broker: &RoomBroker,
    user_id: i64,
) -> (Uuid, mpsc::Receiver<ServerEvent>) {
    let conn = Uuid::new_v4();
    let (tx, rx) = mpsc::channel(64);
    broker.connect(conn, user_id, tx).unwrap();
    (conn, rx)
}

#[tokio::test]
async fn test_group_chat_scenario() {
    let (registry, _oracle, broker) = setup(&[(3, 7), (9, 7)]);

    let (alice, mut rx_a) = connect(&broker, 3);
    let (bob, mut rx_b) = connect(&broker, 9);

    assert_eq!(broker.subscribe(alice, "group:7").await, SubscribeOutcome::Subscribed);
    assert_eq!(broker.subscribe(bob, "group:7").await, SubscribeOutcome::Subscribed);
    assert_eq!(rx_a.recv().await.unwrap(), ServerEvent::Subscribed { room: "group:7".into() });
    assert_eq!(rx_b.recv().await.unwrap(), ServerEvent::Subscribed { room: "group:7".into() });

    // The write path publishes after persisting.
    let payload = json!({"id": 1, "group_id": 7, "sender_id": 3, "content": "hello"});
    assert_eq!(broker.publish(&group_room(7), payload.clone()), 2);

    for rx in [&mut rx_a, &mut rx_b] {
        match rx.recv().await.unwrap() {
            ServerEvent::Message { room, data } => {
                assert_eq!(room, "group:7");
                assert_eq!(data, payload);
            }
            other => panic!("expected message, got {:?}", other),
        }
    }

    // Bob leaves; the next publish reaches only Alice.
    broker.unsubscribe(bob, "group:7");
    assert_eq!(broker.publish(&group_room(7), json!({"id": 2})), 1);

    assert_eq!(registry.current_rooms(alice).unwrap().len(), 2); // user:3 + group:7
}

#[tokio::test]
async fn test_dm_scenario_uses_canonical_room() {
    let (_registry, _oracle, broker) = setup(&[]);

    let (alice, mut rx_a) = connect(&broker, 3);
    let (bob, mut rx_b) = connect(&broker, 9);

    // Both sides compute the same key regardless of who constructs it.
    let room = dm_room(9, 3);
    assert_eq!(room, "dm:3:9");

    broker.subscribe(alice, &room).await;
    broker.subscribe(bob, &room).await;
    let _ = rx_a.recv().await;
    let _ = rx_b.recv().await;

    assert_eq!(broker.publish(&room, json!({"content": "hi"})), 2);
}

#[tokio::test]
async fn test_revoked_member_denied_on_next_subscribe() {
    let (_registry, oracle, broker) = setup(&[(3, 7)]);
    let (alice, mut rx) = connect(&broker, 3);

    assert_eq!(broker.subscribe(alice, "group:7").await, SubscribeOutcome::Subscribed);
    let _ = rx.recv().await;
    broker.unsubscribe(alice, "group:7");
    let _ = rx.recv().await;

    oracle.revoke(3, 7).await;

    assert_eq!(broker.subscribe(alice, "group:7").await, SubscribeOutcome::Denied);
    assert_eq!(
        rx.recv().await.unwrap(),
        ServerEvent::Error { message: "Not authorized for room".into() }
    );
}

#[tokio::test]
async fn test_disconnect_stops_delivery() {
    let (registry, _oracle, broker) = setup(&[(3, 7)]);
    let (alice, mut rx) = connect(&broker, 3);

    broker.subscribe(alice, "group:7").await;
    let _ = rx.recv().await;

    broker.disconnect(alice);

    assert_eq!(broker.publish(&group_room(7), json!({})), 0);
    assert!(registry.current_rooms(alice).is_none());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_concurrent_subscribe_and_disconnect_never_dangles() {
    // Hammer the same connections with racing subscribes and disconnects;
    // afterwards no room may hold a connection the registry has dropped.
    let (registry, _oracle, broker) = setup(&[(1, 1)]);

    for _ in 0..50 {
        let conn = Uuid::new_v4();
        let (tx, _rx) = mpsc::channel(64);
        broker.connect(conn, 1, tx).unwrap();

        let subscriber = {
            let broker = broker.clone();
            tokio::spawn(async move { broker.subscribe(conn, "group:1").await })
        };
        let disconnector = {
            let broker = broker.clone();
            tokio::spawn(async move { broker.disconnect(conn) })
        };

        let outcome = subscriber.await.unwrap();
        disconnector.await.unwrap();

        // Whatever the interleaving produced, the indices must agree.
        assert!(!registry.contains(conn));
        if broker.subscriber_count("group:1") != 0 {
            panic!(
                "dangling subscription after outcome {:?}: room holds a dead connection",
                outcome
            );
        }
    }
}

#[tokio::test]
async fn test_publishes_race_with_subscribes() {
    // Publish may run concurrently with subscribe/unsubscribe on the same
    // room; it must never fail, and each delivered copy must be intact.
    let (_registry, _oracle, broker) = setup(&[(1, 1)]);

    let publisher = {
        let broker = broker.clone();
        tokio::spawn(async move {
            for i in 0..100 {
                broker.publish("group:1", json!({"seq": i}));
                tokio::task::yield_now().await;
            }
        })
    };

    let churner = {
        let broker = broker.clone();
        tokio::spawn(async move {
            for _ in 0..20 {
                let conn = Uuid::new_v4();
                let (tx, mut rx) = mpsc::channel(256);
                broker.connect(conn, 1, tx).unwrap();
                broker.subscribe(conn, "group:1").await;
                tokio::task::yield_now().await;
                broker.disconnect(conn);
                // Drain whatever arrived; every frame must be well-formed.
                while let Ok(event) = rx.try_recv() {
                    if let ServerEvent::Message { room, data } = event {
                        assert_eq!(room, "group:1");
                        assert!(data.get("seq").is_some());
                    }
                }
            }
        })
    };

    publisher.await.unwrap();
    churner.await.unwrap();

    assert_eq!(broker.subscriber_count("group:1"), 0);
}
