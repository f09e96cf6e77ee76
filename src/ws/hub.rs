//! Central live-channel state: connection registry, subscription index,
//! broadcast fanout, and the liveness monitor.
//!
//! [`LiveHub`] exclusively owns every connection's entry (outbound sender,
//! liveness flag, subscribed topic set). The subscription index maps topic
//! IDs to connection IDs and is derived data: a connection appears under a
//! topic if and only if that topic is in the connection's own set, and
//! empty index entries are pruned immediately.
//!
//! # Concurrency
//!
//! Connections are driven by one tokio task each, so the registry and
//! index sit behind a single mutex. Critical sections never await:
//! outbound delivery is a fire-and-forget send on an unbounded channel.
//! Broadcasts iterate over a snapshot of the subscriber senders, so a
//! concurrent unsubscribe or disconnect cannot invalidate the iteration.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use super::messages::{ClientFrame, LiveEvent, MALFORMED_FRAME_MESSAGE, parse_client_frame};
use crate::domain::{Commentary, Match};

/// Interval between liveness probes. A connection that fails to answer
/// two consecutive probes is evicted.
pub const PROBE_INTERVAL: Duration = Duration::from_secs(30);

/// Opaque identifier for a live connection.
pub type ConnId = u64;

type FrameSender = mpsc::UnboundedSender<Message>;

/// Registry entry for one open connection.
#[derive(Debug)]
struct ConnectionEntry {
    /// Outbound frame channel; dropping it closes the transport.
    sender: FrameSender,
    /// Cleared on each probe, set again when the pong arrives.
    alive: bool,
    /// Topics this connection is subscribed to. Source of truth; the
    /// index mirrors it.
    topics: HashSet<i64>,
}

#[derive(Debug, Default)]
struct HubInner {
    next_id: ConnId,
    connections: HashMap<ConnId, ConnectionEntry>,
    topics: HashMap<i64, HashSet<ConnId>>,
}

impl HubInner {
    /// Removes a connection and unsubscribes it from every topic in its
    /// own set. Dropping the entry's sender closes the transport.
    fn remove(&mut self, conn: ConnId) {
        let Some(entry) = self.connections.remove(&conn) else {
            return;
        };
        for topic in &entry.topics {
            let now_empty = match self.topics.get_mut(topic) {
                Some(subs) => {
                    subs.remove(&conn);
                    subs.is_empty()
                }
                None => false,
            };
            if now_empty {
                self.topics.remove(topic);
            }
        }
    }
}

/// Connection registry, subscription index, and broadcast fanout for the
/// live channel.
///
/// Constructed once at startup; [`LiveHub::start_liveness_monitor`] spawns
/// the periodic probe task and [`LiveHub::shutdown`] cancels it and closes
/// every connection.
#[derive(Debug, Default)]
pub struct LiveHub {
    inner: Mutex<HubInner>,
    monitor: Mutex<Option<JoinHandle<()>>>,
}

impl LiveHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a new connection with an empty subscription set and
    /// liveness set, and immediately sends it a `welcome` event.
    pub async fn admit(&self, sender: FrameSender) -> ConnId {
        let mut inner = self.inner.lock().await;
        let conn = inner.next_id;
        inner.next_id += 1;

        send_event(&sender, &LiveEvent::Welcome);
        inner.connections.insert(
            conn,
            ConnectionEntry {
                sender,
                alive: true,
                topics: HashSet::new(),
            },
        );
        tracing::debug!(conn, total = inner.connections.len(), "ws connection admitted");
        conn
    }

    /// Forcibly removes a connection, cleaning up all its subscriptions.
    ///
    /// Dropping the entry's sender closes the outbound channel, which
    /// makes the connection task shut the transport. Safe to call more
    /// than once; the second call is a no-op.
    pub async fn terminate(&self, conn: ConnId) {
        let mut inner = self.inner.lock().await;
        inner.remove(conn);
    }

    /// Records a probe acknowledgment from the connection.
    pub async fn mark_alive(&self, conn: ConnId) {
        let mut inner = self.inner.lock().await;
        if let Some(entry) = inner.connections.get_mut(&conn) {
            entry.alive = true;
        }
    }

    /// Dispatches one inbound text frame from a connection.
    ///
    /// Parse failures are answered with an `error` event and leave the
    /// connection open. Well-formed frames that are not recognized
    /// control frames are dropped silently.
    pub async fn handle_frame(&self, conn: ConnId, text: &str) {
        match parse_client_frame(text) {
            ClientFrame::Subscribe { match_id } => self.subscribe(conn, match_id).await,
            ClientFrame::Unsubscribe { match_id } => self.unsubscribe(conn, match_id).await,
            ClientFrame::Malformed => {
                let inner = self.inner.lock().await;
                if let Some(entry) = inner.connections.get(&conn) {
                    send_event(
                        &entry.sender,
                        &LiveEvent::Error {
                            message: MALFORMED_FRAME_MESSAGE.to_string(),
                        },
                    );
                }
            }
            ClientFrame::Ignored => {}
        }
    }

    /// Subscribes a connection to a topic. Idempotent.
    async fn subscribe(&self, conn: ConnId, match_id: i64) {
        let mut inner = self.inner.lock().await;
        let HubInner {
            connections, topics, ..
        } = &mut *inner;
        let Some(entry) = connections.get_mut(&conn) else {
            return;
        };
        entry.topics.insert(match_id);
        topics.entry(match_id).or_default().insert(conn);
        send_event(&entry.sender, &LiveEvent::Subscribed { match_id });
    }

    /// Unsubscribes a connection from a topic, pruning the index entry if
    /// it becomes empty. Unsubscribing from a topic never subscribed to
    /// is a no-op on the index but still acknowledged.
    async fn unsubscribe(&self, conn: ConnId, match_id: i64) {
        let mut inner = self.inner.lock().await;
        let HubInner {
            connections, topics, ..
        } = &mut *inner;
        let Some(entry) = connections.get_mut(&conn) else {
            return;
        };
        entry.topics.remove(&match_id);
        let now_empty = match topics.get_mut(&match_id) {
            Some(subs) => {
                subs.remove(&conn);
                subs.is_empty()
            }
            None => false,
        };
        if now_empty {
            topics.remove(&match_id);
        }
        send_event(&entry.sender, &LiveEvent::Unsubscribed { match_id });
    }

    /// Broadcasts a `match_created` event to every open connection,
    /// regardless of subscriptions.
    pub async fn broadcast_match_created(&self, match_record: &Match) {
        let event = LiveEvent::MatchCreated {
            data: match_record.clone(),
        };
        let senders: Vec<FrameSender> = {
            let inner = self.inner.lock().await;
            inner.connections.values().map(|e| e.sender.clone()).collect()
        };
        deliver(&senders, &event);
    }

    /// Broadcasts a `new_commentary` event to the subscribers of the
    /// given match topic. A topic with no subscribers is a no-op.
    pub async fn broadcast_commentary(&self, match_id: i64, comment: &Commentary) {
        let senders: Vec<FrameSender> = {
            let inner = self.inner.lock().await;
            let Some(subs) = inner.topics.get(&match_id) else {
                return;
            };
            subs.iter()
                .filter_map(|conn| inner.connections.get(conn))
                .map(|e| e.sender.clone())
                .collect()
        };
        let event = LiveEvent::NewCommentary {
            data: comment.clone(),
        };
        deliver(&senders, &event);
    }

    /// One liveness pass: evicts connections that missed the previous
    /// probe, then clears the flag and pings the rest.
    pub async fn probe_sweep(&self) {
        let mut inner = self.inner.lock().await;
        let dead: Vec<ConnId> = inner
            .connections
            .iter()
            .filter(|(_, entry)| !entry.alive)
            .map(|(conn, _)| *conn)
            .collect();
        for conn in dead {
            tracing::warn!(conn, "evicting unresponsive ws connection");
            inner.remove(conn);
        }
        for entry in inner.connections.values_mut() {
            entry.alive = false;
            let _ = entry.sender.send(Message::Ping(Default::default()));
        }
    }

    /// Spawns the periodic liveness monitor. The task is owned by the hub
    /// and cancelled by [`LiveHub::shutdown`].
    pub async fn start_liveness_monitor(self: &Arc<Self>) {
        let hub = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(PROBE_INTERVAL);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                hub.probe_sweep().await;
            }
        });
        let mut monitor = self.monitor.lock().await;
        if let Some(old) = monitor.replace(handle) {
            old.abort();
        }
    }

    /// Cancels the liveness monitor and closes every connection.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.monitor.lock().await.take() {
            handle.abort();
        }
        let mut inner = self.inner.lock().await;
        inner.connections.clear();
        inner.topics.clear();
    }

    /// Number of currently open connections.
    pub async fn connection_count(&self) -> usize {
        self.inner.lock().await.connections.len()
    }

    #[cfg(test)]
    pub(crate) async fn snapshot(&self) -> (HashMap<ConnId, HashSet<i64>>, HashMap<i64, HashSet<ConnId>>) {
        let inner = self.inner.lock().await;
        let conns = inner
            .connections
            .iter()
            .map(|(conn, entry)| (*conn, entry.topics.clone()))
            .collect();
        (conns, inner.topics.clone())
    }
}

/// Fire-and-forget event delivery to one connection. A connection whose
/// channel is closed (terminating) is skipped silently.
fn send_event(sender: &FrameSender, event: &LiveEvent) {
    let _ = sender.send(Message::text(event.to_frame()));
}

/// Delivers one event to a snapshot of senders, serializing it once.
fn deliver(senders: &[FrameSender], event: &LiveEvent) {
    if senders.is_empty() {
        return;
    }
    let frame = Message::text(event.to_frame());
    for sender in senders {
        let _ = sender.send(frame.clone());
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use chrono::Utc;
    use tokio::sync::mpsc::UnboundedReceiver;

    use super::*;
    use crate::domain::MatchStatus;

    async fn connect(hub: &LiveHub) -> (ConnId, UnboundedReceiver<Message>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let conn = hub.admit(tx).await;
        // drain the welcome frame
        let welcome = next_json(&mut rx);
        assert_eq!(welcome["type"], "welcome");
        (conn, rx)
    }

    fn next_json(rx: &mut UnboundedReceiver<Message>) -> serde_json::Value {
        match rx.try_recv() {
            Ok(Message::Text(text)) => match serde_json::from_str(text.as_str()) {
                Ok(value) => value,
                Err(e) => panic!("frame is not JSON: {e}"),
            },
            Ok(other) => panic!("expected text frame, got {other:?}"),
            Err(e) => panic!("expected a frame: {e}"),
        }
    }

    fn assert_empty(rx: &mut UnboundedReceiver<Message>) {
        assert!(rx.try_recv().is_err(), "expected no pending frames");
    }

    async fn assert_index_consistent(hub: &LiveHub) {
        let (conns, topics) = hub.snapshot().await;
        for (conn, owned) in &conns {
            for topic in owned {
                let Some(subs) = topics.get(topic) else {
                    panic!("conn {conn} owns topic {topic} missing from index");
                };
                assert!(subs.contains(conn), "index entry {topic} missing conn {conn}");
            }
        }
        for (topic, subs) in &topics {
            assert!(!subs.is_empty(), "index retains empty entry for topic {topic}");
            for conn in subs {
                let Some(owned) = conns.get(conn) else {
                    panic!("index references closed conn {conn}");
                };
                assert!(owned.contains(topic), "conn {conn} does not own topic {topic}");
            }
        }
    }

    fn sample_match(id: i64) -> Match {
        Match {
            id,
            sport: "football".to_string(),
            home_team: "Rovers".to_string(),
            away_team: "United".to_string(),
            start_time: Utc::now(),
            end_time: Utc::now(),
            home_score: 0,
            away_score: 0,
            status: MatchStatus::Live,
            created_at: Utc::now(),
        }
    }

    fn sample_commentary(match_id: i64, message: &str) -> Commentary {
        Commentary {
            id: 1,
            match_id,
            minute: 12,
            sequence: 0,
            period: "1H".to_string(),
            event_type: "goal".to_string(),
            actor: String::new(),
            team: String::new(),
            message: message.to_string(),
            metadata: None,
            tags: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn admit_sends_welcome_and_registers() {
        let hub = LiveHub::new();
        let (_conn, _rx) = connect(&hub).await;
        assert_eq!(hub.connection_count().await, 1);
    }

    #[tokio::test]
    async fn subscribe_updates_both_sides_and_acknowledges() {
        let hub = LiveHub::new();
        let (conn, mut rx) = connect(&hub).await;

        hub.handle_frame(conn, r#"{"type":"subscribe","matchId":42}"#).await;
        let ack = next_json(&mut rx);
        assert_eq!(ack, serde_json::json!({"type": "subscribed", "matchId": 42}));

        let (conns, topics) = hub.snapshot().await;
        assert!(conns.get(&conn).is_some_and(|t| t.contains(&42)));
        assert!(topics.get(&42).is_some_and(|s| s.contains(&conn)));
        assert_index_consistent(&hub).await;
    }

    #[tokio::test]
    async fn subscribe_is_idempotent() {
        let hub = LiveHub::new();
        let (conn, mut rx) = connect(&hub).await;

        hub.handle_frame(conn, r#"{"type":"subscribe","matchId":42}"#).await;
        hub.handle_frame(conn, r#"{"type":"subscribe","matchId":42}"#).await;

        let (conns, topics) = hub.snapshot().await;
        assert_eq!(conns.get(&conn).map(HashSet::len), Some(1));
        assert_eq!(topics.get(&42).map(HashSet::len), Some(1));
        assert_index_consistent(&hub).await;

        // both frames are acknowledged
        assert_eq!(next_json(&mut rx)["type"], "subscribed");
        assert_eq!(next_json(&mut rx)["type"], "subscribed");
    }

    #[tokio::test]
    async fn unsubscribe_prunes_empty_index_entry() {
        let hub = LiveHub::new();
        let (conn, mut rx) = connect(&hub).await;

        hub.handle_frame(conn, r#"{"type":"subscribe","matchId":5}"#).await;
        hub.handle_frame(conn, r#"{"type":"unsubscribe","matchId":5}"#).await;

        let (conns, topics) = hub.snapshot().await;
        assert!(conns.get(&conn).is_some_and(HashSet::is_empty));
        assert!(topics.is_empty(), "empty index entries must be pruned");
        assert_index_consistent(&hub).await;

        assert_eq!(next_json(&mut rx)["type"], "subscribed");
        assert_eq!(next_json(&mut rx)["type"], "unsubscribed");
    }

    #[tokio::test]
    async fn unsubscribe_never_subscribed_is_noop_for_others() {
        let hub = LiveHub::new();
        let (a, mut rx_a) = connect(&hub).await;
        let (b, mut rx_b) = connect(&hub).await;

        hub.handle_frame(a, r#"{"type":"subscribe","matchId":9}"#).await;
        assert_eq!(next_json(&mut rx_a)["type"], "subscribed");

        hub.handle_frame(b, r#"{"type":"unsubscribe","matchId":9}"#).await;
        assert_eq!(next_json(&mut rx_b)["type"], "unsubscribed");

        hub.broadcast_commentary(9, &sample_commentary(9, "still delivered")).await;
        assert_eq!(next_json(&mut rx_a)["type"], "new_commentary");
        assert_empty(&mut rx_b);
        assert_index_consistent(&hub).await;
    }

    #[tokio::test]
    async fn broadcast_to_empty_topic_is_noop() {
        let hub = LiveHub::new();
        let (_conn, mut rx) = connect(&hub).await;

        hub.broadcast_commentary(99, &sample_commentary(99, "nobody listening")).await;
        assert_empty(&mut rx);
    }

    #[tokio::test]
    async fn commentary_reaches_topic_subscriber() {
        let hub = LiveHub::new();
        let (conn, mut rx) = connect(&hub).await;

        hub.handle_frame(conn, r#"{"type":"subscribe","matchId":42}"#).await;
        assert_eq!(next_json(&mut rx), serde_json::json!({"type": "subscribed", "matchId": 42}));

        hub.broadcast_commentary(42, &sample_commentary(42, "Goal")).await;
        let event = next_json(&mut rx);
        assert_eq!(event["type"], "new_commentary");
        assert_eq!(event["data"]["message"], "Goal");
        assert_eq!(event["data"]["matchId"], 42);
    }

    #[tokio::test]
    async fn unsubscribed_client_stops_receiving() {
        let hub = LiveHub::new();
        let (a, mut rx_a) = connect(&hub).await;
        let (b, mut rx_b) = connect(&hub).await;

        hub.handle_frame(a, r#"{"type":"subscribe","matchId":7}"#).await;
        hub.handle_frame(b, r#"{"type":"subscribe","matchId":7}"#).await;
        hub.handle_frame(b, r#"{"type":"unsubscribe","matchId":7}"#).await;
        assert_eq!(next_json(&mut rx_a)["type"], "subscribed");
        assert_eq!(next_json(&mut rx_b)["type"], "subscribed");
        assert_eq!(next_json(&mut rx_b)["type"], "unsubscribed");

        hub.broadcast_commentary(7, &sample_commentary(7, "corner")).await;
        assert_eq!(next_json(&mut rx_a)["type"], "new_commentary");
        assert_empty(&mut rx_b);
    }

    #[tokio::test]
    async fn match_created_reaches_every_connection() {
        let hub = LiveHub::new();
        let (subscriber, mut rx_sub) = connect(&hub).await;
        let (_idle, mut rx_idle) = connect(&hub).await;

        hub.handle_frame(subscriber, r#"{"type":"subscribe","matchId":1}"#).await;
        assert_eq!(next_json(&mut rx_sub)["type"], "subscribed");

        hub.broadcast_match_created(&sample_match(50)).await;
        assert_eq!(next_json(&mut rx_sub)["type"], "match_created");
        let event = next_json(&mut rx_idle);
        assert_eq!(event["type"], "match_created");
        assert_eq!(event["data"]["id"], 50);
    }

    #[tokio::test]
    async fn malformed_frame_reports_error_and_keeps_subscriptions() {
        let hub = LiveHub::new();
        let (conn, mut rx) = connect(&hub).await;

        hub.handle_frame(conn, r#"{"type":"subscribe","matchId":3}"#).await;
        assert_eq!(next_json(&mut rx)["type"], "subscribed");

        hub.handle_frame(conn, "{not json").await;
        let error = next_json(&mut rx);
        assert_eq!(error, serde_json::json!({"type": "error", "message": "invalid JSON"}));

        // the connection is still open and still subscribed
        hub.broadcast_commentary(3, &sample_commentary(3, "kickoff")).await;
        assert_eq!(next_json(&mut rx)["type"], "new_commentary");
        assert_index_consistent(&hub).await;
    }

    #[tokio::test]
    async fn unrecognized_frames_are_dropped_silently() {
        let hub = LiveHub::new();
        let (conn, mut rx) = connect(&hub).await;

        hub.handle_frame(conn, r#"{"type":"shout","matchId":3}"#).await;
        hub.handle_frame(conn, r#"{"type":"subscribe","matchId":"3"}"#).await;
        hub.handle_frame(conn, r#"{"hello":"world"}"#).await;
        assert_empty(&mut rx);

        let (conns, topics) = hub.snapshot().await;
        assert!(conns.get(&conn).is_some_and(HashSet::is_empty));
        assert!(topics.is_empty());
    }

    #[tokio::test]
    async fn terminate_removes_all_index_references() {
        let hub = LiveHub::new();
        let (a, mut rx_a) = connect(&hub).await;
        let (b, mut rx_b) = connect(&hub).await;

        hub.handle_frame(a, r#"{"type":"subscribe","matchId":1}"#).await;
        hub.handle_frame(a, r#"{"type":"subscribe","matchId":2}"#).await;
        hub.handle_frame(b, r#"{"type":"subscribe","matchId":2}"#).await;
        assert_eq!(next_json(&mut rx_a)["type"], "subscribed");
        assert_eq!(next_json(&mut rx_a)["type"], "subscribed");
        assert_eq!(next_json(&mut rx_b)["type"], "subscribed");

        hub.terminate(a).await;
        assert_eq!(hub.connection_count().await, 1);

        let (conns, topics) = hub.snapshot().await;
        assert!(!conns.contains_key(&a));
        assert!(!topics.contains_key(&1), "topic 1 lost its only subscriber");
        assert!(topics.get(&2).is_some_and(|s| s.contains(&b) && !s.contains(&a)));
        assert_index_consistent(&hub).await;

        // terminating again is a no-op
        hub.terminate(a).await;
        assert_eq!(hub.connection_count().await, 1);
    }

    #[tokio::test]
    async fn terminate_closes_outbound_channel() {
        let hub = LiveHub::new();
        let (conn, mut rx) = connect(&hub).await;

        hub.terminate(conn).await;
        // sender dropped; the connection task sees a closed channel
        assert!(matches!(
            rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }

    #[tokio::test]
    async fn two_missed_probes_evict_connection() {
        let hub = LiveHub::new();
        let (conn, mut rx) = connect(&hub).await;
        hub.handle_frame(conn, r#"{"type":"subscribe","matchId":4}"#).await;
        assert_eq!(next_json(&mut rx)["type"], "subscribed");

        // first sweep clears the flag and sends a probe
        hub.probe_sweep().await;
        assert!(matches!(rx.try_recv(), Ok(Message::Ping(_))));
        assert_eq!(hub.connection_count().await, 1);

        // no pong arrives; second sweep evicts
        hub.probe_sweep().await;
        assert_eq!(hub.connection_count().await, 0);

        let (_, topics) = hub.snapshot().await;
        assert!(topics.is_empty(), "eviction must clean up subscriptions");
    }

    #[tokio::test]
    async fn pong_between_probes_keeps_connection() {
        let hub = LiveHub::new();
        let (conn, mut rx) = connect(&hub).await;

        hub.probe_sweep().await;
        assert!(matches!(rx.try_recv(), Ok(Message::Ping(_))));
        hub.mark_alive(conn).await;

        hub.probe_sweep().await;
        assert_eq!(hub.connection_count().await, 1);
        assert!(matches!(rx.try_recv(), Ok(Message::Ping(_))));
    }

    #[tokio::test]
    async fn shutdown_cancels_monitor_and_closes_connections() {
        let hub = Arc::new(LiveHub::new());
        hub.start_liveness_monitor().await;
        let (_conn, mut rx) = connect(&hub).await;

        hub.shutdown().await;
        assert_eq!(hub.connection_count().await, 0);
        assert!(matches!(
            rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }
}
