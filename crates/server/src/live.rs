// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live change feed for open calendars and admin consoles.
//!
//! Clients connect over a WebSocket and receive a small JSON event whenever
//! bookings or day settings change. Events only say what changed; clients
//! re-read the calendar or overview over HTTP to get current figures.
//!
//! - Events are broadcast to every connected client
//! - Nothing is accepted from clients over the socket
//! - Booking codes are never included, since the feed is unauthenticated
//! - A client's subscription ends when its socket closes

use axum::{
    extract::{
        State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use prenota_api::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Maximum number of events to buffer in the broadcast channel.
/// If clients cannot keep up, older events will be dropped.
const EVENT_BUFFER_SIZE: usize = 100;

/// Live change events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A booking was stored, by a customer or by staff.
    BookingCreated {
        /// The booked date.
        date: String,
        /// Seats booked.
        seats: u32,
    },
    /// A customer cancelled a booking.
    BookingCancelled {
        /// The booking's date.
        date: String,
    },
    /// Staff deleted a booking.
    BookingDeleted {
        /// The booking's date.
        date: String,
    },
    /// Seat caps or sold-out flags changed.
    DaySettingsChanged {
        /// The dates whose settings changed.
        dates: Vec<String>,
    },
    /// A day was reset.
    DayReset {
        /// The date reset.
        date: String,
        /// Bookings removed.
        removed_bookings: usize,
    },
    /// Connection confirmation (sent on initial connect).
    Connected {
        /// Server time of the connection (RFC 3339).
        timestamp: String,
    },
}

impl LiveEvent {
    /// Builds the greeting sent to a newly connected client.
    #[must_use]
    pub fn connected(now: OffsetDateTime) -> Self {
        Self::Connected {
            timestamp: now
                .format(&Rfc3339)
                .unwrap_or_else(|_| String::from("unknown")),
        }
    }
}

/// Fan-out of live events to every connected socket.
#[derive(Clone)]
pub struct LiveEventBroadcaster {
    tx: broadcast::Sender<LiveEvent>,
}

impl LiveEventBroadcaster {
    /// Creates a new event broadcaster.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Broadcasts an event to all connected clients.
    ///
    /// If no clients are connected, the event is dropped.
    pub fn broadcast(&self, event: &LiveEvent) {
        match self.tx.send(event.clone()) {
            Ok(count) => {
                debug!(?event, receivers = count, "Broadcast live event");
            }
            Err(_) => {
                debug!(?event, "No receivers for live event");
            }
        }
    }

    /// Subscribes to events sent from now on.
    pub(crate) fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }
}

impl Default for LiveEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Handler for GET `/live`.
///
/// Upgrades the connection to a WebSocket and streams live events.
pub async fn live_events_handler(
    ws: WebSocketUpgrade,
    AxumState(broadcaster): AxumState<Arc<LiveEventBroadcaster>>,
    AxumState(clock): AxumState<Arc<dyn Clock>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, broadcaster, clock))
}

/// Streams events to one client until either side goes away.
async fn handle_socket(
    socket: WebSocket,
    broadcaster: Arc<LiveEventBroadcaster>,
    clock: Arc<dyn Clock>,
) {
    info!("Client connected to live feed");

    let (mut sender, mut receiver) = socket.split();
    let mut rx: broadcast::Receiver<LiveEvent> = broadcaster.subscribe();

    let connected_event: LiveEvent = LiveEvent::connected(clock.now());

    if let Ok(json) = serde_json::to_string(&connected_event)
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => {
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!(?e, "Failed to serialize live event");
                    }
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Live feed client fell behind, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Received unexpected message from live feed client, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!("Receive task completed");
            send_task.abort();
        }
    }

    info!("Client disconnected from live feed");
}
