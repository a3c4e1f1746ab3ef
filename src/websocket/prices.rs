use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{Sink, SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::RwLock;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};

use crate::{
    api::AppState,
    constants::PRICE_REFRESH_INTERVAL_SECS,
    error::{AppError, Result},
    models::{PriceSeries, TimeRange},
    services::{price_chart_service::normalize_coin, PriceChartService},
};

fn connected_payload() -> String {
    serde_json::json!({
        "type": "connected",
        "message": "Connected to price stream"
    })
    .to_string()
}

fn error_payload(message: &str) -> String {
    serde_json::json!({
        "type": "error",
        "message": message
    })
    .to_string()
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    Subscribe {
        coin: String,
        range: Option<String>,
    },
    Refresh,
}

#[derive(Debug, Serialize)]
struct SeriesUpdate<'a> {
    #[serde(rename = "type")]
    msg_type: &'static str,
    #[serde(flatten)]
    series: &'a PriceSeries,
}

#[derive(Debug, Clone, PartialEq)]
struct Subscription {
    coin: String,
    range: TimeRange,
}

#[derive(Debug, PartialEq)]
enum ClientAction {
    Subscribe(Subscription),
    Refresh,
}

const STREAM_COMMAND_BUFFER: usize = 8;

// Outbound work requested by the receive side.
#[derive(Debug, PartialEq)]
enum StreamCommand {
    Refresh,
    Reject(String),
}

fn parse_client_message(text: &str) -> Result<ClientAction> {
    let message: ClientMessage = serde_json::from_str(text)
        .map_err(|e| AppError::BadRequest(format!("Unrecognized message: {}", e)))?;
    match message {
        ClientMessage::Subscribe { coin, range } => Ok(ClientAction::Subscribe(Subscription {
            coin: normalize_coin(&coin)?,
            range: TimeRange::parse_or_default(range.as_deref())?,
        })),
        ClientMessage::Refresh => Ok(ClientAction::Refresh),
    }
}

fn series_payload(series: &PriceSeries) -> Result<String> {
    serde_json::to_string(&SeriesUpdate {
        msg_type: "price_series",
        series,
    })
    .map_err(|e| AppError::Internal(format!("Failed to encode price series: {}", e)))
}

type SharedSubscription = Arc<RwLock<Option<Subscription>>>;

/// Queues a command for the push loop. A full queue already holds pending
/// work, so the command is dropped. Returns false once the loop is gone.
fn enqueue(commands: &mpsc::Sender<StreamCommand>, command: StreamCommand) -> bool {
    match commands.try_send(command) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::debug!("Price stream command dropped; queue is full");
            true
        }
        Err(TrySendError::Closed(_)) => false,
    }
}

/// Applies one client text frame and returns the push it calls for.
async fn handle_client_text(text: &str, subscription: &RwLock<Option<Subscription>>) -> StreamCommand {
    match parse_client_message(text) {
        Ok(ClientAction::Subscribe(next)) => {
            tracing::info!("Price stream subscribed: {} ({})", next.coin, next.range);
            *subscription.write().await = Some(next);
            StreamCommand::Refresh
        }
        Ok(ClientAction::Refresh) => StreamCommand::Refresh,
        Err(e) => StreamCommand::Reject(e.to_string()),
    }
}

/// Pushes the subscribed series every `period` and on each queued command.
/// Returns when the sink fails or the command queue closes.
async fn push_updates<S>(
    mut sink: S,
    mut commands: mpsc::Receiver<StreamCommand>,
    subscription: SharedSubscription,
    service: PriceChartService,
    period: Duration,
) where
    S: Sink<Message> + Unpin,
{
    // First poll after one period; subscribe and refresh push immediately.
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            command = commands.recv() => match command {
                Some(StreamCommand::Refresh) => {}
                Some(StreamCommand::Reject(reason)) => {
                    if sink.send(Message::Text(error_payload(&reason).into())).await.is_err() {
                        return;
                    }
                    continue;
                }
                None => return,
            },
        }

        let Some(current) = subscription.read().await.clone() else {
            continue;
        };

        let payload = match service.series(&current.coin, current.range).await {
            Ok(series) => series_payload(&series).unwrap_or_else(|e| {
                tracing::error!("{}", e);
                error_payload(&e.to_string())
            }),
            Err(e) => {
                tracing::warn!("Price stream fetch failed for {}: {}", current.coin, e);
                error_payload(&e.to_string())
            }
        };

        if sink.send(Message::Text(payload.into())).await.is_err() {
            return;
        }
    }
}

/// WebSocket handler streaming a polled price series for one subscription.
pub async fn handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    let subscription: SharedSubscription = Arc::new(RwLock::new(None));
    let (commands_tx, commands_rx) = mpsc::channel::<StreamCommand>(STREAM_COMMAND_BUFFER);

    if sender
        .send(Message::Text(connected_payload().into()))
        .await
        .is_err()
    {
        return;
    }

    let service = PriceChartService::new(state.price_feed.clone());
    let mut send_task = tokio::spawn(push_updates(
        sender,
        commands_rx,
        subscription.clone(),
        service,
        Duration::from_secs(PRICE_REFRESH_INTERVAL_SECS),
    ));

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    let command = handle_client_text(text.as_str(), &subscription).await;
                    if !enqueue(&commands_tx, command) {
                        break;
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Price stream client disconnected");
                    break;
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    tracing::info!("Price WebSocket connection closed");
}
