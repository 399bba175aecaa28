use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tracing::{debug, info};

use crate::state::AppState;

pub async fn ws_prices(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state))
}

/// One task per connection: forward broadcast ticks until the client goes
/// away, then deregister. Deregistration is idempotent, so racing a
/// prune inside `Subscribers::broadcast` is harmless.
async fn handle_connection(socket: WebSocket, state: AppState) {
    let (id, mut ticks) = state.subscribers.subscribe();
    info!(
        "Price stream subscriber {} connected ({} active)",
        id,
        state.subscribers.count()
    );

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            tick = ticks.recv() => match tick {
                Some(payload) => {
                    if sender.send(Message::Text(payload)).await.is_err() {
                        debug!("Send to subscriber {} failed - disconnecting", id);
                        break;
                    }
                }
                None => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Ping(data))) => {
                    if sender.send(Message::Pong(data)).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    state.subscribers.unsubscribe(id);
    info!("Price stream subscriber {} disconnected", id);
}
