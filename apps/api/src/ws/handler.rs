use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use super::manager::WsManager;
use crate::auth::AuthUser;
use crate::models::DbId;
use crate::state::AppState;

/// GET /ws/notifications
///
/// The upgrade always succeeds; sockets without a valid token are closed
/// straight away.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    user: Option<AuthUser>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        match user {
            Some(user) => handle_socket(socket, state.ws_manager, user.user_id).await,
            None => reject(socket).await,
        }
    })
}

async fn reject(mut socket: WebSocket) {
    tracing::debug!("Closing unauthenticated notification socket");
    let _ = socket.send(Message::Close(None)).await;
}

/// Forwards pushed notifications to the socket until either side closes.
/// Inbound frames other than Close are ignored.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>, user_id: DbId) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id, "Notification socket connected");

    let mut rx = ws_manager.add(conn_id.clone(), user_id).await;
    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, user_id, "Notification socket disconnected");
}
