//! Per-session websocket channel
//!
//! One socket carries one rendered session view. The connection owns the
//! session controller, the browser bridge it acquires devices through, and
//! the ephemeral chat log; all three are discarded when the socket closes.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::chat::ChatLog;
use crate::media::SourceProvider;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::SessionController;
use crate::ui::bridge::BrowserBridge;
use crate::ui::server::AppState;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(session_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, session_id, state))
}

async fn handle_socket(socket: WebSocket, session_id: String, state: Arc<AppState>) {
    state.active_sessions.fetch_add(1, Ordering::Relaxed);
    tracing::info!(session = %session_id, "view connected");

    let (mut sink, mut stream) = socket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ServerMessage>();

    let bridge = Arc::new(BrowserBridge::new(out_tx.clone()));
    let provider: Arc<dyn SourceProvider> = bridge.clone();
    let controller = SessionController::new(session_id.clone(), provider, &state.config.session);
    let mut chat = ChatLog::new();
    let mut changes = controller.subscribe_changes();

    // Kick off camera acquisition. It suspends on the browser permission
    // prompt, so it must run beside the message loop; the controller's
    // late-arrival check covers a view that disconnects first.
    {
        let controller = controller.clone();
        tokio::spawn(async move { controller.start().await });
    }

    send(&mut sink, &ServerMessage::State { session: controller.snapshot() }).await;

    loop {
        tokio::select! {
            outbound = out_rx.recv() => {
                let Some(msg) = outbound else { break };
                if !send(&mut sink, &msg).await {
                    break;
                }
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let msg = ServerMessage::State { session: controller.snapshot() };
                if !send(&mut sink, &msg).await {
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(msg) => dispatch(msg, &controller, &bridge, &mut chat, &out_tx),
                            Err(err) => {
                                tracing::warn!(session = %session_id, error = %err, "unparseable client message");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        tracing::debug!(session = %session_id, error = %err, "websocket error");
                        break;
                    }
                }
            }
        }
    }

    // Abandoned or closed view: tear the session down either way so no
    // device handle outlives it, and fail any acquisition still waiting on
    // the browser so its task can finish.
    controller.leave();
    bridge.close();
    state.active_sessions.fetch_sub(1, Ordering::Relaxed);
    tracing::info!(session = %session_id, "view disconnected");
}

fn dispatch(
    msg: ClientMessage,
    controller: &Arc<SessionController>,
    bridge: &Arc<BrowserBridge>,
    chat: &mut ChatLog,
    out_tx: &mpsc::UnboundedSender<ServerMessage>,
) {
    match msg {
        ClientMessage::ToggleVideo => {
            controller.toggle_video();
        }
        ClientMessage::ToggleAudio => {
            controller.toggle_audio();
        }
        ClientMessage::StartScreenShare => {
            // Acquisition suspends on the source picker; run it beside the
            // loop so the picker outcome can still be delivered.
            let controller = controller.clone();
            tokio::spawn(async move { controller.start_screen_share().await });
        }
        ClientMessage::StopScreenShare => controller.stop_screen_share(),
        ClientMessage::ScreenEnded { handle_id } => bridge.screen_ended(handle_id),
        ClientMessage::Leave => controller.leave(),
        ClientMessage::CopySessionId => {
            let id = controller.copy_session_id();
            let _ = out_tx.send(ServerMessage::SessionId { id });
        }
        ClientMessage::Chat { text } => {
            let text = text.trim();
            if !text.is_empty() {
                let message = chat.append(text).clone();
                let _ = out_tx.send(ServerMessage::Chat { message });
            }
        }
        ClientMessage::AcquireResult { request_id, outcome } => bridge.resolve(request_id, outcome),
    }
}

/// Serialize and send one message; returns false when the socket is gone.
async fn send(sink: &mut SplitSink<WebSocket, Message>, msg: &ServerMessage) -> bool {
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize server message");
            return true;
        }
    };
    sink.send(Message::Text(json)).await.is_ok()
}
