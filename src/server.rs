//! HTTP router and WebSocket connection loop.

use crate::config::Config;
use crate::handlers;
use crate::handlers::signaling::SignalKind;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Bind and serve until the process is stopped.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Roomcast signaling server started");
    tracing::info!("Address: {}", addr);
    tracing::info!("WebSocket: ws://{}/ws", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/create-room", post(create_room_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index_handler() -> Html<&'static str> {
    Html("<h1>Roomcast Signaling Server</h1><p>WebSocket endpoint: /ws</p>")
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn create_room_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let room_code = state.create_room();
    Json(serde_json::json!({ "roomCode": room_code }))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let session_id = handlers::handle_connection(&state, tx).await;

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(json) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
        }
    });

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                // Malformed or unknown frames are ignored.
                if let Ok(msg) = serde_json::from_str::<ClientMessage>(&text) {
                    handle_client_message(&state, &session_id, msg).await;
                }
            }
            Ok(Message::Close(_)) => break,
            Err(_) => break,
            _ => {}
        }
    }

    handlers::handle_disconnect(&state, &session_id).await;
    send_task.abort();
}

async fn handle_client_message(state: &AppState, session_id: &str, msg: ClientMessage) {
    match msg {
        ClientMessage::Join { room_code, name } => {
            handlers::handle_join(state, session_id, &room_code, &name).await;
        }
        ClientMessage::Leave => {
            handlers::handle_leave(state, session_id).await;
        }
        ClientMessage::SendMessage { text } => {
            handlers::handle_send_message(state, session_id, &text).await;
        }
        ClientMessage::VoiceJoin => {
            handlers::handle_voice_toggle(state, session_id, true).await;
        }
        ClientMessage::VoiceLeave => {
            handlers::handle_voice_toggle(state, session_id, false).await;
        }
        ClientMessage::VoiceActivity { speaking } => {
            handlers::handle_voice_activity(state, session_id, speaking).await;
        }
        ClientMessage::SignalOffer {
            target_session_id,
            payload,
        } => {
            handlers::handle_signal(state, session_id, &target_session_id, SignalKind::Offer, payload)
                .await;
        }
        ClientMessage::SignalAnswer {
            target_session_id,
            payload,
        } => {
            handlers::handle_signal(state, session_id, &target_session_id, SignalKind::Answer, payload)
                .await;
        }
        ClientMessage::SignalCandidate {
            target_session_id,
            payload,
        } => {
            handlers::handle_signal(
                state,
                session_id,
                &target_session_id,
                SignalKind::Candidate,
                payload,
            )
            .await;
        }
    }
}
