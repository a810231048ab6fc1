mod config;

use crate::config::Config;
use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
    routing::{get, post},
};
use interview_core::events::{ClientEvent, ServerEvent};
use interview_core::generator::{Generator, MistralClient};
use interview_core::prompts;
use interview_core::session::Session;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Shared state handed to every handler: the generative-text client and the
/// set of live session ids (for the health endpoint). Session state itself is
/// owned by its connection task, never shared.
#[derive(Clone)]
struct AppState {
    generator: Arc<MistralClient>,
    sessions: Arc<RwLock<HashSet<Uuid>>>,
}

/// Handles WebSocket upgrade requests.
async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    info!("WebSocket upgrade request received");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Manages one established WebSocket connection, end to end.
///
/// The session lives inside this task and is dropped when the connection
/// closes; nothing about it outlives the socket. Frames are read and handled
/// strictly one at a time, so handling for a single session is serialized
/// (including the generative call) while different connections interleave
/// freely at await points.
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let session_id = Uuid::new_v4();
    info!(%session_id, "WebSocket connection established");
    state.sessions.write().await.insert(session_id);
    let mut session = Session::new(session_id);

    if send_event(&mut socket, &ServerEvent::connected(session_id))
        .await
        .is_err()
    {
        state.sessions.write().await.remove(&session_id);
        return;
    }

    while let Some(msg) = socket.recv().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                info!(%session_id, "WebSocket error: {e}");
                break;
            }
        };
        match msg {
            Message::Text(text) => {
                let events = dispatch(&mut session, state.generator.as_ref(), text.as_str()).await;
                let mut send_failed = false;
                for event in &events {
                    if let Err(e) = send_event(&mut socket, event).await {
                        // Client went away mid-turn; whatever the collaborator
                        // produced is discarded along with the session.
                        info!(%session_id, "failed to send event: {e:#}");
                        send_failed = true;
                        break;
                    }
                }
                if send_failed {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    state.sessions.write().await.remove(&session_id);
    info!(%session_id, "WebSocket disconnected");
}

/// Parses one raw frame and routes it through the session.
///
/// Malformed JSON earns the client an `error` event; a structurally valid
/// frame with an unknown `type` is a programming-invariant violation on the
/// client side and is logged and ignored without any event.
async fn dispatch<G: Generator + Send + Sync>(
    session: &mut Session,
    generator: &G,
    raw: &str,
) -> Vec<ServerEvent> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(session = %session.id, "malformed frame: {e}");
            return vec![ServerEvent::error("Failed to process message")];
        }
    };

    match serde_json::from_value::<ClientEvent>(value) {
        Ok(event) => session.handle_event(generator, event).await,
        Err(e) => {
            warn!(session = %session.id, "unknown message type: {e}");
            Vec::new()
        }
    }
}

async fn send_event(socket: &mut WebSocket, event: &ServerEvent) -> Result<()> {
    let json = serde_json::to_string(event).context("Failed to serialize outbound event")?;
    socket
        .send(Message::Text(json.into()))
        .await
        .context("Failed to send WebSocket frame")?;
    Ok(())
}

/// Health check endpoint: process status plus the live-session count.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.sessions.read().await.len();
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "sessions": sessions,
    }))
}

#[derive(serde::Deserialize)]
struct TestGenerateRequest {
    #[serde(default = "default_test_message")]
    message: String,
}

fn default_test_message() -> String {
    "Hello, can you help me with coding interviews?".to_string()
}

/// Test endpoint for the generative backend, useful when wiring up a client.
async fn test_generate(
    State(state): State<AppState>,
    Json(request): Json<TestGenerateRequest>,
) -> Json<serde_json::Value> {
    match state
        .generator
        .generate(prompts::SYSTEM_PROMPT, &request.message, &[])
        .await
    {
        Ok(response) => Json(serde_json::json!({
            "success": true,
            "response": response,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
        Err(e) => {
            error!("test generation failed: {e:#}");
            Json(serde_json::json!({
                "success": false,
                "error": e.to_string(),
            }))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load application configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("Configuration loaded successfully. Starting interview service...");

    // --- 3. Application State ---
    let state = AppState {
        generator: Arc::new(MistralClient::new(
            config.mistral_api_key.clone(),
            config.chat_model.clone(),
        )),
        sessions: Arc::new(RwLock::new(HashSet::new())),
    };

    // Permissive CORS so a separate frontend can reach the WebSocket API.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .route("/test-generate", post(test_generate))
        .layer(cors)
        .with_state(state);

    info!("Starting WebSocket server, listening on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
