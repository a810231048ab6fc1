//! JSON wire events exchanged with the client.
//!
//! Every frame is `{"type": <snake_case>, "payload": {...}}` with camelCase
//! payload fields. Optional outbound fields are omitted entirely when absent.

use crate::catalog::Problem;
use crate::step::InterviewStep;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionAction {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    SetStep,
    Next,
    Previous,
}

/// How the client wants the problem chosen at interview start.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProblemConfig {
    Category {
        category: String,
        #[serde(default)]
        difficulty: Option<String>,
    },
    Url { url: String },
}

/// Inbound events from the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    SessionControl {
        action: SessionAction,
        #[serde(default)]
        problem_config: Option<ProblemConfig>,
    },
    TextInput {
        text: String,
    },
    VoiceInput {
        transcript: String,
        is_final: bool,
    },
    CodeInput {
        code: String,
        language: String,
    },
    StepControl {
        action: StepAction,
        #[serde(default)]
        step: Option<InterviewStep>,
    },
}

/// Outbound events to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    SessionControl {
        #[serde(skip_serializing_if = "Option::is_none")]
        session_id: Option<Uuid>,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        problem: Option<Problem>,
        #[serde(skip_serializing_if = "Option::is_none")]
        current_step: Option<InterviewStep>,
    },
    AiResponse {
        text: String,
        should_speak: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        current_step: Option<InterviewStep>,
        #[serde(skip_serializing_if = "Option::is_none")]
        step_changed: Option<bool>,
    },
    StepControl {
        message: String,
        current_step: InterviewStep,
        #[serde(skip_serializing_if = "Option::is_none")]
        auto_detected: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        auto_advanced: Option<bool>,
        #[serde(skip_serializing_if = "Option::is_none")]
        validation_message: Option<String>,
    },
    Error {
        message: String,
    },
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error {
            message: message.into(),
        }
    }

    /// The hello frame sent once when a connection is established.
    pub fn connected(session_id: Uuid) -> Self {
        ServerEvent::SessionControl {
            session_id: Some(session_id),
            message: "Connected to interview server".to_string(),
            problem: None,
            current_step: None,
        }
    }
}
