use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub enum BotError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
    Network(reqwest::Error),
    Config(String),
    InvalidFormat(String),
    Signature,
    Api { status: u16, body: String },
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::Io(e) => write!(f, "I/O error: {}", e),
            BotError::Serialization(e) => write!(f, "Serialization error: {}", e),
            BotError::Network(e) => write!(f, "Network error: {}", e),
            BotError::Config(msg) => write!(f, "Configuration error: {}", msg),
            BotError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            BotError::Signature => write!(f, "Request signature mismatch"),
            BotError::Api { status, body } => {
                write!(f, "Messaging API returned {}: {}", status, body)
            }
        }
    }
}

impl std::error::Error for BotError {}

impl From<std::io::Error> for BotError {
    fn from(error: std::io::Error) -> Self {
        BotError::Io(error)
    }
}

impl From<serde_json::Error> for BotError {
    fn from(error: serde_json::Error) -> Self {
        BotError::Serialization(error)
    }
}

impl From<reqwest::Error> for BotError {
    fn from(error: reqwest::Error) -> Self {
        BotError::Network(error)
    }
}

impl IntoResponse for BotError {
    fn into_response(self) -> Response {
        tracing::error!("Webhook failed: {}", self);
        match self {
            BotError::Signature => StatusCode::BAD_REQUEST.into_response(),
            _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
