// Licensed under the Apache License, Version 2.0
// Copyright 2024 Anton Khrustalev, creapunk.com

use thiserror::Error;

/// Rejected command input. The command had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CommandError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
}

/// Failures reported by a session handle
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session has been stopped")]
    Stopped,

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("session task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
