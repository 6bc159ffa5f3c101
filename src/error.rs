//! Error types for minichain

use std::fmt;

#[derive(Debug, Clone)]
pub enum ChainError {
    Serialization(String),
    NetworkError(String),
    MalformedPeerResponse(String),
    EmptyChain,
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChainError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            ChainError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            ChainError::MalformedPeerResponse(msg) => {
                write!(f, "Malformed peer response: {}", msg)
            }
            ChainError::EmptyChain => write!(f, "Chain is empty"),
        }
    }
}

impl std::error::Error for ChainError {}

impl From<reqwest::Error> for ChainError {
    fn from(err: reqwest::Error) -> Self {
        ChainError::NetworkError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
