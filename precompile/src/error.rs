// Token contract errors

use erc20_common::token::{Erc20Error, ErrorCategory};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrecompileError {
    /// Token operation rejected; nothing was written
    #[error(transparent)]
    Token(#[from] Erc20Error),

    /// Configuration failed validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Configuration could not be parsed
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl PrecompileError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Token error category, if this is a token error
    pub fn category(&self) -> Option<ErrorCategory> {
        match self {
            Self::Token(err) => Some(err.category()),
            _ => None,
        }
    }

    /// Underlying token error, if any
    pub fn as_token_error(&self) -> Option<&Erc20Error> {
        match self {
            Self::Token(err) => Some(err),
            _ => None,
        }
    }
}

pub type PrecompileResult<T> = Result<T, PrecompileError>;
