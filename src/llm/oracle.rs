//! The external text-completion oracle
//!
//! Output is untrusted free text; callers run it through
//! [`extract`](crate::llm::extract::extract) and the parameter validator.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Empty response")]
    EmptyResponse,
}

#[async_trait]
pub trait Oracle: Send + Sync {
    /// Whether a call can be attempted at all (e.g. a credential is present)
    fn is_available(&self) -> bool {
        true
    }

    /// Send one prompt, receive free text
    async fn complete(&self, prompt: &str) -> Result<String, OracleError>;
}
