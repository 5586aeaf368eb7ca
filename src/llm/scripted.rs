//! Deterministic oracle that replays canned responses
//!
//! Test fixture: never wired into the binary, which only builds an
//! [`LlmClient`](crate::llm::client::LlmClient). It is public so the
//! integration tests under `tests/` can drive the pipeline, session and HTTP
//! router offline.
//!
//! Records every prompt it receives so callers can assert how many stages ran
//! and what each stage was fed.

use crate::llm::oracle::{Oracle, OracleError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;

/// Test fixture standing in for the language model
pub struct ScriptedOracle {
    responses: Mutex<VecDeque<Result<String, OracleError>>>,
    prompts: Mutex<Vec<String>>,
    available: bool,
    delay: Option<Duration>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedOracle {
    /// Replay `responses` in order, one per call
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = Result<S, OracleError>>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| r.map(Into::into)).collect()),
            prompts: Mutex::new(Vec::new()),
            available: true,
            delay: None,
            gate: None,
        }
    }

    /// Replay successful responses only
    pub fn replying<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(responses.into_iter().map(Ok::<S, OracleError>))
    }

    /// An oracle that reports itself unavailable (no credential)
    pub fn unavailable() -> Self {
        let mut oracle = Self::new(Vec::<Result<String, OracleError>>::new());
        oracle.available = false;
        oracle
    }

    /// Sleep before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Block each call until the gate is notified
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Number of calls made so far
    pub fn calls(&self) -> usize {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Every prompt received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Oracle for ScriptedOracle {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn complete(&self, prompt: &str) -> Result<String, OracleError> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(OracleError::Transport("script exhausted".into())))
    }
}
