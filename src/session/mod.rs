//! One editing session: parameter state, chat log and the command pipeline
//!
//! Only one natural language command runs at a time. A submission made while
//! another is in flight is rejected with [`VrmError::Busy`], so parameter
//! updates always land in submission order.

pub mod chat;

use crate::core::config::{AppConfig, ENV_API_KEY};
use crate::core::error::{Result, VrmError};
use crate::core::types::{Category, Parameter};
use crate::llm::client::LlmClient;
use crate::params::schema::ParameterSchema;
use crate::params::store::{ParameterSet, ParameterStore};
use crate::pipeline::command::{CommandPipeline, PipelineResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

pub use chat::{ChatLog, ChatMessage, Role};

pub const DISABLED_MESSAGE: &str =
    "Natural language commands are disabled because no API key is configured. Manual editing still works.";
pub const RESET_MESSAGE: &str = "All parameters have been reset.";

#[derive(Debug, Default)]
struct SessionState {
    store: ParameterStore,
    chat: ChatLog,
}

/// Clears the processing flag when a run ends, however it ends
struct ProcessingGuard<'a>(&'a AtomicBool);

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Session {
    schema: Arc<ParameterSchema>,
    pipeline: Option<CommandPipeline>,
    state: Mutex<SessionState>,
    processing: AtomicBool,
}

impl Session {
    /// `pipeline: None` means natural language is disabled
    pub fn new(schema: Arc<ParameterSchema>, pipeline: Option<CommandPipeline>) -> Self {
        Self {
            schema,
            pipeline,
            state: Mutex::new(SessionState::default()),
            processing: AtomicBool::new(false),
        }
    }

    /// Build the schema and, when a credential is present, the oracle client
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let schema = match &config.schema.path {
            Some(path) => {
                info!(path = %path.display(), "Loading parameter schema");
                ParameterSchema::load(path)?
            }
            None => ParameterSchema::vrm_default(),
        };
        let schema = Arc::new(schema);

        let pipeline = match LlmClient::from_config(&config.oracle) {
            Ok(client) => {
                info!(model = %client.model(), format = ?client.api_format(), "Natural language commands enabled");
                Some(CommandPipeline::with_config(
                    Arc::new(client),
                    schema.clone(),
                    &config.pipeline,
                ))
            }
            Err(e) => {
                warn!(error = %e, "{} not set - running without natural language commands", ENV_API_KEY);
                None
            }
        };

        Ok(Self::new(schema, pipeline))
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn schema(&self) -> &ParameterSchema {
        &self.schema
    }

    pub fn natural_language_enabled(&self) -> bool {
        self.pipeline
            .as_ref()
            .is_some_and(CommandPipeline::is_available)
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Run a natural language command and merge its parameters
    pub async fn submit(&self, command: &str) -> Result<PipelineResult> {
        let command = command.trim();
        if command.is_empty() {
            return Err(VrmError::EmptyCommand);
        }

        let Some(pipeline) = &self.pipeline else {
            let mut state = self.state();
            state.chat.push_user(command);
            state.chat.push_system(DISABLED_MESSAGE);
            return Err(VrmError::NaturalLanguageDisabled);
        };

        if self
            .processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(command, "Rejecting command while another is processing");
            return Err(VrmError::Busy);
        }
        let _guard = ProcessingGuard(&self.processing);

        self.state().chat.push_user(command);

        let result = pipeline.process(command).await;

        let mut state = self.state();
        if result.success {
            state.store.apply(&result.parameters);
        }
        state.chat.push_system(result.feedback.clone());

        Ok(result)
    }

    /// Like [`submit`](Self::submit), but the run lives on its own task
    ///
    /// Dropping the returned future does not cancel the command. A started
    /// run still finishes and records its outcome in the session.
    pub async fn submit_detached(self: &Arc<Self>, command: &str) -> Result<PipelineResult> {
        let session = Arc::clone(self);
        let command = command.to_string();
        tokio::spawn(async move { session.submit(&command).await })
            .await
            .map_err(|e| VrmError::Task(e.to_string()))?
    }

    /// Manual slider edit
    pub fn set_parameter(&self, category: Category, name: &str, value: f64) -> Result<Parameter> {
        let range = self
            .schema
            .range(category, name)
            .ok_or_else(|| VrmError::UnknownParameter {
                category,
                name: name.to_string(),
            })?;

        if !range.contains(value) {
            return Err(VrmError::OutOfRange {
                category,
                name: name.to_string(),
                value,
                min: range.min,
                max: range.max,
            });
        }

        let parameter = Parameter::new(category, name, value);
        self.state().store.apply(std::slice::from_ref(&parameter));
        Ok(parameter)
    }

    /// Drop every parameter
    pub fn reset(&self) {
        let mut state = self.state();
        state.store.clear();
        state.chat.push_system(RESET_MESSAGE);
        info!("Parameters reset");
    }

    /// Snapshot of the current parameters
    pub fn parameters(&self) -> ParameterSet {
        self.state().store.current().clone()
    }

    /// Snapshot of the chat log
    pub fn chat(&self) -> Vec<ChatMessage> {
        self.state().chat.messages().to_vec()
    }
}
