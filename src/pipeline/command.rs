//! Natural language command -> validated parameters
//!
//! A strictly linear state machine:
//!
//! ```text
//! Start -> IntentAnalysis -> InstructionGeneration -> QueryConversion -> Done
//!   \             \                   \                     \
//!    +-------------+-------------------+---------------------+--> Failed
//! ```
//!
//! Each stage's JSON output is pretty-printed and becomes the next stage's
//! input. The first failure ends the run; nothing is retried and no partial
//! result is applied. Three sequential oracle round-trips per command, so
//! every stage has its own timeout and the whole run has a deadline.

use crate::core::config::PipelineConfig;
use crate::core::types::Parameter;
use crate::llm::oracle::Oracle;
use crate::params::schema::ParameterSchema;
use crate::params::validator::ParameterValidator;
use crate::pipeline::stage::{ErrorKind, PipelineMode, PipelineStage, StageError};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const UNAVAILABLE_MESSAGE: &str =
    "Natural language commands are unavailable because no API key is configured.";
const TIMEOUT_SUFFIX: &str = " (the language model did not respond in time)";

/// Outcome of one natural language command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    pub success: bool,
    pub parameters: Vec<Parameter>,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<PipelineStage>,
    /// Candidates dropped by validation
    pub rejected: usize,
}

impl PipelineResult {
    fn failure(feedback: String, error: &StageError, stage: Option<PipelineStage>) -> Self {
        Self {
            success: false,
            parameters: Vec::new(),
            feedback,
            error_kind: Some(error.kind()),
            failed_stage: stage,
            rejected: 0,
        }
    }
}

/// States of a single run
#[derive(Debug)]
enum PipelineState {
    Start,
    Running { stage: PipelineStage, input: String },
    Done { stage: PipelineStage, output: Value },
    Failed {
        stage: Option<PipelineStage>,
        error: StageError,
    },
}

pub struct CommandPipeline {
    oracle: Arc<dyn Oracle>,
    schema: Arc<ParameterSchema>,
    mode: PipelineMode,
    stage_timeout: Duration,
    deadline: Duration,
}

impl CommandPipeline {
    pub fn new(oracle: Arc<dyn Oracle>, schema: Arc<ParameterSchema>) -> Self {
        Self::with_config(oracle, schema, &PipelineConfig::default())
    }

    pub fn with_config(
        oracle: Arc<dyn Oracle>,
        schema: Arc<ParameterSchema>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            oracle,
            schema,
            mode: config.mode,
            stage_timeout: config.stage_timeout(),
            deadline: config.deadline(),
        }
    }

    pub fn mode(&self) -> PipelineMode {
        self.mode
    }

    pub fn schema(&self) -> &ParameterSchema {
        &self.schema
    }

    pub fn is_available(&self) -> bool {
        self.oracle.is_available()
    }

    /// Translate `user_input` into validated parameters
    pub async fn process(&self, user_input: &str) -> PipelineResult {
        info!(input = %user_input, mode = ?self.mode, "Processing natural language command");

        let started = Instant::now();
        let mut state = PipelineState::Start;

        loop {
            state = match state {
                PipelineState::Start => self.start(user_input),
                PipelineState::Running { stage, input } => {
                    self.run_stage(stage, &input, started).await
                }
                PipelineState::Done { stage, output } => return self.finish(stage, output),
                PipelineState::Failed { stage, error } => return self.fail(stage, error),
            };
        }
    }

    fn start(&self, user_input: &str) -> PipelineState {
        if !self.oracle.is_available() {
            return PipelineState::Failed {
                stage: None,
                error: StageError::OracleUnavailable("no credential configured".into()),
            };
        }
        PipelineState::Running {
            stage: self.mode.first_stage(),
            input: user_input.to_string(),
        }
    }

    async fn run_stage(&self, stage: PipelineStage, input: &str, started: Instant) -> PipelineState {
        let remaining = self.deadline.saturating_sub(started.elapsed());
        if remaining.is_zero() {
            return PipelineState::Failed {
                stage: Some(stage),
                error: StageError::Timeout(self.deadline),
            };
        }

        let timeout = self.stage_timeout.min(remaining);
        match stage
            .run(self.oracle.as_ref(), &self.schema, input, timeout)
            .await
        {
            Ok(output) => {
                debug!(%stage, %output, "Stage completed");
                match self.mode.next(stage) {
                    Some(next) => PipelineState::Running {
                        stage: next,
                        input: serde_json::to_string_pretty(&output)
                            .unwrap_or_else(|_| output.to_string()),
                    },
                    None => PipelineState::Done { stage, output },
                }
            }
            Err(error) => PipelineState::Failed {
                stage: Some(stage),
                error,
            },
        }
    }

    fn finish(&self, stage: PipelineStage, output: Value) -> PipelineResult {
        let (candidates, feedback) = match split_final_output(output) {
            Ok(split) => split,
            Err(error) => return self.fail(Some(stage), error),
        };

        let validation = ParameterValidator::new(&self.schema).validate_with_report(&candidates);
        let feedback = feedback.unwrap_or_else(|| default_feedback(validation.accepted.len()));

        info!(
            accepted = validation.accepted.len(),
            rejected = validation.rejected.len(),
            "Command translated"
        );

        PipelineResult {
            success: true,
            parameters: validation.accepted,
            feedback,
            error_kind: None,
            failed_stage: None,
            rejected: validation.rejected.len(),
        }
    }

    fn fail(&self, stage: Option<PipelineStage>, error: StageError) -> PipelineResult {
        warn!(stage = ?stage, %error, "Natural language command failed");

        let feedback = match (&error, stage) {
            (StageError::OracleUnavailable(_), _) | (_, None) => UNAVAILABLE_MESSAGE.to_string(),
            (StageError::Timeout(_), Some(stage)) => {
                format!("{}{}", stage.failure_message(), TIMEOUT_SUFFIX)
            }
            (_, Some(stage)) => stage.failure_message().to_string(),
        };

        PipelineResult::failure(feedback, &error, stage)
    }
}

/// Accept either a bare candidate array or `{"parameters": [...], "feedback": "..."}`
fn split_final_output(output: Value) -> Result<(Vec<Value>, Option<String>), StageError> {
    match output {
        Value::Array(items) => Ok((items, None)),
        Value::Object(mut object) => {
            let feedback = object
                .get("feedback")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            match object.remove("parameters") {
                Some(Value::Array(items)) => Ok((items, feedback)),
                _ => Err(StageError::UnexpectedShape(
                    "expected a \"parameters\" array".into(),
                )),
            }
        }
        other => Err(StageError::UnexpectedShape(format!(
            "expected an array or object, got {}",
            other
        ))),
    }
}

fn default_feedback(applied: usize) -> String {
    match applied {
        0 => "No applicable parameters were found in the response.".to_string(),
        1 => "Updated 1 parameter.".to_string(),
        n => format!("Updated {} parameters.", n),
    }
}
