//! One oracle round-trip plus its parsing step

use crate::llm::extract::{extract, ExtractionError};
use crate::llm::oracle::{Oracle, OracleError};
use crate::params::schema::ParameterSchema;
use crate::pipeline::prompts;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Which stage sequence a command goes through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    /// IntentAnalysis -> InstructionGeneration -> QueryConversion
    #[default]
    MultiStage,
    /// DirectConversion only
    SingleShot,
}

impl PipelineMode {
    pub fn first_stage(self) -> PipelineStage {
        match self {
            PipelineMode::MultiStage => PipelineStage::IntentAnalysis,
            PipelineMode::SingleShot => PipelineStage::DirectConversion,
        }
    }

    /// Stage following `stage`, or `None` when `stage` is the last one
    pub fn next(self, stage: PipelineStage) -> Option<PipelineStage> {
        match (self, stage) {
            (PipelineMode::MultiStage, PipelineStage::IntentAnalysis) => {
                Some(PipelineStage::InstructionGeneration)
            }
            (PipelineMode::MultiStage, PipelineStage::InstructionGeneration) => {
                Some(PipelineStage::QueryConversion)
            }
            _ => None,
        }
    }

    /// Every stage in execution order
    pub fn stages(self) -> Vec<PipelineStage> {
        std::iter::successors(Some(self.first_stage()), |stage| self.next(*stage)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    IntentAnalysis,
    InstructionGeneration,
    QueryConversion,
    DirectConversion,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::IntentAnalysis => "intent analysis",
            PipelineStage::InstructionGeneration => "instruction generation",
            PipelineStage::QueryConversion => "query conversion",
            PipelineStage::DirectConversion => "direct conversion",
        };
        f.write_str(name)
    }
}

/// Coarse classification of a failed command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    OracleUnavailable,
    Transport,
    Timeout,
    ExtractionFailed,
    MalformedJson,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageError {
    #[error("Oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("Oracle call failed: {0}")]
    Transport(String),

    #[error("Oracle did not answer within {0:?}")]
    Timeout(Duration),

    #[error("No JSON found in oracle output")]
    ExtractionFailed,

    #[error("Malformed JSON in oracle output: {0}")]
    MalformedJson(String),

    #[error("Unexpected output shape: {0}")]
    UnexpectedShape(String),
}

impl StageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StageError::OracleUnavailable(_) => ErrorKind::OracleUnavailable,
            StageError::Transport(_) => ErrorKind::Transport,
            StageError::Timeout(_) => ErrorKind::Timeout,
            StageError::ExtractionFailed => ErrorKind::ExtractionFailed,
            StageError::MalformedJson(_) | StageError::UnexpectedShape(_) => {
                ErrorKind::MalformedJson
            }
        }
    }
}

impl From<ExtractionError> for StageError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::NoJsonFound => StageError::ExtractionFailed,
            ExtractionError::MalformedJson(detail) => StageError::MalformedJson(detail),
        }
    }
}

impl From<OracleError> for StageError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::Unavailable(detail) => StageError::OracleUnavailable(detail),
            OracleError::EmptyResponse => StageError::ExtractionFailed,
            other => StageError::Transport(other.to_string()),
        }
    }
}

impl PipelineStage {
    fn template(self) -> &'static str {
        match self {
            PipelineStage::IntentAnalysis => prompts::INTENT_ANALYSIS_PROMPT,
            PipelineStage::InstructionGeneration => prompts::INSTRUCTION_GENERATION_PROMPT,
            PipelineStage::QueryConversion => prompts::QUERY_CONVERSION_PROMPT,
            PipelineStage::DirectConversion => prompts::DIRECT_CONVERSION_PROMPT,
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            PipelineStage::IntentAnalysis | PipelineStage::DirectConversion => {
                prompts::USER_INPUT_PLACEHOLDER
            }
            PipelineStage::InstructionGeneration => prompts::INTENT_PLACEHOLDER,
            PipelineStage::QueryConversion => prompts::INSTRUCTIONS_PLACEHOLDER,
        }
    }

    /// The prompt sent to the oracle for this stage
    pub fn render_prompt(self, schema: &ParameterSchema, input: &str) -> String {
        prompts::render(self.template(), &schema.describe(), self.placeholder(), input)
    }

    /// User-facing message when this stage fails
    pub fn failure_message(self) -> &'static str {
        match self {
            PipelineStage::IntentAnalysis => {
                "Could not understand the request. Please try a different phrasing."
            }
            PipelineStage::InstructionGeneration => {
                "Could not generate instructions. Please try a different phrasing."
            }
            PipelineStage::QueryConversion | PipelineStage::DirectConversion => {
                "Could not convert the request into parameters. Please try a different phrasing."
            }
        }
    }

    /// Run one oracle round-trip and decode its JSON
    pub async fn run(
        self,
        oracle: &dyn Oracle,
        schema: &ParameterSchema,
        input: &str,
        timeout: Duration,
    ) -> Result<Value, StageError> {
        let prompt = self.render_prompt(schema, input);

        let text = tokio::time::timeout(timeout, oracle.complete(&prompt))
            .await
            .map_err(|_| StageError::Timeout(timeout))??;

        debug!(stage = %self, response = %text, "Oracle responded");

        Ok(extract(&text)?)
    }
}
