//! Oracle access: HTTP client, scripted stand-in, and JSON extraction

pub mod client;
pub mod extract;
pub mod oracle;
pub mod scripted;

pub use client::{ApiFormat, LlmClient};
pub use extract::{extract, locate, ExtractionError};
pub use oracle::{Oracle, OracleError};
pub use scripted::ScriptedOracle;
