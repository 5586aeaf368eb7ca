pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{Result, VrmError};
pub use types::{Category, Parameter, ParameterKey};
