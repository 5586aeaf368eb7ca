//! Parameter registry, validation and state
//!
//! ParameterSchema -> ParameterValidator -> ParameterStore

pub mod schema;
pub mod store;
pub mod validator;

pub use schema::{ParamRange, ParameterSchema};
pub use store::{ParameterSet, ParameterStore};
pub use validator::{ParameterValidator, RejectReason, Rejection, Validation};
