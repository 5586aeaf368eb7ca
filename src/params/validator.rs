//! Filter untrusted parameter candidates against the schema
//!
//! Candidates come straight out of oracle JSON. Anything that is not a
//! well-typed, known, in-range parameter is dropped (never clamped) and logged;
//! survivors keep their relative order.

use crate::core::types::{Category, Parameter};
use crate::params::schema::ParameterSchema;
use serde_json::{Map, Value};
use tracing::warn;

const CATEGORY_FIELDS: [&str; 2] = ["category", "parameterType"];
const NAME_FIELDS: [&str; 2] = ["name", "parameterName"];
const VALUE_FIELD: &str = "value";

/// Why a candidate was dropped
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    NotAnObject,
    MissingField(&'static str),
    WrongType(&'static str),
    UnknownCategory(String),
    UnknownParameter,
    OutOfRange { min: f64, max: f64 },
}

/// A dropped candidate and the reason it was dropped
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Position in the input sequence
    pub index: usize,
    pub candidate: Value,
    pub reason: RejectReason,
}

/// Outcome of validating a batch of candidates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validation {
    pub accepted: Vec<Parameter>,
    pub rejected: Vec<Rejection>,
}

pub struct ParameterValidator<'a> {
    schema: &'a ParameterSchema,
}

impl<'a> ParameterValidator<'a> {
    pub fn new(schema: &'a ParameterSchema) -> Self {
        Self { schema }
    }

    /// Surviving parameters, in input order
    pub fn validate(&self, candidates: &[Value]) -> Vec<Parameter> {
        self.validate_with_report(candidates).accepted
    }

    /// Like [`validate`](Self::validate) but also reports every rejection
    pub fn validate_with_report(&self, candidates: &[Value]) -> Validation {
        let mut validation = Validation::default();

        for (index, candidate) in candidates.iter().enumerate() {
            match self.check(candidate) {
                Ok(parameter) => validation.accepted.push(parameter),
                Err(reason) => {
                    warn!(index, ?reason, %candidate, "Dropping invalid parameter");
                    validation.rejected.push(Rejection {
                        index,
                        candidate: candidate.clone(),
                        reason,
                    });
                }
            }
        }

        validation
    }

    fn check(&self, candidate: &Value) -> Result<Parameter, RejectReason> {
        let object = candidate.as_object().ok_or(RejectReason::NotAnObject)?;

        let category = string_field(object, &CATEGORY_FIELDS)?;
        let name = string_field(object, &NAME_FIELDS)?;
        let value = object
            .get(VALUE_FIELD)
            .ok_or(RejectReason::MissingField(VALUE_FIELD))?
            .as_f64()
            .ok_or(RejectReason::WrongType(VALUE_FIELD))?;

        let category: Category = category
            .parse()
            .map_err(|_| RejectReason::UnknownCategory(category.to_string()))?;

        let range = self
            .schema
            .range(category, name)
            .ok_or(RejectReason::UnknownParameter)?;

        if !range.contains(value) {
            return Err(RejectReason::OutOfRange {
                min: range.min,
                max: range.max,
            });
        }

        Ok(Parameter::new(category, name, value))
    }
}

/// First present alias wins; it must be a string
fn string_field<'v>(
    object: &'v Map<String, Value>,
    aliases: &[&'static str],
) -> Result<&'v str, RejectReason> {
    let (field, value) = aliases
        .iter()
        .find_map(|field| object.get(*field).map(|v| (*field, v)))
        .ok_or(RejectReason::MissingField(aliases[0]))?;
    value.as_str().ok_or(RejectReason::WrongType(field))
}
