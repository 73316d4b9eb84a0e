use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::coupling::RemapMethod;
use crate::error::CouplingError;
use crate::model::{AttributeValue, ModelFamily};

/// Top-level configuration describing one coupled modeling system
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    pub components: Vec<ComponentConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<ConnectionConfig>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mediations: Option<Vec<MediationConfig>>,
    /// Explicit run-sequence override, one step token per entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<Vec<String>>,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.general.interval.is_zero() {
            return Err(ValidationError::InvalidGeneral(
                "coupling interval cannot be zero".to_string(),
            ));
        }
        if self.general.interval.subsec_nanos() != 0 {
            return Err(ValidationError::InvalidGeneral(
                "coupling interval must be a whole number of seconds".to_string(),
            ));
        }
        if self.general.duration.is_zero() {
            return Err(ValidationError::InvalidGeneral(
                "run duration cannot be zero".to_string(),
            ));
        }
        if self.components.is_empty() {
            return Err(ValidationError::InvalidComponent(
                "at least one component must be defined".to_string(),
            ));
        }
        for component in &self.components {
            if ModelFamily::from_tag(&component.family).is_err() {
                return Err(ValidationError::InvalidComponent(format!(
                    "unknown model family \"{}\"",
                    component.family
                )));
            }
        }
        if let Some(connections) = &self.connections {
            for connection in connections {
                if let Some(method) = &connection.method {
                    if RemapMethod::from_name(method).is_none() {
                        return Err(ValidationError::InvalidCoupling(format!(
                            "unknown remap method \"{method}\""
                        )));
                    }
                }
            }
        }
        if let Some(mediations) = &self.mediations {
            for mediation in mediations {
                if mediation.source.is_none() && mediation.target.is_none() {
                    return Err(ValidationError::InvalidCoupling(
                        "mediation requires a source or a target".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Shared general configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GeneralConfig {
    /// Start time within the modeled system, e.g. `2020-06-01T00:00:00`
    pub start_time: NaiveDateTime,
    /// Total run duration, e.g. `1d`
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
    /// Coupling interval of the top-level run sequence, e.g. `1h`
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

/// One coupled component definition
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// Model family tag (ATM, WAV, OCN, HYD, ICE, MED)
    pub family: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processors: Option<u32>,
    /// Forcing file for file-based entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<PathBuf>,
    /// Named model attributes; scalar values only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_yaml::Mapping>,
}

/// Direct transfer edge between two components
#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// Mediated exchange definition
#[derive(Debug, Serialize, Deserialize)]
pub struct MediationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Ordered mediator phase function names
    pub phases: Vec<String>,
    /// Dedicated mediator processor count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processors: Option<u32>,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid component configuration: {0}")]
    InvalidComponent(String),
    #[error("Invalid coupling configuration: {0}")]
    InvalidCoupling(String),
}

/// Convert a YAML scalar into a typed attribute value
///
/// Only booleans, integers, floats, and strings are accepted; mappings,
/// sequences, and nulls are rejected.
pub fn attribute_value(
    name: &str,
    value: &serde_yaml::Value,
) -> Result<AttributeValue, CouplingError> {
    match value {
        serde_yaml::Value::Bool(value) => Ok(AttributeValue::Bool(*value)),
        serde_yaml::Value::Number(number) => {
            if let Some(value) = number.as_i64() {
                Ok(AttributeValue::Int(value))
            } else if let Some(value) = number.as_f64() {
                Ok(AttributeValue::Float(value))
            } else {
                Err(CouplingError::UnsupportedAttributeType {
                    name: name.to_string(),
                    value: format!("{number:?}"),
                })
            }
        }
        serde_yaml::Value::String(value) => Ok(AttributeValue::Str(value.clone())),
        other => Err(CouplingError::UnsupportedAttributeType {
            name: name.to_string(),
            value: format!("{other:?}"),
        }),
    }
}
