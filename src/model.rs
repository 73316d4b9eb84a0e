//! Coupled-model component descriptions.
//!
//! This module defines the closed set of model families recognized by the
//! coupled runtime and the immutable per-component entry (family, processor
//! count, typed attributes, optional forcing file) held by the registry.

use std::path::PathBuf;

use crate::error::{CouplingError, Result};

/// Abbreviated model family tags within a NEMS / NUOPC configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    /// Atmospheric model (ATM)
    Atmosphere,
    /// Wave model (WAV)
    Wave,
    /// Ocean circulation model (OCN)
    Ocean,
    /// Hydrological model (HYD)
    Hydrology,
    /// Sea ice model (ICE)
    Ice,
    /// Mediator component (MED)
    Mediator,
}

impl ModelFamily {
    /// Slot tag as it appears in the main descriptor
    pub fn tag(&self) -> &'static str {
        match self {
            ModelFamily::Atmosphere => "ATM",
            ModelFamily::Wave => "WAV",
            ModelFamily::Ocean => "OCN",
            ModelFamily::Hydrology => "HYD",
            ModelFamily::Ice => "ICE",
            ModelFamily::Mediator => "MED",
        }
    }

    /// Lowercase key prefix used in the forcing descriptor (`atm_dir`, `atm_nam`)
    pub fn forcing_prefix(&self) -> &'static str {
        match self {
            ModelFamily::Atmosphere => "atm",
            ModelFamily::Wave => "wav",
            ModelFamily::Ocean => "ocn",
            ModelFamily::Hydrology => "hyd",
            ModelFamily::Ice => "ice",
            ModelFamily::Mediator => "med",
        }
    }

    /// Default component name for the family, matching the reference
    /// implementations shipped with the coupled runtime
    pub fn default_name(&self) -> &'static str {
        match self {
            ModelFamily::Atmosphere => "atmesh",
            ModelFamily::Wave => "ww3data",
            ModelFamily::Ocean => "adcirc",
            ModelFamily::Hydrology => "nwm",
            ModelFamily::Ice => "icemesh",
            ModelFamily::Mediator => "implicit",
        }
    }

    /// Parse a slot tag, case-insensitively
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag.to_uppercase().as_str() {
            "ATM" => Ok(ModelFamily::Atmosphere),
            "WAV" => Ok(ModelFamily::Wave),
            "OCN" => Ok(ModelFamily::Ocean),
            "HYD" => Ok(ModelFamily::Hydrology),
            "ICE" => Ok(ModelFamily::Ice),
            "MED" => Ok(ModelFamily::Mediator),
            _ => Err(CouplingError::InvalidSlot(tag.to_string())),
        }
    }

    /// All recognized families, in canonical tag order
    pub fn all() -> &'static [ModelFamily] {
        &[
            ModelFamily::Atmosphere,
            ModelFamily::Wave,
            ModelFamily::Ocean,
            ModelFamily::Hydrology,
            ModelFamily::Ice,
            ModelFamily::Mediator,
        ]
    }
}

impl std::fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Typed attribute value accepted by the renderer
///
/// The closed value set keeps descriptor formatting total: every variant has
/// an exact textual form in each target format.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_string())
    }
}

/// Description of one coupled component
///
/// Entries are constructed once and owned exclusively by the registry slot
/// that holds them. Attribute order is insertion order and is preserved in
/// the rendered attribute block.
#[derive(Debug, Clone)]
pub struct ModelEntry {
    family: ModelFamily,
    name: String,
    processors: u32,
    attributes: Vec<(String, AttributeValue)>,
    source_file: Option<PathBuf>,
}

impl ModelEntry {
    /// Create an entry for the given family
    ///
    /// New entries start with the family default name, a `Verbosity = min`
    /// attribute, and no forcing file.
    pub fn new(family: ModelFamily, processors: u32) -> Result<Self> {
        if processors == 0 {
            return Err(CouplingError::InvalidProcessorCount {
                slot: family.tag().to_string(),
                count: processors,
            });
        }
        Ok(Self {
            family,
            name: family.default_name().to_string(),
            processors,
            attributes: vec![("Verbosity".to_string(), AttributeValue::from("min"))],
            source_file: None,
        })
    }

    /// Create a single-processor file-based forcing entry
    pub fn forcing(family: ModelFamily, source_file: impl Into<PathBuf>) -> Result<Self> {
        let mut entry = Self::new(family, 1)?;
        entry.source_file = Some(source_file.into());
        Ok(entry)
    }

    /// Override the component name reported in the main descriptor
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set a named attribute, replacing an existing value in place
    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        let name = name.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    pub fn family(&self) -> ModelFamily {
        self.family
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn processors(&self) -> u32 {
        self.processors
    }

    /// Attributes in insertion order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn source_file(&self) -> Option<&PathBuf> {
        self.source_file.as_ref()
    }
}
