//! # NEMSGen - Configuration utility for NEMS/NUOPC coupled modeling systems
//!
//! This library generates the static text configuration files consumed at
//! job-launch time by a coupled-model runtime that orchestrates multiple
//! geophysical simulation components (atmosphere, ocean, waves, hydrology,
//! sea ice) on disjoint processor ranges within one parallel job.
//!
//! ## Overview
//!
//! NEMSGen never runs or supervises the models themselves. It composes a
//! description of the coupled system - which components participate, how
//! many processors each one gets, which field transfers and mediations
//! connect them, and in what order they execute within one coupling
//! interval - and renders that description deterministically into the
//! runtime's three fixed text formats.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `model`: Model family tags and per-component entries with typed attributes
//! - `registry`: Ordered slot-to-component registry
//! - `allocator`: Contiguous processor-range (petlist bounds) allocation
//! - `coupling`: Directed connection edges and mediation relationships
//! - `sequence`: Run-sequence derivation and explicit overrides
//! - `nuopc`: Deterministic rendering of the three descriptor formats
//! - `config`: Type-safe configuration structures and YAML parsing
//! - `config_loader`: Configuration file loading and validation
//! - `orchestrator`: High-level orchestration of configuration generation
//! - `error`: Typed error taxonomy for composition failures
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use nemsgen::{config_loader, orchestrator};
//! use nemsgen::orchestrator::WriteOptions;
//! use std::path::Path;
//!
//! // Load configuration from YAML file
//! let config = config_loader::load_config(Path::new("coupling.yaml"))?;
//!
//! // Generate the runtime descriptors
//! let options = WriteOptions::default();
//! orchestrator::generate_configuration(&config, Path::new("output"), &options)?;
//!
//! // The output directory now contains:
//! // - nems.configure: component list, petlist bounds, run sequence
//! // - model_configure: start time, processor count, forecast length
//! // - config.rc: forcing file locations
//! # Ok::<(), color_eyre::eyre::Report>(())
//! ```
//!
//! ## Configuration Format
//!
//! Configurations use YAML with an ordered component list:
//!
//! ```yaml
//! general:
//!   start_time: "2020-06-01T00:00:00"
//!   duration: "1d"
//!   interval: "1h"
//!
//! components:
//!   - family: ATM
//!     source_file: "~/wind_atm_fin_ch_time_vec.nc"
//!   - family: OCN
//!     processors: 11
//!     attributes:
//!       Verbosity: max
//!
//! connections:
//!   - source: ATM
//!     target: OCN
//! ```
//!
//! ## Error Handling
//!
//! The composition engine reports failures through the typed
//! [`error::CouplingError`] taxonomy; the application layer wraps them with
//! `color_eyre` context. Every error is raised at the offending call with
//! no partial mutation of registry or graph state.

pub mod allocator;
pub mod config;
pub mod config_loader;
pub mod coupling;
pub mod error;
pub mod model;
pub mod nuopc;
pub mod orchestrator;
pub mod registry;
pub mod sequence;
