//! # NUOPC Descriptor Rendering Module
//!
//! This module serializes a composed coupled-model configuration (registry,
//! processor allocation, coupling graph, run sequence) into the three fixed
//! text formats consumed by the NEMS/NUOPC runtime at job-launch time.
//!
//! ## Output Artifacts
//!
//! - **Main descriptor** (`nems.configure`): the `EARTH_component_list`,
//!   one `<SLOT>_model` / `<SLOT>_petlist_bounds` / `<SLOT>_attributes::`
//!   block per component, and the `runSeq::` block wrapped by the coupling
//!   interval in seconds.
//! - **Model descriptor** (`model_configure`): flat key/value lines with the
//!   run start date, total processor count, and forecast length in hours.
//!   Booleans use the Fortran-logical convention.
//! - **Forcing descriptor** (`config.rc`): a directory/file-name line pair
//!   per file-based forcing entry, keyed by family prefix (`atm_dir`,
//!   `atm_nam`, ...).
//!
//! ## Determinism
//!
//! Rendering is a pure function of its inputs: repeated calls with the same
//! registry, allocation, graph, and sequence produce byte-identical text.
//! Writing the artifacts to disk is the caller's responsibility.

pub mod format;

use chrono::{Datelike, NaiveDateTime, Timelike};
use std::time::Duration;

use crate::allocator::ProcessorAllocation;
use crate::coupling::ConnectionGraph;
use crate::model::{ModelEntry, ModelFamily};
use crate::registry::ComponentRegistry;
use crate::sequence::{RunSequence, RunSequenceStep};

pub use format::{format_bool, format_float, format_value, BoolStyle};

/// File name of the main descriptor
pub const MAIN_DESCRIPTOR: &str = "nems.configure";
/// File name of the model descriptor
pub const MODEL_DESCRIPTOR: &str = "model_configure";
/// File name of the forcing descriptor
pub const FORCING_DESCRIPTOR: &str = "config.rc";

// value columns of the fixed-width key/value formats
const MAIN_KEY_WIDTH: usize = 32;
const MODEL_KEY_WIDTH: usize = 25;

/// Deterministic serializer for the three descriptor formats
pub struct ConfigurationRenderer<'a> {
    registry: &'a ComponentRegistry,
    allocation: &'a ProcessorAllocation,
    graph: &'a ConnectionGraph,
    sequence: &'a RunSequence,
    verbose: bool,
}

impl<'a> ConfigurationRenderer<'a> {
    /// Pair a registry with the allocation, graph, and sequence composed
    /// from it
    ///
    /// The allocation must cover every slot registered in `registry`, as
    /// `allocate_registry` guarantees; `render_main` panics on a slot with
    /// no bounds.
    pub fn new(
        registry: &'a ComponentRegistry,
        allocation: &'a ProcessorAllocation,
        graph: &'a ConnectionGraph,
        sequence: &'a RunSequence,
    ) -> Self {
        Self {
            registry,
            allocation,
            graph,
            sequence,
            verbose: false,
        }
    }

    /// Report maximum verbosity in the EARTH attribute block
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Render the main descriptor (`nems.configure`)
    pub fn render_main(&self) -> String {
        let mut sections = vec![self.earth_section()];
        for (_, entry) in self.registry.entries() {
            sections.push(self.model_section(entry));
        }
        if let Some(section) = self.synthesized_mediator_section() {
            sections.push(section);
        }
        sections.push(self.sequence_section());
        // sections each end with a newline; joining leaves one blank line
        // between them
        sections.join("\n")
    }

    /// Render the model descriptor (`model_configure`)
    pub fn render_model(&self, start_time: NaiveDateTime, duration: Duration) -> String {
        let forecast_hours = (duration.as_secs_f64() / 3600.0).round() as u64;
        let lines = [
            ("total_member:", "1".to_string()),
            ("print_esmf:", format_bool(true, BoolStyle::FortranLogical).to_string()),
            ("namelist:", "atm_namelist".to_string()),
            ("PE_MEMBER01:", self.allocation.total_processors().to_string()),
            ("start_year:", start_time.year().to_string()),
            ("start_month:", start_time.month().to_string()),
            ("start_day:", start_time.day().to_string()),
            ("start_hour:", start_time.hour().to_string()),
            ("start_minute:", start_time.minute().to_string()),
            ("start_second:", start_time.second().to_string()),
            ("nhours_fcst:", forecast_hours.to_string()),
            ("RUN_CONTINUE:", format_bool(false, BoolStyle::FortranLogical).to_string()),
            ("ENS_SPS:", format_bool(false, BoolStyle::FortranLogical).to_string()),
        ];
        let mut output = String::new();
        for (key, value) in lines {
            output.push_str(&format!("{key:<MODEL_KEY_WIDTH$}{value}\n"));
        }
        output
    }

    /// Render the forcing descriptor (`config.rc`)
    pub fn render_forcing(&self) -> String {
        let mut output = String::new();
        for (slot, entry) in self.registry.entries() {
            let Some(source_file) = entry.source_file() else {
                continue;
            };
            let directory = source_file
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(|parent| parent.to_string_lossy().into_owned())
                .unwrap_or_else(|| ".".to_string());
            let file_name = source_file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            output.push_str(&format!("{}_dir: {}\n", slot.forcing_prefix(), directory));
            output.push_str(&format!("{}_nam: {}\n", slot.forcing_prefix(), file_name));
        }
        output
    }

    fn earth_section(&self) -> String {
        let mut components: Vec<&str> = self
            .registry
            .entries()
            .map(|(slot, _)| slot.tag())
            .collect();
        if self.has_synthesized_mediator() {
            components.push(ModelFamily::Mediator.tag());
        }
        let verbosity = if self.verbose { "max" } else { "min" };
        format!(
            "# EARTH #\nEARTH_component_list: {}\nEARTH_attributes::\n  Verbosity = {}\n::\n",
            components.join(" "),
            verbosity,
        )
    }

    fn model_section(&self, entry: &ModelEntry) -> String {
        let tag = entry.family().tag();
        let bounds = self
            .allocation
            .bounds(entry.family())
            .expect("every registered slot is allocated");
        let mut section = format!("# {tag} #\n");
        section.push_str(&format!(
            "{:<MAIN_KEY_WIDTH$}{}\n",
            format!("{tag}_model:"),
            entry.name()
        ));
        section.push_str(&format!(
            "{:<MAIN_KEY_WIDTH$}{} {}\n",
            format!("{tag}_petlist_bounds:"),
            bounds.first,
            bounds.last
        ));
        section.push_str(&format!("{tag}_attributes::\n"));
        for (name, value) in entry.attributes() {
            section.push_str(&format!(
                "  {name} = {}\n",
                format_value(value, BoolStyle::Lowercase)
            ));
        }
        section.push_str("::\n");
        section
    }

    fn has_synthesized_mediator(&self) -> bool {
        self.graph.has_mediations() && !self.registry.contains(ModelFamily::Mediator)
    }

    /// Section for a mediator created by the coupling graph rather than
    /// registered explicitly
    fn synthesized_mediator_section(&self) -> Option<String> {
        if !self.has_synthesized_mediator() {
            return None;
        }
        let bounds = self.allocation.bounds(ModelFamily::Mediator)?;
        let name = if self.graph.dedicated_mediator_processors().is_some() {
            "mediator"
        } else {
            "implicit"
        };
        let tag = ModelFamily::Mediator.tag();
        let mut section = format!("# {tag} #\n");
        section.push_str(&format!("{:<MAIN_KEY_WIDTH$}{name}\n", format!("{tag}_model:")));
        section.push_str(&format!(
            "{:<MAIN_KEY_WIDTH$}{} {}\n",
            format!("{tag}_petlist_bounds:"),
            bounds.first,
            bounds.last
        ));
        section.push_str(&format!("{tag}_attributes::\n  Verbosity = min\n::\n"));
        Some(section)
    }

    fn sequence_section(&self) -> String {
        let mut section = String::from("# Run Sequence #\nrunSeq::\n");
        section.push_str(&format!("  @{}\n", self.sequence.interval_seconds()));
        for step in self.sequence.steps() {
            section.push_str(&format!("    {}\n", step_line(step)));
        }
        section.push_str("  @\n::\n");
        section
    }
}

fn step_line(step: &RunSequenceStep) -> String {
    match step {
        RunSequenceStep::Run(slot) => slot.tag().to_string(),
        RunSequenceStep::Transfer {
            source,
            target,
            method,
        } => format!("{source} -> {target}   :remapMethod={method}"),
        RunSequenceStep::MediatorPhase(name) => name.clone(),
    }
}
