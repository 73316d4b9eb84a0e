//! Configuration orchestrator.
//!
//! This module coordinates the overall generation process: composing the
//! registry, coupling graph, processor allocation, and run sequence from a
//! parsed configuration, rendering the three descriptor texts, and writing
//! them into the output directory.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::allocator::{allocate_registry, ProcessorAllocation};
use crate::config::{attribute_value, Config};
use crate::coupling::{ConnectionGraph, RemapMethod};
use crate::model::{ModelEntry, ModelFamily};
use crate::nuopc::{
    ConfigurationRenderer, FORCING_DESCRIPTOR, MAIN_DESCRIPTOR, MODEL_DESCRIPTOR,
};
use crate::registry::ComponentRegistry;
use crate::sequence::{RunSequence, RunSequenceBuilder};

/// Fully composed in-memory state for one render
#[derive(Debug)]
pub struct ComposedSystem {
    pub registry: ComponentRegistry,
    pub graph: ConnectionGraph,
    pub allocation: ProcessorAllocation,
    pub sequence: RunSequence,
}

/// File-writing behavior for generated descriptors
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Replace existing files instead of skipping them
    pub overwrite: bool,
    /// Version string embedded in a generated-with header comment
    pub version: Option<String>,
}

/// Build registry, graph, allocation, and run sequence from a validated
/// configuration
pub fn compose(config: &Config) -> Result<ComposedSystem> {
    let mut registry = ComponentRegistry::new();
    for component in &config.components {
        let family = ModelFamily::from_tag(&component.family)?;
        let mut entry = match &component.source_file {
            Some(source_file) => ModelEntry::forcing(family, source_file)?,
            None => ModelEntry::new(family, component.processors.unwrap_or(1))?,
        };
        if let Some(name) = &component.name {
            entry = entry.with_name(name);
        }
        if let Some(attributes) = &component.attributes {
            for (key, value) in attributes {
                let name = key.as_str().ok_or_else(|| {
                    color_eyre::eyre::eyre!("attribute names must be strings: {key:?}")
                })?;
                entry = entry.with_attribute(name, attribute_value(name, value)?);
            }
        }
        registry.set(family, entry)?;
    }

    let mut graph = ConnectionGraph::new();
    for connection in config.connections.iter().flatten() {
        let source = ModelFamily::from_tag(&connection.source)?;
        let target = ModelFamily::from_tag(&connection.target)?;
        let method = connection
            .method
            .as_deref()
            .map(|name| {
                RemapMethod::from_name(name)
                    .ok_or_else(|| color_eyre::eyre::eyre!("unknown remap method \"{name}\""))
            })
            .transpose()?;
        graph.connect(&registry, source, target, method)?;
    }
    for mediation in config.mediations.iter().flatten() {
        let source = mediation
            .source
            .as_deref()
            .map(ModelFamily::from_tag)
            .transpose()?;
        let target = mediation
            .target
            .as_deref()
            .map(ModelFamily::from_tag)
            .transpose()?;
        graph.mediate(
            &registry,
            source,
            target,
            mediation.phases.clone(),
            mediation.processors,
        )?;
    }

    let placement = graph.mediator_placement(&registry)?;
    let allocation = allocate_registry(&registry, placement)?;

    let mut builder = RunSequenceBuilder::new(&registry, &graph);
    if let Some(tokens) = &config.sequence {
        builder = builder.with_explicit_sequence(tokens.clone());
    }
    let sequence = builder.build(config.general.interval)?;

    info!(
        "Composed {} components over {} processors",
        registry.len(),
        allocation.total_processors()
    );

    Ok(ComposedSystem {
        registry,
        graph,
        allocation,
        sequence,
    })
}

/// Render all three descriptors for a configuration
pub fn render(config: &Config, system: &ComposedSystem) -> Vec<(&'static str, String)> {
    let renderer = ConfigurationRenderer::new(
        &system.registry,
        &system.allocation,
        &system.graph,
        &system.sequence,
    )
    .verbose(config.general.verbose.unwrap_or(false));

    vec![
        (MAIN_DESCRIPTOR, renderer.render_main()),
        (
            MODEL_DESCRIPTOR,
            renderer.render_model(config.general.start_time, config.general.duration),
        ),
        (FORCING_DESCRIPTOR, renderer.render_forcing()),
    ]
}

/// Generate and persist the descriptor files for a configuration
///
/// Existing files are skipped with a warning unless overwriting is enabled.
/// Returns the paths of all files considered, written or not.
pub fn generate_configuration(
    config: &Config,
    output_dir: &Path,
    options: &WriteOptions,
) -> Result<Vec<PathBuf>> {
    config.validate()?;
    let system = compose(config)?;
    let artifacts = render(config, &system);

    fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", output_dir.display()))?;

    let mut filenames = Vec::with_capacity(artifacts.len());
    for (name, content) in artifacts {
        let filename = output_dir.join(name);
        if filename.exists() && !options.overwrite {
            warn!("skipping existing file {:?}", filename);
            filenames.push(filename);
            continue;
        }
        let output = match &options.version {
            Some(version) => format!("# `{name}` generated with nemsgen {version}\n{content}"),
            None => content,
        };
        fs::write(&filename, output)
            .wrap_err_with(|| format!("Failed to write '{}'", filename.display()))?;
        info!("Wrote {:?}", filename);
        filenames.push(filename);
    }

    Ok(filenames)
}
