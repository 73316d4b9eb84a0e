//! Inter-component coupling graph.
//!
//! This module records the directed transfer edges and mediation
//! relationships between registered components. Edge order is insertion
//! order and is the default basis for run-sequence derivation.

use crate::allocator::MediatorPlacement;
use crate::error::{CouplingError, Result};
use crate::model::ModelFamily;
use crate::registry::ComponentRegistry;

/// Named regridding strategy applied when transferring fields between
/// two components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemapMethod {
    #[default]
    Redistribute,
    Bilinear,
    Conservative,
    NearestStod,
}

impl RemapMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemapMethod::Redistribute => "redist",
            RemapMethod::Bilinear => "bilinear",
            RemapMethod::Conservative => "conserve",
            RemapMethod::NearestStod => "nearest_stod",
        }
    }

    /// Parse a remap method name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "redist" => Some(RemapMethod::Redistribute),
            "bilinear" => Some(RemapMethod::Bilinear),
            "conserve" => Some(RemapMethod::Conservative),
            "nearest_stod" => Some(RemapMethod::NearestStod),
            _ => None,
        }
    }
}

impl std::fmt::Display for RemapMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directed field transfer between two registered components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub source: ModelFamily,
    pub target: ModelFamily,
    pub method: RemapMethod,
}

/// Data exchange routed through the mediator
///
/// Either endpoint (not both) may be absent: a target-only mediation is a
/// preparation step feeding the mediator, a source-only mediation is a
/// post step draining it.
#[derive(Debug, Clone, PartialEq)]
pub struct Mediation {
    pub source: Option<ModelFamily>,
    pub target: Option<ModelFamily>,
    pub method: RemapMethod,
    pub phases: Vec<String>,
}

/// One coupling relation, in the order it was added
#[derive(Debug, Clone, PartialEq)]
pub enum CouplingItem {
    Connection(Connection),
    Mediation(Mediation),
}

/// Directed edges and mediation relationships between slots
#[derive(Debug, Clone, Default)]
pub struct ConnectionGraph {
    items: Vec<CouplingItem>,
    mediator_processors: Option<u32>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Couple two registered components with a direct transfer edge
    pub fn connect(
        &mut self,
        registry: &ComponentRegistry,
        source: ModelFamily,
        target: ModelFamily,
        method: Option<RemapMethod>,
    ) -> Result<()> {
        if source == target {
            return Err(CouplingError::SelfConnection(source.tag().to_string()));
        }
        for slot in [source, target] {
            if !registry.contains(slot) {
                return Err(CouplingError::UnknownSlot(slot.tag().to_string()));
            }
        }
        self.items.push(CouplingItem::Connection(Connection {
            source,
            target,
            method: method.unwrap_or_default(),
        }));
        Ok(())
    }

    /// Record a mediation between one or two components and the mediator
    ///
    /// `phases` is the ordered list of mediator phase functions invoked at
    /// this point of the run sequence. A dedicated `processors` count moves
    /// the mediator from implicit placement to its own processor range; the
    /// largest count given across mediations wins.
    pub fn mediate(
        &mut self,
        registry: &ComponentRegistry,
        source: Option<ModelFamily>,
        target: Option<ModelFamily>,
        phases: Vec<String>,
        processors: Option<u32>,
    ) -> Result<()> {
        if source.is_none() && target.is_none() {
            return Err(CouplingError::MissingMediationEndpoint);
        }
        if source.is_some() && source == target {
            return Err(CouplingError::SelfConnection(
                source.unwrap().tag().to_string(),
            ));
        }
        for slot in [source, target].into_iter().flatten() {
            if slot == ModelFamily::Mediator {
                return Err(CouplingError::InvalidSlot(
                    "MED cannot be a mediation endpoint".to_string(),
                ));
            }
            if !registry.contains(slot) {
                return Err(CouplingError::UnknownSlot(slot.tag().to_string()));
            }
        }
        if source.is_some() && target.is_some() && phases.is_empty() {
            return Err(CouplingError::EmptyPhaseList {
                from: source.unwrap().tag().to_string(),
                to: target.unwrap().tag().to_string(),
            });
        }
        if let Some(count) = processors {
            if count == 0 {
                return Err(CouplingError::InvalidProcessorCount {
                    slot: ModelFamily::Mediator.tag().to_string(),
                    count,
                });
            }
            // the largest requested mediation assignment wins
            if self.mediator_processors.map_or(true, |existing| existing < count) {
                self.mediator_processors = Some(count);
            }
        }
        self.items.push(CouplingItem::Mediation(Mediation {
            source,
            target,
            method: RemapMethod::default(),
            phases,
        }));
        Ok(())
    }

    /// All coupling relations in insertion order
    pub fn items(&self) -> &[CouplingItem] {
        &self.items
    }

    /// Direct transfer edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Connection> {
        self.items.iter().filter_map(|item| match item {
            CouplingItem::Connection(connection) => Some(connection),
            CouplingItem::Mediation(_) => None,
        })
    }

    /// Mediations in insertion order
    pub fn mediations(&self) -> impl Iterator<Item = &Mediation> {
        self.items.iter().filter_map(|item| match item {
            CouplingItem::Mediation(mediation) => Some(mediation),
            CouplingItem::Connection(_) => None,
        })
    }

    pub fn has_mediations(&self) -> bool {
        self.mediations().next().is_some()
    }

    /// Explicit mediator processor count, if any mediation requested one
    pub fn dedicated_mediator_processors(&self) -> Option<u32> {
        self.mediator_processors
    }

    /// Resolve the mediator placement policy against a registry
    ///
    /// The implicit anchor is the lowest-registry-order component appearing
    /// as a mediation endpoint.
    pub fn mediator_placement(&self, registry: &ComponentRegistry) -> Result<MediatorPlacement> {
        if !self.has_mediations() {
            return Ok(MediatorPlacement::Absent);
        }
        if let Some(processors) = self.mediator_processors {
            return Ok(MediatorPlacement::Dedicated(processors));
        }
        let anchor = registry
            .entries()
            .map(|(slot, _)| slot)
            .find(|slot| {
                self.mediations()
                    .any(|mediation| mediation.source == Some(*slot) || mediation.target == Some(*slot))
            })
            .ok_or_else(|| CouplingError::UnknownSlot(ModelFamily::Mediator.tag().to_string()))?;
        Ok(MediatorPlacement::Implicit { anchor })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelEntry;

    fn registry() -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        for (family, processors) in [
            (ModelFamily::Atmosphere, 1),
            (ModelFamily::Wave, 1),
            (ModelFamily::Ocean, 11),
        ] {
            registry
                .set(family, ModelEntry::new(family, processors).unwrap())
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_edges_in_insertion_order() {
        let registry = registry();
        let mut graph = ConnectionGraph::new();
        graph
            .connect(&registry, ModelFamily::Wave, ModelFamily::Ocean, None)
            .unwrap();
        graph
            .connect(
                &registry,
                ModelFamily::Atmosphere,
                ModelFamily::Ocean,
                Some(RemapMethod::Bilinear),
            )
            .unwrap();

        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].source, ModelFamily::Wave);
        assert_eq!(edges[0].method, RemapMethod::Redistribute);
        assert_eq!(edges[1].method, RemapMethod::Bilinear);
    }

    #[test]
    fn test_connect_rejects_unknown_and_self() {
        let registry = registry();
        let mut graph = ConnectionGraph::new();
        assert!(matches!(
            graph.connect(&registry, ModelFamily::Hydrology, ModelFamily::Ocean, None),
            Err(CouplingError::UnknownSlot(_))
        ));
        assert!(matches!(
            graph.connect(&registry, ModelFamily::Ocean, ModelFamily::Ocean, None),
            Err(CouplingError::SelfConnection(_))
        ));
        assert!(graph.items().is_empty());
    }

    #[test]
    fn test_mediate_requires_endpoint_and_phases() {
        let registry = registry();
        let mut graph = ConnectionGraph::new();
        assert!(matches!(
            graph.mediate(&registry, None, None, vec!["MedPhase_prep".into()], None),
            Err(CouplingError::MissingMediationEndpoint)
        ));
        assert!(matches!(
            graph.mediate(
                &registry,
                Some(ModelFamily::Atmosphere),
                Some(ModelFamily::Ocean),
                vec![],
                None
            ),
            Err(CouplingError::EmptyPhaseList { .. })
        ));
        // one-sided mediation with phases is accepted
        graph
            .mediate(
                &registry,
                None,
                Some(ModelFamily::Ocean),
                vec!["MedPhase_prep_ocn".into()],
                None,
            )
            .unwrap();
        assert!(graph.has_mediations());
    }

    #[test]
    fn test_empty_phase_list_error_names_endpoints() {
        let registry = registry();
        let mut graph = ConnectionGraph::new();
        let err = graph
            .mediate(
                &registry,
                Some(ModelFamily::Atmosphere),
                Some(ModelFamily::Ocean),
                vec![],
                None,
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "mediation ATM -> OCN requires at least one phase function"
        );
    }

    #[test]
    fn test_mediator_placement_policies() {
        let registry = registry();
        let mut graph = ConnectionGraph::new();
        assert_eq!(
            graph.mediator_placement(&registry).unwrap(),
            MediatorPlacement::Absent
        );

        graph
            .mediate(
                &registry,
                Some(ModelFamily::Ocean),
                Some(ModelFamily::Wave),
                vec!["MedPhase_ocn_wav".into()],
                None,
            )
            .unwrap();
        // WAV precedes OCN in the registry, so it anchors the implicit mediator
        assert_eq!(
            graph.mediator_placement(&registry).unwrap(),
            MediatorPlacement::Implicit {
                anchor: ModelFamily::Wave
            }
        );

        graph
            .mediate(&registry, None, Some(ModelFamily::Ocean), vec!["MedPhase_prep".into()], Some(2))
            .unwrap();
        assert_eq!(
            graph.mediator_placement(&registry).unwrap(),
            MediatorPlacement::Dedicated(2)
        );
    }

    #[test]
    fn test_remap_method_names() {
        assert_eq!(RemapMethod::from_name("REDIST"), Some(RemapMethod::Redistribute));
        assert_eq!(RemapMethod::from_name("conserve"), Some(RemapMethod::Conservative));
        assert_eq!(RemapMethod::from_name("nonexistent"), None);
        assert_eq!(RemapMethod::Redistribute.to_string(), "redist");
    }
}
