//! Run-sequence derivation.
//!
//! This module produces the ordered list of per-coupling-interval steps
//! (component runs, field transfers, mediator phase calls) handed to the
//! runtime in the `runSeq::` block, either derived from the coupling graph
//! or parsed from an explicit caller-supplied override.

use std::time::Duration;

use crate::coupling::{ConnectionGraph, CouplingItem, RemapMethod};
use crate::error::{CouplingError, Result};
use crate::model::ModelFamily;
use crate::registry::ComponentRegistry;

/// One step inside a coupling interval
#[derive(Debug, Clone, PartialEq)]
pub enum RunSequenceStep {
    /// Execute a component
    Run(ModelFamily),
    /// Transfer fields between two components
    Transfer {
        source: ModelFamily,
        target: ModelFamily,
        method: RemapMethod,
    },
    /// Invoke a named mediator phase function
    MediatorPhase(String),
}

/// Ordered step list wrapped by one coupling interval
#[derive(Debug, Clone, PartialEq)]
pub struct RunSequence {
    interval_seconds: u64,
    steps: Vec<RunSequenceStep>,
}

impl RunSequence {
    pub fn interval_seconds(&self) -> u64 {
        self.interval_seconds
    }

    pub fn steps(&self) -> &[RunSequenceStep] {
        &self.steps
    }
}

/// Builder deriving the run sequence from registry and graph state
///
/// Without an override the default derivation policy applies: prep phases of
/// target-only mediations first, then transfers and mediation phases in
/// coupling insertion order, then one run step per registered non-mediator
/// component in registry order, then post phases of source-only mediations.
pub struct RunSequenceBuilder<'a> {
    registry: &'a ComponentRegistry,
    graph: &'a ConnectionGraph,
    explicit: Option<Vec<String>>,
}

impl<'a> RunSequenceBuilder<'a> {
    pub fn new(registry: &'a ComponentRegistry, graph: &'a ConnectionGraph) -> Self {
        Self {
            registry,
            graph,
            explicit: None,
        }
    }

    /// Supply a literal ordered list of step tokens (`"ATM -> OCN"`, `"ATM"`,
    /// or a bare mediator phase name) used verbatim instead of the derived
    /// order
    pub fn with_explicit_sequence(mut self, tokens: Vec<String>) -> Self {
        self.explicit = Some(tokens);
        self
    }

    pub fn build(self, interval: Duration) -> Result<RunSequence> {
        let steps = match &self.explicit {
            Some(tokens) => self.parse_tokens(tokens)?,
            None => self.derive(),
        };
        Ok(RunSequence {
            interval_seconds: interval.as_secs(),
            steps,
        })
    }

    fn derive(&self) -> Vec<RunSequenceStep> {
        let mut steps = Vec::new();

        // prep phases feed the mediator before any transfer runs
        for mediation in self.graph.mediations() {
            if mediation.source.is_none() {
                for phase in &mediation.phases {
                    steps.push(RunSequenceStep::MediatorPhase(phase.clone()));
                }
            }
        }

        for item in self.graph.items() {
            match item {
                CouplingItem::Connection(connection) => {
                    steps.push(RunSequenceStep::Transfer {
                        source: connection.source,
                        target: connection.target,
                        method: connection.method,
                    });
                }
                CouplingItem::Mediation(mediation) => {
                    if let Some(source) = mediation.source {
                        steps.push(RunSequenceStep::Transfer {
                            source,
                            target: ModelFamily::Mediator,
                            method: mediation.method,
                        });
                    }
                    if mediation.source.is_some() && mediation.target.is_some() {
                        for phase in &mediation.phases {
                            steps.push(RunSequenceStep::MediatorPhase(phase.clone()));
                        }
                    }
                    if let Some(target) = mediation.target {
                        steps.push(RunSequenceStep::Transfer {
                            source: ModelFamily::Mediator,
                            target,
                            method: mediation.method,
                        });
                    }
                }
            }
        }

        for (slot, _) in self.registry.entries() {
            if slot != ModelFamily::Mediator {
                steps.push(RunSequenceStep::Run(slot));
            }
        }

        for mediation in self.graph.mediations() {
            if mediation.target.is_none() {
                for phase in &mediation.phases {
                    steps.push(RunSequenceStep::MediatorPhase(phase.clone()));
                }
            }
        }

        steps
    }

    fn parse_tokens(&self, tokens: &[String]) -> Result<Vec<RunSequenceStep>> {
        tokens.iter().map(|token| self.parse_token(token)).collect()
    }

    fn parse_token(&self, token: &str) -> Result<RunSequenceStep> {
        let token = token.trim();
        if let Some((source, target)) = token.split_once("->") {
            return self.resolve_transfer(token, source.trim(), target.trim());
        }
        if let Ok(slot) = ModelFamily::from_tag(token) {
            if slot != ModelFamily::Mediator && self.registry.contains(slot) {
                return Ok(RunSequenceStep::Run(slot));
            }
            return Err(CouplingError::UnknownSequenceReference(token.to_string()));
        }
        let is_known_phase = self
            .graph
            .mediations()
            .any(|mediation| mediation.phases.iter().any(|phase| phase == token));
        if is_known_phase {
            return Ok(RunSequenceStep::MediatorPhase(token.to_string()));
        }
        Err(CouplingError::UnknownSequenceReference(token.to_string()))
    }

    /// Match a `SRC -> DST` token against the recorded couplings, keeping
    /// the remap method of the matched relation
    fn resolve_transfer(
        &self,
        token: &str,
        source: &str,
        target: &str,
    ) -> Result<RunSequenceStep> {
        let source = ModelFamily::from_tag(source)
            .map_err(|_| CouplingError::UnknownSequenceReference(token.to_string()))?;
        let target = ModelFamily::from_tag(target)
            .map_err(|_| CouplingError::UnknownSequenceReference(token.to_string()))?;

        for connection in self.graph.edges() {
            if connection.source == source && connection.target == target {
                return Ok(RunSequenceStep::Transfer {
                    source,
                    target,
                    method: connection.method,
                });
            }
        }
        for mediation in self.graph.mediations() {
            let feeds = target == ModelFamily::Mediator && mediation.source == Some(source);
            let drains = source == ModelFamily::Mediator && mediation.target == Some(target);
            if feeds || drains {
                return Ok(RunSequenceStep::Transfer {
                    source,
                    target,
                    method: mediation.method,
                });
            }
        }
        Err(CouplingError::UnknownSequenceReference(token.to_string()))
    }
}
