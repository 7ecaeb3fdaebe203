//! Per-frame dependency graph over the compute stages.
//!
//! Each stage declares which resources it reads and writes (and how); edges
//! and barriers are derived from those declarations instead of being encoded
//! by hand:
//!
//! - a stage reading a resource depends on its latest writer,
//! - a stage writing a resource depends on its latest writer and on all the
//!   readers since then.
//!
//! Stages are then ordered topologically, with ties broken by insertion order.

use std::fmt;

use fxhash::FxHashMap;
use log::trace;

use crate::{Error, FrameConfig, HistoryFrame, PipelineMode, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    GBuffer,
    Lights,
    CandidateReservoirs,
    CandidateShading,
    Motion,
    Surfaces,
    PrevSurfaces,
    TemporalReservoirs,
    SpatialReservoirs,
    PrevReservoirs,
    Shading,
    History,
    HistoryNext,
}

impl Resource {
    pub const ALL: [Self; 13] = [
        Self::GBuffer,
        Self::Lights,
        Self::CandidateReservoirs,
        Self::CandidateShading,
        Self::Motion,
        Self::Surfaces,
        Self::PrevSurfaces,
        Self::TemporalReservoirs,
        Self::SpatialReservoirs,
        Self::PrevReservoirs,
        Self::Shading,
        Self::History,
        Self::HistoryNext,
    ];
}

/// State a resource has to be in for a stage to access it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Access {
    /// Sampled / loaded from within a shader
    #[default]
    ShaderRead,

    /// Written from within a shader, as a storage image
    General,

    TransferSrc,
    TransferDst,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Candidates,
    Motion,
    Temporal,
    Spatial,
    Shading,
    HistoryClear,
    History,
    ReservoirCopy,
    SurfaceCopy,
    HistoryCopy,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Candidates => "candidates",
            Stage::Motion => "motion",
            Stage::Temporal => "temporal",
            Stage::Spatial => "spatial",
            Stage::Shading => "shading",
            Stage::HistoryClear => "history_clear",
            Stage::History => "history",
            Stage::ReservoirCopy => "reservoir_copy",
            Stage::SurfaceCopy => "surface_copy",
            Stage::HistoryCopy => "history_copy",
        };

        f.write_str(name)
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub stage: Stage,
    pub reads: Vec<(Resource, Access)>,
    pub writes: Vec<(Resource, Access)>,

    /// Stages this one has to run after, on top of the ones implied by
    /// resources
    pub after: Vec<Stage>,
}

impl Node {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            reads: Default::default(),
            writes: Default::default(),
            after: Default::default(),
        }
    }

    pub fn reads(mut self, resources: &[Resource]) -> Self {
        self.reads
            .extend(resources.iter().map(|&res| (res, Access::ShaderRead)));

        self
    }

    pub fn writes(mut self, resources: &[Resource]) -> Self {
        self.writes
            .extend(resources.iter().map(|&res| (res, Access::General)));

        self
    }

    pub fn copies(mut self, src: Resource, dst: Resource) -> Self {
        self.reads.push((src, Access::TransferSrc));
        self.writes.push((dst, Access::TransferDst));
        self
    }

    pub fn after(mut self, stage: Stage) -> Self {
        self.after.push(stage);
        self
    }

    fn accesses(&self) -> impl Iterator<Item = (Resource, Access)> + '_ {
        self.reads.iter().chain(&self.writes).copied()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Barrier {
    pub resource: Resource,
    pub from: Access,
    pub to: Access,
}

#[derive(Clone, Debug)]
pub struct Step {
    /// Transitions that have to happen before the stage runs
    pub barriers: Vec<Barrier>,
    pub node: Node,
}

/// Frame's execution plan: stages in order, with the barriers between them.
#[derive(Clone, Debug)]
pub struct Schedule {
    pub steps: Vec<Step>,

    /// Transitions bringing every resource back to [`Access::ShaderRead`] at
    /// the end of the frame
    pub final_barriers: Vec<Barrier>,
}

impl Schedule {
    pub fn stages(&self) -> impl Iterator<Item = Stage> + '_ {
        self.steps.iter().map(|step| step.node.stage)
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameGraph {
    nodes: Vec<Node>,
}

impl FrameGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph of a single frame.
    pub fn for_frame(config: &FrameConfig, history: &HistoryFrame) -> Self {
        use self::Resource::*;

        let mut graph = Self::new();

        graph.add(
            Node::new(Stage::Candidates)
                .reads(&[GBuffer, Lights])
                .writes(&[CandidateReservoirs, CandidateShading]),
        );

        graph.add(
            Node::new(Stage::Motion)
                .reads(&[GBuffer])
                .writes(&[Motion, Surfaces]),
        );

        let reservoirs = match config.pipeline {
            PipelineMode::Full => {
                graph.add(
                    Node::new(Stage::Temporal)
                        .reads(&[
                            GBuffer,
                            Lights,
                            Motion,
                            PrevSurfaces,
                            CandidateReservoirs,
                            PrevReservoirs,
                        ])
                        .writes(&[TemporalReservoirs]),
                );

                graph.add(
                    Node::new(Stage::Spatial)
                        .reads(&[GBuffer, Lights, TemporalReservoirs])
                        .writes(&[SpatialReservoirs]),
                );

                SpatialReservoirs
            }

            PipelineMode::CandidatesOnly => CandidateReservoirs,
        };

        graph.add(
            Node::new(Stage::Shading)
                .reads(&[GBuffer, Lights, reservoirs])
                .writes(&[Shading]),
        );

        if history.clear {
            graph.add(Node::new(Stage::HistoryClear).writes(&[History]));
        }

        graph.add(
            Node::new(Stage::History)
                .reads(&[Shading, History])
                .writes(&[HistoryNext]),
        );

        graph.add(
            Node::new(Stage::ReservoirCopy).copies(reservoirs, PrevReservoirs),
        );

        graph.add(Node::new(Stage::SurfaceCopy).copies(Surfaces, PrevSurfaces));
        graph.add(Node::new(Stage::HistoryCopy).copies(HistoryNext, History));

        graph
    }

    pub fn add(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Checks that no stage reads and writes the same resource at once.
    pub fn validate(&self) -> Result<()> {
        for node in &self.nodes {
            for (write, _) in &node.writes {
                if node.reads.iter().any(|(read, _)| read == write) {
                    return Err(Error::GraphHazard(format!(
                        "stage `{}` both reads and writes {write:?}",
                        node.stage
                    )));
                }
            }

            let mut accesses: FxHashMap<Resource, Access> = Default::default();

            for (res, access) in node.accesses() {
                if let Some(prev) = accesses.insert(res, access) {
                    if prev != access {
                        return Err(Error::GraphHazard(format!(
                            "stage `{}` accesses {res:?} both as {prev:?} and \
                             {access:?}",
                            node.stage
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns, for each node, indices of the nodes it depends on.
    fn edges(&self) -> Result<Vec<Vec<usize>>> {
        let mut edges = vec![Vec::new(); self.nodes.len()];
        let mut writers: FxHashMap<Resource, usize> = Default::default();
        let mut readers: FxHashMap<Resource, Vec<usize>> = Default::default();

        for (idx, node) in self.nodes.iter().enumerate() {
            for (res, _) in &node.reads {
                if let Some(&writer) = writers.get(res) {
                    edges[idx].push(writer);
                }
            }

            for (res, _) in &node.writes {
                if let Some(&writer) = writers.get(res) {
                    edges[idx].push(writer);
                }

                if let Some(readers) = readers.remove(res) {
                    edges[idx].extend(readers);
                }
            }

            for (res, _) in &node.reads {
                readers.entry(*res).or_default().push(idx);
            }

            for (res, _) in &node.writes {
                writers.insert(*res, idx);
            }

            for stage in &node.after {
                let dep = self
                    .nodes
                    .iter()
                    .position(|node| node.stage == *stage)
                    .ok_or_else(|| {
                        Error::GraphHazard(format!(
                            "stage `{}` depends on missing stage `{stage}`",
                            node.stage
                        ))
                    })?;

                edges[idx].push(dep);
            }
        }

        for deps in &mut edges {
            deps.sort_unstable();
            deps.dedup();
        }

        Ok(edges)
    }

    /// Orders stages and derives barriers between them.
    pub fn schedule(&self) -> Result<Schedule> {
        self.validate()?;

        let order = self.order()?;
        let mut states: FxHashMap<Resource, Access> = Default::default();
        let mut steps = Vec::with_capacity(order.len());

        for idx in order {
            let node = &self.nodes[idx];
            let mut barriers = Vec::new();

            for (resource, to) in node.accesses() {
                let from = states.get(&resource).copied().unwrap_or_default();

                // Back-to-back writes need a barrier as well, so that they
                // don't overlap
                if from != to || to == Access::General {
                    barriers.push(Barrier { resource, from, to });
                }

                states.insert(resource, to);
            }

            trace!("Scheduled `{}`; barriers={barriers:?}", node.stage);

            steps.push(Step {
                barriers,
                node: node.clone(),
            });
        }

        let mut final_barriers: Vec<_> = states
            .into_iter()
            .filter(|(_, from)| *from != Access::ShaderRead)
            .map(|(resource, from)| Barrier {
                resource,
                from,
                to: Access::ShaderRead,
            })
            .collect();

        final_barriers.sort_by_key(|barrier| barrier.resource);

        Ok(Schedule {
            steps,
            final_barriers,
        })
    }

    /// Kahn's algorithm, preferring nodes that were added earlier.
    fn order(&self) -> Result<Vec<usize>> {
        let edges = self.edges()?;
        let mut in_degree: Vec<_> = edges.iter().map(|deps| deps.len()).collect();
        let mut done = vec![false; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());

        while order.len() < self.nodes.len() {
            let next = (0..self.nodes.len())
                .find(|&idx| !done[idx] && in_degree[idx] == 0)
                .ok_or_else(|| {
                    let stuck: Vec<_> = (0..self.nodes.len())
                        .filter(|&idx| !done[idx])
                        .map(|idx| self.nodes[idx].stage.to_string())
                        .collect();

                    Error::CyclicGraph(stuck.join(", "))
                })?;

            done[next] = true;
            order.push(next);

            for (idx, deps) in edges.iter().enumerate() {
                in_degree[idx] -= deps.iter().filter(|&&dep| dep == next).count();
            }
        }

        Ok(order)
    }
}
