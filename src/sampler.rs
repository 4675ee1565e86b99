//! Splits a panorama graph into two walks that meet at a rendezvous point.
//!
//! The graph's node order traces a path. Alice starts at the beginning of
//! that path and Bob at the end, and both walk toward a rendezvous node
//! somewhere in between:
//!
//! ```text
//!   A ──> B ──> [C] <── D <── E
//!   Alice       rdv        Bob
//! ```
//!
//! Both walks are listed from the agent's start toward the rendezvous, so
//! Bob's is the reverse of graph order. Each walk is thinned to every
//! `stride`-th position, counted from the agent's start, and the shorter one
//! is padded by repeating its last position until both have the same number
//! of timesteps.

use crate::error::{Error, Result};
use crate::pano_graph::{PanoNode, PanoramaGraph};
use crate::trajectory::Trajectory;

/// The rendezvous node and both walks toward it, before and after sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct RendezvousSplit<'g> {
    /// Where the agents meet
    pub rendezvous: &'g PanoNode,
    /// Alice's positions, in walking order
    pub alice_walk: Vec<&'g PanoNode>,
    /// Bob's positions, in walking order (reverse graph order)
    pub bob_walk: Vec<&'g PanoNode>,
}

/// Every `stride`-th element, starting with the first.
fn every_nth<T: Copy>(items: &[T], stride: usize) -> Vec<T> {
    items.iter().step_by(stride).copied().collect()
}

/// Repeats the last element of `walk` until it is `len` long.
fn pad_to<T: Copy>(walk: &mut Vec<T>, len: usize) {
    if let Some(&last) = walk.last() {
        walk.resize(len.max(walk.len()), last);
    }
}

impl<'g> RendezvousSplit<'g> {
    /// Splits `graph` around `rendezvous_pano_id`, or around its middle node
    /// when no id is given, and samples both walks by `stride`.
    ///
    /// Fails with [Error::InvalidArgument] for a zero stride,
    /// [Error::NotFound] for an unknown rendezvous id, and
    /// [Error::InsufficientData] when either agent would have no position.
    pub fn new(
        graph: &'g PanoramaGraph,
        stride: usize,
        rendezvous_pano_id: Option<&str>,
    ) -> Result<Self> {
        if stride == 0 {
            return Err(Error::InvalidArgument(
                "stride must be a positive integer".to_owned(),
            ));
        }
        if graph.is_empty() {
            return Err(Error::InsufficientData("the graph has no nodes".to_owned()));
        }

        let nodes = graph.nodes();
        let (rdv_idx, bob_end) = match rendezvous_pano_id {
            Some(id) => {
                let idx = graph.position(id).ok_or_else(|| {
                    Error::NotFound(format!(
                        "rendezvous point {id} not found in place {}",
                        graph.place()
                    ))
                })?;
                (idx, nodes.len())
            }
            None => {
                // an even count loses its last node so there is a true middle
                let len = nodes.len() - (1 - nodes.len() % 2);
                (len / 2, len)
            }
        };

        let alice_candidates: Vec<&PanoNode> = nodes[..rdv_idx].iter().collect();
        let bob_candidates: Vec<&PanoNode> = nodes[rdv_idx + 1..bob_end].iter().rev().collect();

        let mut alice_walk = every_nth(&alice_candidates, stride);
        let mut bob_walk = every_nth(&bob_candidates, stride);

        if alice_walk.is_empty() || bob_walk.is_empty() {
            return Err(Error::InsufficientData(format!(
                "rendezvous at position {rdv_idx} of {} leaves Alice {} and Bob {} positions",
                nodes.len(),
                alice_walk.len(),
                bob_walk.len()
            )));
        }

        let len = alice_walk.len().max(bob_walk.len());
        pad_to(&mut alice_walk, len);
        pad_to(&mut bob_walk, len);

        Ok(Self {
            rendezvous: &nodes[rdv_idx],
            alice_walk,
            bob_walk,
        })
    }

    /// Number of timesteps before the rendezvous.
    pub fn len(&self) -> usize {
        self.alice_walk.len()
    }

    /// Always false for a constructed split.
    pub fn is_empty(&self) -> bool {
        self.alice_walk.is_empty()
    }

    /// Names every position by pano id. Positions without one cannot be
    /// referenced from a trajectory file.
    pub fn to_trajectory(&self, graph: &PanoramaGraph, traj_id: u32, stride: usize) -> Result<Trajectory> {
        let id_of = |node: &PanoNode| -> Result<String> {
            node.pano_id.clone().ok_or_else(|| {
                let idx = graph
                    .nodes()
                    .iter()
                    .position(|n| std::ptr::eq(n, node))
                    .unwrap_or_default();
                Error::NotFound(format!(
                    "node {idx} of place {} has no pano id",
                    graph.place()
                ))
            })
        };

        Ok(Trajectory {
            traj_id,
            place: graph.place(),
            stride,
            rendezvous_pano_id: id_of(self.rendezvous)?,
            alice_points: self.alice_walk.iter().map(|n| id_of(*n)).collect::<Result<_>>()?,
            bob_points: self.bob_walk.iter().map(|n| id_of(*n)).collect::<Result<_>>()?,
        })
    }
}

/// The sampled walks without naming them, for callers that need the
/// coordinates along the way.
pub fn split<'g>(
    graph: &'g PanoramaGraph,
    stride: usize,
    rendezvous_pano_id: Option<&str>,
) -> Result<RendezvousSplit<'g>> {
    RendezvousSplit::new(graph, stride, rendezvous_pano_id)
}

/// Samples a [Trajectory] from `graph`; see [RendezvousSplit::new].
pub fn sample(
    graph: &PanoramaGraph,
    traj_id: u32,
    stride: usize,
    rendezvous_pano_id: Option<&str>,
) -> Result<Trajectory> {
    RendezvousSplit::new(graph, stride, rendezvous_pano_id)?.to_trajectory(graph, traj_id, stride)
}
