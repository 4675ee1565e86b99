//! The persisted trajectory record, `metainfo.json`.
//!
//! ```text
//! {
//!     "place": 7,
//!     "stride": 2,
//!     "rendezvous point": "<pano_id>",
//!     "Alice points": ["<pano_id>", ...],
//!     "Bob points": ["<pano_id>", ...]
//! }
//! ```
//!
//! The trajectory id is not stored in the file; it is the `N` of the
//! `traj{N}` directory holding it.

use crate::error::{Error, Result};
use crate::pano_graph::PanoramaGraph;
use crate::views::Agent;

use log::debug;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufWriter, Read, Write},
    path::Path,
};

/// Two equal-length walks converging on a rendezvous panorama.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Identity of this trajectory
    #[serde(skip)]
    pub traj_id: u32,
    /// Place whose graph every id below refers to
    pub place: u32,
    /// Sampling interval used to build the walks
    pub stride: usize,
    /// The panorama both agents walk toward
    #[serde(rename = "rendezvous point")]
    pub rendezvous_pano_id: String,
    /// Alice's positions, far from the rendezvous first
    #[serde(rename = "Alice points")]
    pub alice_points: Vec<String>,
    /// Bob's positions, far from the rendezvous first
    #[serde(rename = "Bob points")]
    pub bob_points: Vec<String>,
}

impl Trajectory {
    /// Number of timesteps before the rendezvous.
    pub fn len(&self) -> usize {
        self.alice_points.len()
    }

    /// Whether there are no timesteps before the rendezvous.
    pub fn is_empty(&self) -> bool {
        self.alice_points.is_empty()
    }

    /// The walk belonging to `agent`.
    pub fn points(&self, agent: Agent) -> &[String] {
        match agent {
            Agent::Alice => &self.alice_points,
            Agent::Bob => &self.bob_points,
        }
    }

    /// Index of the first timestep at which `agent` merely repeats its
    /// previous position to stay in step with the other agent, if any.
    ///
    /// Sampled pano ids are unique within a walk, so any trailing run of the
    /// final id beyond its first occurrence is padding.
    pub fn padded_from(&self, agent: Agent) -> Option<usize> {
        let points = self.points(agent);
        let last = points.last()?;
        let first_of_run = points
            .iter()
            .rposition(|p| p != last)
            .map_or(0, |idx| idx + 1);
        (first_of_run + 1 < points.len()).then_some(first_of_run + 1)
    }

    /// Checks this trajectory against the graph it was sampled from. Both
    /// walks must be equally long and every id must exist in that place.
    pub fn validate(&self, graph: &PanoramaGraph) -> Result<()> {
        self.check_lengths()?;
        if self.place != graph.place() {
            return Err(Error::Validation(format!(
                "trajectory is for place {} but the graph is place {}",
                self.place,
                graph.place()
            )));
        }
        std::iter::once(&self.rendezvous_pano_id)
            .chain(&self.alice_points)
            .chain(&self.bob_points)
            .try_for_each(|id| graph.require(id).map(|_| ()))
    }

    fn check_lengths(&self) -> Result<()> {
        if self.alice_points.len() != self.bob_points.len() {
            return Err(Error::Validation(format!(
                "Alice has {} points but Bob has {}",
                self.alice_points.len(),
                self.bob_points.len()
            )));
        }
        Ok(())
    }

    /// Writes `metainfo.json` to the [Write]able object provided.
    pub fn to_writer(&self, writer: impl Write) -> Result<()> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut ser)?;
        Ok(())
    }

    /// Writes `metainfo.json` to the path provided, replacing any existing
    /// file and creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let handle = File::create(path).map_err(|e| Error::io(path, e))?;
        let mut writer = BufWriter::new(handle);
        self.to_writer(&mut writer)?;
        writer.flush().map_err(|e| Error::io(path, e))?;
        debug!("wrote trajectory {} to {}", self.traj_id, path.display());
        Ok(())
    }

    /// Reads `metainfo.json` from the [Read]able object provided. A file
    /// whose walks differ in length is rejected with [Error::Validation].
    pub fn from_reader(reader: impl Read, traj_id: u32) -> Result<Self> {
        let traj: Trajectory = serde_json::from_reader(reader)?;
        traj.check_lengths()?;
        Ok(Self { traj_id, ..traj })
    }

    /// Reads `metainfo.json` from the path provided.
    pub fn load(path: impl AsRef<Path>, traj_id: u32) -> Result<Self> {
        let path = path.as_ref();
        let handle = File::open(path).map_err(|e| Error::io(path, e))?;
        let traj = Self::from_reader(handle, traj_id)?;
        debug!("read trajectory {traj_id} from {}", path.display());
        Ok(traj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pano_graph::{DuplicatePolicy, PanoNode};

    fn traj() -> Trajectory {
        Trajectory {
            traj_id: 4,
            place: 2,
            stride: 1,
            rendezvous_pano_id: "C".to_owned(),
            alice_points: vec!["A".to_owned(), "B".to_owned()],
            bob_points: vec!["E".to_owned(), "D".to_owned()],
        }
    }

    fn graph() -> PanoramaGraph {
        let nodes = ["A", "B", "C", "D", "E"]
            .iter()
            .enumerate()
            .map(|(i, id)| PanoNode::new(Some(id.to_string()), 0.0, i as f64).unwrap());
        PanoramaGraph::from_nodes(nodes, DuplicatePolicy::Reject)
            .unwrap()
            .with_place(2)
    }

    #[test]
    fn json_keys() {
        let mut buf = Vec::new();
        traj().to_writer(&mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "place": 2,
                "stride": 1,
                "rendezvous point": "C",
                "Alice points": ["A", "B"],
                "Bob points": ["E", "D"],
            })
        );
    }

    #[test]
    fn save_and_load_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traj4").join("metainfo.json");

        traj().save(&path).unwrap();
        let read = Trajectory::load(&path, 4).unwrap();

        assert_eq!(traj(), read);
    }

    #[test]
    fn valid_against_graph() {
        assert!(traj().validate(&graph()).is_ok());
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut t = traj();
        t.bob_points[1] = "Q".to_owned();

        assert!(matches!(t.validate(&graph()), Err(Error::NotFound(_))));
    }

    #[test]
    fn unequal_lengths_are_invalid() {
        let mut t = traj();
        t.bob_points.pop();

        assert!(matches!(t.validate(&graph()), Err(Error::Validation(_))));
    }

    #[test]
    fn unequal_file_fails_to_load() {
        let text = r#"{"place": 2, "stride": 1, "rendezvous point": "C",
            "Alice points": ["A", "B", "X"], "Bob points": ["E", "D"]}"#;

        let err = Trajectory::from_reader(text.as_bytes(), 4).unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn wrong_place_is_invalid() {
        let t = traj();

        assert!(matches!(
            t.validate(&graph().with_place(9)),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn padding_detection() {
        let mut t = traj();
        assert_eq!(t.padded_from(Agent::Alice), None);

        t.alice_points = vec!["A".to_owned(), "A".to_owned(), "A".to_owned()];
        t.bob_points = vec!["E".to_owned(), "D".to_owned(), "D".to_owned()];
        assert_eq!(t.padded_from(Agent::Alice), Some(1));
        assert_eq!(t.padded_from(Agent::Bob), Some(2));
    }
}
