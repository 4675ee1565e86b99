//! Correspondence between Alice's and Bob's camera labels.
//!
//! Images are captured once per panorama, relative to the forward heading of
//! the walk the panorama was sampled for. Both agents share that capture
//! convention, but Bob walks the route the other way round, so the camera
//! Bob would call "front" is the one stored under `back`. Annotators display
//! Bob's images under his own labels while loading them from the mirrored
//! key. Swapping the two gives each agent the other's view.

use crate::error::{Error, Result};
use crate::headings::CameraRig;

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One of the two agents converging on the rendezvous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Agent {
    /// Walks the route in scrape order
    Alice,
    /// Walks the route against scrape order
    Bob,
}

impl Agent {
    /// Both agents, Alice first.
    pub const BOTH: [Agent; 2] = [Agent::Alice, Agent::Bob];
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Agent::Alice => f.write_str("Alice"),
            Agent::Bob => f.write_str("Bob"),
        }
    }
}

impl FromStr for Agent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "alice" => Ok(Agent::Alice),
            "bob" => Ok(Agent::Bob),
            _ => Err(Error::InvalidArgument(format!("unknown agent {s:?}"))),
        }
    }
}

/// Bob's display label to stored view label for the four-camera rig.
const BOB_FOUR_VIEW: &[(&str, &str)] = &[
    ("front", "back"),
    ("right", "left"),
    ("back", "front"),
    ("left", "right"),
];

/// The stored view label behind `label` as seen by `agent`, for the
/// four-camera rig. Labels outside the rig pass through unchanged.
pub fn map_label(label: &str, agent: Agent) -> &str {
    match agent {
        Agent::Alice => label,
        Agent::Bob => BOB_FOUR_VIEW
            .iter()
            .find(|(from, _)| *from == label)
            .map_or(label, |(_, to)| to),
    }
}

/// A label correspondence for an arbitrary even-sized rig, pairing each
/// camera with the one opposite it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewLabelMapping {
    rig: CameraRig,
}

impl ViewLabelMapping {
    /// Builds the mapping for `rig`. A rig with an odd number of cameras has
    /// no opposite camera for each label and is rejected.
    pub fn for_rig(rig: CameraRig) -> Result<Self> {
        if rig.camera_count() % 2 != 0 {
            return Err(Error::InvalidArgument(format!(
                "a {}-camera rig has no opposing cameras",
                rig.camera_count()
            )));
        }
        Ok(Self { rig })
    }

    /// The rig this mapping covers.
    pub fn rig(&self) -> CameraRig {
        self.rig
    }

    /// Like [map_label], but over this mapping's rig.
    pub fn map<'a>(&self, label: &'a str, agent: Agent) -> &'a str {
        match (agent, self.rig.index_of(label)) {
            (Agent::Bob, Some(idx)) => {
                let n = self.rig.camera_count();
                self.rig.labels()[(idx + n / 2) % n]
            }
            _ => label,
        }
    }
}

impl Default for ViewLabelMapping {
    fn default() -> Self {
        Self {
            rig: CameraRig::FOUR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headings::FOUR_VIEW;

    #[test]
    fn alice_is_identity() {
        for label in FOUR_VIEW {
            assert_eq!(map_label(label, Agent::Alice), *label);
        }
    }

    #[test]
    fn bob_is_mirrored() {
        assert_eq!(map_label("front", Agent::Bob), "back");
        assert_eq!(map_label("right", Agent::Bob), "left");
        assert_eq!(map_label("back", Agent::Bob), "front");
        assert_eq!(map_label("left", Agent::Bob), "right");
    }

    #[test]
    fn bob_is_an_involution() {
        for label in FOUR_VIEW {
            assert_eq!(map_label(map_label(label, Agent::Bob), Agent::Bob), *label);
        }
    }

    #[test]
    fn unknown_labels_pass_through() {
        assert_eq!(map_label("up", Agent::Bob), "up");
        assert_eq!(ViewLabelMapping::default().map("up", Agent::Bob), "up");
    }

    #[test]
    fn rig_mapping_agrees_with_table() {
        let mapping = ViewLabelMapping::for_rig(CameraRig::FOUR).unwrap();
        for label in FOUR_VIEW {
            for agent in Agent::BOTH {
                assert_eq!(mapping.map(label, agent), map_label(label, agent));
            }
        }
    }

    #[test]
    fn odd_rig_rejected() {
        assert!(matches!(
            ViewLabelMapping::for_rig(CameraRig::FIVE),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn agent_names() {
        assert_eq!("alice".parse::<Agent>().unwrap(), Agent::Alice);
        assert_eq!("Bob".parse::<Agent>().unwrap(), Agent::Bob);
        assert!("carol".parse::<Agent>().is_err());
        assert_eq!(Agent::Bob.to_string(), "Bob");
    }
}
