//! Rotation augmentation for evaluation samples.
//!
//! An agent's four views can be presented starting from any camera instead
//! of `front`. Rotating the views by a quarter turn means the ground-truth
//! action must rotate with them: what was "forward" is now "turn right", and
//! so on. Both agents are rotated independently.

use crate::error::{Error, Result};
use crate::headings::CameraRig;

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A quarter-turn rotation of an agent's views, clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// No rotation
    R0,
    /// A quarter turn
    R90,
    /// A half turn
    R180,
    /// Three quarter turns
    R270,
}

impl Rotation {
    /// Every rotation, in increasing angle.
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    /// Rotation for a multiple of 90 degrees below 360.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::R0),
            90 => Some(Rotation::R90),
            180 => Some(Rotation::R180),
            270 => Some(Rotation::R270),
            _ => None,
        }
    }

    /// The angle in degrees.
    pub fn degrees(self) -> u32 {
        self.quarter_turns() as u32 * 90
    }

    /// The angle in quarter turns.
    pub fn quarter_turns(self) -> usize {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 1,
            Rotation::R180 => 2,
            Rotation::R270 => 3,
        }
    }

    /// A uniformly random rotation.
    pub fn random(rng: &mut impl Rng) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Rotation::R0)
    }
}

/// An agent's move at one timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Keep walking the way the front camera faces
    Forward,
    /// Turn toward the left camera
    TurnLeft,
    /// Turn toward the right camera
    TurnRight,
    /// Turn toward the back camera
    TurnBackward,
    /// Stay put
    Stay,
}

impl Action {
    /// Turning actions in clockwise camera order, starting at front.
    const CLOCKWISE: [Action; 4] = [
        Action::Forward,
        Action::TurnRight,
        Action::TurnBackward,
        Action::TurnLeft,
    ];

    /// The action's name as written in answer files.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Forward => "forward",
            Action::TurnLeft => "turn left",
            Action::TurnRight => "turn right",
            Action::TurnBackward => "turn backward",
            Action::Stay => "stay",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Action::Forward),
            "turn left" => Ok(Action::TurnLeft),
            "turn right" => Ok(Action::TurnRight),
            "turn backward" => Ok(Action::TurnBackward),
            "stay" => Ok(Action::Stay),
            _ => Err(Error::InvalidArgument(format!("unknown action {s:?}"))),
        }
    }
}

impl Serialize for Action {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The action that matches `action` once the views have been rotated by
/// `rotation`. Staying put is unaffected.
pub fn rotate_action(action: Action, rotation: Rotation) -> Action {
    match Action::CLOCKWISE.iter().position(|a| *a == action) {
        Some(idx) => Action::CLOCKWISE[(idx + rotation.quarter_turns()) % 4],
        None => action,
    }
}

/// The label `label` becomes after turning the rig clockwise by `degrees`,
/// in whole camera steps. Labels outside the rig pass through.
pub fn rotate_heading<'a>(label: &'a str, degrees: u32, rig: &CameraRig) -> &'a str {
    match rig.index_of(label) {
        Some(idx) => {
            let steps = (degrees as f64 / rig.spacing()).floor() as usize;
            rig.labels()[(idx + steps) % rig.camera_count()]
        }
        None => label,
    }
}

/// Rotates an ordered list of views right by `rotation`, so that the view
/// previously last comes first after a quarter turn.
pub fn rotate_views<T: Clone>(views: &[T], rotation: Rotation) -> Vec<T> {
    let mut out = views.to_vec();
    if !out.is_empty() {
        let steps = rotation.quarter_turns() % out.len();
        out.rotate_right(steps);
    }
    out
}

/// The ground-truth actions for both agents at one timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentActions {
    /// Alice's move
    #[serde(rename = "Alice")]
    pub alice: Action,
    /// Bob's move
    #[serde(rename = "Bob")]
    pub bob: Action,
}

/// Independent rotations for Alice's and Bob's views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Augmentation {
    /// Rotation applied to Alice's views
    pub alice: Rotation,
    /// Rotation applied to Bob's views
    pub bob: Rotation,
}

impl Augmentation {
    /// Picks both rotations at random.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            alice: Rotation::random(rng),
            bob: Rotation::random(rng),
        }
    }

    /// Rotates a combined view list laid out as Alice's four views followed
    /// by Bob's four. Anything past the eighth view is dropped; a list
    /// shorter than eight has no Bob views.
    pub fn apply<T: Clone>(&self, views: &[T]) -> Vec<T> {
        let split = views.len().min(4);
        let (alice, rest) = views.split_at(split);
        let bob = if rest.len() >= 4 { &rest[..4] } else { &rest[..0] };

        let mut out = rotate_views(alice, self.alice);
        out.extend(rotate_views(bob, self.bob));
        out
    }

    /// Rotates the ground-truth actions to match [Self::apply].
    pub fn transform(&self, answer: AgentActions) -> AgentActions {
        AgentActions {
            alice: rotate_action(answer.alice, self.alice),
            bob: rotate_action(answer.bob, self.bob),
        }
    }
}
