//! Camera headings for each panorama on a walk.
//!
//! Every position gets a forward heading, the bearing toward the next
//! position on the same walk. A [CameraRig] then fans out `N` capture
//! headings at equal offsets of `360 / N` degrees from forward, each named
//! by the rig's label in order.

use crate::bearing::{bearing, normalize, Degrees};
use crate::error::{Error, Result};
use crate::pano_graph::PanoNode;

use serde::Serialize;

/// Labels of the four-camera rig, clockwise from forward.
pub const FOUR_VIEW: &[&str] = &["front", "right", "back", "left"];

/// Labels of the five-camera rig, clockwise from forward.
pub const FIVE_VIEW: &[&str] = &["front", "front_right", "back_right", "back_left", "front_left"];

/// An ordered set of camera labels spread evenly around the forward heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraRig {
    labels: &'static [&'static str],
}

impl CameraRig {
    /// The standard front/right/back/left rig.
    pub const FOUR: CameraRig = CameraRig { labels: FOUR_VIEW };

    /// The five-camera rig.
    pub const FIVE: CameraRig = CameraRig { labels: FIVE_VIEW };

    /// Builds a rig from a label table, which must have exactly
    /// `camera_count` distinct labels.
    pub fn new(labels: &'static [&'static str], camera_count: usize) -> Result<Self> {
        if camera_count == 0 {
            return Err(Error::InvalidArgument(
                "a camera rig needs at least one camera".to_owned(),
            ));
        }
        if labels.len() != camera_count {
            return Err(Error::InvalidArgument(format!(
                "{} labels given for {camera_count} cameras",
                labels.len()
            )));
        }
        if labels
            .iter()
            .enumerate()
            .any(|(i, l)| labels[..i].contains(l))
        {
            return Err(Error::InvalidArgument(format!(
                "camera labels must be distinct: {labels:?}"
            )));
        }
        Ok(Self { labels })
    }

    /// Labels in clockwise order, starting at forward.
    pub fn labels(&self) -> &'static [&'static str] {
        self.labels
    }

    /// Number of cameras.
    pub fn camera_count(&self) -> usize {
        self.labels.len()
    }

    /// Angle between neighbouring cameras.
    pub fn spacing(&self) -> Degrees {
        360.0 / self.camera_count() as f64
    }

    /// Position of `label` in the rig.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| *l == label)
    }

    /// The capture heading of every camera when facing `forward`.
    pub fn fan_out(&self, forward: Degrees) -> Vec<CameraHeading> {
        self.labels
            .iter()
            .enumerate()
            .map(|(k, &label)| CameraHeading {
                label,
                heading: normalize(forward + k as f64 * self.spacing()),
            })
            .collect()
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::FOUR
    }
}

/// One camera's capture direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraHeading {
    /// Camera label from the rig
    pub label: &'static str,
    /// Compass heading in [0, 360)
    pub heading: Degrees,
}

/// The headings assigned to one position on a walk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingAssignment {
    /// The position's pano id, absent for anonymous nodes
    pub pano_id: Option<String>,
    /// Latitude of the position
    pub lat: f64,
    /// Longitude of the position
    pub lng: f64,
    /// Bearing of travel at this position
    pub forward_heading: Degrees,
    /// One heading per camera, in rig order
    pub cameras: Vec<CameraHeading>,
}

impl HeadingAssignment {
    /// The heading of the camera named `label`.
    pub fn heading(&self, label: &str) -> Option<Degrees> {
        self.cameras
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.heading)
    }
}

/// Forward heading at every position of `walk`: the bearing to the next
/// position, with the last position reusing the one before it. A single
/// position faces north.
pub fn forward_headings(walk: &[&PanoNode]) -> Vec<Degrees> {
    let mut headings: Vec<Degrees> = walk
        .windows(2)
        .map(|w| bearing(w[0].lat, w[0].lng, w[1].lat, w[1].lng))
        .collect();
    if !walk.is_empty() {
        headings.push(headings.last().copied().unwrap_or(0.0));
    }
    headings
}

/// Assigns capture headings to every position of `walk`, in walk order.
///
/// A pano id repeated on the walk (as padding produces) gets one entry per
/// occurrence; [lookup] returns the last, so a later heading overrides an
/// earlier one as it would in a keyed table.
pub fn assign_headings(walk: &[&PanoNode], rig: &CameraRig) -> Vec<HeadingAssignment> {
    walk.iter()
        .zip(forward_headings(walk))
        .map(|(node, forward)| HeadingAssignment {
            pano_id: node.pano_id.clone(),
            lat: node.lat,
            lng: node.lng,
            forward_heading: forward,
            cameras: rig.fan_out(forward),
        })
        .collect()
}

/// The assignment for `pano_id`, preferring the latest occurrence.
pub fn lookup<'a>(assignments: &'a [HeadingAssignment], pano_id: &str) -> Option<&'a HeadingAssignment> {
    assignments
        .iter()
        .rev()
        .find(|a| a.pano_id.as_deref() == Some(pano_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    /// Smallest angle between two headings.
    fn gap(a: Degrees, b: Degrees) -> Degrees {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    fn node(id: &str, lat: f64, lng: f64) -> PanoNode {
        PanoNode::new(Some(id.to_owned()), lat, lng).unwrap()
    }

    #[test]
    fn rig_validation() {
        assert!(CameraRig::new(FOUR_VIEW, 4).is_ok());
        assert!(matches!(
            CameraRig::new(FOUR_VIEW, 5),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(CameraRig::new(&[], 0), Err(Error::InvalidArgument(_))));
        assert!(matches!(
            CameraRig::new(&["front", "front"], 2),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn heading_along_equator() {
        let walk = [node("a", 0.0, 0.0), node("b", 0.0, 1.0), node("c", 0.0, 2.0)];
        let walk: Vec<_> = walk.iter().collect();

        let res = assign_headings(&walk, &CameraRig::FOUR);

        assert_eq!(res.len(), 3);
        for a in &res {
            assert!(gap(a.forward_heading, 90.0) < EPS);
            assert!(gap(a.heading("front").unwrap(), 90.0) < EPS);
            assert!(gap(a.heading("right").unwrap(), 180.0) < EPS);
            assert!(gap(a.heading("back").unwrap(), 270.0) < EPS);
            assert!(gap(a.heading("left").unwrap(), 0.0) < EPS);
        }
    }

    #[test]
    fn last_reuses_previous() {
        let walk = [node("a", 0.0, 0.0), node("b", 1.0, 0.0), node("c", 1.0, 1.0)];
        let walk: Vec<_> = walk.iter().collect();

        let fwd = forward_headings(&walk);

        assert!(gap(fwd[0], 0.0) < EPS);
        assert!((fwd[1] - fwd[2]).abs() < EPS);
        assert!(fwd[1] > 80.0 && fwd[1] < 100.0);
    }

    #[test]
    fn single_node_faces_north() {
        let only = node("solo", 10.0, 10.0);

        let res = assign_headings(&[&only], &CameraRig::FIVE);

        assert_eq!(res[0].forward_heading, 0.0);
        assert_eq!(res[0].cameras.len(), 5);
        assert!((res[0].heading("front_right").unwrap() - 72.0).abs() < EPS);
    }

    #[test]
    fn empty_walk() {
        assert!(assign_headings(&[], &CameraRig::FOUR).is_empty());
    }

    #[test]
    fn cameras_equally_spaced() {
        let walk = [node("a", 12.3, 45.6), node("b", 12.4, 45.5)];
        let walk: Vec<_> = walk.iter().collect();

        for rig in [CameraRig::FOUR, CameraRig::FIVE] {
            for a in assign_headings(&walk, &rig) {
                for (k, cam) in a.cameras.iter().enumerate() {
                    let expected = normalize(a.forward_heading + k as f64 * rig.spacing());
                    assert!(gap(cam.heading, expected) < EPS);
                    assert!((0.0..360.0).contains(&cam.heading));
                }
            }
        }
    }

    #[test]
    fn lookup_prefers_last_occurrence() {
        let a = node("a", 0.0, 0.0);
        let b = node("b", 0.0, 1.0);
        let walk = [&b, &a, &b];

        let res = assign_headings(&walk, &CameraRig::FOUR);
        let hit = lookup(&res, "b").unwrap();

        assert!(gap(hit.forward_heading, 90.0) < EPS);
        assert!(lookup(&res, "zzz").is_none());
    }
}
