//! Hand-off tables for the tools around the core: the capture requests an
//! image downloader works through, and the per-timestep view keys an
//! annotator or evaluator loads for each agent.

use crate::headings::{assign_headings, CameraRig};
use crate::layout::{image_file_name, DatasetLayout};
use crate::pano_graph::{PanoNode, PanoramaGraph};
use crate::trajectory::Trajectory;
use crate::views::{Agent, ViewLabelMapping};

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Fixed Street View request parameters shared by every capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreetViewParams {
    /// Image size, `WxH` in pixels
    pub size: &'static str,
    /// Horizontal field of view in degrees
    pub fov: u32,
    /// Camera pitch in degrees
    pub pitch: i32,
    /// Restricts imagery to outdoor panoramas
    pub source: &'static str,
}

impl Default for StreetViewParams {
    fn default() -> Self {
        Self {
            size: "640x640",
            fov: 90,
            pitch: 30,
            source: "outdoor",
        }
    }
}

/// One image for the downloader to fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureRequest {
    /// Panorama to capture
    pub pano_id: String,
    /// Latitude of the panorama
    pub lat: f64,
    /// Longitude of the panorama
    pub lng: f64,
    /// Compass heading of the camera
    pub heading: f64,
    /// Camera label, part of the file name
    pub label: &'static str,
    /// Where the image goes within the place directory
    pub file_name: String,
    /// Request parameters
    #[serde(flatten)]
    pub params: StreetViewParams,
}

/// Every capture for a place, one per (panorama, camera), in graph order.
///
/// Headings follow the graph's own order, so each panorama faces the next
/// one scraped. Panoramas without an id are still used to aim their
/// neighbours but cannot be stored, so they produce no request.
pub fn capture_plan(graph: &PanoramaGraph, rig: &CameraRig) -> Vec<CaptureRequest> {
    let walk: Vec<&PanoNode> = graph.nodes().iter().collect();
    assign_headings(&walk, rig)
        .into_iter()
        .filter_map(|a| {
            let pano_id = a.pano_id?;
            Some(
                a.cameras
                    .into_iter()
                    .map(|cam| CaptureRequest {
                        pano_id: pano_id.clone(),
                        lat: a.lat,
                        lng: a.lng,
                        heading: cam.heading,
                        label: cam.label,
                        file_name: image_file_name(&pano_id, cam.label),
                        params: StreetViewParams::default(),
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .flatten()
        .collect()
}

/// The requests whose image is not yet in `place_dir`.
pub fn pending(requests: Vec<CaptureRequest>, place_dir: &Path) -> Vec<CaptureRequest> {
    requests
        .into_iter()
        .filter(|r| !place_dir.join(&r.file_name).exists())
        .collect()
}

/// One image as an agent sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewKey {
    /// The label shown for this image, from the agent's own point of view
    pub heading: &'static str,
    /// Panorama the image belongs to
    pub pano_id: String,
    /// The stored view label the image was captured under
    pub view: &'static str,
    /// Annotation lookup key, the file name without extension
    pub key: String,
}

impl ViewKey {
    fn new(pano_id: &str, display: &'static str, agent: Agent, mapping: &ViewLabelMapping) -> Self {
        let view = mapping.map(display, agent);
        Self {
            heading: display,
            pano_id: pano_id.to_owned(),
            view,
            key: format!("id_{pano_id}_{view}"),
        }
    }

    /// Location of the image within `layout`.
    pub fn image_path(&self, layout: &DatasetLayout, place: u32) -> PathBuf {
        layout.image_path(place, &self.pano_id, self.view)
    }
}

/// Both agents' views at one timestep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimestepViews {
    /// Timestep index; the last one is the rendezvous
    pub time: usize,
    /// Alice's views in rig order
    pub alice: Vec<ViewKey>,
    /// Bob's views in rig order
    pub bob: Vec<ViewKey>,
}

fn agent_views(pano_id: &str, agent: Agent, mapping: &ViewLabelMapping) -> Vec<ViewKey> {
    mapping
        .rig()
        .labels()
        .iter()
        .map(|&label| ViewKey::new(pano_id, label, agent, mapping))
        .collect()
}

/// The view table for a trajectory: one entry per timestep, followed by one
/// more where both agents stand at the rendezvous.
pub fn timestep_views(traj: &Trajectory, mapping: &ViewLabelMapping) -> Vec<TimestepViews> {
    traj.alice_points
        .iter()
        .zip(&traj.bob_points)
        .chain(std::iter::once((&traj.rendezvous_pano_id, &traj.rendezvous_pano_id)))
        .enumerate()
        .map(|(time, (alice, bob))| TimestepViews {
            time,
            alice: agent_views(alice, Agent::Alice, mapping),
            bob: agent_views(bob, Agent::Bob, mapping),
        })
        .collect()
}
