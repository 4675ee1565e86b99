//! panomeet builds the trajectories for a two-agent rendezvous task over
//! Street-View-style panoramas. Two agents, Alice and Bob, start at opposite
//! ends of a scraped path and walk toward a shared rendezvous panorama; at
//! every timestep each of them sees the views of four (or five) cameras
//! aimed relative to their direction of travel.
//!
//! The pipeline runs leaf first:
//!
//! - [pano_url] pulls coordinates and pano ids out of scraped URLs,
//! - [pano_graph] keeps them as an ordered graph (`pano.json`),
//! - [sampler] splits the graph into Alice's and Bob's walks and writes a
//!   [trajectory] (`metainfo.json`),
//! - [headings] aims each camera from the [bearing] of travel,
//! - [views] maps Bob's camera labels onto the mirrored stored views,
//! - [capture] turns all of that into the tables image downloaders and
//!   annotators consume, and [augment] rotates views for evaluation.
//!
//! Fetching images, annotating them and querying vision-language models
//! happen in other tools; this crate only produces and checks their inputs.

#![warn(missing_docs)]
pub mod args;
pub mod augment;
pub mod bearing;
pub mod capture;
pub mod error;
pub mod headings;
pub mod layout;
pub mod pano_graph;
pub mod pano_url;
pub mod sampler;
pub mod trajectory;
pub mod views;

pub use error::{Error, Result};
