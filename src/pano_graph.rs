//! The panorama graph: every geocoded capture point scraped for one place, in
//! the order they were scraped.
//!
//! Node order matters. Scrapes walk a physical path, so the position of a
//! node in [PanoramaGraph::nodes] approximates its position along that path,
//! and the trajectory sampler splits the graph by index. Everything that
//! builds or persists a graph preserves that order, including `pano.json`,
//! whose `nodes` object lists its keys in graph order:
//!
//! ```text
//! {
//!     "nodes": {
//!         "<pano_id>": { "lat": 40.7127, "lng": -74.0059 },
//!         ...
//!     }
//! }
//! ```

use crate::error::{Error, Result};
use crate::pano_url::PanoUrl;

use log::debug;
use serde::{
    de::{MapAccess, Visitor},
    ser::{SerializeMap, SerializeStruct},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::{
    collections::HashMap,
    fmt,
    fs::{self, File},
    io::{BufWriter, Read, Write},
    path::Path,
};

/// Key used in `pano.json` for a node whose URL had no pano id. Each such
/// node gets its own entry, so the key may repeat within `nodes`.
const ANONYMOUS_KEY: &str = "null";

/// A single geocoded panorama.
#[derive(Debug, Clone, PartialEq)]
pub struct PanoNode {
    /// Opaque id scraped from the URL, if there was one
    pub pano_id: Option<String>,
    /// Latitude in degrees, within [-90, 90]
    pub lat: f64,
    /// Longitude in degrees, within [-180, 180]
    pub lng: f64,
}

impl PanoNode {
    /// Builds a node, checking that the coordinates are geographic. The id
    /// `"null"` is reserved for anonymous nodes on disk and is rejected.
    pub fn new(pano_id: Option<String>, lat: f64, lng: f64) -> Result<Self> {
        if pano_id.as_deref() == Some(ANONYMOUS_KEY) {
            return Err(Error::Validation(format!(
                "pano id {ANONYMOUS_KEY} is reserved for nodes without an id"
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(Error::Validation(format!(
                "lat must be between -90 and 90, got {lat}"
            )));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(Error::Validation(format!(
                "lng must be between -180 and 180, got {lng}"
            )));
        }
        Ok(Self { pano_id, lat, lng })
    }

    /// The id as written on disk, `"null"` for anonymous nodes.
    pub fn key(&self) -> &str {
        self.pano_id.as_deref().unwrap_or(ANONYMOUS_KEY)
    }
}

/// What to do when two inputs produce the same pano id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the node at its first position, with the later coordinates.
    #[default]
    LastWriteWins,
    /// Fail with [Error::Validation].
    Reject,
}

/// An ordered collection of [PanoNode]s belonging to one place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanoramaGraph {
    place: u32,
    nodes: Vec<PanoNode>,
}

/// Accumulates nodes while enforcing id uniqueness. Anonymous nodes are
/// never duplicates of each other.
struct GraphBuilder {
    policy: DuplicatePolicy,
    nodes: Vec<PanoNode>,
    positions: HashMap<String, usize>,
}

impl GraphBuilder {
    fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            nodes: Vec::new(),
            positions: HashMap::new(),
        }
    }

    fn push(&mut self, node: PanoNode) -> Result<()> {
        let Some(pano_id) = node.pano_id.clone() else {
            self.nodes.push(node);
            return Ok(());
        };
        match self.positions.get(&pano_id) {
            Some(&idx) => match self.policy {
                DuplicatePolicy::LastWriteWins => self.nodes[idx] = node,
                DuplicatePolicy::Reject => {
                    return Err(Error::Validation(format!(
                        "pano id {} appears more than once",
                        node.key()
                    )));
                }
            },
            None => {
                self.positions.insert(pano_id, self.nodes.len());
                self.nodes.push(node);
            }
        }
        Ok(())
    }

    fn finish(self) -> PanoramaGraph {
        PanoramaGraph {
            place: 0,
            nodes: self.nodes,
        }
    }
}

impl PanoramaGraph {
    /// Parses scraped URLs into a graph, one node per non-blank line, in
    /// line order. A single line without coordinates, or with coordinates
    /// out of range, fails the whole batch.
    pub fn from_urls<S: AsRef<str>>(
        lines: impl IntoIterator<Item = S>,
        policy: DuplicatePolicy,
    ) -> Result<Self> {
        let mut builder = GraphBuilder::new(policy);

        for (idx, line) in lines.into_iter().enumerate() {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            let url: PanoUrl = line.parse().map_err(|_| Error::Parse {
                line: idx + 1,
                input: line.to_owned(),
            })?;
            builder.push(PanoNode::new(url.pano_id, url.lat, url.lng)?)?;
        }

        if builder.nodes.is_empty() {
            return Err(Error::InsufficientData(
                "no urls to build a graph from".to_owned(),
            ));
        }
        Ok(builder.finish())
    }

    /// Reads a newline-delimited `url.txt` and parses it with [Self::from_urls].
    pub fn from_url_file(path: impl AsRef<Path>, policy: DuplicatePolicy) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        debug!("read {} url lines from {}", text.lines().count(), path.display());
        Self::from_urls(text.lines(), policy)
    }

    /// Builds a graph directly from nodes, e.g. for tests or synthetic
    /// routes. Nodes are range checked and deduplicated like parsed ones.
    pub fn from_nodes(
        nodes: impl IntoIterator<Item = PanoNode>,
        policy: DuplicatePolicy,
    ) -> Result<Self> {
        let mut builder = GraphBuilder::new(policy);
        for node in nodes {
            builder.push(PanoNode::new(node.pano_id, node.lat, node.lng)?)?;
        }
        Ok(builder.finish())
    }

    /// Tags the graph with the place it was scraped for.
    pub fn with_place(self, place: u32) -> Self {
        Self { place, ..self }
    }

    /// The place this graph belongs to.
    pub fn place(&self) -> u32 {
        self.place
    }

    /// All nodes, in scrape order.
    pub fn nodes(&self) -> &[PanoNode] {
        &self.nodes
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Index of the node with the given id.
    pub fn position(&self, pano_id: &str) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.pano_id.as_deref() == Some(pano_id))
    }

    /// The node with the given id.
    pub fn get(&self, pano_id: &str) -> Option<&PanoNode> {
        self.position(pano_id).map(|idx| &self.nodes[idx])
    }

    /// Like [Self::get], but a missing id is an [Error::NotFound].
    pub fn require(&self, pano_id: &str) -> Result<&PanoNode> {
        self.get(pano_id).ok_or_else(|| {
            Error::NotFound(format!("pano id {pano_id} is not in place {}", self.place))
        })
    }

    /// Writes `pano.json` to the [Write]able object provided.
    pub fn to_writer(&self, writer: impl Write) -> Result<()> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut ser)?;
        Ok(())
    }

    /// Writes `pano.json` to the path provided, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        let handle = File::create(path).map_err(|e| Error::io(path, e))?;
        let mut writer = BufWriter::new(handle);
        self.to_writer(&mut writer)?;
        writer.flush().map_err(|e| Error::io(path, e))?;
        debug!("wrote {} nodes to {}", self.len(), path.display());
        Ok(())
    }

    /// Reads `pano.json` from the [Read]able object provided.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let file: PanoFile = serde_json::from_reader(reader)?;
        Ok(file.nodes.0)
    }

    /// Reads `pano.json` from the path provided, tagging it with `place`.
    pub fn load(path: impl AsRef<Path>, place: u32) -> Result<Self> {
        let path = path.as_ref();
        let handle = File::open(path).map_err(|e| Error::io(path, e))?;
        let graph = Self::from_reader(handle)?.with_place(place);
        debug!("read {} nodes from {}", graph.len(), path.display());
        Ok(graph)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Serializes nodes as a JSON object, keys in graph order.
struct NodeMap<'a>(&'a [PanoNode]);

impl Serialize for NodeMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for node in self.0 {
            map.serialize_entry(
                node.key(),
                &LatLng {
                    lat: node.lat,
                    lng: node.lng,
                },
            )?;
        }
        map.end()
    }
}

impl Serialize for PanoramaGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut file = serializer.serialize_struct("PanoFile", 1)?;
        file.serialize_field("nodes", &NodeMap(&self.nodes))?;
        file.end()
    }
}

#[derive(Deserialize)]
struct PanoFile {
    nodes: NodeList,
}

/// Deserializes the `nodes` object in document order.
struct NodeList(PanoramaGraph);

impl<'de> Deserialize<'de> for NodeList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct NodeVisitor;

        impl<'de> Visitor<'de> for NodeVisitor {
            type Value = NodeList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of pano ids to {lat, lng}")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<NodeList, A::Error>
            where
                A: MapAccess<'de>,
            {
                use serde::de::Error as _;

                let mut builder = GraphBuilder::new(DuplicatePolicy::LastWriteWins);
                while let Some((key, LatLng { lat, lng })) =
                    access.next_entry::<String, LatLng>()?
                {
                    let pano_id = (key != ANONYMOUS_KEY).then_some(key);
                    let node = PanoNode::new(pano_id, lat, lng).map_err(A::Error::custom)?;
                    builder.push(node).map_err(A::Error::custom)?;
                }
                Ok(NodeList(builder.finish()))
            }
        }

        deserializer.deserialize_map(NodeVisitor)
    }
}
