//! Where everything lives on disk.
//!
//! ```text
//! googledata/
//!     place{N}/
//!         url.txt                 scraped URLs, one per panorama
//!         pano.json               the parsed graph
//!         id_{pano}_{label}.jpg   captured views
//! textdata/
//!     traj{N}/
//!         metainfo.json           a sampled trajectory
//! ```

use crate::error::{Error, Result};
use crate::pano_graph::{DuplicatePolicy, PanoramaGraph};
use crate::trajectory::Trajectory;

use log::debug;
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// File name of a captured view.
pub fn image_file_name(pano_id: &str, label: &str) -> String {
    format!("id_{pano_id}_{label}.jpg")
}

/// The two dataset roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    data_root: PathBuf,
    text_root: PathBuf,
}

impl Default for DatasetLayout {
    fn default() -> Self {
        Self::new("googledata", "textdata")
    }
}

impl DatasetLayout {
    /// A layout rooted at the given place and trajectory directories.
    pub fn new(data_root: impl Into<PathBuf>, text_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            text_root: text_root.into(),
        }
    }

    /// Directory holding everything about one place.
    pub fn place_dir(&self, place: u32) -> PathBuf {
        self.data_root.join(format!("place{place}"))
    }

    /// The scraped URL list of a place.
    pub fn url_path(&self, place: u32) -> PathBuf {
        self.place_dir(place).join("url.txt")
    }

    /// The parsed graph of a place.
    pub fn pano_path(&self, place: u32) -> PathBuf {
        self.place_dir(place).join("pano.json")
    }

    /// A captured view of a panorama.
    pub fn image_path(&self, place: u32, pano_id: &str, label: &str) -> PathBuf {
        self.place_dir(place).join(image_file_name(pano_id, label))
    }

    /// Directory holding one trajectory.
    pub fn traj_dir(&self, traj_id: u32) -> PathBuf {
        self.text_root.join(format!("traj{traj_id}"))
    }

    /// The metainfo file of a trajectory.
    pub fn metainfo_path(&self, traj_id: u32) -> PathBuf {
        self.traj_dir(traj_id).join("metainfo.json")
    }

    /// Parses a place's `url.txt` and writes its `pano.json`.
    pub fn build_graph(&self, place: u32, policy: DuplicatePolicy) -> Result<PanoramaGraph> {
        let graph = PanoramaGraph::from_url_file(self.url_path(place), policy)?.with_place(place);
        graph.save(self.pano_path(place))?;
        Ok(graph)
    }

    /// Loads a place's `pano.json`.
    pub fn load_graph(&self, place: u32) -> Result<PanoramaGraph> {
        PanoramaGraph::load(self.pano_path(place), place)
    }

    /// Writes a trajectory's `metainfo.json`, replacing any previous one.
    pub fn save_trajectory(&self, traj: &Trajectory) -> Result<()> {
        traj.save(self.metainfo_path(traj.traj_id))
    }

    /// Loads a trajectory's `metainfo.json`.
    pub fn load_trajectory(&self, traj_id: u32) -> Result<Trajectory> {
        Trajectory::load(self.metainfo_path(traj_id), traj_id)
    }

    /// Every place with a directory, ascending.
    pub fn place_ids(&self) -> Result<Vec<u32>> {
        numbered_dirs(&self.data_root, "place")
    }

    /// Every trajectory with a directory, ascending.
    pub fn traj_ids(&self) -> Result<Vec<u32>> {
        numbered_dirs(&self.text_root, "traj")
    }

    /// One past the highest existing trajectory id, or 0 if there are none.
    pub fn next_traj_id(&self) -> Result<u32> {
        Ok(self.traj_ids()?.last().map_or(0, |id| id + 1))
    }
}

/// The `N`s of every `{prefix}{N}` directory under `root`, sorted. Entries
/// whose suffix is not a number are skipped; a missing root has none.
fn numbered_dirs(root: &Path, prefix: &str) -> Result<Vec<u32>> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{} does not exist yet", root.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(Error::io(root, e)),
    };

    let mut ids = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(root, e))?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name();
        if let Some(id) = name
            .to_str()
            .and_then(|n| n.strip_prefix(prefix))
            .and_then(|n| n.parse::<u32>().ok())
        {
            ids.push(id);
        }
    }
    ids.sort_unstable();
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn layout(root: &Path) -> DatasetLayout {
        DatasetLayout::new(root.join("googledata"), root.join("textdata"))
    }

    #[test]
    fn paths() {
        let l = DatasetLayout::default();

        assert_eq!(l.pano_path(3), PathBuf::from("googledata/place3/pano.json"));
        assert_eq!(l.url_path(3), PathBuf::from("googledata/place3/url.txt"));
        assert_eq!(
            l.image_path(3, "abc", "front"),
            PathBuf::from("googledata/place3/id_abc_front.jpg")
        );
        assert_eq!(l.metainfo_path(12), PathBuf::from("textdata/traj12/metainfo.json"));
    }

    #[test]
    fn discovers_numbered_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let l = layout(dir.path());
        for name in ["place10", "place2", "placeholder", "other"] {
            fs::create_dir_all(dir.path().join("googledata").join(name)).unwrap();
        }
        fs::write(dir.path().join("googledata").join("place7"), "not a dir").unwrap();

        assert_eq!(l.place_ids().unwrap(), vec![2, 10]);
    }

    #[test]
    fn next_traj_id_counts_up() {
        let dir = tempfile::tempdir().unwrap();
        let l = layout(dir.path());

        assert_eq!(l.next_traj_id().unwrap(), 0);

        fs::create_dir_all(l.traj_dir(0)).unwrap();
        fs::create_dir_all(l.traj_dir(4)).unwrap();
        assert_eq!(l.next_traj_id().unwrap(), 5);
    }

    #[test]
    fn graph_and_trajectory_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let l = layout(dir.path());
        fs::create_dir_all(l.place_dir(1)).unwrap();
        let urls: Vec<String> = ["A", "B", "C", "D", "E"]
            .iter()
            .enumerate()
            .map(|(i, id)| format!("https://www.google.com/maps/@0.0,{i}.0,3a/data=!1s{id}!2e0"))
            .collect();
        fs::write(l.url_path(1), urls.join("\n")).unwrap();

        let graph = l.build_graph(1, DuplicatePolicy::default()).unwrap();
        assert_eq!(l.load_graph(1).unwrap(), graph);

        let traj = crate::sampler::sample(&graph, 0, 1, None).unwrap();
        l.save_trajectory(&traj).unwrap();
        let read = l.load_trajectory(0).unwrap();
        assert_eq!(read, traj);
        assert!(read.validate(&graph).is_ok());
        assert_eq!(l.next_traj_id().unwrap(), 1);
    }
}
