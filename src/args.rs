// Commandline argument parser using clap for panomeet

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::headings::CameraRig;

#[derive(Debug, Parser, Clone)]
#[clap(version, about)]
pub struct MeetArgs {
    #[command(subcommand)]
    /// Which step of the dataset pipeline to run
    pub command: CommandTask,

    /// Directory holding the `place{N}` folders
    #[arg(long = "data-root", env = "PANOMEET_DATA_ROOT", default_value = "googledata")]
    pub data_root: PathBuf,

    /// Directory holding the `traj{N}` folders
    #[arg(long = "text-root", env = "PANOMEET_TEXT_ROOT", default_value = "textdata")]
    pub text_root: PathBuf,
}

#[derive(Debug, Subcommand, Clone)]
pub enum CommandTask {
    /// Parse a place's url.txt into pano.json
    #[command(about)]
    Graph(GraphCommand),

    /// Sample a trajectory from a place's pano.json into metainfo.json
    #[command(about)]
    Traj(TrajCommand),

    /// Print the image capture requests for a place, one JSON object per line
    #[command(about)]
    Plan(PlanCommand),

    /// Print the per-timestep view keys of a trajectory as JSON
    #[command(about)]
    Views(ViewsCommand),

    /// Check a trajectory against the graph of its place
    #[command(about)]
    Check(CheckCommand),

    /// List the places that have a directory
    #[command(about)]
    Places,
}

#[derive(Debug, Args, Clone)]
pub struct GraphCommand {
    /// Place to parse
    #[arg(short, long)]
    pub place: u32,

    /// Fail when two URLs carry the same pano id instead of keeping the last
    #[arg(long = "strict-ids")]
    pub strict_ids: bool,
}

#[derive(Debug, Args, Clone)]
pub struct TrajCommand {
    /// Place to sample from
    #[arg(short, long)]
    pub place: u32,

    /// Keep every Nth position of each walk; must be positive
    #[arg(short, long, allow_negative_numbers = true)]
    pub stride: i64,

    /// Trajectory id to write; defaults to one past the highest existing id
    #[arg(short, long)]
    pub traj: Option<u32>,

    /// Pano id to meet at; defaults to the middle of the graph
    #[arg(short, long)]
    pub rendezvous: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct PlanCommand {
    /// Place to plan captures for
    #[arg(short, long)]
    pub place: u32,

    /// Camera rig to capture with
    #[arg(long, value_enum, default_value_t = RigChoice::Four)]
    pub rig: RigChoice,

    /// Only list images that are not on disk yet
    #[arg(long)]
    pub pending: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ViewsCommand {
    /// Trajectory to list
    #[arg(short, long)]
    pub traj: u32,

    /// Camera rig the images were captured with
    #[arg(long, value_enum, default_value_t = RigChoice::Four)]
    pub rig: RigChoice,
}

#[derive(Debug, Args, Clone)]
pub struct CheckCommand {
    /// Trajectory to check
    #[arg(short, long)]
    pub traj: u32,
}

/// Named camera rigs selectable from the commandline
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RigChoice {
    /// front, right, back, left
    Four,
    /// front, front_right, back_right, back_left, front_left
    Five,
}

impl From<RigChoice> for CameraRig {
    fn from(choice: RigChoice) -> Self {
        match choice {
            RigChoice::Four => CameraRig::FOUR,
            RigChoice::Five => CameraRig::FIVE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_traj() {
        let args = MeetArgs::parse_from([
            "panomeet", "--data-root", "/tmp/g", "traj", "-p", "3", "-s", "2", "-r", "abc",
        ]);

        assert_eq!(args.data_root, PathBuf::from("/tmp/g"));
        match args.command {
            CommandTask::Traj(t) => {
                assert_eq!(t.place, 3);
                assert_eq!(t.stride, 2);
                assert_eq!(t.traj, None);
                assert_eq!(t.rendezvous.as_deref(), Some("abc"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn negative_stride_reaches_the_sampler() {
        let args = MeetArgs::parse_from(["panomeet", "traj", "-p", "1", "-s", "-1"]);

        assert!(matches!(args.command, CommandTask::Traj(TrajCommand { stride: -1, .. })));
    }

    #[test]
    fn rig_choice() {
        let args = MeetArgs::parse_from(["panomeet", "plan", "-p", "1", "--rig", "five"]);

        match args.command {
            CommandTask::Plan(p) => assert_eq!(CameraRig::from(p.rig), CameraRig::FIVE),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn verifies() {
        use clap::CommandFactory;
        MeetArgs::command().debug_assert();
    }
}
