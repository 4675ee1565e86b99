//! Drives the rendezvous dataset pipeline from the commandline.

use clap::Parser;
use log::{error, info, warn};
use panomeet::{
    args::{
        CheckCommand, CommandTask::{Check, Graph, Places, Plan, Traj, Views}, GraphCommand,
        MeetArgs, PlanCommand, TrajCommand, ViewsCommand,
    },
    capture::{capture_plan, pending, timestep_views},
    error::{Error, Result},
    headings::CameraRig,
    layout::DatasetLayout,
    pano_graph::DuplicatePolicy,
    sampler::sample,
    views::{Agent, ViewLabelMapping},
};
use std::{
    io::{self, BufWriter, Write},
    process::ExitCode,
};

// Example:
// cargo run --bin panomeet -- graph --place 3
// cargo run --bin panomeet -- traj  --place 3 --stride 2
// cargo run --bin panomeet -- plan  --place 3 --pending > requests.jsonl

fn main() -> ExitCode {
    env_logger::init();
    let args = MeetArgs::parse();
    let layout = DatasetLayout::new(args.data_root, args.text_root);

    let res = match args.command {
        Graph(cmd) => build_graph(&layout, cmd),
        Traj(cmd) => build_traj(&layout, cmd),
        Plan(cmd) => print_plan(&layout, cmd),
        Views(cmd) => print_views(&layout, cmd),
        Check(cmd) => check_traj(&layout, cmd),
        Places => list_places(&layout),
    };

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn build_graph(layout: &DatasetLayout, cmd: GraphCommand) -> Result<()> {
    let policy = if cmd.strict_ids {
        DuplicatePolicy::Reject
    } else {
        DuplicatePolicy::LastWriteWins
    };
    let graph = layout.build_graph(cmd.place, policy)?;
    let anonymous = graph.nodes().iter().filter(|n| n.pano_id.is_none()).count();
    if anonymous > 0 {
        warn!("{anonymous} urls in place {} have no pano id", cmd.place);
    }
    info!(
        "Saved {} nodes to {}",
        graph.len(),
        layout.pano_path(cmd.place).display()
    );
    Ok(())
}

fn build_traj(layout: &DatasetLayout, cmd: TrajCommand) -> Result<()> {
    let stride = usize::try_from(cmd.stride)
        .ok()
        .filter(|s| *s > 0)
        .ok_or_else(|| {
            Error::InvalidArgument(format!("stride must be a positive integer, got {}", cmd.stride))
        })?;
    let graph = layout.load_graph(cmd.place)?;
    let traj_id = match cmd.traj {
        Some(id) => id,
        None => layout.next_traj_id()?,
    };

    let traj = sample(&graph, traj_id, stride, cmd.rendezvous.as_deref())?;
    for agent in Agent::BOTH {
        if let Some(t) = traj.padded_from(agent) {
            info!("{agent} repeats its last position from timestep {t}");
        }
    }
    layout.save_trajectory(&traj)?;
    info!(
        "Saved trajectory metainfo to {} with stride {stride}, {} timesteps meeting at {}",
        layout.metainfo_path(traj_id).display(),
        traj.len(),
        traj.rendezvous_pano_id
    );
    Ok(())
}

fn print_plan(layout: &DatasetLayout, cmd: PlanCommand) -> Result<()> {
    let graph = layout.load_graph(cmd.place)?;
    let mut requests = capture_plan(&graph, &CameraRig::from(cmd.rig));
    if cmd.pending {
        let total = requests.len();
        requests = pending(requests, &layout.place_dir(cmd.place));
        info!("{} of {total} images still to capture", requests.len());
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for request in &requests {
        serde_json::to_writer(&mut out, request)?;
        writeln!(out).map_err(|e| Error::io("<stdout>", e))?;
    }
    out.flush().map_err(|e| Error::io("<stdout>", e))
}

fn print_views(layout: &DatasetLayout, cmd: ViewsCommand) -> Result<()> {
    let traj = layout.load_trajectory(cmd.traj)?;
    let mapping = ViewLabelMapping::for_rig(CameraRig::from(cmd.rig))?;
    let table = timestep_views(&traj, &mapping);

    let missing = table
        .iter()
        .flat_map(|t| t.alice.iter().chain(&t.bob))
        .filter(|v| !v.image_path(layout, traj.place).exists())
        .count();
    if missing > 0 {
        warn!("{missing} views of trajectory {} have no image yet", cmd.traj);
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    serde_json::to_writer_pretty(&mut out, &table)?;
    writeln!(out).map_err(|e| Error::io("<stdout>", e))?;
    out.flush().map_err(|e| Error::io("<stdout>", e))
}

fn check_traj(layout: &DatasetLayout, cmd: CheckCommand) -> Result<()> {
    let traj = layout.load_trajectory(cmd.traj)?;
    let graph = layout.load_graph(traj.place)?;
    traj.validate(&graph)?;
    info!(
        "Trajectory {} is consistent with place {} ({} timesteps)",
        cmd.traj,
        traj.place,
        traj.len()
    );
    Ok(())
}

fn list_places(layout: &DatasetLayout) -> Result<()> {
    for place in layout.place_ids()? {
        let status = if layout.pano_path(place).exists() {
            "graph"
        } else if layout.url_path(place).exists() {
            "urls"
        } else {
            "empty"
        };
        println!("place{place}\t{status}");
    }
    Ok(())
}
