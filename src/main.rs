//! Cursor Dance entry point
//!
//! Loads (or generates) a beatmap, runs the controller over it on a fixed
//! timestep and writes one JSON line per frame with every cursor position.

use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use serde::Serialize;

use cursor_dance::consts::{MAX_SUBSTEPS, SIM_DT_MS};
use cursor_dance::{Beatmap, Controller, DanceSettings};

/// Lead-in before the first object and tail after the last one (ms)
const MARGIN_MS: f64 = 500.0;

#[derive(Parser, Debug)]
#[command(author, version, about = "Autopilot cursor dance over a beatmap", long_about = None)]
struct Cli {
    /// Beatmap JSON file. A seeded synthetic map is used when omitted.
    beatmap: Option<PathBuf>,
    /// Dance settings JSON file.
    #[arg(short, long)]
    settings: Option<PathBuf>,
    /// Number of cooperating cursors (overrides the settings file).
    #[arg(short, long)]
    tag: Option<usize>,
    /// Seed for the synthetic map.
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Object count for the synthetic map.
    #[arg(long, default_value_t = 64)]
    count: usize,
    /// Frame step in milliseconds.
    #[arg(long, default_value_t = 1000.0 / 60.0)]
    step: f64,
}

#[derive(Serialize)]
struct Frame {
    time: f64,
    cursors: Vec<[f32; 2]>,
}

fn main() -> cursor_dance::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => DanceSettings::load(path)?,
        None => DanceSettings::default(),
    };
    if let Some(tag) = cli.tag {
        settings.tag = tag;
    }
    if cli.step.is_nan() || cli.step <= 0.0 {
        return Err(cursor_dance::DanceError::invalid_settings("step must be positive"));
    }

    let beatmap = match &cli.beatmap {
        Some(path) => Beatmap::load(path)?,
        None => Beatmap::generate(cli.seed, cli.count),
    };
    log::info!("Cursor Dance: '{}' ({} objects)", beatmap.title, beatmap.objects.len());
    let (first, last) = beatmap.time_span().unwrap_or((0.0, 0.0));

    let mut controller = Controller::new(settings);
    controller.set_beatmap(Rc::new(beatmap));
    controller.init_cursors()?;

    let frame_dt = cli.step.min(SIM_DT_MS * MAX_SUBSTEPS as f64);
    if frame_dt < cli.step {
        log::warn!("Frame step {} ms clamped to {} ms", cli.step, frame_dt);
    }

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut sim_time = first - MARGIN_MS;
    let end = last + MARGIN_MS;
    let mut accumulator = 0.0;
    let mut frames = 0usize;
    controller.update(sim_time, 0.0);

    while sim_time < end {
        accumulator += frame_dt;

        let mut substeps = 0;
        while accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            sim_time += SIM_DT_MS;
            controller.update(sim_time, SIM_DT_MS);
            accumulator -= SIM_DT_MS;
            substeps += 1;
        }

        let frame = Frame {
            time: sim_time,
            cursors: controller
                .cursors()
                .iter()
                .map(|c| c.position.to_array())
                .collect(),
        };
        serde_json::to_writer(&mut out, &frame)?;
        writeln!(out)?;
        frames += 1;
    }
    out.flush()?;

    log::info!("Wrote {} frames ({:.0} ms to {:.0} ms)", frames, first - MARGIN_MS, end);
    Ok(())
}
