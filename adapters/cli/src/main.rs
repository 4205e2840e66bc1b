#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Haunted Dreams cockpit.

mod config;
mod narration;
mod simulation;

use std::{path::PathBuf, time::Duration};

use anyhow::{ensure, Result};
use clap::Parser;
use haunted_dreams_core::ControlId;
use haunted_dreams_rendering::{Color, FrameInput, Presentation, RenderingBackend};
use haunted_dreams_rendering_macroquad::{CockpitLayout, MacroquadBackend};
use haunted_dreams_world::query;
use log::info;

use crate::{config::GameConfig, simulation::Simulation};

const HEADLESS_FRAME: Duration = Duration::from_micros(16_667);

#[derive(Parser, Debug)]
#[command(about = "Tune the dream ship and photograph nightmares", version)]
struct Args {
    /// TOML file overriding puzzle, controls, photography, and tutorial settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML file describing where screens and controls sit in the window
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Seed for the starting heading and the distortion noise; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Synchronise presentation with the display refresh rate
    #[arg(long)]
    vsync: bool,

    /// Print frame timing once per second
    #[arg(long)]
    show_fps: bool,

    /// Run the simulation without a window for the given number of seconds
    #[arg(long, value_name = "SECONDS")]
    headless: Option<f64>,
}

/// Entry point for the Haunted Dreams command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::init();

    let config = GameConfig::load(args.config.as_deref())?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("session seed {seed}");

    let simulation = Simulation::new(&config, seed)?;
    println!("{}", query::welcome_banner(simulation.world()));

    match args.headless {
        Some(seconds) => run_headless(simulation, seconds),
        None => {
            let layout = match args.layout.as_deref() {
                Some(path) => CockpitLayout::load(path)?,
                None => CockpitLayout::default(),
            };
            run_windowed(simulation, layout, seed, &args)
        }
    }
}

fn run_headless(mut simulation: Simulation, seconds: f64) -> Result<()> {
    ensure!(
        seconds.is_finite() && seconds >= 0.0,
        "--headless expects a non-negative number of seconds (got {seconds})"
    );
    let frames = (seconds / HEADLESS_FRAME.as_secs_f64()).ceil() as u64;

    let mut input = FrameInput {
        loaded_controls: ControlId::ALL.to_vec(),
        ..FrameInput::default()
    };
    for _ in 0..frames {
        simulation.advance(HEADLESS_FRAME, &input);
        input = FrameInput::default();
    }

    let world = simulation.world();
    println!(
        "ticks: {} | tutorial: {:?} | nightmare: {}/{} | photos: {}",
        query::tick_index(world),
        query::tutorial_step(world),
        query::target_index(world) + 1,
        query::catalog(world).len(),
        query::revealed_photos(world).len(),
    );
    Ok(())
}

fn run_windowed(
    mut simulation: Simulation,
    layout: CockpitLayout,
    seed: u64,
    args: &Args,
) -> Result<()> {
    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .with_layout(layout)
        .with_noise_seed(seed);
    let presentation = Presentation::new("Haunted Dreams", Color::BLACK, simulation.scene());

    backend.run(presentation, move |dt, input, scene| {
        simulation.advance(dt, &input);
        simulation.populate_scene(scene);
    })
}
