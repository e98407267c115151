use solsim::{ScenarioConfig, Scenario, Screen};
use solsim::run_3d;
use solsim::{bench_textures, bench_tick};

use clap::Parser;
use anyhow::Result;

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file, looked up in `scenarios/` unless it is an existing path
    #[arg(short, long, default_value = "solar_system.yaml")]
    file_name: String,

    /// Fixed RNG seed, overrides the scenario
    #[arg(long)]
    seed: Option<u64>,

    /// Texture edge length in pixels, overrides the scenario
    #[arg(long)]
    texture_size: Option<usize>,

    /// Run this many fixed ticks without a window and print a summary
    #[arg(long)]
    headless: Option<u32>,

    /// Time texture synthesis and ticking instead of opening the viewer
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(args: &Args) -> Result<ScenarioConfig> {
    let direct = PathBuf::from(&args.file_name);
    let config_path = if direct.is_file() {
        direct
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(&args.file_name)
    };

    let mut scenario_cfg = ScenarioConfig::load(&config_path)?;
    if let Some(seed) = args.seed {
        scenario_cfg.parameters.seed = Some(seed);
    }
    if let Some(size) = args.texture_size {
        scenario_cfg.parameters.texture_size = size;
    }
    Ok(scenario_cfg)
}

fn run_headless(mut scenario: Scenario, ticks: u32) {
    scenario.goto(Screen::Simulation);
    let dt = scenario.parameters.tick_dt();
    for _ in 0..ticks {
        scenario.tick(dt);
    }

    let snap = scenario.snapshot();
    println!("after {ticks} ticks ({:.2} s):", ticks as f64 * dt);
    for body in &snap.bodies {
        println!(
            "{:>8}: pos ({:8.3}, {:8.3}, {:8.3}) rot {:6.1} trail {}",
            body.name, body.position.x, body.position.y, body.position.z, body.rotation_angle, body.trail.len()
        );
    }
    let eye = snap.camera.eye;
    println!("camera: {} eye ({:.2}, {:.2}, {:.2})", snap.hud.camera_label, eye.x, eye.y, eye.z);
}

fn main() -> Result<()> {
    let args = Args::parse();
    let scenario_cfg = load_scenario_from_yaml(&args)?;

    if args.bench {
        bench_textures()?;
        bench_tick(&scenario_cfg)?;
        return Ok(());
    }

    // textures are synthesized here, before the first frame can need them
    let scenario = Scenario::build_scenario(scenario_cfg)?;

    match args.headless {
        Some(ticks) => run_headless(scenario, ticks),
        None => run_3d(scenario),
    }

    Ok(())
}
