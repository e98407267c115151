use std::time::Instant;

use anyhow::Result;

use crate::configuration::config::ScenarioConfig;
use crate::simulation::scenario::Scenario;
use crate::simulation::screen::Screen;
use crate::simulation::texture::{registered_names, synthesize};

pub fn bench_textures() -> Result<()> {
    // Different texture edge lengths to test
    let sizes = [64, 128, 256, 512];

    for size in sizes {
        let t0 = Instant::now();
        let mut bytes = 0;
        for name in registered_names() {
            bytes += synthesize(name, size)?.len();
        }
        let dt = t0.elapsed().as_secs_f64();

        println!("size = {size:4}, all textures = {dt:8.4} s, {bytes} bytes");
    }
    Ok(())
}

pub fn bench_tick(base: &ScenarioConfig) -> Result<()> {
    // Test different belt populations
    let counts = [200, 1_000, 5_000, 20_000];
    let ticks = 600;

    for count in counts {
        let mut cfg = base.clone();
        cfg.asteroids.count = count;
        cfg.parameters.texture_size = 8; // textures are not what we time here
        cfg.parameters.seed = Some(42);

        let mut scenario = Scenario::build_scenario(cfg)?;
        scenario.goto(Screen::Simulation);
        let dt = scenario.parameters.tick_dt();

        let t0 = Instant::now();
        for _ in 0..ticks {
            scenario.tick(dt);
        }
        let elapsed = t0.elapsed().as_secs_f64();

        println!(
            "asteroids = {count:6}, {ticks} ticks = {elapsed:8.4} s, {:8.3} us/tick",
            elapsed * 1e6 / ticks as f64
        );
    }
    Ok(())
}
