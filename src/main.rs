use gravsim::{bench_gravity, bench_tick};
use gravsim::{Scenario, SharedPhysics};

use anyhow::Result;
use clap::Parser;
use log::{info, warn};

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, default_value = "solar_system.yaml")]
    file_name: String,

    /// Number of physics ticks to run
    #[arg(short = 'n', default_value_t = 10_000)]
    ticks: u64,

    /// Log a system report every this many ticks
    #[arg(short = 'r', default_value_t = 1_000)]
    report_every: u64,

    /// Run the benchmarks instead of a simulation
    #[arg(long)]
    bench: bool,

    /// Log every tick
    #[arg(long)]
    verbose: bool,
}

fn init_logging(verbose: bool) -> Result<()> {
    use simplelog::LevelFilter::{Debug, Info, Off};
    simplelog::TermLogger::init(
        if verbose { Debug } else { Info },
        simplelog::ConfigBuilder::new()
            .set_target_level(Off)
            .set_location_level(Off)
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;
    Ok(())
}

// load here to keep main clean; an unreadable scenario falls back to the default system
fn load_scenario(file_name: &str) -> Result<Scenario> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(file_name);

    match Scenario::load(&config_path) {
        Ok(scenario) => Ok(scenario),
        Err(e) => {
            warn!(
                "could not load {}: {e}; using the default system",
                config_path.display()
            );
            Ok(Scenario::default_system()?)
        }
    }
}

fn report(physics: &SharedPhysics) -> Result<()> {
    let (ticks, duration, energy, momentum) = physics.with(|p| {
        (
            p.ticks(),
            p.duration(),
            p.total_energy(),
            p.total_momentum().norm(),
        )
    })?;
    info!("tick {ticks} (t = {duration:.3}): E = {energy:.6e}, |P| = {momentum:.6e}");
    for body in physics.snapshot()? {
        info!(
            "  {} ({}): m = {:.4e}, r = {:.4e}, x = [{:.3}, {:.3}, {:.3}]",
            body.name,
            body.id,
            body.mass,
            body.radius,
            body.position.x,
            body.position.y,
            body.position.z
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    if args.bench {
        bench_gravity()?;
        bench_tick()?;
        return Ok(());
    }

    let scenario = load_scenario(&args.file_name)?;
    info!(
        "{} bodies, G = {}, dt = {}, integrator = {}",
        scenario.bodies.len(),
        scenario.parameters.gravity,
        scenario.parameters.dt,
        scenario.parameters.integrator.name()
    );
    let physics = SharedPhysics::new(scenario.into_physics()?);
    let done = AtomicBool::new(false);

    // physics on its own thread; this thread only reads between ticks
    thread::scope(|s| -> Result<()> {
        let worker = s.spawn(|| -> gravsim::Result<()> {
            let result = (0..args.ticks).try_for_each(|_| physics.tick().map(|_| ()));
            done.store(true, Ordering::Release);
            result
        });

        let mut last_reported = 0;
        while !done.load(Ordering::Acquire) {
            let ticks = physics.with(|p| p.ticks())?;
            if args.report_every > 0 && ticks >= last_reported + args.report_every {
                report(&physics)?;
                last_reported = ticks;
            }
            thread::sleep(Duration::from_millis(10));
        }

        match worker.join() {
            Ok(result) => result?,
            Err(_) => anyhow::bail!("physics thread panicked"),
        }
        Ok(())
    })?;

    report(&physics)?;
    Ok(())
}
