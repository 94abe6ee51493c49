use std::time::Instant;

use crate::error::Result;
use crate::simulation::forces::{ForceCalculator, NewtonianGravity};
use crate::simulation::integrator::Integrator;
use crate::simulation::params::Parameters;
use crate::simulation::physics::Physics;
use crate::simulation::states::Body;
use crate::simulation::vector::NVec3;

/// Helper to build `n` small, well separated bodies on a deterministic
/// pseudo-random cloud (no rand needed)
fn make_bodies(n: usize) -> Result<Vec<Body>> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            let x = NVec3::new(
                (i_f * 0.37).sin() * 500.0,
                (i_f * 0.13).cos() * 500.0,
                (i_f * 0.07).sin() * 500.0,
            );
            Body::builder()
                .name(format!("Body {i}"))
                .position(x)
                .mass(1.0)
                .density(1.0e3)
                .build()
        })
        .collect()
}

/// Time one direct force evaluation for growing N
pub fn bench_gravity() -> Result<()> {
    let ns = [200, 400, 800, 1600, 3200];
    let gravity = NewtonianGravity { gravity: 0.1 };

    for n in ns {
        let bodies = make_bodies(n)?;
        let mut out = vec![NVec3::zeros(); n];

        // Warm up
        gravity.accumulate_forces(&bodies, &mut out);

        let t0 = Instant::now();
        gravity.accumulate_forces(&bodies, &mut out);
        let dt_direct = t0.elapsed().as_secs_f64();

        println!("N = {n:5}, direct = {dt_direct:8.6} s");
    }
    Ok(())
}

/// Time full ticks (predict, detect, finalize) for every integrator
pub fn bench_tick() -> Result<()> {
    let ns = [100, 200, 400, 800, 1600];
    let steps = 3; // ticks averaged per measurement
    let integrators = [
        Integrator::ExplicitEuler,
        Integrator::SymplecticEuler,
        Integrator::Verlet,
    ];

    println!("N,integrator,ms_per_tick,merges");
    for n in ns {
        for integrator in integrators {
            let params = Parameters::new(0.1, 0.001)?.with_integrator(integrator);
            let mut physics = Physics::new(make_bodies(n)?, params)?;

            // Warm-up one tick
            physics.update_bodies();

            let mut merges = 0;
            let t0 = Instant::now();
            for _ in 0..steps {
                merges += physics.update_bodies().merges;
            }
            let ms = t0.elapsed().as_secs_f64() * 1000.0 / steps as f64;

            println!("{},{},{:.6},{}", n, integrator.name(), ms, merges);
        }
    }
    Ok(())
}
