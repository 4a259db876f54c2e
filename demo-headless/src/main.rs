use clap::Parser;
use flock_sim_core::{Boid, Flock, FlockConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

/// Flocking simulation demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "flock-sim-demo")]
#[command(about = "Headless boid flocking simulation demo", long_about = None)]
struct Args {
    /// Number of boids in the flock
    #[arg(short, long, default_value_t = 8)]
    boids: usize,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 1000)]
    frames: u64,

    /// Seed for the random generator (spawn and gusts)
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Perception radius (how far a boid notices others)
    #[arg(long, default_value_t = 1.35)]
    perception: f64,

    /// Minimum separation distance
    #[arg(long, default_value_t = 0.6)]
    separation: f64,

    /// Flock speed (speed cap and bounce velocity)
    #[arg(long, default_value_t = 0.16)]
    speed: f64,

    /// World half-extent
    #[arg(long, default_value_t = 4.5)]
    range: f64,

    /// Gust speed scale
    #[arg(long, default_value_t = 0.1)]
    wind_magnitude: f64,

    /// Circle the central attractor
    #[arg(short, long)]
    circle: bool,

    /// Enable intermittent wind gusts
    #[arg(short, long)]
    wind: bool,

    /// Enable ground perching
    #[arg(short, long)]
    perch: bool,

    /// Report interval in frames (at least 1)
    #[arg(short, long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    report_interval: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = FlockConfig {
        perception_radius: args.perception,
        min_separation: args.separation,
        flock_speed: args.speed,
        flock_range: args.range,
        wind_magnitude: args.wind_magnitude,
        circle_attractor: args.circle,
        wind_enabled: args.wind,
        perch_enabled: args.perch,
    };
    if let Err(err) = config.validate() {
        eprintln!("invalid configuration: {err}");
        std::process::exit(1);
    }

    println!("=== Flock Simulation Demo ===\n");
    println!(
        "{} boids, range ±{:.1}, speed cap {:.2}, perception {:.2}",
        args.boids, config.flock_range, config.flock_speed, config.perception_radius
    );
    println!(
        "attractor: {}, wind: {}, perching: {}\n",
        on_off(config.circle_attractor),
        on_off(config.wind_enabled),
        on_off(config.perch_enabled)
    );

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut flock = Flock::with_random_boids(args.boids, &mut rng);

    println!("Frame   | Perching | Gusting | Avg speed | Centroid (x, y, z)");
    println!("--------|----------|---------|-----------|--------------------------");

    for _ in 0..args.frames {
        flock.step(&config, &mut rng);

        if flock.frame() % args.report_interval == 0 {
            report(&flock);
        }
    }

    println!("\n=== Simulation Complete ===");
    println!("Final frame: {}", flock.frame());
    report(&flock);
}

fn report(flock: &Flock) {
    let n = flock.len() as f64;
    let perching = flock.boids().iter().filter(|b| b.is_perching()).count();
    let avg_speed = flock
        .boids()
        .iter()
        .map(|b| b.velocity().norm())
        .sum::<f64>()
        / n;
    let centroid = flock
        .boids()
        .iter()
        .map(Boid::position)
        .sum::<flock_sim_core::Vec3>()
        / n;

    println!(
        "{:7} | {:8} | {:7} | {:9.4} | ({:6.2}, {:6.2}, {:6.2})",
        flock.frame(),
        perching,
        if flock.wind().gusting() { "yes" } else { "no" },
        avg_speed,
        centroid.x,
        centroid.y,
        centroid.z
    );
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_report_interval_is_rejected_at_parse_time() {
        assert!(Args::try_parse_from(["flock-sim-demo", "--report-interval", "0"]).is_err());
    }

    #[test]
    fn report_interval_defaults_to_a_usable_value() {
        let args = Args::try_parse_from(["flock-sim-demo"]).unwrap();
        assert_eq!(args.report_interval, 100);
    }
}
