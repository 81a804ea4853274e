//! Ember CLI - inspect and run particle descriptors headlessly

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ember_particles::{ParticleRng, ParticleSystem, ParticleSystemInfo};

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Particle descriptor tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a descriptor (.psi binary or .toml) and print it as TOML
    Show {
        /// Path to the descriptor file
        descriptor: String,
    },

    /// Run a headless simulation and print live counts over time
    Run {
        /// Path to the descriptor file
        descriptor: String,

        /// How long to simulate, in seconds
        #[arg(long, default_value_t = 5.0)]
        seconds: f32,

        /// Simulation step, in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,

        /// RNG seed
        #[arg(long, default_value_t = 0xDEAD_BEEF)]
        seed: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Show { descriptor } => show(&descriptor),
        Commands::Run {
            descriptor,
            seconds,
            dt,
            seed,
        } => run(&descriptor, seconds, dt, seed),
    }
}

fn load_info(path: &str) -> Result<ParticleSystemInfo> {
    ParticleSystemInfo::load(path).with_context(|| format!("loading descriptor {path}"))
}

fn show(path: &str) -> Result<()> {
    let info = load_info(path)?;
    print!("{}", info.to_toml_string()?);
    Ok(())
}

fn run(path: &str, seconds: f32, dt: f32, seed: u32) -> Result<()> {
    anyhow::ensure!(dt > 0.0, "--dt must be positive");
    anyhow::ensure!(seconds > 0.0, "--seconds must be positive");

    let info = load_info(path)?;
    let mut system = ParticleSystem::new(info, ParticleRng::new(seed));
    system.track_bounds(true);
    system.fire_at(0.0, 0.0);

    println!("[ember] Running {path} for {seconds}s at dt={dt}");

    let mut elapsed = 0.0f32;
    let mut next_report = 0.0f32;
    while elapsed < seconds {
        system.update(dt);
        elapsed += dt;

        if elapsed >= next_report {
            let bounds = system.bounds();
            if bounds.is_empty() {
                println!("[ember] t={elapsed:6.2}s alive={:4}", system.alive_count());
            } else {
                println!(
                    "[ember] t={elapsed:6.2}s alive={:4} bounds=({:.1}, {:.1})..({:.1}, {:.1})",
                    system.alive_count(),
                    bounds.min.x,
                    bounds.min.y,
                    bounds.max.x,
                    bounds.max.y
                );
            }
            next_report += 0.5;
        }
    }

    println!(
        "[ember] Done: {} particle(s) still alive after {elapsed:.2}s",
        system.alive_count()
    );
    Ok(())
}
