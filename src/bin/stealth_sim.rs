//! Headless stealth patrol simulation
//!
//! A ring of guards watches an intruder sneaking through their patrol
//! area. Raw sightings and footstep sounds are fed into the perception
//! engine every frame; the run prints alert transitions as they happen
//! and a stats snapshot at the end.

use std::path::PathBuf;

use ahash::AHashMap;
use clap::Parser;
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use vigil::alert::AlertTransition;
use vigil::coordinator::PerceptionCoordinator;
use vigil::core::config::PerceptionConfig;
use vigil::core::types::{AgentId, TargetId};
use vigil::host::PerceptionHost;
use vigil::perception::channel::DetectionChannel;
use vigil::perception::TargetObservation;

#[derive(Parser, Debug)]
#[command(name = "stealth_sim", about = "Headless guard-patrol perception demo")]
struct Args {
    /// Number of guards in the patrol ring
    #[arg(long, default_value_t = 8)]
    guards: usize,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 60.0)]
    duration: f32,

    /// Frame step in seconds
    #[arg(long, default_value_t = 1.0 / 30.0)]
    dt: f32,

    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for guard placement and intruder movement
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print the final stats snapshot as JSON
    #[arg(long)]
    json: bool,
}

struct PatrolHost {
    positions: AHashMap<AgentId, Vec3>,
    intruder: TargetId,
    intruder_stealth: f32,
    sim_time: f64,
    transitions: Vec<(f64, AgentId, AlertTransition)>,
    detections: usize,
}

impl PerceptionHost for PatrolHost {
    fn agent_position(&self, agent: AgentId) -> Option<Vec3> {
        self.positions.get(&agent).copied()
    }

    fn stealth_level(&self, target: TargetId) -> Option<f32> {
        (target == self.intruder).then_some(self.intruder_stealth)
    }

    fn detection_occurred(&mut self) {
        self.detections += 1;
    }

    fn alert_changed(&mut self, agent: AgentId, transition: AlertTransition) {
        tracing::info!(
            t = format!("{:.1}s", self.sim_time),
            ?agent,
            from = ?transition.from,
            to = ?transition.to,
            "alert transition"
        );
        self.transitions.push((self.sim_time, agent, transition));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match PerceptionConfig::load_from_path(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::error!(%err, "failed to load configuration");
                std::process::exit(1);
            }
        },
        None => PerceptionConfig::default(),
    };

    let mut coordinator = match PerceptionCoordinator::new(config) {
        Ok(coordinator) => coordinator,
        Err(err) => {
            tracing::error!(%err, "failed to build engine");
            std::process::exit(1);
        }
    };

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let intruder = TargetId::new();
    let mut host = PatrolHost {
        positions: AHashMap::new(),
        intruder,
        intruder_stealth: 0.7,
        sim_time: 0.0,
        transitions: Vec::new(),
        detections: 0,
    };

    // Guards on a ring around the origin, inside cooperative range of
    // their neighbors
    let radius = 12.0;
    let mut guards = Vec::with_capacity(args.guards);
    for i in 0..args.guards {
        let guard = AgentId::new();
        let angle = i as f32 / args.guards as f32 * std::f32::consts::TAU;
        host.positions
            .insert(guard, Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin()));
        if let Err(err) = coordinator.register(guard) {
            tracing::error!(%err, "guard registration failed");
            std::process::exit(1);
        }
        guards.push(guard);
    }

    tracing::info!(
        guards = args.guards,
        duration = args.duration,
        "patrol simulation starting"
    );

    // The intruder drifts across the patrol area, occasionally making
    // noise; nearby guards get sightings every frame
    let mut intruder_pos = Vec3::new(-25.0, 0.0, 0.0);
    let mut elapsed = 0.0f32;
    while elapsed < args.duration {
        intruder_pos.x += 1.2 * args.dt;
        intruder_pos.z = (elapsed * 0.3).sin() * 6.0;

        for &guard in &guards {
            let guard_pos = host.positions[&guard];
            let distance = guard_pos.distance(intruder_pos);
            if distance < 10.0 {
                let strength = 1.0 - distance / 10.0;
                let observation = TargetObservation::new(intruder, intruder_pos);
                coordinator.on_detection(
                    &mut host,
                    guard,
                    &observation,
                    DetectionChannel::Visual,
                    strength,
                );
            }
        }

        // Footsteps: a burst of noise everyone within earshot can roll on
        if rng.gen::<f32>() < 0.02 {
            for &guard in &guards {
                let guard_pos = host.positions[&guard];
                let distance = guard_pos.distance(intruder_pos);
                if distance < 18.0 {
                    let strength = 1.0 - distance / 18.0;
                    let observation =
                        TargetObservation::new(intruder, intruder_pos).with_confidence(0.6);
                    coordinator.on_detection(
                        &mut host,
                        guard,
                        &observation,
                        DetectionChannel::Auditory,
                        strength,
                    );
                }
            }
        }

        coordinator.tick(&mut host, args.dt);
        elapsed += args.dt;
        host.sim_time = f64::from(elapsed);
    }

    let stats = coordinator.performance_stats();
    if args.json {
        match serde_json::to_string_pretty(&stats) {
            Ok(json) => println!("{json}"),
            Err(err) => tracing::error!(%err, "stats serialization failed"),
        }
    } else {
        println!("\n=== Patrol summary ===");
        println!("Simulated:            {:.1}s", args.duration);
        println!("Detections processed: {}", host.detections);
        println!("Alert transitions:    {}", host.transitions.len());
        println!("Average suspicion:    {:.3}", stats.average_suspicion);
        println!("Live share records:   {}", stats.share_records);
        for &guard in &guards {
            println!(
                "  guard {:?}: suspicion {:.3}, level {:?}",
                guard,
                coordinator.suspicion_of(guard),
                coordinator.alert_level_of(guard),
            );
        }
    }
}
