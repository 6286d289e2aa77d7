//! UAV Coverage Learning Simulation
//!
//! A team of aerial base stations repositions itself over a bounded grid
//! to serve ground users, learning from a leave-one-out marginal
//! contribution reward through a softmax action policy.

use bevy_ecs::prelude::*;
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::fs;
use std::path::Path;

use coverage_core::components::{
    ActionSet, ChosenActions, PreferenceTable, UavPositions, UserPositions,
};
use coverage_core::config::{Config, DEFAULT_TUNING_PATH};
use coverage_core::output::{self, SnapshotGenerator};
use coverage_core::setup;
use coverage_core::systems::{
    apply_chosen_actions, build_assignments, compute_contributions, global_utility,
    select_uav_actions, update_preference_table, Assignments, ContributionRecord, StepEvents,
    StepStatus,
};
use coverage_core::{SimRng, SimulationState};
use coverage_events::EventType;

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "coverage_sim")]
#[command(about = "UAV coverage learning simulation")]
struct Args {
    /// Random seed for reproducibility (overrides the tuning file)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of decision steps to simulate (overrides the tuning file)
    #[arg(long)]
    steps: Option<u64>,

    /// Path to the tuning file
    #[arg(long, default_value = DEFAULT_TUNING_PATH)]
    config: String,

    /// Interval between state snapshots, in steps (overrides the tuning file)
    #[arg(long)]
    snapshot_interval: Option<u64>,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn main() {
    let args = Args::parse();
    init_tracing();

    let mut config = if Path::new(&args.config).exists() {
        match Config::load(&args.config) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: could not load {}: {}", args.config, e);
                std::process::exit(1);
            }
        }
    } else {
        eprintln!(
            "Warning: tuning file {} not found. Using defaults.",
            args.config
        );
        Config::default()
    };

    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(steps) = args.steps {
        config.simulation.steps = steps;
    }
    if let Some(interval) = args.snapshot_interval {
        config.simulation.snapshot_interval = interval;
    }

    if let Err(e) = config.validate() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let steps = config.simulation.steps;
    let num_users = config.world.num_users;

    println!("UAV Coverage Simulation");
    println!("=======================");
    println!("Seed: {}", config.simulation.seed);
    println!("Steps: {}", steps);
    println!("Grid: {0} x {0}", config.world.grid_size);
    println!(
        "UAVs: {}, Users: {}, Coverage radius: {}",
        config.world.num_uavs, num_users, config.coverage.coverage_radius
    );
    println!();

    fs::create_dir_all("output/snapshots").unwrap_or_else(|e| {
        eprintln!("Warning: Could not create output directories: {}", e);
    });

    // Seed the generator and place the fleet and the users
    let mut rng = SmallRng::seed_from_u64(config.simulation.seed);
    let (uav_positions, user_positions) = setup::initialize_positions(
        &mut rng,
        config.world.grid_size,
        config.world.num_uavs,
        num_users,
    );
    println!(
        "Placed {} UAVs and {} users",
        uav_positions.len(),
        user_positions.len()
    );

    // Initialize the ECS world
    let mut world = World::new();
    world.insert_resource(SimulationState {
        current_step: 0,
        max_steps: steps,
    });
    world.insert_resource(SimRng(rng));
    world.insert_resource(UavPositions::new(uav_positions));
    world.insert_resource(UserPositions::new(user_positions));
    world.insert_resource(ActionSet::new(config.learning.actions.clone()));
    world.insert_resource(PreferenceTable::zeros(
        config.world.num_uavs,
        config.learning.actions.len(),
    ));
    world.insert_resource(Assignments::empty(config.world.num_uavs));
    world.insert_resource(ContributionRecord::empty(config.world.num_uavs));
    world.insert_resource(ChosenActions::default());
    world.insert_resource(StepEvents::new());
    world.insert_resource(StepStatus::default());
    world.insert_resource(SnapshotGenerator::new(config.simulation.snapshot_interval));
    world.insert_resource(config);

    // The decision chain is strictly ordered: assignment feeds the credit
    // signal, which feeds learning, which feeds the draw, which moves the
    // fleet.
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            build_assignments,
            compute_contributions,
            update_preference_table,
            select_uav_actions,
            apply_chosen_actions,
        )
            .chain(),
    );

    // Initial snapshot before any learning has happened
    let initial_snapshot = output::generate_snapshot(&mut world, "simulation_start");
    if let Err(e) = output::write_snapshot_to_dir(&initial_snapshot) {
        eprintln!("Warning: Could not write initial snapshot: {}", e);
    }
    if let Err(e) = output::write_current_state(&initial_snapshot) {
        eprintln!("Warning: Could not write current state: {}", e);
    }

    println!();
    println!("Starting simulation...");
    println!();

    for step in 0..steps {
        world.resource_mut::<SimulationState>().current_step = step;

        schedule.run(&mut world);

        // A validation or softmax failure stops the run; continuing would
        // mean learning from undefined state.
        if let Some(error) = world.resource::<StepStatus>().error.clone() {
            eprintln!("Error at step {}: {}", step, error);
            std::process::exit(1);
        }

        if step % 10 == 0 {
            let max_steps = world.resource::<SimulationState>().max_steps;
            let served = global_utility(world.resource::<Assignments>());
            let blocked = world
                .resource::<StepEvents>()
                .events
                .iter()
                .filter(|e| e.event_type == EventType::MoveBlocked)
                .count();
            println!(
                "[Step {:>4}/{}] serving {} / {} users ({} moves blocked)",
                step, max_steps, served, num_users, blocked
            );
        }

        world.resource_mut::<StepEvents>().clear();

        if world.resource::<SnapshotGenerator>().should_snapshot(step) {
            let snapshot = output::generate_snapshot(&mut world, "periodic");
            if let Err(e) = output::write_snapshot_to_dir(&snapshot) {
                eprintln!("Warning: Could not write snapshot at step {}: {}", step, e);
            }
            if let Err(e) = output::write_current_state(&snapshot) {
                eprintln!(
                    "Warning: Could not write current state at step {}: {}",
                    step, e
                );
            }
            world.resource_mut::<SnapshotGenerator>().mark_snapshot(step);
        }
    }

    let final_snapshot = output::generate_snapshot(&mut world, "simulation_end");
    if let Err(e) = output::write_snapshot_to_dir(&final_snapshot) {
        eprintln!("Warning: Could not write final snapshot: {}", e);
    }
    if let Err(e) = output::write_current_state(&final_snapshot) {
        eprintln!("Warning: Could not write final current state: {}", e);
    }

    let served = global_utility(world.resource::<Assignments>());
    println!();
    println!(
        "Simulation complete. Ran {} steps; serving {} of {} users.",
        steps, served, num_users
    );

    let generator = world.resource::<SnapshotGenerator>();
    println!("Generated {} snapshots.", generator.snapshot_count());
}
