//! City Grid Controller
//!
//! Builds a small grid of intersections, runs the signals through a few
//! cycles and prints the resulting snapshot.
//!
//! Key concepts:
//! - Downward ownership (system -> intersection -> signal)
//! - Explicit logical time via ticks
//! - Synchronizing an intersection to its first signal
//! - Emergency preemption
//!
//! Run with: RUST_LOG=debug cargo run --example city_grid

use tracing_subscriber::EnvFilter;
use traffic_control::config::{AdvanceMode, ControlConfig};
use traffic_control::{Phase, TrafficSystem};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("=== City Grid Controller ===\n");

    let config = ControlConfig::builder()
        .default_timing(30, 5, 25)
        .advance_mode(AdvanceMode::DecrementThenSync)
        .build()?;
    let mut system = TrafficSystem::with_config("main-controller", config);

    let north_south = system.create_intersection().id().to_string();
    let east_west = system.create_intersection().id().to_string();
    let ns = system.add_default_signal(&north_south)?.id().to_string();
    system.add_signal(&north_south, 30, 5, 25)?;
    let ew = system.add_signal(&east_west, 25, 5, 30)?.id().to_string();

    println!("Created {} intersections with {} signals\n", system.intersection_count(), system.signal_count());

    println!("Ticking {ns} and {ew} by 10s:");
    system.tick_signal(&north_south, &ns, 10)?;
    system.tick_signal(&east_west, &ew, 10)?;
    print_phases(&system);

    println!("\nAdvancing the whole grid 20s at a time:");
    for step in 1..=4 {
        system.advance(20)?;
        println!("  step {step}");
        print_phases(&system);
    }

    println!("\nEmergency vehicle approaching {ew}:");
    system.handle_emergency(&east_west, &ew);
    print_phases(&system);
    system.clear_emergency(&east_west, &ew);

    println!("\nShutting the grid down:");
    system.set_enabled(false);
    let phase = system.tick_signal(&north_south, &ns, 1_000)?;
    println!("  tick while disabled changed phase: {}", phase.is_some());

    println!("\nFinal snapshot:");
    println!("{}", system.status().to_json()?);

    println!("\n=== Example Complete ===");
    Ok(())
}

fn print_phases(system: &TrafficSystem) {
    for intersection in system.intersections() {
        for signal in intersection.signals() {
            let marker = if signal.phase() == Phase::Green { "go" } else { "stop" };
            println!(
                "    {}/{}: {} ({}s left, {marker})",
                intersection.id(),
                signal.id(),
                signal.phase(),
                signal.remaining()
            );
        }
    }
}
