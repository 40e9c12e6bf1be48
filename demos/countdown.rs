//! Countdown
//!
//! This example drives the two-interval reference run (3 ticks, then 5) by
//! hand, without waiting on the wall clock.
//!
//! Key concepts:
//! - `ManualScheduler` hands out clocks that tick only when asked
//! - The sequence invokes one interval machine at a time
//! - Observers receive one snapshot per handled event
//! - Pausing releases the clock without losing elapsed time
//!
//! Run with: cargo run --example countdown

use metronome::clock::ManualScheduler;
use metronome::sequence::{SequenceEvent, Snapshot};
use metronome::{SequenceState, TimerConfig};
use std::sync::Arc;

fn print_snapshot(snapshot: &Snapshot) {
    match &snapshot.current {
        Some(current) => println!(
            "  {:<8} total {}/{}  {} {}/{} ({} left)",
            snapshot.state,
            snapshot.elapsed,
            snapshot.total_duration,
            current.name,
            current.elapsed,
            current.duration,
            current.remaining
        ),
        None => println!(
            "  {:<8} total {}/{}",
            snapshot.state, snapshot.elapsed, snapshot.total_duration
        ),
    }
}

fn main() {
    println!("=== Countdown Example ===\n");

    let scheduler = ManualScheduler::new();
    let mut timer = TimerConfig::default()
        .build(Arc::new(scheduler.clone()))
        .unwrap();
    timer.subscribe(print_snapshot);

    println!("Starting:");
    timer.send(SequenceEvent::Start);

    println!("\nTicking into the first interval:");
    for _ in 0..2 {
        if let Some(clock) = scheduler.current() {
            timer.send(SequenceEvent::Tick(clock));
        }
    }

    println!("\nPausing (active clocks: {}):", scheduler.active_count());
    timer.send(SequenceEvent::Pause);
    println!("  active clocks while paused: {}", scheduler.active_count());

    println!("\nResuming and ticking to the end:");
    timer.send(SequenceEvent::Resume);
    while let Some(clock) = scheduler.current() {
        timer.send(SequenceEvent::Tick(clock));
    }

    assert_eq!(timer.state(), SequenceState::Complete);

    let path: Vec<String> = timer
        .history()
        .get_path()
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    println!("\nPath: {}", path.join(" -> "));
    println!(
        "Clocks started: {}, peak active: {}",
        scheduler.started_count(),
        scheduler.peak_active()
    );

    println!("\n=== Example Complete ===");
}
