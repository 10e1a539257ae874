use std::time::Duration;

use chrono::{DateTime, Local, Utc};

use crate::predict::{FetchError, Pass};
use crate::proximity::ProximityState;

const RULE: &str = "-----------------------------------------------------";
const ASCTIME: &str = "%a %b %e %H:%M:%S %Y";

/// Presentation hooks for the poll loop. Every method defaults to doing nothing.
pub trait PollReporter {
    fn on_self_test(&mut self, _device: &str, _pause: Duration) {}

    /// Passes from a consistent fetch, with the wait chosen for them.
    fn on_passes(&mut self, _passes: &[Pass], _now: i64, _interval: Duration) {}

    /// The next pass has already started.
    fn on_overhead(&mut self) {}

    fn on_transition(&mut self, _from: ProximityState, _to: ProximityState) {}

    fn on_no_data(&mut self, _error: Option<&FetchError>, _retry: Duration) {}

    fn on_count_mismatch(&mut self, _expected: u32, _received: usize, _retry: Duration) {}
}

/// Reporter for quiet mode
pub struct SilentReporter;

impl PollReporter for SilentReporter {}

/// Prints a human readable account of each fetch to stdout
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn banner() {
        println!();
        println!("ISS Notifications");
        println!("=================");
        println!();
    }
}

impl PollReporter for ConsoleReporter {
    fn on_self_test(&mut self, device: &str, pause: Duration) {
        println!(
            "Using serial port: {} - testing. Wait {}.",
            device,
            humantime::format_duration(pause)
        );
        println!();
        println!("{RULE}");
    }

    fn on_passes(&mut self, passes: &[Pass], now: i64, interval: Duration) {
        for (idx, pass) in passes.iter().enumerate() {
            println!();
            println!("Pass #{}:", idx + 1);
            println!();
            println!("Current time (Local):\t{}", Local::now().format(ASCTIME));
            match DateTime::<Utc>::from_timestamp(pass.rise_time, 0) {
                Some(rise) => {
                    println!(
                        "Pass time (Local):\t{}",
                        rise.with_timezone(&Local).format(ASCTIME)
                    );
                    println!("Pass time (UTC):\t{}", rise.format(ASCTIME));
                }
                None => println!("Pass time:\t\t{} (out of range)", pass.rise_time),
            }
            println!("Duration:\t\t{} seconds", pass.duration);
            println!("Difference:\t\t{} seconds", pass.time_to_pass(now));
            println!("Update:\t\t\t{} seconds", interval.as_secs());
            println!();
            println!("{RULE}");
        }
    }

    fn on_overhead(&mut self) {
        println!();
        println!("ISS is currently overhead!");
        println!();
        println!("{RULE}");
    }

    fn on_no_data(&mut self, error: Option<&FetchError>, retry: Duration) {
        println!();
        match error {
            Some(e) => println!("WARNING: Failed to retrieve pass data: {e}"),
            None => println!("WARNING: No pass data available!"),
        }
        println!();
        println!("Retry in {} seconds", retry.as_secs());
        println!();
        println!("{RULE}");
    }

    fn on_count_mismatch(&mut self, expected: u32, received: usize, retry: Duration) {
        println!();
        println!("WARNING: Incorrect number of passes retrieved! (expected {expected}, got {received})");
        println!();
        println!("Retry in {} seconds", retry.as_secs());
        println!();
        println!("{RULE}");
    }
}
