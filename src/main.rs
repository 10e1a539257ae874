mod config;
mod exit;
mod led_test;
mod notify;
mod poller;
mod predict;
mod proximity;
#[cfg(test)]
mod testing;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crate::config::{Config, Overrides};
use crate::exit::Exit;
use crate::notify::{LedSink, SerialSettings};
use crate::poller::{ConsoleReporter, PollError, PollLoop, PollReporter, SilentReporter};
use crate::predict::OpenNotifyClient;
use crate::proximity::ProximityState;

#[derive(Parser)]
#[command(name = "iss-notify")]
#[command(about = "Physical notifications for upcoming ISS passes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll for upcoming passes and signal how close the next one is
    Watch(WatchArgs),
    /// Cycle the notification device through every state
    LedTest {
        /// Serial port the device is attached to
        #[arg(short, long)]
        serial: String,
        /// Delay between commands, in seconds
        #[arg(short, long, default_value_t = 10)]
        time: u64,
    },
}

#[derive(Args)]
struct WatchArgs {
    /// Latitude of the location to retrieve passes for
    #[arg(short = 't', long, allow_negative_numbers = true)]
    latitude: Option<f64>,
    /// Longitude of the location to retrieve passes for
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    longitude: Option<f64>,
    /// Altitude of the location in metres (default: 1)
    #[arg(short, long, allow_negative_numbers = true)]
    altitude: Option<i64>,
    /// Number of upcoming passes to retrieve (default: 1)
    #[arg(short, long, allow_negative_numbers = true)]
    passes: Option<i64>,
    /// Serial port used to indicate a pass
    #[arg(short, long)]
    serial: Option<String>,
    /// Do not print retrieved pass information
    #[arg(short, long)]
    quiet: bool,
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return Exit::from(&e).into();
        }
    };

    let exit = match cli.command {
        Commands::Watch(args) => watch(args),
        Commands::LedTest { serial, time } => led_test(serial, time),
    };
    exit.into()
}

fn init_logging(default_filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Unable to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

fn watch(args: WatchArgs) -> Exit {
    init_logging(if args.quiet { "warn" } else { "info" });

    let config = match &args.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error reading config {}: {}", path.display(), e);
                return Exit::ConfigFile;
            }
        },
        None => Config::default(),
    };

    let overrides = Overrides {
        latitude: args.latitude,
        longitude: args.longitude,
        altitude_m: args.altitude,
        passes: args.passes,
        serial_device: args.serial,
    };
    let settings = match config.resolve(overrides) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("\nERROR: {}!\n", e);
            return Exit::from(&e);
        }
    };

    let client = match OpenNotifyClient::new(settings.api.url.clone(), settings.api.timeout) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            return Exit::from(&e);
        }
    };

    let sink = match &settings.serial {
        Some(serial) => match LedSink::open(serial) {
            Ok(sink) => sink,
            Err(e) => {
                log::warn!("Serial support disabled. {}", e);
                LedSink::disabled()
            }
        },
        None => LedSink::disabled(),
    };
    let self_test = (sink.is_configured() && !args.quiet).then(|| sink.device().to_string());

    let reporter: Box<dyn PollReporter> = if args.quiet {
        Box::new(SilentReporter)
    } else {
        ConsoleReporter::banner();
        Box::new(ConsoleReporter)
    };

    log::info!(
        "Watching passes over {}, {} ({} m) via {}",
        settings.observer.latitude,
        settings.observer.longitude,
        settings.observer.altitude_m,
        client.url()
    );
    for band in settings.thresholds.bands() {
        log::debug!(
            "{} from {}s, polling every {}",
            band.state,
            band.min,
            humantime::format_duration(band.interval)
        );
    }

    let mut poll_loop = PollLoop::new(client, sink, settings.observer, settings.passes)
        .with_reporter(reporter)
        .with_thresholds(settings.thresholds)
        .with_polling(settings.polling);
    if let Some(device) = self_test {
        poll_loop = poll_loop.with_self_test(device);
    }

    let runtime = match runtime() {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("Unable to start runtime: {}", e);
            return Exit::Unknown;
        }
    };

    let result = runtime.block_on(poll_loop.run(shutdown_signal()));
    log::debug!("Final loop state: {:?}", poll_loop.state());

    match result {
        Ok(()) => {
            println!("\nExiting.");
            Exit::Success
        }
        Err(PollError::GaveUp { attempts, source }) => {
            log::error!("Giving up after {} failed fetches: {}", attempts, source);
            Exit::from(&source)
        }
    }
}

fn led_test(device: String, delay_secs: u64) -> Exit {
    init_logging("info");

    let mut sink = match LedSink::open(&SerialSettings::new(device)) {
        Ok(sink) => sink,
        Err(e) => {
            log::error!("{}", e);
            return Exit::SerialUnavailable;
        }
    };

    let runtime = match runtime() {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("Unable to start runtime: {}", e);
            return Exit::Unknown;
        }
    };

    let sent = runtime.block_on(led_test::cycle_states(
        &mut sink,
        Duration::from_secs(delay_secs),
        shutdown_signal(),
    ));
    log::info!("Sent {} of {} states", sent, ProximityState::ALL.len());
    println!("Exiting.");
    Exit::Success
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("iss-notify").chain(args.iter().copied()))
    }

    #[test]
    fn watch_accepts_negative_coordinates() {
        let cli = parse(&["watch", "-t", "-33.87", "-n", "151.21", "-p", "3", "-q"]).unwrap();
        let Commands::Watch(args) = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(args.latitude, Some(-33.87));
        assert_eq!(args.longitude, Some(151.21));
        assert_eq!(args.passes, Some(3));
        assert!(args.quiet);
        assert!(args.serial.is_none());
    }

    #[test]
    fn non_numeric_value_maps_to_its_own_code() {
        let err = parse(&["watch", "-t", "north", "-n", "1"]).err().unwrap();
        assert_eq!(Exit::from(&err), Exit::NotNumeric);
    }

    #[test]
    fn unknown_option_is_bad_option() {
        let err = parse(&["watch", "--bogus"]).err().unwrap();
        assert_eq!(Exit::from(&err), Exit::BadOption);
    }

    #[test]
    fn help_exits_cleanly() {
        let err = parse(&["watch", "--help"]).err().unwrap();
        assert_eq!(Exit::from(&err), Exit::Success);
    }

    #[test]
    fn led_test_requires_serial_port() {
        // Missing port is a usage error; an unopenable one is SerialUnavailable.
        let err = parse(&["led-test"]).err().unwrap();
        assert_eq!(Exit::from(&err), Exit::BadOption);
        assert_eq!(Exit::from(&err) as u8, 1);

        let cli = parse(&["led-test", "-s", "/dev/ttyUSB0"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::LedTest { ref serial, time: 10 } if serial == "/dev/ttyUSB0"
        ));
    }
}
