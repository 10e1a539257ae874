use std::future::Future;
use std::time::Duration;

use chrono::Utc;

use crate::config::PollingConfig;
use crate::notify::NotificationSink;
use crate::poller::{PollError, PollReporter, SilentReporter};
use crate::predict::{FetchError, Observer, Pass, PassSource};
use crate::proximity::{ProximityState, ThresholdTable};

/// What the loop remembers between polls
#[derive(Debug, Clone, PartialEq)]
pub struct LoopState {
    /// Last state handed to the sink. Starts as `Test` so the first
    /// classification is always emitted.
    pub last_emitted: ProximityState,
    /// Most recent pass seen before it started
    pub last_pass: Option<Pass>,
    /// `None` until a pass has been classified or seen overhead
    pub current: Option<ProximityState>,
}

impl Default for LoopState {
    fn default() -> Self {
        Self {
            last_emitted: ProximityState::Test,
            last_pass: None,
            current: None,
        }
    }
}

/// Polls a pass source and drives a notification sink from the result
pub struct PollLoop<S, N> {
    source: S,
    sink: N,
    reporter: Box<dyn PollReporter>,
    location: Observer,
    passes: u32,
    thresholds: ThresholdTable,
    polling: PollingConfig,
    self_test: Option<String>,
    state: LoopState,
    consecutive_failures: u32,
}

impl<S: PassSource, N: NotificationSink> PollLoop<S, N> {
    pub fn new(source: S, sink: N, location: Observer, passes: u32) -> Self {
        Self {
            source,
            sink,
            reporter: Box::new(SilentReporter),
            location,
            passes,
            thresholds: ThresholdTable::default(),
            polling: PollingConfig::default(),
            self_test: None,
            state: LoopState::default(),
            consecutive_failures: 0,
        }
    }

    pub fn with_reporter(mut self, reporter: Box<dyn PollReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_thresholds(mut self, thresholds: ThresholdTable) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_polling(mut self, polling: PollingConfig) -> Self {
        self.polling = polling;
        self
    }

    /// Send `Test` to the sink and pause before the first poll.
    pub fn with_self_test(mut self, device: impl Into<String>) -> Self {
        self.self_test = Some(device.into());
        self
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    #[cfg(test)]
    pub fn sink(&self) -> &N {
        &self.sink
    }

    /// Poll until `shutdown` resolves or fetching is given up on. The sink is
    /// closed either way.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<(), PollError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let result = loop {
            if let Some(device) = self.self_test.take() {
                let pause = self.polling.self_test_pause;
                log::info!("Testing notification device {}", device);
                self.reporter.on_self_test(&device, pause);
                if let Err(e) = self.sink.send(ProximityState::Test) {
                    log::warn!("{}", e);
                }
                tokio::select! {
                    _ = tokio::time::sleep(pause) => {}
                    _ = &mut shutdown => break Ok(()),
                }
            }

            let fetched = tokio::select! {
                fetched = self.source.fetch_passes(&self.location, self.passes) => fetched,
                _ = &mut shutdown => break Ok(()),
            };

            let interval = match self.update(fetched, Utc::now().timestamp()) {
                Ok(interval) => interval,
                Err(e) => break Err(e),
            };
            log::debug!("Next poll in {}", humantime::format_duration(interval));

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = &mut shutdown => break Ok(()),
            }
        };

        self.sink.close();
        result
    }

    /// Advance the state machine with one fetch result observed at `now`
    /// (epoch seconds). Returns how long to wait before polling again.
    pub fn update(
        &mut self,
        fetched: Result<Vec<Pass>, FetchError>,
        now: i64,
    ) -> Result<Duration, PollError> {
        let retry = self.polling.recovery_interval;

        let passes = match fetched {
            Ok(passes) => {
                self.consecutive_failures = 0;
                passes
            }
            Err(e) => {
                self.consecutive_failures += 1;
                log::warn!("Failed to retrieve pass data: {}", e);
                if let Some(max) = self.polling.max_consecutive_failures {
                    if self.consecutive_failures >= max {
                        return Err(PollError::GaveUp {
                            attempts: self.consecutive_failures,
                            source: e,
                        });
                    }
                }
                self.reporter.on_no_data(Some(&e), retry);
                return Ok(retry);
            }
        };

        if passes.is_empty() {
            log::warn!("Prediction service returned no passes");
            self.reporter.on_no_data(None, retry);
            return Ok(retry);
        }

        if passes.len() != self.passes as usize {
            // Seen right after a pass ends, before the service catches up
            log::warn!(
                "Incorrect number of passes retrieved: expected {}, got {}",
                self.passes,
                passes.len()
            );
            if self.state.current == Some(ProximityState::Overhead) {
                self.state.current = Some(ProximityState::Receding);
                self.emit();
            }
            self.reporter
                .on_count_mismatch(self.passes, passes.len(), retry);
            return Ok(retry);
        }

        let next_pass = passes[0];
        let time_to_pass = next_pass.time_to_pass(now);

        let interval = if time_to_pass < 0 {
            self.reporter.on_overhead();
            match self.state.last_pass {
                // Started before we ever saw it, so its remaining length is unknown
                None => self.polling.overhead_fallback,
                Some(last) => {
                    self.state.current = Some(ProximityState::Overhead);
                    Duration::from_secs(last.duration).max(retry)
                }
            }
        } else {
            let (state, interval) = self.thresholds.classify(time_to_pass);
            self.state.current = Some(state);
            self.state.last_pass = Some(next_pass);
            interval
        };

        self.reporter.on_passes(&passes, now, interval);
        self.emit();
        Ok(interval)
    }

    fn emit(&mut self) {
        let Some(current) = self.state.current else {
            return;
        };
        if current == self.state.last_emitted {
            return;
        }

        log::info!("State changed: {} -> {}", self.state.last_emitted, current);
        self.reporter.on_transition(self.state.last_emitted, current);
        if let Err(e) = self.sink.send(current) {
            log::warn!("{}", e);
        }
        self.state.last_emitted = current;
    }
}
