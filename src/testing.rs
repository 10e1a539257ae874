//! Fakes shared by unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use crate::notify::{NotificationSink, SinkError};
use crate::poller::PollReporter;
use crate::predict::{FetchError, Observer, Pass, PassSource};
use crate::proximity::ProximityState;

pub fn london() -> Observer {
    Observer {
        latitude: 51.5,
        longitude: -0.12,
        altitude_m: 20,
    }
}

/// Records every state it is asked to send.
#[derive(Default)]
pub struct RecordingSink {
    pub sent: Vec<ProximityState>,
    pub closed: u32,
    pub fail: bool,
}

impl NotificationSink for RecordingSink {
    fn send(&mut self, state: ProximityState) -> Result<(), SinkError> {
        self.sent.push(state);
        if self.fail {
            return Err(SinkError::Send {
                device: "fake".into(),
                source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "unplugged"),
            });
        }
        Ok(())
    }

    fn close(&mut self) {
        self.closed += 1;
    }
}

pub enum Scripted {
    /// Passes rising this many seconds from the moment of the fetch.
    Relative(Vec<(i64, u64)>),
    ConnectionError,
    /// Never answers.
    Hang,
}

/// Replays a fixed sequence of responses, then fails with connection errors.
#[derive(Default)]
pub struct ScriptedSource {
    script: RefCell<VecDeque<Scripted>>,
    pub calls: RefCell<u32>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: RefCell::new(script.into()),
            calls: RefCell::new(0),
        }
    }
}

impl PassSource for ScriptedSource {
    async fn fetch_passes(&self, _observer: &Observer, _count: u32) -> Result<Vec<Pass>, FetchError> {
        *self.calls.borrow_mut() += 1;
        let now = chrono::Utc::now().timestamp();
        let next = self.script.borrow_mut().pop_front();
        match next {
            Some(Scripted::Relative(passes)) => Ok(passes
                .into_iter()
                .map(|(offset, duration)| Pass {
                    rise_time: now + offset,
                    duration,
                })
                .collect()),
            Some(Scripted::ConnectionError) | None => {
                Err(FetchError::Connection("connection refused".into()))
            }
            Some(Scripted::Hang) => std::future::pending().await,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SelfTest(Duration),
    Passes(usize, Duration),
    Overhead,
    Transition(ProximityState, ProximityState),
    NoData(bool, Duration),
    CountMismatch(u32, usize, Duration),
}

/// Reporter that keeps a log of everything it was told.
#[derive(Clone, Default)]
pub struct RecordingReporter(pub Rc<RefCell<Vec<Event>>>);

impl RecordingReporter {
    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }
}

impl PollReporter for RecordingReporter {
    fn on_self_test(&mut self, _device: &str, pause: Duration) {
        self.0.borrow_mut().push(Event::SelfTest(pause));
    }

    fn on_passes(&mut self, passes: &[Pass], _now: i64, interval: Duration) {
        self.0.borrow_mut().push(Event::Passes(passes.len(), interval));
    }

    fn on_overhead(&mut self) {
        self.0.borrow_mut().push(Event::Overhead);
    }

    fn on_transition(&mut self, from: ProximityState, to: ProximityState) {
        self.0.borrow_mut().push(Event::Transition(from, to));
    }

    fn on_no_data(&mut self, error: Option<&FetchError>, retry: Duration) {
        self.0.borrow_mut().push(Event::NoData(error.is_some(), retry));
    }

    fn on_count_mismatch(&mut self, expected: u32, received: usize, retry: Duration) {
        self.0
            .borrow_mut()
            .push(Event::CountMismatch(expected, received, retry));
    }
}
