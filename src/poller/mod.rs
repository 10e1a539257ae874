mod error;
mod poll_loop;
mod reporter;

pub use error::PollError;
pub use poll_loop::PollLoop;
pub use reporter::{ConsoleReporter, PollReporter, SilentReporter};
