mod error;
mod serial;
mod sink;

pub use error::SinkError;
pub use serial::{LedSink, SerialSettings};
pub use sink::{frame, NotificationSink};
