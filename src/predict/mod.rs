mod error;
mod open_notify;
mod source;
mod types;

pub use error::FetchError;
pub use open_notify::{OpenNotifyClient, DEFAULT_URL};
pub use source::PassSource;
pub use types::{Observer, Pass};
