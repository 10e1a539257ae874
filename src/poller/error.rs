use thiserror::Error;

use crate::predict::FetchError;

#[derive(Debug, Error)]
pub enum PollError {
    #[error("giving up after {attempts} failed fetches: {source}")]
    GaveUp { attempts: u32, source: FetchError },
}
