use std::future::Future;

use crate::predict::{FetchError, Observer, Pass};

/// Somewhere upcoming passes can be looked up
///
/// Implementations make a single attempt per call; retrying is left to the
/// caller.
pub trait PassSource {
    fn fetch_passes(
        &self,
        observer: &Observer,
        count: u32,
    ) -> impl Future<Output = Result<Vec<Pass>, FetchError>>;
}
