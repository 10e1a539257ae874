use std::future::Future;
use std::time::Duration;

use crate::notify::NotificationSink;
use crate::proximity::ProximityState;

/// Send every state to the device in code order, waiting `delay` before each.
/// Returns how many states were sent before finishing or being interrupted.
/// The sink is closed on return.
pub async fn cycle_states<N, F>(sink: &mut N, delay: Duration, shutdown: F) -> usize
where
    N: NotificationSink,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    println!();
    println!("Sleep time between commands is: {} seconds", delay.as_secs());
    println!();

    let mut sent = 0;
    for state in ProximityState::ALL {
        println!("Sending: {}", state);

        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = &mut shutdown => break,
        }

        match sink.send(state) {
            Ok(()) => sent += 1,
            Err(e) => log::error!("{}", e),
        }
    }

    println!();
    sink.close();
    sent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSink;
    use ProximityState::*;

    #[tokio::test(start_paused = true)]
    async fn sends_every_state_in_order() {
        let mut sink = RecordingSink::default();
        let start = tokio::time::Instant::now();

        let sent = cycle_states(&mut sink, Duration::from_secs(10), std::future::pending()).await;

        assert_eq!(sent, 7);
        assert_eq!(
            sink.sent,
            vec![Receding, Approaching, Closing, Incoming, Imminent, Overhead, Test]
        );
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(70) && elapsed < Duration::from_secs(71));
        assert_eq!(sink.closed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn interruption_stops_cycle_and_closes() {
        let mut sink = RecordingSink::default();

        let sent = cycle_states(
            &mut sink,
            Duration::from_secs(10),
            tokio::time::sleep(Duration::from_secs(25)),
        )
        .await;

        assert_eq!(sent, 2);
        assert_eq!(sink.sent, vec![Receding, Approaching]);
        assert_eq!(sink.closed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn send_failures_are_not_counted() {
        let mut sink = RecordingSink {
            fail: true,
            ..Default::default()
        };

        let sent = cycle_states(&mut sink, Duration::from_secs(1), std::future::pending()).await;

        assert_eq!(sent, 0);
        assert_eq!(sink.sent.len(), 7);
    }
}
