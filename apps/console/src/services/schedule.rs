use std::future::Future;
use std::time::Duration;

use futures::channel::oneshot;
use futures::future::{self, Either};
use tracing::debug;

/// Keeps a [`RefreshSchedule`] alive. Dropping it stops the schedule before its next tick.
#[derive(Debug)]
pub struct ScheduleGuard {
    _stop: oneshot::Sender<()>,
}

impl ScheduleGuard {
    pub fn stop(self) {}
}

/// Fixed-period tick source for periodic refreshes.
#[derive(Debug)]
pub struct RefreshSchedule {
    period: Duration,
    stop: oneshot::Receiver<()>,
}

pub fn refresh_schedule(period: Duration) -> (ScheduleGuard, RefreshSchedule) {
    let (tx, rx) = oneshot::channel();
    (ScheduleGuard { _stop: tx }, RefreshSchedule { period, stop: rx })
}

impl RefreshSchedule {
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Sleeps one period at a time and calls `on_tick` after each, until the guard goes away.
    /// Returns how many ticks were delivered.
    pub async fn run<S, F, T>(mut self, mut sleep: S, mut on_tick: T) -> u64
    where
        S: FnMut(Duration) -> F,
        F: Future<Output = ()>,
        T: FnMut(),
    {
        let mut ticks = 0u64;

        loop {
            let delay = sleep(self.period);
            futures::pin_mut!(delay);

            let stopped = matches!(
                future::select(&mut self.stop, delay).await,
                Either::Left(_)
            );
            // the guard may have been dropped while the delay was completing
            if stopped || !matches!(self.stop.try_recv(), Ok(None)) {
                break;
            }

            ticks += 1;
            on_tick();
        }

        debug!(ticks, period_secs = self.period.as_secs(), "refresh schedule stopped");
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::task::Poll;

    #[test]
    fn ticks_until_guard_is_dropped() {
        let (guard, schedule) = refresh_schedule(Duration::from_secs(300));
        let mut guard = Some(guard);
        let mut fetches = 0;

        let ticks = block_on(schedule.run(
            |_| future::ready(()),
            || {
                fetches += 1;
                if fetches == 3 {
                    guard.take();
                }
            },
        ));

        assert_eq!(ticks, 3);
        assert_eq!(fetches, 3);
    }

    #[test]
    fn dropped_guard_means_no_ticks_at_all() {
        let (guard, schedule) = refresh_schedule(Duration::from_secs(1));
        guard.stop();

        let mut fetches = 0;
        let ticks = block_on(schedule.run(|_| future::ready(()), || fetches += 1));

        assert_eq!(ticks, 0);
        assert_eq!(fetches, 0);
    }

    #[test]
    fn drop_during_pending_period_suppresses_that_tick() {
        let (guard, schedule) = refresh_schedule(Duration::from_secs(300));
        let slot = Rc::new(RefCell::new(Some(guard)));
        let mut fetches = 0;

        let ticks = block_on(schedule.run(
            |_| {
                let slot = Rc::clone(&slot);
                future::poll_fn(move |_| {
                    slot.borrow_mut().take();
                    Poll::Ready(())
                })
            },
            || fetches += 1,
        ));

        assert_eq!(ticks, 0);
        assert_eq!(fetches, 0);
    }

    #[test]
    fn sleeps_for_the_configured_period() {
        let (guard, schedule) = refresh_schedule(Duration::from_secs(300));
        assert_eq!(schedule.period(), Duration::from_secs(300));

        let mut guard = Some(guard);
        let mut requested = Vec::new();
        block_on(schedule.run(
            |period| {
                requested.push(period);
                future::ready(())
            },
            || {
                guard.take();
            },
        ));

        // one delay for the delivered tick, one that the stop signal cut short
        assert_eq!(requested.len(), 2);
        assert!(requested.iter().all(|p| *p == Duration::from_secs(300)));
    }
}
