use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use crate::availability::CandidateSet;

const MIN_TICK: Duration = Duration::from_millis(1);

/// Receiving side of the transient "rolling" date; `None` when idle.
pub type DisplayReceiver = watch::Receiver<Option<NaiveDate>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSettings {
    pub tick: Duration,
    pub duration: Duration,
}

/// Publishes random candidates on a fixed tick while a pick is in flight.
///
/// The animator only ever writes the display channel. Which date is shown
/// has no influence on the date that ends up selected.
#[derive(Debug)]
pub struct SelectionAnimator {
    display: Arc<watch::Sender<Option<NaiveDate>>>,
    settings: AnimationSettings,
}

impl SelectionAnimator {
    pub fn new(settings: AnimationSettings) -> Self {
        let (display, _) = watch::channel(None);
        Self {
            display: Arc::new(display),
            settings,
        }
    }

    pub fn subscribe(&self) -> DisplayReceiver {
        self.display.subscribe()
    }

    pub fn clear(&self) {
        self.display.send_replace(None);
    }

    /// Spawns the animation on the current tokio runtime.
    pub fn start(&self, candidates: CandidateSet) -> AnimationHandle {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let task = tokio::spawn(run_animation(
            candidates,
            self.settings,
            Arc::clone(&self.display),
            cancel_rx,
        ));

        AnimationHandle {
            cancel: Some(cancel_tx),
            task: Some(task),
        }
    }
}

/// Dropping the handle stops the animation and clears the display.
#[derive(Debug)]
pub struct AnimationHandle {
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl AnimationHandle {
    /// Waits until the configured duration has elapsed.
    pub async fn finished(mut self) {
        if let Some(task) = self.task.take()
            && let Err(err) = task.await
        {
            warn!(error = %err, "selection animation task failed");
        }
    }

    pub async fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        self.finished().await;
    }
}

impl Drop for AnimationHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }
}

async fn run_animation(
    candidates: CandidateSet,
    settings: AnimationSettings,
    display: Arc<watch::Sender<Option<NaiveDate>>>,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    let mut rng = StdRng::from_entropy();
    let mut ticker = time::interval(settings.tick.max(MIN_TICK));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let deadline = time::sleep(settings.duration);
    tokio::pin!(deadline);

    let mut frames = 0_u32;
    loop {
        tokio::select! {
            biased;
            _ = &mut cancel_rx => {
                debug!(frames, "selection animation cancelled");
                break;
            }
            _ = &mut deadline => {
                debug!(frames, "selection animation finished");
                break;
            }
            _ = ticker.tick() => {
                display.send_replace(Some(candidates.choose(&mut rng)));
                frames = frames.saturating_add(1);
            }
        }
    }

    display.send_replace(None);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::NaiveDate;
    use tokio::time::{self, Instant};

    use super::{AnimationSettings, SelectionAnimator};
    use crate::availability::CandidateSet;
    use crate::calendar::weekend_dates;

    fn settings(tick_ms: u64, duration_ms: u64) -> AnimationSettings {
        AnimationSettings {
            tick: Duration::from_millis(tick_ms),
            duration: Duration::from_millis(duration_ms),
        }
    }

    fn candidates() -> CandidateSet {
        CandidateSet::new(weekend_dates(2027).take(6).collect()).expect("non-empty")
    }

    #[tokio::test(start_paused = true)]
    async fn animation_publishes_candidates_until_duration_elapses() {
        let animator = SelectionAnimator::new(settings(100, 2_500));
        let mut display = animator.subscribe();
        let candidates = candidates();
        let started = Instant::now();

        let handle = animator.start(candidates.clone());

        display.changed().await.expect("animator should publish");
        let shown: Option<NaiveDate> = *display.borrow_and_update();
        assert!(shown.is_some_and(|date| candidates.contains(&date)));

        handle.finished().await;

        assert!(started.elapsed() >= Duration::from_millis(2_500));
        assert_eq!(*display.borrow(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn animation_keeps_rolling_between_ticks() {
        let animator = SelectionAnimator::new(settings(100, 1_000));
        let mut display = animator.subscribe();
        let candidates = candidates();

        let handle = animator.start(candidates.clone());

        let mut observed = 0;
        while observed < 5 {
            display.changed().await.expect("animator should keep publishing");
            if let Some(date) = *display.borrow_and_update() {
                assert!(candidates.contains(&date));
                observed += 1;
            }
        }

        handle.finished().await;
        assert_eq!(*display.borrow(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_early_and_clears_display() {
        let animator = SelectionAnimator::new(settings(100, 2_500));
        let display = animator.subscribe();
        let started = Instant::now();

        let handle = animator.start(candidates());
        time::sleep(Duration::from_millis(300)).await;
        handle.cancel().await;

        assert!(started.elapsed() < Duration::from_millis(2_500));
        assert_eq!(*display.borrow(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_clears_display() {
        let animator = SelectionAnimator::new(settings(100, 2_500));
        let mut display = animator.subscribe();

        let handle = animator.start(candidates());
        time::sleep(Duration::from_millis(250)).await;
        assert!(display.borrow().is_some());

        drop(handle);

        display
            .wait_for(Option::is_none)
            .await
            .expect("display should be cleared");
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_publishes_nothing() {
        let animator = SelectionAnimator::new(settings(100, 0));
        let display = animator.subscribe();

        animator.start(candidates()).finished().await;

        assert_eq!(*display.borrow(), None);
    }
}
