//! Notification Expiry
//!
//! Drives [`Notifications`] timers on the tokio clock. One background task sleeps until the
//! earliest deadline, expires whatever is due, and goes back to sleep; pushes and dismissals
//! wake it so it can re-arm.

use std::{
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use fabrima::notifications::{Notification, NotificationId, Notifications};
use tokio::{
    sync::Notify,
    task::JoinHandle,
    time::{Instant, sleep_until},
};
use tracing::{debug, trace};

#[derive(Debug)]
struct Shared {
    queue: Mutex<Notifications>,
    wake: Notify,
    closed: AtomicBool,
}

/// Shared handle to the visible notifications.
#[derive(Debug, Clone)]
pub struct Toaster {
    shared: Arc<Shared>,
}

impl Toaster {
    /// Create an empty toaster whose notifications live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                queue: Mutex::new(Notifications::with_ttl(ttl)),
                wake: Notify::new(),
                closed: AtomicBool::new(false),
            }),
        }
    }

    fn queue(&self) -> MutexGuard<'_, Notifications> {
        self.shared
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Show `message` and schedule its expiry.
    pub fn push(&self, message: impl Into<String>) -> NotificationId {
        let message = message.into();
        let id = self.queue().push(message.clone(), Instant::now().into_std());

        debug!(%id, %message, "notification shown");
        self.shared.wake.notify_one();

        id
    }

    /// Remove a notification before it expires.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let removed = self.queue().dismiss(id);

        if removed {
            self.shared.wake.notify_one();
        }

        removed
    }

    /// Visible notifications in insertion order.
    pub fn visible(&self) -> Vec<Notification> {
        self.queue().visible().to_vec()
    }

    /// Start the background task that expires notifications.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_expiry(&self) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);

        tokio::spawn(async move {
            while !shared.closed.load(Ordering::Acquire) {
                let deadline = {
                    let mut queue = shared.queue.lock().unwrap_or_else(PoisonError::into_inner);

                    for id in queue.poll(Instant::now().into_std()) {
                        trace!(%id, "notification expired");
                    }

                    queue.next_deadline()
                };

                match deadline {
                    Some(deadline) => {
                        tokio::select! {
                            () = sleep_until(Instant::from_std(deadline)) => {}
                            () = shared.wake.notified() => {}
                        }
                    }
                    None => shared.wake.notified().await,
                }
            }

            debug!("notification expiry stopped");
        })
    }

    /// Stop the background expiry task.
    pub fn shutdown(&self) {
        self.shared.closed.store(true, Ordering::Release);
        self.shared.wake.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use tokio::time::advance;

    use super::*;

    fn messages(toaster: &Toaster) -> Vec<String> {
        toaster
            .visible()
            .into_iter()
            .map(|notification| notification.message)
            .collect()
    }

    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn notification_disappears_after_ttl() -> TestResult {
        let toaster = Toaster::new(Duration::from_millis(4000));
        let driver = toaster.spawn_expiry();

        toaster.push("Added Canvas to cart");
        settle().await;

        advance(Duration::from_millis(3999)).await;
        settle().await;

        assert_eq!(messages(&toaster), vec!["Added Canvas to cart"]);

        advance(Duration::from_millis(1)).await;
        settle().await;

        assert!(toaster.visible().is_empty());

        toaster.shutdown();
        driver.await?;

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn notifications_expire_independently() -> TestResult {
        let toaster = Toaster::new(Duration::from_millis(4000));
        let driver = toaster.spawn_expiry();

        toaster.push("first");
        settle().await;

        advance(Duration::from_millis(1500)).await;
        toaster.push("second");
        settle().await;

        assert_eq!(messages(&toaster), vec!["first", "second"]);

        advance(Duration::from_millis(2500)).await;
        settle().await;

        assert_eq!(messages(&toaster), vec!["second"]);

        advance(Duration::from_millis(1500)).await;
        settle().await;

        assert!(toaster.visible().is_empty());

        toaster.shutdown();
        driver.await?;

        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn dismissed_notification_is_gone_immediately() -> TestResult {
        let toaster = Toaster::new(Duration::from_millis(4000));
        let driver = toaster.spawn_expiry();

        let dismissed = toaster.push("dismissed");
        toaster.push("kept");

        assert!(toaster.dismiss(dismissed));
        assert!(!toaster.dismiss(dismissed));
        assert_eq!(messages(&toaster), vec!["kept"]);

        toaster.shutdown();
        driver.await?;

        Ok(())
    }

    #[tokio::test]
    async fn shutdown_stops_idle_driver() -> TestResult {
        let toaster = Toaster::new(Duration::from_secs(60));
        let driver = toaster.spawn_expiry();

        toaster.shutdown();
        driver.await?;

        Ok(())
    }
}
