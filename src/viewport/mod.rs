mod debounce;

pub use debounce::Debouncer;

use std::time::{Duration, Instant};

/// Quiescence window for resize debouncing: no measurement fires until
/// resize notifications have stopped for this long.
pub const RESIZE_QUIESCENCE: Duration = Duration::from_millis(500);

/// The rendered size of the host container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    /// Layout requires a real viewport; zero or negative dimensions mean
    /// "not yet known" and layout must be withheld.
    pub fn is_renderable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Tracks the host container's rendered size and republishes it as a
/// stable signal.
///
/// Resize notifications are collapsed by a trailing debounce: the
/// container is re-measured only once notifications have stopped for the
/// quiescence window, and the measurement happens at fire time, so the
/// published size reflects the container after resizing has settled.
/// After [`ViewportTracker::shutdown`], notifications are ignored and the
/// pending measurement is cancelled.
#[derive(Debug)]
pub struct ViewportTracker {
    debounce: Debouncer,
    current: Option<ViewportSize>,
    active: bool,
}

impl ViewportTracker {
    pub fn new() -> Self {
        Self::with_window(RESIZE_QUIESCENCE)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            debounce: Debouncer::new(window),
            current: None,
            active: true,
        }
    }

    /// Initial mount: measure and publish immediately, without debouncing.
    pub fn mount<F>(&mut self, measure: F) -> Option<ViewportSize>
    where
        F: FnOnce() -> Option<ViewportSize>,
    {
        if !self.active {
            return None;
        }
        self.current = measure();
        self.current
    }

    /// A resize notification from the host. Reschedules the single pending
    /// measurement; nothing is measured here.
    pub fn notify_resize(&mut self, now: Instant) {
        if !self.active {
            return;
        }
        self.debounce.notify(now);
    }

    /// When the event loop should wake to let a pending measurement fire.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Fire the pending measurement if its quiescence window has elapsed.
    /// Returns the newly published size, or None if nothing was due.
    pub fn poll<F>(&mut self, now: Instant, measure: F) -> Option<ViewportSize>
    where
        F: FnOnce() -> Option<ViewportSize>,
    {
        if !self.active || !self.debounce.fire(now) {
            return None;
        }
        let size = measure()?;
        self.current = Some(size);
        Some(size)
    }

    /// Most recently published size.
    pub fn current(&self) -> Option<ViewportSize> {
        self.current
    }

    /// Teardown: cancel any pending measurement and stop reacting to
    /// notifications, so nothing acts on a container that no longer exists.
    pub fn shutdown(&mut self) {
        self.debounce.cancel();
        self.active = false;
    }
}

impl Default for ViewportTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(w: f32, h: f32) -> Option<ViewportSize> {
        Some(ViewportSize {
            width: w,
            height: h,
        })
    }

    #[test]
    fn mount_publishes_immediately() {
        let mut tracker = ViewportTracker::new();
        let published = tracker.mount(|| size(800.0, 600.0));
        assert_eq!(published, size(800.0, 600.0));
        assert_eq!(tracker.current(), size(800.0, 600.0));
    }

    #[test]
    fn burst_of_notifications_publishes_once_after_window() {
        let t0 = Instant::now();
        let mut tracker = ViewportTracker::new();
        tracker.mount(|| size(800.0, 600.0));

        for i in 0..10 {
            tracker.notify_resize(t0 + Duration::from_millis(50 * i));
        }
        let last = t0 + Duration::from_millis(450);

        // Still quiescing: nothing published.
        assert_eq!(
            tracker.poll(last + Duration::from_millis(499), || size(1.0, 1.0)),
            None
        );

        let published = tracker.poll(last + Duration::from_millis(500), || size(1024.0, 768.0));
        assert_eq!(published, size(1024.0, 768.0));

        // One measurement per burst.
        assert_eq!(
            tracker.poll(last + Duration::from_millis(600), || size(9.0, 9.0)),
            None
        );
        assert_eq!(tracker.current(), size(1024.0, 768.0));
    }

    #[test]
    fn measurement_happens_at_fire_time() {
        let t0 = Instant::now();
        let mut tracker = ViewportTracker::new();
        tracker.mount(|| size(100.0, 100.0));

        // The container keeps changing during the burst; only the state at
        // fire time is published.
        tracker.notify_resize(t0);
        let published = tracker.poll(t0 + RESIZE_QUIESCENCE, || size(555.0, 333.0));
        assert_eq!(published, size(555.0, 333.0));
    }

    #[test]
    fn shutdown_cancels_pending_and_ignores_notifications() {
        let t0 = Instant::now();
        let mut tracker = ViewportTracker::new();
        tracker.mount(|| size(800.0, 600.0));

        tracker.notify_resize(t0);
        tracker.shutdown();
        assert_eq!(tracker.next_deadline(), None);
        assert_eq!(
            tracker.poll(t0 + Duration::from_secs(5), || size(1.0, 1.0)),
            None
        );

        tracker.notify_resize(t0 + Duration::from_secs(6));
        assert_eq!(tracker.next_deadline(), None);
    }

    #[test]
    fn renderable_requires_positive_dimensions() {
        assert!(ViewportSize {
            width: 1.0,
            height: 1.0
        }
        .is_renderable());
        assert!(!ViewportSize {
            width: 0.0,
            height: 600.0
        }
        .is_renderable());
        assert!(!ViewportSize {
            width: 800.0,
            height: 0.0
        }
        .is_renderable());
    }
}
