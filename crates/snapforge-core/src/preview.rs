//! Debounced live-preview state.
//!
//! Slider changes arrive faster than a preview can be recomputed. A
//! [`Debouncer`] holds only the most recent pending value and releases it
//! once no newer value has arrived for the quiescence window. The released
//! value becomes the committed snapshot used for export.
//!
//! Time is passed in explicitly as milliseconds (e.g. `performance.now()`
//! in a browser), so the debouncer works without a system clock.

/// Latest-value-wins debouncer.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window_ms: f64,
    pending: Option<(T, f64)>,
    committed: T,
}

impl<T: Clone> Debouncer<T> {
    /// Create a debouncer whose committed value starts as `initial`.
    pub fn new(initial: T, window_ms: f64) -> Self {
        Self {
            window_ms: window_ms.max(0.0),
            pending: None,
            committed: initial,
        }
    }

    /// Record a new value at time `now_ms`.
    ///
    /// Any earlier pending value is discarded and the window restarts.
    pub fn push(&mut self, value: T, now_ms: f64) {
        self.pending = Some((value, now_ms));
    }

    /// Release the pending value if the window has elapsed at `now_ms`.
    ///
    /// Returns the newly committed value, or `None` if nothing settled.
    pub fn poll(&mut self, now_ms: f64) -> Option<&T> {
        let settled = matches!(&self.pending, Some((_, at)) if now_ms - *at >= self.window_ms);
        if !settled {
            return None;
        }
        if let Some((value, _)) = self.pending.take() {
            self.committed = value;
        }
        Some(&self.committed)
    }

    /// Time at which the pending value will settle, if any.
    pub fn deadline(&self) -> Option<f64> {
        self.pending.as_ref().map(|(_, at)| at + self.window_ms)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The last released value.
    pub fn committed(&self) -> &T {
        &self.committed
    }

    pub fn window_ms(&self) -> f64 {
        self.window_ms
    }
}
