//! Page Flip Hover Timer
//!
//! Hovering a next/previous affordance while dragging an item flips pages
//! automatically: first after `initial_delay + interval`, then every
//! `interval`. The timer runs only while the pointer hovers *and* a drag is in
//! progress; losing either condition cancels it before any further firing.

use serde::{Deserialize, Serialize};

/// Delay before the repeating interval starts (seconds)
pub const FLIP_INITIAL_DELAY: f32 = 0.2;
/// Time between flips (seconds)
pub const FLIP_INTERVAL: f32 = 0.75;

const MIN_INTERVAL: f32 = 0.01;

/// Which way a flipper turns the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipDirection {
    Next,
    Previous,
}

/// Cancellable repeating timer attached to one flip affordance.
#[derive(Debug, Clone)]
pub struct PageFlipTimer {
    direction: FlipDirection,
    initial_delay: f32,
    interval: f32,
    hovering: bool,
    /// Seconds until the next flip; `None` while stopped
    countdown: Option<f32>,
}

impl PageFlipTimer {
    pub fn new(direction: FlipDirection) -> Self {
        Self::with_timing(direction, FLIP_INITIAL_DELAY, FLIP_INTERVAL)
    }

    pub fn with_timing(direction: FlipDirection, initial_delay: f32, interval: f32) -> Self {
        Self {
            direction,
            initial_delay: initial_delay.max(0.0),
            interval: interval.max(MIN_INTERVAL),
            hovering: false,
            countdown: None,
        }
    }

    #[inline]
    pub fn direction(&self) -> FlipDirection {
        self.direction
    }

    #[inline]
    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.countdown.is_some()
    }

    fn start(&mut self) {
        if self.countdown.is_none() {
            self.countdown = Some(self.initial_delay + self.interval);
        }
    }

    /// Pointer entered the affordance.
    pub fn pointer_enter(&mut self, dragging: bool) {
        self.hovering = true;
        if dragging {
            self.start();
        }
    }

    /// Pointer left the affordance. Stops immediately.
    pub fn pointer_exit(&mut self) {
        self.hovering = false;
        self.countdown = None;
    }

    /// Advance by `dt` seconds and return how many flips are due.
    ///
    /// Conditions are checked before time advances, so a flip scheduled
    /// inside this frame never fires once hovering or dragging has stopped.
    pub fn tick(&mut self, dt: f32, dragging: bool) -> u32 {
        if !(self.hovering && dragging) {
            self.countdown = None;
            return 0;
        }

        let Some(remaining) = self.countdown.as_mut() else {
            self.start();
            return 0;
        };

        if !dt.is_finite() {
            tracing::debug!(dt, "page flip timer ignored non-finite frame time");
            return 0;
        }
        *remaining -= dt.max(0.0);
        if *remaining > 0.0 {
            return 0;
        }

        let due = (-*remaining / self.interval).floor() + 1.0;
        *remaining += due * self.interval;
        if *remaining <= 0.0 || *remaining > self.interval {
            // Lost to f32 precision on absurd frame times
            *remaining = self.interval;
        }
        due as u32
    }
}
