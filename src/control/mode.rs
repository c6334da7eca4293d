//! Day/night mode detector.
//!
//! The game inverts its palette at night. The ambient channel watches a
//! patch of background sky: when it drops more than `mode_threshold` below
//! its calibrated baseline the screen is dark.
//!
//! A candidate mode only commits after it has disagreed with the committed
//! mode continuously for longer than the confirmation window. If the
//! candidate falls back to the committed mode first, the pending change is
//! dropped and the window starts over on the next disagreement. The value
//! committed is the candidate observed on the committing sample, never an
//! older one.

/// Debounced binary mode detector (`true` = dark).
#[derive(Debug)]
pub struct ModeDetector {
    threshold: u16,
    confirm_ms: u32,
    dark: bool,
    pending_since: Option<u32>,
}

impl ModeDetector {
    pub fn new(threshold: u16, confirm_ms: u32) -> Self {
        Self {
            threshold,
            confirm_ms,
            dark: false,
            pending_since: None,
        }
    }

    /// Feed one ambient sample. Returns the committed mode.
    pub fn update(&mut self, sample: u16, reference: u16, now_ms: u32) -> bool {
        let candidate = i32::from(reference) - i32::from(sample) > i32::from(self.threshold);

        if candidate == self.dark {
            self.pending_since = None;
            return self.dark;
        }

        match self.pending_since {
            None => self.pending_since = Some(now_ms),
            Some(since) if now_ms.wrapping_sub(since) > self.confirm_ms => {
                self.dark = candidate;
                self.pending_since = None;
            }
            Some(_) => {}
        }
        self.dark
    }

    /// Last committed mode.
    pub fn is_dark(&self) -> bool {
        self.dark
    }

    /// Whether a mode change is waiting for confirmation.
    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }
}
