//! Render progress shared across tile workers.
//!
//! Progress is counted in scanline segments: one row of one tile. An
//! image row is finished once every tile spanning it has done that row.

use std::fmt::Display;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Number of progress reports over a whole render.
const REPORTS: usize = 10;

/// Shared count of finished scanline segments.
///
/// Each worker bumps the counter after finishing one row of its tile. A
/// report goes to the log every tenth of the way, from whichever worker
/// crosses the threshold.
pub struct Progress {
    done: AtomicUsize,
    total: usize,
    segments_per_scanline: usize,
    report_every: usize,
}

impl Progress {
    /// `total` segments, `segments_per_scanline` of which make one image row.
    pub fn new(total: usize, segments_per_scanline: usize) -> Self {
        Self {
            done: AtomicUsize::new(0),
            total,
            segments_per_scanline: segments_per_scanline.max(1),
            report_every: (total / REPORTS).max(1),
        }
    }

    /// Record one finished segment.
    pub fn advance(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if done % self.report_every == 0 || done == self.total {
            log::info!(
                "{} Scanlines remaining: {}",
                PercentBar {
                    percent: self.fraction(done),
                    width: 30,
                },
                self.scanlines_remaining(done)
            );
        }
    }

    pub fn completed(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    /// Whole image rows not yet finished by every tile that spans them.
    pub fn scanlines_remaining(&self, done: usize) -> usize {
        self.total.saturating_sub(done).div_ceil(self.segments_per_scanline)
    }

    fn fraction(&self, done: usize) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        (done as f32 / self.total as f32).clamp(0.0, 1.0)
    }
}

pub(crate) struct PercentBar {
    pub(crate) percent: f32,
    pub(crate) width: usize,
}

impl Display for PercentBar {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filled = ((self.width - 1) as f32 * self.percent).round() as usize;
        write!(
            f,
            "[{empty:=>width_left$}>{empty:.<width_right$}] {percent:.1}%",
            empty = "",
            width_left = filled,
            width_right = self.width - 1 - filled,
            percent = 100. * self.percent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanlines_remaining() {
        // 4 tiles per scanline, 10 scanlines
        let progress = Progress::new(40, 4);
        assert_eq!(progress.scanlines_remaining(0), 10);
        assert_eq!(progress.scanlines_remaining(3), 10);
        assert_eq!(progress.scanlines_remaining(4), 9);
        assert_eq!(progress.scanlines_remaining(40), 0);
    }

    #[test]
    fn test_advance_counts() {
        let progress = Progress::new(5, 1);
        for _ in 0..5 {
            progress.advance();
        }
        assert_eq!(progress.completed(), 5);
        assert_eq!(progress.scanlines_remaining(progress.completed()), 0);
    }

    #[test]
    fn test_percent_bar() {
        let bar = PercentBar {
            percent: 0.5,
            width: 11,
        };
        assert_eq!(bar.to_string(), "[=====>.....] 50.0%");
    }
}
