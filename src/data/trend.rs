//! Recent-occupancy tracking for the header sparkline.

use std::collections::VecDeque;

/// Maximum number of readings to keep.
const MAX_TREND_SIZE: usize = 60;

/// Ring buffer of recent occupancy readings.
///
/// Occupancy is already a percentage, so sparkline levels map the absolute
/// value onto the 8 bar heights rather than normalizing deltas.
#[derive(Debug, Clone, Default)]
pub struct Trend {
    readings: VecDeque<i64>,
}

impl Trend {
    /// Create an empty trend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reading. Snapshots without an occupancy value are skipped.
    pub fn record(&mut self, occupancy: Option<i64>) {
        let Some(value) = occupancy else {
            return;
        };
        self.readings.push_back(value);
        if self.readings.len() > MAX_TREND_SIZE {
            self.readings.pop_front();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// The most recent `width` readings as bar levels 0-7.
    pub fn sparkline(&self, width: usize) -> Vec<u8> {
        self.readings
            .iter()
            .rev()
            .take(width)
            .rev()
            .map(|&v| ((v.clamp(0, 100) * 7 + 50) / 100) as u8)
            .collect()
    }
}
