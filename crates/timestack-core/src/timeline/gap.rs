//! Gap detection between logged blocks.
//!
//! Gaps are the unscheduled stretches of a day, shown so they can be audited
//! or filled. For the current day they stop at "now"; the future has not been
//! missed yet.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::block::TimeBlock;
use crate::time_utils::{minutes_of_day, MINUTES_PER_DAY};

/// An unscheduled interval `[start, end)` in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    pub start: u32,
    pub end: u32,
}

impl Gap {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn contains(&self, minute: i64) -> bool {
        minute >= self.start as i64 && minute < self.end as i64
    }
}

/// How far gaps extend for the day being viewed.
///
/// Past days are open to midnight, the present day stops at the current
/// minute, and days after today have no gaps at all.
pub fn day_horizon(view_date: NaiveDate, now: &NaiveDateTime) -> u32 {
    let today = now.date();
    if view_date < today {
        MINUTES_PER_DAY
    } else if view_date == today {
        minutes_of_day(now)
    } else {
        0
    }
}

/// Detector for the unscheduled stretches of a day.
pub struct GapDetector {
    /// Gaps must be wider than this many minutes to be reported.
    noise_minutes: u32,
}

impl GapDetector {
    /// Ignores gaps of one minute or less.
    pub fn new() -> Self {
        Self { noise_minutes: 1 }
    }

    /// Sweep start-sorted blocks left to right.
    ///
    /// The cursor only ever advances, so blocks nested inside an already
    /// covered span never produce a negative-width gap. No gap reaches past
    /// `horizon`.
    ///
    /// The trailing stretch up to `horizon` is filtered like any inner gap:
    /// a one-minute tail is not reported, unlike a plain `cursor < horizon`
    /// sweep. Such a gap could not be scheduled into anyway.
    pub fn find_gaps(&self, sorted: &[TimeBlock], horizon: u32) -> Vec<Gap> {
        let mut gaps = Vec::new();
        let mut cursor = 0u32;

        for block in sorted {
            let gap_end = block.start.min(horizon);
            if gap_end > cursor + self.noise_minutes {
                gaps.push(Gap::new(cursor, gap_end));
            }
            if block.end > cursor {
                cursor = block.end;
            }
        }

        if horizon > cursor + self.noise_minutes {
            gaps.push(Gap::new(cursor, horizon));
        }

        gaps
    }
}

impl Default for GapDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to find gaps with default settings
pub fn compute_gaps(sorted: &[TimeBlock], horizon: u32) -> Vec<Gap> {
    GapDetector::new().find_gaps(sorted, horizon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockId, BlockType};

    fn block(start: u32, end: u32) -> TimeBlock {
        TimeBlock::try_new(BlockId(start as u64), start, end, BlockType::Waste, "b", "2024-05-20")
            .unwrap()
    }

    #[test]
    fn empty_day_is_one_gap() {
        assert_eq!(compute_gaps(&[], 1440), vec![Gap::new(0, 1440)]);
        assert!(compute_gaps(&[], 0).is_empty());
    }

    #[test]
    fn overlapping_blocks_fill_coverage() {
        let sorted = vec![block(0, 60), block(30, 90)];
        assert_eq!(compute_gaps(&sorted, 1440), vec![Gap::new(90, 1440)]);
    }

    #[test]
    fn contained_block_does_not_retract_cursor() {
        let sorted = vec![block(100, 300), block(120, 150), block(400, 420)];
        assert_eq!(
            compute_gaps(&sorted, 1440),
            vec![Gap::new(0, 100), Gap::new(300, 400), Gap::new(420, 1440)]
        );
    }

    #[test]
    fn one_minute_gaps_are_noise() {
        let sorted = vec![block(1, 60), block(61, 120), block(122, 180)];
        assert_eq!(
            compute_gaps(&sorted, 181),
            vec![Gap::new(120, 122)]
        );
    }

    #[test]
    fn one_minute_tail_is_noise() {
        let sorted = vec![block(0, 600)];
        assert!(compute_gaps(&sorted, 601).is_empty());
        assert_eq!(compute_gaps(&sorted, 602), vec![Gap::new(600, 602)]);
    }

    #[test]
    fn gaps_stop_at_horizon() {
        let sorted = vec![block(60, 90), block(600, 660)];
        assert_eq!(
            compute_gaps(&sorted, 300),
            vec![Gap::new(0, 60), Gap::new(90, 300)]
        );
    }

    #[test]
    fn horizon_depends_on_viewed_day() {
        let now = NaiveDate::from_ymd_opt(2024, 5, 20)
            .unwrap()
            .and_hms_opt(10, 15, 0)
            .unwrap();
        let today = now.date();
        assert_eq!(day_horizon(today, &now), 615);
        assert_eq!(day_horizon(today.pred_opt().unwrap(), &now), 1440);
        assert_eq!(day_horizon(today.succ_opt().unwrap(), &now), 0);
    }

    #[test]
    fn gap_membership_is_half_open() {
        let gap = Gap::new(50, 200);
        assert!(gap.contains(50));
        assert!(gap.contains(199));
        assert!(!gap.contains(200));
        assert_eq!(gap.width(), 150);
    }
}
