//! Invest-vs-waste totals for the dashboard and the weekly review.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::block::{BlockType, TimeBlock};
use crate::time_utils::{format_hours_minutes, minutes_of_day, remaining_minutes};

/// Efficiency below this percentage is flagged.
pub const LOW_EFFICIENCY_PCT: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub invest_minutes: u32,
    pub waste_minutes: u32,
    /// Share of logged time that was invested; 100 when nothing is logged.
    pub efficiency_pct: f64,
}

impl Summary {
    pub fn of<'a>(blocks: impl IntoIterator<Item = &'a TimeBlock>) -> Self {
        let (mut invest, mut waste) = (0u32, 0u32);
        for block in blocks {
            match block.kind {
                BlockType::Invest => invest += block.duration(),
                BlockType::Waste => waste += block.duration(),
            }
        }
        let total = invest + waste;
        let efficiency_pct = if total > 0 {
            invest as f64 / total as f64 * 100.0
        } else {
            100.0
        };
        Self {
            invest_minutes: invest,
            waste_minutes: waste,
            efficiency_pct,
        }
    }

    pub fn is_low_efficiency(&self) -> bool {
        self.efficiency_pct < LOW_EFFICIENCY_PCT
    }

    pub fn invest_label(&self) -> String {
        format_hours_minutes(self.invest_minutes)
    }

    pub fn waste_label(&self) -> String {
        format_hours_minutes(self.waste_minutes)
    }
}

/// Minutes left in the viewed day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remaining {
    pub minutes: u32,
    pub low: bool,
}

/// Only meaningful for today; other days have no countdown.
pub fn remaining_for(view_date: NaiveDate, now: &NaiveDateTime, low_below: u32) -> Option<Remaining> {
    if view_date != now.date() {
        return None;
    }
    let minutes = remaining_minutes(minutes_of_day(now));
    Some(Remaining {
        minutes,
        low: minutes < low_below,
    })
}
