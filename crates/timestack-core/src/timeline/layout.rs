//! Minute ↔ pixel geometry for the vertical 24-hour timeline.
//!
//! The timeline is one tall column: minute `m` sits at `m * pixels_per_minute`
//! from the top. Overlapping blocks are indented by their stack level and
//! drawn above the ones they overlap.

use serde::{Deserialize, Serialize};

use crate::block::TimeBlock;
use crate::time_utils::{format_clock, MINUTES_PER_DAY};
use crate::timeline::gap::Gap;

/// Layout tuning, stored under `[layout]` in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_pixels_per_minute")]
    pub pixels_per_minute: f64,
    /// Left margin reserved for the hour labels.
    #[serde(default = "default_base_left_inset")]
    pub base_left_inset: f64,
    /// Extra indent per stack level.
    #[serde(default = "default_level_indent")]
    pub level_indent: f64,
    #[serde(default = "default_right_padding")]
    pub right_padding: f64,
    #[serde(default = "default_min_block_height")]
    pub min_block_height: f64,
    #[serde(default = "default_min_gap_height")]
    pub min_gap_height: f64,
    #[serde(default = "default_base_z_index")]
    pub base_z_index: i32,
}

fn default_pixels_per_minute() -> f64 {
    2.0
}
fn default_base_left_inset() -> f64 {
    60.0
}
fn default_level_indent() -> f64 {
    20.0
}
fn default_right_padding() -> f64 {
    10.0
}
fn default_min_block_height() -> f64 {
    25.0
}
fn default_min_gap_height() -> f64 {
    20.0
}
fn default_base_z_index() -> i32 {
    10
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pixels_per_minute: default_pixels_per_minute(),
            base_left_inset: default_base_left_inset(),
            level_indent: default_level_indent(),
            right_padding: default_right_padding(),
            min_block_height: default_min_block_height(),
            min_gap_height: default_min_gap_height(),
            base_z_index: default_base_z_index(),
        }
    }
}

/// Where and how a block is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockGeometry {
    pub top: f64,
    pub height: f64,
    pub left: f64,
    pub width: f64,
    pub z_index: i32,
}

/// Where a gap is drawn; gaps span the full column below every block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapGeometry {
    pub top: f64,
    pub height: f64,
}

/// Hour label in the left gutter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourMarker {
    pub hour: u32,
    pub label: String,
    pub top: f64,
}

/// Maps minutes and stack levels to pixel geometry and back.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn pixels_per_minute(&self) -> f64 {
        self.config.pixels_per_minute
    }

    pub fn to_y(&self, minute: u32) -> f64 {
        minute as f64 * self.config.pixels_per_minute
    }

    /// Raw minute under a content-relative Y; snapping is up to the caller.
    pub fn to_minute(&self, pixel_y: f64) -> i64 {
        (pixel_y / self.config.pixels_per_minute).floor() as i64
    }

    /// Height of the whole day column.
    pub fn content_height(&self) -> f64 {
        self.to_y(MINUTES_PER_DAY)
    }

    pub fn geometry_for_block(
        &self,
        block: &TimeBlock,
        level: u32,
        container_width: f64,
    ) -> BlockGeometry {
        let top = self.to_y(block.start);
        let height = (self.to_y(block.end) - top).max(self.config.min_block_height);
        let left = self.config.base_left_inset + level as f64 * self.config.level_indent;
        let width = (container_width - left - self.config.right_padding).max(0.0);
        BlockGeometry {
            top,
            height,
            left,
            width,
            z_index: self.config.base_z_index + level as i32,
        }
    }

    pub fn geometry_for_gap(&self, gap: &Gap) -> GapGeometry {
        let top = self.to_y(gap.start);
        GapGeometry {
            top,
            height: (self.to_y(gap.end) - top).max(self.config.min_gap_height),
        }
    }

    pub fn hour_markers(&self) -> Vec<HourMarker> {
        (0..24)
            .map(|hour| HourMarker {
                hour,
                label: format_clock(hour * 60),
                top: self.to_y(hour * 60),
            })
            .collect()
    }
}

/// Round to the nearest multiple of `grid`; halves round up.
///
/// Takes fractional minutes so drag deltas can be snapped before truncation.
pub fn snap_to_grid(minute: f64, grid: u32) -> i64 {
    if grid == 0 {
        return minute.round() as i64;
    }
    (minute / grid as f64 + 0.5).floor() as i64 * grid as i64
}

/// Keep a block of `duration` minutes inside the day.
pub fn clamp_to_day(start: i64, duration: u32) -> u32 {
    let latest = MINUTES_PER_DAY.saturating_sub(duration) as i64;
    start.clamp(0, latest) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockId, BlockType};

    fn block(start: u32, end: u32) -> TimeBlock {
        TimeBlock::try_new(BlockId(1), start, end, BlockType::Invest, "b", "2024-05-20").unwrap()
    }

    #[test]
    fn minute_pixel_mapping() {
        let engine = LayoutEngine::default();
        assert_eq!(engine.to_y(90), 180.0);
        assert_eq!(engine.to_minute(123.0), 61);
        assert_eq!(engine.to_minute(-1.0), -1);
        assert_eq!(engine.content_height(), 2880.0);
    }

    #[test]
    fn block_geometry_indents_by_level() {
        let engine = LayoutEngine::default();
        let g = engine.geometry_for_block(&block(60, 120), 2, 400.0);
        assert_eq!(g.top, 120.0);
        assert_eq!(g.height, 120.0);
        assert_eq!(g.left, 100.0);
        assert_eq!(g.width, 290.0);
        assert_eq!(g.z_index, 12);
    }

    #[test]
    fn short_intervals_get_a_floor_height() {
        let engine = LayoutEngine::default();
        assert_eq!(engine.geometry_for_block(&block(60, 65), 0, 400.0).height, 25.0);
        assert_eq!(engine.geometry_for_gap(&Gap::new(10, 15)).height, 20.0);
        assert_eq!(engine.geometry_for_gap(&Gap::new(10, 40)).height, 60.0);
    }

    #[test]
    fn narrow_container_never_yields_negative_width() {
        let engine = LayoutEngine::default();
        assert_eq!(engine.geometry_for_block(&block(0, 30), 5, 100.0).width, 0.0);
    }

    #[test]
    fn snapping_rounds_to_quarter_hours() {
        assert_eq!(snap_to_grid(61.0, 15), 60);
        assert_eq!(snap_to_grid(67.0, 15), 60);
        assert_eq!(snap_to_grid(67.5, 15), 75);
        assert_eq!(snap_to_grid(11.5, 15), 15);
        assert_eq!(snap_to_grid(-7.0, 15), 0);
        assert_eq!(snap_to_grid(-8.0, 15), -15);
        assert_eq!(snap_to_grid(7.0, 0), 7);
    }

    #[test]
    fn clamping_keeps_block_inside_day() {
        assert_eq!(clamp_to_day(-30, 60), 0);
        assert_eq!(clamp_to_day(1400, 60), 1380);
        assert_eq!(clamp_to_day(495, 60), 495);
        assert_eq!(clamp_to_day(10, 1440), 0);
    }

    #[test]
    fn twenty_four_hour_markers() {
        let markers = LayoutEngine::default().hour_markers();
        assert_eq!(markers.len(), 24);
        assert_eq!(markers[8].label, "08:00");
        assert_eq!(markers[8].top, 960.0);
    }
}
