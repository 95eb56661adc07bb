//! Timeline layout engine.
//!
//! This module provides:
//! - Start-order sorting and overlap stack levels
//! - Gap detection up to the day's horizon
//! - Minute ↔ pixel geometry, snapping and clamping
//! - The render pass that turns a day into draw instructions

mod gap;
mod layout;
mod render;
mod stack;

pub use gap::{compute_gaps, day_horizon, Gap, GapDetector};
pub use layout::{
    clamp_to_day, snap_to_grid, BlockGeometry, GapGeometry, HourMarker, LayoutConfig,
    LayoutEngine,
};
pub use render::{DrawInstruction, RenderFrame};
pub use stack::{compute_stack_levels, sorted_by_start, stack_levels};
