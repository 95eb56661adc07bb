//! Pointer gesture state machine.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> PointerDown -> Dragging -> Idle     (move request)
//!                     -> Idle                 (tap: schedule or audit request)
//! ```
//!
//! Drags are purely presentational until release: the controller reports a
//! live offset and only emits a [`MoveRequest`] once the pointer lets go.
//! Only one gesture runs at a time; pointers other than the one that started
//! it are ignored.

use serde::{Deserialize, Serialize};

use super::request::{AuditRequest, MoveRequest, ScheduleRequest};
use crate::block::BlockId;
use crate::events::Event;
use crate::inbox::InboxItem;
use crate::timeline::{clamp_to_day, snap_to_grid, DrawInstruction, Gap, LayoutEngine};

/// Gesture tuning, stored under `[interaction]` in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Vertical movement (px) past which a press becomes a drag.
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold_px: f64,
    #[serde(default = "default_snap_minutes")]
    pub snap_minutes: u32,
    /// Divisor applied to the drag's pixel delta before the minute
    /// conversion. At 2.0 a drag needs twice the travel of the geometry.
    ///
    /// The damped pixels still go through `pixels_per_minute`: at 2 px/min
    /// a +60 px drag moves 15 minutes. Reading `floor(dy / 2)` directly as
    /// minutes would move it 30, and +47 px would land on 510 instead of
    /// 495 from 480.
    #[serde(default = "default_drag_damping")]
    pub drag_damping: f64,
    /// Proposed length of a block scheduled into a gap.
    #[serde(default = "default_duration")]
    pub default_duration: u32,
    /// Stacking order of the block being dragged.
    #[serde(default = "default_drag_z_index")]
    pub drag_z_index: i32,
}

fn default_drag_threshold() -> f64 {
    10.0
}
fn default_snap_minutes() -> u32 {
    15
}
fn default_drag_damping() -> f64 {
    2.0
}
fn default_duration() -> u32 {
    30
}
fn default_drag_z_index() -> i32 {
    1000
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: default_drag_threshold(),
            snap_minutes: default_snap_minutes(),
            drag_damping: default_drag_damping(),
            default_duration: default_duration(),
            drag_z_index: default_drag_z_index(),
        }
    }
}

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Block { id: BlockId, start: u32, end: u32 },
    Gap(Gap),
}

impl From<&DrawInstruction> for PointerTarget {
    fn from(instruction: &DrawInstruction) -> Self {
        match instruction {
            DrawInstruction::Block { id, start, end, .. } => PointerTarget::Block {
                id: *id,
                start: *start,
                end: *end,
            },
            DrawInstruction::Gap { start, end, .. } => PointerTarget::Gap(Gap::new(*start, *end)),
        }
    }
}

/// Position of the scrollable timeline container.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    /// Top edge of the container in client coordinates.
    pub top: f64,
    pub scroll_top: f64,
}

impl Viewport {
    /// Client Y to a Y inside the day column.
    pub fn content_y(&self, client_y: f64) -> f64 {
        client_y - self.top + self.scroll_top
    }
}

/// Transient styling of the block under a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragVisual {
    pub id: BlockId,
    pub translate_y: f64,
    pub z_index: i32,
    pub shadow: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    Idle,
    PointerDown {
        pointer: u32,
        target: PointerTarget,
        origin_y: f64,
    },
    Dragging {
        pointer: u32,
        id: BlockId,
        start: u32,
        end: u32,
        origin_y: f64,
        offset_y: f64,
    },
}

/// Stateful handler for taps and drags on the timeline.
#[derive(Debug, Clone)]
pub struct InteractionController {
    layout: LayoutEngine,
    config: InteractionConfig,
    viewport: Viewport,
    state: GestureState,
    scheduling: Option<InboxItem>,
}

impl InteractionController {
    pub fn new(layout: LayoutEngine, config: InteractionConfig) -> Self {
        Self {
            layout,
            config,
            viewport: Viewport::default(),
            state: GestureState::Idle,
            scheduling: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn scheduling_item(&self) -> Option<&InboxItem> {
        self.scheduling.as_ref()
    }

    pub fn is_scheduling(&self) -> bool {
        self.scheduling.is_some()
    }

    /// Styling for the block currently being dragged, if any.
    pub fn drag_visual(&self) -> Option<DragVisual> {
        match self.state {
            GestureState::Dragging { id, offset_y, .. } => Some(DragVisual {
                id,
                translate_y: offset_y,
                z_index: self.config.drag_z_index,
                shadow: true,
            }),
            _ => None,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Enter "scheduling an inbox item" mode.
    pub fn enter_scheduling(&mut self, item: InboxItem) -> Event {
        tracing::debug!(item = %item.id, "scheduling mode entered");
        let event = Event::SchedulingModeEntered {
            item_id: item.id.clone(),
            label: item.text.clone(),
        };
        self.scheduling = Some(item);
        event
    }

    /// Leave scheduling mode, on cancel or after placement.
    pub fn exit_scheduling(&mut self) -> Option<Event> {
        let item = self.scheduling.take()?;
        tracing::debug!(item = %item.id, "scheduling mode exited");
        Some(Event::SchedulingModeExited { item_id: item.id })
    }

    /// Start a gesture. Returns `false` when another gesture is unresolved.
    pub fn pointer_down(&mut self, pointer: u32, client_y: f64, target: PointerTarget) -> bool {
        if self.state != GestureState::Idle {
            tracing::debug!(pointer, "ignoring secondary pointer");
            return false;
        }
        self.state = GestureState::PointerDown {
            pointer,
            target,
            origin_y: client_y,
        };
        true
    }

    pub fn pointer_move(&mut self, pointer: u32, client_y: f64) -> Option<Event> {
        let state = self.state;
        match state {
            GestureState::PointerDown {
                pointer: p,
                target,
                origin_y,
            } if p == pointer => {
                let offset_y = client_y - origin_y;
                if !self.crosses_threshold(offset_y) {
                    return None;
                }
                match target {
                    PointerTarget::Block { id, start, end } => {
                        tracing::debug!(%id, offset_y, "drag started");
                        self.state = GestureState::Dragging {
                            pointer,
                            id,
                            start,
                            end,
                            origin_y,
                            offset_y,
                        };
                        Some(Event::DragStarted { id, offset_y })
                    }
                    // Gaps don't drag; moving past the threshold is a scroll.
                    PointerTarget::Gap(_) => {
                        self.state = GestureState::Idle;
                        None
                    }
                }
            }
            GestureState::Dragging {
                pointer: p,
                id,
                origin_y,
                ..
            } if p == pointer => {
                let offset = client_y - origin_y;
                if let GestureState::Dragging { offset_y, .. } = &mut self.state {
                    *offset_y = offset;
                }
                Some(Event::DragMoved {
                    id,
                    offset_y: offset,
                })
            }
            _ => None,
        }
    }

    /// Finish a gesture, yielding the intent (if any) and visual cleanup.
    pub fn pointer_up(&mut self, pointer: u32, client_y: f64) -> Vec<Event> {
        let state = self.state;
        let mut events = Vec::new();
        match state {
            GestureState::PointerDown {
                pointer: p,
                target,
                origin_y,
            } if p == pointer => {
                self.state = GestureState::Idle;
                let offset_y = client_y - origin_y;
                match target {
                    PointerTarget::Block { id, start, end } => {
                        if self.crosses_threshold(offset_y) {
                            events.push(Event::MoveRequested(self.drop_block(
                                id, start, end, offset_y,
                            )));
                        } else if !self.is_scheduling() {
                            events.push(Event::AuditRequested(AuditRequest { id }));
                        }
                        events.push(Event::DragVisualReset { id });
                    }
                    PointerTarget::Gap(gap) => {
                        if !self.crosses_threshold(offset_y) {
                            let content_y = self.viewport.content_y(client_y);
                            if let Some(request) = self.propose_in_gap(&gap, content_y) {
                                events.push(Event::ScheduleRequested(request));
                            }
                        }
                    }
                }
            }
            GestureState::Dragging {
                pointer: p,
                id,
                start,
                end,
                origin_y,
                ..
            } if p == pointer => {
                self.state = GestureState::Idle;
                let request = self.drop_block(id, start, end, client_y - origin_y);
                tracing::debug!(%id, new_start = request.new_start, "drag released");
                events.push(Event::MoveRequested(request));
                events.push(Event::DragVisualReset { id });
            }
            _ => {}
        }
        events
    }

    /// Abort the current gesture without emitting any intent.
    pub fn pointer_cancel(&mut self, pointer: u32) -> Option<Event> {
        let id = match self.state {
            GestureState::PointerDown {
                pointer: p,
                target,
                ..
            } if p == pointer => match target {
                PointerTarget::Block { id, .. } => Some(id),
                PointerTarget::Gap(_) => None,
            },
            GestureState::Dragging { pointer: p, id, .. } if p == pointer => Some(id),
            _ => return None,
        };
        self.state = GestureState::Idle;
        id.map(|id| Event::DragVisualReset { id })
    }

    /// Proposal for a tap at `content_y` inside `gap`.
    ///
    /// The tapped minute is snapped to the grid; if that lands outside the
    /// gap the proposal starts at the gap's own start. Gaps of one minute or
    /// less are not schedulable.
    pub fn propose_in_gap(&self, gap: &Gap, content_y: f64) -> Option<ScheduleRequest> {
        if gap.width() <= 1 {
            return None;
        }
        let raw = self.layout.to_minute(content_y);
        let snapped = snap_to_grid(raw as f64, self.config.snap_minutes);
        let proposed_start = if gap.contains(snapped) {
            snapped as u32
        } else {
            gap.start
        };
        let max_duration = gap.end - proposed_start;
        let default_duration = self.config.default_duration.min(max_duration).max(1);

        Some(ScheduleRequest {
            proposed_start,
            max_duration,
            default_duration,
            label: self.scheduling.as_ref().map(|i| i.text.clone()),
            inbox_item: self.scheduling.as_ref().map(|i| i.id.clone()),
        })
    }

    /// Where a block lands after being dragged by `offset_y` pixels:
    /// damp, convert to minutes, snap, then keep the block inside the day.
    pub fn drop_block(&self, id: BlockId, start: u32, end: u32, offset_y: f64) -> MoveRequest {
        let duration = end.saturating_sub(start);
        let damped_px = (offset_y / self.config.drag_damping).floor();
        let raw_delta = damped_px / self.layout.pixels_per_minute();
        let snapped = snap_to_grid(raw_delta, self.config.snap_minutes);
        let new_start = clamp_to_day(start as i64 + snapped, duration);
        MoveRequest {
            id,
            new_start,
            new_end: new_start + duration,
        }
    }

    fn crosses_threshold(&self, offset_y: f64) -> bool {
        offset_y.abs() > self.config.drag_threshold_px
    }
}
