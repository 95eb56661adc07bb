use serde::{Deserialize, Serialize};

use crate::block::BlockId;
use crate::interaction::{AuditRequest, Intent, MoveRequest, ScheduleRequest};

/// Every gesture transition and clock tick produces an Event.
/// The shell applies the requests and repaints for the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Pointer crossed the drag threshold over a block.
    DragStarted { id: BlockId, offset_y: f64 },
    /// Live presentational offset while dragging; no data has changed.
    DragMoved { id: BlockId, offset_y: f64 },
    /// Transform, shadow and z-index of the block go back to normal.
    /// Emitted on every exit path of a block gesture.
    DragVisualReset { id: BlockId },
    ScheduleRequested(ScheduleRequest),
    MoveRequested(MoveRequest),
    AuditRequested(AuditRequest),
    SchedulingModeEntered { item_id: String, label: String },
    SchedulingModeExited { item_id: String },
    /// Minute tick: the now line moved.
    NowTick { minute: u32, remaining_minutes: u32 },
    /// Second tick while a live session runs.
    ElapsedTick { elapsed_secs: u64, label: String },
}

impl Event {
    /// The mutation intent carried by this event, if any.
    pub fn intent(&self) -> Option<Intent> {
        match self {
            Self::ScheduleRequested(r) => Some(Intent::Schedule(r.clone())),
            Self::MoveRequested(r) => Some(Intent::Move(*r)),
            Self::AuditRequested(r) => Some(Intent::Audit(*r)),
            _ => None,
        }
    }
}
