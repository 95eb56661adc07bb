//! Mutation intents emitted by the gesture controller.
//!
//! The core never writes storage itself; the shell applies these.

use serde::{Deserialize, Serialize};

use crate::block::{BlockId, BlockType, TimeBlock};
use crate::error::ValidationError;

/// A tap landed in a gap: propose a new block there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub proposed_start: u32,
    /// Remaining width of the gap from `proposed_start`.
    pub max_duration: u32,
    /// Pre-selected duration, never above `max_duration` and at least 1.
    pub default_duration: u32,
    /// Set when placing an inbox item.
    pub label: Option<String>,
    pub inbox_item: Option<String>,
}

impl ScheduleRequest {
    pub fn end(&self) -> u32 {
        self.proposed_start + self.default_duration
    }

    /// Turn the proposal into a block.
    ///
    /// `duration` falls back to the default and is kept within
    /// `1..=max_duration`. An inbox label takes precedence over `label`.
    pub fn finalize(
        &self,
        id: BlockId,
        duration: Option<u32>,
        kind: BlockType,
        label: Option<&str>,
        date_key: &str,
    ) -> Result<TimeBlock, ValidationError> {
        let duration = duration
            .unwrap_or(self.default_duration)
            .clamp(1, self.max_duration.max(1));
        let label = self
            .label
            .as_deref()
            .or(label)
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "label".into(),
                message: "a new block needs a label".into(),
            })?;
        TimeBlock::try_new(
            id,
            self.proposed_start,
            self.proposed_start + duration,
            kind,
            label,
            date_key,
        )
    }
}

/// A drag finished: move a block, keeping its duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub id: BlockId,
    pub new_start: u32,
    pub new_end: u32,
}

/// A block was tapped: open the judge flow for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRequest {
    pub id: BlockId,
}

/// Any of the three intents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "lowercase")]
pub enum Intent {
    Schedule(ScheduleRequest),
    Move(MoveRequest),
    Audit(AuditRequest),
}
