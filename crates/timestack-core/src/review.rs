//! Judge-flow rules and recurring routines.
//!
//! Both join against blocks by normalized label (trimmed, case-insensitive).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::block::{normalize_label, BlockId, BlockType, Decision, TimeBlock};
use crate::error::ValidationError;
use crate::time_utils::MINUTES_PER_DAY;

/// A standing verdict on an activity, collected for the weekly review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemRule {
    pub label: String,
    pub decision: Decision,
}

/// Rules keyed by normalized label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleBook {
    rules: Vec<SystemRule>,
}

impl From<Vec<SystemRule>> for RuleBook {
    fn from(rules: Vec<SystemRule>) -> Self {
        Self { rules }
    }
}

impl RuleBook {
    pub fn rules(&self) -> &[SystemRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Insert a rule, replacing the decision of one with the same label.
    pub fn upsert(&mut self, label: &str, decision: Decision) {
        let key = normalize_label(label);
        match self
            .rules
            .iter_mut()
            .find(|r| normalize_label(&r.label) == key)
        {
            Some(rule) => rule.decision = decision,
            None => self.rules.push(SystemRule {
                label: label.trim().to_string(),
                decision,
            }),
        }
    }

    pub fn lookup(&self, label: &str) -> Option<&SystemRule> {
        let key = normalize_label(label);
        self.rules.iter().find(|r| normalize_label(&r.label) == key)
    }
}

/// A block that recurs every day it is materialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: BlockType,
    pub start: u32,
    pub end: u32,
}

impl Routine {
    pub fn new(
        label: &str,
        kind: BlockType,
        start: u32,
        end: u32,
    ) -> Result<Self, ValidationError> {
        if end <= start || end > MINUTES_PER_DAY {
            return Err(ValidationError::InvalidMinuteRange {
                start: start as i64,
                end: end as i64,
            });
        }
        let label = label.trim();
        if label.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "label".into(),
                message: "a routine needs a label".into(),
            });
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            label: label.to_string(),
            kind,
            start,
            end,
        })
    }

    /// The routine's block on `date_key`, already judged as a routine.
    pub fn instance(&self, id: BlockId, date_key: &str) -> Result<TimeBlock, ValidationError> {
        Ok(
            TimeBlock::try_new(id, self.start, self.end, self.kind, &self.label, date_key)?
                .with_decision(Decision::Routine),
        )
    }

    /// Whether `block` was produced by this routine.
    pub fn owns(&self, block: &TimeBlock) -> bool {
        block.decision == Some(Decision::Routine) && block.label_key() == normalize_label(&self.label)
    }
}
