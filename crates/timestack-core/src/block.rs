//! Time blocks: the labeled intervals a day is logged into.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::time_utils::MINUTES_PER_DAY;

/// Store-wide unique block identifier.
///
/// Allocated from epoch milliseconds and bumped past the last id handed out,
/// so ids are monotonic even when two blocks are created in the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u64);

impl BlockId {
    pub fn next_after(last: Option<BlockId>, now_ms: u64) -> Self {
        match last {
            Some(BlockId(prev)) if prev >= now_ms => BlockId(prev + 1),
            _ => BlockId(now_ms),
        }
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the time in a block was spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockType {
    Invest,
    Waste,
}

impl BlockType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invest => "INVEST",
            Self::Waste => "WASTE",
        }
    }
}

impl std::str::FromStr for BlockType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "invest" => Ok(Self::Invest),
            "waste" => Ok(Self::Waste),
            other => Err(ValidationError::InvalidValue {
                field: "type".into(),
                message: format!("expected invest or waste, got '{other}'"),
            }),
        }
    }
}

/// Audit outcome attached to a block after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Delete,
    Delegate,
    Automate,
    Routine,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Delegate => "delegate",
            Self::Automate => "automate",
            Self::Routine => "routine",
        }
    }

    /// Badge shown on the timeline and in the weekly review.
    pub fn badge(&self) -> &'static str {
        match self {
            Self::Delete => "ELIMINATE",
            Self::Delegate => "DELEGATE",
            Self::Automate => "SYSTEMATIZE",
            Self::Routine => "ROUTINE",
        }
    }
}

impl std::str::FromStr for Decision {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delete" => Ok(Self::Delete),
            "delegate" => Ok(Self::Delegate),
            "automate" => Ok(Self::Automate),
            "routine" => Ok(Self::Routine),
            other => Err(ValidationError::InvalidValue {
                field: "decision".into(),
                message: format!("expected delete, delegate, automate or routine, got '{other}'"),
            }),
        }
    }
}

/// A labeled interval logged against one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlock {
    pub id: BlockId,
    #[serde(deserialize_with = "clamped_minute")]
    pub start: u32,
    #[serde(deserialize_with = "clamped_minute")]
    pub end: u32,
    #[serde(rename = "type")]
    pub kind: BlockType,
    pub label: String,
    pub date_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
}

impl TimeBlock {
    /// Create a block, rejecting empty or out-of-day ranges.
    pub fn try_new(
        id: BlockId,
        start: u32,
        end: u32,
        kind: BlockType,
        label: impl Into<String>,
        date_key: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if end <= start || end > MINUTES_PER_DAY {
            return Err(ValidationError::InvalidMinuteRange {
                start: start as i64,
                end: end as i64,
            });
        }
        Ok(Self {
            id,
            start,
            end,
            kind,
            label: label.into(),
            date_key: date_key.into(),
            decision: None,
        })
    }

    pub fn with_decision(mut self, decision: Decision) -> Self {
        self.decision = Some(decision);
        self
    }

    pub fn duration(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Blocks without an audit decision are flagged on the timeline.
    pub fn needs_audit(&self) -> bool {
        self.decision.is_none()
    }

    /// Strict overlap; touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Join key for rules and routines.
    pub fn label_key(&self) -> String {
        normalize_label(&self.label)
    }

    /// Bring a block read from outside into the model's invariants.
    ///
    /// Minutes are already clamped into `0..=1440` on deserialization; a
    /// block that still has `end <= start` is dropped.
    pub fn sanitize(self) -> Option<Self> {
        let start = self.start.min(MINUTES_PER_DAY);
        let end = self.end.min(MINUTES_PER_DAY);
        if end <= start {
            tracing::warn!(id = %self.id, start, end, "dropping empty block");
            return None;
        }
        Some(Self { start, end, ..self })
    }
}

/// Trimmed, case-insensitive form of a label.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

fn clamped_minute<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Ok(0);
    }
    let clamped = raw.round().clamp(0.0, MINUTES_PER_DAY as f64) as u32;
    if clamped as f64 != raw {
        tracing::warn!(raw, clamped, "clamped out-of-range minute");
    }
    Ok(clamped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(start: u32, end: u32) -> TimeBlock {
        TimeBlock::try_new(BlockId(1), start, end, BlockType::Invest, "Deep work", "2024-05-20")
            .unwrap()
    }

    #[test]
    fn try_new_rejects_empty_and_overflowing_ranges() {
        assert!(TimeBlock::try_new(BlockId(1), 60, 60, BlockType::Waste, "x", "d").is_err());
        assert!(TimeBlock::try_new(BlockId(1), 60, 30, BlockType::Waste, "x", "d").is_err());
        assert!(TimeBlock::try_new(BlockId(1), 1400, 1441, BlockType::Waste, "x", "d").is_err());
        assert!(TimeBlock::try_new(BlockId(1), 1439, 1440, BlockType::Waste, "x", "d").is_ok());
    }

    #[test]
    fn overlap_is_strict() {
        assert!(block(0, 60).overlaps(&block(30, 90)));
        assert!(!block(0, 60).overlaps(&block(60, 90)));
    }

    #[test]
    fn ids_are_monotonic() {
        assert_eq!(BlockId::next_after(None, 1000), BlockId(1000));
        assert_eq!(BlockId::next_after(Some(BlockId(999)), 1000), BlockId(1000));
        assert_eq!(BlockId::next_after(Some(BlockId(1000)), 1000), BlockId(1001));
        assert_eq!(BlockId::next_after(Some(BlockId(5000)), 1000), BlockId(5001));
    }

    #[test]
    fn deserialization_clamps_minutes_and_sanitize_drops_empty() {
        let json = r#"{"id":7,"start":-30,"end":1500,"type":"WASTE","label":"Scroll","dateKey":"2024-05-20"}"#;
        let b: TimeBlock = serde_json::from_str(json).unwrap();
        assert_eq!((b.start, b.end), (0, 1440));
        assert!(b.sanitize().is_some());

        let json = r#"{"id":8,"start":1500,"end":1600,"type":"INVEST","label":"x","dateKey":"2024-05-20","decision":"routine"}"#;
        let b: TimeBlock = serde_json::from_str(json).unwrap();
        assert_eq!(b.decision, Some(Decision::Routine));
        assert!(b.sanitize().is_none());
    }

    #[test]
    fn serializes_with_ledger_field_names() {
        let b = block(30, 90).with_decision(Decision::Automate);
        let v = serde_json::to_value(&b).unwrap();
        assert_eq!(v["type"], "INVEST");
        assert_eq!(v["dateKey"], "2024-05-20");
        assert_eq!(v["decision"], "automate");
        assert!(serde_json::to_value(block(0, 1)).unwrap().get("decision").is_none());
    }

    #[test]
    fn parses_user_text() {
        assert_eq!(" Waste ".parse::<BlockType>().unwrap(), BlockType::Waste);
        assert_eq!("DELEGATE".parse::<Decision>().unwrap(), Decision::Delegate);
        assert!("later".parse::<Decision>().is_err());
        assert_eq!(normalize_label("  Email  "), "email");
    }
}
