//! Live tracking: start a stopwatch, stop it into a block.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::block::{BlockId, BlockType, TimeBlock};
use crate::error::ValidationError;
use crate::time_utils::{date_key, minutes_of_day, MINUTES_PER_DAY};

/// A running session, persisted so it survives restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionRepr")]
pub struct LiveSession {
    pub started_at: NaiveDateTime,
}

/// Stored shapes of a session: a local timestamp, or the older epoch
/// milliseconds under `start`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SessionRepr {
    Current { started_at: NaiveDateTime },
    EpochMillis { start: i64 },
}

impl TryFrom<SessionRepr> for LiveSession {
    type Error = String;

    fn try_from(repr: SessionRepr) -> Result<Self, Self::Error> {
        match repr {
            SessionRepr::Current { started_at } => Ok(Self { started_at }),
            SessionRepr::EpochMillis { start } => chrono::DateTime::from_timestamp_millis(start)
                .map(|t| Self::start(t.with_timezone(&chrono::Local).naive_local()))
                .ok_or_else(|| format!("session start {start} is out of range")),
        }
    }
}

impl LiveSession {
    pub fn start(now: NaiveDateTime) -> Self {
        Self { started_at: now }
    }

    pub fn elapsed_secs(&self, now: &NaiveDateTime) -> u64 {
        (*now - self.started_at).num_seconds().max(0) as u64
    }

    /// `M:SS` stopwatch label.
    pub fn elapsed_label(&self, now: &NaiveDateTime) -> String {
        format_elapsed(self.elapsed_secs(now))
    }

    /// Close the session into a block on today's date.
    ///
    /// The block runs from the start minute to the current minute and is at
    /// least one minute long.
    pub fn finish(
        self,
        now: &NaiveDateTime,
        id: BlockId,
        kind: BlockType,
        label: &str,
    ) -> Result<TimeBlock, ValidationError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "label".into(),
                message: "a session needs a label".into(),
            });
        }
        let start = minutes_of_day(&self.started_at).min(MINUTES_PER_DAY - 1);
        let end_minute = minutes_of_day(now);
        let duration = end_minute.saturating_sub(start).max(1);
        let end = (start + duration).min(MINUTES_PER_DAY);
        TimeBlock::try_new(id, start, end, kind, label, date_key(&now.date()))
    }
}

pub fn format_elapsed(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 20)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn elapsed_label_counts_minutes_and_seconds() {
        let session = LiveSession::start(at(9, 0, 0));
        assert_eq!(session.elapsed_label(&at(9, 12, 5)), "12:05");
        assert_eq!(session.elapsed_secs(&at(8, 0, 0)), 0);
    }

    #[test]
    fn finish_spans_start_to_now() {
        let block = LiveSession::start(at(9, 0, 30))
            .finish(&at(10, 15, 0), BlockId(1), BlockType::Invest, " Writing ")
            .unwrap();
        assert_eq!((block.start, block.end), (540, 615));
        assert_eq!(block.label, "Writing");
        assert_eq!(block.date_key, "2024-05-20");
    }

    #[test]
    fn very_short_sessions_last_one_minute() {
        let block = LiveSession::start(at(9, 0, 0))
            .finish(&at(9, 0, 40), BlockId(1), BlockType::Waste, "Scrolling")
            .unwrap();
        assert_eq!(block.duration(), 1);
    }

    #[test]
    fn blank_label_is_rejected() {
        assert!(LiveSession::start(at(9, 0, 0))
            .finish(&at(9, 30, 0), BlockId(1), BlockType::Waste, "")
            .is_err());
    }

    #[test]
    fn reads_both_stored_shapes() {
        let session = LiveSession::start(at(9, 0, 0));
        let json = serde_json::to_string(&session).unwrap();
        assert_eq!(serde_json::from_str::<LiveSession>(&json).unwrap(), session);

        let legacy: LiveSession = serde_json::from_str(r#"{"start": 0}"#).unwrap();
        let epoch = chrono::DateTime::from_timestamp_millis(0).unwrap();
        assert_eq!(legacy.started_at, epoch.with_timezone(&chrono::Local).naive_local());
        assert!(serde_json::from_str::<LiveSession>(r#"{"start": 9223372036854775807}"#).is_err());
    }
}
