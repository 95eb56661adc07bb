//! The ledger document: every block, the inbox, rules, routines and the
//! running session, kept as one JSON file.
//!
//! Stored at `~/.config/timestack/ledger.json`. A missing file loads as an
//! empty ledger. Records that fail to parse are skipped one by one; a file
//! that is not a ledger at all is moved aside to `ledger.json.bak` before
//! anything can be saved over it.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::block::{BlockId, Decision, TimeBlock};
use crate::dashboard::Summary;
use crate::error::{Result, StorageError, ValidationError};
use crate::inbox::Inbox;
use crate::interaction::MoveRequest;
use crate::review::{Routine, RuleBook};
use crate::session::LiveSession;
use crate::time_utils::MINUTES_PER_DAY;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerDocument {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub blocks: Vec<TimeBlock>,
    #[serde(default, deserialize_with = "lenient_inbox")]
    pub inbox: Inbox,
    #[serde(default, deserialize_with = "lenient_rules")]
    pub rules: RuleBook,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub routines: Vec<Routine>,
    #[serde(default, deserialize_with = "lenient_session")]
    pub current_session: Option<LiveSession>,
}

/// Parse a list record by record, keeping the ones that read cleanly.
fn lenient_vec<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let records = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(records) => records,
        serde_json::Value::Null => return Ok(Vec::new()),
        other => {
            tracing::warn!(value = %other, "expected a list in the ledger, ignoring it");
            return Ok(Vec::new());
        }
    };
    Ok(records
        .into_iter()
        .filter_map(|record| match serde_json::from_value(record.clone()) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(error = %e, %record, "skipping unreadable ledger record");
                None
            }
        })
        .collect())
}

fn lenient_inbox<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Inbox, D::Error> {
    lenient_vec(deserializer).map(Inbox::from)
}

fn lenient_rules<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<RuleBook, D::Error> {
    lenient_vec(deserializer).map(RuleBook::from)
}

/// A session that cannot be read is dropped rather than failing the ledger.
fn lenient_session<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<LiveSession>, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        value => match serde_json::from_value(value.clone()) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(error = %e, %value, "dropping unreadable live session");
                Ok(None)
            }
        },
    }
}

impl LedgerDocument {
    // ── Queries ──────────────────────────────────────────────────────

    /// Blocks logged on `date_key`, unordered, each brought back within the
    /// day's bounds. Blocks that cannot be repaired are left out.
    pub fn blocks_for_day(&self, date_key: &str) -> Vec<TimeBlock> {
        self.blocks
            .iter()
            .filter(|b| b.date_key == date_key)
            .cloned()
            .filter_map(TimeBlock::sanitize)
            .collect()
    }

    pub fn block(&self, id: BlockId) -> Option<&TimeBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// A fresh id, never colliding with an existing one.
    pub fn next_block_id(&self, now_ms: u64) -> BlockId {
        BlockId::next_after(self.blocks.iter().map(|b| b.id).max(), now_ms)
    }

    /// Totals across every logged block, for the weekly review.
    pub fn summary(&self) -> Summary {
        Summary::of(&self.blocks)
    }

    // ── Blocks ───────────────────────────────────────────────────────

    pub fn add_block(&mut self, block: TimeBlock) -> Result<(), ValidationError> {
        if self.block(block.id).is_some() {
            return Err(ValidationError::InvalidValue {
                field: "id".into(),
                message: format!("block {} already exists", block.id),
            });
        }
        tracing::info!(id = %block.id, start = block.start, end = block.end, "block added");
        self.blocks.push(block);
        Ok(())
    }

    /// Apply a drag result. The stored duration is kept.
    pub fn move_block(&mut self, request: &MoveRequest) -> Result<(), ValidationError> {
        let block = self.block_mut(request.id)?;
        let duration = block.duration();
        if request.new_start + duration > MINUTES_PER_DAY {
            return Err(ValidationError::InvalidMinuteRange {
                start: request.new_start as i64,
                end: (request.new_start + duration) as i64,
            });
        }
        block.start = request.new_start;
        block.end = request.new_start + duration;
        tracing::info!(id = %request.id, start = block.start, end = block.end, "block moved");
        Ok(())
    }

    /// Record a judge verdict on a block and remember it as a rule.
    pub fn judge(&mut self, id: BlockId, decision: Decision) -> Result<(), ValidationError> {
        let block = self.block_mut(id)?;
        block.decision = Some(decision);
        let label = block.label.clone();
        self.rules.upsert(&label, decision);
        tracing::info!(%id, decision = decision.as_str(), "block judged");
        Ok(())
    }

    pub fn delete_block(&mut self, id: BlockId) -> Result<TimeBlock, ValidationError> {
        let pos = self
            .blocks
            .iter()
            .position(|b| b.id == id)
            .ok_or(ValidationError::UnknownBlock(id.0))?;
        tracing::info!(%id, "block deleted");
        Ok(self.blocks.remove(pos))
    }

    /// Drop every block, keeping rules, routines and the inbox.
    pub fn reset_week(&mut self) -> usize {
        let cleared = self.blocks.len();
        self.blocks.clear();
        tracing::info!(cleared, "week reset");
        cleared
    }

    // ── Routines ─────────────────────────────────────────────────────

    pub fn add_routine(&mut self, routine: Routine) {
        self.routines.push(routine);
    }

    /// Create each routine's block on `date_key` unless it is already there.
    pub fn materialize_routines(&mut self, date_key: &str, now_ms: u64) -> Result<usize, ValidationError> {
        let mut created = 0;
        for routine in self.routines.clone() {
            let present = self
                .blocks
                .iter()
                .any(|b| b.date_key == date_key && routine.owns(b));
            if present {
                continue;
            }
            let id = self.next_block_id(now_ms);
            self.blocks.push(routine.instance(id, date_key)?);
            created += 1;
        }
        Ok(created)
    }

    /// Remove a routine and its instances dated after `today_key`.
    ///
    /// Past and present instances stay; they are history.
    pub fn remove_routine(&mut self, id: &str, today_key: &str) -> Result<usize, ValidationError> {
        let pos = self
            .routines
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| ValidationError::UnknownRoutine(id.to_string()))?;
        let routine = self.routines.remove(pos);
        let before = self.blocks.len();
        self.blocks
            .retain(|b| !(b.date_key.as_str() > today_key && routine.owns(b)));
        let removed = before - self.blocks.len();
        tracing::info!(routine = %routine.id, removed, "routine removed");
        Ok(removed)
    }

    fn block_mut(&mut self, id: BlockId) -> Result<&mut TimeBlock, ValidationError> {
        self.blocks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(ValidationError::UnknownBlock(id.0))
    }
}

/// Where the ledger document lives.
pub trait LedgerStore {
    fn load(&self) -> Result<LedgerDocument>;

    fn save(&mut self, doc: &LedgerDocument) -> Result<()>;
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `ledger.json` in the data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(data_dir()?.join("ledger.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// First of `ledger.json.bak`, `ledger.json.bak.1`, ... not yet taken.
    fn backup_path(&self) -> PathBuf {
        let mut candidate = self.path.with_extension("json.bak");
        let mut n = 1;
        while candidate.exists() {
            candidate = self.path.with_extension(format!("json.bak.{n}"));
            n += 1;
        }
        candidate
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self) -> Result<LedgerDocument> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LedgerDocument::default());
            }
            Err(source) => {
                return Err(StorageError::ReadFailed {
                    path: self.path.clone(),
                    source,
                }
                .into())
            }
        };
        match serde_json::from_str(&content) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                let backup = self.backup_path();
                tracing::warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    error = %e,
                    "unreadable ledger, moving it aside and starting empty"
                );
                std::fs::rename(&self.path, &backup)
                    .map_err(|source| StorageError::WriteFailed { path: backup, source })?;
                Ok(LedgerDocument::default())
            }
        }
    }

    /// Write to a sibling temp file and rename over the ledger, so a reader
    /// never sees a half-written document.
    fn save(&mut self, doc: &LedgerDocument) -> Result<()> {
        let content = serde_json::to_string_pretty(doc)?;
        let tmp = self.path.with_extension("json.tmp");
        let write_failed = |source| StorageError::WriteFailed {
            path: self.path.clone(),
            source,
        };
        std::fs::write(&tmp, content).map_err(write_failed)?;
        std::fs::rename(&tmp, &self.path).map_err(write_failed)?;
        Ok(())
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    doc: LedgerDocument,
}

impl MemoryStore {
    pub fn new(doc: LedgerDocument) -> Self {
        Self { doc }
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> Result<LedgerDocument> {
        Ok(self.doc.clone())
    }

    fn save(&mut self, doc: &LedgerDocument) -> Result<()> {
        self.doc = doc.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockType;
    use crate::review::Routine;

    fn block(id: u64, start: u32, end: u32, day: &str) -> TimeBlock {
        TimeBlock::try_new(BlockId(id), start, end, BlockType::Invest, "Email", day).unwrap()
    }

    #[test]
    fn blocks_are_partitioned_by_day() {
        let mut doc = LedgerDocument::default();
        doc.add_block(block(1, 0, 30, "2024-05-20")).unwrap();
        doc.add_block(block(2, 0, 30, "2024-05-21")).unwrap();
        assert_eq!(doc.blocks_for_day("2024-05-20").len(), 1);
        assert!(doc.add_block(block(2, 60, 90, "2024-05-22")).is_err());
    }

    #[test]
    fn next_id_skips_existing() {
        let mut doc = LedgerDocument::default();
        doc.add_block(block(5_000, 0, 30, "d")).unwrap();
        assert_eq!(doc.next_block_id(1_000), BlockId(5_001));
        assert_eq!(doc.next_block_id(9_000), BlockId(9_000));
    }

    #[test]
    fn move_keeps_duration() {
        let mut doc = LedgerDocument::default();
        doc.add_block(block(1, 480, 540, "d")).unwrap();
        doc.move_block(&MoveRequest {
            id: BlockId(1),
            new_start: 495,
            new_end: 555,
        })
        .unwrap();
        let b = doc.block(BlockId(1)).unwrap();
        assert_eq!((b.start, b.end), (495, 555));
        assert!(doc
            .move_block(&MoveRequest {
                id: BlockId(1),
                new_start: 1400,
                new_end: 1460,
            })
            .is_err());
        assert_eq!(
            doc.move_block(&MoveRequest {
                id: BlockId(9),
                new_start: 0,
                new_end: 60,
            }),
            Err(ValidationError::UnknownBlock(9))
        );
    }

    #[test]
    fn judging_records_a_rule() {
        let mut doc = LedgerDocument::default();
        doc.add_block(block(1, 480, 540, "d")).unwrap();
        doc.judge(BlockId(1), Decision::Automate).unwrap();
        assert_eq!(doc.block(BlockId(1)).unwrap().decision, Some(Decision::Automate));
        assert_eq!(doc.rules.lookup("email").unwrap().decision, Decision::Automate);
    }

    #[test]
    fn removing_a_routine_only_cascades_into_the_future() {
        let mut doc = LedgerDocument::default();
        let routine = Routine::new("Gym", BlockType::Invest, 420, 480).unwrap();
        let routine_id = routine.id.clone();
        doc.add_routine(routine);
        for day in ["2024-05-19", "2024-05-20", "2024-05-21", "2024-05-22"] {
            assert_eq!(doc.materialize_routines(day, 1_000).unwrap(), 1);
        }
        assert_eq!(doc.materialize_routines("2024-05-22", 1_000).unwrap(), 0);
        doc.add_block(
            TimeBlock::try_new(BlockId(1), 420, 480, BlockType::Invest, "gym", "2024-05-22").unwrap(),
        )
        .unwrap();

        assert_eq!(doc.remove_routine(&routine_id, "2024-05-20").unwrap(), 2);
        assert!(doc.routines.is_empty());
        let remaining: Vec<&str> = doc.blocks.iter().map(|b| b.date_key.as_str()).collect();
        assert_eq!(remaining, vec!["2024-05-19", "2024-05-20", "2024-05-22"]);
        assert!(doc.remove_routine(&routine_id, "2024-05-20").is_err());
    }

    #[test]
    fn reset_week_keeps_rules() {
        let mut doc = LedgerDocument::default();
        doc.add_block(block(1, 0, 30, "d")).unwrap();
        doc.judge(BlockId(1), Decision::Delete).unwrap();
        assert_eq!(doc.reset_week(), 1);
        assert!(doc.blocks.is_empty());
        assert_eq!(doc.rules.rules().len(), 1);
    }

    #[test]
    fn json_store_roundtrip_and_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.load().unwrap(), LedgerDocument::default());

        let mut doc = LedgerDocument::default();
        doc.add_block(block(1, 0, 30, "2024-05-20")).unwrap();
        doc.inbox.add("Taxes");
        store.save(&doc).unwrap();
        assert_eq!(store.load().unwrap(), doc);

        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(store.load().unwrap(), LedgerDocument::default());
        let backup = dir.path().join("ledger.json.bak");
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "{not json");
        assert!(!path.exists());
    }

    #[test]
    fn unparseable_ledger_survives_the_next_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(&path, "[1, 2").unwrap();
        std::fs::write(dir.path().join("ledger.json.bak"), "older").unwrap();

        let mut store = JsonFileStore::new(&path);
        let mut doc = store.load().unwrap();
        doc.add_block(block(1, 0, 30, "2024-05-20")).unwrap();
        store.save(&doc).unwrap();

        let older = std::fs::read_to_string(dir.path().join("ledger.json.bak")).unwrap();
        let moved = std::fs::read_to_string(dir.path().join("ledger.json.bak.1")).unwrap();
        assert_eq!((older.as_str(), moved.as_str()), ("older", "[1, 2"));
        assert_eq!(store.load().unwrap(), doc);
    }

    #[test]
    fn bad_records_are_skipped_one_by_one() {
        let json = r#"{
            "blocks": [
                {"id": 1, "start": 60, "end": 90, "type": "INVEST", "label": "Good", "dateKey": "2024-05-20"},
                {"id": 2, "start": 90, "end": 120, "type": "OTHER", "label": "Bad", "dateKey": "2024-05-20"}
            ],
            "inbox": [{"id": 1716192000000, "text": "Taxes"}, {"text": "no id"}],
            "rules": [{"label": "Email", "decision": "automate"}, {"label": "x", "decision": "maybe"}],
            "routines": "not a list",
            "currentSession": {"start": "soon"}
        }"#;
        let doc: LedgerDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0].label, "Good");
        assert_eq!(doc.inbox.len(), 1);
        assert_eq!(doc.inbox.items()[0].id, "1716192000000");
        assert_eq!(doc.rules.rules().len(), 1);
        assert!(doc.routines.is_empty());
        assert!(doc.current_session.is_none());
    }

    #[test]
    fn reads_epoch_millisecond_sessions() {
        let json = r#"{"currentSession": {"start": 1716192000000}}"#;
        let doc: LedgerDocument = serde_json::from_str(json).unwrap();
        let expected = chrono::DateTime::from_timestamp_millis(1_716_192_000_000)
            .unwrap()
            .with_timezone(&chrono::Local)
            .naive_local();
        assert_eq!(doc.current_session, Some(LiveSession::start(expected)));
    }

    #[test]
    fn reads_documents_with_unknown_and_missing_fields() {
        let json = r#"{
            "settings": {"wakeUp": "06:00"},
            "blocks": [
                {"id": 1, "start": 30, "end": 20, "type": "WASTE", "label": "x", "dateKey": "2024-05-20"},
                {"id": 2, "start": 60, "end": 90, "type": "INVEST", "label": "y", "dateKey": "2024-05-20"}
            ],
            "currentSession": null
        }"#;
        let doc: LedgerDocument = serde_json::from_str(json).unwrap();
        assert!(doc.inbox.is_empty());
        let day = doc.blocks_for_day("2024-05-20");
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].id, BlockId(2));
    }
}
