//! Composition root for one day on screen.
//!
//! Holds the viewed date, the gesture controller and the ledger, and applies
//! the intents the controller emits. Every mutation is made on a copy of the
//! ledger, saved, then swapped in, so a render never observes a half-applied
//! change and a failed save leaves the view untouched.
//!
//! The view also owns the [`DayClock`]: the stopwatch ticker runs exactly
//! while the ledger has a live session, and [`DayView::teardown`] stops both.

use chrono::{NaiveDate, NaiveDateTime};

use crate::block::{BlockId, BlockType, Decision, TimeBlock};
use crate::clock::DayClock;
use crate::dashboard::{remaining_for, Remaining, Summary};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::inbox::InboxItem;
use crate::interaction::{InteractionController, MoveRequest, ScheduleRequest};
use crate::review::Routine;
use crate::session::LiveSession;
use crate::storage::{Config, DayConfig, LedgerDocument, LedgerStore};
use crate::time_utils::{date_key, minutes_of_day};
use crate::timeline::{day_horizon, LayoutEngine, RenderFrame};

pub struct DayView<S: LedgerStore> {
    store: S,
    doc: LedgerDocument,
    view_date: NaiveDate,
    layout: LayoutEngine,
    controller: InteractionController,
    day: DayConfig,
    clock: DayClock,
}

impl<S: LedgerStore> DayView<S> {
    /// Open the view on today.
    pub fn open(store: S, config: &Config, now: &NaiveDateTime) -> Result<Self> {
        let doc = store.load()?;
        let layout = LayoutEngine::new(config.layout.clone());
        let controller = InteractionController::new(layout.clone(), config.interaction.clone());
        let mut clock = DayClock::new(*now);
        if let Some(session) = doc.current_session {
            clock.start_session(session, *now);
        }
        Ok(Self {
            store,
            doc,
            view_date: now.date(),
            layout,
            controller,
            day: config.day.clone(),
            clock,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn view_date(&self) -> NaiveDate {
        self.view_date
    }

    pub fn view_key(&self) -> String {
        date_key(&self.view_date)
    }

    pub fn is_today(&self, now: &NaiveDateTime) -> bool {
        self.view_date == now.date()
    }

    pub fn document(&self) -> &LedgerDocument {
        &self.doc
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Pointer events go straight to the controller.
    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    pub fn blocks(&self) -> Vec<TimeBlock> {
        self.doc.blocks_for_day(&self.view_key())
    }

    pub fn render(&self, container_width: f64, now: &NaiveDateTime) -> RenderFrame {
        let horizon = day_horizon(self.view_date, now);
        let now_minute = self.is_today(now).then(|| minutes_of_day(now));
        self.layout
            .render(container_width, &self.blocks(), horizon, now_minute)
    }

    pub fn summary(&self) -> Summary {
        Summary::of(&self.blocks())
    }

    pub fn remaining(&self, now: &NaiveDateTime) -> Option<Remaining> {
        remaining_for(self.view_date, now, self.day.low_remaining_minutes)
    }

    pub fn clock(&self) -> &DayClock {
        &self.clock
    }

    // ── Clock ────────────────────────────────────────────────────────

    /// Poll the now-line and stopwatch tickers.
    pub fn tick(&mut self, now: NaiveDateTime) -> Vec<Event> {
        self.clock.tick(now)
    }

    /// Stop both tickers; the view is going away.
    pub fn teardown(&mut self) {
        self.clock.teardown();
    }

    // ── Navigation ───────────────────────────────────────────────────

    pub fn prev_day(&mut self) {
        if let Some(prev) = self.view_date.pred_opt() {
            self.view_date = prev;
        }
    }

    /// Step forward; there is nothing to log past today.
    pub fn next_day(&mut self, now: &NaiveDateTime) -> bool {
        if self.is_today(now) {
            return false;
        }
        match self.view_date.succ_opt() {
            Some(next) => {
                self.view_date = next;
                true
            }
            None => false,
        }
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.view_date = date;
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub fn apply_move(&mut self, request: &MoveRequest) -> Result<()> {
        self.commit(|doc| Ok(doc.move_block(request)?))
    }

    /// Finalize a schedule request into a block on the viewed day.
    ///
    /// When the request came from scheduling mode the inbox item is removed
    /// and the mode ends.
    pub fn schedule(
        &mut self,
        request: &ScheduleRequest,
        duration: Option<u32>,
        kind: BlockType,
        label: Option<&str>,
        now_ms: u64,
    ) -> Result<TimeBlock> {
        let view_key = self.view_key();
        let block = self.commit(|doc| {
            let id = doc.next_block_id(now_ms);
            let block = request.finalize(id, duration, kind, label, &view_key)?;
            doc.add_block(block.clone())?;
            if let Some(item) = &request.inbox_item {
                doc.inbox.remove(item)?;
            }
            Ok(block)
        })?;
        if request.inbox_item.is_some() {
            self.controller.exit_scheduling();
        }
        Ok(block)
    }

    pub fn judge(&mut self, id: BlockId, decision: Decision) -> Result<()> {
        self.commit(|doc| Ok(doc.judge(id, decision)?))
    }

    pub fn delete(&mut self, id: BlockId) -> Result<TimeBlock> {
        self.commit(|doc| Ok(doc.delete_block(id)?))
    }

    /// Pick an inbox item for placement; the view jumps to today.
    pub fn start_scheduling(&mut self, item_id: &str, now: &NaiveDateTime) -> Result<Event> {
        let item = self
            .doc
            .inbox
            .get(item_id)
            .cloned()
            .ok_or_else(|| ValidationError::UnknownInboxItem(item_id.to_string()))?;
        if !self.is_today(now) {
            self.view_date = now.date();
        }
        Ok(self.controller.enter_scheduling(item))
    }

    pub fn cancel_scheduling(&mut self) -> Option<Event> {
        self.controller.exit_scheduling()
    }

    /// Start the stopwatch; a running session is left alone.
    pub fn start_session(&mut self, now: &NaiveDateTime) -> Result<LiveSession> {
        if let Some(session) = self.doc.current_session {
            return Ok(session);
        }
        let session = LiveSession::start(*now);
        self.commit(|doc| {
            doc.current_session = Some(session);
            Ok(())
        })?;
        self.clock.start_session(session, *now);
        Ok(session)
    }

    /// Stop the stopwatch into a block on today. `None` when nothing runs.
    pub fn finish_session(
        &mut self,
        now: &NaiveDateTime,
        now_ms: u64,
        kind: BlockType,
        label: &str,
    ) -> Result<Option<TimeBlock>> {
        let finished = self.commit(|doc| {
            let Some(session) = doc.current_session.take() else {
                return Ok(None);
            };
            let id = doc.next_block_id(now_ms);
            let block = session.finish(now, id, kind, label)?;
            doc.add_block(block.clone())?;
            Ok(Some(block))
        })?;
        self.clock.stop_session();
        Ok(finished)
    }

    /// Log a block directly, outside the gesture flow.
    pub fn add_block(
        &mut self,
        start: u32,
        end: u32,
        kind: BlockType,
        label: &str,
        now_ms: u64,
    ) -> Result<TimeBlock> {
        let view_key = self.view_key();
        self.commit(|doc| {
            let id = doc.next_block_id(now_ms);
            let block = TimeBlock::try_new(id, start, end, kind, label.trim(), &view_key)?;
            doc.add_block(block.clone())?;
            Ok(block)
        })
    }

    pub fn capture(&mut self, text: &str) -> Result<InboxItem> {
        self.commit(|doc| {
            let item = doc.inbox.add(text).cloned().ok_or_else(|| {
                ValidationError::InvalidValue {
                    field: "text".into(),
                    message: "inbox items need text".into(),
                }
            })?;
            Ok(item)
        })
    }

    pub fn discard(&mut self, item_id: &str) -> Result<InboxItem> {
        self.commit(|doc| Ok(doc.inbox.remove(item_id)?))
    }

    pub fn add_routine(&mut self, routine: Routine) -> Result<()> {
        self.commit(|doc| {
            doc.add_routine(routine);
            Ok(())
        })
    }

    /// Create the viewed day's routine blocks that are not there yet.
    pub fn materialize_routines(&mut self, now_ms: u64) -> Result<usize> {
        let view_key = self.view_key();
        self.commit(|doc| Ok(doc.materialize_routines(&view_key, now_ms)?))
    }

    pub fn remove_routine(&mut self, id: &str, now: &NaiveDateTime) -> Result<usize> {
        let today = date_key(&now.date());
        self.commit(|doc| Ok(doc.remove_routine(id, &today)?))
    }

    pub fn reset_week(&mut self) -> Result<usize> {
        self.commit(|doc| Ok(doc.reset_week()))
    }

    fn commit<T>(&mut self, f: impl FnOnce(&mut LedgerDocument) -> Result<T>) -> Result<T> {
        let mut next = self.doc.clone();
        let out = f(&mut next)?;
        self.store.save(&next)?;
        self.doc = next;
        Ok(out)
    }
}
