//! Wall-clock tickers for the now line and the live stopwatch.
//!
//! Like the rest of the core this runs without threads: the caller polls
//! [`DayClock::tick`] from its event loop and repaints on the events it gets
//! back. Both tickers can be cancelled; the stopwatch stops on its own when
//! the session ends.

use chrono::{Duration, NaiveDateTime};

use crate::events::Event;
use crate::session::LiveSession;
use crate::time_utils::{minutes_of_day, remaining_minutes};

/// A cancellable recurring deadline.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_due: Option<NaiveDateTime>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    /// Arm the ticker; the first poll at or after `now` fires.
    pub fn start(&mut self, now: NaiveDateTime) {
        self.next_due = Some(now);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Fire at most once per poll; missed periods are skipped, not replayed.
    pub fn poll(&mut self, now: NaiveDateTime) -> bool {
        let Some(mut due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        while due <= now {
            due += self.period;
        }
        self.next_due = Some(due);
        true
    }
}

/// Minute ticker for the now line plus a second ticker for a live session.
#[derive(Debug, Clone)]
pub struct DayClock {
    minute: Ticker,
    second: Ticker,
    session: Option<LiveSession>,
}

impl DayClock {
    pub fn new(now: NaiveDateTime) -> Self {
        let mut minute = Ticker::new(Duration::minutes(1));
        minute.start(now);
        Self {
            minute,
            second: Ticker::new(Duration::seconds(1)),
            session: None,
        }
    }

    pub fn start_session(&mut self, session: LiveSession, now: NaiveDateTime) {
        self.session = Some(session);
        self.second.start(now);
    }

    pub fn stop_session(&mut self) {
        self.session = None;
        self.second.cancel();
    }

    /// Stop everything; the owning view is going away.
    pub fn teardown(&mut self) {
        self.minute.cancel();
        self.stop_session();
    }

    pub fn is_running(&self) -> bool {
        self.minute.is_running() || self.second.is_running()
    }

    pub fn tick(&mut self, now: NaiveDateTime) -> Vec<Event> {
        let mut events = Vec::new();
        if self.minute.poll(now) {
            let minute = minutes_of_day(&now);
            events.push(Event::NowTick {
                minute,
                remaining_minutes: remaining_minutes(minute),
            });
        }
        if self.second.poll(now) {
            if let Some(session) = &self.session {
                events.push(Event::ElapsedTick {
                    elapsed_secs: session.elapsed_secs(&now),
                    label: session.elapsed_label(&now),
                });
            }
        }
        events
    }
}
