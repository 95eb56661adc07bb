//! # Timestack Core Library
//!
//! A personal daily time ledger: the 1440 minutes of a day are logged into
//! labeled blocks of invested or wasted time, laid out on a vertical 24-hour
//! timeline and reviewed weekly. As with the CLI, any GUI is a thin layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **Timeline**: start-order sorting, gap detection, overlap stack levels and
//!   the minute ↔ pixel geometry that turns a day into draw instructions
//! - **Interaction**: a pointer gesture state machine (tap vs. drag) that emits
//!   schedule, move and audit requests instead of touching storage
//! - **Storage**: a JSON ledger document and TOML configuration
//! - **Review**: judge-flow rules, routines and invest/waste totals
//!
//! ## Key Components
//!
//! - [`LayoutEngine`]: geometry and the render pass
//! - [`InteractionController`]: gesture state machine
//! - [`DayView`]: one day on screen, applying intents to the ledger
//! - [`Config`]: application configuration management

pub mod block;
pub mod clock;
pub mod dashboard;
pub mod day_view;
pub mod error;
pub mod events;
pub mod inbox;
pub mod interaction;
pub mod review;
pub mod session;
pub mod storage;
pub mod time_utils;
pub mod timeline;

pub use block::{BlockId, BlockType, Decision, TimeBlock};
pub use clock::{DayClock, Ticker};
pub use dashboard::{Remaining, Summary};
pub use day_view::DayView;
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use inbox::{Inbox, InboxItem};
pub use interaction::{
    AuditRequest, Intent, InteractionConfig, InteractionController, MoveRequest, PointerTarget,
    ScheduleRequest, Viewport,
};
pub use review::{Routine, RuleBook, SystemRule};
pub use session::LiveSession;
pub use storage::{Config, JsonFileStore, LedgerDocument, LedgerStore, MemoryStore};
pub use timeline::{DrawInstruction, Gap, LayoutConfig, LayoutEngine, RenderFrame};
