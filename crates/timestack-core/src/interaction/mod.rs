//! Pointer-driven gestures on the timeline and the intents they produce.

mod controller;
mod request;

pub use controller::{
    DragVisual, GestureState, InteractionConfig, InteractionController, PointerTarget, Viewport,
};
pub use request::{AuditRequest, Intent, MoveRequest, ScheduleRequest};
