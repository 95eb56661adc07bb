pub mod block;
pub mod config;
pub mod day;
pub mod inbox;
pub mod review;
pub mod routine;
pub mod session;

use chrono::NaiveDateTime;
use timestack_core::time_utils::{display_date, format_clock, format_hours_minutes, parse_date_key};
use timestack_core::timeline::DrawInstruction;
use timestack_core::{Config, DayView, Event, JsonFileStore, PointerTarget, RenderFrame};

/// Width of the virtual timeline column the CLI lays days out in.
pub const DEFAULT_WIDTH: f64 = 400.0;

pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

/// Open the ledger on `date` (YYYY-MM-DD), or today.
pub fn open_view(
    date: Option<&str>,
    now: &NaiveDateTime,
) -> Result<DayView<JsonFileStore>, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let store = JsonFileStore::open_default()?;
    tracing::debug!(path = %store.path().display(), "opening ledger");
    let mut view = DayView::open(store, &config, now)?;
    if let Some(date) = date {
        view.go_to(parse_date_key(date)?);
    }
    Ok(view)
}

/// Press and release at `y` without moving: a tap on whatever is drawn there.
pub fn tap(
    view: &mut DayView<JsonFileStore>,
    y: f64,
    now: &NaiveDateTime,
) -> Result<Vec<Event>, Box<dyn std::error::Error>> {
    let frame = view.render(DEFAULT_WIDTH, now);
    let target = frame
        .hit_test(y)
        .map(PointerTarget::from)
        .ok_or_else(|| format!("nothing drawn at y={y}"))?;
    let controller = view.controller_mut();
    controller.pointer_down(1, y, target);
    Ok(controller.pointer_up(1, y))
}

pub fn print_frame(view: &DayView<JsonFileStore>, frame: &RenderFrame, now: &NaiveDateTime) {
    let marker = if view.is_today(now) { "  (today)" } else { "" };
    println!("{}{marker}", display_date(&view.view_date()));

    let mut rows: Vec<&DrawInstruction> = frame.instructions.iter().collect();
    rows.sort_by_key(|i| match i {
        DrawInstruction::Gap { start, .. } => (*start, 0),
        DrawInstruction::Block { start, .. } => (*start, 1),
    });
    for row in rows {
        match row {
            DrawInstruction::Gap { start, end, .. } => println!(
                "  {}-{}  ·  untracked {}",
                format_clock(*start),
                format_clock(*end),
                format_hours_minutes(end - start)
            ),
            DrawInstruction::Block {
                id,
                start,
                end,
                block_type,
                label,
                duration,
                decision,
                needs_audit,
                level,
                ..
            } => {
                let indent = "  ".repeat(*level as usize);
                let verdict = match decision {
                    Some(d) => format!("  [{}]", d.badge()),
                    None if *needs_audit => "  [?]".to_string(),
                    None => String::new(),
                };
                println!(
                    "  {}-{}  {indent}{label} ({}, {}){verdict}  #{id}",
                    format_clock(*start),
                    format_clock(*end),
                    block_type.as_str(),
                    format_hours_minutes(*duration),
                );
            }
        }
    }
}
