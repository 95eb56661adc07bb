use clap::Subcommand;
use serde_json::json;
use timestack_core::time_utils::format_clock;
use timestack_core::{BlockType, Event};

use super::{now, now_ms, open_view};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start the stopwatch
    Start,
    /// Stop the stopwatch and log the elapsed time as a block on today
    Stop {
        label: String,
        #[arg(long = "type", default_value = "invest")]
        kind: String,
    },
    /// Show the running session
    Status {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let now = now();
    let mut view = open_view(None, &now)?;
    match action {
        SessionAction::Start => {
            let session = view.start_session(&now)?;
            println!("Session running since {}", session.started_at.format("%H:%M:%S"));
        }
        SessionAction::Stop { label, kind } => {
            match view.finish_session(&now, now_ms(), kind.parse::<BlockType>()?, &label)? {
                Some(block) => println!(
                    "Block created: {} ({}-{})",
                    block.id,
                    format_clock(block.start),
                    format_clock(block.end)
                ),
                None => println!("No session running"),
            }
        }
        SessionAction::Status { json } => {
            let session = view.document().current_session;
            let elapsed = view.tick(now).into_iter().find_map(|e| match e {
                Event::ElapsedTick { elapsed_secs, label } => Some((elapsed_secs, label)),
                _ => None,
            });
            if json {
                let out = json!({
                    "running": session.is_some(),
                    "startedAt": session.map(|s| s.started_at),
                    "elapsedSecs": elapsed.as_ref().map(|(secs, _)| secs),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                match elapsed {
                    Some((_, label)) => println!("Running: {label}"),
                    None => println!("No session running"),
                }
            }
        }
    }
    view.teardown();
    Ok(())
}
