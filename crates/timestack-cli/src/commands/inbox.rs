use clap::Subcommand;
use timestack_core::time_utils::format_clock;
use timestack_core::{BlockType, Intent};

use super::{now, now_ms, open_view, tap};

#[derive(Subcommand)]
pub enum InboxAction {
    /// Capture something to schedule later
    Add { text: String },
    /// List captured items
    List {
        #[arg(long)]
        json: bool,
    },
    /// Drop an item without scheduling it
    Remove { id: String },
    /// Place an item on today's timeline by tapping a gap
    Schedule {
        id: String,
        /// Y offset of the tap inside the day column, in pixels
        y: f64,
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long = "type", default_value = "invest")]
        kind: String,
    },
}

pub fn run(action: InboxAction) -> Result<(), Box<dyn std::error::Error>> {
    let now = now();
    let mut view = open_view(None, &now)?;
    match action {
        InboxAction::Add { text } => {
            let item = view.capture(&text)?;
            println!("Inbox item added: {}", item.id);
        }
        InboxAction::List { json } => {
            let inbox = &view.document().inbox;
            if json {
                println!("{}", serde_json::to_string_pretty(inbox)?);
                return Ok(());
            }
            if inbox.is_empty() {
                println!("Inbox is empty");
            }
            for item in inbox.items() {
                println!("{}  {}", item.id, item.text);
            }
        }
        InboxAction::Remove { id } => {
            let item = view.discard(&id)?;
            println!("Inbox item removed: {}", item.text);
        }
        InboxAction::Schedule {
            id,
            y,
            duration,
            kind,
        } => {
            let kind = kind.parse::<BlockType>()?;
            view.start_scheduling(&id, &now)?;
            let events = tap(&mut view, y, &now)?;
            let Some(Intent::Schedule(request)) = events.iter().find_map(|e| e.intent()) else {
                view.cancel_scheduling();
                return Err(format!("no free time at y={y}").into());
            };
            let block = view.schedule(&request, duration, kind, None, now_ms())?;
            println!(
                "Block created: {} ({}-{}) {}",
                block.id,
                format_clock(block.start),
                format_clock(block.end),
                block.label
            );
        }
    }
    Ok(())
}
