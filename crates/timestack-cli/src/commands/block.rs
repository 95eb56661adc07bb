//! Block commands. `tap` and `drag` go through the same gesture controller
//! a graphical shell would drive.

use clap::Subcommand;
use timestack_core::time_utils::{format_clock, parse_clock};
use timestack_core::timeline::DrawInstruction;
use timestack_core::{BlockId, BlockType, Decision, Intent, PointerTarget};

use super::{now, now_ms, open_view, tap, DEFAULT_WIDTH};

#[derive(Subcommand)]
pub enum BlockAction {
    /// Log a block
    Add {
        /// What the time went to
        label: String,
        /// Start time (HH:MM)
        #[arg(long)]
        start: String,
        /// End time (HH:MM, 24:00 for midnight)
        #[arg(long)]
        end: String,
        /// invest or waste
        #[arg(long = "type", default_value = "invest")]
        kind: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// List a day's blocks
    List {
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Tap the timeline at a pixel offset: schedules into a gap or audits a block
    Tap {
        /// Y offset inside the day column, in pixels
        y: f64,
        /// Label for a block scheduled into a gap
        #[arg(long)]
        label: Option<String>,
        #[arg(long = "type", default_value = "invest")]
        kind: String,
        /// Minutes; defaults to the proposed duration
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        date: Option<String>,
    },
    /// Drag a block vertically by a pixel offset
    Drag {
        id: u64,
        /// Pixels to drag; negative moves earlier
        #[arg(allow_negative_numbers = true)]
        dy: f64,
        #[arg(long)]
        date: Option<String>,
    },
    /// Record a verdict on a block (delete, delegate, automate, routine)
    Judge { id: u64, decision: String },
    /// Delete a block
    Delete { id: u64 },
}

pub fn run(action: BlockAction) -> Result<(), Box<dyn std::error::Error>> {
    let now = now();
    match action {
        BlockAction::Add {
            label,
            start,
            end,
            kind,
            date,
        } => {
            let mut view = open_view(date.as_deref(), &now)?;
            let block = view.add_block(
                parse_clock(&start)?,
                parse_clock(&end)?,
                kind.parse::<BlockType>()?,
                &label,
                now_ms(),
            )?;
            println!("Block created: {}", block.id);
        }
        BlockAction::List { date, json } => {
            let view = open_view(date.as_deref(), &now)?;
            let mut blocks = view.blocks();
            blocks.sort_by_key(|b| b.start);
            if json {
                println!("{}", serde_json::to_string_pretty(&blocks)?);
                return Ok(());
            }
            if blocks.is_empty() {
                println!("No blocks on {}", view.view_key());
            }
            for b in blocks {
                println!(
                    "{}  {}-{}  {:<6} {}",
                    b.id,
                    format_clock(b.start),
                    format_clock(b.end),
                    b.kind.as_str(),
                    b.label
                );
            }
        }
        BlockAction::Tap {
            y,
            label,
            kind,
            duration,
            date,
        } => {
            let mut view = open_view(date.as_deref(), &now)?;
            let events = tap(&mut view, y, &now)?;
            match events.iter().find_map(|e| e.intent()) {
                Some(Intent::Schedule(request)) => {
                    let block = view.schedule(
                        &request,
                        duration,
                        kind.parse::<BlockType>()?,
                        label.as_deref(),
                        now_ms(),
                    )?;
                    println!(
                        "Block created: {} ({}-{})",
                        block.id,
                        format_clock(block.start),
                        format_clock(block.end)
                    );
                }
                Some(Intent::Audit(audit)) => {
                    let doc = view.document();
                    let block = doc
                        .block(audit.id)
                        .ok_or_else(|| format!("block not found: {}", audit.id))?;
                    println!("{} ({})", block.label, block.kind.as_str());
                    if let Some(rule) = doc.rules.lookup(&block.label) {
                        println!("Known rule: {}", rule.decision.as_str());
                    }
                    println!("Judge with: timestack block judge {} <decision>", block.id);
                }
                Some(Intent::Move(_)) | None => println!("Nothing to do at y={y}"),
            }
        }
        BlockAction::Drag { id, dy, date } => {
            let mut view = open_view(date.as_deref(), &now)?;
            let frame = view.render(DEFAULT_WIDTH, &now);
            let (target, origin) = frame
                .blocks()
                .find_map(|i| match i {
                    DrawInstruction::Block { id: bid, geometry, .. } if *bid == BlockId(id) => {
                        Some((PointerTarget::from(i), geometry.top + geometry.height / 2.0))
                    }
                    _ => None,
                })
                .ok_or_else(|| format!("block {id} is not on {}", view.view_key()))?;

            let controller = view.controller_mut();
            controller.pointer_down(1, origin, target);
            controller.pointer_move(1, origin + dy);
            let events = controller.pointer_up(1, origin + dy);
            match events.iter().find_map(|e| e.intent()) {
                Some(Intent::Move(request)) => {
                    view.apply_move(&request)?;
                    println!(
                        "Block moved: {} ({}-{})",
                        id,
                        format_clock(request.new_start),
                        format_clock(request.new_end)
                    );
                }
                _ => println!("Block not moved: {id}"),
            }
        }
        BlockAction::Judge { id, decision } => {
            let decision = decision.parse::<Decision>()?;
            let mut view = open_view(None, &now)?;
            view.judge(BlockId(id), decision)?;
            println!("Block judged: {id} -> {}", decision.as_str());
        }
        BlockAction::Delete { id } => {
            let mut view = open_view(None, &now)?;
            let block = view.delete(BlockId(id))?;
            println!("Block deleted: {} ({})", block.id, block.label);
        }
    }
    Ok(())
}
