use clap::Subcommand;
use timestack_core::time_utils::{format_clock, parse_clock};
use timestack_core::{BlockType, Routine};

use super::{now, now_ms, open_view};

#[derive(Subcommand)]
pub enum RoutineAction {
    /// Add a routine that recurs every day
    Add {
        label: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long = "type", default_value = "invest")]
        kind: String,
    },
    /// List routines
    List {
        #[arg(long)]
        json: bool,
    },
    /// Remove a routine and its upcoming blocks
    Remove { id: String },
    /// Create a day's routine blocks
    Materialize {
        #[arg(long)]
        date: Option<String>,
    },
}

pub fn run(action: RoutineAction) -> Result<(), Box<dyn std::error::Error>> {
    let now = now();
    match action {
        RoutineAction::Add {
            label,
            start,
            end,
            kind,
        } => {
            let routine = Routine::new(
                &label,
                kind.parse::<BlockType>()?,
                parse_clock(&start)?,
                parse_clock(&end)?,
            )?;
            let id = routine.id.clone();
            open_view(None, &now)?.add_routine(routine)?;
            println!("Routine added: {id}");
        }
        RoutineAction::List { json } => {
            let view = open_view(None, &now)?;
            let routines = &view.document().routines;
            if json {
                println!("{}", serde_json::to_string_pretty(routines)?);
                return Ok(());
            }
            for r in routines {
                println!(
                    "{}  {}-{}  {:<6} {}",
                    r.id,
                    format_clock(r.start),
                    format_clock(r.end),
                    r.kind.as_str(),
                    r.label
                );
            }
        }
        RoutineAction::Remove { id } => {
            let removed = open_view(None, &now)?.remove_routine(&id, &now)?;
            println!("Routine removed: {id} ({removed} upcoming blocks)");
        }
        RoutineAction::Materialize { date } => {
            let mut view = open_view(date.as_deref(), &now)?;
            let created = view.materialize_routines(now_ms())?;
            println!("{created} routine blocks created on {}", view.view_key());
        }
    }
    Ok(())
}
