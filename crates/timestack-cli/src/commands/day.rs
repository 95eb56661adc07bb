use clap::Subcommand;
use serde_json::json;

use super::{now, open_view, print_frame, DEFAULT_WIDTH};

#[derive(Subcommand)]
pub enum DayAction {
    /// Draw a day as blocks and untracked gaps
    Show {
        /// Day to show (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<String>,
        /// Column width used for block geometry
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: f64,
        /// Print the full render frame as JSON
        #[arg(long)]
        json: bool,
    },
    /// Invest/waste totals and time left today
    Summary {
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: DayAction) -> Result<(), Box<dyn std::error::Error>> {
    let now = now();
    match action {
        DayAction::Show { date, width, json } => {
            let view = open_view(date.as_deref(), &now)?;
            let frame = view.render(width, &now);
            if json {
                println!("{}", serde_json::to_string_pretty(&frame)?);
            } else {
                print_frame(&view, &frame, &now);
            }
        }
        DayAction::Summary { date, json } => {
            let view = open_view(date.as_deref(), &now)?;
            let summary = view.summary();
            let remaining = view.remaining(&now);
            if json {
                let out = json!({
                    "date": view.view_key(),
                    "summary": summary,
                    "remaining": remaining,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }
            println!("Invested:   {}", summary.invest_label());
            println!("Wasted:     {}", summary.waste_label());
            let flag = if summary.is_low_efficiency() { "  (low)" } else { "" };
            println!("Efficiency: {:.0}%{flag}", summary.efficiency_pct);
            if let Some(r) = remaining {
                let flag = if r.low { "  (running low)" } else { "" };
                println!(
                    "Remaining:  {}{flag}",
                    timestack_core::time_utils::format_hours_minutes(r.minutes)
                );
            }
        }
    }
    Ok(())
}
