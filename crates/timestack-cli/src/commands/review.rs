use clap::Subcommand;
use serde_json::json;

use super::{now, open_view};

#[derive(Subcommand)]
pub enum ReviewAction {
    /// Totals and collected rules since the last reset
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Clear every block and start a new week; rules and routines stay
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: ReviewAction) -> Result<(), Box<dyn std::error::Error>> {
    let now = now();
    let mut view = open_view(None, &now)?;
    match action {
        ReviewAction::Show { json } => {
            let doc = view.document();
            let summary = doc.summary();
            let unjudged = doc.blocks.iter().filter(|b| b.needs_audit()).count();
            if json {
                let out = json!({
                    "summary": summary,
                    "unjudged": unjudged,
                    "rules": doc.rules,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }
            println!("Invested:   {}", summary.invest_label());
            println!("Wasted:     {}", summary.waste_label());
            println!("Efficiency: {:.0}%", summary.efficiency_pct);
            println!("Unjudged:   {unjudged}");
            for rule in doc.rules.rules() {
                println!("  {:<9} {}", rule.decision.as_str(), rule.label);
            }
        }
        ReviewAction::Reset { yes } => {
            if !yes {
                return Err("reset clears every block; pass --yes to confirm".into());
            }
            let cleared = view.reset_week()?;
            println!("Week reset: {cleared} blocks cleared");
        }
    }
    Ok(())
}
