//! Stats command

use crate::Format;
use crate::output::{Status, print_json};
use annaseva_poi::FoodWasteStats;
use anyhow::Result;
use owo_colors::OwoColorize;

pub fn run(seed: Option<u64>, format: Format) -> Result<()> {
    let stats = FoodWasteStats::generate(&mut super::rng_from(seed));

    if format == Format::Json {
        return print_json(&stats);
    }

    Status::header("Food waste overview");
    println!("  Surplus available:  {} kg", stats.total_surplus.to_string().green());
    println!("  Active shortages:   {}", stats.total_shortages.to_string().red());
    println!("  People affected:    {}", stats.people_affected.to_string().yellow());
    println!(
        "  Last updated:       {}",
        stats.last_updated.to_rfc3339().dimmed()
    );
    Ok(())
}
