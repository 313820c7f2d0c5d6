//! CLI command implementations.

pub mod params;
pub mod simulate;
pub mod verify;

use beatcore::ReplaySummary;
use owo_colors::OwoColorize;

/// Time the bot keeps playing after the last note so every window closes
pub const RUN_OUT_SECONDS: f64 = 2.0;

pub fn print_summary(summary: &ReplaySummary) {
    println!("  Score:        {}", summary.score.bold());
    println!("  Stars:        {:.2}", summary.stars);
    println!(
        "  Notes:        {} hit, {} missed",
        summary.notes_hit.green(),
        summary.notes_missed.red()
    );
    println!("  Max combo:    {}", summary.max_combo);
    println!("  SP phrases:   {}", summary.star_power_phrases_hit);
}
