//! Score, multiplier and star rating formulas

/// Points for a single drum note before multipliers
pub const POINTS_PER_NOTE: i64 = 50;

/// Points for a fully credited vocal phrase before multipliers
pub const POINTS_PER_PHRASE: i64 = 2000;

/// Meter gained for completing a star power phrase
pub const STAR_POWER_PHRASE_AMOUNT: f64 = 0.25;

/// Beats a full star power meter lasts while active
pub const STAR_POWER_BEATS: f64 = 32.0;

/// Meter needed before star power can be activated
pub const STAR_POWER_ACTIVATION_AMOUNT: f64 = 0.5;

/// Score factor while star power is active
pub const STAR_POWER_SCORE_FACTOR: i64 = 2;

/// Multiplier for a combo: one step per reached threshold, capped at `max`
pub fn tiered_multiplier(combo: u32, thresholds: &[u32], max: i32) -> i32 {
    let reached = thresholds.iter().filter(|t| combo >= **t).count();
    let multiplier = i32::try_from(reached).unwrap_or(i32::MAX).saturating_add(1);
    multiplier.min(max).max(1)
}

/// Points earned for one resolved note
pub fn note_score(base_points: i64, multiplier: i32, star_power_active: bool) -> i64 {
    let score = base_points * i64::from(multiplier);
    if star_power_active {
        score * STAR_POWER_SCORE_FACTOR
    } else {
        score
    }
}

/// Fractional star rating for a score ratio (`score / base_score`).
///
/// `thresholds` holds the ratio needed for each of stars one through six.
/// Progress interpolates linearly inside the current band.
pub fn star_progress(ratio: f64, thresholds: &[f64]) -> f64 {
    if !ratio.is_finite() || ratio <= 0.0 || thresholds.is_empty() {
        return 0.0;
    }

    let Some(band) = thresholds.iter().position(|t| ratio < *t) else {
        return thresholds.len() as f64;
    };

    let lower = if band == 0 { 0.0 } else { thresholds[band - 1] };
    let upper = thresholds[band];
    band as f64 + (ratio - lower) / (upper - lower)
}
