use tracing::trace;

use super::{
    Engine, EngineEvent, EngineState, EngineStats, Instrument, STAR_POWER_BEATS,
    STAR_POWER_PHRASE_AMOUNT,
};

impl<I: Instrument> Engine<I> {
    /// Whether star power could be activated right now
    pub fn can_star_power_activate(&self) -> bool {
        I::can_star_power_activate(self.stats.base())
    }

    /// Fill the meter for a completed star power phrase
    pub(crate) fn award_star_power(&mut self, index: usize) {
        let stats = self.stats.base_mut();
        stats.star_power_amount = (stats.star_power_amount + STAR_POWER_PHRASE_AMOUNT).min(1.0);
        stats.star_power_phrases_hit += 1;

        trace!(
            "Star power phrase {} hit, meter {:.2}",
            index, stats.star_power_amount
        );
        self.emit_for_note(index, |note| EngineEvent::StarPowerPhraseHit { index, note });
    }

    /// Report a star power phrase as lost
    pub(crate) fn strip_star_power(&mut self, index: usize) {
        trace!("Star power phrase {} missed", index);
        self.emit_for_note(index, |note| EngineEvent::StarPowerPhraseMissed { index, note });
    }

    /// Drain the meter, ending star power when it runs dry
    pub(crate) fn deplete_star_power(&mut self, amount: f64) {
        if !(amount > 0.0) {
            return;
        }

        let stats = self.stats.base_mut();
        let was_running = stats.star_power_amount > 0.0 || stats.star_power_active;
        stats.star_power_amount = (stats.star_power_amount - amount).max(0.0);

        if stats.star_power_amount <= 0.0 && was_running {
            stats.star_power_active = false;
            trace!("Star power depleted");
            self.emit(&EngineEvent::StarPowerStatus { active: false });
        }
    }

    /// Meter consumed since the previous update
    ///
    /// A full meter lasts [`STAR_POWER_BEATS`] beats.
    pub(crate) fn used_star_power(&self) -> f64 {
        if !self.stats.base().star_power_active {
            return 0.0;
        }

        let state = self.state.base();
        let ticks = state.current_tick.saturating_sub(state.last_tick);
        f64::from(ticks) / (f64::from(self.sync_track.resolution()) * STAR_POWER_BEATS)
    }

    pub(crate) fn activate_star_power(&mut self) {
        if !self.can_star_power_activate() {
            return;
        }

        self.stats.base_mut().star_power_active = true;
        trace!(
            "Star power activated at {:.3}s",
            self.state.base().current_time
        );
        self.emit(&EngineEvent::StarPowerStatus { active: true });
    }
}
