use std::fmt::Debug;

/// Per-run cursor and time bookkeeping shared by every instrument
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseEngineState {
    /// Index of the next unresolved note; never decreases within a pass
    pub note_index: usize,
    pub current_tick: u32,
    pub last_tick: u32,
    pub current_time: f64,
    pub last_update_time: f64,
}

impl BaseEngineState {
    /// Shift the current time and tick into the "last" slots
    pub fn update_time(&mut self, time: f64, tick: u32) {
        self.last_update_time = self.current_time;
        self.last_tick = self.current_tick;
        self.current_time = time;
        self.current_tick = tick;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Instrument state built around a [`BaseEngineState`]
pub trait EngineState: Debug + Clone + Default {
    fn base(&self) -> &BaseEngineState;

    fn base_mut(&mut self) -> &mut BaseEngineState;

    /// Restore the state of a fresh run
    fn reset(&mut self) {
        *self = Self::default();
    }
}
