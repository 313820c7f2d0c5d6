/// Notification emitted while the engine resolves notes
///
/// Events are delivered synchronously, in the order the engine produces them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent<'a, N> {
    NoteHit { index: usize, note: &'a N },
    NoteMissed { index: usize, note: &'a N },
    StarPowerPhraseHit { index: usize, note: &'a N },
    StarPowerPhraseMissed { index: usize, note: &'a N },
    StarPowerStatus { active: bool },
    /// A vocal phrase closed; `performance` is hit ratio over the threshold
    PhraseCompleted {
        index: usize,
        note: &'a N,
        performance: f64,
    },
}

/// Callback registered with [`crate::engine::Engine::subscribe`]
pub type EventObserver<N> = Box<dyn for<'a> FnMut(&EngineEvent<'a, N>)>;

/// Owned copy of an event without the note reference
///
/// Handy for recording events in tests and tools.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    NoteHit(usize),
    NoteMissed(usize),
    StarPowerPhraseHit(usize),
    StarPowerPhraseMissed(usize),
    StarPowerStatus(bool),
    PhraseCompleted(usize, f64),
}

impl<N> From<&EngineEvent<'_, N>> for EventKind {
    fn from(event: &EngineEvent<'_, N>) -> Self {
        match *event {
            EngineEvent::NoteHit { index, .. } => Self::NoteHit(index),
            EngineEvent::NoteMissed { index, .. } => Self::NoteMissed(index),
            EngineEvent::StarPowerPhraseHit { index, .. } => Self::StarPowerPhraseHit(index),
            EngineEvent::StarPowerPhraseMissed { index, .. } => {
                Self::StarPowerPhraseMissed(index)
            }
            EngineEvent::StarPowerStatus { active } => Self::StarPowerStatus(active),
            EngineEvent::PhraseCompleted {
                index, performance, ..
            } => Self::PhraseCompleted(index, performance),
        }
    }
}
