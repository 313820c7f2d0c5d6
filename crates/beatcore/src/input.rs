use serde::{Deserialize, Serialize};

/// A timestamped player input
///
/// `action` is the raw instrument action; decode it with [`GameInput::action`].
/// `axis` carries continuous data such as the sung pitch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameInput {
    pub time: f64,
    pub action: u8,
    #[serde(default)]
    pub axis: f32,
}

impl GameInput {
    pub fn new(time: f64, action: impl Into<u8>, axis: f32) -> Self {
        Self {
            time,
            action: action.into(),
            axis,
        }
    }

    /// Input with no axis value (button presses)
    pub fn button(time: f64, action: impl Into<u8>) -> Self {
        Self::new(time, action, 0.0)
    }

    /// Decode the action for an instrument; `None` for unknown values
    pub fn action<A: TryFrom<u8>>(&self) -> Option<A> {
        A::try_from(self.action).ok()
    }
}

/// Check that input timestamps never go backwards.
///
/// Returns the index of the first out-of-order input.
pub fn first_unordered(inputs: &[GameInput]) -> Option<usize> {
    inputs
        .windows(2)
        .position(|pair| pair[1].time < pair[0].time || pair[1].time.is_nan())
        .map(|i| i + 1)
        .or_else(|| inputs.first().filter(|i| i.time.is_nan()).map(|_| 0))
}
