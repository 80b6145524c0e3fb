use serde::{Deserialize, Serialize};

use crate::input::InputSnapshot;

/// Coarse state of one level attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Playing,
    Won,
    Lost,
}

impl Phase {
    /// `Won` and `Lost` freeze the simulation until a restart or advance.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Phase::Playing)
    }
}

/// Outcome of a single `Simulation::tick`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResult<E> {
    pub phase: Phase,
    /// Events raised during this tick, in the order they happened.
    pub events: Vec<E>,
}

impl<E> FrameResult<E> {
    pub fn idle(phase: Phase) -> Self {
        Self {
            phase,
            events: Vec::new(),
        }
    }
}

/// Descriptive information a host shows next to the running simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimMetadata {
    pub name: String,
    pub description: String,
    pub level_count: usize,
}

/// Core trait every frame-driven simulation implements.
///
/// The host owns the window, the input devices and the painter; the
/// simulation only advances state and exposes snapshots of it.
pub trait Simulation {
    /// Game-specific event type carried in each `FrameResult`.
    type Event;

    fn metadata(&self) -> SimMetadata;

    /// Advance one frame. `dt` is in seconds and is clamped internally.
    fn tick(&mut self, dt: f32, input: &InputSnapshot) -> FrameResult<Self::Event>;

    /// Reset the current level to its initial state.
    fn restart(&mut self);

    /// Move to the next level. Returns `false` (and changes nothing) when
    /// the current level has not been won.
    fn advance_level(&mut self) -> bool;

    fn phase(&self) -> Phase;

    /// Serialize the render snapshot for an out-of-process presentation layer.
    fn serialize_snapshot(&self) -> Vec<u8>;

    /// Preferred fixed tick rate in Hz.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    fn is_terminal(&self) -> bool {
        self.phase().is_terminal()
    }
}

/// Encode any serializable snapshot to MessagePack.
pub fn encode_snapshot<T: Serialize>(snapshot: &T) -> Vec<u8> {
    rmp_serde::to_vec(snapshot).expect("snapshot serialization must succeed")
}

/// Generates the `Simulation` methods that are identical for every game:
/// `phase` and `serialize_snapshot`.
///
/// Requires the implementing struct to have a `phase: Phase` field and a
/// `snapshot(&self)` method returning a `Serialize` value.
#[macro_export]
macro_rules! simulation_boilerplate {
    () => {
        fn phase(&self) -> $crate::game_trait::Phase {
            self.phase
        }

        fn serialize_snapshot(&self) -> Vec<u8> {
            $crate::game_trait::encode_snapshot(&self.snapshot())
        }
    };
}
