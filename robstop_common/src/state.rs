//! Button, target-state and dispatch result types.
//!
//! `ButtonState` is the debounced-by-cadence logical state of the E-stop
//! line. Every transition maps 1:1 onto a `DesiredState` that is applied
//! to the whole fleet; the result of one fan-out is a `DispatchOutcome`.

use core::fmt;

use crate::consts::{STATE_ID_PAUSE, STATE_ID_READY};

// ─── Electrical level ───────────────────────────────────────────────

/// Electrical level sampled from a digital input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Electrical configuration requested for an input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinMode {
    /// Floating input.
    Input,
    /// Input with pull-up bias.
    InputPullUp,
    /// Input with pull-down bias.
    InputPullDown,
}

// ─── ButtonState ────────────────────────────────────────────────────

/// Logical state of the emergency-stop button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonState {
    #[default]
    Released,
    Pressed,
}

impl ButtonState {
    /// Interpret a sampled level given the level that means "pressed".
    pub fn from_level(level: Level, pressed_level: Level) -> Self {
        if level == pressed_level {
            Self::Pressed
        } else {
            Self::Released
        }
    }

    /// Target state the fleet must take when the button enters this state.
    pub fn desired_state(self) -> DesiredState {
        DesiredState::from(self)
    }
}

impl fmt::Display for ButtonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Released => write!(f, "released"),
            Self::Pressed => write!(f, "pressed"),
        }
    }
}

// ─── DesiredState ───────────────────────────────────────────────────

/// Target state commanded to every robot on a button transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DesiredState {
    Pause,
    Ready,
}

impl DesiredState {
    /// Wire identifier of the state understood by the robot controllers.
    pub fn state_id(self) -> u8 {
        match self {
            Self::Pause => STATE_ID_PAUSE,
            Self::Ready => STATE_ID_READY,
        }
    }
}

impl From<ButtonState> for DesiredState {
    fn from(state: ButtonState) -> Self {
        match state {
            ButtonState::Pressed => Self::Pause,
            ButtonState::Released => Self::Ready,
        }
    }
}

impl fmt::Display for DesiredState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pause => write!(f, "pause"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

// ─── DispatchOutcome ────────────────────────────────────────────────

/// Result of applying one target state to a fleet snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    /// Robots that confirmed the state change.
    pub success_count: usize,
    /// Robots a command was sent to (the fleet size).
    pub attempted: usize,
}

impl DispatchOutcome {
    /// Number of robots whose command failed.
    pub fn failed(&self) -> usize {
        self.attempted.saturating_sub(self.success_count)
    }

    /// True when every attempted robot confirmed.
    pub fn all_succeeded(&self) -> bool {
        self.success_count == self.attempted
    }
}
