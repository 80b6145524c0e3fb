use serde::{Deserialize, Serialize};

/// Logical actions a player can hold down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
}

/// One-shot commands that act on the level rather than on the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Restart,
    AdvanceLevel,
}

/// Input sampled at the start of a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub move_left: bool,
    pub move_right: bool,
    pub jump_held: bool,
    /// Rising edge of `Jump`: true for exactly one tick per physical press.
    pub jump_pressed: bool,
}

impl InputSnapshot {
    /// Snapshot with the given actions held and no edge events.
    pub fn held(actions: &[Action]) -> Self {
        let mut snapshot = Self::default();
        for &action in actions {
            snapshot.set(action, true);
        }
        snapshot
    }

    /// Same snapshot with the jump edge raised.
    pub fn with_jump_pressed(mut self) -> Self {
        self.jump_pressed = true;
        self.jump_held = true;
        self
    }

    pub fn is_held(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.move_left,
            Action::MoveRight => self.move_right,
            Action::Jump => self.jump_held,
        }
    }

    fn set(&mut self, action: Action, down: bool) {
        match action {
            Action::MoveLeft => self.move_left = down,
            Action::MoveRight => self.move_right = down,
            Action::Jump => self.jump_held = down,
        }
    }
}

/// Commands queued since the last `take_commands`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingCommands {
    pub restart: bool,
    pub advance_level: bool,
}

/// Accumulates device events between ticks.
///
/// Held state always reflects the latest event. Edge flags (the jump press
/// and queued commands) survive until consumed, so a press and release that
/// both land between two ticks still produce exactly one jump.
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    current: InputSnapshot,
    commands: PendingCommands,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action) {
        if action == Action::Jump && !self.current.jump_held {
            self.current.jump_pressed = true;
        }
        self.current.set(action, true);
    }

    pub fn release(&mut self, action: Action) {
        self.current.set(action, false);
    }

    pub fn request(&mut self, command: Command) {
        match command {
            Command::Restart => self.commands.restart = true,
            Command::AdvanceLevel => self.commands.advance_level = true,
        }
    }

    /// Snapshot for the next tick. Clears the jump edge.
    pub fn take_snapshot(&mut self) -> InputSnapshot {
        let snapshot = self.current;
        self.current.jump_pressed = false;
        snapshot
    }

    pub fn take_commands(&mut self) -> PendingCommands {
        std::mem::take(&mut self.commands)
    }

    /// Forget everything held, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.current = InputSnapshot::default();
        self.commands = PendingCommands::default();
    }
}
