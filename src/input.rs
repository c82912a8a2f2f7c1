//! Discrete input events the game understands, independent of the terminal
//! backend that produced them.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Space,
    /// The quit key (`Q`).
    Quit,
    /// Activates the replay control from the keyboard (`R` / Enter).
    Replay,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Window close or interrupt.
    Quit,
    KeyDown(Key),
    KeyUp(Key),
    /// Primary button press at a point in world pixels.
    MouseDown { x: i32, y: i32 },
}
