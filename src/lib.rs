//! Alien Invasion: fleet, bullets and scoreboard logic for a terminal
//! shoot-the-aliens game, plus the `twenty_div` input exercise.

pub mod compute;
pub mod entities;
pub mod input;
pub mod script;
pub mod settings;
pub mod stats;
pub mod viewport;
