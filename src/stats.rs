use crate::settings::Settings;

/// Scoreboard for one game session.
#[derive(Clone, Debug, PartialEq)]
pub struct GameStats {
    pub ships_left: u32,
    pub aliens_destroyed: u32,
    /// Latched while the ship overlaps an alien so one collision costs one life.
    pub ship_hit: bool,
    pub game_over: bool,
    pub game_active: bool,
}

impl GameStats {
    pub fn new(settings: &Settings) -> Self {
        Self {
            ships_left: settings.ship_limit,
            aliens_destroyed: 0,
            ship_hit: false,
            game_over: false,
            game_active: true,
        }
    }

    /// Start a new round: full lives, empty score, no flags set.
    pub fn reset(&mut self, settings: &Settings) {
        self.ships_left = settings.ship_limit;
        self.aliens_destroyed = 0;
        self.ship_hit = false;
        self.game_over = false;
        self.game_active = true;
    }
}
