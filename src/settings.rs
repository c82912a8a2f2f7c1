//! Static game configuration.  Built once at startup and only read afterwards.

use thiserror::Error;

/// An RGB triple.  The renderer maps it onto the terminal's true-colour palette.
pub type Rgb = (u8, u8, u8);

/// Largest accepted screen side in pixels.  Keeps the fleet a few thousand
/// aliens at most and every coordinate far from `i32` overflow.
pub const MAX_SCREEN_SIDE: i32 = 16_384;

/// How `aliens_destroyed` grows when bullets hit the fleet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionCounting {
    /// One point per frame in which any alien was hit, however many died.
    PerFrame,
    /// One point per alien destroyed.
    PerAlien,
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("screen must be at least 1x1 pixels, got {width}x{height}")]
    EmptyScreen { width: i32, height: i32 },
    #[error("screen sides are capped at {max} pixels, got {width}x{height}", max = MAX_SCREEN_SIDE)]
    ScreenTooLarge { width: i32, height: i32 },
    #[error("{what} size must be positive, got {width}x{height}")]
    EmptySprite {
        what: &'static str,
        width: i32,
        height: i32,
    },
    #[error("fleet direction must be 1 or -1, got {0}")]
    BadFleetDirection(i32),
    #[error("{0} speed must be a positive finite number")]
    BadSpeed(&'static str),
    #[error("screen {width}x{height} cannot hold a single row of aliens")]
    NoRoomForFleet { width: i32, height: i32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    // ── Screen ───────────────────────────────────────────────────────────────
    pub screen_width: i32,
    pub screen_height: i32,
    pub bg_color: Rgb,

    // ── Ship ─────────────────────────────────────────────────────────────────
    pub ship_width: i32,
    pub ship_height: i32,
    pub ship_speed: f32,
    pub ship_limit: u32,

    // ── Bullets ──────────────────────────────────────────────────────────────
    pub bullet_speed: f32,
    pub bullet_width: i32,
    pub bullet_height: i32,
    pub bullet_color: Rgb,
    pub bullets_allowed: usize,

    // ── Aliens ───────────────────────────────────────────────────────────────
    pub alien_width: i32,
    pub alien_height: i32,
    pub alien_speed: f32,
    pub fleet_drop_speed: i32,
    /// Direction the fleet starts moving in: 1 is right, -1 is left.
    pub fleet_direction: i32,

    pub collision_counting: CollisionCounting,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: 1200,
            screen_height: 800,
            bg_color: (230, 230, 230),

            ship_width: 60,
            ship_height: 48,
            ship_speed: 12.0,
            ship_limit: 4,

            bullet_speed: 20.0,
            bullet_width: 3,
            bullet_height: 15,
            bullet_color: (60, 60, 60),
            bullets_allowed: 3,

            alien_width: 60,
            alien_height: 58,
            alien_speed: 4.0,
            fleet_drop_speed: 20,
            fleet_direction: 1,

            collision_counting: CollisionCounting::PerFrame,
        }
    }
}

impl Settings {
    /// Reject configurations the game loop cannot run with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.screen_width <= 0 || self.screen_height <= 0 {
            return Err(SettingsError::EmptyScreen {
                width: self.screen_width,
                height: self.screen_height,
            });
        }
        if self.screen_width > MAX_SCREEN_SIDE || self.screen_height > MAX_SCREEN_SIDE {
            return Err(SettingsError::ScreenTooLarge {
                width: self.screen_width,
                height: self.screen_height,
            });
        }

        let sprites = [
            ("ship", self.ship_width, self.ship_height),
            ("bullet", self.bullet_width, self.bullet_height),
            ("alien", self.alien_width, self.alien_height),
        ];
        for (what, width, height) in sprites {
            if width <= 0 || height <= 0 {
                return Err(SettingsError::EmptySprite { what, width, height });
            }
        }

        if self.fleet_direction != 1 && self.fleet_direction != -1 {
            return Err(SettingsError::BadFleetDirection(self.fleet_direction));
        }

        let speeds = [
            ("ship", self.ship_speed),
            ("bullet", self.bullet_speed),
            ("alien", self.alien_speed),
        ];
        for (what, speed) in speeds {
            if !speed.is_finite() || speed <= 0.0 {
                return Err(SettingsError::BadSpeed(what));
            }
        }

        let (cols, rows) = crate::compute::fleet_dimensions(self);
        if cols == 0 || rows == 0 {
            return Err(SettingsError::NoRoomForFleet {
                width: self.screen_width,
                height: self.screen_height,
            });
        }

        Ok(())
    }
}
