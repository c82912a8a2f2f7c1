//! All game entity types and their per-frame movement rules.

use crate::settings::Settings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in world pixels.  `right` and `bottom` are exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// A `width` x `height` rectangle whose centre sits at (`cx`, `cy`).
    pub fn centered_at(cx: i32, cy: i32, width: i32, height: i32) -> Self {
        Self::new(cx - width / 2, cy - height / 2, width, height)
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    /// True when the two rectangles share at least one pixel.
    /// Rectangles that only touch along an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.left() && px < self.right() && py >= self.top() && py < self.bottom()
    }
}

// ── Player ship ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Ship {
    /// Horizontal position with sub-pixel precision; `rect.x` follows it.
    pub x: f32,
    pub rect: Rect,
    pub moving_left: bool,
    pub moving_right: bool,
}

impl Ship {
    /// A stationary ship parked at the bottom centre of the screen.
    pub fn new(settings: &Settings) -> Self {
        let mut ship = Ship {
            x: 0.0,
            rect: Rect::new(0, 0, settings.ship_width, settings.ship_height),
            moving_left: false,
            moving_right: false,
        };
        ship.center(settings);
        ship
    }

    pub fn center(&mut self, settings: &Settings) {
        self.rect.x = (settings.screen_width - self.rect.width) / 2;
        self.rect.y = settings.screen_height - self.rect.height;
        self.x = self.rect.x as f32;
    }

    /// Apply both movement flags, then clamp so the ship stays on screen.
    /// Holding left and right at once cancels out.
    pub fn update(&mut self, settings: &Settings) {
        let mut dx = 0.0;
        if self.moving_right {
            dx += settings.ship_speed;
        }
        if self.moving_left {
            dx -= settings.ship_speed;
        }

        let max_x = (settings.screen_width - self.rect.width).max(0) as f32;
        self.x = (self.x + dx).clamp(0.0, max_x);
        self.rect.x = self.x as i32;
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Bullet {
    /// Vertical position with sub-pixel precision; `rect.y` follows it.
    pub y: f32,
    pub rect: Rect,
}

impl Bullet {
    /// Spawn a bullet at the ship's mid-top.
    pub fn new(settings: &Settings, ship: &Ship) -> Self {
        let rect = Rect::new(
            ship.rect.center_x() - settings.bullet_width / 2,
            ship.rect.top(),
            settings.bullet_width,
            settings.bullet_height,
        );
        Bullet {
            y: rect.y as f32,
            rect,
        }
    }

    /// Move up the screen.  Culling is left to the caller.
    pub fn update(&mut self, speed: f32) {
        self.y -= speed;
        self.rect.y = self.y.floor() as i32;
    }
}

// ── Aliens ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Alien {
    /// Horizontal position with sub-pixel precision; `rect.x` follows it.
    pub x: f32,
    pub rect: Rect,
}

impl Alien {
    pub fn new(settings: &Settings, x: i32, y: i32) -> Self {
        Alien {
            x: x as f32,
            rect: Rect::new(x, y, settings.alien_width, settings.alien_height),
        }
    }

    /// Move sideways by `speed` in the fleet's `direction` (+1 right, -1 left).
    pub fn update(&mut self, speed: f32, direction: i32) {
        self.x += speed * direction as f32;
        self.rect.x = self.x.floor() as i32;
    }

    pub fn drop_by(&mut self, distance: i32) {
        self.rect.y += distance;
    }

    /// True once the alien touches either side of the screen.
    pub fn check_edges(&self, screen_width: i32) -> bool {
        self.rect.right() >= screen_width || self.rect.left() <= 0
    }
}
