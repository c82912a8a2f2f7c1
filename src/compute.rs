//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` and returns a brand-new `GameState`.  The only side effect is
//! logging; rendering and terminal I/O live in the binary.

use log::{debug, info};

use crate::entities::{Alien, Bullet, GameStatus, Rect, Ship};
use crate::input::{InputEvent, Key};
use crate::settings::{CollisionCounting, Settings};
use crate::stats::GameStats;

const REPLAY_BUTTON_WIDTH: i32 = 200;
const REPLAY_BUTTON_HEIGHT: i32 = 60;
/// How far below the screen centre the replay button sits.
const REPLAY_BUTTON_OFFSET: i32 = 100;

// ── Master game state ─────────────────────────────────────────────────────────

/// Everything the frame loop owns.  Cloneable so the update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub settings: Settings,
    pub stats: GameStats,
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub aliens: Vec<Alien>,
    /// Current fleet heading: 1 is right, -1 is left.
    pub fleet_direction: i32,
    pub status: GameStatus,
    pub frame: u64,
}

/// Outcome of feeding one input event to the game.
#[derive(Debug)]
pub enum Flow {
    Continue(GameState),
    Quit,
}

// ── Fleet layout ──────────────────────────────────────────────────────────────

/// Columns and rows of the fleet grid for these settings.
///
/// Columns use a pitch of two alien widths across the screen minus a one-alien
/// margin on each side.  Rows use a pitch of two alien heights over the screen
/// height minus three alien heights and the ship's height.
pub fn fleet_dimensions(settings: &Settings) -> (usize, usize) {
    let w = settings.alien_width;
    let h = settings.alien_height;
    if w <= 0 || h <= 0 {
        return (0, 0);
    }

    let available_x = settings.screen_width - 2 * w;
    let available_y = settings.screen_height - 3 * h - settings.ship_height;
    let cols = (available_x / (2 * w)).max(0) as usize;
    let rows = (available_y / (2 * h)).max(0) as usize;
    (cols, rows)
}

/// Build a full fleet.  Alien (row, col) sits at x = w + 2w·col, y = h + 2h·row.
pub fn create_fleet(settings: &Settings) -> Vec<Alien> {
    let (cols, rows) = fleet_dimensions(settings);
    let w = settings.alien_width;
    let h = settings.alien_height;

    let mut aliens = Vec::with_capacity(cols * rows);
    for row in 0..rows as i32 {
        for col in 0..cols as i32 {
            aliens.push(Alien::new(settings, w + 2 * w * col, h + 2 * h * row));
        }
    }
    debug!("spawned fleet of {} aliens ({}x{})", aliens.len(), cols, rows);
    aliens
}

/// Hit area of the replay control shown on the game-over screen.
pub fn replay_button(settings: &Settings) -> Rect {
    Rect::centered_at(
        settings.screen_width / 2,
        settings.screen_height / 2 + REPLAY_BUTTON_OFFSET,
        REPLAY_BUTTON_WIDTH,
        REPLAY_BUTTON_HEIGHT,
    )
}

// ── Constructors ──────────────────────────────────────────────────────────────

/// Build the initial game state: full lives, ship centred, a fresh fleet.
pub fn init_state(settings: Settings) -> GameState {
    GameState {
        stats: GameStats::new(&settings),
        ship: Ship::new(&settings),
        bullets: Vec::new(),
        aliens: create_fleet(&settings),
        fleet_direction: settings.fleet_direction,
        status: GameStatus::Playing,
        frame: 0,
        settings,
    }
}

/// Start a new round after game over.
pub fn reset_game(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.stats.reset(&next.settings);
    next.ship.center(&next.settings);
    next.bullets.clear();
    next.aliens = create_fleet(&next.settings);
    next.fleet_direction = next.settings.fleet_direction;
    next.status = GameStatus::Playing;
    info!("replay: new round with {} ships", next.stats.ships_left);
    next
}

// ── Input-driven state transitions (pure) ─────────────────────────────────────

/// Fire a bullet from the ship, unless `bullets_allowed` are already in flight.
pub fn fire_bullet(state: &GameState) -> GameState {
    let mut next = state.clone();
    if next.bullets.len() < next.settings.bullets_allowed {
        next.bullets.push(Bullet::new(&next.settings, &next.ship));
    }
    next
}

/// Apply one input event.  Quit requests win in every state.
///
/// While playing, arrows toggle the movement flags and space fires.  On the
/// game-over screen only the replay control (mouse click inside the button,
/// or the replay key) does anything.  Key releases are honoured everywhere so
/// a key let go during the game-over screen does not stay stuck afterwards.
pub fn handle_event(state: &GameState, event: &InputEvent) -> Flow {
    match (state.status, *event) {
        (_, InputEvent::Quit) | (_, InputEvent::KeyDown(Key::Quit)) => Flow::Quit,

        (_, InputEvent::KeyUp(key)) => Flow::Continue(set_moving(state, key, false)),

        (GameStatus::Playing, InputEvent::KeyDown(Key::Space)) => {
            Flow::Continue(fire_bullet(state))
        }
        (GameStatus::Playing, InputEvent::KeyDown(key)) => {
            Flow::Continue(set_moving(state, key, true))
        }

        (GameStatus::GameOver, InputEvent::MouseDown { x, y })
            if replay_button(&state.settings).contains_point(x, y) =>
        {
            Flow::Continue(reset_game(state))
        }
        (GameStatus::GameOver, InputEvent::KeyDown(Key::Replay)) => {
            Flow::Continue(reset_game(state))
        }

        _ => Flow::Continue(state.clone()),
    }
}

fn set_moving(state: &GameState, key: Key, held: bool) -> GameState {
    let mut next = state.clone();
    match key {
        Key::Left => next.ship.moving_left = held,
        Key::Right => next.ship.moving_right = held,
        _ => {}
    }
    next
}

// ── Per-frame tick ────────────────────────────────────────────────────────────

/// Advance the simulation by one frame.  The game-over screen is static, so
/// nothing moves until the player asks for a replay.
pub fn tick(state: &GameState) -> GameState {
    let mut next = state.clone();
    if next.status == GameStatus::GameOver {
        return next;
    }

    next.frame += 1;
    next.ship.update(&next.settings);
    update_bullets(&mut next);
    update_aliens(&mut next);
    next
}

// ── 1. Bullets ────────────────────────────────────────────────────────────────

fn update_bullets(state: &mut GameState) {
    let speed = state.settings.bullet_speed;
    for bullet in &mut state.bullets {
        bullet.update(speed);
    }
    state.bullets.retain(|b| b.rect.bottom() > 0);

    check_bullet_alien_collisions(state);
}

fn check_bullet_alien_collisions(state: &mut GameState) {
    let mut spent_bullets = vec![false; state.bullets.len()];
    let mut killed_aliens = vec![false; state.aliens.len()];

    // A bullet takes out every alien it overlaps this frame.
    for (bi, bullet) in state.bullets.iter().enumerate() {
        for (ai, alien) in state.aliens.iter().enumerate() {
            if bullet.rect.overlaps(&alien.rect) {
                spent_bullets[bi] = true;
                killed_aliens[ai] = true;
            }
        }
    }

    let destroyed = killed_aliens.iter().filter(|&&k| k).count() as u32;
    let mut spent = spent_bullets.into_iter();
    state.bullets.retain(|_| !spent.next().unwrap_or(false));
    let mut killed = killed_aliens.into_iter();
    state.aliens.retain(|_| !killed.next().unwrap_or(false));

    if destroyed > 0 {
        state.stats.aliens_destroyed += match state.settings.collision_counting {
            CollisionCounting::PerFrame => 1,
            CollisionCounting::PerAlien => destroyed,
        };
    }

    if state.aliens.is_empty() {
        state.bullets.clear();
        state.aliens = create_fleet(&state.settings);
    }
}

// ── 2. Fleet ──────────────────────────────────────────────────────────────────

fn update_aliens(state: &mut GameState) {
    check_fleet_edges(state);

    let speed = state.settings.alien_speed;
    let direction = state.fleet_direction;
    for alien in &mut state.aliens {
        alien.update(speed, direction);
    }

    // ── Ship collision, latched so one continuous overlap costs one ship ──
    let collided = state.aliens.iter().any(|a| a.rect.overlaps(&state.ship.rect));
    let newly_hit = collided && !state.stats.ship_hit;
    if newly_hit {
        state.stats.ship_hit = true;
        lose_ship(state);
    } else if !collided {
        state.stats.ship_hit = false;
    }

    // ── Fleet reaching the bottom of the screen ──
    let screen_height = state.settings.screen_height;
    if state.status == GameStatus::Playing
        && state.aliens.iter().any(|a| a.rect.bottom() >= screen_height)
    {
        if !newly_hit {
            lose_ship(state);
        }
        if state.status == GameStatus::Playing {
            state.bullets.clear();
            state.aliens = create_fleet(&state.settings);
            state.fleet_direction = state.settings.fleet_direction;
        }
    }
}

fn check_fleet_edges(state: &mut GameState) {
    let screen_width = state.settings.screen_width;
    if state.aliens.iter().any(|a| a.check_edges(screen_width)) {
        let drop = state.settings.fleet_drop_speed;
        for alien in &mut state.aliens {
            alien.drop_by(drop);
        }
        state.fleet_direction = -state.fleet_direction;
    }
}

// ── 3. Lives & game over ──────────────────────────────────────────────────────

fn lose_ship(state: &mut GameState) {
    state.stats.ships_left = state.stats.ships_left.saturating_sub(1);
    if state.stats.ships_left == 0 {
        enter_game_over(state);
    } else {
        info!("ship hit, {} left", state.stats.ships_left);
        state.ship.center(&state.settings);
    }
}

fn enter_game_over(state: &mut GameState) {
    info!(
        "game over after destroying {} aliens",
        state.stats.aliens_destroyed
    );
    state.stats.game_over = true;
    state.stats.game_active = false;
    state.status = GameStatus::GameOver;
    state.aliens.clear();
    state.bullets.clear();
}
