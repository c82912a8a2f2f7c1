mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};

use alien_invasion::compute::{handle_event, init_state, tick, Flow, GameState};
use alien_invasion::input::{InputEvent, Key};
use alien_invasion::settings::{CollisionCounting, Settings};
use alien_invasion::viewport::Viewport;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Only used on terminals that don't emit key-release
/// events.  A held key can still be released early during the OS initial
/// repeat delay or at high `--fps`; the next repeat presses it again.
const HOLD_WINDOW: u64 = 4;

#[derive(Parser)]
#[command(name = "alien_invasion")]
#[command(about = "Shoot down the alien fleet before it reaches your ship")]
struct Args {
    /// World width in pixels
    #[arg(long)]
    width: Option<i32>,

    /// World height in pixels
    #[arg(long)]
    height: Option<i32>,

    /// Ships per round
    #[arg(long)]
    ship_limit: Option<u32>,

    /// Bullets allowed on screen at once
    #[arg(long)]
    bullets_allowed: Option<usize>,

    /// Frames per second
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Count every alien destroyed instead of one per frame with a hit
    #[arg(long)]
    count_every_alien: bool,

    /// Write log records here (filter with RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        if let Some(width) = self.width {
            settings.screen_width = width;
        }
        if let Some(height) = self.height {
            settings.screen_height = height;
        }
        if let Some(limit) = self.ship_limit {
            settings.ship_limit = limit;
        }
        if let Some(allowed) = self.bullets_allowed {
            settings.bullets_allowed = allowed;
        }
        if self.count_every_alien {
            settings.collision_counting = CollisionCounting::PerAlien;
        }
        settings
    }
}

/// The terminal owns stdout and stderr, so records only go to a file.
fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Input translation ─────────────────────────────────────────────────────────

fn key_for(code: KeyCode) -> Key {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Key::Left,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Key::Right,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char('q') | KeyCode::Char('Q') => Key::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => Key::Replay,
        _ => Key::Other,
    }
}

/// Turns raw terminal events into game events.
///
/// Input model: `held` records the frame of the last press/repeat event for
/// every key that is down.  Every press event is a key-down, so a quick
/// second tap of space fires again.  Repeat events only count when the key
/// was up.  A key-up is emitted on a real release event, or (for terminals
/// without release events) once the key has been silent for `HOLD_WINDOW`
/// frames.  Such terminals report auto-repeat as presses, which the bullet
/// limit keeps in check.
struct InputTranslator {
    held: HashMap<Key, u64>,
}

impl InputTranslator {
    fn new() -> Self {
        Self {
            held: HashMap::new(),
        }
    }

    fn translate(&mut self, ev: Event, view: &Viewport, frame: u64) -> Option<InputEvent> {
        match ev {
            Event::Key(KeyEvent {
                code, modifiers, ..
            }) if code == KeyCode::Esc
                || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL)) =>
            {
                Some(InputEvent::Quit)
            }
            Event::Key(KeyEvent { code, kind, .. }) => {
                let key = key_for(code);
                match kind {
                    KeyEventKind::Press => {
                        self.held.insert(key, frame);
                        Some(InputEvent::KeyDown(key))
                    }
                    KeyEventKind::Repeat => {
                        let was_held = self.held.insert(key, frame).is_some();
                        (!was_held).then_some(InputEvent::KeyDown(key))
                    }
                    KeyEventKind::Release => self
                        .held
                        .remove(&key)
                        .map(|_| InputEvent::KeyUp(key)),
                }
            }
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => {
                let (x, y) = view.cell_to_world(column, row);
                Some(InputEvent::MouseDown { x, y })
            }
            _ => None,
        }
    }

    /// Release every key that has gone quiet.
    fn expire(&mut self, frame: u64) -> Vec<InputEvent> {
        let stale: Vec<Key> = self
            .held
            .iter()
            .filter(|&(_, &last)| frame.saturating_sub(last) > HOLD_WINDOW)
            .map(|(&key, _)| key)
            .collect();
        for key in &stale {
            self.held.remove(key);
        }
        stale.into_iter().map(InputEvent::KeyUp).collect()
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until a quit event arrives.  Playing and game-over share this one
/// loop; `compute::tick` is a no-op while the game-over screen is up.
fn game_loop<W: Write>(
    out: &mut W,
    mut state: GameState,
    rx: &mpsc::Receiver<Event>,
    frame_time: Duration,
    release_events: bool,
) -> std::io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut view = Viewport::new(
        state.settings.screen_width,
        state.settings.screen_height,
        cols,
        rows,
    );
    let mut input = InputTranslator::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            if let Event::Resize(cols, rows) = ev {
                view = Viewport::new(view.world_width, view.world_height, cols, rows);
                continue;
            }
            events.extend(input.translate(ev, &view, frame));
        }
        if !release_events {
            events.extend(input.expire(frame));
        }

        for ev in &events {
            match handle_event(&state, ev) {
                Flow::Quit => return Ok(()),
                Flow::Continue(next) => state = next,
            }
        }

        state = tick(&state);
        display::render(out, &state, &view)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Terminal session ──────────────────────────────────────────────────────────

/// Owns the terminal while the game runs.  Dropping it restores the terminal,
/// including raw mode, whether or not `setup` got all the way through.
struct TerminalGuard<W: Write> {
    out: W,
    keyboard_enhanced: bool,
}

impl<W: Write> TerminalGuard<W> {
    /// Raw mode must already be on; the guard turns it off again.
    fn new(out: W) -> Self {
        Self {
            out,
            keyboard_enhanced: false,
        }
    }

    fn setup(&mut self) -> std::io::Result<()> {
        self.out.execute(terminal::EnterAlternateScreen)?;
        self.out.execute(cursor::Hide)?;
        self.out.execute(EnableMouseCapture)?;

        // Request key-release (and key-repeat) events from the terminal.
        // Kitty-protocol terminals support this; others fall back to HOLD_WINDOW.
        self.keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
            && self
                .out
                .execute(PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
                ))
                .is_ok();
        Ok(())
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = self.out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = self.out.execute(DisableMouseCapture);
        let _ = self.out.execute(cursor::Show);
        let _ = self.out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let settings = args.settings();
    settings.validate().context("invalid settings")?;
    info!(
        "starting: {}x{} world, {} ships, {} bullets, {} FPS",
        settings.screen_width,
        settings.screen_height,
        settings.ship_limit,
        settings.bullets_allowed,
        args.fps
    );

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    let mut term = TerminalGuard::new(BufWriter::new(stdout()));
    term.setup().context("failed to set up the terminal")?;
    if !term.keyboard_enhanced {
        warn!("terminal does not report key releases, using a {HOLD_WINDOW}-frame hold window");
    }

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let frame_time = Duration::from_secs(1) / args.fps;
    let release_events = term.keyboard_enhanced;
    let result = game_loop(
        &mut term.out,
        init_state(settings),
        &rx,
        frame_time,
        release_events,
    );
    drop(term);

    result.context("game loop failed")?;
    info!("quit");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> Viewport {
        Viewport::new(1200, 800, 120, 40)
    }

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
    }

    // ── InputTranslator ───────────────────────────────────────────────────────

    #[test]
    fn second_space_press_fires_again() {
        let mut input = InputTranslator::new();
        let space = key(KeyCode::Char(' '), KeyEventKind::Press);
        assert_eq!(
            input.translate(space.clone(), &view(), 1),
            Some(InputEvent::KeyDown(Key::Space))
        );
        assert_eq!(
            input.translate(space, &view(), 2),
            Some(InputEvent::KeyDown(Key::Space))
        );
    }

    #[test]
    fn repeat_events_do_not_refire() {
        let mut input = InputTranslator::new();
        input.translate(key(KeyCode::Char(' '), KeyEventKind::Press), &view(), 1);
        let repeat = key(KeyCode::Char(' '), KeyEventKind::Repeat);
        assert_eq!(input.translate(repeat, &view(), 2), None);
    }

    #[test]
    fn release_event_lets_go_once() {
        let mut input = InputTranslator::new();
        input.translate(key(KeyCode::Left, KeyEventKind::Press), &view(), 1);
        let release = key(KeyCode::Left, KeyEventKind::Release);
        assert_eq!(
            input.translate(release.clone(), &view(), 2),
            Some(InputEvent::KeyUp(Key::Left))
        );
        assert_eq!(input.translate(release, &view(), 3), None);
    }

    #[test]
    fn quiet_keys_expire_after_the_hold_window() {
        let mut input = InputTranslator::new();
        input.translate(key(KeyCode::Right, KeyEventKind::Press), &view(), 10);
        assert!(input.expire(10 + HOLD_WINDOW).is_empty());
        assert_eq!(
            input.expire(11 + HOLD_WINDOW),
            vec![InputEvent::KeyUp(Key::Right)]
        );
        assert!(input.expire(20 + HOLD_WINDOW).is_empty());
    }

    #[test]
    fn escape_and_ctrl_c_quit() {
        let mut input = InputTranslator::new();
        assert_eq!(
            input.translate(key(KeyCode::Esc, KeyEventKind::Press), &view(), 1),
            Some(InputEvent::Quit)
        );
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(input.translate(ctrl_c, &view(), 1), Some(InputEvent::Quit));
    }

    #[test]
    fn left_click_maps_to_world_pixels() {
        let mut input = InputTranslator::new();
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 60,
            row: 25,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(
            input.translate(click, &view(), 1),
            Some(InputEvent::MouseDown { x: 605, y: 510 })
        );
    }

    // ── TerminalGuard ─────────────────────────────────────────────────────────

    /// Records everything written, failing the first `failures` writes.
    struct Recorder {
        failures: usize,
        written: Vec<u8>,
    }

    impl Write for Recorder {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_setup_still_restores_the_terminal() {
        let mut rec = Recorder {
            failures: 1,
            written: Vec::new(),
        };
        {
            let mut term = TerminalGuard::new(&mut rec);
            assert!(term.setup().is_err());
        }
        let written = String::from_utf8_lossy(&rec.written);
        assert!(written.contains("\x1b[?25h"), "cursor shown: {written:?}");
        assert!(written.contains("\x1b[?1049l"), "alternate screen left: {written:?}");
    }
}
