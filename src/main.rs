mod angles;
mod animator;
mod color;
mod config;
mod error;
mod glass;
mod graphics;
mod grid;
mod math;
mod screen;
mod state;
mod widget;

use crate::color::Rgb;
use crate::config::Args;
use crate::error::Result;
use crate::graphics::Frame;
use crate::screen::Screen;
use crate::state::{Action, AppState, ControlEvent, Parameters};
use crate::widget::ControlPanel;
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::ResetColor,
    terminal::{self, DisableLineWrap, EnableLineWrap, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Longest the loop sleeps when nothing is scheduled
const IDLE_WAIT: Duration = Duration::from_millis(250);

/// Main function
fn main() -> Result<()> {
    let args = Args::parse();
    config::init_logging(args.log_file.as_ref())?;

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut app = AppState::new(Parameters::default(), args.tick_period(), rng);
    let mut panel = ControlPanel::new(!args.hide_panel);

    install_panic_hook();
    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, DisableLineWrap, cursor::Hide)?;

    let res = run(&mut stdout, &args, &mut app, &mut panel);

    // Always hand the terminal back, even when the loop failed
    let restored = restore_terminal(&mut stdout);
    res.and(restored)
}

/// Restores the terminal before the default panic report is printed
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal(&mut io::stdout());
        original_hook(panic_info);
    }));
}

/// Leaves the alternate screen and raw mode
fn restore_terminal<W: Write>(out: &mut W) -> Result<()> {
    execute!(out, ResetColor, cursor::Show, EnableLineWrap, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// Terminal size in (columns, rows)
fn terminal_size() -> (usize, usize) {
    match termsize::get() {
        Some(size) if size.cols > 0 && size.rows > 0 => (size.cols as usize, size.rows as usize),
        _ => (80, 24),
    }
}

fn run<W: Write>(out: &mut W, args: &Args, app: &mut AppState, panel: &mut ControlPanel) -> Result<()> {
    let (cols, rows) = terminal_size();
    let mut screen = Screen::new(cols, rows);
    screen.clear_all(out)?;
    info!(
        cols,
        rows,
        cells = app.container().cells().len(),
        twirl = app.container().center().twirl(),
        tick_ms = app.animator().period().as_millis() as u64,
        "gradient grid started"
    );

    let frame_interval = args.frame_interval();
    let mut next_frame = Instant::now();
    let mut dirty = true;
    let mut wait = Duration::ZERO;

    loop {
        // ----- input -----
        if event::poll(wait)? {
            while event::poll(Duration::ZERO)? {
                match event::read()? {
                    Event::Key(key) if key.kind != KeyEventKind::Release => {
                        if handle_key(key, app, panel, Instant::now()) {
                            info!("quit requested");
                            return Ok(());
                        }
                        dirty = true;
                    }
                    Event::Resize(cols, rows) => {
                        debug!(cols, rows, "terminal resized");
                        screen.resize(cols as usize, rows as usize);
                        screen.clear_all(out)?;
                        dirty = true;
                    }
                    _ => {}
                }
            }
        }

        // ----- animation -----
        let now = Instant::now();
        if app.tick(now) > 0 {
            dirty = true;
        }

        // ----- present at the frame cap -----
        if dirty && now >= next_frame {
            present(out, &mut screen, app, panel)?;
            dirty = false;
            next_frame = now + frame_interval;
        }

        // Sleep until the next tick or pending frame, whichever is first
        let mut wake = now + IDLE_WAIT;
        if let Some(deadline) = app.animator().next_deadline() {
            wake = wake.min(deadline.max(next_frame));
        }
        if dirty {
            wake = wake.min(next_frame);
        }
        wait = wake.saturating_duration_since(Instant::now());
    }
}

/// Handles a key press; returns true when the user asked to quit
fn handle_key(key: KeyEvent, app: &mut AppState, panel: &mut ControlPanel, now: Instant) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    if !panel.is_editing() {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
            KeyCode::Char('h') | KeyCode::Char('H') => {
                for event in panel.toggle_visible() {
                    app.dispatch(event, now);
                }
                return false;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                app.dispatch(ControlEvent::Pressed(Action::Randomize), now);
                return false;
            }
            _ => {}
        }
    }
    for event in panel.handle_key(key, &mut app.params) {
        app.dispatch(event, now);
    }
    false
}

fn present<W: Write>(out: &mut W, screen: &mut Screen, app: &AppState, panel: &ControlPanel) -> Result<()> {
    let (width, height) = screen.frame_size();
    let mut frame = Frame::new(width, height, Rgb::BLACK);
    graphics::draw_container(&mut frame, app.container());

    let lines = panel
        .is_visible()
        .then(|| panel.lines(&app.params, app.is_animating()));
    let cells = screen.compose(&frame, lines.as_deref());
    screen.draw(out, &cells)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> AppState {
        AppState::new(
            Parameters::default(),
            Duration::from_millis(5),
            StdRng::seed_from_u64(3),
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        let mut panel = ControlPanel::new(true);
        let now = Instant::now();
        assert!(handle_key(press(KeyCode::Char('q')), &mut app, &mut panel, now));
        assert!(handle_key(press(KeyCode::Esc), &mut app, &mut panel, now));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(handle_key(ctrl_c, &mut app, &mut panel, now));
        assert!(!handle_key(press(KeyCode::Down), &mut app, &mut panel, now));
    }

    #[test]
    fn escape_closes_the_hex_field_instead_of_quitting() {
        let mut app = app();
        let mut panel = ControlPanel::new(true);
        let now = Instant::now();
        handle_key(press(KeyCode::Enter), &mut app, &mut panel, now);
        assert!(panel.is_editing());
        assert!(!handle_key(press(KeyCode::Esc), &mut app, &mut panel, now));
        assert!(!panel.is_editing());
    }

    #[test]
    fn restore_leaves_the_alternate_screen() {
        let mut out: Vec<u8> = Vec::new();
        restore_terminal(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("\x1b[?1049l"));
        assert!(text.contains("\x1b[?25h"));
    }

    #[test]
    fn hiding_the_panel_applies_a_pending_angle() {
        let mut app = app();
        let mut panel = ControlPanel::new(true);
        let now = Instant::now();
        let before = app.angles().clone();
        handle_key(press(KeyCode::Down), &mut app, &mut panel, now);
        handle_key(press(KeyCode::Down), &mut app, &mut panel, now);
        handle_key(press(KeyCode::Right), &mut app, &mut panel, now);
        assert_eq!(app.angles(), &before);
        handle_key(press(KeyCode::Char('h')), &mut app, &mut panel, now);
        let mut expected = before;
        expected.apply_offset(1);
        assert_eq!(app.angles(), &expected);
    }

    #[test]
    fn shortcut_randomizes() {
        let mut app = app();
        let mut panel = ControlPanel::new(true);
        let before = app.angles().clone();
        handle_key(press(KeyCode::Char('r')), &mut app, &mut panel, Instant::now());
        assert_eq!(app.angles().len(), 9);
        assert_ne!(app.angles(), &before);
    }

    #[test]
    fn panel_keys_reach_the_state() {
        let mut app = app();
        let mut panel = ControlPanel::new(true);
        let now = Instant::now();
        for _ in 0..3 {
            handle_key(press(KeyCode::Down), &mut app, &mut panel, now);
        }
        handle_key(press(KeyCode::Left), &mut app, &mut panel, now);
        assert_eq!(app.params.rows, 2);
        assert_eq!(app.angles().len(), 6);
    }

    #[test]
    fn present_draws_grid_and_panel() {
        let app = app();
        let panel = ControlPanel::new(true);
        let mut screen = Screen::new(80, 24);
        let mut out: Vec<u8> = Vec::new();
        present(&mut out, &mut screen, &app, &panel).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('▀'));
        assert!(text.contains("Gradient Spread"));
    }
}
