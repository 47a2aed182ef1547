//! Event handling functions for user input and application state updates.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use log::debug;
use ratatui::crossterm::event::{
    self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};

use crate::{
    grid::Direction,
    mapper::{arrow_vector, resolve_input_direction, BOARD_ROTATION},
    session::{Cue, Outcome},
    types::{EndMenuItem, MainMenuItem, Screen},
    App,
};

/// Longest wait for an input event before the animation is advanced.
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Shortest mouse drag, in scaled terminal cells, accepted as a swipe.
const MIN_SWIPE_DISTANCE: f64 = 2.0;

/// Height of a terminal cell relative to its width.
const CELL_ASPECT: f64 = 2.0;

/// Handles input events and advances the round.
///
/// This function polls for keyboard and mouse events and dispatches them to the matching handler.
/// It uses a short timeout so the move animation keeps running while no input arrives.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(POLL_INTERVAL)? {
        match event::read()? {
            // Key repeats and releases never start a move.
            Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key.code)?,
            Event::Mouse(mouse) => handle_mouse(app, mouse),
            _ => {}
        }
    }

    let now = Instant::now();
    let delta = now.saturating_duration_since(app.last_tick);
    app.last_tick = now;
    advance(app, delta);

    Ok(())
}

/// Handles a single key press.
///
/// `q` quits from every screen. Menus answer to `j`/`k` (or the vertical arrows) and `l` (or
/// Enter). In game the arrow keys move the player and `h` (or Escape) returns to the main menu.
pub(crate) fn handle_key(app: &mut App, code: KeyCode) -> Result<()> {
    if code == KeyCode::Char('q') {
        app.exit = true;
        return Ok(());
    }

    match app.screen {
        Screen::MainMenu(item) => match code {
            KeyCode::Char('j') | KeyCode::Down => app.screen = Screen::MainMenu(item.next()),
            KeyCode::Char('k') | KeyCode::Up => app.screen = Screen::MainMenu(item.previous()),
            KeyCode::Char('l') | KeyCode::Enter => handle_main_menu_selection(app)?,
            _ => {}
        },
        Screen::InGame => match code {
            KeyCode::Up => move_player(app, arrow_vector(Direction::North)),
            KeyCode::Down => move_player(app, arrow_vector(Direction::South)),
            KeyCode::Left => move_player(app, arrow_vector(Direction::West)),
            KeyCode::Right => move_player(app, arrow_vector(Direction::East)),
            KeyCode::Char('h') | KeyCode::Esc => app.return_to_menu(),
            _ => {}
        },
        Screen::GameOver(item) => {
            let won = round_won(app);
            match code {
                KeyCode::Char('j') | KeyCode::Down => {
                    app.screen = Screen::GameOver(item.next(won));
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    app.screen = Screen::GameOver(item.previous(won));
                }
                KeyCode::Char('l') | KeyCode::Enter => match item {
                    EndMenuItem::PlayAgain => app.start_game(false)?,
                    EndMenuItem::HardMode => app.start_game(true)?,
                    EndMenuItem::MainMenu => app.return_to_menu(),
                },
                KeyCode::Char('h') | KeyCode::Esc => app.return_to_menu(),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Activates the selected main menu entry.
fn handle_main_menu_selection(app: &mut App) -> Result<()> {
    match app.screen {
        Screen::MainMenu(MainMenuItem::StartGame) => app.start_game(false)?,
        Screen::MainMenu(MainMenuItem::HardMode) => app.start_game(true)?,
        Screen::MainMenu(MainMenuItem::Quit) => app.exit = true,
        _ => {}
    }

    Ok(())
}

/// Handles mouse drags as swipes on the board.
///
/// A swipe runs from the cell where the left button went down to the cell where it was released.
/// Vertical distances are stretched by the terminal cell aspect so a diagonal drag on screen reads
/// as diagonal.
pub(crate) fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.screen != Screen::InGame {
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.swipe_origin = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some((column, row)) = app.swipe_origin.take() else {
                return;
            };
            let dx = f64::from(mouse.column) - f64::from(column);
            let dz = (f64::from(mouse.row) - f64::from(row)) * CELL_ASPECT;
            if dx.hypot(dz) >= MIN_SWIPE_DISTANCE {
                move_player(app, (dx, dz));
            }
        }
        _ => {}
    }
}

/// Resolves a screen-axis vector against the rotated board and asks the round to move.
fn move_player(app: &mut App, raw: (f64, f64)) {
    let Some(session) = app.session.as_mut() else {
        return;
    };
    let Some(direction) = resolve_input_direction(raw, BOARD_ROTATION) else {
        return;
    };

    let _ = session.request_move(direction);
    collect_cues(app);
}

/// Advances the move animation by `delta` and leaves the board once the round has ended.
pub(crate) fn advance(app: &mut App, delta: Duration) {
    let Some(session) = app.session.as_mut() else {
        return;
    };

    session.tick(delta);
    collect_cues(app);
}

/// Applies the cues queued by the round.
fn collect_cues(app: &mut App) {
    let Some(session) = app.session.as_mut() else {
        return;
    };

    for cue in session.drain_cues() {
        debug!("cue {cue:?}");
        match cue {
            Cue::MusicStart => app.music = true,
            Cue::Jump => app.moves = app.moves.saturating_add(1),
            Cue::Victory | Cue::GameOver => {
                if app.screen == Screen::InGame {
                    app.screen = Screen::GameOver(EndMenuItem::PlayAgain);
                }
            }
        }
    }
}

/// Returns whether the round on display was won.
fn round_won(app: &App) -> bool {
    app.session
        .as_ref()
        .is_some_and(|session| session.outcome() == Outcome::Won)
}
