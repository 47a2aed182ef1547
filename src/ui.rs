//! User interface rendering functions for all application screens.

use std::rc::Rc;

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Borders, Clear,
    },
    Frame,
};

use crate::{
    grid::{CellKind, Grid},
    mapper::{BoardMapper, BOARD_ROTATION},
    session::{GameSession, Outcome},
    types::{EndMenuItem, MainMenuItem, MenuType, Screen},
    App,
};

/// Height of a terminal cell relative to its width.
const CELL_ASPECT: f64 = 2.0;

/// Number of sample points drawn along each side of a board cell.
const SUBSAMPLES: u32 = 4;

/// Updates the application UI based on the persistent state.
///
/// This function renders different screens based on the current state stored in the [`App`]
/// structure, dispatching to the appropriate rendering function for each screen type.
///
/// # Errors
///
/// This function may return errors from drawing operations or data conversion failures.
pub(crate) fn draw(app: &App, frame: &mut Frame) -> Result<()> {
    match app.screen {
        Screen::MainMenu(item) => main_menu(frame, item),
        Screen::InGame => in_game(app, frame)?,
        Screen::GameOver(item) => game_over(app, frame, item)?,
    }

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
pub(crate) fn clear(frame: &mut Frame) {
    let clear = Clear;
    frame.render_widget(clear, frame.area());
}

/// Renders the generic layout structure shared by the menus.
///
/// This function creates the centered block every menu is drawn in. The entries themselves are
/// rendered by the caller into the returned rows, one per entry announced by the [`MenuType`].
#[expect(
    clippy::indexing_slicing,
    reason = "The collection is created in-place with few, known elements; there is no risk of bad indexing."
)]
pub(crate) fn init_menu(frame: &mut Frame, menu: &MenuType) -> Rc<[Rect]> {
    let space = Layout::vertical([
        Constraint::Percentage(30),
        Constraint::Percentage(40),
        Constraint::Percentage(30),
    ])
    .split(frame.area())[1];
    let space = Layout::horizontal([
        Constraint::Percentage(30),
        Constraint::Percentage(40),
        Constraint::Percentage(30),
    ])
    .split(space)[1];

    let layout = Layout::vertical([Constraint::Max(u16::from(menu.value() + 2))])
        .flex(Flex::Center)
        .split(space)[0];

    let block = Block::bordered()
        .title(menu.repr())
        .title_bottom("(j) down / (k) up / (l) select")
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    let inner_space = block.inner(layout);

    frame.render_widget(block, layout);

    Layout::vertical(vec![Constraint::Max(1); menu.value().into()]).split(inner_space)
}

/// Renders menu entries into the rows prepared by [`init_menu`], highlighting the selected one.
fn render_entries(frame: &mut Frame, rows: &[Rect], labels: &[&str], selected: usize) {
    let content_style = Style::default().fg(Color::Green);
    let active_content_style = Style::default().fg(Color::White).bg(Color::Green);

    for (idx, (label, row)) in labels.iter().zip(rows).enumerate() {
        let style = if idx == selected {
            active_content_style
        } else {
            content_style
        };
        frame.render_widget(Line::raw(*label).centered().style(style), *row);
    }
}

/// Renders the main menu screen.
///
/// This function displays the main menu with options for "Start Game", "Hard Mode" and "Quit",
/// highlighting the currently selected option.
pub(crate) fn main_menu(frame: &mut Frame, item: MainMenuItem) {
    clear(frame);

    let inner_layout = init_menu(frame, &MenuType::MainMenu(3));

    let selected = match item {
        MainMenuItem::StartGame => 0,
        MainMenuItem::HardMode => 1,
        MainMenuItem::Quit => 2,
    };
    render_entries(
        frame,
        &inner_layout,
        &["Start Game", "Hard Mode", "Quit"],
        selected,
    );
}

/// Renders the end of round screen.
///
/// The menu is titled with the round's headline. Hard mode is only offered after a win.
///
/// # Errors
///
/// This function returns an error when no round is available to read the headline from.
pub(crate) fn game_over(app: &App, frame: &mut Frame, item: EndMenuItem) -> Result<()> {
    let session = app
        .session
        .as_ref()
        .ok_or_eyre("no finished round to show")?;
    let title = session.title().ok_or_eyre("the round has not ended yet")?;
    let choices = EndMenuItem::choices(session.outcome() == Outcome::Won);

    clear(frame);

    let inner_layout = init_menu(frame, &MenuType::EndMenu(title, u8::try_from(choices.len())?));

    let labels: Vec<&str> = choices.iter().map(|choice| choice.label()).collect();
    let selected = choices
        .iter()
        .position(|&choice| choice == item)
        .unwrap_or_default();
    render_entries(frame, &inner_layout, &labels, selected);

    Ok(())
}

/// Placement of the rotated board on the canvas.
struct Projection {
    /// Unrotated placement of the board cells.
    mapper: BoardMapper,
    /// Canvas units per world unit along the vertical axis.
    scale: f64,
}

impl Projection {
    /// Fits the board, under any rotation, into an area of the given size.
    fn fit(grid: &Grid, area: Rect) -> Self {
        let mapper = BoardMapper::new(grid, 1.0);
        let half_width = f64::from(area.width) / 2.0;
        let half_height = f64::from(area.height) / 2.0;
        let scale = (half_width / CELL_ASPECT).min(half_height) / mapper.bounding_radius();

        Self { mapper, scale }
    }

    /// Maps a fractional grid position onto the canvas, turning the board by [`BOARD_ROTATION`].
    fn point(&self, col: f64, row: f64) -> (f64, f64) {
        let (x, z) = self.mapper.to_rotated_point(col, row, BOARD_ROTATION);

        (x * self.scale * CELL_ASPECT, -z * self.scale)
    }

    /// Appends a filled square of sample points centered on a grid position.
    fn fill(&self, col: f64, row: f64, coords: &mut Vec<(f64, f64)>) {
        let steps = f64::from(SUBSAMPLES);
        for i in 0..SUBSAMPLES {
            for j in 0..SUBSAMPLES {
                let dx = (f64::from(i) + 0.5) / steps - 0.5;
                let dz = (f64::from(j) + 0.5) / steps - 0.5;
                coords.push(self.point(col + dx, row + dz));
            }
        }
    }
}

/// Points of every cell of one kind, in canvas coordinates.
fn cells_of(projection: &Projection, grid: &Grid, kind: CellKind) -> Result<Vec<(f64, f64)>> {
    let mut coords = Vec::new();
    for coordinate in grid.coordinates() {
        if grid.kind_at(coordinate) == kind {
            projection.fill(
                f64::from(u32::try_from(coordinate.col)?),
                f64::from(u32::try_from(coordinate.row)?),
                &mut coords,
            );
        }
    }

    Ok(coords)
}

/// Points of the player token at its interpolated position.
fn player_points(projection: &Projection, session: &GameSession) -> Result<Vec<(f64, f64)>> {
    let controller = session.controller();
    let (col, row) = match controller.transition() {
        Some(transition) => transition.position(),
        None => {
            let position = controller.current_position();
            (
                f64::from(u32::try_from(position.col)?),
                f64::from(u32::try_from(position.row)?),
            )
        }
    };

    let mut coords = Vec::new();
    projection.fill(col, row, &mut coords);

    Ok(coords)
}

/// Renders the in-game screen with the rotated board.
///
/// This function draws the walls, both goals and the player with [`Canvas`] widgets for precise
/// coordinate-based drawing. The board is turned by [`BOARD_ROTATION`] and the player is drawn at
/// the interpolated position of the move in flight.
///
/// # Errors
///
/// This function may return errors when no round is running or from coordinate conversions.
pub(crate) fn in_game(app: &App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let session = app
        .session
        .as_ref()
        .ok_or_eyre("no round to render in game")?;
    let grid = session.grid();

    let overall_layout = Layout::vertical([Constraint::Min(1), Constraint::Length(3)])
        .split(frame.area());
    let board_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get board area from layout")?;
    let tooltip_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get tooltip area from layout")?;

    let projection = Projection::fit(grid, board_area);
    let walls = cells_of(&projection, grid, CellKind::Wall)?;
    let heart = cells_of(&projection, grid, CellKind::PrimaryGoal)?;
    let sad = cells_of(&projection, grid, CellKind::SecondaryGoal)?;
    let player = player_points(&projection, session)?;

    let board = Canvas::default()
        .x_bounds([
            (-rounded_div::i32(board_area.width.into(), 2)).into(),
            (rounded_div::i32(board_area.width.into(), 2)).into(),
        ])
        .y_bounds([
            (-rounded_div::i32(board_area.height.into(), 2)).into(),
            (rounded_div::i32(board_area.height.into(), 2)).into(),
        ])
        .marker(Marker::Braille)
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &walls,
                color: Color::Green,
            });
            ctx.draw(&Points {
                coords: &heart,
                color: Color::Red,
            });
            ctx.draw(&Points {
                coords: &sad,
                color: Color::Blue,
            });
            ctx.draw(&Points {
                coords: &player,
                color: Color::Yellow,
            });
        });

    frame.render_widget(board, board_area);

    let hard = if app.hard { " / hard mode" } else { "" };
    let music = if app.music { " / music on" } else { "" };
    let tooltip_block = Block::bordered()
        .title(format!(
            "(arrows) move / (h) return to menu / moves: {}{hard}{music}",
            app.moves
        ))
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Plain)
        .borders(Borders::TOP);

    frame.render_widget(tooltip_block, tooltip_area);

    Ok(())
}
