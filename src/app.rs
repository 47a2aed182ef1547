//! Core application state of the terminal front end.

use std::time::Instant;

use color_eyre::eyre::Result;
use log::info;
use ratatui::DefaultTerminal;

use crate::{
    config::Config,
    events,
    generator::MazeGenerator,
    session::GameSession,
    types::{MainMenuItem, Screen},
    ui,
};

/// Application state container for the maze game.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui will render the game and Crossterm events will write to. The game rules live in the
/// [`GameSession`]; the application only forwards input to it and reacts to its cues.
pub struct App {
    /// Application exit flag.
    ///
    /// It is set to `true` when the user wants to quit the game but it starts off `false`.
    pub(crate) exit: bool,
    /// Current screen being displayed to the user.
    pub(crate) screen: Screen,
    /// Settings the application was started with.
    pub(crate) config: Config,
    /// Generator shared by every round, so a seeded run stays reproducible across restarts.
    pub(crate) generator: MazeGenerator,
    /// Round being played or just finished.
    pub(crate) session: Option<GameSession>,
    /// Whether the current round is played in hard mode.
    pub(crate) hard: bool,
    /// Terminal cell where the current mouse swipe started.
    pub(crate) swipe_origin: Option<(u16, u16)>,
    /// Number of moves started in the current round.
    pub(crate) moves: usize,
    /// Whether the first move of the round started the music.
    pub(crate) music: bool,
    /// Instant of the last animation update.
    pub(crate) last_tick: Instant,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl App {
    /// Creates the application for the given configuration.
    ///
    /// A seeded configuration makes every generated maze reproducible. The application opens on
    /// the main menu; see [`App::run`] for hard mode requested on the command line.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let generator = config
            .seed
            .map_or_else(MazeGenerator::from_entropy, MazeGenerator::seeded);

        Self {
            exit: false,
            screen: Screen::MainMenu(MainMenuItem::StartGame),
            config,
            generator,
            session: None,
            hard: false,
            swipe_origin: None,
            moves: 0,
            music: false,
            last_tick: Instant::now(),
        }
    }

    /// Starts a new round on a freshly generated maze.
    ///
    /// # Errors
    ///
    /// Fails when no maze can be generated for the configured size.
    pub(crate) fn start_game(&mut self, hard: bool) -> Result<()> {
        let size = self.config.maze_size(hard);
        let session =
            GameSession::generate(&mut self.generator, size, self.config.move_duration())?;
        info!(
            "new round on a {size}x{size} board, hard mode {}",
            if hard { "on" } else { "off" }
        );

        self.session = Some(session);
        self.hard = hard;
        self.moves = 0;
        self.music = false;
        self.swipe_origin = None;
        self.screen = Screen::InGame;
        self.last_tick = Instant::now();

        Ok(())
    }

    /// Skips the main menu when hard mode was requested on the command line.
    ///
    /// # Errors
    ///
    /// Fails when no maze can be generated for the hard mode board.
    pub(crate) fn launch(&mut self) -> Result<()> {
        if self.config.hard && self.session.is_none() {
            self.start_game(true)?;
        }

        Ok(())
    }

    /// Leaves the current round and returns to the main menu.
    pub(crate) fn return_to_menu(&mut self) {
        self.session = None;
        self.swipe_origin = None;
        self.screen = Screen::MainMenu(MainMenuItem::StartGame);
    }

    /// Runs the main loop of the application.
    ///
    /// This function handles user input and updates the application state. The loop continues until
    /// the exit condition is `true`, after which the function returns to the call site. With
    /// `--hard` the first round starts right away on the hard mode board.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    /// - maze generation failures
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.launch()?;

        while !self.exit {
            let _ = terminal.try_draw(|frame| {
                ui::draw(self, frame)
                    .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err))
            })?;
            events::handle_events(self)?;
        }

        Ok(())
    }
}
