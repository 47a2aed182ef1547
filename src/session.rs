//! A single round of the game.
//!
//! A [`GameSession`] ties a generated [`Grid`] to the [`NavigationController`] that walks it and
//! decides the outcome of the round from completed moves: stepping onto the sad goal loses, stepping
//! onto the heart wins. Either outcome is final. Sound and screen effects are not played here; the
//! session only queues [`Cue`]s for the front end to act on.

use std::{mem, time::Duration};

use color_eyre::eyre::{OptionExt as _, Result};
use log::info;

use crate::{
    generator::MazeGenerator,
    grid::{CellKind, Coordinate, Direction, Grid},
    navigation::{MoveListener, MoveResult, NavigationController},
    random::RandomSource,
};

/// State of the round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    /// The player is still looking for the heart.
    #[default]
    Playing,
    /// The player reached the heart.
    Won,
    /// The player stepped onto the sad goal.
    Lost,
}

impl Outcome {
    /// Returns whether the round has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// Effect requested from the front end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    /// Background music starts with the first move of the round.
    MusicStart,
    /// A move started.
    Jump,
    /// The heart was reached.
    Victory,
    /// The sad goal was reached.
    GameOver,
}

/// Listener judging completed moves against the goal locations.
#[derive(Debug)]
struct Referee {
    /// Current state of the round.
    outcome: Outcome,
    /// Whether the first move has already started the music.
    music_started: bool,
    /// Cues not yet collected by the front end.
    cues: Vec<Cue>,
    /// Location of the heart.
    primary: Coordinate,
    /// Location of the sad goal.
    secondary: Coordinate,
}

impl MoveListener for Referee {
    fn on_move_start(&mut self, _target: Coordinate) {
        if self.outcome.is_terminal() {
            return;
        }
        if !self.music_started {
            self.music_started = true;
            self.cues.push(Cue::MusicStart);
        }
        self.cues.push(Cue::Jump);
    }

    fn on_move_complete(&mut self, position: Coordinate) {
        if self.outcome.is_terminal() {
            return;
        }

        // The sad goal is checked first.
        if position == self.secondary {
            self.outcome = Outcome::Lost;
            self.cues.push(Cue::GameOver);
            info!("player reached the sad goal at {position}");
        } else if position == self.primary {
            self.outcome = Outcome::Won;
            self.cues.push(Cue::Victory);
            info!("player reached the heart at {position}");
        }
    }
}

/// One round played on one maze.
#[derive(Debug)]
pub struct GameSession {
    /// Board of the round.
    grid: Grid,
    /// Owner of the player position.
    controller: NavigationController,
    /// Judge of the round.
    referee: Referee,
}

impl GameSession {
    /// Starts a round on an existing grid with the player on [`Grid::START`].
    ///
    /// # Errors
    ///
    /// Fails when the grid lacks either goal.
    pub fn new(grid: Grid, move_duration: Duration) -> Result<Self> {
        let primary = grid
            .find_goal(CellKind::PrimaryGoal)
            .ok_or_eyre("maze has no primary goal")?;
        let secondary = grid
            .find_goal(CellKind::SecondaryGoal)
            .ok_or_eyre("maze has no secondary goal")?;

        Ok(Self {
            grid,
            controller: NavigationController::new(Grid::START, move_duration),
            referee: Referee {
                outcome: Outcome::Playing,
                music_started: false,
                cues: Vec::new(),
                primary,
                secondary,
            },
        })
    }

    /// Generates a fresh maze of the requested size and starts a round on it.
    ///
    /// # Errors
    ///
    /// Fails when the generator gives up on the size.
    pub fn generate<R: RandomSource>(
        generator: &mut MazeGenerator<R>,
        size: usize,
        move_duration: Duration,
    ) -> Result<Self> {
        Self::new(generator.generate(size)?, move_duration)
    }

    /// Forwards a move request to the controller.
    pub fn request_move(&mut self, direction: Direction) -> MoveResult {
        let result = self.controller.request_move(&self.grid, direction);
        self.settle();
        result
    }

    /// Advances the move in flight and settles the outcome of any completed move.
    pub fn tick(&mut self, delta: Duration) {
        self.controller.tick(delta);
        self.settle();
    }

    /// Hands queued movement events to the referee, locking the controller once the round ends.
    fn settle(&mut self) {
        self.controller.dispatch(&mut self.referee);
        if self.referee.outcome.is_terminal() && !self.controller.is_locked() {
            self.controller.lock();
        }
    }

    /// Removes and returns the queued cues in the order they happened.
    pub fn drain_cues(&mut self) -> Vec<Cue> {
        mem::take(&mut self.referee.cues)
    }

    /// Returns the headline shown once the round has ended.
    #[must_use]
    pub const fn title(&self) -> Option<&'static str> {
        match self.referee.outcome {
            Outcome::Playing => None,
            Outcome::Won => Some("I love you"),
            Outcome::Lost => Some("how could you do that"),
        }
    }

    /// Returns the board of the round.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the navigation controller of the round.
    #[must_use]
    pub const fn controller(&self) -> &NavigationController {
        &self.controller
    }

    /// Returns the current state of the round.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.referee.outcome
    }

    /// Returns the location of the heart.
    #[must_use]
    pub const fn primary_goal(&self) -> Coordinate {
        self.referee.primary
    }

    /// Returns the location of the sad goal.
    #[must_use]
    pub const fn secondary_goal(&self) -> Coordinate {
        self.referee.secondary
    }
}
