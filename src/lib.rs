//! A maze game played on a board turned by 45 degrees.
//!
//! Every round generates a fresh perfect maze. The player starts in the top left corner and walks
//! the corridors one cell at a time looking for the heart. Somewhere off the way to it waits a
//! second, sad goal, and stepping onto it ends the round badly.
//!
//! The crate is split between the game core and a terminal front end:
//!
//! - [`grid`] holds the board model and its ASCII form.
//! - [`generator`] carves mazes and places both goals, helped by the searches in [`pathfinding`]
//!   and the pluggable randomness of [`random`].
//! - [`mapper`] places cells on the rotated board and turns screen-aligned input into grid steps.
//! - [`navigation`] owns the player position and its move animation.
//! - [`session`] decides the outcome of a round.
//! - [`config`] and [`logging`] cover the command line and the log file.
//!
//! The front end itself is reached through [`App`].

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

mod app;
pub mod config;
mod events;
pub mod generator;
pub mod grid;
pub mod logging;
pub mod mapper;
pub mod navigation;
pub mod pathfinding;
pub mod random;
pub mod session;
mod types;
mod ui;

pub use app::App;
pub use config::Config;
pub use generator::MazeGenerator;
pub use grid::{CellKind, Coordinate, Direction, Grid};
pub use navigation::NavigationController;
pub use session::GameSession;
