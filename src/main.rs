//! This crate contains the source code for the binary of the game heartmaze.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use std::io::stdout;

use clap::Parser as _;
use color_eyre::{eyre::Result, install};
use heartmaze::{logging, App, Config};
use ratatui::crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};

fn main() -> Result<()> {
    install()?;

    let config = Config::parse();
    logging::init(&config)?;

    let mut terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture)?;
    let result = App::new(config).run(&mut terminal);
    let released = execute!(stdout(), DisableMouseCapture);
    ratatui::restore();

    result?;
    released?;

    Ok(())
}
