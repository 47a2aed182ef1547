//! Type definitions for the application screens and menus.

/// Enumeration of available application screens.
///
/// This enumeration holds information about the current screen of the game. It is used to determine
/// which screen to render and what actions to take based on user input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    /// Main menu screen of the game.
    MainMenu(MainMenuItem),
    /// In-game screen where the rotated board is displayed and walked.
    InGame,
    /// End of round screen, shown after the heart or the sad goal was reached.
    GameOver(EndMenuItem),
}

/// Main menu navigation options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MainMenuItem {
    /// "Start Game" menu option.
    StartGame,
    /// "Hard Mode" menu option, starting a round on a larger board.
    HardMode,
    /// "Quit" menu option.
    Quit,
}

impl MainMenuItem {
    /// Returns the item below this one, staying on the last item.
    pub(crate) const fn next(self) -> Self {
        match self {
            Self::StartGame => Self::HardMode,
            Self::HardMode | Self::Quit => Self::Quit,
        }
    }

    /// Returns the item above this one, staying on the first item.
    pub(crate) const fn previous(self) -> Self {
        match self {
            Self::StartGame | Self::HardMode => Self::StartGame,
            Self::Quit => Self::HardMode,
        }
    }
}

/// End of round menu options.
///
/// The hard mode entry is only offered after a win.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EndMenuItem {
    /// "Play Again" option, starting a new round at the normal size.
    PlayAgain,
    /// "Hard Mode" option, starting a new round on the hard mode board.
    HardMode,
    /// "Main Menu" option.
    MainMenu,
}

impl EndMenuItem {
    /// Returns the items offered on the end screen.
    pub(crate) const fn choices(won: bool) -> &'static [Self] {
        if won {
            &[Self::PlayAgain, Self::HardMode, Self::MainMenu]
        } else {
            &[Self::PlayAgain, Self::MainMenu]
        }
    }

    /// Returns the label rendered for the item.
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::PlayAgain => "Play Again",
            Self::HardMode => "Hard Mode",
            Self::MainMenu => "Main Menu",
        }
    }

    /// Returns the offered item below this one, staying on the last item.
    pub(crate) fn next(self, won: bool) -> Self {
        let choices = Self::choices(won);
        choices
            .iter()
            .position(|&item| item == self)
            .and_then(|index| choices.get(index + 1))
            .or_else(|| choices.last())
            .copied()
            .unwrap_or(self)
    }

    /// Returns the offered item above this one, staying on the first item.
    pub(crate) fn previous(self, won: bool) -> Self {
        let choices = Self::choices(won);
        choices
            .iter()
            .position(|&item| item == self)
            .and_then(|index| index.checked_sub(1))
            .and_then(|index| choices.get(index))
            .or_else(|| choices.first())
            .copied()
            .unwrap_or(self)
    }
}

/// Generic menu type configuration.
///
/// This enumeration holds the specifics particular to each menu sharing the centered block layout:
/// its title and the number of entries it renders.
pub(crate) enum MenuType {
    /// Main menu configuration.
    MainMenu(u8),
    /// End of round menu configuration, titled with the round's headline.
    EndMenu(&'static str, u8),
}

impl MenuType {
    /// Returns the title rendered in the menu's border.
    pub(crate) const fn repr(&self) -> &str {
        match self {
            Self::MainMenu(_) => "Main Menu",
            Self::EndMenu(title, _) => *title,
        }
    }

    /// Returns the number of entries of the menu.
    ///
    /// This allows the UI to size the menu container.
    pub(crate) const fn value(&self) -> u8 {
        match self {
            Self::MainMenu(value) | Self::EndMenu(_, value) => *value,
        }
    }
}
