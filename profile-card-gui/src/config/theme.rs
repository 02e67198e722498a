use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
pub enum Theme {
    Light,
    #[default]
    Dark,
    Nord,
    Dracula,
}

impl Theme {
    /// The next theme in the cycle
    pub fn next(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Nord,
            Theme::Nord => Theme::Dracula,
            Theme::Dracula => Theme::Light,
        }
    }
}

impl From<&Theme> for iced::Theme {
    fn from(theme: &Theme) -> Self {
        match theme {
            Theme::Light => iced::Theme::Light,
            Theme::Dark => iced::Theme::Dark,
            Theme::Nord => iced::Theme::Nord,
            Theme::Dracula => iced::Theme::Dracula,
        }
    }
}
