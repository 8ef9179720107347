//! User-initiated and background events delivered to the controller.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Login form submitted; credentials are read from the page inputs.
    LoginSubmitted,
    /// Profile form submitted; fields are read from the page inputs.
    ProfileSubmitted,
    /// Click on an element tagged with `data-action` inside a book card.
    BookAction {
        action: String,
        book_id: String,
    },
    /// Click on a category link; `None` when the link has no
    /// `data-category` attribute.
    CategorySelected {
        category: Option<String>,
    },
    AvatarFilesSelected {
        files: Vec<PathBuf>,
    },
    AvatarLoaded {
        generation: u64,
        data_url: String,
    },
    AvatarLoadFailed {
        generation: u64,
        reason: String,
    },
    LogoutRequested,
    /// Periodic wake-up driving notification expiry and delayed redirects.
    Tick,
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::LoginSubmitted => "login_submitted",
            UiEvent::ProfileSubmitted => "profile_submitted",
            UiEvent::BookAction { .. } => "book_action",
            UiEvent::CategorySelected { .. } => "category_selected",
            UiEvent::AvatarFilesSelected { .. } => "avatar_files_selected",
            UiEvent::AvatarLoaded { .. } => "avatar_loaded",
            UiEvent::AvatarLoadFailed { .. } => "avatar_load_failed",
            UiEvent::LogoutRequested => "logout_requested",
            UiEvent::Tick => "tick",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookAction {
    Read,
    Renew,
    Return,
}

impl BookAction {
    pub fn from_attr(value: &str) -> Option<Self> {
        match value.trim() {
            "read" => Some(Self::Read),
            "renew" => Some(Self::Renew),
            "return" => Some(Self::Return),
            _ => None,
        }
    }

    pub fn attr(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Renew => "renew",
            Self::Return => "return",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_parse_from_data_attributes() {
        assert_eq!(BookAction::from_attr("renew"), Some(BookAction::Renew));
        assert_eq!(BookAction::from_attr(" read "), Some(BookAction::Read));
        assert_eq!(BookAction::from_attr("تجديد"), None);
        for action in [BookAction::Read, BookAction::Renew, BookAction::Return] {
            assert_eq!(BookAction::from_attr(action.attr()), Some(action));
        }
    }
}
