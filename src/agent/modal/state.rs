//! State of the summary modal.

use crate::mvi::UiState;

/// What the modal body currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    /// Nothing shown; body empty.
    #[default]
    Closed,

    /// A request is in flight.
    Loading,

    ShowingSummary {
        text: String,
        /// The email was cut before summarization.
        truncated: bool,
    },

    ShowingError {
        message: String,
    },
}

impl UiState for ModalState {}

impl ModalState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// True once a request has produced an outcome.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::ShowingSummary { .. } | Self::ShowingError { .. })
    }

    pub fn summary(&self) -> Option<&str> {
        match self {
            Self::ShowingSummary { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::ShowingError { message } => Some(message),
            _ => None,
        }
    }

    pub fn shows_truncation_notice(&self) -> bool {
        matches!(self, Self::ShowingSummary { truncated: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_is_default() {
        assert_eq!(ModalState::default(), ModalState::Closed);
    }

    #[test]
    fn accessors() {
        let summary = ModalState::ShowingSummary {
            text: "s".into(),
            truncated: true,
        };
        assert_eq!(summary.summary(), Some("s"));
        assert!(summary.shows_truncation_notice());
        assert!(summary.is_settled());

        let error = ModalState::ShowingError {
            message: "e".into(),
        };
        assert_eq!(error.error_message(), Some("e"));
        assert!(!error.shows_truncation_notice());

        assert!(ModalState::Loading.is_loading());
        assert!(!ModalState::Loading.is_settled());
    }
}
