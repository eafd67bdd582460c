//! Intents for the summary modal.

use crate::mvi::Intent;

#[derive(Debug, Clone)]
pub enum ModalIntent {
    /// A request started.
    StartLoading,

    /// The collaborator returned a summary.
    ShowResult { text: String, truncated: bool },

    /// Extraction, transport or the collaborator failed.
    ShowError { message: String },

    /// Close control, backdrop click or Escape.
    Close,
}

impl Intent for ModalIntent {}
