//! Reducer for the summary modal.

use crate::mvi::Reducer;

use super::intent::ModalIntent;
use super::state::ModalState;

pub struct ModalReducer;

impl Reducer for ModalReducer {
    type State = ModalState;
    type Intent = ModalIntent;

    fn reduce(_state: Self::State, intent: Self::Intent) -> Self::State {
        // Outcomes apply even after Close: a late response still lands and
        // is what the next open shows.
        match intent {
            ModalIntent::StartLoading => ModalState::Loading,
            ModalIntent::ShowResult { text, truncated } => {
                ModalState::ShowingSummary { text, truncated }
            }
            ModalIntent::ShowError { message } => ModalState::ShowingError { message },
            ModalIntent::Close => ModalState::Closed,
        }
    }
}
