//! Summary modal: state machine plus the DOM surface that displays it.
//!
//! - `state.rs` - `ModalState`
//! - `intent.rs` - transitions requested by the flow and the user
//! - `reducer.rs` - pure state transitions
//! - `surface.rs` - the single DOM instance

mod intent;
mod reducer;
mod state;
mod surface;

pub use intent::ModalIntent;
pub use reducer::ModalReducer;
pub use state::ModalState;
pub use surface::{ModalSurface, COPIED_LABEL, COPY_LABEL, TITLE};
