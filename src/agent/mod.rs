//! The page-embedded agent.
//!
//! - `host` / `extractor` - what the open email says
//! - `placement` - keeping the affordance on the page
//! - `modal` / `render` / `copy` - showing and copying results
//! - `flow` - one summarize request
//! - `runtime` - the event loop tying it together

mod context;
mod copy;
pub mod extractor;
pub mod flow;
mod gate;
pub mod host;
pub mod modal;
pub mod placement;
pub mod render;
mod runtime;

pub use context::{PageContext, SharedPage, ROOT_CONTAINER_ID};
pub use copy::{copy_summary, CopyOutcome};
pub use extractor::{extract, THREAD_DELIMITER};
pub use flow::{trigger, TriggerOutcome};
pub use gate::{RequestGate, RequestPermit};
pub use host::HostKind;
pub use placement::{ensure_placed, Placement, PlacementHandle, PlacementOutcome};
pub use runtime::{Key, PageAgent, PageEvent, PageEventSender};
