//! Per-page agent state.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::clipboard::ClipboardWriter;
use crate::config::{Config, PlacementMode};
use crate::page::{Document, NodeId};

use super::gate::RequestGate;
use super::host::HostKind;
use super::modal::ModalSurface;
use super::placement::PlacementHandle;

/// Id of the container the agent owns outright.
pub const ROOT_CONTAINER_ID: &str = "mailbrief-ext";

/// Everything the agent knows about one page, owned in one place.
pub struct PageContext {
    pub document: Document,
    pub host: HostKind,
    /// Agent-owned root, a direct child of `<body>`.
    pub container: NodeId,
    pub modal: ModalSurface,
    pub placement: PlacementHandle,
    pub placement_mode: PlacementMode,
    pub gate: RequestGate,
    pub clipboard: Box<dyn ClipboardWriter>,
    pub copy_feedback: Duration,
}

/// Shared handle to a page. Never lock across an await.
pub type SharedPage = Arc<Mutex<PageContext>>;

impl PageContext {
    /// Attach the agent's container and modal to `document`.
    pub fn new(
        mut document: Document,
        host: HostKind,
        clipboard: Box<dyn ClipboardWriter>,
        config: &Config,
    ) -> Self {
        let container = document.create_element("div");
        document.set_attribute(container, "id", ROOT_CONTAINER_ID);
        let body = document.body();
        document.append_child(body, container);

        let modal = ModalSurface::build(&mut document, container, config.limits.truncate_at);
        let placement = PlacementHandle::new(&mut document);

        Self {
            document,
            host,
            container,
            modal,
            placement,
            placement_mode: config.agent.placement,
            gate: RequestGate::new(),
            clipboard,
            copy_feedback: Duration::from_millis(config.agent.copy_feedback_ms),
        }
    }

    pub fn into_shared(self) -> SharedPage {
        Arc::new(Mutex::new(self))
    }

    /// The affordance element, placed or not.
    pub fn affordance(&self) -> NodeId {
        self.placement.affordance()
    }
}
