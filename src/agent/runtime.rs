//! The page agent event loop.
//!
//! One task owns the loop; summarize flows are spawned so that a slow
//! background never blocks placement or close/copy handling.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::clipboard::ClipboardWriter;
use crate::config::Config;
use crate::ipc::{IpcError, RuntimeClient};
use crate::page::{Document, MutationWatch, NodeId};

use super::context::{PageContext, SharedPage};
use super::copy;
use super::flow::{self, TriggerOutcome};
use super::host::{main_region, HostKind};
use super::placement;

/// Keys the agent reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other(String),
}

/// Input delivered to the page agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Click(NodeId),
    KeyDown(Key),
    Shutdown,
}

/// Page-side handle for feeding events into a running agent.
#[derive(Clone)]
pub struct PageEventSender {
    sender: mpsc::UnboundedSender<PageEvent>,
}

impl PageEventSender {
    pub fn send(&self, event: PageEvent) -> Result<(), IpcError> {
        self.sender.send(event).map_err(|_| IpcError::Disconnected)
    }

    pub fn click(&self, node: NodeId) -> Result<(), IpcError> {
        self.send(PageEvent::Click(node))
    }

    pub fn key_down(&self, key: Key) -> Result<(), IpcError> {
        self.send(PageEvent::KeyDown(key))
    }

    pub fn shutdown(&self) -> Result<(), IpcError> {
        self.send(PageEvent::Shutdown)
    }
}

/// What a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClickTarget {
    Affordance,
    CloseButton,
    Backdrop,
    CopyButton,
}

pub struct PageAgent {
    page: SharedPage,
    client: RuntimeClient,
    events: mpsc::UnboundedReceiver<PageEvent>,
    initial_delay: Duration,
    late_delay: Duration,
    outcomes: Option<mpsc::UnboundedSender<TriggerOutcome>>,
}

impl PageAgent {
    /// Attach the agent to `document`. Nothing is placed until [`Self::run`].
    pub fn install(
        document: Document,
        host: HostKind,
        client: RuntimeClient,
        clipboard: Box<dyn ClipboardWriter>,
        config: &Config,
    ) -> (Self, PageEventSender) {
        let page = PageContext::new(document, host, clipboard, config).into_shared();
        let (sender, events) = mpsc::unbounded_channel();
        tracing::info!(?host, placement = ?config.agent.placement, "Page agent installed");

        let agent = Self {
            page,
            client,
            events,
            initial_delay: Duration::from_millis(config.agent.initial_placement_delay_ms),
            late_delay: Duration::from_millis(config.agent.late_placement_delay_ms),
            outcomes: None,
        };
        (agent, PageEventSender { sender })
    }

    pub fn page(&self) -> SharedPage {
        Arc::clone(&self.page)
    }

    /// Receive the outcome of every trigger the loop spawns.
    pub fn subscribe_outcomes(&mut self) -> mpsc::UnboundedReceiver<TriggerOutcome> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.outcomes = Some(sender);
        receiver
    }

    /// Run until [`PageEvent::Shutdown`] or until every sender is dropped.
    pub async fn run(self) {
        let PageAgent {
            page,
            client,
            mut events,
            initial_delay,
            late_delay,
            outcomes,
        } = self;

        let (mut region, mut region_watch, mut container_watch) = {
            let mut guard = page.lock();
            let ctx = &mut *guard;
            let (region, region_watch) = watch_main_region(&mut ctx.document);
            let container_watch = ctx.document.observe(ctx.container, false);
            (region, region_watch, container_watch)
        };

        let initial = tokio::time::sleep(initial_delay);
        let late = tokio::time::sleep(late_delay);
        tokio::pin!(initial, late);
        let mut initial_done = false;
        let mut late_done = false;

        loop {
            tokio::select! {
                _ = &mut initial, if !initial_done => {
                    initial_done = true;
                    placement::ensure_placed(&mut page.lock());
                }
                _ = &mut late, if !late_done => {
                    late_done = true;
                    placement::ensure_placed(&mut page.lock());
                }
                Some(_) = region_watch.changed() => {
                    region_watch.drain();
                    let mut guard = page.lock();
                    let ctx = &mut *guard;
                    placement::ensure_placed(ctx);
                    if needs_rewatch(&ctx.document, region) {
                        (region, region_watch) = watch_main_region(&mut ctx.document);
                    }
                }
                Some(_) = container_watch.changed() => {
                    container_watch.drain();
                    placement::ensure_placed(&mut page.lock());
                }
                event = events.recv() => match event {
                    None | Some(PageEvent::Shutdown) => break,
                    Some(PageEvent::Click(node)) => {
                        on_click(&page, &client, outcomes.as_ref(), node);
                    }
                    Some(PageEvent::KeyDown(Key::Escape)) => {
                        let mut guard = page.lock();
                        let ctx = &mut *guard;
                        if ctx.modal.is_visible() {
                            ctx.modal.close(&mut ctx.document);
                        }
                    }
                    Some(PageEvent::KeyDown(Key::Other(_))) => {}
                },
            }
        }
        tracing::info!("Page agent stopped");
    }
}

fn on_click(
    page: &SharedPage,
    client: &RuntimeClient,
    outcomes: Option<&mpsc::UnboundedSender<TriggerOutcome>>,
    node: NodeId,
) {
    let target = route_click(&page.lock(), node);
    match target {
        Some(ClickTarget::Affordance) => {
            let page = Arc::clone(page);
            let client = client.clone();
            let outcomes = outcomes.cloned();
            tokio::spawn(async move {
                let outcome = flow::trigger(&page, &client).await;
                if let Some(outcomes) = outcomes {
                    let _ = outcomes.send(outcome);
                }
            });
        }
        Some(ClickTarget::CloseButton | ClickTarget::Backdrop) => {
            let mut guard = page.lock();
            let ctx = &mut *guard;
            ctx.modal.close(&mut ctx.document);
        }
        Some(ClickTarget::CopyButton) => {
            copy::copy_summary(page);
        }
        None => {}
    }
}

fn route_click(ctx: &PageContext, node: NodeId) -> Option<ClickTarget> {
    let doc = &ctx.document;
    let affordance = ctx.affordance();
    if doc.is_connected(affordance) && doc.contains(affordance, node) {
        return Some(ClickTarget::Affordance);
    }
    if !ctx.modal.is_visible() {
        return None;
    }
    if doc.contains(ctx.modal.close_button(), node) {
        Some(ClickTarget::CloseButton)
    } else if doc.contains(ctx.modal.copy_button(), node) {
        Some(ClickTarget::CopyButton)
    } else if node == ctx.modal.overlay() {
        Some(ClickTarget::Backdrop)
    } else {
        None
    }
}

/// Observe the main content region, or `<body>` when there is none yet.
fn watch_main_region(doc: &mut Document) -> (NodeId, MutationWatch) {
    let region = main_region()
        .iter()
        .find_map(|locator| doc.select(locator.selector()).into_iter().next())
        .unwrap_or_else(|| doc.body());
    tracing::debug!(?region, "Watching for page mutations");
    (region, doc.observe(region, true))
}

fn needs_rewatch(doc: &Document, region: NodeId) -> bool {
    if !doc.is_connected(region) {
        return true;
    }
    region == doc.body()
        && main_region()
            .iter()
            .any(|locator| !doc.select(locator.selector()).is_empty())
}
