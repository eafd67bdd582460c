//! Keeps exactly one summarize affordance on the page.
//!
//! Webmail hosts tear down and rebuild their content on in-app navigation,
//! so placement is an idempotent "ensure" that the runtime re-runs after
//! the startup delays and after every observed mutation. The affordance is
//! a single element created once; re-placement moves it rather than
//! building another.

use crate::config::PlacementMode;
use crate::page::{Document, NodeId};

use super::context::PageContext;

pub const AFFORDANCE_LABEL: &str = "\u{2728} Summarize Email";

/// Marker attribute carried by the affordance element.
pub const AFFORDANCE_MARKER: &str = "data-mailbrief";

const INLINE_CLASS: &str = "es-inline-btn";
const FIXED_CLASS: &str = "es-topbar-btn";

/// Where the affordance currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Inside a host toolbar.
    Inline { toolbar: NodeId },
    /// First child of the agent's own container.
    Fixed,
}

/// The affordance element and where it was last placed.
#[derive(Debug)]
pub struct PlacementHandle {
    affordance: NodeId,
    current: Option<Placement>,
}

/// Result of one [`ensure_placed`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// The existing placement is still attached.
    Kept(Placement),
    /// The affordance was (re-)attached.
    Placed(Placement),
}

impl PlacementHandle {
    /// Create the (detached) affordance element.
    pub fn new(doc: &mut Document) -> Self {
        let affordance = doc.create_element("button");
        doc.set_attribute(affordance, AFFORDANCE_MARKER, "affordance");
        doc.set_attribute(affordance, "type", "button");
        doc.set_text(affordance, AFFORDANCE_LABEL);
        Self {
            affordance,
            current: None,
        }
    }

    pub fn affordance(&self) -> NodeId {
        self.affordance
    }

    /// The current placement if the affordance is still on the page.
    ///
    /// A placement whose element the host has detached is stale and is
    /// reported as `None`.
    pub fn live(&self, doc: &Document) -> Option<Placement> {
        self.current.filter(|_| doc.is_connected(self.affordance))
    }
}

/// Make sure the affordance is attached, placing it if the handle is stale.
pub fn ensure_placed(ctx: &mut PageContext) -> PlacementOutcome {
    if let Some(placement) = ctx.placement.live(&ctx.document) {
        return PlacementOutcome::Kept(placement);
    }
    ctx.placement.current = None;
    remove_strays(&mut ctx.document, ctx.placement.affordance);

    let placement = match ctx.placement_mode {
        PlacementMode::Contextual => place_inline(ctx).unwrap_or_else(|| place_fixed(ctx)),
        PlacementMode::Fixed => place_fixed(ctx),
    };
    ctx.placement.current = Some(placement);
    tracing::info!(host = ?ctx.host, ?placement, "Affordance placed");
    PlacementOutcome::Placed(placement)
}

fn place_inline(ctx: &mut PageContext) -> Option<Placement> {
    let toolbar = ctx
        .host
        .toolbar_locators()
        .iter()
        .find_map(|locator| ctx.document.select(locator.selector()).into_iter().next())?;

    let affordance = ctx.placement.affordance;
    let doc = &mut ctx.document;
    doc.remove_class(affordance, FIXED_CLASS);
    doc.add_class(affordance, INLINE_CLASS);
    doc.append_child(toolbar, affordance);
    Some(Placement::Inline { toolbar })
}

fn place_fixed(ctx: &mut PageContext) -> Placement {
    let affordance = ctx.placement.affordance;
    let container = ctx.container;
    let doc = &mut ctx.document;

    if !doc.is_connected(container) {
        tracing::warn!("Agent container was removed by the host, re-attaching");
        let body = doc.body();
        doc.append_child(body, container);
    }

    doc.remove_class(affordance, INLINE_CLASS);
    doc.add_class(affordance, FIXED_CLASS);
    let first = doc.children(container).first().copied();
    doc.insert_before(container, affordance, first);
    Placement::Fixed
}

/// Remove affordance copies that are not ours (e.g. host-cloned markup).
fn remove_strays(doc: &mut Document, ours: NodeId) {
    let root = doc.root();
    let strays: Vec<NodeId> = doc
        .descendants(root)
        .filter(|&node| node != ours && doc.attribute(node, AFFORDANCE_MARKER).is_some())
        .collect();
    for stray in strays {
        tracing::debug!(?stray, "Removing stray affordance");
        doc.remove(stray);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::host::HostKind;
    use crate::clipboard::NoClipboard;
    use crate::config::Config;

    fn context(html: &str, host: HostKind) -> PageContext {
        PageContext::new(
            Document::parse_html(html),
            host,
            Box::new(NoClipboard),
            &Config::default(),
        )
    }

    fn affordance_count(ctx: &PageContext) -> usize {
        ctx.document
            .query_selector_all("[data-mailbrief]")
            .unwrap()
            .into_iter()
            .filter(|&node| ctx.document.is_connected(node))
            .count()
    }

    #[test]
    fn unplaced_handle_is_not_live() {
        let ctx = context("<body></body>", HostKind::Generic);
        assert_eq!(ctx.placement.live(&ctx.document), None);
    }

    #[test]
    fn gmail_toolbar_gets_inline_affordance() {
        let mut ctx = context(
            r#"<body><div gh="mtb"></div><div role="main"></div></body>"#,
            HostKind::Gmail,
        );
        let toolbar = ctx.document.query_selector(r#"[gh="mtb"]"#).unwrap().unwrap();

        let outcome = ensure_placed(&mut ctx);

        assert_eq!(outcome, PlacementOutcome::Placed(Placement::Inline { toolbar }));
        assert_eq!(ctx.document.parent(ctx.affordance()), Some(toolbar));
        assert!(ctx.document.has_class(ctx.affordance(), "es-inline-btn"));
    }

    #[test]
    fn second_call_keeps_placement() {
        let mut ctx = context("<body></body>", HostKind::Generic);
        ensure_placed(&mut ctx);
        assert_eq!(
            ensure_placed(&mut ctx),
            PlacementOutcome::Kept(Placement::Fixed)
        );
        assert_eq!(affordance_count(&ctx), 1);
    }

    #[test]
    fn fixed_mode_ignores_toolbar() {
        let mut ctx = context(r#"<body><div gh="mtb"></div></body>"#, HostKind::Gmail);
        ctx.placement_mode = PlacementMode::Fixed;

        assert_eq!(
            ensure_placed(&mut ctx),
            PlacementOutcome::Placed(Placement::Fixed)
        );
        assert_eq!(ctx.document.children(ctx.container)[0], ctx.affordance());
        assert!(ctx.document.has_class(ctx.affordance(), "es-topbar-btn"));
    }

    #[test]
    fn stray_copies_are_removed() {
        let mut ctx = context(
            r#"<body><button data-mailbrief="affordance">copy</button></body>"#,
            HostKind::Generic,
        );
        ensure_placed(&mut ctx);
        assert_eq!(affordance_count(&ctx), 1);
    }
}
