//! Email body extraction.
//!
//! Webmail markup differs between single-message and thread views and
//! drifts between product revisions, so each host gets an ordered list of
//! locators, most specific first. Only unrecognised hosts use the generic
//! main-region read.

use crate::page::{Document, NodeId};

use super::host::{main_region, HostKind, Locator};
use super::placement::AFFORDANCE_MARKER;

/// Separator placed between messages of a Gmail conversation.
pub const THREAD_DELIMITER: &str = "\n\n---\n\n";

/// Best-effort visible body of the open email, or `None`.
///
/// Every tier trims leading and trailing whitespace.
pub fn extract(doc: &Document, host: HostKind) -> Option<String> {
    let text = match host {
        HostKind::Gmail => extract_thread(doc, host.body_locators()),
        HostKind::Outlook => extract_single(doc, host.body_locators()),
        HostKind::Generic => extract_single(doc, main_region()),
    };
    match &text {
        Some(text) => tracing::debug!(?host, chars = text.chars().count(), "Email text extracted"),
        None => tracing::debug!(?host, "No email text found"),
    }
    text
}

/// First locator with non-empty matches wins; all of its matches are joined
/// in document order.
fn extract_thread(doc: &Document, locators: &[Locator]) -> Option<String> {
    locators.iter().find_map(|locator| {
        let texts: Vec<String> = doc
            .select(locator.selector())
            .into_iter()
            .filter_map(|node| visible_text(doc, node))
            .collect();
        if texts.is_empty() {
            return None;
        }
        tracing::trace!(locator = %locator, matches = texts.len(), "Thread locator matched");
        Some(texts.join(THREAD_DELIMITER))
    })
}

/// First locator whose first non-empty match has text wins.
fn extract_single(doc: &Document, locators: &[Locator]) -> Option<String> {
    locators.iter().find_map(|locator| {
        let text = doc
            .select(locator.selector())
            .into_iter()
            .find_map(|node| visible_text(doc, node))?;
        tracing::trace!(locator = %locator, "Locator matched");
        Some(text)
    })
}

/// Visible text of `node` without the agent's own affordance, which may
/// sit inside a host toolbar within the matched region.
fn visible_text(doc: &Document, node: NodeId) -> Option<String> {
    let text = doc.inner_text_excluding(node, &[AFFORDANCE_MARKER]);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
