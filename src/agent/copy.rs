//! Copy-to-clipboard for the modal body.

use std::sync::Arc;

use crate::clipboard::ClipboardError;
use crate::page::Document;

use super::context::SharedPage;

/// How a copy request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Nothing displayed, nothing copied.
    Empty,
    /// Written through the clipboard writer.
    Clipboard,
    /// Written through the hidden-textarea copy command.
    Fallback,
    /// Both paths failed; the label is left alone.
    Failed,
}

/// Copy the displayed body text and show the confirmation label.
///
/// Must run inside a tokio runtime: the label reset is a spawned timer.
/// A new copy cancels the previous timer before scheduling its own.
pub fn copy_summary(page: &SharedPage) -> CopyOutcome {
    let mut guard = page.lock();
    let ctx = &mut *guard;

    let text = ctx.modal.body_text(&ctx.document);
    if text.trim().is_empty() {
        return CopyOutcome::Empty;
    }

    let outcome = match ctx.clipboard.write_text(&text) {
        Ok(()) => CopyOutcome::Clipboard,
        Err(err) => {
            tracing::debug!(error = %err, "Clipboard write failed, using copy command");
            match copy_with_textarea(&mut ctx.document, &text) {
                Ok(()) => CopyOutcome::Fallback,
                Err(err) => {
                    tracing::warn!(error = %err, "Copy failed");
                    return CopyOutcome::Failed;
                }
            }
        }
    };

    let generation = ctx.modal.confirm_copy(&mut ctx.document);
    let delay = ctx.copy_feedback;
    let timer_page = Arc::clone(page);
    let timer = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let mut guard = timer_page.lock();
        let ctx = &mut *guard;
        ctx.modal.expire_copy_feedback(&mut ctx.document, generation);
    });
    ctx.modal.set_copy_reset(generation, timer);

    tracing::debug!(?outcome, chars = text.chars().count(), "Summary copied");
    outcome
}

/// Off-screen textarea, select, host copy command. The textarea is removed
/// whatever the result.
fn copy_with_textarea(doc: &mut Document, text: &str) -> Result<(), ClipboardError> {
    let textarea = doc.create_element("textarea");
    doc.set_attribute(textarea, "value", text);
    doc.set_attribute(textarea, "readonly", "");
    doc.set_style(textarea, "position", "fixed");
    doc.set_style(textarea, "opacity", "0");
    let body = doc.body();
    doc.append_child(body, textarea);

    let mut doc = scopeguard::guard(doc, move |doc| doc.remove(textarea));
    doc.select_contents(textarea);
    if doc.exec_copy() {
        Ok(())
    } else {
        Err(ClipboardError::CopyCommandFailed)
    }
}
