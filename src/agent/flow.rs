//! One summarize request, end to end.

use uuid::Uuid;

use crate::ipc::{RuntimeClient, SummaryResult};

use super::context::SharedPage;
use super::extractor;
use super::modal::ModalState;

pub const EXTRACTION_FAILED: &str =
    "Could not find email content. Make sure you have an email open.";
pub const COMMUNICATION_FAILED: &str =
    "Failed to communicate with the extension. Try refreshing the page.";
pub const NO_RESPONSE: &str = "No response received. Please try again.";

/// What a call to [`trigger`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Another request held the gate; nothing happened.
    Skipped,
    /// The flow ran and the modal settled in this state.
    Completed(ModalState),
}

/// Extract, ask the background for a summary and display the outcome.
///
/// The request gate is held from the first step until the modal has
/// settled, on every path. The page lock is released while waiting on the
/// background.
pub async fn trigger(page: &SharedPage, client: &RuntimeClient) -> TriggerOutcome {
    let request_id = Uuid::new_v4();

    let (_permit, text) = {
        let mut guard = page.lock();
        let ctx = &mut *guard;
        let Some(permit) = ctx.gate.try_acquire() else {
            tracing::debug!(%request_id, "Summarize already in flight, ignoring trigger");
            return TriggerOutcome::Skipped;
        };
        tracing::info!(%request_id, host = ?ctx.host, "Summarize triggered");

        ctx.modal.open(&mut ctx.document);
        ctx.modal.set_loading(&mut ctx.document);

        match extractor::extract(&ctx.document, ctx.host) {
            Some(text) => (permit, text),
            None => {
                tracing::warn!(%request_id, "No email content found");
                ctx.modal.show_error(&mut ctx.document, EXTRACTION_FAILED);
                return TriggerOutcome::Completed(ctx.modal.state().clone());
            }
        }
    };

    tracing::debug!(%request_id, chars = text.chars().count(), "Sending text to background");
    let response = client.summarize(text).await;

    let mut guard = page.lock();
    let ctx = &mut *guard;
    match response {
        Ok(SummaryResult::Success { text, was_truncated }) if !text.trim().is_empty() => {
            tracing::info!(%request_id, was_truncated, "Summary received");
            ctx.modal.show_result(&mut ctx.document, &text, was_truncated);
        }
        Ok(SummaryResult::Success { .. }) => {
            tracing::warn!(%request_id, "Background returned an empty summary");
            ctx.modal.show_error(&mut ctx.document, NO_RESPONSE);
        }
        Ok(SummaryResult::Failure { message }) => {
            tracing::warn!(%request_id, %message, "Background reported an error");
            ctx.modal.show_error(&mut ctx.document, &message);
        }
        Err(err) => {
            tracing::error!(%request_id, error = %err, "Runtime channel failed");
            ctx.modal.show_error(&mut ctx.document, COMMUNICATION_FAILED);
        }
    }
    TriggerOutcome::Completed(ctx.modal.state().clone())
}
