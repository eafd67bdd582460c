//! The single modal surface and its DOM.
//!
//! Built once per page inside the agent's own container. Every transition
//! goes through [`ModalReducer`] and is then applied to the existing nodes.
//! Nothing is rebuilt per request.

use num_format::{Locale, ToFormattedString};
use tokio::task::JoinHandle;

use crate::agent::render;
use crate::mvi::Store;
use crate::page::{Document, NodeId};

use super::intent::ModalIntent;
use super::reducer::ModalReducer;
use super::state::ModalState;

pub const TITLE: &str = "Email Analysis";
pub const COPY_LABEL: &str = "Copy Summary";
pub const COPIED_LABEL: &str = "Copied!";

const ERROR_CLASS: &str = "es-error";
const VISIBLE_CLASS: &str = "visible";
const COPIED_CLASS: &str = "copied";

pub struct ModalSurface {
    overlay: NodeId,
    close_button: NodeId,
    body: NodeId,
    spinner: NodeId,
    truncation_notice: NodeId,
    footer: NodeId,
    copy_button: NodeId,
    store: Store<ModalReducer>,
    visible: bool,
    copy_confirmed: bool,
    copy_generation: u64,
    copy_reset: Option<JoinHandle<()>>,
}

impl ModalSurface {
    /// Build the surface under `container`, hidden.
    pub fn build(doc: &mut Document, container: NodeId, truncate_at: usize) -> Self {
        let overlay = element(doc, "div", "es-modal-overlay");
        doc.set_style(overlay, "display", "none");
        let dialog = element(doc, "div", "es-modal");

        let header = element(doc, "div", "es-modal-header");
        let title = doc.create_element("h2");
        doc.set_text(title, TITLE);
        let close_button = element(doc, "button", "es-close-btn");
        doc.set_text(close_button, "\u{00D7}");
        doc.set_attribute(close_button, "aria-label", "Close");
        doc.append_child(header, title);
        doc.append_child(header, close_button);

        let body = element(doc, "div", "es-modal-body");

        let spinner = element(doc, "div", "es-loading");
        let wheel = element(doc, "div", "es-spinner");
        doc.append_child(spinner, wheel);

        let truncation_notice = element(doc, "div", "es-truncation-warning");
        doc.set_text(
            truncation_notice,
            &format!(
                "Note: The email was truncated to the first {} characters.",
                truncate_at.to_formatted_string(&Locale::en)
            ),
        );
        doc.set_style(truncation_notice, "display", "none");

        let footer = element(doc, "div", "es-modal-footer");
        let copy_button = element(doc, "button", "es-copy-btn");
        doc.set_text(copy_button, COPY_LABEL);
        doc.append_child(footer, copy_button);

        doc.append_child(dialog, header);
        doc.append_child(dialog, body);
        doc.append_child(dialog, truncation_notice);
        doc.append_child(dialog, footer);
        doc.append_child(overlay, dialog);
        doc.append_child(container, overlay);

        Self {
            overlay,
            close_button,
            body,
            spinner,
            truncation_notice,
            footer,
            copy_button,
            store: Store::new(),
            visible: false,
            copy_confirmed: false,
            copy_generation: 0,
            copy_reset: None,
        }
    }

    fn dispatch(&mut self, intent: ModalIntent) {
        self.store.dispatch(intent);
    }

    pub fn state(&self) -> &ModalState {
        self.store.state()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn overlay(&self) -> NodeId {
        self.overlay
    }

    pub fn close_button(&self) -> NodeId {
        self.close_button
    }

    pub fn copy_button(&self) -> NodeId {
        self.copy_button
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn truncation_notice(&self) -> NodeId {
        self.truncation_notice
    }

    pub fn copy_confirmed(&self) -> bool {
        self.copy_confirmed
    }

    /// Plain text currently displayed in the body.
    pub fn body_text(&self, doc: &Document) -> String {
        doc.text_content(self.body)
    }

    pub fn open(&mut self, doc: &mut Document) {
        doc.set_style(self.overlay, "display", "flex");
        doc.add_class(self.overlay, VISIBLE_CLASS);
        self.visible = true;
    }

    /// Hide and fully reset: body, error styling, truncation notice, copy
    /// label and any pending label reset.
    pub fn close(&mut self, doc: &mut Document) {
        doc.remove_class(self.overlay, VISIBLE_CLASS);
        doc.set_style(self.overlay, "display", "none");
        self.visible = false;

        doc.clear_children(self.body);
        doc.remove_class(self.body, ERROR_CLASS);
        doc.set_style(self.truncation_notice, "display", "none");
        self.cancel_copy_reset();
        self.reset_copy_label(doc);

        self.dispatch(ModalIntent::Close);
    }

    pub fn set_loading(&mut self, doc: &mut Document) {
        self.dispatch(ModalIntent::StartLoading);
        doc.clear_children(self.body);
        doc.remove_class(self.body, ERROR_CLASS);
        doc.append_child(self.body, self.spinner);
        doc.set_style(self.truncation_notice, "display", "none");
        doc.set_style(self.footer, "display", "none");
    }

    pub fn show_result(&mut self, doc: &mut Document, text: &str, truncated: bool) {
        self.dispatch(ModalIntent::ShowResult {
            text: text.to_string(),
            truncated,
        });
        render::render(doc, self.body, text);
        doc.remove_class(self.body, ERROR_CLASS);
        let notice = if truncated { "block" } else { "none" };
        doc.set_style(self.truncation_notice, "display", notice);
        doc.set_style(self.footer, "display", "flex");
    }

    pub fn show_error(&mut self, doc: &mut Document, message: &str) {
        self.dispatch(ModalIntent::ShowError {
            message: message.to_string(),
        });
        doc.set_text(self.body, message);
        doc.add_class(self.body, ERROR_CLASS);
        doc.set_style(self.truncation_notice, "display", "none");
        doc.set_style(self.footer, "display", "flex");
    }

    /// Show the copy confirmation and invalidate any pending reset.
    ///
    /// Returns the generation the caller's reset timer must present.
    pub fn confirm_copy(&mut self, doc: &mut Document) -> u64 {
        self.cancel_copy_reset();
        doc.set_text(self.copy_button, COPIED_LABEL);
        doc.add_class(self.copy_button, COPIED_CLASS);
        self.copy_confirmed = true;
        self.copy_generation
    }

    /// Keep the timer that will revert the label for `generation`.
    pub fn set_copy_reset(&mut self, generation: u64, timer: JoinHandle<()>) {
        if generation != self.copy_generation {
            timer.abort();
            return;
        }
        if let Some(previous) = self.copy_reset.replace(timer) {
            previous.abort();
        }
    }

    /// Revert the label if `generation` is still current.
    pub fn expire_copy_feedback(&mut self, doc: &mut Document, generation: u64) -> bool {
        if generation != self.copy_generation {
            return false;
        }
        self.copy_reset = None;
        self.reset_copy_label(doc);
        true
    }

    pub fn has_pending_copy_reset(&self) -> bool {
        self.copy_reset.is_some()
    }

    fn cancel_copy_reset(&mut self) {
        self.copy_generation = self.copy_generation.wrapping_add(1);
        if let Some(timer) = self.copy_reset.take() {
            timer.abort();
        }
    }

    fn reset_copy_label(&mut self, doc: &mut Document) {
        doc.set_text(self.copy_button, COPY_LABEL);
        doc.remove_class(self.copy_button, COPIED_CLASS);
        self.copy_confirmed = false;
    }
}

fn element(doc: &mut Document, tag: &str, class: &str) -> NodeId {
    let node = doc.create_element(tag);
    doc.add_class(node, class);
    node
}
