//! Shared test utilities and fakes.

#![allow(dead_code, unused_imports)]

pub mod mock_messages_api;

use async_trait::async_trait;
use mailbrief::agent::{HostKind, PageContext, SharedPage};
use mailbrief::clipboard::{ClipboardError, ClipboardWriter, NoClipboard};
use mailbrief::config::Config;
use mailbrief::ipc::{IpcLayer, MessageHandler, RuntimeClient, RuntimeRequest, SummaryResult};
use mailbrief::page::Document;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Background stand-in that answers every request with a fixed reply.
pub struct ScriptedHandler {
    reply: SummaryResult,
    calls: AtomicUsize,
    texts: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedHandler {
    pub fn replying(reply: SummaryResult) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            texts: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    /// Like [`Self::replying`], but each reply waits for `release.notify_one()`.
    pub fn held(reply: SummaryResult, release: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            texts: Mutex::new(Vec::new()),
            gate: Some(release),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().clone()
    }
}

#[async_trait]
impl MessageHandler for ScriptedHandler {
    async fn handle(&self, request: RuntimeRequest) -> SummaryResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let RuntimeRequest::Summarize { text } = request;
        self.texts.lock().push(text);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.reply.clone()
    }
}

/// Clipboard writer that records what it was given.
#[derive(Clone, Default)]
pub struct RecordingClipboard {
    pub writes: Arc<Mutex<Vec<String>>>,
}

impl ClipboardWriter for RecordingClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.writes.lock().push(text.to_string());
        Ok(())
    }
}

/// A Gmail conversation view with one `.a3s.aiL` block per message.
pub fn gmail_thread(bodies: &[&str]) -> String {
    let messages: String = bodies
        .iter()
        .map(|body| {
            format!(r#"<div role="listitem"><div class="a3s aiL"><p>{body}</p></div></div>"#)
        })
        .collect();
    format!(
        r#"<html><body><div gh="mtb"></div><div role="main">{messages}</div></body></html>"#
    )
}

/// A page context over `html`, shared the way the runtime shares it.
pub fn page(html: &str, host: HostKind) -> SharedPage {
    page_with_clipboard(html, host, Box::new(NoClipboard))
}

pub fn page_with_clipboard(
    html: &str,
    host: HostKind,
    clipboard: Box<dyn ClipboardWriter>,
) -> SharedPage {
    PageContext::new(Document::parse_html(html), host, clipboard, &Config::default()).into_shared()
}

/// Runtime client connected to `handler` through a served channel.
pub fn serve(handler: Arc<dyn MessageHandler>) -> RuntimeClient {
    let (client, server) = IpcLayer::new();
    tokio::spawn(server.run(handler));
    client
}
